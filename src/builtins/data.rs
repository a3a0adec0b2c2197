//! Named values kept in the session.
use crate::args::ParseResult;
use crate::frame::Session;
use crate::registry::{Command, ExecContext, NameValues};
use crate::schema::{ArgSchema, ArgType};

pub struct SetData;

impl Command for SetData {
    fn name(&self) -> &str {
        "set_data"
    }

    fn add_args(&self, schema: &mut ArgSchema) {
        schema.add_arg("-name", ArgType::String, "name", "").required();
        schema.add_arg("-value", ArgType::String, "value", "").required();
    }

    fn exec(&self, ctx: &mut ExecContext, args: &ParseResult) -> Result<String, failure::Error> {
        for required in &["name", "value"] {
            if !args.has_parse_arg(required) {
                bail!("missing -{}", required);
            }
        }

        let name = args.get_str("name", "");
        let value = args.get_str("value", "");
        debug!("set_data: {}={:?}", name, value);
        ctx.session.data.insert(name, value);
        Ok(String::new())
    }
}

pub struct GetData;

impl Command for GetData {
    fn name(&self) -> &str {
        "get_data"
    }

    fn add_args(&self, schema: &mut ArgSchema) {
        schema.add_arg("-name", ArgType::String, "name", "").required();
    }

    fn arg_values(&self, name: &str, _name_values: &NameValues, session: &Session) -> Option<Vec<String>> {
        match name {
            "name" => Some(session.data.keys().cloned().collect()),
            _ => None,
        }
    }

    fn exec(&self, ctx: &mut ExecContext, args: &ParseResult) -> Result<String, failure::Error> {
        let name = args.get_str("name", "");
        match ctx.session.data.get(&name) {
            Some(value) => Ok(value.clone()),
            None => Err(format_err!("no data named `{}'", name)),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::completion::Completion;
    use crate::config::Config;
    use crate::frame::{Frame, Output};
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn store_and_complete_names() {
        let dir = tempdir().unwrap();
        let mut frame = Frame::new(Config::default(), dir.path().to_owned());

        frame.process_line("set_data -name population -value {1 2 3}");
        frame.process_line("set_data -name people -value x");
        assert_eq!(
            frame.process_line("get_data -name population"),
            vec![Output::Text("1 2 3".to_owned())]
        );
        assert!(frame.process_line("set_data -value 1")[0].is_error());
        assert_eq!(
            frame.process_line("set_data -name empty"),
            vec![Output::Error("set_data: missing -value".to_owned())]
        );
        assert!(frame.process_line("get_data -name empty")[0].is_error());

        assert_eq!(
            frame.complete("get_data -name pop", 18),
            Completion::Replaced {
                line: "get_data -name population ".to_owned(),
                cursor: 26
            }
        );
        assert_eq!(
            frame.complete("get_data -name p", 16),
            Completion::Candidates(vec!["people".to_owned(), "population".to_owned()])
        );
    }
}
