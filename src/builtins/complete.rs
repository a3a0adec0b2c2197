use crate::args::ParseResult;
use crate::completion::{CompletionEngine, CompletionQuery, QueryResult};
use crate::list::{merge_list, split_list};
use crate::registry::{Command, ExecContext, NameValues};
use crate::schema::{ArgSchema, ArgType};

/// `complete -command c [-option o [-value v]]`: the longest match (or with
/// `-all` every candidate) for a command name, one of its option names or
/// an option value.
pub struct Complete;

/// Reads `{{name} {value}} ...`. Malformed pairs are skipped.
fn parse_name_values(text: &str) -> Result<NameValues, failure::Error> {
    let mut name_values = NameValues::new();
    for pair in split_list(text)? {
        let pair = split_list(&pair)?;
        if let [name, value] = &pair[..] {
            name_values.insert(name.clone(), value.clone());
        }
    }

    Ok(name_values)
}

impl Command for Complete {
    fn name(&self) -> &str {
        "complete"
    }

    fn add_args(&self, schema: &mut ArgSchema) {
        schema
            .add_arg("-command", ArgType::String, "command", "command (prefix) to complete")
            .required();
        schema.add_arg("-option", ArgType::String, "option", "option (prefix) to complete");
        schema.add_arg("-value", ArgType::String, "value", "option value to complete");
        schema.add_arg("-name_values", ArgType::String, "name_values", "other option values on the line");
        schema.add_arg("-all", ArgType::Boolean, "", "get all matches");
        schema.add_arg("-exact_space", ArgType::Boolean, "", "add a space to an exact match");
    }

    fn exec(&self, ctx: &mut ExecContext, args: &ParseResult) -> Result<String, failure::Error> {
        let mut query = CompletionQuery::new(&args.get_str("command", ""))
            .name_values(parse_name_values(&args.get_str("name_values", ""))?)
            .all(args.get_bool("all", false))
            .exact_space(args.get_bool("exact_space", false));

        if args.has_parse_arg("option") {
            query = query.option(&args.get_str("option", ""));
            if args.has_parse_arg("value") {
                query = query.value(&args.get_str("value", ""));
            }
        }

        let engine = CompletionEngine::new(ctx.registry, ctx.session);
        match engine.query(&query)? {
            QueryResult::Match(text) => Ok(text),
            QueryResult::All(candidates) => Ok(merge_list(&candidates)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::frame::{Frame, Output};
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn name_value_pairs() {
        let name_values = parse_name_values("{{file} {my pic.png}} {{width} {}} {odd}").unwrap();
        assert_eq!(name_values.get("file").map(String::as_str), Some("my pic.png"));
        assert_eq!(name_values.get("width").map(String::as_str), Some(""));
        assert_eq!(name_values.len(), 2);
        assert!(parse_name_values("{{a}").is_err());
    }

    #[test]
    fn meta_command() {
        let dir = tempdir().unwrap();
        let mut frame = Frame::new(Config::default(), dir.path().to_owned());

        let text = |outputs: Vec<Output>| outputs[0].text().to_owned();
        assert_eq!(text(frame.process_line("complete -command ech -exact_space")), "echo ");
        assert_eq!(text(frame.process_line("complete -command h -all")), "help history html");
        assert_eq!(
            text(frame.process_line("complete -command image -option wi")),
            "-width"
        );
        assert_eq!(
            text(frame.process_line("complete -command set_data -option {} -all")),
            "name value"
        );
        assert_eq!(
            frame.process_line("complete -command nope -option x"),
            vec![Output::Error("complete: unknown command `nope'".to_owned())]
        );
    }
}
