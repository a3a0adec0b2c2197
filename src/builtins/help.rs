use crate::args::ParseResult;
use crate::glob_match::glob_matches;
use crate::registry::{Command, ExecContext};
use crate::schema::{ArgSchema, ArgType};

/// Prints the usage of the commands matching a glob (all by default).
pub struct Help;

impl Command for Help {
    fn name(&self) -> &str {
        "help"
    }

    fn add_args(&self, schema: &mut ArgSchema) {
        schema.add_arg("-hidden", ArgType::Boolean, "", "show hidden options");
        schema.add_arg("-verbose", ArgType::Boolean, "", "show long descriptions");
        schema.add_arg("pattern", ArgType::String, "pattern", "commands to describe");
    }

    fn exec(&self, ctx: &mut ExecContext, args: &ParseResult) -> Result<String, failure::Error> {
        let hidden = args.get_bool("hidden", false) || args.show_hidden();
        let verbose = args.get_bool("verbose", false);
        let pattern = args.args().get(0).map(String::as_str).unwrap_or("*");

        let usages: Vec<String> = ctx
            .registry
            .entries()
            .filter(|entry| glob_matches(pattern, entry.name()))
            .map(|entry| entry.schema().usage(hidden, verbose))
            .collect();

        if usages.is_empty() {
            bail!("no command matches `{}'", pattern);
        }

        Ok(usages.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use crate::config::Config;
    use crate::frame::{Frame, Output};
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn usage_of_matching_commands() {
        let dir = tempdir().unwrap();
        let mut frame = Frame::new(Config::default(), dir.path().to_owned());

        assert_eq!(
            frame.process_line("help echo"),
            vec![Output::Text("echo\n  [<args>]\n  [-help]\n".to_owned())]
        );

        let outputs = frame.process_line("help *_data");
        assert!(outputs[0].text().starts_with("get_data\n"));
        assert!(outputs[0].text().contains("\nset_data\n"));

        let verbose = frame.process_line("help -verbose echo");
        assert!(verbose[0].text().contains("      <args>: words to print\n"));

        assert_eq!(
            frame.process_line("help nothing*"),
            vec![Output::Error("help: no command matches `nothing*'".to_owned())]
        );
    }
}
