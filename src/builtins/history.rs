use std::fmt::Write;

use crate::args::ParseResult;
use crate::registry::{Command, ExecContext};
use crate::schema::{ArgSchema, ArgType};

pub struct HistoryCommand;

impl Command for HistoryCommand {
    fn name(&self) -> &str {
        "history"
    }

    fn add_args(&self, schema: &mut ArgSchema) {
        schema.add_arg("-count", ArgType::Integer, "count", "show the last <count> entries only");
    }

    fn exec(&self, ctx: &mut ExecContext, args: &ParseResult) -> Result<String, failure::Error> {
        let history = &ctx.session.history;
        let count = args.get_int("count", history.len() as i64).max(0) as usize;
        let skip = history.len().saturating_sub(count);

        let mut text = String::new();
        for (number, line) in history.iter().skip(skip) {
            writeln!(text, "{:5}  {}", number, line).ok();
        }

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use crate::config::Config;
    use crate::frame::{Frame, Output};
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn numbered_entries() {
        let dir = tempdir().unwrap();
        let mut frame = Frame::new(Config::default(), dir.path().to_owned());

        frame.process_line("echo 1");
        frame.process_line("echo 2");
        assert_eq!(
            frame.process_line("history"),
            vec![Output::Text("    1  echo 1\n    2  echo 2\n    3  history\n".to_owned())]
        );
        assert_eq!(
            frame.process_line("history -count 1"),
            vec![Output::Text("    4  history -count 1\n".to_owned())]
        );
    }
}
