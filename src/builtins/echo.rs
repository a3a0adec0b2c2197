use crate::args::ParseResult;
use crate::registry::{Command, ExecContext};
use crate::schema::{ArgSchema, ArgType};

pub struct Echo;

impl Command for Echo {
    fn name(&self) -> &str {
        "echo"
    }

    fn add_args(&self, schema: &mut ArgSchema) {
        schema.add_arg("args", ArgType::String, "args", "words to print");
    }

    fn exec(&self, _ctx: &mut ExecContext, args: &ParseResult) -> Result<String, failure::Error> {
        Ok(args.args().join(" "))
    }
}
