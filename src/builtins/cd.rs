use crate::args::ParseResult;
use crate::registry::{Command, ExecContext};
use crate::schema::{ArgSchema, ArgType};

/// Changes the working directory of the frame; defaults to the home
/// directory.
pub struct Cd;

impl Command for Cd {
    fn name(&self) -> &str {
        "cd"
    }

    fn add_args(&self, schema: &mut ArgSchema) {
        schema
            .add_arg("dir", ArgType::String, "dir", "directory to change to")
            .path();
    }

    fn exec(&self, ctx: &mut ExecContext, args: &ParseResult) -> Result<String, failure::Error> {
        trace!("cd: args={:?}", args.args());
        let dir = args.args().get(0).map(String::as_str).unwrap_or("~");
        let dir = ctx
            .session
            .path_completer()
            .expand_tilde(dir)
            .unwrap_or_else(|| dir.to_owned());

        // `join` keeps absolute paths as they are.
        let path = ctx.session.cwd.join(&dir);
        let path = path
            .canonicalize()
            .map_err(|err| format_err!("{}: `{}'", err, dir))?;

        if !path.is_dir() {
            bail!("not a directory: `{}'", dir);
        }

        ctx.session.cwd = path;
        Ok(String::new())
    }
}
