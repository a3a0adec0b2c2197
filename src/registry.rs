use std::collections::BTreeMap;

use crate::args::ParseResult;
use crate::frame::Session;
use crate::schema::{ArgSchema, ArgSpec};
use crate::tokenizer::OptionArity;

pub type NameValues = BTreeMap<String, String>;

pub struct ExecContext<'a> {
    pub registry: &'a CommandRegistry,
    pub session: &'a mut Session,
}

/// A command the REPL can run and complete.
pub trait Command {
    fn name(&self) -> &str;

    /// Declares the options and positional arguments.
    fn add_args(&self, schema: &mut ArgSchema);

    /// Legal values for the `String` argument `name`. `name_values` holds the
    /// `-option value` pairs already on the line, including the one being
    /// completed. Returning `None` falls back to the enum labels or path
    /// completion declared in the schema. Must not have side effects.
    fn arg_values(&self, _name: &str, _name_values: &NameValues, _session: &Session) -> Option<Vec<String>> {
        None
    }

    /// Runs the command and returns its result text.
    fn exec(&self, ctx: &mut ExecContext, args: &ParseResult) -> Result<String, failure::Error>;
}

pub struct CommandEntry {
    command: Box<dyn Command>,
    schema: ArgSchema,
}

impl CommandEntry {
    pub fn name(&self) -> &str {
        self.schema.name()
    }

    pub fn schema(&self) -> &ArgSchema {
        &self.schema
    }

    pub fn command(&self) -> &dyn Command {
        self.command.as_ref()
    }

    /// The option named `name`, or else the positional of that name.
    fn spec(&self, name: &str) -> Option<&ArgSpec> {
        self.schema
            .option(name)
            .or_else(|| self.schema.positionals().find(|arg| arg.name == name))
    }
}

/// Commands keyed by name. Schemas are built once on registration.
#[derive(Default)]
pub struct CommandRegistry {
    commands: BTreeMap<String, CommandEntry>,
}

impl CommandRegistry {
    pub fn new() -> CommandRegistry {
        CommandRegistry::default()
    }

    /// A registry holding every builtin command.
    pub fn with_builtins() -> CommandRegistry {
        let mut registry = CommandRegistry::new();
        crate::builtins::register_all(&mut registry);
        registry
    }

    /// Registers `command`, replacing a command of the same name.
    pub fn register<C: Command + 'static>(&mut self, command: C) {
        let mut schema = ArgSchema::new(command.name());
        command.add_args(&mut schema);

        let name = schema.name().to_owned();
        if self.commands.contains_key(&name) {
            warn!("registry: replacing command `{}'", name);
        }

        self.commands.insert(
            name,
            CommandEntry {
                command: Box::new(command),
                schema,
            },
        );
    }

    pub fn lookup(&self, name: &str) -> Option<&CommandEntry> {
        self.commands.get(name)
    }

    /// Command names, sorted.
    pub fn names(&self) -> Vec<String> {
        self.commands.keys().cloned().collect()
    }

    pub fn entries(&self) -> impl Iterator<Item = &CommandEntry> {
        self.commands.values()
    }

    /// The candidate values for the `String` argument `name` of `command`:
    /// the command's own value source, or else the enum labels or path
    /// matches declared in its schema.
    pub fn arg_values(
        &self,
        command: &str,
        name: &str,
        name_values: &NameValues,
        session: &Session,
    ) -> Vec<String> {
        let entry = match self.lookup(command) {
            Some(entry) => entry,
            None => return Vec::new(),
        };

        if let Some(values) = entry.command.arg_values(name, name_values, session) {
            return values;
        }

        match entry.spec(name) {
            Some(spec) if spec.path => {
                let typed = name_values.get(name).map(String::as_str).unwrap_or("");
                session
                    .path_completer()
                    .match_prefix(typed)
                    .unwrap_or_default()
            }
            Some(spec) => spec
                .enum_values
                .iter()
                .map(|(label, _)| label.clone())
                .collect(),
            None => Vec::new(),
        }
    }
}

impl OptionArity for CommandRegistry {
    fn takes_value(&self, command: &str, option: &str) -> Option<bool> {
        let entry = self.lookup(command)?;
        match entry.schema.option(option) {
            Some(spec) => Some(spec.value_type.takes_value()),
            // `-help`, `-hidden` and typos.
            None => Some(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::schema::ArgType;
    use pretty_assertions::assert_eq;
    use std::fs::File;
    use tempfile::tempdir;

    struct Plot;

    impl Command for Plot {
        fn name(&self) -> &str {
            "plot"
        }

        fn add_args(&self, schema: &mut ArgSchema) {
            schema
                .add_arg("-type", ArgType::String, "type", "")
                .enum_value("xy", 0)
                .enum_value("bar", 1);
            schema.add_arg("-file", ArgType::String, "file", "").path();
            schema.add_arg("-column", ArgType::String, "column", "");
            schema.add_arg("-smooth", ArgType::Boolean, "", "");
        }

        fn arg_values(&self, name: &str, name_values: &NameValues, _session: &Session) -> Option<Vec<String>> {
            if name != "column" {
                return None;
            }

            match name_values.get("type").map(String::as_str) {
                Some("bar") => Some(vec!["label".to_owned(), "count".to_owned()]),
                _ => Some(vec!["x".to_owned(), "y".to_owned()]),
            }
        }

        fn exec(&self, _ctx: &mut ExecContext, _args: &ParseResult) -> Result<String, failure::Error> {
            Ok(String::new())
        }
    }

    #[test]
    fn lookup_and_arity() {
        let mut registry = CommandRegistry::new();
        registry.register(Plot);

        assert_eq!(registry.names(), vec!["plot"]);
        assert!(registry.lookup("plot").unwrap().schema().option("type").is_some());
        assert!(registry.lookup("plt").is_none());
        assert_eq!(registry.takes_value("plot", "type"), Some(true));
        assert_eq!(registry.takes_value("plot", "smooth"), Some(false));
        assert_eq!(registry.takes_value("plot", "help"), Some(false));
        assert_eq!(registry.takes_value("plt", "type"), None);
    }

    #[test]
    fn value_sources() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join("data.csv")).unwrap();
        let session = Session::new(Config::default(), dir.path().to_owned());

        let mut registry = CommandRegistry::new();
        registry.register(Plot);

        let mut name_values = NameValues::new();
        assert_eq!(registry.arg_values("plot", "type", &name_values, &session), vec!["xy", "bar"]);
        assert_eq!(registry.arg_values("plot", "column", &name_values, &session), vec!["x", "y"]);

        name_values.insert("type".to_owned(), "bar".to_owned());
        assert_eq!(
            registry.arg_values("plot", "column", &name_values, &session),
            vec!["label", "count"]
        );

        name_values.insert("file".to_owned(), "da".to_owned());
        assert_eq!(registry.arg_values("plot", "file", &name_values, &session), vec!["data.csv"]);
        assert_eq!(registry.arg_values("nope", "file", &name_values, &session), Vec::<String>::new());
    }
}
