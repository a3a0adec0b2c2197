//! The REPL runner: reads command lines, dispatches them to the registered
//! commands or to unix commands, and classifies their results.
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::args::{ArgumentParser, Parsed};
use crate::completion::{Completion, CompletionEngine};
use crate::config::Config;
use crate::glob_match::GlobMatcher;
use crate::history::History;
use crate::path_complete::PathCompleter;
use crate::registry::{CommandRegistry, ExecContext};
use crate::tokenizer::{self, split_commands};
use crate::unix::run_unix_command;

#[derive(Debug, Fail, PartialEq)]
pub enum CommandError {
    #[fail(display = "unknown command `{}'", _0)]
    UnknownCommand(String),
    #[fail(display = "{}: {}", _0, _1)]
    Spawn(String, String),
    #[fail(display = "{}: exited with {}\n{}", command, status, output)]
    Failed {
        command: String,
        status: String,
        output: String,
    },
}

/// The result of a command, by the way it is displayed.
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    Html(String),
    Svg(String),
    Text(String),
    /// A usage text requested with `-help`.
    Help(String),
    Error(String),
}

impl Output {
    /// Classifies a successful result by its content.
    pub fn from_result(text: String) -> Output {
        if text.starts_with("<html>") {
            Output::Html(text)
        } else if text.starts_with("<svg>") {
            Output::Svg(text)
        } else {
            Output::Text(text)
        }
    }

    pub fn is_error(&self) -> bool {
        match self {
            Output::Error(_) => true,
            _ => false,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Output::Html(text)
            | Output::Svg(text)
            | Output::Text(text)
            | Output::Help(text)
            | Output::Error(text) => text,
        }
    }
}

/// The state commands act on.
#[derive(Debug)]
pub struct Session {
    pub config: Config,
    /// The working directory of the frame. The process working directory
    /// is never changed.
    pub cwd: PathBuf,
    pub history: History,
    /// Named values stored by `set_data`.
    pub data: BTreeMap<String, String>,
    /// The directory `~` stands for.
    pub home: Option<PathBuf>,
}

impl Session {
    pub fn new(config: Config, cwd: PathBuf) -> Session {
        Session {
            history: History::new(config.history_size),
            config,
            cwd,
            data: BTreeMap::new(),
            home: dirs::home_dir(),
        }
    }

    /// A path completer relative to the working directory which honors the
    /// configured ignore rules.
    pub fn path_completer(&self) -> PathCompleter {
        let matcher = GlobMatcher::with_ignore_rules(&self.config.ignore_patterns);
        PathCompleter::new(matcher, &self.cwd).with_home(self.home.clone())
    }
}

pub struct Frame {
    registry: CommandRegistry,
    session: Session,
}

impl Frame {
    /// A frame running the builtin commands.
    pub fn new(config: Config, cwd: PathBuf) -> Frame {
        Frame::with_registry(CommandRegistry::with_builtins(), config, cwd)
    }

    pub fn with_registry(registry: CommandRegistry, config: Config, cwd: PathBuf) -> Frame {
        Frame {
            registry,
            session: Session::new(config, cwd),
        }
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn complete(&self, line: &str, cursor: usize) -> Completion {
        CompletionEngine::new(&self.registry, &self.session).complete(line, cursor)
    }

    /// Returns false while `line` needs more input. Unix commands and `cd`
    /// only continue after a trailing backslash.
    pub fn is_complete_line(&self, line: &str) -> bool {
        let trimmed = line.trim_start();
        if trimmed.starts_with('!') || trimmed == "cd" || trimmed.starts_with("cd ") {
            return !line.trim_end_matches('\n').ends_with('\\');
        }

        tokenizer::is_complete_line(line)
    }

    /// Records `line` in the history and runs it.
    pub fn process_line(&mut self, line: &str) -> Vec<Output> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Vec::new();
        }

        self.session.history.append(line);
        if let Some(unix) = trimmed.strip_prefix('!') {
            return vec![self.run_unix(unix)];
        }

        let mut outputs = Vec::new();
        for words in split_commands(line) {
            let output = self.run_command(&words);
            let failed = output.is_error();
            outputs.push(output);
            if failed {
                break;
            }
        }

        outputs
    }

    fn run_unix(&self, line: &str) -> Output {
        let words = split_commands(line).into_iter().next().unwrap_or_default();
        let (cmd, args) = match words.split_first() {
            Some(split) => split,
            None => return Output::Error("!: missing command".to_owned()),
        };

        match run_unix_command(cmd, args, &self.session.cwd) {
            Ok(text) => Output::from_result(text),
            Err(err) => Output::Error(err.to_string()),
        }
    }

    /// Parses `words[1..]` against the schema of the command `words[0]` and
    /// runs it.
    pub fn run_command(&mut self, words: &[String]) -> Output {
        let (name, argv) = match words.split_first() {
            Some(split) => split,
            None => return Output::Text(String::new()),
        };

        let entry = match self.registry.lookup(name) {
            Some(entry) => entry,
            None => return Output::Error(CommandError::UnknownCommand(name.clone()).to_string()),
        };

        let parsed = ArgumentParser::new(entry.schema())
            .debug(self.session.config.debug)
            .parse(argv);

        let args = match parsed {
            Ok(Parsed::Args(args)) => args,
            Ok(Parsed::Help(usage)) => return Output::Help(usage),
            Err(err) => return Output::Error(format!("{}: {}", name, err)),
        };

        info!("run: {:?}", words);
        let mut ctx = ExecContext {
            registry: &self.registry,
            session: &mut self.session,
        };

        match entry.command().exec(&mut ctx, &args) {
            Ok(text) => Output::from_result(text),
            Err(err) => {
                debug!("run: {} failed: {}", name, err);
                Output::Error(format!("{}: {}", name, err))
            }
        }
    }
}
