//! Completion of partially typed command lines: command names, option names
//! and option values.
use crate::common::strings::{longest_match, match_prefix};
use crate::frame::Session;
use crate::registry::{CommandRegistry, NameValues};
use crate::schema::{ArgSpec, ArgType};
use crate::tokenizer::{tokenize_with, Quote, Token, TokenKind};

/// Stands in for the word the user is about to type when the cursor is
/// between tokens.
const PROBE: char = '\u{1}';

#[derive(Debug, Fail, PartialEq)]
pub enum CompletionError {
    #[fail(display = "unknown command `{}'", _0)]
    UnknownCommand(String),
    #[fail(display = "{}: unknown option `-{}'", _0, _1)]
    UnknownOption(String, String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    /// There is nothing to complete.
    Unchanged,
    /// The completed line and the cursor position following the completion.
    Replaced { line: String, cursor: usize },
    /// Several candidates share no longer prefix than the typed text.
    Candidates(Vec<String>),
}

impl Completion {
    /// The line after applying this completion.
    pub fn apply(&self, line: &str) -> String {
        match self {
            Completion::Replaced { line, .. } => line.clone(),
            _ => line.to_owned(),
        }
    }
}

/// The arguments of the `complete` command.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompletionQuery {
    /// The command (prefix, if `option` is not set).
    pub command: String,
    /// The option (prefix, if `value` is not set) without the leading `-`.
    pub option: Option<String>,
    pub value: Option<String>,
    pub name_values: NameValues,
    /// Return every candidate instead of the longest match.
    pub all: bool,
    /// Append a space to an exact match.
    pub exact_space: bool,
}

impl CompletionQuery {
    pub fn new(command: &str) -> CompletionQuery {
        CompletionQuery {
            command: command.to_owned(),
            ..Default::default()
        }
    }

    #[inline]
    pub fn option(mut self, option: &str) -> CompletionQuery {
        self.option = Some(option.to_owned());
        self
    }

    #[inline]
    pub fn value(mut self, value: &str) -> CompletionQuery {
        self.value = Some(value.to_owned());
        self
    }

    #[inline]
    pub fn name_values(mut self, name_values: NameValues) -> CompletionQuery {
        self.name_values = name_values;
        self
    }

    #[inline]
    pub fn all(mut self, all: bool) -> CompletionQuery {
        self.all = all;
        self
    }

    #[inline]
    pub fn exact_space(mut self, exact_space: bool) -> CompletionQuery {
        self.exact_space = exact_space;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum QueryResult {
    /// The longest match (empty if there is none).
    Match(String),
    All(Vec<String>),
}

/// The longest common prefix of `matches` unless it is shorter than `typed`.
fn longest_extension(typed: &str, matches: &[String], exact_space: bool) -> Option<String> {
    let (mut lcp, exact) = longest_match(matches);
    if lcp.len() < typed.len() {
        return None;
    }

    if exact && exact_space {
        lcp.push(' ');
    }

    Some(lcp)
}

/// Quotes `text` so that it reads back as one word inside a `quote`d token.
fn escape(text: &str, quote: Quote) -> String {
    let special: &str = match quote {
        Quote::Brace => return text.to_owned(),
        Quote::Double => "\"\\[",
        Quote::Bare => " \t\n;{}\"\\[]",
    };

    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if special.contains(ch) {
            escaped.push('\\');
        }

        escaped.push(ch);
    }

    escaped
}

/// What is being completed and how to reduce its candidates.
struct Target {
    candidates: Vec<String>,
    exact_space: bool,
}

pub struct CompletionEngine<'a> {
    registry: &'a CommandRegistry,
    session: &'a Session,
}

impl<'a> CompletionEngine<'a> {
    pub fn new(registry: &'a CommandRegistry, session: &'a Session) -> CompletionEngine<'a> {
        CompletionEngine { registry, session }
    }

    /// Candidate values of the argument `spec` of `command`.
    fn values_for(&self, command: &str, spec: &ArgSpec, name_values: &NameValues) -> Vec<String> {
        spec.value_type.fixed_values().unwrap_or_else(|| {
            self.registry
                .arg_values(command, &spec.name, name_values, self.session)
        })
    }

    /// Answers a `complete` command query.
    pub fn query(&self, query: &CompletionQuery) -> Result<QueryResult, CompletionError> {
        let option = match &query.option {
            Some(option) => option,
            None => {
                let matches = match_prefix(&query.command, &self.registry.names());
                if query.all {
                    return Ok(QueryResult::All(matches));
                }

                let lcp = longest_extension(&query.command, &matches, query.exact_space);
                return Ok(QueryResult::Match(lcp.unwrap_or_default()));
            }
        };

        let entry = self
            .registry
            .lookup(&query.command)
            .ok_or_else(|| CompletionError::UnknownCommand(query.command.clone()))?;

        let value = match &query.value {
            Some(value) => value,
            None => {
                let names = entry.schema().option_names(false);
                if query.all {
                    let names = names.iter().map(|name| name[1..].to_owned()).collect();
                    return Ok(QueryResult::All(names));
                }

                let typed = format!("-{}", option);
                let matches = match_prefix(&typed, &names);
                let lcp = longest_extension(&typed, &matches, query.exact_space);
                return Ok(QueryResult::Match(lcp.unwrap_or_default()));
            }
        };

        let spec = entry.schema().option(option).ok_or_else(|| {
            CompletionError::UnknownOption(query.command.clone(), option.clone())
        })?;

        let values = self.values_for(&query.command, spec, &query.name_values);
        if query.all {
            return Ok(QueryResult::All(values));
        }

        let matches = match_prefix(value, &values);
        match longest_extension(value, &matches, query.exact_space) {
            Some(lcp) => Ok(QueryResult::Match(lcp)),
            None => Ok(QueryResult::All(values)),
        }
    }

    /// Completes the word under `cursor` (a byte offset into `line`).
    pub fn complete(&self, line: &str, cursor: usize) -> Completion {
        let mut cursor = cursor.min(line.len());
        while !line.is_char_boundary(cursor) {
            cursor -= 1;
        }

        let tokens = tokenize_with(line, self.registry);
        let (tokens, index, typed) = match tokens.iter().position(|t| t.contains(cursor)) {
            Some(index) => {
                let typed = tokens[index].value();
                (tokens, index, typed)
            }
            None => {
                // The cursor starts a new word: find out what kind of word.
                let probe = format!("{}{}{}", &line[..cursor], PROBE, &line[cursor..]);
                let mut tokens = tokenize_with(&probe, self.registry);
                let index = match tokens.iter().position(|t| t.start == cursor) {
                    Some(index) => index,
                    None => return Completion::Unchanged,
                };

                tokens[index].text.clear();
                tokens[index].end = cursor;
                (tokens, index, String::new())
            }
        };

        let token = &tokens[index];
        trace!(
            "complete: {:?} at {}: {:?} `{}'",
            line,
            cursor,
            token.kind,
            typed
        );

        let target = match token.kind {
            TokenKind::Command => Some(Target {
                candidates: self.registry.names(),
                exact_space: true,
            }),
            TokenKind::Option => self.option_target(&tokens, index),
            TokenKind::Value | TokenKind::Positional => self.value_target(&tokens, index, &typed),
        };

        match target {
            Some(target) => self.reduce(line, token, &typed, target),
            None => Completion::Unchanged,
        }
    }

    fn owner<'t>(&self, tokens: &'t [Token], index: usize) -> Option<&'t Token> {
        let invocation = tokens[index].invocation;
        tokens[..index]
            .iter()
            .rev()
            .find(|t| t.invocation == invocation && t.kind == TokenKind::Command)
    }

    fn option_target(&self, tokens: &[Token], index: usize) -> Option<Target> {
        let command = self.owner(tokens, index)?.value();
        let entry = self.registry.lookup(&command)?;
        Some(Target {
            candidates: entry.schema().option_names(false),
            exact_space: true,
        })
    }

    /// Every `-option value` pair of the invocation `tokens[index]` belongs
    /// to. Flags map to an empty value.
    fn name_values(&self, tokens: &[Token], index: usize, typed: &str) -> NameValues {
        let invocation = tokens[index].invocation;
        let mut name_values = NameValues::new();
        let mut last_option: Option<String> = None;
        let mut completed = None;
        for (i, token) in tokens.iter().enumerate() {
            if token.invocation != invocation {
                continue;
            }

            let value = if i == index { typed.to_owned() } else { token.value() };
            match token.kind {
                TokenKind::Option if value != "--" => {
                    let name = value[1..].to_owned();
                    name_values.insert(name.clone(), String::new());
                    last_option = Some(name);
                }
                TokenKind::Value => {
                    if let Some(name) = &last_option {
                        if i == index {
                            completed = Some(name.clone());
                        }

                        name_values.insert(name.clone(), value);
                    }
                }
                _ => {}
            }
        }

        // A repeated option later in the line must not hide the typed text.
        if let Some(name) = completed {
            name_values.insert(name, typed.to_owned());
        }

        name_values
    }

    fn value_target(&self, tokens: &[Token], index: usize, typed: &str) -> Option<Target> {
        let command = self.owner(tokens, index)?.value();
        let entry = self.registry.lookup(&command)?;
        let mut name_values = self.name_values(tokens, index, typed);

        let spec = if tokens[index].kind == TokenKind::Value {
            let invocation = tokens[index].invocation;
            let option = tokens[..index]
                .iter()
                .rev()
                .find(|t| t.invocation == invocation && t.kind == TokenKind::Option)?;
            entry.schema().option(&option.value()[1..])?
        } else {
            let spec = entry
                .schema()
                .positionals()
                .find(|arg| arg.value_type == ArgType::String)?;
            name_values.insert(spec.name.clone(), typed.to_owned());
            spec
        };

        trace!("complete: {} -{} {:?}", command, spec.name, name_values);
        Some(Target {
            candidates: self.values_for(&command, spec, &name_values),
            exact_space: !spec.path || self.session.config.path_exact_space,
        })
    }

    fn reduce(&self, line: &str, token: &Token, typed: &str, target: Target) -> Completion {
        let matches = match_prefix(typed, &target.candidates);
        if matches.is_empty() {
            return Completion::Unchanged;
        }

        let (lcp, exact) = longest_match(&matches);
        if !exact && lcp.len() <= typed.len() {
            return Completion::Candidates(matches);
        }

        let replacement = escape(&lcp, token.quote);
        let rest = &line[token.end..];
        let mut completed = format!("{}{}", &line[..token.start], replacement);
        let mut cursor = completed.len();

        // Spaces only end bare words; a quoted word ends with its quote.
        if exact && target.exact_space && token.quote == Quote::Bare {
            if !rest.starts_with(|ch: char| ch == ' ' || ch == '\t') {
                completed.push(' ');
            }

            cursor += 1;
        }

        completed.push_str(rest);
        if completed == line && cursor == token.end {
            return Completion::Unchanged;
        }

        debug!("complete: `{}' => `{}'", line, completed);
        Completion::Replaced {
            line: completed,
            cursor,
        }
    }
}
