//! Parses a command's argument vector against its [`ArgSchema`].
use phf::phf_map;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use crate::list::split_list;
use crate::schema::{ArgSchema, ArgType};

#[derive(Debug, Fail, PartialEq)]
pub enum ParseError {
    #[fail(display = "Invalid option '{}'", _0)]
    InvalidOption(String),
    #[fail(display = "Missing value for '-{}'", _0)]
    MissingValue(String),
    #[fail(display = "Invalid value '{}' for '-{}'", value, option)]
    InvalidValue { option: String, value: String },
    /// More than one member of a group was given. Holds the member names.
    #[fail(display = "Only one of {} allowed", _0)]
    GroupExclusivity(String),
    /// No member of a required group was given. Holds the member names.
    #[fail(display = "One of {} required", _0)]
    GroupRequirement(String),
}

static BOOL_WORDS: phf::Map<&'static str, bool> = phf_map! {
    "0" => false,
    "false" => false,
    "no" => false,
    "1" => true,
    "true" => true,
    "yes" => true,
};

/// `0|false|no` and `1|true|yes`, case-insensitively.
pub fn string_to_bool(s: &str) -> Option<bool> {
    BOOL_WORDS.get(s.to_lowercase().as_str()).cloned()
}

/// A bound option value.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    Int(i64),
    Real(f64),
    Str(String),
    StrList(Vec<String>),
    Bool(bool),
}

impl ArgValue {
    pub fn to_string_value(&self) -> String {
        match self {
            ArgValue::Int(i) => i.to_string(),
            ArgValue::Real(r) => r.to_string(),
            ArgValue::Str(s) => s.clone(),
            ArgValue::StrList(strs) => crate::list::merge_list(strs),
            ArgValue::Bool(true) => "1".to_owned(),
            ArgValue::Bool(false) => "0".to_owned(),
        }
    }
}

/// Successfully parsed options and the remaining positional arguments.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParseResult {
    values: BTreeMap<String, ArgValue>,
    args: Vec<String>,
    show_hidden: bool,
    help: Option<String>,
}

impl ParseResult {
    /// Returns true if the option `name` was given.
    pub fn has_parse_arg(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn value(&self, name: &str) -> Option<&ArgValue> {
        self.values.get(name)
    }

    pub fn get_int(&self, name: &str, default: i64) -> i64 {
        match self.values.get(name) {
            Some(ArgValue::Int(i)) => *i,
            _ => default,
        }
    }

    pub fn get_real(&self, name: &str, default: f64) -> f64 {
        match self.values.get(name) {
            Some(ArgValue::Real(r)) => *r,
            _ => default,
        }
    }

    /// The (first) string value of `name`.
    pub fn get_str(&self, name: &str, default: &str) -> String {
        match self.values.get(name) {
            Some(ArgValue::Str(s)) => s.clone(),
            Some(ArgValue::StrList(strs)) if !strs.is_empty() => strs[0].clone(),
            _ => default.to_owned(),
        }
    }

    pub fn get_strs(&self, name: &str) -> Vec<String> {
        match self.values.get(name) {
            Some(ArgValue::Str(s)) => vec![s.clone()],
            Some(ArgValue::StrList(strs)) => strs.clone(),
            _ => Vec::new(),
        }
    }

    pub fn get_bool(&self, name: &str, default: bool) -> bool {
        match self.values.get(name) {
            Some(ArgValue::Bool(b)) => *b,
            _ => default,
        }
    }

    /// Positional arguments in the order they were given.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// `-hidden` was given.
    pub fn show_hidden(&self) -> bool {
        self.show_hidden
    }

    /// The usage text, when `-help` was given in debug mode.
    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }
}

/// The outcome of a successful parse.
#[derive(Debug, Clone, PartialEq)]
pub enum Parsed {
    Args(ParseResult),
    /// `-help` was given (outside debug mode): holds the usage text.
    Help(String),
}

pub struct ArgumentParser<'a> {
    schema: &'a ArgSchema,
    debug: bool,
}

impl<'a> ArgumentParser<'a> {
    pub fn new(schema: &'a ArgSchema) -> ArgumentParser<'a> {
        ArgumentParser {
            schema,
            debug: false,
        }
    }

    /// In debug mode `-help` does not stop the parse and the parsed values
    /// are logged.
    pub fn debug(mut self, debug: bool) -> ArgumentParser<'a> {
        self.debug = debug;
        self
    }

    /// Parses `argv` (without the command name).
    pub fn parse<S: AsRef<str>>(&self, argv: &[S]) -> Result<Parsed, ParseError> {
        let mut values: BTreeMap<String, ArgValue> = BTreeMap::new();
        let mut args = Vec::new();
        let mut help = false;
        let mut show_hidden = false;
        let mut allow_options = true;

        let mut words = argv.iter().map(|arg| arg.as_ref());
        while let Some(word) = words.next() {
            if !allow_options || !word.starts_with('-') {
                args.push(word.to_owned());
                continue;
            }

            let opt = &word[1..];
            match opt {
                "help" => {
                    help = true;
                    continue;
                }
                "-" => {
                    allow_options = false;
                    continue;
                }
                "hidden" => show_hidden = true,
                _ => {}
            }

            let spec = match self.schema.option(opt) {
                Some(spec) => spec,
                None if opt == "hidden" => continue,
                None => return Err(ParseError::InvalidOption(opt.to_owned())),
            };

            let name = spec.name.clone();
            let mut next_value = || {
                words
                    .next()
                    .ok_or_else(|| ParseError::MissingValue(name.clone()))
            };

            let invalid = |value: &str| ParseError::InvalidValue {
                option: spec.name.clone(),
                value: value.to_owned(),
            };

            match spec.value_type {
                ArgType::Boolean => {
                    values.insert(spec.name.clone(), ArgValue::Bool(true));
                }
                ArgType::Integer => {
                    let value = next_value()?;
                    let i = value.trim().parse().map_err(|_| invalid(value))?;
                    values.insert(spec.name.clone(), ArgValue::Int(i));
                }
                ArgType::Real => {
                    let value = next_value()?;
                    let r = value.trim().parse().map_err(|_| invalid(value))?;
                    values.insert(spec.name.clone(), ArgValue::Real(r));
                }
                ArgType::String if spec.multiple => {
                    let value = next_value()?;
                    let items = split_list(value).map_err(|_| invalid(value))?;
                    match values
                        .entry(spec.name.clone())
                        .or_insert_with(|| ArgValue::StrList(Vec::new()))
                    {
                        ArgValue::StrList(strs) => strs.extend(items),
                        other => *other = ArgValue::StrList(items),
                    }
                }
                ArgType::String => {
                    let value = next_value()?.to_owned();
                    match values.entry(spec.name.clone()) {
                        Entry::Vacant(entry) => {
                            entry.insert(ArgValue::Str(value));
                        }
                        Entry::Occupied(mut entry) => {
                            // Repeated occurrences accumulate into a list.
                            let updated = match entry.get() {
                                ArgValue::Str(first) => ArgValue::StrList(vec![first.clone(), value]),
                                ArgValue::StrList(strs) => {
                                    let mut strs = strs.clone();
                                    strs.push(value);
                                    ArgValue::StrList(strs)
                                }
                                _ => ArgValue::Str(value),
                            };
                            entry.insert(updated);
                        }
                    }
                }
                ArgType::StringBool => {
                    let value = next_value()?;
                    let b = string_to_bool(value).ok_or_else(|| invalid(value))?;
                    values.insert(spec.name.clone(), ArgValue::Bool(b));
                }
                ArgType::None => {
                    warn!("{}: invalid type for '{}'", self.schema.name(), spec.name);
                }
            }
        }

        let mut usage = None;
        if help {
            let text = self.schema.usage(show_hidden, false);
            if !self.debug {
                return Ok(Parsed::Help(text));
            }

            usage = Some(text);
        }

        for group in self.schema.groups() {
            let given = self
                .schema
                .group_members(group.id)
                .filter(|member| values.contains_key(&member.name))
                .count();

            let names = self.schema.group_names(group.id).join(", ");
            if given == 0 && group.is_required() {
                return Err(ParseError::GroupRequirement(names));
            }

            if given > 1 {
                return Err(ParseError::GroupExclusivity(names));
            }
        }

        if self.debug {
            for (name, value) in &values {
                debug!("{}: {}={:?}", self.schema.name(), name, value);
            }

            for arg in &args {
                debug!("{}: arg {}", self.schema.name(), arg);
            }
        }

        Ok(Parsed::Args(ParseResult {
            values,
            args,
            show_hidden,
            help: usage,
        }))
    }
}
