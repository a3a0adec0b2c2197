use log::LevelFilter;
use std::env;

use crate::common::logger::parse_level;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// The prompt printed before each input line.
    pub prompt: String,

    /// The capacity of the in-memory history ring.
    pub history_size: usize,

    /// Glob rules hiding matching file names from path completion.
    pub ignore_patterns: Vec<String>,

    /// Append a space after an unambiguous path completion.
    pub path_exact_space: bool,

    /// Parser debug mode: `-help` prints the usage but keeps parsing, and
    /// parsed values are dumped to the log.
    pub debug: bool,

    /// `None` means the build-dependent default.
    pub log_level: Option<LevelFilter>,
}

fn default_prompt() -> String {
    "> ".to_owned()
}

fn default_history_size() -> usize {
    100
}

fn default_ignore_patterns() -> Vec<String> {
    Vec::new()
}

impl Default for Config {
    fn default() -> Config {
        Config {
            prompt: default_prompt(),
            history_size: default_history_size(),
            ignore_patterns: default_ignore_patterns(),
            path_exact_space: false,
            debug: false,
            log_level: None,
        }
    }
}

impl Config {
    /// Defaults overridden by `DFRAME_*` environment variables.
    pub fn from_env() -> Config {
        Config::from_vars(|name| env::var(name).ok())
    }

    pub fn from_vars<F>(var: F) -> Config
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(prompt) = var("DFRAME_PROMPT") {
            config.prompt = prompt;
        }

        if let Some(size) = var("DFRAME_HISTSIZE") {
            match size.trim().parse() {
                Ok(size) => config.history_size = size,
                Err(_) => warn!("ignoring invalid DFRAME_HISTSIZE: `{}'", size),
            }
        }

        if let Some(rules) = var("DFRAME_IGNORE") {
            config.ignore_patterns = rules
                .split(':')
                .filter(|rule| !rule.is_empty())
                .map(|rule| rule.to_owned())
                .collect();
        }

        if let Some(level) = var("DFRAME_LOG") {
            config.log_level = parse_level(&level);
        }

        if let Some(flag) = var("DFRAME_PATH_SPACE") {
            config.path_exact_space = crate::args::string_to_bool(&flag).unwrap_or(false);
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    #[test]
    fn defaults_without_vars() {
        assert_eq!(Config::from_vars(|_| None), Config::default());
    }

    #[test]
    fn vars_override_defaults() {
        let mut vars = HashMap::new();
        vars.insert("DFRAME_PROMPT", "$ ");
        vars.insert("DFRAME_HISTSIZE", "5");
        vars.insert("DFRAME_IGNORE", "*.o::*~");
        vars.insert("DFRAME_LOG", "debug");
        vars.insert("DFRAME_PATH_SPACE", "yes");

        let config = Config::from_vars(|name| vars.get(name).map(|v| v.to_string()));
        assert_eq!(
            config,
            Config {
                prompt: "$ ".to_owned(),
                history_size: 5,
                ignore_patterns: vec!["*.o".to_owned(), "*~".to_owned()],
                path_exact_space: true,
                debug: false,
                log_level: Some(LevelFilter::Debug),
            }
        );
    }

    #[test]
    fn invalid_histsize_is_ignored() {
        let config = Config::from_vars(|name| match name {
            "DFRAME_HISTSIZE" => Some("many".to_owned()),
            _ => None,
        });
        assert_eq!(config.history_size, 100);
    }
}
