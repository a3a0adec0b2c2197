//! Multi-segment path pattern expansion (`src/*/mod.?s`, `~/Doc*`).
use nix::unistd::User;
use std::path::{Path, PathBuf};

use crate::common::strings::longest_common_prefix;
use crate::glob_match::GlobMatcher;

pub struct PathCompleter {
    matcher: GlobMatcher,
    /// The directory relative patterns are resolved against.
    base: PathBuf,
    home: Option<PathBuf>,
}

impl PathCompleter {
    pub fn new(matcher: GlobMatcher, base: &Path) -> PathCompleter {
        PathCompleter {
            matcher,
            base: base.to_owned(),
            home: dirs::home_dir(),
        }
    }

    pub fn with_home(mut self, home: Option<PathBuf>) -> PathCompleter {
        self.home = home;
        self
    }

    /// Expands `~` and `~user` at the beginning of `path`. Returns `None` if
    /// `path` does not start with a tilde or the user is unknown.
    pub fn expand_tilde(&self, path: &str) -> Option<String> {
        if !path.starts_with('~') {
            return None;
        }

        let (user, rest) = match path.find('/') {
            Some(slash) => (&path[1..slash], &path[slash..]),
            None => (&path[1..], ""),
        };

        let home = if user.is_empty() {
            self.home.clone()?
        } else {
            match User::from_name(user) {
                Ok(Some(user)) => user.dir,
                _ => return None,
            }
        };

        Some(format!("{}{}", home.to_str()?, rest))
    }

    /// Rewrites an absolute path under the home directory into its `~/...`
    /// form.
    pub fn collapse_tilde(&self, path: &str) -> Option<String> {
        let home = self.home.as_ref()?.to_str()?.trim_end_matches('/');
        if home.is_empty() {
            return None;
        }

        if path == home {
            Some("~".to_owned())
        } else if path.starts_with(home) && path[home.len()..].starts_with('/') {
            Some(format!("~{}", &path[home.len()..]))
        } else {
            None
        }
    }

    fn resolve(&self, prefix: &str) -> PathBuf {
        if prefix.is_empty() {
            self.base.clone()
        } else {
            // `join` keeps absolute prefixes as they are.
            self.base.join(prefix)
        }
    }

    /// Globs every `/`-separated segment of `pattern` against the
    /// directories matched by the segments before it. Returns `None` if the
    /// pattern has no segments at all.
    pub fn match_pattern(&self, pattern: &str) -> Option<Vec<String>> {
        let expanded = self
            .expand_tilde(pattern)
            .unwrap_or_else(|| pattern.to_owned());

        let segments: Vec<&str> = expanded.split('/').filter(|s| !s.is_empty()).collect();
        if segments.is_empty() {
            return None;
        }

        let mut frontier = vec![if expanded.starts_with('/') {
            "/".to_owned()
        } else {
            String::new()
        }];

        for segment in segments {
            let mut next = Vec::new();
            for prefix in &frontier {
                let dir = self.resolve(prefix);
                if !prefix.is_empty() && !dir.is_dir() {
                    continue;
                }

                for name in self.matcher.match_in_dir(&dir, segment) {
                    let mut path = prefix.clone();
                    if !path.is_empty() && !path.ends_with('/') {
                        path.push('/');
                    }

                    path += &name;
                    next.push(path);
                }
            }

            frontier = next;
        }

        let files = frontier
            .into_iter()
            .map(|file| self.collapse_tilde(&file).unwrap_or(file))
            .collect::<Vec<_>>();

        trace!("path: `{}' => {:?}", pattern, files);
        Some(files)
    }

    /// All paths matching `pattern`; empty when nothing matches.
    pub fn expand(&self, pattern: &str) -> Vec<String> {
        self.match_pattern(pattern).unwrap_or_default()
    }

    /// All paths starting with `prefix`.
    pub fn match_prefix(&self, prefix: &str) -> Option<Vec<String>> {
        self.match_pattern(&format!("{}*", prefix))
    }

    /// The longest common prefix of the paths matching `pattern`, or
    /// `pattern` itself when nothing matches.
    pub fn most_match_pattern(&self, pattern: &str) -> String {
        match self.match_pattern(pattern) {
            Some(files) if !files.is_empty() => longest_common_prefix(&files),
            _ => pattern.to_owned(),
        }
    }

    pub fn most_match_prefix(&self, prefix: &str) -> String {
        match self.match_prefix(prefix) {
            Some(files) if !files.is_empty() => longest_common_prefix(&files),
            _ => prefix.to_owned(),
        }
    }
}
