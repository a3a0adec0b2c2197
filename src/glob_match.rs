//! Single-directory glob matching used by path completion.
use glob::{MatchOptions, Pattern};
use nix::unistd::{access, AccessFlags};
use std::fs::read_dir;
use std::path::Path;

/// `*` and `?` never cross `/`, and a leading dot must be matched literally
/// so that `*` does not pick up hidden files.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

/// Compiles a glob. An invalid pattern (e.g. an unclosed `[`) matches
/// itself literally.
pub fn compile(pattern: &str) -> Pattern {
    Pattern::new(pattern).unwrap_or_else(|err| {
        trace!("glob: `{}' is not a valid pattern ({}), matching literally", pattern, err);
        // An escaped pattern contains no special characters left to fail on.
        Pattern::new(&Pattern::escape(pattern)).unwrap_or_default()
    })
}

/// Returns true if `text` matches the shell glob `pattern`.
pub fn glob_matches(pattern: &str, text: &str) -> bool {
    compile(pattern).matches_with(text, MATCH_OPTIONS)
}

#[derive(Debug, Default)]
pub struct GlobMatcher {
    ignore_rules: Vec<Pattern>,
    only_exec: bool,
}

impl GlobMatcher {
    pub fn new() -> GlobMatcher {
        GlobMatcher::default()
    }

    /// Creates a matcher hiding every file name matching one of `rules`.
    pub fn with_ignore_rules<S: AsRef<str>>(rules: &[S]) -> GlobMatcher {
        let mut matcher = GlobMatcher::new();
        for rule in rules {
            matcher.add_ignore_rule(rule.as_ref());
        }

        matcher
    }

    pub fn add_ignore_rule(&mut self, rule: &str) {
        self.ignore_rules.push(compile(rule));
    }

    pub fn set_only_exec(&mut self, only_exec: bool) {
        self.only_exec = only_exec;
    }

    fn is_ignored(&self, name: &str) -> bool {
        self.ignore_rules
            .iter()
            .any(|rule| rule.matches_with(name, MATCH_OPTIONS))
    }

    /// Returns the names of the entries in `dir` matching `pattern`, sorted.
    ///
    /// `.` and `..` always match themselves, and a pattern naming an
    /// existing entry literally is returned as is (even if it is hidden or
    /// ignored). Never recurses.
    pub fn match_in_dir(&self, dir: &Path, pattern: &str) -> Vec<String> {
        if pattern.is_empty() {
            return Vec::new();
        }

        if pattern == "." || pattern == ".." {
            return vec![pattern.to_owned()];
        }

        if !pattern.contains('/') && dir.join(pattern).exists() {
            return vec![pattern.to_owned()];
        }

        let entries = match read_dir(dir) {
            Ok(entries) => entries,
            Err(err) => {
                trace!("glob: failed to read `{}': {}", dir.display(), err);
                return Vec::new();
            }
        };

        let glob = compile(pattern);
        let mut names = Vec::new();
        for entry in entries.flatten() {
            let name = match entry.file_name().into_string() {
                Ok(name) => name,
                // Non UTF-8 file names cannot be completed.
                Err(_) => continue,
            };

            if self.is_ignored(&name) {
                continue;
            }

            if self.only_exec && access(&entry.path(), AccessFlags::X_OK).is_err() {
                continue;
            }

            if glob.matches_with(&name, MATCH_OPTIONS) {
                names.push(name);
            }
        }

        names.sort();
        trace!("glob: `{}' in `{}': {:?}", pattern, dir.display(), names);
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs::{create_dir, File};
    use std::os::unix::fs::PermissionsExt;
    use tempfile::tempdir;

    fn touch(dir: &Path, name: &str) {
        File::create(dir.join(name)).unwrap();
    }

    #[test]
    fn case_sensitive_and_no_dot_files() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "a.png");
        touch(dir.path(), "b.PNG");
        touch(dir.path(), ".hidden.png");

        let matcher = GlobMatcher::new();
        assert_eq!(matcher.match_in_dir(dir.path(), "*.png"), vec!["a.png"]);
        assert_eq!(matcher.match_in_dir(dir.path(), ".*"), vec![".hidden.png"]);
    }

    #[test]
    fn wildcards() {
        let dir = tempdir().unwrap();
        for name in &["a1", "a2", "b1", "abc"] {
            touch(dir.path(), name);
        }

        let matcher = GlobMatcher::new();
        assert_eq!(matcher.match_in_dir(dir.path(), "a?"), vec!["a1", "a2"]);
        assert_eq!(matcher.match_in_dir(dir.path(), "[ab]1"), vec!["a1", "b1"]);
        assert_eq!(matcher.match_in_dir(dir.path(), "*c"), vec!["abc"]);
        assert_eq!(matcher.match_in_dir(dir.path(), "z*"), Vec::<String>::new());
    }

    #[test]
    fn dot_entries_and_literals() {
        let dir = tempdir().unwrap();
        touch(dir.path(), ".profile");

        let matcher = GlobMatcher::with_ignore_rules(&[".profile"]);
        assert_eq!(matcher.match_in_dir(dir.path(), "."), vec!["."]);
        assert_eq!(matcher.match_in_dir(dir.path(), ".."), vec![".."]);
        assert_eq!(matcher.match_in_dir(dir.path(), ".profile"), vec![".profile"]);
        assert_eq!(matcher.match_in_dir(dir.path(), ".prof*"), Vec::<String>::new());
        assert_eq!(matcher.match_in_dir(dir.path(), ""), Vec::<String>::new());
    }

    #[test]
    fn ignore_rules() {
        let dir = tempdir().unwrap();
        for name in &["main.c", "main.o", "notes~"] {
            touch(dir.path(), name);
        }

        let matcher = GlobMatcher::with_ignore_rules(&["*.o", "*~"]);
        assert_eq!(matcher.match_in_dir(dir.path(), "*"), vec!["main.c"]);
    }

    #[test]
    fn only_executables() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "run.sh");
        touch(dir.path(), "readme");
        let script = dir.path().join("run.sh");
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
        std::fs::set_permissions(
            &dir.path().join("readme"),
            std::fs::Permissions::from_mode(0o644),
        )
        .unwrap();

        let mut matcher = GlobMatcher::new();
        matcher.set_only_exec(true);
        assert_eq!(matcher.match_in_dir(dir.path(), "r*"), vec!["run.sh"]);
    }

    #[test]
    fn does_not_recurse() {
        let dir = tempdir().unwrap();
        create_dir(dir.path().join("sub")).unwrap();
        touch(&dir.path().join("sub"), "inner.txt");
        touch(dir.path(), "outer.txt");

        let matcher = GlobMatcher::new();
        assert_eq!(matcher.match_in_dir(dir.path(), "*.txt"), vec!["outer.txt"]);
    }

    #[test]
    fn invalid_pattern_matches_literally() {
        assert!(glob_matches("a[b", "a[b"));
        assert!(!glob_matches("a[b", "ab"));
        assert!(glob_matches("-w*", "-width"));
    }
}
