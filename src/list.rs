//! Tcl-style list values: `{a b} c "d e"`.
use pest::Parser;

#[derive(Parser)]
#[grammar = "list.pest"]
struct ListParser;

#[derive(Debug, Fail, PartialEq)]
#[fail(display = "malformed list: {}", _0)]
pub struct ListError(String);

pub(crate) fn unescape(s: &str) -> String {
    let mut unescaped = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => match chars.next() {
                Some('n') => unescaped.push('\n'),
                Some('t') => unescaped.push('\t'),
                Some(escaped) => unescaped.push(escaped),
                None => unescaped.push('\\'),
            },
            _ => unescaped.push(ch),
        }
    }

    unescaped
}

/// Splits `text` into its elements. Braced elements are taken literally;
/// backslash escapes are processed in quoted and bare ones.
pub fn split_list(text: &str) -> Result<Vec<String>, ListError> {
    let pairs = ListParser::parse(Rule::list, text).map_err(|err| ListError(err.to_string()))?;

    let mut items = Vec::new();
    for pair in pairs.flatten() {
        match pair.as_rule() {
            Rule::braced_body => items.push(pair.as_str().to_owned()),
            Rule::quoted_body | Rule::bare => items.push(unescape(pair.as_str())),
            _ => {}
        }
    }

    Ok(items)
}

fn needs_quoting(item: &str) -> bool {
    item.is_empty()
        || item
            .chars()
            .any(|ch| ch.is_whitespace() || ";{}\"\\".contains(ch))
}

fn braces_balanced(item: &str) -> bool {
    let mut depth = 0usize;
    for ch in item.chars() {
        match ch {
            '{' => depth += 1,
            '}' if depth == 0 => return false,
            '}' => depth -= 1,
            _ => {}
        }
    }

    depth == 0
}

/// Joins `items` into a list `split_list` turns back into the same items.
pub fn merge_list<S: AsRef<str>>(items: &[S]) -> String {
    let mut merged = Vec::with_capacity(items.len());
    for item in items {
        let item = item.as_ref();
        if !needs_quoting(item) {
            merged.push(item.to_owned());
        } else if braces_balanced(item) && !item.ends_with('\\') {
            merged.push(format!("{{{}}}", item));
        } else {
            let mut escaped = String::with_capacity(item.len() * 2);
            for ch in item.chars() {
                match ch {
                    '\n' => escaped.push_str("\\n"),
                    '\t' => escaped.push_str("\\t"),
                    _ if ch.is_whitespace() || ";{}\"\\".contains(ch) => {
                        escaped.push('\\');
                        escaped.push(ch);
                    }
                    _ => escaped.push(ch),
                }
            }

            merged.push(escaped);
        }
    }

    merged.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn elements() {
        assert_eq!(split_list(""), Ok(vec![]));
        assert_eq!(split_list("  a  b "), Ok(vec!["a".to_owned(), "b".to_owned()]));
        assert_eq!(
            split_list(r#"a {b c} "d e""#),
            Ok(vec!["a".to_owned(), "b c".to_owned(), "d e".to_owned()])
        );
        assert_eq!(split_list("x;y"), Ok(vec!["x".to_owned(), "y".to_owned()]));
        assert_eq!(split_list("{}"), Ok(vec!["".to_owned()]));
    }

    #[test]
    fn nesting_and_escapes() {
        assert_eq!(
            split_list("{a {b}} c"),
            Ok(vec!["a {b}".to_owned(), "c".to_owned()])
        );
        assert_eq!(split_list(r"a\ b"), Ok(vec!["a b".to_owned()]));
        assert_eq!(split_list(r#""say \"hi\"""#), Ok(vec![r#"say "hi""#.to_owned()]));
        assert_eq!(split_list("a{b"), Ok(vec!["a{b".to_owned()]));
    }

    #[test]
    fn malformed() {
        assert!(split_list("{a").is_err());
        assert!(split_list("\"a").is_err());
        assert!(split_list("{a}b").is_err());
    }

    #[test]
    fn merge() {
        assert_eq!(merge_list(&["a", "b c", ""]), "a {b c} {}");
        assert_eq!(merge_list(&["{"]), r"\{");

        let items = vec!["file".to_owned(), "my pic.png".to_owned(), "}{".to_owned()];
        assert_eq!(split_list(&merge_list(&items)), Ok(items));
    }
}
