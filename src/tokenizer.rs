//! A tolerant tokenizer for partially typed command lines. In contrast to a
//! real interpreter it never fails: unterminated braces, quotes and brackets
//! simply end the last word, which is what completion needs.
use crate::list::unescape;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum TokenKind {
    /// The first word of a command invocation.
    Command,
    /// A word starting with `-` which is not consumed as a value.
    Option,
    /// The word following an option which takes a value.
    Value,
    Positional,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Quote {
    Bare,
    /// `{...}`
    Brace,
    /// `"..."`
    Double,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Token {
    pub kind: TokenKind,
    /// The source text between the delimiters: `text == line[start..end]`.
    pub text: String,
    pub start: usize,
    pub end: usize,
    pub quote: Quote,
    /// Tokens of the same command invocation share this number.
    pub invocation: usize,
}

impl Token {
    /// The word with quoting removed.
    pub fn value(&self) -> String {
        match self.quote {
            Quote::Brace => self.text.clone(),
            Quote::Bare | Quote::Double => unescape(&self.text),
        }
    }

    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset <= self.end
    }
}

/// Tells the tokenizer whether an option consumes the following word.
pub trait OptionArity {
    /// `None` if the command or option is unknown.
    fn takes_value(&self, command: &str, option: &str) -> Option<bool>;
}

/// Assumes every option takes a value.
pub struct UnknownArity;

impl OptionArity for UnknownArity {
    fn takes_value(&self, _command: &str, _option: &str) -> Option<bool> {
        None
    }
}

fn is_blank(ch: char) -> bool {
    " \t\r".contains(ch)
}

struct Tokenizer<'a> {
    input: &'a str,
    index: usize,
    arity: &'a dyn OptionArity,
    /// Treat `[...]` as a nested command.
    brackets: bool,
    tokens: Vec<Token>,
    invocations: usize,
    complete: bool,
}

impl<'a> Tokenizer<'a> {
    fn new(input: &'a str, arity: &'a dyn OptionArity, brackets: bool) -> Tokenizer<'a> {
        Tokenizer {
            input,
            index: 0,
            arity,
            brackets,
            tokens: Vec::new(),
            invocations: 0,
            complete: true,
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.index..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.index += ch.len_utf8();
        Some(ch)
    }

    fn new_invocation(&mut self) -> usize {
        self.invocations += 1;
        self.invocations - 1
    }

    fn skip_blanks(&mut self) {
        loop {
            match self.peek() {
                Some(ch) if is_blank(ch) => self.index += 1,
                // A backslash-newline continues the command on the next line.
                Some('\\') if self.input[self.index + 1..].starts_with('\n') => self.index += 2,
                _ => break,
            }
        }
    }

    /// Consumes a word and returns its quoting and content range.
    fn word(&mut self, in_bracket: bool) -> (Quote, usize, usize) {
        match self.peek() {
            Some('{') => {
                self.index += 1;
                let start = self.index;
                let mut depth = 1;
                loop {
                    match self.bump() {
                        None => {
                            self.complete = false;
                            return (Quote::Brace, start, self.index);
                        }
                        Some('\\') => {
                            self.bump();
                        }
                        Some('{') => depth += 1,
                        Some('}') => {
                            depth -= 1;
                            if depth == 0 {
                                return (Quote::Brace, start, self.index - 1);
                            }
                        }
                        Some(_) => {}
                    }
                }
            }
            Some('"') => {
                self.index += 1;
                let start = self.index;
                loop {
                    match self.bump() {
                        None => {
                            self.complete = false;
                            return (Quote::Double, start, self.index);
                        }
                        Some('\\') => {
                            self.bump();
                        }
                        Some('"') => return (Quote::Double, start, self.index - 1),
                        Some(_) => {}
                    }
                }
            }
            _ => {
                let start = self.index;
                loop {
                    match self.peek() {
                        None => break,
                        Some(ch) if is_blank(ch) || ch == '\n' || ch == ';' => break,
                        Some(']') if in_bracket => break,
                        Some('\\') => {
                            self.index += 1;
                            if self.bump().is_none() {
                                // A trailing backslash continues on the next line.
                                self.complete = false;
                            }
                        }
                        Some(_) => {
                            self.bump();
                        }
                    }
                }

                (Quote::Bare, start, self.index)
            }
        }
    }

    fn invocation(&mut self, in_bracket: bool) {
        let mut id = self.new_invocation();
        let mut command: Option<String> = None;
        let mut awaiting_value = false;
        let mut options_done = false;

        loop {
            self.skip_blanks();
            let ch = match self.peek() {
                Some(ch) => ch,
                None => {
                    if in_bracket {
                        self.complete = false;
                    }

                    return;
                }
            };

            match ch {
                '\n' | ';' => {
                    self.index += 1;
                    if command.is_some() {
                        id = self.new_invocation();
                        command = None;
                        awaiting_value = false;
                        options_done = false;
                    }

                    continue;
                }
                ']' if in_bracket => {
                    self.index += 1;
                    return;
                }
                '#' if command.is_none() => {
                    while let Some(ch) = self.peek() {
                        if ch == '\n' {
                            break;
                        }

                        self.bump();
                    }

                    continue;
                }
                '[' if self.brackets => {
                    self.index += 1;
                    self.invocation(true);

                    // The substitution fills the slot of a word.
                    if command.is_none() {
                        command = Some(String::new());
                    }

                    awaiting_value = false;
                    continue;
                }
                _ => {}
            }

            let (quote, start, end) = self.word(in_bracket);
            let text = self.input[start..end].to_owned();
            let kind = match &command {
                None => {
                    command = Some(text.clone());
                    TokenKind::Command
                }
                Some(_) if awaiting_value => {
                    awaiting_value = false;
                    TokenKind::Value
                }
                Some(name) if !options_done && text.starts_with('-') => {
                    if text == "--" {
                        options_done = true;
                    } else {
                        awaiting_value = self
                            .arity
                            .takes_value(name, &text[1..])
                            .unwrap_or(true);
                    }

                    TokenKind::Option
                }
                Some(_) => TokenKind::Positional,
            };

            self.tokens.push(Token {
                kind,
                text,
                start,
                end,
                quote,
                invocation: id,
            });
        }
    }
}

/// Tokenizes `line` assuming every option takes a value.
pub fn tokenize(line: &str) -> Vec<Token> {
    tokenize_with(line, &UnknownArity)
}

/// Tokenizes `line`, asking `arity` which options consume the next word.
pub fn tokenize_with(line: &str, arity: &dyn OptionArity) -> Vec<Token> {
    let mut tokenizer = Tokenizer::new(line, arity, true);
    tokenizer.invocation(false);
    trace!("tokenize: {:?} => {:?}", line, tokenizer.tokens);
    tokenizer.tokens
}

/// Returns the token whose span contains `offset`, or `None` if `offset`
/// lies between tokens.
pub fn token_for_pos(tokens: &[Token], offset: usize) -> Option<&Token> {
    tokens.iter().find(|token| token.contains(offset))
}

/// Returns false while a brace, quote or bracket is open or the line ends
/// with a backslash continuation.
pub fn is_complete_line(line: &str) -> bool {
    let mut tokenizer = Tokenizer::new(line, &UnknownArity, true);
    tokenizer.invocation(false);
    tokenizer.complete && !line.ends_with("\\\n")
}

/// Splits `line` into commands and their unquoted words. Brackets are not
/// substituted.
pub fn split_commands(line: &str) -> Vec<Vec<String>> {
    let mut tokenizer = Tokenizer::new(line, &UnknownArity, false);
    tokenizer.invocation(false);

    let mut commands: Vec<Vec<String>> = Vec::new();
    let mut current = None;
    for token in &tokenizer.tokens {
        if current != Some(token.invocation) {
            current = Some(token.invocation);
            commands.push(Vec::new());
        }

        if let Some(words) = commands.last_mut() {
            words.push(token.value());
        }
    }

    commands
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(tokens: &[Token]) -> Vec<(TokenKind, &str, usize)> {
        tokens
            .iter()
            .map(|t| (t.kind, t.text.as_str(), t.invocation))
            .collect()
    }

    #[test]
    fn classification() {
        let tokens = tokenize("image -width 10 -file a.png extra");
        assert_eq!(
            kinds(&tokens),
            vec![
                (TokenKind::Command, "image", 0),
                (TokenKind::Option, "-width", 0),
                (TokenKind::Value, "10", 0),
                (TokenKind::Option, "-file", 0),
                (TokenKind::Value, "a.png", 0),
                (TokenKind::Positional, "extra", 0),
            ]
        );
        assert_eq!((tokens[1].start, tokens[1].end), (6, 12));
        assert_eq!((tokens[5].start, tokens[5].end), (28, 33));
    }

    #[test]
    fn cursor_lookup() {
        let tokens = tokenize("image -wi");
        assert_eq!(token_for_pos(&tokens, 9).map(|t| t.text.as_str()), Some("-wi"));
        assert_eq!(token_for_pos(&tokens, 6).map(|t| t.text.as_str()), Some("-wi"));
        assert_eq!(token_for_pos(&tokens, 2).map(|t| t.kind), Some(TokenKind::Command));

        let tokens = tokenize("image  -wi");
        assert_eq!(token_for_pos(&tokens, 6), None);
    }

    #[test]
    fn several_commands() {
        let tokens = tokenize("echo a; image -f\nhistory");
        assert_eq!(
            kinds(&tokens),
            vec![
                (TokenKind::Command, "echo", 0),
                (TokenKind::Positional, "a", 0),
                (TokenKind::Command, "image", 1),
                (TokenKind::Option, "-f", 1),
                (TokenKind::Command, "history", 2),
            ]
        );
    }

    #[test]
    fn nested_commands() {
        let tokens = tokenize("echo [image -file x] y");
        assert_eq!(
            kinds(&tokens),
            vec![
                (TokenKind::Command, "echo", 0),
                (TokenKind::Command, "image", 1),
                (TokenKind::Option, "-file", 1),
                (TokenKind::Value, "x", 1),
                (TokenKind::Positional, "y", 0),
            ]
        );
    }

    #[test]
    fn unterminated_input() {
        let tokens = tokenize("image -file {my pic");
        assert_eq!(tokens[2].text, "my pic");
        assert_eq!(tokens[2].kind, TokenKind::Value);
        assert_eq!((tokens[2].start, tokens[2].end), (13, 19));

        let tokens = tokenize("echo \"abc");
        assert_eq!(tokens[1].text, "abc");
        assert_eq!(tokens[1].quote, Quote::Double);

        assert!(!is_complete_line("image -file {my pic"));
        assert!(!is_complete_line("echo \"abc"));
        assert!(!is_complete_line("echo [image"));
        assert!(!is_complete_line("echo a \\"));
        assert!(is_complete_line("echo {a {b}} \"c\""));
        assert!(is_complete_line(""));
    }

    #[test]
    fn continuation_lines() {
        let line = "set_data -name x \\\n  -value y";
        assert!(is_complete_line(line));
        assert_eq!(
            kinds(&tokenize(line)),
            vec![
                (TokenKind::Command, "set_data", 0),
                (TokenKind::Option, "-name", 0),
                (TokenKind::Value, "x", 0),
                (TokenKind::Option, "-value", 0),
                (TokenKind::Value, "y", 0),
            ]
        );
    }

    #[test]
    fn arity_decides_values() {
        struct Flags;
        impl OptionArity for Flags {
            fn takes_value(&self, _command: &str, option: &str) -> Option<bool> {
                Some(option != "smooth")
            }
        }

        let tokens = tokenize_with("image -smooth a.png -- -x", &Flags);
        assert_eq!(
            tokens.iter().map(|t| t.kind).collect::<Vec<_>>(),
            vec![
                TokenKind::Command,
                TokenKind::Option,
                TokenKind::Positional,
                TokenKind::Option,
                TokenKind::Positional,
            ]
        );
    }

    #[test]
    fn comments_and_words() {
        let tokens = tokenize("# note\necho hi");
        assert_eq!(tokens[0].kind, TokenKind::Command);
        assert_eq!(tokens[0].text, "echo");

        assert_eq!(
            split_commands("echo {a b} \"c\\\"d\"; history\n[x y]"),
            vec![
                vec!["echo".to_owned(), "a b".to_owned(), "c\"d".to_owned()],
                vec!["history".to_owned()],
                vec!["[x".to_owned(), "y]".to_owned()],
            ]
        );
    }
}
