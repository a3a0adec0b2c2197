//! Viewer commands. Each shows a file or an inline text; the result is what
//! would be displayed.
use std::fs;

use crate::args::ParseResult;
use crate::registry::{Command, ExecContext};
use crate::schema::{ArgSchema, ArgType, GroupKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Image,
    Svg,
    Html,
    Markdown,
    Text,
}

impl ViewKind {
    pub fn all() -> &'static [ViewKind] {
        &[
            ViewKind::Image,
            ViewKind::Svg,
            ViewKind::Html,
            ViewKind::Markdown,
            ViewKind::Text,
        ]
    }

    pub fn name(self) -> &'static str {
        match self {
            ViewKind::Image => "image",
            ViewKind::Svg => "svg",
            ViewKind::Html => "html",
            ViewKind::Markdown => "markdown",
            ViewKind::Text => "text",
        }
    }
}

pub struct View {
    kind: ViewKind,
}

impl View {
    pub fn new(kind: ViewKind) -> View {
        View { kind }
    }

    fn render(&self, content: String, source: &str, size: Option<(i64, i64)>) -> String {
        match self.kind {
            ViewKind::Image => match size {
                Some((width, height)) => format!("image: {} ({}x{})", source, width, height),
                None => format!("image: {}", source),
            },
            ViewKind::Html if !content.starts_with("<html>") => format!("<html>{}</html>", content),
            ViewKind::Svg | ViewKind::Html | ViewKind::Markdown | ViewKind::Text => content,
        }
    }
}

impl Command for View {
    fn name(&self) -> &str {
        self.kind.name()
    }

    fn add_args(&self, schema: &mut ArgSchema) {
        let source = schema.add_group(GroupKind::RequiredOneOf);
        schema
            .add_arg("-file", ArgType::String, "file", "file to show")
            .group(source)
            .path();
        schema
            .add_arg("-text", ArgType::String, "text", "inline contents to show")
            .group(source);
        schema.add_arg("-width", ArgType::Integer, "width", "width in pixels");
        schema.add_arg("-height", ArgType::Integer, "height", "height in pixels");
    }

    fn exec(&self, ctx: &mut ExecContext, args: &ParseResult) -> Result<String, failure::Error> {
        let size = if args.has_parse_arg("width") || args.has_parse_arg("height") {
            Some((args.get_int("width", -1), args.get_int("height", -1)))
        } else {
            None
        };

        if args.has_parse_arg("text") {
            let text = args.get_str("text", "");
            return Ok(self.render(text, "<text>", size));
        }

        let file = args.get_str("file", "");
        let path = match ctx.session.path_completer().expand_tilde(&file) {
            Some(expanded) => ctx.session.cwd.join(expanded),
            None => ctx.session.cwd.join(&file),
        };
        let content = match self.kind {
            ViewKind::Image => {
                if !path.is_file() {
                    bail!("no such image: `{}'", file);
                }

                String::new()
            }
            _ => fs::read_to_string(&path).map_err(|err| format_err!("{}: `{}'", err, file))?,
        };

        Ok(self.render(content, &file, size))
    }
}

#[cfg(test)]
mod tests {
    use crate::completion::Completion;
    use crate::config::Config;
    use crate::frame::{Frame, Output};
    use pretty_assertions::assert_eq;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn sources_and_sizes() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join("cat.png")).unwrap();
        File::create(dir.path().join("notes.md"))
            .unwrap()
            .write_all(b"# Notes\n")
            .unwrap();

        let mut frame = Frame::new(Config::default(), dir.path().to_owned());
        assert_eq!(
            frame.process_line("image -file cat.png -width 10 -height 20"),
            vec![Output::Text("image: cat.png (10x20)".to_owned())]
        );
        assert!(frame.process_line("image -file dog.png")[0].is_error());
        assert_eq!(
            frame.process_line("markdown -file notes.md"),
            vec![Output::Text("# Notes\n".to_owned())]
        );
        assert_eq!(
            frame.process_line("html -text {<b>hi</b>}"),
            vec![Output::Html("<html><b>hi</b></html>".to_owned())]
        );
        assert_eq!(
            frame.process_line("svg -text {<svg></svg>}"),
            vec![Output::Svg("<svg></svg>".to_owned())]
        );
        assert_eq!(
            frame.process_line("text -text a -file notes.md"),
            vec![Output::Error("text: Only one of file, text allowed".to_owned())]
        );
    }

    #[test]
    fn file_completion() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join("cat.png")).unwrap();
        File::create(dir.path().join("cow.png")).unwrap();

        let frame = Frame::new(Config::default(), dir.path().to_owned());
        assert_eq!(
            frame.complete("image -file c", 13),
            Completion::Candidates(vec!["cat.png".to_owned(), "cow.png".to_owned()])
        );
        assert_eq!(
            frame.complete("image -file ca", 14),
            Completion::Replaced {
                line: "image -file cat.png".to_owned(),
                cursor: 19
            }
        );
    }

    #[test]
    fn completed_home_paths_can_be_shown() {
        let home = tempdir().unwrap();
        let home_path = home.path().canonicalize().unwrap();
        File::create(home_path.join("cat.png")).unwrap();
        let cwd = tempdir().unwrap();

        let mut frame = Frame::new(Config::default(), cwd.path().to_owned());
        frame.session_mut().home = Some(home_path);

        let line = match frame.complete("image -file ~/ca", 16) {
            Completion::Replaced { line, .. } => line,
            other => panic!("unexpected completion: {:?}", other),
        };
        assert_eq!(line, "image -file ~/cat.png");
        assert_eq!(
            frame.process_line(&line),
            vec![Output::Text("image: ~/cat.png".to_owned())]
        );
    }
}
