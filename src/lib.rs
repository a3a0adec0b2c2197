//! The core of a data-frame style REPL: declarative command schemas, an
//! argument parser, a tolerant line tokenizer and an interactive completion
//! engine, plus the glob-based path matcher the completion relies on.
#[macro_use]
extern crate log;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate failure;
#[macro_use]
extern crate pest_derive;

#[macro_use]
pub mod macros;

pub mod args;
pub mod builtins;
pub mod completion;
pub mod config;
pub mod common;
pub mod frame;
pub mod glob_match;
pub mod history;
pub mod list;
pub mod path_complete;
pub mod registry;
pub mod schema;
pub mod tokenizer;
pub mod unix;

pub use args::{ArgValue, ArgumentParser, ParseError, ParseResult, Parsed};
pub use completion::{Completion, CompletionEngine, CompletionError, CompletionQuery, QueryResult};
pub use frame::{CommandError, Frame, Output, Session};
pub use glob_match::GlobMatcher;
pub use path_complete::PathCompleter;
pub use registry::{Command, CommandRegistry, ExecContext};
pub use schema::{ArgGroup, ArgSchema, ArgSpec, ArgType, GroupId, GroupKind};
pub use tokenizer::{OptionArity, Quote, Token, TokenKind};
