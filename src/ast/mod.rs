//! Abstract syntax tree produced by the parser from a lexed token stream.
//!
//! Architecture: Reader -> Lexer -> Parser -> AST -> Loader -> Value tree.

pub mod types;

pub use types::{
    Block, Comment, CommentStyle, Config, Include, OpenKind, OptionNode, OptionValue, Separator,
    Statement,
};
