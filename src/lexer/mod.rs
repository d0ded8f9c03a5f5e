//! Lexer: turns configuration text into a flat token stream.
//!
//! Split `types`/`lexer` the way the teacher splits `src/parser/lexer.rs`'s
//! `Token`/`TokenType` definitions from the scanning logic that produces them.

pub mod lexer;
pub mod types;

pub use lexer::{tokenize, Lexer, LexerConfig};
pub use types::{LexError, Quote, Separator, Token, TokenKind};
