//! Lexer Types
//!
//! `Token`/`TokenKind` mirror the teacher's `Token`/`TokenType` split
//! (`src/parser/lexer.rs`): a flat tagged struct carrying the minimum the
//! parser needs, with kind-specific interpretation (quoting, array
//! splitting, escape processing) left to the parser/loader rather than
//! baked into the lexer.

use std::fmt;
use thiserror::Error;

/// Kind of a lexical token, per spec §3's Token data model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    OpenTag,
    CloseTag,
    OpenCloseTag,
    OptionName,
    OptionValue,
    HashComment,
    CComment,
    Include,
    ApacheInclude,
    ApacheIncludeOptional,
    HeredocBody,
    Newline,
    Eof,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenTag => "OPEN_TAG",
            Self::CloseTag => "CLOSE_TAG",
            Self::OpenCloseTag => "OPEN_CLOSE_TAG",
            Self::OptionName => "OPTION_NAME",
            Self::OptionValue => "OPTION_VALUE",
            Self::HashComment => "HASH_COMMENT",
            Self::CComment => "C_COMMENT",
            Self::Include => "INCLUDE",
            Self::ApacheInclude => "APACHE_INCLUDE",
            Self::ApacheIncludeOptional => "APACHE_INCLUDE_OPTIONAL",
            Self::HeredocBody => "HEREDOC_BODY",
            Self::Newline => "NEWLINE",
            Self::Eof => "EOF",
        }
    }
}

/// Name/value separator observed for an `OptionName` token. Carried for
/// diagnostics and dumper fidelity; materialization does not depend on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Separator {
    #[default]
    Whitespace,
    Equals,
    Colon,
}

/// Quoting style of a value-bearing token (`OptionValue` or an include
/// path), mirroring the AST's `OptionValue::Quoted{single|double}` split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Quote {
    #[default]
    Bare,
    Single,
    Double,
}

/// A single lexical token.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Raw lexeme, exactly as it appeared in the source (quotes, escapes,
    /// and array brackets are preserved verbatim; interpretation happens in
    /// the parser/loader). For `Quote::Double`/`Quote::Single` values this
    /// holds the content *between* the quotes; any bare text immediately
    /// following the closing quote is carried in `trailing`.
    pub lexeme: String,
    pub line: usize,
    /// Meaningful only for `OptionName` tokens.
    pub sep: Separator,
    /// Meaningful only for `OpenTag`/`OpenCloseTag` tokens: whether the tag
    /// payload was written quoted (`<"tag name">`).
    pub quoted: bool,
    /// Meaningful only for `OptionValue`/include-path tokens.
    pub quote: Quote,
    /// Bare text directly following a quoted value's closing quote, if any.
    pub trailing: String,
    /// Meaningful only for `OptionValue` tokens: value was written
    /// `[ ... ]` (spec's "array marker").
    pub is_array: bool,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, line: usize) -> Self {
        Token {
            kind,
            lexeme: lexeme.into(),
            line,
            sep: Separator::default(),
            quoted: false,
            quote: Quote::default(),
            trailing: String::new(),
            is_array: false,
        }
    }

    pub fn with_sep(mut self, sep: Separator) -> Self {
        self.sep = sep;
        self
    }

    pub fn with_quoted(mut self, quoted: bool) -> Self {
        self.quoted = quoted;
        self
    }

    pub fn with_quote(mut self, quote: Quote) -> Self {
        self.quote = quote;
        self
    }

    pub fn with_trailing(mut self, trailing: impl Into<String>) -> Self {
        self.trailing = trailing.into();
        self
    }

    pub fn with_array(mut self, is_array: bool) -> Self {
        self.is_array = is_array;
        self
    }
}

/// Failure to tokenize: unterminated quoted string, unterminated heredoc,
/// mismatched tag brackets, or an illegal character in a tag name.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    pub line: usize,
    pub description: String,
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.description)
    }
}

impl LexError {
    pub fn new(line: usize, description: impl Into<String>) -> Self {
        LexError {
            line,
            description: description.into(),
        }
    }
}
