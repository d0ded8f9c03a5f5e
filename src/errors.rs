//! Error Taxonomy
//!
//! One closed set of failure modes for the whole crate: lexing, parsing,
//! include resolution, and the loader's semantic checks. Each constituent
//! error type is defined where it is produced; this module only unifies them
//! behind a single `Result` alias so callers of `load`/`loads` never need to
//! match on more than one type.

use std::fmt;
use thiserror::Error;

use crate::lexer::types::LexError;
use crate::parser::types::ParseError;
use crate::reader::types::ReaderError;

/// Top-level crate error.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("cannot read include '{path}': {source}")]
    IncludeIo {
        path: String,
        #[source]
        source: ReaderError,
    },

    #[error("{0}")]
    Include(IncludeError),

    #[error("duplicate key '{key}' in '{source_id}' at line {line}")]
    DuplicateKey {
        key: String,
        source_id: String,
        line: usize,
    },

    #[error("undefined variable '{name}' in '{source_id}' at line {line}")]
    UndefinedVariable {
        name: String,
        source_id: String,
        line: usize,
    },

    #[error("invalid option combination: {0}")]
    Options(String),
}

/// Failure to resolve or load an `Include`/`IncludeOptional` directive that
/// is not a plain I/O error (e.g. a non-optional include with zero glob
/// matches, or a nested parse error reported with the including file's
/// context).
#[derive(Debug, Clone)]
pub struct IncludeError {
    pub source_id: String,
    pub line: Option<usize>,
    pub message: String,
}

impl fmt::Display for IncludeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "include error in '{}' at line {}: {}", self.source_id, line, self.message),
            None => write!(f, "include error in '{}': {}", self.source_id, self.message),
        }
    }
}

impl Error {
    pub fn include(source_id: impl Into<String>, line: Option<usize>, message: impl Into<String>) -> Self {
        Error::Include(IncludeError {
            source_id: source_id.into(),
            line,
            message: message.into(),
        })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
