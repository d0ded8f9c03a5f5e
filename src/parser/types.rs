//! Parser Types
//!
//! `ParseError` follows the teacher's `ParseException` pattern
//! (`with_token`-style constructor capturing the offending token's text, a
//! `Display` impl, and `thiserror::Error` derive) adapted to the simpler
//! grammar here, which needs `expected`/`found` strings rather than a full
//! token capture.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub line: usize,
    pub expected: String,
    pub found: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: expected {}, found {}", self.line, self.expected, self.found)
    }
}

impl ParseError {
    pub fn new(line: usize, expected: impl Into<String>, found: impl Into<String>) -> Self {
        ParseError {
            line,
            expected: expected.into(),
            found: found.into(),
        }
    }
}
