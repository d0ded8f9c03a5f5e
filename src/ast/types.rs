//! AST Types
//!
//! Sum-typed AST node set, one tagged variant per node kind with explicit
//! fields, the same shape as the teacher's own `ast/types.rs` enum of shell
//! node kinds rather than a dynamically-typed node dictionary.

/// A parsed configuration document: an ordered sequence of statements.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Config {
    pub statements: Vec<Statement>,
}

impl Config {
    pub fn new(statements: Vec<Statement>) -> Self {
        Config { statements }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Option(OptionNode),
    Block(Block),
    Comment(Comment),
    Include(Include),
}

impl Statement {
    pub fn line(&self) -> usize {
        match self {
            Statement::Option(o) => o.line,
            Statement::Block(b) => b.line,
            Statement::Comment(c) => c.line,
            Statement::Include(i) => i.line,
        }
    }
}

/// How an opening tag was terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenKind {
    Plain,
    /// `<tag ... />` with required whitespace before `/>`.
    SelfClosing,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub tag: String,
    pub name: Option<String>,
    pub open_kind: OpenKind,
    pub children: Vec<Statement>,
    pub quoted: bool,
    pub line: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Separator {
    Whitespace,
    Equals,
    Colon,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OptionNode {
    pub name: String,
    pub value: OptionValue,
    pub separator: Separator,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    Bare(String),
    Quoted {
        single: bool,
        raw: String,
        /// Bare text directly following the closing quote, concatenated by
        /// the lexer into this one logical value.
        trailing: String,
    },
    Array(Vec<OptionValue>),
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentStyle {
    Hash,
    C,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub text: String,
    pub style: CommentStyle,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Include {
    pub path: String,
    pub apache: bool,
    pub optional: bool,
    pub line: usize,
}
