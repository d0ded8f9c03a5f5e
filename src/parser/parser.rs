//! Recursive-descent parser
//!
//! Token vector plus a `pos` cursor with `peek`/`advance`/`check` helpers, the
//! same shape as `src/commands/query_engine/parser.rs`'s `Parser` struct in
//! the teacher, rebuilt here over the configuration grammar:
//!
//! ```text
//! config     := (statement NEWLINE*)*
//! statement  := option | block | self_block | comment | include
//! block      := OPEN_TAG config CLOSE_TAG
//! self_block := OPEN_CLOSE_TAG
//! option     := OPTION_NAME (OPTION_VALUE | epsilon)
//! include    := INCLUDE | APACHE_INCLUDE | APACHE_INCLUDE_OPTIONAL
//! ```

use crate::ast::types::{
    Block, Comment, CommentStyle, Config, Include, OpenKind, OptionNode, OptionValue, Separator,
    Statement,
};
use crate::lexer::types::{Quote, Separator as LexSeparator, Token, TokenKind};

use super::types::ParseError;

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    namedblocks: bool,
}

impl Parser {
    pub fn new(tokens: Vec<Token>, namedblocks: bool) -> Self {
        Parser { tokens, pos: 0, namedblocks }
    }

    pub fn parse(&mut self) -> Result<Config, ParseError> {
        let config = self.parse_config(None)?;
        self.expect_eof()?;
        Ok(config)
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn kind(&self) -> TokenKind {
        self.peek().kind
    }

    fn line(&self) -> usize {
        self.peek().line
    }

    fn advance(&mut self) -> Token {
        let tok = self.tokens[self.pos.min(self.tokens.len() - 1)].clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        tok
    }

    fn skip_newlines(&mut self) {
        while self.kind() == TokenKind::Newline {
            self.advance();
        }
    }

    fn expect_eof(&mut self) -> Result<(), ParseError> {
        self.skip_newlines();
        if self.kind() != TokenKind::Eof {
            return Err(ParseError::new(self.line(), "end of input", self.kind().as_str()));
        }
        Ok(())
    }

    /// Parses statements until EOF, or until a `</tag>` closing the block
    /// named by `open_tag` (passed by the caller that opened it).
    fn parse_config(&mut self, closing_for: Option<&str>) -> Result<Config, ParseError> {
        let mut statements = Vec::new();
        loop {
            self.skip_newlines();
            match self.kind() {
                TokenKind::Eof => {
                    if closing_for.is_some() {
                        return Err(ParseError::new(self.line(), "</tag>", "end of input"));
                    }
                    break;
                }
                TokenKind::CloseTag => {
                    if closing_for.is_some() {
                        break;
                    }
                    return Err(ParseError::new(self.line(), "statement", "unmatched </tag>"));
                }
                _ => {
                    statements.push(self.parse_statement()?);
                }
            }
        }
        Ok(Config::new(statements))
    }

    fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        match self.kind() {
            TokenKind::HashComment => Ok(Statement::Comment(self.parse_comment(CommentStyle::Hash))),
            TokenKind::CComment => Ok(Statement::Comment(self.parse_comment(CommentStyle::C))),
            TokenKind::OpenTag => Ok(Statement::Block(self.parse_block()?)),
            TokenKind::OpenCloseTag => Ok(Statement::Block(self.parse_self_block())),
            TokenKind::OptionName => Ok(Statement::Option(self.parse_option())),
            TokenKind::Include | TokenKind::ApacheInclude | TokenKind::ApacheIncludeOptional => {
                Ok(Statement::Include(self.parse_include()))
            }
            other => Err(ParseError::new(self.line(), "statement", other.as_str())),
        }
    }

    fn parse_comment(&mut self, style: CommentStyle) -> Comment {
        let tok = self.advance();
        Comment { text: tok.lexeme, style, line: tok.line }
    }

    fn split_tag(&self, raw: &str) -> (String, Option<String>) {
        if !self.namedblocks {
            return (raw.to_string(), None);
        }
        match raw.split_once(char::is_whitespace) {
            Some((tag, rest)) => {
                let name = rest.trim();
                if name.is_empty() {
                    (tag.to_string(), None)
                } else {
                    (tag.to_string(), Some(name.to_string()))
                }
            }
            None => (raw.to_string(), None),
        }
    }

    fn parse_block(&mut self) -> Result<Block, ParseError> {
        let open = self.advance();
        let (tag, name) = self.split_tag(&open.lexeme);
        let body = self.parse_config(Some(&tag))?;

        match self.kind() {
            TokenKind::CloseTag => {
                let close = self.advance();
                if !close.lexeme.eq_ignore_ascii_case(&open.lexeme) {
                    return Err(ParseError::new(
                        close.line,
                        format!("</{}>", open.lexeme),
                        format!("</{}>", close.lexeme),
                    ));
                }
            }
            other => return Err(ParseError::new(self.line(), "</tag>", other.as_str())),
        }

        Ok(Block {
            tag,
            name,
            open_kind: OpenKind::Plain,
            children: body.statements,
            quoted: open.quoted,
            line: open.line,
        })
    }

    fn parse_self_block(&mut self) -> Block {
        let open = self.advance();
        let (tag, name) = self.split_tag(&open.lexeme);
        Block {
            tag,
            name,
            open_kind: OpenKind::SelfClosing,
            children: Vec::new(),
            quoted: open.quoted,
            line: open.line,
        }
    }

    fn parse_option(&mut self) -> OptionNode {
        let name_tok = self.advance();
        let separator = match name_tok.sep {
            LexSeparator::Whitespace => Separator::Whitespace,
            LexSeparator::Equals => Separator::Equals,
            LexSeparator::Colon => Separator::Colon,
        };
        let value = if self.kind() == TokenKind::OptionValue || self.kind() == TokenKind::HeredocBody {
            self.parse_option_value()
        } else {
            OptionValue::Empty
        };
        OptionNode { name: name_tok.lexeme, value, separator, line: name_tok.line }
    }

    fn parse_option_value(&mut self) -> OptionValue {
        let tok = self.advance();
        if tok.kind == TokenKind::HeredocBody {
            return OptionValue::Bare(tok.lexeme);
        }
        if tok.is_array {
            let elements = split_array_body(&tok.lexeme)
                .into_iter()
                .map(OptionValue::Bare)
                .collect();
            return OptionValue::Array(elements);
        }
        match tok.quote {
            Quote::Bare => OptionValue::Bare(tok.lexeme),
            Quote::Single => OptionValue::Quoted { single: true, raw: tok.lexeme, trailing: tok.trailing },
            Quote::Double => OptionValue::Quoted { single: false, raw: tok.lexeme, trailing: tok.trailing },
        }
    }

    fn parse_include(&mut self) -> Include {
        let kw = self.advance();
        let apache = matches!(kw.kind, TokenKind::ApacheInclude | TokenKind::ApacheIncludeOptional);
        let optional = kw.kind == TokenKind::ApacheIncludeOptional;
        let path = if self.kind() == TokenKind::OptionValue {
            self.advance().lexeme
        } else {
            String::new()
        };
        Include { path, apache, optional, line: kw.line }
    }
}

/// Splits a `[ ... ]` array body on whitespace, respecting quoted spans.
fn split_array_body(body: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut in_quote: Option<char> = None;

    for c in body.chars() {
        match in_quote {
            Some(q) if c == q => {
                in_quote = None;
            }
            Some(_) => current.push(c),
            None => {
                if c == '"' || c == '\'' {
                    in_quote = Some(c);
                } else if c.is_whitespace() {
                    if !current.is_empty() {
                        parts.push(std::mem::take(&mut current));
                    }
                } else {
                    current.push(c);
                }
            }
        }
    }
    if !current.is_empty() {
        parts.push(current);
    }
    parts
}

pub fn parse(tokens: Vec<Token>, namedblocks: bool) -> Result<Config, ParseError> {
    Parser::new(tokens, namedblocks).parse()
}
