//! Lexer for Apache-style configuration text
//!
//! Character-driven scanner producing tokens on demand, in the teacher's own
//! idiom: a `Vec<char>` plus a cursor (`src/commands/query_engine/lexer.rs`,
//! `src/parser/lexer.rs`), not a zero-copy `&str` scanner. Mode switches
//! (heredoc, quoting, tag context, comments) are handled inline rather than
//! via a separate lexer-state enum, the same way the teacher's bash lexer
//! tracks `PendingHeredoc` as local state threaded through one scan loop.

use super::types::{LexError, Quote, Separator, Token, TokenKind};

/// The subset of `Options` the lexer needs to make lexical decisions.
#[derive(Debug, Clone, Copy)]
pub struct LexerConfig {
    pub ccomments: bool,
    pub noescape: bool,
    pub useapacheinclude: bool,
}

impl Default for LexerConfig {
    fn default() -> Self {
        LexerConfig {
            ccomments: true,
            noescape: false,
            useapacheinclude: true,
        }
    }
}

pub struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    config: LexerConfig,
}

pub fn tokenize(input: &str, config: LexerConfig) -> Result<Vec<Token>, LexError> {
    Lexer::new(input, config).run()
}

impl Lexer {
    pub fn new(input: &str, config: LexerConfig) -> Self {
        Lexer {
            chars: input.chars().collect(),
            pos: 0,
            line: 1,
            config,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn skip_hspace(&mut self) {
        while matches!(self.peek(), Some(' ') | Some('\t') | Some('\r')) {
            self.pos += 1;
        }
    }

    /// If positioned at a backslash-newline, consume it and report that a
    /// continuation was elided (the logical line continues on the next
    /// physical line, and no NEWLINE token is emitted for the join).
    fn try_consume_continuation(&mut self) -> bool {
        if self.peek() == Some('\\') {
            let mut off = 1;
            while self.peek_at(off) == Some('\r') {
                off += 1;
            }
            if self.peek_at(off) == Some('\n') {
                for _ in 0..=off {
                    self.advance();
                }
                return true;
            }
        }
        false
    }

    pub fn run(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        loop {
            if self.try_consume_continuation() {
                continue;
            }
            let Some(c) = self.peek() else {
                tokens.push(Token::new(TokenKind::Eof, "", self.line));
                break;
            };

            if c == '\n' {
                self.advance();
                tokens.push(Token::new(TokenKind::Newline, "", self.line - 1));
                continue;
            }
            if c == ' ' || c == '\t' || c == '\r' {
                self.skip_hspace();
                continue;
            }
            if c == '#' {
                tokens.push(self.scan_hash_comment());
                continue;
            }
            if self.config.ccomments && c == '/' && self.peek_at(1) == Some('*') {
                tokens.push(self.scan_c_comment()?);
                continue;
            }
            if c == '<' && self.peek_at(1) == Some('/') {
                tokens.push(self.scan_close_tag()?);
                continue;
            }
            if c == '<' {
                tokens.push(self.scan_open_tag()?);
                continue;
            }
            // Anything else begins a statement: an option name or an
            // include directive keyword.
            tokens.extend(self.scan_statement()?);
        }
        Ok(tokens)
    }

    fn scan_hash_comment(&mut self) -> Token {
        let line = self.line;
        self.advance(); // '#'
        let mut text = String::new();
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            text.push(c);
            self.advance();
        }
        Token::new(TokenKind::HashComment, text.trim_end_matches('\r').to_string(), line)
    }

    fn scan_c_comment(&mut self) -> Result<Token, LexError> {
        let line = self.line;
        self.advance(); // '/'
        self.advance(); // '*'
        let mut text = String::new();
        loop {
            match (self.peek(), self.peek_at(1)) {
                (Some('*'), Some('/')) => {
                    self.advance();
                    self.advance();
                    return Ok(Token::new(TokenKind::CComment, text, line));
                }
                (Some(c), _) => {
                    text.push(c);
                    self.advance();
                }
                (None, _) => {
                    return Err(LexError::new(line, "unterminated C-style comment"));
                }
            }
        }
    }

    /// Reads `<name ...>` / `<name ... />` / `<"quoted name">`.
    fn scan_open_tag(&mut self) -> Result<Token, LexError> {
        let line = self.line;
        self.advance(); // '<'
        self.skip_hspace();

        let quoted = self.peek() == Some('"');
        let mut raw = String::new();
        let mut ended_with_slash_before_gt = false;
        let mut slash_preceded_by_space = false;

        if quoted {
            self.advance(); // opening quote
            loop {
                match self.peek() {
                    Some('"') => {
                        self.advance();
                        break;
                    }
                    Some('\n') | None => {
                        return Err(LexError::new(line, "unterminated quoted tag name"));
                    }
                    Some(c) => {
                        raw.push(c);
                        self.advance();
                    }
                }
            }
            self.skip_hspace();
            // Optional self-close after a quoted tag name.
            if self.peek() == Some('/') && self.peek_at(1) == Some('>') {
                self.advance();
                ended_with_slash_before_gt = true;
                slash_preceded_by_space = true;
            }
            if self.peek() != Some('>') {
                return Err(LexError::new(self.line, "expected '>' after quoted tag name"));
            }
            self.advance();
        } else {
            let mut last_was_space = false;
            loop {
                match self.peek() {
                    Some('>') => {
                        self.advance();
                        break;
                    }
                    Some('\n') | None => {
                        return Err(LexError::new(line, "unterminated tag, missing '>'"));
                    }
                    Some('<') => {
                        return Err(LexError::new(self.line, "illegal '<' inside tag name"));
                    }
                    Some('/') if self.peek_at(1) == Some('>') => {
                        ended_with_slash_before_gt = true;
                        slash_preceded_by_space = last_was_space;
                        // Without preceding whitespace the '/' is not a
                        // self-close marker, it's part of the tag name.
                        if !last_was_space {
                            raw.push('/');
                        }
                        self.advance(); // '/'
                        self.advance(); // '>'
                        break;
                    }
                    Some(c) => {
                        last_was_space = c == ' ' || c == '\t';
                        raw.push(c);
                        self.advance();
                    }
                }
            }
        }

        let self_closing = ended_with_slash_before_gt && slash_preceded_by_space;
        let payload = raw.trim().to_string();
        if payload.is_empty() {
            return Err(LexError::new(line, "empty tag name"));
        }
        let kind = if self_closing { TokenKind::OpenCloseTag } else { TokenKind::OpenTag };
        Ok(Token::new(kind, payload, line).with_quoted(quoted))
    }

    fn scan_close_tag(&mut self) -> Result<Token, LexError> {
        let line = self.line;
        self.advance(); // '<'
        self.advance(); // '/'
        let mut name = String::new();
        loop {
            match self.peek() {
                Some('>') => {
                    self.advance();
                    break;
                }
                Some('\n') | None => {
                    return Err(LexError::new(line, "unterminated closing tag, missing '>'"));
                }
                Some(c) => {
                    name.push(c);
                    self.advance();
                }
            }
        }
        Ok(Token::new(TokenKind::CloseTag, name.trim().to_string(), line))
    }

    /// Reads one statement: `OPTION_NAME` (or an include keyword) followed
    /// optionally by its value, returned together since the lexer needs a
    /// single lookahead to decide if the name word is an include directive.
    fn scan_statement(&mut self) -> Result<Vec<Token>, LexError> {
        let line = self.line;
        let mut name = String::new();
        while let Some(c) = self.peek() {
            if c.is_whitespace() || c == '=' || c == ':' || c == '#' || c == '<' {
                break;
            }
            name.push(c);
            self.advance();
        }
        if name.is_empty() {
            // Stray separator character with no preceding name; consume it
            // as an illegal token rather than looping forever.
            if let Some(c) = self.peek() {
                return Err(LexError::new(line, format!("unexpected character '{c}'")));
            }
            return Ok(vec![Token::new(TokenKind::Eof, "", line)]);
        }

        self.skip_hspace();
        let sep = match self.peek() {
            Some('=') => {
                self.advance();
                self.skip_hspace();
                Separator::Equals
            }
            Some(':') => {
                self.advance();
                self.skip_hspace();
                Separator::Colon
            }
            _ => Separator::Whitespace,
        };

        let lower = name.to_lowercase();
        let kind = if lower == "include" {
            if name == "include" {
                TokenKind::Include
            } else if self.config.useapacheinclude {
                TokenKind::ApacheInclude
            } else {
                TokenKind::Include
            }
        } else if lower == "includeoptional" && self.config.useapacheinclude {
            TokenKind::ApacheIncludeOptional
        } else {
            TokenKind::OptionName
        };

        let mut tokens = vec![Token::new(kind, name, line).with_sep(sep)];
        if let Some(value) = self.scan_value(line)? {
            tokens.push(value);
        }
        Ok(tokens)
    }

    /// Reads the remainder of a logical line as an option value: bare text,
    /// a quoted string (with optional trailing bare suffix), a `[ ... ]`
    /// array, or a `<<TAG` heredoc introducer.
    fn scan_value(&mut self, line: usize) -> Result<Option<Token>, LexError> {
        if matches!(self.peek(), None | Some('\n') | Some('#')) {
            return Ok(None);
        }

        if self.peek() == Some('<') && self.peek_at(1) == Some('<') {
            return Ok(Some(self.scan_heredoc(line)?));
        }

        if self.peek() == Some('[') {
            return Ok(Some(self.scan_array(line)?));
        }

        if self.peek() == Some('"') || self.peek() == Some('\'') {
            return Ok(Some(self.scan_quoted_value(line)?));
        }

        Ok(Some(self.scan_bare_value(line)))
    }

    fn scan_bare_value(&mut self, line: usize) -> Token {
        let mut text = String::new();
        loop {
            if self.try_consume_continuation() {
                continue;
            }
            match self.peek() {
                None | Some('\n') | Some('#') => break,
                Some('\\') if !self.config.noescape => {
                    text.push('\\');
                    self.advance();
                    if let Some(c) = self.peek() {
                        text.push(c);
                        self.advance();
                    }
                }
                Some(c) => {
                    text.push(c);
                    self.advance();
                }
            }
        }
        Token::new(TokenKind::OptionValue, text, line)
    }

    fn scan_quoted_value(&mut self, line: usize) -> Result<Token, LexError> {
        let quote_char = self.peek().unwrap();
        let quote = if quote_char == '"' { Quote::Double } else { Quote::Single };
        self.advance();

        let mut raw = String::new();
        loop {
            match self.peek() {
                Some(c) if c == quote_char => {
                    self.advance();
                    break;
                }
                Some('\\') if !self.config.noescape => {
                    raw.push('\\');
                    self.advance();
                    if let Some(c) = self.peek() {
                        raw.push(c);
                        self.advance();
                    }
                }
                Some('\n') | None => {
                    return Err(LexError::new(line, "unterminated quoted string"));
                }
                Some(c) => {
                    raw.push(c);
                    self.advance();
                }
            }
        }

        // Trailing bare text directly glued to the closing quote.
        let mut trailing = String::new();
        loop {
            if self.try_consume_continuation() {
                continue;
            }
            match self.peek() {
                None | Some('\n') | Some('#') | Some(' ') | Some('\t') | Some('\r') => break,
                Some('\\') if !self.config.noescape => {
                    trailing.push('\\');
                    self.advance();
                    if let Some(c) = self.peek() {
                        trailing.push(c);
                        self.advance();
                    }
                }
                Some(c) => {
                    trailing.push(c);
                    self.advance();
                }
            }
        }

        Ok(Token::new(TokenKind::OptionValue, raw, line)
            .with_quote(quote)
            .with_trailing(trailing))
    }

    fn scan_array(&mut self, line: usize) -> Result<Token, LexError> {
        self.advance(); // '['
        let mut text = String::new();
        loop {
            match self.peek() {
                Some(']') => {
                    self.advance();
                    break;
                }
                Some('\n') | None => {
                    return Err(LexError::new(line, "unterminated array value, missing ']'"));
                }
                Some(q) if q == '"' || q == '\'' => {
                    text.push(q);
                    self.advance();
                    loop {
                        match self.peek() {
                            Some(c) if c == q => {
                                text.push(c);
                                self.advance();
                                break;
                            }
                            Some('\\') if !self.config.noescape => {
                                text.push('\\');
                                self.advance();
                                if let Some(c) = self.peek() {
                                    text.push(c);
                                    self.advance();
                                }
                            }
                            Some('\n') | None => {
                                return Err(LexError::new(line, "unterminated quoted string inside array"));
                            }
                            Some(c) => {
                                text.push(c);
                                self.advance();
                            }
                        }
                    }
                }
                Some(c) => {
                    text.push(c);
                    self.advance();
                }
            }
        }
        Ok(Token::new(TokenKind::OptionValue, text.trim().to_string(), line).with_array(true))
    }

    fn scan_heredoc(&mut self, line: usize) -> Result<Token, LexError> {
        self.advance(); // '<'
        self.advance(); // '<'
        self.skip_hspace();
        let mut tag = String::new();
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                break;
            }
            tag.push(c);
            self.advance();
        }
        if tag.is_empty() {
            return Err(LexError::new(line, "heredoc missing closing tag name"));
        }
        // Discard the remainder of the introducer line.
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.advance();
        }
        if self.peek() == Some('\n') {
            self.advance();
        }

        let mut body = String::new();
        loop {
            if self.peek().is_none() {
                return Err(LexError::new(line, format!("unterminated heredoc, expected closing '{tag}'")));
            }
            let body_line_start = self.pos;
            let mut body_line = String::new();
            while let Some(c) = self.peek() {
                if c == '\n' {
                    break;
                }
                body_line.push(c);
                self.advance();
            }
            let had_newline = self.peek() == Some('\n');
            if had_newline {
                self.advance();
            }
            if body_line.trim() == tag {
                break;
            }
            let _ = body_line_start;
            body.push_str(&body_line);
            body.push('\n');
        }

        Ok(Token::new(TokenKind::HeredocBody, body, line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(input: &str) -> Vec<Token> {
        tokenize(input, LexerConfig::default()).expect("lex failed")
    }

    #[test]
    fn lexes_simple_option() {
        let tokens = lex("name stein\n");
        assert_eq!(tokens[0].kind, TokenKind::OptionName);
        assert_eq!(tokens[0].lexeme, "name");
        assert_eq!(tokens[1].kind, TokenKind::OptionValue);
        assert_eq!(tokens[1].lexeme, "stein");
        assert_eq!(tokens[2].kind, TokenKind::Newline);
    }

    #[test]
    fn lexes_equals_and_colon_separators() {
        let tokens = lex("a=1\nb: 2\n");
        assert_eq!(tokens[0].sep, Separator::Equals);
        assert_eq!(tokens[1].lexeme, "1");
        let b_name = tokens.iter().find(|t| t.lexeme == "b").unwrap();
        assert_eq!(b_name.sep, Separator::Colon);
    }

    #[test]
    fn lexes_empty_value() {
        let tokens = lex("option:\nnext 1\n");
        assert_eq!(tokens[0].kind, TokenKind::OptionName);
        assert_eq!(tokens[1].kind, TokenKind::Newline);
    }

    #[test]
    fn lexes_open_and_close_tags() {
        let tokens = lex("<cops>\n</cops>\n");
        assert_eq!(tokens[0].kind, TokenKind::OpenTag);
        assert_eq!(tokens[0].lexeme, "cops");
        assert_eq!(tokens[1].kind, TokenKind::Newline);
        assert_eq!(tokens[2].kind, TokenKind::CloseTag);
        assert_eq!(tokens[2].lexeme, "cops");
    }

    #[test]
    fn self_closing_tag_requires_preceding_space() {
        let tokens = lex("<empty />\n");
        assert_eq!(tokens[0].kind, TokenKind::OpenCloseTag);
        assert_eq!(tokens[0].lexeme, "empty");

        let tokens = lex("<noself/>\n");
        assert_eq!(tokens[0].kind, TokenKind::OpenTag);
        assert_eq!(tokens[0].lexeme, "noself/");
    }

    #[test]
    fn quoted_tag_name() {
        let tokens = lex("<\"tag name\">\n</\"tag name\">\n");
        assert_eq!(tokens[0].kind, TokenKind::OpenTag);
        assert_eq!(tokens[0].lexeme, "tag name");
        assert!(tokens[0].quoted);
    }

    #[test]
    fn hash_comment_to_end_of_line() {
        let tokens = lex("# full comment\nx 1 # trailing\n");
        assert_eq!(tokens[0].kind, TokenKind::HashComment);
        assert_eq!(tokens[0].lexeme, " full comment");
    }

    #[test]
    fn escaped_hash_is_not_a_comment() {
        let tokens = lex("color \\#000000\n");
        assert_eq!(tokens[1].kind, TokenKind::OptionValue);
        assert_eq!(tokens[1].lexeme, "\\#000000");
    }

    #[test]
    fn c_comment_spans_lines() {
        let tokens = lex("/* one\ntwo */\nx 1\n");
        assert_eq!(tokens[0].kind, TokenKind::CComment);
        assert_eq!(tokens[0].lexeme, " one\ntwo ");
    }

    #[test]
    fn quoted_value_with_trailing_bare_text_concatenates() {
        let tokens = lex("key \"foo\"bar\n");
        let value = &tokens[1];
        assert_eq!(value.quote, Quote::Double);
        assert_eq!(value.lexeme, "foo");
        assert_eq!(value.trailing, "bar");
    }

    #[test]
    fn array_value_is_marked() {
        let tokens = lex("list [ a b c ]\n");
        assert!(tokens[1].is_array);
        assert_eq!(tokens[1].lexeme, "a b c");
    }

    #[test]
    fn heredoc_body_is_captured_verbatim() {
        let tokens = lex("body <<END\n  line1\n  line2\n  END\n");
        let body = tokens.iter().find(|t| t.kind == TokenKind::HeredocBody).unwrap();
        assert_eq!(body.lexeme, "  line1\n  line2\n");
    }

    #[test]
    fn unterminated_heredoc_errors() {
        let err = tokenize("body <<END\nline1\n", LexerConfig::default()).unwrap_err();
        assert!(err.description.contains("heredoc"));
    }

    #[test]
    fn unterminated_quote_errors() {
        let err = tokenize("x \"unterminated\n", LexerConfig::default()).unwrap_err();
        assert!(err.description.contains("quoted string"));
    }

    #[test]
    fn include_keyword_is_always_recognized() {
        let tokens = lex("include foo.conf\n");
        assert_eq!(tokens[0].kind, TokenKind::Include);
    }

    #[test]
    fn apache_include_optional_gated_by_option() {
        let cfg = LexerConfig { useapacheinclude: true, ..Default::default() };
        let tokens = tokenize("IncludeOptional foo.conf\n", cfg).unwrap();
        assert_eq!(tokens[0].kind, TokenKind::ApacheIncludeOptional);

        let cfg_off = LexerConfig { useapacheinclude: false, ..Default::default() };
        let tokens = tokenize("IncludeOptional foo.conf\n", cfg_off).unwrap();
        assert_eq!(tokens[0].kind, TokenKind::OptionName);
    }

    #[test]
    fn line_continuation_joins_physical_lines() {
        let tokens = lex("x one\\\ntwo\n");
        assert_eq!(tokens[1].lexeme, "onetwo");
    }
}
