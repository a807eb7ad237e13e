//! Tokenizer for the query language.
//!
//! The lexer makes every decision from `la()` lookahead and cuts token text
//! from the stream with `text()`. Run over a `CaseFoldingStream`, keywords are
//! therefore matched case-insensitively while identifiers and literals keep
//! their source spelling. Keyword spellings come from sqlparser's keyword
//! table.

use sqlparser::keywords::{ALL_KEYWORDS, ALL_KEYWORDS_INDEX, Keyword};
use tracing::trace;

use super::scanner::CharStream;
use super::token::{Token, TokenKind, TokenStream};
use crate::common::SyntaxError;

/// Look up an upper-case word in the keyword table.
pub fn lookup_keyword(word: &str) -> Keyword {
    ALL_KEYWORDS
        .binary_search(&word)
        .map_or(Keyword::NoKeyword, |idx| ALL_KEYWORDS_INDEX[idx])
}

pub struct Lexer<S: CharStream> {
    input: S,
}

impl<S: CharStream> Lexer<S> {
    pub fn new(input: S) -> Self {
        Self { input }
    }

    /// Tokenize the whole input. The returned stream ends with `Eof`.
    pub fn tokenize(mut self) -> Result<TokenStream, SyntaxError> {
        let mut tokens = Vec::new();
        loop {
            let tok = self.next_token()?;
            let eof = tok.kind == TokenKind::Eof;
            tokens.push(tok);
            if eof {
                break;
            }
        }
        trace!("tokenized {} tokens", tokens.len() - 1);
        Ok(TokenStream::new(tokens))
    }

    fn error(&self, message: String) -> SyntaxError {
        SyntaxError::new(self.input.line(), self.input.column(), message)
    }

    fn next_token(&mut self) -> Result<Token, SyntaxError> {
        self.skip_ignored()?;

        let start = self.input.index();
        let line = self.input.line();
        let column = self.input.column();

        let c = match self.input.la(1) {
            Some(c) => c,
            None => return Ok(Token::new(TokenKind::Eof, "", line, column)),
        };

        let kind = match c {
            c if c.is_alphabetic() || c == '_' => self.scan_word(),
            c if c.is_ascii_digit() => self.scan_number(),
            '.' if self.input.la(2).is_some_and(|d| d.is_ascii_digit()) => self.scan_number(),
            '\'' => self.scan_quoted('\'', TokenKind::String, "string literal")?,
            '"' => self.scan_quoted('"', TokenKind::QuotedIdent, "quoted identifier")?,
            _ => self.scan_symbol(c)?,
        };

        let text = self.input.text(start, self.input.index());
        Ok(Token::new(kind, text, line, column))
    }

    fn skip_ignored(&mut self) -> Result<(), SyntaxError> {
        loop {
            match (self.input.la(1), self.input.la(2)) {
                (Some(c), _) if c.is_whitespace() => self.input.consume(),
                (Some('-'), Some('-')) => {
                    while let Some(c) = self.input.la(1) {
                        self.input.consume();
                        if c == '\n' {
                            break;
                        }
                    }
                }
                (Some('/'), Some('*')) => {
                    let err = self.error("unterminated comment".to_string());
                    self.input.consume();
                    self.input.consume();
                    loop {
                        match (self.input.la(1), self.input.la(2)) {
                            (None, _) => return Err(err),
                            (Some('*'), Some('/')) => {
                                self.input.consume();
                                self.input.consume();
                                break;
                            }
                            _ => self.input.consume(),
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    /// Identifier or keyword. The keyword is resolved from the spelling the
    /// stream reports through lookahead, never from the extracted text.
    fn scan_word(&mut self) -> TokenKind {
        let mut spelled = String::new();
        while let Some(c) = self.input.la(1) {
            if c.is_alphanumeric() || c == '_' || c == '$' {
                spelled.push(c);
                self.input.consume();
            } else {
                break;
            }
        }
        TokenKind::Word { keyword: lookup_keyword(&spelled) }
    }

    fn scan_number(&mut self) -> TokenKind {
        self.consume_digits();
        if self.input.la(1) == Some('.') {
            self.input.consume();
            self.consume_digits();
        }
        if matches!(self.input.la(1), Some('E') | Some('e')) {
            let has_exponent = match self.input.la(2) {
                Some('+') | Some('-') => self.input.la(3).is_some_and(|d| d.is_ascii_digit()),
                Some(d) => d.is_ascii_digit(),
                None => false,
            };
            if has_exponent {
                self.input.consume();
                if matches!(self.input.la(1), Some('+') | Some('-')) {
                    self.input.consume();
                }
                self.consume_digits();
            }
        }
        TokenKind::Number
    }

    fn consume_digits(&mut self) {
        while self.input.la(1).is_some_and(|d| d.is_ascii_digit()) {
            self.input.consume();
        }
    }

    /// Quoted literal, a doubled quote char is an escaped quote.
    fn scan_quoted(&mut self, quote: char, kind: TokenKind, what: &str) -> Result<TokenKind, SyntaxError> {
        let err = self.error(format!("unterminated {}", what));
        self.input.consume();
        loop {
            match self.input.la(1) {
                None => return Err(err),
                Some(c) if c == quote => {
                    self.input.consume();
                    if self.input.la(1) == Some(quote) {
                        self.input.consume();
                    } else {
                        return Ok(kind);
                    }
                }
                Some(_) => self.input.consume(),
            }
        }
    }

    fn scan_symbol(&mut self, c: char) -> Result<TokenKind, SyntaxError> {
        let next = self.input.la(2);
        let (kind, width) = match (c, next) {
            ('<', Some('>')) => (TokenKind::Neq, 2),
            ('!', Some('=')) => (TokenKind::Neq, 2),
            ('<', Some('=')) => (TokenKind::LtEq, 2),
            ('>', Some('=')) => (TokenKind::GtEq, 2),
            ('|', Some('|')) => (TokenKind::Concat, 2),
            ('<', _) => (TokenKind::Lt, 1),
            ('>', _) => (TokenKind::Gt, 1),
            ('=', _) => (TokenKind::Eq, 1),
            ('+', _) => (TokenKind::Plus, 1),
            ('-', _) => (TokenKind::Minus, 1),
            ('*', _) => (TokenKind::Star, 1),
            ('/', _) => (TokenKind::Slash, 1),
            ('%', _) => (TokenKind::Percent, 1),
            (',', _) => (TokenKind::Comma, 1),
            ('.', _) => (TokenKind::Period, 1),
            ('(', _) => (TokenKind::LParen, 1),
            (')', _) => (TokenKind::RParen, 1),
            (';', _) => (TokenKind::Semicolon, 1),
            _ => return Err(self.error(format!("token recognition error at: '{}'", c))),
        };
        for _ in 0..width {
            self.input.consume();
        }
        Ok(kind)
    }
}
