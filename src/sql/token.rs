/// Tokens produced by the lexer and the cursor the grammar walks them with.

use sqlparser::keywords::Keyword;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Bare word. `keyword` is `Keyword::NoKeyword` for plain identifiers.
    Word { keyword: Keyword },
    QuotedIdent,
    Number,
    String,
    Comma,
    Period,
    LParen,
    RParen,
    Semicolon,
    Eq,
    Neq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Concat,
    Eof,
}

/// A token plus the original source text it was cut from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, line: usize, column: usize) -> Self {
        Self { kind, text: text.into(), line, column }
    }

    pub fn keyword(&self) -> Keyword {
        match self.kind {
            TokenKind::Word { keyword } => keyword,
            _ => Keyword::NoKeyword,
        }
    }

    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        keyword != Keyword::NoKeyword && self.keyword() == keyword
    }

    /// Line and column just past the last character of this token.
    pub fn end_position(&self) -> (usize, usize) {
        match self.text.rsplit_once('\n') {
            Some((before, after)) => {
                (self.line + before.matches('\n').count() + 1, after.chars().count())
            }
            None => (self.line, self.column + self.text.chars().count()),
        }
    }

    /// Text used in diagnostics: `<EOF>` at end of input.
    pub fn display_text(&self) -> &str {
        if self.kind == TokenKind::Eof { "<EOF>" } else { &self.text }
    }
}

/// Buffered tokens with arbitrary lookahead. Always ends with an `Eof` token.
#[derive(Debug, Clone)]
pub struct TokenStream {
    tokens: Vec<Token>,
    pos: usize,
}

impl TokenStream {
    /// Builds a stream, appending the `Eof` token if it is missing.
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map_or(true, |t| t.kind != TokenKind::Eof) {
            let (line, column) = tokens.last().map_or((1, 0), Token::end_position);
            tokens.push(Token::new(TokenKind::Eof, "", line, column));
        }
        Self { tokens, pos: 0 }
    }

    /// Token `k` positions ahead (`k >= 1`). Past the end, the `Eof` token.
    pub fn lt(&self, k: usize) -> &Token {
        let idx = (self.pos + k.max(1) - 1).min(self.tokens.len() - 1);
        &self.tokens[idx]
    }

    pub fn peek(&self) -> &Token {
        self.lt(1)
    }

    pub fn advance(&mut self) -> Token {
        let tok = self.peek().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        tok
    }

    pub fn at_eof(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    /// Number of tokens, excluding the trailing `Eof`.
    pub fn len(&self) -> usize {
        self.tokens.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens[..self.tokens.len() - 1]
    }
}
