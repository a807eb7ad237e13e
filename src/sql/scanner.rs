/// Character streams consumed by the tokenizer.
/// `CaseFoldingStream` lets keyword matching ignore case while the text that
/// ends up in tokens keeps the user's casing.

/// Character-level view of a source buffer, as seen by the tokenizer.
///
/// Positions are byte offsets into the underlying text, so `text()` can slice
/// the original source for any span the tokenizer has walked over.
pub trait CharStream {
    /// The character `i` positions ahead of the read position (`i >= 1`).
    /// `None` marks end of input. `la(0)` is undefined and yields `None`.
    fn la(&self, i: usize) -> Option<char>;

    /// Advance past the current character. No-op at end of input.
    fn consume(&mut self);

    /// Current read position as a byte offset.
    fn index(&self) -> usize;

    /// Original text between two byte offsets previously returned by `index()`.
    fn text(&self, start: usize, stop: usize) -> &str;

    /// 1-based line of the read position.
    fn line(&self) -> usize;

    /// 0-based column of the read position within its line.
    fn column(&self) -> usize;
}

/// Ordinary case-sensitive stream over an owned string.
#[derive(Debug, Clone)]
pub struct StringStream {
    data: String,
    pos: usize,
    line: usize,
    column: usize,
}

impl StringStream {
    pub fn new(data: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            pos: 0,
            line: 1,
            column: 0,
        }
    }

    pub fn source(&self) -> &str {
        &self.data
    }
}

impl CharStream for StringStream {
    fn la(&self, i: usize) -> Option<char> {
        if i == 0 {
            return None;
        }
        self.data[self.pos..].chars().nth(i - 1)
    }

    fn consume(&mut self) {
        if let Some(c) = self.data[self.pos..].chars().next() {
            self.pos += c.len_utf8();
            if c == '\n' {
                self.line += 1;
                self.column = 0;
            } else {
                self.column += 1;
            }
        }
    }

    fn index(&self) -> usize {
        self.pos
    }

    fn text(&self, start: usize, stop: usize) -> &str {
        &self.data[start..stop]
    }

    fn line(&self) -> usize {
        self.line
    }

    fn column(&self) -> usize {
        self.column
    }
}

/// Wraps a stream so that lookahead reports upper-cased characters.
///
/// Only `la` is affected; consumption, positions and `text` go straight to
/// the wrapped stream, so extracted token text is never folded.
#[derive(Debug, Clone)]
pub struct CaseFoldingStream<S: CharStream> {
    inner: S,
}

impl<S: CharStream> CaseFoldingStream<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

/// Upper-case a single char. Characters whose upper-case form expands to more
/// than one char (e.g. 'ß') are returned unchanged so lookahead stays 1:1.
fn fold(c: char) -> char {
    let mut upper = c.to_uppercase();
    if upper.len() == 1 {
        upper.next().unwrap_or(c)
    } else {
        c
    }
}

impl<S: CharStream> CharStream for CaseFoldingStream<S> {
    fn la(&self, i: usize) -> Option<char> {
        self.inner.la(i).map(fold)
    }

    fn consume(&mut self) {
        self.inner.consume()
    }

    fn index(&self) -> usize {
        self.inner.index()
    }

    fn text(&self, start: usize, stop: usize) -> &str {
        self.inner.text(start, stop)
    }

    fn line(&self) -> usize {
        self.inner.line()
    }

    fn column(&self) -> usize {
        self.inner.column()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_stream_lookahead_and_consume() {
        let mut s = StringStream::new("ab\nc");
        assert_eq!(s.la(1), Some('a'));
        assert_eq!(s.la(3), Some('\n'));
        assert_eq!(s.la(5), None);
        assert_eq!(s.la(0), None);
        s.consume();
        s.consume();
        assert_eq!((s.line(), s.column()), (1, 2));
        s.consume();
        assert_eq!((s.line(), s.column()), (2, 0));
        assert_eq!(s.la(1), Some('c'));
        s.consume();
        assert_eq!(s.la(1), None);
        // consuming at end of input stays put
        s.consume();
        assert_eq!(s.index(), 4);
    }

    #[test]
    fn test_folding_only_affects_lookahead() {
        let mut s = CaseFoldingStream::new(StringStream::new("SeLeCt x"));
        assert_eq!(s.la(1), Some('S'));
        assert_eq!(s.la(2), Some('E'));
        let start = s.index();
        for _ in 0..6 {
            s.consume();
        }
        assert_eq!(s.text(start, s.index()), "SeLeCt");
        assert_eq!(s.into_inner().source(), "SeLeCt x");
    }

    #[test]
    fn test_folding_multibyte_and_eof() {
        let s = CaseFoldingStream::new(StringStream::new("éß"));
        assert_eq!(s.la(1), Some('É'));
        // 'ß' upper-cases to "SS", reported as is
        assert_eq!(s.la(2), Some('ß'));
        assert_eq!(s.la(3), None);
    }

    #[test]
    fn test_folding_leaves_non_letters_alone() {
        let s = CaseFoldingStream::new(StringStream::new("1_'"));
        assert_eq!(s.la(1), Some('1'));
        assert_eq!(s.la(2), Some('_'));
        assert_eq!(s.la(3), Some('\''));
    }
}
