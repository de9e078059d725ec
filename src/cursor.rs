use crate::lexer::LexErrorKind;
use crate::token::{Token, TokenKind};

/// Scan head over the input text.
///
/// `start` marks the beginning of the lexeme being assembled and
/// `pos` the next byte to read; `start <= pos <= input.len()` holds
/// at all times. Both always sit on `char` boundaries.
#[derive(Debug)]
pub struct Cursor<'a> {
    input: &'a str,
    start: usize,
    pos: usize,
    // Width of the last read, cleared by `undo`.
    width: Option<usize>,
}

impl<'a> Cursor<'a> {
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self {
            input,
            start: 0,
            pos: 0,
            width: None,
        }
    }

    #[must_use]
    pub const fn input(&self) -> &'a str {
        self.input
    }

    #[must_use]
    pub const fn start(&self) -> usize {
        self.start
    }

    #[must_use]
    pub const fn pos(&self) -> usize {
        self.pos
    }

    /// Consume the next character, or return `None` at end of input.
    ///
    /// Reading past the end is not an error and can be undone like
    /// any other read.
    pub fn read(&mut self) -> Option<char> {
        let ch = self.input[self.pos..].chars().next();
        let width = ch.map_or(0, char::len_utf8);
        self.pos += width;
        self.width = Some(width);
        ch
    }

    /// Step back over the last read character.
    ///
    /// # Panics
    ///
    /// Panics if called twice without a `read` in between.
    pub fn undo(&mut self) {
        let Some(width) = self.width.take() else {
            panic!("Cursor::undo called without a preceding read");
        };
        self.pos -= width;
    }

    /// Return the next character without consuming it.
    ///
    /// Behaves as `read` followed by `undo`, so the undo point is
    /// spent afterwards.
    pub fn peek(&mut self) -> Option<char> {
        let ch = self.read();
        self.undo();
        ch
    }

    /// Consume characters while they are members of `valid`.
    pub fn accept_run(&mut self, valid: &str) {
        self.accept_while(|ch| valid.contains(ch));
    }

    /// Consume characters while `pred` holds.
    pub fn accept_while(&mut self, pred: impl Fn(char) -> bool) {
        while self.read().is_some_and(&pred) {}
        self.undo();
    }

    /// Whether the unread input begins with any of `seqs`.
    #[must_use]
    pub fn at_any(&self, seqs: &[&str]) -> bool {
        let rest = &self.input[self.pos..];
        seqs.iter().any(|seq| rest.starts_with(seq))
    }

    /// Consume whole sequences from `valid` while one of them starts
    /// the unread input. Sequences must be non-empty.
    pub fn accept_sequences(&mut self, valid: &[&str]) {
        while let Some(seq) = valid
            .iter()
            .find(|seq| self.input[self.pos..].starts_with(**seq))
        {
            for _ in seq.chars() {
                self.read();
            }
        }
    }

    /// Consume characters up to (not including) the first of `stops`
    /// or end of input.
    pub fn accept_until(&mut self, stops: &[&str]) {
        while !self.at_any(stops) && self.read().is_some() {}
    }

    /// Skip everything up to (not including) the first of `stops` or
    /// end of input and drop it from the pending lexeme.
    pub fn discard_until(&mut self, stops: &[&str]) {
        self.accept_until(stops);
        self.start = self.pos;
    }

    /// Text consumed since the last lexeme boundary.
    #[must_use]
    pub fn lexeme(&self) -> &'a str {
        &self.input[self.start..self.pos]
    }

    /// Close the pending lexeme as a token of `kind`.
    pub fn emit(&mut self, kind: TokenKind) -> Token {
        let token = Token::new(kind, self.start, self.lexeme());
        self.start = self.pos;
        token
    }

    /// Build an error token positioned at the pending lexeme.
    #[must_use]
    pub fn error(&self, kind: LexErrorKind) -> Token {
        let text = kind.to_string();
        Token::new(TokenKind::Error(kind), self.start, text)
    }
}
