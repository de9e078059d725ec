use std::collections::VecDeque;
use std::fmt;
use std::thread;

use crate::config::{CommentMode, LexerConfig};
use crate::cursor::Cursor;
use crate::sink::{self, Disconnected, TokenReceiver, TokenSink};
use crate::token::{Keyword, Token, TokenKind};

/// Character found where something else was required.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Found(pub Option<char>);

impl fmt::Display for Found {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(ch) => write!(f, "{ch:?}"),
            None => f.write_str("end of input"),
        }
    }
}

/// Classifies a lexer error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexErrorKind {
    /// A line does not start with an identifier or skip operator.
    InvalidLineStart(Found),
    /// Skip-operator position without `+` or `-`.
    ExpectedSkipOperator(Found),
    /// Skip operator not followed by a letter.
    ExpectedLetter(Found),
    /// `:` not followed by whitespace, a string or an identifier.
    InvalidAfterColon(Found),
    /// Missing opening delimiter.
    Expected { expected: char, found: Found },
    /// Unterminated double-quoted string.
    UnterminatedString,
    /// `\` followed by anything but `"` inside a string.
    UnknownEscape(Found),
    /// Unterminated backtick option tag.
    UnterminatedOptionTag,
    /// End of a lexeme not followed by whitespace, newline or end of input.
    ExpectedSeparator(Found),
    /// Character that cannot follow whitespace.
    InvalidAfterWhitespace(Found),
}

impl fmt::Display for LexErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLineStart(found) => write!(f, "invalid line start: {found}"),
            Self::ExpectedSkipOperator(found) => {
                write!(f, "expected `+` or `-`, found {found}")
            }
            Self::ExpectedLetter(found) => {
                write!(f, "expected a letter after skip operator, found {found}")
            }
            Self::InvalidAfterColon(found) => {
                write!(
                    f,
                    "expected whitespace, string, or identifier \
                     after `:`, found {found}"
                )
            }
            Self::Expected { expected, found } => {
                write!(f, "expected {expected:?}, found {found}")
            }
            Self::UnterminatedString => write!(f, "unterminated quoted string"),
            Self::UnknownEscape(found) => write!(f, "unknown escape sequence: \\{found}"),
            Self::UnterminatedOptionTag => write!(f, "unterminated option tag"),
            Self::ExpectedSeparator(found) => {
                write!(
                    f,
                    "expected whitespace, newline, or end of input, found {found}"
                )
            }
            Self::InvalidAfterWhitespace(found) => {
                write!(f, "invalid character after whitespace: {found}")
            }
        }
    }
}

/// Error produced during lexing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at line {line}, column {column}")]
pub struct LexError {
    pub kind: LexErrorKind,
    /// Byte offset of the lexeme that failed.
    pub position: usize,
    pub line: usize,
    pub column: usize,
}

impl LexError {
    /// Locate `position` in `input` (1-based line, column in chars).
    pub(crate) fn new(kind: LexErrorKind, input: &str, position: usize) -> Self {
        let before = &input[..position];
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        let column = before[line_start..].chars().count() + 1;
        Self {
            kind,
            position,
            line,
            column,
        }
    }
}

/// Tokenize a whole source string.
///
/// # Errors
///
/// Returns `LexError` for the first lexical fault; nothing after it
/// is scanned.
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    tokenize_with(input, &LexerConfig::default())
}

/// Tokenize a whole source string with explicit settings.
pub fn tokenize_with(input: &str, config: &LexerConfig) -> Result<Vec<Token>, LexError> {
    let mut tokens: Vec<Token> = Vec::new();
    Scanner::new(input, config).run(&mut tokens);
    match tokens.pop() {
        Some(Token {
            kind: TokenKind::Error(kind),
            position,
            ..
        }) => Err(LexError::new(kind, input, position)),
        Some(last) => {
            tokens.push(last);
            Ok(tokens)
        }
        None => Ok(tokens),
    }
}

/// Start a lazy, single-threaded lexer with default settings.
#[must_use]
pub fn lex(input: &str) -> Lexer<'_> {
    Lexer::new(input)
}

/// Scan `input` on a dedicated thread, handing tokens over through
/// a channel bounded by `config.capacity`.
#[must_use]
pub fn spawn(input: impl Into<String>, config: &LexerConfig) -> TokenReceiver {
    let input = input.into();
    let input_len = input.len();
    let (mut sink, rx) = sink::channel(config.capacity);
    let config = config.clone();
    let producer = thread::spawn(move || {
        Scanner::new(&input, &config).run(&mut sink);
    });
    TokenReceiver::new(rx, producer, input_len)
}

/// Pull-driven lexer: every `next_token` call runs the state
/// machine just far enough to produce one token.
#[derive(Debug)]
pub struct Lexer<'a> {
    scanner: Scanner<'a>,
    queue: VecDeque<Token>,
}

impl<'a> Lexer<'a> {
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Self::with_config(input, &LexerConfig::default())
    }

    #[must_use]
    pub fn with_config(input: &'a str, config: &LexerConfig) -> Self {
        Self {
            scanner: Scanner::new(input, config),
            queue: VecDeque::new(),
        }
    }

    /// Next token, or an `EndOfInput` token once the scan is over.
    pub fn next_token(&mut self) -> Token {
        self.pull().unwrap_or_else(|| {
            Token::new(TokenKind::EndOfInput, self.scanner.cursor.input().len(), "")
        })
    }

    /// Abandon the scan and drop anything already queued.
    pub fn drain(&mut self) {
        self.queue.clear();
        self.scanner.state = None;
    }

    fn pull(&mut self) -> Option<Token> {
        loop {
            if let Some(token) = self.queue.pop_front() {
                return Some(token);
            }
            if !self.scanner.step(&mut self.queue) {
                return None;
            }
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.pull()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Start,
    NewLine,
    SkipOperator,
    Identifier,
    Colon,
    QuotedString,
    OptionTag,
    WhitespaceOrNewline,
    Whitespace,
    Comment,
}

type Next = Result<Option<State>, Disconnected>;

// A lone `\r` is not a line break.
const LINE_BREAKS: &[&str] = &["\n", "\r\n"];
const NEWLINE_RUN: &[&str] = &["\n", "\r\n", "\t", " "];
const SPACE_RUN: &str = " \t";

const fn is_space(ch: char) -> bool {
    matches!(ch, ' ' | '\t')
}

fn is_ident_char(ch: char) -> bool {
    ch == '_' || ch.is_alphabetic() || ch.is_ascii_digit()
}

/// The state machine. Each state consumes input through the cursor,
/// pushes at most one token and names its successor; `None` ends
/// the scan.
#[derive(Debug)]
struct Scanner<'a> {
    cursor: Cursor<'a>,
    state: Option<State>,
    comments: CommentMode,
}

impl<'a> Scanner<'a> {
    fn new(input: &'a str, config: &LexerConfig) -> Self {
        Self {
            cursor: Cursor::new(input),
            state: Some(State::Start),
            comments: config.comments,
        }
    }

    fn run<S: TokenSink>(mut self, sink: &mut S) {
        while self.step(sink) {}
        tracing::debug!(consumed = self.cursor.pos(), "scan finished");
    }

    /// Run one state. Returns `false` once the scan is over.
    fn step<S: TokenSink>(&mut self, sink: &mut S) -> bool {
        let Some(state) = self.state else {
            return false;
        };
        self.state = match self.dispatch(state, sink) {
            Ok(next) => next,
            Err(Disconnected) => {
                tracing::debug!(position = self.cursor.pos(), "consumer gone, stopping scan");
                None
            }
        };
        true
    }

    fn dispatch<S: TokenSink>(&mut self, state: State, sink: &mut S) -> Next {
        match state {
            State::Start => Ok(Some(self.start())),
            State::NewLine => self.new_line(sink),
            State::SkipOperator => self.skip_operator(sink),
            State::Identifier => self.identifier(sink),
            State::Colon => self.colon(sink),
            State::QuotedString => self.quoted_string(sink),
            State::OptionTag => self.option_tag(sink),
            State::WhitespaceOrNewline => self.whitespace_or_newline(sink),
            State::Whitespace => self.whitespace(sink),
            State::Comment => self.comment(sink),
        }
    }

    fn emit<S: TokenSink>(&mut self, sink: &mut S, kind: TokenKind) -> Result<(), Disconnected> {
        let token = self.cursor.emit(kind);
        tracing::trace!(kind = ?token.kind, position = token.position, "token");
        sink.push(token)
    }

    fn fail<S: TokenSink>(&self, sink: &mut S, kind: LexErrorKind) -> Next {
        let token = self.cursor.error(kind);
        tracing::debug!(position = token.position, error = %token.text, "lexical error");
        sink.push(token)?;
        Ok(None)
    }

    fn comment_start(&self, ch: Option<char>) -> bool {
        ch == Some('#') && self.comments != CommentMode::Reject
    }

    fn start(&mut self) -> State {
        let ch = self.cursor.peek();
        if ch.is_some_and(is_ident_char) {
            State::Identifier
        } else if self.comment_start(ch) {
            State::Comment
        } else {
            State::WhitespaceOrNewline
        }
    }

    fn new_line<S: TokenSink>(&mut self, sink: &mut S) -> Next {
        self.cursor.accept_sequences(NEWLINE_RUN);
        self.emit(sink, TokenKind::NewLine)?;
        match self.cursor.peek() {
            Some('+' | '-') => Ok(Some(State::SkipOperator)),
            Some(ch) if is_ident_char(ch) => Ok(Some(State::Identifier)),
            ch if self.comment_start(ch) => Ok(Some(State::Comment)),
            None => Ok(None),
            ch => self.fail(sink, LexErrorKind::InvalidLineStart(Found(ch))),
        }
    }

    fn skip_operator<S: TokenSink>(&mut self, sink: &mut S) -> Next {
        match self.cursor.read() {
            Some('+') => self.emit(sink, TokenKind::SkipDown)?,
            Some('-') => self.emit(sink, TokenKind::SkipUp)?,
            ch => return self.fail(sink, LexErrorKind::ExpectedSkipOperator(Found(ch))),
        }
        match self.cursor.peek() {
            Some(ch) if ch.is_alphabetic() => Ok(Some(State::Identifier)),
            ch => self.fail(sink, LexErrorKind::ExpectedLetter(Found(ch))),
        }
    }

    fn identifier<S: TokenSink>(&mut self, sink: &mut S) -> Next {
        self.cursor.accept_while(is_ident_char);
        let kind = Keyword::lookup(self.cursor.lexeme())
            .map_or(TokenKind::Identifier, TokenKind::Keyword);
        self.emit(sink, kind)?;
        if self.cursor.peek() == Some(':') {
            Ok(Some(State::Colon))
        } else {
            Ok(Some(State::WhitespaceOrNewline))
        }
    }

    fn colon<S: TokenSink>(&mut self, sink: &mut S) -> Next {
        match self.cursor.read() {
            Some(':') => self.emit(sink, TokenKind::Colon)?,
            ch => {
                let found = Found(ch);
                return self.fail(sink, LexErrorKind::Expected { expected: ':', found });
            }
        }
        match self.cursor.peek() {
            Some(ch) if is_space(ch) => Ok(Some(State::Whitespace)),
            Some('"') => Ok(Some(State::QuotedString)),
            Some(ch) if is_ident_char(ch) => Ok(Some(State::Identifier)),
            ch => self.fail(sink, LexErrorKind::InvalidAfterColon(Found(ch))),
        }
    }

    fn quoted_string<S: TokenSink>(&mut self, sink: &mut S) -> Next {
        let ch = self.cursor.read();
        if ch != Some('"') {
            let found = Found(ch);
            return self.fail(sink, LexErrorKind::Expected { expected: '"', found });
        }
        loop {
            match self.cursor.read() {
                None => return self.fail(sink, LexErrorKind::UnterminatedString),
                Some('\\') => match self.cursor.read() {
                    Some('"') => {}
                    None => return self.fail(sink, LexErrorKind::UnterminatedString),
                    ch => return self.fail(sink, LexErrorKind::UnknownEscape(Found(ch))),
                },
                Some('"') => break,
                Some(_) => {}
            }
        }
        self.emit(sink, TokenKind::QuotedString)?;
        Ok(Some(State::WhitespaceOrNewline))
    }

    fn option_tag<S: TokenSink>(&mut self, sink: &mut S) -> Next {
        let ch = self.cursor.read();
        if ch != Some('`') {
            let found = Found(ch);
            return self.fail(sink, LexErrorKind::Expected { expected: '`', found });
        }
        loop {
            match self.cursor.read() {
                None => return self.fail(sink, LexErrorKind::UnterminatedOptionTag),
                Some('`') => break,
                Some(_) => {}
            }
        }
        self.emit(sink, TokenKind::OptionTag)?;
        Ok(Some(State::WhitespaceOrNewline))
    }

    fn whitespace_or_newline<S: TokenSink>(&mut self, sink: &mut S) -> Next {
        if self.cursor.at_any(LINE_BREAKS) {
            return Ok(Some(State::NewLine));
        }
        match self.cursor.peek() {
            Some(ch) if is_space(ch) => Ok(Some(State::Whitespace)),
            None => Ok(None),
            ch => self.fail(sink, LexErrorKind::ExpectedSeparator(Found(ch))),
        }
    }

    fn whitespace<S: TokenSink>(&mut self, sink: &mut S) -> Next {
        self.cursor.accept_run(SPACE_RUN);
        // Trailing blanks belong to the following newline token.
        if self.cursor.at_any(LINE_BREAKS) {
            return Ok(Some(State::NewLine));
        }
        let next = self.cursor.peek();
        self.emit(sink, TokenKind::WhiteSpace)?;
        match next {
            Some(':') => Ok(Some(State::Colon)),
            Some(ch) if is_ident_char(ch) => Ok(Some(State::Identifier)),
            Some('`') => Ok(Some(State::OptionTag)),
            Some('"') => Ok(Some(State::QuotedString)),
            ch if self.comment_start(ch) => Ok(Some(State::Comment)),
            None => Ok(None),
            ch => self.fail(sink, LexErrorKind::InvalidAfterWhitespace(Found(ch))),
        }
    }

    fn comment<S: TokenSink>(&mut self, sink: &mut S) -> Next {
        match self.comments {
            CommentMode::Emit => {
                self.cursor.accept_until(LINE_BREAKS);
                self.emit(sink, TokenKind::Comment)?;
            }
            CommentMode::Discard | CommentMode::Reject => {
                self.cursor.discard_until(LINE_BREAKS);
            }
        }
        Ok(Some(State::WhitespaceOrNewline))
    }
}
