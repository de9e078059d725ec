use std::num::NonZeroUsize;

/// How the lexer treats `#` comments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommentMode {
    /// `#` is an ordinary character and fails wherever it appears.
    #[default]
    Reject,
    /// `#` up to the end of the line becomes a `Comment` token.
    Emit,
    /// `#` up to the end of the line is skipped without a token.
    Discard,
}

/// Lexer settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexerConfig {
    /// Number of tokens a spawned scanner may run ahead of its consumer.
    pub capacity: NonZeroUsize,
    pub comments: CommentMode,
}

impl LexerConfig {
    pub const DEFAULT_CAPACITY: NonZeroUsize = NonZeroUsize::new(2).unwrap();

    /// Default settings: capacity 2, comments rejected.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            capacity: Self::DEFAULT_CAPACITY,
            comments: CommentMode::Reject,
        }
    }

    /// Set the sink capacity used by `spawn`.
    #[must_use]
    pub const fn with_capacity(mut self, capacity: NonZeroUsize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Set the comment handling.
    #[must_use]
    pub const fn with_comments(mut self, comments: CommentMode) -> Self {
        self.comments = comments;
        self
    }
}

impl Default for LexerConfig {
    fn default() -> Self {
        Self::new()
    }
}
