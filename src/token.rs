use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use crate::lexer::LexErrorKind;

/// Reserved words of the migration language.
///
/// Matched case-insensitively against a whole identifier run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Name,
    Use,
    Create,
    Add,
    Remove,
    Set,
    Rename,
    End,
}

static KEYWORDS: LazyLock<HashMap<&'static str, Keyword>> =
    LazyLock::new(|| Keyword::ALL.iter().map(|kw| (kw.as_str(), *kw)).collect());

impl Keyword {
    /// Every keyword, in declaration order.
    pub const ALL: [Self; 8] = [
        Self::Name,
        Self::Use,
        Self::Create,
        Self::Add,
        Self::Remove,
        Self::Set,
        Self::Rename,
        Self::End,
    ];

    /// Canonical (lowercase) spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Use => "use",
            Self::Create => "create",
            Self::Add => "add",
            Self::Remove => "remove",
            Self::Set => "set",
            Self::Rename => "rename",
            Self::End => "end",
        }
    }

    /// Look up an identifier in the keyword table, ignoring case.
    #[must_use]
    pub fn lookup(ident: &str) -> Option<Self> {
        KEYWORDS.get(ident.to_lowercase().as_str()).copied()
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Token kinds produced by the lexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// Lexical fault. Always the last token of a stream; the token
    /// text holds the rendered diagnostic.
    Error(LexErrorKind),
    /// Stream closed without an error.
    EndOfInput,
    /// Run of line breaks, plus any spaces or tabs around them.
    NewLine,
    /// Run of spaces and tabs inside a line.
    WhiteSpace,
    /// Line-leading `-`.
    SkipUp,
    /// Line-leading `+`.
    SkipDown,
    /// Double-quoted string, quotes included (`"..."`).
    QuotedString,
    /// Backtick-delimited option tag, backticks included (`` `...` ``).
    OptionTag,
    /// `:` separating an option key from its value.
    Colon,
    /// Run of letters, digits and underscores that is not a keyword.
    Identifier,
    /// Reserved word.
    Keyword(Keyword),
    /// Comment (`# ...`), only produced with `CommentMode::Emit`.
    Comment,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error(kind) => write!(f, "error ({kind})"),
            Self::EndOfInput => f.write_str("end of input"),
            Self::NewLine => f.write_str("newline"),
            Self::WhiteSpace => f.write_str("whitespace"),
            Self::SkipUp => f.write_str("`-`"),
            Self::SkipDown => f.write_str("`+`"),
            Self::QuotedString => f.write_str("quoted string"),
            Self::OptionTag => f.write_str("option tag"),
            Self::Colon => f.write_str("`:`"),
            Self::Identifier => f.write_str("identifier"),
            Self::Keyword(kw) => write!(f, "keyword `{kw}`"),
            Self::Comment => f.write_str("comment"),
        }
    }
}

/// A classified span of input.
///
/// `position` is the byte offset of the first character of the
/// lexeme and `text` is the exact slice consumed, except for
/// `Error` tokens whose text is the diagnostic message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub position: usize,
    pub text: String,
}

impl Token {
    #[must_use]
    pub fn new(kind: TokenKind, position: usize, text: impl Into<String>) -> Self {
        Self {
            kind,
            position,
            text: text.into(),
        }
    }

    /// Byte offset just past the lexeme.
    #[must_use]
    pub fn end(&self) -> usize {
        self.position + self.text.len()
    }

    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self.kind, TokenKind::Error(_))
    }
}
