//! Lexical scanner for the mohajer schema-migration language.
//!
//! Turns a migration description into a stream of classified
//! tokens for a downstream parser. Tokens are produced
//! incrementally, either lazily on the caller's thread or by a
//! scanner thread behind a bounded channel.
//!
//! # Quick start
//!
//! ## Pull tokens lazily
//!
//! ```
//! use mohajer::{Keyword, TokenKind, lex};
//!
//! let kinds: Vec<_> = lex("create table users\n").map(|t| t.kind).collect();
//! assert_eq!(kinds[0], TokenKind::Keyword(Keyword::Create));
//! assert_eq!(kinds.last(), Some(&TokenKind::NewLine));
//! ```
//!
//! ## Scan on another thread
//!
//! ```
//! use mohajer::{LexerConfig, TokenKind, spawn};
//!
//! let mut tokens = spawn("add column x `mysql`", &LexerConfig::default());
//! let tag = tokens.find(|t| t.kind == TokenKind::OptionTag).unwrap();
//! assert_eq!(tag.text, "`mysql`");
//! ```
//!
//! ## Collect or fail
//!
//! ```
//! use mohajer::{LexErrorKind, tokenize};
//!
//! let err = tokenize("add \"unterminated").unwrap_err();
//! assert_eq!(err.kind, LexErrorKind::UnterminatedString);
//! assert_eq!(err.position, 4);
//! ```

// Allow noisy pedantic lints that don't add value for
// a library crate.
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod config;
pub mod cursor;
pub mod lexer;
pub mod sink;
pub mod token;

pub use config::{CommentMode, LexerConfig};
pub use cursor::Cursor;
pub use lexer::{Found, LexError, LexErrorKind, Lexer, lex, spawn, tokenize, tokenize_with};
pub use sink::{ChannelSink, Disconnected, TokenReceiver, TokenSink};
pub use token::{Keyword, Token, TokenKind};
