#![allow(dead_code)]

use mohajer::{Keyword, LexerConfig, Token, TokenKind, lex, spawn};

pub fn kinds(input: &str) -> Vec<TokenKind> {
    lex(input).map(|t| t.kind).collect()
}

pub fn threaded_kinds(input: &str, config: &LexerConfig) -> Vec<TokenKind> {
    spawn(input, config).map(|t| t.kind).collect()
}

pub const fn kw(keyword: Keyword) -> TokenKind {
    TokenKind::Keyword(keyword)
}

/// Concatenate the text of every non-error token.
pub fn rebuild(tokens: &[Token]) -> String {
    tokens
        .iter()
        .filter(|t| !t.is_error())
        .map(|t| t.text.as_str())
        .collect()
}

/// Assert tokens tile the input from offset 0 without gaps, up to
/// the end of input or the error token.
pub fn assert_contiguous(input: &str, tokens: &[Token]) {
    let mut offset = 0;
    for token in tokens {
        assert_eq!(
            token.position, offset,
            "gap before {token:?}\n--- input ---\n{input:?}"
        );
        if token.is_error() {
            return;
        }
        offset = token.end();
    }
    assert_eq!(offset, input.len(), "input not fully consumed: {input:?}");
}
