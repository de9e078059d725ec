//! Property-based tests with proptest.
//!
//! Arbitrary text must always tile into tokens up to the first
//! error, and generated well-formed statements must scan cleanly.

mod common;

use std::num::NonZeroUsize;

use common::{assert_contiguous, rebuild};
use mohajer::{Keyword, LexerConfig, Token, TokenKind, lex, spawn, tokenize};
use proptest::prelude::*;

// -- Leaf strategies --

/// Identifier that may or may not collide with a keyword.
fn word() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z_][a-zA-Z0-9_]{0,10}",
        prop::sample::select(Keyword::ALL.to_vec()).prop_map(|kw| kw.as_str().to_uppercase()),
    ]
}

/// Option value: identifier or quoted string with optional escaped quotes.
fn value() -> impl Strategy<Value = String> {
    prop_oneof![
        word(),
        prop::collection::vec(prop_oneof!["[a-z ]{1,5}", Just("\\\"".to_string())], 0..4)
            .prop_map(|parts| format!("\"{}\"", parts.concat())),
    ]
}

/// Element of a statement line.
fn element() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => word(),
        1 => (word(), value()).prop_map(|(k, v)| format!("{k}:{v}")),
        1 => "[a-z =]{0,8}".prop_map(|t| format!("`{t}`")),
    ]
}

/// One statement line, optionally behind a skip operator.
fn line() -> impl Strategy<Value = String> {
    (
        prop_oneof![Just(""), Just("+"), Just("-")],
        "[a-zA-Z][a-zA-Z0-9_]{0,8}",
        prop::collection::vec(element(), 0..5),
        "[ \t]{0,2}",
    )
        .prop_map(|(skip, head, rest, trailing)| {
            let mut line = format!("{skip}{head}");
            for el in rest {
                line.push(' ');
                line.push_str(&el);
            }
            line.push_str(&trailing);
            line
        })
}

/// Whole document: lines joined by one or more blank-ish separators.
fn document() -> impl Strategy<Value = String> {
    prop::collection::vec((line(), "\n[ \t\n]{0,3}"), 1..8).prop_map(|lines| {
        lines
            .into_iter()
            .enumerate()
            .map(|(i, (line, sep))| {
                // First line cannot carry a skip operator.
                let line = if i == 0 {
                    line.trim_start_matches(['+', '-']).to_string()
                } else {
                    line
                };
                format!("{line}{sep}")
            })
            .collect()
    })
}

fn kinds_of(tokens: &[Token]) -> Vec<TokenKind> {
    tokens.iter().map(|t| t.kind.clone()).collect()
}

proptest! {
    #[test]
    fn tokens_tile_arbitrary_input(input in any::<String>()) {
        let tokens: Vec<_> = lex(&input).collect();
        assert_contiguous(&input, &tokens);
        let consumed = tokens.last().filter(|t| t.is_error()).map_or(input.len(), |t| t.position);
        prop_assert_eq!(rebuild(&tokens), &input[..consumed]);
        prop_assert!(tokens.iter().rev().skip(1).all(|t| !t.is_error()));
    }

    #[test]
    fn tokens_tile_migration_like_input(input in "[a-z+\\-:\"`\\\\ \t\n#$]{0,40}") {
        let tokens: Vec<_> = lex(&input).collect();
        assert_contiguous(&input, &tokens);
    }

    #[test]
    fn scanning_is_deterministic(input in "[a-z+\\-:\"` \n]{0,40}") {
        let first: Vec<_> = lex(&input).collect();
        let second: Vec<_> = lex(&input).collect();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn generated_documents_scan_cleanly(input in document()) {
        let tokens = tokenize(&input).map_err(|e| {
            TestCaseError::fail(format!("{e}\n--- input ---\n{input:?}"))
        })?;
        prop_assert_eq!(rebuild(&tokens), input.as_str());
        for (i, token) in tokens.iter().enumerate() {
            if matches!(token.kind, TokenKind::SkipDown | TokenKind::SkipUp) {
                prop_assert!(i > 0 && tokens[i - 1].kind == TokenKind::NewLine);
            }
        }
    }

    #[test]
    fn keyword_case_never_matters(kw in prop::sample::select(Keyword::ALL.to_vec()), mask in any::<u8>()) {
        let spelled: String = kw
            .as_str()
            .chars()
            .enumerate()
            .map(|(i, c)| if (mask >> (i % 8)) & 1 == 1 { c.to_ascii_uppercase() } else { c })
            .collect();
        let tokens: Vec<_> = lex(&spelled).collect();
        prop_assert_eq!(kinds_of(&tokens), vec![TokenKind::Keyword(kw)]);
    }

    #[test]
    fn capacity_never_changes_content(input in document(), capacity in 1usize..6) {
        let capacity = NonZeroUsize::new(capacity).expect("non-zero");
        let config = LexerConfig::new().with_capacity(capacity);
        let threaded: Vec<_> = spawn(input.as_str(), &config).collect();
        let lazy: Vec<_> = lex(&input).collect();
        prop_assert_eq!(threaded, lazy);
    }
}
