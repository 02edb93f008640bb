//! Edge case tests for the lexer.
//!
//! The two universal properties live here as property tests:
//! totality (any input terminates with exactly one `EndOfFile`) and
//! position monotonicity ((line, column) nondecreasing in stream order).

use proptest::prelude::*;

use crate::lexer::Lexer;
use crate::token::TokenKind;

proptest! {
    /// Lexer totality: any byte string tokenizes to a stream ending in
    /// exactly one EndOfFile.
    #[test]
    fn lexer_is_total(source in "\\PC*") {
        let tokens = Lexer::tokenize(&source);
        prop_assert!(!tokens.is_empty());
        prop_assert_eq!(tokens.last().unwrap().kind, TokenKind::EndOfFile);
        let eofs = tokens.iter().filter(|t| t.kind == TokenKind::EndOfFile).count();
        prop_assert_eq!(eofs, 1);
    }

    /// Positions: every token has column >= 1 and (line, column) pairs
    /// are monotone nondecreasing across the stream.
    #[test]
    fn positions_are_monotone(source in "[ -~\\n]{0,200}") {
        let tokens = Lexer::tokenize(&source);
        let mut prev = (0u32, 0u32);
        for tok in &tokens {
            prop_assert!(tok.column >= 1, "token {:?} has column 0", tok);
            prop_assert!(tok.line >= 1);
            let cur = (tok.line, tok.column);
            prop_assert!(cur >= prev, "positions went backwards: {prev:?} -> {cur:?}");
            prev = cur;
        }
    }

    /// Tokenizing the same input twice yields identical streams.
    #[test]
    fn lexing_is_deterministic(source in "[ -~\\n]{0,200}") {
        prop_assert_eq!(Lexer::tokenize(&source), Lexer::tokenize(&source));
    }
}

#[test]
fn pragma_followed_by_code_on_next_line() {
    let tokens = Lexer::tokenize("#pragma paradigm oop\nclass A {}");
    assert_eq!(tokens[0].kind, TokenKind::Pragma);
    assert_eq!(tokens[1].kind, TokenKind::Class);
}

#[test]
fn crlf_line_endings() {
    let tokens = Lexer::tokenize("let a;\r\nlet b;");
    let lets: Vec<_> = tokens.iter().filter(|t| t.kind == TokenKind::Let).collect();
    assert_eq!(lets.len(), 2);
    assert_eq!(lets[1].line, 2);
}

#[test]
fn adjacent_operators_do_not_merge_across_kinds() {
    // `?|` is a filter head: two tokens, not a single operator.
    let tokens = Lexer::tokenize("xs ? |x| x > 1");
    assert_eq!(tokens[1].kind, TokenKind::Question);
    assert_eq!(tokens[2].kind, TokenKind::Pipe);
}

#[test]
fn bang_bang_less_binds_before_bang_bang() {
    let tokens = Lexer::tokenize("0 !!< 10");
    assert_eq!(tokens[1].kind, TokenKind::BangBangLess);
}

#[test]
fn dollar_and_backslash_are_single_tokens() {
    let tokens = Lexer::tokenize("$ \\");
    assert_eq!(tokens[0].kind, TokenKind::Dollar);
    assert_eq!(tokens[1].kind, TokenKind::Backslash);
}

#[test]
fn string_keeps_raw_unknown_escape() {
    let tokens = Lexer::tokenize(r#""a\qb""#);
    assert_eq!(tokens[0].lexeme, "a\\qb");
}

#[test]
fn very_long_identifier() {
    let name = "x".repeat(4096);
    let tokens = Lexer::tokenize(&name);
    assert_eq!(tokens[0].kind, TokenKind::Identifier);
    assert_eq!(tokens[0].lexeme.len(), 4096);
}
