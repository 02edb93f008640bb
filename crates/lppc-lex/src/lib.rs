//! lppc-lex - Lexical Analyzer (Lexer/Tokenizer)
//!
//! ============================================================================
//! OVERVIEW
//! ============================================================================
//!
//! First phase of the pipeline: UTF-8 source text in, token stream out.
//!
//! ```text
//! Source: "let x = 42;"
//!
//! Tokens: [Let] [Identifier("x")] [Equal] [Number("42")] [Semicolon] [EndOfFile]
//!         (whitespace skipped)
//! ```
//!
//! The implementation is direct-coded (one function per token family,
//! dispatched on the first character) rather than table-driven. Single
//! pass, no backtracking; a position counter tracks 1-based line/column
//! and advances on `\n`.
//!
//! ============================================================================
//! TOKEN CATEGORIES
//! ============================================================================
//!
//! 1. KEYWORDS - reserved words, promoted from identifier form through
//!    the keyword table (`let`, `fn`, `class`, `match`, `async`, `await`,
//!    `quantum`, `observe`, `entangle`, ...). The paradigm mode words
//!    stay identifiers; they only mean something inside a pragma.
//!
//! 2. IDENTIFIERS - `[A-Za-z_][A-Za-z0-9_]*`.
//!
//! 3. LITERALS - numbers (digits, optional fraction), double-quoted
//!    strings with `\n \t \r \\ \" \0` escapes.
//!
//! 4. OPERATORS - longest match, three chars before two before one:
//!    `===` `!==` `>>>` `...` `!!<` `!!>` `??=` `&&=` `||=` `**=` then
//!    `==` `!=` `<=` `>=` `->` `=>` `<-` `<<` `>>` `++` `--` `+=` `-=`
//!    `*=` `/=` `%=` `**` `&&` `||` `??` `?.` `|>` `~>` `!!` `..` then
//!    single characters.
//!
//! 5. PRAGMAS - a `#` at column 1 turns the rest of the line into one
//!    `Pragma` token.
//!
//! 6. SPECIAL - `Backtick` flips the parser into template-literal mode
//!    (the lexer keeps tokenizing normally between the backticks);
//!    `Invalid` carries anything unclassifiable; exactly one
//!    `EndOfFile` closes every stream.
//!
//! ============================================================================
//! ERROR RECOVERY
//! ============================================================================
//!
//! The lexer is total. It never throws, never reports, never stops
//! early:
//!
//! - unknown byte        -> `Invalid` token holding the byte, continue
//! - unterminated string -> `Invalid` token with explanatory lexeme,
//!                          cursor at end of file
//! - unterminated block comment -> consumed to end of file, no token
//!
//! Diagnostics about `Invalid` tokens are the parser's business.

pub mod cursor;
pub mod lexer;
pub mod token;

#[cfg(test)]
mod edge_cases;

pub use lexer::Lexer;
pub use token::{keyword_from_ident, Token, TokenKind};

/// Tokenize a source string.
///
/// Convenience wrapper over [`Lexer::tokenize`].
///
/// # Examples
///
/// ```
/// use lppc_lex::{tokenize, TokenKind};
///
/// let tokens = tokenize("1 |> inc");
/// assert_eq!(tokens[1].kind, TokenKind::PipeGt);
/// ```
pub fn tokenize(source: &str) -> Vec<Token> {
    Lexer::tokenize(source)
}
