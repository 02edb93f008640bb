//! lppc-par - Parser (Syntactic Analyzer)
//!
//! ============================================================================
//! OVERVIEW
//! ============================================================================
//!
//! Hand-written recursive descent over the token stream from `lppc-lex`,
//! producing the owned AST in [`ast`]. One token of committed lookahead
//! plus peek-next (and peek-next-next) for selective disambiguation;
//! two constructs use speculative parsing with rewind (lambda parameter
//! lists and generic call arguments).
//!
//! ============================================================================
//! GRAMMAR SHAPE
//! ============================================================================
//!
//! Informal, precedence ascending:
//!
//! ```ebnf
//! program        := PRAGMA? top_decl*
//! top_decl       := import | export | fn_decl | class_decl | interface_decl
//!                 | type_decl | enum_decl | autopattern_decl
//! expression     := ternary_if | lambda | pipeline
//! pipeline       := nullish ( '|>' nullish )*
//! nullish        := logical_or ( '??' logical_or )*
//! logical_or     := logical_and ( 'or'|'||' logical_and )*
//! logical_and    := equality ( 'and'|'&&' equality )*
//! equality       := comparison ( '=='|'!='|'==='|'!==' comparison )*
//! comparison     := symbolic_ops ( '<'|'<='|'>'|'>=' symbolic_ops )*
//! symbolic_ops   := term ( '!!' term '$' term
//!                        | '!!<' term | '!!>' term
//!                        | '~>' term '!!' term
//!                        | '@' term
//!                        | '?' '|' params '|' expr
//!                        | '\' term )*
//! term           := arith ( ('..'|'~') arith (('..'|'~') arith)? )?
//! arith          := cast  ( arith_op cast )*        (table-driven Pratt)
//! cast           := unary ( 'as' TYPE )?
//! unary          := 'await' unary | 'throw' unary
//!                 | ('++'|'--'|'!'|'-') unary | composition
//! composition    := call ( '.' call )*              (uncalled ident chains)
//! call           := primary ( '.' member | '?.' member | '[' expr ']'
//!                           | '<' type_args '>' '(' args ')'
//!                           | '(' args ')' | '++' | '--' )*
//! ```
//!
//! The `arith` tier is the one spot where fixity is data: it climbs the
//! current [`precedence::NotationContext`] table, so a `linear`
//! notation scope really does parse `1 + 2 * 3` as `(1 + 2) * 3`.
//!
//! ============================================================================
//! ERROR RECOVERY
//! ============================================================================
//!
//! Panic-mode with synchronization:
//!
//! - `error()` reports at the current token and sets `panic_mode`;
//!   while the flag is up, further reports are swallowed so one mistake
//!   does not cascade.
//! - `synchronize()` clears the flag and skips to the next statement
//!   boundary: just past a `;`, or in front of a declaration keyword
//!   (`class fn let const if while for return import export type enum
//!   interface`).
//! - `consume()` on a miss reports and fabricates a `<missing>` token
//!   of the expected kind, letting the caller proceed.
//!
//! The parser therefore always produces a `Program`; the caller decides
//! what an Error-bearing one is worth.

pub mod ast;
pub mod autopattern;
pub mod precedence;

mod expr;
mod items;
mod stmt;

#[cfg(test)]
mod edge_cases;

use lppc_lex::{Token, TokenKind};
use lppc_util::diagnostic::DiagnosticCode;
use lppc_util::{Diagnostic, Handler, Span};

use ast::{ParadigmMode, Program, Stmt};
use precedence::NotationContext;

/// Parse a token stream into a program plus the diagnostics produced
/// along the way.
///
/// # Examples
///
/// ```
/// use lppc_lex::Lexer;
/// use lppc_par::parse;
///
/// let tokens = Lexer::tokenize("#pragma paradigm hybrid\nfn main() -> int { return 0; }");
/// let (program, diagnostics) = parse(tokens);
/// assert!(diagnostics.is_empty());
/// assert_eq!(program.functions.len(), 1);
/// ```
pub fn parse(tokens: Vec<Token>) -> (Program, Vec<Diagnostic>) {
    let handler = Handler::new();
    let program = Parser::new(tokens, &handler).parse();
    (program, handler.diagnostics())
}

/// The L++ parser.
pub struct Parser<'a> {
    /// Token stream from the lexer.
    tokens: Vec<Token>,
    /// Current position in the token stream.
    position: usize,
    /// Diagnostic sink.
    handler: &'a Handler,
    /// Suppresses cascading reports until the next synchronization.
    panic_mode: bool,
    /// Stack of precedence tables consulted by the arithmetic tier.
    notation: NotationContext,
}

impl<'a> Parser<'a> {
    /// Create a parser over `tokens`, reporting into `handler`.
    ///
    /// The stream is expected to end with `EndOfFile`; a stream that
    /// does not gets one appended so lookahead stays total.
    pub fn new(tokens: Vec<Token>, handler: &'a Handler) -> Self {
        let mut tokens = tokens;
        if tokens.last().map(|t| t.kind) != Some(TokenKind::EndOfFile) {
            let (line, column) = tokens
                .last()
                .map(|t| (t.line, t.column))
                .unwrap_or((1, 1));
            tokens.push(Token::eof(line, column));
        }
        Self {
            tokens,
            position: 0,
            handler,
            panic_mode: false,
            notation: NotationContext::new(),
        }
    }

    /// Parse a complete program.
    pub fn parse(&mut self) -> Program {
        let paradigm = self.parse_paradigm_pragma();
        let mut program = Program::empty(paradigm);

        while !self.is_at_end() {
            // Each declaration is a fresh recovery region.
            self.panic_mode = false;

            if self.check(TokenKind::Pragma) {
                self.handle_secondary_pragma();
                continue;
            }
            if self.check(TokenKind::Import) {
                let stmt = self.import_statement();
                program.imports.push(stmt);
            } else if self.check(TokenKind::Export) {
                let stmt = self.export_statement();
                program.exports.push(stmt);
            } else if self.check(TokenKind::Fn) || self.check(TokenKind::Async) {
                let func = self.function();
                program.functions.push(func);
            } else if self.check(TokenKind::Autopattern) {
                // autopattern <ProblemKind> <ClassName>;
                self.advance();
                let problem =
                    self.consume(TokenKind::Identifier, "Expected problem type after 'autopattern'");
                let class_name =
                    self.consume(TokenKind::Identifier, "Expected class name after problem type");
                self.consume(
                    TokenKind::Semicolon,
                    "Expected ';' after autopattern declaration",
                );
                let class =
                    autopattern::expand_auto_pattern(&problem.lexeme, &class_name.lexeme);
                program.classes.push(class);
            } else if self.check(TokenKind::Class) || self.check(TokenKind::At) {
                let class = self.class_declaration();
                program.classes.push(class);
            } else if self.check(TokenKind::Interface) {
                let iface = self.interface_declaration();
                program.interfaces.push(iface);
            } else if self.check(TokenKind::Type) {
                let decl = self.type_declaration();
                program.types.push(decl);
            } else if self.check(TokenKind::Enum) {
                let decl = self.enum_declaration();
                program.enums.push(decl);
            } else {
                self.error("Expected function, class, interface, type, or enum declaration");
                self.synchronize();
            }
        }

        program
    }

    /// The mandatory `#pragma paradigm <mode>` directive. Missing or
    /// malformed directives report an Error and recover with `Hybrid`.
    fn parse_paradigm_pragma(&mut self) -> ParadigmMode {
        if self.check(TokenKind::Pragma) {
            let pragma = self.advance();
            let words: Vec<&str> = pragma.lexeme.split_whitespace().collect();
            match words.as_slice() {
                ["pragma", "paradigm", mode, ..] => match ParadigmMode::from_word(mode) {
                    Some(paradigm) => return paradigm,
                    None => {
                        self.error(&format!(
                            "Invalid paradigm mode '{mode}'. Expected: hybrid, functional, imperative, oop, or golfed"
                        ));
                    }
                },
                ["pragma", "paradigm"] => {
                    self.error("Expected paradigm mode after 'paradigm'");
                }
                _ => {
                    self.error("Expected 'paradigm' keyword in pragma directive");
                }
            }
            // Recovered below with the default.
        } else {
            self.error(
                "Missing paradigm declaration. Add '#pragma paradigm <mode>' at the beginning of the file.",
            );
        }
        self.panic_mode = false;
        ParadigmMode::Hybrid
    }

    /// Pragmas after the first one. Notation directives push and pop
    /// precedence scopes; anything else is a syntax error.
    ///
    /// Syntax: `#pragma notation linear|math|pop` or
    /// `#pragma notation custom <name>`.
    fn handle_secondary_pragma(&mut self) {
        let pragma = self.advance();
        let words: Vec<&str> = pragma.lexeme.split_whitespace().collect();
        match words.as_slice() {
            ["pragma", "notation", "linear"] => self.notation.push_linear(),
            ["pragma", "notation", "math"] => self.notation.push_math(),
            ["pragma", "notation", "pop"] => self.notation.pop(),
            ["pragma", "notation", "custom", name] => self.notation.push_custom(*name),
            ["pragma", "notation", mode, ..] => {
                self.error(&format!(
                    "Invalid notation mode '{mode}'. Expected: linear, math, custom, or pop"
                ));
                self.panic_mode = false;
            }
            ["pragma", "paradigm", ..] => {
                self.error("Duplicate paradigm pragma; the paradigm is fixed at the top of the file");
                self.panic_mode = false;
            }
            _ => {
                self.error("Unknown pragma directive");
                self.panic_mode = false;
            }
        }
    }

    // ── Token stream primitives ────────────────────────────────────────

    pub(crate) fn peek(&self) -> &Token {
        &self.tokens[self.position.min(self.tokens.len() - 1)]
    }

    pub(crate) fn peek_at(&self, offset: usize) -> &Token {
        let idx = (self.position + offset).min(self.tokens.len() - 1);
        &self.tokens[idx]
    }

    pub(crate) fn peek_next(&self) -> &Token {
        self.peek_at(1)
    }

    pub(crate) fn previous(&self) -> &Token {
        &self.tokens[self.position.saturating_sub(1)]
    }

    pub(crate) fn advance(&mut self) -> Token {
        if !self.is_at_end() {
            self.position += 1;
        }
        self.previous().clone()
    }

    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        !self.is_at_end() && self.peek().kind == kind
    }

    /// Consume the current token if it has the given kind.
    pub(crate) fn eat(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            return true;
        }
        false
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::EndOfFile
    }

    /// Expect a token of `kind`; on a miss, report and fabricate a
    /// `<missing>` token so parsing can continue.
    pub(crate) fn consume(&mut self, kind: TokenKind, message: &str) -> Token {
        if self.check(kind) {
            return self.advance();
        }
        self.error(message);
        let at = self.peek();
        Token::missing(kind, at.line, at.column)
    }

    /// Current position for rewinding speculative parses.
    pub(crate) fn mark(&self) -> usize {
        self.position
    }

    /// Rewind to a mark taken earlier.
    pub(crate) fn rewind(&mut self, mark: usize) {
        self.position = mark;
    }

    pub(crate) fn span_here(&self) -> Span {
        let t = self.peek();
        Span::new(t.line, t.column)
    }

    // ── Error handling ─────────────────────────────────────────────────

    /// Report a syntax error at the current token. While in panic mode
    /// further reports are suppressed.
    pub(crate) fn error(&mut self, message: &str) {
        if self.panic_mode {
            return;
        }
        self.panic_mode = true;

        let span = self.span_here();
        let mut builder = self
            .handler
            .build_error(span, message)
            .code(DiagnosticCode::SYNTAX);

        if message.contains("Expected ';'") {
            builder = builder.help("Did you forget a semicolon?");
        } else if message.contains("Expected ')'") {
            builder = builder.help("Make sure all parentheses are balanced.");
        } else if message.contains("Expected '}'") {
            builder = builder.help("Make sure all braces are balanced.");
        } else if message.contains("paradigm") {
            builder = builder.help("Add '#pragma paradigm hybrid' at the top of your file.");
        }

        if message.contains("paradigm") {
            builder = builder.code(DiagnosticCode::PRAGMA);
        }

        builder.emit(self.handler);
    }

    /// Leave panic mode at a recovery boundary.
    pub(crate) fn clear_panic(&mut self) {
        self.panic_mode = false;
    }

    /// Skip to the next statement boundary and leave panic mode.
    pub(crate) fn synchronize(&mut self) {
        self.panic_mode = false;
        self.advance();

        while !self.is_at_end() {
            if self.previous().kind == TokenKind::Semicolon {
                return;
            }
            match self.peek().kind {
                TokenKind::Class
                | TokenKind::Fn
                | TokenKind::Let
                | TokenKind::Const
                | TokenKind::If
                | TokenKind::While
                | TokenKind::For
                | TokenKind::Return
                | TokenKind::Import
                | TokenKind::Export
                | TokenKind::Type
                | TokenKind::Enum
                | TokenKind::Interface => return,
                _ => {}
            }
            self.advance();
        }
    }

    // ── Blocks ─────────────────────────────────────────────────────────

    /// `{ statement* }`. With `enable_implicit_return`, a trailing
    /// expression statement is rewritten to a return of the same
    /// expression (applying the rewrite twice is a no-op).
    pub(crate) fn block(&mut self, enable_implicit_return: bool) -> Vec<Stmt> {
        self.consume(TokenKind::LBrace, "Expected '{'");

        let mut statements = Vec::new();
        while !self.check(TokenKind::RBrace) && !self.is_at_end() {
            statements.push(self.statement());
        }

        self.consume(TokenKind::RBrace, "Expected '}'");

        if enable_implicit_return {
            // Yields stay yields: a generator's trailing `yield` must
            // not turn into `return yield`.
            let rewrite = matches!(
                statements.last(),
                Some(Stmt::Expr(e)) if !matches!(e, ast::Expr::Yield(_))
            );
            if rewrite {
                if let Some(Stmt::Expr(expr)) = statements.pop() {
                    statements.push(Stmt::Return(Some(expr)));
                }
            }
        }

        statements
    }

    pub(crate) fn notation(&mut self) -> &mut NotationContext {
        &mut self.notation
    }
}
