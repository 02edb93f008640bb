//! Statement parsing.
//!
//! Statement dispatch mirrors the declaration keywords; the only
//! lookahead subtleties are `let [ / { / (` beginning destructuring and
//! the identifier-then-`=` check that separates assignments from
//! expression statements.

use lppc_lex::TokenKind;
use lppc_util::Span;

use crate::ast::{CaseClause, DestructureKind, Expr, Stmt, VarDecl};
use crate::Parser;

impl<'a> Parser<'a> {
    /// Parse one statement.
    pub(crate) fn statement(&mut self) -> Stmt {
        // Cascade suppression is per statement: a bad statement stays
        // quiet after its first report, the next one reports again.
        self.clear_panic();

        if self.eat(TokenKind::Quantum) {
            return self.quantum_var_declaration();
        }
        if self.eat(TokenKind::Let) {
            return self.var_declaration();
        }
        if self.eat(TokenKind::If) {
            return self.if_statement();
        }
        if self.eat(TokenKind::While) {
            return self.while_statement();
        }
        if self.eat(TokenKind::For) {
            return self.for_statement();
        }
        if self.eat(TokenKind::Do) {
            return self.do_while_statement();
        }
        if self.eat(TokenKind::Switch) {
            return self.switch_statement();
        }
        if self.eat(TokenKind::Try) {
            return self.try_catch_statement();
        }
        if self.check(TokenKind::Enum) {
            return self.enum_declaration();
        }
        if self.eat(TokenKind::Break) {
            self.consume(TokenKind::Semicolon, "Expected ';' after 'break'");
            return Stmt::Break;
        }
        if self.eat(TokenKind::Continue) {
            self.consume(TokenKind::Semicolon, "Expected ';' after 'continue'");
            return Stmt::Continue;
        }
        if self.eat(TokenKind::Return) || self.eat(TokenKind::ArrowLeft) {
            return self.return_statement();
        }

        // Assignment vs expression statement.
        if self.check(TokenKind::Identifier) {
            let mark = self.mark();
            let name_tok = self.advance();
            let span = Span::new(name_tok.line, name_tok.column);

            if self.eat(TokenKind::Equal) {
                let value = self.expression();
                self.consume(TokenKind::Semicolon, "Expected ';' after assignment");
                return Stmt::Assignment {
                    name: name_tok.lexeme,
                    value,
                    span,
                };
            }

            // Compound assignment desugars: x += 5 becomes x = x + 5.
            if matches!(
                self.peek().kind,
                TokenKind::PlusEqual
                    | TokenKind::MinusEqual
                    | TokenKind::StarEqual
                    | TokenKind::SlashEqual
            ) {
                let op_tok = self.advance();
                let op = op_tok.lexeme[..op_tok.lexeme.len() - 1].to_string();
                let value = self.expression();
                self.consume(TokenKind::Semicolon, "Expected ';' after compound assignment");

                let var = Expr::Identifier {
                    name: name_tok.lexeme.clone(),
                    span,
                };
                return Stmt::Assignment {
                    name: name_tok.lexeme,
                    value: Expr::Binary {
                        left: Box::new(var),
                        op,
                        right: Box::new(value),
                        span,
                    },
                    span,
                };
            }

            self.rewind(mark);
        }

        self.expression_statement()
    }

    /// After `let`: destructuring or a variable declaration with its
    /// type annotations (`mut`, `T[]`, `T[N]`, `T?`, `A | B`).
    pub(crate) fn var_declaration(&mut self) -> Stmt {
        let is_mutable = self.eat(TokenKind::Mut);

        // Destructuring: let [a, b] = arr; let {x, y} = obj; let (a, b) = t;
        if self.check(TokenKind::LBracket)
            || self.check(TokenKind::LBrace)
            || self.check(TokenKind::LParen)
        {
            return self.destructuring_declaration();
        }

        let name = self.consume(TokenKind::Identifier, "Expected variable name");
        let span = Span::new(name.line, name.column);

        let mut ty = String::from("auto");
        let mut is_array_type = false;
        let mut array_size = None;
        let mut is_nullable = false;
        let mut union_types = Vec::new();

        if self.eat(TokenKind::Colon) {
            ty = self.advance().lexeme;

            // Array type: int[] or int[10]
            if self.eat(TokenKind::LBracket) {
                is_array_type = true;
                if self.check(TokenKind::Number) {
                    let size_tok = self.advance();
                    match size_tok.lexeme.parse::<f64>() {
                        Ok(n) if n >= 0.0 => array_size = Some(n as usize),
                        _ => {
                            self.error(&format!("Invalid array size: {}", size_tok.lexeme));
                            array_size = Some(0);
                        }
                    }
                }
                self.consume(TokenKind::RBracket, "Expected ']' after array type");
            }

            // Nullable: int?
            if self.eat(TokenKind::Question) {
                is_nullable = true;
            }

            // Union: int | string | bool
            if self.eat(TokenKind::Pipe) {
                union_types.push(ty.clone());
                loop {
                    union_types.push(self.advance().lexeme);
                    if !self.eat(TokenKind::Pipe) {
                        break;
                    }
                }
            }
        }

        if is_mutable {
            ty = format!("mut {ty}");
        }

        let initializer = if self.eat(TokenKind::Equal) {
            Some(self.expression())
        } else {
            None
        };

        self.consume(TokenKind::Semicolon, "Expected ';' after variable declaration");

        Stmt::VarDecl(VarDecl {
            name: name.lexeme,
            ty,
            initializer,
            is_array_type,
            array_size,
            is_nullable,
            union_types,
            span,
        })
    }

    fn destructuring_declaration(&mut self) -> Stmt {
        let kind = match self.peek().kind {
            TokenKind::LBracket => DestructureKind::Array,
            TokenKind::LBrace => DestructureKind::Object,
            _ => DestructureKind::Tuple,
        };
        self.advance(); // consume [, { or (

        let mut targets = Vec::new();
        loop {
            let target = self.consume(TokenKind::Identifier, "Expected identifier in destructuring");
            targets.push(target.lexeme);
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }

        match kind {
            DestructureKind::Array => {
                self.consume(TokenKind::RBracket, "Expected ']' after array destructuring");
            }
            DestructureKind::Object => {
                self.consume(TokenKind::RBrace, "Expected '}' after object destructuring");
            }
            DestructureKind::Tuple => {
                self.consume(TokenKind::RParen, "Expected ')' after tuple destructuring");
            }
        }

        self.consume(TokenKind::Equal, "Expected '=' after destructuring pattern");
        let source = self.expression();
        self.consume(TokenKind::Semicolon, "Expected ';' after destructuring");

        Stmt::Destructuring {
            targets,
            source,
            kind,
        }
    }

    /// `quantum let x = [states];` or weighted `quantum let x = {v: p};`.
    /// Weights are normalized here; a state/weight count mismatch is an
    /// error and falls back to uniform.
    fn quantum_var_declaration(&mut self) -> Stmt {
        self.consume(TokenKind::Let, "Expected 'let' after 'quantum'");
        let name = self.consume(TokenKind::Identifier, "Expected quantum variable name");
        let span = Span::new(name.line, name.column);

        let ty = if self.eat(TokenKind::Colon) {
            self.advance().lexeme
        } else {
            String::from("auto")
        };

        self.consume(TokenKind::Equal, "Expected '=' in quantum variable declaration");

        let mut states = Vec::new();
        let mut weights: Option<Vec<f64>> = None;

        if self.eat(TokenKind::LBracket) {
            // Uniform superposition: [1, 2, 3]
            if !self.check(TokenKind::RBracket) {
                loop {
                    states.push(self.expression());
                    if !self.eat(TokenKind::Comma) {
                        break;
                    }
                }
            }
            self.consume(TokenKind::RBracket, "Expected ']' after quantum states");
        } else if self.eat(TokenKind::LBrace) {
            // Weighted superposition: {value: prob, ...}
            let mut probs = Vec::new();
            if !self.check(TokenKind::RBrace) {
                loop {
                    states.push(self.expression());
                    self.consume(TokenKind::Colon, "Expected ':' after quantum state value");
                    let prob_tok =
                        self.consume(TokenKind::Number, "Expected probability (number) after ':'");
                    match prob_tok.lexeme.parse::<f64>() {
                        Ok(p) => probs.push(p),
                        Err(_) => {
                            self.error(&format!("Invalid probability value: {}", prob_tok.lexeme));
                            probs.push(0.0);
                        }
                    }
                    if !self.eat(TokenKind::Comma) {
                        break;
                    }
                }
            }
            self.consume(TokenKind::RBrace, "Expected '}' after weighted quantum states");

            weights = self.normalize_weights(states.len(), probs);
        } else {
            self.error("Expected '[' or '{' for quantum variable initialization");
        }

        self.consume(TokenKind::Semicolon, "Expected ';' after quantum variable declaration");

        Stmt::QuantumVarDecl {
            name: name.lexeme,
            ty,
            states,
            weights,
            span,
        }
    }

    /// Normalize a weight vector to sum 1. Mismatched lengths or an
    /// all-zero vector degrade to uniform (no weights).
    fn normalize_weights(&mut self, state_count: usize, probs: Vec<f64>) -> Option<Vec<f64>> {
        if probs.len() != state_count {
            self.error("Quantum state and weight counts do not match");
            return None;
        }
        let sum: f64 = probs.iter().sum();
        if sum <= 0.0 {
            return None;
        }
        Some(probs.into_iter().map(|p| p / sum).collect())
    }

    fn if_statement(&mut self) -> Stmt {
        self.consume(TokenKind::LParen, "Expected '(' after 'if'");
        let condition = self.expression();
        self.consume(TokenKind::RParen, "Expected ')' after condition");

        let then_branch = self.block(false);
        let else_branch = if self.eat(TokenKind::Else) {
            self.block(false)
        } else {
            Vec::new()
        };

        Stmt::If {
            condition,
            then_branch,
            else_branch,
        }
    }

    fn while_statement(&mut self) -> Stmt {
        self.consume(TokenKind::LParen, "Expected '(' after 'while'");
        let condition = self.expression();
        self.consume(TokenKind::RParen, "Expected ')' after condition");
        let body = self.block(false);

        Stmt::While { condition, body }
    }

    /// `for (var in iterable)`, `for (var of iterable)` or the classic
    /// `for (init; cond; inc)`.
    fn for_statement(&mut self) -> Stmt {
        self.consume(TokenKind::LParen, "Expected '(' after 'for'");

        // For-in: for (x in xs) / for (let x in xs)
        let mark = self.mark();
        self.eat(TokenKind::Let);
        if self.check(TokenKind::Identifier) {
            let var = self.advance();
            if self.eat(TokenKind::In) || self.eat(TokenKind::Of) {
                let iterable = self.expression();
                self.consume(TokenKind::RParen, "Expected ')' after for-in");
                let body = self.block(false);
                return Stmt::ForIn {
                    variable: var.lexeme,
                    iterable,
                    body,
                };
            }
        }
        self.rewind(mark);

        // Classic: for (init; cond; inc)
        let initializer = if self.check(TokenKind::Semicolon) {
            self.advance();
            None
        } else if self.eat(TokenKind::Let) {
            Some(Box::new(self.var_declaration()))
        } else {
            Some(Box::new(self.expression_statement()))
        };

        let condition = if self.check(TokenKind::Semicolon) {
            None
        } else {
            Some(self.expression())
        };
        self.consume(TokenKind::Semicolon, "Expected ';' after for condition");

        let increment = if self.check(TokenKind::RParen) {
            None
        } else {
            Some(self.expression())
        };
        self.consume(TokenKind::RParen, "Expected ')' after for clauses");

        let body = self.block(false);
        Stmt::For {
            initializer,
            condition,
            increment,
            body,
        }
    }

    fn do_while_statement(&mut self) -> Stmt {
        let body = self.block(false);
        self.consume(TokenKind::While, "Expected 'while' after do block");
        self.consume(TokenKind::LParen, "Expected '(' after 'while'");
        let condition = self.expression();
        self.consume(TokenKind::RParen, "Expected ')' after condition");
        self.consume(TokenKind::Semicolon, "Expected ';' after do-while");

        Stmt::DoWhile { body, condition }
    }

    /// Switch with case/default arms; a case value may carry a `when`
    /// guard before the colon.
    fn switch_statement(&mut self) -> Stmt {
        self.consume(TokenKind::LParen, "Expected '(' after 'switch'");
        let condition = self.expression();
        self.consume(TokenKind::RParen, "Expected ')' after switch condition");
        self.consume(TokenKind::LBrace, "Expected '{' after switch condition");

        let mut cases = Vec::new();

        while !self.check(TokenKind::RBrace) && !self.is_at_end() {
            if self.eat(TokenKind::Case) {
                let value = self.expression();
                let guard = if self.eat(TokenKind::When) {
                    Some(self.expression())
                } else {
                    None
                };
                self.consume(TokenKind::Colon, "Expected ':' after case value");

                let statements = self.case_body();
                cases.push(CaseClause {
                    value: Some(value),
                    guard,
                    statements,
                    is_default: false,
                });
            } else if self.eat(TokenKind::Default) {
                self.consume(TokenKind::Colon, "Expected ':' after 'default'");
                let statements = self.case_body();
                cases.push(CaseClause {
                    value: None,
                    guard: None,
                    statements,
                    is_default: true,
                });
            } else {
                self.error("Expected 'case' or 'default' in switch statement");
                self.advance();
            }
        }

        self.consume(TokenKind::RBrace, "Expected '}' after switch cases");
        Stmt::Switch { condition, cases }
    }

    fn case_body(&mut self) -> Vec<Stmt> {
        let mut statements = Vec::new();
        while !self.check(TokenKind::Case)
            && !self.check(TokenKind::Default)
            && !self.check(TokenKind::RBrace)
            && !self.is_at_end()
        {
            statements.push(self.statement());
        }
        statements
    }

    /// `try { } catch (e) { } finally { }` - catch variable and finally
    /// are optional.
    fn try_catch_statement(&mut self) -> Stmt {
        let try_block = self.block(false);

        let mut catch_var = String::new();
        let mut catch_block = Vec::new();
        if self.eat(TokenKind::Catch) {
            if self.eat(TokenKind::LParen) {
                let var = self.consume(TokenKind::Identifier, "Expected variable name in catch");
                catch_var = var.lexeme;
                self.consume(TokenKind::RParen, "Expected ')' after catch variable");
            }
            catch_block = self.block(false);
        }

        let finally_block = if self.eat(TokenKind::Finally) {
            self.block(false)
        } else {
            Vec::new()
        };

        Stmt::TryCatch {
            try_block,
            catch_var,
            catch_block,
            finally_block,
        }
    }

    fn return_statement(&mut self) -> Stmt {
        let value = if self.check(TokenKind::Semicolon) {
            None
        } else {
            Some(self.expression())
        };
        self.consume(TokenKind::Semicolon, "Expected ';' after return statement");
        Stmt::Return(value)
    }

    pub(crate) fn expression_statement(&mut self) -> Stmt {
        let expr = self.expression();
        self.consume(TokenKind::Semicolon, "Expected ';' after expression");
        Stmt::Expr(expr)
    }
}
