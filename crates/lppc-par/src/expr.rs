//! Expression parsing.
//!
//! The ladder runs ternary-if / lambda / pipeline at the top, down
//! through nullish, logical, equality, comparison, the symbolic
//! operator tier, ranges, and the table-driven arithmetic tier, into
//! casts, unaries, composition, calls and primaries.
//!
//! Disambiguations handled here:
//!
//! - a leading `?` begins a ternary; a postfix `?` begins a filter only
//!   when directly followed by `|`;
//! - `ident ->` and `(params) ->` / `=>` are lambdas, recognized
//!   speculatively with rewind;
//! - `<` after an identifier enters a speculative generic-call arm that
//!   rewinds on failure;
//! - inside `(`, a `,` forces a tuple and `() ->` forces a lambda;
//! - `f . g` chains of uncalled identifiers are composition, while
//!   `obj.method(...)` stays member access.

use lppc_lex::TokenKind;
use lppc_util::Span;

use crate::ast::{Expr, Param};
use crate::precedence::Assoc;
use crate::Parser;

impl<'a> Parser<'a> {
    /// Top-level expression entry point.
    pub(crate) fn expression(&mut self) -> Expr {
        // Ternary if: ?cond -> a $ b
        if self.eat(TokenKind::Question) {
            let condition = self.nullish_coalescing();
            self.consume(TokenKind::Arrow, "Expected '->' after condition in ternary if");
            let then_expr = self.nullish_coalescing();

            let else_expr = if self.eat(TokenKind::Dollar) {
                Some(Box::new(self.expression()))
            } else {
                None
            };
            return Expr::TernaryIf {
                condition: Box::new(condition),
                then_expr: Box::new(then_expr),
                else_expr,
            };
        }

        // Single-parameter lambda: x -> expr or x => expr
        if self.check(TokenKind::Identifier)
            && matches!(
                self.peek_next().kind,
                TokenKind::Arrow | TokenKind::FatArrow
            )
        {
            let param = self.advance();
            self.advance(); // arrow
            let body = self.expression();
            return Expr::Lambda {
                params: vec![Param::new(param.lexeme, "")],
                body: Box::new(body),
                return_type: String::new(),
                rest_param: None,
            };
        }

        // Parenthesized lambda, recognized speculatively.
        if self.check(TokenKind::LParen) {
            if let Some(lambda) = self.try_paren_lambda() {
                return lambda;
            }
        }

        // Pipeline: expr |> fn |> fn
        let expr = self.nullish_coalescing();
        if self.eat(TokenKind::PipeGt) {
            let mut stages = Vec::new();
            loop {
                stages.push(self.nullish_coalescing());
                if !self.eat(TokenKind::PipeGt) {
                    break;
                }
            }
            return Expr::Pipeline {
                initial: Box::new(expr),
                stages,
            };
        }

        expr
    }

    /// `(a, b: int) -> expr`, `(...rest) => expr`, `() -> expr`.
    /// Returns `None` (with the stream rewound) when the parens turn
    /// out to be grouping or a tuple.
    fn try_paren_lambda(&mut self) -> Option<Expr> {
        let mark = self.mark();
        self.advance(); // consume '('

        let mut params = Vec::new();
        let mut rest_param = None;

        if !self.check(TokenKind::RParen) {
            loop {
                if self.eat(TokenKind::DotDotDot) {
                    if self.check(TokenKind::Identifier) {
                        rest_param = Some(self.advance().lexeme);
                        break; // rest param must be last
                    }
                    self.rewind(mark);
                    return None;
                }

                if self.check(TokenKind::Identifier) {
                    let name = self.advance().lexeme;
                    let ty = if self.eat(TokenKind::Colon) {
                        self.advance().lexeme
                    } else {
                        String::new()
                    };
                    params.push(Param::new(name, ty));
                } else {
                    self.rewind(mark);
                    return None;
                }

                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
        }

        if self.eat(TokenKind::RParen)
            && (self.eat(TokenKind::Arrow) || self.eat(TokenKind::FatArrow))
        {
            let body = self.expression();
            return Some(Expr::Lambda {
                params,
                body: Box::new(body),
                return_type: String::new(),
                rest_param,
            });
        }

        self.rewind(mark);
        None
    }

    /// `a ?? b` - right operand tried only when the left is null.
    fn nullish_coalescing(&mut self) -> Expr {
        let mut expr = self.logical_or();
        while self.check(TokenKind::QuestionQuestion) {
            let op = self.advance();
            let right = self.logical_or();
            expr = Expr::Binary {
                left: Box::new(expr),
                op: "??".into(),
                right: Box::new(right),
                span: Span::new(op.line, op.column),
            };
        }
        expr
    }

    fn logical_or(&mut self) -> Expr {
        let mut expr = self.logical_and();
        while self.check(TokenKind::Or) || self.check(TokenKind::PipePipe) {
            let op = self.advance();
            let right = self.logical_and();
            expr = Expr::Binary {
                left: Box::new(expr),
                op: op.lexeme,
                right: Box::new(right),
                span: Span::new(op.line, op.column),
            };
        }
        expr
    }

    fn logical_and(&mut self) -> Expr {
        let mut expr = self.equality();
        while self.check(TokenKind::And) || self.check(TokenKind::AmpAmp) {
            let op = self.advance();
            let right = self.equality();
            expr = Expr::Binary {
                left: Box::new(expr),
                op: op.lexeme,
                right: Box::new(right),
                span: Span::new(op.line, op.column),
            };
        }
        expr
    }

    fn equality(&mut self) -> Expr {
        let mut expr = self.comparison();
        while matches!(
            self.peek().kind,
            TokenKind::EqualEqual
                | TokenKind::BangEqual
                | TokenKind::EqualEqualEqual
                | TokenKind::BangEqualEqual
        ) {
            let op = self.advance();
            let right = self.comparison();
            expr = Expr::Binary {
                left: Box::new(expr),
                op: op.lexeme,
                right: Box::new(right),
                span: Span::new(op.line, op.column),
            };
        }
        expr
    }

    fn comparison(&mut self) -> Expr {
        let mut expr = self.symbolic_ops();
        while matches!(
            self.peek().kind,
            TokenKind::Less
                | TokenKind::LessEqual
                | TokenKind::Greater
                | TokenKind::GreaterEqual
        ) {
            let op = self.advance();
            let right = self.symbolic_ops();
            expr = Expr::Binary {
                left: Box::new(expr),
                op: op.lexeme,
                right: Box::new(right),
                span: Span::new(op.line, op.column),
            };
        }
        expr
    }

    /// The symbolic operator tier: iterate-while, auto-iterate,
    /// iterate-step, map, filter, reduce.
    fn symbolic_ops(&mut self) -> Expr {
        let mut expr = self.term();

        loop {
            // Iterate-while: start !! condition $ stepFn
            if self.eat(TokenKind::BangBang) {
                let condition = self.term();
                if self.eat(TokenKind::Dollar) {
                    let step_fn = self.term();
                    expr = Expr::IterateWhile {
                        start: Box::new(expr),
                        condition: Box::new(condition),
                        step_fn: Box::new(step_fn),
                    };
                    continue;
                }
                self.error("Expected '$' after condition in iterate-while expression");
                break;
            }

            // Auto-iterate: start !!< limit / start !!> limit
            if self.eat(TokenKind::BangBangLess) {
                let limit = self.term();
                expr = Expr::AutoIterate {
                    start: Box::new(expr),
                    limit: Box::new(limit),
                    is_increment: true,
                };
                continue;
            }
            if self.eat(TokenKind::BangBangGreater) {
                let limit = self.term();
                expr = Expr::AutoIterate {
                    start: Box::new(expr),
                    limit: Box::new(limit),
                    is_increment: false,
                };
                continue;
            }

            // Iterate-step: start ~> stepFn !! condition
            if self.eat(TokenKind::TildeGt) {
                let step_fn = self.term();
                if self.eat(TokenKind::BangBang) {
                    let condition = self.term();
                    expr = Expr::IterateStep {
                        start: Box::new(expr),
                        step_fn: Box::new(step_fn),
                        condition: Box::new(condition),
                    };
                    continue;
                }
                self.error("Expected '!!' after step function in iterate-step expression");
                break;
            }

            // Map: arr @ fn
            if self.eat(TokenKind::At) {
                let func = self.term();
                expr = Expr::Map {
                    iterable: Box::new(expr),
                    func: Box::new(func),
                };
                continue;
            }

            // Filter: arr ? |x| condition  (a lone ? is a ternary)
            if self.check(TokenKind::Question) && self.peek_next().kind == TokenKind::Pipe {
                self.advance(); // consume '?'
                let predicate = self.term();
                expr = Expr::Filter {
                    iterable: Box::new(expr),
                    predicate: Box::new(predicate),
                };
                continue;
            }

            // Reduce: arr \ |acc, x| expr
            if self.eat(TokenKind::Backslash) {
                let func = self.term();
                expr = Expr::Reduce {
                    iterable: Box::new(expr),
                    func: Box::new(func),
                    initial: None,
                };
                continue;
            }

            break;
        }

        expr
    }

    /// Ranges wrap the arithmetic tier: `a..b`, `a..b..s` (also the `~`
    /// spelling).
    fn term(&mut self) -> Expr {
        let expr = self.arith(0);

        if self.eat(TokenKind::DotDot) || self.eat(TokenKind::Tilde) {
            let end = self.arith(0);
            let step = if self.eat(TokenKind::DotDot) || self.eat(TokenKind::Tilde) {
                Some(Box::new(self.arith(0)))
            } else {
                None
            };
            return Expr::Range {
                start: Box::new(expr),
                end: Box::new(end),
                step,
            };
        }

        expr
    }

    /// Table-driven Pratt climb over the arithmetic operators. The
    /// current notation scope supplies `{precedence, assoc}`, so linear
    /// mode flattens this tier to uniform left-associative parsing.
    fn arith(&mut self, min_prec: i32) -> Expr {
        let mut left = self.cast_expr();

        loop {
            let kind = self.peek().kind;
            if !is_arith_op(kind) {
                break;
            }
            let fixity = self.notation().current().fixity(kind);
            if fixity.precedence < min_prec {
                break;
            }

            let op = self.advance();
            let next_min = match fixity.assoc {
                Assoc::Right => fixity.precedence,
                Assoc::Left | Assoc::None => fixity.precedence + 1,
            };
            let right = self.arith(next_min);
            left = Expr::Binary {
                left: Box::new(left),
                op: op.lexeme,
                right: Box::new(right),
                span: Span::new(op.line, op.column),
            };
        }

        left
    }

    /// `x as T`.
    fn cast_expr(&mut self) -> Expr {
        let expr = self.unary();
        if self.eat(TokenKind::As) {
            let target = self.advance();
            return Expr::Cast {
                expr: Box::new(expr),
                target_type: target.lexeme,
            };
        }
        expr
    }

    fn unary(&mut self) -> Expr {
        if self.eat(TokenKind::Await) {
            return Expr::Await(Box::new(self.unary()));
        }
        if self.eat(TokenKind::Throw) {
            return Expr::Throw(Box::new(self.unary()));
        }
        if self.eat(TokenKind::Yield) {
            // yield; / yield expr - the bare form ends at a statement
            // or delimiter boundary.
            if matches!(
                self.peek().kind,
                TokenKind::Semicolon | TokenKind::RParen | TokenKind::RBrace | TokenKind::Comma
            ) {
                return Expr::Yield(None);
            }
            return Expr::Yield(Some(Box::new(self.expression())));
        }
        if self.eat(TokenKind::Typeof) {
            return Expr::TypeOf(Box::new(self.unary()));
        }
        if self.check(TokenKind::PlusPlus) || self.check(TokenKind::MinusMinus) {
            let op = self.advance();
            return Expr::Unary {
                op: op.lexeme,
                operand: Box::new(self.unary()),
            };
        }
        if self.check(TokenKind::Not) || self.check(TokenKind::Minus) {
            let op = self.advance();
            return Expr::Unary {
                op: op.lexeme,
                operand: Box::new(self.unary()),
            };
        }

        let expr = self.call();

        // Composition: f . g . h over uncalled identifiers. `call`
        // leaves the dot unconsumed exactly in that situation.
        if matches!(expr, Expr::Identifier { .. }) && self.check(TokenKind::Dot) {
            let mut functions = vec![expr];
            while self.check(TokenKind::Dot)
                && matches!(functions.last(), Some(Expr::Identifier { .. }))
            {
                self.advance(); // consume '.'
                functions.push(self.call());
            }
            if functions.len() > 1 {
                return Expr::Composition { functions };
            }
            return functions.pop().expect("chain has at least one element");
        }

        // instanceof binds here: expr instanceof T
        if self.eat(TokenKind::Instanceof) {
            let type_name = self.advance();
            return Expr::InstanceOf {
                expr: Box::new(expr),
                type_name: type_name.lexeme,
            };
        }

        expr
    }

    /// The postfix tier: member access, optional chaining, indexing,
    /// generic calls, calls, `++`/`--`.
    fn call(&mut self) -> Expr {
        let mut expr = self.primary();

        loop {
            if self.check(TokenKind::Dot) {
                // Bare identifier chains without a call are composition;
                // leave the dot for `unary` to collect.
                if matches!(expr, Expr::Identifier { .. })
                    && self.peek_next().kind == TokenKind::Identifier
                    && self.peek_at(2).kind != TokenKind::LParen
                {
                    break;
                }
                self.advance(); // consume '.'
                let span = self.span_here();

                // Quantum method names are keywords; allow them after a dot.
                let prop = if self.check(TokenKind::Observe) || self.check(TokenKind::Entangle) {
                    self.advance()
                } else {
                    self.consume(TokenKind::Identifier, "Expected property name after '.'")
                };

                let receiver = match &expr {
                    Expr::Identifier { name, .. } => Some(name.clone()),
                    _ => None,
                };
                if let Some(var) = receiver {
                    let method = prop.lexeme.clone();
                    if matches!(method.as_str(), "observe" | "reset" | "map")
                        && self.check(TokenKind::LParen)
                    {
                        self.advance(); // consume '('
                        let args = self.arguments();
                        self.consume(TokenKind::RParen, "Expected ')' after quantum method call");
                        expr = Expr::QuantumMethodCall { var, method, args };
                        continue;
                    }
                }

                if self.check(TokenKind::LParen) {
                    // Method call: obj.method(args)
                    self.advance();
                    let args = self.arguments();
                    self.consume(TokenKind::RParen, "Expected ')' after arguments");
                    expr = Expr::Index {
                        object: Box::new(expr),
                        index: Box::new(Expr::Call {
                            function: prop.lexeme,
                            arguments: args,
                        }),
                        is_dot: true,
                        is_optional: false,
                        span,
                    };
                } else {
                    expr = Expr::Index {
                        object: Box::new(expr),
                        index: Box::new(Expr::Identifier {
                            name: prop.lexeme,
                            span,
                        }),
                        is_dot: true,
                        is_optional: false,
                        span,
                    };
                }
                continue;
            }

            if self.eat(TokenKind::QuestionDot) {
                let span = self.span_here();
                let prop = self.consume(TokenKind::Identifier, "Expected property name after '?.'");
                expr = Expr::Index {
                    object: Box::new(expr),
                    index: Box::new(Expr::Identifier {
                        name: prop.lexeme,
                        span,
                    }),
                    is_dot: true,
                    is_optional: true,
                    span,
                };
                continue;
            }

            if self.eat(TokenKind::LBracket) {
                let span = self.span_here();
                let index = self.expression();
                self.consume(TokenKind::RBracket, "Expected ']' after index");
                expr = Expr::Index {
                    object: Box::new(expr),
                    index: Box::new(index),
                    is_dot: false,
                    is_optional: false,
                    span,
                };
                continue;
            }

            // Speculative generic call: foo<int, string>(x). Type
            // arguments are dropped after parsing; the host compiler
            // infers them.
            if self.check(TokenKind::Less) {
                if let Expr::Identifier { name, .. } = &expr {
                    let name = name.clone();
                    match self.try_generic_call(&name) {
                        Some(call) => {
                            expr = call;
                            continue;
                        }
                        // Not a generic call: let the comparison tier
                        // have the '<'.
                        None => break,
                    }
                }
            }

            if self.check(TokenKind::LParen) {
                if let Expr::Identifier { name, .. } = &expr {
                    let function = name.clone();
                    self.advance(); // consume '('
                    let arguments = self.arguments();
                    self.consume(TokenKind::RParen, "Expected ')' after arguments");
                    expr = Expr::Call {
                        function,
                        arguments,
                    };
                    continue;
                }
            }

            if self.check(TokenKind::PlusPlus) || self.check(TokenKind::MinusMinus) {
                let op = self.advance();
                expr = Expr::Postfix {
                    operand: Box::new(expr),
                    op: op.lexeme,
                };
                continue;
            }

            break;
        }

        expr
    }

    /// `<type_args>(args)` after an identifier, rewinding when the `<`
    /// turns out to be a comparison.
    fn try_generic_call(&mut self, function: &str) -> Option<Expr> {
        let mark = self.mark();
        self.advance(); // consume '<'

        if !(self.peek().kind.is_type_keyword() || self.check(TokenKind::Identifier)) {
            self.rewind(mark);
            return None;
        }

        // Type arguments are recognized and dropped; the host compiler
        // infers them at the call site.
        loop {
            if self.peek().kind.is_type_keyword() || self.check(TokenKind::Identifier) {
                self.advance();
            } else {
                self.rewind(mark);
                return None;
            }
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }

        if self.eat(TokenKind::Greater) && self.check(TokenKind::LParen) {
            self.advance(); // consume '('
            let arguments = self.arguments();
            self.consume(TokenKind::RParen, "Expected ')' after generic call arguments");
            return Some(Expr::Call {
                function: function.to_string(),
                arguments,
            });
        }

        self.rewind(mark);
        None
    }

    /// Comma-separated argument list; the caller owns the parens.
    pub(crate) fn arguments(&mut self) -> Vec<Expr> {
        let mut args = Vec::new();
        if !self.check(TokenKind::RParen) {
            loop {
                args.push(self.expression());
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
        }
        args
    }

    fn primary(&mut self) -> Expr {
        // entangle(quantumVar, transformFn)
        if self.eat(TokenKind::Entangle) {
            self.consume(TokenKind::LParen, "Expected '(' after 'entangle'");
            let var = self.consume(TokenKind::Identifier, "Expected quantum variable name");
            self.consume(TokenKind::Comma, "Expected ',' after quantum variable");
            let transform = self.expression();
            self.consume(TokenKind::RParen, "Expected ')' after entangle arguments");
            return Expr::QuantumMethodCall {
                var: var.lexeme,
                method: "entangle".into(),
                args: vec![transform],
            };
        }

        if self.eat(TokenKind::Number) {
            let lexeme = self.previous().lexeme.clone();
            return match lexeme.parse::<f64>() {
                Ok(value) => Expr::Number(value),
                Err(_) => {
                    self.error(&format!("Invalid number format: {lexeme}"));
                    Expr::Number(0.0)
                }
            };
        }

        if self.eat(TokenKind::Str) {
            return Expr::Str(self.previous().lexeme.clone());
        }

        if self.eat(TokenKind::Backtick) {
            return self.template_literal();
        }

        if self.eat(TokenKind::True) {
            return Expr::Bool(true);
        }
        if self.eat(TokenKind::False) {
            return Expr::Bool(false);
        }
        if self.eat(TokenKind::Null) || self.eat(TokenKind::Undefined) {
            return Expr::Null;
        }

        if self.eat(TokenKind::Identifier) {
            let prev = self.previous();
            return Expr::Identifier {
                name: prev.lexeme.clone(),
                span: Span::new(prev.line, prev.column),
            };
        }

        // Pipe-delimited lambda: |x| expr, |acc, x| expr
        if self.check(TokenKind::Pipe) {
            return self.pipe_lambda();
        }

        if self.eat(TokenKind::LBracket) {
            return self.array_or_comprehension();
        }

        if self.eat(TokenKind::Match) {
            return self.match_expression();
        }

        if self.eat(TokenKind::LBrace) {
            return self.object_literal();
        }

        if self.eat(TokenKind::LParen) {
            return self.tuple_or_grouping();
        }

        self.error("Expected expression");
        // Consume the offending token so the caller makes progress.
        if !self.is_at_end() {
            self.advance();
        }
        Expr::Null
    }

    /// `|params| body` - the lambda form used by filter and reduce.
    fn pipe_lambda(&mut self) -> Expr {
        self.advance(); // consume '|'
        let mut params = Vec::new();
        if !self.check(TokenKind::Pipe) {
            loop {
                let name = self.consume(TokenKind::Identifier, "Expected lambda parameter name");
                let ty = if self.eat(TokenKind::Colon) {
                    self.advance().lexeme
                } else {
                    String::new()
                };
                params.push(Param::new(name.lexeme, ty));
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.consume(TokenKind::Pipe, "Expected '|' after lambda parameters");
        let body = self.expression();
        Expr::Lambda {
            params,
            body: Box::new(body),
            return_type: String::new(),
            rest_param: None,
        }
    }

    /// Template literal contents between backticks. Word tokens
    /// accumulate into the static parts; `${expr}` opens an
    /// interpolation.
    fn template_literal(&mut self) -> Expr {
        let mut strings = Vec::new();
        let mut interpolations = Vec::new();
        let mut current = String::new();

        while !self.check(TokenKind::Backtick) && !self.is_at_end() {
            if self.check(TokenKind::Dollar) && self.peek_next().kind == TokenKind::LBrace {
                strings.push(std::mem::take(&mut current));
                self.advance(); // '$'
                self.advance(); // '{'
                interpolations.push(self.expression());
                self.consume(TokenKind::RBrace, "Expected '}' after interpolation");
            } else if matches!(
                self.peek().kind,
                TokenKind::Identifier | TokenKind::Str | TokenKind::Number
            ) {
                let lexeme = self.advance().lexeme;
                if !current.is_empty() {
                    current.push(' ');
                }
                current.push_str(&lexeme);
            } else {
                break;
            }
        }

        strings.push(current);
        self.consume(TokenKind::Backtick, "Expected '`' after template literal");

        Expr::TemplateLiteral {
            strings,
            interpolations,
        }
    }

    /// `[...]`: empty array, spread array, list comprehension, or a
    /// plain array literal.
    fn array_or_comprehension(&mut self) -> Expr {
        if self.eat(TokenKind::RBracket) {
            return Expr::Array(Vec::new());
        }

        // Leading spread commits to an array literal.
        if self.check(TokenKind::DotDotDot) {
            let mut elements = Vec::new();
            loop {
                if self.eat(TokenKind::DotDotDot) {
                    elements.push(Expr::Spread(Box::new(self.expression())));
                } else {
                    elements.push(self.expression());
                }
                if !self.eat(TokenKind::Comma) || self.check(TokenKind::RBracket) {
                    break;
                }
            }
            self.consume(TokenKind::RBracket, "Expected ']' after array elements");
            return Expr::Array(elements);
        }

        let first = self.expression();

        // `[expr | var in range, predicates]` is a comprehension.
        if self.eat(TokenKind::Pipe) {
            let variable =
                self.consume(TokenKind::Identifier, "Expected variable name in list comprehension");
            self.consume(TokenKind::In, "Expected 'in' in list comprehension");
            let range = self.expression();

            let mut predicates = Vec::new();
            while self.eat(TokenKind::Comma) {
                predicates.push(self.expression());
            }

            self.consume(TokenKind::RBracket, "Expected ']' after list comprehension");
            return Expr::ListComprehension {
                expr: Box::new(first),
                variable: variable.lexeme,
                range: Box::new(range),
                predicates,
            };
        }

        let mut elements = vec![first];
        while self.eat(TokenKind::Comma) {
            if self.check(TokenKind::RBracket) {
                break; // trailing comma
            }
            if self.eat(TokenKind::DotDotDot) {
                elements.push(Expr::Spread(Box::new(self.expression())));
            } else {
                elements.push(self.expression());
            }
        }
        self.consume(TokenKind::RBracket, "Expected ']' after array elements");
        Expr::Array(elements)
    }

    /// `match expr { case pattern -> result ... }`
    fn match_expression(&mut self) -> Expr {
        let scrutinee = self.expression();
        self.consume(TokenKind::LBrace, "Expected '{' after match expression");

        let mut cases = Vec::new();
        while !self.check(TokenKind::RBrace) && !self.is_at_end() {
            self.consume(TokenKind::Case, "Expected 'case' in match expression");
            let pattern = self.expression();
            self.consume(TokenKind::Arrow, "Expected '->' after pattern");
            let result = self.expression();
            cases.push((pattern, result));

            // Optional separators between cases.
            self.eat(TokenKind::Semicolon);
            self.eat(TokenKind::Comma);
        }

        self.consume(TokenKind::RBrace, "Expected '}' after match cases");
        Expr::Match {
            scrutinee: Box::new(scrutinee),
            cases,
        }
    }

    /// `{key: value, shorthand, ...}`
    fn object_literal(&mut self) -> Expr {
        let mut properties = Vec::new();

        while !self.check(TokenKind::RBrace) && !self.is_at_end() {
            let key = self.consume(TokenKind::Identifier, "Expected property name");

            if self.eat(TokenKind::Comma) || self.check(TokenKind::RBrace) {
                // Shorthand: {name} => {name: name}
                let name = key.lexeme.clone();
                properties.push((key.lexeme, Expr::ident(name)));
            } else {
                self.consume(TokenKind::Colon, "Expected ':' after property name");
                let value = self.expression();
                properties.push((key.lexeme, value));
                if !self.check(TokenKind::RBrace) {
                    self.consume(TokenKind::Comma, "Expected ',' or '}' after property");
                }
            }
        }

        self.consume(TokenKind::RBrace, "Expected '}' after object properties");
        Expr::Object(properties)
    }

    /// `(expr)` grouping, `(a, b, ...)` tuple, `()` empty tuple.
    fn tuple_or_grouping(&mut self) -> Expr {
        if self.eat(TokenKind::RParen) {
            return Expr::Tuple(Vec::new());
        }

        let first = self.expression();

        if self.eat(TokenKind::Comma) {
            let mut elements = vec![first];
            loop {
                if self.check(TokenKind::RParen) {
                    break; // trailing comma
                }
                elements.push(self.expression());
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
            self.consume(TokenKind::RParen, "Expected ')' after tuple elements");
            return Expr::Tuple(elements);
        }

        self.consume(TokenKind::RParen, "Expected ')' after expression");
        first
    }
}

fn is_arith_op(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Plus
            | TokenKind::Minus
            | TokenKind::Star
            | TokenKind::Slash
            | TokenKind::Percent
            | TokenKind::Power
            | TokenKind::Caret
    )
}
