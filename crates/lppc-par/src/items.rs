//! Top-level declaration parsing: functions, classes, interfaces,
//! algebraic data types, enums, imports and exports.

use lppc_lex::TokenKind;
use lppc_util::Span;

use crate::ast::{contains_yield, ClassDecl, Expr, Function, InterfaceDecl, Param, Stmt, TypeDecl};
use crate::Parser;

impl<'a> Parser<'a> {
    /// `[async] fn name[<T, U>](params[, ...rest]) -> type { body }`
    pub(crate) fn function(&mut self) -> Function {
        let is_async = self.eat(TokenKind::Async);

        self.consume(TokenKind::Fn, "Expected 'fn'");
        let name = self.consume(TokenKind::Identifier, "Expected function name");
        let span = Span::new(name.line, name.column);

        // Generics: fn foo<T, U>(x: T) -> U
        let mut generic_params = Vec::new();
        if self.eat(TokenKind::Less) {
            loop {
                let param = self.consume(TokenKind::Identifier, "Expected generic parameter");
                generic_params.push(param.lexeme);
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
            self.consume(TokenKind::Greater, "Expected '>' after generic parameters");
        }

        self.consume(TokenKind::LParen, "Expected '(' after function name");
        let (params, rest_param) = self.parameter_list();
        self.consume(TokenKind::RParen, "Expected ')' after parameters");

        self.consume(TokenKind::Arrow, "Expected '->' after parameters");
        let return_type = self.advance().lexeme;

        let body = self.block(true); // implicit return enabled

        let mut func = Function::new(name.lexeme, params, return_type, body);
        func.is_async = is_async;
        func.is_generator = contains_yield(&func.body);
        func.generic_params = generic_params;
        func.rest_param = rest_param;
        func.span = span;
        func
    }

    /// `name: type` pairs with an optional trailing `...rest`.
    fn parameter_list(&mut self) -> (Vec<Param>, Option<String>) {
        let mut params = Vec::new();
        let mut rest_param = None;

        if !self.check(TokenKind::RParen) {
            loop {
                // Rest parameter: ...args (must be last)
                if self.eat(TokenKind::DotDotDot) {
                    let name =
                        self.consume(TokenKind::Identifier, "Expected parameter name after '...'");
                    rest_param = Some(name.lexeme);
                    break;
                }

                let name = self.consume(TokenKind::Identifier, "Expected parameter name");
                self.consume(TokenKind::Colon, "Expected ':' after parameter name");
                let ty = self.advance().lexeme;
                params.push(Param::new(name.lexeme, ty));

                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
        }

        (params, rest_param)
    }

    /// `[@pattern Name] class Name [extends Base] { ... }`
    pub(crate) fn class_declaration(&mut self) -> ClassDecl {
        // @pattern directive before the class keyword.
        let mut design_pattern = None;
        if self.eat(TokenKind::At) {
            let keyword = self.consume(TokenKind::Identifier, "Expected 'pattern' after '@'");
            if keyword.lexeme == "pattern" {
                let pattern_name =
                    self.consume(TokenKind::Identifier, "Expected pattern name after '@pattern'");
                design_pattern = Some(pattern_name.lexeme);
            } else {
                self.error("Expected 'pattern' after '@'");
            }
        }

        self.consume(TokenKind::Class, "Expected 'class'");
        let name = self.consume(TokenKind::Identifier, "Expected class name");
        let span = Span::new(name.line, name.column);

        let base = if self.eat(TokenKind::Extends) {
            let base = self.consume(TokenKind::Identifier, "Expected base class name");
            Some(base.lexeme)
        } else {
            None
        };

        self.consume(TokenKind::LBrace, "Expected '{' after class name");

        let mut properties = Vec::new();
        let mut methods = Vec::new();
        let mut constructor = None;

        while !self.check(TokenKind::RBrace) && !self.is_at_end() {
            if self.eat(TokenKind::Constructor) {
                self.consume(TokenKind::LParen, "Expected '(' after 'constructor'");
                let (params, _) = self.parameter_list();
                self.consume(TokenKind::RParen, "Expected ')' after parameters");
                let body = self.block(false);
                constructor = Some(Box::new(Function::new(
                    name.lexeme.clone(),
                    params,
                    "void",
                    body,
                )));
            } else if self.check(TokenKind::Fn) || self.check(TokenKind::Async) {
                methods.push(self.function());
            } else if self.check(TokenKind::Get) && self.peek_next().kind == TokenKind::Fn {
                self.advance();
                let mut method = self.function();
                method.is_getter = true;
                methods.push(method);
            } else if self.check(TokenKind::Set) && self.peek_next().kind == TokenKind::Fn {
                self.advance();
                let mut method = self.function();
                method.is_setter = true;
                methods.push(method);
            } else if self.eat(TokenKind::Let) || self.eat(TokenKind::Const) {
                // Property with let/const: let name: type [= init];
                let prop = self.consume(TokenKind::Identifier, "Expected property name");
                self.consume(TokenKind::Colon, "Expected ':' after property name");
                let ty = self.advance().lexeme;

                // Initialization values belong to the constructor; the
                // declaration keeps only the name and type.
                if self.eat(TokenKind::Equal) {
                    self.expression();
                }

                self.consume(TokenKind::Semicolon, "Expected ';' after property declaration");
                properties.push(Param::new(prop.lexeme, ty));
            } else if self.check(TokenKind::Identifier) {
                // Bare property: name: type;
                let prop = self.advance();
                self.consume(TokenKind::Colon, "Expected ':' after property name");
                let ty = self.advance().lexeme;
                self.consume(TokenKind::Semicolon, "Expected ';' after property declaration");
                properties.push(Param::new(prop.lexeme, ty));
            } else {
                self.error("Expected constructor, method, or property");
                self.synchronize();
            }
        }

        self.consume(TokenKind::RBrace, "Expected '}' after class body");

        ClassDecl {
            name: name.lexeme,
            base,
            properties,
            methods,
            constructor,
            design_pattern,
            span,
        }
    }

    /// `interface Name { method(params) -> type; ... }`
    ///
    /// Interfaces keep their methods as `(name, signature)` string
    /// pairs; the transpiler re-renders the signature as C++.
    pub(crate) fn interface_declaration(&mut self) -> InterfaceDecl {
        self.consume(TokenKind::Interface, "Expected 'interface'");
        let name = self.consume(TokenKind::Identifier, "Expected interface name");
        self.consume(TokenKind::LBrace, "Expected '{' after interface name");

        let mut methods = Vec::new();

        while !self.check(TokenKind::RBrace) && !self.is_at_end() {
            let method_name = self.consume(TokenKind::Identifier, "Expected method name");
            self.consume(TokenKind::LParen, "Expected '(' after method name");

            let mut signature = format!("{}(", method_name.lexeme);
            if !self.check(TokenKind::RParen) {
                loop {
                    self.consume(TokenKind::Identifier, "Expected parameter name");
                    self.consume(TokenKind::Colon, "Expected ':' after parameter name");
                    let ty = self.advance().lexeme;
                    signature.push_str(&ty);
                    if self.check(TokenKind::Comma) {
                        signature.push_str(", ");
                    }
                    if !self.eat(TokenKind::Comma) {
                        break;
                    }
                }
            }
            signature.push(')');

            self.consume(TokenKind::RParen, "Expected ')' after parameters");
            self.consume(TokenKind::Arrow, "Expected '->' after parameters");
            let return_type = self.advance().lexeme;
            signature.push_str(&format!(" -> {return_type}"));
            self.consume(TokenKind::Semicolon, "Expected ';' after method signature");

            methods.push((method_name.lexeme, signature));
        }

        self.consume(TokenKind::RBrace, "Expected '}' after interface body");
        InterfaceDecl {
            name: name.lexeme,
            methods,
        }
    }

    /// `type Option<T> = Some(T) | None;`
    pub(crate) fn type_declaration(&mut self) -> TypeDecl {
        self.consume(TokenKind::Type, "Expected 'type'");
        let name = self.consume(TokenKind::Identifier, "Expected type name");

        let mut type_params = Vec::new();
        if self.eat(TokenKind::Less) {
            loop {
                let param = self.consume(TokenKind::Identifier, "Expected type parameter");
                type_params.push(param.lexeme);
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
            self.consume(TokenKind::Greater, "Expected '>' after type parameters");
        }

        self.consume(TokenKind::Equal, "Expected '=' after type name");

        let mut variants = Vec::new();
        loop {
            let variant = self.consume(TokenKind::Identifier, "Expected variant name");
            let mut fields = Vec::new();

            if self.eat(TokenKind::LParen) {
                if !self.check(TokenKind::RParen) {
                    loop {
                        fields.push(self.advance().lexeme);
                        if !self.eat(TokenKind::Comma) {
                            break;
                        }
                    }
                }
                self.consume(TokenKind::RParen, "Expected ')' after variant fields");
            }

            variants.push((variant.lexeme, fields));

            if !self.eat(TokenKind::Pipe) {
                break;
            }
        }

        self.eat(TokenKind::Semicolon);

        TypeDecl {
            name: name.lexeme,
            type_params,
            variants,
        }
    }

    /// `enum Color { Red, Green = 5, Blue }`
    pub(crate) fn enum_declaration(&mut self) -> Stmt {
        self.consume(TokenKind::Enum, "Expected 'enum'");
        let name = self.consume(TokenKind::Identifier, "Expected enum name");
        self.consume(TokenKind::LBrace, "Expected '{' after enum name");

        let mut values = Vec::new();
        let mut current_value: i64 = 0;

        if !self.check(TokenKind::RBrace) {
            loop {
                let value_name = self.consume(TokenKind::Identifier, "Expected enum value name");
                let mut value = current_value;
                current_value += 1;

                if self.eat(TokenKind::Equal) {
                    let num = self.consume(TokenKind::Number, "Expected number after '='");
                    value = num.lexeme.parse::<f64>().unwrap_or(0.0) as i64;
                    current_value = value + 1;
                }

                values.push((value_name.lexeme, value));

                if !self.eat(TokenKind::Comma) || self.check(TokenKind::RBrace) {
                    break;
                }
            }
        }

        self.consume(TokenKind::RBrace, "Expected '}' after enum values");
        Stmt::Enum {
            name: name.lexeme,
            values,
        }
    }

    /// `import { a, b } from "path";` or `import "path";`
    pub(crate) fn import_statement(&mut self) -> Stmt {
        self.consume(TokenKind::Import, "Expected 'import'");

        let mut names = Vec::new();
        let import_all = false;

        if self.eat(TokenKind::LBrace) {
            loop {
                let name = self.consume(TokenKind::Identifier, "Expected import name");
                names.push(name.lexeme);
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
            self.consume(TokenKind::RBrace, "Expected '}' after import list");
            self.consume(TokenKind::From, "Expected 'from' after import list");
        }

        let module = self.consume(TokenKind::Str, "Expected module path");
        self.eat(TokenKind::Semicolon);

        Stmt::Import {
            names,
            module: module.lexeme,
            import_all,
        }
    }

    /// `export` before a declaration. The marker is recorded in the
    /// program's export list; the declaration itself is parsed by the
    /// regular top-level loop on the next iteration.
    pub(crate) fn export_statement(&mut self) -> Stmt {
        self.consume(TokenKind::Export, "Expected 'export'");

        let declaration = if self.check(TokenKind::Fn) || self.check(TokenKind::Async) {
            Some(Box::new(Stmt::Expr(Expr::ident("exported_function"))))
        } else if self.check(TokenKind::Class) {
            Some(Box::new(Stmt::Expr(Expr::ident("exported_class"))))
        } else {
            None
        };

        Stmt::Export { declaration }
    }
}
