//! Main lexer implementation for the L++ language.
//!
//! Transforms source text into a token stream in a single pass with no
//! backtracking. The lexer is total: it never fails and never reports
//! diagnostics. Anything it cannot classify becomes an
//! [`TokenKind::Invalid`] token and lexing continues; downstream phases
//! decide what to say about it.
//!
//! Operator recognition is longest-match: three-character forms
//! (`===`, `!==`, `>>>`, `...`, `!!<`, `!!>`, `??=`, `&&=`, `||=`,
//! `**=`) are tried before two-character forms before single characters.

use crate::cursor::Cursor;
use crate::token::{keyword_from_ident, Token, TokenKind};

/// The L++ lexer.
///
/// # Example
///
/// ```
/// use lppc_lex::lexer::Lexer;
/// use lppc_lex::token::TokenKind;
///
/// let tokens = Lexer::tokenize("let x = 42;");
/// assert_eq!(tokens[0].kind, TokenKind::Let);
/// assert_eq!(tokens.last().unwrap().kind, TokenKind::EndOfFile);
/// ```
pub struct Lexer<'a> {
    /// Character cursor for traversing source.
    cursor: Cursor<'a>,
    /// Start line of the current token.
    token_line: u32,
    /// Start column of the current token.
    token_column: u32,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given source code.
    pub fn new(source: &'a str) -> Self {
        Self {
            cursor: Cursor::new(source),
            token_line: 1,
            token_column: 1,
        }
    }

    /// Tokenize the entire source.
    ///
    /// The returned stream is terminated by exactly one
    /// [`TokenKind::EndOfFile`] token.
    pub fn tokenize(source: &str) -> Vec<Token> {
        let mut lexer = Lexer::new(source);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token();
            let done = token.kind == TokenKind::EndOfFile;
            tokens.push(token);
            if done {
                break;
            }
        }
        tokens
    }

    /// Returns the next token from the source.
    ///
    /// Skips whitespace and comments, then dispatches on the first
    /// character. At end of input this returns the `EndOfFile` token
    /// (and keeps returning it if called again).
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace_and_comments();

        self.token_line = self.cursor.line();
        self.token_column = self.cursor.column();

        if self.cursor.is_at_end() {
            return Token::eof(self.token_line, self.token_column);
        }

        let c = self.cursor.current_char();
        match c {
            // Pragmas start at column 1; a '#' anywhere else is invalid.
            '#' => {
                if self.token_column == 1 {
                    self.lex_pragma()
                } else {
                    self.cursor.advance();
                    self.make_token(TokenKind::Invalid, "#")
                }
            }

            '0'..='9' => self.lex_number(),
            '"' => self.lex_string(),
            c if c.is_ascii_alphabetic() || c == '_' => self.lex_identifier(),

            // ── Single-character delimiters ────────────────────────────
            '(' => self.single(TokenKind::LParen, "("),
            ')' => self.single(TokenKind::RParen, ")"),
            '{' => self.single(TokenKind::LBrace, "{"),
            '}' => self.single(TokenKind::RBrace, "}"),
            '[' => self.single(TokenKind::LBracket, "["),
            ']' => self.single(TokenKind::RBracket, "]"),
            ';' => self.single(TokenKind::Semicolon, ";"),
            ',' => self.single(TokenKind::Comma, ","),
            ':' => self.single(TokenKind::Colon, ":"),
            '$' => self.single(TokenKind::Dollar, "$"),
            '`' => self.single(TokenKind::Backtick, "`"),
            '@' => self.single(TokenKind::At, "@"),
            '^' => self.single(TokenKind::Caret, "^"),
            '\\' => self.single(TokenKind::Backslash, "\\"),

            // ── Multi-character operators ──────────────────────────────
            '+' => self.lex_plus(),
            '-' => self.lex_minus(),
            '*' => self.lex_star(),
            '/' => self.lex_slash(),
            '%' => self.lex_percent(),
            '=' => self.lex_equals(),
            '!' => self.lex_bang(),
            '<' => self.lex_less(),
            '>' => self.lex_greater(),
            '&' => self.lex_ampersand(),
            '|' => self.lex_pipe(),
            '?' => self.lex_question(),
            '.' => self.lex_dot(),
            '~' => self.lex_tilde(),

            // Unknown byte: emit Invalid and keep going.
            other => {
                self.cursor.advance();
                self.make_token(TokenKind::Invalid, other.to_string())
            }
        }
    }

    // ── Helpers ────────────────────────────────────────────────────────

    fn make_token(&self, kind: TokenKind, lexeme: impl Into<String>) -> Token {
        Token::new(kind, lexeme, self.token_line, self.token_column)
    }

    fn single(&mut self, kind: TokenKind, lexeme: &str) -> Token {
        self.cursor.advance();
        self.make_token(kind, lexeme)
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            self.cursor.eat_while(|c| c.is_ascii_whitespace());

            if self.cursor.current_char() == '/' {
                match self.cursor.char_at(1) {
                    '/' => {
                        self.cursor.eat_while(|c| c != '\n');
                        continue;
                    }
                    '*' => {
                        self.cursor.advance(); // '/'
                        self.cursor.advance(); // '*'
                        // Unterminated block comments run to end of file.
                        while !self.cursor.is_at_end() {
                            if self.cursor.current_char() == '*' && self.cursor.char_at(1) == '/' {
                                self.cursor.advance();
                                self.cursor.advance();
                                break;
                            }
                            self.cursor.advance();
                        }
                        continue;
                    }
                    _ => {}
                }
            }
            break;
        }
    }

    // ── Pragmas ────────────────────────────────────────────────────────

    /// `# pragma paradigm hybrid` - the lexeme is the rest of the line
    /// after `#` with leading spaces trimmed.
    fn lex_pragma(&mut self) -> Token {
        self.cursor.advance(); // consume '#'
        self.cursor.eat_while(|c| c == ' ' || c == '\t');

        let start = self.cursor.position();
        self.cursor.eat_while(|c| c != '\n');
        let lexeme = self.cursor.slice(start, self.cursor.position()).to_string();

        self.make_token(TokenKind::Pragma, lexeme)
    }

    // ── Literals ───────────────────────────────────────────────────────

    /// Digits with an optional fraction; the dot is only consumed when a
    /// digit follows, so `1..5` lexes as `1` `..` `5`.
    fn lex_number(&mut self) -> Token {
        let start = self.cursor.position();
        self.cursor.eat_while(|c| c.is_ascii_digit());

        if self.cursor.current_char() == '.' && self.cursor.char_at(1).is_ascii_digit() {
            self.cursor.advance(); // consume '.'
            self.cursor.eat_while(|c| c.is_ascii_digit());
        }

        let lexeme = self.cursor.slice(start, self.cursor.position()).to_string();
        self.make_token(TokenKind::Number, lexeme)
    }

    /// Double-quoted string. Escapes: `\n \t \r \\ \" \0`; unknown
    /// escapes are kept verbatim. `\0` stays in escaped form so emitted
    /// C++ string literals keep the escape. An unterminated string
    /// produces an `Invalid` token with an explanatory lexeme and leaves
    /// the cursor at end of file.
    fn lex_string(&mut self) -> Token {
        self.cursor.advance(); // consume opening '"'

        let mut result = String::new();
        while !self.cursor.is_at_end() && self.cursor.current_char() != '"' {
            if self.cursor.current_char() == '\\' {
                self.cursor.advance(); // consume backslash
                if self.cursor.is_at_end() {
                    return self.make_token(TokenKind::Invalid, "Unterminated string with escape");
                }
                let escaped = self.cursor.advance();
                match escaped {
                    'n' => result.push('\n'),
                    't' => result.push('\t'),
                    'r' => result.push('\r'),
                    '\\' => result.push('\\'),
                    '"' => result.push('"'),
                    '0' => result.push_str("\\0"),
                    other => {
                        result.push('\\');
                        result.push(other);
                    }
                }
            } else {
                result.push(self.cursor.advance());
            }
        }

        if self.cursor.is_at_end() {
            return self.make_token(TokenKind::Invalid, "Unterminated string");
        }

        self.cursor.advance(); // consume closing '"'
        self.make_token(TokenKind::Str, result)
    }

    fn lex_identifier(&mut self) -> Token {
        let start = self.cursor.position();
        self.cursor
            .eat_while(|c| c.is_ascii_alphanumeric() || c == '_');
        let lexeme = self.cursor.slice(start, self.cursor.position());

        let kind = keyword_from_ident(lexeme).unwrap_or(TokenKind::Identifier);
        self.make_token(kind, lexeme.to_string())
    }

    // ── Operators ──────────────────────────────────────────────────────

    /// `++`, `+=`, `+`
    fn lex_plus(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('+') {
            self.make_token(TokenKind::PlusPlus, "++")
        } else if self.cursor.match_char('=') {
            self.make_token(TokenKind::PlusEqual, "+=")
        } else {
            self.make_token(TokenKind::Plus, "+")
        }
    }

    /// `->`, `--`, `-=`, `-`
    fn lex_minus(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('>') {
            self.make_token(TokenKind::Arrow, "->")
        } else if self.cursor.match_char('-') {
            self.make_token(TokenKind::MinusMinus, "--")
        } else if self.cursor.match_char('=') {
            self.make_token(TokenKind::MinusEqual, "-=")
        } else {
            self.make_token(TokenKind::Minus, "-")
        }
    }

    /// `**=`, `**`, `*=`, `*`
    fn lex_star(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('*') {
            if self.cursor.match_char('=') {
                self.make_token(TokenKind::PowerEqual, "**=")
            } else {
                self.make_token(TokenKind::Power, "**")
            }
        } else if self.cursor.match_char('=') {
            self.make_token(TokenKind::StarEqual, "*=")
        } else {
            self.make_token(TokenKind::Star, "*")
        }
    }

    /// `/=`, `/` (comments were skipped before dispatch)
    fn lex_slash(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            self.make_token(TokenKind::SlashEqual, "/=")
        } else {
            self.make_token(TokenKind::Slash, "/")
        }
    }

    /// `%=`, `%`
    fn lex_percent(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            self.make_token(TokenKind::PercentEqual, "%=")
        } else {
            self.make_token(TokenKind::Percent, "%")
        }
    }

    /// `===`, `==`, `=>`, `=`
    fn lex_equals(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            if self.cursor.match_char('=') {
                self.make_token(TokenKind::EqualEqualEqual, "===")
            } else {
                self.make_token(TokenKind::EqualEqual, "==")
            }
        } else if self.cursor.match_char('>') {
            self.make_token(TokenKind::FatArrow, "=>")
        } else {
            self.make_token(TokenKind::Equal, "=")
        }
    }

    /// `!!<`, `!!>`, `!!`, `!==`, `!=`, `!`
    fn lex_bang(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('!') {
            if self.cursor.match_char('<') {
                self.make_token(TokenKind::BangBangLess, "!!<")
            } else if self.cursor.match_char('>') {
                self.make_token(TokenKind::BangBangGreater, "!!>")
            } else {
                self.make_token(TokenKind::BangBang, "!!")
            }
        } else if self.cursor.match_char('=') {
            if self.cursor.match_char('=') {
                self.make_token(TokenKind::BangEqualEqual, "!==")
            } else {
                self.make_token(TokenKind::BangEqual, "!=")
            }
        } else {
            // Logical not shares its kind with the `not` keyword.
            self.make_token(TokenKind::Not, "!")
        }
    }

    /// `<-`, `<<`, `<=`, `<`
    fn lex_less(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('-') {
            self.make_token(TokenKind::ArrowLeft, "<-")
        } else if self.cursor.match_char('<') {
            self.make_token(TokenKind::LessLess, "<<")
        } else if self.cursor.match_char('=') {
            self.make_token(TokenKind::LessEqual, "<=")
        } else {
            self.make_token(TokenKind::Less, "<")
        }
    }

    /// `>>>`, `>>`, `>=`, `>`
    fn lex_greater(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('>') {
            if self.cursor.match_char('>') {
                self.make_token(TokenKind::GreaterGreaterGreater, ">>>")
            } else {
                self.make_token(TokenKind::GreaterGreater, ">>")
            }
        } else if self.cursor.match_char('=') {
            self.make_token(TokenKind::GreaterEqual, ">=")
        } else {
            self.make_token(TokenKind::Greater, ">")
        }
    }

    /// `&&=`, `&&`, `&`
    fn lex_ampersand(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('&') {
            if self.cursor.match_char('=') {
                self.make_token(TokenKind::AmpAmpEqual, "&&=")
            } else {
                self.make_token(TokenKind::AmpAmp, "&&")
            }
        } else {
            self.make_token(TokenKind::Amp, "&")
        }
    }

    /// `||=`, `||`, `|>`, `|`
    fn lex_pipe(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('|') {
            if self.cursor.match_char('=') {
                self.make_token(TokenKind::PipePipeEqual, "||=")
            } else {
                self.make_token(TokenKind::PipePipe, "||")
            }
        } else if self.cursor.match_char('>') {
            self.make_token(TokenKind::PipeGt, "|>")
        } else {
            self.make_token(TokenKind::Pipe, "|")
        }
    }

    /// `??=`, `??`, `?.`, `?`
    fn lex_question(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('?') {
            if self.cursor.match_char('=') {
                self.make_token(TokenKind::QuestionQuestionEqual, "??=")
            } else {
                self.make_token(TokenKind::QuestionQuestion, "??")
            }
        } else if self.cursor.match_char('.') {
            self.make_token(TokenKind::QuestionDot, "?.")
        } else {
            self.make_token(TokenKind::Question, "?")
        }
    }

    /// `...`, `..`, `.`
    fn lex_dot(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('.') {
            if self.cursor.match_char('.') {
                self.make_token(TokenKind::DotDotDot, "...")
            } else {
                self.make_token(TokenKind::DotDot, "..")
            }
        } else {
            self.make_token(TokenKind::Dot, ".")
        }
    }

    /// `~>`, `~`
    fn lex_tilde(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('>') {
            self.make_token(TokenKind::TildeGt, "~>")
        } else {
            self.make_token(TokenKind::Tilde, "~")
        }
    }
}
