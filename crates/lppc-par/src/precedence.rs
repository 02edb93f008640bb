//! Precedence tables and the notation context.
//!
//! Operator fixity is data, not code: the parser's binary-expression
//! tier asks the current [`PrecedenceTable`] for `{precedence, assoc}`
//! and climbs Pratt-style. A stack of tables ([`NotationContext`])
//! models nested notation scopes:
//!
//! - `math` (default): the standard core table below.
//! - `linear`: every arithmetic/comparison/logical operator at one
//!   precedence level, left-associative. `1 + 2 * 3` parses as
//!   `(1 + 2) * 3`.
//! - `custom`: starts as a clone of `math`; user overrides permitted.
//!   Overriding a core operator clears its core flag.
//!
//! Core levels (higher binds tighter, 0-100):
//!
//! | Level | Operators                      | Assoc |
//! |-------|--------------------------------|-------|
//! | 90    | `.` (composition)              | Right |
//! | 80    | `**` `^`                       | Right |
//! | 70    | `*` `/` `%`                    | Left  |
//! | 60    | `+` `-`                        | Left  |
//! | 50    | `..`                           | Left  |
//! | 40    | `<` `<=` `>` `>=`              | Left  |
//! | 35    | `==` `!=` `===` `!==`          | Left  |
//! | 30    | `in`                           | Left  |
//! | 25    | `and` `&&`                     | Left  |
//! | 20    | `or` `\|\|`                    | Left  |
//! | 15    | `??`                           | Right |
//! | 10    | `\|>`                          | Left  |
//! | 5     | `=` `+=` `-=` `*=` `/=`        | Right |

use indexmap::IndexMap;
use lppc_lex::TokenKind;
use rustc_hash::FxHashMap;

/// Operator associativity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assoc {
    Left,
    Right,
    /// Non-associative: chaining without parentheses is an error.
    None,
}

/// Fixity of one operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixityInfo {
    /// Higher binds tighter (0-100).
    pub precedence: i32,
    pub assoc: Assoc,
    /// Core operators are preloaded and cannot be redefined globally;
    /// the flag is cleared when a custom scope overrides one.
    pub is_core: bool,
}

impl FixityInfo {
    pub const fn new(precedence: i32, assoc: Assoc, is_core: bool) -> Self {
        Self {
            precedence,
            assoc,
            is_core,
        }
    }
}

impl Default for FixityInfo {
    fn default() -> Self {
        Self::new(0, Assoc::Left, false)
    }
}

/// A precedence table: token kinds plus named custom operators.
///
/// # Examples
///
/// ```
/// use lppc_lex::TokenKind;
/// use lppc_par::precedence::{Assoc, PrecedenceTable};
///
/// let table = PrecedenceTable::new();
/// let star = table.fixity(TokenKind::Star);
/// let plus = table.fixity(TokenKind::Plus);
/// assert!(star.precedence > plus.precedence);
/// assert_eq!(plus.assoc, Assoc::Left);
/// ```
#[derive(Debug, Clone)]
pub struct PrecedenceTable {
    token_fixity: FxHashMap<TokenKind, FixityInfo>,
    /// Custom operators are looked up by name; insertion order is kept
    /// so listing them is deterministic.
    custom_fixity: IndexMap<String, FixityInfo>,
}

impl PrecedenceTable {
    /// A table preloaded with the core operators.
    pub fn new() -> Self {
        let mut table = Self {
            token_fixity: FxHashMap::default(),
            custom_fixity: IndexMap::new(),
        };
        table.initialize_core_operators();
        table
    }

    fn initialize_core_operators(&mut self) {
        use Assoc::{Left, Right};
        use TokenKind::*;

        let mut core = |kind: TokenKind, prec: i32, assoc: Assoc| {
            self.token_fixity
                .insert(kind, FixityInfo::new(prec, assoc, true));
        };

        // Level 90: function composition
        core(Dot, 90, Right);

        // Level 80: exponentiation
        core(Power, 80, Right);
        core(Caret, 80, Right);

        // Level 70: multiplicative
        core(Star, 70, Left);
        core(Slash, 70, Left);
        core(Percent, 70, Left);

        // Level 60: additive
        core(Plus, 60, Left);
        core(Minus, 60, Left);

        // Level 50: range
        core(DotDot, 50, Left);

        // Level 40: comparison
        core(Less, 40, Left);
        core(LessEqual, 40, Left);
        core(Greater, 40, Left);
        core(GreaterEqual, 40, Left);

        // Level 35: equality
        core(EqualEqual, 35, Left);
        core(BangEqual, 35, Left);
        core(EqualEqualEqual, 35, Left);
        core(BangEqualEqual, 35, Left);

        // Level 30: membership
        core(In, 30, Left);

        // Level 25: logical and
        core(And, 25, Left);
        core(AmpAmp, 25, Left);

        // Level 20: logical or
        core(Or, 20, Left);
        core(PipePipe, 20, Left);

        // Level 15: nullish coalescing
        core(QuestionQuestion, 15, Right);

        // Level 10: pipeline
        core(PipeGt, 10, Left);

        // Level 5: assignment
        core(Equal, 5, Right);
        core(PlusEqual, 5, Right);
        core(MinusEqual, 5, Right);
        core(StarEqual, 5, Right);
        core(SlashEqual, 5, Right);
    }

    /// Fixity for a token kind; unregistered operators get the default
    /// (lowest precedence, left-assoc, non-core).
    pub fn fixity(&self, op: TokenKind) -> FixityInfo {
        self.token_fixity.get(&op).copied().unwrap_or_default()
    }

    /// Fixity by operator name: custom table first, then the core table
    /// through the name-to-kind mapping.
    pub fn fixity_by_name(&self, op_name: &str) -> FixityInfo {
        if let Some(info) = self.custom_fixity.get(op_name) {
            return *info;
        }
        match operator_name_to_kind(op_name) {
            Some(kind) => self.fixity(kind),
            None => FixityInfo::default(),
        }
    }

    /// Override the fixity of a token-kind operator. Overriding a core
    /// operator clears its core flag.
    pub fn set_fixity(&mut self, op: TokenKind, precedence: i32, assoc: Assoc) {
        self.token_fixity
            .insert(op, FixityInfo::new(precedence, assoc, false));
    }

    /// Register or override a named custom operator.
    pub fn set_fixity_by_name(&mut self, op_name: impl Into<String>, precedence: i32, assoc: Assoc) {
        self.custom_fixity
            .insert(op_name.into(), FixityInfo::new(precedence, assoc, false));
    }

    /// Whether the table knows this token kind.
    pub fn has_operator(&self, op: TokenKind) -> bool {
        self.token_fixity.contains_key(&op)
    }

    /// Whether the table knows this operator name.
    pub fn has_operator_by_name(&self, op_name: &str) -> bool {
        self.custom_fixity.contains_key(op_name) || operator_name_to_kind(op_name).is_some()
    }

    /// Drop all overrides and custom operators, restoring the core set.
    pub fn reset_to_core(&mut self) {
        self.token_fixity.clear();
        self.custom_fixity.clear();
        self.initialize_core_operators();
    }

    /// The registered custom operator names, in registration order.
    pub fn custom_operators(&self) -> Vec<String> {
        self.custom_fixity.keys().cloned().collect()
    }
}

impl Default for PrecedenceTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Map a spelled-out operator name to its token kind.
pub fn operator_name_to_kind(name: &str) -> Option<TokenKind> {
    use TokenKind::*;
    let kind = match name {
        "+" => Plus,
        "-" => Minus,
        "*" => Star,
        "/" => Slash,
        "%" => Percent,
        "**" => Power,
        "^" => Caret,
        "==" => EqualEqual,
        "!=" => BangEqual,
        "<" => Less,
        ">" => Greater,
        "<=" => LessEqual,
        ">=" => GreaterEqual,
        "&&" => AmpAmp,
        "||" => PipePipe,
        "and" => And,
        "or" => Or,
        ".." => DotDot,
        "|>" => PipeGt,
        "??" => QuestionQuestion,
        _ => return None,
    };
    Some(kind)
}

/// Notation mode selecting which table shape a scope uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotationMode {
    /// Standard mathematical precedence (default).
    Math,
    /// All operators at one precedence level, left-associative.
    Linear,
    /// User-defined fixity.
    Custom,
}

struct NotationScope {
    mode: NotationMode,
    table: PrecedenceTable,
    #[allow(dead_code)]
    name: String,
}

/// Stack of precedence tables modelling nested notation scopes.
///
/// The base `math` scope is always present; `pop` never removes it.
///
/// # Examples
///
/// ```
/// use lppc_lex::TokenKind;
/// use lppc_par::precedence::NotationContext;
///
/// let mut ctx = NotationContext::new();
/// ctx.push_linear();
/// let plus = ctx.current().fixity(TokenKind::Plus);
/// let star = ctx.current().fixity(TokenKind::Star);
/// assert_eq!(plus.precedence, star.precedence);
/// ctx.pop();
/// assert!(!ctx.is_linear_mode());
/// ```
pub struct NotationContext {
    scopes: Vec<NotationScope>,
}

impl NotationContext {
    /// A context with the default `math` scope.
    pub fn new() -> Self {
        let mut ctx = Self { scopes: Vec::new() };
        ctx.push_math();
        ctx
    }

    /// Push a standard math scope.
    pub fn push_math(&mut self) {
        self.scopes.push(NotationScope {
            mode: NotationMode::Math,
            table: PrecedenceTable::new(),
            name: "math".into(),
        });
    }

    /// Push a linear scope: uniform precedence, left-associative.
    pub fn push_linear(&mut self) {
        self.scopes.push(NotationScope {
            mode: NotationMode::Linear,
            table: linear_table(),
            name: "linear".into(),
        });
    }

    /// Push a named custom scope, starting as a clone of `math`.
    pub fn push_custom(&mut self, name: impl Into<String>) {
        self.scopes.push(NotationScope {
            mode: NotationMode::Custom,
            table: PrecedenceTable::new(),
            name: name.into(),
        });
    }

    /// Push a custom scope with an explicit table.
    pub fn push_custom_table(&mut self, table: PrecedenceTable) {
        self.scopes.push(NotationScope {
            mode: NotationMode::Custom,
            table,
            name: "custom".into(),
        });
    }

    /// Pop the innermost scope; the base scope is never removed.
    pub fn pop(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// The active table.
    pub fn current(&self) -> &PrecedenceTable {
        &self.scopes.last().expect("base notation scope is always present").table
    }

    /// The active table, mutable (for custom-scope overrides).
    pub fn current_mut(&mut self) -> &mut PrecedenceTable {
        &mut self.scopes.last_mut().expect("base notation scope is always present").table
    }

    /// Whether the active scope is linear.
    pub fn is_linear_mode(&self) -> bool {
        self.current_mode() == NotationMode::Linear
    }

    /// The active scope's mode.
    pub fn current_mode(&self) -> NotationMode {
        self.scopes
            .last()
            .map(|s| s.mode)
            .unwrap_or(NotationMode::Math)
    }
}

impl Default for NotationContext {
    fn default() -> Self {
        Self::new()
    }
}

/// The linear table: arithmetic, comparison and logical operators all
/// forced to one level, left-associative. Exponentiation included.
fn linear_table() -> PrecedenceTable {
    use Assoc::Left;
    use TokenKind::*;

    const LINEAR_PRECEDENCE: i32 = 50;

    let mut table = PrecedenceTable::new();
    for kind in [
        Plus,
        Minus,
        Star,
        Slash,
        Percent,
        Power,
        Caret,
        Less,
        Greater,
        LessEqual,
        GreaterEqual,
        EqualEqual,
        BangEqual,
        AmpAmp,
        PipePipe,
    ] {
        table.set_fixity(kind, LINEAR_PRECEDENCE, Left);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_precedence_order() {
        let t = PrecedenceTable::new();
        assert!(t.fixity(TokenKind::Star).precedence > t.fixity(TokenKind::Plus).precedence);
        assert!(t.fixity(TokenKind::Plus).precedence > t.fixity(TokenKind::DotDot).precedence);
        assert!(t.fixity(TokenKind::Power).assoc == Assoc::Right);
        assert!(t.fixity(TokenKind::Plus).is_core);
    }

    #[test]
    fn test_unknown_operator_gets_default() {
        let t = PrecedenceTable::new();
        let info = t.fixity(TokenKind::Backtick);
        assert_eq!(info.precedence, 0);
        assert!(!info.is_core);
    }

    #[test]
    fn test_override_clears_core_flag() {
        let mut t = PrecedenceTable::new();
        t.set_fixity(TokenKind::Plus, 99, Assoc::Right);
        let info = t.fixity(TokenKind::Plus);
        assert_eq!(info.precedence, 99);
        assert!(!info.is_core);
    }

    #[test]
    fn test_lookup_by_name() {
        let t = PrecedenceTable::new();
        assert_eq!(t.fixity_by_name("*").precedence, 70);
        assert_eq!(t.fixity_by_name("|>").precedence, 10);
        assert_eq!(t.fixity_by_name("<=>").precedence, 0);
    }

    #[test]
    fn test_custom_operator_registration() {
        let mut t = PrecedenceTable::new();
        t.set_fixity_by_name("<=>", 45, Assoc::None);
        assert!(t.has_operator_by_name("<=>"));
        assert_eq!(t.fixity_by_name("<=>").assoc, Assoc::None);
        assert_eq!(t.custom_operators(), vec!["<=>".to_string()]);
    }

    #[test]
    fn test_reset_to_core() {
        let mut t = PrecedenceTable::new();
        t.set_fixity(TokenKind::Plus, 1, Assoc::Right);
        t.set_fixity_by_name("<=>", 45, Assoc::Left);
        t.reset_to_core();
        assert!(t.fixity(TokenKind::Plus).is_core);
        assert!(t.custom_operators().is_empty());
    }

    #[test]
    fn test_linear_mode_uniform_precedence() {
        let mut ctx = NotationContext::new();
        ctx.push_linear();
        assert!(ctx.is_linear_mode());
        let t = ctx.current();
        let p = t.fixity(TokenKind::Plus);
        let s = t.fixity(TokenKind::Star);
        let pw = t.fixity(TokenKind::Power);
        assert_eq!(p.precedence, s.precedence);
        assert_eq!(s.precedence, pw.precedence);
        assert_eq!(pw.assoc, Assoc::Left);
    }

    #[test]
    fn test_pop_keeps_base_scope() {
        let mut ctx = NotationContext::new();
        ctx.pop();
        ctx.pop();
        assert_eq!(ctx.current_mode(), NotationMode::Math);
        assert!(ctx.current().has_operator(TokenKind::Plus));
    }

    #[test]
    fn test_nested_scopes_restore() {
        let mut ctx = NotationContext::new();
        ctx.push_linear();
        ctx.push_custom("mine");
        ctx.current_mut().set_fixity(TokenKind::Plus, 80, Assoc::Right);
        assert_eq!(ctx.current().fixity(TokenKind::Plus).precedence, 80);
        ctx.pop();
        assert!(ctx.is_linear_mode());
        ctx.pop();
        assert_eq!(ctx.current().fixity(TokenKind::Plus).precedence, 60);
    }
}
