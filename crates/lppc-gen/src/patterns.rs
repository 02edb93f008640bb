//! Design-pattern macro hooks.
//!
//! Classes carrying a `design_pattern` (from `autopattern` expansion or
//! an `@pattern` directive) get a macro invocation injected at the top
//! of their body. The macros live in the companion header
//! `lpp_patterns.hpp`; the emitted class body itself is complete - the
//! macro is additive scaffolding.

/// The macro invocation line for a pattern, e.g.
/// `LPP_PATTERN_OBSERVER(News)`.
///
/// Pattern names are camel case; the macro name is the screaming-snake
/// form (`ChainOfResponsibility` -> `CHAIN_OF_RESPONSIBILITY`).
///
/// # Examples
///
/// ```
/// use lppc_gen::patterns::pattern_macro;
///
/// assert_eq!(pattern_macro("Observer", "News"), "LPP_PATTERN_OBSERVER(News)");
/// assert_eq!(
///     pattern_macro("TemplateMethod", "Report"),
///     "LPP_PATTERN_TEMPLATE_METHOD(Report)"
/// );
/// ```
pub fn pattern_macro(pattern: &str, class_name: &str) -> String {
    format!("LPP_PATTERN_{}({})", screaming_snake(pattern), class_name)
}

/// The companion header the macros come from.
pub const PATTERNS_HEADER: &str = "lpp_patterns.hpp";

fn screaming_snake(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let chars: Vec<char> = name.chars().collect();
    for (i, &c) in chars.iter().enumerate() {
        if c.is_ascii_uppercase() && i > 0 {
            // Word boundary: lower->Upper, or Upper followed by lower
            // inside an acronym run (IOBuffer -> IO_BUFFER).
            let prev_lower = chars[i - 1].is_ascii_lowercase();
            let next_lower = chars.get(i + 1).is_some_and(|n| n.is_ascii_lowercase());
            let prev_upper = chars[i - 1].is_ascii_uppercase();
            if prev_lower || (prev_upper && next_lower) {
                out.push('_');
            }
        }
        out.push(c.to_ascii_uppercase());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_word_patterns() {
        assert_eq!(pattern_macro("Singleton", "Cfg"), "LPP_PATTERN_SINGLETON(Cfg)");
        assert_eq!(pattern_macro("Builder", "Doc"), "LPP_PATTERN_BUILDER(Doc)");
        assert_eq!(pattern_macro("Command", "Undo"), "LPP_PATTERN_COMMAND(Undo)");
    }

    #[test]
    fn test_multi_word_patterns() {
        assert_eq!(
            pattern_macro("ChainOfResponsibility", "Pipeline"),
            "LPP_PATTERN_CHAIN_OF_RESPONSIBILITY(Pipeline)"
        );
        assert_eq!(
            pattern_macro("AbstractFactory", "Kit"),
            "LPP_PATTERN_ABSTRACT_FACTORY(Kit)"
        );
        assert_eq!(
            pattern_macro("StateMonad", "Counter"),
            "LPP_PATTERN_STATE_MONAD(Counter)"
        );
    }

    #[test]
    fn test_acronym_patterns() {
        assert_eq!(pattern_macro("IO", "Console"), "LPP_PATTERN_IO(Console)");
        assert_eq!(
            pattern_macro("AlgebraicEffect", "Eff"),
            "LPP_PATTERN_ALGEBRAIC_EFFECT(Eff)"
        );
    }
}
