//! lppc-gen - C++17 Code Generation
//!
//! ============================================================================
//! OVERVIEW
//! ============================================================================
//!
//! Final phase: the validated AST becomes portable C++17 source text.
//! Output is a single translation unit:
//!
//! ```text
//! [fixed preamble]        headers, QuantumVar<T>, print, map/filter/reduce
//! [imports]               #include "module.hpp"
//! [pattern macro header]  #include "lpp_patterns.hpp"   (when needed)
//! [ADTs]                  structs + std::variant aliases
//! [enums] [interfaces] [classes] [functions]
//! ```
//!
//! ============================================================================
//! LOWERING RULES (representative)
//! ============================================================================
//!
//! | Construct            | C++                                        |
//! |----------------------|--------------------------------------------|
//! | pipeline `a \|> f`   | `f(a)`, nesting right-to-left              |
//! | composition `f . g`  | IIFE `[](auto __x){ return f(g(__x)); }`   |
//! | range `a..b[..s]`    | IIFE filling `std::vector<int>` by sign    |
//! | map/filter/reduce    | IIFEs over for-each                        |
//! | match                | IIFE if/else-if chain on equality          |
//! | `x as T`             | `static_cast<T>(x)`                        |
//! | `await e`            | `(e).get()`                                |
//! | `yield e`            | `co_yield e`                               |
//! | async fn             | body wrapped in `std::async`, `std::future`|
//! | `T?` / `A\|B` / `T[N]`| `std::optional` / `std::variant` / `std::array` |
//! | interface            | abstract class, pure virtuals              |
//! | type (ADT)           | structs + `std::variant` alias             |
//!
//! The transpiler assumes a valid AST (the driver refuses to call it on
//! Error diagnostics); [`EmitError`] covers broken pipeline invariants
//! only.

pub mod cpp;
pub mod error;
pub mod patterns;
pub mod preamble;
pub mod types;

#[cfg(test)]
mod tests;

pub use cpp::Transpiler;
pub use error::{EmitError, Result};
pub use preamble::PREAMBLE;

use lppc_par::ast::Program;

/// Transpile a program to C++ source text.
pub fn transpile(program: &Program) -> Result<String> {
    Transpiler::new().transpile(program)
}
