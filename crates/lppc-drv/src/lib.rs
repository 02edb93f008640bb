//! lppc-drv - Compiler Driver
//!
//! ============================================================================
//! OVERVIEW
//! ============================================================================
//!
//! Entry point and orchestrator for the pipeline. The driver owns
//! everything the core refuses to: command line parsing, file I/O,
//! diagnostic rendering, and exit codes. The core's contract stays a
//! string of source in, a string of C++ out, plus a list of
//! diagnostics.
//!
//! ```text
//! Source (.l)
//!      │
//!      ▼
//! [Lexer] ──▶ tokens
//!      │
//!      ▼
//! [Parser] ──▶ AST (+ paradigm)
//!      │
//!      ▼
//! [Module resolver] ──▶ resolved imports / cycle diagnostics
//!      │
//!      ▼
//! [Static analyzer] ──▶ diagnostics
//!      │
//!      ▼  (no Error-severity diagnostics)
//! [Transpiler] ──▶ C++ source text
//! ```
//!
//! Any diagnostic with Error severity aborts before transpilation;
//! warnings and notes let the pipeline proceed.
//!
//! ============================================================================
//! COMMAND LINE INTERFACE
//! ============================================================================
//!
//! ```text
//! lppc <input.l> [-o <output>] [-c] [--emit tokens|ast|cpp] [-v]
//! ```
//!
//! - `-o <output>`: path of the generated C++ file (default
//!   `<input>.cpp`).
//! - `-c`: generate C++ only; never hand the result to a host C++
//!   compiler.
//! - `--emit`: stop after a phase and dump its output.
//!
//! Exit codes: `0` on success, `1` on any Error diagnostic or I/O
//! failure. Diagnostics render as
//! `file:line:column: severity: [CODE] message` with `note:` lines.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use lppc_gen::Transpiler;
use lppc_lex::Lexer;
use lppc_par::Parser;
use lppc_sem::StaticAnalyzer;
use lppc_util::diagnostic::DiagnosticCode;
use lppc_util::{Diagnostic, Handler, Level, ModuleResolver, ResolveError, Span};

/// What the driver should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmitKind {
    /// Token dump.
    Tokens,
    /// AST dump.
    Ast,
    /// Generated C++ (the default).
    #[default]
    Cpp,
}

/// One invocation's configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub input_file: PathBuf,
    /// Output path; defaults to `<input>.cpp`.
    pub output_file: Option<PathBuf>,
    pub emit: EmitKind,
    /// `-c`: stop after code generation.
    pub generate_only: bool,
    pub verbose: bool,
}

impl Config {
    /// Parse command line arguments. Returns `None` when `--help` was
    /// requested and printed.
    pub fn from_args(args: &[String]) -> anyhow::Result<Option<Config>> {
        let mut input_file = None;
        let mut output_file = None;
        let mut emit = EmitKind::default();
        let mut generate_only = false;
        let mut verbose = false;

        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--help" => {
                    print_usage();
                    return Ok(None);
                }
                "-o" => {
                    let path = iter.next().context("expected a path after '-o'")?;
                    output_file = Some(PathBuf::from(path));
                }
                "-c" => generate_only = true,
                "-v" | "--verbose" => verbose = true,
                "--emit" => {
                    let kind = iter.next().context("expected a mode after '--emit'")?;
                    emit = match kind.as_str() {
                        "tokens" => EmitKind::Tokens,
                        "ast" => EmitKind::Ast,
                        "cpp" => EmitKind::Cpp,
                        other => bail!("unknown emit mode '{other}'"),
                    };
                }
                other if other.starts_with('-') => bail!("unknown option '{other}'"),
                other => {
                    if input_file.is_some() {
                        bail!("multiple input files given");
                    }
                    input_file = Some(PathBuf::from(other));
                }
            }
        }

        let input_file = input_file.context("no input file specified")?;
        Ok(Some(Config {
            input_file,
            output_file,
            emit,
            generate_only,
            verbose,
        }))
    }
}

fn print_usage() {
    println!("Usage: lppc <input.l> [-o <output>] [-c] [--emit tokens|ast|cpp] [-v]");
    println!("Options:");
    println!("  -o <output>   Path of the generated C++ file (default: <input>.cpp)");
    println!("  -c            Generate C++ only (no host compiler invocation)");
    println!("  --emit <mode> Stop after a phase: tokens, ast, or cpp");
    println!("  -v            Verbose phase logging");
    println!("  --help        Show this help message");
}

/// Result of compiling one source string.
pub struct CompileOutput {
    /// The generated C++, absent when an Error diagnostic aborted the
    /// pipeline.
    pub cpp: Option<String>,
    /// All diagnostics, in emission order.
    pub diagnostics: Vec<Diagnostic>,
}

impl CompileOutput {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.level == Level::Error)
    }
}

/// Compile a source string: lex, parse, resolve imports, analyze, and
/// (absent errors) transpile.
///
/// `input_path` anchors relative imports and appears in rendered
/// diagnostics; no file I/O happens here beyond the resolver's
/// existence probe.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use lppc_drv::compile_source;
///
/// let out = compile_source(
///     "#pragma paradigm hybrid\nfn main() -> int { return 0; }",
///     Path::new("demo.l"),
/// );
/// assert!(!out.has_errors());
/// assert!(out.cpp.unwrap().contains("int main() {"));
/// ```
pub fn compile_source(source: &str, input_path: &Path) -> CompileOutput {
    let handler = Handler::new();

    // Phase 1: lexing (total; never reports).
    let tokens = Lexer::tokenize(source);

    // Phase 2: parsing.
    let program = Parser::new(tokens, &handler).parse();

    // Phase 3: module resolution.
    let mut resolver = ModuleResolver::new(input_path);
    let importer = input_path.to_string_lossy().into_owned();
    for import in &program.imports {
        if let lppc_par::ast::Stmt::Import { module, .. } = import {
            match resolver.resolve(module) {
                Ok(resolved) => {
                    let edge = resolver.add_dependency(
                        importer.clone(),
                        resolved.to_string_lossy().into_owned(),
                    );
                    if let Err(ResolveError::Cycle(on_cycle)) = edge {
                        handler
                            .build_error(
                                Span::DUMMY,
                                format!("Circular dependency detected involving: {on_cycle}"),
                            )
                            .code(DiagnosticCode::MOD_CYCLE)
                            .emit(&handler);
                    }
                }
                Err(ResolveError::NotFound(spec)) => {
                    handler
                        .build_error(Span::DUMMY, format!("Cannot resolve module: {spec}"))
                        .code(DiagnosticCode::MOD_NOT_FOUND)
                        .emit(&handler);
                }
                Err(ResolveError::Cycle(on_cycle)) => {
                    handler
                        .build_error(
                            Span::DUMMY,
                            format!("Circular dependency detected involving: {on_cycle}"),
                        )
                        .code(DiagnosticCode::MOD_CYCLE)
                        .emit(&handler);
                }
            }
        }
    }

    // Phase 4: flow analysis.
    StaticAnalyzer::new(&handler).analyze(&program);

    // Phase 5: transpilation, only on a clean (Error-free) program.
    let cpp = if handler.has_errors() {
        None
    } else {
        match Transpiler::new().transpile(&program) {
            Ok(cpp) => Some(cpp),
            Err(e) => {
                handler
                    .build_error(Span::DUMMY, e.to_string())
                    .emit(&handler);
                None
            }
        }
    };

    CompileOutput {
        cpp,
        diagnostics: handler.diagnostics(),
    }
}

/// A compilation session: configuration plus the work of one
/// invocation.
pub struct Session {
    pub config: Config,
}

impl Session {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Run the compilation; returns the process exit code.
    pub fn compile(&self) -> anyhow::Result<i32> {
        let input = &self.config.input_file;
        let source = fs::read_to_string(input)
            .with_context(|| format!("could not read '{}'", input.display()))?;

        if self.config.verbose {
            eprintln!("Compiling: {}", input.display());
        }

        // Early phase dumps.
        match self.config.emit {
            EmitKind::Tokens => {
                for token in Lexer::tokenize(&source) {
                    println!("{token:?}");
                }
                return Ok(0);
            }
            EmitKind::Ast => {
                let handler = Handler::new();
                let program = Parser::new(Lexer::tokenize(&source), &handler).parse();
                self.render_diagnostics(&handler.diagnostics());
                println!("{program:#?}");
                return Ok(if handler.has_errors() { 1 } else { 0 });
            }
            EmitKind::Cpp => {}
        }

        let output = compile_source(&source, input);
        self.render_diagnostics(&output.diagnostics);

        let error_count = output
            .diagnostics
            .iter()
            .filter(|d| d.level == Level::Error)
            .count();
        let warning_count = output
            .diagnostics
            .iter()
            .filter(|d| d.level == Level::Warning)
            .count();

        if error_count > 0 {
            eprintln!("\nCompilation failed with {error_count} error(s) and {warning_count} warning(s)");
            return Ok(1);
        }

        let cpp = output
            .cpp
            .context("transpiler produced no output on a clean program")?;

        let out_path = match &self.config.output_file {
            Some(path) => path.clone(),
            None => {
                let mut path = input.as_os_str().to_os_string();
                path.push(".cpp");
                PathBuf::from(path)
            }
        };
        fs::write(&out_path, cpp)
            .with_context(|| format!("could not write '{}'", out_path.display()))?;

        if self.config.verbose {
            eprintln!("Generated: {}", out_path.display());
            if self.config.generate_only {
                eprintln!("Skipping host compiler invocation (-c)");
            }
        }

        Ok(0)
    }

    fn render_diagnostics(&self, diagnostics: &[Diagnostic]) {
        let file = self.config.input_file.to_string_lossy();
        for diag in diagnostics {
            eprintln!("{}", diag.render(&file));
        }
    }
}

/// Parse `std::env::args` and run one session.
pub fn run() -> anyhow::Result<i32> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(config) = Config::from_args(&args)? else {
        return Ok(0);
    };
    Session::new(config).compile()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(src: &str) -> CompileOutput {
        compile_source(src, Path::new("test.l"))
    }

    #[test]
    fn test_clean_program_produces_cpp() {
        let out = compile("#pragma paradigm hybrid\nfn main() -> int { return 0; }");
        assert!(!out.has_errors());
        let cpp = out.cpp.expect("cpp output");
        assert!(cpp.contains("int main() {"));
        assert!(cpp.starts_with(lppc_gen::PREAMBLE));
    }

    #[test]
    fn test_error_aborts_before_transpilation() {
        // Scenario: no pragma plus an uninitialized read; both reported,
        // no C++ produced.
        let out = compile("fn f() -> int { let x: int; return x; }");
        assert!(out.has_errors());
        assert!(out.cpp.is_none());

        let codes: Vec<_> = out
            .diagnostics
            .iter()
            .filter_map(|d| d.code.map(|c| c.as_str()))
            .collect();
        assert!(codes.contains(&"PRAGMA"), "{codes:?}");
        assert!(codes.contains(&"UNINIT-READ"), "{codes:?}");
    }

    #[test]
    fn test_warnings_do_not_abort() {
        let out = compile(
            "#pragma paradigm hybrid\nfn f() -> int { let p = alloc(8); return 0; }",
        );
        assert!(!out.has_errors());
        assert!(out.cpp.is_some());
        assert!(out
            .diagnostics
            .iter()
            .any(|d| d.code == Some(DiagnosticCode::MEM_LEAK)));
    }

    #[test]
    fn test_missing_module_is_an_error() {
        let out = compile(
            "#pragma paradigm hybrid\nimport { f } from \"./does_not_exist\";\nfn main() -> int { return 0; }",
        );
        assert!(out.has_errors());
        assert!(out
            .diagnostics
            .iter()
            .any(|d| d.code == Some(DiagnosticCode::MOD_NOT_FOUND)));
    }

    #[test]
    fn test_diagnostic_rendering_format() {
        let out = compile("#pragma paradigm hybrid\nfn g(n: int) -> int { return n / 0; }");
        let div = out
            .diagnostics
            .iter()
            .find(|d| d.code == Some(DiagnosticCode::DIV_BY_ZERO))
            .expect("div-by-zero diagnostic");
        let rendered = div.render("test.l");
        assert!(
            rendered.starts_with("test.l:2:"),
            "unexpected rendering: {rendered}"
        );
        assert!(rendered.contains(": error: [DIV-BY-ZERO] "), "{rendered}");
        assert!(rendered.contains("in function 'g'"), "{rendered}");
    }

    #[test]
    fn test_config_parsing() {
        let config = Config::from_args(&[
            "main.l".to_string(),
            "-o".to_string(),
            "out.cpp".to_string(),
            "-c".to_string(),
        ])
        .unwrap()
        .unwrap();
        assert_eq!(config.input_file, PathBuf::from("main.l"));
        assert_eq!(config.output_file, Some(PathBuf::from("out.cpp")));
        assert!(config.generate_only);
        assert_eq!(config.emit, EmitKind::Cpp);
    }

    #[test]
    fn test_config_rejects_unknown_flags() {
        assert!(Config::from_args(&["-x".to_string()]).is_err());
        assert!(Config::from_args(&[]).is_err());
    }

    #[test]
    fn test_diagnostics_are_ordered_by_position() {
        let out = compile(
            "#pragma paradigm hybrid\n\
             fn f() -> int { let a: int; let b = a; return b / 0; }",
        );
        let spans: Vec<_> = out
            .diagnostics
            .iter()
            .map(|d| (d.span.line, d.span.column))
            .collect();
        let mut sorted = spans.clone();
        sorted.sort();
        assert_eq!(spans, sorted, "diagnostics out of order: {spans:?}");
    }
}
