//! Module resolution and import dependency tracking.
//!
//! Import specifiers resolve against the importing file's directory:
//!
//! 1. `./` or `../` prefix: relative to the importing file.
//! 2. Leading `/` (or a Windows drive letter): absolute.
//! 3. Anything else: `stdlib/<name>.l`.
//!
//! Resolution appends the canonical `.l` extension and verifies the file
//! exists. Existence goes through the [`FileProbe`] trait so the core
//! stays free of mandatory I/O; production uses [`FsProbe`], tests use an
//! in-memory set.
//!
//! The resolver also owns the [`ModuleGraph`] and runs DFS cycle
//! detection on every added edge. A cycle is a hard error naming the
//! module on the back edge.

use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};

use rustc_hash::FxHashMap;
use thiserror::Error;

/// Source file extension for L++ modules.
pub const MODULE_EXTENSION: &str = "l";

/// Error cases from module resolution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// The import specifier did not resolve to an existing file.
    #[error("Cannot resolve module: {0}")]
    NotFound(String),

    /// A cyclic import chain was detected; the payload names a module
    /// on the cycle.
    #[error("Circular dependency detected involving: {0}")]
    Cycle(String),
}

/// Abstraction over "does this file exist" so resolution is testable
/// without touching the filesystem.
pub trait FileProbe {
    /// Whether `path` names an existing regular file.
    fn exists(&self, path: &Path) -> bool;
}

/// Production probe backed by the real filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsProbe;

impl FileProbe for FsProbe {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }
}

/// In-memory probe for tests: a fixed set of paths that "exist".
#[derive(Debug, Default, Clone)]
pub struct SetProbe {
    files: BTreeSet<PathBuf>,
}

impl SetProbe {
    /// Build a probe from a list of paths.
    pub fn new<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            files: paths.into_iter().map(Into::into).collect(),
        }
    }
}

impl FileProbe for SetProbe {
    fn exists(&self, path: &Path) -> bool {
        self.files.contains(&normalize(path))
    }
}

/// Directed import graph between module paths.
///
/// Edges are recorded as `from -> to` ("from imports to"). Duplicate
/// edges are ignored; self edges count as cycles when queried.
///
/// # Examples
///
/// ```
/// use lppc_util::modules::ModuleGraph;
///
/// let mut graph = ModuleGraph::new();
/// graph.add_dependency("a.l", "b.l");
/// graph.add_dependency("b.l", "a.l");
/// assert!(graph.find_cycle("a.l").is_some());
/// ```
#[derive(Debug, Default)]
pub struct ModuleGraph {
    edges: FxHashMap<String, Vec<String>>,
}

impl ModuleGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that module `from` imports module `to`.
    pub fn add_dependency(&mut self, from: impl Into<String>, to: impl Into<String>) {
        let from = from.into();
        let to = to.into();
        let deps = self.edges.entry(from).or_default();
        if !deps.contains(&to) {
            deps.push(to);
        }
    }

    /// Direct dependencies of a module, in insertion order.
    pub fn dependencies(&self, module: &str) -> &[String] {
        self.edges.get(module).map(Vec::as_slice).unwrap_or(&[])
    }

    /// DFS cycle check starting at `module`.
    ///
    /// Returns the module at the back edge if a cycle is reachable,
    /// `None` otherwise. Deterministic: edges are followed in the order
    /// they were added.
    pub fn find_cycle(&self, module: &str) -> Option<String> {
        let mut visited = BTreeSet::new();
        let mut stack = BTreeSet::new();
        self.dfs(module, &mut visited, &mut stack)
    }

    fn dfs(
        &self,
        module: &str,
        visited: &mut BTreeSet<String>,
        stack: &mut BTreeSet<String>,
    ) -> Option<String> {
        if stack.contains(module) {
            return Some(module.to_string());
        }
        if visited.contains(module) {
            return None;
        }
        visited.insert(module.to_string());
        stack.insert(module.to_string());

        for dep in self.dependencies(module) {
            if let Some(found) = self.dfs(dep, visited, stack) {
                return Some(found);
            }
        }

        stack.remove(module);
        None
    }
}

/// Resolves import specifiers for one importing file and tracks the
/// resulting dependency graph.
///
/// # Examples
///
/// ```
/// use lppc_util::modules::{ModuleResolver, SetProbe};
///
/// let probe = SetProbe::new(["src/util.l"]);
/// let mut resolver = ModuleResolver::with_probe("src/main.l", probe);
/// let path = resolver.resolve("./util").unwrap();
/// assert_eq!(path, std::path::PathBuf::from("src/util.l"));
/// ```
#[derive(Debug)]
pub struct ModuleResolver<P: FileProbe = FsProbe> {
    /// File the imports appear in.
    current_file: PathBuf,
    /// Directory resolved-relative imports are anchored at.
    current_dir: PathBuf,
    probe: P,
    graph: ModuleGraph,
}

impl ModuleResolver<FsProbe> {
    /// Resolver for `current_file` backed by the real filesystem.
    pub fn new(current_file: impl Into<PathBuf>) -> Self {
        Self::with_probe(current_file, FsProbe)
    }
}

impl<P: FileProbe> ModuleResolver<P> {
    /// Resolver with an explicit existence probe.
    pub fn with_probe(current_file: impl Into<PathBuf>, probe: P) -> Self {
        let current_file = current_file.into();
        let current_dir = current_file
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Self {
            current_file,
            current_dir,
            probe,
            graph: ModuleGraph::new(),
        }
    }

    /// The file this resolver anchors relative imports at.
    pub fn current_file(&self) -> &Path {
        &self.current_file
    }

    /// Resolve an import specifier to a module path.
    ///
    /// Tries the specifier with the `.l` extension appended, then as
    /// written. Failure returns [`ResolveError::NotFound`]; the caller
    /// turns that into a diagnostic and continues with an empty path.
    pub fn resolve(&mut self, import_path: &str) -> Result<PathBuf, ResolveError> {
        if import_path.starts_with("./") || import_path.starts_with("../") {
            return self.resolve_in(&self.current_dir.clone(), import_path);
        }

        if is_absolute_spec(import_path) {
            return self.resolve_in(Path::new(""), import_path);
        }

        // Standard library fallback: stdlib/<name>.l
        let stdlib = Path::new("stdlib").join(import_path);
        let candidate = with_module_extension(&stdlib);
        if self.probe.exists(&candidate) {
            return Ok(candidate);
        }

        Err(ResolveError::NotFound(import_path.to_string()))
    }

    fn resolve_in(&self, base: &Path, spec: &str) -> Result<PathBuf, ResolveError> {
        let joined = if base.as_os_str().is_empty() {
            PathBuf::from(spec)
        } else {
            base.join(spec)
        };
        let joined = normalize(&joined);

        let with_ext = with_module_extension(&joined);
        if self.probe.exists(&with_ext) {
            return Ok(with_ext);
        }
        if self.probe.exists(&joined) {
            return Ok(joined);
        }

        Err(ResolveError::NotFound(spec.to_string()))
    }

    /// Record an import edge and check for cycles through `from`.
    ///
    /// Returns [`ResolveError::Cycle`] naming a module on the cycle if
    /// the new edge closed one.
    pub fn add_dependency(
        &mut self,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> Result<(), ResolveError> {
        let from = from.into();
        self.graph.add_dependency(from.clone(), to);
        match self.graph.find_cycle(&from) {
            Some(module) => Err(ResolveError::Cycle(module)),
            None => Ok(()),
        }
    }

    /// Direct dependencies recorded for a module.
    pub fn dependencies(&self, module: &str) -> &[String] {
        self.graph.dependencies(module)
    }

    /// Whether any cycle is reachable from `module`.
    pub fn has_circular_dependency(&self, module: &str) -> bool {
        self.graph.find_cycle(module).is_some()
    }
}

/// Whether a specifier is absolute: leading `/` or a drive letter.
fn is_absolute_spec(spec: &str) -> bool {
    if spec.starts_with('/') {
        return true;
    }
    let bytes = spec.as_bytes();
    bytes.len() > 1 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

/// Append the canonical `.l` extension to a path that lacks it.
fn with_module_extension(path: &Path) -> PathBuf {
    match path.extension() {
        Some(ext) if ext == MODULE_EXTENSION => path.to_path_buf(),
        _ => {
            let mut s = path.as_os_str().to_os_string();
            s.push(".");
            s.push(MODULE_EXTENSION);
            PathBuf::from(s)
        }
    }
}

/// Lexical normalization: fold `.` away and collapse `a/../` pairs.
/// Purely textual, matching how specifiers are compared in tests.
fn normalize(path: &Path) -> PathBuf {
    let mut parts: Vec<Component> = Vec::new();
    for comp in path.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(parts.last(), Some(Component::Normal(_))) {
                    parts.pop();
                } else {
                    parts.push(comp);
                }
            }
            other => parts.push(other),
        }
    }
    parts.iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver_with(files: &[&str]) -> ModuleResolver<SetProbe> {
        ModuleResolver::with_probe("src/main.l", SetProbe::new(files.iter().copied()))
    }

    #[test]
    fn test_relative_resolution_appends_extension() {
        let mut r = resolver_with(&["src/util.l"]);
        assert_eq!(r.resolve("./util").unwrap(), PathBuf::from("src/util.l"));
    }

    #[test]
    fn test_parent_relative_resolution() {
        let mut r = resolver_with(&["shared/math.l"]);
        assert_eq!(
            r.resolve("../shared/math").unwrap(),
            PathBuf::from("shared/math.l")
        );
    }

    #[test]
    fn test_absolute_resolution() {
        let mut r = resolver_with(&["/opt/lpp/core.l"]);
        assert_eq!(
            r.resolve("/opt/lpp/core").unwrap(),
            PathBuf::from("/opt/lpp/core.l")
        );
    }

    #[test]
    fn test_stdlib_fallback() {
        let mut r = resolver_with(&["stdlib/math.l"]);
        assert_eq!(r.resolve("math").unwrap(), PathBuf::from("stdlib/math.l"));
    }

    #[test]
    fn test_missing_module() {
        let mut r = resolver_with(&[]);
        assert_eq!(
            r.resolve("./nope"),
            Err(ResolveError::NotFound("./nope".into()))
        );
    }

    #[test]
    fn test_resolve_as_written_when_extension_present() {
        let mut r = resolver_with(&["src/raw.l"]);
        assert_eq!(r.resolve("./raw.l").unwrap(), PathBuf::from("src/raw.l"));
    }

    #[test]
    fn test_windows_drive_is_absolute() {
        assert!(is_absolute_spec("C:/modules/a"));
        assert!(!is_absolute_spec("c"));
        assert!(!is_absolute_spec("lib/a"));
    }

    // ── Cycle detection ────────────────────────────────────────────────

    #[test]
    fn test_no_cycle_linear_chain() {
        let mut r = resolver_with(&[]);
        assert!(r.add_dependency("a.l", "b.l").is_ok());
        assert!(r.add_dependency("b.l", "c.l").is_ok());
        assert!(!r.has_circular_dependency("a.l"));
    }

    #[test]
    fn test_two_node_cycle() {
        let mut r = resolver_with(&[]);
        assert!(r.add_dependency("a.l", "b.l").is_ok());
        let err = r.add_dependency("b.l", "a.l").unwrap_err();
        assert!(matches!(err, ResolveError::Cycle(_)));
    }

    #[test]
    fn test_cycle_names_a_module_on_the_cycle() {
        let mut r = resolver_with(&[]);
        r.add_dependency("a.l", "b.l").unwrap();
        r.add_dependency("b.l", "c.l").unwrap();
        let err = r.add_dependency("c.l", "a.l").unwrap_err();
        match err {
            ResolveError::Cycle(m) => {
                assert!(["a.l", "b.l", "c.l"].contains(&m.as_str()));
            }
            other => panic!("expected cycle, got {other:?}"),
        }
    }

    #[test]
    fn test_self_import_is_a_cycle() {
        let mut r = resolver_with(&[]);
        let err = r.add_dependency("a.l", "a.l").unwrap_err();
        assert_eq!(err, ResolveError::Cycle("a.l".into()));
    }

    #[test]
    fn test_diamond_is_not_a_cycle() {
        let mut r = resolver_with(&[]);
        r.add_dependency("a.l", "b.l").unwrap();
        r.add_dependency("a.l", "c.l").unwrap();
        r.add_dependency("b.l", "d.l").unwrap();
        assert!(r.add_dependency("c.l", "d.l").is_ok());
    }

    #[test]
    fn test_duplicate_edges_ignored() {
        let mut g = ModuleGraph::new();
        g.add_dependency("a.l", "b.l");
        g.add_dependency("a.l", "b.l");
        assert_eq!(g.dependencies("a.l"), ["b.l".to_string()]);
    }
}
