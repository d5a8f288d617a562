//! Resolution of module references to loadable paths.

use std::path::{Path, PathBuf};

/// Reference to a native module: a bare name to resolve, a concrete path,
/// or a raw in-memory image of the module.
#[derive(Debug, Clone)]
pub enum ModuleSource {
    /// A library name resolved against platform conventions and the usual
    /// search directories.
    Named(String),
    /// A concrete filesystem path, used as given.
    Path(PathBuf),
    /// A raw module image, materialised to a temporary file before loading.
    Memory(Vec<u8>),
}

impl ModuleSource {
    /// Returns a short reference string for error reporting.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Named(name) => name.clone(),
            Self::Path(path) => path.display().to_string(),
            Self::Memory(_) => String::from("<memory>"),
        }
    }
}

impl From<&str> for ModuleSource {
    fn from(name: &str) -> Self {
        Self::Named(name.to_owned())
    }
}

impl From<String> for ModuleSource {
    fn from(name: String) -> Self {
        Self::Named(name)
    }
}

impl From<PathBuf> for ModuleSource {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<&Path> for ModuleSource {
    fn from(path: &Path) -> Self {
        Self::Path(path.to_path_buf())
    }
}

impl From<Vec<u8>> for ModuleSource {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Memory(bytes)
    }
}

/// Platform extension for native modules.
const fn platform_extension() -> &'static str {
    if cfg!(target_os = "windows") {
        "dll"
    } else if cfg!(target_os = "macos") {
        "dylib"
    } else {
        "so"
    }
}

/// Expands a bare library name into the candidate paths to try, in order.
///
/// A name that already contains a path separator is used as given. Otherwise
/// the name is tried as-is, with the platform extension appended, and with a
/// `lib` prefix, each relative to the current and executable-adjacent
/// directories.
pub(crate) fn candidate_paths(name: &str) -> Vec<PathBuf> {
    let path = Path::new(name);
    if name.contains('/') || name.contains('\\') {
        return vec![path.to_path_buf()];
    }

    let mut names = vec![name.to_owned()];
    if path.extension().is_none() {
        let ext = platform_extension();
        names.push(format!("{name}.{ext}"));
        if !cfg!(target_os = "windows") && !name.starts_with("lib") {
            names.push(format!("lib{name}.{ext}"));
        }
    }

    let mut dirs = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd);
    }
    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            dirs.push(dir.to_path_buf());
        }
    }

    let mut candidates = vec![PathBuf::from(name)];
    for dir in &dirs {
        for name in &names {
            candidates.push(dir.join(name));
        }
    }
    candidates
}
