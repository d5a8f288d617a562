//! The host error taxonomy.
//!
//! All errors use `thiserror`-derived variants with structured context so
//! callers can inspect failures programmatically. Package-reported failures
//! carry the numeric code from the boundary plus the readable text resolved
//! through the package's `error` operation; host-side validation failures
//! never reach a package at all.

use std::sync::Arc;

use thiserror::Error;

use aip_protocol::ShapeMismatchError;

/// Errors raised by engine, descriptor, and instance operations.
#[derive(Debug, Clone, Error)]
pub enum HostError {
    /// The module could not be resolved, opened, or its entry symbol found.
    #[error("failed to load module '{module}': {message}")]
    Load {
        /// Module reference as given: a name, a path, or `<memory>`.
        module: String,
        /// Human-readable failure description.
        message: String,
        /// Optional underlying I/O error.
        #[source]
        source: Option<Arc<std::io::Error>>,
    },

    /// The module declares an interface version outside the supported range.
    #[error("module '{module}' declares AIP version {found}, host supports {min}..={max}")]
    UnsupportedAipVersion {
        /// Module name from the package metadata.
        module: String,
        /// Version the module declares.
        found: i32,
        /// Lowest supported version.
        min: i32,
        /// Highest supported version.
        max: i32,
    },

    /// The module name violates `[a-zA-Z_][a-zA-Z_0-9]*`.
    #[error("module name '{name}' is not a valid identifier")]
    InvalidModuleName {
        /// The offending name.
        name: String,
    },

    /// The package reported a failure while constructing an instance.
    #[error("instance construction failed with code {code}: {message}")]
    Init {
        /// Package-reported status code.
        code: i32,
        /// Text resolved through the package's error lookup.
        message: String,
    },

    /// A property operation failed: unknown name, read-only target, or a
    /// value outside the accepted domain.
    #[error("property '{name}' failed with code {code}: {message}")]
    Property {
        /// Requested property name; empty for the enumeration operation.
        name: String,
        /// Package-reported status code.
        code: i32,
        /// Text resolved through the package's error lookup.
        message: String,
    },

    /// The package reported a failure during computation or state reset.
    #[error("computation failed with code {code}: {message}")]
    Forward {
        /// Package-reported status code.
        code: i32,
        /// Text resolved through the package's error lookup.
        message: String,
    },

    /// A handle-scoped operation was attempted on a disposed instance.
    #[error("instance is disposed; no further operations are possible")]
    Disposed,

    /// A handle-scoped operation was attempted after the owning engine was
    /// disposed.
    #[error("engine is disposed; the module is no longer loaded")]
    EngineDisposed,

    /// A buffer failed host-side validation before the boundary.
    #[error(transparent)]
    Shape(#[from] ShapeMismatchError),
}

#[cfg(test)]
mod tests;
