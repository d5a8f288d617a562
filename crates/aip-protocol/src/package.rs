//! The package-side contract: metadata, the [`AiPackage`] trait, and the
//! entry-symbol convention for native modules.
//!
//! A package is a vtable behind an opaque state object. Hosts obtain one
//! either in-process (a plain boxed trait object) or by resolving
//! [`ENTRY_SYMBOL`] in a native module and calling the [`EntryFn`] it
//! exports, which hands over a boxed package through [`PackageHandle`].
//!
//! Fallible operations report a numeric [`Fault`]; the host turns a fault
//! into text through [`AiPackage::error`], passing either the specific code
//! or [`LAST_ERROR`] for the most recent failure.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::device::Device;
use crate::image::ImageData;
use crate::object::{ForwardResult, Object};

/// The interface version this crate speaks.
pub const AIP_VERSION: i32 = 2;

/// Error-code sentinel selecting the most recent failure in
/// [`AiPackage::error`].
pub const LAST_ERROR: i32 = -1;

/// Symbol a native module exports to hand over its package.
pub const ENTRY_SYMBOL: &[u8] = b"aip_package_entry";

/// Signature of the exported entry symbol.
pub type EntryFn = unsafe extern "C" fn() -> *mut PackageHandle;

/// Opaque identifier of one package instance.
///
/// Issued by the package from `create`; the host never interprets the value,
/// it only carries it back into handle-scoped operations and tracks whether
/// it is still live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RawHandle(u64);

impl RawHandle {
    /// Wraps a package-issued identifier.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the package-issued identifier.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for RawHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// A non-zero status code reported by a package operation.
///
/// The code is package-defined; readable text is obtained separately through
/// [`AiPackage::error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fault(i32);

impl Fault {
    /// Wraps a package-reported status code.
    #[must_use]
    pub const fn new(code: i32) -> Self {
        Self(code)
    }

    /// Returns the numeric status code.
    #[must_use]
    pub const fn code(self) -> i32 {
        self.0
    }
}

impl std::fmt::Display for Fault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "fault {}", self.0)
    }
}

/// Result of a fallible package operation.
pub type PackageResult<T> = Result<T, Fault>;

/// Static description of a loaded package.
///
/// All fields are fixed for the lifetime of the module. `support` is an
/// advisory list of device tags and is never consulted by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageMetadata {
    /// Declared interface version.
    pub aip_version: i32,
    /// Module name; must match `[a-zA-Z_][a-zA-Z_0-9]*`.
    pub module: String,
    /// JSON description of methods, properties, and formats.
    pub description: String,
    /// Opaque stable id of the package.
    pub m_id: String,
    /// Human-readable algorithm id, e.g. `"SSD"`.
    pub s_id: String,
    /// Package version as a dotted, segment-wise comparable string.
    pub version: String,
    /// Advisory device tags, e.g. `["cpu", "gpu"]`.
    pub support: Vec<String>,
}

/// Operations every AI Package implements.
///
/// One implementor serves any number of instances; handle-scoped operations
/// are keyed by the [`RawHandle`] argument, not by shared mutable state.
/// Implementations must tolerate concurrent calls on *different* handles;
/// calls on the same handle are externally serialised by the caller.
pub trait AiPackage: Send + Sync {
    /// Returns the package's static metadata.
    fn metadata(&self) -> PackageMetadata;

    /// Creates a configured instance bound to a device, model files, and
    /// auxiliary configuration objects.
    ///
    /// # Errors
    ///
    /// Returns a [`Fault`] when construction fails; the host resolves its
    /// text through [`AiPackage::error`] with no handle.
    fn create(
        &self,
        device: &Device,
        models: &[PathBuf],
        objects: &[Object],
    ) -> PackageResult<RawHandle>;

    /// Destroys an instance. Unknown handles are ignored.
    fn free(&self, handle: RawHandle);

    /// Lists the property names currently settable or gettable.
    ///
    /// # Errors
    ///
    /// Returns a [`Fault`] when the instance cannot enumerate properties.
    fn property(&self, handle: RawHandle) -> PackageResult<Vec<String>>;

    /// Sets a scalar property.
    ///
    /// # Errors
    ///
    /// Returns a [`Fault`] when the name is unknown, read-only, or the value
    /// is outside the accepted domain.
    fn setd(&self, handle: RawHandle, name: &str, value: f64) -> PackageResult<()>;

    /// Reads a scalar property.
    ///
    /// # Errors
    ///
    /// Returns a [`Fault`] when the name is unknown.
    fn getd(&self, handle: RawHandle, name: &str) -> PackageResult<f64>;

    /// Sets a structured property.
    ///
    /// # Errors
    ///
    /// Returns a [`Fault`] when the name is unknown, read-only, or the value
    /// cannot be accepted.
    fn set(&self, handle: RawHandle, name: &str, value: &Object) -> PackageResult<()>;

    /// Reads a structured property.
    ///
    /// # Errors
    ///
    /// Returns a [`Fault`] when the name is unknown.
    fn get(&self, handle: RawHandle, name: &str) -> PackageResult<Object>;

    /// Clears temporal state kept between ordered frames. A no-op for
    /// stateless algorithms.
    ///
    /// # Errors
    ///
    /// Returns a [`Fault`] when the instance cannot be reset.
    fn reset(&self, handle: RawHandle) -> PackageResult<()>;

    /// Runs one computation selected by `method_id` over ordered image and
    /// object inputs; either sequence may be empty.
    ///
    /// # Errors
    ///
    /// Returns a [`Fault`] on shape mismatch or algorithm failure.
    fn forward(
        &self,
        handle: RawHandle,
        method_id: u32,
        images: &[ImageData],
        objects: &[Object],
    ) -> PackageResult<ForwardResult>;

    /// Resolves readable text for one tag label, scoped by method and tag
    /// position. Pure in its three integer arguments.
    fn tag(&self, handle: RawHandle, method_id: u32, label_index: u32, label_value: i32)
    -> Option<String>;

    /// Returns readable text for a status code, or for the most recent
    /// failure when `code` is [`LAST_ERROR`]. `handle` is `None` before any
    /// instance exists (construction failures).
    fn error(&self, handle: Option<RawHandle>, code: i32) -> Option<String>;
}

/// Opaque FFI wrapper moving a boxed package across the entry symbol.
///
/// The pointer produced by [`PackageHandle::from_boxed`] is a thin pointer
/// suitable for a C-ABI return value; ownership transfers to whoever calls
/// [`PackageHandle::into_boxed`].
#[repr(C)]
pub struct PackageHandle {
    _opaque: [u8; 0],
}

impl PackageHandle {
    /// Wraps a boxed package for transfer through the entry symbol.
    #[must_use]
    pub fn from_boxed(package: Box<dyn AiPackage>) -> *mut Self {
        Box::into_raw(Box::new(package)).cast()
    }

    /// Recovers the boxed package from an entry-symbol pointer.
    ///
    /// # Safety
    ///
    /// `ptr` must originate from [`PackageHandle::from_boxed`] and must not
    /// be consumed twice.
    #[must_use]
    pub unsafe fn into_boxed(ptr: *mut Self) -> Box<dyn AiPackage> {
        *unsafe { Box::from_raw(ptr.cast::<Box<dyn AiPackage>>()) }
    }
}
