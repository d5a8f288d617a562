//! Host-side runtime for pluggable AI Packages.
//!
//! The `aip-host` crate drives native algorithm modules that implement the
//! [`aip_protocol`] contract. It owns the full plugin lifecycle:
//!
//! - an [`Engine`] resolves and loads exactly one module (by name, path, or
//!   raw in-memory image) and validates its declared metadata;
//! - a [`PackageDescriptor`] exposes the module's static metadata together
//!   with every handle-scoped operation;
//! - an [`Instance`] binds one package handle to a compute device and model
//!   set, and manages ownership of an engine it may have created itself.
//!
//! Disposal is explicit and idempotent at every level. An instance frees its
//! native handle exactly once and then refuses further boundary calls; an
//! engine unloads its module exactly once and outstanding descriptors
//! degrade to structured errors instead of undefined behaviour. Dropping an
//! [`Instance`] disposes it, so the usual scope discipline releases native
//! resources on every exit path.
//!
//! # Example
//!
//! ```no_run
//! use aip_host::{Engine, Instance, InstanceSpec};
//!
//! # fn main() -> Result<(), aip_host::HostError> {
//! let engine = Engine::load("face_detector")?;
//! let mut instance = Instance::with_engine(
//!     &engine,
//!     &InstanceSpec::new().with_model("fd_2025.dat"),
//! )?;
//! let _result = instance.forward(0, &[], &[])?;
//! instance.dispose();
//! engine.dispose();
//! # Ok(())
//! # }
//! ```
//!
//! # Concurrency
//!
//! Descriptor metadata is read-only and freely shared. Handle-scoped calls
//! on *different* instances may proceed in parallel; calls on the *same*
//! instance require external serialisation, which the `&mut self` receivers
//! on [`Instance`] enforce. All boundary crossings block until the package
//! returns; no cancellation is available. Disposing an engine while
//! instances created from it are live remains a caller obligation; the
//! protocol has no reference counting.

pub mod descriptor;
pub mod engine;
pub mod error;
pub mod instance;
pub mod metadata;

pub use self::descriptor::PackageDescriptor;
pub use self::engine::{Engine, ModuleSource};
pub use self::error::HostError;
pub use self::instance::{Instance, InstanceSpec, MethodIdPolicy};
pub use self::metadata::{DottedVersion, SUPPORTED_AIP_VERSIONS};
