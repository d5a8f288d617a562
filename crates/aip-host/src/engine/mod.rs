//! Loading native modules and owning their lifetime.
//!
//! An [`Engine`] owns exactly one loaded module: the [`libloading::Library`]
//! handle (when the module came from disk or memory), the boxed
//! [`AiPackage`] obtained from its entry symbol, and the validated
//! [`PackageMetadata`] copied out at load. Descriptors share the engine's
//! state through an `Arc`; metadata reads never take a lock, handle-scoped
//! calls take a read lock, and disposal takes the write lock and empties the
//! state so a second disposal is a no-op.

use std::io::Write;
use std::sync::{Arc, PoisonError, RwLock};

use libloading::Library;
use tempfile::NamedTempFile;
use tracing::debug;

use aip_protocol::{AiPackage, ENTRY_SYMBOL, EntryFn, PackageHandle, PackageMetadata};

use crate::descriptor::PackageDescriptor;
use crate::error::HostError;
use crate::metadata;

mod resolve;

pub use self::resolve::ModuleSource;

/// Tracing target for engine operations.
const ENGINE_TARGET: &str = "aip_host::engine";

/// One loaded module and everything keeping it callable.
///
/// Field order is load-bearing: the package's code lives inside the
/// library, so the box must drop before the library unloads, and the
/// library before its backing image file is removed.
struct LoadedModule {
    package: Box<dyn AiPackage>,
    _library: Option<Library>,
    _image: Option<NamedTempFile>,
}

/// State shared between an engine and the descriptors it produced.
pub(crate) struct EngineShared {
    metadata: PackageMetadata,
    state: RwLock<Option<LoadedModule>>,
}

impl EngineShared {
    pub(crate) fn metadata(&self) -> &PackageMetadata {
        &self.metadata
    }

    /// Runs an operation against the loaded package under the read lock.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::EngineDisposed`] once the module is unloaded.
    pub(crate) fn with_package<R>(
        &self,
        op: impl FnOnce(&dyn AiPackage) -> R,
    ) -> Result<R, HostError> {
        let guard = self.state.read().unwrap_or_else(PoisonError::into_inner);
        guard
            .as_ref()
            .map(|module| op(module.package.as_ref()))
            .ok_or(HostError::EngineDisposed)
    }

    pub(crate) fn is_disposed(&self) -> bool {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }

    /// Unloads the module; returns `false` when already disposed.
    pub(crate) fn dispose(&self) -> bool {
        self.state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .is_some()
    }
}

/// Owner of one loaded native module.
///
/// # Example
///
/// ```no_run
/// use aip_host::Engine;
///
/// # fn main() -> Result<(), aip_host::HostError> {
/// let engine = Engine::load("face_detector")?;
/// println!("loaded {}", engine.metadata().module);
/// engine.dispose();
/// # Ok(())
/// # }
/// ```
pub struct Engine {
    shared: Arc<EngineShared>,
}

impl Engine {
    /// Resolves and loads a module from a name, path, or raw image.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::Load`] when no candidate can be opened or the
    /// entry symbol is missing, and the metadata validation errors from
    /// [`metadata::validate`] when the module describes itself badly.
    pub fn load(source: impl Into<ModuleSource>) -> Result<Self, HostError> {
        let source = source.into();
        match source {
            ModuleSource::Named(ref name) => {
                let mut last_error = None;
                for candidate in resolve::candidate_paths(name) {
                    match unsafe { Library::new(&candidate) } {
                        Ok(library) => return Self::from_library(library, None, name),
                        Err(err) => last_error = Some(err),
                    }
                }
                Err(HostError::Load {
                    module: name.clone(),
                    message: last_error
                        .map_or_else(|| String::from("no candidate paths"), |err| err.to_string()),
                    source: None,
                })
            }
            ModuleSource::Path(ref path) => {
                let library = unsafe { Library::new(path) }.map_err(|err| HostError::Load {
                    module: source.describe(),
                    message: err.to_string(),
                    source: None,
                })?;
                Self::from_library(library, None, &source.describe())
            }
            ModuleSource::Memory(ref bytes) => {
                let image = materialise_image(bytes)?;
                let library =
                    unsafe { Library::new(image.path()) }.map_err(|err| HostError::Load {
                        module: source.describe(),
                        message: err.to_string(),
                        source: None,
                    })?;
                Self::from_library(library, Some(image), &source.describe())
            }
        }
    }

    /// Wraps a statically linked, in-process package.
    ///
    /// The engine behaves exactly as with a native module, except there is
    /// no library to unload at disposal.
    ///
    /// # Errors
    ///
    /// Returns the metadata validation errors from [`metadata::validate`].
    pub fn from_package(package: Box<dyn AiPackage>) -> Result<Self, HostError> {
        Self::from_parts(package, None, None)
    }

    fn from_library(
        library: Library,
        image: Option<NamedTempFile>,
        module_ref: &str,
    ) -> Result<Self, HostError> {
        let package = {
            let entry = unsafe { library.get::<EntryFn>(ENTRY_SYMBOL) }.map_err(|err| {
                HostError::Load {
                    module: module_ref.to_owned(),
                    message: format!("entry symbol missing: {err}"),
                    source: None,
                }
            })?;
            let raw = unsafe { entry() };
            if raw.is_null() {
                return Err(HostError::Load {
                    module: module_ref.to_owned(),
                    message: String::from("entry symbol returned no package"),
                    source: None,
                });
            }
            unsafe { PackageHandle::into_boxed(raw) }
        };
        Self::from_parts(package, Some(library), image)
    }

    fn from_parts(
        package: Box<dyn AiPackage>,
        library: Option<Library>,
        image: Option<NamedTempFile>,
    ) -> Result<Self, HostError> {
        let metadata = package.metadata();
        if let Err(err) = metadata::validate(&metadata) {
            // The box must not outlive the library its code lives in.
            drop(package);
            return Err(err);
        }
        debug!(
            target: ENGINE_TARGET,
            module = %metadata.module,
            version = %metadata.version,
            aip_version = metadata.aip_version,
            "package loaded"
        );
        Ok(Self {
            shared: Arc::new(EngineShared {
                metadata,
                state: RwLock::new(Some(LoadedModule {
                    package,
                    _library: library,
                    _image: image,
                })),
            }),
        })
    }

    /// Returns the validated metadata copied out at load.
    #[must_use]
    pub fn metadata(&self) -> &PackageMetadata {
        self.shared.metadata()
    }

    /// Produces a descriptor sharing this engine's module.
    #[must_use]
    pub fn descriptor(&self) -> PackageDescriptor {
        PackageDescriptor::new(Arc::clone(&self.shared))
    }

    /// Returns `true` once the module has been unloaded.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.shared.is_disposed()
    }

    /// Unloads the module. Idempotent; a second call is a no-op.
    ///
    /// Must not be called while instances created from this engine are still
    /// live; the protocol leaves that ordering to the caller.
    pub fn dispose(&self) {
        if self.shared.dispose() {
            debug!(
                target: ENGINE_TARGET,
                module = %self.shared.metadata().module,
                "module unloaded"
            );
        }
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("module", &self.shared.metadata().module)
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

/// Writes a raw module image to a temporary file it can be loaded from.
fn materialise_image(bytes: &[u8]) -> Result<NamedTempFile, HostError> {
    let io_load = |err: std::io::Error| HostError::Load {
        module: String::from("<memory>"),
        message: String::from("could not materialise module image"),
        source: Some(Arc::new(err)),
    };
    let mut image = NamedTempFile::new().map_err(io_load)?;
    image.write_all(bytes).map_err(io_load)?;
    image.flush().map_err(io_load)?;
    Ok(image)
}
