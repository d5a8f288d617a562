//! Static metadata plus the handle-scoped operations of one loaded module.
//!
//! A [`PackageDescriptor`] is produced by an engine and shares its state:
//! metadata reads are lock-free, every handle-scoped operation takes the
//! engine's read lock for the duration of the boundary call, and once the
//! engine is disposed each operation fails with
//! [`HostError::EngineDisposed`] instead of touching unloaded code.
//!
//! Package faults are resolved to readable text here, while the package is
//! still at hand: the specific code is looked up first, then the last-error
//! sentinel, before the structured host error is built.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::warn;

use aip_protocol::{
    AiPackage, Device, ForwardResult, ImageData, LAST_ERROR, Object, PackageMetadata, RawHandle,
};

use crate::engine::EngineShared;
use crate::error::HostError;

/// Tracing target for descriptor operations.
const DESCRIPTOR_TARGET: &str = "aip_host::descriptor";

/// Metadata and per-handle operations of one loaded module.
#[derive(Clone)]
pub struct PackageDescriptor {
    shared: Arc<EngineShared>,
}

impl PackageDescriptor {
    pub(crate) fn new(shared: Arc<EngineShared>) -> Self {
        Self { shared }
    }

    /// Returns the module's static metadata.
    #[must_use]
    pub fn metadata(&self) -> &PackageMetadata {
        self.shared.metadata()
    }

    /// Parses the metadata description into JSON.
    ///
    /// # Errors
    ///
    /// Returns the parse error when the package's description field is not
    /// valid JSON.
    pub fn description_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_str(&self.shared.metadata().description)
    }

    /// Returns `true` once the owning engine has been disposed.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.shared.is_disposed()
    }

    /// Creates a package instance bound to a device, model files, and
    /// auxiliary configuration objects.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::Init`] with the package's code and resolved text
    /// on construction failure, or [`HostError::EngineDisposed`].
    pub fn create(
        &self,
        device: &Device,
        models: &[PathBuf],
        objects: &[Object],
    ) -> Result<RawHandle, HostError> {
        self.shared.with_package(|package| {
            package.create(device, models, objects).map_err(|fault| {
                let message = resolve_error(package, None, fault.code());
                warn!(
                    target: DESCRIPTOR_TARGET,
                    module = %self.shared.metadata().module,
                    code = fault.code(),
                    "instance construction failed"
                );
                HostError::Init {
                    code: fault.code(),
                    message,
                }
            })
        })?
    }

    /// Destroys a package instance. Never fails; freeing against a disposed
    /// engine is logged and skipped, since the module is already gone.
    pub fn free(&self, handle: RawHandle) {
        let freed = self.shared.with_package(|package| package.free(handle));
        if freed.is_err() {
            warn!(
                target: DESCRIPTOR_TARGET,
                module = %self.shared.metadata().module,
                %handle,
                "free skipped: engine already disposed"
            );
        }
    }

    /// Lists the property names the instance currently exposes.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::Property`] or [`HostError::EngineDisposed`].
    pub fn property(&self, handle: RawHandle) -> Result<Vec<String>, HostError> {
        self.shared.with_package(|package| {
            package.property(handle).map_err(|fault| HostError::Property {
                name: String::new(),
                code: fault.code(),
                message: resolve_error(package, Some(handle), fault.code()),
            })
        })?
    }

    /// Sets a scalar property.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::Property`] or [`HostError::EngineDisposed`].
    pub fn setd(&self, handle: RawHandle, name: &str, value: f64) -> Result<(), HostError> {
        self.shared.with_package(|package| {
            package
                .setd(handle, name, value)
                .map_err(|fault| property_error(package, handle, name, fault.code()))
        })?
    }

    /// Reads a scalar property.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::Property`] or [`HostError::EngineDisposed`].
    pub fn getd(&self, handle: RawHandle, name: &str) -> Result<f64, HostError> {
        self.shared.with_package(|package| {
            package
                .getd(handle, name)
                .map_err(|fault| property_error(package, handle, name, fault.code()))
        })?
    }

    /// Sets a structured property.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::Property`] or [`HostError::EngineDisposed`].
    pub fn set(&self, handle: RawHandle, name: &str, value: &Object) -> Result<(), HostError> {
        self.shared.with_package(|package| {
            package
                .set(handle, name, value)
                .map_err(|fault| property_error(package, handle, name, fault.code()))
        })?
    }

    /// Reads a structured property.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::Property`] or [`HostError::EngineDisposed`].
    pub fn get(&self, handle: RawHandle, name: &str) -> Result<Object, HostError> {
        self.shared.with_package(|package| {
            package
                .get(handle, name)
                .map_err(|fault| property_error(package, handle, name, fault.code()))
        })?
    }

    /// Clears temporal state kept between ordered frames.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::Forward`] or [`HostError::EngineDisposed`].
    pub fn reset(&self, handle: RawHandle) -> Result<(), HostError> {
        self.shared.with_package(|package| {
            package.reset(handle).map_err(|fault| HostError::Forward {
                code: fault.code(),
                message: resolve_error(package, Some(handle), fault.code()),
            })
        })?
    }

    /// Runs one computation over ordered image and object inputs.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::Forward`] with the package's code and resolved
    /// text, or [`HostError::EngineDisposed`].
    pub fn forward(
        &self,
        handle: RawHandle,
        method_id: u32,
        images: &[ImageData],
        objects: &[Object],
    ) -> Result<ForwardResult, HostError> {
        self.shared.with_package(|package| {
            package
                .forward(handle, method_id, images, objects)
                .map_err(|fault| {
                    warn!(
                        target: DESCRIPTOR_TARGET,
                        module = %self.shared.metadata().module,
                        method_id,
                        code = fault.code(),
                        "forward failed"
                    );
                    HostError::Forward {
                        code: fault.code(),
                        message: resolve_error(package, Some(handle), fault.code()),
                    }
                })
        })?
    }

    /// Resolves readable text for one tag label; `None` when the package has
    /// no binding for it.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::EngineDisposed`].
    pub fn tag(
        &self,
        handle: RawHandle,
        method_id: u32,
        label_index: u32,
        label_value: i32,
    ) -> Result<Option<String>, HostError> {
        self.shared
            .with_package(|package| package.tag(handle, method_id, label_index, label_value))
    }

    /// Returns readable text for a status code, or for the most recent
    /// failure when `code` is [`LAST_ERROR`]. Unknown codes yield an empty
    /// string.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::EngineDisposed`].
    pub fn error(&self, handle: Option<RawHandle>, code: i32) -> Result<String, HostError> {
        self.shared
            .with_package(|package| package.error(handle, code).unwrap_or_default())
    }
}

impl std::fmt::Debug for PackageDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PackageDescriptor")
            .field("module", &self.shared.metadata().module)
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

/// Resolves a fault's text: the specific code first, then the last-error
/// sentinel, then an empty string.
fn resolve_error(package: &dyn AiPackage, handle: Option<RawHandle>, code: i32) -> String {
    package
        .error(handle, code)
        .or_else(|| package.error(handle, LAST_ERROR))
        .unwrap_or_default()
}

/// Builds the structured property error for a faulted operation.
fn property_error(package: &dyn AiPackage, handle: RawHandle, name: &str, code: i32) -> HostError {
    HostError::Property {
        name: name.to_owned(),
        code,
        message: resolve_error(package, Some(handle), code),
    }
}
