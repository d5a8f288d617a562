//! The per-instance behaviour a package author implements.

use std::path::PathBuf;

use thiserror::Error;

use aip_protocol::{Device, ForwardResult, ImageData, Object};

use crate::properties::Properties;

/// A failure reported by package code: a non-zero status code plus the
/// readable text the SDK serves through the `error` operation.
#[derive(Debug, Clone, Error)]
#[error("code {code}: {message}")]
pub struct PackageFault {
    code: i32,
    message: String,
}

impl PackageFault {
    /// Creates a fault from a status code and readable text.
    #[must_use]
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Returns the status code.
    #[must_use]
    pub const fn code(&self) -> i32 {
        self.code
    }

    /// Returns the readable text.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

/// Everything `create` received from the host, as one view.
#[derive(Debug, Clone, Copy)]
pub struct CreateContext<'a> {
    device: &'a Device,
    models: &'a [PathBuf],
    objects: &'a [Object],
}

impl<'a> CreateContext<'a> {
    pub(crate) const fn new(
        device: &'a Device,
        models: &'a [PathBuf],
        objects: &'a [Object],
    ) -> Self {
        Self {
            device,
            models,
            objects,
        }
    }

    /// Returns the compute device the instance is bound to.
    #[must_use]
    pub const fn device(&self) -> &'a Device {
        self.device
    }

    /// Returns the model file references.
    #[must_use]
    pub const fn models(&self) -> &'a [PathBuf] {
        self.models
    }

    /// Returns the auxiliary configuration objects.
    #[must_use]
    pub const fn objects(&self) -> &'a [Object] {
        self.objects
    }
}

/// One live computation context inside a package.
///
/// The SDK owns the instance behind its handle arena and serialises calls
/// per handle; implementations only provide the algorithm. Current property
/// values arrive read-only with each `forward` call.
pub trait PackageInstance: Send {
    /// Runs the computation selected by `method_id`.
    ///
    /// # Errors
    ///
    /// Returns a [`PackageFault`] on shape mismatch or algorithm failure;
    /// the SDK records it as the handle's last error.
    fn forward(
        &mut self,
        properties: &Properties,
        method_id: u32,
        images: &[ImageData],
        objects: &[Object],
    ) -> Result<ForwardResult, PackageFault>;

    /// Clears temporal state kept between ordered frames. The default does
    /// nothing, which suits stateless algorithms.
    ///
    /// # Errors
    ///
    /// Returns a [`PackageFault`] when state cannot be cleared.
    fn reset(&mut self) -> Result<(), PackageFault> {
        Ok(())
    }
}

/// Factory producing one [`PackageInstance`] per `create` call.
pub type InstanceFactory =
    Box<dyn Fn(&CreateContext<'_>) -> Result<Box<dyn PackageInstance>, PackageFault> + Send + Sync>;
