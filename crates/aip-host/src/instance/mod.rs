//! One configured computation context bound to a package handle.
//!
//! An [`Instance`] couples a descriptor with the opaque handle the package
//! issued for it. The handle lives in an `Option`: `take` at disposal is
//! the disposed sentinel, so a freed handle can never reach the boundary
//! again; use-after-dispose is a structured [`HostError::Disposed`], not
//! undefined behaviour.
//!
//! An instance opened straight from a module reference creates an engine
//! and owns it exclusively, cascading [`Engine::dispose`] with its own
//! disposal. An instance built on a caller-supplied engine or descriptor
//! borrows it and leaves it untouched.

use std::path::PathBuf;

use tracing::debug;

use aip_protocol::{Device, ForwardResult, ImageData, Object, PackageMetadata, RawHandle, Value};

use crate::descriptor::PackageDescriptor;
use crate::engine::{Engine, ModuleSource};
use crate::error::HostError;

/// Tracing target for instance lifecycle events.
const INSTANCE_TARGET: &str = "aip_host::instance";

/// How `forward` treats the contested method id `0`.
///
/// The interface documentation reserves `0`, yet packages in the wild use it
/// as their only method; which reading applies is the caller's decision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MethodIdPolicy {
    /// Pass `0` through like any other id. The default, matching observed
    /// package behaviour.
    #[default]
    AllowZero,
    /// Treat `0` as reserved and fail before the boundary.
    RejectZero,
}

/// Parameters for creating an [`Instance`].
///
/// Everything defaults: device `("cpu", 0)`, no model files, no
/// configuration objects, method id `0` allowed.
///
/// # Example
///
/// ```
/// use aip_host::InstanceSpec;
/// use aip_protocol::Device;
///
/// let spec = InstanceSpec::new()
///     .with_device(Device::new("gpu", 1))
///     .with_model("fd_2025.dat");
/// assert_eq!(spec.device().name(), "gpu");
/// ```
#[derive(Debug, Clone, Default)]
pub struct InstanceSpec {
    device: Device,
    models: Vec<PathBuf>,
    objects: Vec<Object>,
    method_id_policy: MethodIdPolicy,
}

impl InstanceSpec {
    /// Creates a spec with every field defaulted.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects the compute device.
    #[must_use]
    pub fn with_device(mut self, device: Device) -> Self {
        self.device = device;
        self
    }

    /// Appends one model file reference.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<PathBuf>) -> Self {
        self.models.push(model.into());
        self
    }

    /// Replaces the model file references.
    #[must_use]
    pub fn with_models(mut self, models: Vec<PathBuf>) -> Self {
        self.models = models;
        self
    }

    /// Appends one auxiliary configuration object.
    #[must_use]
    pub fn with_object(mut self, object: Object) -> Self {
        self.objects.push(object);
        self
    }

    /// Replaces the auxiliary configuration objects.
    #[must_use]
    pub fn with_objects(mut self, objects: Vec<Object>) -> Self {
        self.objects = objects;
        self
    }

    /// Overrides the method id policy.
    #[must_use]
    pub const fn with_method_id_policy(mut self, policy: MethodIdPolicy) -> Self {
        self.method_id_policy = policy;
        self
    }

    /// Returns the selected device.
    #[must_use]
    pub const fn device(&self) -> &Device {
        &self.device
    }

    /// Returns the model file references.
    #[must_use]
    pub fn models(&self) -> &[PathBuf] {
        &self.models
    }

    /// Returns the auxiliary configuration objects.
    #[must_use]
    pub fn objects(&self) -> &[Object] {
        &self.objects
    }

    /// Returns the method id policy.
    #[must_use]
    pub const fn method_id_policy(&self) -> MethodIdPolicy {
        self.method_id_policy
    }
}

/// A live computation context created against one package.
///
/// State-changing operations take `&mut self`, which is the required
/// per-handle serialisation made structural; create one instance per worker
/// for parallel throughput, sharing a single engine.
pub struct Instance {
    descriptor: PackageDescriptor,
    owned_engine: Option<Engine>,
    handle: Option<RawHandle>,
    method_id_policy: MethodIdPolicy,
}

impl Instance {
    /// Loads a module and creates an instance that exclusively owns the
    /// resulting engine; disposal cascades to it.
    ///
    /// # Errors
    ///
    /// Returns the [`Engine::load`] errors, or [`HostError::Init`] when the
    /// package rejects the construction.
    pub fn open(source: impl Into<ModuleSource>, spec: &InstanceSpec) -> Result<Self, HostError> {
        let engine = Engine::load(source)?;
        let descriptor = engine.descriptor();
        Self::construct(descriptor, Some(engine), spec)
    }

    /// Creates an instance that exclusively owns `engine`; disposal cascades
    /// to it.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::Init`] when the package rejects the
    /// construction, or [`HostError::EngineDisposed`].
    pub fn from_engine(engine: Engine, spec: &InstanceSpec) -> Result<Self, HostError> {
        let descriptor = engine.descriptor();
        Self::construct(descriptor, Some(engine), spec)
    }

    /// Creates an instance borrowing `engine`; the caller remains
    /// responsible for disposing it, after this instance.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::Init`] when the package rejects the
    /// construction, or [`HostError::EngineDisposed`].
    pub fn with_engine(engine: &Engine, spec: &InstanceSpec) -> Result<Self, HostError> {
        Self::construct(engine.descriptor(), None, spec)
    }

    /// Creates an instance borrowing an existing descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::Init`] when the package rejects the
    /// construction, or [`HostError::EngineDisposed`].
    pub fn with_descriptor(
        descriptor: PackageDescriptor,
        spec: &InstanceSpec,
    ) -> Result<Self, HostError> {
        Self::construct(descriptor, None, spec)
    }

    fn construct(
        descriptor: PackageDescriptor,
        owned_engine: Option<Engine>,
        spec: &InstanceSpec,
    ) -> Result<Self, HostError> {
        let handle = descriptor.create(spec.device(), spec.models(), spec.objects())?;
        debug!(
            target: INSTANCE_TARGET,
            module = %descriptor.metadata().module,
            %handle,
            device = %spec.device(),
            owned = owned_engine.is_some(),
            "instance created"
        );
        Ok(Self {
            descriptor,
            owned_engine,
            handle: Some(handle),
            method_id_policy: spec.method_id_policy(),
        })
    }

    /// Returns the package metadata.
    #[must_use]
    pub fn metadata(&self) -> &PackageMetadata {
        self.descriptor.metadata()
    }

    /// Returns the descriptor this instance operates through.
    #[must_use]
    pub const fn descriptor(&self) -> &PackageDescriptor {
        &self.descriptor
    }

    /// Returns `true` once this instance has been disposed.
    #[must_use]
    pub const fn is_disposed(&self) -> bool {
        self.handle.is_none()
    }

    fn live_handle(&self) -> Result<RawHandle, HostError> {
        self.handle.ok_or(HostError::Disposed)
    }

    /// Lists the property names currently settable or gettable.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::Property`], [`HostError::Disposed`], or
    /// [`HostError::EngineDisposed`].
    pub fn property(&self) -> Result<Vec<String>, HostError> {
        self.descriptor.property(self.live_handle()?)
    }

    /// Sets a scalar property.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::Property`] when the name is unknown or the value
    /// is outside the accepted domain, [`HostError::Disposed`], or
    /// [`HostError::EngineDisposed`].
    pub fn setd(&mut self, name: &str, value: f64) -> Result<(), HostError> {
        self.descriptor.setd(self.live_handle()?, name, value)
    }

    /// Reads a scalar property.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::Property`], [`HostError::Disposed`], or
    /// [`HostError::EngineDisposed`].
    pub fn getd(&self, name: &str) -> Result<f64, HostError> {
        self.descriptor.getd(self.live_handle()?, name)
    }

    /// Sets a structured property from any [`Value`].
    ///
    /// # Errors
    ///
    /// Returns [`HostError::Property`], [`HostError::Disposed`], or
    /// [`HostError::EngineDisposed`].
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<(), HostError> {
        let object = value.into().into_object();
        self.descriptor.set(self.live_handle()?, name, &object)
    }

    /// Reads a structured property, recovering the most specific [`Value`].
    ///
    /// # Errors
    ///
    /// Returns [`HostError::Property`], [`HostError::Disposed`], or
    /// [`HostError::EngineDisposed`].
    pub fn get(&self, name: &str) -> Result<Value, HostError> {
        let object = self.descriptor.get(self.live_handle()?, name)?;
        Ok(Value::from_object(object))
    }

    /// Clears temporal state kept between ordered frames; a no-op for
    /// stateless algorithms.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::Forward`], [`HostError::Disposed`], or
    /// [`HostError::EngineDisposed`].
    pub fn reset(&mut self) -> Result<(), HostError> {
        self.descriptor.reset(self.live_handle()?)
    }

    /// Runs the computation selected by `method_id` over ordered inputs;
    /// either sequence may be empty.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::Forward`] when the configured policy rejects the
    /// method id or the package reports a failure, [`HostError::Disposed`],
    /// or [`HostError::EngineDisposed`].
    pub fn forward(
        &mut self,
        method_id: u32,
        images: &[ImageData],
        objects: &[Object],
    ) -> Result<ForwardResult, HostError> {
        if self.method_id_policy == MethodIdPolicy::RejectZero && method_id == 0 {
            return Err(HostError::Forward {
                code: 0,
                message: String::from("method id 0 is reserved under the configured policy"),
            });
        }
        self.descriptor
            .forward(self.live_handle()?, method_id, images, objects)
    }

    /// Resolves readable text for one tag label, scoped by method (0 for
    /// unscoped) and tag position. Pure and repeatable; `None` when the
    /// package has no binding.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::Disposed`] or [`HostError::EngineDisposed`].
    pub fn tag(
        &self,
        method_id: u32,
        label_index: u32,
        label_value: i32,
    ) -> Result<Option<String>, HostError> {
        self.descriptor
            .tag(self.live_handle()?, method_id, label_index, label_value)
    }

    /// Returns readable text for a status code, or for the most recent
    /// failure when `code` is [`aip_protocol::LAST_ERROR`]. Yields an empty
    /// string on a disposed instance or engine; diagnostics never raise.
    #[must_use]
    pub fn error(&self, code: i32) -> String {
        let Some(handle) = self.handle else {
            return String::new();
        };
        self.descriptor
            .error(Some(handle), code)
            .unwrap_or_default()
    }

    /// Frees the native handle and, when this instance owns its engine,
    /// disposes that too. Idempotent; a second call has no effect.
    pub fn dispose(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.descriptor.free(handle);
            debug!(
                target: INSTANCE_TARGET,
                module = %self.descriptor.metadata().module,
                %handle,
                "instance disposed"
            );
        }
        if let Some(engine) = self.owned_engine.take() {
            engine.dispose();
        }
    }
}

impl Drop for Instance {
    /// Scope exit releases the handle on every path; explicit
    /// [`Instance::dispose`] remains the primary mechanism.
    fn drop(&mut self) {
        self.dispose();
    }
}

impl std::fmt::Debug for Instance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Instance")
            .field("module", &self.descriptor.metadata().module)
            .field("handle", &self.handle)
            .field("owns_engine", &self.owned_engine.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests;
