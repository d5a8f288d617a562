//! The assembled package: handle arena, dispatch, and error tracking.

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use aip_protocol::{
    AiPackage, Device, Fault, ForwardResult, ImageData, LAST_ERROR, Object, PackageMetadata,
    PackageResult, RawHandle,
};

use crate::codes;
use crate::instance::{CreateContext, InstanceFactory, PackageFault, PackageInstance};
use crate::properties::{Properties, PropertySpec};

/// State of one live handle.
struct Entry {
    instance: Box<dyn PackageInstance>,
    properties: Properties,
    last_error: Option<(i32, String)>,
}

/// Handle arena; identifiers are issued monotonically and never reused, so
/// a double free cannot resurrect a later instance.
#[derive(Default)]
struct Arena {
    next: u64,
    entries: HashMap<u64, Entry>,
}

/// A complete [`AiPackage`] assembled by the builder.
///
/// One bound package serves any number of instances. The arena lock is held
/// for the duration of each handle-scoped call, which serialises calls per
/// package; hosts that need parallel throughput across instances load the
/// module once per worker or accept the serialisation.
pub struct BoundPackage {
    metadata: PackageMetadata,
    specs: Vec<PropertySpec>,
    tags: BTreeMap<(u32, u32, i32), String>,
    errors: BTreeMap<i32, String>,
    factory: InstanceFactory,
    arena: Mutex<Arena>,
    create_error: Mutex<Option<(i32, String)>>,
}

impl BoundPackage {
    pub(crate) fn new(
        metadata: PackageMetadata,
        specs: Vec<PropertySpec>,
        tags: BTreeMap<(u32, u32, i32), String>,
        errors: BTreeMap<i32, String>,
        factory: InstanceFactory,
    ) -> Self {
        Self {
            metadata,
            specs,
            tags,
            errors,
            factory,
            arena: Mutex::new(Arena::default()),
            create_error: Mutex::new(None),
        }
    }

    /// Runs an operation against a live entry, recording any fault as the
    /// handle's last error and narrowing it to the wire code.
    fn with_entry<R>(
        &self,
        handle: RawHandle,
        op: impl FnOnce(&mut Entry) -> Result<R, PackageFault>,
    ) -> PackageResult<R> {
        let mut arena = self.arena.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(entry) = arena.entries.get_mut(&handle.raw()) else {
            return Err(Fault::new(codes::UNKNOWN_HANDLE));
        };
        match op(&mut *entry) {
            Ok(value) => Ok(value),
            Err(fault) => {
                let code = fault.code();
                entry.last_error = Some((code, fault.message().to_owned()));
                Err(Fault::new(code))
            }
        }
    }
}

impl AiPackage for BoundPackage {
    fn metadata(&self) -> PackageMetadata {
        self.metadata.clone()
    }

    fn create(
        &self,
        device: &Device,
        models: &[PathBuf],
        objects: &[Object],
    ) -> PackageResult<RawHandle> {
        let context = CreateContext::new(device, models, objects);
        match (self.factory)(&context) {
            Ok(instance) => {
                let mut arena = self.arena.lock().unwrap_or_else(PoisonError::into_inner);
                arena.next += 1;
                let raw = arena.next;
                arena.entries.insert(
                    raw,
                    Entry {
                        instance,
                        properties: Properties::from_specs(&self.specs),
                        last_error: None,
                    },
                );
                Ok(RawHandle::new(raw))
            }
            Err(fault) => {
                let mut create_error = self
                    .create_error
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner);
                *create_error = Some((fault.code(), fault.message().to_owned()));
                Err(Fault::new(fault.code()))
            }
        }
    }

    fn free(&self, handle: RawHandle) {
        let mut arena = self.arena.lock().unwrap_or_else(PoisonError::into_inner);
        arena.entries.remove(&handle.raw());
    }

    fn property(&self, handle: RawHandle) -> PackageResult<Vec<String>> {
        self.with_entry(handle, |entry| Ok(entry.properties.names().to_vec()))
    }

    fn setd(&self, handle: RawHandle, name: &str, value: f64) -> PackageResult<()> {
        self.with_entry(handle, |entry| entry.properties.write_scalar(name, value))
    }

    fn getd(&self, handle: RawHandle, name: &str) -> PackageResult<f64> {
        self.with_entry(handle, |entry| entry.properties.read_scalar(name))
    }

    fn set(&self, handle: RawHandle, name: &str, value: &Object) -> PackageResult<()> {
        self.with_entry(handle, |entry| entry.properties.write_object(name, value))
    }

    fn get(&self, handle: RawHandle, name: &str) -> PackageResult<Object> {
        self.with_entry(handle, |entry| entry.properties.read_object(name))
    }

    fn reset(&self, handle: RawHandle) -> PackageResult<()> {
        self.with_entry(handle, |entry| entry.instance.reset())
    }

    fn forward(
        &self,
        handle: RawHandle,
        method_id: u32,
        images: &[ImageData],
        objects: &[Object],
    ) -> PackageResult<ForwardResult> {
        self.with_entry(handle, |entry| {
            let Entry {
                instance,
                properties,
                ..
            } = entry;
            instance.forward(properties, method_id, images, objects)
        })
    }

    fn tag(
        &self,
        _handle: RawHandle,
        method_id: u32,
        label_index: u32,
        label_value: i32,
    ) -> Option<String> {
        self.tags
            .get(&(method_id, label_index, label_value))
            .cloned()
    }

    fn error(&self, handle: Option<RawHandle>, code: i32) -> Option<String> {
        let last = match handle {
            Some(handle) => {
                let arena = self.arena.lock().unwrap_or_else(PoisonError::into_inner);
                arena
                    .entries
                    .get(&handle.raw())
                    .and_then(|entry| entry.last_error.clone())
            }
            None => self
                .create_error
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone(),
        };
        // The recorded failure text wins over the static table whenever the
        // caller asks for the sentinel or for the code that produced it.
        if let Some((last_code, message)) = last {
            if code == LAST_ERROR || code == last_code {
                return Some(message);
            }
        }
        if code == LAST_ERROR {
            return None;
        }
        self.errors.get(&code).cloned()
    }
}
