//! Declarative assembly of a complete package.

use std::collections::BTreeMap;

use aip_protocol::{Object, PackageMetadata};

use crate::bound::BoundPackage;
use crate::codes;
use crate::instance::{CreateContext, InstanceFactory, PackageFault, PackageInstance};
use crate::properties::{PropertyDefault, PropertySpec};

/// Builder collecting metadata, property declarations, tag texts, error
/// texts, and the instance factory of one package.
///
/// Re-binding a name, tag, or code replaces the earlier binding.
pub struct PackageBuilder {
    metadata: PackageMetadata,
    specs: Vec<PropertySpec>,
    tags: BTreeMap<(u32, u32, i32), String>,
    errors: BTreeMap<i32, String>,
    factory: Option<InstanceFactory>,
}

impl PackageBuilder {
    /// Starts a builder from the package's static metadata.
    #[must_use]
    pub fn new(metadata: PackageMetadata) -> Self {
        Self {
            metadata,
            specs: Vec::new(),
            tags: BTreeMap::new(),
            errors: BTreeMap::new(),
            factory: None,
        }
    }

    /// Declares a writable double-valued property with its default.
    #[must_use]
    pub fn bind_scalar(self, name: impl Into<String>, default: f64) -> Self {
        self.bind_property(name.into(), PropertyDefault::Scalar(default), true)
    }

    /// Declares a read-only double-valued property.
    #[must_use]
    pub fn bind_read_only_scalar(self, name: impl Into<String>, default: f64) -> Self {
        self.bind_property(name.into(), PropertyDefault::Scalar(default), false)
    }

    /// Declares a writable object-valued property with its default.
    #[must_use]
    pub fn bind_object(self, name: impl Into<String>, default: Object) -> Self {
        self.bind_property(name.into(), PropertyDefault::Object(default), true)
    }

    /// Declares a read-only object-valued property.
    #[must_use]
    pub fn bind_read_only_object(self, name: impl Into<String>, default: Object) -> Self {
        self.bind_property(name.into(), PropertyDefault::Object(default), false)
    }

    fn bind_property(mut self, name: String, default: PropertyDefault, writable: bool) -> Self {
        self.specs.retain(|spec| spec.name != name);
        self.specs.push(PropertySpec {
            name,
            default,
            writable,
        });
        self
    }

    /// Binds readable text to one tag label, scoped by method and position.
    #[must_use]
    pub fn bind_tag(
        mut self,
        method_id: u32,
        label_index: u32,
        label_value: i32,
        text: impl Into<String>,
    ) -> Self {
        self.tags
            .insert((method_id, label_index, label_value), text.into());
        self
    }

    /// Binds readable text to a status code.
    #[must_use]
    pub fn bind_error(mut self, code: i32, text: impl Into<String>) -> Self {
        self.errors.insert(code, text.into());
        self
    }

    /// Binds the factory producing one [`PackageInstance`] per `create`.
    #[must_use]
    pub fn factory(
        mut self,
        factory: impl Fn(&CreateContext<'_>) -> Result<Box<dyn PackageInstance>, PackageFault>
        + Send
        + Sync
        + 'static,
    ) -> Self {
        self.factory = Some(Box::new(factory));
        self
    }

    /// Finishes the package.
    ///
    /// A builder without a factory still builds; its `create` reports
    /// [`codes::NO_FACTORY`]. Default texts for the SDK's well-known codes
    /// are filled in wherever the author did not override them.
    #[must_use]
    pub fn build(self) -> BoundPackage {
        let mut errors = self.errors;
        for code in [
            codes::UNKNOWN_HANDLE,
            codes::UNKNOWN_PROPERTY,
            codes::READ_ONLY_PROPERTY,
            codes::NOT_CONVERTIBLE,
            codes::NO_FACTORY,
        ] {
            if let Some(text) = codes::default_message(code) {
                errors.entry(code).or_insert_with(|| text.to_owned());
            }
        }
        let factory = self.factory.unwrap_or_else(|| {
            Box::new(|_ctx: &CreateContext<'_>| {
                Err(PackageFault::new(
                    codes::NO_FACTORY,
                    "package binds no instance factory",
                ))
            })
        });
        BoundPackage::new(self.metadata, self.specs, self.tags, errors, factory)
    }
}
