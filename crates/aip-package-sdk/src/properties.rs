//! Per-instance property storage and dispatch.
//!
//! Properties are declared once on the builder and instantiated with their
//! defaults for every handle. Dispatch implements the protocol's coercion
//! conventions: a scalar written to an object-valued property arrives as a
//! zero-dimensional double tensor, and an object read as a scalar is
//! unwrapped from one. Misses produce a [`PackageFault`] whose text names
//! the closest bound property.

use std::collections::{BTreeMap, BTreeSet};

use aip_protocol::{Object, Tensor};

use crate::codes;
use crate::distance::closest_name;
use crate::instance::PackageFault;

/// How a declared property stores its value.
#[derive(Debug, Clone)]
pub(crate) enum PropertyDefault {
    /// A double-valued property.
    Scalar(f64),
    /// An object-valued property.
    Object(Object),
}

/// One property declaration on the builder.
#[derive(Debug, Clone)]
pub(crate) struct PropertySpec {
    pub(crate) name: String,
    pub(crate) default: PropertyDefault,
    pub(crate) writable: bool,
}

/// Live property values of one package instance.
#[derive(Debug, Clone, Default)]
pub struct Properties {
    order: Vec<String>,
    scalars: BTreeMap<String, f64>,
    objects: BTreeMap<String, Object>,
    read_only: BTreeSet<String>,
}

impl Properties {
    pub(crate) fn from_specs(specs: &[PropertySpec]) -> Self {
        let mut properties = Self::default();
        for spec in specs {
            properties.order.push(spec.name.clone());
            if !spec.writable {
                properties.read_only.insert(spec.name.clone());
            }
            match &spec.default {
                PropertyDefault::Scalar(value) => {
                    properties.scalars.insert(spec.name.clone(), *value);
                }
                PropertyDefault::Object(object) => {
                    properties.objects.insert(spec.name.clone(), object.clone());
                }
            }
        }
        properties
    }

    /// Returns the bound property names in declaration order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.order
    }

    /// Reads a scalar property without coercion.
    #[must_use]
    pub fn scalar(&self, name: &str) -> Option<f64> {
        self.scalars.get(name).copied()
    }

    /// Reads an object property without coercion.
    #[must_use]
    pub fn object(&self, name: &str) -> Option<&Object> {
        self.objects.get(name)
    }

    /// Writes a scalar, coercing onto an object-valued property if needed.
    pub(crate) fn write_scalar(&mut self, name: &str, value: f64) -> Result<(), PackageFault> {
        self.check_writable(name)?;
        if self.scalars.contains_key(name) {
            self.scalars.insert(name.to_owned(), value);
            return Ok(());
        }
        if self.objects.contains_key(name) {
            self.objects
                .insert(name.to_owned(), Object::from_extra(Tensor::scalar_double(value)));
            return Ok(());
        }
        Err(self.unknown(name))
    }

    /// Reads a scalar, unwrapping an object-valued property if needed.
    pub(crate) fn read_scalar(&self, name: &str) -> Result<f64, PackageFault> {
        if let Some(value) = self.scalar(name) {
            return Ok(value);
        }
        if let Some(object) = self.objects.get(name) {
            return object.extra().as_scalar_double().ok_or_else(|| {
                PackageFault::new(
                    codes::NOT_CONVERTIBLE,
                    format!(
                        "property \"{name}\": cannot convert {} to double",
                        describe_extra(object)
                    ),
                )
            });
        }
        Err(self.unknown(name))
    }

    /// Writes an object, coercing into a scalar-valued property if needed.
    pub(crate) fn write_object(&mut self, name: &str, value: &Object) -> Result<(), PackageFault> {
        self.check_writable(name)?;
        if self.objects.contains_key(name) {
            self.objects.insert(name.to_owned(), value.clone());
            return Ok(());
        }
        if self.scalars.contains_key(name) {
            let scalar = value.extra().as_scalar_double().ok_or_else(|| {
                PackageFault::new(
                    codes::NOT_CONVERTIBLE,
                    format!(
                        "property \"{name}\": cannot convert {} to double",
                        describe_extra(value)
                    ),
                )
            })?;
            self.scalars.insert(name.to_owned(), scalar);
            return Ok(());
        }
        Err(self.unknown(name))
    }

    /// Reads an object, wrapping a scalar-valued property if needed.
    pub(crate) fn read_object(&self, name: &str) -> Result<Object, PackageFault> {
        if let Some(object) = self.objects.get(name) {
            return Ok(object.clone());
        }
        if let Some(value) = self.scalar(name) {
            return Ok(Object::from_extra(Tensor::scalar_double(value)));
        }
        Err(self.unknown(name))
    }

    fn check_writable(&self, name: &str) -> Result<(), PackageFault> {
        if self.read_only.contains(name) {
            return Err(PackageFault::new(
                codes::READ_ONLY_PROPERTY,
                format!("property \"{name}\" is read-only, can not be written"),
            ));
        }
        Ok(())
    }

    fn unknown(&self, name: &str) -> PackageFault {
        let message = match closest_name(name, &self.order) {
            Some(suggestion) => {
                format!("property \"{name}\" does not exist, did you mean \"{suggestion}\"")
            }
            None => format!("property \"{name}\" does not exist"),
        };
        PackageFault::new(codes::UNKNOWN_PROPERTY, message)
    }
}

/// Readable summary of an object's extra tensor, for coercion diagnostics.
fn describe_extra(object: &Object) -> String {
    let extra = object.extra();
    if extra.is_empty() {
        return String::from("null");
    }
    format!("{}{:?}", extra.value_type(), extra.dims())
}
