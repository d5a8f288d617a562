//! Well-known fault codes the SDK reports on behalf of a package.
//!
//! Authors may override the text of any of these through
//! `PackageBuilder::bind_error`; the codes themselves are fixed so hosts
//! can recognise them across packages.

/// A handle-scoped operation named a handle the arena does not know.
pub const UNKNOWN_HANDLE: i32 = 0x2001;

/// A property operation named an unbound property.
pub const UNKNOWN_PROPERTY: i32 = 0x2002;

/// A write was attempted on a read-only property.
pub const READ_ONLY_PROPERTY: i32 = 0x2003;

/// A property value could not be coerced between scalar and object form.
pub const NOT_CONVERTIBLE: i32 = 0x2004;

/// `create` was called on a builder that never bound an instance factory.
pub const NO_FACTORY: i32 = 0x2005;

/// Default text for a well-known code.
#[must_use]
pub const fn default_message(code: i32) -> Option<&'static str> {
    match code {
        UNKNOWN_HANDLE => Some("unknown instance handle"),
        UNKNOWN_PROPERTY => Some("unknown property"),
        READ_ONLY_PROPERTY => Some("property is read-only"),
        NOT_CONVERTIBLE => Some("property value is not convertible"),
        NO_FACTORY => Some("package binds no instance factory"),
        _ => None,
    }
}
