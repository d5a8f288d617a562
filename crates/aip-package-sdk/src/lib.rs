//! Author-side toolkit for building AI Packages.
//!
//! The SDK turns a per-instance algorithm type into a complete
//! [`aip_protocol::AiPackage`]: implement [`PackageInstance`] for the
//! algorithm, declare metadata, properties, tag texts, and error texts on a
//! [`PackageBuilder`], and export the result with [`export_package!`].
//!
//! The bound package manages everything the protocol expects from the
//! package side: a handle arena that rejects unknown and double frees,
//! property dispatch with read-only detection and "did you mean"
//! suggestions, scalar/object property coercion, per-handle last-error
//! tracking behind the `error` operation, and the tag lookup table.
//!
//! # Example
//!
//! ```
//! use aip_package_sdk::{PackageBuilder, PackageFault, PackageInstance, Properties};
//! use aip_protocol::{ForwardResult, ImageData, Object, PackageMetadata};
//!
//! struct Identity;
//!
//! impl PackageInstance for Identity {
//!     fn forward(
//!         &mut self,
//!         _properties: &Properties,
//!         _method_id: u32,
//!         images: &[ImageData],
//!         objects: &[Object],
//!     ) -> Result<ForwardResult, PackageFault> {
//!         Ok(ForwardResult::new(images.to_vec(), objects.to_vec()))
//!     }
//! }
//!
//! let _package = PackageBuilder::new(PackageMetadata {
//!     aip_version: 2,
//!     module: "Identity".into(),
//!     description: "{}".into(),
//!     m_id: "identity.package".into(),
//!     s_id: "ID".into(),
//!     version: "1.0".into(),
//!     support: vec!["cpu".into()],
//! })
//! .bind_scalar("threshold", 0.5)
//! .factory(|_ctx| Ok(Box::new(Identity)))
//! .build();
//! ```

pub mod bound;
pub mod builder;
pub mod codes;
mod distance;
pub mod instance;
pub mod properties;

/// Re-export of the protocol crate for package authors and the
/// [`export_package!`] macro.
pub use aip_protocol as protocol;

pub use self::bound::BoundPackage;
pub use self::builder::PackageBuilder;
pub use self::instance::{CreateContext, PackageFault, PackageInstance};
pub use self::properties::Properties;


/// Exports the entry symbol a host resolves when loading this module.
///
/// The expression must evaluate to a type implementing
/// [`aip_protocol::AiPackage`], typically a [`BoundPackage`].
///
/// # Example
///
/// ```ignore
/// aip_package_sdk::export_package!(crate::package());
/// ```
#[macro_export]
macro_rules! export_package {
    ($build:expr) => {
        /// Entry symbol handing this module's package to a host.
        #[unsafe(no_mangle)]
        pub extern "C" fn aip_package_entry() -> *mut $crate::protocol::PackageHandle {
            let package: ::std::boxed::Box<dyn $crate::protocol::AiPackage> =
                ::std::boxed::Box::new($build);
            $crate::protocol::PackageHandle::from_boxed(package)
        }
    };
}
