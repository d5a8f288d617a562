//! Stable, versioned interface between an AI Package host and its packages.
//!
//! The `aip-protocol` crate defines everything both sides of the boundary
//! agree on: the marshaling data model (tensors, images, geometric shapes,
//! tagged detections), the [`AiPackage`] trait a package implements, and the
//! entry-symbol convention a native module exports. It performs no I/O and
//! no native calls; every type validates itself at construction so that a
//! malformed buffer is rejected host-side with a [`ShapeMismatchError`]
//! before it can reach a package.
//!
//! # Layering
//!
//! Hosts depend on this crate through `aip-host`, which adds module loading
//! and lifecycle management. Package authors depend on it through
//! `aip-package-sdk`, which adds declarative property/tag binding and the
//! `export_package!` macro. Neither side needs the other's crate.
//!
//! # Example
//!
//! ```
//! use aip_protocol::{Tensor, ValueType};
//!
//! let tensor = Tensor::int(vec![1, 2, 3, 4, 5, 6], vec![2, 3]).expect("2x3 holds 6 values");
//! assert_eq!(tensor.value_type(), ValueType::Int);
//! assert_eq!(tensor.dims(), &[2, 3]);
//! ```

pub mod device;
pub mod error;
pub mod image;
pub mod object;
pub mod package;
pub mod shape;
pub mod tensor;

pub use self::device::{Device, Point};
pub use self::error::ShapeMismatchError;
pub use self::image::{ImageData, ImageFormat, Pixels};
pub use self::object::{ForwardResult, Object, Tag, Value};
pub use self::package::{
    AIP_VERSION, AiPackage, ENTRY_SYMBOL, EntryFn, Fault, LAST_ERROR, PackageHandle,
    PackageMetadata, PackageResult, RawHandle,
};
pub use self::shape::{LandmarkCount, Shape, ShapeType};
pub use self::tensor::{Tensor, TensorData, ValueType};
