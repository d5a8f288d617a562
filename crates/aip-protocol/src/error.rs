//! Host-side marshaling failures.
//!
//! These errors are raised by the constructors in this crate, strictly
//! before any boundary crossing; a package never observes a buffer that
//! failed validation.

use thiserror::Error;

use crate::image::ImageFormat;
use crate::tensor::ValueType;

/// A buffer does not fit the dimensions or type it was declared with.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeMismatchError {
    /// A tensor payload does not hold exactly `product(dims)` elements.
    #[error("tensor of {len} element(s) does not fill dims {dims:?}, expected {expected}")]
    TensorElementCount {
        /// Number of elements in the supplied payload.
        len: usize,
        /// Number of elements the dims require.
        expected: usize,
        /// The declared dimension sizes.
        dims: Vec<u32>,
    },

    /// An image payload does not hold `number * height * width * channels`
    /// elements.
    #[error(
        "image of {len} element(s) does not fill {number}x{height}x{width}x{channels}, expected {expected}"
    )]
    ImageElementCount {
        /// Number of elements in the supplied payload.
        len: usize,
        /// Number of elements the image geometry requires.
        expected: usize,
        /// Number of images in the batch.
        number: u32,
        /// Image height in pixels.
        height: u32,
        /// Image width in pixels.
        width: u32,
        /// Channels per pixel.
        channels: u32,
    },

    /// An image payload's element type disagrees with the type its format
    /// resolves to.
    #[error("image format {format} carries {expected} data, got {supplied}")]
    ImageValueType {
        /// The declared image format.
        format: ImageFormat,
        /// The element type the format requires.
        expected: ValueType,
        /// The element type of the supplied payload.
        supplied: ValueType,
    },
}
