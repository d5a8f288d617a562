//! Image buffers crossing the host/package boundary.
//!
//! An [`ImageData`] couples a pixel buffer with its batch geometry and an
//! [`ImageFormat`]. Each format resolves to a fixed element type; supplying
//! a buffer of any other type, or of the wrong length, is rejected at
//! construction with a [`ShapeMismatchError`].

use serde::{Deserialize, Serialize};

use crate::error::ShapeMismatchError;
use crate::tensor::ValueType;

/// Pixel layout of an [`ImageData`] buffer.
///
/// Discriminants are the stable wire codes shared with native packages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageFormat {
    /// Raw unsigned bytes, channel meaning package-defined.
    U8Raw = 0,
    /// Raw 32-bit floats.
    F32Raw = 1,
    /// Raw signed 32-bit integers.
    I32Raw = 2,
    /// 8-bit RGB, three channels.
    U8Rgb = 1001,
    /// 8-bit BGR, three channels.
    U8Bgr = 1002,
    /// 8-bit RGBA, four channels.
    U8Rgba = 1003,
    /// 8-bit BGRA, four channels.
    U8Bgra = 1004,
    /// 8-bit single-channel luminance.
    U8Y = 1005,
}

impl ImageFormat {
    /// Returns the element type this format requires.
    #[must_use]
    pub const fn value_type(self) -> ValueType {
        match self {
            Self::U8Raw | Self::U8Rgb | Self::U8Bgr | Self::U8Rgba | Self::U8Bgra | Self::U8Y => {
                ValueType::Byte
            }
            Self::F32Raw => ValueType::Float,
            Self::I32Raw => ValueType::Int,
        }
    }

    /// Returns the stable numeric code for this format.
    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }

    /// Resolves a numeric code back to a format.
    #[must_use]
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::U8Raw),
            1 => Some(Self::F32Raw),
            2 => Some(Self::I32Raw),
            1001 => Some(Self::U8Rgb),
            1002 => Some(Self::U8Bgr),
            1003 => Some(Self::U8Rgba),
            1004 => Some(Self::U8Bgra),
            1005 => Some(Self::U8Y),
            _ => None,
        }
    }

    /// Returns the canonical name of this format.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::U8Raw => "u8raw",
            Self::F32Raw => "f32raw",
            Self::I32Raw => "i32raw",
            Self::U8Rgb => "u8rgb",
            Self::U8Bgr => "u8bgr",
            Self::U8Rgba => "u8rgba",
            Self::U8Bgra => "u8bgra",
            Self::U8Y => "u8y",
        }
    }
}

impl std::fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed pixel buffer supplied to [`ImageData`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pixels {
    /// Unsigned 8-bit pixels.
    Byte(Vec<u8>),
    /// Signed 32-bit integer pixels.
    Int(Vec<i32>),
    /// 32-bit float pixels.
    Float(Vec<f32>),
}

impl Pixels {
    /// Returns the element type of this buffer.
    #[must_use]
    pub const fn value_type(&self) -> ValueType {
        match self {
            Self::Byte(_) => ValueType::Byte,
            Self::Int(_) => ValueType::Int,
            Self::Float(_) => ValueType::Float,
        }
    }

    /// Returns the raw format carrying this buffer's element type.
    #[must_use]
    pub const fn raw_format(&self) -> ImageFormat {
        match self {
            Self::Byte(_) => ImageFormat::U8Raw,
            Self::Int(_) => ImageFormat::I32Raw,
            Self::Float(_) => ImageFormat::F32Raw,
        }
    }

    /// Returns the number of elements in the buffer.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Byte(data) => data.len(),
            Self::Int(data) => data.len(),
            Self::Float(data) => data.len(),
        }
    }

    /// Returns `true` when the buffer holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A batch of images with fixed geometry and format.
///
/// # Example
///
/// ```
/// use aip_protocol::{ImageData, ImageFormat, Pixels};
///
/// let image = ImageData::new(
///     ImageFormat::U8Bgr,
///     1, 2, 2, 3,
///     Pixels::Byte(vec![0; 12]),
/// ).expect("1x2x2x3 holds 12 bytes");
/// assert_eq!(image.dims(), [1, 2, 2, 3]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageData {
    format: ImageFormat,
    number: u32,
    height: u32,
    width: u32,
    channels: u32,
    data: Pixels,
}

impl ImageData {
    /// Creates an image batch, validating geometry and element type.
    ///
    /// # Errors
    ///
    /// Returns [`ShapeMismatchError::ImageElementCount`] when the buffer
    /// does not hold `number * height * width * channels` elements, and
    /// [`ShapeMismatchError::ImageValueType`] when the buffer's element type
    /// disagrees with the type the format resolves to.
    pub fn new(
        format: ImageFormat,
        number: u32,
        height: u32,
        width: u32,
        channels: u32,
        data: Pixels,
    ) -> Result<Self, ShapeMismatchError> {
        let expected = [number, height, width, channels]
            .iter()
            .map(|&d| d as usize)
            .product::<usize>();
        if data.len() != expected {
            return Err(ShapeMismatchError::ImageElementCount {
                len: data.len(),
                expected,
                number,
                height,
                width,
                channels,
            });
        }
        if data.value_type() != format.value_type() {
            return Err(ShapeMismatchError::ImageValueType {
                format,
                expected: format.value_type(),
                supplied: data.value_type(),
            });
        }
        Ok(Self {
            format,
            number,
            height,
            width,
            channels,
            data,
        })
    }

    /// Creates an image batch with the raw format matching the buffer type.
    ///
    /// # Errors
    ///
    /// Returns [`ShapeMismatchError::ImageElementCount`] when the buffer
    /// does not hold `number * height * width * channels` elements.
    pub fn from_pixels(
        data: Pixels,
        number: u32,
        height: u32,
        width: u32,
        channels: u32,
    ) -> Result<Self, ShapeMismatchError> {
        Self::new(data.raw_format(), number, height, width, channels, data)
    }

    /// Returns the pixel format.
    #[must_use]
    pub const fn format(&self) -> ImageFormat {
        self.format
    }

    /// Returns the element type resolved from the format.
    #[must_use]
    pub const fn value_type(&self) -> ValueType {
        self.format.value_type()
    }

    /// Returns the number of images in the batch.
    #[must_use]
    pub const fn number(&self) -> u32 {
        self.number
    }

    /// Returns the image height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Returns the image width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Returns the channels per pixel.
    #[must_use]
    pub const fn channels(&self) -> u32 {
        self.channels
    }

    /// Returns `[number, height, width, channels]`.
    #[must_use]
    pub const fn dims(&self) -> [u32; 4] {
        [self.number, self.height, self.width, self.channels]
    }

    /// Returns the pixel buffer.
    #[must_use]
    pub const fn pixels(&self) -> &Pixels {
        &self.data
    }

    /// Returns the byte buffer, if this is a byte-format image.
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match &self.data {
            Pixels::Byte(data) => Some(data),
            _ => None,
        }
    }

    /// Returns the integer buffer, if this is an `I32Raw` image.
    #[must_use]
    pub fn as_ints(&self) -> Option<&[i32]> {
        match &self.data {
            Pixels::Int(data) => Some(data),
            _ => None,
        }
    }

    /// Returns the float buffer, if this is an `F32Raw` image.
    #[must_use]
    pub fn as_floats(&self) -> Option<&[f32]> {
        match &self.data {
            Pixels::Float(data) => Some(data),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests;
