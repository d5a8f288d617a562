//! Typed, shape-checked multi-dimensional buffers.
//!
//! A [`Tensor`] is a closed tagged union over the protocol's element types
//! plus an ordered sequence of dimension sizes. Exactly one payload is
//! populated and its element count must equal the product of the dims; the
//! check happens at construction, never at the boundary. A [`ValueType::Char`]
//! tensor carries a single string payload whose dims record its character
//! length.

use serde::{Deserialize, Serialize};

use crate::error::ShapeMismatchError;

/// Element type of a [`Tensor`] payload.
///
/// Discriminants are the stable wire codes shared with native packages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    /// No value.
    Void = 0,
    /// Unsigned 8-bit integer.
    Byte = 2,
    /// Signed 32-bit integer.
    Int = 5,
    /// 32-bit floating point.
    Float = 10,
    /// 64-bit floating point.
    Double = 11,
    /// Character data; the payload is a single string.
    Char = 13,
}

impl ValueType {
    /// Returns the stable numeric code for this type.
    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }

    /// Resolves a numeric code back to a value type.
    #[must_use]
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Void),
            2 => Some(Self::Byte),
            5 => Some(Self::Int),
            10 => Some(Self::Float),
            11 => Some(Self::Double),
            13 => Some(Self::Char),
            _ => None,
        }
    }

    /// Returns the canonical lower-case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Void => "void",
            Self::Byte => "byte",
            Self::Int => "int",
            Self::Float => "float",
            Self::Double => "double",
            Self::Char => "char",
        }
    }
}

impl std::fmt::Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload of a [`Tensor`], one variant per [`ValueType`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TensorData {
    /// No payload.
    Void,
    /// Unsigned 8-bit elements.
    Byte(Vec<u8>),
    /// Signed 32-bit elements.
    Int(Vec<i32>),
    /// 32-bit float elements.
    Float(Vec<f32>),
    /// 64-bit float elements.
    Double(Vec<f64>),
    /// A single string; dims record the character length.
    Char(String),
}

impl TensorData {
    /// Returns the value type of this payload.
    #[must_use]
    pub const fn value_type(&self) -> ValueType {
        match self {
            Self::Void => ValueType::Void,
            Self::Byte(_) => ValueType::Byte,
            Self::Int(_) => ValueType::Int,
            Self::Float(_) => ValueType::Float,
            Self::Double(_) => ValueType::Double,
            Self::Char(_) => ValueType::Char,
        }
    }

    /// Returns the number of elements (characters for a string payload).
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Void => 0,
            Self::Byte(data) => data.len(),
            Self::Int(data) => data.len(),
            Self::Float(data) => data.len(),
            Self::Double(data) => data.len(),
            Self::Char(text) => text.chars().count(),
        }
    }

    /// Returns `true` when the payload holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A typed, shape-checked buffer exchanged with packages.
///
/// # Example
///
/// ```
/// use aip_protocol::{Tensor, ValueType};
///
/// let t = Tensor::int(vec![1, 2, 3, 4, 5, 6], vec![2, 3]).expect("counts match");
/// assert_eq!(t.value_type(), ValueType::Int);
/// assert_eq!(t.element_count(), 6);
///
/// let err = Tensor::byte(vec![0; 10], vec![3]).expect_err("10 != 3");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tensor {
    data: TensorData,
    dims: Vec<u32>,
}

impl Tensor {
    /// Creates a tensor from a payload and dims, validating their agreement.
    ///
    /// An array payload must hold exactly `product(dims)` elements, where an
    /// empty dims sequence means a single (scalar) element. A string payload
    /// must declare its character length as the sole dim. A void payload
    /// must declare no dims.
    ///
    /// # Errors
    ///
    /// Returns [`ShapeMismatchError::TensorElementCount`] when the payload
    /// does not fill the dims.
    pub fn new(data: TensorData, dims: Vec<u32>) -> Result<Self, ShapeMismatchError> {
        let expected = match &data {
            TensorData::Void => 0,
            TensorData::Char(_) => dims.first().copied().unwrap_or(0) as usize,
            _ => element_product(&dims),
        };
        let valid = match &data {
            TensorData::Void => dims.is_empty(),
            TensorData::Char(_) => dims.len() == 1 && data.len() == expected,
            _ => data.len() == expected,
        };
        if !valid {
            return Err(ShapeMismatchError::TensorElementCount {
                len: data.len(),
                expected,
                dims,
            });
        }
        Ok(Self { data, dims })
    }

    /// Creates an empty (void) tensor.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            data: TensorData::Void,
            dims: Vec::new(),
        }
    }

    /// Creates a byte tensor.
    ///
    /// # Errors
    ///
    /// Returns [`ShapeMismatchError::TensorElementCount`] when
    /// `data.len() != product(dims)`.
    pub fn byte(data: Vec<u8>, dims: Vec<u32>) -> Result<Self, ShapeMismatchError> {
        Self::new(TensorData::Byte(data), dims)
    }

    /// Creates a signed 32-bit integer tensor.
    ///
    /// # Errors
    ///
    /// Returns [`ShapeMismatchError::TensorElementCount`] when
    /// `data.len() != product(dims)`.
    pub fn int(data: Vec<i32>, dims: Vec<u32>) -> Result<Self, ShapeMismatchError> {
        Self::new(TensorData::Int(data), dims)
    }

    /// Creates a 32-bit float tensor.
    ///
    /// # Errors
    ///
    /// Returns [`ShapeMismatchError::TensorElementCount`] when
    /// `data.len() != product(dims)`.
    pub fn float(data: Vec<f32>, dims: Vec<u32>) -> Result<Self, ShapeMismatchError> {
        Self::new(TensorData::Float(data), dims)
    }

    /// Creates a 64-bit float tensor.
    ///
    /// # Errors
    ///
    /// Returns [`ShapeMismatchError::TensorElementCount`] when
    /// `data.len() != product(dims)`.
    pub fn double(data: Vec<f64>, dims: Vec<u32>) -> Result<Self, ShapeMismatchError> {
        Self::new(TensorData::Double(data), dims)
    }

    /// Creates a string tensor; dims record the character length.
    #[must_use]
    pub fn chars(text: impl Into<String>) -> Self {
        let text = text.into();
        let dims = vec![u32::try_from(text.chars().count()).unwrap_or(u32::MAX)];
        Self {
            data: TensorData::Char(text),
            dims,
        }
    }

    /// Creates a scalar (zero-dimensional) double tensor.
    ///
    /// Scalar doubles are the conventional carrier for numeric property
    /// values wrapped as objects.
    #[must_use]
    pub fn scalar_double(value: f64) -> Self {
        Self {
            data: TensorData::Double(vec![value]),
            dims: Vec::new(),
        }
    }

    /// Returns the element type.
    #[must_use]
    pub const fn value_type(&self) -> ValueType {
        self.data.value_type()
    }

    /// Returns the declared dimension sizes.
    #[must_use]
    pub fn dims(&self) -> &[u32] {
        &self.dims
    }

    /// Returns the number of elements in the payload.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` for a void tensor.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self.data, TensorData::Void)
    }

    /// Returns the payload.
    #[must_use]
    pub const fn data(&self) -> &TensorData {
        &self.data
    }

    /// Returns the byte payload, if this is a byte tensor.
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match &self.data {
            TensorData::Byte(data) => Some(data),
            _ => None,
        }
    }

    /// Returns the integer payload, if this is an int tensor.
    #[must_use]
    pub fn as_ints(&self) -> Option<&[i32]> {
        match &self.data {
            TensorData::Int(data) => Some(data),
            _ => None,
        }
    }

    /// Returns the float payload, if this is a float tensor.
    #[must_use]
    pub fn as_floats(&self) -> Option<&[f32]> {
        match &self.data {
            TensorData::Float(data) => Some(data),
            _ => None,
        }
    }

    /// Returns the double payload, if this is a double tensor.
    #[must_use]
    pub fn as_doubles(&self) -> Option<&[f64]> {
        match &self.data {
            TensorData::Double(data) => Some(data),
            _ => None,
        }
    }

    /// Returns the string payload, if this is a char tensor.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match &self.data {
            TensorData::Char(text) => Some(text),
            _ => None,
        }
    }

    /// Reads a zero-dimensional numeric tensor as a double.
    ///
    /// Returns `None` when the tensor has dims or a non-numeric payload.
    #[must_use]
    pub fn as_scalar_double(&self) -> Option<f64> {
        if !self.dims.is_empty() {
            return None;
        }
        match &self.data {
            TensorData::Byte(data) => data.first().map(|&v| f64::from(v)),
            TensorData::Int(data) => data.first().map(|&v| f64::from(v)),
            TensorData::Float(data) => data.first().map(|&v| f64::from(v)),
            TensorData::Double(data) => data.first().copied(),
            TensorData::Void | TensorData::Char(_) => None,
        }
    }
}

impl Default for Tensor {
    fn default() -> Self {
        Self::empty()
    }
}

/// Number of elements a dims sequence requires; an empty sequence means one
/// scalar element.
fn element_product(dims: &[u32]) -> usize {
    dims.iter().map(|&d| d as usize).product()
}

#[cfg(test)]
mod tests;
