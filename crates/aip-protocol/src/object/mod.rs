//! Composite detection objects and the structured property payload.
//!
//! An [`Object`] is the unit exchanged with a package in both directions: as
//! a detection result from `forward` and as auxiliary structured input (for
//! example, pre-loaded model weights carried as an in-memory byte tensor).
//! [`Value`] is the closed sum of everything a structured property can hold;
//! it converts losslessly into an [`Object`] for the boundary crossing.

use serde::{Deserialize, Serialize};

use crate::image::ImageData;
use crate::shape::Shape;
use crate::tensor::Tensor;

/// One classification axis result: a label index and its score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    /// Label index, resolvable to text through the package's `tag` lookup.
    pub label: i32,
    /// Confidence score for the label.
    pub score: f32,
}

impl Tag {
    /// Creates a tag from a label index and score.
    #[must_use]
    pub const fn new(label: i32, score: f32) -> Self {
        Self { label, score }
    }
}

impl From<(i32, f32)> for Tag {
    fn from((label, score): (i32, f32)) -> Self {
        Self::new(label, score)
    }
}

/// A detectable object: geometry, classification tags, and extra data.
///
/// Objects with several tags carry several independent classification axes;
/// the position of a tag in the sequence is its `label_index` in the
/// package's `tag` lookup.
///
/// # Example
///
/// ```
/// use aip_protocol::{Object, Point, Shape, Tag};
///
/// let object = Object::default()
///     .with_shape(Shape::rectangle(Point::new(0.0, 0.0), Point::new(4.0, 4.0)))
///     .with_tag(Tag::new(1, 0.93));
/// assert_eq!(object.tags().len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Object {
    shape: Shape,
    tags: Vec<Tag>,
    extra: Tensor,
}

impl Object {
    /// Creates an object from its parts.
    #[must_use]
    pub const fn new(shape: Shape, tags: Vec<Tag>, extra: Tensor) -> Self {
        Self { shape, tags, extra }
    }

    /// Creates an object carrying only extra data.
    #[must_use]
    pub fn from_extra(extra: Tensor) -> Self {
        Self {
            extra,
            ..Self::default()
        }
    }

    /// Replaces the shape.
    #[must_use]
    pub fn with_shape(mut self, shape: Shape) -> Self {
        self.shape = shape;
        self
    }

    /// Appends a classification tag.
    #[must_use]
    pub fn with_tag(mut self, tag: Tag) -> Self {
        self.tags.push(tag);
        self
    }

    /// Replaces the extra tensor.
    #[must_use]
    pub fn with_extra(mut self, extra: Tensor) -> Self {
        self.extra = extra;
        self
    }

    /// Returns the geometry.
    #[must_use]
    pub const fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Returns the ordered classification tags.
    #[must_use]
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    /// Returns the extra data tensor.
    #[must_use]
    pub const fn extra(&self) -> &Tensor {
        &self.extra
    }
}

/// Everything a structured property can hold.
///
/// The protocol exchanges structured properties as [`Object`]s; this closed
/// sum names the payloads actually observed in practice and converts to and
/// from the object encoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Value {
    /// A bare tensor, carried in the object's extra slot.
    Tensor(Tensor),
    /// A bare shape.
    Shape(Shape),
    /// A single classification tag.
    Tag(Tag),
    /// A full composite object.
    Object(Object),
}

impl Value {
    /// Encodes the value as the object exchanged across the boundary.
    #[must_use]
    pub fn into_object(self) -> Object {
        match self {
            Self::Tensor(tensor) => Object::from_extra(tensor),
            Self::Shape(shape) => Object::default().with_shape(shape),
            Self::Tag(tag) => Object::default().with_tag(tag),
            Self::Object(object) => object,
        }
    }

    /// Recovers the most specific value from a returned object.
    ///
    /// An object carrying only extra data becomes [`Value::Tensor`], only
    /// geometry becomes [`Value::Shape`], only a single tag becomes
    /// [`Value::Tag`]; anything else stays a full [`Value::Object`].
    #[must_use]
    pub fn from_object(object: Object) -> Self {
        let bare_shape = object.shape() == &Shape::default();
        let bare_extra = object.extra().is_empty();
        let lone_tag = match object.tags() {
            &[tag] => Some(tag),
            _ => None,
        };
        if bare_shape && !bare_extra && object.tags().is_empty() {
            return Self::Tensor(object.extra);
        }
        if !bare_shape && bare_extra && object.tags().is_empty() {
            return Self::Shape(object.shape);
        }
        if let Some(tag) = lone_tag {
            if bare_shape && bare_extra {
                return Self::Tag(tag);
            }
        }
        Self::Object(object)
    }
}

impl From<Tensor> for Value {
    fn from(tensor: Tensor) -> Self {
        Self::Tensor(tensor)
    }
}

impl From<Shape> for Value {
    fn from(shape: Shape) -> Self {
        Self::Shape(shape)
    }
}

impl From<Tag> for Value {
    fn from(tag: Tag) -> Self {
        Self::Tag(tag)
    }
}

impl From<Object> for Value {
    fn from(object: Object) -> Self {
        Self::Object(object)
    }
}

/// Output of one `forward` call: annotated or cropped images plus detected
/// objects, in package-defined order and cardinality.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForwardResult {
    images: Vec<ImageData>,
    objects: Vec<Object>,
}

impl ForwardResult {
    /// Creates a result from returned images and objects.
    #[must_use]
    pub const fn new(images: Vec<ImageData>, objects: Vec<Object>) -> Self {
        Self { images, objects }
    }

    /// Returns the returned images.
    #[must_use]
    pub fn images(&self) -> &[ImageData] {
        &self.images
    }

    /// Returns the detected objects.
    #[must_use]
    pub fn objects(&self) -> &[Object] {
        &self.objects
    }

    /// Consumes the result into its parts.
    #[must_use]
    pub fn into_parts(self) -> (Vec<ImageData>, Vec<Object>) {
        (self.images, self.objects)
    }
}

#[cfg(test)]
mod tests;
