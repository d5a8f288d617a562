//! Geometric descriptors for detected or processed regions.
//!
//! A [`Shape`] pairs a [`ShapeType`] with an ordered landmark sequence plus
//! rotation and scale. The landmark cardinality each type calls for is a
//! contract between host and package, documented on [`ShapeType`] and
//! queryable through [`ShapeType::landmark_count`]; the constructor does not
//! enforce it, matching the protocol.

use serde::{Deserialize, Serialize};

use crate::device::Point;

/// Kind of geometry a [`Shape`] describes.
///
/// Discriminants are the stable wire codes shared with native packages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeType {
    /// Geometry is present but its kind is not known.
    Unknown = 0,
    /// Free points; rotate 0, scale 1.
    Points = 1,
    /// A polyline of at least two points; rotate 0, scale 1.
    Lines = 2,
    /// Two points, top-left then bottom-right; rotate is meaningful.
    Rectangle = 3,
    /// First three corners, anticlockwise; rotate is meaningful.
    Parallelogram = 4,
    /// A closed anticlockwise polygon of at least two points.
    Polygon = 5,
    /// One centre point; scale carries the radius.
    Circle = 6,
    /// Three corners: left-top-front, right-bottom-front, right-top-back.
    Cube = 7,
    /// No geometry at all.
    NoShape = 255,
}

/// Landmark cardinality a [`ShapeType`] calls for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LandmarkCount {
    /// Exactly this many landmarks.
    Exactly(u32),
    /// At least this many landmarks.
    AtLeast(u32),
    /// Any number, including none.
    Free,
}

impl ShapeType {
    /// Returns the landmark cardinality this shape type calls for.
    ///
    /// This is contractual, not enforced by [`Shape`] construction.
    #[must_use]
    pub const fn landmark_count(self) -> LandmarkCount {
        match self {
            Self::Points => LandmarkCount::AtLeast(0),
            Self::Lines | Self::Polygon => LandmarkCount::AtLeast(2),
            Self::Rectangle => LandmarkCount::Exactly(2),
            Self::Parallelogram | Self::Cube => LandmarkCount::Exactly(3),
            Self::Circle => LandmarkCount::Exactly(1),
            Self::Unknown | Self::NoShape => LandmarkCount::Free,
        }
    }

    /// Returns the stable numeric code for this shape type.
    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }

    /// Resolves a numeric code back to a shape type.
    #[must_use]
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Unknown),
            1 => Some(Self::Points),
            2 => Some(Self::Lines),
            3 => Some(Self::Rectangle),
            4 => Some(Self::Parallelogram),
            5 => Some(Self::Polygon),
            6 => Some(Self::Circle),
            7 => Some(Self::Cube),
            255 => Some(Self::NoShape),
            _ => None,
        }
    }
}

/// Geometry of a detected or processed region.
///
/// Rotation is in degrees, positive anticlockwise; scale normally scales the
/// landmark coordinates and carries the radius for a circle.
///
/// # Example
///
/// ```
/// use aip_protocol::{Point, Shape, ShapeType};
///
/// let rect = Shape::rectangle(Point::new(10.0, 10.0), Point::new(90.0, 50.0));
/// assert_eq!(rect.shape_type(), ShapeType::Rectangle);
/// assert_eq!(rect.landmarks().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    shape_type: ShapeType,
    landmarks: Vec<Point>,
    rotate: f32,
    scale: f32,
}

impl Shape {
    /// Creates a shape with rotate 0 and scale 1.
    #[must_use]
    pub fn new(shape_type: ShapeType, landmarks: Vec<Point>) -> Self {
        Self {
            shape_type,
            landmarks,
            rotate: 0.0,
            scale: 1.0,
        }
    }

    /// Creates an axis-aligned rectangle from its top-left and bottom-right
    /// corners.
    #[must_use]
    pub fn rectangle(top_left: Point, bottom_right: Point) -> Self {
        Self::new(ShapeType::Rectangle, vec![top_left, bottom_right])
    }

    /// Creates a circle from its centre and radius.
    #[must_use]
    pub fn circle(centre: Point, radius: f32) -> Self {
        Self::new(ShapeType::Circle, vec![centre]).with_scale(radius)
    }

    /// Overrides the rotation, in degrees anticlockwise.
    #[must_use]
    pub const fn with_rotate(mut self, rotate: f32) -> Self {
        self.rotate = rotate;
        self
    }

    /// Overrides the scale.
    #[must_use]
    pub const fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Returns the kind of geometry.
    #[must_use]
    pub const fn shape_type(&self) -> ShapeType {
        self.shape_type
    }

    /// Returns the ordered landmark points.
    #[must_use]
    pub fn landmarks(&self) -> &[Point] {
        &self.landmarks
    }

    /// Returns the rotation in degrees, positive anticlockwise.
    #[must_use]
    pub const fn rotate(&self) -> f32 {
        self.rotate
    }

    /// Returns the scale (the radius for a circle).
    #[must_use]
    pub const fn scale(&self) -> f32 {
        self.scale
    }
}

impl Default for Shape {
    /// A shape carrying no geometry.
    fn default() -> Self {
        Self::new(ShapeType::NoShape, Vec::new())
    }
}
