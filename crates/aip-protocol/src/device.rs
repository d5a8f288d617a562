//! Compute device selection and image-plane coordinates.

use serde::{Deserialize, Serialize};

/// A compute backend a package instance is bound to.
///
/// The name is an advisory backend tag such as `"cpu"` or `"gpu"`; the id
/// selects one unit among several of the same kind. The host never
/// interprets either field, it only carries them across the boundary.
///
/// # Example
///
/// ```
/// use aip_protocol::Device;
///
/// let device = Device::default();
/// assert_eq!(device.name(), "cpu");
/// assert_eq!(device.id(), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Device {
    name: String,
    id: i32,
}

impl Device {
    /// Creates a device reference with the given backend name and unit id.
    #[must_use]
    pub fn new(name: impl Into<String>, id: i32) -> Self {
        Self {
            name: name.into(),
            id,
        }
    }

    /// Returns the backend name, e.g. `"cpu"`.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the unit id within the backend.
    #[must_use]
    pub const fn id(&self) -> i32 {
        self.id
    }
}

impl Default for Device {
    /// The default compute device, `("cpu", 0)`.
    fn default() -> Self {
        Self::new("cpu", 0)
    }
}

impl std::fmt::Display for Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.name, self.id)
    }
}

/// A point in image coordinates.
///
/// Origin is the upper-left corner; `x` grows rightwards and `y` grows
/// downwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate, left to right.
    pub x: f32,
    /// Y coordinate, top to bottom.
    pub y: f32,
}

impl Point {
    /// Creates a point from its coordinates.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Self::new(x, y)
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
