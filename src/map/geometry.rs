//! Geometry primitives and the geometry source abstraction.
//!
//! All coordinates are in content space: the coordinate system the map
//! regions were authored in, before any viewport transform is applied.

use serde::{Deserialize, Serialize};

/// A point in content coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Point {
        Point { x, y }
    }
}

/// An axis-aligned bounding box in content coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BBox {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> BBox {
        BBox {
            x,
            y,
            width,
            height,
        }
    }

    /// Returns the center point of the box.
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Returns true if the box has zero (or negative) extent on either axis.
    pub fn is_degenerate(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Tests whether two boxes overlap when each side is expanded by
    /// `tolerance`. The test is symmetric in its arguments.
    pub fn overlaps_within(&self, other: &BBox, tolerance: f64) -> bool {
        !(self.x > other.x + other.width + tolerance
            || self.x + self.width < other.x - tolerance
            || self.y > other.y + other.height + tolerance
            || self.y + self.height < other.y - tolerance)
    }

    /// Returns the smallest box containing both boxes.
    pub fn union(&self, other: &BBox) -> BBox {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = (self.x + self.width).max(other.x + other.width);
        let bottom = (self.y + self.height).max(other.y + other.height);
        BBox::new(x, y, right - x, bottom - y)
    }

    /// Returns the union of all boxes in `boxes`, or None if it is empty.
    pub fn union_of<I: IntoIterator<Item = BBox>>(boxes: I) -> Option<BBox> {
        boxes.into_iter().reduce(|a, b| a.union(&b))
    }
}

/// Supplies region geometry to the engine.
///
/// Implementations answer by region identifier. A `None` answer means the
/// geometry is unavailable; callers degrade gracefully (the adjacency
/// builder isolates the region, the viewport skips the focus request).
pub trait GeometryProvider {
    /// Returns the axis-aligned bounding box for a region, if available.
    fn bounding_box(&self, region: &str) -> Option<BBox>;

    /// Returns a point on the region's boundary. Used as a focus fallback
    /// when the bounding box is degenerate.
    fn boundary_point(&self, region: &str) -> Option<Point>;
}
