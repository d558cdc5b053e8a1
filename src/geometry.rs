//! Surface geometry: absolute points, bounding boxes, and the normalized
//! coordinate space used on the wire.
//!
//! Normalized coordinates express a point as a fraction of the surface's
//! bounding box, so a replayed interaction lands on the equivalent spot even
//! when leader and follower render the surface at different sizes.

use serde::{Deserialize, Serialize};

/// Absolute point in host client coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned bounding box of a surface, in host client coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left
            && p.x <= self.left + self.width
            && p.y >= self.top
            && p.y <= self.top + self.height
    }

    pub fn area(&self) -> f64 {
        self.width.max(0.0) * self.height.max(0.0)
    }
}

/// A point expressed as a fraction of a surface's bounding box.
///
/// Always clamped to `[0, 1]²`; construct via [`NormalizedPoint::clamped`] or
/// [`NormalizedPoint::from_absolute`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedPoint {
    pub x: f64,
    pub y: f64,
}

impl NormalizedPoint {
    /// Clamp raw fractions into the unit square.
    pub fn clamped(x: f64, y: f64) -> Self {
        Self {
            x: x.clamp(0.0, 1.0),
            y: y.clamp(0.0, 1.0),
        }
    }

    /// Normalize an absolute point against a bounding box.
    ///
    /// A degenerate (zero-sized) box normalizes as if it were 1×1 so the
    /// result stays finite.
    pub fn from_absolute(p: Point, bounds: &Rect) -> Self {
        let w = if bounds.width == 0.0 { 1.0 } else { bounds.width };
        let h = if bounds.height == 0.0 { 1.0 } else { bounds.height };
        Self::clamped((p.x - bounds.left) / w, (p.y - bounds.top) / h)
    }

    /// Resolve back to an absolute point against a bounding box.
    pub fn to_absolute(&self, bounds: &Rect) -> Point {
        Point::new(
            bounds.left + self.x * bounds.width,
            bounds.top + self.y * bounds.height,
        )
    }
}
