//! Pointer coordinate types

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 2D coordinate
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f32,
    pub y: f32,
}

impl Point2 {
    pub const ZERO: Point2 = Point2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<(f32, f32)> for Point2 {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Pointer position for one frame, in normalized device space and pixel space.
///
/// Both coordinates come from the same underlying device event, so they are
/// only ever set together. When `present` is false the coordinates carry no
/// meaning and are never emitted or serialized.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointSample {
    present: bool,
    normalized: Point2,
    pixel: Point2,
}

impl PointSample {
    /// A sample with no pointer attached
    pub const ABSENT: PointSample = PointSample {
        present: false,
        normalized: Point2::ZERO,
        pixel: Point2::ZERO,
    };

    /// A sample with the pointer at the given position
    pub fn at(normalized: impl Into<Point2>, pixel: impl Into<Point2>) -> Self {
        Self {
            present: true,
            normalized: normalized.into(),
            pixel: pixel.into(),
        }
    }

    /// Whether a pointer is present this frame
    pub fn is_present(&self) -> bool {
        self.present
    }

    /// Both coordinates, or `None` when the pointer is absent
    pub fn position(&self) -> Option<(Point2, Point2)> {
        self.present.then_some((self.normalized, self.pixel))
    }

    /// Normalized device coordinates, if present
    pub fn normalized(&self) -> Option<Point2> {
        self.present.then_some(self.normalized)
    }

    /// Pixel coordinates, if present
    pub fn pixel(&self) -> Option<Point2> {
        self.present.then_some(self.pixel)
    }

    /// Mark the pointer as absent
    pub fn clear(&mut self) {
        *self = Self::ABSENT;
    }
}
