//! Pure geometry: anchor positions on object bounding boxes, connection curve
//! control points, and axis-aligned rectangles for marquee containment.
//!
//! Nothing here mutates state or fails. Missing dimensions deserialize as 0,
//! so every function is total over any object the document can hold.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use crate::camera::Point;
use crate::consts::{CURVE_BULGE_MAX, CURVE_BULGE_RATIO};
use crate::doc::EvidenceObject;

/// A named attachment point on an object's bounding box.
///
/// Connections store anchors as free-form ids; any id other than the four
/// edge names resolves to [`Anchor::Center`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Anchor {
    Top,
    Right,
    Bottom,
    Left,
    Center,
}

impl Anchor {
    /// The four anchors drawn on every object, in clockwise order from the top.
    pub const EDGES: [Anchor; 4] = [Anchor::Top, Anchor::Right, Anchor::Bottom, Anchor::Left];

    /// Resolve a stored anchor id. Unknown ids fall back to the center.
    #[must_use]
    pub fn from_id(id: &str) -> Self {
        match id {
            "top" => Self::Top,
            "right" => Self::Right,
            "bottom" => Self::Bottom,
            "left" => Self::Left,
            _ => Self::Center,
        }
    }

    /// The id persisted in `fromPointId` / `toPointId`.
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Right => "right",
            Self::Bottom => "bottom",
            Self::Left => "left",
            Self::Center => "center",
        }
    }

    /// Offset of this anchor from the top-left corner of a `width` x `height` box.
    #[must_use]
    pub fn offset(self, width: f64, height: f64) -> Point {
        match self {
            Self::Top => Point::new(width / 2.0, 0.0),
            Self::Right => Point::new(width, height / 2.0),
            Self::Bottom => Point::new(width / 2.0, height),
            Self::Left => Point::new(0.0, height / 2.0),
            Self::Center => Point::new(width / 2.0, height / 2.0),
        }
    }
}

/// Absolute world position of the anchor named `point_id` on `obj`.
#[must_use]
pub fn anchor_position(obj: &EvidenceObject, point_id: &str) -> Point {
    obj.position.add(Anchor::from_id(point_id).offset(obj.width, obj.height))
}

/// Control point of the quadratic curve between two anchor positions.
///
/// The midpoint is pushed along the left-hand normal of `from -> to` by a
/// quarter of the distance, capped at [`CURVE_BULGE_MAX`]. Coincident points
/// use a unit length, which yields a zero bulge and returns the midpoint.
#[must_use]
pub fn curve_control_point(from: Point, to: Point) -> Point {
    let mid = Point::new((from.x + to.x) / 2.0, (from.y + to.y) / 2.0);
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let dist = dx.hypot(dy);
    let len = if dist > 0.0 { dist } else { 1.0 };
    let bulge = (dist * CURVE_BULGE_RATIO).min(CURVE_BULGE_MAX);
    Point::new(mid.x + (-dy / len) * bulge, mid.y + (dx / len) * bulge)
}

/// Axis-aligned rectangle in world coordinates. Width and height are never negative.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Normalized rectangle spanning two opposite corners in any order.
    #[must_use]
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: (a.x - b.x).abs(),
            height: (a.y - b.y).abs(),
        }
    }

    /// Bounding box of an object.
    #[must_use]
    pub fn of(obj: &EvidenceObject) -> Self {
        Self::new(obj.position.x, obj.position.y, obj.width, obj.height)
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Whether the rectangle covers a non-zero area.
    #[must_use]
    pub fn has_area(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    /// Whether `pt` lies inside or on the boundary.
    #[must_use]
    pub fn contains_point(&self, pt: Point) -> bool {
        pt.x >= self.x && pt.x <= self.right() && pt.y >= self.y && pt.y <= self.bottom()
    }

    /// Whether `other` lies entirely inside this rectangle (edges may touch).
    #[must_use]
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x && other.right() <= self.right() && other.y >= self.y && other.bottom() <= self.bottom()
    }
}
