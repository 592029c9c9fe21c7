//! Connection overlay: the display list for every connection curve and the
//! in-progress link preview.
//!
//! The overlay is rebuilt from scratch from the document, the camera, and the
//! linking gesture whenever any of them changes. It is plain data so the
//! painter in [`crate::render`] and the tests read the same geometry.

#[cfg(test)]
#[path = "overlay_test.rs"]
mod overlay_test;

use crate::camera::{Camera, Point};
use crate::consts::{CONNECTION_BASE_WIDTH, CONNECTION_GLOW_EXTRA, CONNECTION_MIN_WIDTH, PREVIEW_GLOW_EXTRA, PREVIEW_MIN_WIDTH};
use crate::doc::{Connection, DocStore};
use crate::geometry::{anchor_position, curve_control_point};

const CONNECTION_GLOW: &str = "rgba(74, 158, 255, 0.4)";
const CONNECTION_LINE: &str = "#5eb0ff";
const PREVIEW_GLOW: &str = "rgba(74, 158, 255, 0.3)";
const PREVIEW_LINE: &str = "rgba(74, 158, 255, 0.85)";

/// Geometry of a single stroke, in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StrokePath {
    /// Quadratic bezier from `from` to `to` bent towards `ctrl`.
    Quadratic { from: Point, ctrl: Point, to: Point },
    /// Straight segment.
    Segment { from: Point, to: Point },
}

impl StrokePath {
    /// First point of the path.
    #[must_use]
    pub fn start(&self) -> Point {
        match *self {
            Self::Quadratic { from, .. } | Self::Segment { from, .. } => from,
        }
    }

    /// Last point of the path.
    #[must_use]
    pub fn end(&self) -> Point {
        match *self {
            Self::Quadratic { to, .. } | Self::Segment { to, .. } => to,
        }
    }
}

/// Which layer of a two-pass stroke this is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    /// Wide translucent stroke drawn first.
    Glow,
    /// Narrow solid stroke drawn on top.
    Line,
}

/// One stroke of the overlay. Widths are in world units.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    pub path: StrokePath,
    pub pass: Pass,
    pub color: &'static str,
    pub width: f64,
}

/// Every stroke of the overlay, in paint order, plus the camera it was built for.
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    pub pan: Point,
    pub zoom: f64,
    pub strokes: Vec<Stroke>,
}

/// A link being drawn from an anchor to the pointer.
#[derive(Debug, Clone, Copy)]
pub struct LinkPreview<'a> {
    pub from_object_id: &'a str,
    pub from_point_id: &'a str,
    pub end: Point,
}

/// Width of the solid pass of a committed connection at `zoom`.
///
/// Scales inversely with zoom so the on-screen thickness stays roughly constant.
#[must_use]
pub fn connection_width(zoom: f64) -> f64 {
    (CONNECTION_BASE_WIDTH / zoom).max(CONNECTION_MIN_WIDTH)
}

/// Width of the solid pass of the link preview at `zoom`.
#[must_use]
pub fn preview_width(zoom: f64) -> f64 {
    (CONNECTION_BASE_WIDTH / zoom).max(PREVIEW_MIN_WIDTH)
}

/// Curve of a committed connection, or `None` if either end is missing.
#[must_use]
pub fn connection_path(doc: &DocStore, conn: &Connection) -> Option<StrokePath> {
    let from_obj = doc.get(&conn.from_object_id)?;
    let to_obj = doc.get(&conn.to_object_id)?;
    let from = anchor_position(from_obj, &conn.from_point_id);
    let to = anchor_position(to_obj, &conn.to_point_id);
    Some(StrokePath::Quadratic { from, ctrl: curve_control_point(from, to), to })
}

/// Build the overlay for the current document, camera, and link gesture.
#[must_use]
pub fn build(doc: &DocStore, camera: &Camera, preview: Option<LinkPreview<'_>>) -> Overlay {
    let mut strokes = Vec::with_capacity(doc.connections().len() * 2 + 2);

    let width = connection_width(camera.zoom);
    for conn in doc.connections() {
        let Some(path) = connection_path(doc, conn) else {
            continue;
        };
        strokes.push(Stroke { path, pass: Pass::Glow, color: CONNECTION_GLOW, width: width + CONNECTION_GLOW_EXTRA });
        strokes.push(Stroke { path, pass: Pass::Line, color: CONNECTION_LINE, width });
    }

    if let Some(preview) = preview {
        if let Some(origin) = doc.get(preview.from_object_id) {
            let path = StrokePath::Segment { from: anchor_position(origin, preview.from_point_id), to: preview.end };
            let width = preview_width(camera.zoom);
            strokes.push(Stroke { path, pass: Pass::Glow, color: PREVIEW_GLOW, width: width + PREVIEW_GLOW_EXTRA });
            strokes.push(Stroke { path, pass: Pass::Line, color: PREVIEW_LINE, width });
        }
    }

    Overlay { pan: camera.pan(), zoom: camera.zoom, strokes }
}
