#![allow(clippy::float_cmp)]

use super::*;
use crate::doc::{EvidenceObject, Payload, TextPayload};

fn object_at(x: f64, y: f64, w: f64, h: f64) -> EvidenceObject {
    EvidenceObject {
        id: "obj-1".to_owned(),
        position: Point::new(x, y),
        width: w,
        height: h,
        payload: Payload::Text(TextPayload { text: "note".to_owned() }),
    }
}

// =============================================================
// Anchor
// =============================================================

#[test]
fn anchor_ids_round_trip() {
    for anchor in Anchor::EDGES {
        assert_eq!(Anchor::from_id(anchor.id()), anchor);
    }
}

#[test]
fn unknown_anchor_id_is_center() {
    assert_eq!(Anchor::from_id("middle"), Anchor::Center);
    assert_eq!(Anchor::from_id(""), Anchor::Center);
    assert_eq!(Anchor::from_id("TOP"), Anchor::Center);
}

// =============================================================
// anchor_position
// =============================================================

#[test]
fn edge_anchors_sit_on_the_bounding_box() {
    let cases = [(0.0, 0.0, 200.0, 100.0), (-35.5, 12.0, 80.0, 310.0), (1e4, -1e4, 1.0, 0.5)];
    for (x, y, w, h) in cases {
        let obj = object_at(x, y, w, h);
        assert_eq!(anchor_position(&obj, "top").y, y);
        assert_eq!(anchor_position(&obj, "bottom").y, y + h);
        assert_eq!(anchor_position(&obj, "left").x, x);
        assert_eq!(anchor_position(&obj, "right").x, x + w);
        assert_eq!(anchor_position(&obj, "top").x, x + w / 2.0);
        assert_eq!(anchor_position(&obj, "left").y, y + h / 2.0);
    }
}

#[test]
fn unknown_anchor_resolves_to_center() {
    let obj = object_at(10.0, 20.0, 100.0, 50.0);
    assert_eq!(anchor_position(&obj, "nowhere"), Point::new(60.0, 45.0));
}

#[test]
fn zero_sized_object_anchors_collapse_to_position() {
    let obj = object_at(5.0, 6.0, 0.0, 0.0);
    for id in ["top", "right", "bottom", "left", "center"] {
        assert_eq!(anchor_position(&obj, id), Point::new(5.0, 6.0));
    }
}

// =============================================================
// curve_control_point
// =============================================================

#[test]
fn control_point_of_coincident_points_is_finite() {
    let a = Point::new(42.0, -7.0);
    let ctrl = curve_control_point(a, a);
    assert!(ctrl.x.is_finite() && ctrl.y.is_finite());
    assert_eq!(ctrl, a);
}

#[test]
fn short_curve_bulges_by_a_quarter_of_its_length() {
    // Horizontal, length 100: left-hand normal of +x is +y, bulge 25.
    let ctrl = curve_control_point(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
    assert_eq!(ctrl, Point::new(50.0, 25.0));
}

#[test]
fn long_curve_bulge_is_capped() {
    let ctrl = curve_control_point(Point::new(0.0, 0.0), Point::new(0.0, 1000.0));
    // Direction +y, normal is -x, bulge capped at 40.
    assert!((ctrl.x - -CURVE_BULGE_MAX).abs() < 1e-9);
    assert!((ctrl.y - 500.0).abs() < 1e-9);
}

#[test]
fn reversing_direction_flips_the_bulge() {
    let a = Point::new(0.0, 0.0);
    let b = Point::new(100.0, 0.0);
    let forward = curve_control_point(a, b);
    let backward = curve_control_point(b, a);
    assert_eq!(forward.x, backward.x);
    assert_eq!(forward.y, -backward.y);
}

// =============================================================
// Rect
// =============================================================

#[test]
fn from_corners_normalizes() {
    let r = Rect::from_corners(Point::new(10.0, 50.0), Point::new(-10.0, 20.0));
    assert_eq!(r, Rect::new(-10.0, 20.0, 20.0, 30.0));
}

#[test]
fn contains_rect_allows_touching_edges() {
    let outer = Rect::new(0.0, 0.0, 100.0, 100.0);
    assert!(outer.contains_rect(&Rect::new(0.0, 0.0, 100.0, 100.0)));
    assert!(outer.contains_rect(&Rect::new(10.0, 10.0, 20.0, 20.0)));
    assert!(!outer.contains_rect(&Rect::new(90.0, 10.0, 20.0, 20.0)));
    assert!(!outer.contains_rect(&Rect::new(-1.0, 10.0, 20.0, 20.0)));
}

#[test]
fn has_area_requires_both_dimensions() {
    assert!(Rect::new(0.0, 0.0, 1.0, 1.0).has_area());
    assert!(!Rect::new(0.0, 0.0, 0.0, 1.0).has_area());
    assert!(!Rect::new(0.0, 0.0, 1.0, 0.0).has_area());
}

#[test]
fn contains_point_includes_boundary() {
    let r = Rect::new(0.0, 0.0, 10.0, 10.0);
    assert!(r.contains_point(Point::new(10.0, 0.0)));
    assert!(!r.contains_point(Point::new(10.1, 5.0)));
}
