#![allow(clippy::float_cmp)]

use super::*;
use crate::doc::{Board, EvidenceObject, Payload, PersonPayload, TextPayload};

fn note(id: &str, x: f64, y: f64, w: f64, h: f64) -> EvidenceObject {
    EvidenceObject {
        id: id.to_owned(),
        position: Point::new(x, y),
        width: w,
        height: h,
        payload: Payload::Text(TextPayload { text: id.to_owned() }),
    }
}

fn person(id: &str, x: f64, y: f64, w: f64, h: f64) -> EvidenceObject {
    EvidenceObject {
        payload: Payload::Person(PersonPayload { name: id.to_owned(), ..Default::default() }),
        ..note(id, x, y, w, h)
    }
}

fn link(id: &str, from: &str, from_pt: &str, to: &str, to_pt: &str) -> Connection {
    Connection {
        id: id.to_owned(),
        from_object_id: from.to_owned(),
        from_point_id: from_pt.to_owned(),
        to_object_id: to.to_owned(),
        to_point_id: to_pt.to_owned(),
    }
}

fn scenario_doc() -> DocStore {
    let mut doc = DocStore::new();
    doc.load_board(Board {
        objects: vec![note("t", 0.0, 0.0, 200.0, 100.0), person("p", 300.0, 0.0, 250.0, 300.0)],
        connections: vec![link("c1", "t", "right", "p", "left")],
    });
    doc
}

fn assert_near(actual: Point, expected: Point) {
    assert!(
        actual.distance(expected) < 1e-9,
        "expected {expected:?}, got {actual:?}"
    );
}

// =============================================================
// Widths
// =============================================================

#[test]
fn connection_width_scales_inversely_with_zoom() {
    assert_eq!(connection_width(1.0), 4.0);
    assert_eq!(connection_width(0.5), 8.0);
    assert_eq!(connection_width(2.0), 2.5);
    assert_eq!(connection_width(3.0), 2.5);
}

#[test]
fn preview_width_has_a_lower_floor() {
    assert_eq!(preview_width(1.0), 4.0);
    assert_eq!(preview_width(3.0), 2.0);
    assert_eq!(preview_width(0.25), 16.0);
}

// =============================================================
// Connection curves
// =============================================================

#[test]
fn connection_endpoints_follow_anchors() {
    let doc = scenario_doc();
    let path = connection_path(&doc, &doc.connections()[0]).unwrap();
    assert_eq!(path.start(), Point::new(200.0, 50.0));
    assert_eq!(path.end(), Point::new(300.0, 150.0));

    let StrokePath::Quadratic { ctrl, .. } = path else {
        panic!("expected a quadratic curve, got {path:?}");
    };
    let offset = 100.0_f64.hypot(100.0) * 0.25 / std::f64::consts::SQRT_2;
    assert_near(ctrl, Point::new(250.0 - offset, 100.0 + offset));
}

#[test]
fn connection_to_missing_object_has_no_path() {
    let doc = scenario_doc();
    assert!(connection_path(&doc, &link("x", "t", "right", "ghost", "left")).is_none());
}

#[test]
fn each_connection_paints_glow_then_line() {
    let doc = scenario_doc();
    let overlay = build(&doc, &Camera::default(), None);
    assert_eq!(overlay.strokes.len(), 2);

    let glow = &overlay.strokes[0];
    let line = &overlay.strokes[1];
    assert_eq!(glow.pass, Pass::Glow);
    assert_eq!(line.pass, Pass::Line);
    assert_eq!(glow.path, line.path);
    assert_eq!(line.width, 4.0);
    assert_eq!(glow.width, 10.0);
    assert_eq!(line.color, "#5eb0ff");
}

#[test]
fn overlay_records_camera() {
    let doc = scenario_doc();
    let mut cam = Camera::default();
    cam.set_pan(Point::new(12.0, -7.0));
    cam.set_zoom(2.0);
    let overlay = build(&doc, &cam, None);
    assert_eq!(overlay.pan, Point::new(12.0, -7.0));
    assert_eq!(overlay.zoom, 2.0);
    assert_eq!(overlay.strokes[1].width, 2.5);
}

#[test]
fn self_loop_on_one_anchor_is_still_drawn() {
    let mut doc = DocStore::new();
    doc.load_board(Board { objects: vec![note("t", 0.0, 0.0, 100.0, 100.0)], connections: vec![link("c", "t", "top", "t", "top")] });
    let overlay = build(&doc, &Camera::default(), None);
    assert_eq!(overlay.strokes.len(), 2);
    let StrokePath::Quadratic { from, ctrl, to } = overlay.strokes[0].path else {
        panic!("expected a quadratic curve");
    };
    assert_eq!(from, to);
    assert!(ctrl.x.is_finite() && ctrl.y.is_finite());
}

#[test]
fn empty_doc_has_no_strokes() {
    let overlay = build(&DocStore::new(), &Camera::default(), None);
    assert!(overlay.strokes.is_empty());
}

// =============================================================
// Link preview
// =============================================================

#[test]
fn preview_is_a_straight_segment_after_connections() {
    let doc = scenario_doc();
    let preview = LinkPreview { from_object_id: "t", from_point_id: "bottom", end: Point::new(40.0, 400.0) };
    let overlay = build(&doc, &Camera::default(), Some(preview));
    assert_eq!(overlay.strokes.len(), 4);

    let glow = &overlay.strokes[2];
    let line = &overlay.strokes[3];
    assert_eq!(line.path, StrokePath::Segment { from: Point::new(100.0, 100.0), to: Point::new(40.0, 400.0) });
    assert_eq!(glow.pass, Pass::Glow);
    assert_eq!(line.pass, Pass::Line);
    assert_eq!(glow.width, line.width + 4.0);
    assert_ne!(line.color, overlay.strokes[1].color);
}

#[test]
fn preview_from_missing_object_is_skipped() {
    let doc = scenario_doc();
    let preview = LinkPreview { from_object_id: "ghost", from_point_id: "top", end: Point::default() };
    assert_eq!(build(&doc, &Camera::default(), Some(preview)).strokes.len(), 2);
}
