use super::*;
use crate::doc::{Board, EvidenceObject, Payload, TextPayload};

fn card(id: &str, x: f64, y: f64, w: f64, h: f64) -> EvidenceObject {
    EvidenceObject {
        id: id.to_owned(),
        position: Point::new(x, y),
        width: w,
        height: h,
        payload: Payload::Text(TextPayload { text: id.to_owned() }),
    }
}

fn doc_with(objects: Vec<EvidenceObject>) -> DocStore {
    let mut doc = DocStore::new();
    doc.load_board(Board { objects, connections: Vec::new() });
    doc
}

fn body(id: &str) -> Option<Hit> {
    Some(Hit { object_id: id.to_owned(), part: HitPart::Body })
}

fn anchor(id: &str, anchor: Anchor) -> Option<Hit> {
    Some(Hit { object_id: id.to_owned(), part: HitPart::Anchor(anchor) })
}

// =============================================================
// Body hits
// =============================================================

#[test]
fn empty_doc_hits_nothing() {
    assert_eq!(hit_test(Point::new(0.0, 0.0), &DocStore::new(), &Camera::default()), None);
}

#[test]
fn point_inside_body() {
    let doc = doc_with(vec![card("a", 0.0, 0.0, 200.0, 100.0)]);
    assert_eq!(hit_test(Point::new(60.0, 60.0), &doc, &Camera::default()), body("a"));
}

#[test]
fn point_outside_everything() {
    let doc = doc_with(vec![card("a", 0.0, 0.0, 200.0, 100.0)]);
    assert_eq!(hit_test(Point::new(500.0, 500.0), &doc, &Camera::default()), None);
}

#[test]
fn topmost_object_wins() {
    let doc = doc_with(vec![card("under", 0.0, 0.0, 200.0, 200.0), card("over", 50.0, 50.0, 200.0, 200.0)]);
    assert_eq!(hit_test(Point::new(120.0, 120.0), &doc, &Camera::default()), body("over"));
    assert_eq!(hit_test(Point::new(20.0, 20.0), &doc, &Camera::default()), body("under"));
}

// =============================================================
// Anchor hits
// =============================================================

#[test]
fn each_edge_anchor_is_hit_at_its_midpoint() {
    let doc = doc_with(vec![card("a", 0.0, 0.0, 200.0, 100.0)]);
    let cam = Camera::default();
    assert_eq!(hit_test(Point::new(100.0, 0.0), &doc, &cam), anchor("a", Anchor::Top));
    assert_eq!(hit_test(Point::new(200.0, 50.0), &doc, &cam), anchor("a", Anchor::Right));
    assert_eq!(hit_test(Point::new(100.0, 100.0), &doc, &cam), anchor("a", Anchor::Bottom));
    assert_eq!(hit_test(Point::new(0.0, 50.0), &doc, &cam), anchor("a", Anchor::Left));
}

#[test]
fn anchor_hit_extends_outside_the_body() {
    let doc = doc_with(vec![card("a", 0.0, 0.0, 200.0, 100.0)]);
    assert_eq!(hit_test(Point::new(206.0, 50.0), &doc, &Camera::default()), anchor("a", Anchor::Right));
    assert_eq!(hit_test(Point::new(212.0, 50.0), &doc, &Camera::default()), None);
}

#[test]
fn anchor_radius_is_constant_in_screen_pixels() {
    let doc = doc_with(vec![card("a", 0.0, 0.0, 200.0, 100.0)]);
    let mut cam = Camera::default();
    cam.set_zoom(0.5);
    // 12 world units = 6 screen pixels at half zoom, inside the 8px radius.
    assert_eq!(hit_test(Point::new(212.0, 50.0), &doc, &cam), anchor("a", Anchor::Right));
    cam.set_zoom(2.0);
    // 6 world units = 12 screen pixels at double zoom.
    assert_eq!(hit_test(Point::new(206.0, 50.0), &doc, &cam), None);
}

#[test]
fn anchor_of_upper_object_beats_body_of_lower() {
    let doc = doc_with(vec![card("under", 0.0, 0.0, 400.0, 400.0), card("over", 100.0, 100.0, 100.0, 100.0)]);
    assert_eq!(hit_test(Point::new(150.0, 95.0), &doc, &Camera::default()), anchor("over", Anchor::Top));
}
