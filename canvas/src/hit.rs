#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::camera::{Camera, Point};
use crate::consts::ANCHOR_RADIUS_PX;
use crate::doc::{DocStore, ObjectId};
use crate::geometry::{Anchor, Rect};

/// Which part of an object was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    /// The card itself.
    Body,
    /// One of the four connection anchor circles.
    Anchor(Anchor),
}

/// Result of a hit test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit {
    pub object_id: ObjectId,
    pub part: HitPart,
}

/// Test which object (if any) is under `world_pt`.
///
/// Objects are tested top-most first. For each object its anchor circles are
/// checked before its body, since they straddle the bounding box edge. The
/// anchor radius is fixed in screen pixels so it stays grabbable at any zoom.
#[must_use]
pub fn hit_test(world_pt: Point, doc: &DocStore, camera: &Camera) -> Option<Hit> {
    let radius = camera.screen_dist_to_world(ANCHOR_RADIUS_PX);

    for obj in doc.objects().iter().rev() {
        for anchor in Anchor::EDGES {
            let pos = obj.position.add(anchor.offset(obj.width, obj.height));
            if pos.distance(world_pt) <= radius {
                return Some(Hit { object_id: obj.id.clone(), part: HitPart::Anchor(anchor) });
            }
        }
        if Rect::of(obj).contains_point(world_pt) {
            return Some(Hit { object_id: obj.id.clone(), part: HitPart::Body });
        }
    }
    None
}
