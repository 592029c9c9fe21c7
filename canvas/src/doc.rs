//! Document model: evidence objects, connections, and the in-memory store.
//!
//! This module defines the data that describes a board (`EvidenceObject`,
//! `Payload`, `Connection`, `Board`) and the runtime store that owns it
//! (`DocStore`). Every mutation goes through `DocStore`, which keeps the one
//! referential invariant the board has: a connection never outlives either
//! of the objects it joins.
//!
//! Field names on the wire are camelCase and object variants carry a `type`
//! tag, so `board.json` files written by earlier versions of the editor load
//! without translation.
//!
//! Unknown ids are never an error here. They can only come from UI handles
//! that went stale after a delete earlier in the same event turn, so every
//! operation treats them as a silent no-op and reports it through its return
//! value.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::camera::Point;
use crate::geometry::Rect;

/// Unique identifier for an evidence object. Loaded ids are kept verbatim.
pub type ObjectId = String;

/// Unique identifier for a connection.
pub type ConnectionId = String;

/// The variant tag of an evidence object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    Image,
    Text,
    Person,
    Location,
}

impl ObjectKind {
    /// Size given to a freshly created object before its content is measured.
    #[must_use]
    pub fn default_size(self) -> (f64, f64) {
        match self {
            Self::Image => (200.0, 200.0),
            Self::Text => (200.0, 100.0),
            Self::Person => (250.0, 300.0),
            Self::Location => (250.0, 100.0),
        }
    }

    /// The lowercase tag used on the wire.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Text => "text",
            Self::Person => "person",
            Self::Location => "location",
        }
    }
}

/// Image evidence: an embeddable data reference plus an optional caption.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagePayload {
    #[serde(default)]
    pub image_data: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Free-form text note.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextPayload {
    #[serde(default)]
    pub text: String,
}

/// Person profile. Only `name` is always present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_photo: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marital_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blood_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physical_height: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physical_weight: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A place, optionally with an explicit maps link.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationPayload {
    #[serde(default)]
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_maps_url: Option<String>,
}

/// Variant-specific content of an evidence object, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Payload {
    Image(ImagePayload),
    Text(TextPayload),
    Person(PersonPayload),
    Location(LocationPayload),
}

impl Payload {
    /// Default content for a new object of `kind`. Images need their data supplied.
    #[must_use]
    pub fn default_for(kind: ObjectKind, image_data: Option<String>) -> Option<Self> {
        match kind {
            ObjectKind::Image => image_data.map(|image_data| Self::Image(ImagePayload { image_data, title: None })),
            ObjectKind::Text => Some(Self::Text(TextPayload { text: "New Note".to_owned() })),
            ObjectKind::Person => Some(Self::Person(PersonPayload { name: "New Person".to_owned(), ..Default::default() })),
            ObjectKind::Location => Some(Self::Location(LocationPayload {
                address: "New Location".to_owned(),
                google_maps_url: None,
            })),
        }
    }

    #[must_use]
    pub fn kind(&self) -> ObjectKind {
        match self {
            Self::Image(_) => ObjectKind::Image,
            Self::Text(_) => ObjectKind::Text,
            Self::Person(_) => ObjectKind::Person,
            Self::Location(_) => ObjectKind::Location,
        }
    }
}

/// An item placed on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceObject {
    /// Unique identifier, fixed at creation.
    pub id: ObjectId,
    /// Top-left corner in world coordinates.
    pub position: Point,
    /// Measured content width in world units.
    #[serde(default)]
    pub width: f64,
    /// Measured content height in world units.
    #[serde(default)]
    pub height: f64,
    /// Variant tag and content.
    #[serde(flatten)]
    pub payload: Payload,
}

impl EvidenceObject {
    #[must_use]
    pub fn kind(&self) -> ObjectKind {
        self.payload.kind()
    }

    /// Short human-readable label for the card header.
    #[must_use]
    pub fn label(&self) -> &str {
        match &self.payload {
            Payload::Image(p) => p.title.as_deref().unwrap_or("Image"),
            Payload::Text(p) => &p.text,
            Payload::Person(p) => &p.name,
            Payload::Location(p) => &p.address,
        }
    }
}

/// A curve joining an anchor on one object to an anchor on another (or the same) object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub id: ConnectionId,
    pub from_object_id: ObjectId,
    pub from_point_id: String,
    pub to_object_id: ObjectId,
    pub to_point_id: String,
}

impl Connection {
    /// Whether either end of this connection is attached to `id`.
    #[must_use]
    pub fn touches(&self, id: &str) -> bool {
        self.from_object_id == id || self.to_object_id == id
    }
}

/// Serializable snapshot of a board: the contents of `board.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Board {
    #[serde(default)]
    pub objects: Vec<EvidenceObject>,
    #[serde(default)]
    pub connections: Vec<Connection>,
}

impl Board {
    /// Image data of every image-bearing object, keyed by object id.
    ///
    /// This is the side index the archive format stores as `images/<id>.png`.
    /// It is derived on demand rather than kept alongside the objects.
    #[must_use]
    pub fn image_index(&self) -> BTreeMap<ObjectId, String> {
        self.objects
            .iter()
            .filter_map(|obj| match &obj.payload {
                Payload::Image(p) if !p.image_data.is_empty() => Some((obj.id.clone(), p.image_data.clone())),
                _ => None,
            })
            .collect()
    }
}

/// Objects and connections removed together by [`DocStore::delete_object`].
#[derive(Debug, Clone)]
pub struct Removed {
    pub object: EvidenceObject,
    pub connections: Vec<Connection>,
}

/// In-memory store of a board's objects and connections, in insertion order.
pub struct DocStore {
    objects: Vec<EvidenceObject>,
    connections: Vec<Connection>,
}

impl DocStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self { objects: Vec::new(), connections: Vec::new() }
    }

    /// Replace the whole document with a loaded board.
    ///
    /// Negative or non-finite dimensions are reset to 0 and connections whose
    /// endpoints are missing are dropped, so the store starts consistent.
    pub fn load_board(&mut self, board: Board) {
        self.objects = board
            .objects
            .into_iter()
            .map(|mut obj| {
                obj.width = sanitize_dimension(obj.width);
                obj.height = sanitize_dimension(obj.height);
                obj
            })
            .collect();
        let objects = &self.objects;
        self.connections = board
            .connections
            .into_iter()
            .filter(|c| {
                objects.iter().any(|o| o.id == c.from_object_id) && objects.iter().any(|o| o.id == c.to_object_id)
            })
            .collect();
    }

    /// Snapshot the current document for persistence.
    #[must_use]
    pub fn to_board(&self) -> Board {
        Board { objects: self.objects.clone(), connections: self.connections.clone() }
    }

    /// All objects in draw order (first drawn first).
    #[must_use]
    pub fn objects(&self) -> &[EvidenceObject] {
        &self.objects
    }

    /// All connections in creation order.
    #[must_use]
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Return a reference to an object by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&EvidenceObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut EvidenceObject> {
        self.objects.iter_mut().find(|o| o.id == id)
    }

    /// Create an object of `kind` at `position` with default content and size.
    ///
    /// Images need `image_data`; without it nothing is created and `None` is
    /// returned, which is how a cancelled image pick ends.
    pub fn add_object(&mut self, kind: ObjectKind, position: Point, image_data: Option<String>) -> Option<ObjectId> {
        let payload = Payload::default_for(kind, image_data)?;
        let (width, height) = kind.default_size();
        let id = format!("obj-{}", Uuid::new_v4().simple());
        self.objects.push(EvidenceObject { id: id.clone(), position, width, height, payload });
        Some(id)
    }

    /// Move an object to `position`.
    ///
    /// When `id` is part of a multi-selection (more than one member), every
    /// selected object is translated by the same delta instead. Returns the
    /// ids that moved; empty for an unknown `id`.
    pub fn move_object(&mut self, id: &str, position: Point, selection: &BTreeSet<ObjectId>) -> Vec<ObjectId> {
        let Some(obj) = self.get(id) else {
            return Vec::new();
        };
        let delta = position.sub(obj.position);

        if selection.len() > 1 && selection.contains(id) {
            let mut moved = Vec::with_capacity(selection.len());
            for obj in &mut self.objects {
                if selection.contains(&obj.id) {
                    obj.position = obj.position.add(delta);
                    moved.push(obj.id.clone());
                }
            }
            return moved;
        }

        match self.get_mut(id) {
            Some(obj) => {
                obj.position = position;
                vec![obj.id.clone()]
            }
            None => Vec::new(),
        }
    }

    /// Set an object's dimensions. Negative or non-finite values become 0.
    /// Returns `false` for an unknown id.
    pub fn resize_object(&mut self, id: &str, width: f64, height: f64) -> bool {
        let Some(obj) = self.get_mut(id) else {
            return false;
        };
        obj.width = sanitize_dimension(width);
        obj.height = sanitize_dimension(height);
        true
    }

    /// Remove an object together with every connection attached to it.
    pub fn delete_object(&mut self, id: &str) -> Option<Removed> {
        let idx = self.objects.iter().position(|o| o.id == id)?;
        let object = self.objects.remove(idx);
        let (connections, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.connections)
            .into_iter()
            .partition(|c| c.touches(id));
        self.connections = kept;
        Some(Removed { object, connections })
    }

    /// Append a connection between two anchors.
    ///
    /// Duplicates and self-loops are allowed and anchor ids are not checked.
    /// Returns `None` when either object no longer exists.
    pub fn connect(&mut self, from_object_id: &str, from_point_id: &str, to_object_id: &str, to_point_id: &str) -> Option<ConnectionId> {
        if self.get(from_object_id).is_none() || self.get(to_object_id).is_none() {
            return None;
        }
        let id = format!("conn-{}", Uuid::new_v4().simple());
        self.connections.push(Connection {
            id: id.clone(),
            from_object_id: from_object_id.to_owned(),
            from_point_id: from_point_id.to_owned(),
            to_object_id: to_object_id.to_owned(),
            to_point_id: to_point_id.to_owned(),
        });
        Some(id)
    }

    /// Replace an object's content wholesale, matched by id. Returns `false` for an unknown id.
    pub fn update_object(&mut self, updated: EvidenceObject) -> bool {
        let Some(obj) = self.get_mut(&updated.id) else {
            return false;
        };
        *obj = EvidenceObject {
            width: sanitize_dimension(updated.width),
            height: sanitize_dimension(updated.height),
            ..updated
        };
        true
    }

    /// Ids of objects whose whole bounding box lies inside `rect`, in draw order.
    ///
    /// A rectangle without area contains nothing.
    #[must_use]
    pub fn objects_within(&self, rect: &Rect) -> Vec<ObjectId> {
        if !rect.has_area() {
            return Vec::new();
        }
        self.objects
            .iter()
            .filter(|o| rect.contains_rect(&Rect::of(o)))
            .map(|o| o.id.clone())
            .collect()
    }
}

impl Default for DocStore {
    fn default() -> Self {
        Self::new()
    }
}

fn sanitize_dimension(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 { value } else { 0.0 }
}
