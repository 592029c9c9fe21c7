//! Canvas interaction engine for the evidence board.
//!
//! This crate owns the board document and everything the user does to it on
//! the canvas: translating raw pointer, wheel, and key events into gestures,
//! maintaining camera state for pan/zoom, hit-testing cards and their
//! connection anchors, and keeping the connection overlay in step with object
//! geometry. The host is responsible only for wiring input to the engine,
//! answering the [`engine::Action`]s it returns (image picks, edit forms,
//! detail views), and persisting [`doc::Board`] snapshots.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine and testable [`engine::EngineCore`] |
//! | [`doc`] | Evidence objects, connections, and the document store |
//! | [`geometry`] | Anchor positions, curve control points, rectangles |
//! | [`camera`] | Pan/zoom camera and coordinate conversions |
//! | [`input`] | Input event types and the gesture state machine |
//! | [`hit`] | Hit-testing against cards and anchors |
//! | [`overlay`] | Connection curve and link preview display list |
//! | [`render`] | Scene painting onto a 2D canvas context |
//! | [`consts`] | Shared numeric constants (zoom limits, stroke widths, etc.) |

pub mod camera;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod geometry;
pub mod hit;
pub mod input;
pub mod overlay;
pub mod render;
