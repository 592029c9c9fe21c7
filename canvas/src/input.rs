//! Input model: interaction modes, modifier keys, mouse buttons, context menus,
//! and the gesture state machine.
//!
//! `InteractionMode` and `Modifiers` capture the user's intent at the time of
//! a pointer event. `InputState` is the single active gesture; it carries all
//! the context needed to turn incremental pointer moves into document
//! mutations and to finish (or cancel) the gesture on release.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::camera::Point;
use crate::doc::{ObjectId, ObjectKind};

/// How background drags and object clicks are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionMode {
    /// Background drag pans; clicking an object opens its detail view.
    #[default]
    Standard,
    /// Background drag draws a marquee; clicking an object selects it.
    Manipulation,
}

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Ctrl key is held.
    pub ctrl: bool,
    /// Alt / Option key is held.
    pub alt: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

impl Modifiers {
    /// Whether a click should toggle selection membership instead of replacing it.
    #[must_use]
    pub fn toggles_selection(self) -> bool {
        self.shift || self.ctrl || self.meta
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    #[default]
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

/// A keyboard key.
///
/// The inner string holds the key name as reported by the browser, either
/// as `KeyboardEvent.key` (`"Escape"`, `" "`) or `KeyboardEvent.code` (`"Space"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Key(pub String);

impl Key {
    /// Whether this key cancels an in-progress link.
    #[must_use]
    pub fn cancels_link(&self) -> bool {
        matches!(self.0.as_str(), "Escape" | "Space" | " ")
    }

    #[must_use]
    pub fn is_escape(&self) -> bool {
        self.0 == "Escape"
    }
}

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct WheelDelta {
    /// Horizontal scroll amount in pixels.
    pub dx: f64,
    /// Vertical scroll amount in pixels (positive = down).
    pub dy: f64,
}

/// An entry in the right-click menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MenuItem {
    #[serde(rename = "add-text")]
    AddText,
    #[serde(rename = "add-person")]
    AddPerson,
    #[serde(rename = "add-location")]
    AddLocation,
    #[serde(rename = "add-image")]
    AddImage,
    #[serde(rename = "edit")]
    Edit,
    #[serde(rename = "delete")]
    Delete,
}

impl MenuItem {
    /// Items offered when right-clicking the empty canvas.
    pub const CANVAS: [MenuItem; 4] = [Self::AddText, Self::AddPerson, Self::AddLocation, Self::AddImage];

    /// Items offered when right-clicking an object.
    pub const OBJECT: [MenuItem; 2] = [Self::Edit, Self::Delete];

    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Self::AddText => "add-text",
            Self::AddPerson => "add-person",
            Self::AddLocation => "add-location",
            Self::AddImage => "add-image",
            Self::Edit => "edit",
            Self::Delete => "delete",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::AddText => "Add Text Note",
            Self::AddPerson => "Add Person",
            Self::AddLocation => "Add Location",
            Self::AddImage => "Add Image",
            Self::Edit => "Edit",
            Self::Delete => "Delete",
        }
    }

    /// Destructive items are styled as dangerous by the host.
    #[must_use]
    pub fn is_destructive(self) -> bool {
        matches!(self, Self::Delete)
    }

    /// The object kind an `add-*` item creates.
    #[must_use]
    pub fn creates(self) -> Option<ObjectKind> {
        match self {
            Self::AddText => Some(ObjectKind::Text),
            Self::AddPerson => Some(ObjectKind::Person),
            Self::AddLocation => Some(ObjectKind::Location),
            Self::AddImage => Some(ObjectKind::Image),
            Self::Edit | Self::Delete => None,
        }
    }
}

/// What a context menu was opened on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuTarget {
    Canvas,
    Object(ObjectId),
}

/// An open context menu, anchored at a world position.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextMenu {
    /// World-space position of the right-click; new objects are placed here.
    pub world: Point,
    pub target: MenuTarget,
    pub items: Vec<MenuItem>,
}

impl ContextMenu {
    #[must_use]
    pub fn new(world: Point, target: MenuTarget) -> Self {
        let items = match target {
            MenuTarget::Canvas => MenuItem::CANVAS.to_vec(),
            MenuTarget::Object(_) => MenuItem::OBJECT.to_vec(),
        };
        Self { world, target, items }
    }
}

/// Persistent UI state that outlives individual gestures.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// Current interaction mode.
    pub mode: InteractionMode,
    /// Ids of the currently selected objects.
    pub selected: BTreeSet<ObjectId>,
}

/// Internal state for the input state machine.
///
/// Each active variant carries gesture context needed to compute deltas and
/// finish the gesture on pointer-up.
#[derive(Debug, Clone, Default)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// The user is panning the canvas by dragging the background in standard mode.
    Panning {
        /// Screen-space position of the previous pointer event, used to compute pan delta.
        last_screen: Point,
        /// Screen-space position of the press, used to tell a click from a drag.
        press_screen: Point,
        /// Whether the pointer has travelled beyond the click slop.
        moved: bool,
    },
    /// The user is dragging an object by its body.
    DraggingObject {
        /// Id of the object being dragged.
        id: ObjectId,
        /// Pointer position minus object position at press time, in world units.
        grab_offset: Point,
        /// Screen-space position of the press, used to tell a click from a drag.
        press_screen: Point,
        /// Whether the pointer has travelled beyond the click slop.
        moved: bool,
    },
    /// The user is dragging a selection rectangle in manipulation mode.
    MarqueeSelecting {
        /// World-space corner where the drag started.
        start: Point,
        /// World-space corner under the pointer.
        current: Point,
    },
    /// A connection has been started from an anchor and awaits its second anchor.
    Linking {
        from_object_id: ObjectId,
        from_point_id: String,
        /// World-space pointer position for the preview segment, once the pointer has moved.
        preview: Option<Point>,
    },
    /// A context menu is showing and swallows the next click.
    ContextMenuOpen(ContextMenu),
}
