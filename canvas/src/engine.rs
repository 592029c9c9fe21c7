use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::camera::{Camera, Point};
use crate::consts::{CLICK_SLOP_PX, RESIZE_EPSILON};
use crate::doc::{Board, ConnectionId, DocStore, EvidenceObject, ObjectId, ObjectKind, Payload};
use crate::geometry::Rect;
use crate::hit::{self, Hit, HitPart};
use crate::input::{Button, ContextMenu, InputState, InteractionMode, Key, MenuItem, MenuTarget, Modifiers, UiState, WheelDelta};
use crate::overlay::{self, LinkPreview, Overlay};
use crate::render;

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

const MAPS_SEARCH_URL: &str = "https://www.google.com/maps/search/";

/// A read-only view the host shows when an object is clicked in standard mode.
#[derive(Debug, Clone, PartialEq)]
pub enum DetailView {
    /// Full-size image lightbox.
    Image { image_data: String },
    /// Text note reader.
    Text { text: String },
    /// Person profile, looked up by id when shown.
    Person { id: ObjectId },
}

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    ObjectCreated(ObjectId),
    ObjectUpdated(ObjectId),
    ObjectDeleted(ObjectId),
    ConnectionCreated(ConnectionId),
    SelectionChanged,
    ContextMenuOpened,
    ContextMenuClosed,
    /// The host should ask the user for an image and answer with
    /// [`EngineCore::complete_image_pick`].
    ImagePickRequested { position: Point },
    /// The host should open the edit form and answer with [`EngineCore::commit_edit`].
    EditRequested { id: ObjectId },
    DetailRequested(DetailView),
    SetCursor(String),
    RenderNeeded,
}

/// Core engine state: all logic that doesn't depend on the canvas element.
///
/// Separated from `Engine` so it can be tested without WASM/browser dependencies.
/// One instance belongs to one board window; nothing in it is shared.
pub struct EngineCore {
    pub doc: DocStore,
    pub camera: Camera,
    pub ui: UiState,
    pub input: InputState,
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub dpr: f64,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self {
            doc: DocStore::new(),
            camera: Camera::default(),
            ui: UiState::default(),
            input: InputState::default(),
            viewport_width: 0.0,
            viewport_height: 0.0,
            dpr: 1.0,
        }
    }
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Data inputs ---

    /// Replace the document with a loaded board, dropping any transient UI state.
    pub fn load_board(&mut self, board: Board) {
        self.doc.load_board(board);
        self.ui.selected.clear();
        self.input = InputState::Idle;
    }

    /// Snapshot the document for saving.
    #[must_use]
    pub fn board(&self) -> Board {
        self.doc.to_board()
    }

    /// Finish an `add-image` request. `None` means the user cancelled the pick.
    pub fn complete_image_pick(&mut self, position: Point, image_data: Option<String>) -> Vec<Action> {
        let Some(id) = self.doc.add_object(ObjectKind::Image, position, image_data) else {
            return Vec::new();
        };
        vec![Action::ObjectCreated(id), Action::RenderNeeded]
    }

    /// Commit the edit form's result back into the document.
    pub fn commit_edit(&mut self, updated: EvidenceObject) -> Vec<Action> {
        let id = updated.id.clone();
        if !self.doc.update_object(updated) {
            return Vec::new();
        }
        vec![Action::ObjectUpdated(id), Action::RenderNeeded]
    }

    /// Feed back the measured size of an object's rendered content.
    ///
    /// Measurements within [`RESIZE_EPSILON`] of the current size are ignored.
    pub fn measure_object(&mut self, id: &str, width: f64, height: f64) -> Vec<Action> {
        let Some(obj) = self.doc.get(id) else {
            return Vec::new();
        };
        if (obj.width - width).abs() <= RESIZE_EPSILON && (obj.height - height).abs() <= RESIZE_EPSILON {
            return Vec::new();
        }
        self.doc.resize_object(id, width, height);
        vec![Action::ObjectUpdated(id.to_owned()), Action::RenderNeeded]
    }

    /// Delete an object and its connections, and drop any gesture that referenced it.
    pub fn delete_object(&mut self, id: &str) -> Vec<Action> {
        let Some(removed) = self.doc.delete_object(id) else {
            return Vec::new();
        };
        let mut actions = vec![Action::ObjectDeleted(removed.object.id)];
        if self.ui.selected.remove(id) {
            actions.push(Action::SelectionChanged);
        }

        let stale = match &self.input {
            InputState::Linking { from_object_id: owner, .. } | InputState::DraggingObject { id: owner, .. } => {
                owner == id
            }
            InputState::ContextMenuOpen(menu) => matches!(&menu.target, MenuTarget::Object(target) if target == id),
            _ => false,
        };
        if stale {
            self.input = InputState::Idle;
            actions.push(Action::SetCursor(self.cursor().to_owned()));
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    // --- Mode / viewport ---

    /// Switch interaction mode. Clears the selection and abandons background gestures.
    pub fn set_mode(&mut self, mode: InteractionMode) -> Vec<Action> {
        if self.ui.mode == mode {
            return Vec::new();
        }
        self.ui.mode = mode;

        let mut actions = Vec::new();
        if !self.ui.selected.is_empty() {
            self.ui.selected.clear();
            actions.push(Action::SelectionChanged);
        }
        if matches!(self.input, InputState::Panning { .. } | InputState::MarqueeSelecting { .. }) {
            self.input = InputState::Idle;
        }
        actions.push(Action::SetCursor(self.cursor().to_owned()));
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Set the zoom directly (zoom slider). The pan is left unchanged.
    pub fn set_zoom(&mut self, zoom: f64) -> Vec<Action> {
        self.camera.set_zoom(zoom);
        vec![Action::RenderNeeded]
    }

    /// Set the pan offset directly.
    pub fn set_pan(&mut self, pan: Point) -> Vec<Action> {
        self.camera.set_pan(pan);
        vec![Action::RenderNeeded]
    }

    /// Update viewport dimensions (CSS pixels) and device pixel ratio.
    pub fn set_viewport(&mut self, width_css: f64, height_css: f64, dpr: f64) {
        self.viewport_width = width_css.max(0.0);
        self.viewport_height = height_css.max(0.0);
        self.dpr = if dpr > 0.0 { dpr } else { 1.0 };
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button, _modifiers: Modifiers) -> Vec<Action> {
        let world = self.camera.screen_to_world(screen_pt);
        match button {
            Button::Secondary => return self.open_context_menu(world),
            Button::Middle => return Vec::new(),
            Button::Primary => {}
        }

        if matches!(self.input, InputState::ContextMenuOpen(_)) {
            return self.close_context_menu();
        }

        let hit = hit::hit_test(world, &self.doc, &self.camera);

        if matches!(self.input, InputState::Linking { .. }) {
            return match hit {
                Some(Hit { object_id, part: HitPart::Anchor(anchor) }) => self.click_anchor(&object_id, anchor.id()),
                _ => Vec::new(),
            };
        }

        match hit {
            Some(Hit { object_id, part: HitPart::Anchor(anchor) }) => {
                self.input = InputState::Idle;
                self.click_anchor(&object_id, anchor.id())
            }
            Some(Hit { object_id, part: HitPart::Body }) => {
                let Some(obj) = self.doc.get(&object_id) else {
                    return Vec::new();
                };
                let grab_offset = world.sub(obj.position);
                self.input = InputState::DraggingObject { id: object_id, grab_offset, press_screen: screen_pt, moved: false };
                Vec::new()
            }
            None => match self.ui.mode {
                InteractionMode::Standard => {
                    self.input = InputState::Panning { last_screen: screen_pt, press_screen: screen_pt, moved: false };
                    vec![Action::SetCursor(self.cursor().to_owned())]
                }
                InteractionMode::Manipulation => {
                    let mut actions = Vec::new();
                    if !self.ui.selected.is_empty() {
                        self.ui.selected.clear();
                        actions.push(Action::SelectionChanged);
                    }
                    self.input = InputState::MarqueeSelecting { start: world, current: world };
                    actions.push(Action::RenderNeeded);
                    actions
                }
            },
        }
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point, _modifiers: Modifiers) -> Vec<Action> {
        let world = self.camera.screen_to_world(screen_pt);
        match &mut self.input {
            InputState::Panning { last_screen, press_screen, moved } => {
                self.camera.pan_by(screen_pt.x - last_screen.x, screen_pt.y - last_screen.y);
                *last_screen = screen_pt;
                if press_screen.distance(screen_pt) > CLICK_SLOP_PX {
                    *moved = true;
                }
                vec![Action::RenderNeeded]
            }
            InputState::DraggingObject { id, grab_offset, press_screen, moved } => {
                if !*moved && press_screen.distance(screen_pt) <= CLICK_SLOP_PX {
                    return Vec::new();
                }
                *moved = true;
                let id = id.clone();
                let target = world.sub(*grab_offset);
                let moved_ids = self.doc.move_object(&id, target, &self.ui.selected);
                if moved_ids.is_empty() {
                    self.input = InputState::Idle;
                    return Vec::new();
                }
                let mut actions: Vec<Action> = moved_ids.into_iter().map(Action::ObjectUpdated).collect();
                actions.push(Action::RenderNeeded);
                actions
            }
            InputState::MarqueeSelecting { current, .. } => {
                *current = world;
                vec![Action::RenderNeeded]
            }
            InputState::Linking { preview, .. } => {
                *preview = Some(world);
                vec![Action::RenderNeeded]
            }
            InputState::Idle | InputState::ContextMenuOpen(_) => Vec::new(),
        }
    }

    pub fn on_pointer_up(&mut self, screen_pt: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        if button != Button::Primary {
            return Vec::new();
        }
        match std::mem::take(&mut self.input) {
            InputState::Panning { moved, .. } => {
                let mut actions = vec![Action::SetCursor(self.cursor().to_owned())];
                if !moved && !self.ui.selected.is_empty() {
                    self.ui.selected.clear();
                    actions.push(Action::SelectionChanged);
                    actions.push(Action::RenderNeeded);
                }
                actions
            }
            InputState::DraggingObject { id, moved, .. } => {
                if moved {
                    Vec::new()
                } else {
                    self.click_object(&id, modifiers)
                }
            }
            InputState::MarqueeSelecting { start, .. } => {
                let end = self.camera.screen_to_world(screen_pt);
                let rect = Rect::from_corners(start, end);
                self.ui.selected = self.doc.objects_within(&rect).into_iter().collect();
                vec![Action::SelectionChanged, Action::RenderNeeded]
            }
            state @ (InputState::Linking { .. } | InputState::ContextMenuOpen(_)) => {
                self.input = state;
                Vec::new()
            }
            InputState::Idle => Vec::new(),
        }
    }

    /// Zoom around the pointer. Never changes the gesture in progress.
    pub fn on_wheel(&mut self, screen_pt: Point, delta: WheelDelta, _modifiers: Modifiers) -> Vec<Action> {
        if delta.dy == 0.0 {
            return Vec::new();
        }
        self.camera.zoom_at(screen_pt, delta.dy);
        vec![Action::RenderNeeded]
    }

    pub fn on_key_down(&mut self, key: Key, _modifiers: Modifiers) -> Vec<Action> {
        match &self.input {
            InputState::Linking { .. } if key.cancels_link() => {
                self.input = InputState::Idle;
                vec![Action::SetCursor(self.cursor().to_owned()), Action::RenderNeeded]
            }
            InputState::ContextMenuOpen(_) if key.is_escape() => self.close_context_menu(),
            InputState::MarqueeSelecting { .. } if key.is_escape() => {
                self.input = InputState::Idle;
                vec![Action::RenderNeeded]
            }
            _ => Vec::new(),
        }
    }

    /// Press on the anchor `point_id` of `object_id`.
    ///
    /// Starts a link when idle. While linking, the same anchor cancels and any
    /// other anchor (on any object, including the origin) completes the link.
    pub fn click_anchor(&mut self, object_id: &str, point_id: &str) -> Vec<Action> {
        match &self.input {
            InputState::Linking { from_object_id, from_point_id, .. } => {
                let from_object_id = from_object_id.clone();
                let from_point_id = from_point_id.clone();
                self.input = InputState::Idle;

                let mut actions = Vec::new();
                if from_object_id != object_id || from_point_id != point_id {
                    if let Some(id) = self.doc.connect(&from_object_id, &from_point_id, object_id, point_id) {
                        actions.push(Action::ConnectionCreated(id));
                    }
                }
                actions.push(Action::SetCursor(self.cursor().to_owned()));
                actions.push(Action::RenderNeeded);
                actions
            }
            InputState::Idle => {
                if self.doc.get(object_id).is_none() {
                    return Vec::new();
                }
                self.input = InputState::Linking {
                    from_object_id: object_id.to_owned(),
                    from_point_id: point_id.to_owned(),
                    preview: None,
                };
                vec![Action::SetCursor(self.cursor().to_owned()), Action::RenderNeeded]
            }
            _ => Vec::new(),
        }
    }

    // --- Context menu ---

    fn open_context_menu(&mut self, world: Point) -> Vec<Action> {
        if !matches!(self.input, InputState::Idle | InputState::ContextMenuOpen(_)) {
            return Vec::new();
        }
        let target = match hit::hit_test(world, &self.doc, &self.camera) {
            Some(hit) => MenuTarget::Object(hit.object_id),
            None => MenuTarget::Canvas,
        };
        self.input = InputState::ContextMenuOpen(ContextMenu::new(world, target));
        vec![Action::ContextMenuOpened, Action::RenderNeeded]
    }

    /// Close the context menu without running an item.
    pub fn close_context_menu(&mut self) -> Vec<Action> {
        if !matches!(self.input, InputState::ContextMenuOpen(_)) {
            return Vec::new();
        }
        self.input = InputState::Idle;
        vec![Action::ContextMenuClosed, Action::RenderNeeded]
    }

    /// Run a context menu item and close the menu.
    ///
    /// Items not offered by the open menu just close it.
    pub fn choose_menu_item(&mut self, item: MenuItem) -> Vec<Action> {
        if !matches!(self.input, InputState::ContextMenuOpen(_)) {
            return Vec::new();
        }
        let InputState::ContextMenuOpen(menu) = std::mem::take(&mut self.input) else {
            return Vec::new();
        };

        let mut actions = vec![Action::ContextMenuClosed];
        if menu.items.contains(&item) {
            match (item, &menu.target) {
                (MenuItem::AddImage, _) => actions.push(Action::ImagePickRequested { position: menu.world }),
                (MenuItem::AddText | MenuItem::AddPerson | MenuItem::AddLocation, _) => {
                    if let Some(id) = item.creates().and_then(|kind| self.doc.add_object(kind, menu.world, None)) {
                        actions.push(Action::ObjectCreated(id.clone()));
                        actions.push(Action::EditRequested { id });
                    }
                }
                (MenuItem::Edit, MenuTarget::Object(id)) => {
                    if self.doc.get(id).is_some() {
                        actions.push(Action::EditRequested { id: id.clone() });
                    }
                }
                (MenuItem::Delete, MenuTarget::Object(id)) => actions.extend(self.delete_object(id)),
                (MenuItem::Edit | MenuItem::Delete, MenuTarget::Canvas) => {}
            }
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    // --- Clicks ---

    fn click_object(&mut self, id: &str, modifiers: Modifiers) -> Vec<Action> {
        let Some(obj) = self.doc.get(id) else {
            return Vec::new();
        };
        match self.ui.mode {
            InteractionMode::Standard => {
                let view = match &obj.payload {
                    Payload::Image(p) => DetailView::Image { image_data: p.image_data.clone() },
                    Payload::Text(p) => DetailView::Text { text: p.text.clone() },
                    Payload::Person(_) => DetailView::Person { id: obj.id.clone() },
                    Payload::Location(_) => return Vec::new(),
                };
                vec![Action::DetailRequested(view)]
            }
            InteractionMode::Manipulation => {
                if modifiers.toggles_selection() {
                    if !self.ui.selected.remove(id) {
                        self.ui.selected.insert(id.to_owned());
                    }
                } else if obj.kind() == ObjectKind::Location {
                    return Vec::new();
                } else {
                    self.ui.selected.clear();
                    self.ui.selected.insert(id.to_owned());
                }
                vec![Action::SelectionChanged, Action::RenderNeeded]
            }
        }
    }

    // --- Queries ---

    /// The currently selected objects.
    #[must_use]
    pub fn selection(&self) -> &std::collections::BTreeSet<ObjectId> {
        &self.ui.selected
    }

    /// The current camera state.
    #[must_use]
    pub fn camera(&self) -> Camera {
        self.camera
    }

    /// Look up an object by ID.
    #[must_use]
    pub fn object(&self, id: &str) -> Option<&EvidenceObject> {
        self.doc.get(id)
    }

    #[must_use]
    pub fn mode(&self) -> InteractionMode {
        self.ui.mode
    }

    /// Origin `(object id, anchor id)` of the link in progress, if any.
    #[must_use]
    pub fn linking(&self) -> Option<(&str, &str)> {
        match &self.input {
            InputState::Linking { from_object_id, from_point_id, .. } => Some((from_object_id.as_str(), from_point_id.as_str())),
            _ => None,
        }
    }

    #[must_use]
    pub fn context_menu(&self) -> Option<&ContextMenu> {
        match &self.input {
            InputState::ContextMenuOpen(menu) => Some(menu),
            _ => None,
        }
    }

    /// The marquee rectangle in world space while one is being dragged.
    #[must_use]
    pub fn marquee(&self) -> Option<Rect> {
        match self.input {
            InputState::MarqueeSelecting { start, current } => Some(Rect::from_corners(start, current)),
            _ => None,
        }
    }

    /// CSS cursor for the current mode and gesture.
    #[must_use]
    pub fn cursor(&self) -> &'static str {
        match (&self.input, self.ui.mode) {
            (InputState::Linking { .. }, _) => "crosshair",
            (InputState::Panning { .. }, _) => "grabbing",
            (_, InteractionMode::Standard) => "grab",
            (_, InteractionMode::Manipulation) => "default",
        }
    }

    /// Maps link for a location: its explicit URL, or a search for its address.
    #[must_use]
    pub fn map_link(&self, id: &str) -> Option<String> {
        let Payload::Location(loc) = &self.doc.get(id)?.payload else {
            return None;
        };
        if let Some(url) = loc.google_maps_url.as_ref().filter(|u| !u.is_empty()) {
            return Some(url.clone());
        }
        match url::Url::parse_with_params(MAPS_SEARCH_URL, &[("api", "1"), ("query", loc.address.as_str())]) {
            Ok(url) => Some(url.into()),
            Err(_) => None,
        }
    }

    /// Display list for every connection and the link preview.
    #[must_use]
    pub fn overlay(&self) -> Overlay {
        let preview = match &self.input {
            InputState::Linking { from_object_id, from_point_id, preview: Some(end) } => {
                Some(LinkPreview { from_object_id, from_point_id, end: *end })
            }
            _ => None,
        };
        overlay::build(&self.doc, &self.camera, preview)
    }
}

/// The full canvas engine. Wraps `EngineCore` and owns the browser canvas element.
pub struct Engine {
    canvas: HtmlCanvasElement,
    pub core: EngineCore,
}

impl Engine {
    /// Create a new engine bound to the given canvas element.
    #[must_use]
    pub fn new(canvas: HtmlCanvasElement) -> Self {
        Self { canvas, core: EngineCore::new() }
    }

    /// Update viewport dimensions and size the backing store for the device pixel ratio.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn set_viewport(&mut self, width_css: f64, height_css: f64, dpr: f64) {
        self.core.set_viewport(width_css, height_css, dpr);
        self.canvas.set_width((self.core.viewport_width * self.core.dpr).round() as u32);
        self.canvas.set_height((self.core.viewport_height * self.core.dpr).round() as u32);
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_pointer_down(screen_pt, button, modifiers)
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_pointer_move(screen_pt, modifiers)
    }

    pub fn on_pointer_up(&mut self, screen_pt: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_pointer_up(screen_pt, button, modifiers)
    }

    pub fn on_wheel(&mut self, screen_pt: Point, delta: WheelDelta, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_wheel(screen_pt, delta, modifiers)
    }

    pub fn on_key_down(&mut self, key: Key, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_key_down(key, modifiers)
    }

    // --- Render ---

    /// Draw the current state to the canvas.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the 2D context is unavailable or any `Canvas2D` call fails.
    pub fn render(&self) -> Result<(), JsValue> {
        let ctx = self
            .canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(JsValue::from)?;
        render::draw(&ctx, &self.core)
    }
}
