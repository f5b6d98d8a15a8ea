use rand::Rng;
use tracing::debug;

use crate::camera::{Point, SurfaceRect, Viewport};
use crate::config::CanvasConfig;
use crate::consts::{
    DEFAULT_NOTE_CONTENT, DEFAULT_NOTE_HEIGHT, DEFAULT_NOTE_WIDTH, MIN_NOTE_HEIGHT, MIN_NOTE_WIDTH, NOTE_PALETTE,
};
use crate::gesture::{PanController, ZoomController};
use crate::graph::{Connection, ConnectionId, GraphModel, NewNote, Note, NoteId, NotePatch};
use crate::hit::{self, HitPart};
use crate::input::{Button, InputState, Key, WheelDelta};
use crate::scene::{self, Scene};
use crate::viewport::ViewportStore;

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    NoteCreated(Note),
    NoteUpdated { id: NoteId, patch: NotePatch },
    NoteDeleted { id: NoteId },
    ConnectionCreated(Connection),
    ConnectionDeleted { id: ConnectionId },
    /// The host should focus the text editor of this note.
    EditRequested { id: NoteId },
    /// The host should open its context menu. `canvas` is where a note added
    /// from the menu should be centered; `client` is where to draw the menu.
    ContextMenuRequested { canvas: Point, client: Point },
    SetCursor(&'static str),
    RenderNeeded,
}

/// One notes surface: its graph, its gesture state, and the id of the
/// viewport instance it navigates.
///
/// The viewport store is passed into every handler rather than owned, so
/// several surfaces can share one store while each touches only its own
/// instance.
pub struct SurfaceCore {
    instance: String,
    pub graph: GraphModel,
    pub input: InputState,
    pan: PanController,
    zoom: ZoomController,
    rect: SurfaceRect,
    config: CanvasConfig,
}

impl SurfaceCore {
    #[must_use]
    pub fn new(instance: impl Into<String>) -> Self {
        Self::with_config(instance, CanvasConfig::default())
    }

    #[must_use]
    pub fn with_config(instance: impl Into<String>, config: CanvasConfig) -> Self {
        let instance = instance.into();
        Self {
            pan: PanController::new(instance.clone()),
            zoom: ZoomController::new(instance.clone()),
            instance,
            graph: GraphModel::with_config(&config),
            input: InputState::Idle,
            rect: SurfaceRect::default(),
            config,
        }
    }

    /// Viewport instance this surface navigates.
    #[must_use]
    pub fn instance(&self) -> &str {
        &self.instance
    }

    /// Update the surface's bounding box in client coordinates.
    pub fn set_surface_rect(&mut self, rect: SurfaceRect) {
        self.rect = rect;
    }

    #[must_use]
    pub fn surface_rect(&self) -> SurfaceRect {
        self.rect
    }

    /// Current viewport of this surface.
    #[must_use]
    pub fn viewport(&self, viewports: &ViewportStore) -> Viewport {
        viewports.instance(&self.instance)
    }

    /// Convert a client-space point to canvas space for this surface.
    #[must_use]
    pub fn client_to_canvas(&self, viewports: &ViewportStore, client: Point) -> Point {
        self.viewport(viewports).screen_to_canvas(self.rect.to_local(client))
    }

    /// Describe the current frame for the renderer.
    #[must_use]
    pub fn scene(&self, viewports: &ViewportStore) -> Scene {
        scene::compose(&self.viewport(viewports), &self.graph)
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, viewports: &mut ViewportStore, client: Point, button: Button) -> Vec<Action> {
        if self.input != InputState::Idle {
            return Vec::new();
        }
        let vp = self.viewport(viewports);
        let local = self.rect.to_local(client);
        let canvas = vp.screen_to_canvas(local);

        match button {
            Button::Secondary => return vec![Action::ContextMenuRequested { canvas, client }],
            Button::Middle => return Vec::new(),
            Button::Primary => {}
        }

        let radius = vp.screen_dist_to_canvas(self.config.handle_radius_px);
        let Some(target) = hit::hit_test(canvas, &self.graph, radius) else {
            self.graph.select_note(None);
            self.pan.pointer_down(viewports, local, button);
            self.input = InputState::Panning;
            return vec![Action::SetCursor("grabbing"), Action::RenderNeeded];
        };
        let Some(note) = self.graph.note(target.note_id) else {
            return Vec::new();
        };
        let id = note.id;

        match target.part {
            HitPart::Handle(side) => {
                let origin = hit::handle_point(note, side);
                self.graph.start_connection(id, origin.x, origin.y);
                self.input = InputState::Connecting { from: id };
                vec![Action::SetCursor("crosshair"), Action::RenderNeeded]
            }
            HitPart::ResizeGrip => {
                self.input = InputState::ResizingNote {
                    id,
                    start_canvas: canvas,
                    orig_w: note.width,
                    orig_h: note.height,
                };
                self.graph.select_note(Some(id));
                vec![Action::SetCursor("nwse-resize"), Action::RenderNeeded]
            }
            HitPart::Body => {
                let grab = Point::new(canvas.x - note.x, canvas.y - note.y);
                self.input = InputState::DraggingNote { id, grab };
                self.graph.select_note(Some(id));
                vec![Action::SetCursor("grabbing"), Action::RenderNeeded]
            }
        }
    }

    pub fn on_pointer_move(&mut self, viewports: &mut ViewportStore, client: Point) -> Vec<Action> {
        let local = self.rect.to_local(client);
        let canvas = self.viewport(viewports).screen_to_canvas(local);

        match self.input {
            InputState::Idle => Vec::new(),
            InputState::Panning => {
                if self.pan.pointer_move(viewports, local) {
                    vec![Action::RenderNeeded]
                } else {
                    Vec::new()
                }
            }
            InputState::DraggingNote { id, grab } => {
                let patch = NotePatch::position(canvas.x - grab.x, canvas.y - grab.y);
                self.apply_gesture_patch(id, patch)
            }
            InputState::ResizingNote { id, start_canvas, orig_w, orig_h } => {
                let width = (orig_w + canvas.x - start_canvas.x).max(MIN_NOTE_WIDTH);
                let height = (orig_h + canvas.y - start_canvas.y).max(MIN_NOTE_HEIGHT);
                self.apply_gesture_patch(id, NotePatch::size(width, height))
            }
            InputState::Connecting { .. } => {
                self.graph.update_temp_connection(canvas.x, canvas.y);
                vec![Action::RenderNeeded]
            }
        }
    }

    pub fn on_pointer_up(&mut self, viewports: &mut ViewportStore, client: Point) -> Vec<Action> {
        let state = std::mem::take(&mut self.input);
        match state {
            InputState::Idle => Vec::new(),
            InputState::Panning => {
                self.pan.pointer_up(viewports);
                vec![Action::SetCursor("default")]
            }
            InputState::DraggingNote { .. } | InputState::ResizingNote { .. } => {
                vec![Action::SetCursor("default")]
            }
            InputState::Connecting { from } => {
                let vp = self.viewport(viewports);
                let canvas = vp.screen_to_canvas(self.rect.to_local(client));
                let radius = vp.screen_dist_to_canvas(self.config.handle_radius_px);

                let mut actions = vec![Action::SetCursor("default")];
                match hit::handle_at(canvas, &self.graph, radius) {
                    Some((target, _)) => {
                        let created = self.graph.complete_connection(target);
                        if let Some(conn) = created.and_then(|id| self.graph.connection(id)) {
                            actions.push(Action::ConnectionCreated(conn.clone()));
                        }
                    }
                    None => {
                        debug!(%from, "surface: connection dropped outside a handle");
                        self.graph.cancel_connection();
                    }
                }
                actions.push(Action::RenderNeeded);
                actions
            }
        }
    }

    /// Pointer left the surface: abandon whatever gesture is active.
    pub fn on_pointer_leave(&mut self, viewports: &mut ViewportStore) -> Vec<Action> {
        let state = std::mem::take(&mut self.input);
        match state {
            InputState::Idle => Vec::new(),
            InputState::Panning => {
                self.pan.pointer_leave(viewports);
                vec![Action::SetCursor("default")]
            }
            InputState::DraggingNote { .. } | InputState::ResizingNote { .. } => {
                vec![Action::SetCursor("default")]
            }
            InputState::Connecting { .. } => {
                self.graph.cancel_connection();
                vec![Action::SetCursor("default"), Action::RenderNeeded]
            }
        }
    }

    /// Double-click on a note opens it for editing.
    pub fn on_double_click(&mut self, viewports: &ViewportStore, client: Point) -> Vec<Action> {
        let vp = self.viewport(viewports);
        let canvas = vp.screen_to_canvas(self.rect.to_local(client));
        let radius = vp.screen_dist_to_canvas(self.config.handle_radius_px);
        let Some(target) = hit::hit_test(canvas, &self.graph, radius) else {
            return Vec::new();
        };
        self.graph.select_note(Some(target.note_id));
        self.graph.start_editing(target.note_id);
        vec![Action::EditRequested { id: target.note_id }, Action::RenderNeeded]
    }

    /// Zoom one step about the pointer. The host must suppress native scrolling.
    pub fn on_wheel(&mut self, viewports: &mut ViewportStore, client: Point, delta: WheelDelta) -> Vec<Action> {
        self.zoom.wheel(viewports, client, self.rect, delta);
        vec![Action::RenderNeeded]
    }

    pub fn on_key_down(&mut self, viewports: &mut ViewportStore, key: &Key) -> Vec<Action> {
        if key.is("Escape") {
            let mut actions = self.on_pointer_leave(viewports);
            if self.graph.editing().is_some() {
                self.graph.stop_editing();
                actions.push(Action::RenderNeeded);
            }
            return actions;
        }
        if key.is("Delete") || key.is("Backspace") {
            if self.graph.editing().is_some() || self.input != InputState::Idle {
                return Vec::new();
            }
            if let Some(id) = self.graph.selected() {
                return self.delete_note(id);
            }
        }
        Vec::new()
    }

    // --- Commands ---

    /// Add a default-sized note centered on `canvas`, with a palette colour.
    pub fn add_note_at(&mut self, canvas: Point) -> Vec<Action> {
        let color = NOTE_PALETTE[rand::rng().random_range(0..NOTE_PALETTE.len())];
        let id = self.graph.add_note(NewNote {
            x: canvas.x - DEFAULT_NOTE_WIDTH / 2.0,
            y: canvas.y - DEFAULT_NOTE_HEIGHT / 2.0,
            width: DEFAULT_NOTE_WIDTH,
            height: DEFAULT_NOTE_HEIGHT,
            content: DEFAULT_NOTE_CONTENT.to_string(),
            color: color.to_string(),
        });
        let mut actions = Vec::with_capacity(3);
        if let Some(note) = self.graph.note(id) {
            actions.push(Action::NoteCreated(note.clone()));
        }
        actions.push(Action::EditRequested { id });
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Replace the text of a note from the host's editor.
    pub fn set_content(&mut self, id: NoteId, content: impl Into<String>) -> Vec<Action> {
        let patch = NotePatch::content(content);
        if !self.graph.update_note(id, &patch) {
            return Vec::new();
        }
        vec![Action::NoteUpdated { id, patch }, Action::RenderNeeded]
    }

    /// Editor lost focus.
    pub fn stop_editing(&mut self) -> Vec<Action> {
        if self.graph.editing().is_none() {
            return Vec::new();
        }
        self.graph.stop_editing();
        vec![Action::RenderNeeded]
    }

    /// Delete a note, reporting every connection removed with it.
    pub fn delete_note(&mut self, id: NoteId) -> Vec<Action> {
        let cascaded: Vec<ConnectionId> = self.graph.connections_of(id).iter().map(|c| c.id).collect();
        if self.graph.delete_note(id).is_none() {
            return Vec::new();
        }
        if matches!(
            self.input,
            InputState::DraggingNote { id: active, .. }
                | InputState::ResizingNote { id: active, .. }
                | InputState::Connecting { from: active } if active == id
        ) {
            self.input = InputState::Idle;
        }
        let mut actions: Vec<Action> = cascaded.into_iter().map(|id| Action::ConnectionDeleted { id }).collect();
        actions.push(Action::NoteDeleted { id });
        actions.push(Action::RenderNeeded);
        actions
    }

    pub fn delete_connection(&mut self, id: ConnectionId) -> Vec<Action> {
        if self.graph.delete_connection(id).is_none() {
            return Vec::new();
        }
        vec![Action::ConnectionDeleted { id }, Action::RenderNeeded]
    }

    /// Remove every note and connection on this surface.
    pub fn clear_all(&mut self, viewports: &mut ViewportStore) -> Vec<Action> {
        let mut actions = self.on_pointer_leave(viewports);
        self.graph.clear();
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Return this surface's viewport to the default pan and zoom.
    pub fn reset_view(&mut self, viewports: &mut ViewportStore) -> Vec<Action> {
        viewports.reset(&self.instance);
        vec![Action::RenderNeeded]
    }

    // --- Helpers ---

    fn apply_gesture_patch(&mut self, id: NoteId, patch: NotePatch) -> Vec<Action> {
        if !self.graph.update_note(id, &patch) {
            self.input = InputState::Idle;
            return Vec::new();
        }
        vec![Action::NoteUpdated { id, patch }, Action::RenderNeeded]
    }
}
