//! Pan and zoom gesture controllers.
//!
//! Both controllers are bound to one viewport instance and only ever mutate
//! that instance through the [`ViewportStore`] operations. Panning moves the
//! offset by raw screen-pixel deltas; zooming goes through `zoom_at`, which is
//! the only place scale is clamped.

#[cfg(test)]
#[path = "gesture_test.rs"]
mod gesture_test;

use tracing::debug;

use crate::camera::{Point, SurfaceRect, Viewport};
use crate::input::{Button, WheelDelta};
use crate::viewport::ViewportStore;

/// State of a pan gesture.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PanState {
    #[default]
    Idle,
    Panning {
        /// Screen-space position of the previous pointer event.
        last_screen: Point,
    },
}

/// Pointer-drag state machine that translates a viewport while the primary
/// button is held.
#[derive(Debug, Clone)]
pub struct PanController {
    instance: String,
    state: PanState,
}

impl PanController {
    #[must_use]
    pub fn new(instance: impl Into<String>) -> Self {
        Self { instance: instance.into(), state: PanState::Idle }
    }

    #[must_use]
    pub fn instance(&self) -> &str {
        &self.instance
    }

    #[must_use]
    pub fn state(&self) -> PanState {
        self.state
    }

    #[must_use]
    pub fn is_panning(&self) -> bool {
        matches!(self.state, PanState::Panning { .. })
    }

    /// Begin panning on a primary-button press. Other buttons are ignored.
    ///
    /// Returns `true` if a pan gesture started.
    pub fn pointer_down(&mut self, store: &mut ViewportStore, screen: Point, button: Button) -> bool {
        if button != Button::Primary {
            return false;
        }
        self.state = PanState::Panning { last_screen: screen };
        store.set_dragging(&self.instance, true);
        debug!(instance = %self.instance, x = screen.x, y = screen.y, "pan: start");
        true
    }

    /// Translate the viewport by the pointer delta since the previous event.
    ///
    /// Returns `true` if the viewport moved.
    pub fn pointer_move(&mut self, store: &mut ViewportStore, screen: Point) -> bool {
        let PanState::Panning { last_screen } = self.state else {
            return false;
        };
        let dx = screen.x - last_screen.x;
        let dy = screen.y - last_screen.y;
        self.state = PanState::Panning { last_screen: screen };
        store.move_offset(&self.instance, dx, dy);
        true
    }

    /// End the gesture on pointer release.
    ///
    /// Returns `true` if a pan was in progress.
    pub fn pointer_up(&mut self, store: &mut ViewportStore) -> bool {
        self.finish(store)
    }

    /// End the gesture when the pointer leaves the surface.
    ///
    /// Returns `true` if a pan was in progress.
    pub fn pointer_leave(&mut self, store: &mut ViewportStore) -> bool {
        self.finish(store)
    }

    fn finish(&mut self, store: &mut ViewportStore) -> bool {
        if !self.is_panning() {
            return false;
        }
        self.state = PanState::Idle;
        store.set_dragging(&self.instance, false);
        debug!(instance = %self.instance, "pan: end");
        true
    }
}

/// Wheel handler that performs one anchored zoom step per event.
#[derive(Debug, Clone)]
pub struct ZoomController {
    instance: String,
}

impl ZoomController {
    #[must_use]
    pub fn new(instance: impl Into<String>) -> Self {
        Self { instance: instance.into() }
    }

    #[must_use]
    pub fn instance(&self) -> &str {
        &self.instance
    }

    /// Zoom about the pointer. `client` is in page coordinates; `rect` is the
    /// surface's bounding box in the same space.
    ///
    /// The host must suppress the native scroll for every wheel event it
    /// forwards here. Returns the viewport after the step.
    pub fn wheel(&self, store: &mut ViewportStore, client: Point, rect: SurfaceRect, delta: WheelDelta) -> Viewport {
        let local = rect.to_local(client);
        store.zoom_at(&self.instance, local.x, local.y, delta.dy);
        store.instance(&self.instance)
    }
}
