//! Input model: mouse buttons, keys, wheel deltas, and the surface gesture state.
//!
//! `InputState` is the gesture being tracked by the surface engine between
//! pointer-down and pointer-up. Panning itself is tracked by
//! [`crate::gesture::PanController`]; the engine only records that the
//! controller owns the current gesture.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::camera::Point;
use crate::graph::NoteId;

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

impl Button {
    /// Map a DOM `MouseEvent.button` code. Unknown codes yield `None`.
    #[must_use]
    pub fn from_dom(code: i16) -> Option<Self> {
        match code {
            0 => Some(Self::Primary),
            1 => Some(Self::Middle),
            2 => Some(Self::Secondary),
            _ => None,
        }
    }
}

/// A keyboard key.
///
/// The inner string holds the key name as reported by the browser (e.g. `"Delete"`, `"Escape"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        self.0 == name
    }
}

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy)]
pub struct WheelDelta {
    /// Horizontal scroll amount in pixels.
    pub dx: f64,
    /// Vertical scroll amount in pixels (positive = down). Only the sign is used.
    pub dy: f64,
}

/// Internal state for the surface gesture state machine.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// The pan controller owns the gesture.
    Panning,
    /// The user is moving a note.
    DraggingNote {
        /// Id of the note being dragged.
        id: NoteId,
        /// Canvas-space offset from the note's top-left corner to the grab point.
        grab: Point,
    },
    /// The user is resizing a note from its bottom-right grip.
    ResizingNote {
        /// Id of the note being resized.
        id: NoteId,
        /// Canvas-space pointer position at the start of the resize.
        start_canvas: Point,
        /// Note width at the start of the resize.
        orig_w: f64,
        /// Note height at the start of the resize.
        orig_h: f64,
    },
    /// The user is dragging a new connection out of a note's handle.
    Connecting {
        /// Id of the note the connection starts from.
        from: NoteId,
    },
}
