#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::camera::Point;
use crate::curve;
use crate::graph::{GraphModel, Note, NoteId};

/// Which side of a note a connection handle sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// Which part of a note was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    Body,
    /// A connection handle at the vertical center of the left or right edge.
    Handle(Side),
    /// The resize grip at the bottom-right corner.
    ResizeGrip,
}

/// Result of a hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub note_id: NoteId,
    pub part: HitPart,
}

/// Canvas position of a connection handle.
#[must_use]
pub fn handle_point(note: &Note, side: Side) -> Point {
    match side {
        Side::Left => curve::inlet(note),
        Side::Right => curve::outlet(note),
    }
}

/// Find the note part under `canvas_pt`, topmost note first.
///
/// `radius` is the handle/grip hit radius in canvas units (the screen radius
/// divided by the current scale). Handles win over the grip, and the grip over
/// the body, so a handle that overhangs a neighbouring note stays reachable.
#[must_use]
pub fn hit_test(canvas_pt: Point, graph: &GraphModel, radius: f64) -> Option<Hit> {
    let r2 = radius * radius;
    graph.notes().rev().find_map(|note| {
        let part = hit_note(note, canvas_pt, r2)?;
        Some(Hit { note_id: note.id, part })
    })
}

fn hit_note(note: &Note, p: Point, r2: f64) -> Option<HitPart> {
    for side in [Side::Left, Side::Right] {
        if handle_point(note, side).dist_sq(p) <= r2 {
            return Some(HitPart::Handle(side));
        }
    }
    let grip = Point::new(note.x + note.width, note.y + note.height);
    if grip.dist_sq(p) <= r2 {
        return Some(HitPart::ResizeGrip);
    }
    note.contains(p).then_some(HitPart::Body)
}

/// The connection handle under `canvas_pt`, ignoring bodies and grips.
///
/// Used to resolve the drop target of a connect gesture.
#[must_use]
pub fn handle_at(canvas_pt: Point, graph: &GraphModel, radius: f64) -> Option<(NoteId, Side)> {
    match hit_test(canvas_pt, graph, radius)? {
        Hit { note_id, part: HitPart::Handle(side) } => Some((note_id, side)),
        _ => None,
    }
}
