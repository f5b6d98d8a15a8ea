//! Scene composition: a serializable description of one frame.
//!
//! The host renders notes as positioned elements inside a transformed layer
//! and connections as SVG paths beneath them. This module receives read-only
//! views of the graph and viewport and produces that description. It does
//! not mutate any state.

use serde::Serialize;

use crate::camera::Viewport;
use crate::graph::{ConnectionId, GraphModel, Note, NoteId};

#[cfg(test)]
#[path = "scene_test.rs"]
mod scene_test;

/// Layer transform applied to everything drawn in canvas space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transform {
    pub offset_x: f64,
    pub offset_y: f64,
    pub scale: f64,
    /// Whether a pan is in progress (the host shows a grabbing cursor).
    pub dragging: bool,
}

impl Transform {
    /// CSS transform string: translate first, then scale about the origin.
    #[must_use]
    pub fn to_css(&self) -> String {
        format!("translate({}px, {}px) scale({})", self.offset_x, self.offset_y, self.scale)
    }
}

/// A note plus its interaction flags.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteView {
    #[serde(flatten)]
    pub note: Note,
    pub selected: bool,
    pub editing: bool,
}

/// A connection reduced to what the SVG layer needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionView {
    pub id: ConnectionId,
    pub from_note_id: NoteId,
    pub to_note_id: NoteId,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    pub transform: Transform,
    /// Bottom first.
    pub notes: Vec<NoteView>,
    /// Creation order.
    pub connections: Vec<ConnectionView>,
    /// Dashed preview of an in-progress connect gesture.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temp_connection: Option<String>,
}

impl Scene {
    /// # Errors
    ///
    /// Returns `Err` if serialization fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Build the scene for one surface.
#[must_use]
pub fn compose(viewport: &Viewport, graph: &GraphModel) -> Scene {
    let transform = Transform {
        offset_x: viewport.offset.x,
        offset_y: viewport.offset.y,
        scale: viewport.scale,
        dragging: viewport.dragging,
    };

    let selected = graph.selected();
    let editing = graph.editing();
    let notes = graph
        .notes()
        .map(|note| NoteView {
            note: note.clone(),
            selected: selected == Some(note.id),
            editing: editing == Some(note.id),
        })
        .collect();

    let connections = graph
        .connections()
        .map(|conn| ConnectionView {
            id: conn.id,
            from_note_id: conn.from_note_id,
            to_note_id: conn.to_note_id,
            path: conn.points.to_svg_path(),
        })
        .collect();

    Scene {
        transform,
        notes,
        connections,
        temp_connection: graph.temp_connection_curve().map(|c| c.to_svg_path()),
    }
}
