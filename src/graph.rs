//! Graph annotation model: notes, the connections between them, and the
//! transient selection / editing / connect-gesture state.
//!
//! All geometry is in canvas space. Connections never dangle: deleting a note
//! removes every connection touching it in the same call, and moving or
//! resizing a note recomputes the curves of exactly the connections incident
//! to it before the call returns. An incidence index (`NoteId` to the set of
//! connection ids) keeps that recomputation proportional to the note's degree,
//! and a pair index enforces one connection per unordered pair of notes.

#[cfg(test)]
#[path = "graph_test.rs"]
mod graph_test;

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::camera::Point;
use crate::config::CanvasConfig;
use crate::consts::CURVE_INTENSITY;
use crate::curve::{self, CurvePoints};

/// Unique identifier for a note.
pub type NoteId = Uuid;

/// Unique identifier for a connection.
pub type ConnectionId = Uuid;

/// A positioned, sized, content-bearing annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Generated at creation; never changes.
    pub id: NoteId,
    /// Left edge in canvas coordinates.
    pub x: f64,
    /// Top edge in canvas coordinates.
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Free text shown inside the note.
    pub content: String,
    /// CSS colour string.
    pub color: String,
}

impl Note {
    /// Whether the canvas point lies inside the note's rectangle (edges inclusive).
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }
}

/// Everything needed to create a note except its id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewNote {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub content: String,
    pub color: String,
}

impl NewNote {
    fn into_note(self, id: NoteId) -> Note {
        Note {
            id,
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
            content: self.content,
            color: self.color,
        }
    }
}

/// Sparse update for a note. Only present fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl NotePatch {
    /// Patch that moves a note's top-left corner.
    #[must_use]
    pub fn position(x: f64, y: f64) -> Self {
        Self { x: Some(x), y: Some(y), ..Self::default() }
    }

    /// Patch that resizes a note.
    #[must_use]
    pub fn size(width: f64, height: f64) -> Self {
        Self { width: Some(width), height: Some(height), ..Self::default() }
    }

    /// Patch that replaces a note's text.
    #[must_use]
    pub fn content(content: impl Into<String>) -> Self {
        Self { content: Some(content.into()), ..Self::default() }
    }

    fn apply(&self, note: &mut Note) {
        if let Some(x) = self.x {
            note.x = x;
        }
        if let Some(y) = self.y {
            note.y = y;
        }
        if let Some(w) = self.width {
            note.width = w;
        }
        if let Some(h) = self.height {
            note.height = h;
        }
        if let Some(ref content) = self.content {
            note.content.clone_from(content);
        }
        if let Some(ref color) = self.color {
            note.color.clone_from(color);
        }
    }
}

/// A directed link between two distinct notes with its derived curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub id: ConnectionId,
    pub from_note_id: NoteId,
    pub to_note_id: NoteId,
    pub points: CurvePoints,
}

impl Connection {
    /// Whether `note` is either endpoint.
    #[must_use]
    pub fn touches(&self, note: NoteId) -> bool {
        self.from_note_id == note || self.to_note_id == note
    }
}

/// An in-progress drag from a note's connection handle to the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TempConnection {
    pub from_note_id: NoteId,
    /// Cursor position in canvas coordinates.
    pub x: f64,
    pub y: f64,
}

/// Notes and connections in draw order, for handing the graph to a host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub notes: Vec<Note>,
    pub connections: Vec<Connection>,
}

/// Why a connection attempt produced no connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rejection {
    SelfLoop,
    MissingEndpoint,
    Duplicate,
}

/// Unordered pair key: at most one connection may exist per pair.
fn pair_key(a: NoteId, b: NoteId) -> (NoteId, NoteId) {
    if a <= b { (a, b) } else { (b, a) }
}

/// In-memory store of notes and connections.
#[derive(Debug)]
pub struct GraphModel {
    notes: HashMap<NoteId, Note>,
    note_order: Vec<NoteId>,
    connections: HashMap<ConnectionId, Connection>,
    connection_order: Vec<ConnectionId>,
    incidence: HashMap<NoteId, HashSet<ConnectionId>>,
    pairs: HashMap<(NoteId, NoteId), ConnectionId>,
    selected: Option<NoteId>,
    editing: Option<NoteId>,
    temp: Option<TempConnection>,
    curve_intensity: f64,
}

impl Default for GraphModel {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphModel {
    /// Create an empty model with the default curve intensity.
    #[must_use]
    pub fn new() -> Self {
        Self {
            notes: HashMap::new(),
            note_order: Vec::new(),
            connections: HashMap::new(),
            connection_order: Vec::new(),
            incidence: HashMap::new(),
            pairs: HashMap::new(),
            selected: None,
            editing: None,
            temp: None,
            curve_intensity: CURVE_INTENSITY,
        }
    }

    /// Create an empty model whose curves use `config.curve_intensity`.
    #[must_use]
    pub fn with_config(config: &CanvasConfig) -> Self {
        Self { curve_intensity: config.curve_intensity, ..Self::new() }
    }

    // --- Notes ---

    /// Append a note with a fresh id and make it both selected and editing.
    pub fn add_note(&mut self, new: NewNote) -> NoteId {
        let id = Uuid::new_v4();
        self.notes.insert(id, new.into_note(id));
        self.note_order.push(id);
        self.selected = Some(id);
        self.editing = Some(id);
        debug!(%id, "graph: note added");
        id
    }

    /// Merge `patch` into a note and recompute its incident connections.
    ///
    /// Returns `false` (and changes nothing) if the note doesn't exist.
    pub fn update_note(&mut self, id: NoteId, patch: &NotePatch) -> bool {
        let Some(note) = self.notes.get_mut(&id) else {
            return false;
        };
        patch.apply(note);

        let Some(edge_ids) = self.incidence.get(&id) else {
            return true;
        };
        for edge_id in edge_ids {
            let Some(conn) = self.connections.get_mut(edge_id) else {
                continue;
            };
            if let (Some(from), Some(to)) = (self.notes.get(&conn.from_note_id), self.notes.get(&conn.to_note_id)) {
                conn.points = curve::curve_with(from, to, self.curve_intensity);
            }
        }
        true
    }

    /// Remove a note and every connection touching it.
    ///
    /// Clears selection, editing and any connect gesture that referenced the
    /// note. Returns the removed note.
    pub fn delete_note(&mut self, id: NoteId) -> Option<Note> {
        let note = self.notes.remove(&id)?;
        self.note_order.retain(|n| *n != id);

        let incident = self.incidence.remove(&id).unwrap_or_default();
        for edge_id in &incident {
            self.detach_connection(*edge_id);
        }

        if self.selected == Some(id) {
            self.selected = None;
        }
        if self.editing == Some(id) {
            self.editing = None;
        }
        if self.temp.is_some_and(|t| t.from_note_id == id) {
            self.temp = None;
        }
        debug!(%id, cascaded = incident.len(), "graph: note deleted");
        Some(note)
    }

    /// Look up a note by id.
    #[must_use]
    pub fn note(&self, id: NoteId) -> Option<&Note> {
        self.notes.get(&id)
    }

    /// All notes in insertion (draw) order.
    pub fn notes(&self) -> impl DoubleEndedIterator<Item = &Note> {
        self.note_order.iter().filter_map(|id| self.notes.get(id))
    }

    #[must_use]
    pub fn note_count(&self) -> usize {
        self.notes.len()
    }

    // --- Selection / editing ---

    /// Select a note (or nothing) and stop editing.
    pub fn select_note(&mut self, id: Option<NoteId>) {
        self.selected = id;
        self.editing = None;
    }

    pub fn start_editing(&mut self, id: NoteId) {
        self.editing = Some(id);
    }

    pub fn stop_editing(&mut self) {
        self.editing = None;
    }

    #[must_use]
    pub fn selected(&self) -> Option<NoteId> {
        self.selected
    }

    #[must_use]
    pub fn editing(&self) -> Option<NoteId> {
        self.editing
    }

    // --- Connect gesture ---

    /// Open a temp connection from `from` at the canvas point `(x, y)`.
    pub fn start_connection(&mut self, from: NoteId, x: f64, y: f64) {
        self.temp = Some(TempConnection { from_note_id: from, x, y });
        debug!(%from, "graph: connection started");
    }

    /// Move the cursor end of the open temp connection. No-op if none is open.
    pub fn update_temp_connection(&mut self, x: f64, y: f64) {
        if let Some(temp) = self.temp.as_mut() {
            temp.x = x;
            temp.y = y;
        }
    }

    /// Resolve the open temp connection onto `to`.
    ///
    /// The temp connection is always cleared. A connection is created only if
    /// `to` differs from the origin, both notes exist, and no connection
    /// already joins the pair in either direction. Rejections are silent.
    pub fn complete_connection(&mut self, to: NoteId) -> Option<ConnectionId> {
        let temp = self.temp.take()?;
        let from = temp.from_note_id;

        match self.check_connection(from, to) {
            Ok(()) => Some(self.insert_connection(from, to)),
            Err(reason) => {
                debug!(%from, %to, ?reason, "graph: connection rejected");
                None
            }
        }
    }

    /// Drop the open temp connection, if any.
    pub fn cancel_connection(&mut self) {
        if self.temp.take().is_some() {
            debug!("graph: connection cancelled");
        }
    }

    #[must_use]
    pub fn temp_connection(&self) -> Option<TempConnection> {
        self.temp
    }

    /// Preview curve from the temp connection's source note to the cursor.
    #[must_use]
    pub fn temp_connection_curve(&self) -> Option<CurvePoints> {
        let temp = self.temp?;
        let from = self.notes.get(&temp.from_note_id)?;
        Some(curve::curve_to_point(from, Point::new(temp.x, temp.y), self.curve_intensity))
    }

    // --- Connections ---

    /// Remove a connection. Returns the removed connection, if it existed.
    pub fn delete_connection(&mut self, id: ConnectionId) -> Option<Connection> {
        let conn = self.detach_connection(id)?;
        debug!(%id, "graph: connection deleted");
        Some(conn)
    }

    /// Recompute the curve of every connection from its current endpoints.
    ///
    /// Moves already keep incident curves current; this is a recovery pass
    /// for hosts that edited geometry out of band.
    pub fn resync_connections(&mut self) {
        for conn in self.connections.values_mut() {
            if let (Some(from), Some(to)) = (self.notes.get(&conn.from_note_id), self.notes.get(&conn.to_note_id)) {
                conn.points = curve::curve_with(from, to, self.curve_intensity);
            }
        }
        debug!(count = self.connections.len(), "graph: connections resynced");
    }

    #[must_use]
    pub fn connection(&self, id: ConnectionId) -> Option<&Connection> {
        self.connections.get(&id)
    }

    /// All connections in creation (draw) order.
    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.connection_order.iter().filter_map(|id| self.connections.get(id))
    }

    /// Connections touching `note`, in no particular order.
    #[must_use]
    pub fn connections_of(&self, note: NoteId) -> Vec<&Connection> {
        self.incidence
            .get(&note)
            .map(|ids| ids.iter().filter_map(|id| self.connections.get(id)).collect())
            .unwrap_or_default()
    }

    /// The connection joining `a` and `b` in either direction, if any.
    #[must_use]
    pub fn connection_between(&self, a: NoteId, b: NoteId) -> Option<&Connection> {
        self.pairs.get(&pair_key(a, b)).and_then(|id| self.connections.get(id))
    }

    #[must_use]
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    // --- Whole graph ---

    /// Remove all notes and connections and reset transient state.
    pub fn clear(&mut self) {
        let notes = self.notes.len();
        let connections = self.connections.len();
        self.notes.clear();
        self.note_order.clear();
        self.connections.clear();
        self.connection_order.clear();
        self.incidence.clear();
        self.pairs.clear();
        self.selected = None;
        self.editing = None;
        self.temp = None;
        info!(notes, connections, "graph: cleared");
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Copy out notes and connections in draw order.
    #[must_use]
    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            notes: self.notes().cloned().collect(),
            connections: self.connections().cloned().collect(),
        }
    }

    /// Replace the whole graph with `snapshot`.
    ///
    /// Duplicate note ids keep the first occurrence. Connections that would
    /// loop, dangle, or duplicate a pair are dropped. Curves are recomputed
    /// and selection, editing and the connect gesture are reset.
    pub fn load_snapshot(&mut self, snapshot: GraphSnapshot) {
        self.clear();

        for note in snapshot.notes {
            let id = note.id;
            if self.notes.contains_key(&id) {
                warn!(%id, "graph: duplicate note in snapshot; skipped");
                continue;
            }
            self.notes.insert(id, note);
            self.note_order.push(id);
        }

        let mut dropped = 0usize;
        for conn in snapshot.connections {
            if self.connections.contains_key(&conn.id) {
                warn!(id = %conn.id, "graph: duplicate connection id in snapshot; skipped");
                dropped += 1;
                continue;
            }
            if let Err(reason) = self.check_connection(conn.from_note_id, conn.to_note_id) {
                warn!(id = %conn.id, ?reason, "graph: invalid connection in snapshot; skipped");
                dropped += 1;
                continue;
            }
            self.attach_connection(conn.id, conn.from_note_id, conn.to_note_id);
        }

        info!(notes = self.notes.len(), connections = self.connections.len(), dropped, "graph: snapshot loaded");
    }

    // --- Internals ---

    fn check_connection(&self, from: NoteId, to: NoteId) -> Result<(), Rejection> {
        if from == to {
            return Err(Rejection::SelfLoop);
        }
        if !self.notes.contains_key(&from) || !self.notes.contains_key(&to) {
            return Err(Rejection::MissingEndpoint);
        }
        if self.pairs.contains_key(&pair_key(from, to)) {
            return Err(Rejection::Duplicate);
        }
        Ok(())
    }

    fn insert_connection(&mut self, from: NoteId, to: NoteId) -> ConnectionId {
        let id = Uuid::new_v4();
        self.attach_connection(id, from, to);
        debug!(%id, %from, %to, "graph: connection created");
        id
    }

    /// Store a validated connection and index it. Both endpoints must exist.
    fn attach_connection(&mut self, id: ConnectionId, from: NoteId, to: NoteId) {
        let (Some(from_note), Some(to_note)) = (self.notes.get(&from), self.notes.get(&to)) else {
            return;
        };
        let points = curve::curve_with(from_note, to_note, self.curve_intensity);
        self.connections.insert(id, Connection { id, from_note_id: from, to_note_id: to, points });
        self.connection_order.push(id);
        self.pairs.insert(pair_key(from, to), id);
        self.incidence.entry(from).or_default().insert(id);
        self.incidence.entry(to).or_default().insert(id);
    }

    /// Remove a connection from storage, order and the pair index, and from the
    /// incidence set of whichever endpoint is still indexed.
    fn detach_connection(&mut self, id: ConnectionId) -> Option<Connection> {
        let conn = self.connections.remove(&id)?;
        self.connection_order.retain(|c| *c != id);
        self.pairs.remove(&pair_key(conn.from_note_id, conn.to_note_id));
        for end in [conn.from_note_id, conn.to_note_id] {
            if let Some(set) = self.incidence.get_mut(&end) {
                set.remove(&id);
            }
        }
        Some(conn)
    }
}
