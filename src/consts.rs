//! Shared numeric constants for the canvas crate.

// ── Viewport ────────────────────────────────────────────────────

/// Fractional scale change applied per wheel tick.
pub const ZOOM_STEP: f64 = 0.07;

/// Smallest scale reachable through an anchored zoom.
pub const MIN_SCALE: f64 = 0.1;

/// Largest scale reachable through an anchored zoom.
pub const MAX_SCALE: f64 = 5.0;

// ── Connections ─────────────────────────────────────────────────

/// Vertical pull of the inner control points of a connection curve, in canvas units.
pub const CURVE_INTENSITY: f64 = 50.0;

// ── Hit-testing ─────────────────────────────────────────────────

/// Screen-space radius in pixels of a note's connection handles and resize grip.
pub const HANDLE_RADIUS_PX: f64 = 6.0;

// ── Notes ───────────────────────────────────────────────────────

/// Width of a note created from the context menu.
pub const DEFAULT_NOTE_WIDTH: f64 = 200.0;

/// Height of a note created from the context menu.
pub const DEFAULT_NOTE_HEIGHT: f64 = 100.0;

/// Smallest width a resize gesture may leave a note with.
pub const MIN_NOTE_WIDTH: f64 = 50.0;

/// Smallest height a resize gesture may leave a note with.
pub const MIN_NOTE_HEIGHT: f64 = 30.0;

/// Placeholder content for freshly created notes.
pub const DEFAULT_NOTE_CONTENT: &str = "New note...";

/// Colours a new note is drawn from.
pub const NOTE_PALETTE: [&str; 6] = ["#ffeb3b", "#90caf9", "#a5d6a7", "#f48fb1", "#ce93d8", "#80deea"];
