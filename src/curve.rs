//! Connection geometry: the cubic Bézier control polygon between two notes.
//!
//! A connection leaves the right-center of its source note and enters the
//! left-center of its target. The inner control points share the horizontal
//! midpoint and are pulled up (near the source) and down (near the target),
//! giving the same S-shaped curve regardless of the notes' relative height.

#[cfg(test)]
#[path = "curve_test.rs"]
mod curve_test;

use serde::{Deserialize, Serialize};

use crate::camera::Point;
use crate::consts::CURVE_INTENSITY;
use crate::graph::Note;

/// Control polygon `[P0, P1, P2, P3]` of a cubic Bézier curve in canvas space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoints(pub [Point; 4]);

impl CurvePoints {
    #[must_use]
    pub fn start(&self) -> Point {
        self.0[0]
    }

    #[must_use]
    pub fn end(&self) -> Point {
        self.0[3]
    }

    /// SVG path data: `M x0 y0 C x1 y1 x2 y2 x3 y3`.
    #[must_use]
    pub fn to_svg_path(&self) -> String {
        let [p0, p1, p2, p3] = self.0;
        format!("M {} {} C {} {} {} {} {} {}", p0.x, p0.y, p1.x, p1.y, p2.x, p2.y, p3.x, p3.y)
    }
}

/// Point where connections leave a note (right-center).
#[must_use]
pub fn outlet(note: &Note) -> Point {
    Point::new(note.x + note.width, note.y + note.height / 2.0)
}

/// Point where connections enter a note (left-center).
#[must_use]
pub fn inlet(note: &Note) -> Point {
    Point::new(note.x, note.y + note.height / 2.0)
}

/// Curve from `from`'s outlet to `to`'s inlet with the default intensity.
#[must_use]
pub fn curve(from: &Note, to: &Note) -> CurvePoints {
    curve_with(from, to, CURVE_INTENSITY)
}

/// Curve from `from`'s outlet to `to`'s inlet, pulling the inner control
/// points by `intensity` canvas units.
#[must_use]
pub fn curve_with(from: &Note, to: &Note, intensity: f64) -> CurvePoints {
    between(outlet(from), inlet(to), intensity)
}

/// Curve from `from`'s outlet to a free cursor point, used to preview a
/// connection that is still being dragged.
#[must_use]
pub fn curve_to_point(from: &Note, cursor: Point, intensity: f64) -> CurvePoints {
    between(outlet(from), cursor, intensity)
}

fn between(start: Point, end: Point, intensity: f64) -> CurvePoints {
    let mid_x = (start.x + end.x) / 2.0;
    CurvePoints([
        start,
        Point::new(mid_x, start.y - intensity),
        Point::new(mid_x, end.y + intensity),
        end,
    ])
}
