//! Viewport store: independent pan/zoom/drag state per canvas instance.
//!
//! Each navigable surface is identified by a string key. Records are created
//! lazily on the first mutation; reading a key that was never written yields
//! the default viewport without inserting anything. No operation touches a
//! record other than the one named by its key.

#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

use std::collections::HashMap;

use tracing::debug;

use crate::camera::{Point, Viewport};
use crate::config::CanvasConfig;

/// Keyed collection of [`Viewport`] records.
#[derive(Debug, Default)]
pub struct ViewportStore {
    instances: HashMap<String, Viewport>,
    config: CanvasConfig,
}

impl ViewportStore {
    /// Create an empty store with default zoom limits.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store using the zoom step and limits from `config`.
    #[must_use]
    pub fn with_config(config: CanvasConfig) -> Self {
        Self { instances: HashMap::new(), config }
    }

    #[must_use]
    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    fn entry(&mut self, id: &str) -> &mut Viewport {
        self.instances.entry(id.to_owned()).or_default()
    }

    /// Replace the translation of `id`.
    pub fn set_offset(&mut self, id: &str, offset: Point) {
        self.entry(id).offset = offset;
    }

    /// Translate `id` by a screen-space delta. The offset is unbounded.
    pub fn move_offset(&mut self, id: &str, dx: f64, dy: f64) {
        let vp = self.entry(id);
        vp.offset.x += dx;
        vp.offset.y += dy;
    }

    /// Replace the scale of `id` without clamping.
    pub fn set_scale(&mut self, id: &str, scale: f64) {
        self.entry(id).scale = scale;
    }

    /// Zoom one step about the surface-relative point `(mx, my)`.
    ///
    /// A negative `delta_y` zooms in, anything else zooms out. The new scale
    /// is clamped to the configured range and the offset is solved so the
    /// canvas point under the cursor stays at `(mx, my)`.
    pub fn zoom_at(&mut self, id: &str, mx: f64, my: f64, delta_y: f64) {
        let config = self.config;
        let vp = self.entry(id);

        let factor = if delta_y < 0.0 { 1.0 + config.zoom_step } else { 1.0 - config.zoom_step };
        let prev_scale = vp.scale;
        let next_scale = config.clamp_scale(prev_scale * factor);

        let anchor = vp.screen_to_canvas(Point::new(mx, my));
        vp.scale = next_scale;
        vp.offset = Point::new(mx - anchor.x * next_scale, my - anchor.y * next_scale);

        debug!(instance = id, prev_scale, next_scale, "viewport: zoom");
    }

    /// Set the pan-gesture flag of `id`. Does not move the offset.
    pub fn set_dragging(&mut self, id: &str, dragging: bool) {
        self.entry(id).dragging = dragging;
    }

    /// Restore `id` to the default viewport.
    pub fn reset(&mut self, id: &str) {
        *self.entry(id) = Viewport::default();
        debug!(instance = id, "viewport: reset");
    }

    /// Current state of `id`, or the default if it was never written.
    #[must_use]
    pub fn instance(&self, id: &str) -> Viewport {
        self.instances.get(id).copied().unwrap_or_default()
    }

    /// Convert a surface-relative screen point to canvas space for `id`.
    #[must_use]
    pub fn screen_to_canvas(&self, id: &str, screen_x: f64, screen_y: f64) -> Point {
        self.instance(id).screen_to_canvas(Point::new(screen_x, screen_y))
    }

    /// Convert a canvas point to surface-relative screen space for `id`.
    #[must_use]
    pub fn canvas_to_screen(&self, id: &str, canvas_x: f64, canvas_y: f64) -> Point {
        self.instance(id).canvas_to_screen(Point::new(canvas_x, canvas_y))
    }

    /// Whether `id` has been written at least once.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.instances.contains_key(id)
    }

    /// Number of materialized instances.
    #[must_use]
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}
