//! Canvas tuning parsed from environment variables.
//!
//! Every field has a default in [`crate::consts`]; the environment only
//! overrides. Parsing goes through a lookup function so callers (and tests)
//! can supply values without touching the process environment.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use crate::consts::{CURVE_INTENSITY, HANDLE_RADIUS_PX, MAX_SCALE, MIN_SCALE, ZOOM_STEP};

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("{var} is not a number: {value:?}")]
    NotANumber { var: &'static str, value: String },
    #[error("{var} must be finite and positive, got {value}")]
    NotPositive { var: &'static str, value: f64 },
    #[error("CANVAS_ZOOM_STEP must be below 1, got {0}")]
    ZoomStepTooLarge(f64),
    #[error("scale range is empty: min {min} >= max {max}")]
    EmptyScaleRange { min: f64, max: f64 },
}

/// Tunable parameters shared by the viewport store, the graph model and the
/// surface engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasConfig {
    /// Fractional scale change per wheel tick.
    pub zoom_step: f64,
    /// Lower clamp applied by anchored zoom.
    pub min_scale: f64,
    /// Upper clamp applied by anchored zoom.
    pub max_scale: f64,
    /// Vertical pull of a connection's inner control points.
    pub curve_intensity: f64,
    /// Screen-space radius of connection handles and the resize grip.
    pub handle_radius_px: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            zoom_step: ZOOM_STEP,
            min_scale: MIN_SCALE,
            max_scale: MAX_SCALE,
            curve_intensity: CURVE_INTENSITY,
            handle_radius_px: HANDLE_RADIUS_PX,
        }
    }
}

impl CanvasConfig {
    /// Build config from environment variables.
    ///
    /// Optional:
    /// - `CANVAS_ZOOM_STEP`: default 0.07
    /// - `CANVAS_MIN_SCALE`: default 0.1
    /// - `CANVAS_MAX_SCALE`: default 5
    /// - `CANVAS_CURVE_INTENSITY`: default 50
    /// - `CANVAS_HANDLE_RADIUS_PX`: default 6
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when an override is not a finite positive
    /// number or the resulting scale range is empty.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| match std::env::var(key) {
            Ok(value) => Some(value),
            Err(_) => None,
        })
    }

    /// Build config from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Same conditions as [`CanvasConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let cfg = Self {
            zoom_step: parse_positive(&lookup, "CANVAS_ZOOM_STEP", defaults.zoom_step)?,
            min_scale: parse_positive(&lookup, "CANVAS_MIN_SCALE", defaults.min_scale)?,
            max_scale: parse_positive(&lookup, "CANVAS_MAX_SCALE", defaults.max_scale)?,
            curve_intensity: parse_positive(&lookup, "CANVAS_CURVE_INTENSITY", defaults.curve_intensity)?,
            handle_radius_px: parse_positive(&lookup, "CANVAS_HANDLE_RADIUS_PX", defaults.handle_radius_px)?,
        };
        cfg.validate()?;
        tracing::info!(
            zoom_step = cfg.zoom_step,
            min_scale = cfg.min_scale,
            max_scale = cfg.max_scale,
            "canvas config loaded"
        );
        Ok(cfg)
    }

    /// Check cross-field constraints.
    ///
    /// # Errors
    ///
    /// Returns `ZoomStepTooLarge` when a zoom-out step would reach zero or
    /// below, and `EmptyScaleRange` when `min_scale >= max_scale`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.zoom_step >= 1.0 {
            return Err(ConfigError::ZoomStepTooLarge(self.zoom_step));
        }
        if self.min_scale >= self.max_scale {
            return Err(ConfigError::EmptyScaleRange { min: self.min_scale, max: self.max_scale });
        }
        Ok(())
    }

    /// Clamp a candidate scale into `[min_scale, max_scale]`.
    #[must_use]
    pub fn clamp_scale(&self, scale: f64) -> f64 {
        scale.clamp(self.min_scale, self.max_scale)
    }
}

fn parse_positive<F>(lookup: &F, var: &'static str, default: f64) -> Result<f64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(var) else {
        return Ok(default);
    };
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| ConfigError::NotANumber { var, value: raw.clone() })?;
    if !value.is_finite() || value <= 0.0 {
        return Err(ConfigError::NotPositive { var, value });
    }
    Ok(value)
}
