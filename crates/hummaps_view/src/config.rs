//! Tunables for the viewport controller.

use serde::{Deserialize, Serialize};
use web_time::Duration;

use crate::constants::{
    DOUBLE_SCROLL_THRESHOLD, FLING_VELOCITY_THRESHOLD, KINETIC_AMPLITUDE, KINETIC_STOP_DISTANCE,
    KINETIC_TIME_CONSTANT_MS, LOADER_DELAY_MS, MAX_SCALE, PINCH_ZOOM_THRESHOLD, VELOCITY_WINDOW_MS,
    ZOOM_STEP,
};
use crate::error::{Result, ViewError};

/// Viewer settings. Missing fields fall back to the defaults in
/// [`crate::constants`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Zoom factor per wheel notch or key press
    pub zoom_step: f64,
    /// Largest allowed scale
    pub max_scale: f64,
    /// Pinch ratio deviation before zooming starts
    pub pinch_zoom_threshold: f64,
    /// Vertical centroid travel marking a two-finger scroll (px)
    pub double_scroll_threshold: f64,
    /// Release velocity that starts a kinetic pan (px/ms)
    pub fling_velocity_threshold: f64,
    /// Sample window for release velocity (ms)
    pub velocity_window_ms: u64,
    /// Kinetic travel per unit velocity
    pub kinetic_amplitude: f64,
    /// Kinetic ease-out time constant (ms)
    pub kinetic_time_constant_ms: u64,
    /// Remaining distance that ends a kinetic pan (px)
    pub kinetic_stop_distance: f64,
    /// Delay before the loading indicator appears (ms)
    pub loader_delay_ms: u64,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            zoom_step: ZOOM_STEP,
            max_scale: MAX_SCALE,
            pinch_zoom_threshold: PINCH_ZOOM_THRESHOLD,
            double_scroll_threshold: DOUBLE_SCROLL_THRESHOLD,
            fling_velocity_threshold: FLING_VELOCITY_THRESHOLD,
            velocity_window_ms: VELOCITY_WINDOW_MS,
            kinetic_amplitude: KINETIC_AMPLITUDE,
            kinetic_time_constant_ms: KINETIC_TIME_CONSTANT_MS,
            kinetic_stop_distance: KINETIC_STOP_DISTANCE,
            loader_delay_ms: LOADER_DELAY_MS,
        }
    }
}

impl ViewerConfig {
    /// Check every setting is in range.
    pub fn validate(&self) -> Result<()> {
        fn positive(name: &'static str, value: f64) -> Result<()> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(ViewError::InvalidConfig {
                    name,
                    reason: format!("must be a positive number, got {value}"),
                })
            }
        }

        if !(self.zoom_step.is_finite() && self.zoom_step > 1.0) {
            return Err(ViewError::InvalidConfig {
                name: "zoom_step",
                reason: format!("must be greater than 1, got {}", self.zoom_step),
            });
        }
        positive("max_scale", self.max_scale)?;
        positive("pinch_zoom_threshold", self.pinch_zoom_threshold)?;
        positive("double_scroll_threshold", self.double_scroll_threshold)?;
        positive("fling_velocity_threshold", self.fling_velocity_threshold)?;
        positive("kinetic_amplitude", self.kinetic_amplitude)?;
        positive("kinetic_stop_distance", self.kinetic_stop_distance)?;

        if self.kinetic_time_constant_ms == 0 {
            return Err(ViewError::InvalidConfig {
                name: "kinetic_time_constant_ms",
                reason: "must be at least 1 ms".to_string(),
            });
        }
        if self.velocity_window_ms == 0 {
            return Err(ViewError::InvalidConfig {
                name: "velocity_window_ms",
                reason: "must be at least 1 ms".to_string(),
            });
        }
        Ok(())
    }

    pub fn kinetic_time_constant(&self) -> Duration {
        Duration::from_millis(self.kinetic_time_constant_ms)
    }

    pub fn velocity_window(&self) -> Duration {
        Duration::from_millis(self.velocity_window_ms)
    }

    pub fn loader_delay(&self) -> Duration {
        Duration::from_millis(self.loader_delay_ms)
    }
}
