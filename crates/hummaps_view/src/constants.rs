//! Centralized constants for hummaps_view
//!
//! Defaults for every tunable of the viewport controller. [`crate::ViewerConfig`]
//! starts from these values.

// =============================================================================
// Zoom
// =============================================================================

/// Factor applied per wheel notch or `+`/`-` key press
pub const ZOOM_STEP: f64 = 1.35;

/// Upper bound for the zoom scale (1.0 = one image pixel per screen pixel)
pub const MAX_SCALE: f64 = 8.0;

// =============================================================================
// Gestures
// =============================================================================

/// Pinch ratio deviation from 1.0 before a two-finger gesture starts zooming
pub const PINCH_ZOOM_THRESHOLD: f64 = 0.05;

/// Vertical centroid travel (px) that marks a two-finger gesture as a scroll
pub const DOUBLE_SCROLL_THRESHOLD: f64 = 10.0;

/// Release velocity (px/ms) above which a pan continues kinetically
pub const FLING_VELOCITY_THRESHOLD: f64 = 0.1;

/// Window of pointer samples used to estimate the release velocity (ms)
pub const VELOCITY_WINDOW_MS: u64 = 100;

// =============================================================================
// Kinetic pan
// =============================================================================

/// Distance travelled per unit of release velocity (px per px/ms)
pub const KINETIC_AMPLITUDE: f64 = 250.0;

/// Time constant of the exponential ease-out (ms)
pub const KINETIC_TIME_CONSTANT_MS: u64 = 125;

/// Remaining distance (px) below which the animation stops
pub const KINETIC_STOP_DISTANCE: f64 = 4.0;

// =============================================================================
// Loading
// =============================================================================

/// Delay before the loading indicator is shown (ms)
pub const LOADER_DELAY_MS: u64 = 750;
