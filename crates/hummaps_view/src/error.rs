//! Viewport error type.

use thiserror::Error;

/// Errors raised by the viewport controller.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ViewError {
    /// The display region has no usable size (e.g. a hidden container)
    #[error("Viewport has no usable size ({width}x{height})")]
    DegenerateViewport { width: f64, height: f64 },

    /// The image has no natural size, usually because it is not decoded yet
    #[error("Image {url} has no natural size")]
    ImageNotLoaded { url: String },

    /// A viewer setting is out of range
    #[error("Invalid viewer setting '{name}': {reason}")]
    InvalidConfig { name: &'static str, reason: String },
}

pub type Result<T> = std::result::Result<T, ViewError>;
