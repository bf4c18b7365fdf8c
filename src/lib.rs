//! Hummaps - survey map viewer
//!
//! Browse the scanned pages of a map search result with pan, zoom, pinch and
//! kinetic scrolling. Runs in the browser (WASM) and as a native snapshot tool.

pub mod app;
pub mod config;
pub mod constants;
pub mod image_cache;
pub mod keybindings;
pub mod message;
pub mod navigation;
pub mod raster;

pub use app::{AppEffect, MapLabel, MapViewer};
pub use config::{AppConfig, ConfigError, LogLevel};
pub use message::Message;
pub use navigation::{MapEntry, NavOutcome, Navigator, ViewMode};
pub use raster::RasterSurface;

// WASM entry point
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::*;
