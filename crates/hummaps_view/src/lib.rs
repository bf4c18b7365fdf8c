//! Pan/zoom viewport controller for scanned map pages.
//!
//! Platform independent: the controller consumes input events and load
//! results and answers with [`Effect`]s for the shell to carry out.

pub mod config;
pub mod constants;
pub mod controller;
pub mod error;
pub mod event;
pub mod geometry;
pub mod gesture;
pub mod image;
pub mod kinetic;
pub mod loader;
pub mod render;
pub mod scale;
pub mod transform;
pub mod viewport;

pub use config::ViewerConfig;
pub use controller::{Effect, ViewerController};
pub use error::{Result, ViewError};
pub use event::{InputEvent, Intent, Key, PointerId};
pub use geometry::{Point, Size, ViewportSize};
pub use gesture::{GestureAdapter, GestureSession};
pub use image::{ImageMetadata, ImageSource};
pub use kinetic::{AnimationToken, KineticAnimator, KineticStep};
pub use loader::{Completion, IndicatorChange, LoadTicket, LoaderGate};
pub use render::{Frame, Surface};
pub use transform::Transform;
pub use viewport::{Viewport, ViewportState};
