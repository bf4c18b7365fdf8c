//! Zoom scale and pan offset of the page currently on screen.

use crate::error::{Result, ViewError};
use crate::geometry::{Point, Size};
use crate::image::ImageMetadata;
use crate::render::{Frame, Surface};
use crate::scale;
use crate::transform::{self, Transform};

/// Scale and offset of the active image.
///
/// `scale >= min_scale` always holds and `offset` is always clamped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportState {
    pub scale: f64,
    pub offset: Point,
    pub min_scale: f64,
}

impl ViewportState {
    /// True when the image is scaled beyond the fit scale.
    pub fn is_zoomed(&self) -> bool {
        self.scale > self.min_scale
    }

    pub fn transform(&self) -> Transform {
        Transform::new(self.scale, self.offset)
    }
}

/// Owns the [`ViewportState`] for one display region.
///
/// The state only exists while both a decoded image and a usable viewport
/// size are known; every operation is a no-op otherwise.
#[derive(Debug, Clone)]
pub struct Viewport {
    size: Size,
    image: Option<ImageMetadata>,
    state: Option<ViewportState>,
    max_scale: f64,
}

impl Viewport {
    /// Create an empty viewport of the given size.
    pub fn new(size: Size, max_scale: f64) -> Self {
        Self {
            size,
            image: None,
            state: None,
            max_scale,
        }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn image(&self) -> Option<&ImageMetadata> {
        self.image.as_ref()
    }

    pub fn state(&self) -> Option<&ViewportState> {
        self.state.as_ref()
    }

    /// True when there is something to draw.
    pub fn is_ready(&self) -> bool {
        self.state.is_some()
    }

    pub fn is_zoomed(&self) -> bool {
        self.state.is_some_and(|s| s.is_zoomed())
    }

    pub fn set_max_scale(&mut self, max_scale: f64) {
        self.max_scale = max_scale;
    }

    /// Show a new image at fit scale.
    ///
    /// The image is kept even when the viewport has no usable size; in that
    /// case `DegenerateViewport` is returned and the first valid
    /// [`Viewport::resize`] brings it on screen.
    pub fn set_image(&mut self, metadata: ImageMetadata) -> Result<()> {
        log::debug!(
            "Showing {} ({}x{})",
            metadata.source_url,
            metadata.natural_width,
            metadata.natural_height
        );
        self.image = Some(metadata);
        self.fit();

        if self.state.is_none() {
            return Err(ViewError::DegenerateViewport {
                width: self.size.width,
                height: self.size.height,
            });
        }
        Ok(())
    }

    /// Forget the current image (e.g. when the map list is shown).
    pub fn clear_image(&mut self) {
        self.image = None;
        self.state = None;
    }

    /// Apply a new container size and return to fit scale.
    ///
    /// Returns whether the viewport is ready afterwards.
    pub fn resize(&mut self, size: Size) -> bool {
        self.size = size;
        self.fit();
        self.is_ready()
    }

    fn fit(&mut self) {
        self.state = self.image.as_ref().and_then(|image| {
            let natural = image.natural_size();
            let min_scale = scale::min_scale(self.size, natural)?;
            Some(ViewportState {
                scale: min_scale,
                offset: scale::clamp_offset(Point::zero(), min_scale, self.size, natural),
                min_scale,
            })
        });
    }

    /// Move the image by a delta. Only effective while zoomed beyond fit.
    ///
    /// Returns whether the offset changed.
    pub fn pan(&mut self, dx: f64, dy: f64) -> bool {
        match self.state {
            Some(state) => self.pan_to(state.offset + Point::new(dx, dy)),
            None => false,
        }
    }

    /// Move the image to an absolute offset, clamped. Only effective while
    /// zoomed beyond fit.
    pub fn pan_to(&mut self, offset: Point) -> bool {
        let (Some(image), Some(state)) = (&self.image, self.state.as_mut()) else {
            return false;
        };
        if !state.is_zoomed() {
            return false;
        }

        let clamped = scale::clamp_offset(offset, state.scale, self.size, image.natural_size());
        if clamped == state.offset {
            return false;
        }
        state.offset = clamped;
        true
    }

    /// Zoom to `target`, keeping the image point under `origin` fixed.
    ///
    /// `origin` defaults to the viewport center. A target of 0 resets to the
    /// fit scale. Returns whether scale or offset changed.
    pub fn zoom(&mut self, target: f64, origin: Option<Point>) -> bool {
        let (Some(image), Some(state)) = (&self.image, self.state.as_mut()) else {
            return false;
        };
        if state.scale == state.min_scale && (target.is_nan() || target <= state.min_scale) {
            return false;
        }

        let new_scale = scale::clamp_scale_bounded(target, state.min_scale, self.max_scale);
        if new_scale == state.scale {
            return false;
        }

        let origin = origin.unwrap_or_else(|| self.size.center());
        let offset = transform::zoom_about(state.offset, state.scale, new_scale, origin);

        state.offset = scale::clamp_offset(offset, new_scale, self.size, image.natural_size());
        state.scale = new_scale;

        log::debug!(
            "Zoom to {:.3} at ({:.1}, {:.1}), offset ({}, {})",
            new_scale,
            origin.x,
            origin.y,
            state.offset.x,
            state.offset.y
        );
        true
    }

    /// Return to the fit scale.
    pub fn reset(&mut self) -> bool {
        self.zoom(0.0, None)
    }

    /// Snapshot of what should be on screen, if anything.
    pub fn frame(&self) -> Option<Frame> {
        self.state.map(|state| Frame {
            viewport: self.size,
            scale: state.scale,
            offset: state.offset,
        })
    }

    /// Draw the current frame. Returns false and draws nothing when not ready.
    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S, image: &S::Image) -> bool {
        match self.frame() {
            Some(frame) => {
                frame.draw(surface, image);
                true
            }
            None => false,
        }
    }
}
