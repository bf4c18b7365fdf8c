//! Drawing seam between the viewport and a display surface.

use crate::geometry::{Point, Size};

/// Something the current page can be composed onto.
///
/// The browser shell implements this for a 2D canvas context, the app crate
/// for an in-memory raster.
pub trait Surface {
    /// Decoded image type this surface can draw.
    type Image: ?Sized;

    /// Erase the whole viewport.
    fn clear(&mut self, viewport: Size);

    /// Draw `image` with its top-left corner at `offset`, scaled uniformly.
    fn draw_image(&mut self, image: &Self::Image, scale: f64, offset: Point);
}

/// Everything needed to draw one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub viewport: Size,
    pub scale: f64,
    pub offset: Point,
}

impl Frame {
    /// Draw the frame. Drawing the same frame twice yields the same picture
    /// since the surface is cleared first.
    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S, image: &S::Image) {
        surface.clear(self.viewport);
        surface.draw_image(image, self.scale, self.offset);
    }
}
