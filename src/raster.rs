//! Software rendering of the map frame.
//!
//! Composes the visible part of a page into an RGBA buffer with
//! nearest-neighbour sampling. Used by the snapshot binary and in tests.

use hummaps_view::{Point, Size, Surface};
use image::{Rgba, RgbaImage};

use crate::constants::BACKGROUND;

const BACKGROUND_PIXEL: Rgba<u8> = Rgba(BACKGROUND);

pub struct RasterSurface {
    canvas: RgbaImage,
}

impl RasterSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            canvas: RgbaImage::from_pixel(width, height, BACKGROUND_PIXEL),
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.canvas
    }

    pub fn into_image(self) -> RgbaImage {
        self.canvas
    }
}

impl Surface for RasterSurface {
    type Image = RgbaImage;

    fn clear(&mut self, viewport: Size) {
        let width = viewport.width.max(0.0).round() as u32;
        let height = viewport.height.max(0.0).round() as u32;
        if self.canvas.dimensions() == (width, height) {
            for pixel in self.canvas.pixels_mut() {
                *pixel = BACKGROUND_PIXEL;
            }
        } else {
            self.canvas = RgbaImage::from_pixel(width, height, BACKGROUND_PIXEL);
        }
    }

    fn draw_image(&mut self, image: &RgbaImage, scale: f64, offset: Point) {
        if scale <= 0.0 || !scale.is_finite() {
            return;
        }
        let (src_width, src_height) = image.dimensions();

        for (x, y, pixel) in self.canvas.enumerate_pixels_mut() {
            // Sample at the destination pixel center
            let sx = ((x as f64 + 0.5 - offset.x) / scale).floor();
            let sy = ((y as f64 + 0.5 - offset.y) / scale).floor();
            if sx < 0.0 || sy < 0.0 || sx >= src_width as f64 || sy >= src_height as f64 {
                continue;
            }
            *pixel = *image.get_pixel(sx as u32, sy as u32);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);

    /// Left half red, right half blue.
    fn split_page(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, _| if x < width / 2 { RED } else { BLUE })
    }

    #[test]
    fn test_scaled_draw() {
        let mut surface = RasterSurface::new(4, 2);
        surface.clear(Size::new(4.0, 2.0));
        surface.draw_image(&split_page(8, 4), 0.5, Point::zero());

        let out = surface.image();
        assert_eq!(*out.get_pixel(0, 0), RED);
        assert_eq!(*out.get_pixel(1, 1), RED);
        assert_eq!(*out.get_pixel(2, 0), BLUE);
        assert_eq!(*out.get_pixel(3, 1), BLUE);
    }

    #[test]
    fn test_offset_leaves_background() {
        let mut surface = RasterSurface::new(4, 2);
        surface.clear(Size::new(4.0, 2.0));
        surface.draw_image(&split_page(2, 2), 1.0, Point::new(1.0, 0.0));

        let out = surface.image();
        assert_eq!(*out.get_pixel(0, 0), BACKGROUND_PIXEL);
        assert_eq!(*out.get_pixel(1, 0), RED);
        assert_eq!(*out.get_pixel(2, 0), BLUE);
        assert_eq!(*out.get_pixel(3, 0), BACKGROUND_PIXEL);
    }

    #[test]
    fn test_clear_resizes() {
        let mut surface = RasterSurface::new(2, 2);
        surface.clear(Size::new(6.0, 3.0));
        assert_eq!(surface.image().dimensions(), (6, 3));
        assert_eq!(*surface.image().get_pixel(5, 2), BACKGROUND_PIXEL);
    }

    #[test]
    fn test_render_through_viewport_is_idempotent() {
        use hummaps_view::{ImageMetadata, ImageSource, Viewport};

        let page = split_page(40, 30);
        let mut viewport = Viewport::new(Size::new(20.0, 20.0), 8.0);
        viewport
            .set_image(ImageMetadata::new(ImageSource::new("/p.png", "p"), 40, 30).unwrap())
            .unwrap();

        let mut surface = RasterSurface::new(20, 20);
        assert!(viewport.render(&mut surface, &page));
        let first = surface.image().clone();
        assert!(viewport.render(&mut surface, &page));
        assert_eq!(surface.image(), &first);

        // Fits horizontally at 0.5, top aligned: the bottom rows stay background
        assert_eq!(*first.get_pixel(0, 0), RED);
        assert_eq!(*first.get_pixel(19, 0), BLUE);
        assert_eq!(*first.get_pixel(0, 19), BACKGROUND_PIXEL);
    }
}
