//! Zoom-about-a-point mathematics.
//!
//! Conversions between pointer, viewport and image pixel space under a given
//! scale and offset, kept free of any viewport state for testability.

use crate::geometry::Point;

/// Scale and offset that place the image in the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub scale: f64,
    pub offset: Point,
}

impl Transform {
    /// Create a new transform with the given scale and offset.
    pub fn new(scale: f64, offset: Point) -> Self {
        Self { scale, offset }
    }

    /// Image pixel under a pointer position.
    ///
    /// `viewport_origin` is the viewport's top-left corner in the pointer's
    /// coordinate space (page coordinates in the browser).
    pub fn to_image_space(&self, pointer: Point, viewport_origin: Point) -> Point {
        to_image_space(pointer, viewport_origin, self.offset, self.scale)
    }

    /// Viewport position of an image pixel.
    pub fn to_viewport_space(&self, image_pos: Point) -> Point {
        to_viewport_space(image_pos, self.offset, self.scale)
    }

    /// Rescale while keeping the image point under `origin` fixed.
    ///
    /// `origin` is in viewport coordinates.
    pub fn zoom_about(&self, new_scale: f64, origin: Point) -> Transform {
        Transform {
            scale: new_scale,
            offset: zoom_about(self.offset, self.scale, new_scale, origin),
        }
    }

    /// Apply a pan delta to the transform.
    pub fn pan_by(&self, dx: f64, dy: f64) -> Transform {
        Transform {
            scale: self.scale,
            offset: self.offset + Point::new(dx, dy),
        }
    }
}

/// `(pointer - viewport_origin - offset) / scale`
pub fn to_image_space(pointer: Point, viewport_origin: Point, offset: Point, scale: f64) -> Point {
    (pointer - viewport_origin - offset) * scale.recip()
}

/// `image_pos * scale + offset`
pub fn to_viewport_space(image_pos: Point, offset: Point, scale: f64) -> Point {
    image_pos * scale + offset
}

/// New offset after changing scale from `old_scale` to `new_scale` about `origin`.
///
/// `offset1 = (s1 / s0) * (offset0 - origin) + origin`
pub fn zoom_about(offset: Point, old_scale: f64, new_scale: f64, origin: Point) -> Point {
    (offset - origin) * (new_scale / old_scale) + origin
}
