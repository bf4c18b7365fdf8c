//! Fit scale and offset clamping.
//!
//! Offsets are the position of the image's top-left corner relative to the
//! viewport's top-left corner, in viewport pixels. Clamped offsets are whole
//! pixels so the canvas composition stays crisp.

use crate::geometry::{Point, Size};

/// How an axis is aligned when the scaled image is smaller than the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    /// Flush with the top/left edge
    Start,
    /// Centered in the free space
    Center,
}

/// Horizontal axis is centered, vertical axis is top aligned.
pub const HORIZONTAL_ALIGNMENT: Alignment = Alignment::Center;
pub const VERTICAL_ALIGNMENT: Alignment = Alignment::Start;

/// Scale at which the whole image fits inside the viewport.
///
/// Returns `None` if either size is empty; callers treat that as "not ready".
pub fn min_scale(viewport: Size, image: Size) -> Option<f64> {
    if viewport.is_empty() || image.is_empty() {
        return None;
    }
    Some((viewport.width / image.width).min(viewport.height / image.height))
}

/// Clamp a requested scale to the fit scale.
///
/// Zero (the reset request), negative and non-finite values resolve to
/// `min_scale`.
pub fn clamp_scale(requested: f64, min_scale: f64) -> f64 {
    if !requested.is_finite() || requested <= 0.0 {
        return min_scale;
    }
    requested.max(min_scale)
}

/// Clamp a requested scale into `[min_scale, max(max_scale, min_scale)]`.
pub fn clamp_scale_bounded(requested: f64, min_scale: f64, max_scale: f64) -> f64 {
    clamp_scale(requested, min_scale).min(max_scale.max(min_scale))
}

/// Clamp one axis of an offset.
///
/// If the scaled image fits, it is placed per `alignment`. Otherwise the
/// offset stays within `[viewport - scaled, 0]`, rounded inward so neither
/// edge leaves a gap.
pub fn clamp_axis(offset: f64, viewport_extent: f64, scaled_extent: f64, alignment: Alignment) -> f64 {
    let free = viewport_extent - scaled_extent;
    if free >= 0.0 {
        return match alignment {
            Alignment::Start => 0.0,
            Alignment::Center => (free / 2.0).round(),
        };
    }

    let lower = free.ceil();
    let offset = if offset.is_finite() { offset.round() } else { 0.0 };
    offset.clamp(lower, 0.0)
}

/// Clamp an offset on both axes for the given scale.
pub fn clamp_offset(offset: Point, scale: f64, viewport: Size, image: Size) -> Point {
    let scaled = image.scaled(scale);
    Point::new(
        clamp_axis(offset.x, viewport.width, scaled.width, HORIZONTAL_ALIGNMENT),
        clamp_axis(offset.y, viewport.height, scaled.height, VERTICAL_ALIGNMENT),
    )
}

/// True if the scaled image is larger than the viewport on some axis.
pub fn exceeds_viewport(scale: f64, viewport: Size, image: Size) -> bool {
    let scaled = image.scaled(scale);
    scaled.width > viewport.width || scaled.height > viewport.height
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn viewport() -> Size {
        Size::new(800.0, 600.0)
    }

    fn image() -> Size {
        Size::new(4000.0, 3000.0)
    }

    #[test]
    fn test_min_scale_fits_both_axes() {
        assert!((min_scale(viewport(), image()).unwrap() - 0.2).abs() < EPSILON);

        // Tall page: height limits
        let tall = Size::new(1000.0, 6000.0);
        assert!((min_scale(viewport(), tall).unwrap() - 0.1).abs() < EPSILON);
    }

    #[test]
    fn test_min_scale_degenerate() {
        assert_eq!(min_scale(Size::new(0.0, 600.0), image()), None);
        assert_eq!(min_scale(viewport(), Size::new(4000.0, 0.0)), None);
    }

    #[test]
    fn test_clamp_scale_reset_sentinel() {
        assert_eq!(clamp_scale(0.0, 0.2), 0.2);
        assert_eq!(clamp_scale(-1.0, 0.2), 0.2);
        assert_eq!(clamp_scale(f64::NAN, 0.2), 0.2);
        assert_eq!(clamp_scale(0.1, 0.2), 0.2);
        assert_eq!(clamp_scale(0.5, 0.2), 0.5);
    }

    #[test]
    fn test_clamp_scale_bounded() {
        assert_eq!(clamp_scale_bounded(20.0, 0.2, 8.0), 8.0);
        // Tiny image: fit scale above max scale wins
        assert_eq!(clamp_scale_bounded(20.0, 12.0, 8.0), 12.0);
    }

    #[test]
    fn test_fit_axis_alignment() {
        // Wide viewport, image fits with horizontal slack
        let offset = clamp_offset(Point::new(-50.0, 40.0), 0.2, Size::new(1000.0, 600.0), image());
        assert_eq!(offset, Point::new(100.0, 0.0));
    }

    #[test]
    fn test_oversized_axis_clamps_to_edges() {
        let scale = 0.4; // 1600x1200 in an 800x600 viewport
        assert_eq!(
            clamp_offset(Point::new(20.0, 30.0), scale, viewport(), image()),
            Point::new(0.0, 0.0)
        );
        assert_eq!(
            clamp_offset(Point::new(-5000.0, -5000.0), scale, viewport(), image()),
            Point::new(-800.0, -600.0)
        );
        assert_eq!(
            clamp_offset(Point::new(-400.4, -299.6), scale, viewport(), image()),
            Point::new(-400.0, -300.0)
        );
    }

    #[test]
    fn test_fractional_bound_leaves_no_gap() {
        // scaled width 1000.6 -> lower bound ceil(-200.6) = -200
        let x = clamp_axis(-500.0, 800.0, 1000.6, Alignment::Center);
        assert_eq!(x, -200.0);
        assert!(x + 1000.6 >= 800.0);
    }

    #[test]
    fn test_clamp_offset_idempotent() {
        let cases = [
            (Point::new(-123.7, 55.2), 0.37),
            (Point::new(9999.0, -9999.0), 0.9),
            (Point::new(-1.5, -0.5), 0.2),
            (Point::new(f64::NAN, 3.0), 1.3),
        ];
        for (offset, scale) in cases {
            let once = clamp_offset(offset, scale, viewport(), image());
            let twice = clamp_offset(once, scale, viewport(), image());
            assert_eq!(once, twice, "offset {offset:?} scale {scale}");
        }
    }

    #[test]
    fn test_exceeds_viewport() {
        assert!(!exceeds_viewport(0.2, viewport(), image()));
        assert!(exceeds_viewport(0.21, viewport(), image()));
    }
}
