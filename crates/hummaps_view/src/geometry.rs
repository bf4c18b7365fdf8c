//! Points and sizes in viewport pixels.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

/// A 2D position or displacement.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a new point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The origin.
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0)
    }

    /// Euclidean distance to another point.
    pub fn distance(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Point halfway between `self` and `other`.
    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    /// Round both components to whole pixels.
    pub fn round(self) -> Point {
        Point::new(self.x.round(), self.y.round())
    }

    /// Larger of the two absolute components.
    pub fn max_abs(self) -> f64 {
        self.x.abs().max(self.y.abs())
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

/// Width and height in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

/// Size of the display region. Recomputed on container resize.
pub type ViewportSize = Size;

impl Size {
    /// Create a new size.
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// True when either extent is zero, negative or not finite.
    ///
    /// A hidden container reports an empty size; nothing may be computed
    /// against it.
    pub fn is_empty(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0)
    }

    /// Center point of a region of this size anchored at the origin.
    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    /// Size multiplied by a scale factor.
    pub fn scaled(&self, scale: f64) -> Size {
        Size::new(self.width * scale, self.height * scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_arithmetic() {
        let a = Point::new(3.0, 4.0);
        let b = Point::new(1.0, 1.0);

        assert_eq!(a + b, Point::new(4.0, 5.0));
        assert_eq!(a - b, Point::new(2.0, 3.0));
        assert_eq!(a * 2.0, Point::new(6.0, 8.0));
        assert_eq!(Point::zero().distance(a), 5.0);
        assert_eq!(a.midpoint(b), Point::new(2.0, 2.5));
    }

    #[test]
    fn test_max_abs() {
        assert_eq!(Point::new(-0.4, 0.2).max_abs(), 0.4);
    }

    #[test]
    fn test_empty_sizes() {
        assert!(Size::new(0.0, 600.0).is_empty());
        assert!(Size::new(800.0, -1.0).is_empty());
        assert!(Size::new(f64::NAN, 600.0).is_empty());
        assert!(!Size::new(800.0, 600.0).is_empty());
    }
}
