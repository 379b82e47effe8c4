//! Integer device-pixel geometry.
//!
//! Rectangles are half-open (`min` inclusive, `max` exclusive), the same
//! convention a pixel buffer uses. A rectangle with no area is *empty* and
//! acts as the identity element of [`Rect::union`].

use std::ops::{Add, Neg, Sub};

/// A point (or offset) in device pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Point {
    /// Horizontal coordinate, growing to the right.
    pub x: i32,
    /// Vertical coordinate, growing downwards.
    pub y: i32,
}

impl Point {
    /// The origin.
    pub const ZERO: Self = Self { x: 0, y: 0 };

    /// Create a point from its coordinates.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Point {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

/// An axis-aligned rectangle in device pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    /// Top-left corner (inclusive).
    pub min: Point,
    /// Bottom-right corner (exclusive).
    pub max: Point,
}

impl Rect {
    /// The empty rectangle at the origin.
    pub const EMPTY: Self = Self {
        min: Point::ZERO,
        max: Point::ZERO,
    };

    /// Create a rectangle from two corners, swapping coordinates as needed so
    /// that `min` is never below or right of `max`.
    #[must_use]
    pub fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self {
            min: Point::new(x0.min(x1), y0.min(y1)),
            max: Point::new(x0.max(x1), y0.max(y1)),
        }
    }

    /// A `width × height` rectangle anchored at the origin.
    #[must_use]
    pub fn from_size(width: i32, height: i32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Horizontal extent.
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.max.x - self.min.x
    }

    /// Vertical extent.
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.max.y - self.min.y
    }

    /// Whether the rectangle encloses no pixels.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.min.x >= self.max.x || self.min.y >= self.max.y
    }

    /// The rectangle moved by `offset`.
    #[must_use]
    pub fn translate(&self, offset: Point) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// The rectangle moved so that its `min` corner sits at the origin.
    #[must_use]
    pub fn normalized(&self) -> Self {
        self.translate(-self.min)
    }

    /// The smallest rectangle containing both `self` and `other`.
    ///
    /// Empty operands contribute nothing: the union of an empty rectangle
    /// with `r` is `r`.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        Self {
            min: Point::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Point::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_canonicalizes_corners() {
        let r = Rect::new(10, 20, 0, 5);
        assert_eq!(r.min, Point::new(0, 5));
        assert_eq!(r.max, Point::new(10, 20));
        assert_eq!(r.width(), 10);
        assert_eq!(r.height(), 15);
    }

    #[test]
    fn test_union_ignores_empty() {
        let a = Rect::new(-3, -12, 40, 4);
        assert_eq!(Rect::EMPTY.union(&a), a);
        assert_eq!(a.union(&Rect::EMPTY), a);
        assert_eq!(a.union(&Rect::new(5, 5, 5, 50)), a);
    }

    #[test]
    fn test_union_and_normalize() {
        let a = Rect::new(-3, -12, 40, 4);
        let b = Rect::new(50, -10, 90, 6);
        let u = a.union(&b);
        assert_eq!(u, Rect::new(-3, -12, 90, 6));
        assert_eq!(u.normalized(), Rect::new(0, 0, 93, 18));
    }
}
