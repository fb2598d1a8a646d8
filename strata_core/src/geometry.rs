// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Integer screen-space geometry.
//!
//! Node bounds and dirty rectangles live on the pixel grid, so the compositor
//! works with [`IntRect`] rather than floating-point rectangles. Conversions
//! to and from [`kurbo`] are provided for renderers that rasterize with it.

use core::fmt;

/// A point on the pixel grid.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct IntPoint {
    /// Horizontal coordinate.
    pub x: i32,
    /// Vertical coordinate.
    pub y: i32,
}

impl IntPoint {
    /// Creates a new point.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Snaps a floating-point position down onto the pixel grid.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "screen coordinates saturate at the i32 range"
    )]
    pub fn from_kurbo_floor(p: kurbo::Point) -> Self {
        let p = p.floor();
        Self {
            x: p.x as i32,
            y: p.y as i32,
        }
    }
}

impl fmt::Debug for IntPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// An axis-aligned rectangle on the pixel grid.
///
/// The minimum edges are inclusive and the maximum edges exclusive, so
/// `IntRect::new(0, 0, 10, 10)` covers exactly 100 pixels. A rectangle whose
/// maximum does not exceed its minimum on either axis is empty.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct IntRect {
    /// Left edge.
    pub x0: i32,
    /// Top edge.
    pub y0: i32,
    /// Right edge (exclusive).
    pub x1: i32,
    /// Bottom edge (exclusive).
    pub y1: i32,
}

impl IntRect {
    /// The empty rectangle at the origin.
    pub const ZERO: Self = Self::new(0, 0, 0, 0);

    /// Creates a rectangle from its edges.
    #[inline]
    #[must_use]
    pub const fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Creates a rectangle from an origin and a size.
    #[inline]
    #[must_use]
    pub const fn from_origin_size(origin: IntPoint, width: i32, height: i32) -> Self {
        Self::new(
            origin.x,
            origin.y,
            origin.x.saturating_add(width),
            origin.y.saturating_add(height),
        )
    }

    /// Width, or zero for an inverted rectangle.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> i32 {
        if self.x1 > self.x0 {
            self.x1.saturating_sub(self.x0)
        } else {
            0
        }
    }

    /// Height, or zero for an inverted rectangle.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> i32 {
        if self.y1 > self.y0 {
            self.y1.saturating_sub(self.y0)
        } else {
            0
        }
    }

    /// Returns `true` if the rectangle covers no pixels.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.x0 >= self.x1 || self.y0 >= self.y1
    }

    /// Returns the intersection, which may be empty.
    #[must_use]
    pub fn intersect(&self, other: Self) -> Self {
        let r = Self::new(
            self.x0.max(other.x0),
            self.y0.max(other.y0),
            self.x1.min(other.x1),
            self.y1.min(other.y1),
        );
        if r.is_empty() { Self::ZERO } else { r }
    }

    /// Returns `true` if the two rectangles share at least one pixel.
    #[inline]
    #[must_use]
    pub fn overlaps(&self, other: Self) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.x0 < other.x1
            && other.x0 < self.x1
            && self.y0 < other.y1
            && other.y0 < self.y1
    }

    /// Returns the smallest rectangle containing both.
    ///
    /// Empty rectangles are ignored, so [`IntRect::ZERO`] is the identity.
    #[must_use]
    pub fn union(&self, other: Self) -> Self {
        if self.is_empty() {
            return other;
        }
        if other.is_empty() {
            return *self;
        }
        Self::new(
            self.x0.min(other.x0),
            self.y0.min(other.y0),
            self.x1.max(other.x1),
            self.y1.max(other.y1),
        )
    }

    /// Returns `true` if every pixel of `other` lies inside `self`.
    ///
    /// An empty `other` is contained in every rectangle.
    #[must_use]
    pub fn contains_rect(&self, other: Self) -> bool {
        if other.is_empty() {
            return true;
        }
        self.x0 <= other.x0 && self.y0 <= other.y0 && other.x1 <= self.x1 && other.y1 <= self.y1
    }

    /// Returns `true` if the pixel at `p` lies inside the rectangle.
    #[inline]
    #[must_use]
    pub fn contains_point(&self, p: IntPoint) -> bool {
        self.x0 <= p.x && p.x < self.x1 && self.y0 <= p.y && p.y < self.y1
    }

    /// Converts to a floating-point [`kurbo::Rect`].
    #[must_use]
    pub fn to_kurbo(self) -> kurbo::Rect {
        kurbo::Rect::new(
            f64::from(self.x0),
            f64::from(self.y0),
            f64::from(self.x1),
            f64::from(self.y1),
        )
    }

    /// Snaps a floating-point rectangle outward onto the pixel grid.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "screen coordinates saturate at the i32 range"
    )]
    pub fn from_kurbo_expand(r: kurbo::Rect) -> Self {
        let r = r.abs().expand();
        Self::new(r.x0 as i32, r.y0 as i32, r.x1 as i32, r.y1 as i32)
    }
}

impl From<IntRect> for kurbo::Rect {
    fn from(r: IntRect) -> Self {
        r.to_kurbo()
    }
}

impl fmt::Debug for IntRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}, {}]", self.x0, self.y0, self.x1, self.y1)
    }
}
