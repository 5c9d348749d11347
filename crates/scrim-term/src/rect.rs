// SPDX-License-Identifier: MIT
//
// Rect — axis-aligned integer rectangle.
//
// Half-open model: a rect covers columns `x..x2` and rows `y..y2`, where
// `x2 = x + width` and `y2 = y + height`. Coordinates are signed so a rect
// can be shifted partly off-grid (buffer-to-buffer copies with negative
// offsets); width and height are never negative.
//
// Every operation returns a new value. `grow_mut` / `shrink_mut` exist for
// hot loops that adjust one rect repeatedly.
//
// Edge arithmetic saturates at the `i32` limits. A saturated edge still
// lies beyond any grid, so containment and clipping stay correct for
// far-out coordinates instead of overflowing.

use std::fmt;

/// An axis-aligned rectangle with signed origin and non-negative extent.
///
/// # Examples
///
/// ```
/// use scrim_term::rect::Rect;
///
/// let a = Rect::from_xywh(0, 0, 10, 10);
/// let b = Rect::from_xywh(5, 5, 10, 10);
/// assert_eq!(a.intersect(&b), Some(Rect::from_xywh(5, 5, 5, 5)));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    /// The empty rect at the origin.
    #[inline]
    #[must_use]
    pub const fn zero() -> Self {
        Self {
            x: 0,
            y: 0,
            width: 0,
            height: 0,
        }
    }

    /// Build from origin and extent. Negative extents clamp to zero.
    #[inline]
    #[must_use]
    pub const fn from_xywh(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width: if width < 0 { 0 } else { width },
            height: if height < 0 { 0 } else { height },
        }
    }

    /// Build from two corners `(x1, y1)` inclusive and `(x2, y2)` exclusive.
    #[inline]
    #[must_use]
    pub const fn from_corners(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self::from_xywh(x1, y1, x2.saturating_sub(x1), y2.saturating_sub(y1))
    }

    /// An independent copy of `other`.
    #[inline]
    #[must_use]
    pub const fn from_other(other: &Self) -> Self {
        *other
    }

    /// Right edge (exclusive).
    #[inline]
    #[must_use]
    pub const fn x2(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    /// Bottom edge (exclusive).
    #[inline]
    #[must_use]
    pub const fn y2(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    #[inline]
    #[must_use]
    pub const fn area(&self) -> i64 {
        self.width as i64 * self.height as i64
    }

    /// Whether `(px, py)` lies inside the half-open extent.
    #[inline]
    #[must_use]
    pub const fn contains_point(&self, px: i32, py: i32) -> bool {
        px >= self.x && px < self.x2() && py >= self.y && py < self.y2()
    }

    /// Whether `other` lies completely inside this rect.
    ///
    /// Min edges compare with `>=`, max edges with `<=`, so a rect is
    /// inside itself.
    #[inline]
    #[must_use]
    pub const fn is_other_rect_in_rect(&self, other: &Self) -> bool {
        other.x >= self.x && other.y >= self.y && other.x2() <= self.x2() && other.y2() <= self.y2()
    }

    /// The overlapping region, or `None` when the rects do not overlap
    /// (touching edges do not overlap).
    #[must_use]
    pub fn intersect(&self, other: &Self) -> Option<Self> {
        let x1 = self.x.max(other.x);
        let y1 = self.y.max(other.y);
        let x2 = self.x2().min(other.x2());
        let y2 = self.y2().min(other.y2());

        if x2 > x1 && y2 > y1 {
            Some(Self::from_corners(x1, y1, x2, y2))
        } else {
            None
        }
    }

    /// The smallest rect covering both. An empty operand is ignored.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        if other.is_empty() {
            return *self;
        }
        if self.is_empty() {
            return *other;
        }
        Self::from_corners(
            self.x.min(other.x),
            self.y.min(other.y),
            self.x2().max(other.x2()),
            self.y2().max(other.y2()),
        )
    }

    /// Expand every side: `dx` columns left and right, `dy` rows up and down.
    #[inline]
    #[must_use]
    pub const fn grow(&self, dx: i32, dy: i32) -> Self {
        Self::from_xywh(
            self.x.saturating_sub(dx),
            self.y.saturating_sub(dy),
            self.width.saturating_add(dx.saturating_mul(2)),
            self.height.saturating_add(dy.saturating_mul(2)),
        )
    }

    /// Contract every side. Collapses to zero extent, never negative.
    #[inline]
    #[must_use]
    pub const fn shrink(&self, dx: i32, dy: i32) -> Self {
        self.grow(-dx, -dy)
    }

    /// Move the origin by `(dx, dy)`.
    #[inline]
    #[must_use]
    pub const fn translate(&self, dx: i32, dy: i32) -> Self {
        Self::from_xywh(
            self.x.saturating_add(dx),
            self.y.saturating_add(dy),
            self.width,
            self.height,
        )
    }

    /// In-place [`grow`](Self::grow).
    #[inline]
    pub const fn grow_mut(&mut self, dx: i32, dy: i32) {
        *self = self.grow(dx, dy);
    }

    /// In-place [`shrink`](Self::shrink).
    #[inline]
    pub const fn shrink_mut(&mut self, dx: i32, dy: i32) {
        *self = self.shrink(dx, dy);
    }
}

impl fmt::Debug for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Rect({}, {}, {}x{})",
            self.x, self.y, self.width, self.height
        )
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── Construction ────────────────────────────────────────────────────

    #[test]
    fn zero_is_empty() {
        assert!(Rect::zero().is_empty());
        assert_eq!(Rect::zero(), Rect::default());
    }

    #[test]
    fn negative_extent_clamps() {
        let r = Rect::from_xywh(3, 4, -2, -7);
        assert_eq!(r.width, 0);
        assert_eq!(r.height, 0);
    }

    #[test]
    fn derived_edges() {
        let r = Rect::from_xywh(2, 3, 10, 5);
        assert_eq!(r.x2(), 12);
        assert_eq!(r.y2(), 8);
        assert_eq!(r.area(), 50);
    }

    #[test]
    fn from_other_is_a_copy() {
        let a = Rect::from_xywh(1, 2, 3, 4);
        let mut b = Rect::from_other(&a);
        b.x = 9;
        assert_eq!(a.x, 1);
    }

    // ── Containment ─────────────────────────────────────────────────────

    #[test]
    fn contains_point_is_half_open() {
        let r = Rect::from_xywh(10, 10, 20, 20);
        assert!(r.contains_point(10, 10));
        assert!(r.contains_point(29, 29));
        assert!(!r.contains_point(30, 10));
        assert!(!r.contains_point(10, 30));
        assert!(!r.contains_point(9, 10));
    }

    #[test]
    fn rect_in_rect_accepts_equal_edges() {
        let outer = Rect::from_xywh(0, 0, 10, 10);
        assert!(outer.is_other_rect_in_rect(&outer));
        assert!(outer.is_other_rect_in_rect(&Rect::from_xywh(2, 2, 8, 8)));
        assert!(!outer.is_other_rect_in_rect(&Rect::from_xywh(2, 2, 9, 8)));
        assert!(!outer.is_other_rect_in_rect(&Rect::from_xywh(-1, 0, 5, 5)));
    }

    // ── Intersection / union ────────────────────────────────────────────

    #[test]
    fn intersect_overlapping() {
        let a = Rect::from_xywh(0, 0, 10, 10);
        let b = Rect::from_xywh(5, 5, 10, 10);
        assert_eq!(a.intersect(&b), Some(Rect::from_xywh(5, 5, 5, 5)));
    }

    #[test]
    fn intersect_disjoint_is_none() {
        let a = Rect::from_xywh(0, 0, 10, 10);
        let b = Rect::from_xywh(20, 20, 10, 10);
        assert_eq!(a.intersect(&b), None);
    }

    #[test]
    fn intersect_touching_is_none() {
        let a = Rect::from_xywh(0, 0, 10, 10);
        let b = Rect::from_xywh(10, 0, 10, 10);
        assert_eq!(a.intersect(&b), None);
    }

    #[test]
    fn intersect_negative_origin() {
        let grid = Rect::from_xywh(0, 0, 4, 3);
        let shifted = Rect::from_xywh(-2, -1, 4, 3);
        assert_eq!(grid.intersect(&shifted), Some(Rect::from_xywh(0, 0, 2, 2)));
    }

    #[test]
    fn union_covers_both() {
        let a = Rect::from_xywh(0, 0, 2, 2);
        let b = Rect::from_xywh(5, 6, 1, 1);
        assert_eq!(a.union(&b), Rect::from_xywh(0, 0, 6, 7));
    }

    #[test]
    fn union_ignores_empty() {
        let a = Rect::from_xywh(3, 3, 2, 2);
        assert_eq!(a.union(&Rect::zero()), a);
        assert_eq!(Rect::zero().union(&a), a);
    }

    // ── Grow / shrink ───────────────────────────────────────────────────

    #[test]
    fn grow_and_shrink_are_inverse() {
        let r = Rect::from_xywh(5, 5, 10, 4);
        assert_eq!(r.grow(1, 2), Rect::from_xywh(4, 3, 12, 8));
        assert_eq!(r.grow(1, 2).shrink(1, 2), r);
    }

    #[test]
    fn shrink_collapses_to_zero() {
        let r = Rect::from_xywh(0, 0, 2, 2);
        let s = r.shrink(5, 5);
        assert!(s.is_empty());
        assert_eq!(s.width, 0);
    }

    #[test]
    fn mutable_variants_match_pure_ones() {
        let mut r = Rect::from_xywh(1, 1, 4, 4);
        r.grow_mut(1, 1);
        assert_eq!(r, Rect::from_xywh(0, 0, 6, 6));
        r.shrink_mut(2, 1);
        assert_eq!(r, Rect::from_xywh(2, 1, 2, 4));
    }

    #[test]
    fn translate_moves_origin_only() {
        let r = Rect::from_xywh(1, 2, 3, 4).translate(-3, 5);
        assert_eq!(r, Rect::from_xywh(-2, 7, 3, 4));
    }

    #[test]
    fn debug_format() {
        assert_eq!(format!("{:?}", Rect::from_xywh(1, 2, 3, 4)), "Rect(1, 2, 3x4)");
    }

    // ── Extreme coordinates ─────────────────────────────────────────────

    #[test]
    fn edges_saturate_at_i32_limits() {
        let r = Rect::from_xywh(1, i32::MAX, i32::MAX, 5);
        assert_eq!(r.x2(), i32::MAX);
        assert_eq!(r.y2(), i32::MAX);
        assert_eq!(Rect::from_corners(i32::MIN, 0, i32::MAX, 1).width, i32::MAX);
    }

    #[test]
    fn far_out_rect_is_never_inside() {
        let grid = Rect::from_xywh(0, 0, 80, 24);
        assert!(!grid.is_other_rect_in_rect(&Rect::from_xywh(1, 0, i32::MAX, 1)));
        assert!(!grid.is_other_rect_in_rect(&Rect::from_xywh(i32::MAX, 0, 1, 1)));
        assert_eq!(grid.intersect(&Rect::from_xywh(i32::MAX, 0, 2, 1)), None);
        assert_eq!(
            grid.intersect(&Rect::from_xywh(i32::MIN, 0, i32::MAX, 1)),
            None
        );
    }

    #[test]
    fn translate_and_grow_saturate() {
        let r = Rect::from_xywh(10, 10, 4, 4);
        let moved = r.translate(i32::MAX, i32::MIN);
        assert_eq!((moved.x, moved.y), (i32::MAX, i32::MIN + 10));
        assert_eq!(moved.x2(), i32::MAX);
        assert_eq!(Rect::from_xywh(0, -1, 1, 1).translate(0, i32::MIN).y, i32::MIN);
        let g = r.grow(i32::MAX, 0);
        assert_eq!((g.x, g.width), (i32::MIN + 11, i32::MAX));
        assert!(r.shrink(i32::MAX, i32::MAX).is_empty());
    }
}
