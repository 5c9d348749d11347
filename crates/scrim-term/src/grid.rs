// SPDX-License-Identifier: MIT
//
// Grid — the 2D cell surface the application draws on.
//
// Every screen position is a cell in a flat row-major `Vec<Cell>`. The
// renderer walks rows left to right, so a row is one contiguous slice.
//
// Write APIs come in two flavors:
//
//   - Strict (`set`, `fill_rect`, `hline`, `vline`, `draw_frame`,
//     `print_text`): every coordinate must be inside the grid, otherwise
//     the call fails with `OutOfBounds` and writes nothing.
//
//   - Safe (`set_safe`, `fill_rect_safe`, `print_text_safe`): the request
//     is clipped to the grid. Fully outside is a no-op, not an error.
//
// Coordinates are `i32` so callers can pass negative positions and get a
// clean error (or clip) instead of wrapping.
//
// Dimensions are fixed at construction. A terminal resize means building a
// new grid; the renderer notices the size change and repaints in full.

use std::fmt;

use crate::cell::{Cell, Stroke};
use crate::color::Color;
use crate::error::{Error, Result};
use crate::frame::FrameStyle;
use crate::rect::Rect;
use crate::terminal;

/// How [`Grid::copy_to`] combines source cells with destination cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CopyMode {
    /// Replace the destination's character and colors.
    #[default]
    Overwrite,
    /// Copy only fields set in the source; unset fields are see-through.
    MergeIfSet,
}

/// A fixed-size grid of cells with a pending-full-repaint flag.
///
/// # Examples
///
/// ```
/// use scrim_term::cell::Stroke;
/// use scrim_term::grid::Grid;
///
/// let mut grid = Grid::new(10, 2);
/// grid.set(3, 1, Stroke::new().ch('X')).unwrap();
/// assert_eq!(grid.get(3, 1).unwrap().ch(), 'X');
/// assert!(grid.set(10, 0, Stroke::new().ch('X')).is_err());
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Grid {
    width: u16,
    height: u16,
    background: Option<Color>,
    cells: Vec<Cell>,
    full_repaint_pending: bool,
}

impl Grid {
    // ─── Construction ────────────────────────────────────────────────────

    /// A blank grid in terminal default colors.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self::build(width, height, None)
    }

    /// A blank grid on `background`.
    #[must_use]
    pub fn with_background(width: u16, height: u16, background: Color) -> Self {
        Self::build(width, height, Some(background))
    }

    /// A grid of fully unset cells, for layering with [`CopyMode::MergeIfSet`].
    #[must_use]
    pub fn transparent(width: u16, height: u16) -> Self {
        let size = usize::from(width) * usize::from(height);
        Self {
            width,
            height,
            background: None,
            cells: vec![Cell::TRANSPARENT; size],
            full_repaint_pending: true,
        }
    }

    /// A grid sized to the terminal, minus `margin` columns and rows.
    ///
    /// Falls back to 80×24 when the size cannot be queried.
    #[must_use]
    pub fn from_terminal(margin: u16, background: Option<Color>) -> Self {
        let size = terminal::get_size().unwrap_or(terminal::Size::FALLBACK);
        Self::build(
            size.cols.saturating_sub(margin),
            size.rows.saturating_sub(margin),
            background,
        )
    }

    fn build(width: u16, height: u16, background: Option<Color>) -> Self {
        let size = usize::from(width) * usize::from(height);
        Self {
            width,
            height,
            background,
            cells: vec![Cell::blank(background); size],
            full_repaint_pending: true,
        }
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    #[inline]
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// The color `clear()` resets cells to.
    #[inline]
    #[must_use]
    pub const fn background(&self) -> Option<Color> {
        self.background
    }

    /// The grid extent as a rect at the origin.
    #[inline]
    #[must_use]
    pub const fn bounds(&self) -> Rect {
        Rect::from_xywh(0, 0, self.width as i32, self.height as i32)
    }

    #[inline]
    #[must_use]
    pub const fn in_bounds(&self, x: i32, y: i32) -> bool {
        self.bounds().contains_point(x, y)
    }

    #[inline]
    #[must_use]
    pub const fn is_full_repaint_pending(&self) -> bool {
        self.full_repaint_pending
    }

    // Callers check bounds first.
    #[inline]
    #[allow(clippy::cast_sign_loss)]
    const fn index(&self, x: i32, y: i32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// The cell at `(x, y)`, or `None` outside the grid.
    #[inline]
    #[must_use]
    pub fn get(&self, x: i32, y: i32) -> Option<&Cell> {
        if self.in_bounds(x, y) {
            Some(&self.cells[self.index(x, y)])
        } else {
            None
        }
    }

    /// One row as a slice, or `None` if `y` is out of range.
    #[inline]
    #[must_use]
    pub fn row(&self, y: u16) -> Option<&[Cell]> {
        if y < self.height {
            let start = usize::from(y) * usize::from(self.width);
            Some(&self.cells[start..start + usize::from(self.width)])
        } else {
            None
        }
    }

    /// Every cell, row-major.
    #[inline]
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[inline]
    pub(crate) fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    pub(crate) const fn clear_full_repaint(&mut self) {
        self.full_repaint_pending = false;
    }

    // ─── Whole-grid operations ───────────────────────────────────────────

    /// Reset every cell to a blank on the background and schedule a full
    /// repaint.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::blank(self.background));
        self.full_repaint_pending = true;
    }

    /// Schedule a full repaint without touching content.
    #[inline]
    pub const fn full_repaint(&mut self) {
        self.full_repaint_pending = true;
    }

    /// Flag every cell of `rect` that lies inside the grid as changed.
    /// Returns the clipped region, `None` if it misses the grid.
    ///
    /// The renderer still skips cells whose content matches what it last
    /// painted; pair with [`Renderer::invalidate_region`] to force them
    /// out again.
    ///
    /// [`Renderer::invalidate_region`]: crate::paint::Renderer::invalidate_region
    #[allow(clippy::cast_sign_loss)]
    pub fn mark_changed(&mut self, rect: Rect) -> Option<Rect> {
        let clipped = rect.intersect(&self.bounds())?;
        for y in clipped.y..clipped.y2() {
            let start = self.index(clipped.x, y);
            for cell in &mut self.cells[start..start + clipped.width as usize] {
                cell.mark_changed();
            }
        }
        Some(clipped)
    }

    // ─── Single cells ────────────────────────────────────────────────────

    /// Merge-write one cell.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfBounds`] if `(x, y)` is outside the grid.
    pub fn set(&mut self, x: i32, y: i32, stroke: Stroke) -> Result<()> {
        if !self.in_bounds(x, y) {
            return Err(Error::point_out_of_bounds(x, y, self.width, self.height));
        }
        let idx = self.index(x, y);
        self.cells[idx].set(stroke);
        Ok(())
    }

    /// Merge-write one cell if it exists. Returns whether anything was
    /// addressed.
    pub fn set_safe(&mut self, x: i32, y: i32, stroke: Stroke) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        let idx = self.index(x, y);
        self.cells[idx].set(stroke);
        true
    }

    // ─── Rectangles and lines ────────────────────────────────────────────

    /// Merge-write every cell of the `w`×`h` rectangle at `(x, y)`.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfBounds`] unless the whole rectangle lies inside the
    /// grid. Nothing is written in that case.
    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, stroke: Stroke) -> Result<()> {
        let rect = Rect::from_xywh(x, y, w, h);
        if w < 0 || h < 0 || !self.bounds().is_other_rect_in_rect(&rect) {
            return Err(Error::rect_out_of_bounds(x, y, w, h, self.width, self.height));
        }
        self.fill_within(rect, stroke);
        Ok(())
    }

    /// Merge-write the part of the rectangle that lies inside the grid.
    /// Returns the region actually written.
    pub fn fill_rect_safe(&mut self, x: i32, y: i32, w: i32, h: i32, stroke: Stroke) -> Option<Rect> {
        let clipped = Rect::from_xywh(x, y, w, h).intersect(&self.bounds())?;
        self.fill_within(clipped, stroke);
        Some(clipped)
    }

    // `rect` is already inside the grid.
    #[allow(clippy::cast_sign_loss)]
    fn fill_within(&mut self, rect: Rect, stroke: Stroke) {
        if stroke.is_empty() {
            return;
        }
        for y in rect.y..rect.y2() {
            let start = self.index(rect.x, y);
            let end = start + rect.width as usize;
            for cell in &mut self.cells[start..end] {
                cell.set(stroke);
            }
        }
    }

    /// Horizontal line from `x1` to `x2` inclusive, in either order.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfBounds`] if either endpoint is outside the grid.
    pub fn hline(
        &mut self,
        x1: i32,
        y: i32,
        x2: i32,
        ch: char,
        bg: Option<Color>,
        fg: Option<Color>,
    ) -> Result<()> {
        let (lo, hi) = if x1 <= x2 { (x1, x2) } else { (x2, x1) };
        let len = hi.saturating_sub(lo).saturating_add(1);
        self.fill_rect(lo, y, len, 1, Stroke::with(Some(ch), bg, fg))
    }

    /// Vertical line from `y1` to `y2` inclusive, in either order.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfBounds`] if either endpoint is outside the grid.
    pub fn vline(
        &mut self,
        x: i32,
        y1: i32,
        y2: i32,
        ch: char,
        bg: Option<Color>,
        fg: Option<Color>,
    ) -> Result<()> {
        let (lo, hi) = if y1 <= y2 { (y1, y2) } else { (y2, y1) };
        let len = hi.saturating_sub(lo).saturating_add(1);
        self.fill_rect(x, lo, 1, len, Stroke::with(Some(ch), bg, fg))
    }

    /// Draw a box border along the inside edge of `rect`.
    ///
    /// Glyphs occupy columns `rect.x..=rect.x2() - 1` and rows
    /// `rect.y..=rect.y2() - 1`, so the bottom-right corner sits one cell
    /// inside the nominal extent. An empty rect draws nothing.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfBounds`] unless `rect` lies inside the grid.
    pub fn draw_frame(&mut self, rect: Rect, style: &FrameStyle) -> Result<()> {
        if !self.bounds().is_other_rect_in_rect(&rect) {
            return Err(Error::rect_out_of_bounds(
                rect.x,
                rect.y,
                rect.width,
                rect.height,
                self.width,
                self.height,
            ));
        }
        if rect.is_empty() {
            return Ok(());
        }

        let (left, top) = (rect.x, rect.y);
        let (right, bottom) = (rect.x2() - 1, rect.y2() - 1);
        let (bg, fg) = (style.bg, style.fg);
        let glyph = |ch| Stroke::with(Some(ch), bg, fg);

        if right - left > 1 {
            self.fill_within(Rect::from_corners(left + 1, top, right, top + 1), glyph(style.top));
            self.fill_within(
                Rect::from_corners(left + 1, bottom, right, bottom + 1),
                glyph(style.bottom),
            );
        }
        if bottom - top > 1 {
            self.fill_within(Rect::from_corners(left, top + 1, left + 1, bottom), glyph(style.left));
            self.fill_within(
                Rect::from_corners(right, top + 1, right + 1, bottom),
                glyph(style.right),
            );
        }

        // Corners last: in a one-cell-wide rect they overwrite each other
        // in reading order.
        for (x, y, ch) in [
            (left, top, style.top_left),
            (right, top, style.top_right),
            (left, bottom, style.bottom_left),
            (right, bottom, style.bottom_right),
        ] {
            let idx = self.index(x, y);
            self.cells[idx].set(glyph(ch));
        }
        Ok(())
    }

    // ─── Text ────────────────────────────────────────────────────────────

    /// Write `text` one code point per column starting at `(x, y)`. No
    /// wrapping.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] if `text` is empty.
    /// - [`Error::OutOfBounds`] if any column of the run falls outside the
    ///   grid. Nothing is written in that case.
    pub fn print_text(
        &mut self,
        x: i32,
        y: i32,
        text: &str,
        bg: Option<Color>,
        fg: Option<Color>,
    ) -> Result<()> {
        if text.is_empty() {
            return Err(Error::InvalidArgument("text must not be empty".into()));
        }
        let len = i32::try_from(text.chars().count()).unwrap_or(i32::MAX);
        let run = Rect::from_xywh(x, y, len, 1);
        if !self.bounds().is_other_rect_in_rect(&run) {
            return Err(Error::rect_out_of_bounds(x, y, len, 1, self.width, self.height));
        }
        let start = self.index(x, y);
        for (cell, ch) in self.cells[start..].iter_mut().zip(text.chars()) {
            cell.set(Stroke::with(Some(ch), bg, fg));
        }
        Ok(())
    }

    /// Like [`print_text`](Self::print_text), clipped to the grid. Returns
    /// the number of cells written; empty text writes nothing.
    pub fn print_text_safe(
        &mut self,
        x: i32,
        y: i32,
        text: &str,
        bg: Option<Color>,
        fg: Option<Color>,
    ) -> usize {
        let width = i32::from(self.width);
        if y < 0 || y >= i32::from(self.height) || x >= width {
            return 0;
        }
        // Code points left of column 0 are dropped.
        let hidden = usize::try_from(x.min(0).unsigned_abs()).unwrap_or(usize::MAX);
        let mut written = 0;
        for (col, ch) in (x.max(0)..width).zip(text.chars().skip(hidden)) {
            let idx = self.index(col, y);
            self.cells[idx].set(Stroke::with(Some(ch), bg, fg));
            written += 1;
        }
        written
    }

    // ─── Grid to grid ────────────────────────────────────────────────────

    /// Copy this grid onto `dest` with its origin at `(offset_x, offset_y)`.
    ///
    /// Only the overlap of the shifted source and the destination is
    /// touched. Every destination cell in the overlap is marked changed.
    /// Returns the destination region written, `None` if nothing overlaps.
    #[allow(clippy::cast_sign_loss)]
    pub fn copy_to(
        &self,
        dest: &mut Self,
        offset_x: i32,
        offset_y: i32,
        mode: CopyMode,
    ) -> Option<Rect> {
        let shifted = self.bounds().translate(offset_x, offset_y);
        let region = shifted.intersect(&dest.bounds())?;
        let width = region.width as usize;

        for dy in region.y..region.y2() {
            let src_start = self.index(region.x - offset_x, dy - offset_y);
            let dst_start = dest.index(region.x, dy);
            let src = &self.cells[src_start..src_start + width];
            let dst = &mut dest.cells[dst_start..dst_start + width];
            for (from, to) in src.iter().zip(dst) {
                match mode {
                    CopyMode::Overwrite => from.copy_value_to(to),
                    CopyMode::MergeIfSet => from.merge_value_to(to),
                }
            }
        }
        Some(region)
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Grid({}x{})", self.width, self.height)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────


// ─── Property tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn color() -> impl Strategy<Value = Option<Color>> {
        prop::option::of((any::<u8>(), any::<u8>(), any::<u8>()).prop_map(|(r, g, b)| Color::rgb(r, g, b)))
    }

    fn settle(grid: &mut Grid) {
        for cell in grid.cells_mut() {
            cell.mark_painted();
        }
    }

    proptest! {
        #[test]
        fn background_only_write_preserves_char_and_fg(
            ch in proptest::char::range('!', '~'),
            fg in color(),
            bg in (any::<u8>(), any::<u8>(), any::<u8>()),
            x in 0i32..6,
            y in 0i32..4,
        ) {
            let mut grid = Grid::new(6, 4);
            grid.set(x, y, Stroke::with(Some(ch), None, fg)).unwrap();
            let bg = Color::rgb(bg.0, bg.1, bg.2);

            grid.set(x, y, Stroke::new().bg(bg)).unwrap();

            let cell = grid.get(x, y).unwrap();
            prop_assert_eq!(cell.ch(), ch);
            prop_assert_eq!(cell.fg(), fg);
            prop_assert_eq!(cell.bg(), Some(bg));
        }

        #[test]
        fn copy_touches_exactly_the_overlap(
            sw in 0u16..8, sh in 0u16..8,
            dw in 0u16..6, dh in 0u16..6,
            ox in -10i32..10, oy in -10i32..10,
        ) {
            let mut src = Grid::new(sw, sh);
            if sw > 0 && sh > 0 {
                src.fill_rect(0, 0, i32::from(sw), i32::from(sh), Stroke::new().ch('s')).unwrap();
            }
            let mut dst = Grid::new(dw, dh);
            settle(&mut dst);

            let region = src.copy_to(&mut dst, ox, oy, CopyMode::Overwrite);
            let expected = src.bounds().translate(ox, oy).intersect(&dst.bounds());
            prop_assert_eq!(region, expected);

            for y in 0..i32::from(dh) {
                for x in 0..i32::from(dw) {
                    let inside = expected.is_some_and(|r| r.contains_point(x, y));
                    let cell = dst.get(x, y).unwrap();
                    prop_assert_eq!(cell.is_changed(), inside);
                    prop_assert_eq!(cell.ch(), if inside { 's' } else { ' ' });
                }
            }
        }

        #[test]
        fn strict_errors_exactly_where_safe_is_noop(
            x in -5i32..10, y in -5i32..10,
            w in 0i32..6, h in 0i32..6,
        ) {
            let mut strict = Grid::new(5, 5);
            let mut safe = Grid::new(5, 5);
            settle(&mut strict);
            settle(&mut safe);
            let stroke = Stroke::new().ch('#');

            let in_point = (0..5).contains(&x) && (0..5).contains(&y);
            prop_assert_eq!(strict.set(x, y, stroke).is_ok(), in_point);
            prop_assert_eq!(safe.set_safe(x, y, stroke), in_point);

            let in_rect = x >= 0 && y >= 0 && x + w <= 5 && y + h <= 5;
            let result = strict.fill_rect(x, y, w, h, stroke);
            prop_assert_eq!(result.is_ok(), in_rect);
            if !in_rect {
                let is_oob = matches!(result, Err(Error::OutOfBounds { .. }));
                prop_assert!(is_oob);
            }
            safe.fill_rect_safe(x, y, w, h, stroke);
            // Safe and strict agree on every cell whenever strict succeeded.
            if in_rect {
                prop_assert_eq!(strict.cells(), safe.cells());
            }
        }
    }
}
