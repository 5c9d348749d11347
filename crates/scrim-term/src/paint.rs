// SPDX-License-Identifier: MIT
//
// Damage-tracked renderer — turns a Grid into the minimum ANSI output.
//
// Two modes:
//
//   Full: every row is written with one CUP and a color-minimized text
//   stream, terminated by SGR 0. Triggered by the grid's pending flag, an
//   explicit force, or a size change since the previous paint.
//
//   Incremental: only cells flagged changed are examined, and of those only
//   the ones whose (char, bg, fg) differ from what was last painted are
//   emitted. Each maximal run of actually-different cells in a row becomes
//   one CUP + text write. A changed cell that matches its shadow closes the
//   open run, so no-op writes never reach the terminal.
//
// Within a row or run a color escape is emitted only when the (bg, fg)
// pair changes. Every paint ends with reset + home and a single flush.
//
// The shadow (what the terminal shows) lives here, not in the grid: a
// same-shaped Vec of `Option<Shown>`, `None` meaning "never painted".
//
// Write failures propagate immediately. Partial terminal output cannot be
// rolled back, and nothing is retried.

use crate::ansi;
use crate::cell::Cell;
use crate::color::Color;
use crate::error::Result;
use crate::grid::Grid;
use crate::mapper::ColorMapper;
use crate::output::Screen;
use crate::rect::Rect;

/// What a cell looked like when it was painted: `(char, bg, fg)`.
type Shown = (char, Option<Color>, Option<Color>);

// ─── Config & stats ──────────────────────────────────────────────────────────

/// Where the grid's origin lands on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PaintConfig {
    pub offset_x: u16,
    pub offset_y: u16,
}

/// Statistics from one paint, for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PaintStats {
    /// Whether the paint ran in full mode.
    pub full: bool,
    /// Rows that produced at least one write.
    pub rows: usize,
    /// Cursor-positioned writes issued.
    pub runs: usize,
    /// Cells whose character was emitted.
    pub cells_painted: usize,
    /// Text bytes handed to the screen, excluding cursor moves.
    pub bytes: usize,
}

// ─── Renderer ────────────────────────────────────────────────────────────────

/// Paints grids onto a [`Screen`], remembering what is already shown.
///
/// # Examples
///
/// ```
/// use scrim_term::cell::Stroke;
/// use scrim_term::color::Color;
/// use scrim_term::grid::Grid;
/// use scrim_term::output::AnsiScreen;
/// use scrim_term::paint::Renderer;
///
/// let mut grid = Grid::with_background(3, 1, Color::rgb(0, 0, 0));
/// let mut screen = AnsiScreen::new(Vec::new(), 3, 1);
/// let mut renderer = Renderer::new();
///
/// renderer.paint(&mut grid, &mut screen, false).unwrap(); // first paint is full
/// grid.set(1, 0, Stroke::new().ch('X')).unwrap();
/// let stats = renderer.paint(&mut grid, &mut screen, false).unwrap();
/// assert_eq!((stats.full, stats.runs, stats.cells_painted), (false, 1, 1));
/// ```
#[derive(Debug, Default)]
pub struct Renderer {
    config: PaintConfig,
    mapper: ColorMapper,
    shadow: Vec<Option<Shown>>,
    shadow_width: u16,
    shadow_height: u16,
    line: String,
}

impl Renderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: PaintConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    #[inline]
    #[must_use]
    pub const fn config(&self) -> PaintConfig {
        self.config
    }

    /// Change the screen offset. Everything is repainted next time.
    pub fn set_config(&mut self, config: PaintConfig) {
        if config != self.config {
            self.config = config;
            self.invalidate();
        }
    }

    /// Forget what the terminal shows; the next paint is full.
    pub fn invalidate(&mut self) {
        self.shadow.clear();
        self.shadow_width = 0;
        self.shadow_height = 0;
    }

    /// Forget what the terminal shows inside `rect` (grid coordinates).
    ///
    /// Cells there that are flagged changed get painted next time even if
    /// their content matches the last paint. See [`Grid::mark_changed`].
    #[allow(clippy::cast_sign_loss)]
    pub fn invalidate_region(&mut self, rect: Rect) {
        let known = Rect::from_xywh(0, 0, i32::from(self.shadow_width), i32::from(self.shadow_height));
        let Some(clipped) = rect.intersect(&known) else {
            return;
        };
        let width = usize::from(self.shadow_width);
        for y in clipped.y..clipped.y2() {
            let start = y as usize * width + clipped.x as usize;
            self.shadow[start..start + clipped.width as usize].fill(None);
        }
    }

    /// The escape cache, e.g. to [`clear`](ColorMapper::clear) it.
    pub const fn mapper_mut(&mut self) -> &mut ColorMapper {
        &mut self.mapper
    }

    /// Paint `grid` onto `screen`.
    ///
    /// Runs in full mode when `force` is set, the grid has a full repaint
    /// pending, or the grid size differs from the last paint. Clears every
    /// processed cell's changed flag and the grid's pending flag.
    ///
    /// # Errors
    ///
    /// [`Error::Io`](crate::Error::Io) as soon as a screen write fails.
    pub fn paint(&mut self, grid: &mut Grid, screen: &mut impl Screen, force: bool) -> Result<PaintStats> {
        let resized = grid.width() != self.shadow_width
            || grid.height() != self.shadow_height
            || self.shadow.len() != grid.cells().len();
        if resized {
            self.shadow.clear();
            self.shadow.resize(grid.cells().len(), None);
            self.shadow_width = grid.width();
            self.shadow_height = grid.height();
        }

        let full = force || resized || grid.is_full_repaint_pending();
        let mut stats = if full {
            self.paint_full(grid, screen)?
        } else {
            self.paint_incremental(grid, screen)?
        };

        screen.write_raw(ansi::RESET_TOPLEFT)?;
        screen.flush()?;
        stats.bytes += ansi::RESET_TOPLEFT.len();

        tracing::debug!(
            full = stats.full,
            rows = stats.rows,
            runs = stats.runs,
            cells = stats.cells_painted,
            bytes = stats.bytes,
            "paint"
        );
        Ok(stats)
    }

    fn paint_full(&mut self, grid: &mut Grid, screen: &mut impl Screen) -> Result<PaintStats> {
        let mut stats = PaintStats {
            full: true,
            ..PaintStats::default()
        };
        let (w, h) = (grid.width(), grid.height());
        let width = usize::from(w);
        let Self {
            config,
            mapper,
            shadow,
            line,
            ..
        } = self;

        if width > 0 {
            let rows = grid.cells_mut().chunks_mut(width).zip(shadow.chunks_mut(width));
            for (y, (cells, shadows)) in (0..h).zip(rows) {
                line.clear();
                let mut emitted: Option<(Option<Color>, Option<Color>)> = None;
                for (cell, seen) in cells.iter_mut().zip(shadows) {
                    push_cell(line, mapper, &mut emitted, cell);
                    *seen = Some(cell.visible());
                    cell.mark_painted();
                }
                line.push_str(ansi::RESET);

                screen.write_at(config.offset_x, config.offset_y.saturating_add(y), line, false)?;
                stats.rows += 1;
                stats.runs += 1;
                stats.cells_painted += width;
                stats.bytes += line.len();
            }
        }

        grid.clear_full_repaint();
        Ok(stats)
    }

    fn paint_incremental(&mut self, grid: &mut Grid, screen: &mut impl Screen) -> Result<PaintStats> {
        let mut stats = PaintStats::default();
        let (w, h) = (grid.width(), grid.height());
        let width = usize::from(w);
        if width == 0 {
            return Ok(stats);
        }
        let Self {
            config,
            mapper,
            shadow,
            line,
            ..
        } = self;

        let rows = grid.cells_mut().chunks_mut(width).zip(shadow.chunks_mut(width));
        for (y, (cells, shadows)) in (0..h).zip(rows) {
            let row = config.offset_y.saturating_add(y);
            let runs_before = stats.runs;
            let mut run_start: Option<u16> = None;
            let mut emitted: Option<(Option<Color>, Option<Color>)> = None;

            for (x, (cell, seen)) in (0..w).zip(cells.iter_mut().zip(shadows)) {
                let differs = cell.is_changed() && *seen != Some(cell.visible());
                if !differs {
                    cell.mark_painted();
                    if let Some(start) = run_start.take() {
                        close_run(screen, line, config.offset_x.saturating_add(start), row, &mut stats)?;
                    }
                    continue;
                }

                if run_start.is_none() {
                    run_start = Some(x);
                    line.clear();
                    emitted = None;
                }
                push_cell(line, mapper, &mut emitted, cell);
                *seen = Some(cell.visible());
                cell.mark_painted();
                stats.cells_painted += 1;
            }

            if let Some(start) = run_start {
                close_run(screen, line, config.offset_x.saturating_add(start), row, &mut stats)?;
            }
            if stats.runs > runs_before {
                stats.rows += 1;
            }
        }
        Ok(stats)
    }
}

/// Append a cell's character, preceded by a color escape when its pair
/// differs from the last one emitted in this row or run.
fn push_cell(
    line: &mut String,
    mapper: &mut ColorMapper,
    emitted: &mut Option<(Option<Color>, Option<Color>)>,
    cell: &Cell,
) {
    let pair = (cell.bg(), cell.fg());
    if *emitted != Some(pair) {
        line.push_str(mapper.resolve(pair.0, pair.1));
        *emitted = Some(pair);
    }
    line.push(cell.ch());
}

fn close_run(
    screen: &mut impl Screen,
    line: &mut String,
    col: u16,
    row: u16,
    stats: &mut PaintStats,
) -> Result<()> {
    line.push_str(ansi::RESET);
    screen.write_at(col, row, line, false)?;
    stats.runs += 1;
    stats.bytes += line.len();
    Ok(())
}

// ─── Tests ───────────────────────────────────────────────────────────────────


// ─── Property tests ──────────────────────────────────────────────────────────
