// SPDX-License-Identifier: MIT
//
// Cell — one grid position's display state.
//
// A cell is a character, an optional background, an optional foreground,
// and a `changed` flag meaning "may differ from what the terminal shows".
// Unset fields are meaningful: an unset color renders as the terminal
// default, and in layered grids an unset field is see-through when the
// layer is merged onto another grid.
//
// Writes go through `Stroke`, a merge-write request: every `None` field in
// a stroke leaves the existing value alone. A stroke that sets anything
// marks the cell changed, even when the value written equals the value
// already there. The renderer's shadow comparison decides whether that
// change is real.
//
// What was last painted is not stored here. The renderer keeps its own
// same-shaped shadow, so a grid can be drawn without any notion of diffing.

use std::fmt;

use crate::color::Color;
use crate::error::{Error, Result};

/// Character shown for a cell whose character is unset.
pub const BLANK: char = ' ';

// ─── Stroke ──────────────────────────────────────────────────────────────────

/// A merge-write request. `None` means "leave unchanged".
///
/// # Examples
///
/// ```
/// use scrim_term::cell::{Cell, Stroke};
/// use scrim_term::color::Color;
///
/// let mut cell = Cell::new('a');
/// cell.set(Stroke::new().bg(Color::rgb(0, 0, 255)));
/// assert_eq!(cell.ch(), 'a'); // untouched
/// assert_eq!(cell.bg(), Some(Color::rgb(0, 0, 255)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Stroke {
    pub ch: Option<char>,
    pub bg: Option<Color>,
    pub fg: Option<Color>,
}

impl Stroke {
    /// A stroke that writes nothing.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ch: None,
            bg: None,
            fg: None,
        }
    }

    /// A stroke writing all three fields.
    #[inline]
    #[must_use]
    pub const fn full(ch: char, bg: Color, fg: Color) -> Self {
        Self {
            ch: Some(ch),
            bg: Some(bg),
            fg: Some(fg),
        }
    }

    /// Build from a string that must hold exactly one code point.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] if `s` is empty or longer than one code point.
    pub fn from_str_char(s: &str) -> Result<Self> {
        Ok(Self::new().ch(single_code_point(s)?))
    }

    #[inline]
    #[must_use]
    pub const fn ch(self, ch: char) -> Self {
        Self {
            ch: Some(ch),
            ..self
        }
    }

    #[inline]
    #[must_use]
    pub const fn bg(self, bg: Color) -> Self {
        Self {
            bg: Some(bg),
            ..self
        }
    }

    #[inline]
    #[must_use]
    pub const fn fg(self, fg: Color) -> Self {
        Self {
            fg: Some(fg),
            ..self
        }
    }

    /// Optional-argument form, for callers forwarding their own `Option`s.
    #[inline]
    #[must_use]
    pub const fn with(ch: Option<char>, bg: Option<Color>, fg: Option<Color>) -> Self {
        Self { ch, bg, fg }
    }

    /// Whether this stroke writes nothing.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.ch.is_none() && self.bg.is_none() && self.fg.is_none()
    }
}

/// The only code point of `s`.
///
/// # Errors
///
/// [`Error::InvalidArgument`] unless `s` is exactly one code point.
pub fn single_code_point(s: &str) -> Result<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(Error::InvalidArgument(format!(
            "expected exactly one character, got {s:?}"
        ))),
    }
}

// ─── Cell ────────────────────────────────────────────────────────────────────

/// One grid entry.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    ch: Option<char>,
    bg: Option<Color>,
    fg: Option<Color>,
    changed: bool,
}

impl Cell {
    /// A fully unset cell: see-through in a layer, a blank on screen.
    pub const TRANSPARENT: Self = Self {
        ch: None,
        bg: None,
        fg: None,
        changed: true,
    };

    /// A cell showing `ch` in terminal default colors, marked changed.
    #[inline]
    #[must_use]
    pub const fn new(ch: char) -> Self {
        Self {
            ch: Some(ch),
            bg: None,
            fg: None,
            changed: true,
        }
    }

    /// A blank cell on `bg`, marked changed.
    #[inline]
    #[must_use]
    pub const fn blank(bg: Option<Color>) -> Self {
        Self {
            ch: Some(BLANK),
            bg,
            fg: None,
            changed: true,
        }
    }

    // ─── Queries ──────────────────────────────────────────────────────────

    /// The character to display (blank when unset).
    #[inline]
    #[must_use]
    pub const fn ch(&self) -> char {
        match self.ch {
            Some(c) => c,
            None => BLANK,
        }
    }

    /// The stored character, `None` when unset.
    #[inline]
    #[must_use]
    pub const fn raw_ch(&self) -> Option<char> {
        self.ch
    }

    #[inline]
    #[must_use]
    pub const fn bg(&self) -> Option<Color> {
        self.bg
    }

    #[inline]
    #[must_use]
    pub const fn fg(&self) -> Option<Color> {
        self.fg
    }

    /// Whether the cell was written since the last paint.
    #[inline]
    #[must_use]
    pub const fn is_changed(&self) -> bool {
        self.changed
    }

    /// The values a paint would put on screen: `(char, bg, fg)`.
    #[inline]
    #[must_use]
    pub const fn visible(&self) -> (char, Option<Color>, Option<Color>) {
        (self.ch(), self.bg, self.fg)
    }

    // ─── Mutations ────────────────────────────────────────────────────────

    /// Reset to a blank on `bg` with no foreground, marked changed.
    #[inline]
    pub const fn clear(&mut self, bg: Option<Color>) {
        *self = Self::blank(bg);
    }

    /// Merge-write. Fields left `None` in `stroke` are preserved; any set
    /// field marks the cell changed.
    #[inline]
    pub const fn set(&mut self, stroke: Stroke) {
        if let Some(ch) = stroke.ch {
            self.ch = Some(ch);
            self.changed = true;
        }
        if let Some(bg) = stroke.bg {
            self.bg = Some(bg);
            self.changed = true;
        }
        if let Some(fg) = stroke.fg {
            self.fg = Some(fg);
            self.changed = true;
        }
    }

    /// Copy character and colors into `other`, marking it changed.
    ///
    /// Values are only written when they differ; the changed mark is set
    /// either way, so a copy always schedules the region for repaint.
    #[inline]
    pub fn copy_value_to(&self, other: &mut Self) {
        if (self.ch, self.bg, self.fg) != (other.ch, other.bg, other.fg) {
            other.ch = self.ch;
            other.bg = self.bg;
            other.fg = self.fg;
        }
        other.changed = true;
    }

    /// Copy only the fields set in this cell into `other`, marking it
    /// changed. Unset fields are see-through.
    #[inline]
    pub fn merge_value_to(&self, other: &mut Self) {
        other.set(Stroke::with(self.ch, self.bg, self.fg));
        other.changed = true;
    }

    #[inline]
    pub(crate) const fn mark_changed(&mut self) {
        self.changed = true;
    }

    /// Clear the changed mark. Only the renderer does this.
    #[inline]
    pub(crate) const fn mark_painted(&mut self) {
        self.changed = false;
    }
}

impl Default for Cell {
    #[inline]
    fn default() -> Self {
        Self::blank(None)
    }
}

impl fmt::Debug for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ch {
            Some(c) => write!(f, "Cell({c:?}")?,
            None => write!(f, "Cell(unset")?,
        }
        if let Some(bg) = self.bg {
            write!(f, ", bg={bg:?}")?;
        }
        if let Some(fg) = self.fg {
            write!(f, ", fg={fg:?}")?;
        }
        if self.changed {
            write!(f, ", changed")?;
        }
        write!(f, ")")
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
