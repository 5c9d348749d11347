// SPDX-License-Identifier: MIT
//
// FrameStyle — the glyphs and colors of a box border.

use crate::color::Color;

/// Eight border glyphs plus the frame's colors.
///
/// Colors left `None` are merge-written, so the frame keeps whatever
/// background or foreground the covered cells already had.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameStyle {
    pub top: char,
    pub bottom: char,
    pub left: char,
    pub right: char,
    pub top_left: char,
    pub top_right: char,
    pub bottom_left: char,
    pub bottom_right: char,
    pub bg: Option<Color>,
    pub fg: Option<Color>,
}

impl FrameStyle {
    /// Light box-drawing lines: `┌─┐│└┘`.
    pub const SINGLE: Self = Self::from_glyphs(['─', '─', '│', '│', '┌', '┐', '└', '┘']);

    /// Double box-drawing lines: `╔═╗║╚╝`.
    pub const DOUBLE: Self = Self::from_glyphs(['═', '═', '║', '║', '╔', '╗', '╚', '╝']);

    /// Rounded corners with light lines.
    pub const ROUNDED: Self = Self::from_glyphs(['─', '─', '│', '│', '╭', '╮', '╰', '╯']);

    /// Plain ASCII for terminals without box-drawing fonts.
    pub const ASCII: Self = Self::from_glyphs(['-', '-', '|', '|', '+', '+', '+', '+']);

    /// Build from glyphs in the order top, bottom, left, right, top-left,
    /// top-right, bottom-left, bottom-right. Colors start unset.
    #[must_use]
    pub const fn from_glyphs(g: [char; 8]) -> Self {
        Self {
            top: g[0],
            bottom: g[1],
            left: g[2],
            right: g[3],
            top_left: g[4],
            top_right: g[5],
            bottom_left: g[6],
            bottom_right: g[7],
            bg: None,
            fg: None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn with_bg(self, bg: Color) -> Self {
        Self {
            bg: Some(bg),
            ..self
        }
    }

    #[inline]
    #[must_use]
    pub const fn with_fg(self, fg: Color) -> Self {
        Self {
            fg: Some(fg),
            ..self
        }
    }
}

impl Default for FrameStyle {
    fn default() -> Self {
        Self::SINGLE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glyph_order() {
        let s = FrameStyle::from_glyphs(['t', 'b', 'l', 'r', '1', '2', '3', '4']);
        assert_eq!((s.top, s.bottom, s.left, s.right), ('t', 'b', 'l', 'r'));
        assert_eq!(
            (s.top_left, s.top_right, s.bottom_left, s.bottom_right),
            ('1', '2', '3', '4')
        );
    }

    #[test]
    fn colors_are_unset_until_given() {
        let s = FrameStyle::DOUBLE;
        assert_eq!((s.bg, s.fg), (None, None));
        let red = Color::rgb(255, 0, 0);
        let s = s.with_fg(red);
        assert_eq!(s.fg, Some(red));
        assert_eq!(s.top_left, '╔');
    }
}
