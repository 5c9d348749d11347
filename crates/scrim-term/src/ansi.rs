// SPDX-License-Identifier: MIT
//
// ANSI escape sequence generation.
//
// Pure functions that write escape sequences to any `impl Write`, plus the
// constant sequences the renderer and terminal guard splice in directly.
// No state and no decisions about when to emit; the renderer owns that.
//
// Cursor positions are 0-indexed in our API and converted to 1-indexed for
// the terminal (ANSI CUP is 1-based).

use std::io::{self, Write};

// ─── Constants ───────────────────────────────────────────────────────────────

/// Reset all SGR attributes (SGR 0). Terminates every painted run.
pub const RESET: &str = "\x1b[0m";

/// Reset attributes and home the cursor. Ends every paint.
pub const RESET_TOPLEFT: &str = "\x1b[0m\x1b[1;1H";

/// Button tracking with SGR (1006) and urxvt (1015) coordinate encodings.
pub const MOUSE_ENABLE: &str = "\x1b[?1000;1006;1015h";

/// Undo [`MOUSE_ENABLE`].
pub const MOUSE_DISABLE: &str = "\x1b[?1000;1006;1015l";

pub const BOLD: &str = "\x1b[01m";
pub const UNDERLINE: &str = "\x1b[04m";
pub const STRIKETHROUGH: &str = "\x1b[09m";

// ─── Cursor ──────────────────────────────────────────────────────────────────

/// Move the cursor to `(x, y)` using CUP.
#[inline]
pub fn cursor_to(w: &mut impl Write, x: u16, y: u16) -> io::Result<()> {
    write!(w, "\x1b[{};{}H", u32::from(y) + 1, u32::from(x) + 1)
}

/// Hide the cursor (DECTCEM reset).
#[inline]
pub fn cursor_hide(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25l")
}

/// Show the cursor (DECTCEM set).
#[inline]
pub fn cursor_show(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25h")
}

// ─── Screen ──────────────────────────────────────────────────────────────────

/// Clear the entire screen (ED 2).
#[inline]
pub fn clear_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[2J")
}

/// Reset all SGR attributes (SGR 0).
#[inline]
pub fn reset(w: &mut impl Write) -> io::Result<()> {
    w.write_all(RESET.as_bytes())
}

/// Reset attributes and move to the top-left corner.
#[inline]
pub fn reset_topleft(w: &mut impl Write) -> io::Result<()> {
    w.write_all(RESET_TOPLEFT.as_bytes())
}

/// Switch to the alternate screen buffer.
#[inline]
pub fn enter_alt_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?1049h")
}

/// Leave the alternate screen buffer and restore the original content.
#[inline]
pub fn exit_alt_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?1049l")
}

// ─── Mouse ───────────────────────────────────────────────────────────────────

#[inline]
pub fn enable_mouse(w: &mut impl Write) -> io::Result<()> {
    w.write_all(MOUSE_ENABLE.as_bytes())
}

#[inline]
pub fn disable_mouse(w: &mut impl Write) -> io::Result<()> {
    w.write_all(MOUSE_DISABLE.as_bytes())
}

// ─── Escape-aware text measurement ───────────────────────────────────────────

/// Visit the printable characters of `text`, skipping `ESC [ … m` runs.
/// An unterminated escape swallows the rest of the string.
fn printable(text: &str) -> impl Iterator<Item = char> + '_ {
    let mut chars = text.chars().peekable();
    std::iter::from_fn(move || {
        loop {
            let c = chars.next()?;
            if c == '\x1b' && chars.peek() == Some(&'[') {
                chars.by_ref().find(|&c| c == 'm')?;
                continue;
            }
            return Some(c);
        }
    })
}

/// Number of printable code points in `text`, ignoring SGR sequences.
///
/// ```
/// assert_eq!(scrim_term::ansi::text_width("\x1b[01mhi\x1b[0m"), 2);
/// ```
#[must_use]
pub fn text_width(text: &str) -> usize {
    printable(text).count()
}

/// `text` with every SGR sequence removed.
#[must_use]
pub fn strip_escapes(text: &str) -> String {
    printable(text).collect()
}

// ─── Tests ───────────────────────────────────────────────────────────────────
