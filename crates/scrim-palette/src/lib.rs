// SPDX-License-Identifier: MIT

//! Named colors for scrim grids.
//!
//! Two families:
//!
//! - Truecolor constants (`RED`, `DARK_CYANBLUE`, `LIGHT_VIOLET` …): five
//!   greys plus a twelve-step hue wheel at full, dark (80%) and light
//!   (pastel) intensity. Looked up by name with [`by_name`].
//! - The classic 16-color terminal escapes in [`fg`] and [`bg`], for
//!   terminals without truecolor. Looked up with [`fg_by_name`] and
//!   [`bg_by_name`] using their `STD_*` names.
//!
//! Everything here is read-only after first use.

use std::collections::HashMap;
use std::sync::LazyLock;

use scrim_term::color::Color;

// ---------------------------------------------------------------------------
// Greys
// ---------------------------------------------------------------------------

pub const BLACK: Color = Color::rgb(0, 0, 0);
pub const DARK_GREY: Color = Color::rgb(96, 96, 96);
pub const GREY: Color = Color::rgb(128, 128, 128);
pub const LIGHT_GREY: Color = Color::rgb(192, 192, 192);
pub const WHITE: Color = Color::rgb(255, 255, 255);

// ---------------------------------------------------------------------------
// Hue wheel, full intensity
// ---------------------------------------------------------------------------

pub const RED: Color = Color::rgb(255, 0, 0);
pub const ORANGE: Color = Color::rgb(255, 128, 0);
pub const YELLOW: Color = Color::rgb(255, 255, 0);
pub const YELLOWGREEN: Color = Color::rgb(128, 255, 0);
pub const GREEN: Color = Color::rgb(0, 255, 0);
pub const GREENCYAN: Color = Color::rgb(0, 255, 128);
pub const CYAN: Color = Color::rgb(0, 255, 255);
pub const CYANBLUE: Color = Color::rgb(0, 128, 255);
pub const BLUE: Color = Color::rgb(0, 0, 255);
pub const BLUEVIOLET: Color = Color::rgb(128, 0, 255);
pub const VIOLET: Color = Color::rgb(255, 0, 255);
pub const VIOLETRED: Color = Color::rgb(255, 0, 128);

// ---------------------------------------------------------------------------
// Hue wheel, dark
// ---------------------------------------------------------------------------

pub const DARK_RED: Color = Color::rgb(204, 0, 0);
pub const DARK_ORANGE: Color = Color::rgb(204, 102, 0);
pub const DARK_YELLOW: Color = Color::rgb(204, 204, 0);
pub const DARK_YELLOWGREEN: Color = Color::rgb(102, 204, 0);
pub const DARK_GREEN: Color = Color::rgb(0, 204, 0);
pub const DARK_GREENCYAN: Color = Color::rgb(0, 204, 102);
pub const DARK_CYAN: Color = Color::rgb(0, 204, 204);
pub const DARK_CYANBLUE: Color = Color::rgb(0, 102, 204);
pub const DARK_BLUE: Color = Color::rgb(0, 0, 204);
pub const DARK_BLUEVIOLET: Color = Color::rgb(102, 0, 204);
pub const DARK_VIOLET: Color = Color::rgb(204, 0, 204);
pub const DARK_VIOLETRED: Color = Color::rgb(204, 0, 102);

// ---------------------------------------------------------------------------
// Hue wheel, light
// ---------------------------------------------------------------------------

pub const LIGHT_RED: Color = Color::rgb(255, 102, 102);
pub const LIGHT_ORANGE: Color = Color::rgb(255, 178, 102);
pub const LIGHT_YELLOW: Color = Color::rgb(255, 255, 102);
pub const LIGHT_YELLOWGREEN: Color = Color::rgb(178, 255, 102);
pub const LIGHT_GREEN: Color = Color::rgb(102, 255, 102);
pub const LIGHT_GREENCYAN: Color = Color::rgb(102, 255, 178);
pub const LIGHT_CYAN: Color = Color::rgb(102, 255, 255);
pub const LIGHT_CYANBLUE: Color = Color::rgb(102, 178, 255);
pub const LIGHT_BLUE: Color = Color::rgb(102, 102, 255);
pub const LIGHT_BLUEVIOLET: Color = Color::rgb(178, 102, 255);
pub const LIGHT_VIOLET: Color = Color::rgb(255, 102, 255);
pub const LIGHT_VIOLETRED: Color = Color::rgb(255, 102, 178);

/// Every truecolor constant with its name, greys first.
pub const NAMED: &[(&str, Color)] = &[
    ("BLACK", BLACK),
    ("DARK_GREY", DARK_GREY),
    ("GREY", GREY),
    ("LIGHT_GREY", LIGHT_GREY),
    ("WHITE", WHITE),
    ("RED", RED),
    ("ORANGE", ORANGE),
    ("YELLOW", YELLOW),
    ("YELLOWGREEN", YELLOWGREEN),
    ("GREEN", GREEN),
    ("GREENCYAN", GREENCYAN),
    ("CYAN", CYAN),
    ("CYANBLUE", CYANBLUE),
    ("BLUE", BLUE),
    ("BLUEVIOLET", BLUEVIOLET),
    ("VIOLET", VIOLET),
    ("VIOLETRED", VIOLETRED),
    ("DARK_RED", DARK_RED),
    ("DARK_ORANGE", DARK_ORANGE),
    ("DARK_YELLOW", DARK_YELLOW),
    ("DARK_YELLOWGREEN", DARK_YELLOWGREEN),
    ("DARK_GREEN", DARK_GREEN),
    ("DARK_GREENCYAN", DARK_GREENCYAN),
    ("DARK_CYAN", DARK_CYAN),
    ("DARK_CYANBLUE", DARK_CYANBLUE),
    ("DARK_BLUE", DARK_BLUE),
    ("DARK_BLUEVIOLET", DARK_BLUEVIOLET),
    ("DARK_VIOLET", DARK_VIOLET),
    ("DARK_VIOLETRED", DARK_VIOLETRED),
    ("LIGHT_RED", LIGHT_RED),
    ("LIGHT_ORANGE", LIGHT_ORANGE),
    ("LIGHT_YELLOW", LIGHT_YELLOW),
    ("LIGHT_YELLOWGREEN", LIGHT_YELLOWGREEN),
    ("LIGHT_GREEN", LIGHT_GREEN),
    ("LIGHT_GREENCYAN", LIGHT_GREENCYAN),
    ("LIGHT_CYAN", LIGHT_CYAN),
    ("LIGHT_CYANBLUE", LIGHT_CYANBLUE),
    ("LIGHT_BLUE", LIGHT_BLUE),
    ("LIGHT_BLUEVIOLET", LIGHT_BLUEVIOLET),
    ("LIGHT_VIOLET", LIGHT_VIOLET),
    ("LIGHT_VIOLETRED", LIGHT_VIOLETRED),
];

static BY_NAME: LazyLock<HashMap<&'static str, Color>> =
    LazyLock::new(|| NAMED.iter().copied().collect());

/// Look up a truecolor constant by name, case-insensitively.
///
/// Returns `None` if the name is not recognized.
#[must_use]
pub fn by_name(name: &str) -> Option<Color> {
    BY_NAME.get(name.to_ascii_uppercase().as_str()).copied()
}

// ---------------------------------------------------------------------------
// Standard 16-color escapes
// ---------------------------------------------------------------------------

/// Classic foreground escapes. The bright half uses the bold attribute,
/// the dark half cancels it with `22`. None of them reset the background.
pub mod fg {
    use scrim_term::color::Color;

    pub const BLACK: Color = Color::Sgr("\x1b[22;30m");
    pub const BLUE: Color = Color::Sgr("\x1b[22;34m");
    pub const GREEN: Color = Color::Sgr("\x1b[22;32m");
    pub const CYAN: Color = Color::Sgr("\x1b[22;36m");
    pub const RED: Color = Color::Sgr("\x1b[22;31m");
    pub const PURPLE: Color = Color::Sgr("\x1b[22;35m");
    pub const DARKYELLOW: Color = Color::Sgr("\x1b[22;33m");
    pub const LIGHTGRAY: Color = Color::Sgr("\x1b[22;37m");
    pub const DARKGRAY: Color = Color::Sgr("\x1b[1;30m");
    pub const LIGHTBLUE: Color = Color::Sgr("\x1b[1;34m");
    pub const LIGHTGREEN: Color = Color::Sgr("\x1b[1;32m");
    pub const LIGHTCYAN: Color = Color::Sgr("\x1b[1;36m");
    pub const LIGHTRED: Color = Color::Sgr("\x1b[1;31m");
    pub const LIGHTPURPLE: Color = Color::Sgr("\x1b[1;35m");
    pub const YELLOW: Color = Color::Sgr("\x1b[1;33m");
    pub const WHITE: Color = Color::Sgr("\x1b[1;37m");

    pub const ALL: &[(&str, Color)] = &[
        ("STD_BLACK", BLACK),
        ("STD_BLUE", BLUE),
        ("STD_GREEN", GREEN),
        ("STD_CYAN", CYAN),
        ("STD_RED", RED),
        ("STD_PURPLE", PURPLE),
        ("STD_DARKYELLOW", DARKYELLOW),
        ("STD_LIGHTGRAY", LIGHTGRAY),
        ("STD_DARKGRAY", DARKGRAY),
        ("STD_LIGHTBLUE", LIGHTBLUE),
        ("STD_LIGHTGREEN", LIGHTGREEN),
        ("STD_LIGHTCYAN", LIGHTCYAN),
        ("STD_LIGHTRED", LIGHTRED),
        ("STD_LIGHTPURPLE", LIGHTPURPLE),
        ("STD_YELLOW", YELLOW),
        ("STD_WHITE", WHITE),
    ];
}

/// Classic background escapes. There is no bright half.
pub mod bg {
    use scrim_term::color::Color;

    pub const BLACK: Color = Color::Sgr("\x1b[40m");
    pub const BLUE: Color = Color::Sgr("\x1b[44m");
    pub const GREEN: Color = Color::Sgr("\x1b[42m");
    pub const CYAN: Color = Color::Sgr("\x1b[46m");
    pub const RED: Color = Color::Sgr("\x1b[41m");
    pub const PURPLE: Color = Color::Sgr("\x1b[45m");
    pub const DARKYELLOW: Color = Color::Sgr("\x1b[43m");
    pub const LIGHTGRAY: Color = Color::Sgr("\x1b[47m");

    pub const ALL: &[(&str, Color)] = &[
        ("STD_BLACK", BLACK),
        ("STD_BLUE", BLUE),
        ("STD_GREEN", GREEN),
        ("STD_CYAN", CYAN),
        ("STD_RED", RED),
        ("STD_PURPLE", PURPLE),
        ("STD_DARKYELLOW", DARKYELLOW),
        ("STD_LIGHTGRAY", LIGHTGRAY),
    ];
}

/// A standard foreground escape by its `STD_*` name.
#[must_use]
pub fn fg_by_name(name: &str) -> Option<Color> {
    lookup(fg::ALL, name)
}

/// A standard background escape by its `STD_*` name.
#[must_use]
pub fn bg_by_name(name: &str) -> Option<Color> {
    lookup(bg::ALL, name)
}

fn lookup(table: &[(&str, Color)], name: &str) -> Option<Color> {
    table.iter().find(|(n, _)| *n == name).map(|&(_, c)| c)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
