// SPDX-License-Identifier: MIT
//
// ColorMapper — memoized color → escape-sequence conversion.
//
// The renderer asks for the SGR prefix of a (background, foreground) pair
// once per color change. Formatting `\x1b[48;2;R;G;Bm` each time is wasted
// work on a screen that uses a handful of colors, so both the per-role
// escapes and the concatenated pairs are kept in maps.
//
// The maps are unbounded. A caller that cycles through huge numbers of
// distinct colors calls `clear()` to reclaim the memory.

use std::collections::HashMap;

use crate::color::{Color, Rgb, Role};

/// Cache of resolved SGR strings, keyed by packed color and role.
///
/// # Examples
///
/// ```
/// use scrim_term::color::Color;
/// use scrim_term::mapper::ColorMapper;
///
/// let mut mapper = ColorMapper::new();
/// let seq = mapper.resolve(Some(Color::rgb(255, 255, 255)), Some(Color::rgb(255, 0, 0)));
/// assert_eq!(seq, "\x1b[48;2;255;255;255m\x1b[38;2;255;0;0m");
/// ```
#[derive(Debug, Default)]
pub struct ColorMapper {
    escapes: HashMap<(Rgb, Role), String>,
    pairs: HashMap<(Option<Color>, Option<Color>), String>,
}

impl ColorMapper {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The escape for one color in one role. `None` is the terminal default.
    pub fn escape(&mut self, color: Option<Color>, role: Role) -> &str {
        lookup(&mut self.escapes, color, role)
    }

    /// Background escape followed by foreground escape.
    ///
    /// `Sgr` escapes are emitted verbatim. One that resets attributes
    /// (`\x1b[0;31m`) also wipes the background written just before it,
    /// so escapes meant to combine with a background must not contain `0`.
    pub fn resolve(&mut self, bg: Option<Color>, fg: Option<Color>) -> &str {
        let Self { escapes, pairs } = self;
        pairs.entry((bg, fg)).or_insert_with(|| {
            let mut seq = String::with_capacity(40);
            seq.push_str(lookup(escapes, bg, Role::Background));
            seq.push_str(lookup(escapes, fg, Role::Foreground));
            seq
        })
    }

    /// Drop every cached string.
    pub fn clear(&mut self) {
        self.escapes.clear();
        self.pairs.clear();
    }

    /// Number of cached single-role escapes.
    #[must_use]
    pub fn cached_escapes(&self) -> usize {
        self.escapes.len()
    }

    /// Number of cached background/foreground pairs.
    #[must_use]
    pub fn cached_pairs(&self) -> usize {
        self.pairs.len()
    }
}

fn lookup(
    escapes: &mut HashMap<(Rgb, Role), String>,
    color: Option<Color>,
    role: Role,
) -> &str {
    match color {
        Some(Color::Rgb(rgb)) => escapes
            .entry((rgb, role))
            .or_insert_with(|| rgb.to_escape_sequence(role)),
        Some(Color::Sgr(seq)) => seq,
        None => role.default_sequence(),
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
