// SPDX-License-Identifier: MIT
//
// Color — what a cell asks the terminal to draw with.
//
// Two representations:
//
//   Rgb: a packed 24-bit value, `0xFF000000 | r << 16 | g << 8 | b`.
//        Converted to a truecolor SGR sequence (38;2 / 48;2) on demand.
//
//   Sgr: an already-rendered escape string, used verbatim. This is how
//        the classic 16-color codes (`\x1b[0;31m`, `\x1b[44m`) enter the
//        grid. The string already encodes its foreground/background role.
//
// Both are `Copy` so cells stay plain values. Formatting to escape strings
// is cached by `ColorMapper`, not here.
//
// The float constructors reproduce the legacy conversions bit-for-bit:
// channels scale with truncation (`floor(c * 255)`), and HSL nudges a zero
// saturation to 0.0001 instead of special-casing grey.

use std::borrow::Cow;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};

// ─── Role ────────────────────────────────────────────────────────────────────

/// Which half of the SGR pair a color is rendered into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Foreground,
    Background,
}

impl Role {
    /// SGR selector for truecolor: `38` or `48`.
    #[inline]
    #[must_use]
    pub const fn truecolor_selector(self) -> u8 {
        match self {
            Self::Foreground => 38,
            Self::Background => 48,
        }
    }

    /// SGR sequence restoring the terminal's default color for this role.
    #[inline]
    #[must_use]
    pub const fn default_sequence(self) -> &'static str {
        match self {
            Self::Foreground => "\x1b[39m",
            Self::Background => "\x1b[49m",
        }
    }
}

// ─── Rgb ─────────────────────────────────────────────────────────────────────

const OPAQUE: u32 = 0xFF00_0000;

/// A packed, opaque 24-bit color.
///
/// # Examples
///
/// ```
/// use scrim_term::color::Rgb;
///
/// let orange = Rgb::rgb256(255, 128, 0).unwrap();
/// assert_eq!(orange.packed(), 0xFFFF_8000);
/// assert_eq!(orange.to_css(), "#ff8000");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(u32);

impl Rgb {
    /// Build from byte channels. Infallible.
    #[inline]
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self(OPAQUE | (r as u32) << 16 | (g as u32) << 8 | b as u32)
    }

    /// Reinterpret a packed integer. Bits above the low 24 are ignored and
    /// the alpha byte is forced opaque.
    #[inline]
    #[must_use]
    pub const fn from_packed(value: u32) -> Self {
        Self(OPAQUE | (value & 0x00FF_FFFF))
    }

    /// Build from integer channels in `[0, 255]`.
    ///
    /// # Errors
    ///
    /// [`Error::Range`] if any channel is outside `[0, 255]`.
    pub fn rgb256(r: i32, g: i32, b: i32) -> Result<Self> {
        Ok(Self::new(
            channel256("red", r)?,
            channel256("green", g)?,
            channel256("blue", b)?,
        ))
    }

    /// Build from fractional channels in `[0, 1]`, scaled by truncation.
    ///
    /// # Errors
    ///
    /// [`Error::Range`] if any channel is outside `[0, 1]` (or NaN).
    pub fn rgb1(r: f64, g: f64, b: f64) -> Result<Self> {
        unit("red", r)?;
        unit("green", g)?;
        unit("blue", b)?;
        Ok(Self::new(scale(r), scale(g), scale(b)))
    }

    /// Build from hue, saturation and lightness, each in `[0, 1]`.
    ///
    /// # Errors
    ///
    /// [`Error::Range`] if any input is outside `[0, 1]` (or NaN).
    pub fn hsl1(h: f64, s: f64, l: f64) -> Result<Self> {
        unit("hue", h)?;
        unit("saturation", s)?;
        unit("lightness", l)?;

        // Grey goes through the chromatic path with a nudged saturation.
        #[allow(clippy::float_cmp)]
        let s = if s == 0.0 { 0.0001 } else { s };

        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        let r = hue_to_rgb(p, q, h + 1.0 / 3.0);
        let g = hue_to_rgb(p, q, h);
        let b = hue_to_rgb(p, q, h - 1.0 / 3.0);
        Ok(Self::new(scale(r), scale(g), scale(b)))
    }

    /// Parse `#rrggbb`, `#rgb`, or `rgb(r, g, b)`, case-insensitively.
    ///
    /// # Errors
    ///
    /// [`Error::Format`] for any other shape, [`Error::Range`] for an
    /// `rgb()` channel above 255.
    pub fn parse_css(input: &str) -> Result<Self> {
        // Literal patterns; `None` only if the regex crate rejects them.
        static HEX6: LazyLock<Option<Regex>> =
            LazyLock::new(|| Regex::new(r"^#([0-9a-f]{2})([0-9a-f]{2})([0-9a-f]{2})$").ok());
        static HEX3: LazyLock<Option<Regex>> =
            LazyLock::new(|| Regex::new(r"^#([0-9a-f])([0-9a-f])([0-9a-f])$").ok());
        static FUNC: LazyLock<Option<Regex>> = LazyLock::new(|| {
            Regex::new(r"^rgb\(\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})\s*\)$").ok()
        });

        let lower = input.trim().to_ascii_lowercase();
        let bad = || Error::Format(input.to_owned());

        if let Some(caps) = HEX6.as_ref().and_then(|re| re.captures(&lower)) {
            let ch = |i: usize| u8::from_str_radix(&caps[i], 16).map_err(|_| bad());
            return Ok(Self::new(ch(1)?, ch(2)?, ch(3)?));
        }
        if let Some(caps) = HEX3.as_ref().and_then(|re| re.captures(&lower)) {
            // Each digit is duplicated: #f80 == #ff8800.
            let ch = |i: usize| u8::from_str_radix(&caps[i], 16).map(|d| d * 17).map_err(|_| bad());
            return Ok(Self::new(ch(1)?, ch(2)?, ch(3)?));
        }
        if let Some(caps) = FUNC.as_ref().and_then(|re| re.captures(&lower)) {
            let ch = |i: usize| caps[i].parse::<i32>().map_err(|_| bad());
            return Self::rgb256(ch(1)?, ch(2)?, ch(3)?);
        }
        Err(bad())
    }

    /// The packed value, alpha byte included.
    #[inline]
    #[must_use]
    pub const fn packed(self) -> u32 {
        self.0
    }

    #[inline]
    #[must_use]
    pub const fn r(self) -> u8 {
        (self.0 >> 16) as u8
    }

    #[inline]
    #[must_use]
    pub const fn g(self) -> u8 {
        (self.0 >> 8) as u8
    }

    #[inline]
    #[must_use]
    pub const fn b(self) -> u8 {
        self.0 as u8
    }

    /// `(r, g, b)` channels.
    #[inline]
    #[must_use]
    pub const fn channels(self) -> (u8, u8, u8) {
        (self.r(), self.g(), self.b())
    }

    /// Lower-case `#rrggbb`.
    #[must_use]
    pub fn to_css(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r(), self.g(), self.b())
    }

    /// Truecolor SGR sequence for this color in the given role.
    #[must_use]
    pub fn to_escape_sequence(self, role: Role) -> String {
        format!(
            "\x1b[{};2;{};{};{}m",
            role.truecolor_selector(),
            self.r(),
            self.g(),
            self.b()
        )
    }
}

impl fmt::Debug for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}

fn channel256(what: &'static str, value: i32) -> Result<u8> {
    u8::try_from(value).map_err(|_| Error::range(what, f64::from(value), 0.0, 255.0))
}

fn unit(what: &'static str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(Error::range(what, value, 0.0, 1.0))
    }
}

/// `floor(c * 255)` for `c` already validated to `[0, 1]`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn scale(c: f64) -> u8 {
    (c * 255.0) as u8
}

fn hue_to_rgb(p: f64, q: f64, t: f64) -> f64 {
    let mut t = t;
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        return p + (q - p) * 6.0 * t;
    }
    if t < 1.0 / 2.0 {
        return q;
    }
    if t < 2.0 / 3.0 {
        return p + (q - p) * (2.0 / 3.0 - t) * 6.0;
    }
    p
}

// ─── Color ───────────────────────────────────────────────────────────────────

/// A cell color: packed RGB or a pre-rendered SGR escape.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    /// Truecolor, rendered per role.
    Rgb(Rgb),
    /// Escape string used verbatim regardless of role.
    Sgr(&'static str),
}

impl Color {
    /// Shorthand for `Color::Rgb(Rgb::new(r, g, b))`.
    #[inline]
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::Rgb(Rgb::new(r, g, b))
    }

    /// The escape sequence selecting this color in `role`.
    #[must_use]
    pub fn to_escape_sequence(self, role: Role) -> Cow<'static, str> {
        match self {
            Self::Rgb(rgb) => Cow::Owned(rgb.to_escape_sequence(role)),
            Self::Sgr(s) => Cow::Borrowed(s),
        }
    }

    /// The RGB value, if this is not a symbolic escape.
    #[inline]
    #[must_use]
    pub const fn as_rgb(self) -> Option<Rgb> {
        match self {
            Self::Rgb(rgb) => Some(rgb),
            Self::Sgr(_) => None,
        }
    }
}

impl From<Rgb> for Color {
    #[inline]
    fn from(rgb: Rgb) -> Self {
        Self::Rgb(rgb)
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rgb(rgb) => write!(f, "{rgb:?}"),
            Self::Sgr(s) => write!(f, "sgr({:?})", s.trim_start_matches('\x1b')),
        }
    }
}

/// Escape sequence for an optional color; unset means terminal default.
#[must_use]
pub fn escape_for(color: Option<Color>, role: Role) -> Cow<'static, str> {
    color.map_or(Cow::Borrowed(role.default_sequence()), |c| {
        c.to_escape_sequence(role)
    })
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // ── Packing ─────────────────────────────────────────────────────────

    #[test]
    fn new_packs_opaque() {
        assert_eq!(Rgb::new(0x12, 0x34, 0x56).packed(), 0xFF12_3456);
    }

    #[test]
    fn from_packed_forces_alpha() {
        let c = Rgb::from_packed(0x00AB_CDEF);
        assert_eq!(c.packed(), 0xFFAB_CDEF);
        assert_eq!(c.channels(), (0xAB, 0xCD, 0xEF));
    }

    #[test]
    fn from_packed_ignores_high_bits() {
        assert_eq!(Rgb::from_packed(0x1200_0001), Rgb::new(0, 0, 1));
    }

    // ── rgb256 ──────────────────────────────────────────────────────────

    #[test]
    fn rgb256_accepts_extremes() {
        assert_eq!(Rgb::rgb256(0, 0, 0).unwrap(), Rgb::new(0, 0, 0));
        assert_eq!(Rgb::rgb256(255, 255, 255).unwrap(), Rgb::new(255, 255, 255));
    }

    #[test]
    fn rgb256_rejects_out_of_range() {
        assert!(matches!(Rgb::rgb256(256, 0, 0), Err(Error::Range { what: "red", .. })));
        assert!(matches!(Rgb::rgb256(0, -1, 0), Err(Error::Range { what: "green", .. })));
        assert!(matches!(Rgb::rgb256(0, 0, 999), Err(Error::Range { what: "blue", .. })));
    }

    // ── rgb1 ────────────────────────────────────────────────────────────

    #[test]
    fn rgb1_truncates() {
        // 0.5 * 255 = 127.5 → 127, not 128.
        assert_eq!(Rgb::rgb1(0.5, 1.0, 0.0).unwrap(), Rgb::new(127, 255, 0));
        // 0.999 * 255 = 254.745 → 254.
        assert_eq!(Rgb::rgb1(0.999, 0.999, 0.999).unwrap(), Rgb::new(254, 254, 254));
    }

    #[test]
    fn rgb1_rejects_out_of_range_and_nan() {
        assert!(Rgb::rgb1(1.01, 0.0, 0.0).is_err());
        assert!(Rgb::rgb1(0.0, -0.1, 0.0).is_err());
        assert!(Rgb::rgb1(0.0, 0.0, f64::NAN).is_err());
    }

    // ── hsl1 ────────────────────────────────────────────────────────────

    #[test]
    fn hsl1_grey_does_not_divide_by_zero() {
        let grey = Rgb::hsl1(0.0, 0.0, 0.5).unwrap();
        for ch in [grey.r(), grey.g(), grey.b()] {
            assert!((126..=128).contains(&ch), "channel {ch}");
        }
        assert_eq!(
            Color::Rgb(grey).to_escape_sequence(Role::Foreground),
            "\x1b[38;2;127;127;127m"
        );
    }

    #[test]
    fn hsl1_primaries() {
        assert_eq!(Rgb::hsl1(0.0, 1.0, 0.5).unwrap(), Rgb::new(255, 0, 0));
        assert_eq!(Rgb::hsl1(1.0 / 3.0, 1.0, 0.5).unwrap().g(), 255);
        assert_eq!(Rgb::hsl1(2.0 / 3.0, 1.0, 0.5).unwrap().b(), 255);
    }

    #[test]
    fn hsl1_black_and_white() {
        assert_eq!(Rgb::hsl1(0.3, 0.5, 0.0).unwrap(), Rgb::new(0, 0, 0));
        assert_eq!(Rgb::hsl1(0.3, 0.5, 1.0).unwrap(), Rgb::new(255, 255, 255));
    }

    #[test]
    fn hsl1_rejects_out_of_range() {
        assert!(Rgb::hsl1(1.5, 0.5, 0.5).is_err());
        assert!(Rgb::hsl1(0.5, -0.5, 0.5).is_err());
        assert!(Rgb::hsl1(0.5, 0.5, 2.0).is_err());
    }

    // ── CSS ─────────────────────────────────────────────────────────────

    #[test]
    fn to_css_is_lower_hex() {
        assert_eq!(Rgb::rgb256(255, 128, 0).unwrap().to_css(), "#ff8000");
        assert_eq!(Rgb::new(1, 2, 3).to_css(), "#010203");
    }

    #[test]
    fn parse_css_long_hex() {
        assert_eq!(Rgb::parse_css("#ff8000").unwrap(), Rgb::new(255, 128, 0));
        assert_eq!(Rgb::parse_css("#FF8000").unwrap(), Rgb::new(255, 128, 0));
    }

    #[test]
    fn parse_css_short_hex_duplicates_digits() {
        assert_eq!(Rgb::parse_css("#f80").unwrap(), Rgb::new(0xFF, 0x88, 0x00));
        assert_eq!(Rgb::parse_css("#ABC").unwrap(), Rgb::new(0xAA, 0xBB, 0xCC));
    }

    #[test]
    fn parse_css_function() {
        assert_eq!(Rgb::parse_css("rgb(1,2,3)").unwrap(), Rgb::new(1, 2, 3));
        assert_eq!(Rgb::parse_css("RGB( 10 , 20 ,30 )").unwrap(), Rgb::new(10, 20, 30));
    }

    #[test]
    fn parse_css_rejects_garbage() {
        for bad in ["", "red", "#12", "#12345", "#gggggg", "rgb(1,2)", "rgba(1,2,3,4)", "ff8000"] {
            assert!(matches!(Rgb::parse_css(bad), Err(Error::Format(_))), "{bad}");
        }
    }

    #[test]
    fn parse_css_channel_over_255_is_range_error() {
        assert!(matches!(Rgb::parse_css("rgb(256,0,0)"), Err(Error::Range { .. })));
    }

    // ── Escape sequences ────────────────────────────────────────────────

    #[test]
    fn rgb_escape_per_role() {
        let red = Color::rgb(255, 0, 0);
        assert_eq!(red.to_escape_sequence(Role::Foreground), "\x1b[38;2;255;0;0m");
        assert_eq!(red.to_escape_sequence(Role::Background), "\x1b[48;2;255;0;0m");
    }

    #[test]
    fn sgr_escape_is_verbatim() {
        let std_red = Color::Sgr("\x1b[0;31m");
        assert_eq!(std_red.to_escape_sequence(Role::Foreground), "\x1b[0;31m");
        assert_eq!(std_red.to_escape_sequence(Role::Background), "\x1b[0;31m");
    }

    #[test]
    fn unset_color_is_terminal_default() {
        assert_eq!(escape_for(None, Role::Foreground), "\x1b[39m");
        assert_eq!(escape_for(None, Role::Background), "\x1b[49m");
    }

    #[test]
    fn debug_formats() {
        assert_eq!(format!("{:?}", Color::rgb(255, 0, 16)), "#ff0010");
        assert_eq!(format!("{:?}", Color::Sgr("\x1b[44m")), "sgr(\"[44m\")");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Packing then unpacking recovers every channel.
        #[test]
        fn rgb256_channels_round_trip(r in 0i32..=255, g in 0i32..=255, b in 0i32..=255) {
            let c = Rgb::rgb256(r, g, b).unwrap();
            prop_assert_eq!(
                (i32::from(c.r()), i32::from(c.g()), i32::from(c.b())),
                (r, g, b)
            );
            prop_assert_eq!(Rgb::from_packed(c.packed()), c);
        }

        /// CSS output parses back to the same color.
        #[test]
        fn css_round_trip(r in any::<u8>(), g in any::<u8>(), b in any::<u8>()) {
            let c = Rgb::new(r, g, b);
            prop_assert_eq!(Rgb::parse_css(&c.to_css()).unwrap(), c);
        }

        /// Fractional inputs inside the unit square never fail.
        #[test]
        fn hsl1_total_on_unit_cube(h in 0.0f64..=1.0, s in 0.0f64..=1.0, l in 0.0f64..=1.0) {
            prop_assert!(Rgb::hsl1(h, s, l).is_ok());
        }
    }
}
