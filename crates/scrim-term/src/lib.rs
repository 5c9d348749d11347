// SPDX-License-Identifier: MIT
//
// scrim-term — screen buffer engine for scrim.
//
// A fixed-size grid of single code-point cells, each with an optional
// character, background and foreground color, and a changed flag. Drawing
// only touches the grid. Painting walks the grid once, groups changed
// cells into horizontal runs, and writes each run as one positioned
// string, emitting a color escape only where the color actually changes.
//
// Layering:
//
//   color, mapper     → packed RGB, symbolic SGR, cached escape strings
//   cell, grid, frame → the drawing surface and its primitives
//   paint, output     → damage-tracked repaint through a Screen
//   terminal, keys,
//   reader            → raw mode, key decoding, timed input

pub mod ansi;
pub mod cell;
pub mod color;
pub mod error;
pub mod frame;
pub mod grid;
pub mod keys;
pub mod mapper;
pub mod output;
pub mod paint;
pub mod reader;
pub mod rect;
pub mod terminal;

#[cfg(test)]
mod replay;

pub use error::{Error, Result};
