// SPDX-License-Identifier: MIT
//
// Error taxonomy for the screen engine.
//
// Every error here is local and synchronous: it is raised at the call that
// received the bad input and handed straight back to the caller. Nothing in
// this crate retries, swallows, or logs an error. Callers that want partial
// or no-op behavior on bad coordinates use the `_safe` write variants.

use std::io;

/// Errors produced by color construction, grid writes, and painting.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A numeric color channel or fractional input outside its domain.
    #[error("{what} must be in [{min}, {max}] (got {value})")]
    Range {
        what: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// A CSS color string that is not `#rrggbb`, `#rgb`, or `rgb(r,g,b)`.
    #[error("not a CSS color: {0:?}")]
    Format(String),

    /// A character argument that is not exactly one code point, or an
    /// empty text run.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A coordinate or rectangle outside the grid (strict writes only).
    #[error("({x}, {y}) {extent}is outside the {width}x{height} grid")]
    OutOfBounds {
        x: i32,
        y: i32,
        /// Human-readable extent suffix, e.g. `"+4x2 "`, or empty.
        extent: String,
        width: u16,
        height: u16,
    },

    /// The terminal write primitive failed. Partial output is not rolled back.
    #[error("terminal write failed: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    pub(crate) fn range(what: &'static str, value: f64, min: f64, max: f64) -> Self {
        Self::Range {
            what,
            value,
            min,
            max,
        }
    }

    pub(crate) fn point_out_of_bounds(x: i32, y: i32, width: u16, height: u16) -> Self {
        Self::OutOfBounds {
            x,
            y,
            extent: String::new(),
            width,
            height,
        }
    }

    pub(crate) fn rect_out_of_bounds(
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        width: u16,
        height: u16,
    ) -> Self {
        Self::OutOfBounds {
            x,
            y,
            extent: format!("+{w}x{h} "),
            width,
            height,
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_message_names_the_input() {
        let err = Error::range("red", 256.0, 0.0, 255.0);
        assert_eq!(err.to_string(), "red must be in [0, 255] (got 256)");
    }

    #[test]
    fn out_of_bounds_point_message() {
        let err = Error::point_out_of_bounds(5, 0, 3, 1);
        assert_eq!(err.to_string(), "(5, 0) is outside the 3x1 grid");
    }

    #[test]
    fn out_of_bounds_rect_message() {
        let err = Error::rect_out_of_bounds(1, 1, 4, 2, 3, 3);
        assert_eq!(err.to_string(), "(1, 1) +4x2 is outside the 3x3 grid");
    }

    #[test]
    fn io_errors_convert() {
        let err: Error = io::Error::new(io::ErrorKind::BrokenPipe, "gone").into();
        assert!(matches!(err, Error::Io(_)));
    }
}
