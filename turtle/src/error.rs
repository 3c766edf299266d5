// turtle/src/error.rs
//
// Copyright © 2019 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::error::Error;
use std::fmt::{Display, Formatter, Result as FormatResult};
use uturtle::CallError;

/// Rejected input at the turtle boundary. The state is left untouched.
#[derive(Clone, Debug, PartialEq)]
pub enum TurtleError {
    /// A coordinate, distance, angle or size was NaN or infinite.
    NonFinite { operation: &'static str, value: f64 },
    /// Pen widths must be finite and strictly positive.
    InvalidWidth(f64),
    /// Color channels must lie in `[0, 1]` or `[0, 255]`.
    InvalidColorChannel(f64),
    /// Arc step counts must be finite and at least one.
    InvalidSteps(f64),
    /// Speeds run from 0 (slowest) to 10 (instant).
    InvalidSpeed(i64),
    /// Font sizes must be finite and strictly positive.
    InvalidFontSize(f64),
    Call(CallError),
}

impl Display for TurtleError {
    fn fmt(&self, formatter: &mut Formatter) -> FormatResult {
        match self {
            TurtleError::NonFinite { operation, value } => {
                write!(formatter, "{}: expected a finite number, got {}", operation, value)
            }
            TurtleError::InvalidWidth(width) => {
                write!(formatter, "pen width must be positive, got {}", width)
            }
            TurtleError::InvalidColorChannel(value) => {
                write!(formatter, "color channel out of range: {}", value)
            }
            TurtleError::InvalidSteps(steps) => {
                write!(formatter, "circle steps must be at least 1, got {}", steps)
            }
            TurtleError::InvalidSpeed(speed) => {
                write!(formatter, "speed must be between 0 and 10, got {}", speed)
            }
            TurtleError::InvalidFontSize(size) => {
                write!(formatter, "font size must be positive, got {}", size)
            }
            TurtleError::Call(err) => err.fmt(formatter),
        }
    }
}

impl Error for TurtleError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            TurtleError::Call(err) => Some(err),
            _ => None,
        }
    }
}

impl From<CallError> for TurtleError {
    fn from(err: CallError) -> TurtleError {
        TurtleError::Call(err)
    }
}

/// Rejects NaN and infinities on behalf of `operation`.
pub(crate) fn finite(operation: &'static str, value: f64) -> Result<f64, TurtleError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(TurtleError::NonFinite { operation, value })
    }
}
