// turtle/src/color.rs
//
// Copyright © 2019 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Pen, fill and background colors.
//!
//! A [`Color`] is kept as the CSS-style string the drawing surface expects
//! (`"red"`, `"#ff8800"`, `"rgb(255,0,0)"`). It is only resolved to pixels by
//! surfaces that need them, through [`Color::to_color_u`].

use crate::error::TurtleError;
use serde_derive::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FormatResult};
use uturtle::ast::ColorSpec;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(String);

impl Color {
    pub fn black() -> Color {
        Color("black".to_owned())
    }

    pub fn from_named<S: Into<String>>(name: S) -> Color {
        Color(name.into())
    }

    /// Builds `rgb(r,g,b)` from three channels. Each channel is read as a
    /// fraction when it is at most 1.0 and as an 8-bit value otherwise.
    pub fn from_channels(r: f64, g: f64, b: f64) -> Result<Color, TurtleError> {
        let r = channel(r)?;
        let g = channel(g)?;
        let b = channel(b)?;
        Ok(Color(format!("rgb({},{},{})", r, g, b)))
    }

    pub fn from_spec(spec: &ColorSpec) -> Result<Color, TurtleError> {
        match spec {
            ColorSpec::Named(name) => Ok(Color::from_named(name.as_str())),
            ColorSpec::Channels(r, g, b) => Color::from_channels(*r, *g, *b),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Resolves the color for rasterization, if it can be understood.
    pub fn to_color_u(&self) -> Option<ColorU> {
        ColorU::parse(&self.0)
    }
}

impl Display for Color {
    fn fmt(&self, formatter: &mut Formatter) -> FormatResult {
        formatter.write_str(&self.0)
    }
}

fn channel(value: f64) -> Result<u8, TurtleError> {
    if !value.is_finite() || value < 0.0 || value > 255.0 {
        return Err(TurtleError::InvalidColorChannel(value));
    }
    let scaled = if value <= 1.0 { value * 255.0 } else { value };
    Ok(scaled as u8)
}

/// An 8-bit RGBA color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct ColorU {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl ColorU {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> ColorU {
        ColorU { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> ColorU {
        ColorU { r, g, b, a: 255 }
    }

    pub const BLACK: ColorU = ColorU::rgb(0, 0, 0);
    pub const WHITE: ColorU = ColorU::rgb(255, 255, 255);
    pub const TRANSPARENT: ColorU = ColorU::new(0, 0, 0, 0);

    /// Parses a color name, `#rgb`, `#rrggbb`, `rgb(r,g,b)` or `rgba(r,g,b,a)`.
    pub fn parse(text: &str) -> Option<ColorU> {
        let text = text.trim().to_ascii_lowercase();
        if let Some(hex) = text.strip_prefix('#') {
            return parse_hex(hex);
        }
        if let Some(body) = text.strip_prefix("rgba(").and_then(|t| t.strip_suffix(')')) {
            let parts: Vec<&str> = body.split(',').map(str::trim).collect();
            if parts.len() != 4 {
                return None;
            }
            let alpha: f64 = parts[3].parse().ok()?;
            if !(0.0..=1.0).contains(&alpha) {
                return None;
            }
            return Some(ColorU::new(
                parts[0].parse().ok()?,
                parts[1].parse().ok()?,
                parts[2].parse().ok()?,
                (alpha * 255.0).round() as u8,
            ));
        }
        if let Some(body) = text.strip_prefix("rgb(").and_then(|t| t.strip_suffix(')')) {
            let parts: Vec<&str> = body.split(',').map(str::trim).collect();
            if parts.len() != 3 {
                return None;
            }
            return Some(ColorU::rgb(
                parts[0].parse().ok()?,
                parts[1].parse().ok()?,
                parts[2].parse().ok()?,
            ));
        }
        NAMED_COLORS
            .iter()
            .find(|(name, _)| *name == text)
            .map(|&(_, color)| color)
    }
}

fn parse_hex(hex: &str) -> Option<ColorU> {
    let digit = |c: char| c.to_digit(16).map(|d| d as u8);
    let chars: Vec<char> = hex.chars().collect();
    match chars.len() {
        3 => Some(ColorU::rgb(
            digit(chars[0])? * 17,
            digit(chars[1])? * 17,
            digit(chars[2])? * 17,
        )),
        6 => Some(ColorU::rgb(
            digit(chars[0])? * 16 + digit(chars[1])?,
            digit(chars[2])? * 16 + digit(chars[3])?,
            digit(chars[4])? * 16 + digit(chars[5])?,
        )),
        _ => None,
    }
}

static NAMED_COLORS: &[(&str, ColorU)] = &[
    ("black", ColorU::rgb(0, 0, 0)),
    ("white", ColorU::rgb(255, 255, 255)),
    ("red", ColorU::rgb(255, 0, 0)),
    ("green", ColorU::rgb(0, 128, 0)),
    ("lime", ColorU::rgb(0, 255, 0)),
    ("blue", ColorU::rgb(0, 0, 255)),
    ("yellow", ColorU::rgb(255, 255, 0)),
    ("orange", ColorU::rgb(255, 165, 0)),
    ("purple", ColorU::rgb(128, 0, 128)),
    ("pink", ColorU::rgb(255, 192, 203)),
    ("brown", ColorU::rgb(165, 42, 42)),
    ("gray", ColorU::rgb(128, 128, 128)),
    ("grey", ColorU::rgb(128, 128, 128)),
    ("silver", ColorU::rgb(192, 192, 192)),
    ("cyan", ColorU::rgb(0, 255, 255)),
    ("aqua", ColorU::rgb(0, 255, 255)),
    ("magenta", ColorU::rgb(255, 0, 255)),
    ("fuchsia", ColorU::rgb(255, 0, 255)),
    ("navy", ColorU::rgb(0, 0, 128)),
    ("teal", ColorU::rgb(0, 128, 128)),
    ("maroon", ColorU::rgb(128, 0, 0)),
    ("olive", ColorU::rgb(128, 128, 0)),
    ("gold", ColorU::rgb(255, 215, 0)),
    ("violet", ColorU::rgb(238, 130, 238)),
    ("indigo", ColorU::rgb(75, 0, 130)),
    ("coral", ColorU::rgb(255, 127, 80)),
    ("salmon", ColorU::rgb(250, 128, 114)),
    ("tomato", ColorU::rgb(255, 99, 71)),
    ("turquoise", ColorU::rgb(64, 224, 208)),
    ("skyblue", ColorU::rgb(135, 206, 235)),
    ("lightblue", ColorU::rgb(173, 216, 230)),
    ("lightgreen", ColorU::rgb(144, 238, 144)),
    ("lightgray", ColorU::rgb(211, 211, 211)),
    ("lightgrey", ColorU::rgb(211, 211, 211)),
    ("darkblue", ColorU::rgb(0, 0, 139)),
    ("darkgreen", ColorU::rgb(0, 100, 0)),
    ("darkred", ColorU::rgb(139, 0, 0)),
    ("darkgray", ColorU::rgb(169, 169, 169)),
    ("darkgrey", ColorU::rgb(169, 169, 169)),
    ("beige", ColorU::rgb(245, 245, 220)),
    ("khaki", ColorU::rgb(240, 230, 140)),
    ("chocolate", ColorU::rgb(210, 105, 30)),
    ("transparent", ColorU::TRANSPARENT),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channels_fractional_and_integer() {
        assert_eq!(Color::from_channels(1.0, 0.5, 0.0).unwrap().as_str(), "rgb(255,127,0)");
        assert_eq!(Color::from_channels(255.0, 128.0, 3.0).unwrap().as_str(), "rgb(255,128,3)");
        // Values above 1.0 are taken as 8-bit, even when small.
        assert_eq!(Color::from_channels(2.0, 0.0, 0.0).unwrap().as_str(), "rgb(2,0,0)");
    }

    #[test]
    fn test_channels_out_of_range() {
        assert_eq!(
            Color::from_channels(256.0, 0.0, 0.0),
            Err(TurtleError::InvalidColorChannel(256.0))
        );
        assert!(Color::from_channels(-0.1, 0.0, 0.0).is_err());
        assert!(Color::from_channels(0.0, std::f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_parse() {
        assert_eq!(ColorU::parse("Red"), Some(ColorU::rgb(255, 0, 0)));
        assert_eq!(ColorU::parse("#0f0"), Some(ColorU::rgb(0, 255, 0)));
        assert_eq!(ColorU::parse("#22aa44"), Some(ColorU::rgb(0x22, 0xaa, 0x44)));
        assert_eq!(ColorU::parse("rgb(1, 2, 3)"), Some(ColorU::rgb(1, 2, 3)));
        assert_eq!(ColorU::parse("rgba(1,2,3,0.5)"), Some(ColorU::new(1, 2, 3, 128)));
        assert_eq!(ColorU::parse("rgb(300,0,0)"), None);
        assert_eq!(ColorU::parse("#12"), None);
        assert_eq!(ColorU::parse("no-such-color"), None);
    }

    #[test]
    fn test_channels_resolve() {
        let color = Color::from_channels(0.0, 0.0, 1.0).unwrap();
        assert_eq!(color.to_color_u(), Some(ColorU::rgb(0, 0, 255)));
    }
}
