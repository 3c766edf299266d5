// uturtle/src/ast.rs
//
// Copyright © 2019 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

// Operation names follow the classic turtle vocabulary.

/// A positional argument as supplied by the host.
#[derive(Clone, Debug, PartialEq)]
pub enum Arg {
    Number(f64),
    Text(String),
    Pair(f64, f64),
}

/// A color argument before it is validated into a drawable color.
#[derive(Clone, Debug, PartialEq)]
pub enum ColorSpec {
    Named(String),
    Channels(f64, f64, f64),
}

/// Horizontal alignment of `write` text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

impl Default for Align {
    fn default() -> Align {
        Align::Left
    }
}

impl Align {
    pub fn from_name(name: &str) -> Option<Align> {
        match name {
            "left" => Some(Align::Left),
            "center" => Some(Align::Center),
            "right" => Some(Align::Right),
            _ => None,
        }
    }
}

/// One resolved turtle call. Every alias maps onto exactly one variant.
#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    Forward(f64),
    Backward(f64),
    Right(f64),
    Left(f64),
    Goto(f64, f64),
    SetX(f64),
    SetY(f64),
    SetHeading(f64),
    Home,
    PenUp,
    PenDown,
    IsDown,
    PenColor(ColorSpec),
    FillColor(ColorSpec),
    Color(ColorSpec, Option<ColorSpec>),
    Width(Option<f64>),
    BeginFill,
    EndFill,
    Circle {
        radius: f64,
        extent: f64,
        steps: Option<f64>,
    },
    Dot {
        size: Option<f64>,
        color: Option<ColorSpec>,
    },
    Write {
        text: String,
        align: Align,
        font: Option<(String, f64, String)>,
    },
    Clear,
    Reset,
    BgColor(ColorSpec),
    HideTurtle,
    ShowTurtle,
    IsVisible,
    Position,
    XCor,
    YCor,
    Heading,
    Distance(f64, f64),
    Stamp,
    /// Accepted for compatibility and otherwise ignored (`speed`, `tracer`, ...).
    NoOp,
}

pub type Program = Vec<Call>;
