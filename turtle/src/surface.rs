// turtle/src/surface.rs
//
// Copyright © 2019 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Drawing surfaces.
//!
//! A [`Surface`] works in device pixels: origin at the top-left corner, y
//! growing downward. [`crate::render::CanvasRenderer`] does the mapping from
//! turtle coordinates.

use crate::color::Color;
use crate::command::{Font, Point};
use uturtle::ast::Align;

pub trait Surface {
    /// Width and height in pixels.
    fn size(&self) -> (u32, u32);

    /// Strokes a round-capped segment.
    fn stroke_line(&mut self, from: Point, to: Point, color: &Color, width: f64);

    fn fill_circle(&mut self, center: Point, radius: f64, color: &Color);

    /// Fills the closed polygon through `points`.
    fn fill_polygon(&mut self, points: &[Point], color: &Color);

    /// Strokes the outline of the closed polygon through `points`.
    fn stroke_polygon(&mut self, points: &[Point], color: &Color, width: f64);

    /// Draws `text` with its baseline at `origin.1`, aligned on `origin.0`.
    fn fill_text(&mut self, origin: Point, text: &str, font: &Font, color: &Color, align: Align);

    /// Wipes every mark. The background stays.
    fn clear(&mut self);

    fn set_background(&mut self, color: &Color);
}

/// Size and initial background of a surface.
#[derive(Clone, Debug, PartialEq)]
pub struct SurfaceConfig {
    pub width: u32,
    pub height: u32,
    pub background: Color,
}

impl Default for SurfaceConfig {
    fn default() -> SurfaceConfig {
        SurfaceConfig {
            width: 600,
            height: 400,
            background: Color::from_named("white"),
        }
    }
}

/// A device-space drawing operation, as seen by a [`RecordingSurface`].
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    StrokeLine {
        from: Point,
        to: Point,
        color: Color,
        width: f64,
    },
    FillCircle {
        center: Point,
        radius: f64,
        color: Color,
    },
    FillPolygon {
        points: Vec<Point>,
        color: Color,
    },
    StrokePolygon {
        points: Vec<Point>,
        color: Color,
        width: f64,
    },
    FillText {
        origin: Point,
        text: String,
        font: String,
        color: Color,
        align: Align,
    },
    Clear,
    SetBackground(Color),
}

/// Records operations instead of drawing them.
#[derive(Clone, Debug)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    pub ops: Vec<DrawOp>,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> RecordingSurface {
        RecordingSurface {
            width,
            height,
            ops: vec![],
        }
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn stroke_line(&mut self, from: Point, to: Point, color: &Color, width: f64) {
        self.ops.push(DrawOp::StrokeLine {
            from,
            to,
            color: color.clone(),
            width,
        });
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: &Color) {
        self.ops.push(DrawOp::FillCircle {
            center,
            radius,
            color: color.clone(),
        });
    }

    fn fill_polygon(&mut self, points: &[Point], color: &Color) {
        self.ops.push(DrawOp::FillPolygon {
            points: points.to_vec(),
            color: color.clone(),
        });
    }

    fn stroke_polygon(&mut self, points: &[Point], color: &Color, width: f64) {
        self.ops.push(DrawOp::StrokePolygon {
            points: points.to_vec(),
            color: color.clone(),
            width,
        });
    }

    fn fill_text(&mut self, origin: Point, text: &str, font: &Font, color: &Color, align: Align) {
        self.ops.push(DrawOp::FillText {
            origin,
            text: text.to_owned(),
            font: font.to_string(),
            color: color.clone(),
            align,
        });
    }

    fn clear(&mut self) {
        self.ops.push(DrawOp::Clear);
    }

    fn set_background(&mut self, color: &Color) {
        self.ops.push(DrawOp::SetBackground(color.clone()));
    }
}
