// turtle/src/render.rs
//
// Copyright © 2019 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Executes draw commands on a [`Surface`].

use crate::color::Color;
use crate::command::{Command, Point};
use crate::surface::Surface;

/// Apex distance of the turtle glyph, in pixels.
const GLYPH_SIZE: f64 = 10.0;
const GLYPH_FILL: &str = "#22aa44";
const GLYPH_OUTLINE: &str = "#115522";
const GLYPH_OUTLINE_WIDTH: f64 = 1.5;

/// Arrowhead outline pointing along +x, y down.
const GLYPH_SHAPE: [Point; 4] = [
    (GLYPH_SIZE, 0.0),
    (-GLYPH_SIZE * 0.7, GLYPH_SIZE * 0.5),
    (-GLYPH_SIZE * 0.4, 0.0),
    (-GLYPH_SIZE * 0.7, -GLYPH_SIZE * 0.5),
];

pub struct CanvasRenderer<S> {
    surface: S,
}

impl<S: Surface> CanvasRenderer<S> {
    pub fn new(surface: S) -> CanvasRenderer<S> {
        CanvasRenderer { surface }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Maps turtle coordinates (origin centered, y up) to device pixels.
    pub fn to_device(&self, x: f64, y: f64) -> Point {
        let (width, height) = self.surface.size();
        (width as f64 / 2.0 + x, height as f64 / 2.0 - y)
    }

    pub fn execute(&mut self, command: &Command) {
        match command {
            Command::Line {
                x1,
                y1,
                x2,
                y2,
                color,
                width,
            } => {
                let from = self.to_device(*x1, *y1);
                let to = self.to_device(*x2, *y2);
                self.surface.stroke_line(from, to, color, *width);
            }
            Command::Move { .. } => {}
            Command::Dot { x, y, r, color } => {
                let center = self.to_device(*x, *y);
                self.surface.fill_circle(center, *r, color);
            }
            Command::Fill { points, color } => {
                if points.len() < 2 {
                    return;
                }
                let points: Vec<Point> = points.iter().map(|&(x, y)| self.to_device(x, y)).collect();
                self.surface.fill_polygon(&points, color);
            }
            Command::Write {
                x,
                y,
                text,
                font,
                color,
                align,
            } => {
                let origin = self.to_device(*x, *y);
                self.surface.fill_text(origin, text, font, color, *align);
            }
            Command::Clear => self.surface.clear(),
            Command::BgColor { color } => self.surface.set_background(color),
            Command::Turtle {
                x,
                y,
                angle,
                visible,
            } => {
                if *visible {
                    self.draw_glyph(*x, *y, *angle);
                }
            }
            Command::Unsupported => {}
        }
    }

    pub fn execute_all<'a, I>(&mut self, commands: I)
    where
        I: IntoIterator<Item = &'a Command>,
    {
        for command in commands {
            self.execute(command);
        }
    }

    fn draw_glyph(&mut self, x: f64, y: f64, angle: f64) {
        let (cx, cy) = self.to_device(x, y);
        let (s, c) = angle.to_radians().sin_cos();
        // Device y points down, so a counterclockwise heading rotates by -angle.
        let outline: Vec<Point> = GLYPH_SHAPE
            .iter()
            .map(|&(px, py)| (cx + px * c + py * s, cy - px * s + py * c))
            .collect();
        self.surface
            .fill_polygon(&outline, &Color::from_named(GLYPH_FILL));
        self.surface.stroke_polygon(
            &outline,
            &Color::from_named(GLYPH_OUTLINE),
            GLYPH_OUTLINE_WIDTH,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Font;
    use crate::surface::{DrawOp, RecordingSurface};
    use uturtle::ast::Align;

    fn renderer() -> CanvasRenderer<RecordingSurface> {
        CanvasRenderer::new(RecordingSurface::new(200, 100))
    }

    #[test]
    fn test_coordinate_mapping() {
        let r = renderer();
        assert_eq!(r.to_device(0.0, 0.0), (100.0, 50.0));
        assert_eq!(r.to_device(10.0, 20.0), (110.0, 30.0));
        assert_eq!(r.to_device(-100.0, -50.0), (0.0, 100.0));
    }

    #[test]
    fn test_line_and_dot() {
        let mut r = renderer();
        r.execute(&Command::Line {
            x1: 0.0,
            y1: 0.0,
            x2: 0.0,
            y2: -50.0,
            color: Color::from_named("red"),
            width: 3.0,
        });
        r.execute(&Command::Move { x: 5.0, y: 5.0 });
        r.execute(&Command::Dot {
            x: 1.0,
            y: 1.0,
            r: 4.0,
            color: Color::black(),
        });
        assert_eq!(
            r.surface().ops,
            vec![
                DrawOp::StrokeLine {
                    from: (100.0, 50.0),
                    to: (100.0, 100.0),
                    color: Color::from_named("red"),
                    width: 3.0,
                },
                DrawOp::FillCircle {
                    center: (101.0, 49.0),
                    radius: 4.0,
                    color: Color::black(),
                },
            ]
        );
    }

    #[test]
    fn test_fill_write_clear_bgcolor() {
        let mut r = renderer();
        r.execute(&Command::Fill {
            points: vec![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)],
            color: Color::from_named("blue"),
        });
        r.execute(&Command::Fill {
            points: vec![(0.0, 0.0)],
            color: Color::from_named("blue"),
        });
        r.execute(&Command::Write {
            x: 0.0,
            y: 0.0,
            text: "hi".to_owned(),
            font: Font::default(),
            color: Color::black(),
            align: Align::Right,
        });
        r.execute(&Command::Clear);
        r.execute(&Command::BgColor {
            color: Color::from_named("navy"),
        });
        r.execute(&Command::Unsupported);
        assert_eq!(
            r.surface().ops,
            vec![
                DrawOp::FillPolygon {
                    points: vec![(100.0, 50.0), (110.0, 50.0), (110.0, 40.0)],
                    color: Color::from_named("blue"),
                },
                DrawOp::FillText {
                    origin: (100.0, 50.0),
                    text: "hi".to_owned(),
                    font: "normal 12px Arial".to_owned(),
                    color: Color::black(),
                    align: Align::Right,
                },
                DrawOp::Clear,
                DrawOp::SetBackground(Color::from_named("navy")),
            ]
        );
    }

    #[test]
    fn test_glyph() {
        let mut r = renderer();
        r.execute(&Command::Turtle {
            x: 0.0,
            y: 0.0,
            angle: 90.0,
            visible: false,
        });
        assert!(r.surface().ops.is_empty());

        r.execute(&Command::Turtle {
            x: 0.0,
            y: 0.0,
            angle: 90.0,
            visible: true,
        });
        match r.surface().ops.as_slice() {
            [DrawOp::FillPolygon { points, color }, DrawOp::StrokePolygon { points: outline, width, .. }] => {
                assert_eq!(points, outline);
                assert_eq!(color.as_str(), GLYPH_FILL);
                assert_eq!(*width, GLYPH_OUTLINE_WIDTH);
                // Heading 90° points the apex straight up the screen.
                let (ax, ay) = points[0];
                assert!((ax - 100.0).abs() < 1e-9);
                assert!((ay - 40.0).abs() < 1e-9);
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
