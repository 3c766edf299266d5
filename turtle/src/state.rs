// turtle/src/state.rs
//
// Copyright © 2019 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The turtle state machine.
//!
//! Every state-changing operation that leaves a trace on the canvas appends
//! one [`Command`] to the state's queue. Headings are in degrees, 0° along +x,
//! counterclockwise positive, always normalized to `[0, 360)`.

use crate::circle::{ArcPlan, ArcStep};
use crate::color::Color;
use crate::command::{Command, CommandQueue, Font, Point};
use crate::error::{finite, TurtleError};
use std::mem;
use uturtle::ast::{Align, Call};

/// Value returned by query calls.
#[derive(Clone, Debug, PartialEq)]
pub enum Reply {
    None,
    Number(f64),
    Bool(bool),
    Point(Point),
}

/// Pose and queue lengths to return to when a compound move fails.
#[derive(Clone, Copy)]
struct Checkpoint {
    pos_x: f64,
    pos_y: f64,
    heading: f64,
    fill_points: Option<usize>,
    commands: usize,
}

#[derive(Clone, Debug)]
pub struct TurtleState {
    pos_x: f64,
    pos_y: f64,
    heading: f64,
    pen_down: bool,
    pen_color: Color,
    fill_color: Color,
    pen_width: f64,
    visible: bool,
    // Points visited since `begin_fill`, `None` while not filling.
    fill_points: Option<Vec<Point>>,
    commands: CommandQueue,
}

impl Default for TurtleState {
    fn default() -> TurtleState {
        TurtleState::new()
    }
}

impl TurtleState {
    pub fn new() -> TurtleState {
        TurtleState {
            pos_x: 0.0,
            pos_y: 0.0,
            heading: 0.0,
            pen_down: true,
            pen_color: Color::black(),
            fill_color: Color::black(),
            pen_width: 1.0,
            visible: true,
            fill_points: None,
            commands: CommandQueue::new(),
        }
    }

    pub fn commands(&self) -> &CommandQueue {
        &self.commands
    }

    /// Hands over the queue, leaving an empty one behind.
    pub fn take_commands(&mut self) -> CommandQueue {
        mem::replace(&mut self.commands, CommandQueue::new())
    }

    pub(crate) fn clear_commands(&mut self) {
        self.commands.clear();
    }

    // Movement

    pub fn forward(&mut self, distance: f64) -> Result<(), TurtleError> {
        let distance = finite("forward", distance)?;
        let (s, c) = self.heading.to_radians().sin_cos();
        let to_x = finite("forward", self.pos_x + distance * c)?;
        let to_y = finite("forward", self.pos_y + distance * s)?;
        self.move_to(to_x, to_y);
        Ok(())
    }

    pub fn backward(&mut self, distance: f64) -> Result<(), TurtleError> {
        let distance = finite("backward", distance)?;
        self.forward(-distance)
    }

    pub fn goto(&mut self, x: f64, y: f64) -> Result<(), TurtleError> {
        let x = finite("goto", x)?;
        let y = finite("goto", y)?;
        self.move_to(x, y);
        Ok(())
    }

    pub fn goto_point(&mut self, (x, y): Point) -> Result<(), TurtleError> {
        self.goto(x, y)
    }

    pub fn set_x(&mut self, x: f64) -> Result<(), TurtleError> {
        let x = finite("setx", x)?;
        self.move_to(x, self.pos_y);
        Ok(())
    }

    pub fn set_y(&mut self, y: f64) -> Result<(), TurtleError> {
        let y = finite("sety", y)?;
        self.move_to(self.pos_x, y);
        Ok(())
    }

    pub fn home(&mut self) {
        self.move_to(0.0, 0.0);
        self.heading = 0.0;
    }

    fn move_to(&mut self, to_x: f64, to_y: f64) {
        if self.pen_down {
            self.commands.push(Command::Line {
                x1: self.pos_x,
                y1: self.pos_y,
                x2: to_x,
                y2: to_y,
                color: self.pen_color.clone(),
                width: self.pen_width,
            });
        } else {
            self.commands.push(Command::Move { x: to_x, y: to_y });
        }

        if let Some(ref mut points) = self.fill_points {
            points.push((self.pos_x, self.pos_y));
        }

        self.pos_x = to_x;
        self.pos_y = to_y;
    }

    // Heading

    pub fn turn_right(&mut self, angle: f64) -> Result<(), TurtleError> {
        let angle = finite("right", angle)?;
        self.heading = normalize(self.heading - angle);
        Ok(())
    }

    pub fn turn_left(&mut self, angle: f64) -> Result<(), TurtleError> {
        let angle = finite("left", angle)?;
        self.heading = normalize(self.heading + angle);
        Ok(())
    }

    pub fn set_heading(&mut self, angle: f64) -> Result<(), TurtleError> {
        let angle = finite("setheading", angle)?;
        self.heading = normalize(angle);
        Ok(())
    }

    // Pen

    pub fn pen_up(&mut self) {
        self.pen_down = false;
    }

    pub fn pen_down(&mut self) {
        self.pen_down = true;
    }

    pub fn set_pen_color(&mut self, color: Color) {
        self.pen_color = color;
    }

    pub fn set_fill_color(&mut self, color: Color) {
        self.fill_color = color;
    }

    /// Sets pen and fill to the same color.
    pub fn set_color(&mut self, color: Color) {
        self.pen_color = color.clone();
        self.fill_color = color;
    }

    pub fn set_colors(&mut self, pen: Color, fill: Color) {
        self.pen_color = pen;
        self.fill_color = fill;
    }

    pub fn pen_color(&self) -> &Color {
        &self.pen_color
    }

    pub fn fill_color(&self) -> &Color {
        &self.fill_color
    }

    pub fn width(&self) -> f64 {
        self.pen_width
    }

    pub fn set_width(&mut self, width: f64) -> Result<(), TurtleError> {
        if !width.is_finite() || width <= 0.0 {
            return Err(TurtleError::InvalidWidth(width));
        }
        self.pen_width = width;
        Ok(())
    }

    // Filling

    pub fn begin_fill(&mut self) {
        self.fill_points = Some(vec![(self.pos_x, self.pos_y)]);
    }

    /// Closes the polygon at the current position. Nothing is emitted unless at
    /// least two points were visited; fill state is cleared either way.
    pub fn end_fill(&mut self) {
        if let Some(mut points) = self.fill_points.take() {
            if points.len() >= 2 {
                points.push((self.pos_x, self.pos_y));
                self.commands.push(Command::Fill {
                    points,
                    color: self.fill_color.clone(),
                });
            }
        }
    }

    pub fn is_filling(&self) -> bool {
        self.fill_points.is_some()
    }

    // Shapes and marks

    /// Draws an arc of `extent` degrees with the center `radius` units to the
    /// left (to the right for a negative radius). On error the arc is undone.
    pub fn circle(
        &mut self,
        radius: f64,
        extent: f64,
        steps: Option<f64>,
    ) -> Result<(), TurtleError> {
        let plan = ArcPlan::new(radius, extent, steps)?;
        let checkpoint = self.checkpoint();
        for step in plan.moves() {
            let moved = match step {
                ArcStep::Turn(angle) => self.turn_left(angle),
                ArcStep::Forward(distance) => self.forward(distance),
            };
            if let Err(err) = moved {
                self.rollback(checkpoint);
                return Err(err);
            }
        }
        Ok(())
    }

    fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            pos_x: self.pos_x,
            pos_y: self.pos_y,
            heading: self.heading,
            fill_points: self.fill_points.as_ref().map(Vec::len),
            commands: self.commands.len(),
        }
    }

    fn rollback(&mut self, checkpoint: Checkpoint) {
        self.pos_x = checkpoint.pos_x;
        self.pos_y = checkpoint.pos_y;
        self.heading = checkpoint.heading;
        if let (Some(points), Some(len)) = (self.fill_points.as_mut(), checkpoint.fill_points) {
            points.truncate(len);
        }
        self.commands.truncate(checkpoint.commands);
    }

    /// A filled dot at the current position. A missing or zero size picks a
    /// diameter from the pen width.
    pub fn dot(&mut self, size: Option<f64>, color: Option<Color>) -> Result<(), TurtleError> {
        let diameter = match size {
            Some(size) => finite("dot", size)?.abs(),
            None => 0.0,
        };
        let diameter = if diameter == 0.0 {
            f64::max(self.pen_width + 4.0, 2.0 * self.pen_width)
        } else {
            diameter
        };
        self.commands.push(Command::Dot {
            x: self.pos_x,
            y: self.pos_y,
            r: diameter / 2.0,
            color: color.unwrap_or_else(|| self.pen_color.clone()),
        });
        Ok(())
    }

    pub fn write<S: Into<String>>(
        &mut self,
        text: S,
        align: Align,
        font: Option<Font>,
    ) -> Result<(), TurtleError> {
        let font = font.unwrap_or_default();
        if !font.size.is_finite() || font.size <= 0.0 {
            return Err(TurtleError::InvalidFontSize(font.size));
        }
        self.commands.push(Command::Write {
            x: self.pos_x,
            y: self.pos_y,
            text: text.into(),
            font,
            color: self.pen_color.clone(),
            align,
        });
        Ok(())
    }

    pub fn clear(&mut self) {
        self.commands.push(Command::Clear);
    }

    pub fn bgcolor(&mut self, color: Color) {
        self.commands.push(Command::BgColor { color });
    }

    /// Restores every default and wipes the canvas. The queue is kept.
    pub fn reset(&mut self) {
        let commands = self.take_commands();
        *self = TurtleState {
            commands,
            ..TurtleState::new()
        };
        self.clear();
    }

    /// Snapshots the turtle glyph into the queue.
    pub fn stamp(&mut self) {
        self.commands.push(Command::Turtle {
            x: self.pos_x,
            y: self.pos_y,
            angle: self.heading,
            visible: self.visible,
        });
    }

    // Visibility

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn show(&mut self) {
        self.visible = true;
    }

    // Queries

    pub fn position(&self) -> Point {
        (self.pos_x, self.pos_y)
    }

    pub fn xcor(&self) -> f64 {
        self.pos_x
    }

    pub fn ycor(&self) -> f64 {
        self.pos_y
    }

    pub fn heading(&self) -> f64 {
        self.heading
    }

    pub fn is_down(&self) -> bool {
        self.pen_down
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn distance(&self, x: f64, y: f64) -> Result<f64, TurtleError> {
        let x = finite("distance", x)?;
        let y = finite("distance", y)?;
        Ok((self.pos_x - x).hypot(self.pos_y - y))
    }

    // Short aliases.

    #[inline]
    pub fn fd(&mut self, distance: f64) -> Result<(), TurtleError> {
        self.forward(distance)
    }

    #[inline]
    pub fn bk(&mut self, distance: f64) -> Result<(), TurtleError> {
        self.backward(distance)
    }

    #[inline]
    pub fn back(&mut self, distance: f64) -> Result<(), TurtleError> {
        self.backward(distance)
    }

    #[inline]
    pub fn rt(&mut self, angle: f64) -> Result<(), TurtleError> {
        self.turn_right(angle)
    }

    #[inline]
    pub fn lt(&mut self, angle: f64) -> Result<(), TurtleError> {
        self.turn_left(angle)
    }

    #[inline]
    pub fn setpos(&mut self, x: f64, y: f64) -> Result<(), TurtleError> {
        self.goto(x, y)
    }

    #[inline]
    pub fn setposition(&mut self, x: f64, y: f64) -> Result<(), TurtleError> {
        self.goto(x, y)
    }

    #[inline]
    pub fn seth(&mut self, angle: f64) -> Result<(), TurtleError> {
        self.set_heading(angle)
    }

    #[inline]
    pub fn pu(&mut self) {
        self.pen_up()
    }

    #[inline]
    pub fn up(&mut self) {
        self.pen_up()
    }

    #[inline]
    pub fn pd(&mut self) {
        self.pen_down()
    }

    #[inline]
    pub fn down(&mut self) {
        self.pen_down()
    }

    #[inline]
    pub fn ht(&mut self) {
        self.hide()
    }

    #[inline]
    pub fn st(&mut self) {
        self.show()
    }

    #[inline]
    pub fn pensize(&mut self, width: f64) -> Result<(), TurtleError> {
        self.set_width(width)
    }

    /// Executes one resolved call.
    pub fn apply(&mut self, call: &Call) -> Result<Reply, TurtleError> {
        match call {
            Call::Forward(distance) => self.forward(*distance)?,
            Call::Backward(distance) => self.backward(*distance)?,
            Call::Right(angle) => self.turn_right(*angle)?,
            Call::Left(angle) => self.turn_left(*angle)?,
            Call::Goto(x, y) => self.goto(*x, *y)?,
            Call::SetX(x) => self.set_x(*x)?,
            Call::SetY(y) => self.set_y(*y)?,
            Call::SetHeading(angle) => self.set_heading(*angle)?,
            Call::Home => self.home(),
            Call::PenUp => self.pen_up(),
            Call::PenDown => self.pen_down(),
            Call::IsDown => return Ok(Reply::Bool(self.pen_down)),
            Call::PenColor(spec) => self.set_pen_color(Color::from_spec(spec)?),
            Call::FillColor(spec) => self.set_fill_color(Color::from_spec(spec)?),
            Call::Color(pen, None) => self.set_color(Color::from_spec(pen)?),
            Call::Color(pen, Some(fill)) => {
                let pen = Color::from_spec(pen)?;
                let fill = Color::from_spec(fill)?;
                self.set_colors(pen, fill);
            }
            Call::Width(None) => return Ok(Reply::Number(self.pen_width)),
            Call::Width(Some(width)) => self.set_width(*width)?,
            Call::BeginFill => self.begin_fill(),
            Call::EndFill => self.end_fill(),
            Call::Circle {
                radius,
                extent,
                steps,
            } => self.circle(*radius, *extent, *steps)?,
            Call::Dot { size, color } => {
                let color = match color {
                    Some(spec) => Some(Color::from_spec(spec)?),
                    None => None,
                };
                self.dot(*size, color)?;
            }
            Call::Write { text, align, font } => {
                let font = font.as_ref().map(|(family, size, style)| Font {
                    family: family.clone(),
                    size: *size,
                    style: style.clone(),
                });
                self.write(text.as_str(), *align, font)?;
            }
            Call::Clear => self.clear(),
            Call::Reset => self.reset(),
            Call::BgColor(spec) => self.bgcolor(Color::from_spec(spec)?),
            Call::HideTurtle => self.hide(),
            Call::ShowTurtle => self.show(),
            Call::IsVisible => return Ok(Reply::Bool(self.visible)),
            Call::Position => return Ok(Reply::Point(self.position())),
            Call::XCor => return Ok(Reply::Number(self.pos_x)),
            Call::YCor => return Ok(Reply::Number(self.pos_y)),
            Call::Heading => return Ok(Reply::Number(self.heading)),
            Call::Distance(x, y) => return Ok(Reply::Number(self.distance(*x, *y)?)),
            Call::Stamp => self.stamp(),
            Call::NoOp => {}
        }
        Ok(Reply::None)
    }
}

fn normalize(degrees: f64) -> f64 {
    ((degrees % 360.0) + 360.0) % 360.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_forward_emits_line() {
        for &heading in &[0.0, 30.0, 90.0, 181.5, 270.0] {
            for &distance in &[0.0, 1.0, -7.5, 123.25] {
                let mut t = TurtleState::new();
                t.goto(3.0, -4.0).unwrap();
                t.set_heading(heading).unwrap();
                let before = t.commands().len();
                t.forward(distance).unwrap();

                assert_eq!(t.commands().len(), before + 1);
                match t.commands().last() {
                    Some(Command::Line { x1, y1, x2, y2, .. }) => {
                        let rad = heading.to_radians();
                        assert_eq!((*x1, *y1), (3.0, -4.0));
                        assert!(close(*x2, 3.0 + distance * rad.cos()));
                        assert!(close(*y2, -4.0 + distance * rad.sin()));
                    }
                    other => panic!("expected a line, got {:?}", other),
                }
                assert_eq!(t.heading(), heading);
            }
        }
    }

    #[test]
    fn test_right_then_forward() {
        let mut t = TurtleState::new();
        t.turn_right(90.0).unwrap();
        t.forward(50.0).unwrap();
        match t.commands().as_slice() {
            [Command::Line { x1, y1, x2, y2, color, width }] => {
                assert_eq!((*x1, *y1), (0.0, 0.0));
                assert!(close(*x2, 0.0));
                assert!(close(*y2, -50.0));
                assert_eq!(color, &Color::black());
                assert_eq!(*width, 1.0);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_pen_up_emits_move() {
        let mut t = TurtleState::new();
        t.pu();
        t.fd(10.0).unwrap();
        assert_eq!(t.commands().as_slice(), &[Command::Move { x: 10.0, y: 0.0 }]);
        assert!(!t.is_down());
    }

    #[test]
    fn test_heading_normalization() {
        let mut t = TurtleState::new();
        t.rt(90.0).unwrap();
        assert_eq!(t.heading(), 270.0);
        t.lt(450.0).unwrap();
        assert_eq!(t.heading(), 0.0);
        t.seth(-45.0).unwrap();
        assert_eq!(t.heading(), 315.0);
        t.seth(720.0).unwrap();
        assert_eq!(t.heading(), 0.0);
        t.lt(-1e-20).unwrap();
        assert!(t.heading() >= 0.0 && t.heading() < 360.0);
        assert!(t.commands().is_empty());
    }

    #[test]
    fn test_circle_restores_heading() {
        for &radius in &[1.0, 10.0, -25.0, 100.0, 0.5] {
            for &start in &[0.0, 37.0, 300.0] {
                let mut t = TurtleState::new();
                t.set_heading(start).unwrap();
                t.circle(radius, 360.0, None).unwrap();
                let diff = (t.heading() - start).abs();
                assert!(diff < 1e-6 || (360.0 - diff) < 1e-6, "r={} h={}", radius, t.heading());

                // The polygon closes back on its start.
                let (x, y) = t.position();
                assert!(x.abs() < 1e-6 && y.abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_circle_emission() {
        let mut t = TurtleState::new();
        t.circle(10.0, 360.0, None).unwrap();
        assert_eq!(t.commands().len(), 24);
        // The first chord heads along +y: the center sits on the left.
        match t.commands().as_slice()[0] {
            Command::Line { x2, y2, .. } => assert!(x2.abs() < 1e-9 && y2 > 0.0),
            ref other => panic!("unexpected {:?}", other),
        }

        let mut t = TurtleState::new();
        t.circle(-10.0, 90.0, Some(3.0)).unwrap();
        assert_eq!(t.commands().len(), 3);
        assert!(close(t.heading(), 270.0));
    }

    #[test]
    fn test_empty_fill() {
        let mut t = TurtleState::new();
        t.begin_fill();
        t.end_fill();
        assert!(t.commands().is_empty());
        assert!(!t.is_filling());
    }

    #[test]
    fn test_fill_after_goto() {
        let mut t = TurtleState::new();
        t.set_fill_color(Color::from_named("red"));
        t.begin_fill();
        t.goto(10.0, 0.0).unwrap();
        t.end_fill();
        assert_eq!(t.commands().len(), 2);
        assert_eq!(
            t.commands().last(),
            Some(&Command::Fill {
                points: vec![(0.0, 0.0), (0.0, 0.0), (10.0, 0.0)],
                color: Color::from_named("red"),
            })
        );
        assert!(!t.is_filling());
    }

    #[test]
    fn test_fill_triangle() {
        let mut t = TurtleState::new();
        t.begin_fill();
        for _ in 0..3 {
            t.fd(10.0).unwrap();
            t.lt(120.0).unwrap();
        }
        t.end_fill();
        match t.commands().last() {
            Some(Command::Fill { points, color }) => {
                assert_eq!(points.len(), 5);
                assert_eq!(color, &Color::black());
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_end_fill_without_begin() {
        let mut t = TurtleState::new();
        t.fd(10.0).unwrap();
        t.end_fill();
        assert_eq!(t.commands().len(), 1);
    }

    #[test]
    fn test_reset() {
        let mut t = TurtleState::new();
        t.goto(5.0, 5.0).unwrap();
        t.rt(33.0).unwrap();
        t.pu();
        t.set_width(4.0).unwrap();
        t.set_color(Color::from_named("blue"));
        t.hide();
        t.begin_fill();
        t.reset();

        assert_eq!(t.position(), (0.0, 0.0));
        assert_eq!(t.heading(), 0.0);
        assert!(t.is_down());
        assert!(t.is_visible());
        assert!(!t.is_filling());
        assert_eq!(t.width(), 1.0);
        assert_eq!(t.pen_color(), &Color::black());
        assert_eq!(t.fill_color(), &Color::black());
        assert_eq!(t.commands().len(), 2);
        assert_eq!(t.commands().last(), Some(&Command::Clear));
    }

    #[test]
    fn test_set_color_equivalence() {
        let mut a = TurtleState::new();
        a.set_color(Color::from_named("red"));
        let mut b = TurtleState::new();
        b.set_pen_color(Color::from_named("red"));
        b.set_fill_color(Color::from_named("red"));
        assert_eq!(a.pen_color(), b.pen_color());
        assert_eq!(a.fill_color(), b.fill_color());

        let mut c = TurtleState::new();
        c.set_colors(Color::from_named("red"), Color::from_named("green"));
        assert_eq!(c.pen_color().as_str(), "red");
        assert_eq!(c.fill_color().as_str(), "green");
    }

    #[test]
    fn test_dot() {
        let mut t = TurtleState::new();
        t.dot(None, None).unwrap();
        t.set_width(10.0).unwrap();
        t.dot(Some(0.0), None).unwrap();
        t.dot(Some(8.0), Some(Color::from_named("red"))).unwrap();
        let radii: Vec<(f64, String)> = t
            .commands()
            .iter()
            .map(|command| match command {
                Command::Dot { r, color, .. } => (*r, color.to_string()),
                other => panic!("unexpected {:?}", other),
            })
            .collect();
        assert_eq!(
            radii,
            vec![
                (2.5, "black".to_owned()),
                (10.0, "black".to_owned()),
                (4.0, "red".to_owned()),
            ]
        );
    }

    #[test]
    fn test_write() {
        let mut t = TurtleState::new();
        t.goto(1.0, 2.0).unwrap();
        t.write("hello", Align::Center, None).unwrap();
        assert_eq!(
            t.commands().last(),
            Some(&Command::Write {
                x: 1.0,
                y: 2.0,
                text: "hello".to_owned(),
                font: Font::default(),
                color: Color::black(),
                align: Align::Center,
            })
        );
    }

    #[test]
    fn test_write_rejects_bad_font_size() {
        let mut t = TurtleState::new();
        for &size in &[0.0, -3.0, std::f64::NAN, std::f64::INFINITY] {
            let font = Font {
                size,
                ..Font::default()
            };
            match t.write("hi", Align::Left, Some(font)) {
                Err(TurtleError::InvalidFontSize(_)) => {}
                other => panic!("size {} gave {:?}", size, other),
            }
        }
        assert!(t.commands().is_empty());

        let huge = Font {
            size: 1e300,
            ..Font::default()
        };
        t.write("hi", Align::Left, Some(huge)).unwrap();
        assert_eq!(t.commands().len(), 1);
    }

    #[test]
    fn test_forward_target_must_be_finite() {
        let mut t = TurtleState::new();
        t.forward(1.5e308).unwrap();
        match t.forward(1.5e308) {
            Err(TurtleError::NonFinite { operation, value }) => {
                assert_eq!(operation, "forward");
                assert!(value.is_infinite());
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(t.position(), (1.5e308, 0.0));
        assert_eq!(t.commands().len(), 1);
        assert_eq!(
            t.commands().last(),
            Some(&Command::Line {
                x1: 0.0,
                y1: 0.0,
                x2: 1.5e308,
                y2: 0.0,
                color: Color::black(),
                width: 1.0,
            })
        );
    }

    #[test]
    fn test_failed_circle_is_undone() {
        let mut t = TurtleState::new();
        t.pu();
        t.goto(1.79e308, 0.0).unwrap();
        t.pd();
        t.begin_fill();
        let before = t.commands().len();

        // Clockwise arc whose far side lies past f64::MAX.
        match t.circle(-1e306, 360.0, None) {
            Err(TurtleError::NonFinite { operation, .. }) => assert_eq!(operation, "forward"),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(t.position(), (1.79e308, 0.0));
        assert_eq!(t.heading(), 0.0);
        assert_eq!(t.commands().len(), before);

        // Only the starting point is left to fill.
        t.end_fill();
        assert_eq!(t.commands().len(), before);
    }

    #[test]
    fn test_huge_circle_does_not_panic() {
        let mut t = TurtleState::new();
        t.circle(1e20, 360.0, None).unwrap();
        assert_eq!(t.commands().len(), crate::circle::MAX_STEPS);
        assert!(t.position().0.is_finite() && t.position().1.is_finite());
        assert_eq!(
            t.circle(10.0, 360.0, Some(1e30)),
            Err(TurtleError::InvalidSteps(1e30))
        );
    }

    #[test]
    fn test_set_xy_and_home() {
        let mut t = TurtleState::new();
        t.set_x(5.0).unwrap();
        t.set_y(-3.0).unwrap();
        assert_eq!(t.position(), (5.0, -3.0));
        t.lt(10.0).unwrap();
        t.home();
        assert_eq!(t.position(), (0.0, 0.0));
        assert_eq!(t.heading(), 0.0);
        assert_eq!(t.commands().len(), 3);
        assert!(close(t.distance(3.0, 4.0).unwrap(), 5.0));
    }

    #[test]
    fn test_non_finite_rejected() {
        let mut t = TurtleState::new();
        assert_eq!(
            t.forward(std::f64::NAN).unwrap_err().to_string(),
            "forward: expected a finite number, got NaN"
        );
        assert!(t.goto(std::f64::INFINITY, 0.0).is_err());
        assert!(t.turn_left(std::f64::NAN).is_err());
        assert!(t.set_heading(std::f64::NEG_INFINITY).is_err());
        assert!(t.dot(Some(std::f64::NAN), None).is_err());
        assert!(t.distance(std::f64::NAN, 0.0).is_err());
        assert_eq!(t.set_width(0.0), Err(TurtleError::InvalidWidth(0.0)));
        assert!(t.commands().is_empty());
        assert_eq!(t.position(), (0.0, 0.0));
        assert_eq!(t.heading(), 0.0);
    }

    #[test]
    fn test_order_follows_calls() {
        let mut t = TurtleState::new();
        t.bgcolor(Color::from_named("navy"));
        t.fd(1.0).unwrap();
        t.pu();
        t.fd(1.0).unwrap();
        t.dot(None, None).unwrap();
        t.clear();
        t.stamp();
        let kinds: Vec<String> = t.commands().iter().map(|c| c.kind().to_string()).collect();
        assert_eq!(kinds, vec!["bgcolor", "line", "move", "dot", "clear", "turtle"]);
    }

    #[test]
    fn test_independent_instances() {
        let mut a = TurtleState::new();
        let b = TurtleState::new();
        a.fd(10.0).unwrap();
        assert_eq!(a.commands().len(), 1);
        assert!(b.commands().is_empty());
        assert_eq!(b.position(), (0.0, 0.0));
    }

    #[test]
    fn test_apply_calls() {
        use uturtle::ast::ColorSpec;

        let mut t = TurtleState::new();
        t.apply(&Call::resolve("fd", &[uturtle::ast::Arg::Number(10.0)]).unwrap())
            .unwrap();
        assert_eq!(t.apply(&Call::XCor), Ok(Reply::Number(10.0)));
        assert_eq!(t.apply(&Call::Width(None)), Ok(Reply::Number(1.0)));
        assert_eq!(t.apply(&Call::IsDown), Ok(Reply::Bool(true)));
        assert_eq!(t.apply(&Call::Position), Ok(Reply::Point((10.0, 0.0))));
        assert_eq!(
            t.apply(&Call::Color(ColorSpec::Channels(255.0, 0.0, 0.0), None)),
            Ok(Reply::None)
        );
        assert_eq!(t.pen_color().as_str(), "rgb(255,0,0)");
        assert_eq!(t.fill_color().as_str(), "rgb(255,0,0)");
        assert_eq!(
            t.apply(&Call::PenColor(ColorSpec::Channels(300.0, 0.0, 0.0))),
            Err(TurtleError::InvalidColorChannel(300.0))
        );
        assert_eq!(t.apply(&Call::NoOp), Ok(Reply::None));
        assert_eq!(t.commands().len(), 1);
    }
}
