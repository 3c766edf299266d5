// turtle/src/command.rs
//
// Copyright © 2019 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Draw commands and the per-run command queue.

use crate::color::Color;
use serde_derive::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FormatResult};
use std::slice;
use uturtle::ast::Align;

pub type Point = (f64, f64);

/// One immutable drawing step, in turtle coordinates (origin at the center,
/// y pointing up).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Command {
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        color: Color,
        width: f64,
    },
    /// Pen-up travel. Nothing is drawn.
    Move { x: f64, y: f64 },
    Dot { x: f64, y: f64, r: f64, color: Color },
    Fill { points: Vec<Point>, color: Color },
    Write {
        x: f64,
        y: f64,
        text: String,
        font: Font,
        color: Color,
        #[serde(with = "align_name")]
        align: Align,
    },
    Clear,
    BgColor { color: Color },
    /// Snapshot of the turtle glyph.
    Turtle {
        x: f64,
        y: f64,
        angle: f64,
        visible: bool,
    },
    /// A command type this version does not know. Renders as nothing.
    #[serde(other)]
    Unsupported,
}

impl Command {
    pub fn kind(&self) -> CommandKinds {
        match self {
            Command::Line { .. } => CommandKinds::LINE,
            Command::Move { .. } => CommandKinds::MOVE,
            Command::Dot { .. } => CommandKinds::DOT,
            Command::Fill { .. } => CommandKinds::FILL,
            Command::Write { .. } => CommandKinds::WRITE,
            Command::Clear => CommandKinds::CLEAR,
            Command::BgColor { .. } => CommandKinds::BGCOLOR,
            Command::Turtle { .. } => CommandKinds::TURTLE,
            Command::Unsupported => CommandKinds::UNSUPPORTED,
        }
    }

    /// Whether a paced replay waits after rendering this command.
    #[inline]
    pub fn is_paced(&self) -> bool {
        CommandKinds::PACED.contains(self.kind())
    }
}

bitflags! {
    // NB: If you change this, make sure to update the `Display`
    // implementation as well.
    pub struct CommandKinds: u16 {
        const LINE        = 0x0001;
        const MOVE        = 0x0002;
        const DOT         = 0x0004;
        const FILL        = 0x0008;
        const WRITE       = 0x0010;
        const CLEAR       = 0x0020;
        const BGCOLOR     = 0x0040;
        const TURTLE      = 0x0080;
        const UNSUPPORTED = 0x0100;

        /// Kinds followed by the pacing delay during an animated replay.
        const PACED = Self::LINE.bits | Self::MOVE.bits | Self::DOT.bits;
        /// Kinds that leave a visible mark.
        const DRAWING = Self::LINE.bits | Self::DOT.bits | Self::FILL.bits
            | Self::WRITE.bits | Self::BGCOLOR.bits;
    }
}

impl Display for CommandKinds {
    fn fmt(&self, formatter: &mut Formatter) -> FormatResult {
        if self.is_empty() {
            return Ok(());
        }

        let mut first = true;
        for (bit, name) in NAMES.iter().enumerate() {
            if (self.bits() >> bit) & 1 == 0 {
                continue;
            }
            if !first {
                formatter.write_str(", ")?;
            } else {
                first = false;
            }
            formatter.write_str(name)?;
        }

        return Ok(());

        // Must match the order in `CommandKinds`.
        static NAMES: &'static [&'static str] = &[
            "line", "move", "dot", "fill", "write", "clear", "bgcolor", "turtle", "unsupported",
        ];
    }
}

/// Font descriptor for `write`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Font {
    pub family: String,
    pub size: f64,
    pub style: String,
}

impl Default for Font {
    fn default() -> Font {
        Font {
            family: "Arial".to_owned(),
            size: 12.0,
            style: "normal".to_owned(),
        }
    }
}

/// CSS shorthand, e.g. `normal 12px Arial`.
impl Display for Font {
    fn fmt(&self, formatter: &mut Formatter) -> FormatResult {
        write!(formatter, "{} {}px {}", self.style, self.size, self.family)
    }
}

mod align_name {
    use serde::de::{Deserialize, Deserializer, Error};
    use serde::ser::Serializer;
    use uturtle::ast::Align;

    pub fn serialize<S: Serializer>(align: &Align, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(match align {
            Align::Left => "left",
            Align::Center => "center",
            Align::Right => "right",
        })
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Align, D::Error> {
        let name = String::deserialize(deserializer)?;
        Align::from_name(&name)
            .ok_or_else(|| D::Error::custom(format!("unknown alignment `{}`", name)))
    }
}

/// The ordered record of one run. Insertion order is rendering order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommandQueue {
    commands: Vec<Command>,
}

impl CommandQueue {
    pub fn new() -> CommandQueue {
        CommandQueue::default()
    }

    #[inline]
    pub(crate) fn push(&mut self, command: Command) {
        self.commands.push(command);
    }

    pub(crate) fn clear(&mut self) {
        self.commands.clear();
    }

    pub(crate) fn truncate(&mut self, len: usize) {
        self.commands.truncate(len);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[Command] {
        &self.commands
    }

    pub fn iter(&self) -> slice::Iter<Command> {
        self.commands.iter()
    }

    pub fn last(&self) -> Option<&Command> {
        self.commands.last()
    }

    /// Every kind of command present in the queue.
    pub fn kinds(&self) -> CommandKinds {
        self.commands
            .iter()
            .fold(CommandKinds::empty(), |kinds, command| kinds | command.kind())
    }

    /// Whether the run left any visible mark.
    pub fn has_drawing(&self) -> bool {
        self.kinds().intersects(CommandKinds::DRAWING)
    }

    pub fn into_vec(self) -> Vec<Command> {
        self.commands
    }
}

impl From<Vec<Command>> for CommandQueue {
    fn from(commands: Vec<Command>) -> CommandQueue {
        CommandQueue { commands }
    }
}

impl<'a> IntoIterator for &'a CommandQueue {
    type Item = &'a Command;
    type IntoIter = slice::Iter<'a, Command>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.iter()
    }
}
