// turtle/src/lib.rs
//
// Copyright © 2019 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Turtle graphics recorded as a queue of draw commands and replayed onto a
//! canvas.
//!
//! A program drives a [`TurtleState`] (usually through a [`Session`]), which
//! appends one [`Command`] per visible effect. The finished [`CommandQueue`] is
//! then replayed onto any [`Surface`] through a [`CanvasRenderer`], either all
//! at once or paced like an animation.

#[macro_use]
extern crate bitflags;
#[macro_use]
extern crate log;

pub mod circle;
pub mod color;
pub mod command;
pub mod error;
mod font;
pub mod raster;
pub mod render;
pub mod replay;
pub mod session;
pub mod state;
pub mod surface;

pub use crate::color::{Color, ColorU};
pub use crate::command::{Command, CommandKinds, CommandQueue, Font, Point};
pub use crate::error::TurtleError;
pub use crate::raster::RasterSurface;
pub use crate::render::CanvasRenderer;
pub use crate::replay::{replay, Pacing, Replay, ReplayOutcome, ReplayScheduler, Speed, Step};
pub use crate::session::Session;
pub use crate::state::{Reply, TurtleState};
pub use crate::surface::{RecordingSurface, Surface, SurfaceConfig};
