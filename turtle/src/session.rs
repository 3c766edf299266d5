// turtle/src/session.rs
//
// Copyright © 2019 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! One turtle shared across program runs.
//!
//! A run starts from an empty queue and a freshly reset turtle, so every queue
//! handed out by [`Session::finish_run`] begins with a `clear` and ends with a
//! `turtle` snapshot of the final pose.

use crate::command::CommandQueue;
use crate::error::TurtleError;
use crate::replay::{Pacing, Replay, ReplayScheduler};
use crate::state::{Reply, TurtleState};
use uturtle::ast::Call;

#[derive(Debug, Default)]
pub struct Session {
    turtle: TurtleState,
    scheduler: ReplayScheduler,
    runs: u64,
}

impl Session {
    pub fn new() -> Session {
        Session::default()
    }

    pub fn turtle(&self) -> &TurtleState {
        &self.turtle
    }

    pub fn turtle_mut(&mut self) -> &mut TurtleState {
        &mut self.turtle
    }

    pub fn scheduler(&self) -> &ReplayScheduler {
        &self.scheduler
    }

    /// Runs finished so far.
    pub fn runs(&self) -> u64 {
        self.runs
    }

    /// Empties the queue and resets the turtle for a new run.
    pub fn begin_run(&mut self) -> &mut TurtleState {
        self.turtle.clear_commands();
        self.turtle.reset();
        &mut self.turtle
    }

    /// Stamps the final pose and hands over the run's queue.
    pub fn finish_run(&mut self) -> CommandQueue {
        self.turtle.stamp();
        self.runs += 1;
        let commands = self.turtle.take_commands();
        debug!(
            "run {} finished with {} commands ({})",
            self.runs,
            commands.len(),
            commands.kinds()
        );
        commands
    }

    /// Runs a whole program. A failing call aborts the run and nothing is
    /// handed over.
    pub fn run(&mut self, program: &[Call]) -> Result<CommandQueue, TurtleError> {
        let turtle = self.begin_run();
        for (index, call) in program.iter().enumerate() {
            match turtle.apply(call)? {
                Reply::None => {}
                reply => trace!("call {}: {:?} -> {:?}", index, call, reply),
            }
        }
        Ok(self.finish_run())
    }

    /// Starts replaying `commands`, superseding this session's previous replay.
    pub fn replay<'a>(&self, commands: &'a CommandQueue, pacing: Pacing) -> Replay<'a> {
        self.scheduler.start(commands.as_slice(), pacing)
    }
}
