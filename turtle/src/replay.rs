// turtle/src/replay.rs
//
// Copyright © 2019 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Replays a command queue onto a renderer, instantly or as an animation.
//!
//! A [`Replay`] is a small state machine: each [`Replay::step`] renders exactly
//! one command and says whether the driver should go on, wait, or stop. Lines,
//! moves and dots are followed by the pacing delay; everything else renders
//! straight through. Drivers never run two steps at once.
//!
//! Starting a replay bumps the scheduler's epoch. A replay from an older epoch
//! notices before its next step and ends as [`ReplayOutcome::Superseded`]
//! without drawing anything further.

use crate::command::Command;
use crate::error::TurtleError;
use crate::render::CanvasRenderer;
use crate::surface::Surface;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Animation speed from 0 (slowest) to 10 (instant).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Speed(u8);

impl Speed {
    pub const SLOWEST: Speed = Speed(0);
    pub const INSTANT: Speed = Speed(10);

    pub fn new(speed: i64) -> Result<Speed, TurtleError> {
        if speed < 0 || speed > 10 {
            return Err(TurtleError::InvalidSpeed(speed));
        }
        Ok(Speed(speed as u8))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// 10 is instant, 0 waits two seconds per step, anything in between
    /// waits `round(2000 / (3 * speed))` milliseconds.
    pub fn pacing(self) -> Pacing {
        match self.0 {
            10 => Pacing::INSTANT,
            0 => Pacing::from_millis(2000),
            speed => Pacing::from_millis((2000.0 / (speed as f64 * 3.0)).round() as u64),
        }
    }
}

/// Delay between paced steps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Pacing(Duration);

impl Pacing {
    pub const INSTANT: Pacing = Pacing(Duration::from_millis(0));

    pub fn from_millis(millis: u64) -> Pacing {
        Pacing(Duration::from_millis(millis))
    }

    pub fn delay(self) -> Duration {
        self.0
    }

    #[inline]
    pub fn is_instant(self) -> bool {
        self.0 == Duration::from_millis(0)
    }
}

impl From<Speed> for Pacing {
    fn from(speed: Speed) -> Pacing {
        speed.pacing()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReplayOutcome {
    /// Every command was rendered.
    Completed,
    /// A newer replay started before this one finished.
    Superseded,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// Render the next command right away.
    Continue,
    /// Yield to the host for this long before the next step.
    Wait(Duration),
    Done(ReplayOutcome),
}

/// Hands out replays and invalidates stale ones.
#[derive(Clone, Debug, Default)]
pub struct ReplayScheduler {
    epoch: Arc<AtomicU64>,
}

impl ReplayScheduler {
    pub fn new() -> ReplayScheduler {
        ReplayScheduler::default()
    }

    /// Starts a replay, superseding any replay still in flight.
    pub fn start<'a>(&self, commands: &'a [Command], pacing: Pacing) -> Replay<'a> {
        let epoch = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(
            "replay #{}: {} commands, pacing {:?}",
            epoch,
            commands.len(),
            pacing.delay()
        );
        Replay {
            commands,
            next: 0,
            pacing,
            epoch,
            current: self.epoch.clone(),
            outcome: None,
        }
    }

    /// Invalidates the replay in flight, if any.
    pub fn cancel(&self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
    }

    pub fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::SeqCst)
    }
}

pub struct Replay<'a> {
    commands: &'a [Command],
    next: usize,
    pacing: Pacing,
    epoch: u64,
    current: Arc<AtomicU64>,
    outcome: Option<ReplayOutcome>,
}

impl<'a> Replay<'a> {
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn is_current(&self) -> bool {
        self.current.load(Ordering::SeqCst) == self.epoch
    }

    /// Commands not rendered yet.
    pub fn remaining(&self) -> usize {
        self.commands.len() - self.next
    }

    pub fn step<S: Surface>(&mut self, renderer: &mut CanvasRenderer<S>) -> Step {
        if let Some(outcome) = self.outcome {
            return Step::Done(outcome);
        }
        if !self.is_current() {
            warn!(
                "replay #{} superseded after {} of {} commands",
                self.epoch,
                self.next,
                self.commands.len()
            );
            return self.finish(ReplayOutcome::Superseded);
        }

        let command = match self.commands.get(self.next) {
            Some(command) => command,
            None => return self.finish(ReplayOutcome::Completed),
        };
        self.next += 1;

        trace!("replay #{}: {:?}", self.epoch, command);
        renderer.execute(command);

        if command.is_paced() && !self.pacing.is_instant() {
            Step::Wait(self.pacing.delay())
        } else {
            Step::Continue
        }
    }

    fn finish(&mut self, outcome: ReplayOutcome) -> Step {
        debug!("replay #{} finished: {:?}", self.epoch, outcome);
        self.outcome = Some(outcome);
        Step::Done(outcome)
    }

    /// Drives the replay on the current thread, sleeping between paced steps.
    ///
    /// `on_done` runs exactly once. With instant pacing nothing ever sleeps and
    /// `on_done` has run by the time this returns.
    pub fn run_blocking<S, F>(mut self, renderer: &mut CanvasRenderer<S>, on_done: F) -> ReplayOutcome
    where
        S: Surface,
        F: FnOnce(ReplayOutcome),
    {
        loop {
            match self.step(renderer) {
                Step::Continue => {}
                Step::Wait(delay) => thread::sleep(delay),
                Step::Done(outcome) => {
                    on_done(outcome);
                    return outcome;
                }
            }
        }
    }

    /// Drives the replay as a task, yielding to the tokio timer between paced
    /// steps. `on_done` runs exactly once.
    pub async fn run<S, F>(mut self, renderer: &mut CanvasRenderer<S>, on_done: F) -> ReplayOutcome
    where
        S: Surface,
        F: FnOnce(ReplayOutcome),
    {
        loop {
            match self.step(renderer) {
                Step::Continue => {}
                Step::Wait(delay) => tokio::time::sleep(delay).await,
                Step::Done(outcome) => {
                    on_done(outcome);
                    return outcome;
                }
            }
        }
    }
}

/// Replays `commands` on the current thread with a fresh scheduler.
pub fn replay<S, F>(
    commands: &[Command],
    pacing: Pacing,
    renderer: &mut CanvasRenderer<S>,
    on_done: F,
) -> ReplayOutcome
where
    S: Surface,
    F: FnOnce(ReplayOutcome),
{
    ReplayScheduler::new()
        .start(commands, pacing)
        .run_blocking(renderer, on_done)
}
