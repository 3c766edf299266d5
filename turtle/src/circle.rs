// turtle/src/circle.rs
//
// Copyright © 2019 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Approximates circular arcs with forward/turn steps.

use crate::error::{finite, TurtleError};
use std::f64::consts::PI;
use std::iter;

/// One incremental turtle move of an arc.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ArcStep {
    /// Turn left by the given angle (negative turns right).
    Turn(f64),
    Forward(f64),
}

/// An arc broken into `steps` equal chords.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArcPlan {
    pub steps: usize,
    pub step_angle: f64,
    pub step_length: f64,
    /// +1 for counterclockwise arcs (center on the left), -1 otherwise.
    pub sign: f64,
}

/// Upper bound on the chords of one arc.
pub const MAX_STEPS: usize = 10_000;

impl ArcPlan {
    pub fn new(radius: f64, extent: f64, steps: Option<f64>) -> Result<ArcPlan, TurtleError> {
        let radius = finite("circle", radius)?;
        let extent = finite("circle", extent)?;
        let steps = match steps {
            Some(steps)
                if !steps.is_finite()
                    || steps < 1.0
                    || steps.fract() != 0.0
                    || steps > MAX_STEPS as f64 =>
            {
                return Err(TurtleError::InvalidSteps(steps))
            }
            Some(steps) => steps as usize,
            None => default_steps(radius, extent),
        };

        let step_length = finite(
            "circle",
            2.0 * PI * radius.abs() * (extent.abs() / 360.0) / steps as f64,
        )?;
        Ok(ArcPlan {
            steps,
            step_angle: extent / steps as f64,
            step_length,
            sign: if radius >= 0.0 { 1.0 } else { -1.0 },
        })
    }

    /// Orient tangent, walk the chords, restore the orientation.
    pub fn moves(&self) -> impl Iterator<Item = ArcStep> {
        let ArcPlan {
            steps,
            step_angle,
            step_length,
            sign,
        } = *self;
        let chords = (0..steps).flat_map(move |_| {
            iter::once(ArcStep::Forward(sign * step_length))
                .chain(iter::once(ArcStep::Turn(sign * step_angle)))
        });
        iter::once(ArcStep::Turn(sign * 90.0))
            .chain(chords)
            .chain(iter::once(ArcStep::Turn(-sign * 90.0)))
    }
}

/// Roughly one chord per three units of arc length, never fewer than eight
/// nor more than [`MAX_STEPS`].
pub fn default_steps(radius: f64, extent: f64) -> usize {
    let chords = (radius.abs() * extent.abs() * PI / 180.0 / 3.0).floor() + 4.0;
    chords.max(8.0).min(MAX_STEPS as f64) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_steps() {
        assert_eq!(default_steps(0.0, 360.0), 8);
        assert_eq!(default_steps(10.0, 360.0), 24);
        assert_eq!(default_steps(-50.0, 360.0), 108);
        assert_eq!(default_steps(50.0, 90.0), 30);
    }

    #[test]
    fn test_plan() {
        let plan = ArcPlan::new(-10.0, 180.0, Some(4.0)).unwrap();
        assert_eq!(plan.steps, 4);
        assert_eq!(plan.step_angle, 45.0);
        assert!((plan.step_length - 2.0 * PI * 10.0 * 0.5 / 4.0).abs() < 1e-12);
        assert_eq!(plan.sign, -1.0);

        let moves: Vec<ArcStep> = plan.moves().collect();
        assert_eq!(moves.len(), 2 + 2 * 4);
        assert_eq!(moves[0], ArcStep::Turn(-90.0));
        assert_eq!(moves[1], ArcStep::Forward(-plan.step_length));
        assert_eq!(moves[2], ArcStep::Turn(-45.0));
        assert_eq!(*moves.last().unwrap(), ArcStep::Turn(90.0));
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(ArcPlan::new(std::f64::NAN, 360.0, None).is_err());
        assert!(ArcPlan::new(10.0, std::f64::INFINITY, None).is_err());
        assert_eq!(
            ArcPlan::new(10.0, 360.0, Some(0.0)),
            Err(TurtleError::InvalidSteps(0.0))
        );
        assert_eq!(
            ArcPlan::new(10.0, 360.0, Some(2.5)),
            Err(TurtleError::InvalidSteps(2.5))
        );
        assert_eq!(
            ArcPlan::new(10.0, 360.0, Some(1e30)),
            Err(TurtleError::InvalidSteps(1e30))
        );
        assert!(ArcPlan::new(10.0, 360.0, Some(MAX_STEPS as f64)).is_ok());
    }

    #[test]
    fn test_huge_arcs() {
        assert_eq!(default_steps(1e20, 360.0), MAX_STEPS);
        assert_eq!(default_steps(std::f64::MAX, 360.0), MAX_STEPS);

        let plan = ArcPlan::new(1e20, 360.0, None).unwrap();
        assert_eq!(plan.steps, MAX_STEPS);
        assert!(plan.step_length.is_finite());

        match ArcPlan::new(std::f64::MAX, 360.0, Some(1.0)) {
            Err(TurtleError::NonFinite { operation, value }) => {
                assert_eq!(operation, "circle");
                assert!(value.is_infinite());
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
