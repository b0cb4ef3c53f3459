//! Dual-rate step timing
//!
//! Every frame runs one logic phase with the frame delta, then zero or more
//! fixed-length physics substeps drained from an accumulator.

use crate::error::{CoreError, Result};

/// Fixed-step accumulator
#[derive(Debug, Clone)]
pub struct FixedStepper {
    fixed_dt: f32,
    max_substeps: u32,
    accumulator: f32,
    total_time: f32,
    frame: u64,
}

impl FixedStepper {
    pub fn new(fixed_dt: f32, max_substeps: u32) -> Result<Self> {
        if !(fixed_dt > 0.0) || !fixed_dt.is_finite() {
            return Err(CoreError::InvalidTimeStep(fixed_dt));
        }
        if max_substeps == 0 {
            return Err(CoreError::InvalidSubstepLimit(max_substeps));
        }
        Ok(Self {
            fixed_dt,
            max_substeps,
            accumulator: 0.0,
            total_time: 0.0,
            frame: 0,
        })
    }

    /// Feed a frame delta and return how many fixed substeps to run.
    ///
    /// Time beyond `max_substeps` worth of steps is dropped so a long stall
    /// cannot snowball into ever longer frames.
    pub fn advance(&mut self, dt: f32) -> u32 {
        let dt = dt.max(0.0);
        self.frame += 1;
        self.total_time += dt;
        self.accumulator += dt;

        let mut steps = 0;
        while self.accumulator >= self.fixed_dt && steps < self.max_substeps {
            self.accumulator -= self.fixed_dt;
            steps += 1;
        }
        if steps == self.max_substeps && self.accumulator >= self.fixed_dt {
            log::warn!(
                "Dropping {:.3}s of simulation time after {} substeps",
                self.accumulator,
                steps
            );
            self.accumulator %= self.fixed_dt;
        }
        steps
    }

    #[inline]
    pub fn fixed_dt(&self) -> f32 {
        self.fixed_dt
    }

    #[inline]
    pub fn total_time(&self) -> f32 {
        self.total_time
    }

    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Fraction of a fixed step left in the accumulator
    pub fn interpolation_factor(&self) -> f32 {
        self.accumulator / self.fixed_dt
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rejects_bad_parameters() {
        assert!(FixedStepper::new(0.0, 4).is_err());
        assert!(FixedStepper::new(f32::NAN, 4).is_err());
        assert!(FixedStepper::new(0.02, 0).is_err());
    }

    #[test]
    fn test_accumulates_partial_steps() {
        let mut stepper = FixedStepper::new(0.02, 8).unwrap();
        assert_eq!(stepper.advance(0.015), 0);
        assert_eq!(stepper.advance(0.015), 1);
        assert_relative_eq!(stepper.interpolation_factor(), 0.5, epsilon = 1e-4);
    }

    #[test]
    fn test_clamps_substeps() {
        let mut stepper = FixedStepper::new(0.02, 4).unwrap();
        assert_eq!(stepper.advance(1.0), 4);
        assert!(stepper.interpolation_factor() < 1.0);
        assert_eq!(stepper.frame(), 1);
    }
}
