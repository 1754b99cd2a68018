//! Simulation time stepping

/// Fixed-timestep accumulator for deterministic simulation stepping
///
/// Wall-clock frame times are accumulated and drained in fixed-size steps so
/// the simulation advances by the same `dt` every tick regardless of render
/// frame rate.
pub struct FixedStep {
    step: f32,
    accumulator: f32,
}

impl FixedStep {
    /// Create an accumulator draining in `step`-second increments
    pub fn new(step: f32) -> Self {
        Self {
            step,
            accumulator: 0.0,
        }
    }

    /// Add a frame's worth of elapsed time
    pub fn accumulate(&mut self, frame_time: f32) {
        self.accumulator += frame_time;
    }

    /// Take one fixed step if enough time has accumulated
    ///
    /// Returns the step size while time remains, `None` once drained.
    pub fn drain(&mut self) -> Option<f32> {
        if self.accumulator >= self.step {
            self.accumulator -= self.step;
            Some(self.step)
        } else {
            None
        }
    }

    /// The fixed step size in seconds
    pub fn step(&self) -> f32 {
        self.step
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_step_drains_whole_steps() {
        let mut stepper = FixedStep::new(0.1);
        stepper.accumulate(0.35);

        let mut steps = 0;
        while stepper.drain().is_some() {
            steps += 1;
        }
        assert_eq!(steps, 3);

        // Remainder carries over into the next frame
        stepper.accumulate(0.06);
        assert!(stepper.drain().is_some());
        assert!(stepper.drain().is_none());
    }
}
