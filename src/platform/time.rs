//! Fixed timestep accumulator

use crate::consts::{MAX_SUBSTEPS, SIM_DT};

/// Turns wall-clock frame time into a whole number of simulation ticks
#[derive(Debug, Clone)]
pub struct FixedStep {
    dt: f32,
    accumulator: f32,
}

impl Default for FixedStep {
    fn default() -> Self {
        Self::new(SIM_DT)
    }
}

impl FixedStep {
    pub fn new(dt: f32) -> Self {
        Self {
            dt,
            accumulator: 0.0,
        }
    }

    pub fn dt(&self) -> f32 {
        self.dt
    }

    /// Add elapsed seconds; returns how many ticks to run now.
    ///
    /// Long stalls are capped at `MAX_SUBSTEPS` so a slow frame can't
    /// snowball into ever more catch-up work.
    pub fn advance(&mut self, elapsed: f32) -> u32 {
        self.accumulator += elapsed.clamp(0.0, 0.1);

        let mut ticks = 0;
        while self.accumulator >= self.dt && ticks < MAX_SUBSTEPS {
            self.accumulator -= self.dt;
            ticks += 1;
        }
        if ticks == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(self.dt);
        }
        ticks
    }

    /// Seconds until the next tick is due
    pub fn until_next(&self) -> f32 {
        (self.dt - self.accumulator).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulates_partial_frames() {
        let mut step = FixedStep::new(0.01);
        assert_eq!(step.advance(0.004), 0);
        assert_eq!(step.advance(0.004), 0);
        assert_eq!(step.advance(0.004), 1);
    }

    #[test]
    fn test_caps_substeps() {
        let mut step = FixedStep::new(0.001);
        assert_eq!(step.advance(1.0), MAX_SUBSTEPS);
        assert!(step.until_next() <= 0.001);
    }
}
