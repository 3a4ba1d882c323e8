//! Fixed-timestep accumulator.
//!
//! Wall-clock time is fed in as it elapses; whole simulation steps of
//! [`FIXED_DT`](super::FIXED_DT) are paid out. Rendering never changes the
//! stepping cadence and the stepping cadence never blocks rendering.

use super::FIXED_DT;

/// Longest stretch of wall-clock time the runner will try to catch up on.
/// Anything beyond this (a stall, a suspended laptop) is dropped instead of
/// being replayed as a burst of steps.
const MAX_ACCUMULATED: f32 = 0.25;

pub struct FixedRunner {
    accumulator: f32,
}

impl FixedRunner {
    pub fn new() -> Self {
        Self { accumulator: 0.0 }
    }

    /// Banks `elapsed` seconds and returns how many fixed steps are due.
    pub fn accumulate(&mut self, elapsed: f32) -> u32 {
        self.accumulator = (self.accumulator + elapsed.max(0.0)).min(MAX_ACCUMULATED);
        let mut steps = 0;
        while self.accumulator >= FIXED_DT {
            self.accumulator -= FIXED_DT;
            steps += 1;
        }
        steps
    }
}

impl Default for FixedRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_second_yields_sixty_steps() {
        let mut runner = FixedRunner::new();
        let mut steps = 0;
        // Fed in uneven slices, a second of wall time still pays out ~60
        // steps (within one step of rounding at the tail).
        for elapsed in [0.3, 0.25, 0.2, 0.15, 0.1] {
            steps += runner.accumulate(elapsed);
        }
        assert!((59..=60).contains(&steps), "steps = {}", steps);
    }

    #[test]
    fn test_sub_step_slices_accumulate() {
        let mut runner = FixedRunner::new();
        assert_eq!(runner.accumulate(0.005), 0);
        assert_eq!(runner.accumulate(0.005), 0);
        assert_eq!(runner.accumulate(0.007), 1);
    }

    #[test]
    fn test_stall_is_capped() {
        let mut runner = FixedRunner::new();
        let steps = runner.accumulate(10.0);
        assert!(steps as f32 * FIXED_DT <= MAX_ACCUMULATED + FIXED_DT);
    }

    #[test]
    fn test_negative_elapsed_ignored() {
        let mut runner = FixedRunner::new();
        assert_eq!(runner.accumulate(-1.0), 0);
    }
}
