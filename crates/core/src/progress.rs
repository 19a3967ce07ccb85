//! Progress reporting for long-running stacking runs.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Stage of a stacking run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Phase {
    /// Generating and voxelizing rotation variants.
    #[default]
    Preprocessing,
    /// Placing part instances.
    Placing,
    /// The run has ended.
    Finished,
}

/// Progress callback for long-running operations.
pub type ProgressCallback = Box<dyn Fn(ProgressInfo) + Send + Sync>;

/// Progress information during stacking.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProgressInfo {
    /// Current stage.
    pub phase: Phase,
    /// Work done in the current stage.
    pub done: f64,
    /// Total work in the current stage.
    pub total: f64,
    /// Number of instances placed.
    pub items_placed: usize,
    /// Total number of instances.
    pub total_items: usize,
    /// Elapsed time in milliseconds.
    pub elapsed_ms: u64,
    /// Whether the run is still in progress.
    pub running: bool,
}

impl ProgressInfo {
    /// Creates a new progress info for `phase`.
    pub fn new(phase: Phase) -> Self {
        Self {
            phase,
            running: true,
            ..Default::default()
        }
    }

    /// Sets the work counters.
    pub fn with_work(mut self, done: f64, total: f64) -> Self {
        self.done = done;
        self.total = total;
        self
    }

    /// Sets the items placed info.
    pub fn with_items(mut self, placed: usize, total: usize) -> Self {
        self.items_placed = placed;
        self.total_items = total;
        self
    }

    /// Sets the elapsed time.
    pub fn with_elapsed(mut self, elapsed_ms: u64) -> Self {
        self.elapsed_ms = elapsed_ms;
        self
    }

    /// Marks the run as finished.
    pub fn finished(mut self) -> Self {
        self.phase = Phase::Finished;
        self.running = false;
        self
    }

    /// Fraction of the current stage completed (0.0 to 1.0).
    pub fn fraction(&self) -> f64 {
        if self.total > 0.0 {
            (self.done / self.total).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fraction() {
        let info = ProgressInfo::new(Phase::Placing).with_work(3.0, 4.0);
        assert!((info.fraction() - 0.75).abs() < 1e-12);
        assert_eq!(ProgressInfo::new(Phase::Placing).fraction(), 0.0);
        assert_eq!(
            ProgressInfo::new(Phase::Placing)
                .with_work(5.0, 4.0)
                .fraction(),
            1.0
        );
    }

    #[test]
    fn test_finished() {
        let info = ProgressInfo::new(Phase::Placing)
            .with_items(2, 2)
            .with_elapsed(10)
            .finished();
        assert_eq!(info.phase, Phase::Finished);
        assert!(!info.running);
        assert_eq!(info.items_placed, 2);
    }
}
