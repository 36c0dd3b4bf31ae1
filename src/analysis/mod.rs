//! Analysis driver and options

pub mod iteration;
pub mod sweep;

use serde::{Deserialize, Serialize};

use crate::math::GoverningRule;

pub use iteration::{approximate_omega, approximate_sigma_cr, modal_composite, perform_iteration};
pub use sweep::{linspace, sweep, SearchSpace, Sweep};

/// Options for a parameter sweep
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepOptions {
    /// Number of worker threads
    pub workers: usize,
    /// Governing eigenvalue selection
    pub governing: GoverningRule,
    /// Number of `a` rows that may wait in the job queue
    pub channel_capacity: usize,
}

impl Default for SweepOptions {
    fn default() -> Self {
        Self {
            workers: num_cpus::get(),
            governing: GoverningRule::default(),
            channel_capacity: 4,
        }
    }
}

impl SweepOptions {
    /// Set the number of worker threads, at least one
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Set the governing eigenvalue selection
    pub fn with_governing_rule(mut self, rule: GoverningRule) -> Self {
        self.governing = rule;
        self
    }

    /// Set the job queue capacity, at least one row
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity.max(1);
        self
    }
}
