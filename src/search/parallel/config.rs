//! Configuration for parallel search execution.

use std::time::Duration;

/// Shortest accepted progress interval.
const MIN_PROGRESS_INTERVAL: Duration = Duration::from_millis(10);

/// Configuration for parallel search execution.
#[derive(Debug, Clone)]
pub struct ParallelConfig {
    /// Number of worker threads to spawn.
    pub num_workers: usize,
    /// How often the monitor reports in-flight work and search rate.
    pub progress_interval: Duration,
    /// Trials between snapshots and abort checks inside a search.
    pub snapshot_interval: u64,
    /// Whether the monitor emits periodic progress lines.
    pub report_progress: bool,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            num_workers: num_cpus::get(),
            progress_interval: Duration::from_secs(1),
            snapshot_interval: 1_000_000,
            report_progress: true,
        }
    }
}

impl ParallelConfig {
    /// Create a new parallel config with the specified number of workers.
    pub fn with_workers(mut self, num_workers: usize) -> Self {
        self.num_workers = num_workers.max(1);
        self
    }

    /// Set the number of workers from an Option, keeping the default for None.
    pub fn with_workers_option(self, num_workers: Option<usize>) -> Self {
        match num_workers {
            Some(n) => self.with_workers(n),
            None => self,
        }
    }

    pub fn with_progress_interval(mut self, interval: Duration) -> Self {
        self.progress_interval = interval.max(MIN_PROGRESS_INTERVAL);
        self
    }

    /// Set the snapshot interval; zero is raised to one so aborts stay observable.
    pub fn with_snapshot_interval(mut self, trials: u64) -> Self {
        self.snapshot_interval = trials.max(1);
        self
    }

    pub fn with_progress(mut self, enabled: bool) -> Self {
        self.report_progress = enabled;
        self
    }
}
