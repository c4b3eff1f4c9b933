//! Progress monitor: owns the per-worker statistics table.
//!
//! Workers offer snapshots of the set they are working on; the coordinator
//! forwards every completed or discarded set. On each tick the monitor logs
//! what every worker holds and the search rate since the previous tick.

use crate::search::parallel::channel::{MonitorChannels, MonitorEvent};
use crate::search::provisional::ProvisionalSet;
use crate::search::result::commas;
use crossbeam_channel::{never, select, tick};
use std::collections::BTreeMap;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Search rate and in-flight state for one reporting interval
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressReport {
    /// Trials per second since the previous report
    pub rate: f64,
    /// Trials across completed work and in-flight snapshots
    pub total: u64,
    /// One line per worker describing its latest snapshot
    pub lines: Vec<String>,
}

#[derive(Debug, Default)]
pub struct ProgressMonitor {
    in_flight: BTreeMap<usize, ProvisionalSet>,
    completed_trials: u64,
    last_total: u64,
}

impl ProgressMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the in-flight entry for the snapshot's worker.
    pub fn record_snapshot(&mut self, set: ProvisionalSet) {
        if let Some(worker) = set.worker() {
            self.in_flight.insert(worker, set);
        }
    }

    /// Fold a finished set into the completed total.
    ///
    /// Its worker's snapshot is dropped only if it belongs to the same size,
    /// since a worker may already be snapshotting its next set.
    pub fn record_completion(&mut self, set: &ProvisionalSet) {
        self.completed_trials += set.trials();
        if let Some(worker) = set.worker()
            && self.in_flight.get(&worker).is_some_and(|snapshot| {
                snapshot.k() == set.k() && snapshot.trials() <= set.trials()
            })
        {
            self.in_flight.remove(&worker);
        }
    }

    /// Trials known so far, counting in-flight snapshots.
    pub fn total_trials(&self) -> u64 {
        self.completed_trials + self.in_flight.values().map(|s| s.trials()).sum::<u64>()
    }

    /// Workers whose latest snapshot has not been completed yet.
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Build the report for an interval of length `elapsed`.
    pub fn tick(&mut self, elapsed: Duration) -> ProgressReport {
        let total = self.total_trials();
        // A worker's next snapshot can replace a larger one before its completion arrives.
        let delta = total.saturating_sub(self.last_total);
        self.last_total = self.last_total.max(total);

        let secs = elapsed.as_secs_f64();
        let rate = if secs > 0.0 { delta as f64 / secs } else { 0.0 };
        let lines = self
            .in_flight
            .iter()
            .map(|(worker, set)| format!("worker {worker}: {set}"))
            .collect();

        ProgressReport { rate, total, lines }
    }
}

/// Run the monitor until the coordinator closes its event channel.
///
/// Returns the trials recorded from completed sets.
pub fn run_monitor(channels: MonitorChannels, interval: Duration, enabled: bool) -> u64 {
    let MonitorChannels {
        mut snapshots,
        events,
    } = channels;
    let mut monitor = ProgressMonitor::new();
    let ticker = if enabled { tick(interval) } else { never() };
    let mut last_tick = Instant::now();

    loop {
        select! {
            recv(snapshots) -> msg => match msg {
                Ok(set) => monitor.record_snapshot(set),
                // Every worker is gone; completions may still arrive.
                Err(_) => snapshots = never(),
            },
            recv(events) -> msg => match msg {
                Ok(MonitorEvent::Completed(set)) => {
                    // Older snapshots of this set must not outlive it.
                    for snapshot in snapshots.try_iter() {
                        monitor.record_snapshot(snapshot);
                    }
                    monitor.record_completion(&set);
                }
                Err(_) => break,
            },
            recv(ticker) -> _ => {
                let now = Instant::now();
                let report = monitor.tick(now - last_tick);
                last_tick = now;
                for line in &report.lines {
                    info!("{line}");
                }
                info!(
                    "search rate: {}/sec (total: {})",
                    commas(report.rate as u64),
                    commas(report.total)
                );
            },
        }
    }

    debug!(
        completed_trials = monitor.completed_trials,
        in_flight = monitor.in_flight(),
        "monitor stopped"
    );
    monitor.completed_trials
}
