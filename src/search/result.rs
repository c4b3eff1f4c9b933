//! Search result types and statistics

use crate::search::provisional::ProvisionalSet;
use std::fmt::Write as _;
use std::time::Duration;

/// Where a search invocation stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchStatus {
    /// Still being deepened
    #[default]
    Running,
    /// Stopped at the requested target depth
    Frontier,
    /// All k elements placed
    Solved,
    /// Every extension of the prefix above the floor was rejected
    Exhausted,
    /// Stopped early because the size was settled or the run was cancelled
    Aborted,
}

impl std::fmt::Display for SearchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchStatus::Running => write!(f, "running"),
            SearchStatus::Frontier => write!(f, "frontier"),
            SearchStatus::Solved => write!(f, "solved"),
            SearchStatus::Exhausted => write!(f, "exhausted"),
            SearchStatus::Aborted => write!(f, "aborted"),
        }
    }
}

/// A difference set reported by the search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    /// Number of elements
    pub k: usize,
    /// Modulus, k * (k - 1) + 1
    pub v: u32,
    /// Trials spent on this size up to and including the solving unit of work
    pub trials: u64,
    /// The set, in search order
    pub elements: Vec<u32>,
    /// Worker that completed the set
    pub worker: Option<usize>,
}

impl Solution {
    /// Capture a solved set, crediting it with `trials` spent on its size.
    pub fn from_set(set: &ProvisionalSet, trials: u64) -> Self {
        Self {
            k: set.k(),
            v: set.v(),
            trials,
            elements: set.elements().to_vec(),
            worker: set.worker(),
        }
    }
}

impl std::fmt::Display for Solution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({}, {}) @{}: {}",
            self.k,
            self.v,
            commas(self.trials),
            format_ints(&self.elements)
        )
    }
}

/// Outcome of a complete run over a range of set sizes
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Solutions in the order they were found
    pub solutions: Vec<Solution>,
    /// Set sizes the generator was asked to cover
    pub sizes: Vec<usize>,
    /// Trials across all completed and discarded work
    pub total_trials: u64,
    /// Frontier sets handed to workers
    pub dispatched: u64,
    /// Frontier sets dropped because their size was already settled
    pub discarded: u64,
    /// Wall-clock duration of the run
    pub elapsed_time: Duration,
    /// The run was stopped by an interrupt
    pub cancelled: bool,
}

impl RunSummary {
    /// Sizes in the requested range for which no solution was reported
    pub fn unsolved_sizes(&self) -> Vec<usize> {
        self.sizes
            .iter()
            .copied()
            .filter(|k| !self.solutions.iter().any(|s| s.k == *k))
            .collect()
    }

    /// Trials per second over the whole run
    pub fn throughput(&self) -> f64 {
        let secs = self.elapsed_time.as_secs_f64();
        if secs == 0.0 {
            0.0
        } else {
            self.total_trials as f64 / secs
        }
    }

    /// Format the run as a human-readable string
    pub fn format_summary(&self) -> String {
        let mut s = String::new();
        let _ = writeln!(s, "Time: {:.2?}", self.elapsed_time);
        let _ = writeln!(s, "Total trials: {}", commas(self.total_trials));
        let _ = writeln!(s, "Throughput: {}/sec", commas(self.throughput() as u64));
        let _ = writeln!(
            s,
            "Frontier sets: {} dispatched, {} discarded",
            self.dispatched, self.discarded
        );
        let _ = writeln!(
            s,
            "Solved: {} of {} sizes",
            self.solutions.len(),
            self.sizes.len()
        );
        if self.cancelled {
            let _ = writeln!(s, "Cancelled before completion");
        }
        s
    }
}

/// Comma separated list of set elements
pub fn format_ints(values: &[u32]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Render an integer with thousands separators
pub fn commas(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
