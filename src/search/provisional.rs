//! Incremental constraint state for difference-set search
//!
//! A [`ProvisionalSet`] is a partial candidate set together with a bitmap of
//! the *folded* differences (d and v - d share one slot) that its committed
//! pairs already produce. Every candidate is checked against that bitmap as it
//! is pushed, so the difference-set property holds for the committed prefix
//! at all times and never has to be re-verified.
//!
//! The `low` pointer tracks the longest run of covered differences starting at
//! zero. Any element placed within `low` of the previous one would repeat one
//! of those differences, so the search jumps over that whole range at once.

use crate::error::ConfigError;
use crate::search::result::{SearchStatus, commas, format_ints};
use std::ops::ControlFlow;

/// The first two elements every canonical search starts from.
pub const CANONICAL_PREFIX: [u32; 2] = [0, 1];

/// Modulus of a perfect difference set with `k` elements.
pub const fn modulus(k: usize) -> u32 {
    (k * (k - 1) + 1) as u32
}

/// Folded difference between two residues modulo `v`.
#[inline]
fn fold(a: u32, b: u32, v: u32) -> usize {
    let d = if a >= b { a - b } else { a + v - b };
    d.min(v - d) as usize
}

/// A partial difference set under construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionalSet {
    k: usize,
    v: u32,
    /// Committed elements in insertion order
    elements: Vec<u32>,
    /// covered[d] is true when some committed pair has folded difference d
    covered: Vec<bool>,
    /// Largest index with covered[0..=low] all true
    low: u32,
    trials: u64,
    target_depth: usize,
    /// Backtracking never pops below this many elements
    floor: usize,
    status: SearchStatus,
    worker: Option<usize>,
}

impl ProvisionalSet {
    /// Create an empty set of size `k` that searches to completion.
    ///
    /// # Panics
    /// Panics if `k < 2`; callers validate sizes before building sets.
    pub fn new(k: usize) -> Self {
        assert!(k >= 2, "difference sets need at least two elements (k = {k})");
        let v = modulus(k);
        let mut covered = vec![false; v as usize / 2 + 1];
        covered[0] = true;
        Self {
            k,
            v,
            elements: Vec::with_capacity(k),
            covered,
            low: 0,
            trials: 0,
            target_depth: k,
            floor: 0,
            status: SearchStatus::Running,
            worker: None,
        }
    }

    /// Create a set of size `k` seeded with the canonical prefix 0, 1.
    pub fn canonical(k: usize) -> Self {
        let mut set = Self::new(k);
        for value in CANONICAL_PREFIX {
            let pushed = set.push(value);
            debug_assert!(pushed, "canonical prefix rejected for k = {k}");
        }
        set.floor = CANONICAL_PREFIX.len();
        set
    }

    /// Create a set of size `k` seeded with an explicit prefix.
    ///
    /// The prefix must begin with the canonical 0, 1 and must itself be a
    /// valid partial difference set modulo `v`. The floor is placed at the end
    /// of the prefix, so by default the search stays inside it.
    pub fn with_prefix(k: usize, prefix: &[u32]) -> Result<Self, ConfigError> {
        if !prefix.starts_with(&CANONICAL_PREFIX) {
            return Err(ConfigError::NonCanonicalPrefix {
                prefix: format_ints(prefix),
            });
        }
        if prefix.len() > k {
            return Err(ConfigError::PrefixTooLong {
                prefix: format_ints(prefix),
                k,
            });
        }

        let mut set = Self::new(k);
        for &value in prefix {
            if !set.push(value) {
                return Err(ConfigError::InvalidPrefix { value, k, v: set.v });
            }
        }
        set.floor = prefix.len();
        Ok(set)
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn v(&self) -> u32 {
        self.v
    }

    /// Committed elements, in the order they were placed.
    pub fn elements(&self) -> &[u32] {
        &self.elements
    }

    /// Number of committed elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn low(&self) -> u32 {
        self.low
    }

    pub fn trials(&self) -> u64 {
        self.trials
    }

    pub fn target_depth(&self) -> usize {
        self.target_depth
    }

    pub fn floor(&self) -> usize {
        self.floor
    }

    pub fn status(&self) -> SearchStatus {
        self.status
    }

    pub fn worker(&self) -> Option<usize> {
        self.worker
    }

    /// Whether folded difference `d` is produced by a committed pair.
    pub fn is_covered(&self, d: usize) -> bool {
        self.covered.get(d).copied().unwrap_or(false)
    }

    pub fn is_solved(&self) -> bool {
        self.len() == self.k
    }

    /// The committed prefix starts with 0, 1.
    pub fn is_canonical(&self) -> bool {
        self.elements.starts_with(&CANONICAL_PREFIX)
    }

    pub fn set_target_depth(&mut self, depth: usize) {
        self.target_depth = depth.min(self.k);
    }

    pub fn set_floor(&mut self, floor: usize) {
        self.floor = floor.min(self.len());
    }

    pub fn set_worker(&mut self, worker: usize) {
        self.worker = Some(worker);
    }

    /// Move the trial counter out of this set, leaving zero behind.
    pub fn take_trials(&mut self) -> u64 {
        std::mem::take(&mut self.trials)
    }

    /// Give up on the set without searching it further.
    pub fn mark_aborted(&mut self) {
        self.status = SearchStatus::Aborted;
    }

    /// Independent copy, including its own coverage bitmap.
    pub fn duplicate(&self) -> Self {
        self.clone()
    }

    /// Prepare a frontier set for a worker: search the whole subtree under
    /// the current prefix and nothing beyond it.
    pub fn confine_to_subtree(&mut self) {
        self.target_depth = self.k;
        self.floor = self.len();
    }

    /// Try to append `candidate`.
    ///
    /// Returns false without changing anything when the candidate is out of
    /// range, the set is full, or one of its differences is already covered.
    pub fn push(&mut self, candidate: u32) -> bool {
        if candidate >= self.v || self.elements.len() == self.k {
            return false;
        }

        for i in 0..self.elements.len() {
            let d = fold(candidate, self.elements[i], self.v);
            if self.is_covered(d) {
                // Marks from this attempt are provisional until it is accepted.
                for &earlier in &self.elements[..i] {
                    self.covered[fold(candidate, earlier, self.v)] = false;
                }
                return false;
            }
            self.covered[d] = true;
        }

        self.elements.push(candidate);

        let half = self.v / 2;
        while self.low < half && self.covered[self.low as usize + 1] {
            self.low += 1;
        }
        true
    }

    /// Remove the last committed element and return it.
    ///
    /// # Panics
    /// Panics when the set is empty: that means the floor was bypassed and the
    /// backtracking state is corrupt.
    pub fn pop(&mut self) -> u32 {
        let Some(removed) = self.elements.pop() else {
            panic!("pop on an empty set: {self}");
        };

        for &element in &self.elements {
            let d = fold(removed, element, self.v);
            self.covered[d] = false;
            if d as u32 <= self.low {
                self.low = d as u32 - 1;
            }
        }
        removed
    }

    /// Continue the search from the prefix's natural next candidate.
    ///
    /// # Panics
    /// Panics when fewer than two elements are committed.
    pub fn find(&mut self) -> SearchStatus {
        self.find_observed(0, |_| ControlFlow::Continue(()))
    }

    /// [`find`](Self::find) with an observer called every `interval` trials.
    ///
    /// # Panics
    /// Panics when fewer than two elements are committed.
    pub fn find_observed<F>(&mut self, interval: u64, observer: F) -> SearchStatus
    where
        F: FnMut(&Self) -> ControlFlow<()>,
    {
        assert!(
            self.len() >= 2,
            "find needs at least two committed elements: {self}"
        );
        let last = self.elements[self.elements.len() - 1];
        let candidate = last + self.low + 1;
        self.advance_observed(candidate, interval, observer)
    }

    /// Depth-first search starting with `candidate` as the next element.
    pub fn advance(&mut self, candidate: u32) -> SearchStatus {
        self.advance_observed(candidate, 0, |_| ControlFlow::Continue(()))
    }

    /// Depth-first search starting with `candidate` as the next element.
    ///
    /// Stops when the set is complete, when it reaches the target depth, when
    /// backtracking would pop below the floor, or when `observer` (called every
    /// `interval` trials; zero disables it) breaks.
    pub fn advance_observed<F>(
        &mut self,
        mut candidate: u32,
        interval: u64,
        mut observer: F,
    ) -> SearchStatus
    where
        F: FnMut(&Self) -> ControlFlow<()>,
    {
        self.status = SearchStatus::Running;
        loop {
            if self.is_solved() {
                self.status = SearchStatus::Solved;
                return self.status;
            }
            if self.elements.len() == self.target_depth {
                self.status = SearchStatus::Frontier;
                return self.status;
            }

            self.trials += 1;
            if interval != 0 && self.trials % interval == 0 && observer(&*self).is_break() {
                self.status = SearchStatus::Aborted;
                return self.status;
            }

            if self.push(candidate) {
                // Anything closer than low + 1 repeats a covered difference.
                candidate += self.low + 1;
                continue;
            }

            candidate += 1;

            // Remaining slots cannot fit below v at the minimum spacing.
            let remaining = (self.k - self.elements.len() - 1) as u32;
            if candidate + (self.low + 1) * remaining >= self.v - self.low {
                if self.elements.len() <= self.floor {
                    self.status = SearchStatus::Exhausted;
                    return self.status;
                }
                candidate = self.pop() + 1;
            }
        }
    }
}

impl std::fmt::Display for ProvisionalSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({}, {}) @{}: {}",
            self.k,
            self.v,
            commas(self.trials),
            format_ints(&self.elements)
        )?;
        if !self.is_solved() {
            write!(f, " (low = {}, target = {})", self.low, self.target_depth)?;
        }
        Ok(())
    }
}

/// Check the difference-set property by tabulating every ordered pair.
///
/// Independent of any coverage bitmap: the k * (k - 1) differences of
/// `elements` modulo k * (k - 1) + 1 must hit each nonzero residue once.
pub fn is_difference_set(elements: &[u32]) -> bool {
    let k = elements.len();
    if k < 2 {
        return false;
    }
    let v = modulus(k);
    if elements.iter().any(|&e| e >= v) {
        return false;
    }

    let mut hits = vec![0u32; v as usize];
    for (i, &a) in elements.iter().enumerate() {
        for (j, &b) in elements.iter().enumerate() {
            if i != j {
                hits[((a + v - b) % v) as usize] += 1;
            }
        }
    }
    hits[0] == 0 && hits[1..].iter().all(|&n| n == 1)
}
