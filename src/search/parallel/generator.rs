//! Frontier generator: fans each set size out into independent subtrees.
//!
//! For every size the generator deepens one parent set to a shallow frontier
//! depth and yields a copy of it at each frontier prefix, stepping the parent
//! to its next sibling in between. Copies carry the trials the parent spent
//! since the previous copy, so per-size trial totals stay exact.

use crate::search::parallel::channel::SkipCutoff;
use crate::search::provisional::ProvisionalSet;
use crate::search::result::SearchStatus;
use crossbeam_channel::Sender;
use std::ops::ControlFlow;
use std::sync::Arc;
use std::thread::JoinHandle;
use tracing::{debug, trace};

/// Depth at which sets are handed to workers.
///
/// Two past the prefix, capped at k, and never shallower than (k - 4) / 2 so
/// large sizes still fan out into enough pieces to keep every worker busy.
pub fn frontier_depth(prefix_len: usize, k: usize) -> usize {
    let depth = (prefix_len + 2).min(k);
    depth.max(k.saturating_sub(4) / 2)
}

/// Iterator over frontier sets for a sequence of set sizes
pub struct FrontierGenerator {
    sizes: std::vec::IntoIter<usize>,
    prefix: Vec<u32>,
    floor: usize,
    cutoff: Arc<SkipCutoff>,
    check_interval: u64,
    parent: Option<ProvisionalSet>,
    /// The last yielded set is still the parent's state; step before reuse.
    step_pending: bool,
}

impl FrontierGenerator {
    /// `floor` is the shortest prefix the parent may backtrack to.
    pub fn new(
        sizes: Vec<usize>,
        prefix: Vec<u32>,
        floor: usize,
        cutoff: Arc<SkipCutoff>,
        check_interval: u64,
    ) -> Self {
        Self {
            sizes: sizes.into_iter(),
            prefix,
            floor,
            cutoff,
            check_interval,
            parent: None,
            step_pending: false,
        }
    }

    /// Search `k` from the prefix down to its first frontier.
    fn seed(&self, k: usize) -> Option<ProvisionalSet> {
        let mut parent = match ProvisionalSet::with_prefix(k, &self.prefix) {
            Ok(set) => set,
            Err(err) => {
                debug!(k, error = %err, "prefix does not extend to this size");
                return None;
            }
        };
        parent.set_floor(self.floor);
        parent.set_target_depth(frontier_depth(self.prefix.len(), k));

        // A prefix that already fills the set comes back Solved without a trial.
        let cutoff = &self.cutoff;
        let status = parent.find_observed(self.check_interval, |_| stop_if_covered(cutoff, k));
        debug!(
            k,
            %status,
            target = parent.target_depth(),
            floor = parent.floor(),
            low = parent.low(),
            "generator seeded size"
        );
        matches!(status, SearchStatus::Frontier | SearchStatus::Solved).then_some(parent)
    }
}

fn stop_if_covered(cutoff: &SkipCutoff, k: usize) -> ControlFlow<()> {
    if cutoff.covers(k) {
        ControlFlow::Break(())
    } else {
        ControlFlow::Continue(())
    }
}

impl Iterator for FrontierGenerator {
    type Item = ProvisionalSet;

    fn next(&mut self) -> Option<ProvisionalSet> {
        loop {
            if self.cutoff.is_cancelled() {
                return None;
            }

            let Some(parent) = self.parent.as_mut() else {
                let k = self.sizes.next()?;
                if self.cutoff.covers(k) {
                    debug!(k, "size already covered, skipping");
                    continue;
                }
                self.parent = self.seed(k);
                self.step_pending = false;
                continue;
            };

            let k = parent.k();
            if self.step_pending {
                self.step_pending = false;
                let cutoff = &self.cutoff;
                let candidate = parent.pop() + 1;
                parent.advance_observed(candidate, self.check_interval, |_| {
                    stop_if_covered(cutoff, k)
                });
            }

            let ready = parent.is_solved()
                || matches!(parent.status(), SearchStatus::Frontier | SearchStatus::Solved);
            if self.cutoff.covers(k) || !ready {
                debug!(k, status = %parent.status(), "generator finished size");
                self.parent = None;
                continue;
            }
            debug_assert!(parent.is_canonical());

            // The copy carries the trials spent reaching it; the parent starts over.
            let frontier = parent.duplicate();
            parent.take_trials();
            if frontier.is_solved() {
                self.parent = None;
            } else {
                self.step_pending = true;
            }
            trace!(set = %frontier, "frontier");
            return Some(frontier);
        }
    }
}

/// Run a generator on its own thread, feeding sets into `sets`.
///
/// The thread ends when the generator is exhausted or the receiver is
/// dropped; dropping the sender tells the coordinator no more work is coming.
pub fn spawn_generator(
    generator: FrontierGenerator,
    sets: Sender<ProvisionalSet>,
) -> std::io::Result<JoinHandle<()>> {
    std::thread::Builder::new()
        .name("generator".to_string())
        .spawn(move || {
            let mut emitted = 0u64;
            for set in generator {
                if sets.send(set).is_err() {
                    break;
                }
                emitted += 1;
            }
            debug!(emitted, "generator finished");
        })
}
