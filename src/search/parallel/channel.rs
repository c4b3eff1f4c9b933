//! Channels and shared state connecting the search pipeline.

use crate::search::candidate::MAX_K;
use crate::search::provisional::ProvisionalSet;
use crossbeam_channel::{Receiver, Sender, bounded, unbounded};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Cutoff value used to stop every size.
pub const CANCELLED: usize = usize::MAX;

/// Message sent from workers to the coordinator.
#[derive(Debug, Clone)]
pub enum WorkerMessage {
    /// Worker is ready for its first set. Sent once.
    Ready { worker_id: usize },
    /// Worker finished (solved, exhausted or aborted) the set it was given
    /// and is ready for another.
    Finished { worker_id: usize, set: ProvisionalSet },
}

/// Message sent from the coordinator to the progress monitor.
#[derive(Debug, Clone)]
pub enum MonitorEvent {
    /// A frontier set was searched by a worker or discarded unsearched.
    Completed(ProvisionalSet),
}

/// Monotonic skip signal shared by the generator, workers and coordinator.
///
/// The cutoff is the largest k solved so far and only ever grows. Because
/// several sizes can be in flight at once, each size also carries its own
/// solved flag: workers abort on their own size being settled, not on a
/// larger one.
#[derive(Debug)]
pub struct SkipCutoff {
    cutoff: AtomicUsize,
    solved: Vec<AtomicBool>,
}

impl Default for SkipCutoff {
    fn default() -> Self {
        Self {
            cutoff: AtomicUsize::new(0),
            solved: (0..=MAX_K).map(|_| AtomicBool::new(false)).collect(),
        }
    }
}

impl SkipCutoff {
    /// Largest size recorded so far ([`CANCELLED`] after cancellation).
    pub fn current(&self) -> usize {
        self.cutoff.load(Ordering::SeqCst)
    }

    /// Record a solution for `k`. Returns true only for the first call per
    /// size, which is the one entitled to report it. Nothing is reported
    /// once the search has been cancelled.
    pub fn raise(&self, k: usize) -> bool {
        if self.is_cancelled() {
            return false;
        }
        let first = match self.solved.get(k) {
            Some(flag) => !flag.swap(true, Ordering::SeqCst),
            None => false,
        };
        if first {
            self.raise_to(k);
        }
        first
    }

    /// Raise the cutoff to at least `k`.
    fn raise_to(&self, k: usize) {
        let mut current = self.cutoff.load(Ordering::SeqCst);
        while k > current {
            match self.cutoff.compare_exchange_weak(
                current,
                k,
                Ordering::SeqCst,
                Ordering::SeqCst,
            ) {
                Ok(_) => return,
                Err(c) => current = c,
            }
        }
    }

    /// The generator should emit no more work for `k`.
    pub fn covers(&self, k: usize) -> bool {
        self.current() >= k
    }

    /// Work on `k` is pointless: it was solved or the run was cancelled.
    pub fn is_settled(&self, k: usize) -> bool {
        self.is_cancelled()
            || self
                .solved
                .get(k)
                .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }

    /// Stop all sizes.
    pub fn cancel(&self) {
        self.raise_to(CANCELLED);
    }

    pub fn is_cancelled(&self) -> bool {
        self.current() == CANCELLED
    }
}

/// Channel endpoints for a worker.
pub struct WorkerChannels {
    pub worker_id: usize,
    /// Single-slot queue of sets to complete.
    pub work: Receiver<ProvisionalSet>,
    /// Send results and registration to the coordinator.
    pub to_coordinator: Sender<WorkerMessage>,
    /// Best-effort in-flight snapshots for the monitor.
    pub snapshots: Sender<ProvisionalSet>,
    pub cutoff: Arc<SkipCutoff>,
}

/// Channel endpoints for the coordinator.
pub struct CoordinatorChannels {
    /// Receive registration and results from workers.
    pub from_workers: Receiver<WorkerMessage>,
    /// One single-slot work queue per worker, indexed by worker id.
    pub to_workers: Vec<Sender<ProvisionalSet>>,
    /// Forward completions to the monitor.
    pub to_monitor: Sender<MonitorEvent>,
    pub cutoff: Arc<SkipCutoff>,
}

/// Channel endpoints for the progress monitor.
pub struct MonitorChannels {
    pub snapshots: Receiver<ProvisionalSet>,
    pub events: Receiver<MonitorEvent>,
}

/// Create channels for a pipeline with the given number of workers.
pub fn create_channels(
    num_workers: usize,
    cutoff: Arc<SkipCutoff>,
) -> (CoordinatorChannels, Vec<WorkerChannels>, MonitorChannels) {
    // Unbounded channel from workers to coordinator (workers shouldn't block)
    let (worker_tx, coordinator_rx) = unbounded();
    // Small buffer for snapshots; workers drop snapshots when it is full
    let (snapshot_tx, snapshot_rx) = bounded(2 * num_workers.max(1));
    let (monitor_tx, monitor_rx) = unbounded();

    let mut to_workers = Vec::with_capacity(num_workers);
    let mut worker_channels = Vec::with_capacity(num_workers);

    for worker_id in 0..num_workers {
        let (work_tx, work_rx) = bounded(1);
        to_workers.push(work_tx);
        worker_channels.push(WorkerChannels {
            worker_id,
            work: work_rx,
            to_coordinator: worker_tx.clone(),
            snapshots: snapshot_tx.clone(),
            cutoff: Arc::clone(&cutoff),
        });
    }

    let coordinator = CoordinatorChannels {
        from_workers: coordinator_rx,
        to_workers,
        to_monitor: monitor_tx,
        cutoff,
    };
    let monitor = MonitorChannels {
        snapshots: snapshot_rx,
        events: monitor_rx,
    };

    (coordinator, worker_channels, monitor)
}
