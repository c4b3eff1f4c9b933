//! Worker loop: completes one frontier set at a time.

use crate::search::parallel::channel::{WorkerChannels, WorkerMessage};
use std::ops::ControlFlow;
use tracing::{debug, trace};

/// Register with the coordinator, then complete every set it hands over.
///
/// Each set is searched to depth k without backtracking above the prefix it
/// arrived with. Every `snapshot_interval` trials the worker offers a copy to
/// the monitor and checks whether its size has been settled elsewhere.
/// Returns the number of trials this worker spent.
pub fn run_worker(channels: WorkerChannels, snapshot_interval: u64) -> u64 {
    let WorkerChannels {
        worker_id,
        work,
        to_coordinator,
        snapshots,
        cutoff,
    } = channels;

    if to_coordinator
        .send(WorkerMessage::Ready { worker_id })
        .is_err()
    {
        return 0;
    }
    debug!(worker_id, "worker registered");

    let mut total_trials = 0;
    for mut set in work.iter() {
        set.set_worker(worker_id);
        let k = set.k();

        if cutoff.is_settled(k) {
            trace!(worker_id, k, "size settled before start");
            set.mark_aborted();
        } else {
            let before = set.trials();
            set.confine_to_subtree();
            let status = set.find_observed(snapshot_interval, |current| {
                // A full snapshot channel only costs the monitor one sample.
                let _ = snapshots.try_send(current.duplicate());
                if cutoff.is_settled(k) {
                    ControlFlow::Break(())
                } else {
                    ControlFlow::Continue(())
                }
            });
            total_trials += set.trials() - before;
            trace!(worker_id, %status, set = %set, "worker finished set");
        }

        if to_coordinator
            .send(WorkerMessage::Finished { worker_id, set })
            .is_err()
        {
            break;
        }
    }

    debug!(worker_id, total_trials, "worker stopped");
    total_trials
}
