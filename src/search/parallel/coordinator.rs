//! Parallel search coordinator that owns the dispatch and skip protocol.

use crate::error::SearchError;
use crate::search::config::SearchConfig;
use crate::search::parallel::channel::{
    CoordinatorChannels, MonitorEvent, SkipCutoff, WorkerMessage, create_channels,
};
use crate::search::parallel::config::ParallelConfig;
use crate::search::parallel::generator::{FrontierGenerator, spawn_generator};
use crate::search::parallel::monitor::run_monitor;
use crate::search::parallel::worker::run_worker;
use crate::search::provisional::{ProvisionalSet, is_difference_set};
use crate::search::result::{RunSummary, SearchStatus, Solution};
use crossbeam_channel::{Receiver, bounded, never, select};
use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Instant;
use tracing::{debug, info, trace};

/// Run the search pipeline over every size in `search_config`.
///
/// `on_solution` is called on the calling thread once per solved size, in
/// the order solutions are reported. Raising `cutoff` from outside (for
/// example with [`SkipCutoff::cancel`]) stops the run early.
pub fn run_parallel_search<F>(
    search_config: &SearchConfig,
    parallel_config: &ParallelConfig,
    cutoff: Arc<SkipCutoff>,
    on_solution: F,
) -> Result<RunSummary, SearchError>
where
    F: FnMut(&Solution),
{
    let start_time = Instant::now();
    let sizes = search_config.validate()?;
    let num_workers = parallel_config.num_workers.max(1);

    let (coordinator_channels, worker_channels, monitor_channels) =
        create_channels(num_workers, Arc::clone(&cutoff));

    let mut worker_handles = Vec::with_capacity(num_workers);
    for channels in worker_channels {
        let snapshot_interval = parallel_config.snapshot_interval;
        let handle = std::thread::Builder::new()
            .name(format!("worker-{}", channels.worker_id))
            .spawn(move || run_worker(channels, snapshot_interval))
            .map_err(|source| SearchError::Spawn {
                role: "worker",
                source,
            })?;
        worker_handles.push(handle);
    }

    let progress_interval = parallel_config.progress_interval;
    let report_progress = parallel_config.report_progress;
    let monitor_handle = std::thread::Builder::new()
        .name("monitor".to_string())
        .spawn(move || run_monitor(monitor_channels, progress_interval, report_progress))
        .map_err(|source| SearchError::Spawn {
            role: "monitor",
            source,
        })?;

    // Rendezvous: the generator only runs ahead by the set it is offering.
    let (frontier_tx, frontier_rx) = bounded(0);
    let generator = FrontierGenerator::new(
        sizes.clone(),
        search_config.prefix.clone(),
        search_config.floor(),
        Arc::clone(&cutoff),
        parallel_config.snapshot_interval,
    );
    let generator_handle =
        spawn_generator(generator, frontier_tx).map_err(|source| SearchError::Spawn {
            role: "generator",
            source,
        })?;

    let mut summary = RunSummary {
        sizes,
        ..RunSummary::default()
    };
    let mut dispatcher = Dispatcher {
        channels: coordinator_channels,
        idle: VecDeque::with_capacity(num_workers),
        busy: 0,
        trials_by_size: BTreeMap::new(),
    };
    let loop_result = dispatcher.run(frontier_rx, &mut summary, on_solution);

    let Dispatcher {
        channels,
        trials_by_size,
        ..
    } = dispatcher;
    let CoordinatorChannels {
        from_workers,
        to_workers,
        to_monitor,
        ..
    } = channels;

    // Closing the work queues ends each worker's loop.
    drop(to_workers);
    join("generator", generator_handle)?;
    let mut worker_trials = 0;
    for handle in worker_handles {
        worker_trials += join("worker", handle)?;
    }
    drop(from_workers);
    drop(to_monitor);
    let monitored_trials = join("monitor", monitor_handle)?;
    loop_result?;

    summary.total_trials = trials_by_size.values().sum();
    summary.elapsed_time = start_time.elapsed();
    summary.cancelled = cutoff.is_cancelled();
    debug!(
        worker_trials,
        monitored_trials,
        total_trials = summary.total_trials,
        "pipeline stopped"
    );
    Ok(summary)
}

/// Coordinator-side state for the dispatch loop.
struct Dispatcher {
    channels: CoordinatorChannels,
    /// Registered workers with an empty queue, oldest first.
    idle: VecDeque<usize>,
    /// Sets handed out and not yet returned.
    busy: usize,
    trials_by_size: BTreeMap<usize, u64>,
}

impl Dispatcher {
    /// Pair frontier sets with idle workers until the generator is done and
    /// every dispatched set has come back.
    fn run<F>(
        &mut self,
        frontier: Receiver<ProvisionalSet>,
        summary: &mut RunSummary,
        mut on_solution: F,
    ) -> Result<(), SearchError>
    where
        F: FnMut(&Solution),
    {
        let from_workers = self.channels.from_workers.clone();
        let mut generator_done = false;

        while !(generator_done && self.busy == 0) {
            // Only accept work when someone can take it; this is what keeps
            // the generator blocked while every worker is busy.
            let offered = if generator_done || self.idle.is_empty() {
                never()
            } else {
                frontier.clone()
            };

            select! {
                recv(from_workers) -> msg => match msg {
                    Ok(WorkerMessage::Ready { worker_id }) => {
                        trace!(worker_id, "worker ready");
                        self.idle.push_back(worker_id);
                    }
                    Ok(WorkerMessage::Finished { worker_id, set }) => {
                        self.busy -= 1;
                        self.idle.push_back(worker_id);
                        self.record_finished(set, summary, &mut on_solution);
                    }
                    // Every worker is gone; joining them reports why.
                    Err(_) => break,
                },
                recv(offered) -> msg => match msg {
                    Ok(set) => self.dispatch(set, summary)?,
                    Err(_) => generator_done = true,
                },
            }
        }
        Ok(())
    }

    fn dispatch(
        &mut self,
        set: ProvisionalSet,
        summary: &mut RunSummary,
    ) -> Result<(), SearchError> {
        let k = set.k();
        if self.channels.cutoff.is_settled(k) {
            trace!(k, set = %set, "discarding frontier set for settled size");
            summary.discarded += 1;
            *self.trials_by_size.entry(k).or_default() += set.trials();
            let _ = self.channels.to_monitor.send(MonitorEvent::Completed(set));
            return Ok(());
        }

        let Some(worker_id) = self.idle.pop_front() else {
            unreachable!("frontier sets are only received while a worker is idle");
        };
        self.channels.to_workers[worker_id]
            .send(set)
            .map_err(|_| SearchError::WorkerDisconnected { worker_id })?;
        self.busy += 1;
        summary.dispatched += 1;
        Ok(())
    }

    fn record_finished<F>(
        &mut self,
        set: ProvisionalSet,
        summary: &mut RunSummary,
        on_solution: &mut F,
    ) where
        F: FnMut(&Solution),
    {
        let k = set.k();
        let trials = self.trials_by_size.entry(k).or_default();
        *trials += set.trials();

        // The first report for a size wins; later ones arrive already settled.
        if set.status() == SearchStatus::Solved && self.channels.cutoff.raise(k) {
            debug_assert!(is_difference_set(set.elements()), "not a difference set: {set}");
            let solution = Solution::from_set(&set, *trials);
            info!(
                k = solution.k,
                v = solution.v,
                trials = solution.trials,
                worker = ?solution.worker,
                "found difference set"
            );
            on_solution(&solution);
            summary.solutions.push(solution);
        }

        let _ = self.channels.to_monitor.send(MonitorEvent::Completed(set));
    }
}

fn join<T>(role: &'static str, handle: JoinHandle<T>) -> Result<T, SearchError> {
    handle.join().map_err(|_| SearchError::ThreadPanicked { role })
}
