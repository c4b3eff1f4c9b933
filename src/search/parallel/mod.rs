//! Parallel search pipeline: one generator, a pool of workers, a monitor and
//! the coordinator loop on the calling thread.
//!
//! # Architecture
//!
//! - The **generator** deepens each set size to a shallow frontier and offers
//!   one independent subtree at a time over a rendezvous channel.
//! - The **coordinator** hands each offered set to an idle worker, discards
//!   sets whose size is already settled and reports the first solution per
//!   size.
//! - **Workers** complete one subtree at a time, checking the shared
//!   [`SkipCutoff`] every few trials.
//! - The **monitor** owns the per-worker statistics table and logs progress.
//!
//! # Example
//!
//! ```ignore
//! use diffset_search::search::parallel::{ParallelConfig, SkipCutoff, run_parallel_search};
//!
//! let config = ParallelConfig::default().with_workers(4);
//! let summary = run_parallel_search(
//!     &SearchConfig::default().with_range(2, 20),
//!     &config,
//!     Arc::new(SkipCutoff::default()),
//!     |solution| println!("{solution}"),
//! )?;
//! ```

pub mod channel;
pub mod config;
pub mod coordinator;
pub mod generator;
pub mod monitor;
pub mod worker;

pub use channel::SkipCutoff;
pub use config::ParallelConfig;
pub use coordinator::run_parallel_search;
