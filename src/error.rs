//! Error types for configuration and search orchestration

use thiserror::Error;

/// Problems with the requested search, detected before any work starts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A set size outside the supported range.
    #[error("set size {k} is outside the supported range {min}..={max}")]
    SizeOutOfRange { k: usize, min: usize, max: usize },
    /// The range ends before it starts.
    #[error("ending size {end} is smaller than starting size {start}")]
    EmptyRange { start: usize, end: usize },
    /// The prefix does not begin with the canonical elements 0, 1.
    #[error("prefix [{prefix}] does not begin with 0, 1")]
    NonCanonicalPrefix { prefix: String },
    /// The prefix has more elements than the set it should start.
    #[error("prefix [{prefix}] has more than {k} elements")]
    PrefixTooLong { prefix: String, k: usize },
    /// A prefix element is out of range or repeats a difference.
    #[error("prefix value {value} cannot extend a difference set of size {k} (v = {v})")]
    InvalidPrefix { value: u32, k: usize, v: u32 },
    #[error("at least one worker thread is required")]
    NoWorkers,
}

/// Failures while running the parallel search.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// A pipeline thread could not be started.
    #[error("failed to spawn {role} thread: {source}")]
    Spawn {
        role: &'static str,
        #[source]
        source: std::io::Error,
    },
    /// A pipeline thread panicked.
    #[error("{role} thread panicked")]
    ThreadPanicked { role: &'static str },
    /// A worker stopped accepting work while the coordinator still owned it.
    #[error("worker {worker_id} disconnected")]
    WorkerDisconnected { worker_id: usize },
}
