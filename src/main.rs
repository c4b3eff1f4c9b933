use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

mod error;
mod logging;
mod search;

use error::ConfigError;
use search::candidate::MAX_K;
use search::config::SearchConfig;
use search::parallel::{ParallelConfig, SkipCutoff, run_parallel_search};
use search::result::format_ints;

/// Exit status after an interrupt, as a shell reports SIGINT.
const EXIT_INTERRUPTED: u8 = 130;

// --- Command Line Arguments ---

#[derive(Parser, Debug)]
#[command(name = "diffset")]
#[command(about = "diffset - search for perfect cyclic difference sets")]
#[command(version)]
struct Args {
    /// Smallest set size (k) to search
    #[arg(default_value_t = 2)]
    start: usize,
    /// Largest set size; defaults to 103, or to START when --prefix is given
    end: Option<usize>,
    /// Comma separated elements every set begins with (must start with 0,1)
    #[arg(short, long, value_delimiter = ',')]
    prefix: Option<Vec<u32>>,
    /// Continue past the prefix instead of searching only sets that begin with it
    #[arg(short = 'c', long = "continue")]
    continue_past_prefix: bool,
    /// Number of worker threads (default: number of CPUs)
    #[arg(short = 'j', long)]
    workers: Option<usize>,
    /// Seconds between progress reports
    #[arg(long, default_value_t = 1)]
    progress_secs: u64,
    /// Trials between worker snapshots and abort checks
    #[arg(long, default_value_t = 1_000_000)]
    snapshot_trials: u64,
    /// Suppress periodic progress lines
    #[arg(short, long)]
    quiet: bool,
}

impl Args {
    fn search_config(&self) -> SearchConfig {
        let config = match (self.end, &self.prefix) {
            (Some(end), _) => SearchConfig::default().with_range(self.start, end),
            (None, Some(_)) => SearchConfig::default().with_size(self.start),
            (None, None) => SearchConfig::default().with_range(self.start, MAX_K),
        }
        .with_continue(self.continue_past_prefix);
        match &self.prefix {
            Some(prefix) => config.with_prefix(prefix.clone()),
            None => config,
        }
    }

    fn parallel_config(&self) -> Result<ParallelConfig, ConfigError> {
        if self.workers == Some(0) {
            return Err(ConfigError::NoWorkers);
        }
        Ok(ParallelConfig::default()
            .with_workers_option(self.workers)
            .with_progress_interval(Duration::from_secs(self.progress_secs))
            .with_snapshot_interval(self.snapshot_trials)
            .with_progress(!self.quiet))
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(err) = logging::init_logging() {
        eprintln!("Error initialising logging: {err}");
        return ExitCode::FAILURE;
    }

    let search_config = args.search_config();
    let parallel_config = match args.parallel_config() {
        Ok(config) => config,
        Err(err) => {
            error!("{err}");
            return ExitCode::FAILURE;
        }
    };

    let cutoff = Arc::new(SkipCutoff::default());
    let handler_cutoff = Arc::clone(&cutoff);
    if let Err(err) = ctrlc::set_handler(move || handler_cutoff.cancel()) {
        warn!("interrupt handler not installed: {err}");
    }

    info!(
        start = search_config.start,
        end = search_config.end,
        prefix = %format_ints(&search_config.prefix),
        continue_past_prefix = search_config.continue_past_prefix,
        workers = parallel_config.num_workers,
        "searching for perfect difference sets"
    );

    let result = run_parallel_search(&search_config, &parallel_config, cutoff, |solution| {
        println!("{solution}");
    });

    match result {
        Ok(summary) => {
            for line in summary.format_summary().lines() {
                info!("{line}");
            }
            let unsolved = summary.unsolved_sizes();
            if !unsolved.is_empty() && !summary.cancelled {
                info!(?unsolved, "no difference set under the given prefix");
            }
            if summary.cancelled {
                warn!("search interrupted");
                ExitCode::from(EXIT_INTERRUPTED)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
