//! Logging initialisation for the `diffset` binary.
//!
//! Solutions are the only output on stdout; banners, progress lines and
//! errors go through `tracing` to stderr.

use std::io::IsTerminal;
use std::{env, sync::OnceLock};

use thiserror::Error;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_FORMAT_ENV: &str = "DIFFSET_LOG_FORMAT";

static INITIALISED: OnceLock<()> = OnceLock::new();

/// Output format of diagnostic events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Human,
    Json,
}

/// Errors raised while initialising structured logging.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("environment variable `{name}` contained invalid UTF-8: {source}")]
    InvalidUnicode {
        name: &'static str,
        #[source]
        source: env::VarError,
    },
    /// Unsupported value in `DIFFSET_LOG_FORMAT`.
    #[error("unsupported log format `{provided}`; expected `human` or `json`")]
    UnsupportedFormat { provided: String },
    #[error("failed to install tracing subscriber: {source}")]
    InstallFailed {
        #[source]
        source: tracing_subscriber::util::TryInitError,
    },
}

/// Install the global subscriber once.
///
/// `DIFFSET_LOG_FORMAT=json` switches to JSON lines; `RUST_LOG` sets the
/// filter and defaults to `info`. Colour is used only when stderr is a
/// terminal.
///
/// # Errors
/// Returns [`LoggingError`] when the format variable is unreadable or
/// unsupported. A subscriber installed elsewhere is kept and reported once.
pub fn init_logging() -> Result<(), LoggingError> {
    if INITIALISED.get().is_some() {
        return Ok(());
    }

    match install_subscriber() {
        Ok(()) => {}
        Err(LoggingError::InstallFailed { source }) => {
            eprintln!("logging already configured elsewhere: {source}");
        }
        Err(err) => return Err(err),
    }
    let _ = INITIALISED.set(());
    Ok(())
}

fn install_subscriber() -> Result<(), LoggingError> {
    let format = match env::var(LOG_FORMAT_ENV) {
        Ok(raw) => parse_log_format(&raw)?,
        Err(env::VarError::NotPresent) => LogFormat::default(),
        Err(err @ env::VarError::NotUnicode(_)) => {
            return Err(LoggingError::InvalidUnicode {
                name: LOG_FORMAT_ENV,
                source: err,
            });
        }
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_thread_names(true);

    let fmt_layer = match format {
        LogFormat::Human => fmt_layer
            .with_ansi(std::io::stderr().is_terminal())
            .boxed(),
        LogFormat::Json => fmt_layer.json().with_current_span(true).boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|source| LoggingError::InstallFailed { source })
}

fn parse_log_format(raw: &str) -> Result<LogFormat, LoggingError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "" | "human" => Ok(LogFormat::Human),
        "json" => Ok(LogFormat::Json),
        other => Err(LoggingError::UnsupportedFormat {
            provided: other.to_owned(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case("human", LogFormat::Human)]
    #[case("", LogFormat::Human)]
    #[case("JSON", LogFormat::Json)]
    #[case(" json ", LogFormat::Json)]
    fn test_parse_log_format(#[case] raw: &str, #[case] expected: LogFormat) {
        assert_eq!(parse_log_format(raw).unwrap(), expected);
    }

    #[test]
    fn test_parse_log_format_rejects_unknown() {
        match parse_log_format("yaml") {
            Err(LoggingError::UnsupportedFormat { provided }) => assert_eq!(provided, "yaml"),
            other => panic!("Unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_init_logging_is_idempotent() {
        init_logging().unwrap();
        init_logging().unwrap();
    }
}
