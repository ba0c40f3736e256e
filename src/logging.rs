//! Logging setup for the binary.
//!
//! Installs a global tracing subscriber writing to stderr, filtered by
//! `RUST_LOG` with `info` as the fallback level.

use tracing_subscriber::{fmt, prelude::*, EnvFilter, Registry};

/// Errors that may occur while initializing logging.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    /// `RUST_LOG` could not be parsed into a filter.
    #[error("Invalid log filter: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),
    /// Another subscriber was installed first.
    #[error("Failed to install global tracing subscriber: {0}")]
    SetGlobal(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// Initialize tracing. Must be called at most once per process.
pub fn init() -> Result<(), LoggingError> {
    let env_filter = build_env_filter(std::env::var("RUST_LOG").ok().as_deref())?;
    let stderr_layer = fmt::layer().with_target(false).with_writer(std::io::stderr);
    let subscriber = Registry::default().with(env_filter).with(stderr_layer);
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn build_env_filter(directives: Option<&str>) -> Result<EnvFilter, LoggingError> {
    match directives {
        Some(directives) if !directives.trim().is_empty() => Ok(EnvFilter::try_new(directives)?),
        _ => Ok(EnvFilter::new("info")),
    }
}
