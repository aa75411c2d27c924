//! Tracing subscriber setup
//!
//! Log events go to stderr so they never mix with forwarded child output or
//! the captured line printed on stdout.

use anyhow::{Context, Result};
use clap::ValueEnum;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Development: pretty formatting with colors
    Pretty,
    /// Production: JSON structured logging
    Json,
}

/// Filter used when `RUST_LOG` is not set
pub fn default_directives(debug: bool) -> &'static str {
    if debug {
        "cmdrun=debug,runcmd=debug"
    } else {
        "cmdrun=info,runcmd=info"
    }
}

/// Install the global subscriber
///
/// # Environment Variables
///
/// - `RUST_LOG`: overrides the default filter
pub fn init(format: LogFormat, debug: bool) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directives(debug)))
        .context("Failed to create env filter")?;

    let registry = tracing_subscriber::registry().with(env_filter);

    match format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Pretty => registry
            .with(fmt::layer().pretty().with_writer(std::io::stderr))
            .try_init(),
    }
    .context("Failed to install tracing subscriber")
}
