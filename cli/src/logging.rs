use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use crate::args::{Args, Format};

const DEFAULT_FILTER: &str = "inbox_archiver=info,warn";

/// Installs the global subscriber. Logs go to stderr so a JSON report on
/// stdout stays parseable.
pub fn init(args: &Args) -> Result<()> {
    let filter = if args.quiet {
        EnvFilter::new("warn")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match args.log_format {
        Format::Text => tracing::subscriber::set_global_default(builder.finish()),
        Format::Json => tracing::subscriber::set_global_default(builder.json().finish()),
    }
    .context("Failed to install tracing subscriber")?;

    // The directory store logs through the `log` facade.
    tracing_log::LogTracer::init().context("Failed to install log bridge")?;
    Ok(())
}
