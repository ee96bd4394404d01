mod args;
mod logging;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use tracing::info;

use args::{Args, Format};
use inbox_archiver::config::{default_config_path, load_config};
use inbox_archiver::{
    Archiver, ConfigFileArchivePaths, DirectoryStore, MemoryArchivePaths, RunOptions, RunReport,
};

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(&args)?;

    let report = run(&args)?;
    print_report(&report, args.report)
}

fn run(args: &Args) -> Result<RunReport> {
    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => default_config_path().context("Cannot determine the user config directory")?,
    };
    let mut config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    if let Some(days) = args.retention_days {
        config.retention_days = days;
    }
    if let Some(simulate) = args.simulate_override() {
        config.simulate = simulate;
    }

    let mail_root: PathBuf = args
        .mail_root
        .clone()
        .or_else(|| config.mail_root())
        .context("No mail root: set mail_root in the config or pass --mail-root")?;
    let store = DirectoryStore::open(&mail_root, &config.label_accounts)
        .with_context(|| format!("Failed to open mail store at {}", mail_root.display()))?;

    let mut options = RunOptions::from_config(&config);
    options.accounts = options.accounts.with_only(args.accounts.clone());
    let archiver = Archiver::new(options);
    let started_at = Utc::now();

    // Simulated runs never write the config file.
    let report = if config.simulate {
        info!("Simulate mode: no messages will be moved");
        let mut paths = MemoryArchivePaths::new(config.archive_paths.clone());
        archiver.run(&store, &mut paths, started_at)?
    } else {
        let mut paths = ConfigFileArchivePaths::new(&config_path, config.archive_paths.clone());
        archiver.run(&store, &mut paths, started_at)?
    };
    Ok(report)
}

fn print_report(report: &RunReport, format: Format) -> Result<()> {
    match format {
        Format::Text => {
            let mode = if report.simulate { "Simulated run" } else { "Run" };
            println!("{} finished, cutoff {}", mode, report.cutoff.to_rfc3339());
            println!("{}", report.summary);
        }
        Format::Json => {
            let json =
                serde_json::to_string_pretty(report).context("Failed to encode run report")?;
            println!("{}", json);
        }
    }
    Ok(())
}
