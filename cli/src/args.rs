use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[clap(name = "inbox-archiver")]
#[clap(author, version, about)]
pub struct Args {
    /// Config file. Defaults to inbox-archiver/config.json in the user
    /// config directory.
    #[clap(long)]
    pub config: Option<PathBuf>,
    /// Root of the mail directory tree, overriding `mail_root`.
    #[clap(long)]
    pub mail_root: Option<PathBuf>,
    /// Only log what would be moved.
    #[clap(long, conflicts_with = "live")]
    pub simulate: bool,
    /// Move messages, even if the config asks for simulation.
    #[clap(long)]
    pub live: bool,
    /// Keep messages received within this many days in the inbox.
    #[clap(long)]
    pub retention_days: Option<u32>,
    /// Only process these accounts. May be repeated.
    #[clap(long = "account", value_name = "NAME")]
    pub accounts: Vec<String>,
    #[clap(long, value_enum, default_value_t = Format::Text)]
    pub log_format: Format,
    /// Print the summary line or the full JSON report.
    #[clap(long, value_enum, default_value_t = Format::Text)]
    pub report: Format,
    /// Only log warnings and errors.
    #[clap(short, long)]
    pub quiet: bool,
}

impl Args {
    /// `Some(simulate)` when the command line picks the mode.
    pub fn simulate_override(&self) -> Option<bool> {
        match (self.simulate, self.live) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}
