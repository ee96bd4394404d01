pub mod options;
pub mod report;
pub mod runner;

pub use options::{AccountFilter, RunOptions};
pub use report::{AccountOutcome, AccountReport, RunReport, RunSummary};
pub use runner::Archiver;
