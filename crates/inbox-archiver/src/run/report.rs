use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::archive::ArchiveDescriptor;
use crate::engine::{Decision, DecisionRecord};

/// Counters for a run or a single account. Owned by the run, merged per
/// account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub accounts_seen: usize,
    pub accounts_processed: usize,
    pub accounts_skipped: usize,
    pub processed: usize,
    pub moved: usize,
    pub simulated: usize,
    pub skipped: usize,
    pub too_recent: usize,
    pub errors: usize,
    pub unreadable: usize,
}

impl RunSummary {
    pub fn record(&mut self, decision: Decision) {
        self.processed += 1;
        match decision {
            Decision::Skipped => self.skipped += 1,
            Decision::TooRecent => self.too_recent += 1,
            Decision::Moved => self.moved += 1,
            Decision::MovedSimulated => self.simulated += 1,
            Decision::Error => self.errors += 1,
        }
    }

    pub fn merge(&mut self, other: &RunSummary) {
        self.accounts_seen += other.accounts_seen;
        self.accounts_processed += other.accounts_processed;
        self.accounts_skipped += other.accounts_skipped;
        self.processed += other.processed;
        self.moved += other.moved;
        self.simulated += other.simulated;
        self.skipped += other.skipped;
        self.too_recent += other.too_recent;
        self.errors += other.errors;
        self.unreadable += other.unreadable;
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "accounts: {} seen, {} processed, {} skipped; messages: {} processed, {} moved, \
             {} simulated, {} skipped, {} too recent, {} errors, {} unreadable",
            self.accounts_seen,
            self.accounts_processed,
            self.accounts_skipped,
            self.processed,
            self.moved,
            self.simulated,
            self.skipped,
            self.too_recent,
            self.errors,
            self.unreadable
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountOutcome {
    Processed,
    Excluded,
    NoArchive,
    NoInbox,
    EnumerationFailed,
}

#[derive(Debug, Clone, Serialize)]
pub struct AccountReport {
    pub account: String,
    pub outcome: AccountOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archive_root: Option<ArchiveDescriptor>,
    pub summary: RunSummary,
    pub decisions: Vec<DecisionRecord>,
}

impl AccountReport {
    /// Report for an account that was not worked on.
    pub fn skipped(account: &str, outcome: AccountOutcome) -> Self {
        Self {
            account: account.to_string(),
            outcome,
            archive_root: None,
            summary: RunSummary {
                accounts_seen: 1,
                accounts_skipped: 1,
                ..RunSummary::default()
            },
            decisions: Vec::new(),
        }
    }

    pub fn processed(account: &str, archive_root: ArchiveDescriptor) -> Self {
        Self {
            account: account.to_string(),
            outcome: AccountOutcome::Processed,
            archive_root: Some(archive_root),
            summary: RunSummary {
                accounts_seen: 1,
                accounts_processed: 1,
                ..RunSummary::default()
            },
            decisions: Vec::new(),
        }
    }

    /// Marks a processed account as failed after its archive root was found.
    pub fn fail(&mut self, outcome: AccountOutcome) {
        self.outcome = outcome;
        self.summary.accounts_processed = 0;
        self.summary.accounts_skipped = 1;
    }

    pub fn record(&mut self, record: DecisionRecord) {
        self.summary.record(record.decision);
        self.decisions.push(record);
    }
}

/// Everything one run decided.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub cutoff: DateTime<Utc>,
    pub simulate: bool,
    pub accounts: Vec<AccountReport>,
    pub summary: RunSummary,
}

impl RunReport {
    pub fn new(started_at: DateTime<Utc>, cutoff: DateTime<Utc>, simulate: bool) -> Self {
        Self {
            started_at,
            cutoff,
            simulate,
            accounts: Vec::new(),
            summary: RunSummary::default(),
        }
    }

    pub fn push(&mut self, account: AccountReport) {
        self.summary.merge(&account.summary);
        self.accounts.push(account);
    }

    pub fn account(&self, name: &str) -> Option<&AccountReport> {
        self.accounts.iter().find(|a| a.account == name)
    }

    pub fn decisions(&self) -> impl Iterator<Item = &DecisionRecord> {
        self.accounts.iter().flat_map(|a| a.decisions.iter())
    }
}
