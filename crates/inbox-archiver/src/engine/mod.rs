//! Per-message move decisions.

pub mod containers;
pub mod decision;
pub mod skip;

use chrono::{DateTime, Duration, Utc};
use tracing::{error, info};

use crate::mail::{ItemOf, MailStore};
use crate::selector::Candidate;

pub use containers::{container_names, get_or_create_child, ArchiveContainers};
pub use decision::{Decision, DecisionRecord};
pub use skip::SkipRules;

/// Cutoff for a run: messages strictly older than this are archivable.
pub fn cutoff_for(run_start: DateTime<Utc>, retention_days: u32) -> DateTime<Utc> {
    run_start
        .checked_sub_signed(Duration::days(i64::from(retention_days)))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Decides skip, too-recent or move for each candidate and, outside
/// simulate mode, performs the move.
pub struct MoveEngine {
    cutoff: DateTime<Utc>,
    skip_rules: SkipRules,
    simulate: bool,
}

impl MoveEngine {
    pub fn new(cutoff: DateTime<Utc>, skip_rules: SkipRules, simulate: bool) -> Self {
        Self {
            cutoff,
            skip_rules,
            simulate,
        }
    }

    pub fn cutoff(&self) -> DateTime<Utc> {
        self.cutoff
    }

    pub fn simulate(&self) -> bool {
        self.simulate
    }

    pub fn decide<S: MailStore>(
        &self,
        store: &S,
        account: &str,
        candidate: &Candidate<ItemOf<S>>,
        containers: &mut ArchiveContainers<S::Folder>,
    ) -> DecisionRecord {
        let record = self.evaluate(store, account, candidate, containers);
        log_decision(&record);
        record
    }

    fn evaluate<S: MailStore>(
        &self,
        store: &S,
        account: &str,
        candidate: &Candidate<ItemOf<S>>,
        containers: &mut ArchiveContainers<S::Folder>,
    ) -> DecisionRecord {
        let record = |decision| {
            DecisionRecord::new(account, &candidate.subject, candidate.received, decision)
        };

        if let Some(matched) = self.skip_rules.matching(account, &candidate.subject) {
            return record(Decision::Skipped).with_detail(matched);
        }

        if candidate.received.with_timezone(&Utc) >= self.cutoff {
            return record(Decision::TooRecent);
        }

        let (year, month) = container_names(&candidate.received);
        let destination = format!("{}/{}", year, month);

        if self.simulate {
            return record(Decision::MovedSimulated).with_destination(destination);
        }

        let moved = containers
            .month_container(&candidate.received)
            .and_then(|folder| store.move_message(&candidate.item, &folder));

        match moved {
            Ok(()) => record(Decision::Moved).with_destination(destination),
            Err(e) => record(Decision::Error)
                .with_destination(destination)
                .with_detail(e.to_string()),
        }
    }
}

fn log_decision(record: &DecisionRecord) {
    let detail = record.detail.as_deref().unwrap_or_default();
    let destination = record.destination.as_deref().unwrap_or_default();

    match record.decision {
        Decision::Error => error!(
            account = %record.account,
            subject = %record.subject,
            received = %record.received,
            decision = %record.decision,
            destination,
            error = detail,
            "Failed to archive message"
        ),
        Decision::Skipped => info!(
            account = %record.account,
            subject = %record.subject,
            received = %record.received,
            decision = %record.decision,
            rule = detail,
            "Skipping message"
        ),
        Decision::TooRecent => info!(
            account = %record.account,
            subject = %record.subject,
            received = %record.received,
            decision = %record.decision,
            "Keeping recent message"
        ),
        Decision::Moved | Decision::MovedSimulated => info!(
            account = %record.account,
            subject = %record.subject,
            received = %record.received,
            decision = %record.decision,
            destination,
            "Archiving message"
        ),
    }
}
