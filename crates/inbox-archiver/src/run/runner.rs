use chrono::{DateTime, Utc};
use tracing::{debug, error, info, info_span, warn};

use crate::archive::{ArchiveLocator, ArchivePathStore};
use crate::engine::{cutoff_for, ArchiveContainers, MoveEngine, SkipRules};
use crate::error::Result;
use crate::mail::{Account, MailStore};
use crate::selector::{CandidateSelector, SelectionError};

use super::options::RunOptions;
use super::report::{AccountOutcome, AccountReport, RunReport};

/// Runs the locator, selector and move engine over every account of a
/// store, one account at a time.
pub struct Archiver {
    options: RunOptions,
    locator: ArchiveLocator,
    selector: CandidateSelector,
    skip_rules: SkipRules,
}

impl Archiver {
    pub fn new(options: RunOptions) -> Self {
        let locator = ArchiveLocator::new(options.label_name.clone());
        let selector = CandidateSelector::new(options.include_meeting_items);
        let skip_rules = SkipRules::new(&options.skip_rules);

        Self {
            options,
            locator,
            selector,
            skip_rules,
        }
    }

    pub fn options(&self) -> &RunOptions {
        &self.options
    }

    /// Archives one pass over `store`.
    ///
    /// The cutoff is taken from `started_at` once and shared by every
    /// account. Per-account and per-message failures end up in the report;
    /// only a failure to list accounts is returned as an error.
    pub fn run<S: MailStore>(
        &self,
        store: &S,
        paths: &mut dyn ArchivePathStore,
        started_at: DateTime<Utc>,
    ) -> Result<RunReport> {
        let cutoff = cutoff_for(started_at, self.options.retention_days);
        let engine = MoveEngine::new(cutoff, self.skip_rules.clone(), self.options.simulate);
        let mut report = RunReport::new(started_at, cutoff, self.options.simulate);

        info!(
            simulate = self.options.simulate,
            retention_days = self.options.retention_days,
            cutoff = %cutoff,
            "Starting archive run"
        );

        let accounts = store.accounts()?;
        debug!("Found {} accounts", accounts.len());

        for account in &accounts {
            let account_report = self.process_account(store, account, paths, &engine);
            report.push(account_report);
        }

        info!("Archive run finished: {}", report.summary);
        Ok(report)
    }

    fn process_account<S: MailStore>(
        &self,
        store: &S,
        account: &Account<S::Folder>,
        paths: &mut dyn ArchivePathStore,
        engine: &MoveEngine,
    ) -> AccountReport {
        let _span = info_span!("account", account = %account.name).entered();

        if !self.options.accounts.allows(&account.name) {
            debug!("Account excluded by filter");
            return AccountReport::skipped(&account.name, AccountOutcome::Excluded);
        }

        let root = match self.locator.resolve(store, account, paths) {
            Some(root) => root,
            None => {
                warn!("No archive folder found, skipping account");
                return AccountReport::skipped(&account.name, AccountOutcome::NoArchive);
            }
        };
        info!("Archiving into {}", root.descriptor);

        let mut report = AccountReport::processed(&account.name, root.descriptor.clone());

        let selection = match self.selector.select(store, account) {
            Ok(selection) => selection,
            Err(SelectionError::NoInbox(e)) => {
                warn!("No inbox: {}", e);
                report.fail(AccountOutcome::NoInbox);
                return report;
            }
            Err(SelectionError::Enumeration(e)) => {
                error!("Failed to enumerate inbox: {}", e);
                report.fail(AccountOutcome::EnumerationFailed);
                return report;
            }
        };
        report.summary.unreadable = selection.unreadable;
        debug!(
            candidates = selection.candidates.len(),
            duplicates = selection.duplicates,
            "Selected candidates"
        );

        let mut containers = ArchiveContainers::new(root.folder);
        for candidate in &selection.candidates {
            let record = engine.decide(store, &account.name, candidate, &mut containers);
            report.record(record);
        }

        report
    }
}
