//! Candidate selection: inbox enumeration, deduplication and ordering.

use std::collections::HashSet;

use chrono::{DateTime, FixedOffset, Utc};
use thiserror::Error;
use tracing::{debug, warn};

use crate::error::StoreError;
use crate::mail::{Account, ItemFilter, ItemOf, MailFolder, MailItem, MailStore};

/// A message under consideration in the current run.
#[derive(Debug, Clone)]
pub struct Candidate<I> {
    pub subject: String,
    pub received: DateTime<FixedOffset>,
    pub item: I,
}

impl<I> Candidate<I> {
    pub fn identity_key(&self) -> String {
        identity_key(&self.subject, &self.received)
    }
}

/// Composite identity of a message: subject plus its received instant in
/// UTC, so the same instant written at different offsets is one message.
pub fn identity_key(subject: &str, received: &DateTime<FixedOffset>) -> String {
    format!(
        "{}\u{1f}{}",
        subject,
        received.with_timezone(&Utc).to_rfc3339()
    )
}

#[derive(Error, Debug)]
pub enum SelectionError {
    #[error("no inbox: {0}")]
    NoInbox(#[source] StoreError),

    #[error("inbox enumeration failed: {0}")]
    Enumeration(#[source] StoreError),
}

/// Candidates of one account, oldest first.
#[derive(Debug)]
pub struct Selection<I> {
    pub candidates: Vec<Candidate<I>>,
    /// Items skipped because their properties could not be read.
    pub unreadable: usize,
    /// Items dropped as duplicates of an earlier item.
    pub duplicates: usize,
}

pub struct CandidateSelector {
    filter: ItemFilter,
}

impl CandidateSelector {
    pub fn new(include_meeting_items: bool) -> Self {
        Self {
            filter: ItemFilter::for_candidates(include_meeting_items),
        }
    }

    pub fn filter(&self) -> &ItemFilter {
        &self.filter
    }

    pub fn select<S: MailStore>(
        &self,
        store: &S,
        account: &Account<S::Folder>,
    ) -> Result<Selection<ItemOf<S>>, SelectionError> {
        let inbox = store.inbox(account).map_err(SelectionError::NoInbox)?;
        let items = inbox
            .items(&self.filter)
            .map_err(SelectionError::Enumeration)?;

        let mut seen = HashSet::new();
        let mut candidates = Vec::with_capacity(items.len());
        let mut unreadable = 0;
        let mut duplicates = 0;

        for item in items {
            // Adapters may hand back classes they were not asked for.
            if !self.filter.allows(item.class()) {
                continue;
            }

            let (subject, received) = match read_properties(&item) {
                Ok(props) => props,
                Err(e) => {
                    warn!(account = %account.name, "Skipping unreadable item: {}", e);
                    unreadable += 1;
                    continue;
                }
            };

            if !seen.insert(identity_key(&subject, &received)) {
                debug!(
                    account = %account.name,
                    subject = %subject,
                    received = %received,
                    "Dropping duplicate item"
                );
                duplicates += 1;
                continue;
            }

            candidates.push(Candidate {
                subject,
                received,
                item,
            });
        }

        // Stable: equal timestamps keep enumeration order.
        candidates.sort_by_key(|c| c.received);

        Ok(Selection {
            candidates,
            unreadable,
            duplicates,
        })
    }
}

fn read_properties<I: MailItem>(item: &I) -> Result<(String, DateTime<FixedOffset>), StoreError> {
    Ok((item.subject()?, item.received()?))
}
