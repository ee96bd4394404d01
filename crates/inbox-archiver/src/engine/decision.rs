use std::fmt;

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

/// Terminal outcome for one candidate in one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Skipped,
    TooRecent,
    Moved,
    MovedSimulated,
    Error,
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Decision::Skipped => "skipped",
            Decision::TooRecent => "too recent",
            Decision::Moved => "moved",
            Decision::MovedSimulated => "would move",
            Decision::Error => "error",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DecisionRecord {
    pub account: String,
    pub subject: String,
    pub received: DateTime<FixedOffset>,
    pub decision: Decision,
    /// `yyyy/yyyy-MM` container path below the archive root, for moves.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    /// Matched skip substring, or the error message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl DecisionRecord {
    pub fn new(
        account: &str,
        subject: &str,
        received: DateTime<FixedOffset>,
        decision: Decision,
    ) -> Self {
        Self {
            account: account.to_string(),
            subject: subject.to_string(),
            received,
            decision,
            destination: None,
            detail: None,
        }
    }

    pub fn with_destination(mut self, destination: impl Into<String>) -> Self {
        self.destination = Some(destination.into());
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}
