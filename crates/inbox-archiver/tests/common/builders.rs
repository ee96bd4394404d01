//! Builders for test configuration and timestamps.

#![allow(dead_code)]

use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc};

use inbox_archiver::config::{Config, SkipRuleConfig};
use inbox_archiver::ArchiveDescriptor;

/// Builder for `Config` values, starting from the defaults.
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn retention_days(mut self, days: u32) -> Self {
        self.config.retention_days = days;
        self
    }

    pub fn live(mut self) -> Self {
        self.config.simulate = false;
        self
    }

    pub fn label_name(mut self, name: &str) -> Self {
        self.config.label_name = name.to_string();
        self
    }

    pub fn include_meeting_items(mut self) -> Self {
        self.config.include_meeting_items = true;
        self
    }

    pub fn skip_rule(mut self, account: &str, substrings: &[&str]) -> Self {
        self.config.skip_rules.push(SkipRuleConfig {
            account_name: account.to_string(),
            subject_substrings: substrings.iter().map(|s| s.to_string()).collect(),
        });
        self
    }

    pub fn label_account(mut self, account: &str) -> Self {
        self.config.label_accounts.push(account.to_string());
        self
    }

    pub fn archive_path(mut self, account: &str, descriptor: ArchiveDescriptor) -> Self {
        self.config
            .archive_paths
            .insert(account.to_string(), descriptor);
        self
    }

    pub fn build(self) -> Config {
        self.config
    }

    /// The config as a JSON document, as it would sit on disk.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(&self.config).unwrap()
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixed run start used across scenario tests.
pub fn run_start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 30, 8, 0, 0).unwrap()
}

/// `days` before `run_start()`, at UTC.
pub fn days_ago(days: i64) -> DateTime<FixedOffset> {
    (run_start() - Duration::days(days)).fixed_offset()
}

pub fn utc(y: i32, m: u32, d: u32, h: u32) -> DateTime<FixedOffset> {
    FixedOffset::east_opt(0)
        .unwrap()
        .with_ymd_and_hms(y, m, d, h, 0, 0)
        .unwrap()
}
