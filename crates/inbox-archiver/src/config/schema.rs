use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::archive::ArchiveDescriptor;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub version: String,
    /// Root of the directory mail store. The CLI can override it.
    #[serde(default)]
    pub mail_root: Option<String>,
    #[serde(default = "default_retention_days")]
    pub retention_days: u32,
    #[serde(default = "default_true")]
    pub simulate: bool,
    /// Archive label name for label-based accounts.
    #[serde(default = "default_label_name")]
    pub label_name: String,
    #[serde(default)]
    pub include_meeting_items: bool,
    #[serde(default)]
    pub skip_rules: Vec<SkipRuleConfig>,
    #[serde(default = "default_excluded_accounts")]
    pub excluded_accounts: Vec<String>,
    #[serde(default)]
    pub label_accounts: Vec<String>,
    #[serde(default)]
    pub archive_paths: BTreeMap<String, ArchiveDescriptor>,
}

impl Config {
    pub fn mail_root(&self) -> Option<PathBuf> {
        self.mail_root.as_ref().map(PathBuf::from)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            mail_root: None,
            retention_days: default_retention_days(),
            simulate: true,
            label_name: default_label_name(),
            include_meeting_items: false,
            skip_rules: Vec::new(),
            excluded_accounts: default_excluded_accounts(),
            label_accounts: Vec::new(),
            archive_paths: BTreeMap::new(),
        }
    }
}

fn default_retention_days() -> u32 {
    14
}

fn default_true() -> bool {
    true
}

fn default_label_name() -> String {
    "Archive".to_string()
}

/// Stores that show up as accounts but never hold mail.
fn default_excluded_accounts() -> Vec<String> {
    [
        "Calendar",
        "Contacts",
        "Tasks",
        "Internet Calendars",
        "SharePoint Lists",
        "Public Folders",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Subject substrings exempt from archiving in one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkipRuleConfig {
    pub account_name: String,
    #[serde(default)]
    pub subject_substrings: Vec<String>,
}

/// Default location of the config file.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("inbox-archiver").join("config.json"))
}
