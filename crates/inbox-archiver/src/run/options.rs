use crate::config::{Config, SkipRuleConfig};

/// Settings for one archive run, built once from the loaded config.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub retention_days: u32,
    pub simulate: bool,
    pub label_name: String,
    pub include_meeting_items: bool,
    pub skip_rules: Vec<SkipRuleConfig>,
    pub accounts: AccountFilter,
}

impl RunOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            retention_days: config.retention_days,
            simulate: config.simulate,
            label_name: config.label_name.clone(),
            include_meeting_items: config.include_meeting_items,
            skip_rules: config.skip_rules.clone(),
            accounts: AccountFilter::new(&config.excluded_accounts),
        }
    }
}

impl Default for RunOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Name-based account policy applied before any archive work.
///
/// Excluded names compare case-insensitively. When an allowlist is set,
/// only those exact names are processed.
#[derive(Debug, Clone, Default)]
pub struct AccountFilter {
    excluded: Vec<String>,
    only: Option<Vec<String>>,
}

impl AccountFilter {
    pub fn new(excluded: &[String]) -> Self {
        Self {
            excluded: excluded.iter().map(|name| name.to_lowercase()).collect(),
            only: None,
        }
    }

    pub fn with_only(mut self, names: Vec<String>) -> Self {
        self.only = if names.is_empty() { None } else { Some(names) };
        self
    }

    pub fn allows(&self, account: &str) -> bool {
        if let Some(only) = &self.only {
            if !only.iter().any(|name| name == account) {
                return false;
            }
        }
        let lowered = account.to_lowercase();
        !self.excluded.iter().any(|name| *name == lowered)
    }
}
