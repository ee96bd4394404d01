use std::collections::HashMap;

use crate::config::SkipRuleConfig;

/// Per-account subject exceptions.
///
/// Account names match exactly. Subjects match case-insensitively: a rule
/// substring `invoice` exempts `Your INVOICE #12`.
#[derive(Debug, Clone, Default)]
pub struct SkipRules {
    /// account name -> (substring as configured, lowercased substring)
    rules: HashMap<String, Vec<(String, String)>>,
}

impl SkipRules {
    pub fn new(configs: &[SkipRuleConfig]) -> Self {
        let mut rules: HashMap<String, Vec<(String, String)>> = HashMap::new();
        // Several rules for one account are merged.
        for config in configs {
            let entry = rules.entry(config.account_name.clone()).or_default();
            for substring in &config.subject_substrings {
                if substring.is_empty() {
                    continue;
                }
                entry.push((substring.clone(), substring.to_lowercase()));
            }
        }
        Self { rules }
    }

    /// Returns the configured substring that exempts `subject` in `account`.
    pub fn matching(&self, account: &str, subject: &str) -> Option<&str> {
        let substrings = self.rules.get(account)?;
        let subject = subject.to_lowercase();
        substrings
            .iter()
            .find(|(_, lowered)| subject.contains(lowered.as_str()))
            .map(|(original, _)| original.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.rules.values().all(|s| s.is_empty())
    }
}
