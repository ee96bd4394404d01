use serde::{Deserialize, Serialize};

/// Item classes a mail client keeps in its folders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemClass {
    Mail,
    /// Meeting requests, cancellations and responses.
    Meeting,
    Appointment,
    Contact,
    Task,
    Other,
}

/// Which item classes an enumeration should return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFilter {
    classes: Vec<ItemClass>,
}

impl ItemFilter {
    pub fn mail_only() -> Self {
        Self {
            classes: vec![ItemClass::Mail],
        }
    }

    pub fn mail_and_meetings() -> Self {
        Self {
            classes: vec![ItemClass::Mail, ItemClass::Meeting],
        }
    }

    /// Candidate inclusion policy: plain mail, plus meeting items when enabled.
    pub fn for_candidates(include_meeting_items: bool) -> Self {
        if include_meeting_items {
            Self::mail_and_meetings()
        } else {
            Self::mail_only()
        }
    }

    pub fn allows(&self, class: ItemClass) -> bool {
        self.classes.contains(&class)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mail_only_excludes_everything_else() {
        let filter = ItemFilter::for_candidates(false);
        assert!(filter.allows(ItemClass::Mail));
        for class in [
            ItemClass::Meeting,
            ItemClass::Appointment,
            ItemClass::Contact,
            ItemClass::Task,
            ItemClass::Other,
        ] {
            assert!(!filter.allows(class), "{:?} should be excluded", class);
        }
    }

    #[test]
    fn test_meeting_inclusion_policy() {
        let filter = ItemFilter::for_candidates(true);
        assert!(filter.allows(ItemClass::Mail));
        assert!(filter.allows(ItemClass::Meeting));
        assert!(!filter.allows(ItemClass::Appointment));
        assert!(!filter.allows(ItemClass::Contact));
    }
}
