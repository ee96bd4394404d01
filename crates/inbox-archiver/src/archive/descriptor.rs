use std::fmt;

use serde::{Deserialize, Serialize};

/// Where an account's archive root lives, relative to the account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "name", rename_all = "snake_case")]
pub enum ArchiveDescriptor {
    /// A folder directly under the account root.
    #[serde(rename = "root")]
    RootFolder(String),
    /// A folder directly under the account's Inbox.
    InboxSubfolder(String),
    /// A label of a label-based account.
    Label(String),
}

impl ArchiveDescriptor {
    pub fn name(&self) -> &str {
        match self {
            ArchiveDescriptor::RootFolder(name)
            | ArchiveDescriptor::InboxSubfolder(name)
            | ArchiveDescriptor::Label(name) => name,
        }
    }

    /// Parses the legacy `Type:Name` form, e.g. `Inbox:Archive`.
    pub fn parse_legacy(value: &str) -> Option<Self> {
        let (kind, name) = value.split_once(':')?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        match kind.trim().to_ascii_lowercase().as_str() {
            "root" | "rootfolder" | "folder" => Some(Self::RootFolder(name.to_string())),
            "inbox" | "inboxsubfolder" | "subfolder" => Some(Self::InboxSubfolder(name.to_string())),
            "label" | "gmail" => Some(Self::Label(name.to_string())),
            _ => None,
        }
    }
}

impl fmt::Display for ArchiveDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArchiveDescriptor::RootFolder(name) => write!(f, "root folder '{}'", name),
            ArchiveDescriptor::InboxSubfolder(name) => write!(f, "inbox subfolder '{}'", name),
            ArchiveDescriptor::Label(name) => write!(f, "label '{}'", name),
        }
    }
}

#[derive(Deserialize)]
#[serde(tag = "type", content = "name", rename_all = "snake_case")]
enum TaggedDescriptor {
    Root(String),
    InboxSubfolder(String),
    Label(String),
}

/// Accepts both the tagged object form and the legacy string form.
impl<'de> Deserialize<'de> for ArchiveDescriptor {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Error;
        use serde_json::Value;

        let value = Value::deserialize(deserializer)?;

        match value {
            Value::String(legacy) => Self::parse_legacy(&legacy).ok_or_else(|| {
                D::Error::custom(format!("Invalid archive path descriptor: '{}'", legacy))
            }),
            Value::Object(_) => {
                let tagged: TaggedDescriptor = serde_json::from_value(value).map_err(|e| {
                    D::Error::custom(format!("Invalid archive path descriptor: {}", e))
                })?;
                Ok(match tagged {
                    TaggedDescriptor::Root(name) => Self::RootFolder(name),
                    TaggedDescriptor::InboxSubfolder(name) => Self::InboxSubfolder(name),
                    TaggedDescriptor::Label(name) => Self::Label(name),
                })
            }
            _ => Err(D::Error::custom(
                "Archive path descriptor must be an object or a 'Type:Name' string",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_as_tagged_object() {
        let json = serde_json::to_value(ArchiveDescriptor::RootFolder("Archive".into())).unwrap();
        assert_eq!(json, serde_json::json!({"type": "root", "name": "Archive"}));

        let json =
            serde_json::to_value(ArchiveDescriptor::InboxSubfolder("Archive".into())).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "inbox_subfolder", "name": "Archive"})
        );
    }

    #[test]
    fn test_deserializes_tagged_object() {
        let descriptor: ArchiveDescriptor =
            serde_json::from_str(r#"{"type": "label", "name": "OldArchive"}"#).unwrap();
        assert_eq!(descriptor, ArchiveDescriptor::Label("OldArchive".into()));
    }

    #[test]
    fn test_deserializes_legacy_string() {
        let cases = [
            ("Root:Archive", ArchiveDescriptor::RootFolder("Archive".into())),
            ("Inbox:Archive", ArchiveDescriptor::InboxSubfolder("Archive".into())),
            ("Label:Saved Mail", ArchiveDescriptor::Label("Saved Mail".into())),
            ("gmail:All", ArchiveDescriptor::Label("All".into())),
        ];
        for (legacy, expected) in cases {
            let descriptor: ArchiveDescriptor =
                serde_json::from_value(serde_json::Value::String(legacy.into())).unwrap();
            assert_eq!(descriptor, expected, "legacy form {}", legacy);
        }
    }

    #[test]
    fn test_rejects_malformed_legacy_string() {
        for bad in ["Archive", "Root:", "Drawer:Archive"] {
            let result: Result<ArchiveDescriptor, _> =
                serde_json::from_value(serde_json::Value::String(bad.into()));
            assert!(result.is_err(), "{} should be rejected", bad);
        }
    }

    #[test]
    fn test_name_accessor() {
        assert_eq!(ArchiveDescriptor::Label("X".into()).name(), "X");
    }
}
