//! Helpers for keeping mail-store paths out of log fields.

use std::path::Path;

/// Last path component only, so logs name a message file or folder without
/// exposing where the mail tree lives.
pub fn redact_path(path: &Path) -> String {
    match path.file_name().and_then(|n| n.to_str()) {
        Some(name) => name.to_string(),
        None => "<unknown>".to_string(),
    }
}
