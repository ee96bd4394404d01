//! Shared helpers for inbox-archiver integration tests.
//!
//! - `ConfigBuilder` for configs built in code
//! - `MailTree` for on-disk mail trees read by `DirectoryStore`

pub mod builders;
pub mod mail_tree;

pub use builders::*;
pub use mail_tree::MailTree;
