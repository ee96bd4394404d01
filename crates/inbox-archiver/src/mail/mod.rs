//! Boundary traits for the mail collaborator.
//!
//! The archive engine only ever talks to a mail client through these traits.
//! Adapters live in [`crate::store`].

pub mod item;

use chrono::{DateTime, FixedOffset};
use tracing::warn;

use crate::error::StoreError;

pub use item::{ItemClass, ItemFilter};

/// Folder names tried, in order, when looking for an account's Inbox.
pub const INBOX_NAMES: &[&str] = &["Inbox", "INBOX"];

/// How an account organizes archived mail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountKind {
    /// Folder hierarchy.
    Regular,
    /// Labels exposed as top-level folders (Gmail-style).
    LabelBased,
}

/// A named mailbox exposed by the collaborator.
#[derive(Debug, Clone)]
pub struct Account<F> {
    pub name: String,
    pub kind: AccountKind,
    pub root: F,
}

impl<F> Account<F> {
    pub fn new(name: impl Into<String>, kind: AccountKind, root: F) -> Self {
        Self {
            name: name.into(),
            kind,
            root,
        }
    }

    pub fn is_label_based(&self) -> bool {
        self.kind == AccountKind::LabelBased
    }
}

/// A handle to a single mail item.
pub trait MailItem {
    fn subject(&self) -> Result<String, StoreError>;

    fn received(&self) -> Result<DateTime<FixedOffset>, StoreError>;

    fn class(&self) -> ItemClass;
}

/// A folder (or label) in an account's tree.
pub trait MailFolder: Clone {
    type Item: MailItem;

    fn name(&self) -> String;

    /// Looks up a direct child by exact name.
    ///
    /// Returns `Err(StoreError::LookupUnsupported)` when the collaborator
    /// cannot do direct lookups; use [`find_child`] to get the enumeration
    /// fallback.
    fn child(&self, name: &str) -> Result<Option<Self>, StoreError>;

    fn add_child(&self, name: &str) -> Result<Self, StoreError>;

    fn children(&self) -> Result<Vec<Self>, StoreError>;

    fn items(&self, filter: &ItemFilter) -> Result<Vec<Self::Item>, StoreError>;
}

/// The mail client connection.
pub trait MailStore {
    type Folder: MailFolder;

    fn accounts(&self) -> Result<Vec<Account<Self::Folder>>, StoreError>;

    fn inbox(&self, account: &Account<Self::Folder>) -> Result<Self::Folder, StoreError> {
        for name in INBOX_NAMES {
            match find_child(&account.root, name) {
                Ok(Some(folder)) => return Ok(folder),
                Ok(None) => {}
                Err(e) => {
                    warn!(account = %account.name, folder = *name, "Inbox lookup failed: {}", e);
                }
            }
        }
        Err(StoreError::NoInbox(account.name.clone()))
    }

    fn move_message(
        &self,
        item: &<Self::Folder as MailFolder>::Item,
        destination: &Self::Folder,
    ) -> Result<(), StoreError>;
}

/// The item handle type of a store.
pub type ItemOf<S> = <<S as MailStore>::Folder as MailFolder>::Item;

/// Looks up a child by exact name, enumerating children when the
/// collaborator has no direct lookup.
pub fn find_child<F: MailFolder>(parent: &F, name: &str) -> Result<Option<F>, StoreError> {
    match parent.child(name) {
        Err(StoreError::LookupUnsupported) => {
            Ok(parent.children()?.into_iter().find(|c| c.name() == name))
        }
        other => other,
    }
}
