use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::mail::{find_child, Account, MailStore};

use super::paths::ArchivePathStore;
use super::ArchiveDescriptor;

/// Name of the archive folder looked for under the Inbox and the root.
pub const DEFAULT_ARCHIVE_FOLDER: &str = "Archive";

/// How an archive root was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Cached,
    Searched,
}

#[derive(Debug, Clone)]
pub struct ArchiveRoot<F> {
    pub folder: F,
    pub descriptor: ArchiveDescriptor,
    pub resolution: Resolution,
}

/// Resolves the root of an account's archive hierarchy.
///
/// A cached descriptor is tried first. When it is missing or no longer
/// resolves, the search order is: `Archive` under the Inbox, `Archive` at
/// the account root, then the configured label name. A search hit is
/// written back to the path store.
///
/// Only resolution failure is detected. A cached descriptor that resolves
/// to a folder which was renamed into place is used as-is.
pub struct ArchiveLocator {
    label_name: String,
}

impl ArchiveLocator {
    pub fn new(label_name: impl Into<String>) -> Self {
        Self {
            label_name: label_name.into(),
        }
    }

    pub fn label_name(&self) -> &str {
        &self.label_name
    }

    pub fn resolve<S: MailStore>(
        &self,
        store: &S,
        account: &Account<S::Folder>,
        paths: &mut dyn ArchivePathStore,
    ) -> Option<ArchiveRoot<S::Folder>> {
        let cached = paths.get(&account.name);

        if let Some(descriptor) = &cached {
            match resolve_descriptor(store, account, descriptor) {
                Ok(Some(folder)) => {
                    debug!(account = %account.name, "Using cached archive path {}", descriptor);
                    return Some(ArchiveRoot {
                        folder,
                        descriptor: descriptor.clone(),
                        resolution: Resolution::Cached,
                    });
                }
                Ok(None) => {
                    info!(
                        account = %account.name,
                        "Cached archive path {} no longer exists, searching", descriptor
                    );
                }
                Err(e) => {
                    warn!(
                        account = %account.name,
                        "Cached archive path {} failed to resolve: {}", descriptor, e
                    );
                }
            }
        }

        for descriptor in self.search_order(account) {
            match resolve_descriptor(store, account, &descriptor) {
                Ok(Some(folder)) => {
                    if cached.as_ref() != Some(&descriptor) {
                        self.remember(paths, &account.name, &descriptor);
                    }
                    return Some(ArchiveRoot {
                        folder,
                        descriptor,
                        resolution: Resolution::Searched,
                    });
                }
                Ok(None) => {
                    debug!(account = %account.name, "No archive at {}", descriptor);
                }
                Err(e) => {
                    debug!(account = %account.name, "Lookup of {} failed: {}", descriptor, e);
                }
            }
        }

        None
    }

    /// Candidate descriptors in search order, without repeats.
    pub fn search_order<F>(&self, account: &Account<F>) -> Vec<ArchiveDescriptor> {
        let configured = if account.is_label_based() {
            ArchiveDescriptor::Label(self.label_name.clone())
        } else {
            ArchiveDescriptor::RootFolder(self.label_name.clone())
        };

        let mut order = vec![
            ArchiveDescriptor::InboxSubfolder(DEFAULT_ARCHIVE_FOLDER.to_string()),
            ArchiveDescriptor::RootFolder(DEFAULT_ARCHIVE_FOLDER.to_string()),
        ];
        if !order.contains(&configured) {
            order.push(configured);
        }
        order
    }

    fn remember(
        &self,
        paths: &mut dyn ArchivePathStore,
        account: &str,
        descriptor: &ArchiveDescriptor,
    ) {
        match paths.put(account, descriptor.clone()) {
            Ok(()) => info!(account = %account, "Remembered archive path {}", descriptor),
            Err(e) => warn!(
                account = %account,
                "Failed to save archive path {}: {}", descriptor, e
            ),
        }
    }
}

/// Resolves a descriptor against the account's folder tree.
///
/// Label names may contain `/` for nested labels.
pub fn resolve_descriptor<S: MailStore>(
    store: &S,
    account: &Account<S::Folder>,
    descriptor: &ArchiveDescriptor,
) -> Result<Option<S::Folder>, StoreError> {
    match descriptor {
        ArchiveDescriptor::RootFolder(name) => find_child(&account.root, name),
        ArchiveDescriptor::InboxSubfolder(name) => {
            let inbox = store.inbox(account)?;
            find_child(&inbox, name)
        }
        ArchiveDescriptor::Label(name) => {
            let segments: Vec<&str> = name.split('/').filter(|s| !s.is_empty()).collect();
            if segments.is_empty() {
                return Ok(None);
            }

            let mut folder = account.root.clone();
            for segment in segments {
                match find_child(&folder, segment)? {
                    Some(child) => folder = child,
                    None => return Ok(None),
                }
            }
            Ok(Some(folder))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::paths::MemoryArchivePaths;
    use crate::store::memory::MemoryStore;

    fn account(store: &MemoryStore) -> Account<crate::store::memory::MemoryFolder> {
        store.accounts().unwrap().remove(0)
    }

    #[test]
    fn test_cached_descriptor_wins() {
        let store = MemoryStore::new();
        let root = store.add_account("A");
        let inbox = store.add_folder(&root, "Inbox");
        store.add_folder(&inbox, "Archive");
        let saved = store.add_folder(&root, "Saved");

        let mut paths = MemoryArchivePaths::default();
        paths
            .put("A", ArchiveDescriptor::RootFolder("Saved".into()))
            .unwrap();

        let resolved = ArchiveLocator::new("Archive")
            .resolve(&store, &account(&store), &mut paths)
            .unwrap();
        assert_eq!(resolved.folder, saved);
        assert_eq!(resolved.resolution, Resolution::Cached);
    }

    #[test]
    fn test_search_order_prefers_inbox_subfolder() {
        let store = MemoryStore::new();
        let root = store.add_account("A");
        let inbox = store.add_folder(&root, "Inbox");
        let inbox_archive = store.add_folder(&inbox, "Archive");
        store.add_folder(&root, "Archive");

        let mut paths = MemoryArchivePaths::default();
        let resolved = ArchiveLocator::new("Archive")
            .resolve(&store, &account(&store), &mut paths)
            .unwrap();

        assert_eq!(resolved.folder, inbox_archive);
        assert_eq!(
            paths.get("A"),
            Some(ArchiveDescriptor::InboxSubfolder("Archive".into()))
        );
    }

    #[test]
    fn test_stale_label_falls_back_to_root_folder() {
        let store = MemoryStore::new();
        let root = store.add_label_account("A");
        store.add_folder(&root, "Inbox");
        let archive = store.add_folder(&root, "Archive");

        let mut paths = MemoryArchivePaths::default();
        paths
            .put("A", ArchiveDescriptor::Label("OldArchive".into()))
            .unwrap();

        let resolved = ArchiveLocator::new("AllMail")
            .resolve(&store, &account(&store), &mut paths)
            .unwrap();

        assert_eq!(resolved.folder, archive);
        assert_eq!(resolved.resolution, Resolution::Searched);
        assert_eq!(
            paths.get("A"),
            Some(ArchiveDescriptor::RootFolder("Archive".into()))
        );
    }

    #[test]
    fn test_label_account_finds_configured_label() {
        let store = MemoryStore::new();
        let root = store.add_label_account("me@gmail.com");
        store.add_folder(&root, "Inbox");
        let gmail = store.add_folder(&root, "[Gmail]");
        let label = store.add_folder(&gmail, "Saved");

        let mut paths = MemoryArchivePaths::default();
        let resolved = ArchiveLocator::new("[Gmail]/Saved")
            .resolve(&store, &account(&store), &mut paths)
            .unwrap();

        assert_eq!(resolved.folder, label);
        assert_eq!(
            resolved.descriptor,
            ArchiveDescriptor::Label("[Gmail]/Saved".into())
        );
    }

    #[test]
    fn test_lookup_errors_advance_search() {
        let store = MemoryStore::new();
        let root = store.add_account("A");
        store.add_folder(&root, "Inbox");
        let mail = store.add_folder(&root, "OldMail");
        store.fail_lookups_of("Archive");

        let mut paths = MemoryArchivePaths::default();
        let resolved = ArchiveLocator::new("OldMail")
            .resolve(&store, &account(&store), &mut paths)
            .unwrap();

        assert_eq!(resolved.folder, mail);
        assert_eq!(
            paths.get("A"),
            Some(ArchiveDescriptor::RootFolder("OldMail".into()))
        );
    }

    #[test]
    fn test_enumeration_fallback_when_lookup_unsupported() {
        let store = MemoryStore::new();
        let root = store.add_label_account("A");
        store.add_folder(&root, "Inbox");
        let label = store.add_folder(&root, "Kept");
        store.set_direct_lookup_supported(false);

        let mut paths = MemoryArchivePaths::default();
        let resolved = ArchiveLocator::new("Kept")
            .resolve(&store, &account(&store), &mut paths)
            .unwrap();

        assert_eq!(resolved.folder, label);
    }

    #[test]
    fn test_not_found() {
        let store = MemoryStore::new();
        let root = store.add_account("A");
        store.add_folder(&root, "Inbox");

        let mut paths = MemoryArchivePaths::default();
        let resolved =
            ArchiveLocator::new("Archive").resolve(&store, &account(&store), &mut paths);

        assert!(resolved.is_none());
        assert!(paths.get("A").is_none());
    }

    #[test]
    fn test_search_then_cache_survives_search_failure() {
        let store = MemoryStore::new();
        let root = store.add_label_account("A");
        store.add_folder(&root, "Inbox");
        let label = store.add_folder(&root, "Saved");
        let locator = ArchiveLocator::new("Saved");
        let mut paths = MemoryArchivePaths::default();

        let first = locator
            .resolve(&store, &account(&store), &mut paths)
            .unwrap();
        assert_eq!(first.resolution, Resolution::Searched);
        assert_eq!(paths.get("A"), Some(ArchiveDescriptor::Label("Saved".into())));

        // Break every search step; the cached label must still resolve.
        store.fail_lookups_of("Archive");
        let archive_lookups = store.lookup_calls("Archive");
        let second = locator
            .resolve(&store, &account(&store), &mut paths)
            .unwrap();

        assert_eq!(second.folder, label);
        assert_eq!(second.resolution, Resolution::Cached);
        assert_eq!(store.lookup_calls("Archive"), archive_lookups);
    }

    #[test]
    fn test_search_order_deduplicates() {
        let store = MemoryStore::new();
        store.add_account("A");
        let order = ArchiveLocator::new("Archive").search_order(&account(&store));

        assert_eq!(
            order,
            vec![
                ArchiveDescriptor::InboxSubfolder("Archive".into()),
                ArchiveDescriptor::RootFolder("Archive".into()),
            ]
        );
    }
}
