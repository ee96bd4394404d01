//! In-memory mail store with failure injection and call counters.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::rc::Rc;

use chrono::{DateTime, FixedOffset};

use crate::error::StoreError;
use crate::mail::{Account, AccountKind, ItemClass, ItemFilter, MailFolder, MailItem, MailStore};

#[derive(Default)]
struct Tree {
    folders: Vec<FolderNode>,
    items: Vec<ItemNode>,
    accounts: Vec<(String, AccountKind, usize)>,
    direct_lookup_unsupported: bool,
    failing_lookups: HashSet<String>,
    failing_creates: HashSet<String>,
    failing_enumerations: HashSet<usize>,
    failing_moves: HashSet<usize>,
    lookup_calls: HashMap<String, usize>,
    create_calls: usize,
    move_calls: usize,
}

struct FolderNode {
    name: String,
    parent: Option<usize>,
    children: Vec<usize>,
    items: Vec<usize>,
}

struct ItemNode {
    /// `None` marks a corrupted item whose properties cannot be read.
    subject: Option<String>,
    received: Option<DateTime<FixedOffset>>,
    class: ItemClass,
    folder: usize,
}

impl Tree {
    fn new_folder(&mut self, name: &str, parent: Option<usize>) -> usize {
        let id = self.folders.len();
        self.folders.push(FolderNode {
            name: name.to_string(),
            parent,
            children: Vec::new(),
            items: Vec::new(),
        });
        if let Some(parent) = parent {
            self.folders[parent].children.push(id);
        }
        id
    }

    fn new_item(
        &mut self,
        folder: usize,
        subject: Option<String>,
        received: Option<DateTime<FixedOffset>>,
        class: ItemClass,
    ) -> usize {
        let id = self.items.len();
        self.items.push(ItemNode {
            subject,
            received,
            class,
            folder,
        });
        self.folders[folder].items.push(id);
        id
    }

    fn path(&self, mut id: usize) -> String {
        let mut segments = vec![self.folders[id].name.clone()];
        while let Some(parent) = self.folders[id].parent {
            segments.push(self.folders[parent].name.clone());
            id = parent;
        }
        segments.reverse();
        segments.join("/")
    }
}

/// A mail store held entirely in memory.
///
/// Folder and item handles share the store's state, so changes made through
/// the store are visible through every handle.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tree: Rc<RefCell<Tree>>,
}

#[derive(Clone)]
pub struct MemoryFolder {
    tree: Rc<RefCell<Tree>>,
    id: usize,
}

#[derive(Clone)]
pub struct MemoryItem {
    tree: Rc<RefCell<Tree>>,
    id: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a regular account and returns its root folder.
    pub fn add_account(&self, name: &str) -> MemoryFolder {
        self.add_account_of_kind(name, AccountKind::Regular)
    }

    /// Adds a label-based account and returns its root folder.
    pub fn add_label_account(&self, name: &str) -> MemoryFolder {
        self.add_account_of_kind(name, AccountKind::LabelBased)
    }

    fn add_account_of_kind(&self, name: &str, kind: AccountKind) -> MemoryFolder {
        let mut tree = self.tree.borrow_mut();
        let id = tree.new_folder(name, None);
        tree.accounts.push((name.to_string(), kind, id));
        self.folder(id)
    }

    /// Adds a folder without counting it as a collaborator call.
    pub fn add_folder(&self, parent: &MemoryFolder, name: &str) -> MemoryFolder {
        let id = self.tree.borrow_mut().new_folder(name, Some(parent.id));
        self.folder(id)
    }

    pub fn add_message(
        &self,
        folder: &MemoryFolder,
        subject: &str,
        received: DateTime<FixedOffset>,
    ) -> MemoryItem {
        self.add_item(folder, subject, received, ItemClass::Mail)
    }

    pub fn add_item(
        &self,
        folder: &MemoryFolder,
        subject: &str,
        received: DateTime<FixedOffset>,
        class: ItemClass,
    ) -> MemoryItem {
        let id = self.tree.borrow_mut().new_item(
            folder.id,
            Some(subject.to_string()),
            Some(received),
            class,
        );
        self.item(id)
    }

    /// Adds a mail item whose subject and received time cannot be read.
    pub fn add_corrupted_item(&self, folder: &MemoryFolder) -> MemoryItem {
        let id = self
            .tree
            .borrow_mut()
            .new_item(folder.id, None, None, ItemClass::Mail);
        self.item(id)
    }

    pub fn set_direct_lookup_supported(&self, supported: bool) {
        self.tree.borrow_mut().direct_lookup_unsupported = !supported;
    }

    /// Makes every direct lookup of `name` fail.
    pub fn fail_lookups_of(&self, name: &str) {
        self.tree
            .borrow_mut()
            .failing_lookups
            .insert(name.to_string());
    }

    /// Makes every creation of a folder called `name` fail.
    pub fn fail_creates_of(&self, name: &str) {
        self.tree
            .borrow_mut()
            .failing_creates
            .insert(name.to_string());
    }

    pub fn fail_enumeration_of(&self, folder: &MemoryFolder) {
        self.tree.borrow_mut().failing_enumerations.insert(folder.id);
    }

    pub fn fail_move_of(&self, item: &MemoryItem) {
        self.tree.borrow_mut().failing_moves.insert(item.id);
    }

    pub fn lookup_calls(&self, name: &str) -> usize {
        self.tree
            .borrow()
            .lookup_calls
            .get(name)
            .copied()
            .unwrap_or(0)
    }

    pub fn create_calls(&self) -> usize {
        self.tree.borrow().create_calls
    }

    pub fn move_calls(&self) -> usize {
        self.tree.borrow().move_calls
    }

    /// The folder currently holding `item`.
    pub fn folder_of(&self, item: &MemoryItem) -> MemoryFolder {
        let id = self.tree.borrow().items[item.id].folder;
        self.folder(id)
    }

    /// Slash-separated path from the account root, e.g. `me/Archive/2024`.
    pub fn path_of(&self, folder: &MemoryFolder) -> String {
        self.tree.borrow().path(folder.id)
    }

    /// Number of direct children of `parent` called `name`.
    pub fn count_children_named(&self, parent: &MemoryFolder, name: &str) -> usize {
        let tree = self.tree.borrow();
        tree.folders[parent.id]
            .children
            .iter()
            .filter(|&&c| tree.folders[c].name == name)
            .count()
    }

    pub fn item_count(&self, folder: &MemoryFolder) -> usize {
        self.tree.borrow().folders[folder.id].items.len()
    }

    fn folder(&self, id: usize) -> MemoryFolder {
        MemoryFolder {
            tree: Rc::clone(&self.tree),
            id,
        }
    }

    fn item(&self, id: usize) -> MemoryItem {
        MemoryItem {
            tree: Rc::clone(&self.tree),
            id,
        }
    }
}

impl MailStore for MemoryStore {
    type Folder = MemoryFolder;

    fn accounts(&self) -> Result<Vec<Account<MemoryFolder>>, StoreError> {
        let tree = self.tree.borrow();
        Ok(tree
            .accounts
            .iter()
            .map(|(name, kind, id)| Account::new(name.clone(), *kind, self.folder(*id)))
            .collect())
    }

    fn move_message(
        &self,
        item: &MemoryItem,
        destination: &MemoryFolder,
    ) -> Result<(), StoreError> {
        let mut tree = self.tree.borrow_mut();
        tree.move_calls += 1;

        if tree.failing_moves.contains(&item.id) {
            return Err(StoreError::MoveItem {
                destination: tree.path(destination.id),
                reason: "injected move failure".to_string(),
            });
        }

        let from = tree.items[item.id].folder;
        tree.folders[from].items.retain(|&i| i != item.id);
        tree.folders[destination.id].items.push(item.id);
        tree.items[item.id].folder = destination.id;
        Ok(())
    }
}

impl MailFolder for MemoryFolder {
    type Item = MemoryItem;

    fn name(&self) -> String {
        self.tree.borrow().folders[self.id].name.clone()
    }

    fn child(&self, name: &str) -> Result<Option<Self>, StoreError> {
        let mut tree = self.tree.borrow_mut();
        *tree.lookup_calls.entry(name.to_string()).or_insert(0) += 1;

        if tree.direct_lookup_unsupported {
            return Err(StoreError::LookupUnsupported);
        }
        if tree.failing_lookups.contains(name) {
            return Err(StoreError::Lookup {
                name: name.to_string(),
                reason: "injected lookup failure".to_string(),
            });
        }

        let found = tree.folders[self.id]
            .children
            .iter()
            .copied()
            .find(|&c| tree.folders[c].name == name);
        Ok(found.map(|id| MemoryFolder {
            tree: Rc::clone(&self.tree),
            id,
        }))
    }

    fn add_child(&self, name: &str) -> Result<Self, StoreError> {
        let mut tree = self.tree.borrow_mut();
        tree.create_calls += 1;

        if tree.failing_creates.contains(name) {
            return Err(StoreError::CreateFolder {
                name: name.to_string(),
                reason: "injected create failure".to_string(),
            });
        }

        // Like most mail clients, no uniqueness check is made here.
        let id = tree.new_folder(name, Some(self.id));
        Ok(MemoryFolder {
            tree: Rc::clone(&self.tree),
            id,
        })
    }

    fn children(&self) -> Result<Vec<Self>, StoreError> {
        let tree = self.tree.borrow();
        Ok(tree.folders[self.id]
            .children
            .iter()
            .map(|&id| MemoryFolder {
                tree: Rc::clone(&self.tree),
                id,
            })
            .collect())
    }

    fn items(&self, filter: &ItemFilter) -> Result<Vec<MemoryItem>, StoreError> {
        let tree = self.tree.borrow();
        if tree.failing_enumerations.contains(&self.id) {
            return Err(StoreError::Enumerate {
                folder: tree.path(self.id),
                reason: "injected enumeration failure".to_string(),
            });
        }

        Ok(tree.folders[self.id]
            .items
            .iter()
            .copied()
            .filter(|&id| filter.allows(tree.items[id].class))
            .map(|id| MemoryItem {
                tree: Rc::clone(&self.tree),
                id,
            })
            .collect())
    }
}

impl PartialEq for MemoryFolder {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.tree, &other.tree) && self.id == other.id
    }
}

impl fmt::Debug for MemoryFolder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MemoryFolder({})", self.tree.borrow().path(self.id))
    }
}

impl MailItem for MemoryItem {
    fn subject(&self) -> Result<String, StoreError> {
        self.tree.borrow().items[self.id]
            .subject
            .clone()
            .ok_or_else(|| StoreError::ReadItem("subject is unreadable".to_string()))
    }

    fn received(&self) -> Result<DateTime<FixedOffset>, StoreError> {
        self.tree.borrow().items[self.id]
            .received
            .ok_or_else(|| StoreError::ReadItem("received time is unreadable".to_string()))
    }

    fn class(&self) -> ItemClass {
        self.tree.borrow().items[self.id].class
    }
}

impl PartialEq for MemoryItem {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.tree, &other.tree) && self.id == other.id
    }
}

impl fmt::Debug for MemoryItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MemoryItem({})", self.id)
    }
}
