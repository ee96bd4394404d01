//! Mail store backed by a local directory tree.
//!
//! Layout:
//!
//! ```text
//! <root>/
//!   <account>/            one directory per account
//!     Inbox/              folders are directories, nested freely
//!       0001.eml          messages
//!       standup.ics       calendar entries
//!       alice.vcf         contacts
//! ```
//!
//! Directories and files whose names start with `.` are ignored.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset, Local};
use log::{debug, info, warn};
use mail_parser::{Message, MessageParser, MimeHeaders};
use walkdir::WalkDir;

use crate::error::StoreError;
use crate::mail::{Account, AccountKind, ItemClass, ItemFilter, MailFolder, MailItem, MailStore};
use crate::sanitize::redact_path;

/// Highest numeric suffix tried when a file name is taken in the destination.
const MAX_CONFLICT_SUFFIX: u32 = 1000;

pub struct DirectoryStore {
    root: PathBuf,
    label_accounts: Vec<String>,
}

impl DirectoryStore {
    /// Opens the tree at `root`. Accounts named in `label_accounts` are
    /// treated as label-based.
    pub fn open<P: AsRef<Path>>(root: P, label_accounts: &[String]) -> Result<Self, StoreError> {
        let root = root.as_ref().to_path_buf();
        if !root.is_dir() {
            return Err(StoreError::Io {
                path: root,
                source: io::Error::new(io::ErrorKind::NotFound, "not a directory"),
            });
        }
        Ok(Self {
            root,
            label_accounts: label_accounts.to_vec(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl MailStore for DirectoryStore {
    type Folder = DirFolder;

    fn accounts(&self) -> Result<Vec<Account<DirFolder>>, StoreError> {
        let accounts = list_entries(&self.root, true)?
            .into_iter()
            .map(|path| {
                let folder = DirFolder { path };
                let name = folder.name();
                let kind = if self.label_accounts.contains(&name) {
                    AccountKind::LabelBased
                } else {
                    AccountKind::Regular
                };
                Account::new(name, kind, folder)
            })
            .collect::<Vec<_>>();
        debug!("Directory store has {} accounts", accounts.len());
        Ok(accounts)
    }

    fn move_message(&self, item: &DirItem, destination: &DirFolder) -> Result<(), StoreError> {
        let move_error = |reason: String| StoreError::MoveItem {
            destination: destination.name(),
            reason,
        };

        let file_name = item
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| move_error("message has no file name".to_string()))?;
        let target = resolve_conflict(&destination.path, file_name).map_err(move_error)?;

        move_file(&item.path, &target).map_err(|e| move_error(e.to_string()))?;
        info!(
            "Moved {} to {}",
            redact_path(&item.path),
            redact_path(&target)
        );
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirFolder {
    path: PathBuf,
}

impl DirFolder {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl MailFolder for DirFolder {
    type Item = DirItem;

    fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    fn child(&self, name: &str) -> Result<Option<DirFolder>, StoreError> {
        check_folder_name(name).map_err(|reason| StoreError::Lookup {
            name: name.to_string(),
            reason,
        })?;
        let path = self.path.join(name);
        Ok(path.is_dir().then_some(DirFolder { path }))
    }

    fn add_child(&self, name: &str) -> Result<DirFolder, StoreError> {
        check_folder_name(name).map_err(|reason| StoreError::CreateFolder {
            name: name.to_string(),
            reason,
        })?;
        let path = self.path.join(name);
        fs::create_dir(&path).map_err(|e| StoreError::CreateFolder {
            name: name.to_string(),
            reason: e.to_string(),
        })?;
        debug!("Created folder {}", redact_path(&path));
        Ok(DirFolder { path })
    }

    fn children(&self) -> Result<Vec<DirFolder>, StoreError> {
        Ok(list_entries(&self.path, true)?
            .into_iter()
            .map(|path| DirFolder { path })
            .collect())
    }

    fn items(&self, filter: &ItemFilter) -> Result<Vec<DirItem>, StoreError> {
        let mut items = Vec::new();
        for path in list_entries(&self.path, false)? {
            let Some(item) = DirItem::load(path) else {
                continue;
            };
            if filter.allows(item.class) {
                items.push(item);
            }
        }
        Ok(items)
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Headers {
    subject: String,
    received: DateTime<FixedOffset>,
}

/// A message or other item file, read once at enumeration.
#[derive(Debug, Clone, PartialEq)]
pub struct DirItem {
    path: PathBuf,
    class: ItemClass,
    headers: Result<Headers, String>,
}

impl DirItem {
    /// Reads an item file. Files of unknown type yield `None`.
    fn load(path: PathBuf) -> Option<DirItem> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())?;

        let (class, headers) = match extension.as_str() {
            "eml" => match read_message(&path) {
                Ok((class, headers)) => (class, Ok(headers)),
                Err(reason) => (ItemClass::Mail, Err(reason)),
            },
            "ics" => (ItemClass::Appointment, file_headers(&path)),
            "vcf" => (ItemClass::Contact, file_headers(&path)),
            _ => return None,
        };

        if let Err(reason) = &headers {
            warn!("Cannot read {}: {}", redact_path(&path), reason);
        }
        Some(DirItem {
            path,
            class,
            headers,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn headers(&self) -> Result<&Headers, StoreError> {
        self.headers
            .as_ref()
            .map_err(|reason| StoreError::ReadItem(format!("{}: {}", redact_path(&self.path), reason)))
    }
}

impl MailItem for DirItem {
    fn subject(&self) -> Result<String, StoreError> {
        Ok(self.headers()?.subject.clone())
    }

    fn received(&self) -> Result<DateTime<FixedOffset>, StoreError> {
        Ok(self.headers()?.received)
    }

    fn class(&self) -> ItemClass {
        self.class
    }
}

fn read_message(path: &Path) -> Result<(ItemClass, Headers), String> {
    let raw = fs::read(path).map_err(|e| e.to_string())?;
    let message = MessageParser::default()
        .parse(&raw)
        .ok_or_else(|| "not a parseable message".to_string())?;

    let received = match message.date().map(|d| d.to_rfc3339()) {
        Some(date) => match DateTime::parse_from_rfc3339(&date) {
            Ok(received) => received,
            Err(e) => {
                debug!("Bad Date header in {} ({}), using mtime", redact_path(path), e);
                modified_time(path)?
            }
        },
        None => modified_time(path)?,
    };

    let class = if is_meeting(&message) {
        ItemClass::Meeting
    } else {
        ItemClass::Mail
    };
    let headers = Headers {
        subject: message.subject().unwrap_or_default().to_string(),
        received,
    };
    Ok((class, headers))
}

/// Meeting requests, replies and cancellations carry a `text/calendar` part.
fn is_meeting(message: &Message) -> bool {
    message.parts.iter().any(|part| {
        part.content_type().is_some_and(|ct| {
            ct.ctype().eq_ignore_ascii_case("text")
                && ct
                    .subtype()
                    .is_some_and(|s| s.eq_ignore_ascii_case("calendar"))
        })
    })
}

/// Headers for non-message items: the file stem and modification time.
fn file_headers(path: &Path) -> Result<Headers, String> {
    let subject = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(Headers {
        subject,
        received: modified_time(path)?,
    })
}

fn modified_time(path: &Path) -> Result<DateTime<FixedOffset>, String> {
    let modified = fs::metadata(path)
        .and_then(|m| m.modified())
        .map_err(|e| e.to_string())?;
    Ok(DateTime::<Local>::from(modified).fixed_offset())
}

/// Direct, non-hidden children of `dir` in file-name order: directories
/// when `dirs` is set, files otherwise.
fn list_entries(dir: &Path, dirs: bool) -> Result<Vec<PathBuf>, StoreError> {
    let mut entries = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| StoreError::Enumerate {
            folder: redact_path(dir),
            reason: e.to_string(),
        })?;
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        if entry.file_type().is_dir() == dirs {
            entries.push(entry.into_path());
        }
    }
    Ok(entries)
}

fn check_folder_name(name: &str) -> Result<(), String> {
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(format!("'{}' is not a valid folder name", name));
    }
    Ok(())
}

/// Rename, falling back to copy and delete across devices.
fn move_file(src: &Path, dst: &Path) -> io::Result<()> {
    match fs::rename(src, dst) {
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => copy_then_remove(src, dst),
        other => other,
    }
}

/// Copies `src` to `dst` and removes `src`. On failure `dst` is gone again,
/// so the message exists only at `src`.
fn copy_then_remove(src: &Path, dst: &Path) -> io::Result<()> {
    fs::copy(src, dst)?;
    if let Err(e) = fs::remove_file(src) {
        if let Err(cleanup) = fs::remove_file(dst) {
            warn!(
                "Could not remove partial copy {}: {}",
                redact_path(dst),
                cleanup
            );
        }
        return Err(e);
    }
    Ok(())
}

/// First free name in `directory`: `file_name`, then `stem_2.ext`,
/// `stem_3.ext` and so on.
fn resolve_conflict(directory: &Path, file_name: &str) -> Result<PathBuf, String> {
    let path = directory.join(file_name);
    if fs::symlink_metadata(&path).is_err() {
        return Ok(path);
    }

    let (stem, extension) = match file_name.rfind('.') {
        Some(dot) if dot > 0 => (&file_name[..dot], &file_name[dot..]),
        _ => (file_name, ""),
    };
    for counter in 2..=MAX_CONFLICT_SUFFIX {
        let candidate = directory.join(format!("{}_{}{}", stem, counter, extension));
        if fs::symlink_metadata(&candidate).is_err() {
            return Ok(candidate);
        }
    }
    Err(format!("no free name for '{}'", file_name))
}
