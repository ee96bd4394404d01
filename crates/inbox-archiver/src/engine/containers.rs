//! Year and month containers under an archive root.

use std::collections::HashMap;

use chrono::{DateTime, FixedOffset};
use tracing::info;

use crate::error::StoreError;
use crate::mail::{find_child, MailFolder};

/// Container names for a received time: (`yyyy`, `yyyy-MM`).
///
/// The message's own offset decides the calendar month.
pub fn container_names(received: &DateTime<FixedOffset>) -> (String, String) {
    (
        received.format("%Y").to_string(),
        received.format("%Y-%m").to_string(),
    )
}

/// Returns the child called `name`, creating it only when none exists.
pub fn get_or_create_child<F: MailFolder>(parent: &F, name: &str) -> Result<F, StoreError> {
    if let Some(existing) = find_child(parent, name)? {
        return Ok(existing);
    }
    info!("Creating archive folder '{}' under '{}'", name, parent.name());
    parent.add_child(name)
}

/// Month containers of one archive root, cached by name for the run.
pub struct ArchiveContainers<F> {
    root: F,
    cache: HashMap<String, F>,
}

impl<F: MailFolder> ArchiveContainers<F> {
    pub fn new(root: F) -> Self {
        Self {
            root,
            cache: HashMap::new(),
        }
    }

    pub fn root(&self) -> &F {
        &self.root
    }

    /// Resolves (creating if needed) `root/yyyy/yyyy-MM` for `received`.
    ///
    /// A year container created before a failed month creation is kept; it
    /// is reused on the next call.
    pub fn month_container(&mut self, received: &DateTime<FixedOffset>) -> Result<F, StoreError> {
        let (year, month) = container_names(received);
        if let Some(folder) = self.cache.get(&month) {
            return Ok(folder.clone());
        }

        let year_folder = match self.cache.get(&year) {
            Some(folder) => folder.clone(),
            None => {
                let folder = get_or_create_child(&self.root, &year)?;
                self.cache.insert(year.clone(), folder.clone());
                folder
            }
        };

        let month_folder = get_or_create_child(&year_folder, &month)?;
        self.cache.insert(month, month_folder.clone());
        Ok(month_folder)
    }
}
