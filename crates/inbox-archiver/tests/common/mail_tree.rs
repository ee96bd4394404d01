//! On-disk mail trees for `DirectoryStore` tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

pub struct MailTree {
    dir: TempDir,
}

impl MailTree {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    pub fn folder(&self, relative: &str) -> PathBuf {
        let path = self.path(relative);
        fs::create_dir_all(&path).unwrap();
        path
    }

    /// Writes a plain message with the given `Date` header value.
    pub fn message(&self, folder: &str, file: &str, subject: &str, date: &str) -> PathBuf {
        let body = format!(
            "From: sender@example.com\r\n\
             To: me@example.com\r\n\
             Subject: {}\r\n\
             Date: {}\r\n\
             \r\n\
             Hello.\r\n",
            subject, date
        );
        self.raw(folder, file, &body)
    }

    /// Writes a meeting request carrying a `text/calendar` part.
    pub fn meeting(&self, folder: &str, file: &str, subject: &str, date: &str) -> PathBuf {
        let body = format!(
            "From: organizer@example.com\r\n\
             Subject: {}\r\n\
             Date: {}\r\n\
             MIME-Version: 1.0\r\n\
             Content-Type: multipart/alternative; boundary=\"b1\"\r\n\
             \r\n\
             --b1\r\n\
             Content-Type: text/plain\r\n\
             \r\n\
             You are invited.\r\n\
             --b1\r\n\
             Content-Type: text/calendar; method=REQUEST\r\n\
             \r\n\
             BEGIN:VCALENDAR\r\n\
             METHOD:REQUEST\r\n\
             END:VCALENDAR\r\n\
             --b1--\r\n",
            subject, date
        );
        self.raw(folder, file, &body)
    }

    pub fn raw(&self, folder: &str, file: &str, contents: &str) -> PathBuf {
        let path = self.folder(folder).join(file);
        fs::write(&path, contents).unwrap();
        path
    }

    /// File names directly inside `folder`, sorted.
    pub fn files(&self, folder: &str) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(self.path(folder))
            .unwrap()
            .map(|e| e.unwrap())
            .filter(|e| e.file_type().unwrap().is_file())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}
