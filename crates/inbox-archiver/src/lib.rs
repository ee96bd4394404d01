pub mod archive;
pub mod config;
pub mod engine;
pub mod error;
pub mod mail;
pub mod run;
pub mod sanitize;
pub mod selector;
pub mod store;

pub use archive::{
    ArchiveDescriptor, ArchiveLocator, ArchivePathStore, ConfigFileArchivePaths,
    MemoryArchivePaths,
};
pub use config::{default_config_path, load_config, load_config_from_str, Config};
pub use engine::{Decision, DecisionRecord, MoveEngine};
pub use error::{ArchiverError, ConfigError, PathStoreError, Result, StoreError};
pub use mail::{Account, AccountKind, ItemClass, ItemFilter, MailFolder, MailItem, MailStore};
pub use run::{AccountFilter, AccountOutcome, AccountReport, Archiver, RunOptions, RunReport, RunSummary};
pub use selector::{Candidate, CandidateSelector};
pub use store::{DirectoryStore, MemoryStore};
