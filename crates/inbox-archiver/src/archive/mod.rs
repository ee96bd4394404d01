//! Archive root resolution and the persisted descriptor records behind it.

pub mod descriptor;
pub mod locator;
pub mod paths;

pub use descriptor::ArchiveDescriptor;
pub use locator::{ArchiveLocator, ArchiveRoot, Resolution, DEFAULT_ARCHIVE_FOLDER};
pub use paths::{ArchivePathStore, ConfigFileArchivePaths, MemoryArchivePaths};
