//! Mail store adapters.

pub mod directory;
pub mod memory;

pub use directory::{DirFolder, DirItem, DirectoryStore};
pub use memory::{MemoryFolder, MemoryItem, MemoryStore};
