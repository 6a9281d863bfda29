//! Folder hierarchy: pure forest operations and the project-scoped service.

pub mod service;
pub mod tree;

pub use service::{DeletePolicy, FolderDeletion, FolderService};
pub use tree::FolderTree;
