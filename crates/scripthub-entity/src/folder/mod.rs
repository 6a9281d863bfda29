//! Folder domain entities.

pub mod node;

pub use node::{CreateFolder, FolderNode, FolderPatch};
