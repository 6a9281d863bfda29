//! Project lifecycle service.

pub mod service;

pub use service::{FolderDrift, ProjectService, ReconcileReport};
