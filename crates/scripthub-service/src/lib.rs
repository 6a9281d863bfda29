//! # scripthub-service
//!
//! The persistent data layer behind ScriptHub projects and scripts:
//!
//! - [`folder::FolderTree`]: pure operations over a project's embedded
//!   folder forest (insert, rename, move, remove, script-count bookkeeping).
//! - [`script::VersionedScript`]: pure append-only version history with
//!   revert-by-copy-forward.
//! - [`validation::Validator`]: structural and semantic checks run before
//!   anything is persisted.
//! - Services that read a document, apply one of the pure operations,
//!   validate the result, and write it back.
//!
//! Services follow constructor injection: every collaborator is handed in
//! at construction time, there is no process-wide container.

pub mod context;
pub mod folder;
pub mod project;
pub mod script;
pub mod validation;

pub use context::ServiceContext;
pub use folder::{DeletePolicy, FolderDeletion, FolderService, FolderTree};
pub use project::{ProjectService, ReconcileReport};
pub use script::{ScriptService, VersionedScript};
pub use validation::Validator;
