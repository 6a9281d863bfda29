//! # scripthub-entity
//!
//! Domain entity models for ScriptHub. Every top-level struct in this crate
//! is stored as one document (`Project`, `Script`) or is embedded inside
//! one (`FolderNode`, `ScriptVersion`). Documents serialize with camelCase
//! field names, which is also the naming used by store filters.

pub mod folder;
pub mod project;
pub mod script;
