//! # scripthub-core
//!
//! Core crate for ScriptHub. Contains the document store and clock traits,
//! configuration schemas, typed identifiers, pagination/sorting/filter
//! types, and the unified error system.
//!
//! This crate has **no** internal dependencies on other ScriptHub crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
