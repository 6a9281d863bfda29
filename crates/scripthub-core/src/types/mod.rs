//! Core type definitions used across the ScriptHub workspace.

pub mod filter;
pub mod id;
pub mod pagination;
pub mod sorting;

pub use filter::{FilterField, FilterOp, FilterValue};
pub use id::*;
pub use pagination::{PageRequest, PageResponse};
pub use sorting::{SortDirection, SortField};
