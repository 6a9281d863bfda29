//! Structural and semantic checks applied before a document is persisted.
//!
//! Violations of field constraints surface as `Validation` errors; cycles,
//! duplicate folder ids, and dangling parent references surface as
//! `InvalidHierarchy`. Nothing is ever silently corrected.

pub mod hierarchy;
pub mod validator;

pub use hierarchy::check_hierarchy;
pub use validator::Validator;
