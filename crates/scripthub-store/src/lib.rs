//! # scripthub-store
//!
//! Document store backends for ScriptHub. Supports two providers:
//!
//! - **memory**: In-process collections backed by [dashmap](https://crates.io/crates/dashmap)
//! - **postgres**: One JSONB table per collection via [sqlx](https://crates.io/crates/sqlx)
//!
//! The provider is selected at runtime based on configuration. Typed
//! repositories on top of the raw store live in [`repositories`].

#[cfg(feature = "memory")]
pub mod memory;
#[cfg(feature = "postgres")]
pub mod postgres;
pub mod provider;
pub mod repositories;

pub use provider::StoreManager;
pub use repositories::{ProjectRepository, ScriptRepository};
