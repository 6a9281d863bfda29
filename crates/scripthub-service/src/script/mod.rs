//! Scripts: pure version history and the store-backed service.

pub mod service;
pub mod versioning;

pub use service::{ScriptService, UpdateScriptDetails};
pub use versioning::VersionedScript;
