//! Script domain entities.

pub mod metadata;
pub mod model;
pub mod version;

pub use metadata::{ContentType, MetadataPatch, ScriptMetadata, ScriptStatus};
pub use model::{CreateScript, Script};
pub use version::ScriptVersion;
