//! Project domain entities.

pub mod model;
pub mod settings;

pub use model::{CreateProject, Project, ProjectStats, UpdateProject};
pub use settings::{ProjectSettings, Visibility};
