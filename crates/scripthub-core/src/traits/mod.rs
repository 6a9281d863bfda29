//! Core traits defined in `scripthub-core` and implemented by other crates.

pub mod clock;
pub mod store;

pub use clock::{Clock, FixedClock, IdGenerator, SystemClock, UuidGenerator};
pub use store::{DocumentStore, FindQuery};
