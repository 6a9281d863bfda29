//! PostgreSQL JSONB document store.

pub mod connection;
pub mod sql;
pub mod store;

pub use connection::connect;
pub use store::PgDocumentStore;
