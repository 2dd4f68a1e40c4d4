//! Persistence layer: append-only SQLite snapshot table.
//!
//! One table, `memecoins`, holds every snapshot ever written. Rows are only
//! inserted; "latest" is derived by `MAX(id)` per coin rather than kept in a
//! separate current-state table.

pub mod models;
pub mod sqlite;

pub use models::{NewSnapshot, Snapshot};
pub use sqlite::SqliteStore;
