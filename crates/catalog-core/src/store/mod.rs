//! Relational storage for catalog records.
//!
//! All three entity kinds share one SQLite database, one table per kind.

mod sqlite;
mod traits;

pub use sqlite::SqliteStore;
pub use traits::EntityStore;
