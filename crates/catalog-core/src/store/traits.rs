//! Store backend trait.

use crate::config::EntityKind;
use crate::error::Result;
use crate::model::Record;
use uuid::Uuid;

/// Generic record store.
///
/// Provides per-kind storage of named records.
/// All operations are synchronous to match rusqlite's API.
pub trait EntityStore: Send + Sync {
    /// List all records of a kind, oldest first.
    fn list(&self, kind: EntityKind) -> Result<Vec<Record>>;

    /// Get one record by id.
    ///
    /// Returns `None` if no such record exists.
    fn get(&self, kind: EntityKind, id: Uuid) -> Result<Option<Record>>;

    /// Insert a new record with a freshly generated id.
    fn insert(&self, kind: EntityKind, name: &str) -> Result<Record>;

    /// Rename an existing record.
    ///
    /// Fails with `CatalogError::NotFound` if the id is unknown.
    fn update(&self, kind: EntityKind, id: Uuid, name: &str) -> Result<Record>;

    /// Delete a record and return it as it was.
    ///
    /// Fails with `CatalogError::NotFound` if the id is unknown.
    fn delete(&self, kind: EntityKind, id: Uuid) -> Result<Record>;

    /// Number of records of a kind.
    fn count(&self, kind: EntityKind) -> Result<usize>;
}
