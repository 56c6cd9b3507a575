//! SQLite-based record store.

use super::traits::EntityStore;
use crate::config::{EntityKind, ServerConfig};
use crate::error::{CatalogError, Result};
use crate::model::Record;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;
use uuid::Uuid;

/// SQLite-based store backend.
///
/// Thread-safe via internal mutex on the connection.
pub struct SqliteStore {
    /// `None` for in-memory databases.
    db_path: Option<PathBuf>,
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open (or create) a store at the specified database path.
    ///
    /// Creates the parent directory and tables if they don't exist.
    pub fn new(db_path: impl AsRef<Path>) -> Result<Self> {
        let db_path = db_path.as_ref();

        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| CatalogError::Io {
                    message: format!("Failed to create database directory: {}", e),
                    path: Some(parent.to_path_buf()),
                    source: Some(e),
                })?;
            }
        }

        let conn = Connection::open(db_path).map_err(|e| CatalogError::Database {
            message: format!("Failed to open database: {}", e),
            source: Some(e),
        })?;

        // WAL for concurrent readers
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")
            .map_err(|e| CatalogError::Database {
                message: format!("Failed to set pragmas: {}", e),
                source: Some(e),
            })?;

        Self::from_connection(conn, Some(db_path.to_path_buf()))
    }

    /// Open a private in-memory store. Contents vanish on drop.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|e| CatalogError::Database {
            message: format!("Failed to open in-memory database: {}", e),
            source: Some(e),
        })?;
        Self::from_connection(conn, None)
    }

    fn from_connection(conn: Connection, db_path: Option<PathBuf>) -> Result<Self> {
        conn.busy_timeout(ServerConfig::SQLITE_BUSY_TIMEOUT)?;

        let store = Self {
            db_path,
            conn: Arc::new(Mutex::new(conn)),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Get the database path, if file-backed.
    pub fn db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| CatalogError::lock_poisoned())
    }

    /// Initialize database schema.
    fn init_schema(&self) -> Result<()> {
        let conn = self.lock()?;

        for kind in EntityKind::all() {
            let table = kind.table_name();
            conn.execute_batch(&format!(
                r#"
                CREATE TABLE IF NOT EXISTS {table} (
                    id TEXT PRIMARY KEY,
                    name TEXT NOT NULL,
                    created_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                );

                CREATE INDEX IF NOT EXISTS idx_{table}_created
                    ON {table}(created_at);
                "#
            ))
            .map_err(|e| CatalogError::Database {
                message: format!("Failed to initialize {} schema: {}", table, e),
                source: Some(e),
            })?;
        }

        Ok(())
    }

    fn select_one(conn: &Connection, kind: EntityKind, id: Uuid) -> Result<Option<Record>> {
        let sql = format!(
            "SELECT id, name, created_at, updated_at FROM {} WHERE id = ?1",
            kind.table_name()
        );
        let record = conn
            .query_row(&sql, params![id.to_string()], row_to_record)
            .optional()?;
        Ok(record)
    }
}

/// Map a row of `(id, name, created_at, updated_at)` to a record.
fn row_to_record(row: &Row<'_>) -> rusqlite::Result<Record> {
    let id: String = row.get(0)?;
    let created_at: String = row.get(2)?;
    let updated_at: String = row.get(3)?;

    Ok(Record {
        id: Uuid::parse_str(&id).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })?,
        name: row.get(1)?,
        created_at: parse_timestamp(&created_at, 2)?,
        updated_at: parse_timestamp(&updated_at, 3)?,
    })
}

/// Fixed-width timestamps so that text ordering matches time ordering.
fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn parse_timestamp(value: &str, column: usize) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                column,
                rusqlite::types::Type::Text,
                Box::new(e),
            )
        })
}

impl EntityStore for SqliteStore {
    fn list(&self, kind: EntityKind) -> Result<Vec<Record>> {
        let conn = self.lock()?;

        let sql = format!(
            "SELECT id, name, created_at, updated_at FROM {} ORDER BY created_at, rowid",
            kind.table_name()
        );
        let mut stmt = conn.prepare(&sql)?;
        let records = stmt
            .query_map([], row_to_record)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        debug!("Listed {} {}", records.len(), kind.plural());
        Ok(records)
    }

    fn get(&self, kind: EntityKind, id: Uuid) -> Result<Option<Record>> {
        let conn = self.lock()?;
        Self::select_one(&conn, kind, id)
    }

    fn insert(&self, kind: EntityKind, name: &str) -> Result<Record> {
        let conn = self.lock()?;

        let now = Utc::now();
        let record = Record {
            id: Uuid::new_v4(),
            name: name.to_string(),
            created_at: now,
            updated_at: now,
        };

        conn.execute(
            &format!(
                "INSERT INTO {} (id, name, created_at, updated_at) VALUES (?1, ?2, ?3, ?4)",
                kind.table_name()
            ),
            params![
                record.id.to_string(),
                record.name,
                format_timestamp(now),
                format_timestamp(now)
            ],
        )?;

        debug!("Inserted {} {}", kind, record.id);
        Ok(record)
    }

    fn update(&self, kind: EntityKind, id: Uuid, name: &str) -> Result<Record> {
        let conn = self.lock()?;

        let changed = conn.execute(
            &format!(
                "UPDATE {} SET name = ?1, updated_at = ?2 WHERE id = ?3",
                kind.table_name()
            ),
            params![name, format_timestamp(Utc::now()), id.to_string()],
        )?;

        if changed == 0 {
            return Err(CatalogError::NotFound {
                kind,
                id: id.to_string(),
            });
        }

        debug!("Updated {} {}", kind, id);
        Self::select_one(&conn, kind, id)?.ok_or_else(|| CatalogError::NotFound {
            kind,
            id: id.to_string(),
        })
    }

    fn delete(&self, kind: EntityKind, id: Uuid) -> Result<Record> {
        let conn = self.lock()?;

        let existing = Self::select_one(&conn, kind, id)?.ok_or_else(|| {
            CatalogError::NotFound {
                kind,
                id: id.to_string(),
            }
        })?;

        conn.execute(
            &format!("DELETE FROM {} WHERE id = ?1", kind.table_name()),
            params![id.to_string()],
        )?;

        debug!("Deleted {} {}", kind, id);
        Ok(existing)
    }

    fn count(&self, kind: EntityKind) -> Result<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", kind.table_name()),
            [],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_store() -> (TempDir, SqliteStore) {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test_catalog.sqlite");
        let store = SqliteStore::new(&db_path).unwrap();
        (temp_dir, store)
    }

    #[test]
    fn test_store_creation() {
        let (temp, store) = create_test_store();
        assert_eq!(
            store.db_path(),
            Some(temp.path().join("test_catalog.sqlite").as_path())
        );
        for kind in EntityKind::all() {
            assert!(store.list(kind).unwrap().is_empty());
        }
    }

    #[test]
    fn test_creates_missing_parent_directory() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("nested").join("catalog.sqlite");
        SqliteStore::new(&db_path).unwrap();
        assert!(db_path.exists());
    }

    #[test]
    fn test_insert_and_get() {
        let (_temp, store) = create_test_store();

        let record = store.insert(EntityKind::Category, "Fruit").unwrap();
        let fetched = store.get(EntityKind::Category, record.id).unwrap();
        assert_eq!(fetched, Some(record));
    }

    #[test]
    fn test_list_is_ordered_by_creation() {
        let (_temp, store) = create_test_store();

        let first = store.insert(EntityKind::Section, "First").unwrap();
        let second = store.insert(EntityKind::Section, "Second").unwrap();

        let names: Vec<_> = store
            .list(EntityKind::Section)
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(names, vec![first.id, second.id]);
    }

    #[test]
    fn test_kind_isolation() {
        let (_temp, store) = create_test_store();

        let record = store.insert(EntityKind::Type, "Shared").unwrap();

        assert_eq!(store.list(EntityKind::Type).unwrap().len(), 1);
        assert!(store.list(EntityKind::Category).unwrap().is_empty());
        assert!(store.get(EntityKind::Section, record.id).unwrap().is_none());
    }

    #[test]
    fn test_update() {
        let (_temp, store) = create_test_store();

        let record = store.insert(EntityKind::Type, "Old").unwrap();
        let updated = store.update(EntityKind::Type, record.id, "New").unwrap();

        assert_eq!(updated.id, record.id);
        assert_eq!(updated.name, "New");
        assert_eq!(updated.created_at, record.created_at);
        assert!(updated.updated_at >= record.updated_at);
    }

    #[test]
    fn test_update_missing_is_not_found() {
        let (_temp, store) = create_test_store();

        let err = store
            .update(EntityKind::Type, Uuid::new_v4(), "Nope")
            .unwrap_err();
        assert!(matches!(err, CatalogError::NotFound { .. }));
    }

    #[test]
    fn test_delete() {
        let (_temp, store) = create_test_store();

        let keep = store.insert(EntityKind::Category, "Keep").unwrap();
        let gone = store.insert(EntityKind::Category, "Gone").unwrap();

        let deleted = store.delete(EntityKind::Category, gone.id).unwrap();
        assert_eq!(deleted, gone);

        let remaining = store.list(EntityKind::Category).unwrap();
        assert_eq!(remaining, vec![keep]);

        let err = store.delete(EntityKind::Category, gone.id).unwrap_err();
        assert!(matches!(err, CatalogError::NotFound { .. }));
    }

    #[test]
    fn test_count() {
        let (_temp, store) = create_test_store();

        store.insert(EntityKind::Section, "One").unwrap();
        store.insert(EntityKind::Section, "Two").unwrap();

        assert_eq!(store.count(EntityKind::Section).unwrap(), 2);
        assert_eq!(store.count(EntityKind::Type).unwrap(), 0);
    }

    #[test]
    fn test_persists_across_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("catalog.sqlite");

        let id = {
            let store = SqliteStore::new(&db_path).unwrap();
            store.insert(EntityKind::Category, "Durable").unwrap().id
        };

        let store = SqliteStore::new(&db_path).unwrap();
        let record = store.get(EntityKind::Category, id).unwrap().unwrap();
        assert_eq!(record.name, "Durable");
    }

    #[test]
    fn test_in_memory_store() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert!(store.db_path().is_none());
        store.insert(EntityKind::Type, "Ephemeral").unwrap();
        assert_eq!(store.count(EntityKind::Type).unwrap(), 1);
    }
}
