//! Cached, user-facing operations: the entry point for HTTP handlers.
//!
//! Every mutation runs the service (validate, persist), then invalidates the
//! list cache tag of the kind it touched so the next list read refetches.

mod builder;

pub use builder::CatalogApiBuilder;

use crate::cache::{CacheStats, ListCache};
use crate::config::EntityKind;
use crate::error::{CatalogError, Result};
use crate::model::{Notice, Operation, Record};
use crate::service::EntityService;
use crate::validation::{CreateInput, DeleteInput, UpdateInput};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Main API struct for catalog operations.
///
/// Cheap to clone; clones share the store and the cache.
#[derive(Clone)]
pub struct CatalogApi {
    /// Data directory, `None` for in-memory or custom stores.
    data_dir: Option<PathBuf>,
    service: EntityService,
    cache: Arc<ListCache>,
}

impl CatalogApi {
    /// Create a builder rooted at `data_dir`.
    pub fn builder(data_dir: impl Into<PathBuf>) -> CatalogApiBuilder {
        CatalogApiBuilder::new(data_dir)
    }

    /// Open the catalog in an existing data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Result<Self> {
        Self::builder(data_dir).build()
    }

    /// Catalog backed by a private in-memory database.
    pub fn in_memory() -> Result<Self> {
        CatalogApiBuilder::in_memory().build()
    }

    pub(crate) fn from_parts(
        data_dir: Option<PathBuf>,
        service: EntityService,
        cache: ListCache,
    ) -> Self {
        Self {
            data_dir,
            service,
            cache: Arc::new(cache),
        }
    }

    pub fn data_dir(&self) -> Option<&Path> {
        self.data_dir.as_deref()
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Run a service call on the blocking pool.
    async fn run<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&EntityService) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let service = self.service.clone();
        tokio::task::spawn_blocking(move || f(&service))
            .await
            .map_err(|e| CatalogError::Task {
                message: e.to_string(),
            })?
    }

    /// List records of a kind, served from the cache when possible.
    pub async fn list(&self, kind: EntityKind) -> Result<Arc<Vec<Record>>> {
        if let Some(records) = self.cache.get(kind) {
            return Ok(records);
        }

        // Taken before the read so a concurrent mutation voids this result
        let generation = self.cache.generation(kind);
        let records = Arc::new(self.run(move |svc| svc.list(kind)).await?);
        self.cache.put(kind, generation, records.clone());
        Ok(records)
    }

    /// Number of records of a kind. A cached list answers without the store.
    pub async fn count(&self, kind: EntityKind) -> Result<usize> {
        if let Some(records) = self.cache.get(kind) {
            return Ok(records.len());
        }
        self.run(move |svc| svc.count(kind)).await
    }

    pub async fn get(&self, kind: EntityKind, id: &str) -> Result<Record> {
        let id = id.to_string();
        self.run(move |svc| svc.get(kind, &id)).await
    }

    pub async fn create(&self, kind: EntityKind, input: CreateInput) -> Result<Record> {
        let record = self.run(move |svc| svc.create(kind, &input)).await?;
        self.cache.invalidate(kind);
        info!("Created {} {} ({})", kind, record.id, record.name);
        Ok(record)
    }

    pub async fn update(&self, kind: EntityKind, input: UpdateInput) -> Result<Record> {
        let record = self.run(move |svc| svc.update(kind, &input)).await?;
        self.cache.invalidate(kind);
        info!("Updated {} {} ({})", kind, record.id, record.name);
        Ok(record)
    }

    pub async fn delete(&self, kind: EntityKind, input: DeleteInput) -> Result<Record> {
        let record = self.run(move |svc| svc.delete(kind, &input)).await?;
        self.cache.invalidate(kind);
        info!("Deleted {} {} ({})", kind, record.id, record.name);
        Ok(record)
    }
}

/// Toast for the outcome of an action.
pub fn notice_for<T>(kind: EntityKind, operation: Operation, result: &Result<T>) -> Notice {
    match result {
        Ok(_) => Notice::success(format!(
            "{} {} successfully",
            kind.singular_label(),
            operation.past_tense()
        )),
        Err(CatalogError::Validation { details, .. }) => {
            let reason = details
                .values()
                .flatten()
                .next()
                .map(String::as_str)
                .unwrap_or(CatalogError::VALIDATION_MESSAGE);
            Notice::error(format!(
                "Failed to {} {}: {}",
                operation.verb(),
                kind.as_str(),
                reason
            ))
        }
        Err(CatalogError::NotFound { .. }) => Notice::error(format!(
            "Failed to {} {}: {} not found",
            operation.verb(),
            kind.as_str(),
            kind.as_str()
        )),
        Err(_) => Notice::error(format!("Failed to {} {}", operation.verb(), kind.as_str())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NoticeLevel;
    use crate::store::{EntityStore, SqliteStore};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;
    use uuid::Uuid;

    fn api() -> CatalogApi {
        CatalogApi::in_memory().unwrap()
    }

    #[tokio::test]
    async fn test_create_then_listed() {
        let api = api();
        assert!(api.list(EntityKind::Category).await.unwrap().is_empty());

        let record = api
            .create(EntityKind::Category, CreateInput::new("Fruit"))
            .await
            .unwrap();

        let list = api.list(EntityKind::Category).await.unwrap();
        assert_eq!(list.as_slice(), &[record]);
    }

    #[tokio::test]
    async fn test_mutation_invalidates_only_its_tag() {
        let api = api();
        api.list(EntityKind::Category).await.unwrap();
        api.list(EntityKind::Type).await.unwrap();

        api.create(EntityKind::Category, CreateInput::new("Fruit"))
            .await
            .unwrap();

        let before = api.cache_stats();
        api.list(EntityKind::Type).await.unwrap();
        api.list(EntityKind::Category).await.unwrap();
        let after = api.cache_stats();

        assert_eq!(after.hits - before.hits, 1);
        assert_eq!(after.misses - before.misses, 1);
    }

    #[tokio::test]
    async fn test_failed_mutation_keeps_cache() {
        let api = api();
        api.list(EntityKind::Section).await.unwrap();

        let result = api.create(EntityKind::Section, CreateInput::new("x")).await;
        assert!(result.is_err());
        assert_eq!(api.cache_stats().invalidations, 0);
    }

    #[tokio::test]
    async fn test_update_replaces_name_in_list() {
        let api = api();
        let record = api
            .create(EntityKind::Type, CreateInput::new("Old name"))
            .await
            .unwrap();
        api.list(EntityKind::Type).await.unwrap();

        api.update(
            EntityKind::Type,
            UpdateInput::new(record.id.to_string(), "New name"),
        )
        .await
        .unwrap();

        let names: Vec<String> = api
            .list(EntityKind::Type)
            .await
            .unwrap()
            .iter()
            .map(|r| r.name.clone())
            .collect();
        assert_eq!(names, vec!["New name".to_string()]);
    }

    #[tokio::test]
    async fn test_delete_removes_from_list() {
        let api = api();
        let record = api
            .create(EntityKind::Section, CreateInput::new("Doomed"))
            .await
            .unwrap();
        api.list(EntityKind::Section).await.unwrap();

        api.delete(EntityKind::Section, DeleteInput::new(record.id.to_string()))
            .await
            .unwrap();

        assert_eq!(api.count(EntityKind::Section).await.unwrap(), 0);
    }

    /// Store whose first list read stalls after reading, so a mutation can
    /// complete in between.
    struct SlowListStore {
        inner: SqliteStore,
        stall_next_list: AtomicBool,
    }

    impl EntityStore for SlowListStore {
        fn list(&self, kind: EntityKind) -> Result<Vec<Record>> {
            let records = self.inner.list(kind)?;
            if self.stall_next_list.swap(false, Ordering::SeqCst) {
                std::thread::sleep(Duration::from_millis(300));
            }
            Ok(records)
        }
        fn get(&self, kind: EntityKind, id: Uuid) -> Result<Option<Record>> {
            self.inner.get(kind, id)
        }
        fn insert(&self, kind: EntityKind, name: &str) -> Result<Record> {
            self.inner.insert(kind, name)
        }
        fn update(&self, kind: EntityKind, id: Uuid, name: &str) -> Result<Record> {
            self.inner.update(kind, id, name)
        }
        fn delete(&self, kind: EntityKind, id: Uuid) -> Result<Record> {
            self.inner.delete(kind, id)
        }
        fn count(&self, kind: EntityKind) -> Result<usize> {
            self.inner.count(kind)
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_slow_list_does_not_cache_over_mutation() {
        let store = SlowListStore {
            inner: SqliteStore::open_in_memory().unwrap(),
            stall_next_list: AtomicBool::new(true),
        };
        let api = CatalogApi::builder("unused")
            .with_store(Arc::new(store))
            .build()
            .unwrap();

        let reader = {
            let api = api.clone();
            tokio::spawn(async move { api.list(EntityKind::Category).await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;

        api.create(EntityKind::Category, CreateInput::new("Fruit"))
            .await
            .unwrap();

        // The slow reader saw the table before the insert
        assert!(reader.await.unwrap().unwrap().is_empty());

        let list = api.list(EntityKind::Category).await.unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].name, "Fruit");
    }

    #[tokio::test]
    async fn test_count_uses_cached_list() {
        let api = api();
        api.create(EntityKind::Type, CreateInput::new("Frozen"))
            .await
            .unwrap();

        // Miss goes to the store without caching
        assert_eq!(api.count(EntityKind::Type).await.unwrap(), 1);
        api.list(EntityKind::Type).await.unwrap();

        let before = api.cache_stats();
        assert_eq!(api.count(EntityKind::Type).await.unwrap(), 1);
        assert_eq!(api.cache_stats().hits - before.hits, 1);
    }

    #[test]
    fn test_notice_messages() {
        let ok: Result<()> = Ok(());
        let notice = notice_for(EntityKind::Category, Operation::Create, &ok);
        assert_eq!(notice.level, NoticeLevel::Success);
        assert_eq!(notice.message, "Category created successfully");

        let invalid: Result<()> = Err(CatalogError::invalid_field(
            "name",
            "Name must be at least 2 characters",
        ));
        let notice = notice_for(EntityKind::Type, Operation::Update, &invalid);
        assert_eq!(notice.level, NoticeLevel::Error);
        assert_eq!(
            notice.message,
            "Failed to update type: Name must be at least 2 characters"
        );

        let failed: Result<()> = Err(CatalogError::Persistence {
            kind: EntityKind::Section,
            operation: Operation::Delete,
        });
        let notice = notice_for(EntityKind::Section, Operation::Delete, &failed);
        assert_eq!(notice.message, "Failed to delete section");
    }
}
