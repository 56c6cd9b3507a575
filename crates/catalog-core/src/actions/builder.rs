//! Builder for configuring CatalogApi initialization.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::actions::CatalogApi;
use crate::cache::ListCache;
use crate::config::{CacheConfig, PathsConfig};
use crate::error::{CatalogError, Result};
use crate::service::EntityService;
use crate::store::{EntityStore, SqliteStore};
use tracing::info;

/// Builder for configuring CatalogApi initialization.
///
/// # Example
///
/// ```rust,ignore
/// use catalog_core::CatalogApi;
///
/// let api = CatalogApi::builder("./catalog-data")
///     .auto_create_dirs(true)
///     .list_ttl(std::time::Duration::from_secs(60))
///     .build()?;
/// ```
pub struct CatalogApiBuilder {
    data_dir: PathBuf,
    database_path: Option<PathBuf>,
    auto_create_dirs: bool,
    in_memory: bool,
    list_ttl: Duration,
    store: Option<Arc<dyn EntityStore>>,
}

impl CatalogApiBuilder {
    /// Create a new builder with the data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            database_path: None,
            auto_create_dirs: false,
            in_memory: false,
            list_ttl: CacheConfig::LIST_TTL,
            store: None,
        }
    }

    /// Builder for a private in-memory database.
    pub fn in_memory() -> Self {
        let mut builder = Self::new(PathsConfig::DEFAULT_DATA_DIR);
        builder.in_memory = true;
        builder
    }

    /// Create the data directory if it doesn't exist.
    ///
    /// Default: `false` (directory must exist)
    pub fn auto_create_dirs(mut self, enable: bool) -> Self {
        self.auto_create_dirs = enable;
        self
    }

    /// Use this database file instead of `<data_dir>/catalog.sqlite`.
    pub fn database_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.database_path = Some(path.into());
        self
    }

    /// How long a cached list may be served without a mutation.
    ///
    /// Default: one hour
    pub fn list_ttl(mut self, ttl: Duration) -> Self {
        self.list_ttl = ttl;
        self
    }

    /// Use a caller-supplied store. Overrides every storage option.
    pub fn with_store(mut self, store: Arc<dyn EntityStore>) -> Self {
        self.store = Some(store);
        self
    }

    fn ensure_data_dir(&self) -> Result<()> {
        if self.data_dir.exists() {
            return Ok(());
        }
        if !self.auto_create_dirs {
            return Err(CatalogError::Config {
                message: format!("Data directory does not exist: {}", self.data_dir.display()),
            });
        }

        std::fs::create_dir_all(&self.data_dir)
            .map_err(|e| CatalogError::io_with_path(e, &self.data_dir))
    }

    /// Build the CatalogApi instance.
    pub fn build(self) -> Result<CatalogApi> {
        let cache = ListCache::new(self.list_ttl);

        if let Some(store) = self.store {
            return Ok(CatalogApi::from_parts(None, EntityService::new(store), cache));
        }

        if self.in_memory {
            info!("Opening in-memory catalog");
            let store = Arc::new(SqliteStore::open_in_memory()?);
            return Ok(CatalogApi::from_parts(None, EntityService::new(store), cache));
        }

        self.ensure_data_dir()?;

        let db_path = self
            .database_path
            .clone()
            .unwrap_or_else(|| self.data_dir.join(PathsConfig::DATABASE_FILENAME));
        info!("Opening catalog database at {}", db_path.display());

        let store = Arc::new(SqliteStore::new(&db_path)?);
        Ok(CatalogApi::from_parts(
            Some(self.data_dir),
            EntityService::new(store),
            cache,
        ))
    }
}
