//! Catalog Core - headless library for the catalog admin.
//!
//! Manages three kinds of named records (categories, types, sections) in a
//! SQLite database. Every mutation follows the same pipeline: validate the
//! input, persist it, invalidate the cached list for its kind. It can be used
//! programmatically without any HTTP layer.
//!
//! # Example
//!
//! ```rust,ignore
//! use catalog_core::{CatalogApi, CreateInput, EntityKind};
//!
//! #[tokio::main]
//! async fn main() -> catalog_core::Result<()> {
//!     let api = CatalogApi::builder("./catalog-data")
//!         .auto_create_dirs(true)
//!         .build()?;
//!
//!     api.create(EntityKind::Category, CreateInput::new("Fruit")).await?;
//!
//!     let categories = api.list(EntityKind::Category).await?;
//!     println!("Found {} categories", categories.len());
//!
//!     Ok(())
//! }
//! ```

pub mod actions;
pub mod cache;
pub mod config;
pub mod error;
pub mod model;
pub mod service;
pub mod store;
pub mod validation;

// Re-export commonly used types
pub use actions::{notice_for, CatalogApi, CatalogApiBuilder};
pub use cache::{CacheStats, ListCache};
pub use config::EntityKind;
pub use error::{CatalogError, FieldErrors, Result};
pub use model::{Notice, NoticeLevel, Operation, Record};
pub use service::EntityService;
pub use store::{EntityStore, SqliteStore};
pub use validation::{CreateInput, DeleteInput, EntityName, UpdateInput};
