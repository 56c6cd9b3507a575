//! Centralized configuration for the catalog.
//!
//! This module provides configuration constants for validation, caching,
//! storage paths and the HTTP server, plus the [`EntityKind`] enum that the
//! rest of the crate is parameterised over.

use std::time::Duration;

/// Application-level configuration.
pub struct AppConfig;

impl AppConfig {
    pub const APP_NAME: &'static str = "Catalog Admin";
    pub const LOG_TARGET: &'static str = "catalog";
}

/// Limits applied to user input.
pub struct ValidationConfig;

impl ValidationConfig {
    /// Minimum display name length, in characters, after trimming.
    pub const NAME_MIN_CHARS: usize = 2;
    /// Maximum display name length, in characters, after trimming.
    pub const NAME_MAX_CHARS: usize = 50;
}

/// List cache configuration.
pub struct CacheConfig;

impl CacheConfig {
    /// Lists are refetched at least this often even without mutations.
    pub const LIST_TTL: Duration = Duration::from_secs(3600);
    /// One slot per entity kind.
    pub const MAX_ENTRIES: u64 = 16;
}

/// Shared directory and file names.
pub struct PathsConfig;

impl PathsConfig {
    pub const DEFAULT_DATA_DIR: &'static str = "catalog-data";
    pub const DATABASE_FILENAME: &'static str = "catalog.sqlite";
}

/// HTTP server defaults.
pub struct ServerConfig;

impl ServerConfig {
    pub const DEFAULT_HOST: &'static str = "127.0.0.1";
    pub const DEFAULT_PORT: u16 = 3000;
    pub const SQLITE_BUSY_TIMEOUT: Duration = Duration::from_secs(30);
}

/// The three managed entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    Category,
    Type,
    Section,
}

impl EntityKind {
    pub fn all() -> [EntityKind; 3] {
        [EntityKind::Category, EntityKind::Type, EntityKind::Section]
    }

    /// Singular slug, used for page routes (`/category`).
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Category => "category",
            EntityKind::Type => "type",
            EntityKind::Section => "section",
        }
    }

    /// Plural slug, used for REST routes (`/api/categories`).
    pub fn plural(&self) -> &'static str {
        match self {
            EntityKind::Category => "categories",
            EntityKind::Type => "types",
            EntityKind::Section => "sections",
        }
    }

    pub fn table_name(&self) -> &'static str {
        self.plural()
    }

    /// Tag under which this kind's list is cached.
    pub fn cache_tag(&self) -> &'static str {
        self.plural()
    }

    pub fn singular_label(&self) -> &'static str {
        match self {
            EntityKind::Category => "Category",
            EntityKind::Type => "Type",
            EntityKind::Section => "Section",
        }
    }

    pub fn plural_label(&self) -> &'static str {
        match self {
            EntityKind::Category => "Categories",
            EntityKind::Type => "Types",
            EntityKind::Section => "Sections",
        }
    }

    /// Parse either the singular or the plural slug, case-insensitively.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "category" | "categories" => Some(EntityKind::Category),
            "type" | "types" => Some(EntityKind::Type),
            "section" | "sections" => Some(EntityKind::Section),
            _ => None,
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
