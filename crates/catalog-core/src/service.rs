//! Validate-then-persist operations over an [`EntityStore`].
//!
//! The service knows nothing about caching or user feedback; see
//! [`crate::actions`] for the layer that adds both.

use crate::config::EntityKind;
use crate::error::{CatalogError, Result};
use crate::model::{Operation, Record};
use crate::store::EntityStore;
use crate::validation::{require_id, CreateInput, DeleteInput, UpdateInput};
use std::sync::Arc;
use tracing::{error, warn};

/// Per-kind CRUD on top of a store.
#[derive(Clone)]
pub struct EntityService {
    store: Arc<dyn EntityStore>,
}

impl EntityService {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }

    /// List every record of a kind.
    ///
    /// Store failures propagate unchanged; the caller decides how to show them.
    pub fn list(&self, kind: EntityKind) -> Result<Vec<Record>> {
        self.store.list(kind)
    }

    pub fn count(&self, kind: EntityKind) -> Result<usize> {
        self.store.count(kind)
    }

    /// Fetch one record by its raw id.
    pub fn get(&self, kind: EntityKind, raw_id: &str) -> Result<Record> {
        let id = require_id(raw_id)?;
        self.store
            .get(kind, id)?
            .ok_or_else(|| CatalogError::NotFound {
                kind,
                id: id.to_string(),
            })
    }

    pub fn create(&self, kind: EntityKind, input: &CreateInput) -> Result<Record> {
        let new = input.validate().inspect_err(|e| log_rejected(kind, Operation::Create, e))?;
        self.store
            .insert(kind, new.name.as_str())
            .map_err(|e| persistence_failure(kind, Operation::Create, e))
    }

    pub fn update(&self, kind: EntityKind, input: &UpdateInput) -> Result<Record> {
        let change = input.validate().inspect_err(|e| log_rejected(kind, Operation::Update, e))?;
        self.store
            .update(kind, change.id, change.name.as_str())
            .map_err(|e| persistence_failure(kind, Operation::Update, e))
    }

    pub fn delete(&self, kind: EntityKind, input: &DeleteInput) -> Result<Record> {
        let id = input.validate().inspect_err(|e| log_rejected(kind, Operation::Delete, e))?;
        self.store
            .delete(kind, id)
            .map_err(|e| persistence_failure(kind, Operation::Delete, e))
    }
}

fn log_rejected(kind: EntityKind, operation: Operation, err: &CatalogError) {
    warn!(
        "Rejected {} {}: {:?}",
        operation.verb(),
        kind,
        err.field_errors()
    );
}

/// Fold a store error into the generic persistence failure.
///
/// `NotFound` is kept as-is so callers can answer 404.
fn persistence_failure(kind: EntityKind, operation: Operation, err: CatalogError) -> CatalogError {
    match err {
        CatalogError::NotFound { .. } => err,
        other => {
            error!("Failed to {} {}: {}", operation.verb(), kind, other);
            CatalogError::Persistence { kind, operation }
        }
    }
}
