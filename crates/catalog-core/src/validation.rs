//! Input validation for create, update and delete requests.
//!
//! Raw inputs arrive from JSON bodies, HTML forms and path segments as plain
//! strings. Each `validate()` collects every failing field before returning,
//! so a form can show all messages at once.

use crate::config::ValidationConfig;
use crate::error::{CatalogError, FieldErrors, Result};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const NAME_FIELD: &str = "name";
pub const ID_FIELD: &str = "id";

pub const MSG_NAME_REQUIRED: &str = "Name is required";
pub const MSG_INVALID_ID: &str = "Invalid ID format";

/// A display name that has been trimmed and length-checked.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityName(String);

impl EntityName {
    /// Trim `raw` and check it against the configured length limits.
    ///
    /// Length is counted in characters, not bytes.
    pub fn parse(raw: &str) -> std::result::Result<Self, String> {
        let trimmed = raw.trim();
        let len = trimmed.chars().count();

        if len == 0 {
            return Err(MSG_NAME_REQUIRED.to_string());
        }
        if len < ValidationConfig::NAME_MIN_CHARS {
            return Err(format!(
                "Name must be at least {} characters",
                ValidationConfig::NAME_MIN_CHARS
            ));
        }
        if len > ValidationConfig::NAME_MAX_CHARS {
            return Err(format!(
                "Name must be at most {} characters",
                ValidationConfig::NAME_MAX_CHARS
            ));
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for EntityName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parse a record identifier.
pub fn parse_id(raw: &str) -> std::result::Result<Uuid, String> {
    Uuid::parse_str(raw.trim()).map_err(|_| MSG_INVALID_ID.to_string())
}

/// Parse a record identifier from a path segment, as a validation error.
pub fn require_id(raw: &str) -> Result<Uuid> {
    parse_id(raw).map_err(|msg| CatalogError::invalid_field(ID_FIELD, msg))
}

fn check_name(raw: Option<&str>, errors: &mut FieldErrors) -> Option<EntityName> {
    let result = match raw {
        Some(raw) => EntityName::parse(raw),
        None => Err(MSG_NAME_REQUIRED.to_string()),
    };
    match result {
        Ok(name) => Some(name),
        Err(msg) => {
            errors.entry(NAME_FIELD.to_string()).or_default().push(msg);
            None
        }
    }
}

fn check_id(raw: &str, errors: &mut FieldErrors) -> Option<Uuid> {
    match parse_id(raw) {
        Ok(id) => Some(id),
        Err(msg) => {
            errors.entry(ID_FIELD.to_string()).or_default().push(msg);
            None
        }
    }
}

/// Raw create request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateInput {
    #[serde(default)]
    pub name: Option<String>,
}

/// Validated create request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecord {
    pub name: EntityName,
}

impl CreateInput {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }

    pub fn validate(&self) -> Result<NewRecord> {
        let mut errors = FieldErrors::new();
        match check_name(self.name.as_deref(), &mut errors) {
            Some(name) => Ok(NewRecord { name }),
            None => Err(CatalogError::validation(errors)),
        }
    }
}

/// Raw update request. The id usually comes from the URL path.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateInput {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Validated update request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordChange {
    pub id: Uuid,
    pub name: EntityName,
}

impl UpdateInput {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: Some(name.into()),
        }
    }

    pub fn validate(&self) -> Result<RecordChange> {
        let mut errors = FieldErrors::new();
        let id = check_id(&self.id, &mut errors);
        let name = check_name(self.name.as_deref(), &mut errors);
        match (id, name) {
            (Some(id), Some(name)) => Ok(RecordChange { id, name }),
            _ => Err(CatalogError::validation(errors)),
        }
    }
}

/// Raw delete request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeleteInput {
    #[serde(default)]
    pub id: String,
}

impl DeleteInput {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    pub fn validate(&self) -> Result<Uuid> {
        require_id(&self.id)
    }
}
