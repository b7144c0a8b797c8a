pub mod bulk;
pub mod categories;
pub mod products;
pub mod users;

use std::collections::BTreeMap;
use thiserror::Error;

use crate::auth::AuthError;
use crate::database::DatabaseError;

pub use bulk::{BulkUpdateRequest, BulkUpdateResult, BulkUpdateService, BULK_ALLOWED_FIELDS};
pub use categories::{CategoryPayload, CategoryService};
pub use products::{ProductPayload, ProductService};
pub use users::{AccountOutcome, MakeAdminRequest, MakeAdminResult, NewAccount, UserService};

/// Per-field validation messages collected before any write happens.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationErrors {
    errors: BTreeMap<String, String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps the first message recorded for a field.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.entry(field.into()).or_insert_with(|| message.into());
    }

    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn summary(&self) -> String {
        self.errors
            .iter()
            .map(|(field, message)| format!("{}: {}", field, message))
            .collect::<Vec<_>>()
            .join("; ")
    }

    pub fn into_map(self) -> BTreeMap<String, String> {
        self.errors
    }
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Validation failed: {}", .0.summary())]
    Validation(ValidationErrors),

    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl From<ValidationErrors> for ServiceError {
    fn from(errors: ValidationErrors) -> Self {
        ServiceError::Validation(errors)
    }
}

pub(crate) const REQUIRED: &str = "This field is required.";
