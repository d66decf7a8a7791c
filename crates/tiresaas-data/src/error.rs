//! # Repository Error Types
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  Repository call (insert, update, record)                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DataError (this module) ← Adds entity and field context               │
//! │       │                                                                 │
//! │       ├──► RecordError (sale sink boundary, via From)                  │
//! │       ▼                                                                 │
//! │  AppError (tiresaas-app) ← Turned into an error notice                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;
use tiresaas_core::{RecordError, ValidationError};

/// Repository operation errors.
#[derive(Debug, Error)]
pub enum DataError {
    /// No record with this id.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A unique field (product code, user email, store name) is taken.
    #[error("Duplicate {field}: '{value}' already exists")]
    Duplicate { field: String, value: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Payload could not be encoded or decoded.
    #[error("Serialization failed: {0}")]
    Serialization(String),

    /// The store is switched off (simulated offline mode).
    #[error("{0} is unavailable")]
    Unavailable(String),
}

impl DataError {
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DataError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        DataError::Duplicate {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Converts into the error type of the sale sink boundary.
    pub fn into_record_error(self, sale_id: &str) -> RecordError {
        RecordError::new(sale_id, self.to_string())
    }
}

impl From<serde_json::Error> for DataError {
    fn from(err: serde_json::Error) -> Self {
        DataError::Serialization(err.to_string())
    }
}

/// Result type for repository operations.
pub type DataResult<T> = Result<T, DataError>;
