//! # Application Error Type
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       App Error Categories                              │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Navigation    │  │     Wrapped             │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  UnknownTab     │  │  Core  (CoreError)      │ │
//! │  │  ConfigLoad     │  │                 │  │  Data  (DataError)      │ │
//! │  │  ConfigSave     │  │                 │  │  Device (DeviceError)   │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  Every variant ends up as an error notice; none stops the app.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;
use tiresaas_core::CoreError;
use tiresaas_data::DataError;

use crate::devices::DeviceError;

/// Result type alias for app operations.
pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Navigation Errors
    // =========================================================================
    #[error("Unknown tab: '{0}'")]
    UnknownTab(String),

    // =========================================================================
    // Wrapped Errors
    // =========================================================================
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Device(#[from] DeviceError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// True for input problems the seller can fix.
    pub fn is_validation(&self) -> bool {
        match self {
            AppError::Core(err) => err.is_validation(),
            AppError::Data(DataError::Validation(_)) => true,
            _ => false,
        }
    }
}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        AppError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for AppError {
    fn from(err: toml::ser::Error) -> Self {
        AppError::ConfigSaveFailed(err.to_string())
    }
}
