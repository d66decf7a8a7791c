//! # Error Types
//!
//! Domain-specific error types for tiresaas-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  tiresaas-core errors (this file)                                      │
//! │  ├── CoreError        - General domain errors                          │
//! │  ├── ValidationError  - Input validation failures                      │
//! │  └── RecordError      - Persistence collaborator refused a sale        │
//! │                                                                         │
//! │  tiresaas-data errors (separate crate)                                 │
//! │  └── DataError        - Repository operation failures                  │
//! │                                                                         │
//! │  tiresaas-app errors (separate crate)                                  │
//! │  └── AppError         - What the screens turn into notices             │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → AppError → Notice                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (code, ID, etc.)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations or domain logic failures.
/// They are caught by the screens and translated to notices.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product cannot be found.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Draft has exceeded the maximum number of lines.
    #[error("Sale cannot have more than {max} lines")]
    TooManyLines { max: usize },

    /// Line quantity exceeds maximum allowed.
    ///
    /// ## When This Occurs
    /// - A single add asks for more than the limit
    /// - Merging into an existing line pushes it past the limit
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// True when the error came from rejected user input.
    ///
    /// Every variant except `ProductNotFound` leaves the draft untouched and
    /// is shown to the seller as a correctable mistake.
    pub fn is_validation(&self) -> bool {
        !matches!(self, CoreError::ProductNotFound(_))
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// A discount is larger than the amount it applies to.
    #[error("{field} of {discount_cents} exceeds {limit_cents}")]
    DiscountTooLarge {
        field: String,
        discount_cents: i64,
        limit_cents: i64,
    },

    /// Invalid format (e.g., malformed amount, malformed email).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// Duplicate value (e.g., duplicate product code).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

impl ValidationError {
    /// Shorthand for [`ValidationError::Required`].
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }
}

// =============================================================================
// Record Error
// =============================================================================

/// The persistence collaborator could not store a finalized sale.
///
/// Never fatal: the sale is still finalized and the draft still resets.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Failed to record sale {sale_id}: {reason}")]
pub struct RecordError {
    pub sale_id: String,
    pub reason: String,
}

impl RecordError {
    pub fn new(sale_id: impl Into<String>, reason: impl Into<String>) -> Self {
        RecordError {
            sale_id: sale_id.into(),
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
