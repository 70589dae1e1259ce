//! # Error Types
//!
//! Domain-specific error types for caja-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                          Error Types                                │
//! │                                                                     │
//! │  caja-core errors (this file)                                       │
//! │  ├── CoreError        - Business rule violations                    │
//! │  └── ValidationError  - Input validation failures                   │
//! │                                                                     │
//! │  caja-db errors (separate crate)                                    │
//! │  └── DbError          - Database operation failures                 │
//! │                                                                     │
//! │  caja-app errors                                                    │
//! │  └── AppError         - Unified error surfaced to callers           │
//! │                                                                     │
//! │  Flow: ValidationError → CoreError → AppError → caller              │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Errors are enum variants, never strings, and carry enough context
//! (ids, quantities) to produce a user-facing message upstream.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product id does not resolve.
    #[error("Product not found: {0}")]
    ProductNotFound(i64),

    /// Sale id does not resolve.
    #[error("Sale not found: {0}")]
    SaleNotFound(i64),

    /// Invoice id does not resolve.
    #[error("Invoice not found: {0}")]
    InvoiceNotFound(i64),

    /// Invoice line id does not resolve.
    #[error("Invoice line not found: {0}")]
    InvoiceLineNotFound(i64),

    /// Requested quantity exceeds available stock.
    ///
    /// Checked before any mutation; when raised, stock is untouched.
    #[error("Insufficient stock for product {product_id}: available {available}, requested {requested}")]
    InsufficientStock {
        product_id: i64,
        available: i64,
        requested: i64,
    },

    /// Status label is not one of the four recognized statuses.
    #[error("Invalid invoice status: '{0}'")]
    InvalidStatus(String),

    /// Cart has exceeded maximum allowed lines.
    #[error("Cart cannot have more than {max} lines")]
    CartTooLarge { max: usize },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Detected before business logic runs; raising one guarantees no state
/// was mutated.
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

    /// The record is still referenced by another record and cannot be
    /// deleted.
    #[error("{entity} {id} is still referenced by {referenced_by}")]
    StillReferenced {
        entity: &'static str,
        id: i64,
        referenced_by: String,
    },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
