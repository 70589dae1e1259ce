//! # Application Error Type
//!
//! Unified error type for the service layer.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  caja-core                caja-db               here                │
//! │  ─────────                ───────               ────                │
//! │  ValidationError ──┐                                                │
//! │                    ├──► CoreError ──────────┐                       │
//! │                    │                        ├──► AppError ──► UI    │
//! │                    │    DbError ────────────┤                       │
//! │                    │    io / csv / toml ────┘                       │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The presentation layer owns user-facing wording; this type keeps the
//! machine-readable structure.

use thiserror::Error;

use caja_core::{CoreError, ValidationError};
use caja_db::DbError;

/// Unified error returned by services, reports, export, and config.
#[derive(Debug, Error)]
pub enum AppError {
    /// Business rule violation (not found, insufficient stock, invalid
    /// status, validation).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Database operation failure.
    #[error(transparent)]
    Db(#[from] DbError),

    /// Configuration file could not be read or parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Export file I/O failure.
    #[error("Export failed: {0}")]
    Io(#[from] std::io::Error),

    /// CSV serialization failure.
    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Core(CoreError::Validation(err))
    }
}

/// Result type for application operations.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// True when the error is a validation failure the user can correct.
    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::Core(CoreError::Validation(_)))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_error_message_passes_through() {
        let err: AppError = CoreError::ProductNotFound(9).into();
        assert_eq!(err.to_string(), "Product not found: 9");
    }

    #[test]
    fn test_validation_wraps_into_core() {
        let err: AppError = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        }
        .into();
        assert!(err.is_validation());
    }
}
