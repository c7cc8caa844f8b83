//! # Error Types
//!
//! Domain-specific error types for stoneworks-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  stoneworks-core errors (this file)                                    │
//! │  ├── CoreError        - Rate-table misses, bad transitions             │
//! │  └── ValidationError  - Input rejected before pricing                  │
//! │                                                                         │
//! │  stoneworks-db errors (separate crate)                                 │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  CLI errors (in app)                                                   │
//! │  └── AppError         - What the operator sees (code + message)        │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → AppError                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Any error aborts quote generation as a whole. The engine never returns a
//! partial quote and never prices a missing rate as zero.

use thiserror::Error;

use crate::types::QuoteStatus;

// =============================================================================
// Core Error
// =============================================================================

/// Errors raised by the pricing engine.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A rate-table lookup missed.
    ///
    /// ## When This Occurs
    /// The keys are closed enums, so this only happens when a rate table was
    /// loaded from configuration with an entry left out. It is a
    /// configuration/schema mismatch, not a user error.
    #[error("No {category} rate configured for '{key}'")]
    Configuration { category: String, key: String },

    /// A quote status change that the state machine does not allow.
    #[error("Quote {quote_id} cannot move from {from:?} to {to:?}")]
    InvalidQuoteTransition {
        quote_id: String,
        from: QuoteStatus,
        to: QuoteStatus,
    },

    /// Input validation failed (wraps ValidationError).
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Creates a Configuration error for a rate category and key.
    pub fn missing_rate(category: impl Into<String>, key: impl Into<String>) -> Self {
        CoreError::Configuration {
            category: category.into(),
            key: key.into(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before any pricing runs, so a rejected request has no side effects.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be strictly positive.
    #[error("{field} must be positive (got {value})")]
    MustBePositive { field: String, value: String },

    /// Value must be zero or greater.
    #[error("{field} must not be negative (got {value})")]
    MustNotBeNegative { field: String, value: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: String,
        min: String,
        max: String,
    },

    /// Invalid format (e.g., unknown enum name).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_error_message() {
        let err = CoreError::missing_rate("cutout", "sink");
        assert_eq!(err.to_string(), "No cutout rate configured for 'sink'");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::MustBePositive {
            field: "surfaces[0].width_mm".to_string(),
            value: "-10".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "surfaces[0].width_mm must be positive (got -10)"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let err: CoreError = ValidationError::Required {
            field: "name".to_string(),
        }
        .into();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn test_transition_error_message() {
        let err = CoreError::InvalidQuoteTransition {
            quote_id: "q-1".to_string(),
            from: QuoteStatus::Approved,
            to: QuoteStatus::Draft,
        };
        assert_eq!(
            err.to_string(),
            "Quote q-1 cannot move from Approved to Draft"
        );
    }
}
