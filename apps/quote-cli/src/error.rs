//! # Application Error Type
//!
//! Unified error type for CLI commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the CLI                                │
//! │                                                                         │
//! │  QuoteService::generate()                                               │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Already running? ──── AppError::QuoteInProgress ────────┐             │
//! │         │                                                 │             │
//! │         ▼                                                 │             │
//! │  Database Error? ───── DbError::NotFound / QueryFailed ──┤             │
//! │         │                                                 ▼             │
//! │         ▼                                              AppError         │
//! │  Engine Error? ─────── CoreError::Configuration ────────► .code()       │
//! │         │              CoreError::Validation               │            │
//! │         ▼                                                   ▼            │
//! │  Success                                       main: anyhow report      │
//! │                                                "generate failed         │
//! │                                                 [NOT_FOUND]"            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use stoneworks_core::CoreError;
use stoneworks_db::DbError;
use thiserror::Error;

/// Machine-readable error codes, printed with every failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Project, customer, profile or quote missing
    NotFound,

    /// Input rejected before pricing
    ValidationError,

    /// Rate table or config file is incomplete
    ConfigurationError,

    /// Another generation for the same project is running
    QuoteInProgress,

    /// Status change not allowed by the quote lifecycle
    InvalidTransition,

    /// Storage failed
    DatabaseError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::ConfigurationError => "CONFIGURATION_ERROR",
            ErrorCode::QuoteInProgress => "QUOTE_IN_PROGRESS",
            ErrorCode::InvalidTransition => "INVALID_TRANSITION",
            ErrorCode::DatabaseError => "DATABASE_ERROR",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned from CLI commands.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    #[error("Quote generation already in progress for project {project_id}")]
    QuoteInProgress { project_id: String },

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Db(DbError),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl AppError {
    /// Creates a not found error.
    pub fn not_found(entity: &str, id: &str) -> Self {
        AppError::NotFound {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }

    /// The code reported for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::NotFound { .. } => ErrorCode::NotFound,
            AppError::QuoteInProgress { .. } => ErrorCode::QuoteInProgress,
            AppError::Core(CoreError::Configuration { .. }) => ErrorCode::ConfigurationError,
            AppError::Core(CoreError::Validation(_)) => ErrorCode::ValidationError,
            AppError::Core(CoreError::InvalidQuoteTransition { .. }) => {
                ErrorCode::InvalidTransition
            }
            AppError::Db(DbError::UniqueViolation { .. })
            | AppError::Db(DbError::ForeignKeyViolation { .. }) => ErrorCode::ValidationError,
            AppError::Db(_) => ErrorCode::DatabaseError,
            AppError::Config(_) => ErrorCode::ConfigurationError,
        }
    }
}

/// Converts database errors, lifting not-found and engine errors out so
/// they report their own codes.
impl From<DbError> for AppError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => AppError::NotFound { entity, id },
            DbError::Core(e) => AppError::Core(e),
            other => {
                tracing::error!(error = %other, "Database operation failed");
                AppError::Db(other)
            }
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use stoneworks_core::{QuoteStatus, ValidationError};

    #[test]
    fn test_codes() {
        assert_eq!(AppError::not_found("Project", "p").code().as_str(), "NOT_FOUND");
        assert_eq!(
            AppError::QuoteInProgress { project_id: "p".into() }.code().as_str(),
            "QUOTE_IN_PROGRESS"
        );
        assert_eq!(
            AppError::from(CoreError::missing_rate("delivery", "regional")).code(),
            ErrorCode::ConfigurationError
        );
        let invalid = ValidationError::Required { field: "name".into() };
        assert_eq!(AppError::from(CoreError::from(invalid)).code(), ErrorCode::ValidationError);
    }

    #[test]
    fn test_db_errors_are_lifted() {
        let err = AppError::from(DbError::not_found("Quote", "q-1"));
        assert!(matches!(err, AppError::NotFound { .. }));

        let err = AppError::from(DbError::Core(CoreError::InvalidQuoteTransition {
            quote_id: "q-1".into(),
            from: QuoteStatus::Approved,
            to: QuoteStatus::Draft,
        }));
        assert_eq!(err.code(), ErrorCode::InvalidTransition);

        let err = AppError::from(DbError::QueryFailed("boom".into()));
        assert_eq!(err.code(), ErrorCode::DatabaseError);
    }

    #[test]
    fn test_code_serializes_screaming_snake() {
        assert_eq!(
            serde_json::to_string(&ErrorCode::QuoteInProgress).unwrap(),
            "\"QUOTE_IN_PROGRESS\""
        );
    }
}
