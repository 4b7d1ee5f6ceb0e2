//! Error type shared by the resolver, method and account layers.

use sea_orm::DbErr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TaskError {
    #[error("Not authenticated")]
    Unauthenticated,

    #[error("{entity} with ID {id} not found")]
    NotFound { entity: &'static str, id: String },

    #[error("Unauthorized access to {0}")]
    Forbidden(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),
}

impl TaskError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        TaskError::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Stable machine-readable code, used for GraphQL `extensions.code` and
    /// HTTP error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            TaskError::Unauthenticated | TaskError::InvalidCredentials => "UNAUTHENTICATED",
            TaskError::NotFound { .. } => "NOT_FOUND",
            TaskError::Forbidden(_) => "FORBIDDEN",
            TaskError::Validation(_) => "BAD_USER_INPUT",
            TaskError::Database(_) | TaskError::Query(_) | TaskError::PasswordHash(_) => {
                "INTERNAL_SERVER_ERROR"
            }
        }
    }
}

pub type Result<T, E = TaskError> = std::result::Result<T, E>;
