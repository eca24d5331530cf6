use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The store is not configured or cannot be reached.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    /// A multi-step operation where an earlier step succeeded and a later one failed.
    #[error("partial failure: {completed} succeeded, but {failed}")]
    PartialFailure { completed: String, failed: String },

    #[error("validation error: {field} {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("access denied: incorrect access code")]
    AccessDenied,
}

impl Error {
    /// Shorthand for a missing required field.
    pub fn required(field: &'static str) -> Self {
        Self::Validation {
            field,
            message: "is required".to_string(),
        }
    }

    /// Returns `true` when the error indicates the entity was not found.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
