use thiserror::Error;

#[derive(Debug, Error)]
pub enum SetlistError {
    /// The karyakram itself does not exist.
    #[error("karyakram not found: {0}")]
    NotFound(String),

    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    /// A gateway call made by an edit failed. Local state is now stale.
    #[error("{operation} failed: {source}")]
    Mutation {
        operation: &'static str,
        source: musicvault_core::Error,
    },

    /// Some of the per-item updates of an edit failed.
    #[error("{operation} partially failed: {succeeded} updates succeeded, {failed} failed")]
    PartialFailure {
        operation: &'static str,
        succeeded: usize,
        failed: usize,
    },

    #[error("the setlist is empty")]
    EmptySetlist,
}

impl SetlistError {
    pub(crate) fn mutation(operation: &'static str, source: musicvault_core::Error) -> Self {
        Self::Mutation { operation, source }
    }
}

impl From<musicvault_core::Error> for SetlistError {
    fn from(err: musicvault_core::Error) -> Self {
        match err {
            musicvault_core::Error::NotFound { id, .. } => Self::NotFound(id),
            other => Self::StoreUnavailable(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, SetlistError>;
