use std::error::Error;
use thiserror::Error;

/// Result alias used by every [`super::hunt_store::HuntStore`] method.
pub type StorageResult<T> = Result<T, StorageError>;

/// Backend-agnostic storage failure handed up to the service layer.
///
/// Services never see driver error types; whatever went wrong below is
/// folded into this one retryable shape.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend could not serve the request.
    #[error("storage backend unavailable: {message}")]
    Unavailable {
        /// Displayable summary of what failed.
        message: String,
        /// The underlying backend error.
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
}

impl StorageError {
    /// Wrap a backend failure together with a displayable summary.
    pub fn unavailable(message: String, source: impl Error + Send + Sync + 'static) -> Self {
        StorageError::Unavailable {
            message,
            source: Box::new(source),
        }
    }
}
