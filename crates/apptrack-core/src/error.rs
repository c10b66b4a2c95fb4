use thiserror::Error;

/// All the ways an action on the dashboard can fail
///
/// None of these are fatal. The session reports them and keeps going with
/// the record store exactly as it was before the failed action.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid application: {0}")]
    ValidationError(String),

    #[error("No application with id {id} (have {len})")]
    NotFound { id: usize, len: usize },

    #[error("Authentication failed: {0}")]
    AuthError(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("API request failed: {0}")]
    ApiError(String),

    #[error("Email delivery failed: {0}")]
    DeliveryError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
