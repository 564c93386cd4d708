use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Location permission denied: {0}")]
    PermissionDenied(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Places API error: {0}")]
    Api(String),

    #[error("Malformed polyline: {0}")]
    Decode(String),

    #[error("No route found between origin and destination")]
    NoRouteFound,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Whether retrying the same request could plausibly succeed.
    /// Transport failures and upstream errors are transient; everything
    /// else needs a different request or different configuration.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::Network(_) | AppError::Api(_))
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
