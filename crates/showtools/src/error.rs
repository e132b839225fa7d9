use thiserror::Error;

use crate::review::ReviewError;

/// Errors returned by site operations.
///
/// None of these are fatal to the page; callers log them and carry on.
#[derive(Debug, Error)]
pub enum SiteError {
    #[error("missing element: {0}")]
    MissingElement(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("navigation error: {0}")]
    Navigation(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error(transparent)]
    Review(#[from] ReviewError),
}
