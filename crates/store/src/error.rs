//! The module contains the errors a store call can surface.

use thiserror::Error;

/// Store-facing failures.
///
/// Remote rejections keep the service's own message unmodified; the
/// variants only classify the HTTP status they arrived with.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("forbidden")]
    Forbidden,
    #[error("not found")]
    NotFound,
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("validation: {0}")]
    Validation(String),
    #[error("server error: {0}")]
    Server(String),
    #[error("malformed row: {0}")]
    Malformed(String),
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<model::ModelError> for StoreError {
    fn from(err: model::ModelError) -> Self {
        StoreError::Malformed(err.to_string())
    }
}
