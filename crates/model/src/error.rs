//! Errors raised while building or parsing model values.

use thiserror::Error;

/// Model validation and parse errors.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    #[error("invalid month: {0}")]
    InvalidMonth(String),
    #[error("unknown code: {0}")]
    UnknownCode(String),
}

impl PartialEq for ModelError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidMonth(a), Self::InvalidMonth(b)) => a == b,
            (Self::UnknownCode(a), Self::UnknownCode(b)) => a == b,
            _ => false,
        }
    }
}
