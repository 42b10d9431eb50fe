//! The module contains the errors the finance container can surface.

use store::StoreError;
use thiserror::Error;

/// Finance container errors.
///
/// Every store-facing operation returns one of these; nothing panics and
/// nothing is fatal to the process. Load-path failures are additionally
/// kept as container state so views can check them before rendering.
#[derive(Error, Debug)]
pub enum FinanceError {
    #[error("no signed-in user")]
    Unauthenticated,
    #[error("\"{0}\" key not found")]
    KeyNotFound(String),
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}
