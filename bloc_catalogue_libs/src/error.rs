use thiserror::Error;

/// Failures produced by the catalogue core itself. Anything the persistence
/// layer can fail with lives in [`crate::store::collection::StoreError`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("{0} not found")]
    NotFound(String),
}
