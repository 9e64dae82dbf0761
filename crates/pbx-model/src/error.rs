//! Error types for pbx-model

/// Result type for pbx-model operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in pbx-model operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid object identifier: {token:?}")]
    InvalidIdentifier { token: String },
}
