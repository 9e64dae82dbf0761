//! Error types for pbx-core

/// Result type for pbx-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in pbx-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Post-mutation validation found an unresolved or duplicate
    /// identifier. Fatal for the whole batch; nothing is written.
    #[error("Integrity validation failed: {issue}")]
    DanglingReference { issue: crate::validate::Issue },

    // Transparent wrappers for underlying crate errors
    /// Parse error from pbx-parse
    #[error(transparent)]
    Parse(#[from] pbx_parse::Error),

    /// Storage error from pbx-fs
    #[error(transparent)]
    Fs(#[from] pbx_fs::Error),

    /// Model error from pbx-model
    #[error(transparent)]
    Model(#[from] pbx_model::Error),

    /// JSON serialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
