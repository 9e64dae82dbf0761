//! Error types for pbx-fs

use std::path::PathBuf;

/// Result type for pbx-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in pbx-fs operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Document at {path} is not valid UTF-8")]
    NotUtf8 { path: PathBuf },

    #[error("Lock acquisition failed for {path}")]
    LockFailed { path: PathBuf },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
