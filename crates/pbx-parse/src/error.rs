//! Error types for pbx-parse

/// Result type for pbx-parse operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while parsing or patching a manifest
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Required section {name} not found in document")]
    MissingSection { name: &'static str },

    #[error("Root group could not be located")]
    RootGroupNotFound,

    #[error("No build phase eligible as the primary registration target")]
    PrimaryPhaseNotFound,

    #[error("Malformed record at byte {offset}: {detail}")]
    Malformed { offset: usize, detail: String },

    #[error("Object {id} has no insertion point in the document layout")]
    NoInsertionPoint { id: pbx_model::ObjectId },

    #[error("Addition references unknown object {id}")]
    UnknownObject { id: pbx_model::ObjectId },

    #[error(transparent)]
    Model(#[from] pbx_model::Error),
}

impl Error {
    pub(crate) fn malformed(offset: usize, detail: impl Into<String>) -> Self {
        Self::Malformed {
            offset,
            detail: detail.into(),
        }
    }
}
