//! Registration requests

use pbx_fs::EntryPath;
use pbx_model::ObjectId;

/// One desired file registration.
///
/// Identity is the path: two requests with the same logical name but
/// different paths describe two distinct files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationRequest {
    /// Group-relative path of the source file.
    pub path: EntryPath,
    /// Display name; defaults to the path's basename.
    pub logical_name: String,
    /// Group whose children gain the file reference.
    pub target_group: ObjectId,
    /// Build phase whose members gain the build file.
    pub target_phase: ObjectId,
}

impl RegistrationRequest {
    pub fn new(
        path: impl Into<EntryPath>,
        target_group: ObjectId,
        target_phase: ObjectId,
    ) -> Self {
        let path = path.into();
        let logical_name = path.file_name().to_string();
        Self {
            path,
            logical_name,
            target_group,
            target_phase,
        }
    }

    /// Override the display name.
    pub fn with_logical_name(mut self, name: impl Into<String>) -> Self {
        self.logical_name = name.into();
        self
    }
}
