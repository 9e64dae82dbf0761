//! Normalized in-manifest path handling

/// A group-relative source path as recorded inside a manifest.
///
/// Paths are normalized to forward slashes and stripped of a leading `./`
/// on construction, so that two spellings of the same location compare
/// equal. This is the key used for duplicate detection: two entries are
/// the same file if and only if their [`EntryPath`]s are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryPath {
    /// Internal representation always uses forward slashes
    inner: String,
}

impl EntryPath {
    /// Create a new EntryPath from any path-like string.
    ///
    /// Converts backslashes to forward slashes, collapses doubled
    /// separators, and removes a leading `./` segment.
    pub fn new(path: impl AsRef<str>) -> Self {
        let mut normalized = path.as_ref().replace('\\', "/");
        while normalized.contains("//") {
            normalized = normalized.replace("//", "/");
        }
        let mut trimmed = normalized.as_str();
        while let Some(rest) = trimmed.strip_prefix("./") {
            trimmed = rest;
        }
        Self {
            inner: trimmed.trim_end_matches('/').to_string(),
        }
    }

    /// Get the normalized string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Last path component, e.g. `Widget.swift` for `Core/UI/Widget.swift`.
    pub fn file_name(&self) -> &str {
        self.inner.rsplit('/').next().unwrap_or(&self.inner)
    }

    /// File extension without the dot, if present.
    pub fn extension(&self) -> Option<&str> {
        let name = self.file_name();
        let idx = name.rfind('.')?;
        if idx == 0 {
            None
        } else {
            Some(&name[idx + 1..])
        }
    }

    /// Whether this path has no directory components.
    pub fn is_bare_name(&self) -> bool {
        !self.inner.contains('/')
    }
}

impl std::fmt::Display for EntryPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<&str> for EntryPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for EntryPath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_backslashes() {
        let path = EntryPath::new("Core\\Models\\AppModels.swift");
        assert_eq!(path.as_str(), "Core/Models/AppModels.swift");
    }

    #[test]
    fn strips_leading_dot_segment() {
        assert_eq!(
            EntryPath::new("./Core/App.swift"),
            EntryPath::new("Core/App.swift")
        );
    }

    #[test]
    fn collapses_double_separators() {
        assert_eq!(
            EntryPath::new("Core//Models/App.swift").as_str(),
            "Core/Models/App.swift"
        );
    }

    #[test]
    fn file_name_and_extension() {
        let path = EntryPath::new("Core/UI/Widget.swift");
        assert_eq!(path.file_name(), "Widget.swift");
        assert_eq!(path.extension(), Some("swift"));

        let bare = EntryPath::new("README");
        assert_eq!(bare.file_name(), "README");
        assert_eq!(bare.extension(), None);
    }

    #[test]
    fn hidden_file_has_no_extension() {
        assert_eq!(EntryPath::new("Config/.env").extension(), None);
    }
}
