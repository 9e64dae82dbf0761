//! Declared content kinds for file references

use pbx_fs::EntryPath;
use serde::Serialize;

/// The content kind a manifest declares for a file reference.
///
/// Known kinds map to the manifest's native type strings; anything else is
/// carried through verbatim so re-serialization never loses information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub enum FileKind {
    Swift,
    ObjC,
    CHeader,
    CSource,
    AssetCatalog,
    Plist,
    Json,
    Markdown,
    Storyboard,
    Xib,
    Text,
    Other(String),
}

impl FileKind {
    /// Infer the kind from a path's extension. Unknown extensions fall
    /// back to plain text.
    pub fn from_path(path: &EntryPath) -> Self {
        match path.extension() {
            Some("swift") => Self::Swift,
            Some("m") => Self::ObjC,
            Some("h") => Self::CHeader,
            Some("c") => Self::CSource,
            Some("xcassets") => Self::AssetCatalog,
            Some("plist") => Self::Plist,
            Some("json") => Self::Json,
            Some("md") => Self::Markdown,
            Some("storyboard") => Self::Storyboard,
            Some("xib") => Self::Xib,
            _ => Self::Text,
        }
    }

    /// Wrap a declared type string, mapping known values to their variant.
    pub fn from_declared(declared: &str) -> Self {
        match declared {
            "sourcecode.swift" => Self::Swift,
            "sourcecode.c.objc" => Self::ObjC,
            "sourcecode.c.h" => Self::CHeader,
            "sourcecode.c.c" => Self::CSource,
            "folder.assetcatalog" => Self::AssetCatalog,
            "text.plist.xml" => Self::Plist,
            "text.json" => Self::Json,
            "net.daringfireball.markdown" => Self::Markdown,
            "file.storyboard" => Self::Storyboard,
            "file.xib" => Self::Xib,
            "text" => Self::Text,
            other => Self::Other(other.to_string()),
        }
    }

    /// The manifest's native type string for this kind.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Swift => "sourcecode.swift",
            Self::ObjC => "sourcecode.c.objc",
            Self::CHeader => "sourcecode.c.h",
            Self::CSource => "sourcecode.c.c",
            Self::AssetCatalog => "folder.assetcatalog",
            Self::Plist => "text.plist.xml",
            Self::Json => "text.json",
            Self::Markdown => "net.daringfireball.markdown",
            Self::Storyboard => "file.storyboard",
            Self::Xib => "file.xib",
            Self::Text => "text",
            Self::Other(raw) => raw,
        }
    }
}

impl From<FileKind> for String {
    fn from(kind: FileKind) -> Self {
        kind.as_str().to_string()
    }
}

impl std::fmt::Display for FileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
