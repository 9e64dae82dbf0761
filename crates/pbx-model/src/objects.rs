//! Manifest entity types
//!
//! Entities reference each other only by [`ObjectId`]; the
//! [`ObjectGraph`](crate::graph::ObjectGraph) arena owns every instance,
//! so the cross-reference structure is a directed reference graph rather
//! than an ownership tree.

use pbx_fs::EntryPath;

use crate::id::ObjectId;
use crate::kind::FileKind;

/// A source file known to the manifest.
///
/// At most one file reference exists per distinct relative path; the path,
/// not the logical name, is the identity key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReference {
    pub id: ObjectId,
    /// Display name, usually the path's basename.
    pub name: String,
    /// Group-relative path, normalized.
    pub path: EntryPath,
    pub kind: FileKind,
}

impl FileReference {
    /// Whether the logical name is redundant with the path basename.
    ///
    /// Redundant names are omitted when the reference is serialized,
    /// matching how the manifest's own tooling writes records.
    pub fn name_matches_basename(&self) -> bool {
        self.name == self.path.file_name()
    }
}

/// A record that a file reference participates in compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildFile {
    pub id: ObjectId,
    /// The wrapped file reference.
    pub file_ref: ObjectId,
}

/// A named, ordered container in the display hierarchy.
///
/// Children resolve to file references or other groups; the child graph
/// must stay acyclic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub id: ObjectId,
    /// Display name. The root group of a document typically has none.
    pub name: Option<String>,
    pub children: Vec<ObjectId>,
}

impl Group {
    pub fn has_child(&self, id: &ObjectId) -> bool {
        self.children.contains(id)
    }
}

/// An ordered sequence of build files compiled together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildPhase {
    pub id: ObjectId,
    pub name: String,
    pub members: Vec<ObjectId>,
}

impl BuildPhase {
    pub fn has_member(&self, id: &ObjectId) -> bool {
        self.members.contains(id)
    }
}
