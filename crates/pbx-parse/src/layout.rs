//! Positional layout of a parsed document
//!
//! The parser records, for every section and every ordered container, the
//! exact byte offsets a later splice needs. Untouched regions are never
//! re-rendered; the layout is what makes minimal patching possible.

use std::collections::HashMap;
use std::ops::Range;

use pbx_model::ObjectId;

/// The record sections the model understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    BuildFiles,
    FileReferences,
    Groups,
    SourcesPhases,
    Project,
}

impl SectionKind {
    /// The isa name used in the document's section markers.
    pub fn isa_name(self) -> &'static str {
        match self {
            Self::BuildFiles => "PBXBuildFile",
            Self::FileReferences => "PBXFileReference",
            Self::Groups => "PBXGroup",
            Self::SourcesPhases => "PBXSourcesBuildPhase",
            Self::Project => "PBXProject",
        }
    }

}

/// Byte positions of one section's contents.
#[derive(Debug, Clone)]
pub struct SectionSpan {
    pub kind: SectionKind,
    /// Span of the section body, between the Begin and End marker lines.
    pub body: Range<usize>,
    /// Offset where a new record line is spliced in: the start of the
    /// line carrying the End marker.
    pub insert_at: usize,
}

/// All splice positions harvested during a parse.
#[derive(Debug, Clone, Default)]
pub struct DocumentLayout {
    sections: HashMap<SectionKind, SectionSpan>,
    /// Per ordered container (group children / phase files): offset of
    /// the line holding the list's closing parenthesis.
    list_insert_at: HashMap<ObjectId, usize>,
}

impl DocumentLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_section(&mut self, span: SectionSpan) {
        self.sections.insert(span.kind, span);
    }

    pub fn section(&self, kind: SectionKind) -> Option<&SectionSpan> {
        self.sections.get(&kind)
    }

    pub fn set_list_insert(&mut self, container: ObjectId, offset: usize) {
        self.list_insert_at.insert(container, offset);
    }

    pub fn list_insert(&self, container: &ObjectId) -> Option<usize> {
        self.list_insert_at.get(container).copied()
    }
}
