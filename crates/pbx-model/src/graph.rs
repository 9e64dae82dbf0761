//! The object graph arena
//!
//! Owns every entity parsed from or added to a manifest, keyed by
//! [`ObjectId`], with stable per-kind insertion order. All relationships
//! are resolved through lookups here.

use std::collections::{HashMap, HashSet};

use pbx_fs::EntryPath;

use crate::id::ObjectId;
use crate::objects::{BuildFile, BuildPhase, FileReference, Group};

#[derive(Debug, Clone, Default)]
pub struct ObjectGraph {
    file_refs: HashMap<ObjectId, FileReference>,
    build_files: HashMap<ObjectId, BuildFile>,
    groups: HashMap<ObjectId, Group>,
    phases: HashMap<ObjectId, BuildPhase>,

    file_ref_order: Vec<ObjectId>,
    build_file_order: Vec<ObjectId>,
    group_order: Vec<ObjectId>,
    phase_order: Vec<ObjectId>,

    /// Identifiers seen in the document outside the modeled sections.
    /// Tracked so generated identifiers can never collide with them.
    foreign_ids: HashSet<ObjectId>,
}

impl ObjectGraph {
    pub fn new() -> Self {
        Self::default()
    }

    // --- insertion ---

    pub fn add_file_reference(&mut self, file_ref: FileReference) {
        self.file_ref_order.push(file_ref.id.clone());
        self.file_refs.insert(file_ref.id.clone(), file_ref);
    }

    pub fn add_build_file(&mut self, build_file: BuildFile) {
        self.build_file_order.push(build_file.id.clone());
        self.build_files.insert(build_file.id.clone(), build_file);
    }

    pub fn add_group(&mut self, group: Group) {
        self.group_order.push(group.id.clone());
        self.groups.insert(group.id.clone(), group);
    }

    pub fn add_phase(&mut self, phase: BuildPhase) {
        self.phase_order.push(phase.id.clone());
        self.phases.insert(phase.id.clone(), phase);
    }

    pub fn add_foreign_id(&mut self, id: ObjectId) {
        self.foreign_ids.insert(id);
    }

    // --- lookups ---

    pub fn file_reference(&self, id: &ObjectId) -> Option<&FileReference> {
        self.file_refs.get(id)
    }

    pub fn build_file(&self, id: &ObjectId) -> Option<&BuildFile> {
        self.build_files.get(id)
    }

    pub fn group(&self, id: &ObjectId) -> Option<&Group> {
        self.groups.get(id)
    }

    pub fn phase(&self, id: &ObjectId) -> Option<&BuildPhase> {
        self.phases.get(id)
    }

    pub fn group_mut(&mut self, id: &ObjectId) -> Option<&mut Group> {
        self.groups.get_mut(id)
    }

    pub fn phase_mut(&mut self, id: &ObjectId) -> Option<&mut BuildPhase> {
        self.phases.get_mut(id)
    }

    /// Resolve a file reference by its path key.
    ///
    /// This is the duplicate-detection probe: identity is the normalized
    /// relative path, never the logical name.
    pub fn file_ref_by_path(&self, path: &EntryPath) -> Option<&FileReference> {
        self.file_ref_order
            .iter()
            .filter_map(|id| self.file_refs.get(id))
            .find(|fr| &fr.path == path)
    }

    /// Resolve a group by display name. First match in document order.
    pub fn group_named(&self, name: &str) -> Option<&Group> {
        self.group_order
            .iter()
            .filter_map(|id| self.groups.get(id))
            .find(|g| g.name.as_deref() == Some(name))
    }

    /// The build file wrapping `file_ref` inside `phase`, if any.
    pub fn build_file_for(&self, file_ref: &ObjectId, phase: &ObjectId) -> Option<&BuildFile> {
        let phase = self.phases.get(phase)?;
        phase
            .members
            .iter()
            .filter_map(|id| self.build_files.get(id))
            .find(|bf| &bf.file_ref == file_ref)
    }

    /// Whether the file at `path` is already compiled by `phase`.
    pub fn is_registered(&self, path: &EntryPath, phase: &ObjectId) -> bool {
        self.file_ref_by_path(path)
            .is_some_and(|fr| self.build_file_for(&fr.id, phase).is_some())
    }

    /// Whether `id` names any object in the document, modeled or not.
    pub fn contains_id(&self, id: &ObjectId) -> bool {
        self.file_refs.contains_key(id)
            || self.build_files.contains_key(id)
            || self.groups.contains_key(id)
            || self.phases.contains_key(id)
            || self.foreign_ids.contains(id)
    }

    /// Every identifier in the document, for seeding an
    /// [`IdGenerator`](crate::id::IdGenerator).
    pub fn all_ids(&self) -> impl Iterator<Item = &ObjectId> {
        self.file_refs
            .keys()
            .chain(self.build_files.keys())
            .chain(self.groups.keys())
            .chain(self.phases.keys())
            .chain(self.foreign_ids.iter())
    }

    // --- iteration in document order ---

    pub fn file_references(&self) -> impl Iterator<Item = &FileReference> {
        self.file_ref_order
            .iter()
            .filter_map(|id| self.file_refs.get(id))
    }

    pub fn build_files(&self) -> impl Iterator<Item = &BuildFile> {
        self.build_file_order
            .iter()
            .filter_map(|id| self.build_files.get(id))
    }

    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        self.group_order.iter().filter_map(|id| self.groups.get(id))
    }

    pub fn phases(&self) -> impl Iterator<Item = &BuildPhase> {
        self.phase_order.iter().filter_map(|id| self.phases.get(id))
    }

    pub fn file_reference_count(&self) -> usize {
        self.file_refs.len()
    }

    pub fn build_file_count(&self) -> usize {
        self.build_files.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::FileKind;

    fn id(n: u64) -> ObjectId {
        ObjectId::parse(&format!("{n:024X}")).unwrap()
    }

    fn file_ref(n: u64, path: &str) -> FileReference {
        let path = EntryPath::new(path);
        FileReference {
            id: id(n),
            name: path.file_name().to_string(),
            kind: FileKind::from_path(&path),
            path,
        }
    }

    #[test]
    fn path_lookup_ignores_logical_name() {
        let mut graph = ObjectGraph::new();
        let mut first = file_ref(1, "ModuleA/Widget.swift");
        first.name = "Widget".to_string();
        graph.add_file_reference(first);
        graph.add_file_reference(file_ref(2, "ModuleB/Widget.swift"));

        let a = graph.file_ref_by_path(&EntryPath::new("ModuleA/Widget.swift"));
        let b = graph.file_ref_by_path(&EntryPath::new("ModuleB/Widget.swift"));
        assert_eq!(a.map(|fr| &fr.id), Some(&id(1)));
        assert_eq!(b.map(|fr| &fr.id), Some(&id(2)));
    }

    #[test]
    fn build_file_for_scopes_lookup_to_phase() {
        let mut graph = ObjectGraph::new();
        graph.add_file_reference(file_ref(1, "App.swift"));
        graph.add_build_file(BuildFile {
            id: id(10),
            file_ref: id(1),
        });
        graph.add_phase(BuildPhase {
            id: id(20),
            name: "Sources".to_string(),
            members: vec![id(10)],
        });
        graph.add_phase(BuildPhase {
            id: id(21),
            name: "Sources".to_string(),
            members: Vec::new(),
        });

        assert!(graph.build_file_for(&id(1), &id(20)).is_some());
        assert!(graph.build_file_for(&id(1), &id(21)).is_none());
        assert!(graph.is_registered(&EntryPath::new("App.swift"), &id(20)));
        assert!(!graph.is_registered(&EntryPath::new("App.swift"), &id(21)));
    }

    #[test]
    fn contains_id_covers_foreign_identifiers() {
        let mut graph = ObjectGraph::new();
        graph.add_foreign_id(id(99));
        assert!(graph.contains_id(&id(99)));
        assert!(!graph.contains_id(&id(100)));
    }

    #[test]
    fn group_named_resolves_first_in_document_order() {
        let mut graph = ObjectGraph::new();
        graph.add_group(Group {
            id: id(1),
            name: Some("Models".to_string()),
            children: Vec::new(),
        });
        graph.add_group(Group {
            id: id(2),
            name: Some("Models".to_string()),
            children: Vec::new(),
        });
        assert_eq!(graph.group_named("Models").map(|g| &g.id), Some(&id(1)));
        assert!(graph.group_named("Views").is_none());
    }
}
