//! The parsed document
//!
//! Owns the original source text, the object graph, and the positional
//! layout, plus the additions staged against it. Mirrors the snapshot
//! semantics of the pipeline: the source is never mutated in place, and
//! rendering produces a fresh patched string.

use pbx_model::{IdGenerator, ObjectGraph, ObjectId};

use crate::error::Result;
use crate::layout::DocumentLayout;
use crate::parser::parse_source;
use crate::writer::{Addition, apply_additions};

pub struct ParsedDocument {
    source: String,
    graph: ObjectGraph,
    layout: DocumentLayout,
    root_group: ObjectId,
    primary_phase: ObjectId,
    additions: Vec<Addition>,
}

impl ParsedDocument {
    /// Parse raw document text.
    ///
    /// Fails if any modeled section, the root group, or the primary
    /// build phase cannot be located; on failure nothing else happens.
    pub fn parse(source: &str) -> Result<Self> {
        let parts = parse_source(source)?;
        Ok(Self {
            source: source.to_string(),
            graph: parts.graph,
            layout: parts.layout,
            root_group: parts.root_group,
            primary_phase: parts.primary_phase,
            additions: Vec::new(),
        })
    }

    /// The original source snapshot.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn graph(&self) -> &ObjectGraph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut ObjectGraph {
        &mut self.graph
    }

    pub fn layout(&self) -> &DocumentLayout {
        &self.layout
    }

    /// The designated root of the display hierarchy.
    pub fn root_group(&self) -> &ObjectId {
        &self.root_group
    }

    /// The designated target phase for new registrations.
    pub fn primary_phase(&self) -> &ObjectId {
        &self.primary_phase
    }

    /// An identifier generator seeded with every identifier in the
    /// document, including ones outside the modeled sections.
    pub fn seed_generator(&self) -> IdGenerator {
        IdGenerator::seeded(self.graph.all_ids().cloned())
    }

    /// Stage an addition for the next render.
    pub fn stage(&mut self, addition: Addition) {
        self.additions.push(addition);
    }

    pub fn staged(&self) -> &[Addition] {
        &self.additions
    }

    pub fn is_modified(&self) -> bool {
        !self.additions.is_empty()
    }

    /// Render the document with all staged additions spliced in.
    ///
    /// With nothing staged this reproduces the source byte-for-byte.
    pub fn render(&self) -> Result<String> {
        apply_additions(&self.source, &self.graph, &self.layout, &self.additions)
    }
}
