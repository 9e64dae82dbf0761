//! Splice writing
//!
//! Renders staged additions into the document's own textual style and
//! inserts them immediately before each section's End marker or each
//! container list's closing parenthesis. Untouched bytes pass through
//! unchanged, so an addition-free render reproduces the input exactly.

use std::collections::BTreeMap;

use pbx_model::{ObjectGraph, ObjectId};

use crate::error::{Error, Result};
use crate::layout::{DocumentLayout, SectionKind};
use crate::text::quote_if_needed;

/// One append-only mutation against the document text.
///
/// Additions are derived from entities already inserted into the
/// [`ObjectGraph`]; the writer renders them from the graph's state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Addition {
    /// A new record in the file references section.
    FileReference { id: ObjectId },
    /// A new record in the build files section. The phase is carried for
    /// the record's `in <phase>` annotation.
    BuildFile { id: ObjectId, phase: ObjectId },
    /// A new entry at the end of a group's children list.
    GroupChild { group: ObjectId, child: ObjectId },
    /// A new entry at the end of a phase's files list.
    PhaseMember { phase: ObjectId, member: ObjectId },
}

/// Apply additions to the original text, returning the patched document.
///
/// With no additions the input is returned byte-for-byte.
pub fn apply_additions(
    source: &str,
    graph: &ObjectGraph,
    layout: &DocumentLayout,
    additions: &[Addition],
) -> Result<String> {
    if additions.is_empty() {
        return Ok(source.to_string());
    }

    // Group rendered lines by insertion offset, keeping staged order
    // within one offset, then splice back-to-front so earlier offsets
    // stay valid.
    let mut splices: BTreeMap<usize, String> = BTreeMap::new();
    for addition in additions {
        let (offset, line) = render(graph, layout, addition)?;
        splices.entry(offset).or_default().push_str(&line);
    }

    let mut patched = source.to_string();
    for (offset, text) in splices.iter().rev() {
        patched.insert_str(*offset, text);
    }

    tracing::debug!(count = additions.len(), "spliced additions into document");

    Ok(patched)
}

fn render(
    graph: &ObjectGraph,
    layout: &DocumentLayout,
    addition: &Addition,
) -> Result<(usize, String)> {
    match addition {
        Addition::FileReference { id } => {
            let file_ref = graph
                .file_reference(id)
                .ok_or_else(|| Error::UnknownObject { id: id.clone() })?;
            let section = layout
                .section(SectionKind::FileReferences)
                .ok_or_else(|| Error::NoInsertionPoint { id: id.clone() })?;

            let name_attr = if file_ref.name_matches_basename() {
                String::new()
            } else {
                format!("name = {}; ", quote_if_needed(&file_ref.name))
            };
            let line = format!(
                "\t\t{} /* {} */ = {{isa = PBXFileReference; lastKnownFileType = {}; {}path = {}; sourceTree = \"<group>\"; }};\n",
                id,
                file_ref.name,
                quote_if_needed(file_ref.kind.as_str()),
                name_attr,
                quote_if_needed(file_ref.path.as_str()),
            );
            Ok((section.insert_at, line))
        }

        Addition::BuildFile { id, phase } => {
            let build_file = graph
                .build_file(id)
                .ok_or_else(|| Error::UnknownObject { id: id.clone() })?;
            let file_ref = graph
                .file_reference(&build_file.file_ref)
                .ok_or_else(|| Error::UnknownObject {
                    id: build_file.file_ref.clone(),
                })?;
            let phase = graph
                .phase(phase)
                .ok_or_else(|| Error::UnknownObject { id: phase.clone() })?;
            let section = layout
                .section(SectionKind::BuildFiles)
                .ok_or_else(|| Error::NoInsertionPoint { id: id.clone() })?;

            let line = format!(
                "\t\t{} /* {} in {} */ = {{isa = PBXBuildFile; fileRef = {} /* {} */; }};\n",
                id, file_ref.name, phase.name, build_file.file_ref, file_ref.name,
            );
            Ok((section.insert_at, line))
        }

        Addition::GroupChild { group, child } => {
            let offset = layout
                .list_insert(group)
                .ok_or_else(|| Error::NoInsertionPoint { id: group.clone() })?;
            let display = graph
                .file_reference(child)
                .map(|fr| fr.name.clone())
                .or_else(|| graph.group(child).and_then(|g| g.name.clone()));

            let line = match display {
                Some(name) => format!("\t\t\t\t{child} /* {name} */,\n"),
                None => format!("\t\t\t\t{child},\n"),
            };
            Ok((offset, line))
        }

        Addition::PhaseMember { phase, member } => {
            let offset = layout
                .list_insert(phase)
                .ok_or_else(|| Error::NoInsertionPoint { id: phase.clone() })?;
            let build_file = graph
                .build_file(member)
                .ok_or_else(|| Error::UnknownObject { id: member.clone() })?;
            let file_ref = graph
                .file_reference(&build_file.file_ref)
                .ok_or_else(|| Error::UnknownObject {
                    id: build_file.file_ref.clone(),
                })?;
            let phase_name = graph
                .phase(phase)
                .map(|p| p.name.clone())
                .ok_or_else(|| Error::UnknownObject { id: phase.clone() })?;

            let line = format!(
                "\t\t\t\t{} /* {} in {} */,\n",
                member, file_ref.name, phase_name,
            );
            Ok((offset, line))
        }
    }
}
