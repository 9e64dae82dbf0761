//! Post-mutation integrity validation
//!
//! Walks the whole graph after a batch is applied and before anything
//! is serialized. Any violation is fatal for the batch: the caller
//! discards the mutated graph and the on-disk document stays untouched.

use std::collections::{HashMap, HashSet};

use pbx_model::{ObjectGraph, ObjectId};

use crate::error::{Error, Result};

/// One integrity violation, naming the offending entities.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Issue {
    #[error("build file {build_file} references missing file reference {file_ref}")]
    BuildFileDangles {
        build_file: ObjectId,
        file_ref: ObjectId,
    },

    #[error("group {group} child {child} does not resolve to a file reference or group")]
    GroupChildDangles { group: ObjectId, child: ObjectId },

    #[error("group {group} lists child {child} more than once")]
    DuplicateGroupChild { group: ObjectId, child: ObjectId },

    #[error("group hierarchy contains a cycle through {group}")]
    GroupCycle { group: ObjectId },

    #[error("phase {phase} member {member} does not resolve to a build file")]
    PhaseMemberDangles { phase: ObjectId, member: ObjectId },

    #[error("phase {phase} lists member {member} more than once")]
    DuplicatePhaseMember { phase: ObjectId, member: ObjectId },

    #[error("file references {first} and {second} share path {path}")]
    DuplicatePath {
        first: ObjectId,
        second: ObjectId,
        path: String,
    },

    #[error("build files {first} and {second} both wrap {file_ref} in phase {phase}")]
    DuplicateBuildFile {
        first: ObjectId,
        second: ObjectId,
        file_ref: ObjectId,
        phase: ObjectId,
    },
}

/// Fail on the first violation found.
pub fn validate(graph: &ObjectGraph) -> Result<()> {
    match find_issues(graph).into_iter().next() {
        None => Ok(()),
        Some(issue) => Err(Error::DanglingReference { issue }),
    }
}

/// Collect every violation in the graph.
pub fn find_issues(graph: &ObjectGraph) -> Vec<Issue> {
    let mut issues = Vec::new();

    for build_file in graph.build_files() {
        if graph.file_reference(&build_file.file_ref).is_none() {
            issues.push(Issue::BuildFileDangles {
                build_file: build_file.id.clone(),
                file_ref: build_file.file_ref.clone(),
            });
        }
    }

    for group in graph.groups() {
        let mut seen = HashSet::new();
        for child in &group.children {
            if graph.file_reference(child).is_none() && graph.group(child).is_none() {
                issues.push(Issue::GroupChildDangles {
                    group: group.id.clone(),
                    child: child.clone(),
                });
            }
            if !seen.insert(child.clone()) {
                issues.push(Issue::DuplicateGroupChild {
                    group: group.id.clone(),
                    child: child.clone(),
                });
            }
        }
    }
    issues.extend(find_cycles(graph));

    for phase in graph.phases() {
        let mut seen = HashSet::new();
        let mut wrapped: HashMap<ObjectId, ObjectId> = HashMap::new();
        for member in &phase.members {
            match graph.build_file(member) {
                None => issues.push(Issue::PhaseMemberDangles {
                    phase: phase.id.clone(),
                    member: member.clone(),
                }),
                Some(build_file) => {
                    if let Some(first) = wrapped.get(&build_file.file_ref) {
                        issues.push(Issue::DuplicateBuildFile {
                            first: first.clone(),
                            second: member.clone(),
                            file_ref: build_file.file_ref.clone(),
                            phase: phase.id.clone(),
                        });
                    } else {
                        wrapped.insert(build_file.file_ref.clone(), member.clone());
                    }
                }
            }
            if !seen.insert(member.clone()) {
                issues.push(Issue::DuplicatePhaseMember {
                    phase: phase.id.clone(),
                    member: member.clone(),
                });
            }
        }
    }

    let mut by_path: HashMap<&str, &ObjectId> = HashMap::new();
    for file_ref in graph.file_references() {
        if let Some(first) = by_path.get(file_ref.path.as_str()) {
            issues.push(Issue::DuplicatePath {
                first: (*first).clone(),
                second: file_ref.id.clone(),
                path: file_ref.path.as_str().to_string(),
            });
        } else {
            by_path.insert(file_ref.path.as_str(), &file_ref.id);
        }
    }

    issues
}

/// DFS over the group hierarchy with an in-progress stack.
fn find_cycles(graph: &ObjectGraph) -> Vec<Issue> {
    #[derive(Clone, Copy, PartialEq)]
    enum Color {
        InProgress,
        Done,
    }

    fn visit(
        graph: &ObjectGraph,
        id: &ObjectId,
        colors: &mut HashMap<ObjectId, Color>,
        issues: &mut Vec<Issue>,
    ) {
        match colors.get(id) {
            Some(Color::Done) => return,
            Some(Color::InProgress) => {
                issues.push(Issue::GroupCycle { group: id.clone() });
                return;
            }
            None => {}
        }
        colors.insert(id.clone(), Color::InProgress);
        if let Some(group) = graph.group(id) {
            for child in &group.children {
                if graph.group(child).is_some() {
                    visit(graph, child, colors, issues);
                }
            }
        }
        colors.insert(id.clone(), Color::Done);
    }

    let mut colors = HashMap::new();
    let mut issues = Vec::new();
    let roots: Vec<ObjectId> = graph.groups().map(|g| g.id.clone()).collect();
    for id in roots {
        visit(graph, &id, &mut colors, &mut issues);
    }
    issues
}
