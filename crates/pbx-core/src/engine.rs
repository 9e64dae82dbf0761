//! The registration engine
//!
//! Applies a batch of registration requests to a parsed document,
//! staging graph inserts and text additions together so the two can
//! never diverge. Duplicate detection keys on the file's path, never on
//! its logical name: two files sharing a name in different directories
//! are distinct, and re-registering an already-present path is a no-op.

use pbx_model::{BuildFile, FileKind, FileReference, IdGenerator};
use pbx_parse::{Addition, ParsedDocument};

use crate::report::{FailReason, RegistrationOutcome, RegistrationStatus, SkipReason};
use crate::request::RegistrationRequest;

pub struct RegistrationEngine<'d> {
    doc: &'d mut ParsedDocument,
    generator: IdGenerator,
}

impl<'d> RegistrationEngine<'d> {
    /// An engine whose identifier generator is seeded with every
    /// identifier in the document.
    pub fn new(doc: &'d mut ParsedDocument) -> Self {
        let generator = doc.seed_generator();
        Self { doc, generator }
    }

    /// Apply requests in caller order. Each request is atomic: its
    /// writes all land or none do. A failed request never stops the
    /// batch.
    pub fn register_batch(&mut self, requests: &[RegistrationRequest]) -> Vec<RegistrationOutcome> {
        requests.iter().map(|r| self.register(r)).collect()
    }

    /// Apply one request.
    pub fn register(&mut self, request: &RegistrationRequest) -> RegistrationOutcome {
        let status = self.try_register(request);
        tracing::debug!(path = %request.path, ?status, "processed registration request");
        RegistrationOutcome {
            path: request.path.as_str().to_string(),
            logical_name: request.logical_name.clone(),
            status,
        }
    }

    fn try_register(&mut self, request: &RegistrationRequest) -> RegistrationStatus {
        let graph = self.doc.graph();

        // All checks precede the first write: a request that cannot
        // complete mutates nothing.
        if graph.group(&request.target_group).is_none() {
            return RegistrationStatus::Failed {
                reason: FailReason::UnresolvedTargetGroup {
                    id: request.target_group.clone(),
                },
            };
        }
        if graph.phase(&request.target_phase).is_none() {
            return RegistrationStatus::Failed {
                reason: FailReason::UnresolvedTargetPhase {
                    id: request.target_phase.clone(),
                },
            };
        }

        let existing = graph.file_ref_by_path(&request.path).map(|fr| fr.id.clone());
        if let Some(file_ref_id) = &existing
            && graph.build_file_for(file_ref_id, &request.target_phase).is_some()
        {
            return RegistrationStatus::Skipped {
                reason: SkipReason::AlreadyRegistered,
            };
        }

        let (file_ref_id, is_new_ref) = match existing {
            Some(id) => (id, false),
            None => (self.generator.next_id(), true),
        };
        let build_file_id = self.generator.next_id();

        if is_new_ref {
            self.doc.graph_mut().add_file_reference(FileReference {
                id: file_ref_id.clone(),
                name: request.logical_name.clone(),
                path: request.path.clone(),
                kind: FileKind::from_path(&request.path),
            });
            self.doc.stage(Addition::FileReference {
                id: file_ref_id.clone(),
            });
        }

        self.doc.graph_mut().add_build_file(BuildFile {
            id: build_file_id.clone(),
            file_ref: file_ref_id.clone(),
        });
        self.doc.stage(Addition::BuildFile {
            id: build_file_id.clone(),
            phase: request.target_phase.clone(),
        });

        // A reused reference may already sit in the target group;
        // appending it again would duplicate the display entry.
        let already_child = self
            .doc
            .graph()
            .group(&request.target_group)
            .is_some_and(|g| g.has_child(&file_ref_id));
        if !already_child {
            if let Some(group) = self.doc.graph_mut().group_mut(&request.target_group) {
                group.children.push(file_ref_id.clone());
            }
            self.doc.stage(Addition::GroupChild {
                group: request.target_group.clone(),
                child: file_ref_id.clone(),
            });
        }

        if let Some(phase) = self.doc.graph_mut().phase_mut(&request.target_phase) {
            phase.members.push(build_file_id.clone());
        }
        self.doc.stage(Addition::PhaseMember {
            phase: request.target_phase.clone(),
            member: build_file_id.clone(),
        });

        tracing::info!(
            path = %request.path,
            file_ref = %file_ref_id,
            build_file = %build_file_id,
            reused_ref = !is_new_ref,
            "registered file"
        );

        RegistrationStatus::Added {
            file_ref: file_ref_id,
            build_file: build_file_id,
        }
    }
}
