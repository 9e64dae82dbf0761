//! Per-request and per-batch result reporting

use serde::Serialize;

use pbx_model::ObjectId;

/// Why a request was skipped without mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The path already has a build file in the target phase.
    AlreadyRegistered,
}

/// Why a single request failed while the batch continued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum FailReason {
    UnresolvedTargetGroup { id: ObjectId },
    UnresolvedTargetPhase { id: ObjectId },
}

/// The result of one registration request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum RegistrationStatus {
    Added {
        file_ref: ObjectId,
        build_file: ObjectId,
    },
    Skipped {
        reason: SkipReason,
    },
    Failed {
        reason: FailReason,
    },
}

impl RegistrationStatus {
    pub fn is_added(&self) -> bool {
        matches!(self, Self::Added { .. })
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// One request's outcome, tagged with what was asked for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistrationOutcome {
    pub path: String,
    pub logical_name: String,
    #[serde(flatten)]
    pub status: RegistrationStatus,
}

/// Counts across a whole batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub added: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Everything a fully validated batch produces: the patched document
/// text and the per-request report.
#[derive(Debug, Clone, Serialize)]
pub struct BatchOutcome {
    /// Patched document text. Not part of the serialized report.
    #[serde(skip)]
    pub patched: String,
    pub outcomes: Vec<RegistrationOutcome>,
}

impl BatchOutcome {
    pub fn summary(&self) -> RunSummary {
        let mut summary = RunSummary::default();
        for outcome in &self.outcomes {
            match outcome.status {
                RegistrationStatus::Added { .. } => summary.added += 1,
                RegistrationStatus::Skipped { .. } => summary.skipped += 1,
                RegistrationStatus::Failed { .. } => summary.failed += 1,
            }
        }
        summary
    }

    /// Machine-readable report for harnesses that persist run results.
    pub fn report_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.outcomes)
    }
}
