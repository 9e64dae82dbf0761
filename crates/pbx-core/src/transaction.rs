//! The transactional pipeline
//!
//! Parse → Mutate(batch) → Validate → Serialize → Commit, executed once
//! per run, with a single failure exit from any stage straight to Abort.
//! The original text is the retained snapshot; the commit write is the
//! only observable external effect, so an aborted run leaves the on-disk
//! document byte-for-byte unchanged.

use std::path::Path;

use pbx_parse::ParsedDocument;

use crate::engine::RegistrationEngine;
use crate::error::Result;
use crate::report::BatchOutcome;
use crate::request::RegistrationRequest;
use crate::validate::validate;

/// Run a batch against in-memory document text.
///
/// Returns the patched text plus the per-request report, or the first
/// fatal error with no output produced.
pub fn run_batch(source: &str, requests: &[RegistrationRequest]) -> Result<BatchOutcome> {
    let mut doc = ParsedDocument::parse(source)?;

    let outcomes = RegistrationEngine::new(&mut doc).register_batch(requests);

    validate(doc.graph())?;

    let patched = doc.render()?;

    let outcome = BatchOutcome { patched, outcomes };
    tracing::info!(
        added = outcome.summary().added,
        skipped = outcome.summary().skipped,
        failed = outcome.summary().failed,
        "batch validated"
    );
    Ok(outcome)
}

/// Run a batch against a document on disk and commit the result.
///
/// This is the single-writer entry point: the read happens under a
/// scoped exclusive lock, and the commit is an atomic rename. If the
/// batch changes nothing, no write is issued at all.
pub fn apply_to_file(path: &Path, requests: &[RegistrationRequest]) -> Result<BatchOutcome> {
    let _lock = pbx_fs::DocumentLock::acquire(path)?;

    let source = pbx_fs::read_document(path)?;
    let outcome = run_batch(&source, requests)?;

    if outcome.patched != source {
        pbx_fs::write_atomic(path, outcome.patched.as_bytes())?;
    } else {
        tracing::debug!(path = %path.display(), "document unchanged, skipping commit");
    }

    Ok(outcome)
}
