//! Registration engine and transaction pipeline for pbx-register
//!
//! This crate coordinates the Layer 0 crates into the one operation the
//! workspace exists for: safely and idempotently registering source
//! files into a build manifest.
//!
//! # Architecture
//!
//! `pbx-core` sits above the Layer 0 crates:
//!
//! ```text
//!                 caller / invocation layer
//!                           |
//!                        pbx-core
//!                           |
//!              +------------+------------+
//!              |            |            |
//!           pbx-fs      pbx-model    pbx-parse
//! ```
//!
//! # Pipeline
//!
//! [`run_batch`] executes Parse → Mutate → Validate → Serialize on text;
//! [`apply_to_file`] wraps it in lock-read-commit against a document on
//! disk. Any stage failure aborts the run with the original document
//! untouched.
//!
//! # Example
//!
//! ```no_run
//! use pbx_core::{RegistrationRequest, apply_to_file};
//! use pbx_parse::ParsedDocument;
//!
//! fn register(manifest: &std::path::Path) -> pbx_core::Result<()> {
//!     let source = pbx_fs::read_document(manifest)?;
//!     let doc = ParsedDocument::parse(&source)?;
//!     let models = doc.graph().group_named("Models").map(|g| g.id.clone());
//!     let Some(models) = models else { return Ok(()) };
//!
//!     let request = RegistrationRequest::new(
//!         "Core/Models/AppModels.swift",
//!         models,
//!         doc.primary_phase().clone(),
//!     );
//!     let outcome = apply_to_file(manifest, &[request])?;
//!     println!("{:?}", outcome.summary());
//!     Ok(())
//! }
//! ```

pub mod engine;
pub mod error;
pub mod report;
pub mod request;
pub mod transaction;
pub mod validate;

pub use engine::RegistrationEngine;
pub use error::{Error, Result};
pub use report::{
    BatchOutcome, FailReason, RegistrationOutcome, RegistrationStatus, RunSummary, SkipReason,
};
pub use request::RegistrationRequest;
pub use transaction::{apply_to_file, run_batch};
pub use validate::{Issue, find_issues, validate};
