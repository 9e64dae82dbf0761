//! End-to-end pipeline tests against documents on disk.

use std::fs;

use pbx_core::{Error, RegistrationRequest, apply_to_file};
use pbx_parse::ParsedDocument;
use pbx_test_utils::TestProject;
use pretty_assertions::assert_eq;

fn requests_for(source: &str, specs: &[(&str, &str)]) -> Vec<RegistrationRequest> {
    let doc = ParsedDocument::parse(source).unwrap();
    specs
        .iter()
        .map(|(group, path)| {
            RegistrationRequest::new(
                *path,
                doc.graph().group_named(group).expect("group exists").id.clone(),
                doc.primary_phase().clone(),
            )
        })
        .collect()
}

#[test]
fn registers_batch_against_document_on_disk() {
    let disk = TestProject::new("LyoApp")
        .with_group("Models")
        .with_group("Services")
        .on_disk();
    let source = disk.read_manifest();
    let requests = requests_for(
        &source,
        &[
            ("Models", "Core/Models/AppModels.swift"),
            ("Services", "Core/Services/AuthService.swift"),
            ("Services", "Core/Services/NetworkManager.swift"),
        ],
    );

    let outcome = apply_to_file(disk.manifest_path(), &requests).unwrap();
    assert_eq!(outcome.summary().added, 3);

    let committed = disk.read_manifest();
    assert_eq!(committed, outcome.patched);

    let reparsed = ParsedDocument::parse(&committed).unwrap();
    for (_, path) in [
        ("Models", "Core/Models/AppModels.swift"),
        ("Services", "Core/Services/AuthService.swift"),
        ("Services", "Core/Services/NetworkManager.swift"),
    ] {
        assert!(reparsed.graph().is_registered(&path.into(), reparsed.primary_phase()));
    }
}

#[test]
fn repeated_runs_leave_identical_bytes() {
    let disk = TestProject::new("LyoApp").with_group("Models").on_disk();
    let source = disk.read_manifest();
    let requests = requests_for(&source, &[("Models", "Core/Models/AppModels.swift")]);

    apply_to_file(disk.manifest_path(), &requests).unwrap();
    let after_first = disk.read_manifest();

    let second = apply_to_file(disk.manifest_path(), &requests).unwrap();
    assert_eq!(second.summary().skipped, 1);
    assert_eq!(disk.read_manifest(), after_first);
}

#[test]
fn unparseable_document_is_never_touched() {
    let disk = TestProject::new("LyoApp").with_group("Models").on_disk();
    let truncated = disk.read_manifest()[..200].to_string();
    fs::write(disk.manifest_path(), &truncated).unwrap();

    let ghost = pbx_model::ObjectId::parse("DEADBEEFDEADBEEFDEADBEEF").unwrap();
    let request = RegistrationRequest::new("Core/App.swift", ghost.clone(), ghost);
    let result = apply_to_file(disk.manifest_path(), &[request]);

    assert!(matches!(result, Err(Error::Parse(_))));
    assert_eq!(disk.read_manifest(), truncated);
}

#[test]
fn lock_sidecar_coexists_with_commit() {
    let disk = TestProject::new("LyoApp").with_group("Models").on_disk();
    let source = disk.read_manifest();
    let requests = requests_for(&source, &[("Models", "Core/Models/AppModels.swift")]);

    apply_to_file(disk.manifest_path(), &requests).unwrap();

    // The run leaves its advisory sidecar behind but unlocked; a
    // follow-up acquisition must succeed immediately.
    let lock = pbx_fs::DocumentLock::try_acquire(disk.manifest_path());
    assert!(lock.is_ok());
}
