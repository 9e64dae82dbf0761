//! Integration tests for the registration engine.

use pbx_core::{
    FailReason, RegistrationEngine, RegistrationRequest, RegistrationStatus, SkipReason,
};
use pbx_model::ObjectId;
use pbx_parse::ParsedDocument;
use pretty_assertions::assert_eq;

fn models_fixture() -> ParsedDocument {
    let source = pbx_test_utils::TestProject::new("LyoApp")
        .with_group("Models")
        .manifest();
    ParsedDocument::parse(&source).unwrap()
}

fn request_into(doc: &ParsedDocument, group: &str, path: &str) -> RegistrationRequest {
    let group = doc.graph().group_named(group).expect("target group").id.clone();
    RegistrationRequest::new(path, group, doc.primary_phase().clone())
}

#[test]
fn registers_new_file_with_four_writes() {
    let mut doc = models_fixture();
    let request = request_into(&doc, "Models", "Core/Models/AppModels.swift");
    let models_id = request.target_group.clone();

    let refs_before = doc.graph().file_reference_count();
    let outcome = RegistrationEngine::new(&mut doc).register(&request);

    let RegistrationStatus::Added { file_ref, build_file } = outcome.status else {
        panic!("expected Added, got {:?}", outcome.status);
    };

    let graph = doc.graph();
    assert_eq!(graph.file_reference_count(), refs_before + 1);
    assert_eq!(
        graph.file_reference(&file_ref).unwrap().path.as_str(),
        "Core/Models/AppModels.swift"
    );
    assert_eq!(graph.build_file(&build_file).unwrap().file_ref, file_ref);
    assert_eq!(graph.group(&models_id).unwrap().children, vec![file_ref]);
    let phase = graph.phase(doc.primary_phase()).unwrap();
    assert_eq!(phase.members, vec![build_file]);
}

#[test]
fn second_identical_request_is_skipped() {
    let mut doc = models_fixture();
    let request = request_into(&doc, "Models", "Core/Models/AppModels.swift");

    let mut engine = RegistrationEngine::new(&mut doc);
    let first = engine.register(&request);
    let second = engine.register(&request);
    assert!(first.status.is_added());
    assert_eq!(
        second.status,
        RegistrationStatus::Skipped {
            reason: SkipReason::AlreadyRegistered
        }
    );

    // No extra writes from the skipped request.
    let graph = doc.graph();
    assert_eq!(graph.build_file_count(), 1);
    assert_eq!(graph.phase(doc.primary_phase()).unwrap().members.len(), 1);
}

#[test]
fn same_logical_name_different_paths_are_distinct() {
    let source = pbx_test_utils::TestProject::new("LyoApp")
        .with_group("ModuleA")
        .with_group("ModuleB")
        .manifest();
    let mut doc = ParsedDocument::parse(&source).unwrap();

    let requests = vec![
        request_into(&doc, "ModuleA", "ModuleA/Widget.swift"),
        request_into(&doc, "ModuleB", "ModuleB/Widget.swift"),
    ];

    let outcomes = RegistrationEngine::new(&mut doc).register_batch(&requests);
    let added: Vec<_> = outcomes
        .iter()
        .filter_map(|o| match &o.status {
            RegistrationStatus::Added { file_ref, .. } => Some(file_ref.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(added.len(), 2, "both registrations must land: {outcomes:?}");
    assert_ne!(added[0], added[1]);

    let graph = doc.graph();
    let module_a = graph.group_named("ModuleA").unwrap();
    let module_b = graph.group_named("ModuleB").unwrap();
    assert_eq!(module_a.children, vec![added[0].clone()]);
    assert_eq!(module_b.children, vec![added[1].clone()]);
}

#[test]
fn unresolved_target_group_fails_request_but_not_batch() {
    let mut doc = models_fixture();
    let ghost = ObjectId::parse("DEADBEEFDEADBEEFDEADBEEF").unwrap();
    let bad = RegistrationRequest::new(
        "Core/Lost.swift",
        ghost.clone(),
        doc.primary_phase().clone(),
    );
    let good = request_into(&doc, "Models", "Core/Models/AppModels.swift");

    let outcomes = RegistrationEngine::new(&mut doc).register_batch(&[bad, good]);

    assert_eq!(
        outcomes[0].status,
        RegistrationStatus::Failed {
            reason: FailReason::UnresolvedTargetGroup { id: ghost }
        }
    );
    assert!(outcomes[1].status.is_added());

    // The failed request left no trace.
    assert!(doc.graph().file_ref_by_path(&"Core/Lost.swift".into()).is_none());
}

#[test]
fn unresolved_target_phase_fails_request() {
    let mut doc = models_fixture();
    let models = doc.graph().group_named("Models").unwrap().id.clone();
    let ghost = ObjectId::parse("DEADBEEFDEADBEEFDEADBEEF").unwrap();
    let request = RegistrationRequest::new("Core/Models/AppModels.swift", models, ghost.clone());

    let outcome = RegistrationEngine::new(&mut doc).register(&request);
    assert_eq!(
        outcome.status,
        RegistrationStatus::Failed {
            reason: FailReason::UnresolvedTargetPhase { id: ghost }
        }
    );
}

#[test]
fn existing_unregistered_reference_is_reused() {
    let source = pbx_test_utils::TestProject::new("LyoApp")
        .with_group("Models")
        .with_unregistered_file("Models", "Core/Models/Draft.swift")
        .manifest();
    let mut doc = ParsedDocument::parse(&source).unwrap();

    let existing = doc
        .graph()
        .file_ref_by_path(&"Core/Models/Draft.swift".into())
        .unwrap()
        .id
        .clone();
    let refs_before = doc.graph().file_reference_count();
    let models = doc.graph().group_named("Models").unwrap().id.clone();
    let children_before = doc.graph().group(&models).unwrap().children.len();

    let request = request_into(&doc, "Models", "Core/Models/Draft.swift");
    let outcome = RegistrationEngine::new(&mut doc).register(&request);

    let RegistrationStatus::Added { file_ref, build_file } = outcome.status else {
        panic!("expected Added, got {:?}", outcome.status);
    };
    assert_eq!(file_ref, existing, "must reuse the existing reference");
    assert_eq!(doc.graph().file_reference_count(), refs_before);

    // Already a child of Models: the display entry is not duplicated.
    let children = &doc.graph().group(&models).unwrap().children;
    assert_eq!(children.len(), children_before);

    let phase = doc.graph().phase(doc.primary_phase()).unwrap();
    assert_eq!(phase.members, vec![build_file]);
}

#[test]
fn logical_name_defaults_to_basename_and_can_be_overridden() {
    let mut doc = models_fixture();
    let models = doc.graph().group_named("Models").unwrap().id.clone();

    let request = RegistrationRequest::new(
        "Core/Models/AppModels.swift",
        models,
        doc.primary_phase().clone(),
    );
    assert_eq!(request.logical_name, "AppModels.swift");

    let request = request.with_logical_name("AppModels");
    let outcome = RegistrationEngine::new(&mut doc).register(&request);
    let RegistrationStatus::Added { file_ref, .. } = outcome.status else {
        panic!("expected Added");
    };
    assert_eq!(doc.graph().file_reference(&file_ref).unwrap().name, "AppModels");
}
