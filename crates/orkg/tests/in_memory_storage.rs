//! Integration tests for in-memory storage.
//!
//! These tests cover the store's referential integrity, subgraph fetching
//! with bundle configurations, recursive statement counts, snapshot
//! import/export and id allocation across a save and reload.

use orkg::domain::{
    BundleConfiguration, NewResource, NewStatement, NewThing, StatementFilter, StatementId,
    StatementUpdate, ThingId, classes,
};
use orkg::error::Error;
use orkg::storage::in_memory::{load_from_jsonl, new_in_memory_storage, save_to_jsonl};
use orkg::storage::{GraphStorage, StorageBackend, create_storage};
use rstest::rstest;
use tempfile::tempdir;

const LINKS: &str = "links";
const NOTES: &str = "notes";

async fn storage_with_predicates() -> Box<dyn GraphStorage> {
    let mut storage = new_in_memory_storage();
    for id in [LINKS, NOTES] {
        storage
            .create_predicate(NewThing::new(id).with_id(id))
            .await
            .unwrap();
    }
    storage
}

async fn resource(storage: &mut dyn GraphStorage, label: &str, classes: &[&str]) -> ThingId {
    storage
        .create_resource(NewResource::new(label, classes.iter().copied()))
        .await
        .unwrap()
        .id
}

async fn link(
    storage: &mut dyn GraphStorage,
    subject: &ThingId,
    predicate: &str,
    object: &ThingId,
) -> StatementId {
    storage
        .create_statement(NewStatement::new(subject.clone(), predicate, object.clone()))
        .await
        .unwrap()
        .id
}

fn ids(statements: &[orkg::domain::Statement]) -> Vec<StatementId> {
    statements.iter().map(|s| s.id.clone()).collect()
}

// ========== Referential Integrity ==========

#[tokio::test]
async fn test_generated_ids_use_kind_prefix() {
    let mut storage = storage_with_predicates().await;

    let r = resource(storage.as_mut(), "A", &[]).await;
    let literal = storage.create_literal(NewThing::new("42")).await.unwrap();

    assert_eq!(r.as_str(), "R1");
    assert_eq!(literal.id.as_str(), "L1");
    assert_eq!(literal.datatype, "xsd:string");
}

#[tokio::test]
async fn test_fixed_id_must_be_free() {
    let mut storage = storage_with_predicates().await;

    let err = storage
        .create_predicate(NewThing::new("again").with_id(LINKS))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::ThingAlreadyExists(id) if id.as_str() == LINKS));
}

#[tokio::test]
async fn test_statement_endpoints_must_exist() {
    let mut storage = storage_with_predicates().await;
    let a = resource(storage.as_mut(), "A", &[]).await;

    let missing_object = storage
        .create_statement(NewStatement::new(a.clone(), LINKS, "R99"))
        .await
        .unwrap_err();
    assert!(matches!(missing_object, Error::ThingNotFound(_)));

    // A resource is not a predicate
    let not_a_predicate = storage
        .create_statement(NewStatement::new(a.clone(), a.clone(), a.clone()))
        .await
        .unwrap_err();
    assert!(matches!(not_a_predicate, Error::PredicateNotFound(_)));

    assert!(storage.export_snapshot().await.unwrap().statements.is_empty());
}

#[rstest]
#[case::subject(0)]
#[case::object(1)]
#[case::predicate(2)]
#[tokio::test]
async fn test_things_in_use_can_not_be_deleted(#[case] position: usize) {
    let mut storage = storage_with_predicates().await;
    let a = resource(storage.as_mut(), "A", &[]).await;
    let b = resource(storage.as_mut(), "B", &[]).await;
    let statement = link(storage.as_mut(), &a, LINKS, &b).await;

    let target = [a, b, ThingId::new(LINKS)][position].clone();
    let err = storage.delete_thing(&target).await.unwrap_err();
    assert!(matches!(err, Error::ResourceUsedInStatement(_)));

    assert_eq!(storage.delete_statements(&[statement]).await.unwrap(), 1);
    storage.delete_thing(&target).await.unwrap();
    assert!(storage.find_thing(&target).await.unwrap().is_none());
}

#[tokio::test]
async fn test_delete_statements_ignores_unknown_ids() {
    let mut storage = storage_with_predicates().await;
    let a = resource(storage.as_mut(), "A", &[]).await;
    let b = resource(storage.as_mut(), "B", &[]).await;
    let statement = link(storage.as_mut(), &a, LINKS, &b).await;

    let removed = storage
        .delete_statements(&[statement, StatementId::new("S404")])
        .await
        .unwrap();

    assert_eq!(removed, 1);
    assert_eq!(storage.count_incoming_statements(&b).await.unwrap(), 0);
}

// ========== Statement Updates ==========

#[tokio::test]
async fn test_update_statement_moves_edge() {
    let mut storage = storage_with_predicates().await;
    let a = resource(storage.as_mut(), "A", &[]).await;
    let b = resource(storage.as_mut(), "B", &[]).await;
    let c = resource(storage.as_mut(), "C", &[]).await;
    let statement = link(storage.as_mut(), &a, LINKS, &b).await;

    let updated = storage
        .update_statement(
            &statement,
            StatementUpdate {
                predicate: Some(NOTES.into()),
                object: Some(c.clone()),
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.id, statement);
    assert_eq!(updated.predicate.as_str(), NOTES);
    assert_eq!(storage.count_incoming_statements(&b).await.unwrap(), 0);
    assert_eq!(storage.count_incoming_statements(&c).await.unwrap(), 1);
    storage.delete_thing(&LINKS.into()).await.unwrap();
}

#[tokio::test]
async fn test_failed_update_restores_statement() {
    let mut storage = storage_with_predicates().await;
    let a = resource(storage.as_mut(), "A", &[]).await;
    let b = resource(storage.as_mut(), "B", &[]).await;
    let statement = link(storage.as_mut(), &a, LINKS, &b).await;
    let before = storage.find_statement(&statement).await.unwrap();

    let err = storage
        .update_statement(
            &statement,
            StatementUpdate {
                predicate: Some(NOTES.into()),
                object: Some("R404".into()),
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, Error::ThingNotFound(_)));
    assert_eq!(storage.find_statement(&statement).await.unwrap(), before);
    assert_eq!(storage.count_incoming_statements(&b).await.unwrap(), 1);
    let by_subject = storage
        .find_statements(&StatementFilter::subject(a.clone()))
        .await
        .unwrap();
    assert_eq!(ids(&by_subject), vec![statement]);
    // The original predicate is still counted as used
    assert!(matches!(
        storage.delete_thing(&LINKS.into()).await,
        Err(Error::ResourceUsedInStatement(_))
    ));
    storage.delete_thing(&NOTES.into()).await.unwrap();
}

#[tokio::test]
async fn test_update_unknown_statement() {
    let mut storage = storage_with_predicates().await;
    let err = storage
        .update_statement(&StatementId::new("S9"), StatementUpdate::default())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::StatementNotFound(_)));
}

// ========== Subgraph Fetching ==========

/// root -> a -> b -> c, plus root -> note (a literal)
struct Chain {
    storage: Box<dyn GraphStorage>,
    root: ThingId,
    level1: StatementId,
    level2: StatementId,
    level3: StatementId,
    note: StatementId,
}

async fn chain(a_classes: &[&str]) -> Chain {
    let mut storage = storage_with_predicates().await;
    let root = resource(storage.as_mut(), "root", &[]).await;
    let a = resource(storage.as_mut(), "a", a_classes).await;
    let b = resource(storage.as_mut(), "b", &["Kept"]).await;
    let c = resource(storage.as_mut(), "c", &[]).await;
    let literal = storage.create_literal(NewThing::new("text")).await.unwrap();

    let level1 = link(storage.as_mut(), &root, LINKS, &a).await;
    let level2 = link(storage.as_mut(), &a, LINKS, &b).await;
    let level3 = link(storage.as_mut(), &b, LINKS, &c).await;
    let note = link(storage.as_mut(), &root, NOTES, &literal.id).await;

    Chain {
        storage,
        root,
        level1,
        level2,
        level3,
        note,
    }
}

#[tokio::test]
async fn test_unbounded_fetch_returns_closure() {
    let f = chain(&[]).await;
    let statements = f
        .storage
        .fetch_subgraph(&f.root, &BundleConfiguration::unbounded())
        .await
        .unwrap();

    let mut expected = vec![f.level1, f.level2, f.level3, f.note];
    expected.sort();
    assert_eq!(ids(&statements), expected);
}

#[tokio::test]
async fn test_fetch_unknown_root_is_empty() {
    let f = chain(&[]).await;
    let statements = f
        .storage
        .fetch_subgraph(&"R404".into(), &BundleConfiguration::unbounded())
        .await
        .unwrap();
    assert!(statements.is_empty());
}

#[tokio::test]
async fn test_min_level_drops_shallow_statements() {
    let f = chain(&[]).await;
    let config = BundleConfiguration {
        min_level: Some(2),
        ..BundleConfiguration::default()
    };

    let statements = f.storage.fetch_subgraph(&f.root, &config).await.unwrap();

    assert_eq!(ids(&statements), vec![f.level2, f.level3]);
}

#[tokio::test]
async fn test_max_level_stops_traversal() {
    let f = chain(&[]).await;
    let config = BundleConfiguration {
        max_level: Some(2),
        ..BundleConfiguration::default()
    };

    let statements = f.storage.fetch_subgraph(&f.root, &config).await.unwrap();

    assert!(!ids(&statements).contains(&f.level3));
    assert!(ids(&statements).contains(&f.level2));
}

#[tokio::test]
async fn test_blacklisted_object_cuts_traversal() {
    let f = chain(&["Hidden"]).await;
    let config = BundleConfiguration {
        blacklist: vec!["Hidden".into()],
        ..BundleConfiguration::default()
    };

    let statements = f.storage.fetch_subgraph(&f.root, &config).await.unwrap();

    assert_eq!(ids(&statements), vec![f.note]);
}

#[tokio::test]
async fn test_whitelist_keeps_literals_and_listed_classes() {
    let f = chain(&["Kept"]).await;
    let config = BundleConfiguration {
        whitelist: vec!["Kept".into()],
        ..BundleConfiguration::default()
    };

    let statements = f.storage.fetch_subgraph(&f.root, &config).await.unwrap();

    // c has no whitelisted class; the literal passes regardless
    let mut expected = vec![f.level1, f.level2, f.note];
    expected.sort();
    assert_eq!(ids(&statements), expected);
}

// ========== Recursive Counts ==========

#[tokio::test]
async fn test_count_statements_recursive_stops_at_content_roots() {
    let mut storage = storage_with_predicates().await;
    let paper = resource(storage.as_mut(), "Paper", &[classes::PAPER]).await;
    let contribution = resource(storage.as_mut(), "C", &[classes::CONTRIBUTION]).await;
    let problem = resource(storage.as_mut(), "Problem", &[classes::PROBLEM]).await;
    let field = resource(storage.as_mut(), "Field", &[classes::RESEARCH_FIELD]).await;
    let cited = resource(storage.as_mut(), "Cited", &[classes::PAPER]).await;
    let detail = resource(storage.as_mut(), "Detail", &[]).await;

    link(storage.as_mut(), &paper, LINKS, &contribution).await;
    link(storage.as_mut(), &paper, LINKS, &field).await;
    link(storage.as_mut(), &contribution, LINKS, &problem).await;
    link(storage.as_mut(), &contribution, LINKS, &cited).await;
    link(storage.as_mut(), &contribution, NOTES, &detail).await;
    // Below the boundaries, never counted
    link(storage.as_mut(), &problem, LINKS, &detail).await;
    link(storage.as_mut(), &cited, LINKS, &detail).await;
    link(storage.as_mut(), &field, LINKS, &detail).await;

    assert_eq!(storage.count_statements_recursive(&paper).await.unwrap(), 5);
    assert_eq!(storage.count_statements_recursive(&"R404".into()).await.unwrap(), 0);
}

#[tokio::test]
async fn test_count_statements_recursive_survives_cycles() {
    let mut storage = storage_with_predicates().await;
    let a = resource(storage.as_mut(), "A", &[]).await;
    let b = resource(storage.as_mut(), "B", &[]).await;
    link(storage.as_mut(), &a, LINKS, &b).await;
    link(storage.as_mut(), &b, LINKS, &a).await;

    assert_eq!(storage.count_statements_recursive(&a).await.unwrap(), 2);
}

// ========== Snapshots ==========

#[tokio::test]
async fn test_export_import_round_trip() {
    let f = chain(&["Kept"]).await;
    let exported = f.storage.export_snapshot().await.unwrap();

    let mut copy = new_in_memory_storage();
    resource(copy.as_mut(), "replaced", &[]).await;
    let warnings = copy.import_snapshot(exported.clone()).await.unwrap();

    assert!(warnings.is_empty());
    assert_eq!(copy.export_snapshot().await.unwrap(), exported);
    assert_eq!(copy.count_incoming_statements(&"R2".into()).await.unwrap(), 1);
}

#[tokio::test]
async fn test_import_keeps_id_counters() {
    let mut storage = storage_with_predicates().await;
    let a = resource(storage.as_mut(), "A", &[]).await;
    let b = resource(storage.as_mut(), "B", &[]).await;
    storage.delete_thing(&b).await.unwrap();
    let snapshot = storage.export_snapshot().await.unwrap();

    let mut copy = new_in_memory_storage();
    copy.import_snapshot(snapshot).await.unwrap();
    let next = resource(copy.as_mut(), "C", &[]).await;

    assert_eq!(a.as_str(), "R1");
    assert_eq!(next.as_str(), "R3");
}

#[tokio::test]
async fn test_deleted_ids_stay_retired_after_reload() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("graph.jsonl");

    let mut storage = storage_with_predicates().await;
    resource(storage.as_mut(), "First", &[]).await;
    let second = resource(storage.as_mut(), "Second", &[]).await;
    storage.delete_thing(&second).await.unwrap();
    save_to_jsonl(storage.as_ref(), &path).await.unwrap();

    let (mut reopened, warnings) = load_from_jsonl(&path).await.unwrap();
    assert!(warnings.is_empty());
    let third = resource(reopened.as_mut(), "Third", &[]).await;

    assert_eq!(second.as_str(), "R2");
    assert_eq!(third.as_str(), "R3");
}

#[tokio::test]
async fn test_jsonl_backend_reload_keeps_counters() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("graph.jsonl");
    let mut storage = create_storage(StorageBackend::Jsonl(path.clone()))
        .await
        .unwrap();
    storage
        .create_predicate(NewThing::new(LINKS).with_id(LINKS))
        .await
        .unwrap();
    let a = resource(storage.as_mut(), "A", &[]).await;
    let b = resource(storage.as_mut(), "B", &[]).await;
    let statement = link(storage.as_mut(), &a, LINKS, &b).await;
    storage.delete_statements(&[statement.clone()]).await.unwrap();
    storage.save().await.unwrap();

    storage.reload().await.unwrap();
    let next = link(storage.as_mut(), &a, LINKS, &b).await;

    assert_eq!(statement.as_str(), "S1");
    assert_eq!(next.as_str(), "S2");
}
