//! Tests for ReparentCoordinator

use std::sync::Arc;

use classtree::application::services::ReparentCoordinator;
use classtree::application::{ApplicationError, TreeEvent};
use classtree::domain::{DomainError, HierarchyBuilder};
use classtree::util::testing::{record, InMemoryStore, RecordingObserver};

fn setup(
    records: Vec<classtree::ClassificationRecord>,
) -> (
    Arc<InMemoryStore>,
    Arc<RecordingObserver>,
    ReparentCoordinator,
    classtree::Forest,
) {
    let forest = HierarchyBuilder::new().build(&records);
    let store = Arc::new(InMemoryStore::new(records));
    let observer = Arc::new(RecordingObserver::default());
    let coordinator = ReparentCoordinator::new(store.clone(), observer.clone());
    (store, observer, coordinator, forest)
}

#[tokio::test]
async fn given_valid_target_when_reparenting_then_store_holds_new_linkage() {
    // Arrange
    let (store, _observer, coordinator, forest) = setup(vec![
        record("1", "A", None),
        record("2", "B", Some("1")),
        record("3", "C", None),
    ]);

    // Act
    let updated = coordinator.reparent(&forest, "2", Some("3")).await.unwrap();

    // Assert
    assert_eq!(updated.parent_id.as_deref(), Some("3"));
    let stored = store.records();
    let b = stored.iter().find(|r| r.id == "2").unwrap();
    assert_eq!(b.parent_id.as_deref(), Some("3"));
}

#[tokio::test]
async fn given_no_target_when_reparenting_then_node_moves_to_root() {
    // Arrange
    let (store, _observer, coordinator, forest) =
        setup(vec![record("1", "A", None), record("2", "B", Some("1"))]);

    // Act
    let updated = coordinator.reparent(&forest, "2", None).await.unwrap();

    // Assert
    assert_eq!(updated.parent_id, None);
    let stored = store.records();
    assert_eq!(stored.iter().find(|r| r.id == "2").unwrap().parent_id, None);
}

#[tokio::test]
async fn given_parent_left_with_one_child_when_reparenting_then_collapse_is_signaled() {
    // Arrange - A has children B and C; moving B leaves only C behind
    let (_store, observer, coordinator, forest) = setup(vec![
        record("1", "A", None),
        record("2", "B", Some("1")),
        record("3", "C", Some("1")),
        record("4", "D", None),
    ]);

    // Act
    coordinator.reparent(&forest, "2", Some("4")).await.unwrap();

    // Assert
    assert!(observer
        .events()
        .contains(&TreeEvent::BranchCollapsed("1".to_string())));
}

#[tokio::test]
async fn given_parent_keeps_two_children_when_reparenting_then_no_collapse_signal() {
    // Arrange - A keeps C and D after B leaves
    let (_store, observer, coordinator, forest) = setup(vec![
        record("1", "A", None),
        record("2", "B", Some("1")),
        record("3", "C", Some("1")),
        record("4", "D", Some("1")),
        record("5", "E", None),
    ]);

    // Act
    coordinator.reparent(&forest, "2", Some("5")).await.unwrap();

    // Assert
    assert!(!observer
        .events()
        .iter()
        .any(|e| matches!(e, TreeEvent::BranchCollapsed(_))));
}

#[tokio::test]
async fn given_descendant_target_when_reparenting_then_cycle_is_rejected() {
    // Arrange - C sits under B sits under A; dropping A onto C would loop
    let (store, observer, coordinator, forest) = setup(vec![
        record("1", "A", None),
        record("2", "B", Some("1")),
        record("3", "C", Some("2")),
    ]);
    let before = store.records();

    // Act
    let result = coordinator.reparent(&forest, "1", Some("3")).await;

    // Assert
    assert!(matches!(
        result,
        Err(ApplicationError::Domain(DomainError::WouldCreateCycle { .. }))
    ));
    assert_eq!(store.records(), before);
    assert!(observer.events().is_empty());
}

#[tokio::test]
async fn given_self_as_target_when_reparenting_then_cycle_is_rejected() {
    let (_store, _observer, coordinator, forest) =
        setup(vec![record("1", "A", None), record("2", "B", None)]);

    let result = coordinator.reparent(&forest, "1", Some("1")).await;

    assert!(matches!(
        result,
        Err(ApplicationError::Domain(DomainError::WouldCreateCycle { .. }))
    ));
}

#[tokio::test]
async fn given_unknown_target_when_reparenting_then_rejected() {
    let (_store, _observer, coordinator, forest) = setup(vec![record("1", "A", None)]);

    let result = coordinator.reparent(&forest, "1", Some("ghost")).await;

    assert!(matches!(
        result,
        Err(ApplicationError::Domain(DomainError::UnknownNode(_)))
    ));
}

#[tokio::test]
async fn given_fetch_failure_when_reparenting_then_mutation_is_abandoned() {
    // Arrange
    let (store, observer, coordinator, forest) = setup(vec![
        record("1", "A", None),
        record("2", "B", Some("1")),
        record("3", "C", None),
    ]);
    let before = store.records();
    store.set_fail_fetch_by_id(true);

    // Act
    let result = coordinator.reparent(&forest, "2", Some("3")).await;

    // Assert - no write, no collapse signal
    assert!(matches!(result, Err(ApplicationError::Store { .. })));
    assert_eq!(store.records(), before);
    assert!(observer.events().is_empty());
}

#[tokio::test]
async fn given_update_failure_when_reparenting_then_store_is_untouched() {
    // Arrange
    let (store, _observer, coordinator, forest) = setup(vec![
        record("1", "A", None),
        record("2", "B", Some("1")),
        record("3", "C", None),
    ]);
    let before = store.records();
    store.set_fail_update(true);

    // Act
    let result = coordinator.reparent(&forest, "2", Some("3")).await;

    // Assert
    assert!(matches!(result, Err(ApplicationError::Store { .. })));
    assert_eq!(store.records(), before);
}
