//! Tests for HierarchyBuilder

use classtree::domain::{HierarchyBuilder, TreeNode};
use classtree::util::testing::record;

#[test]
fn given_flat_records_when_building_then_creates_expected_forest() {
    // Arrange - B hangs under A, C stands alone
    let records = vec![
        record("1", "A", None),
        record("2", "B", Some("1")),
        record("3", "C", None),
    ];

    // Act
    let forest = HierarchyBuilder::new().build(&records);

    // Assert
    let roots: Vec<&str> = forest.roots().iter().map(|n| n.record.key.as_str()).collect();
    assert_eq!(roots, vec!["A", "C"]);
    assert_eq!(forest.roots()[0].children.len(), 1);
    assert_eq!(forest.roots()[0].children[0].record.key, "B");
    assert!(forest.roots()[1].children.is_empty());
}

#[test]
fn given_any_permutation_when_building_then_forest_is_identical() {
    // Arrange
    let base = vec![
        record("1", "A", None),
        record("2", "B", Some("1")),
        record("3", "C", None),
        record("4", "D", Some("1")),
        record("5", "E", Some("3")),
    ];
    let reference = HierarchyBuilder::new().build(&base);

    // Act / Assert - sibling order is fixed by key, not input order
    let mut rotated = base.clone();
    for _ in 0..base.len() {
        rotated.rotate_left(1);
        assert_eq!(HierarchyBuilder::new().build(&rotated), reference);
    }
    let mut reversed = base.clone();
    reversed.reverse();
    assert_eq!(HierarchyBuilder::new().build(&reversed), reference);
}

#[test]
fn given_nested_records_when_counting_then_totals_match_input() {
    // Arrange - three levels plus a stray root
    let records = vec![
        record("1", "A", None),
        record("2", "B", Some("1")),
        record("3", "C", Some("2")),
        record("4", "D", Some("2")),
        record("5", "E", None),
    ];

    // Act
    let forest = HierarchyBuilder::new().build(&records);

    // Assert
    assert_eq!(forest.node_count(), records.len());
}

#[test]
fn given_unresolved_parent_when_building_then_record_lands_at_root() {
    // Arrange
    let records = vec![
        record("1", "A", None),
        record("2", "B", Some("missing")),
    ];

    // Act
    let forest = HierarchyBuilder::new().build(&records);

    // Assert - degraded to root, never dropped
    assert_eq!(forest.roots().len(), 2);
    assert!(forest.roots().iter().any(|n| n.record.key == "B"));
}

#[test]
fn given_empty_input_when_building_then_forest_is_empty() {
    let forest = HierarchyBuilder::new().build(&[]);
    assert!(forest.is_empty());
    assert_eq!(forest.node_count(), 0);
}

#[test]
fn given_self_referencing_record_when_building_then_no_loop_and_root_placement() {
    // Arrange
    let records = vec![record("1", "A", Some("1")), record("2", "B", Some("1"))];

    // Act
    let forest = HierarchyBuilder::new().build(&records);

    // Assert - A is a root despite pointing at itself; B still hangs under it
    assert_eq!(forest.roots().len(), 1);
    assert_eq!(forest.roots()[0].record.key, "A");
    assert_eq!(forest.roots()[0].children[0].record.key, "B");
}

#[test]
fn given_reference_cycle_when_building_then_breaks_cycle_without_loss() {
    // Arrange - 1 -> 2 -> 1 with a child hanging off the cycle
    let records = vec![
        record("1", "A", Some("2")),
        record("2", "B", Some("1")),
        record("3", "C", Some("2")),
    ];

    // Act
    let forest = HierarchyBuilder::new().build(&records);

    // Assert
    assert_eq!(forest.node_count(), 3);
    assert!(forest.contains("1"));
    assert!(forest.contains("2"));
    assert!(forest.contains("3"));
}

#[test]
fn given_duplicate_ids_when_building_then_last_occurrence_wins() {
    // Arrange - same id, different names; later one must survive
    let mut early = record("1", "A", None);
    early.name = "early".to_string();
    let mut late = record("1", "A", None);
    late.name = "late".to_string();

    // Act
    let forest = HierarchyBuilder::new().build(&[early, late]);

    // Assert
    assert_eq!(forest.node_count(), 1);
    assert_eq!(forest.roots()[0].record.name, "late");
}

#[test]
fn given_mixed_case_keys_when_building_then_siblings_sort_case_insensitively() {
    // Arrange
    let records = vec![
        record("1", "banana", None),
        record("2", "Apple", None),
        record("3", "cherry", None),
    ];

    // Act
    let forest = HierarchyBuilder::new().build(&records);

    // Assert
    let keys: Vec<&str> = forest.roots().iter().map(|n| n.record.key.as_str()).collect();
    assert_eq!(keys, vec!["Apple", "banana", "cherry"]);
}

#[test]
fn given_deep_chain_when_building_then_traversal_handles_depth() {
    // Arrange - a 500-deep parent chain
    let mut records = vec![record("0", "K0", None)];
    for i in 1..500 {
        records.push(record(
            &i.to_string(),
            &format!("K{i}"),
            Some(&(i - 1).to_string()),
        ));
    }

    // Act
    let forest = HierarchyBuilder::new().build(&records);

    // Assert - stack-based iteration walks the whole chain
    assert_eq!(forest.node_count(), 500);
    assert_eq!(forest.roots().len(), 1);
    assert_eq!(forest.roots()[0].depth(), 500);
}

#[test]
fn given_mixed_kinds_when_building_by_kind_then_forests_never_mix() {
    // Arrange
    let mut doc = record("d1", "DOC", None);
    doc.kind = "DOCUMENT".to_string();
    let mut doc_child = record("d2", "SUB", Some("d1"));
    doc_child.kind = "DOCUMENT".to_string();
    let records = vec![record("t1", "T", None), doc, doc_child];

    // Act
    let forests = HierarchyBuilder::new().build_by_kind(&records);

    // Assert
    assert_eq!(forests.len(), 2);
    assert_eq!(forests["TASK"].node_count(), 1);
    assert_eq!(forests["DOCUMENT"].node_count(), 2);
    assert!(forests["DOCUMENT"].is_descendant("d1", "d2"));
}

#[test]
fn given_built_forest_when_inspecting_children_then_lists_exist_even_for_leaves() {
    // Arrange
    let records = vec![record("1", "A", None)];

    // Act
    let forest = HierarchyBuilder::new().build(&records);

    // Assert - empty, not absent: iteration is always safe
    let leaf: &TreeNode = &forest.roots()[0];
    assert!(leaf.children.is_empty());
}
