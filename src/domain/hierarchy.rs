//! Hierarchy builder: flat classification records in, ordered forest out.
//!
//! Construction never fails. Malformed input (unknown parent references,
//! self-references, duplicate ids, reference cycles) degrades to root
//! placement with a warning instead of erroring, because a broken record set
//! must still render.

use std::collections::{BTreeMap, HashMap, HashSet};

use itertools::Itertools;
use tracing::{debug, warn};

use crate::domain::forest::{Forest, TreeNode};
use crate::domain::record::{key_cmp, ClassificationRecord};

/// Constructs classification forests from flat record lists.
#[derive(Debug, Default)]
pub struct HierarchyBuilder;

impl HierarchyBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Build one forest from records of a single kind.
    ///
    /// Siblings come out sorted by key (case-insensitive); the sort is
    /// applied once up front and preserved through attachment, so any
    /// permutation of the same record set yields an identical forest.
    pub fn build(&self, records: &[ClassificationRecord]) -> Forest {
        if records.is_empty() {
            return Forest::default();
        }

        let mut sorted: Vec<ClassificationRecord> = records.to_vec();
        sorted.sort_by(key_cmp);

        // Duplicate ids: last occurrence wins, order of the winner preserved.
        let mut winner: HashMap<&str, usize> = HashMap::new();
        for (i, record) in sorted.iter().enumerate() {
            winner.insert(record.id.as_str(), i);
        }
        let unique: Vec<&ClassificationRecord> = sorted
            .iter()
            .enumerate()
            .filter(|(i, r)| winner[r.id.as_str()] == *i)
            .map(|(_, r)| r)
            .collect();
        if unique.len() < sorted.len() {
            warn!(
                dropped = sorted.len() - unique.len(),
                "duplicate classification ids in input, keeping last occurrence"
            );
        }

        let known: HashSet<&str> = unique.iter().map(|r| r.id.as_str()).collect();

        // Partition into roots and a parent -> children table. A record is a
        // child only when its parent reference resolves to another known id.
        let mut roots: Vec<&ClassificationRecord> = Vec::new();
        let mut children_of: HashMap<&str, Vec<&ClassificationRecord>> = HashMap::new();
        for &record in &unique {
            match record.parent_ref() {
                None => roots.push(record),
                Some(parent) if parent == record.id => {
                    warn!(id = %record.id, "self-referencing parent, placing at root");
                    roots.push(record);
                }
                Some(parent) if !known.contains(parent) => {
                    debug!(id = %record.id, parent = %parent, "unresolved parent, placing at root");
                    roots.push(record);
                }
                Some(parent) => children_of.entry(parent).or_default().push(record),
            }
        }

        let mut visited: HashSet<&str> = HashSet::new();
        let mut forest_roots: Vec<TreeNode> = roots
            .iter()
            .map(|&root| attach(root, &children_of, &mut visited))
            .collect();

        // Records still unvisited sit on a reference cycle with no entry
        // point. Promote the first member (sorted order) to root and attach
        // its subtree; repeat until nothing is left behind.
        let mut next = 0;
        while visited.len() < unique.len() {
            while next < unique.len() && visited.contains(unique[next].id.as_str()) {
                next += 1;
            }
            let Some(&stray) = unique.get(next) else { break };
            warn!(id = %stray.id, "breaking parent reference cycle, placing at root");
            forest_roots.push(attach(stray, &children_of, &mut visited));
        }

        Forest::new(forest_roots)
    }

    /// Partition mixed-kind input and build one forest per kind.
    pub fn build_by_kind(&self, records: &[ClassificationRecord]) -> BTreeMap<String, Forest> {
        records
            .iter()
            .map(|r| (r.kind.clone(), r.clone()))
            .into_group_map()
            .into_iter()
            .map(|(kind, group)| {
                let forest = self.build(&group);
                (kind, forest)
            })
            .collect()
    }
}

fn attach<'a>(
    record: &'a ClassificationRecord,
    children_of: &HashMap<&str, Vec<&'a ClassificationRecord>>,
    visited: &mut HashSet<&'a str>,
) -> TreeNode {
    visited.insert(record.id.as_str());
    let mut node = TreeNode::new(record.clone());
    if let Some(children) = children_of.get(record.id.as_str()) {
        for &child in children {
            // Guards re-entry when a cycle member was already promoted to root
            if !visited.contains(child.id.as_str()) {
                node.children.push(attach(child, children_of, visited));
            }
        }
    }
    node
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, key: &str, parent: Option<&str>) -> ClassificationRecord {
        ClassificationRecord {
            id: id.to_string(),
            key: key.to_string(),
            parent_id: parent.map(String::from),
            category: "MANUAL".to_string(),
            kind: "TASK".to_string(),
            name: format!("Classification {key}"),
            domain: "DOMAIN_A".to_string(),
        }
    }

    #[test]
    fn given_flat_records_when_building_then_nests_children_under_parents() {
        let records = vec![
            record("1", "A", None),
            record("2", "B", Some("1")),
            record("3", "C", None),
        ];

        let forest = HierarchyBuilder::new().build(&records);

        let keys: Vec<&str> = forest.roots().iter().map(|n| n.record.key.as_str()).collect();
        assert_eq!(keys, vec!["A", "C"]);
        assert_eq!(forest.roots()[0].children[0].record.key, "B");
        assert!(forest.roots()[1].children.is_empty());
    }

    #[test]
    fn given_self_referencing_parent_when_building_then_places_at_root() {
        let records = vec![record("1", "A", Some("1"))];

        let forest = HierarchyBuilder::new().build(&records);

        assert_eq!(forest.roots().len(), 1);
        assert!(forest.roots()[0].children.is_empty());
    }

    #[test]
    fn given_mutual_cycle_when_building_then_breaks_it_without_loss() {
        let records = vec![
            record("1", "A", Some("2")),
            record("2", "B", Some("1")),
            record("3", "C", None),
        ];

        let forest = HierarchyBuilder::new().build(&records);

        assert_eq!(forest.node_count(), 3);
        // "A" is the first cycle member in sorted order, so it becomes the root
        assert!(forest.is_descendant("1", "2"));
    }

    #[test]
    fn given_mixed_kinds_when_partitioning_then_each_kind_gets_own_forest() {
        let mut doc = record("d1", "D", None);
        doc.kind = "DOCUMENT".to_string();
        let records = vec![record("t1", "T", None), doc];

        let forests = HierarchyBuilder::new().build_by_kind(&records);

        assert_eq!(forests.len(), 2);
        assert_eq!(forests["TASK"].node_count(), 1);
        assert_eq!(forests["DOCUMENT"].node_count(), 1);
    }
}
