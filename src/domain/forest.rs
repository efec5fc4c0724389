//! Forest structure: derived, disposable tree nodes over classification records.

use crate::domain::record::ClassificationRecord;

/// A node in the classification tree.
///
/// `children` is always present (possibly empty) so callers can iterate
/// without null checks. `expanded` is presentation state; nodes start
/// collapsed and structural rebuilds reset it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub record: ClassificationRecord,
    pub children: Vec<TreeNode>,
    pub expanded: bool,
}

impl TreeNode {
    pub fn new(record: ClassificationRecord) -> Self {
        Self {
            record,
            children: Vec::new(),
            expanded: false,
        }
    }

    pub fn id(&self) -> &str {
        &self.record.id
    }

    /// Depth of the subtree rooted here (a leaf has depth 1).
    pub fn depth(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(TreeNode::depth)
            .max()
            .unwrap_or(0)
    }
}

/// Ordered collection of root nodes for one classification kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Forest {
    roots: Vec<TreeNode>,
}

impl Forest {
    pub fn new(roots: Vec<TreeNode>) -> Self {
        Self { roots }
    }

    pub fn roots(&self) -> &[TreeNode] {
        &self.roots
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Total number of nodes across all trees.
    pub fn node_count(&self) -> usize {
        self.iter().count()
    }

    /// Preorder iterator over every node in the forest.
    pub fn iter(&self) -> ForestIter<'_> {
        ForestIter::new(self)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    pub fn find(&self, id: &str) -> Option<&TreeNode> {
        self.iter().find(|node| node.id() == id)
    }

    /// The node whose children list contains `id`, if any.
    pub fn parent_of(&self, id: &str) -> Option<&TreeNode> {
        self.iter()
            .find(|node| node.children.iter().any(|c| c.id() == id))
    }

    /// True when `id` lies strictly inside the subtree rooted at `ancestor_id`.
    pub fn is_descendant(&self, ancestor_id: &str, id: &str) -> bool {
        let Some(ancestor) = self.find(ancestor_id) else {
            return false;
        };
        let mut stack: Vec<&TreeNode> = ancestor.children.iter().collect();
        while let Some(node) = stack.pop() {
            if node.id() == id {
                return true;
            }
            stack.extend(node.children.iter());
        }
        false
    }

    /// Set the expansion flag on a single node. Returns false when the id is
    /// not present in the forest.
    pub fn set_expanded(&mut self, id: &str, expanded: bool) -> bool {
        let mut stack: Vec<&mut TreeNode> = self.roots.iter_mut().collect();
        while let Some(node) = stack.pop() {
            if node.id() == id {
                node.expanded = expanded;
                return true;
            }
            stack.extend(node.children.iter_mut());
        }
        false
    }

    /// Collapse every node back to the default presentation state.
    pub fn collapse_all(&mut self) {
        let mut stack: Vec<&mut TreeNode> = self.roots.iter_mut().collect();
        while let Some(node) = stack.pop() {
            node.expanded = false;
            stack.extend(node.children.iter_mut());
        }
    }
}

/// Preorder traversal with an explicit stack, so reads never assume a
/// recursion depth limit.
pub struct ForestIter<'a> {
    stack: Vec<&'a TreeNode>,
}

impl<'a> ForestIter<'a> {
    fn new(forest: &'a Forest) -> Self {
        // Roots pushed in reverse for left-to-right traversal
        Self {
            stack: forest.roots.iter().rev().collect(),
        }
    }
}

impl<'a> Iterator for ForestIter<'a> {
    type Item = &'a TreeNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        for child in node.children.iter().rev() {
            self.stack.push(child);
        }
        Some(node)
    }
}
