use compact_str::CompactString;

use crate::loader::types::ProjectRecord;

/// Index into the arena `Vec<HierarchyNode>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A single node of the project hierarchy, stored in a flat arena.
/// Uses sibling-list representation: each node has `first_child` and `next_sibling`.
#[derive(Debug, Clone)]
pub struct HierarchyNode {
    /// Display name (project title for leaves, synthetic name for the root)
    pub name: CompactString,
    /// Layout weight. Leaves: budget. Inner nodes: aggregated sum of children.
    pub value: f64,
    /// Source record for leaves, `None` for synthetic inner nodes
    pub data: Option<ProjectRecord>,
    /// Position of the record in the input sequence
    pub source_index: Option<usize>,
    pub parent: Option<NodeId>,
    pub first_child: Option<NodeId>,
    /// Kept so appends stay O(1) and sibling order matches insertion order
    pub last_child: Option<NodeId>,
    pub next_sibling: Option<NodeId>,
    /// Depth in the tree (root = 0)
    pub depth: u16,
}

impl HierarchyNode {
    pub fn inner(name: &str) -> Self {
        Self {
            name: CompactString::new(name),
            value: 0.0,
            data: None,
            source_index: None,
            parent: None,
            first_child: None,
            last_child: None,
            next_sibling: None,
            depth: 0,
        }
    }

    pub fn leaf(record: ProjectRecord, source_index: usize) -> Self {
        Self {
            name: CompactString::new(&record.title),
            value: record.budget,
            data: Some(record),
            source_index: Some(source_index),
            ..Self::inner("")
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.first_child.is_none()
    }
}

/// The project hierarchy stored as a flat arena of nodes.
#[derive(Debug, Clone)]
pub struct ProjectTree {
    pub nodes: Vec<HierarchyNode>,
    pub root: NodeId,
}

impl ProjectTree {
    /// Create a tree holding only its synthetic root.
    pub fn new(root_name: &str) -> Self {
        ProjectTree {
            nodes: vec![HierarchyNode::inner(root_name)],
            root: NodeId(0),
        }
    }

    /// Append a child under the given parent. Returns the new node's ID.
    pub fn add_child(&mut self, parent: NodeId, mut node: HierarchyNode) -> NodeId {
        let new_id = NodeId(self.nodes.len() as u32);
        node.parent = Some(parent);
        node.depth = self.nodes[parent.index()].depth + 1;
        node.next_sibling = None;

        match self.nodes[parent.index()].last_child {
            Some(last) => self.nodes[last.index()].next_sibling = Some(new_id),
            None => self.nodes[parent.index()].first_child = Some(new_id),
        }
        self.nodes[parent.index()].last_child = Some(new_id);

        self.nodes.push(node);
        new_id
    }

    pub fn get(&self, id: NodeId) -> &HierarchyNode {
        &self.nodes[id.index()]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree is empty (only root).
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Iterate over children of a node, in insertion order.
    pub fn children(&self, parent: NodeId) -> ChildIter<'_> {
        ChildIter {
            tree: self,
            current: self.nodes[parent.index()].first_child,
        }
    }

    /// All leaves below `node`, depth-first in sibling order.
    pub fn leaves(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            if self.get(id).is_leaf() {
                if id != self.root {
                    out.push(id);
                }
                continue;
            }
            let children: Vec<NodeId> = self.children(id).collect();
            stack.extend(children.into_iter().rev());
        }
        out
    }
}

/// Iterator over the children of a node.
pub struct ChildIter<'a> {
    tree: &'a ProjectTree,
    current: Option<NodeId>,
}

impl<'a> Iterator for ChildIter<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.current?;
        self.current = self.tree.nodes[id.index()].next_sibling;
        Some(id)
    }
}
