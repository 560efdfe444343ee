use super::arena::ProjectTree;

/// Compute aggregated values for all inner nodes (bottom-up).
/// After this, each inner node's `value` equals the sum of its leaves' weights.
pub fn aggregate_values(tree: &mut ProjectTree) {
    // Children always have higher indices than their parents in the arena,
    // so a reverse sweep visits children first.
    let len = tree.nodes.len();
    for i in (0..len).rev() {
        let Some(first) = tree.nodes[i].first_child else {
            continue;
        };

        let mut total = 0.0;
        let mut child = Some(first);
        while let Some(child_id) = child {
            total += tree.nodes[child_id.index()].value;
            child = tree.nodes[child_id.index()].next_sibling;
        }
        tree.nodes[i].value = total;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::types::ProjectRecord;
    use crate::tree::arena::HierarchyNode;

    #[test]
    fn nested_sums() {
        let mut tree = ProjectTree::new("root");
        let root = tree.root;
        let group = tree.add_child(root, HierarchyNode::inner("group"));
        tree.add_child(group, HierarchyNode::leaf(ProjectRecord::new("a", "a", 10.0, 0.0), 0));
        tree.add_child(group, HierarchyNode::leaf(ProjectRecord::new("b", "b", 5.0, 0.0), 1));
        tree.add_child(root, HierarchyNode::leaf(ProjectRecord::new("c", "c", 1.0, 0.0), 2));

        aggregate_values(&mut tree);
        assert_eq!(tree.get(group).value, 15.0);
        assert_eq!(tree.get(root).value, 16.0);
    }

    #[test]
    fn empty_root_sums_to_zero() {
        let mut tree = ProjectTree::new("root");
        aggregate_values(&mut tree);
        assert_eq!(tree.get(tree.root).value, 0.0);
    }
}
