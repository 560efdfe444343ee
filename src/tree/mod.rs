pub mod aggregate;
pub mod arena;

use self::arena::{HierarchyNode, ProjectTree};
use crate::loader::types::ProjectRecord;

/// Name given to the synthetic root of a project hierarchy.
pub const ROOT_NAME: &str = "projects";

/// Wrap a flat list of records into a single-root hierarchy.
/// The root's direct children are exactly `records`, order preserved, and
/// values are aggregated so the root carries the total budget.
pub fn build_hierarchy(records: &[ProjectRecord]) -> ProjectTree {
    let mut tree = ProjectTree::new(ROOT_NAME);
    let root = tree.root;

    for (i, record) in records.iter().enumerate() {
        tree.add_child(root, HierarchyNode::leaf(record.clone(), i));
    }

    aggregate::aggregate_values(&mut tree);

    tracing::debug!(
        "Hierarchy built: {} leaves, total weight {}",
        records.len(),
        tree.get(root).value
    );

    tree
}
