//! Role-based navigation filtering

use super::tree::{NavNode, NavigationTree};
use crate::rbac::{PermissionChecker, RoleSet};

/// Visible part of `tree` for `roles`
///
/// Items survive when permitted. Containers are filtered bottom-up and
/// survive when a child survives or their own module is permitted.
/// Sibling order is kept as authored.
pub fn filter_navigation(
    tree: &NavigationTree,
    roles: &RoleSet,
    checker: &dyn PermissionChecker,
) -> NavigationTree {
    let nodes = filter_nodes(tree.nodes(), roles, checker);
    log::trace!("Filtered navigation for roles {}: {} top-level entries", roles, nodes.len());
    NavigationTree::from_valid(nodes)
}

fn filter_nodes(nodes: &[NavNode], roles: &RoleSet, checker: &dyn PermissionChecker) -> Vec<NavNode> {
    nodes.iter().filter_map(|node| filter_node(node, roles, checker)).collect()
}

fn filter_node(node: &NavNode, roles: &RoleSet, checker: &dyn PermissionChecker) -> Option<NavNode> {
    if node.is_leaf() {
        return checker.has_module_access(roles, &node.id).then(|| node.clone());
    }

    let children = filter_nodes(&node.children, roles, checker);
    if children.is_empty() && !checker.has_module_access(roles, &node.id) {
        return None;
    }

    Some(NavNode {
        id: node.id.clone(),
        title: node.title.clone(),
        path: node.path.clone(),
        icon: node.icon,
        kind: node.kind,
        children,
    })
}
