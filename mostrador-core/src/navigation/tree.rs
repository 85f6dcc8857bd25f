//! Navigation tree definition and validation

use super::icon::Icon;
use crate::rbac::ModulePath;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Errors raised while loading a navigation definition
#[derive(Debug, thiserror::Error)]
pub enum NavigationError {
    #[error("duplicate navigation id '{0}'")]
    DuplicateId(String),
    #[error("navigation item '{0}' cannot have children")]
    ItemWithChildren(String),
    #[error("navigation item '{0}' has no path")]
    ItemWithoutPath(String),
    #[error("invalid navigation definition: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read navigation definition: {0}")]
    Io(#[from] std::io::Error),
}

/// Kind of navigation node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavKind {
    Root,
    Collapse,
    Item,
}

impl NavKind {
    pub fn is_container(&self) -> bool {
        matches!(self, NavKind::Root | NavKind::Collapse)
    }
}

/// Single navigation entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavNode {
    /// Module this entry exposes
    pub id: ModulePath,
    /// Translation key of the label
    pub title: String,
    /// Route path; containers usually have none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<Icon>,
    #[serde(rename = "type")]
    pub kind: NavKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NavNode>,
}

impl NavNode {
    pub fn item(id: ModulePath, title: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            path: Some(path.into()),
            icon: None,
            kind: NavKind::Item,
            children: vec![],
        }
    }

    pub fn container(id: ModulePath, title: impl Into<String>, kind: NavKind) -> Self {
        Self { id, title: title.into(), path: None, icon: None, kind, children: vec![] }
    }

    pub fn with_icon(mut self, icon: Icon) -> Self {
        self.icon = Some(icon);
        self
    }

    pub fn with_child(mut self, child: NavNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.kind == NavKind::Item
    }
}

/// Ordered, validated navigation tree
///
/// Sibling order is display order and is preserved by every operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<NavNode>", into = "Vec<NavNode>")]
pub struct NavigationTree {
    nodes: Vec<NavNode>,
}

impl NavigationTree {
    /// Validate and wrap a list of top-level nodes
    pub fn new(nodes: Vec<NavNode>) -> Result<Self, NavigationError> {
        let mut seen = HashSet::new();
        let mut stack: Vec<&NavNode> = nodes.iter().collect();
        while let Some(node) = stack.pop() {
            let id = node.id.to_string();
            if node.is_leaf() {
                if !node.children.is_empty() {
                    return Err(NavigationError::ItemWithChildren(id));
                }
                if node.path.is_none() {
                    return Err(NavigationError::ItemWithoutPath(id));
                }
            }
            if !seen.insert(id.clone()) {
                return Err(NavigationError::DuplicateId(id));
            }
            stack.extend(node.children.iter());
        }
        Ok(Self { nodes })
    }

    /// Subset of an already valid tree
    pub(crate) fn from_valid(nodes: Vec<NavNode>) -> Self {
        Self { nodes }
    }

    pub fn from_json(json: &str) -> Result<Self, NavigationError> {
        let nodes: Vec<NavNode> = serde_json::from_str(json)?;
        Self::new(nodes)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, NavigationError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&content)
    }

    /// Built-in back-office menu
    pub fn backoffice() -> Result<Self, NavigationError> {
        Self::from_json(include_str!("../../assets/navigation.json"))
    }

    pub fn to_json_pretty(&self) -> Result<String, NavigationError> {
        Ok(serde_json::to_string_pretty(&self.nodes)?)
    }

    pub fn nodes(&self) -> &[NavNode] {
        &self.nodes
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Depth-first, pre-order walk
    pub fn iter(&self) -> impl Iterator<Item = &NavNode> {
        let mut stack: Vec<&NavNode> = self.nodes.iter().rev().collect();
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }

    pub fn find(&self, id: &ModulePath) -> Option<&NavNode> {
        self.iter().find(|node| &node.id == id)
    }

    /// Module whose entry points at `path`
    pub fn module_for_path(&self, path: &str) -> Option<&ModulePath> {
        self.iter().find(|node| node.path.as_deref() == Some(path)).map(|node| &node.id)
    }

    /// Route paths of every entry, in display order
    pub fn paths(&self) -> Vec<&str> {
        self.iter().filter_map(|node| node.path.as_deref()).collect()
    }
}

impl TryFrom<Vec<NavNode>> for NavigationTree {
    type Error = NavigationError;

    fn try_from(nodes: Vec<NavNode>) -> Result<Self, Self::Error> {
        Self::new(nodes)
    }
}

impl From<NavigationTree> for Vec<NavNode> {
    fn from(tree: NavigationTree) -> Self {
        tree.nodes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module(raw: &str) -> ModulePath {
        ModulePath::parse(raw).unwrap()
    }

    #[test]
    fn test_backoffice_tree_loads() {
        let tree = NavigationTree::backoffice().unwrap();
        assert_eq!(tree.nodes().len(), 1);
        assert_eq!(tree.iter().count(), 7);

        let config = tree.find(&module("dashboards.configuraciones")).unwrap();
        assert_eq!(config.kind, NavKind::Collapse);
        assert_eq!(config.icon, Some(Icon::Settings));
        assert_eq!(config.children.len(), 2);
    }

    #[test]
    fn test_iter_is_preorder() {
        let tree = NavigationTree::backoffice().unwrap();
        let ids: Vec<String> = tree.iter().map(|n| n.id.to_string()).collect();
        assert_eq!(
            ids,
            vec![
                "dashboards",
                "dashboards.home",
                "dashboards.ventas",
                "dashboards.cajas",
                "dashboards.configuraciones",
                "dashboards.configuraciones.usuarios",
                "dashboards.configuraciones.sucursales",
            ]
        );
    }

    #[test]
    fn test_module_for_path() {
        let tree = NavigationTree::backoffice().unwrap();
        assert_eq!(tree.module_for_path("/dashboards/ventas"), Some(&module("dashboards.ventas")));
        assert_eq!(tree.module_for_path("/nope"), None);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let nodes = vec![
            NavNode::item(module("dashboards.home"), "a", "/a"),
            NavNode::item(module("dashboards.home"), "b", "/b"),
        ];
        assert!(matches!(NavigationTree::new(nodes), Err(NavigationError::DuplicateId(_))));
    }

    #[test]
    fn test_item_with_children_rejected() {
        let mut item = NavNode::item(module("dashboards.home"), "a", "/a");
        item.children.push(NavNode::item(module("dashboards.home.x"), "b", "/b"));
        assert!(matches!(NavigationTree::new(vec![item]), Err(NavigationError::ItemWithChildren(_))));
    }

    #[test]
    fn test_unknown_icon_fails_loudly() {
        let json = r#"[{"id":"dashboards.home","title":"t","path":"/h","icon":"rocket","type":"item"}]"#;
        let err = NavigationTree::from_json(json).unwrap_err();
        assert!(err.to_string().contains("rocket"));
    }

    #[test]
    fn test_deserialize_validates() {
        let json = r#"[
            {"id":"a","title":"t","path":"/a","type":"item"},
            {"id":"a","title":"t","path":"/b","type":"item"}
        ]"#;
        assert!(serde_json::from_str::<NavigationTree>(json).is_err());
    }

    #[test]
    fn test_json_round_trip_keeps_order() {
        let tree = NavigationTree::backoffice().unwrap();
        let json = tree.to_json_pretty().unwrap();
        assert_eq!(NavigationTree::from_json(&json).unwrap(), tree);
    }
}
