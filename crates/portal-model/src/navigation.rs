//! Navigation trees of a site.
//!
//! Every [`Node`] is identified by its [`NodePath`] below the site's root
//! node. Nodes carry display details (label, target page, visibility) that
//! may be updated in place; the tree shape only changes through the
//! containers.

use std::sync::{Arc, PoisonError, RwLock};

use portal_ident::{IdentError, NodePath, PageId, Segment, SiteId};
use serde::{Deserialize, Serialize};

use crate::container::{Hierarchical, HierarchicalContainer};

/// When a node is shown in menus.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Shown in menus.
    #[default]
    Displayed,
    /// Reachable but not shown.
    Hidden,
    /// Managed by the portal; not editable by users.
    System,
}

/// Display details of a navigation node.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NodeDetails {
    /// Label shown in menus. Falls back to the node name when unset.
    pub label: Option<String>,
    /// Page rendered when the node is selected.
    pub page: Option<PageId>,
    /// Menu visibility.
    pub visibility: Visibility,
}

/// A navigation node.
pub struct Node {
    path: NodePath,
    details: RwLock<NodeDetails>,
    children: HierarchicalContainer<Node>,
}

impl Node {
    /// Path of the node below the navigation root.
    #[must_use]
    pub fn path(&self) -> &NodePath {
        &self.path
    }

    /// Node name (last path segment); empty for the root node.
    #[must_use]
    pub fn name(&self) -> &str {
        self.path.last_segment().map_or("", Segment::as_str)
    }

    /// Snapshot of the node details.
    #[must_use]
    pub fn details(&self) -> NodeDetails {
        self.details
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Label, or the node name if no label is set.
    #[must_use]
    pub fn display_label(&self) -> String {
        self.details().label.unwrap_or_else(|| self.name().to_owned())
    }

    /// Replace the node details.
    pub fn set_details(&self, details: NodeDetails) {
        *self.details.write().unwrap_or_else(PoisonError::into_inner) = details;
    }

    /// Update the node details in place.
    pub fn update(&self, f: impl FnOnce(&mut NodeDetails)) {
        f(&mut self.details.write().unwrap_or_else(PoisonError::into_inner));
    }

    /// Child nodes.
    #[must_use]
    pub fn nodes(&self) -> &HierarchicalContainer<Node> {
        &self.children
    }
}

impl Hierarchical for Node {
    type Id = NodePath;

    fn child_id(parent: &NodePath, key: &str) -> Result<NodePath, IdentError> {
        parent.child(key)
    }

    fn id_path(id: &NodePath) -> &NodePath {
        id
    }

    fn create(id: NodePath) -> Self {
        Self {
            children: HierarchicalContainer::new(id.clone()),
            details: RwLock::new(NodeDetails::default()),
            path: id,
        }
    }

    fn id(&self) -> &NodePath {
        &self.path
    }

    fn children(&self) -> &HierarchicalContainer<Self> {
        &self.children
    }
}

/// Serializable navigation item for UI trees.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NavItem {
    /// Display label.
    pub label: String,
    /// Node path (`/home/news`).
    pub path: String,
    /// Target page token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
    /// Child items.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NavItem>,
}

/// Navigation tree of one site.
pub struct Navigation {
    site: SiteId,
    root: Arc<Node>,
}

impl Navigation {
    /// Empty navigation for `site`.
    #[must_use]
    pub fn new(site: SiteId) -> Self {
        Self {
            site,
            root: Arc::new(Node::create(NodePath::root())),
        }
    }

    /// Owning site.
    #[must_use]
    pub fn site_id(&self) -> &SiteId {
        &self.site
    }

    /// Root node (path `/`).
    #[must_use]
    pub fn root(&self) -> &Arc<Node> {
        &self.root
    }

    /// Node at `path`; the root path yields the root node.
    #[must_use]
    pub fn node(&self, path: &NodePath) -> Option<Arc<Node>> {
        if path.is_root() {
            return Some(Arc::clone(&self.root));
        }
        self.root.nodes().find(path)
    }

    /// Node at `path`, creating it and any missing ancestors.
    ///
    /// # Errors
    ///
    /// Returns [`IdentError::InvalidArgument`] for the root path.
    pub fn create_node(&self, path: &NodePath) -> Result<Arc<Node>, IdentError> {
        self.root.nodes().create_path(path)
    }

    /// Remove the node at `path` with its subtree.
    pub fn remove_node(&self, path: &NodePath) -> Option<Arc<Node>> {
        let parent = self.node(&path.parent()?)?;
        parent.nodes().remove(path)
    }

    /// Visible navigation items, depth first. Hidden and system nodes are
    /// skipped together with their subtrees.
    #[must_use]
    pub fn items(&self) -> Vec<NavItem> {
        fn build(node: &Node) -> Vec<NavItem> {
            node.nodes()
                .children()
                .iter()
                .filter(|child| child.details().visibility == Visibility::Displayed)
                .map(|child| {
                    let details = child.details();
                    NavItem {
                        label: details.label.unwrap_or_else(|| child.name().to_owned()),
                        path: child.path().to_string(),
                        page: details.page.map(|page| page.format()),
                        children: build(child),
                    }
                })
                .collect()
        }

        build(&self.root)
    }
}
