//! Organization group tree.

use std::sync::{Arc, PoisonError, RwLock};

use portal_ident::{Group, IdentError, NodePath};

use crate::container::{ChildRef, Hierarchical, HierarchicalContainer};

impl<'a> From<&'a Group> for ChildRef<'a, Group> {
    fn from(group: &'a Group) -> Self {
        Self::Id(group)
    }
}

/// A group in the organization tree.
pub struct GroupNode {
    group: Group,
    label: RwLock<Option<String>>,
    children: HierarchicalContainer<GroupNode>,
}

impl GroupNode {
    /// Group identifier.
    #[must_use]
    pub fn group(&self) -> &Group {
        &self.group
    }

    /// Display label, or the group name if none is set.
    #[must_use]
    pub fn label(&self) -> String {
        self.label
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .unwrap_or_else(|| self.group.name().to_string())
    }

    /// Set the display label.
    pub fn set_label(&self, label: impl Into<String>) {
        *self.label.write().unwrap_or_else(PoisonError::into_inner) = Some(label.into());
    }

    /// Sub-groups.
    #[must_use]
    pub fn groups(&self) -> &HierarchicalContainer<GroupNode> {
        &self.children
    }
}

impl Hierarchical for GroupNode {
    type Id = Group;

    fn child_id(parent: &NodePath, key: &str) -> Result<Group, IdentError> {
        Group::from_path(parent.child(key)?)
    }

    fn id_path(id: &Group) -> &NodePath {
        id.path()
    }

    fn create(id: Group) -> Self {
        Self {
            children: HierarchicalContainer::new(id.path().clone()),
            label: RwLock::new(None),
            group: id,
        }
    }

    fn id(&self) -> &Group {
        &self.group
    }

    fn children(&self) -> &HierarchicalContainer<Self> {
        &self.children
    }
}

/// Tree of all groups, rooted at `/`.
pub struct OrganizationTree {
    roots: HierarchicalContainer<GroupNode>,
}

impl Default for OrganizationTree {
    fn default() -> Self {
        Self::new()
    }
}

impl OrganizationTree {
    /// Empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self {
            roots: HierarchicalContainer::new(NodePath::root()),
        }
    }

    /// Top-level groups.
    #[must_use]
    pub fn roots(&self) -> &HierarchicalContainer<GroupNode> {
        &self.roots
    }

    /// Node for `group`, if present.
    #[must_use]
    pub fn get(&self, group: &Group) -> Option<Arc<GroupNode>> {
        self.roots.find(group.path())
    }

    /// Node for `group`, creating it and its parent groups if absent.
    ///
    /// # Errors
    ///
    /// Propagates identifier construction errors.
    pub fn create(&self, group: &Group) -> Result<Arc<GroupNode>, IdentError> {
        self.roots.create_path(group.path())
    }

    /// Remove `group` with all its sub-groups.
    pub fn remove(&self, group: &Group) -> Option<Arc<GroupNode>> {
        match group.parent() {
            Some(parent) => self.get(&parent)?.groups().remove(group),
            None => self.roots.remove(group),
        }
    }

    /// Every group in the tree, depth first.
    #[must_use]
    pub fn all(&self) -> Vec<Group> {
        fn walk(container: &HierarchicalContainer<GroupNode>, out: &mut Vec<Group>) {
            for node in container.children() {
                out.push(node.group().clone());
                walk(node.groups(), out);
            }
        }

        let mut out = Vec::new();
        walk(&self.roots, &mut out);
        out
    }
}
