//! Keyed containers for tree-shaped entities.
//!
//! A [`HierarchicalContainer`] holds the children of one tree position
//! (a navigation node, a group). Children are addressed either by their
//! natural key (the last path segment) or by their full identifier, and
//! created at most once.
//!
//! # Thread Safety
//!
//! The check-then-insert sequence of [`HierarchicalContainer::create_and_add`]
//! runs under one `Mutex` per container, so concurrent callers creating the
//! same child all receive the same `Arc`.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use portal_ident::{IdentError, NodePath};

/// Entity stored in a [`HierarchicalContainer`].
pub trait Hierarchical: Send + Sync + Sized {
    /// Structural identifier derived from the entity's position.
    type Id: Clone + Eq + Hash + fmt::Display + Send + Sync + 'static;

    /// Identifier of the child named `key` under `parent`.
    fn child_id(parent: &NodePath, key: &str) -> Result<Self::Id, IdentError>;

    /// Tree position of an identifier.
    fn id_path(id: &Self::Id) -> &NodePath;

    /// Construct a fresh entity for `id`.
    fn create(id: Self::Id) -> Self;

    /// Identifier of this entity.
    fn id(&self) -> &Self::Id;

    /// Container holding this entity's own children.
    fn children(&self) -> &HierarchicalContainer<Self>;
}

/// Reference to a child: its natural key or its identifier.
#[derive(Debug)]
pub enum ChildRef<'a, I> {
    /// Last path segment of the child.
    Key(&'a str),
    /// Full identifier of the child.
    Id(&'a I),
}

impl<'a, I> From<&'a str> for ChildRef<'a, I> {
    fn from(key: &'a str) -> Self {
        Self::Key(key)
    }
}

impl<'a, I> From<&'a String> for ChildRef<'a, I> {
    fn from(key: &'a String) -> Self {
        Self::Key(key)
    }
}

impl<'a> From<&'a NodePath> for ChildRef<'a, NodePath> {
    fn from(id: &'a NodePath) -> Self {
        Self::Id(id)
    }
}

struct Children<E: Hierarchical> {
    order: Vec<E::Id>,
    by_id: HashMap<E::Id, Arc<E>>,
}

/// Children of one tree position, keyed by derived identifier.
pub struct HierarchicalContainer<E: Hierarchical> {
    parent: NodePath,
    children: Mutex<Children<E>>,
}

impl<E: Hierarchical> HierarchicalContainer<E> {
    /// Create an empty container for the children of `parent`.
    #[must_use]
    pub fn new(parent: NodePath) -> Self {
        Self {
            parent,
            children: Mutex::new(Children {
                order: Vec::new(),
                by_id: HashMap::new(),
            }),
        }
    }

    /// Path whose children this container holds.
    #[must_use]
    pub fn parent_path(&self) -> &NodePath {
        &self.parent
    }

    /// Identifier a child named `key` would have. Creates nothing.
    ///
    /// # Errors
    ///
    /// Returns [`IdentError::InvalidSegment`] if `key` is empty, or any
    /// error the entity's identifier construction raises.
    pub fn id_for_child(&self, key: &str) -> Result<E::Id, IdentError> {
        E::child_id(&self.parent, key)
    }

    /// Return the child for `child`, creating and storing it if absent.
    ///
    /// A key and the identifier it derives resolve to the same entity.
    ///
    /// # Errors
    ///
    /// Returns [`IdentError::InvalidSegment`] for an empty key and
    /// [`IdentError::InvalidArgument`] for an identifier that is not a
    /// direct child of this container's path.
    pub fn create_and_add<'k>(
        &self,
        child: impl Into<ChildRef<'k, E::Id>>,
    ) -> Result<Arc<E>, IdentError> {
        let id = self.resolve(child.into())?;
        let mut children = self.lock();
        let children = &mut *children;

        match children.by_id.entry(id) {
            Entry::Occupied(entry) => {
                tracing::trace!(child = %entry.key(), "Child already present");
                Ok(Arc::clone(entry.get()))
            }
            Entry::Vacant(entry) => {
                let id = entry.key().clone();
                tracing::debug!(parent = %self.parent, child = %id, "Creating child");
                let entity = Arc::new(E::create(id.clone()));
                entry.insert(Arc::clone(&entity));
                children.order.push(id);
                Ok(entity)
            }
        }
    }

    /// Child for `child`, if present.
    pub fn get<'k>(&self, child: impl Into<ChildRef<'k, E::Id>>) -> Option<Arc<E>> {
        let id = self.resolve(child.into()).ok()?;
        self.lock().by_id.get(&id).cloned()
    }

    /// True if a child for `child` is present.
    pub fn contains<'k>(&self, child: impl Into<ChildRef<'k, E::Id>>) -> bool {
        self.get(child).is_some()
    }

    /// Remove and return the child for `child`.
    pub fn remove<'k>(&self, child: impl Into<ChildRef<'k, E::Id>>) -> Option<Arc<E>> {
        let id = self.resolve(child.into()).ok()?;
        let mut children = self.lock();
        let removed = children.by_id.remove(&id)?;
        children.order.retain(|existing| *existing != id);
        tracing::debug!(parent = %self.parent, child = %id, "Removed child");
        Some(removed)
    }

    /// Number of children.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().order.len()
    }

    /// True if there are no children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of the children in insertion order.
    #[must_use]
    pub fn children(&self) -> Vec<Arc<E>> {
        let children = self.lock();
        children
            .order
            .iter()
            .filter_map(|id| children.by_id.get(id).cloned())
            .collect()
    }

    /// Descendant at absolute `path`, walking down from this container.
    #[must_use]
    pub fn find(&self, path: &NodePath) -> Option<Arc<E>> {
        if !self.parent.is_parent(path) {
            return None;
        }
        let mut segments = path.segments()[self.parent.depth()..].iter();
        let mut current = self.get(segments.next()?.as_str())?;
        for segment in segments {
            let next = current.children().get(segment.as_str())?;
            current = next;
        }
        Some(current)
    }

    /// Descendant at absolute `path`, creating missing ancestors on the way.
    ///
    /// # Errors
    ///
    /// Returns [`IdentError::InvalidArgument`] if `path` is not below this
    /// container's path.
    pub fn create_path(&self, path: &NodePath) -> Result<Arc<E>, IdentError> {
        if !self.parent.is_parent(path) {
            return Err(IdentError::InvalidArgument(format!(
                "{path} is not below {}",
                self.parent
            )));
        }
        let mut segments = path.segments()[self.parent.depth()..].iter();
        let Some(first) = segments.next() else {
            return Err(IdentError::InvalidArgument(format!("{path} is empty")));
        };
        let mut current = self.create_and_add(first.as_str())?;
        for segment in segments {
            let next = current.children().create_and_add(segment.as_str())?;
            current = next;
        }
        Ok(current)
    }

    fn resolve(&self, child: ChildRef<'_, E::Id>) -> Result<E::Id, IdentError> {
        match child {
            ChildRef::Key(key) => E::child_id(&self.parent, key),
            ChildRef::Id(id) => {
                if E::id_path(id).parent().as_ref() == Some(&self.parent) {
                    Ok(id.clone())
                } else {
                    Err(IdentError::InvalidArgument(format!(
                        "{id} is not a child of {}",
                        self.parent
                    )))
                }
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, Children<E>> {
        self.children.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<E: Hierarchical> fmt::Debug for HierarchicalContainer<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HierarchicalContainer")
            .field("parent", &self.parent)
            .field("len", &self.len())
            .finish()
    }
}
