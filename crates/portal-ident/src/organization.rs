//! Group and user identifiers.

use std::fmt;
use std::str::FromStr;

use crate::error::IdentError;
use crate::path::NodePath;
use crate::segment::Segment;

/// A group (space) in the organization tree, e.g. `/platform/administrators`.
///
/// Always names at least one segment.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct Group(NodePath);

impl Group {
    /// Create a group from its path segments.
    ///
    /// # Errors
    ///
    /// Returns [`IdentError::InvalidSegment`] if no segment is given or any
    /// segment is empty.
    pub fn new<I, S>(segments: I) -> Result<Self, IdentError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_path(NodePath::path(segments)?)
    }

    /// Create a group from an existing path.
    ///
    /// # Errors
    ///
    /// Returns [`IdentError::InvalidSegment`] for the root path.
    pub fn from_path(path: NodePath) -> Result<Self, IdentError> {
        if path.is_root() {
            return Err(IdentError::InvalidSegment(
                "group path must name at least one segment".to_owned(),
            ));
        }
        Ok(Self(path))
    }

    /// Group path.
    #[must_use]
    pub fn path(&self) -> &NodePath {
        &self.0
    }

    /// Group id in path form (`/platform/administrators`).
    #[must_use]
    pub fn id(&self) -> String {
        self.0.to_string()
    }

    /// Parent group, `None` for a top-level group.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        self.0.parent().and_then(|p| Self::from_path(p).ok())
    }

    /// Last segment of the group path.
    #[must_use]
    pub fn name(&self) -> &Segment {
        // Non-empty by construction.
        &self.0.segments()[self.0.depth() - 1]
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for Group {
    type Err = IdentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let path: NodePath = s.parse()?;
        if path.is_root() {
            return Err(IdentError::malformed(s, "group id must name a group"));
        }
        Ok(Self(path))
    }
}

impl TryFrom<String> for Group {
    type Error = IdentError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Group> for String {
    fn from(group: Group) -> Self {
        group.id()
    }
}

impl From<Group> for NodePath {
    fn from(group: Group) -> Self {
        group.0
    }
}

/// A portal user, identified by user name.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct User(Segment);

impl User {
    /// Create a user identifier.
    ///
    /// # Errors
    ///
    /// Returns [`IdentError::InvalidSegment`] if `name` is empty.
    pub fn new(name: impl Into<String>) -> Result<Self, IdentError> {
        Ok(Self(Segment::new(name)?))
    }

    /// User name.
    #[must_use]
    pub fn name(&self) -> &Segment {
        &self.0
    }

    /// User name as a string.
    #[must_use]
    pub fn id(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<Segment> for User {
    fn from(name: Segment) -> Self {
        Self(name)
    }
}

impl TryFrom<String> for User {
    type Error = IdentError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<User> for String {
    fn from(user: User) -> Self {
        user.0.into_inner()
    }
}
