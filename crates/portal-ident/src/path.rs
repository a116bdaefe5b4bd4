//! Immutable hierarchical paths.
//!
//! A [`NodePath`] locates a navigation node or a group in a tree. Paths are
//! plain segment sequences: `.` and `..` carry no special meaning, and every
//! derived path (parent, child, slice) is a new value.

use std::fmt;
use std::str::FromStr;

use crate::codec;
use crate::error::IdentError;
use crate::segment::Segment;

/// Ordered sequence of segments; the empty sequence is the root.
///
/// Renders as `/` for the root and `/seg1/seg2` otherwise, with each segment
/// percent-encoded. Parsing the rendered form yields an equal path.
///
/// # Example
///
/// ```
/// use portal_ident::NodePath;
///
/// let path = NodePath::path(["one", "two"]).unwrap();
/// assert_eq!(path.to_string(), "/one/two");
/// assert!(NodePath::root().is_parent(&path));
/// assert_eq!(path.parent().unwrap().to_string(), "/one");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct NodePath {
    segments: Vec<Segment>,
}

impl NodePath {
    /// The root path (no segments).
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Build a path from raw segment values.
    ///
    /// # Errors
    ///
    /// Returns [`IdentError::InvalidSegment`] if any value is empty.
    pub fn path<I, S>(segments: I) -> Result<Self, IdentError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments = segments
            .into_iter()
            .map(Segment::new)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { segments })
    }

    /// Build a path from already validated segments.
    #[must_use]
    pub fn from_segments(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    /// Segments in order, root first. Length equals [`depth`](Self::depth).
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Segments as raw strings.
    #[must_use]
    pub fn as_array(&self) -> Vec<&str> {
        self.segments.iter().map(Segment::as_str).collect()
    }

    /// Number of segments.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// True for the root path.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Segment at `index`, if any.
    #[must_use]
    pub fn segment(&self, index: usize) -> Option<&Segment> {
        self.segments.get(index)
    }

    /// Last segment, `None` at the root.
    #[must_use]
    pub fn last_segment(&self) -> Option<&Segment> {
        self.segments.last()
    }

    /// Iterate over the segments.
    pub fn iter(&self) -> std::slice::Iter<'_, Segment> {
        self.segments.iter()
    }

    /// True iff `self` is a strict prefix of `other`.
    ///
    /// The root is parent of every path except itself.
    #[must_use]
    pub fn is_parent(&self, other: &Self) -> bool {
        self.depth() < other.depth() && other.segments.starts_with(&self.segments)
    }

    /// Path without its last segment; `None` at the root.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        let (_, init) = self.segments.split_last()?;
        Some(Self {
            segments: init.to_vec(),
        })
    }

    /// Path extended by one segment.
    ///
    /// # Errors
    ///
    /// Returns [`IdentError::InvalidSegment`] if `name` is empty.
    pub fn child(&self, name: impl Into<String>) -> Result<Self, IdentError> {
        let mut segments = self.segments.clone();
        segments.push(Segment::new(name)?);
        Ok(Self { segments })
    }

    /// Concatenate `other` after `self`.
    #[must_use]
    pub fn append(&self, other: &Self) -> Self {
        let mut segments = self.segments.clone();
        segments.extend_from_slice(&other.segments);
        Self { segments }
    }

    /// Slice `[from, depth)`.
    ///
    /// # Errors
    ///
    /// Returns [`IdentError::IndexOutOfRange`] if `from > depth`.
    pub fn sub_path(&self, from: usize) -> Result<Self, IdentError> {
        self.sub_path_range(from, self.depth())
    }

    /// Slice `[from, to)`.
    ///
    /// # Errors
    ///
    /// Returns [`IdentError::IndexOutOfRange`] unless `from <= to <= depth`.
    pub fn sub_path_range(&self, from: usize, to: usize) -> Result<Self, IdentError> {
        let slice = self
            .segments
            .get(from..to)
            .ok_or(IdentError::IndexOutOfRange {
                from,
                to,
                depth: self.depth(),
            })?;
        Ok(Self {
            segments: slice.to_vec(),
        })
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&codec::join(&self.segments))
    }
}

impl FromStr for NodePath {
    type Err = IdentError;

    /// Parse rooted path text; `"/"` yields the root.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self {
            segments: codec::split(s)?,
        })
    }
}

impl TryFrom<String> for NodePath {
    type Error = IdentError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<NodePath> for String {
    fn from(path: NodePath) -> Self {
        path.to_string()
    }
}

impl<'a> IntoIterator for &'a NodePath {
    type Item = &'a Segment;
    type IntoIter = std::slice::Iter<'a, Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn path(values: &[&str]) -> NodePath {
        NodePath::path(values.iter().copied()).unwrap()
    }

    #[test]
    fn test_to_string() {
        assert_eq!(path(&["one", "two"]).to_string(), "/one/two");
        assert_eq!(path(&["one"]).to_string(), "/one");
    }

    #[test]
    fn test_from_string() {
        let parsed: NodePath = "/one/two".parse().unwrap();
        assert_eq!(parsed.as_array(), vec!["one", "two"]);
        assert_eq!(parsed, path(&["one", "two"]));
    }

    #[test]
    fn test_root() {
        let root = NodePath::root();
        assert_eq!(root.to_string(), "/");
        assert_eq!(root.parent(), None);
        assert!(root.is_root());
        assert_eq!(root.depth(), 0);
        assert_eq!("/".parse::<NodePath>().unwrap(), root);
    }

    #[test]
    fn test_round_trip_with_reserved_characters() {
        for p in [
            NodePath::root(),
            path(&["one"]),
            path(&["a/b", "c d", "100%"]),
            path(&["..", "."]),
            path(&["é", "~"]),
        ] {
            assert_eq!(p.to_string().parse::<NodePath>().unwrap(), p);
        }
    }

    #[test]
    fn test_empty_segment_rejected() {
        assert!(matches!(
            NodePath::path(["one", ""]),
            Err(IdentError::InvalidSegment(_))
        ));
        assert!(NodePath::root().child("").is_err());
    }

    #[test]
    fn test_malformed_text_rejected() {
        for text in ["", "one", "/one//two", "/one/", "/bad%zz", "/a b"] {
            assert!(
                matches!(
                    text.parse::<NodePath>(),
                    Err(IdentError::MalformedToken { .. })
                ),
                "expected {text:?} to be rejected"
            );
        }
    }

    #[test]
    fn test_is_parent() {
        assert!(NodePath::root().is_parent(&path(&["one", "two"])));
        assert!(path(&["one"]).is_parent(&path(&["one", "two"])));
        assert!(path(&["one"]).is_parent(&path(&["one", "two", "three"])));
        assert!(!path(&["one", "two"]).is_parent(&path(&["one"])));
        assert!(!path(&["what"]).is_parent(&path(&["one", "two"])));
        assert!(!path(&["one"]).is_parent(&path(&["one"])));
        assert!(!NodePath::root().is_parent(&NodePath::root()));
    }

    #[test]
    fn test_parent() {
        assert_eq!(path(&["one", "two"]).parent(), Some(path(&["one"])));
        assert_eq!(path(&["one"]).parent(), Some(NodePath::root()));
    }

    #[test]
    fn test_sub_path() {
        let p = path(&["one", "two", "three"]);
        assert_eq!(p.sub_path(1).unwrap().as_array(), vec!["two", "three"]);
        assert_eq!(p.sub_path_range(1, 2).unwrap().as_array(), vec!["two"]);
        assert_eq!(p.sub_path(3).unwrap(), NodePath::root());
        assert_eq!(p.sub_path(0).unwrap(), p);
    }

    #[test]
    fn test_sub_path_out_of_range() {
        let p = path(&["one", "two"]);
        assert_eq!(
            p.sub_path(3),
            Err(IdentError::IndexOutOfRange {
                from: 3,
                to: 2,
                depth: 2
            })
        );
        assert!(p.sub_path_range(1, 3).is_err());
        assert!(p.sub_path_range(2, 1).is_err());
    }

    #[test]
    fn test_child_and_append() {
        let p = path(&["one"]);
        assert_eq!(p.child("two").unwrap(), path(&["one", "two"]));
        assert_eq!(
            p.append(&path(&["two", "three"])),
            path(&["one", "two", "three"])
        );
        assert_eq!(p.append(&NodePath::root()), p);
        assert_eq!(p.last_segment().unwrap(), "one");
        assert_eq!(NodePath::root().last_segment(), None);
    }

    #[test]
    fn test_dot_segments_are_opaque() {
        let p = path(&["one", ".."]);
        assert_eq!(p.depth(), 2);
        assert!(!p.is_parent(&path(&["one"])));
    }
}
