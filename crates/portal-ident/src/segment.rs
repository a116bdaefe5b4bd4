//! Single non-empty path component.

use std::fmt;

use crate::error::IdentError;

/// A non-empty path component.
///
/// Segments hold raw text; escaping happens only when a segment is rendered
/// into a path or identifier token.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct Segment(String);

impl Segment {
    /// Create a segment from raw text.
    ///
    /// # Errors
    ///
    /// Returns [`IdentError::InvalidSegment`] if `value` is empty.
    pub fn new(value: impl Into<String>) -> Result<Self, IdentError> {
        let value = value.into();
        if value.is_empty() {
            return Err(IdentError::InvalidSegment(
                "segment cannot be empty".to_owned(),
            ));
        }
        Ok(Self(value))
    }

    /// Raw (unescaped) text of the segment.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the segment, returning its raw text.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for Segment {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Segment {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Segment {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Segment {
    type Error = IdentError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for Segment {
    type Error = IdentError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Segment> for String {
    fn from(segment: Segment) -> Self {
        segment.0
    }
}
