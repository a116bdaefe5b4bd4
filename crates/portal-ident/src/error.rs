//! Error type shared by every identifier constructor and parser.

/// Error raised while constructing, parsing or formatting an identifier.
///
/// All variants are input errors: nothing in this crate retries or falls
/// back to a default value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum IdentError {
    /// An empty or otherwise disallowed segment or name was supplied.
    #[error("invalid segment: {0}")]
    InvalidSegment(String),

    /// A string passed to a parser does not match the token grammar.
    #[error("malformed token {token:?}: {reason}")]
    MalformedToken {
        /// The rejected input.
        token: String,
        /// What the parser expected.
        reason: String,
    },

    /// Sub-path bounds outside `[0, depth]`.
    #[error("index range {from}..{to} out of bounds for path of depth {depth}")]
    IndexOutOfRange {
        /// Start index (inclusive).
        from: usize,
        /// End index (exclusive).
        to: usize,
        /// Depth of the sliced path.
        depth: usize,
    },

    /// A required argument, such as a formatting template, was absent or invalid.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl IdentError {
    pub(crate) fn malformed(token: &str, reason: impl Into<String>) -> Self {
        Self::MalformedToken {
            token: token.to_owned(),
            reason: reason.into(),
        }
    }
}
