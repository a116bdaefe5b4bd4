//! Error types for the portal model.

use portal_ident::IdentError;

/// Error from model operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ModelError {
    /// Identifier construction or parsing failed.
    #[error("identifier error")]
    Ident(#[from] IdentError),

    /// Pagination range with a zero limit.
    #[error("invalid range: offset {offset}, limit {limit}")]
    InvalidRange {
        /// Requested offset.
        offset: u32,
        /// Requested limit.
        limit: u32,
    },

    /// Stored attribute value does not parse as the key's type.
    #[error("attribute {key} = {value:?} is not a valid {expected}")]
    AttributeConversion {
        /// Attribute name.
        key: String,
        /// Stored raw value.
        value: String,
        /// Expected type name.
        expected: &'static str,
    },
}
