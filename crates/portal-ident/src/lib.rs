//! Site, page and navigation path identifiers for the portal API.
//!
//! This crate provides:
//! - [`NodePath`]: immutable hierarchical paths with parent/child algebra
//! - [`SiteId`] and [`PageId`]: composite identifiers with a URL-safe token form
//! - [`Group`], [`User`], [`Membership`], [`Permission`]: organization and
//!   security identifiers
//!
//! Every identifier renders to a canonical string and parses back to an
//! equal value, so identifiers can be used as persistence or map keys and
//! embedded in URLs.
//!
//! # Quick Start
//!
//! ```
//! # fn main() -> Result<(), portal_ident::IdentError> {
//! use portal_ident::{Group, PageId, SiteId, User};
//!
//! let page = PageId::of_site("classic", "home")?;
//! assert_eq!(page.format(), "site~classic~home");
//!
//! let dashboard = SiteId::from(User::new("john")?);
//! assert_eq!(dashboard.format().parse::<SiteId>()?, dashboard);
//!
//! let space = SiteId::from(Group::new(["platform", "users"])?);
//! assert_eq!(space.format_with(Some("{kind}:{payload}"))?, "space:/platform/users");
//! # Ok(())
//! # }
//! ```

pub mod codec;
mod error;
mod organization;
mod page;
mod path;
mod security;
mod segment;
mod site;
mod template;

pub use error::IdentError;
pub use organization::{Group, User};
pub use page::PageId;
pub use path::NodePath;
pub use security::{Membership, MembershipType, Permission};
pub use segment::Segment;
pub use site::{FIELD_DELIMITER, OwnerKind, SiteId, SiteType};
