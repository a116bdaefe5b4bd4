//! Sites, pages, navigation and organization trees for the portal API.
//!
//! This crate provides:
//! - [`HierarchicalContainer`]: keyed children of one tree position, created
//!   at most once under concurrency
//! - [`Navigation`]: navigation node tree of a site
//! - [`OrganizationTree`]: group hierarchy
//! - [`Site`] / [`Page`] data holders with [`SiteIndex`] / [`PageIndex`]
//! - [`Attributes`] with typed [`Key`]s and [`Range`] pagination
//!
//! # Quick Start
//!
//! ```
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use portal_ident::{NodePath, SiteId};
//! use portal_model::Navigation;
//!
//! let nav = Navigation::new(SiteId::site("classic")?);
//! let news = nav.create_node(&NodePath::path(["home", "news"])?)?;
//! assert_eq!(news.path().to_string(), "/home/news");
//!
//! let home = nav.node(&NodePath::path(["home"])?).expect("created with news");
//! assert!(home.nodes().contains("news"));
//! # Ok(())
//! # }
//! ```

pub mod attributes;
pub mod container;
mod error;
pub(crate) mod navigation;
pub(crate) mod organization;
pub(crate) mod query;
pub(crate) mod site;

pub use attributes::{AttributeValue, Attributes, Key, keys};
pub use container::{ChildRef, Hierarchical, HierarchicalContainer};
pub use error::ModelError;
pub use navigation::{NavItem, Navigation, Node, NodeDetails, Visibility};
pub use organization::{GroupNode, OrganizationTree};
pub use query::{Range, SiteQuery};
pub use site::{Page, PageIndex, Site, SiteIndex};
