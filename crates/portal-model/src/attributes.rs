//! String attributes with typed access keys.
//!
//! Attributes are stored as plain strings. A [`Key`] carries the value type
//! as a type parameter, so reading through a key converts to the declared
//! type without any runtime type lookup:
//!
//! ```
//! use portal_model::{Attributes, Key};
//!
//! const MAX_ITEMS: Key<u32> = Key::new("menu.max-items");
//!
//! let mut attributes = Attributes::new();
//! attributes.set(MAX_ITEMS, &12);
//! assert_eq!(attributes.get(MAX_ITEMS).unwrap(), Some(12));
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;

use portal_ident::{NodePath, PageId, SiteId};
use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Value type readable through a [`Key`].
pub trait AttributeValue: Sized {
    /// Type name reported in conversion errors.
    const TYPE_NAME: &'static str;

    /// Stored string form.
    fn to_attribute(&self) -> String;

    /// Parse the stored string form.
    fn from_attribute(value: &str) -> Option<Self>;
}

macro_rules! impl_attribute_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl AttributeValue for $ty {
                const TYPE_NAME: &'static str = stringify!($ty);

                fn to_attribute(&self) -> String {
                    self.to_string()
                }

                fn from_attribute(value: &str) -> Option<Self> {
                    value.parse().ok()
                }
            }
        )*
    };
}

impl_attribute_value!(String, bool, i32, i64, u32, u64, f64, NodePath, SiteId, PageId);

/// Typed attribute key.
///
/// Keys are declared once, usually as `const` items, and carry their value
/// type in `T`.
pub struct Key<T> {
    name: &'static str,
    value: PhantomData<fn() -> T>,
}

impl<T> Key<T> {
    /// Declare a key.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            value: PhantomData,
        }
    }

    /// Attribute name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl<T> Clone for Key<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Key<T> {}

impl<T> fmt::Debug for Key<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Key").field(&self.name).finish()
    }
}

/// Keys understood by the portal.
pub mod keys {
    use portal_ident::PageId;

    use super::Key;

    /// Keep the HTTP session alive while a site is open (`"always"`,
    /// `"never"`, `"onDemand"`).
    pub const SESSION_ALIVE: Key<String> = Key::new("portal.session-alive");
    /// Show the info bar above each application.
    pub const SHOW_INFO_BAR: Key<bool> = Key::new("portal.show-info-bar");
    /// Render the page's single application maximized.
    pub const SHOW_MAX_WINDOW: Key<bool> = Key::new("page.show-max-window");
    /// Page shown when a site is opened without a node path.
    pub const DEFAULT_PAGE: Key<PageId> = Key::new("site.default-page");

    /// Names of all keys above.
    pub const ALL: [&str; 4] = [
        SESSION_ALIVE.name(),
        SHOW_INFO_BAR.name(),
        SHOW_MAX_WINDOW.name(),
        DEFAULT_PAGE.name(),
    ];
}

/// String attribute map.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes(BTreeMap<String, String>);

impl Attributes {
    /// Empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Typed value for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::AttributeConversion`] if a value is stored but
    /// does not parse as `T`.
    pub fn get<T: AttributeValue>(&self, key: Key<T>) -> Result<Option<T>, ModelError> {
        let Some(raw) = self.0.get(key.name()) else {
            return Ok(None);
        };
        T::from_attribute(raw)
            .map(Some)
            .ok_or_else(|| ModelError::AttributeConversion {
                key: key.name().to_owned(),
                value: raw.clone(),
                expected: T::TYPE_NAME,
            })
    }

    /// Store a typed value, returning the previous raw value.
    pub fn set<T: AttributeValue>(&mut self, key: Key<T>, value: &T) -> Option<String> {
        self.0.insert(key.name().to_owned(), value.to_attribute())
    }

    /// Raw value by name.
    #[must_use]
    pub fn get_raw(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Store a raw value.
    pub fn set_raw(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(name.into(), value.into())
    }

    /// Remove a value, returning the raw form.
    pub fn remove<T>(&mut self, key: Key<T>) -> Option<String> {
        self.0.remove(key.name())
    }

    /// True if a value is stored for `key`.
    #[must_use]
    pub fn contains<T>(&self, key: Key<T>) -> bool {
        self.0.contains_key(key.name())
    }

    /// Number of stored values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Raw name/value pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COUNT: Key<i64> = Key::new("test.count");

    #[test]
    fn test_typed_round_trip() {
        let mut attributes = Attributes::new();
        attributes.set(keys::SHOW_MAX_WINDOW, &true);
        attributes.set(COUNT, &-3);
        attributes.set(keys::SESSION_ALIVE, &"onDemand".to_owned());

        assert_eq!(attributes.get(keys::SHOW_MAX_WINDOW).unwrap(), Some(true));
        assert_eq!(attributes.get(COUNT).unwrap(), Some(-3));
        assert_eq!(
            attributes.get(keys::SESSION_ALIVE).unwrap().as_deref(),
            Some("onDemand")
        );
        assert_eq!(attributes.get_raw("page.show-max-window"), Some("true"));
    }

    #[test]
    fn test_identifier_values_use_tokens() {
        let mut attributes = Attributes::new();
        let page = PageId::of_site("classic", "home").unwrap();
        attributes.set(keys::DEFAULT_PAGE, &page);
        assert_eq!(attributes.get_raw("site.default-page"), Some("site~classic~home"));
        assert_eq!(attributes.get(keys::DEFAULT_PAGE).unwrap(), Some(page));
    }

    #[test]
    fn test_missing_value() {
        let attributes = Attributes::new();
        assert_eq!(attributes.get(COUNT).unwrap(), None);
        assert!(!attributes.contains(COUNT));
    }

    #[test]
    fn test_conversion_error() {
        let mut attributes = Attributes::new();
        attributes.set_raw("test.count", "many");
        let err = attributes.get(COUNT).unwrap_err();
        assert!(matches!(
            err,
            ModelError::AttributeConversion { expected: "i64", .. }
        ));
        assert!(err.to_string().contains("test.count"));
    }

    #[test]
    fn test_remove() {
        let mut attributes = Attributes::new();
        attributes.set(COUNT, &1);
        assert_eq!(attributes.remove(COUNT).as_deref(), Some("1"));
        assert!(attributes.is_empty());
    }

    #[test]
    fn test_well_known_names_unique() {
        let mut names = keys::ALL.to_vec();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), keys::ALL.len());
    }
}
