//! Page identifiers.

use std::fmt;
use std::str::FromStr;

use crate::codec::token::{escape_name, unescape_name};
use crate::error::IdentError;
use crate::organization::{Group, User};
use crate::segment::Segment;
use crate::site::{FIELD_DELIMITER, SiteId};
use crate::template;

/// Identifier of a page: the owning site plus the page name.
///
/// The canonical token is the site token followed by `~` and the escaped
/// page name, e.g. `site~classic~home`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct PageId {
    site: SiteId,
    name: Segment,
}

impl PageId {
    /// Page `name` of `site`.
    ///
    /// # Errors
    ///
    /// Returns [`IdentError::InvalidSegment`] if `name` is empty.
    pub fn new(site: SiteId, name: impl Into<String>) -> Result<Self, IdentError> {
        Ok(Self {
            site,
            name: Segment::new(name)?,
        })
    }

    /// Page of the global site `site_name`.
    ///
    /// # Errors
    ///
    /// Returns [`IdentError::InvalidSegment`] if either name is empty.
    pub fn of_site(site_name: impl Into<String>, name: impl Into<String>) -> Result<Self, IdentError> {
        Self::new(SiteId::site(site_name)?, name)
    }

    /// Page of the space owned by `group`.
    ///
    /// # Errors
    ///
    /// Returns [`IdentError::InvalidSegment`] if `name` is empty.
    pub fn of_group(group: Group, name: impl Into<String>) -> Result<Self, IdentError> {
        Self::new(SiteId::from(group), name)
    }

    /// Page of the dashboard owned by `user`.
    ///
    /// # Errors
    ///
    /// Returns [`IdentError::InvalidSegment`] if `name` is empty.
    pub fn of_dashboard(user: User, name: impl Into<String>) -> Result<Self, IdentError> {
        Self::new(SiteId::from(user), name)
    }

    /// Owning site.
    #[must_use]
    pub fn site_id(&self) -> &SiteId {
        &self.site
    }

    /// Page name.
    #[must_use]
    pub fn name(&self) -> &Segment {
        &self.name
    }

    /// Canonical token.
    #[must_use]
    pub fn format(&self) -> String {
        let mut out = String::new();
        self.site.write_token(&mut out);
        out.push(FIELD_DELIMITER);
        out.push_str(&escape_name(self.name.as_str()));
        out
    }

    /// Render with a caller-supplied template.
    ///
    /// Placeholders: `{kind}`, `{payload}` (site name) and `{page}`; the
    /// template must use `{payload}` and `{page}`.
    ///
    /// # Errors
    ///
    /// Returns [`IdentError::InvalidArgument`] if `pattern` is `None` or
    /// invalid.
    pub fn format_with(&self, pattern: Option<&str>) -> Result<String, IdentError> {
        let site_name = self.site.name();
        template::render(
            pattern,
            &[
                ("kind", self.site.kind_tag()),
                ("payload", &site_name),
                ("page", self.name.as_str()),
            ],
            &["payload", "page"],
        )
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format())
    }
}

impl FromStr for PageId {
    type Err = IdentError;

    /// Parse a canonical token produced by [`PageId::format`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (site, page) = s
            .rsplit_once(FIELD_DELIMITER)
            .filter(|(site, _)| site.contains(FIELD_DELIMITER))
            .ok_or_else(|| IdentError::malformed(s, "missing page name after site token"))?;
        let site: SiteId = site.parse()?;
        let name = unescape_name(page).map_err(|err| match err {
            IdentError::MalformedToken { reason, .. } => IdentError::malformed(s, reason),
            other => other,
        })?;
        Self::new(site, name)
    }
}

impl TryFrom<String> for PageId {
    type Error = IdentError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PageId> for String {
    fn from(id: PageId) -> Self {
        id.format()
    }
}
