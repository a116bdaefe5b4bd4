//! Site ownership kinds and site identifiers.
//!
//! # Token format
//!
//! ```text
//! site-token = kind-tag "~" payload
//! kind-tag   = "site" / "space" / "dashboard"
//! payload    = name              ; site, dashboard
//!            / 1*( "." name )    ; space, one "." per group segment
//! ```
//!
//! Names are escaped with [`codec::token`], so a token only ever contains
//! `A-Z a-z 0-9 - . _ ~` and can be embedded in a URL path segment as is.

use std::fmt;
use std::str::FromStr;

use crate::codec::token::{escape_name, unescape_name};
use crate::error::IdentError;
use crate::organization::{Group, User};
use crate::path::NodePath;
use crate::segment::Segment;
use crate::template;

/// Separator between the fields of a site or page token.
pub const FIELD_DELIMITER: char = '~';

/// Prefix of each group segment in a space payload.
pub(crate) const GROUP_DELIMITER: char = '.';

/// Kind of site, without its payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum SiteType {
    /// Ordinary top-level site.
    Site,
    /// Site owned by a group.
    Space,
    /// Personal dashboard of a user.
    Dashboard,
}

impl SiteType {
    /// All site types, in declaration order.
    pub const ALL: [Self; 3] = [Self::Site, Self::Space, Self::Dashboard];

    /// Kind tag used in tokens.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Site => "site",
            Self::Space => "space",
            Self::Dashboard => "dashboard",
        }
    }
}

impl fmt::Display for SiteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SiteType {
    type Err = IdentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| IdentError::malformed(s, "unknown site kind"))
    }
}

/// Owner of a site: exactly one of a global name, a group or a user.
///
/// Values of different variants never compare equal, even when their
/// payload text coincides.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OwnerKind {
    /// Ordinary top-level site, identified by its name.
    Global(Segment),
    /// Space owned by a group.
    Group(Group),
    /// Dashboard owned by a user.
    User(User),
}

impl OwnerKind {
    /// Global site owner.
    ///
    /// # Errors
    ///
    /// Returns [`IdentError::InvalidSegment`] if `name` is empty.
    pub fn global(name: impl Into<String>) -> Result<Self, IdentError> {
        Ok(Self::Global(Segment::new(name)?))
    }

    /// Group owner.
    ///
    /// # Errors
    ///
    /// Returns [`IdentError::InvalidSegment`] for the root path.
    pub fn group(path: NodePath) -> Result<Self, IdentError> {
        Ok(Self::Group(Group::from_path(path)?))
    }

    /// User owner.
    ///
    /// # Errors
    ///
    /// Returns [`IdentError::InvalidSegment`] if `name` is empty.
    pub fn user(name: impl Into<String>) -> Result<Self, IdentError> {
        Ok(Self::User(User::new(name)?))
    }

    /// Site type of this owner.
    #[must_use]
    pub fn site_type(&self) -> SiteType {
        match self {
            Self::Global(_) => SiteType::Site,
            Self::Group(_) => SiteType::Space,
            Self::User(_) => SiteType::Dashboard,
        }
    }

    /// Kind tag: `"site"`, `"space"` or `"dashboard"`.
    #[must_use]
    pub fn kind_tag(&self) -> &'static str {
        self.site_type().as_str()
    }

    /// Human-readable payload: the raw name, or the group id for spaces.
    #[must_use]
    pub fn display_name(&self) -> String {
        match self {
            Self::Global(name) => name.as_str().to_owned(),
            Self::Group(group) => group.id(),
            Self::User(user) => user.id().to_owned(),
        }
    }

    fn write_payload(&self, out: &mut String) {
        match self {
            Self::Global(name) => out.push_str(&escape_name(name.as_str())),
            Self::Group(group) => {
                for segment in group.path() {
                    out.push(GROUP_DELIMITER);
                    out.push_str(&escape_name(segment.as_str()));
                }
            }
            Self::User(user) => out.push_str(&escape_name(user.id())),
        }
    }

    fn parse_payload(kind: SiteType, payload: &str) -> Result<Self, IdentError> {
        match kind {
            SiteType::Site => Ok(Self::Global(Segment::new(unescape_name(payload)?)?)),
            SiteType::Dashboard => Ok(Self::User(User::new(unescape_name(payload)?)?)),
            SiteType::Space => {
                let Some(rest) = payload.strip_prefix(GROUP_DELIMITER) else {
                    return Err(IdentError::malformed(
                        payload,
                        "space payload must start with '.'",
                    ));
                };
                let segments = rest
                    .split(GROUP_DELIMITER)
                    .map(|part| Segment::new(unescape_name(part)?))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Self::Group(Group::from_path(NodePath::from_segments(
                    segments,
                ))?))
            }
        }
    }
}

/// Identifier of a site, space or dashboard.
///
/// # Example
///
/// ```
/// use portal_ident::{Group, SiteId};
///
/// let classic = SiteId::site("classic").unwrap();
/// assert_eq!(classic.format(), "site~classic");
///
/// let admins = SiteId::from(Group::new(["platform", "administrators"]).unwrap());
/// assert_eq!(admins.format(), "space~.platform.administrators");
/// assert_eq!(admins.format().parse::<SiteId>().unwrap(), admins);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct SiteId(OwnerKind);

impl SiteId {
    /// Global site.
    ///
    /// # Errors
    ///
    /// Returns [`IdentError::InvalidSegment`] if `name` is empty.
    pub fn site(name: impl Into<String>) -> Result<Self, IdentError> {
        Ok(Self(OwnerKind::global(name)?))
    }

    /// Space of the group at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`IdentError::InvalidSegment`] for the root path.
    pub fn group(path: NodePath) -> Result<Self, IdentError> {
        Ok(Self(OwnerKind::group(path)?))
    }

    /// Dashboard of the user `name`.
    ///
    /// # Errors
    ///
    /// Returns [`IdentError::InvalidSegment`] if `name` is empty.
    pub fn dashboard(name: impl Into<String>) -> Result<Self, IdentError> {
        Ok(Self(OwnerKind::user(name)?))
    }

    /// Owner of the site.
    #[must_use]
    pub fn owner(&self) -> &OwnerKind {
        &self.0
    }

    /// Site type.
    #[must_use]
    pub fn site_type(&self) -> SiteType {
        self.0.site_type()
    }

    /// Kind tag: `"site"`, `"space"` or `"dashboard"`.
    #[must_use]
    pub fn kind_tag(&self) -> &'static str {
        self.0.kind_tag()
    }

    /// Human-readable name (site name, group id or user name).
    #[must_use]
    pub fn name(&self) -> String {
        self.0.display_name()
    }

    /// Canonical token.
    #[must_use]
    pub fn format(&self) -> String {
        let mut out = String::new();
        self.write_token(&mut out);
        out
    }

    /// Render with a caller-supplied template.
    ///
    /// The template must use `{payload}` and may use `{kind}`. The payload is
    /// the human-readable [`name`](Self::name), not the escaped token form.
    ///
    /// # Errors
    ///
    /// Returns [`IdentError::InvalidArgument`] if `pattern` is `None`, lacks
    /// `{payload}`, names an unknown placeholder or has unbalanced braces.
    pub fn format_with(&self, pattern: Option<&str>) -> Result<String, IdentError> {
        let name = self.name();
        template::render(
            pattern,
            &[("kind", self.kind_tag()), ("payload", &name)],
            &["payload"],
        )
    }

    pub(crate) fn write_token(&self, out: &mut String) {
        out.push_str(self.kind_tag());
        out.push(FIELD_DELIMITER);
        self.0.write_payload(out);
    }
}

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format())
    }
}

impl FromStr for SiteId {
    type Err = IdentError;

    /// Parse a canonical token produced by [`SiteId::format`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (tag, payload) = s
            .split_once(FIELD_DELIMITER)
            .ok_or_else(|| IdentError::malformed(s, "missing '~' after site kind"))?;
        let in_token = |err: IdentError| match err {
            IdentError::MalformedToken { reason, .. } => IdentError::malformed(s, reason),
            other => other,
        };
        let kind: SiteType = tag.parse().map_err(in_token)?;
        let owner = OwnerKind::parse_payload(kind, payload).map_err(in_token)?;
        Ok(Self(owner))
    }
}

impl From<OwnerKind> for SiteId {
    fn from(owner: OwnerKind) -> Self {
        Self(owner)
    }
}

impl From<Group> for SiteId {
    fn from(group: Group) -> Self {
        Self(OwnerKind::Group(group))
    }
}

impl From<User> for SiteId {
    fn from(user: User) -> Self {
        Self(OwnerKind::User(user))
    }
}

impl TryFrom<String> for SiteId {
    type Error = IdentError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SiteId> for String {
    fn from(id: SiteId) -> Self {
        id.format()
    }
}
