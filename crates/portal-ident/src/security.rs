//! Identifiers that access and edit restrictions point at.
//!
//! These are plain values; deciding whether a user satisfies a
//! [`Permission`] is left to the portal server.
//!
//! Textual forms:
//!
//! - user membership: the escaped user name (`john`)
//! - group membership: `type:/group/path` where `type` is `*` for any
//!   membership type (`*:/platform/users`, `manager:/organization/hr`)
//! - permission: `*` for everyone, otherwise memberships joined by `;`

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::codec::{escape, unescape};
use crate::error::IdentError;
use crate::organization::{Group, User};
use crate::segment::Segment;

const ANY: &str = "*";
const TYPE_DELIMITER: char = ':';
const MEMBERSHIP_DELIMITER: &str = ";";

/// Membership type within a group.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MembershipType {
    /// Any membership type (`*`).
    Any,
    /// A named membership type such as `manager`.
    Named(Segment),
}

impl MembershipType {
    /// Named membership type.
    ///
    /// # Errors
    ///
    /// Returns [`IdentError::InvalidSegment`] if `name` is empty.
    pub fn named(name: impl Into<String>) -> Result<Self, IdentError> {
        Ok(Self::Named(Segment::new(name)?))
    }
}

impl fmt::Display for MembershipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str(ANY),
            Self::Named(name) => f.write_str(&escape(name.as_str())),
        }
    }
}

impl FromStr for MembershipType {
    type Err = IdentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == ANY {
            return Ok(Self::Any);
        }
        if s.is_empty() {
            return Err(IdentError::malformed(s, "empty membership type"));
        }
        Ok(Self::Named(Segment::new(unescape(s)?)?))
    }
}

/// A user, or members of a group with a given membership type.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Membership {
    /// A single user.
    User(User),
    /// Members of `group` holding `membership_type`.
    Group {
        /// Required membership type.
        membership_type: MembershipType,
        /// Group.
        group: Group,
    },
}

impl Membership {
    /// Any member of `group`.
    #[must_use]
    pub fn any_of(group: Group) -> Self {
        Self::Group {
            membership_type: MembershipType::Any,
            group,
        }
    }

    /// Members of `group` holding `membership_type`.
    #[must_use]
    pub fn of(membership_type: MembershipType, group: Group) -> Self {
        Self::Group {
            membership_type,
            group,
        }
    }
}

impl From<User> for Membership {
    fn from(user: User) -> Self {
        Self::User(user)
    }
}

impl fmt::Display for Membership {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User(user) => f.write_str(&escape(user.id())),
            Self::Group {
                membership_type,
                group,
            } => write!(f, "{membership_type}{TYPE_DELIMITER}{group}"),
        }
    }
}

impl FromStr for Membership {
    type Err = IdentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(TYPE_DELIMITER) {
            Some((membership_type, group)) => Ok(Self::Group {
                membership_type: membership_type.parse()?,
                group: group.parse()?,
            }),
            None if s.is_empty() => Err(IdentError::malformed(s, "empty membership")),
            None => Ok(Self::User(User::new(unescape(s)?)?)),
        }
    }
}

/// Set of memberships allowed to access or edit something.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub enum Permission {
    /// Everyone, including anonymous visitors.
    Everyone,
    /// Only the listed memberships; empty means nobody.
    Restricted(BTreeSet<Membership>),
}

impl Permission {
    /// Permission granted to everyone.
    #[must_use]
    pub fn everyone() -> Self {
        Self::Everyone
    }

    /// Permission granted to nobody.
    #[must_use]
    pub fn nobody() -> Self {
        Self::Restricted(BTreeSet::new())
    }

    /// Permission granted to the given memberships.
    pub fn any_of(memberships: impl IntoIterator<Item = Membership>) -> Self {
        Self::Restricted(memberships.into_iter().collect())
    }

    /// True if granted to everyone.
    #[must_use]
    pub fn is_everyone(&self) -> bool {
        matches!(self, Self::Everyone)
    }

    /// Listed memberships; empty for [`Permission::Everyone`].
    pub fn memberships(&self) -> impl Iterator<Item = &Membership> {
        let set = match self {
            Self::Everyone => None,
            Self::Restricted(set) => Some(set),
        };
        set.into_iter().flatten()
    }

    /// Copy of this permission with `membership` added.
    ///
    /// Adding to [`Permission::Everyone`] leaves it unchanged.
    #[must_use]
    pub fn with(&self, membership: Membership) -> Self {
        match self {
            Self::Everyone => Self::Everyone,
            Self::Restricted(set) => {
                let mut set = set.clone();
                set.insert(membership);
                Self::Restricted(set)
            }
        }
    }
}

impl Default for Permission {
    fn default() -> Self {
        Self::everyone()
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Everyone => f.write_str(ANY),
            Self::Restricted(set) => {
                let parts: Vec<String> = set.iter().map(ToString::to_string).collect();
                f.write_str(&parts.join(MEMBERSHIP_DELIMITER))
            }
        }
    }
}

impl FromStr for Permission {
    type Err = IdentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ANY => Ok(Self::Everyone),
            "" => Ok(Self::nobody()),
            _ => s
                .split(MEMBERSHIP_DELIMITER)
                .map(str::parse)
                .collect::<Result<BTreeSet<_>, _>>()
                .map(Self::Restricted),
        }
    }
}

impl TryFrom<String> for Permission {
    type Error = IdentError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Permission> for String {
    fn from(permission: Permission) -> Self {
        permission.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn admins() -> Group {
        Group::new(["platform", "administrators"]).unwrap()
    }

    #[test]
    fn test_membership_text() {
        assert_eq!(Membership::any_of(admins()).to_string(), "*:/platform/administrators");
        assert_eq!(
            Membership::of(MembershipType::named("manager").unwrap(), admins()).to_string(),
            "manager:/platform/administrators"
        );
        assert_eq!(Membership::from(User::new("john").unwrap()).to_string(), "john");
    }

    #[test]
    fn test_membership_round_trip() {
        let memberships = [
            Membership::any_of(admins()),
            Membership::of(MembershipType::named("*").unwrap(), admins()),
            Membership::of(MembershipType::named("a:b").unwrap(), admins()),
            Membership::from(User::new("john").unwrap()),
            Membership::from(User::new("odd:name;x").unwrap()),
            Membership::from(User::new("*").unwrap()),
        ];
        for membership in memberships {
            let text = membership.to_string();
            assert_eq!(text.parse::<Membership>().unwrap(), membership, "{text}");
        }
    }

    #[test]
    fn test_membership_parse_errors() {
        assert!("".parse::<Membership>().is_err());
        assert!(":/platform".parse::<Membership>().is_err());
        assert!("*:platform".parse::<Membership>().is_err());
        assert!("*:/".parse::<Membership>().is_err());
    }

    #[test]
    fn test_permission_everyone() {
        let permission = Permission::everyone();
        assert!(permission.is_everyone());
        assert_eq!(permission.to_string(), "*");
        assert_eq!("*".parse::<Permission>().unwrap(), permission);
        assert_eq!(permission.memberships().count(), 0);
        assert!(permission.with(Membership::any_of(admins())).is_everyone());
    }

    #[test]
    fn test_permission_round_trip() {
        let permission = Permission::any_of([
            Membership::any_of(admins()),
            Membership::from(User::new("root").unwrap()),
        ]);
        let text = permission.to_string();
        assert_eq!(text.parse::<Permission>().unwrap(), permission);
        assert_eq!(permission.memberships().count(), 2);
    }

    #[test]
    fn test_permission_nobody() {
        let nobody = Permission::nobody();
        assert!(!nobody.is_everyone());
        assert_eq!(nobody.to_string(), "");
        assert_eq!("".parse::<Permission>().unwrap(), nobody);
        let one = nobody.with(Membership::any_of(admins()));
        assert_eq!(one.memberships().count(), 1);
    }
}
