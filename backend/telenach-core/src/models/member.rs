//! Group roles and the member-management permission table.
//!
//! Unlike conversation roles with a strict ordering, group permissions are a
//! fixed lookup: admins manage everyone, moderators manage plain members,
//! members manage nobody. Nobody manages themselves.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::User;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupRole {
    Admin,
    Moderator,
    Member,
}

/// `MANAGE_TABLE[actor][target]`, indexed by [`GroupRole::index`].
const MANAGE_TABLE: [[bool; 3]; 3] = [
    //  admin  moderator  member      <- target
    [true, true, true],    // admin
    [false, false, true],  // moderator
    [false, false, false], // member
];

impl GroupRole {
    const fn index(self) -> usize {
        match self {
            Self::Admin => 0,
            Self::Moderator => 1,
            Self::Member => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Moderator => "moderator",
            Self::Member => "member",
        }
    }

    /// Role-only half of the check; identity is handled by [`can_manage`].
    pub fn can_manage(self, target: GroupRole) -> bool {
        MANAGE_TABLE[self.index()][target.index()]
    }
}

impl fmt::Display for GroupRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for GroupRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "moderator" => Ok(Self::Moderator),
            "member" => Ok(Self::Member),
            _ => Err(format!("Invalid group role: {}", s)),
        }
    }
}

/// A user's membership in one group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupMember {
    #[serde(flatten)]
    pub user: User,
    pub group_role: GroupRole,
    pub is_muted: bool,
}

impl GroupMember {
    pub fn new(user: User, group_role: GroupRole) -> Self {
        Self {
            user: user.public_profile(),
            group_role,
            is_muted: false,
        }
    }

    pub fn id(&self) -> &str {
        &self.user.id
    }
}

pub fn can_manage(actor: &GroupMember, target: &GroupMember) -> bool {
    actor.id() != target.id() && actor.group_role.can_manage(target.group_role)
}
