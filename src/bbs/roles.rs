//! Role and privilege levels used across the BBS.
//!
//! Roles form a strict order (`User < Moderator < Admin`); a higher role
//! implies a superset of the lower role's capabilities. A session's role is
//! snapshotted when the channel starts and never changes mid-session.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Moderator,
    Admin,
}

impl Role {
    /// Parse a role from its wire/storage name. Returns `None` for anything
    /// that is not exactly `user`, `moderator` or `admin`.
    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "user" => Some(Role::User),
            "moderator" => Some(Role::Moderator),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }

    /// Human-readable role name, also the storage representation.
    pub fn name(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Moderator => "moderator",
            Role::Admin => "admin",
        }
    }

    /// True when this role grants at least the capabilities of `required`.
    pub fn at_least(self, required: Role) -> bool {
        self >= required
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
