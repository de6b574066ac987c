//! Role hierarchy. Boards carry a minimum write role; mutation paths compare
//! the actor's role against it using the total order defined here.

use serde::{Deserialize, Serialize};

/// Account roles, ordered from least to most privileged. The derive order is
/// the hierarchy: `User < Moderator < Admin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Moderator,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Moderator => "moderator",
            Role::Admin => "admin",
        }
    }

    pub fn from_str_loose(s: &str) -> Option<Role> {
        match s {
            "user" => Some(Role::User),
            "moderator" => Some(Role::Moderator),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

/// True iff `actor` holds `required` or anything above it.
pub fn has_role(actor: Role, required: Role) -> bool {
    actor >= required
}
