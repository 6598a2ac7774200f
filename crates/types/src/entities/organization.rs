use bon::Builder;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    id::IdGenerator,
};

use super::MAX_NAME_LEN;

/// A user who belongs to an organization, denormalized for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberEntry {
    /// User ID
    pub id: i64,
    /// Username at the time of joining
    pub username: String,
}

/// An organization account
///
/// Organizations authenticate like users and own invitations and shorts.
/// The member list mirrors the users' membership lists; both sides are
/// written in the same transaction when an invitation is accepted.
#[derive(Debug, Clone, Serialize, Deserialize, Builder)]
#[builder(on(String, into))]
pub struct Organization {
    /// Unique identifier
    #[builder(default = IdGenerator::next_id())]
    pub id: i64,

    /// Organization name, unique across organizations (case-insensitive)
    pub name: String,

    /// Argon2 password hash
    pub password_hash: String,

    /// Users who accepted an invitation into this organization
    #[builder(default)]
    pub users: Vec<MemberEntry>,

    /// Timestamp when the organization registered
    #[builder(default = Utc::now())]
    pub created_at: DateTime<Utc>,
}

impl Organization {
    /// Validate field constraints
    pub fn validate(&self) -> Result<()> {
        let trimmed = self.name.trim();
        if trimmed.is_empty() {
            return Err(Error::validation("Organization name is required."));
        }
        if trimmed.len() > MAX_NAME_LEN {
            return Err(Error::validation(format!(
                "Organization name must be at most {MAX_NAME_LEN} characters."
            )));
        }
        Ok(())
    }

    /// Whether the given user is already a member
    pub fn has_member(&self, user_id: i64) -> bool {
        self.users.iter().any(|m| m.id == user_id)
    }

    /// Record a member unless one already exists for the user
    pub fn add_member(&mut self, entry: MemberEntry) {
        if !self.has_member(entry.id) {
            self.users.push(entry);
        }
    }
}
