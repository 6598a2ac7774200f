use bon::Builder;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    id::IdGenerator,
};

use super::MAX_NAME_LEN;

/// An organization a user belongs to, denormalized for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipEntry {
    /// Organization ID
    pub id: i64,
    /// Organization name at the time of joining
    pub name: String,
}

/// A registered user
///
/// Memberships are appended only when the user accepts an invitation;
/// registration never grants any.
#[derive(Debug, Clone, Serialize, Deserialize, Builder)]
#[builder(on(String, into))]
pub struct User {
    /// Unique identifier
    #[builder(default = IdGenerator::next_id())]
    pub id: i64,

    /// Display name, unique across users (case-insensitive)
    pub username: String,

    /// Argon2 password hash
    pub password_hash: String,

    /// Organizations this user is a member of
    #[builder(default)]
    pub organizations: Vec<MembershipEntry>,

    /// Timestamp when the user registered
    #[builder(default = Utc::now())]
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Validate field constraints
    pub fn validate(&self) -> Result<()> {
        let trimmed = self.username.trim();
        if trimmed.is_empty() {
            return Err(Error::validation("Username is required."));
        }
        if trimmed.len() > MAX_NAME_LEN {
            return Err(Error::validation(format!(
                "Username must be at most {MAX_NAME_LEN} characters."
            )));
        }
        Ok(())
    }

    /// Whether the user already belongs to the given organization
    pub fn is_member_of(&self, organization_id: i64) -> bool {
        self.organizations.iter().any(|m| m.id == organization_id)
    }

    /// Record a membership unless one already exists for the organization
    pub fn add_membership(&mut self, entry: MembershipEntry) {
        if !self.is_member_of(entry.id) {
            self.organizations.push(entry);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_user() {
        let _ = IdGenerator::init(1);
        let user = User::builder().username("bob").password_hash("$argon2id$...").build();

        assert!(user.id > 0);
        assert_eq!(user.username, "bob");
        assert!(user.organizations.is_empty());
        assert!(user.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_username() {
        let _ = IdGenerator::init(1);
        let user = User::builder().username("   ").password_hash("h").build();
        assert!(user.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_long_username() {
        let _ = IdGenerator::init(1);
        let user =
            User::builder().username("x".repeat(MAX_NAME_LEN + 1)).password_hash("h").build();
        assert!(user.validate().is_err());
    }

    #[test]
    fn test_add_membership_is_idempotent() {
        let _ = IdGenerator::init(1);
        let mut user = User::builder().username("bob").password_hash("h").build();

        user.add_membership(MembershipEntry { id: 7, name: "acme".to_string() });
        user.add_membership(MembershipEntry { id: 7, name: "acme".to_string() });

        assert_eq!(user.organizations.len(), 1);
        assert!(user.is_member_of(7));
        assert!(!user.is_member_of(8));
    }
}
