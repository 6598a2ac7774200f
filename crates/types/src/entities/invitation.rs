use bon::Builder;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::IdGenerator;

/// Lifecycle state of an invitation
///
/// `Accepted` and `Rejected` are terminal: once an invitation leaves
/// `Pending` it never transitions again.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum InvitationStatus {
    Pending,
    Accepted,
    Rejected,
}

impl InvitationStatus {
    /// Whether this status admits no further transition
    pub fn is_terminal(self) -> bool {
        self != InvitationStatus::Pending
    }
}

/// An invitation from an organization to a user
///
/// Organization and user names are denormalized so listings can render
/// without extra lookups; they are snapshots from creation time.
#[derive(Debug, Clone, Serialize, Deserialize, Builder)]
#[builder(on(String, into))]
pub struct Invitation {
    /// Unique identifier
    #[builder(default = IdGenerator::next_id())]
    pub id: i64,

    /// Inviting organization
    pub organization_id: i64,

    /// Organization name at creation time
    pub organization_name: String,

    /// Invited user
    pub user_id: i64,

    /// Username at creation time
    pub username: String,

    /// Current lifecycle state
    #[builder(default = InvitationStatus::Pending)]
    pub status: InvitationStatus,

    /// Timestamp when the invitation was created
    #[builder(default = Utc::now())]
    pub created_at: DateTime<Utc>,
}

impl Invitation {
    /// Whether this invitation can still be resolved
    pub fn is_pending(&self) -> bool {
        self.status == InvitationStatus::Pending
    }
}
