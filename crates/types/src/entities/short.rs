use bon::Builder;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    id::IdGenerator,
};

use super::{MAX_DESCRIPTION_LEN, MAX_NAME_LEN, MIN_DESCRIPTION_LEN};

/// A glossary entry owned by an organization
///
/// The shorthand is unique within its organization (case-insensitive).
#[derive(Debug, Clone, Serialize, Deserialize, Builder)]
#[builder(on(String, into))]
pub struct Short {
    /// Unique identifier
    #[builder(default = IdGenerator::next_id())]
    pub id: i64,

    /// Owning organization
    pub organization_id: i64,

    /// The abbreviation itself
    pub shorthand: String,

    /// What the abbreviation stands for
    pub description: String,

    /// Community vote counters
    #[builder(default)]
    pub upvotes: u32,

    #[builder(default)]
    pub downvotes: u32,

    /// Timestamp when the short was created
    #[builder(default = Utc::now())]
    pub created_at: DateTime<Utc>,
}

impl Short {
    /// Validate field constraints
    pub fn validate(&self) -> Result<()> {
        let shorthand = self.shorthand.trim();
        if shorthand.is_empty() {
            return Err(Error::validation("Shorthand is required."));
        }
        if shorthand.len() > MAX_NAME_LEN {
            return Err(Error::validation(format!(
                "Shorthand must be at most {MAX_NAME_LEN} characters."
            )));
        }
        let description = self.description.trim();
        if description.len() < MIN_DESCRIPTION_LEN {
            return Err(Error::validation(format!(
                "Description must be at least {MIN_DESCRIPTION_LEN} characters."
            )));
        }
        if description.len() > MAX_DESCRIPTION_LEN {
            return Err(Error::validation(format!(
                "Description must be at most {MAX_DESCRIPTION_LEN} characters."
            )));
        }
        Ok(())
    }
}
