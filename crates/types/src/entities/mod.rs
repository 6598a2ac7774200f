pub mod invitation;
pub mod organization;
pub mod short;
pub mod user;

pub use invitation::{Invitation, InvitationStatus};
pub use organization::{MemberEntry, Organization};
pub use short::Short;
pub use user::{MembershipEntry, User};

/// Maximum length for usernames and organization names
pub const MAX_NAME_LEN: usize = 96;

/// Minimum length for passwords
pub const MIN_PASSWORD_LEN: usize = 4;

/// Maximum length for passwords
pub const MAX_PASSWORD_LEN: usize = 1024;

/// Minimum length for short descriptions
pub const MIN_DESCRIPTION_LEN: usize = 5;

/// Maximum length for short descriptions
pub const MAX_DESCRIPTION_LEN: usize = 1024;
