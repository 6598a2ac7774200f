//! # Shorthands Core
//!
//! Domain logic for the Shorthands service: repositories over the
//! key-value storage layer, the invitation ledger, password hashing,
//! auth token signing, and logging setup.

#![deny(unsafe_code)]

pub mod ledger;
pub mod logging;
pub mod password;
pub mod repository;
pub mod token;

pub use ledger::InvitationLedger;
pub use repository::{
    InvitationRepository, OrganizationRepository, ShortRepository, UserRepository,
};
pub use token::{AuthTokenClaims, PrincipalKind};
