//! # Shorthands Types
//!
//! Shared entity types, error taxonomy, and ID generation for the
//! Shorthands service.

#![deny(unsafe_code)]

pub mod entities;
pub mod error;
pub mod id;

pub use entities::{
    Invitation, InvitationStatus, MemberEntry, MembershipEntry, Organization, Short, User,
};
pub use error::{Error, Result};
pub use id::IdGenerator;
