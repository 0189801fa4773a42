//! `staffhub-auth` — pure authorization model for the HRMS clients.
//!
//! This crate is intentionally decoupled from HTTP and storage: roles,
//! permissions, the cached user profile, and the predicates the UI layers
//! consult. Both the web and mobile clients share it, so role semantics
//! cannot drift between them.

pub mod demo;
pub mod permission;
pub mod profile;
pub mod role;

pub use demo::{DemoIdentity, demo_for_role, demo_identities};
pub use permission::{Permission, PermissionSet};
pub use profile::UserProfile;
pub use role::Role;
