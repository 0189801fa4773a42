//! `staffhub-mobile` — mobile client equivalent of the web session core.
//!
//! Same authorization contract as `staffhub-client`, collapsed into one
//! object: a platform-secure credential vault in place of browser storage,
//! the same bearer-attachment and 401-invalidation rules, and the two
//! mobile-specific domain flows (attendance clock-in/out and leave-request
//! submission). Role semantics cannot drift from the web client because
//! both share `staffhub-auth`.

pub mod client;
pub mod vault;

pub use client::{AttendanceEvent, AttendanceKind, LeaveRequest, MobileClient, MobileConfig};
pub use staffhub_client::session::LoginOutcome;
pub use vault::{FileVault, MemoryVault, SecureVault, VaultError};
