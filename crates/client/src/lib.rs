//! `staffhub-client` — web client core.
//!
//! **Responsibility:** everything between the UI tree and the backend:
//! - durable credential storage (`CredentialStore`)
//! - the single HTTP egress point (`Gateway`) with bearer attachment and
//!   central 401 handling
//! - the session provider (`Session`) with login/logout and the
//!   authorization predicate surface
//! - route guarding and role-filtered navigation
//!
//! The client is a **thin shell** around the backend API: no retries, no
//! request dedup, no response caching.

pub mod gateway;
pub mod guard;
pub mod nav;
pub mod session;
pub mod store;

pub use gateway::{Gateway, GatewayConfig, ReqwestTransport, Transport, TransportError};
pub use guard::{RouteDecision, RouteGuard};
pub use nav::{NavEntry, NavItem, NavTarget, default_navigation, filter_navigation};
pub use session::{LoginOutcome, Session};
pub use store::{CredentialStore, FileStore, MemoryStore, StoreError};
