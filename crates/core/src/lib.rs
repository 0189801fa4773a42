//! `staffhub-core` — shared client foundation building blocks.
//!
//! This crate contains the primitives every client crate depends on: the
//! error taxonomy, strongly-typed identifiers, and the REST response
//! envelopes the backend speaks. No IO, no HTTP.

pub mod envelope;
pub mod error;
pub mod id;

pub use envelope::{ApiEnvelope, PageOrList, Paginated, SignInData};
pub use error::{ClientError, ClientResult};
pub use id::UserId;
