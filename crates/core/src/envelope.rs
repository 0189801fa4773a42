//! REST response envelopes.
//!
//! The backend wraps most responses in `{success, message, data}` and lists
//! in a pagination envelope, but some endpoints return bare arrays. The
//! shapes here are tolerant of both so callers never branch on wire layout.

use serde::{Deserialize, Serialize};

/// Standard `{success, message, data}` envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiEnvelope<T> {
    /// Message to surface to a user, falling back to a generic one.
    pub fn display_message(&self) -> String {
        self.message
            .clone()
            .unwrap_or_else(|| "request failed".to_string())
    }
}

/// One page of a paginated collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub current_page: u32,
    #[serde(default)]
    pub last_page: u32,
    #[serde(default)]
    pub total: u64,
}

/// A collection endpoint response: either a pagination envelope or a bare
/// array.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PageOrList<T> {
    Page(Paginated<T>),
    List(Vec<T>),
}

impl<T> PageOrList<T> {
    pub fn into_items(self) -> Vec<T> {
        match self {
            PageOrList::Page(page) => page.data,
            PageOrList::List(items) => items,
        }
    }

    /// Last page number, if the endpoint paginates.
    pub fn last_page(&self) -> Option<u32> {
        match self {
            PageOrList::Page(page) => Some(page.last_page),
            PageOrList::List(_) => None,
        }
    }
}

/// Payload of a successful sign-in.
///
/// Backends disagree on the token field name (`token` vs `access_token`);
/// both are accepted. `U` is the user-profile shape, kept generic so this
/// crate stays independent of the authorization model.
#[derive(Debug, Clone, Deserialize)]
pub struct SignInData<U> {
    #[serde(alias = "access_token")]
    pub token: String,
    pub user: U,
}
