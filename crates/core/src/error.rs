//! Client error model.

use thiserror::Error;

/// Result type used across the client layers.
pub type ClientResult<T> = Result<T, ClientError>;

/// Client-side error taxonomy.
///
/// The distinctions here are behavioral, not cosmetic:
/// - `Authentication` is recovered locally (shown to the user, no session
///   state changes).
/// - `Unauthorized` means the gateway has already cleared the local session
///   by the time the caller sees it.
/// - `Timeout` is distinct from both `Unauthorized` and `Transport`; callers
///   must not treat a slow backend as a lost session.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// Bad credentials at login. Surfaced to the user as a message.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// The backend rejected the session (401-class response). The local
    /// credential has been cleared before this error propagates.
    #[error("session is no longer authorized")]
    Unauthorized,

    /// The request exceeded the gateway's bounded timeout.
    #[error("request timed out")]
    Timeout,

    /// Network-level failure (DNS, connect, reset).
    #[error("transport failure: {0}")]
    Transport(String),

    /// Non-2xx, non-401 response from the backend.
    #[error("api error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The response body could not be decoded into the expected shape.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// Local credential storage failed.
    #[error("credential storage failure: {0}")]
    Storage(String),
}

impl ClientError {
    pub fn authentication(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// True for failures of the authentication/authorization kind, i.e. the
    /// ones that end with the user looking at the login view.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Authentication(_) | Self::Unauthorized)
    }
}
