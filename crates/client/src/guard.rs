//! Route guarding for the protected region of the UI.

use crate::session::Session;

/// What the router should do with the current navigation.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// Render the protected subtree.
    Allow,
    /// Redirect to the login view.
    RedirectToLogin,
}

/// Gate in front of protected views.
///
/// Must be consulted on **every** navigation, not just at mount: logout (or
/// a gateway-triggered session clear) can happen while a protected view is
/// displayed, and the next evaluation has to reflect it.
#[derive(Debug, Default, Copy, Clone)]
pub struct RouteGuard;

impl RouteGuard {
    pub fn new() -> Self {
        Self
    }

    pub fn evaluate(&self, session: &Session) -> RouteDecision {
        if session.is_authenticated() {
            RouteDecision::Allow
        } else {
            RouteDecision::RedirectToLogin
        }
    }
}
