//! Session provider — the single source of truth for "who is logged in".
//!
//! Constructed once at application start and injected into the view layer;
//! there is no ambient global. Authentication is answered by the credential
//! store ("token present"), while the cached profile only supplies
//! role/permission data for authorization decisions.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use serde::Serialize;

use staffhub_auth::{Permission, Role, UserProfile};
use staffhub_core::{ApiEnvelope, ClientError, ClientResult, SignInData};

use crate::gateway::Gateway;
use crate::store::CredentialStore;

/// Outcome of a login attempt.
///
/// Expected authentication failures are values, not errors; only
/// transport-level faults surface as `Err`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    Success(UserProfile),
    /// Backend rejected the credentials; the message is displayable as-is.
    InvalidCredentials(String),
    /// A login is already in flight; this call changed nothing.
    AlreadyPending,
}

#[derive(Debug, Serialize)]
struct SignInRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// Process-wide session state.
pub struct Session {
    store: Arc<dyn CredentialStore>,
    gateway: Gateway,
    current: RwLock<Option<UserProfile>>,
    loading: AtomicBool,
    login_in_flight: AtomicBool,
    login_seq: AtomicU64,
}

impl Session {
    pub fn new(store: Arc<dyn CredentialStore>, gateway: Gateway) -> Self {
        Self {
            store,
            gateway,
            current: RwLock::new(None),
            loading: AtomicBool::new(true),
            login_in_flight: AtomicBool::new(false),
            login_seq: AtomicU64::new(0),
        }
    }

    /// The shared gateway; every resource call in the application must go
    /// through it to inherit token attachment and 401 handling.
    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    /// Adopt any persisted session without contacting the backend.
    ///
    /// Trust boundary: a stale or tampered locally-cached profile is trusted
    /// here and only evicted when its first authenticated call comes back
    /// 401 (the gateway clears the store centrally). This mirrors the
    /// offline-friendly behavior of both shipped clients; see DESIGN.md.
    pub fn initialize(&self) {
        if self.store.has_credential() {
            if let Some(profile) = self.store.profile() {
                tracing::debug!(user = %profile.id, role = %profile.role, "resuming persisted session");
                *self.write_current() = Some(profile);
            }
        }
        self.loading.store(false, Ordering::SeqCst);
    }

    /// True until [`Session::initialize`] has run.
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    /// Authenticate against the backend.
    ///
    /// Double-submit guard: while one login is in flight, further calls
    /// return [`LoginOutcome::AlreadyPending`] without issuing a request, so
    /// two rapid submissions can never interleave into divergent state.
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<LoginOutcome> {
        if self.login_in_flight.swap(true, Ordering::SeqCst) {
            return Ok(LoginOutcome::AlreadyPending);
        }

        let seq = self.login_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let result = self.login_inner(email, password, seq).await;
        self.login_in_flight.store(false, Ordering::SeqCst);
        result
    }

    async fn login_inner(
        &self,
        email: &str,
        password: &str,
        seq: u64,
    ) -> ClientResult<LoginOutcome> {
        let request = SignInRequest { email, password };

        let envelope: ApiEnvelope<SignInData<UserProfile>> =
            match self.gateway.post("/auth/sign-in", &request).await {
                Ok(envelope) => envelope,
                // A 401 at sign-in is "bad credentials", not a lost session;
                // the gateway's clear() was a no-op on whatever was stored.
                Err(ClientError::Unauthorized) => {
                    return Ok(LoginOutcome::InvalidCredentials(
                        "invalid email or password".to_string(),
                    ));
                }
                Err(ClientError::Api { status, message }) if status == 400 || status == 422 => {
                    return Ok(LoginOutcome::InvalidCredentials(message));
                }
                Err(other) => return Err(other),
            };

        // The payload is authoritative: data present means success.
        let Some(data) = envelope.data else {
            return Ok(LoginOutcome::InvalidCredentials(envelope.display_message()));
        };

        // A newer attempt has superseded this one; discard without touching
        // state.
        if self.login_seq.load(Ordering::SeqCst) != seq {
            return Ok(LoginOutcome::AlreadyPending);
        }

        // Persist first, then adopt: no observable moment with a token but
        // no profile or vice versa.
        self.store
            .save(&data.token, &data.user)
            .map_err(|e| ClientError::storage(e.to_string()))?;
        *self.write_current() = Some(data.user.clone());

        tracing::info!(user = %data.user.id, role = %data.user.role, "login succeeded");
        Ok(LoginOutcome::Success(data.user))
    }

    /// Sign out: best-effort backend call, then unconditional local clear.
    pub async fn logout(&self) {
        if let Err(err) = self
            .gateway
            .post::<serde_json::Value, _>("/auth/sign-out", &serde_json::json!({}))
            .await
        {
            tracing::warn!(error = %err, "sign-out call failed; proceeding with local logout");
        }

        if let Err(err) = self.store.clear() {
            tracing::warn!(error = %err, "failed to clear credential store on logout");
        }
        *self.write_current() = None;
    }

    /// Drop in-memory state without touching the persisted credential
    /// (application shutdown; the session resumes on next launch).
    pub fn dispose(&self) {
        *self.write_current() = None;
        self.loading.store(true, Ordering::SeqCst);
    }

    /// The authentication predicate: a credential is present.
    pub fn is_authenticated(&self) -> bool {
        self.store.has_credential()
    }

    pub fn current_profile(&self) -> Option<UserProfile> {
        self.read_current().clone()
    }

    // Authorization predicates. All false when no user is set.

    pub fn has_permission(&self, permission: &Permission) -> bool {
        self.read_current()
            .as_ref()
            .is_some_and(|p| p.has_permission(permission))
    }

    pub fn has_any_permission(&self, permissions: &[Permission]) -> bool {
        self.read_current()
            .as_ref()
            .is_some_and(|p| p.has_any_permission(permissions))
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.read_current().as_ref().is_some_and(|p| p.has_role(role))
    }

    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        self.read_current()
            .as_ref()
            .is_some_and(|p| p.has_any_role(roles))
    }

    pub fn is_admin(&self) -> bool {
        self.read_current().as_ref().is_some_and(|p| p.is_admin())
    }

    pub fn is_hr(&self) -> bool {
        self.read_current().as_ref().is_some_and(|p| p.is_hr())
    }

    pub fn is_manager(&self) -> bool {
        self.read_current().as_ref().is_some_and(|p| p.is_manager())
    }

    fn read_current(&self) -> std::sync::RwLockReadGuard<'_, Option<UserProfile>> {
        self.current.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_current(&self) -> std::sync::RwLockWriteGuard<'_, Option<UserProfile>> {
        self.current.write().unwrap_or_else(PoisonError::into_inner)
    }
}
