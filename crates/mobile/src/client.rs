//! The mobile client: store + session + gateway collapsed into one object.
//!
//! The web client splits these concerns across three types because the whole
//! UI tree consumes them; on mobile a single handle owns the vault and the
//! request path. The authorization contract is identical: per-request bearer
//! lookup, 401 clears the vault exactly once and the error still reaches the
//! caller, timeout stays distinct from authorization failure.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use staffhub_auth::UserProfile;
use staffhub_client::gateway::{
    Method, ReqwestTransport, Transport, TransportError, TransportRequest,
};
use staffhub_client::session::LoginOutcome;
use staffhub_core::{ApiEnvelope, ClientError, ClientResult, SignInData};

use crate::vault::SecureVault;

/// Mobile client configuration.
#[derive(Debug, Clone)]
pub struct MobileConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl MobileConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceKind {
    ClockIn,
    ClockOut,
}

/// The attendance event the backend records for a clock-in/out call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceEvent {
    pub kind: AttendanceKind,
    pub recorded_at: DateTime<Utc>,
}

/// A leave request as submitted from the mobile client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRequest {
    pub leave_type: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Serialize)]
struct SignInRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Handle to the mobile session and its domain calls.
pub struct MobileClient {
    config: MobileConfig,
    vault: Arc<dyn SecureVault>,
    transport: Arc<dyn Transport>,
    login_in_flight: AtomicBool,
}

impl MobileClient {
    /// Production client over reqwest.
    pub fn new(config: MobileConfig, vault: Arc<dyn SecureVault>) -> ClientResult<Self> {
        let transport = Arc::new(ReqwestTransport::new(config.timeout)?);
        Ok(Self::with_transport(config, vault, transport))
    }

    /// Client over an injected transport (tests).
    pub fn with_transport(
        config: MobileConfig,
        vault: Arc<dyn SecureVault>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            config,
            vault,
            transport,
            login_in_flight: AtomicBool::new(false),
        }
    }

    /// The authentication predicate: a credential is in the vault.
    pub fn is_authenticated(&self) -> bool {
        self.vault.has_credential()
    }

    /// The cached profile; role semantics are shared with the web client.
    pub fn current_profile(&self) -> Option<UserProfile> {
        self.vault.profile()
    }

    /// Authenticate and persist the credential in the vault.
    ///
    /// Same double-submit contract as the web session: a second call while
    /// one is in flight observes [`LoginOutcome::AlreadyPending`].
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<LoginOutcome> {
        if self.login_in_flight.swap(true, Ordering::SeqCst) {
            return Ok(LoginOutcome::AlreadyPending);
        }
        let result = self.login_inner(email, password).await;
        self.login_in_flight.store(false, Ordering::SeqCst);
        result
    }

    async fn login_inner(&self, email: &str, password: &str) -> ClientResult<LoginOutcome> {
        let request = SignInRequest { email, password };

        let envelope: ApiEnvelope<SignInData<UserProfile>> =
            match self.execute(Method::Post, "/auth/sign-in", Some(to_body(&request)?)).await {
                Ok(envelope) => envelope,
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

        let Some(data) = envelope.data else {
            return Ok(LoginOutcome::InvalidCredentials(envelope.display_message()));
        };

        self.vault
            .store(&data.token, &data.user)
            .map_err(|e| ClientError::storage(e.to_string()))?;

        tracing::info!(user = %data.user.id, role = %data.user.role, "mobile login succeeded");
        Ok(LoginOutcome::Success(data.user))
    }

    /// Sign out: best-effort backend call, then unconditional vault clear.
    pub async fn logout(&self) {
        if let Err(err) = self
            .execute::<serde_json::Value>(Method::Post, "/auth/sign-out", None)
            .await
        {
            tracing::warn!(error = %err, "sign-out call failed; proceeding with local logout");
        }
        if let Err(err) = self.vault.clear() {
            tracing::warn!(error = %err, "failed to clear vault on logout");
        }
    }

    /// Record the start of the working day.
    pub async fn clock_in(&self) -> ClientResult<AttendanceEvent> {
        self.attendance("/attendance/clock-in").await
    }

    /// Record the end of the working day.
    pub async fn clock_out(&self) -> ClientResult<AttendanceEvent> {
        self.attendance("/attendance/clock-out").await
    }

    async fn attendance(&self, path: &str) -> ClientResult<AttendanceEvent> {
        let envelope: ApiEnvelope<AttendanceEvent> = self
            .execute(Method::Post, path, Some(serde_json::json!({})))
            .await?;
        envelope
            .data
            .ok_or_else(|| ClientError::decode("attendance response carried no event"))
    }

    /// Submit a leave request.
    pub async fn submit_leave_request(&self, request: &LeaveRequest) -> ClientResult<()> {
        let _: ApiEnvelope<serde_json::Value> = self
            .execute(Method::Post, "/leave-requests", Some(to_body(request)?))
            .await?;
        Ok(())
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> ClientResult<T> {
        let url = format!("{}/{}", self.config.base_url, path.trim_start_matches('/'));
        let request_id = Uuid::now_v7();

        let mut headers = vec![
            ("content-type".to_string(), "application/json".to_string()),
            ("accept".to_string(), "application/json".to_string()),
            ("x-request-id".to_string(), request_id.to_string()),
        ];

        // Per-request token lookup, exactly as the web gateway does it.
        if let Some(token) = self.vault.token() {
            headers.push(("authorization".to_string(), format!("Bearer {token}")));
        }

        tracing::debug!(method = method.as_str(), %url, %request_id, "dispatching mobile request");

        let response = self
            .transport
            .send(TransportRequest {
                method,
                url,
                headers,
                body,
            })
            .await
            .map_err(|err| match err {
                TransportError::Timeout => ClientError::Timeout,
                TransportError::Network(msg) => ClientError::transport(msg),
            })?;

        if response.status == 401 {
            if let Err(err) = self.vault.clear() {
                tracing::warn!(error = %err, "failed to clear vault after 401");
            }
            tracing::warn!(%request_id, "authorization failure; mobile session cleared");
            return Err(ClientError::Unauthorized);
        }

        if !(200..300).contains(&response.status) {
            let message = serde_json::from_str::<ErrorBody>(&response.body)
                .ok()
                .and_then(|b| b.message)
                .unwrap_or_else(|| format!("http status {}", response.status));
            return Err(ClientError::api(response.status, message));
        }

        let text = if response.body.trim().is_empty() {
            "null"
        } else {
            response.body.as_str()
        };
        serde_json::from_str(text).map_err(|e| ClientError::decode(e.to_string()))
    }
}

fn to_body(body: &impl Serialize) -> ClientResult<serde_json::Value> {
    serde_json::to_value(body).map_err(|e| ClientError::decode(e.to_string()))
}
