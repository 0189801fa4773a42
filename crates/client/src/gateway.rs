//! The single HTTP egress point.
//!
//! Every backend call in the application goes through [`Gateway`], which is
//! what makes the two cross-cutting guarantees hold everywhere:
//!
//! 1. the current bearer token is looked up from the credential store **per
//!    request** (login/logout can happen between any two calls), and
//! 2. a 401-class response clears the stored credential before the error
//!    reaches the caller, so any page's failed request invalidates the whole
//!    session.
//!
//! The gateway does not retry, deduplicate, or cache.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use uuid::Uuid;

use staffhub_core::{ClientError, ClientResult};

use crate::store::CredentialStore;

/// Gateway configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Base URL without trailing slash, e.g. `https://api.example.com/v1`.
    pub base_url: String,
    /// Bound on every request; a call past this is rejected, never hung.
    pub timeout: Duration,
}

impl GatewayConfig {
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

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

/// A request as handed to the transport.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

impl TransportRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A response as returned by the transport. Body is raw text; the gateway
/// owns decoding.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,
    #[error("network error: {0}")]
    Network(String),
}

/// Wire-level send. Production uses [`ReqwestTransport`]; tests inject
/// fakes so no network is involved.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError>;
}

/// `reqwest`-backed transport with the configured timeout and JSON defaults.
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> ClientResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::transport(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut req = self.client.request(method, &request.url);
        for (name, value) in &request.headers {
            req = req.header(name, value);
        }
        if let Some(body) = &request.body {
            req = req.json(body);
        }

        let resp = req.send().await.map_err(|err| {
            if err.is_timeout() {
                TransportError::Timeout
            } else {
                TransportError::Network(err.to_string())
            }
        })?;

        let status = resp.status().as_u16();
        let body = resp.text().await.map_err(|err| {
            if err.is_timeout() {
                TransportError::Timeout
            } else {
                TransportError::Network(err.to_string())
            }
        })?;

        Ok(TransportResponse { status, body })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Gateway
// ─────────────────────────────────────────────────────────────────────────────

/// Error body shape the backend uses for non-2xx responses.
#[derive(Debug, serde::Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// The application's single HTTP client.
#[derive(Clone)]
pub struct Gateway {
    config: GatewayConfig,
    transport: Arc<dyn Transport>,
    store: Arc<dyn CredentialStore>,
}

impl Gateway {
    /// Production gateway over reqwest.
    pub fn new(config: GatewayConfig, store: Arc<dyn CredentialStore>) -> ClientResult<Self> {
        let transport = Arc::new(ReqwestTransport::new(config.timeout)?);
        Ok(Self::with_transport(config, store, transport))
    }

    /// Gateway over an injected transport (tests, instrumentation).
    pub fn with_transport(
        config: GatewayConfig,
        store: Arc<dyn CredentialStore>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            config,
            transport,
            store,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.execute(Method::Get, path, None).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.execute(Method::Post, path, Some(to_body(body)?)).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.execute(Method::Put, path, Some(to_body(body)?)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.execute(Method::Delete, path, None).await
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

        // Token lookup happens here, per request: login/logout may have
        // occurred since the previous call.
        if let Some(token) = self.store.token() {
            headers.push(("authorization".to_string(), format!("Bearer {token}")));
        }

        tracing::debug!(method = method.as_str(), %url, %request_id, "dispatching request");

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
            // Central session invalidation: clear token and profile together,
            // then still deliver the error to the original caller.
            if let Err(err) = self.store.clear() {
                tracing::warn!(error = %err, "failed to clear credential store after 401");
            }
            tracing::warn!(%request_id, "authorization failure; local session cleared");
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

fn to_body<B: Serialize + ?Sized>(body: &B) -> ClientResult<serde_json::Value> {
    serde_json::to_value(body).map_err(|e| ClientError::decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use staffhub_auth::{Role, UserProfile};
    use staffhub_core::UserId;

    use crate::store::MemoryStore;

    use super::*;

    /// Scripted transport: pops canned responses in order and records every
    /// request it saw.
    struct FakeTransport {
        responses: Mutex<Vec<Result<TransportResponse, TransportError>>>,
        seen: Mutex<Vec<TransportRequest>>,
    }

    impl FakeTransport {
        fn new(responses: Vec<Result<TransportResponse, TransportError>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn requests(&self) -> Vec<TransportRequest> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for FakeTransport {
        async fn send(
            &self,
            request: TransportRequest,
        ) -> Result<TransportResponse, TransportError> {
            self.seen.lock().unwrap().push(request);
            self.responses.lock().unwrap().remove(0)
        }
    }

    fn ok(body: &str) -> Result<TransportResponse, TransportError> {
        Ok(TransportResponse {
            status: 200,
            body: body.to_string(),
        })
    }

    fn status(code: u16, body: &str) -> Result<TransportResponse, TransportError> {
        Ok(TransportResponse {
            status: code,
            body: body.to_string(),
        })
    }

    fn store_with_token(token: &str) -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        let profile = UserProfile::new(UserId::new(1), "Test User", Role::StaffMember);
        store.save(token, &profile).unwrap();
        store
    }

    fn gateway(store: Arc<MemoryStore>, transport: Arc<FakeTransport>) -> Gateway {
        Gateway::with_transport(GatewayConfig::new("https://api.test"), store, transport)
    }

    #[tokio::test]
    async fn attaches_bearer_token_and_request_id() {
        let transport = FakeTransport::new(vec![ok("{}")]);
        let gw = gateway(store_with_token("tok-abc"), transport.clone());

        let _: serde_json::Value = gw.get("/staff-members").await.unwrap();

        let requests = transport.requests();
        assert_eq!(requests[0].header("authorization"), Some("Bearer tok-abc"));
        assert!(requests[0].header("x-request-id").is_some());
        assert_eq!(requests[0].url, "https://api.test/staff-members");
    }

    #[tokio::test]
    async fn token_is_looked_up_per_request() {
        let transport = FakeTransport::new(vec![ok("{}"), ok("{}")]);
        let store = store_with_token("first");
        let gw = gateway(store.clone(), transport.clone());

        let _: serde_json::Value = gw.get("/a").await.unwrap();

        let profile = UserProfile::new(UserId::new(2), "Second User", Role::Manager);
        store.save("second", &profile).unwrap();
        let _: serde_json::Value = gw.get("/b").await.unwrap();

        let requests = transport.requests();
        assert_eq!(requests[0].header("authorization"), Some("Bearer first"));
        assert_eq!(requests[1].header("authorization"), Some("Bearer second"));
    }

    #[tokio::test]
    async fn no_token_means_no_authorization_header() {
        let transport = FakeTransport::new(vec![ok("{}")]);
        let gw = gateway(Arc::new(MemoryStore::new()), transport.clone());

        let _: serde_json::Value = gw.get("/auth/sign-in").await.unwrap();
        assert_eq!(transport.requests()[0].header("authorization"), None);
    }

    /// Store wrapper that counts `clear` calls.
    struct CountingStore {
        inner: MemoryStore,
        clears: std::sync::atomic::AtomicUsize,
    }

    impl CountingStore {
        fn new(inner: MemoryStore) -> Self {
            Self {
                inner,
                clears: std::sync::atomic::AtomicUsize::new(0),
            }
        }
    }

    impl crate::store::CredentialStore for CountingStore {
        fn save(
            &self,
            token: &str,
            profile: &UserProfile,
        ) -> Result<(), crate::store::StoreError> {
            self.inner.save(token, profile)
        }

        fn clear(&self) -> Result<(), crate::store::StoreError> {
            self.clears
                .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            self.inner.clear()
        }

        fn token(&self) -> Option<String> {
            self.inner.token()
        }

        fn profile(&self) -> Option<UserProfile> {
            self.inner.profile()
        }
    }

    #[tokio::test]
    async fn unauthorized_clears_store_exactly_once() {
        let transport = FakeTransport::new(vec![status(401, "{}")]);
        let inner = MemoryStore::new();
        inner
            .save(
                "stale",
                &UserProfile::new(UserId::new(1), "Test User", Role::StaffMember),
            )
            .unwrap();
        let store = Arc::new(CountingStore::new(inner));
        let gw = Gateway::with_transport(
            GatewayConfig::new("https://api.test"),
            store.clone(),
            transport,
        );

        let err = gw.get::<serde_json::Value>("/timesheets").await.unwrap_err();

        assert_eq!(err, ClientError::Unauthorized);
        assert_eq!(store.clears.load(std::sync::atomic::Ordering::SeqCst), 1);
        assert!(!store.has_credential());
    }

    #[tokio::test]
    async fn unauthorized_clears_store_and_propagates() {
        let transport = FakeTransport::new(vec![status(401, r#"{"message": "expired"}"#)]);
        let store = store_with_token("stale");
        let gw = gateway(store.clone(), transport);

        let err = gw.get::<serde_json::Value>("/payroll").await.unwrap_err();

        assert_eq!(err, ClientError::Unauthorized);
        assert!(!store.has_credential());
        assert!(store.profile().is_none());
    }

    #[tokio::test]
    async fn timeout_is_distinct_from_unauthorized() {
        let transport = FakeTransport::new(vec![Err(TransportError::Timeout)]);
        let store = store_with_token("tok");
        let gw = gateway(store.clone(), transport);

        let err = gw.get::<serde_json::Value>("/slow").await.unwrap_err();

        assert_eq!(err, ClientError::Timeout);
        // Slow backend must not cost the user their session.
        assert!(store.has_credential());
    }

    #[tokio::test]
    async fn non_401_error_surfaces_backend_message() {
        let transport = FakeTransport::new(vec![status(422, r#"{"message": "name required"}"#)]);
        let gw = gateway(store_with_token("tok"), transport);

        let err = gw
            .post::<serde_json::Value, _>("/staff-members", &serde_json::json!({}))
            .await
            .unwrap_err();

        assert_eq!(err, ClientError::api(422, "name required"));
    }

    #[tokio::test]
    async fn empty_success_body_decodes_as_null() {
        let transport = FakeTransport::new(vec![ok("")]);
        let gw = gateway(store_with_token("tok"), transport);

        let value: serde_json::Value = gw.delete("/contracts/3").await.unwrap();
        assert!(value.is_null());
    }

    #[tokio::test]
    async fn malformed_success_body_is_a_decode_error() {
        let transport = FakeTransport::new(vec![ok("{nope")]);
        let gw = gateway(store_with_token("tok"), transport);

        let err = gw.get::<serde_json::Value>("/x").await.unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
    }
}
