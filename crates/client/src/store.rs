//! Durable credential storage (the browser local-storage analog).

use std::path::PathBuf;
use std::sync::{PoisonError, RwLock};

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use staffhub_auth::UserProfile;

/// The persisted record: token and profile live in **one** document so they
/// can never be saved or cleared independently of each other.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredCredential {
    pub token: String,
    pub profile: UserProfile,
    pub saved_at: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage io failure: {0}")]
    Io(String),
    #[error("failed to serialize credential: {0}")]
    Serialize(String),
}

/// Client-side credential storage.
///
/// Readers degrade, never fail: absent or corrupt content reads as "no
/// credential". Only writes can error.
pub trait CredentialStore: Send + Sync {
    /// Persist token and profile together, overwriting any prior values.
    fn save(&self, token: &str, profile: &UserProfile) -> Result<(), StoreError>;

    /// Remove both values unconditionally. Ok when nothing is stored.
    fn clear(&self) -> Result<(), StoreError>;

    /// The stored bearer token, if any.
    fn token(&self) -> Option<String>;

    /// The stored profile; `None` on absent **or corrupt** data.
    fn profile(&self) -> Option<UserProfile>;

    /// True iff a token is present, independent of profile presence.
    fn has_credential(&self) -> bool {
        self.token().is_some()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File-backed store
// ─────────────────────────────────────────────────────────────────────────────

/// JSON-file-backed store at `{data_dir}/staffhub/session.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Store at the default OS data-dir location.
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {
            path: session_file_path()?,
        })
    }

    /// Store at an explicit path (tests, embedding).
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read(&self) -> Option<StoredCredential> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return None,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "failed to read credential file");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(cred) => Some(cred),
            Err(err) => {
                // Corrupt content is treated as absent, not fatal.
                tracing::warn!(path = %self.path.display(), error = %err, "stored credential is malformed; treating as absent");
                None
            }
        }
    }
}

impl CredentialStore for FileStore {
    fn save(&self, token: &str, profile: &UserProfile) -> Result<(), StoreError> {
        let record = StoredCredential {
            token: token.to_string(),
            profile: profile.clone(),
            saved_at: Utc::now(),
        };
        let payload =
            serde_json::to_string(&record).map_err(|e| StoreError::Serialize(e.to_string()))?;

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::Io(e.to_string()))?;
        }

        // Write-then-rename so a crash mid-write cannot leave a half-saved
        // record (token without profile or vice versa).
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, payload).map_err(|e| StoreError::Io(e.to_string()))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| StoreError::Io(e.to_string()))?;
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(StoreError::Io(err.to_string())),
        }
    }

    fn token(&self) -> Option<String> {
        self.read().map(|c| c.token)
    }

    fn profile(&self) -> Option<UserProfile> {
        self.read().map(|c| c.profile)
    }
}

/// Resolve `{data_dir}/staffhub/session.json`.
fn session_file_path() -> anyhow::Result<PathBuf> {
    let base = dirs::data_dir()
        .or_else(|| {
            dirs::home_dir().map(|mut h| {
                h.push(".local");
                h.push("share");
                h
            })
        })
        .context("failed to resolve OS app data directory")?;

    let mut path = base;
    path.push("staffhub");
    path.push("session.json");
    Ok(path)
}

// ─────────────────────────────────────────────────────────────────────────────
// In-memory store
// ─────────────────────────────────────────────────────────────────────────────

/// In-memory store for tests and short-lived embeddings.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Option<StoredCredential>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn snapshot(&self) -> Option<StoredCredential> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl CredentialStore for MemoryStore {
    fn save(&self, token: &str, profile: &UserProfile) -> Result<(), StoreError> {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Some(StoredCredential {
            token: token.to_string(),
            profile: profile.clone(),
            saved_at: Utc::now(),
        });
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        *guard = None;
        Ok(())
    }

    fn token(&self) -> Option<String> {
        self.snapshot().map(|c| c.token)
    }

    fn profile(&self) -> Option<UserProfile> {
        self.snapshot().map(|c| c.profile)
    }
}
