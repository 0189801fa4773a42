//! Secure credential vault (platform keystore stand-in).
//!
//! On device builds this maps onto the platform keystore; the file-backed
//! implementation here is the development-host stand-in, locked down to
//! owner-only permissions. The contract mirrors the web client's credential
//! store: token and profile are one record, cleared together, and readers
//! degrade to "absent" on corrupt content.

use std::path::PathBuf;
use std::sync::{PoisonError, RwLock};

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use staffhub_auth::UserProfile;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct VaultRecord {
    token: String,
    profile: UserProfile,
    saved_at: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum VaultError {
    #[error("vault io failure: {0}")]
    Io(String),
    #[error("failed to serialize credential: {0}")]
    Serialize(String),
}

/// Secure storage for the mobile session credential.
pub trait SecureVault: Send + Sync {
    /// Persist token and profile together, overwriting any prior values.
    fn store(&self, token: &str, profile: &UserProfile) -> Result<(), VaultError>;

    /// Remove both values unconditionally. Ok when nothing is stored.
    fn clear(&self) -> Result<(), VaultError>;

    fn token(&self) -> Option<String>;

    /// `None` on absent or corrupt data; never errors outward.
    fn profile(&self) -> Option<UserProfile>;

    fn has_credential(&self) -> bool {
        self.token().is_some()
    }
}

/// Owner-only JSON file at `{data_dir}/staffhub-mobile/vault.json`.
#[derive(Debug, Clone)]
pub struct FileVault {
    path: PathBuf,
}

impl FileVault {
    pub fn new() -> anyhow::Result<Self> {
        let base = dirs::data_dir()
            .context("failed to resolve OS app data directory")?;
        let mut path = base;
        path.push("staffhub-mobile");
        path.push("vault.json");
        Ok(Self { path })
    }

    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read(&self) -> Option<VaultRecord> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return None,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "failed to read vault file");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(record) => Some(record),
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "vault record is malformed; treating as absent");
                None
            }
        }
    }

    #[cfg(unix)]
    fn restrict_permissions(path: &std::path::Path) -> Result<(), VaultError> {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
            .map_err(|e| VaultError::Io(e.to_string()))
    }

    #[cfg(not(unix))]
    fn restrict_permissions(_path: &std::path::Path) -> Result<(), VaultError> {
        Ok(())
    }
}

impl SecureVault for FileVault {
    fn store(&self, token: &str, profile: &UserProfile) -> Result<(), VaultError> {
        let record = VaultRecord {
            token: token.to_string(),
            profile: profile.clone(),
            saved_at: Utc::now(),
        };
        let payload =
            serde_json::to_string(&record).map_err(|e| VaultError::Serialize(e.to_string()))?;

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| VaultError::Io(e.to_string()))?;
        }

        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, payload).map_err(|e| VaultError::Io(e.to_string()))?;
        Self::restrict_permissions(&tmp)?;
        std::fs::rename(&tmp, &self.path).map_err(|e| VaultError::Io(e.to_string()))?;
        Ok(())
    }

    fn clear(&self) -> Result<(), VaultError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(VaultError::Io(err.to_string())),
        }
    }

    fn token(&self) -> Option<String> {
        self.read().map(|r| r.token)
    }

    fn profile(&self) -> Option<UserProfile> {
        self.read().map(|r| r.profile)
    }
}

/// In-memory vault for tests.
#[derive(Debug, Default)]
pub struct MemoryVault {
    inner: RwLock<Option<VaultRecord>>,
}

impl MemoryVault {
    pub fn new() -> Self {
        Self::default()
    }

    fn snapshot(&self) -> Option<VaultRecord> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl SecureVault for MemoryVault {
    fn store(&self, token: &str, profile: &UserProfile) -> Result<(), VaultError> {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Some(VaultRecord {
            token: token.to_string(),
            profile: profile.clone(),
            saved_at: Utc::now(),
        });
        Ok(())
    }

    fn clear(&self) -> Result<(), VaultError> {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        *guard = None;
        Ok(())
    }

    fn token(&self) -> Option<String> {
        self.snapshot().map(|r| r.token)
    }

    fn profile(&self) -> Option<UserProfile> {
        self.snapshot().map(|r| r.profile)
    }
}

#[cfg(test)]
mod tests {
    use staffhub_auth::Role;
    use staffhub_core::UserId;

    use super::*;

    fn profile() -> UserProfile {
        UserProfile::new(UserId::new(11), "Vault User", Role::StaffMember)
    }

    fn temp_path(tag: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("staffhub-vault-{tag}-{}.json", uuid::Uuid::now_v7()));
        path
    }

    #[test]
    fn store_then_read_round_trips() {
        let vault = FileVault::at_path(temp_path("roundtrip"));
        vault.store("device-tok", &profile()).unwrap();

        assert!(vault.has_credential());
        assert_eq!(vault.token().as_deref(), Some("device-tok"));
        assert_eq!(vault.profile(), Some(profile()));

        vault.clear().unwrap();
        assert!(!vault.has_credential());
    }

    #[test]
    fn clear_is_safe_on_empty_vault() {
        let vault = FileVault::at_path(temp_path("empty"));
        vault.clear().unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn vault_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let path = temp_path("perms");
        let vault = FileVault::at_path(&path);
        vault.store("tok", &profile()).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);

        vault.clear().unwrap();
    }

    #[test]
    fn corrupt_record_reads_as_absent() {
        let path = temp_path("corrupt");
        std::fs::write(&path, "garbage").unwrap();

        let vault = FileVault::at_path(&path);
        assert!(vault.profile().is_none());
        assert!(!vault.has_credential());

        std::fs::remove_file(&path).unwrap();
    }
}
