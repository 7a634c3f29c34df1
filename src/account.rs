//! Durable mock user record.
//!
//! A single JSON record lives at `<root>/profile.json`, read once at startup
//! and written on login/signup. Logout removes it. This is the only state
//! that survives a restart; conversations and alerts are in-memory only.

use crate::error::{AssistantError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Role attached to the stored record, driving which dashboard the frontend
/// shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// The elderly user.
    Elder,
    /// A caregiver.
    Caregiver,
    /// An administrator.
    Admin,
}

/// The stored user record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    /// Record id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Dashboard role.
    pub role: UserRole,
}

/// File-backed store for the user record.
#[derive(Debug, Clone)]
pub struct AccountStore {
    root: PathBuf,
}

impl AccountStore {
    /// A store rooted at the given directory.
    #[must_use]
    pub fn new(root_dir: &Path) -> Self {
        Self {
            root: root_dir.to_path_buf(),
        }
    }

    /// Returns the default store root: `~/.elderease`.
    #[must_use]
    pub fn default_root() -> PathBuf {
        if let Some(home) = std::env::var_os("HOME") {
            PathBuf::from(home).join(".elderease")
        } else {
            PathBuf::from("/tmp/.elderease")
        }
    }

    fn profile_path(&self) -> PathBuf {
        self.root.join("profile.json")
    }

    /// Read the stored record, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing record cannot be read or parsed.
    pub fn load(&self) -> Result<Option<UserRecord>> {
        let path = self.profile_path();
        if !path.exists() {
            return Ok(None);
        }
        let raw = std::fs::read_to_string(&path)?;
        let record: UserRecord = serde_json::from_str(&raw)
            .map_err(|e| AssistantError::Account(format!("invalid stored profile: {e}")))?;
        Ok(Some(record))
    }

    /// Mock login: derives the display name from the email local part and
    /// stores an elder-role record.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be written.
    pub fn login(&self, email: &str) -> Result<UserRecord> {
        let name = email.split('@').next().unwrap_or(email).to_owned();
        let record = UserRecord {
            id: "1".to_owned(),
            name,
            email: email.to_owned(),
            role: UserRole::Elder,
        };
        self.save(&record)?;
        Ok(record)
    }

    /// Mock signup: mints a fresh id and stores the given details.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be written.
    pub fn signup(&self, name: &str, email: &str, role: UserRole) -> Result<UserRecord> {
        let record = UserRecord {
            id: Uuid::new_v4().to_string(),
            name: name.to_owned(),
            email: email.to_owned(),
            role,
        };
        self.save(&record)?;
        Ok(record)
    }

    /// Remove the stored record, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the record exists but cannot be removed.
    pub fn logout(&self) -> Result<()> {
        let path = self.profile_path();
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }

    fn save(&self, record: &UserRecord) -> Result<()> {
        std::fs::create_dir_all(&self.root)?;
        let data = serde_json::to_string_pretty(record)
            .map_err(|e| AssistantError::Account(format!("failed to serialize profile: {e}")))?;
        std::fs::write(self.profile_path(), data)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    #[test]
    fn empty_store_loads_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = AccountStore::new(dir.path());
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn login_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = AccountStore::new(dir.path());

        let record = store.login("ruth@example.com").unwrap();
        assert_eq!(record.name, "ruth");
        assert_eq!(record.role, UserRole::Elder);

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.email, "ruth@example.com");
        assert_eq!(loaded.name, "ruth");
    }

    #[test]
    fn signup_mints_distinct_ids() {
        let dir = tempfile::tempdir().unwrap();
        let store = AccountStore::new(dir.path());

        let first = store.signup("Ruth", "ruth@example.com", UserRole::Elder).unwrap();
        let second = store
            .signup("Mary", "mary@example.com", UserRole::Caregiver)
            .unwrap();
        assert_ne!(first.id, second.id);

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.name, "Mary");
        assert_eq!(loaded.role, UserRole::Caregiver);
    }

    #[test]
    fn logout_removes_the_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = AccountStore::new(dir.path());

        store.login("ruth@example.com").unwrap();
        store.logout().unwrap();
        assert!(store.load().unwrap().is_none());

        // Logging out twice is fine.
        store.logout().unwrap();
    }

    #[test]
    fn corrupt_record_errors() {
        let dir = tempfile::tempdir().unwrap();
        let store = AccountStore::new(dir.path());
        std::fs::write(dir.path().join("profile.json"), "not json").unwrap();
        assert!(store.load().is_err());
    }

    #[test]
    fn role_serializes_lowercase() {
        let json = serde_json::to_string(&UserRole::Caregiver).unwrap();
        assert_eq!(json, "\"caregiver\"");
    }
}
