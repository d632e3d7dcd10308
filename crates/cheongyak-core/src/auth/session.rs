use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

const SESSION_FILE: &str = "session.json";

/// Lifetime assumed for tokens saved without an explicit expiry.
const DEFAULT_TOKEN_LIFETIME_HOURS: i64 = 24;

/// A saved bearer token and who it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionData {
    pub token: String,
    #[serde(default)]
    pub nickname: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl SessionData {
    pub fn new(token: String) -> Self {
        Self {
            token,
            nickname: None,
            created_at: Utc::now(),
            expires_at: None,
        }
    }

    pub fn expiry(&self) -> DateTime<Utc> {
        self.expires_at
            .unwrap_or_else(|| self.created_at + Duration::hours(DEFAULT_TOKEN_LIFETIME_HOURS))
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expiry()
    }

    /// Minutes left before the token lapses, never negative.
    pub fn minutes_until_expiry(&self) -> i64 {
        (self.expiry() - Utc::now()).num_minutes().max(0)
    }
}

/// `session.json` in the cache directory.
pub struct Session {
    path: PathBuf,
}

impl Session {
    pub fn new(cache_dir: &Path) -> Self {
        Self {
            path: cache_dir.join(SESSION_FILE),
        }
    }

    /// Read the saved session. A missing or expired one reads as `None`.
    pub fn load(&self) -> Result<Option<SessionData>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents =
            std::fs::read_to_string(&self.path).context("Failed to read session file")?;
        let data: SessionData =
            serde_json::from_str(&contents).context("Failed to parse session file")?;

        if data.is_expired() {
            debug!(expired_at = %data.expiry(), "Saved session has expired");
            return Ok(None);
        }
        Ok(Some(data))
    }

    pub fn save(&self, data: &SessionData) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(data)?)
            .context("Failed to write session file")
    }

    /// Forget the saved session. Clearing twice is fine.
    pub fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => {
                Err(e).context("Failed to remove session file")
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_expiry() {
        let data = SessionData::new("token".to_string());
        assert!(!data.is_expired());
        assert!(data.minutes_until_expiry() > 60 * 23);

        let mut old = SessionData::new("token".to_string());
        old.created_at = Utc::now() - Duration::hours(25);
        assert!(old.is_expired());
        assert_eq!(old.minutes_until_expiry(), 0);
    }

    #[test]
    fn test_explicit_expiry_wins() {
        let mut data = SessionData::new("token".to_string());
        data.expires_at = Some(Utc::now() - Duration::minutes(1));
        assert!(data.is_expired());
    }

    #[test]
    fn test_save_load_clear() {
        let dir = tempfile::tempdir().unwrap();
        let session = Session::new(dir.path());
        assert!(session.load().unwrap().is_none());

        let mut data = SessionData::new("abc".to_string());
        data.nickname = Some("청약왕".to_string());
        session.save(&data).unwrap();

        let reloaded = Session::new(dir.path()).load().unwrap().unwrap();
        assert_eq!(reloaded.token, "abc");
        assert_eq!(reloaded.nickname.as_deref(), Some("청약왕"));

        session.clear().unwrap();
        assert!(session.load().unwrap().is_none());
        session.clear().unwrap();
    }

    #[test]
    fn test_expired_session_not_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let session = Session::new(dir.path());
        let mut data = SessionData::new("stale".to_string());
        data.expires_at = Some(Utc::now() - Duration::hours(1));
        session.save(&data).unwrap();

        assert!(session.load().unwrap().is_none());
    }

    #[test]
    fn test_corrupt_session_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(SESSION_FILE), "not json").unwrap();
        assert!(Session::new(dir.path()).load().is_err());
    }
}
