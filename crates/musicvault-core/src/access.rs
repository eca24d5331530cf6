//! Shared-secret access gate.
//!
//! One access code guards the whole archive. A successful login leaves a
//! session file next to the database; logging out removes it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

const SESSION_FILE: &str = "session.toml";

/// Proof that the access code was entered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub authenticated_at: DateTime<Utc>,
}

impl Session {
    /// Where the session lives inside a data directory.
    pub fn path(data_dir: &Path) -> PathBuf {
        data_dir.join(SESSION_FILE)
    }

    pub fn save(&self, data_dir: &Path) -> Result<()> {
        std::fs::create_dir_all(data_dir)?;
        let text = toml::to_string(self).map_err(|e| Error::InvalidData(e.to_string()))?;
        std::fs::write(Self::path(data_dir), text)?;
        Ok(())
    }

    /// Read the saved session, if any. An unreadable file counts as none.
    pub fn load(data_dir: &Path) -> Option<Self> {
        let text = std::fs::read_to_string(Self::path(data_dir)).ok()?;
        match toml::from_str(&text) {
            Ok(session) => Some(session),
            Err(e) => {
                log::warn!("Ignoring unreadable session file: {}", e);
                None
            }
        }
    }

    /// Remove the saved session. Returns whether one existed.
    pub fn clear(data_dir: &Path) -> Result<bool> {
        match std::fs::remove_file(Self::path(data_dir)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

/// Checks entered codes against the configured secret.
#[derive(Clone)]
pub struct AccessGate {
    secret: String,
}

impl fmt::Debug for AccessGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessGate").finish_non_exhaustive()
    }
}

impl AccessGate {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Exact comparison; surrounding whitespace in the entered code is ignored.
    pub fn login(&self, code: &str) -> Result<Session> {
        if code.trim() == self.secret {
            log::info!("Access granted");
            Ok(Session {
                authenticated_at: Utc::now(),
            })
        } else {
            log::warn!("Access denied: incorrect code");
            Err(Error::AccessDenied)
        }
    }

    /// Every screen except login requires a session.
    pub fn guard(session: Option<&Session>) -> Result<&Session> {
        session.ok_or(Error::AccessDenied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_with_correct_code() {
        let gate = AccessGate::new("raag");
        assert!(gate.login("raag").is_ok());
        assert!(gate.login("  raag\n").is_ok());
    }

    #[test]
    fn test_login_with_wrong_code() {
        let gate = AccessGate::new("raag");
        assert!(matches!(gate.login("Raag"), Err(Error::AccessDenied)));
        assert!(matches!(gate.login(""), Err(Error::AccessDenied)));
    }

    #[test]
    fn test_guard() {
        let session = Session {
            authenticated_at: Utc::now(),
        };
        assert!(AccessGate::guard(Some(&session)).is_ok());
        assert!(matches!(AccessGate::guard(None), Err(Error::AccessDenied)));
    }

    #[test]
    fn test_debug_hides_secret() {
        let gate = AccessGate::new("hidden-code");
        assert!(!format!("{gate:?}").contains("hidden-code"));
    }

    #[test]
    fn test_session_save_load_clear() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Session::load(dir.path()).is_none());

        let session = AccessGate::new("x").login("x").unwrap();
        session.save(dir.path()).unwrap();
        assert_eq!(Session::load(dir.path()), Some(session));

        assert!(Session::clear(dir.path()).unwrap());
        assert!(!Session::clear(dir.path()).unwrap());
        assert!(Session::load(dir.path()).is_none());
    }

    #[test]
    fn test_corrupt_session_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(Session::path(dir.path()), "authenticated_at = 7").unwrap();
        assert!(Session::load(dir.path()).is_none());
    }
}
