use anyhow::Result;
use thiserror::Error;

use crate::db::{Database, CURRENT_USER_KEY};

/// Login errors.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// Holds the identity of the logged-in user.
///
/// Any non-empty username/password pair is accepted. The username is persisted
/// so the session survives a restart.
pub struct SessionStore {
    db: Database,
    current_user: Option<String>,
}

impl SessionStore {
    /// Restore the session saved in `db`, if any.
    pub fn load(db: Database) -> Result<Self> {
        let current_user = db.get_item(CURRENT_USER_KEY)?;
        if let Some(ref user) = current_user {
            tracing::debug!("Restored session for {}", user);
        }
        Ok(Self { db, current_user })
    }

    pub fn log_in(&mut self, username: &str, password: &str) -> Result<(), AuthError> {
        if username.is_empty() || password.is_empty() {
            tracing::warn!("Rejected login with empty credentials");
            return Err(AuthError::InvalidCredentials);
        }

        self.db.set_item(CURRENT_USER_KEY, username)?;
        self.current_user = Some(username.to_string());
        tracing::info!("Logged in as {}", username);
        Ok(())
    }

    pub fn log_out(&mut self) -> Result<()> {
        self.db.remove_item(CURRENT_USER_KEY)?;
        if let Some(user) = self.current_user.take() {
            tracing::info!("Logged out {}", user);
        }
        Ok(())
    }

    pub fn current_user(&self) -> Option<&str> {
        self.current_user.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_user.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (SessionStore, Database) {
        let db = Database::open_memory().unwrap();
        db.migrate().unwrap();
        (SessionStore::load(db.clone()).unwrap(), db)
    }

    #[test]
    fn test_login_accepts_any_non_empty_pair() {
        let (mut session, db) = setup();
        session.log_in("alice", "pw").unwrap();
        assert!(session.is_authenticated());
        assert_eq!(session.current_user(), Some("alice"));
        assert_eq!(db.get_item(CURRENT_USER_KEY).unwrap().as_deref(), Some("alice"));
    }

    #[test]
    fn test_login_with_empty_password_has_no_side_effects() {
        let (mut session, db) = setup();
        let err = session.log_in("alice", "").unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
        assert!(!session.is_authenticated());
        assert!(db.get_item(CURRENT_USER_KEY).unwrap().is_none());
    }

    #[test]
    fn test_logout_clears_persisted_session() {
        let (mut session, db) = setup();
        session.log_in("alice", "pw").unwrap();
        session.log_out().unwrap();
        assert!(!session.is_authenticated());

        let restored = SessionStore::load(db).unwrap();
        assert!(restored.current_user().is_none());
    }
}
