//! services/tracker/src/app/auth.rs
//!
//! Registration, login, logout and startup restore. Usernames are plain
//! identifiers; there is no password.

use chrono::Utc;
use study_os_core::ports::PortError;
use study_os_core::{AppState, User};
use tracing::{info, warn};

use crate::app::state::{StudySession, Tracker};
use crate::error::TrackerError;

impl Tracker {
    /// Creates a new identity with a fresh state and makes it the active user.
    pub async fn register(&self, username: &str) -> Result<StudySession, TrackerError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(TrackerError::InvalidInput(
                "A username is required.".to_string(),
            ));
        }
        if self.store.find_user_by_username(username).await?.is_some() {
            return Err(PortError::Conflict(format!("username '{}'", username)).into());
        }

        let user = User::new(username);
        self.store.put_user(&user).await?;
        let state = AppState::new(user.clone());
        self.store.put_state(user.id, &state).await?;
        self.registry.set_active_user(user.id).await?;

        info!(user_id = %user.id, username = %user.username, "registered new user");
        Ok(StudySession::new(user, state))
    }

    /// Looks up `username`, stamps `last_login` and loads the user's state.
    /// Returns `None` for an unknown username.
    pub async fn authenticate(&self, username: &str) -> Result<Option<StudySession>, TrackerError> {
        let Some(mut user) = self.store.find_user_by_username(username.trim()).await? else {
            info!(username = %username.trim(), "login refused: unknown username");
            return Ok(None);
        };

        user.last_login = Utc::now();
        self.store.put_user(&user).await?;
        let session = self.load_session(user).await?;
        self.registry.set_active_user(session.user.id).await?;

        info!(user_id = %session.user.id, "user logged in");
        Ok(Some(session))
    }

    /// Like `authenticate`, with an unknown username reported as `AccessDenied`.
    pub async fn login(&self, username: &str) -> Result<StudySession, TrackerError> {
        self.authenticate(username)
            .await?
            .ok_or_else(|| TrackerError::AccessDenied(username.trim().to_string()))
    }

    /// Resumes the session recorded by the session marker, if any.
    pub async fn restore(&self) -> Result<Option<StudySession>, TrackerError> {
        let Some(user_id) = self.registry.get_active_user().await? else {
            return Ok(None);
        };

        let Some(user) = self.store.get_user(user_id).await? else {
            warn!(%user_id, "session marker points at a missing user; clearing it");
            self.registry.clear_active_user().await?;
            return Ok(None);
        };

        let session = self.load_session(user).await?;
        info!(user_id = %session.user.id, "session restored");
        Ok(Some(session))
    }

    /// Ends the session. Only the marker is cleared; the stored state stays.
    pub async fn logout(&self, session: StudySession) -> Result<(), TrackerError> {
        self.registry.clear_active_user().await?;
        info!(user_id = %session.user.id, "user logged out");
        Ok(())
    }

    /// Registered users, most recent login first.
    pub async fn known_users(&self, limit: usize) -> Result<Vec<User>, TrackerError> {
        let mut users = self.store.list_users().await?;
        users.truncate(limit);
        Ok(users)
    }

    async fn load_session(&self, user: User) -> Result<StudySession, TrackerError> {
        let state = match self.store.get_state(user.id).await? {
            Some(state) => state,
            None => AppState::new(user.clone()),
        };
        Ok(StudySession::new(user, state))
    }
}
