//! services/tracker/src/app/state.rs
//!
//! Defines the tracker's shared state and the per-user session context.

use std::sync::Arc;
use study_os_core::ports::{LocalStore, PlanGenerationService, SessionRegistry};
use study_os_core::{AppState, ResilientAnalyzer, TransitionError, User};
use tracing::debug;

use crate::error::TrackerError;

//=========================================================================================
// Tracker (Shared Across Sessions)
//=========================================================================================

/// The shared service state, created once at startup. Every transition and
/// persistence call goes through it with an explicit `StudySession`.
#[derive(Clone)]
pub struct Tracker {
    pub(crate) store: Arc<dyn LocalStore>,
    pub(crate) registry: Arc<dyn SessionRegistry>,
    pub(crate) analyzer: ResilientAnalyzer,
    pub(crate) planner: Option<Arc<dyn PlanGenerationService>>,
}

impl Tracker {
    pub fn new(
        store: Arc<dyn LocalStore>,
        registry: Arc<dyn SessionRegistry>,
        analyzer: ResilientAnalyzer,
        planner: Option<Arc<dyn PlanGenerationService>>,
    ) -> Self {
        Self {
            store,
            registry,
            analyzer,
            planner,
        }
    }

    /// Runs `transition` on a copy of the session's state, writes the copy to
    /// the store, and only then commits it to the session. A refused
    /// transition or a failed write leaves the session untouched. Unchanged
    /// states are not written.
    pub(crate) async fn apply<T, F>(
        &self,
        session: &mut StudySession,
        transition: F,
    ) -> Result<T, TrackerError>
    where
        F: FnOnce(&mut AppState) -> Result<T, TransitionError>,
    {
        let mut next = session.state.clone();
        let outcome = transition(&mut next)?;

        if next != session.state {
            self.store.put_state(session.user.id, &next).await?;
            debug!(user_id = %session.user.id, "state persisted");
            session.state = next;
        }
        Ok(outcome)
    }
}

//=========================================================================================
// StudySession (One Logged-In User)
//=========================================================================================

/// The active user's identity and in-memory state. Obtained from
/// `register`, `login` or `restore`; consumed by `logout`.
#[derive(Debug, Clone, PartialEq)]
pub struct StudySession {
    pub(crate) user: User,
    pub(crate) state: AppState,
}

impl StudySession {
    pub(crate) fn new(user: User, mut state: AppState) -> Self {
        state.user = user.clone();
        Self { user, state }
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    /// Read-only snapshot for rendering.
    pub fn state(&self) -> &AppState {
        &self.state
    }
}
