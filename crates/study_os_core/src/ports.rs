//! crates/study_os_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the tracker's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of the local database, the session marker and the AI endpoint.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{AppState, DailyLog, PerformanceFeedback, PlanRequest, TaskDraft, User};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item already exists: {0}")]
    Conflict(String),
    #[error("Malformed response: {0}")]
    InvalidResponse(String),
    #[error("Timed out after {0} seconds")]
    Timeout(u64),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Durable per-device storage with two logical tables: `users` and one state
/// blob per user. Writes are whole-record overwrites; there is no atomicity
/// across the two tables.
#[async_trait]
pub trait LocalStore: Send + Sync {
    // --- users ---
    /// Inserts or overwrites a user. Fails with `Conflict` if another id
    /// already holds the username.
    async fn put_user(&self, user: &User) -> PortResult<()>;

    async fn get_user(&self, user_id: Uuid) -> PortResult<Option<User>>;

    async fn find_user_by_username(&self, username: &str) -> PortResult<Option<User>>;

    async fn list_users(&self) -> PortResult<Vec<User>>;

    // --- userData ---
    async fn put_state(&self, user_id: Uuid, state: &AppState) -> PortResult<()>;

    async fn get_state(&self, user_id: Uuid) -> PortResult<Option<AppState>>;
}

/// Remembers which user is logged in on this device, separately from the store.
#[async_trait]
pub trait SessionRegistry: Send + Sync {
    async fn set_active_user(&self, user_id: Uuid) -> PortResult<()>;

    async fn get_active_user(&self) -> PortResult<Option<Uuid>>;

    async fn clear_active_user(&self) -> PortResult<()>;
}

#[async_trait]
pub trait PerformanceAnalysisService: Send + Sync {
    /// Produces a verdict and a one-sentence correction for a finished day.
    async fn analyze_day(&self, log: &DailyLog) -> PortResult<PerformanceFeedback>;
}

#[async_trait]
pub trait PlanGenerationService: Send + Sync {
    /// Generates the task list for a day.
    async fn generate_plan(&self, request: &PlanRequest) -> PortResult<Vec<TaskDraft>>;
}
