//! services/tracker/src/error.rs
//!
//! Defines the primary error type for the tracker service.

use crate::config::ConfigError;
use study_os_core::{PortError, TransitionError};

pub const ACCESS_DENIED_MESSAGE: &str = "Access Denied. User not found in database.";
pub const CONNECTION_ERROR_MESSAGE: &str = "Database connection error. Try again.";
pub const PLAN_FAILED_MESSAGE: &str = "AI failed to generate a plan. Please try again.";

/// The primary error type for the `tracker` service.
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error that propagated up from one of the core service ports.
    #[error("Service Port Error: {0}")]
    Port(#[from] PortError),

    /// A state transition was refused; the session is unchanged.
    #[error("Transition rejected: {0}")]
    Transition(#[from] TransitionError),

    /// Represents an error from the underlying database library.
    #[error("Database Error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration Error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Input the form should have blocked, e.g. a blank username.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// No registered user has the given username.
    #[error("Unknown username: {0}")]
    AccessDenied(String),

    /// Plan generation failed; there is no safe default plan.
    #[error("Plan generation failed: {0}")]
    PlanUnavailable(String),
}

impl TrackerError {
    /// The message shown to the user for this failure.
    pub fn user_message(&self) -> String {
        match self {
            TrackerError::AccessDenied(_) => ACCESS_DENIED_MESSAGE.to_string(),
            TrackerError::PlanUnavailable(_) => PLAN_FAILED_MESSAGE.to_string(),
            TrackerError::Transition(e) => e.to_string(),
            TrackerError::InvalidInput(reason) => reason.clone(),
            TrackerError::Port(PortError::Conflict(_)) => {
                "That username is already taken.".to_string()
            }
            _ => CONNECTION_ERROR_MESSAGE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages() {
        assert_eq!(
            TrackerError::AccessDenied("bob".to_string()).user_message(),
            ACCESS_DENIED_MESSAGE
        );
        assert_eq!(
            TrackerError::Port(PortError::Unexpected("disk I/O error".to_string())).user_message(),
            CONNECTION_ERROR_MESSAGE
        );
        assert_eq!(
            TrackerError::PlanUnavailable("empty".to_string()).user_message(),
            PLAN_FAILED_MESSAGE
        );
        assert_eq!(
            TrackerError::Transition(TransitionError::SlotsPending(2)).user_message(),
            "2 slot(s) are still pending"
        );
    }
}
