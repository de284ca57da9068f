//! services/tracker/src/lib.rs
//!
//! The study tracker service: concrete adapters for the core ports, the
//! `Tracker` facade that owns login state and persist-after-mutation, and
//! the startup wiring.

pub mod adapters;
pub mod app;
pub mod bootstrap;
pub mod config;
pub mod error;

pub use app::{StudySession, Tracker};
pub use bootstrap::{build_tracker, init_tracing};
pub use config::Config;
pub use error::TrackerError;
