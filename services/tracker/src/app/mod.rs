pub mod auth;
pub mod state;
pub mod transitions;

#[cfg(test)]
pub(crate) mod test_support;

pub use state::{StudySession, Tracker};
