//! services/tracker/src/adapters/session_file.rs
//!
//! File-backed implementation of the `SessionRegistry` port. The marker is a
//! single file holding the active user's id; its presence means "logged in".

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use study_os_core::ports::{PortError, PortResult, SessionRegistry};
use tracing::{debug, warn};
use uuid::Uuid;

#[derive(Clone, Debug)]
pub struct FileSessionRegistry {
    path: PathBuf,
}

impl FileSessionRegistry {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SessionRegistry for FileSessionRegistry {
    async fn set_active_user(&self, user_id: Uuid) -> PortResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| PortError::Unexpected(e.to_string()))?;
        }
        tokio::fs::write(&self.path, user_id.to_string())
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        debug!(%user_id, "session marker set");
        Ok(())
    }

    async fn get_active_user(&self) -> PortResult<Option<Uuid>> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(PortError::Unexpected(e.to_string())),
        };

        match Uuid::parse_str(contents.trim()) {
            Ok(user_id) => Ok(Some(user_id)),
            Err(e) => {
                // A garbled marker is treated as logged out.
                warn!(path = %self.path.display(), error = %e, "ignoring unreadable session marker");
                Ok(None)
            }
        }
    }

    async fn clear_active_user(&self) -> PortResult<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                debug!("session marker cleared");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PortError::Unexpected(e.to_string())),
        }
    }
}
