//! Shared fixtures for the service tests: an in-memory store, a session
//! marker in a temp dir, and hand-written port doubles.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use study_os_core::ports::{
    PerformanceAnalysisService, PlanGenerationService, PortError, PortResult,
};
use study_os_core::{DailyLog, PerformanceFeedback, PlanRequest, ResilientAnalyzer, TaskDraft};
use tempfile::TempDir;

use crate::adapters::{FileSessionRegistry, SqliteStore};
use crate::app::Tracker;

pub(crate) async fn test_tracker() -> (Tracker, TempDir) {
    test_tracker_with(ResilientAnalyzer::offline(), None).await
}

pub(crate) async fn test_tracker_with(
    analyzer: ResilientAnalyzer,
    planner: Option<Arc<dyn PlanGenerationService>>,
) -> (Tracker, TempDir) {
    let store = SqliteStore::connect("sqlite::memory:").await.unwrap();
    store.run_migrations().await.unwrap();
    let dir = tempfile::tempdir().unwrap();
    let registry = FileSessionRegistry::new(dir.path().join("session"));

    let tracker = Tracker::new(Arc::new(store), Arc::new(registry), analyzer, planner);
    (tracker, dir)
}

pub(crate) struct FailingAnalyzer;

#[async_trait]
impl PerformanceAnalysisService for FailingAnalyzer {
    async fn analyze_day(&self, _log: &DailyLog) -> PortResult<PerformanceFeedback> {
        Err(PortError::Unexpected("model overloaded".to_string()))
    }
}

/// Returns a canned answer and remembers the last request.
pub(crate) struct ScriptedPlanner {
    answer: Result<Vec<TaskDraft>, String>,
    last_request: Mutex<Option<PlanRequest>>,
}

impl ScriptedPlanner {
    pub(crate) fn returning(drafts: Vec<TaskDraft>) -> Self {
        Self {
            answer: Ok(drafts),
            last_request: Mutex::new(None),
        }
    }

    pub(crate) fn failing(error: PortError) -> Self {
        Self {
            answer: Err(error.to_string()),
            last_request: Mutex::new(None),
        }
    }

    pub(crate) fn last_request(&self) -> Option<PlanRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl PlanGenerationService for ScriptedPlanner {
    async fn generate_plan(&self, request: &PlanRequest) -> PortResult<Vec<TaskDraft>> {
        *self.last_request.lock().unwrap() = Some(request.clone());
        self.answer.clone().map_err(PortError::InvalidResponse)
    }
}
