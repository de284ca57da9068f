//! crates/study_os_core/src/feedback.rs
//!
//! Graceful degradation for the end-of-day analysis. `ResilientAnalyzer`
//! wraps an optional network-backed analyser and always yields a result,
//! substituting `FixedFeedback` on any error, empty answer or timeout.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

use crate::domain::{DailyLog, PerformanceFeedback};
use crate::ports::{PerformanceAnalysisService, PortError, PortResult};

pub const DEFAULT_ANALYSIS_TIMEOUT: Duration = Duration::from_secs(30);

/// Always answers with `PerformanceFeedback::fallback()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedFeedback;

#[async_trait]
impl PerformanceAnalysisService for FixedFeedback {
    async fn analyze_day(&self, _log: &DailyLog) -> PortResult<PerformanceFeedback> {
        Ok(PerformanceFeedback::fallback())
    }
}

#[derive(Clone)]
pub struct ResilientAnalyzer {
    primary: Option<Arc<dyn PerformanceAnalysisService>>,
    fallback: FixedFeedback,
    timeout: Duration,
}

impl ResilientAnalyzer {
    pub fn new(primary: Arc<dyn PerformanceAnalysisService>, timeout: Duration) -> Self {
        Self {
            primary: Some(primary),
            fallback: FixedFeedback,
            timeout,
        }
    }

    /// No analyser configured; every day gets the fixed fallback.
    pub fn offline() -> Self {
        Self {
            primary: None,
            fallback: FixedFeedback,
            timeout: DEFAULT_ANALYSIS_TIMEOUT,
        }
    }

    /// Never fails.
    pub async fn analyze(&self, log: &DailyLog) -> PerformanceFeedback {
        let Some(primary) = &self.primary else {
            return PerformanceFeedback::fallback();
        };

        let result = match tokio::time::timeout(self.timeout, primary.analyze_day(log)).await {
            Ok(result) => result.and_then(validate),
            Err(_) => Err(PortError::Timeout(self.timeout.as_secs())),
        };

        match result {
            Ok(feedback) => feedback,
            Err(e) => {
                warn!(day = log.day_number, error = %e, "AI analysis failed, using fallback");
                self.fallback_feedback(log).await
            }
        }
    }

    async fn fallback_feedback(&self, log: &DailyLog) -> PerformanceFeedback {
        self.fallback
            .analyze_day(log)
            .await
            .unwrap_or_else(|_| PerformanceFeedback::fallback())
    }
}

fn validate(feedback: PerformanceFeedback) -> PortResult<PerformanceFeedback> {
    if feedback.correction.trim().is_empty() {
        return Err(PortError::InvalidResponse(
            "analysis returned an empty correction".to_string(),
        ));
    }
    Ok(feedback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{TaskDraft, User, Verdict};
    use crate::AppState;
    use chrono::NaiveDate;

    struct Scripted(fn() -> PortResult<PerformanceFeedback>);

    #[async_trait]
    impl PerformanceAnalysisService for Scripted {
        async fn analyze_day(&self, _log: &DailyLog) -> PortResult<PerformanceFeedback> {
            (self.0)()
        }
    }

    struct Stalled;

    #[async_trait]
    impl PerformanceAnalysisService for Stalled {
        async fn analyze_day(&self, _log: &DailyLog) -> PortResult<PerformanceFeedback> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(PerformanceFeedback::fallback())
        }
    }

    fn log() -> DailyLog {
        let mut state = AppState::new(User::new("alice"));
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        state
            .check_in(date, 1, vec![TaskDraft::new("Polity", "Preamble", 60)])
            .unwrap();
        state.logs.pop().unwrap()
    }

    #[tokio::test]
    async fn test_passes_through_success() {
        let analyzer = ResilientAnalyzer::new(
            Arc::new(Scripted(|| {
                Ok(PerformanceFeedback {
                    verdict: Verdict::Strong,
                    correction: "Start with revision.".to_string(),
                })
            })),
            DEFAULT_ANALYSIS_TIMEOUT,
        );
        let feedback = analyzer.analyze(&log()).await;
        assert_eq!(feedback.verdict, Verdict::Strong);
        assert_eq!(feedback.correction, "Start with revision.");
    }

    #[tokio::test]
    async fn test_error_falls_back() {
        let analyzer = ResilientAnalyzer::new(
            Arc::new(Scripted(|| Err(PortError::Unexpected("connection reset".to_string())))),
            DEFAULT_ANALYSIS_TIMEOUT,
        );
        assert_eq!(analyzer.analyze(&log()).await, PerformanceFeedback::fallback());
    }

    #[tokio::test]
    async fn test_blank_correction_falls_back() {
        let analyzer = ResilientAnalyzer::new(
            Arc::new(Scripted(|| {
                Ok(PerformanceFeedback {
                    verdict: Verdict::Poor,
                    correction: "   ".to_string(),
                })
            })),
            DEFAULT_ANALYSIS_TIMEOUT,
        );
        assert_eq!(analyzer.analyze(&log()).await, PerformanceFeedback::fallback());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_falls_back() {
        let analyzer = ResilientAnalyzer::new(Arc::new(Stalled), Duration::from_secs(30));
        assert_eq!(analyzer.analyze(&log()).await, PerformanceFeedback::fallback());
    }

    #[tokio::test]
    async fn test_offline_uses_fallback() {
        let analyzer = ResilientAnalyzer::offline();
        assert_eq!(analyzer.analyze(&log()).await, PerformanceFeedback::fallback());
    }
}
