//! services/tracker/src/app/transitions.rs
//!
//! The state-mutating operations offered to the presentation layer. Each one
//! applies a core transition to the session and persists the whole state.

use chrono::NaiveDate;
use study_os_core::{
    syllabus, CurrentAffairsEntry, MistakeEntry, PerformanceFeedback, PlanRequest, ProgressEntry,
    SlotUpdate, TaskDraft,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::app::state::{StudySession, Tracker};
use crate::error::TrackerError;

const NO_HISTORY_SUMMARY: &str = "No previous sessions.";

impl Tracker {
    /// Starts a day from the drafts. Returns `false` when there was nothing to
    /// check in.
    pub async fn check_in(
        &self,
        session: &mut StudySession,
        date: NaiveDate,
        day_number: u32,
        drafts: Vec<TaskDraft>,
    ) -> Result<bool, TrackerError> {
        let created = self
            .apply(session, |state| state.check_in(date, day_number, drafts))
            .await?;
        if created {
            info!(user_id = %session.user.id, day_number, %date, "checked in");
        }
        Ok(created)
    }

    pub async fn update_slot(
        &self,
        session: &mut StudySession,
        slot_id: Uuid,
        update: SlotUpdate,
    ) -> Result<bool, TrackerError> {
        self.apply(session, |state| Ok(state.update_slot(slot_id, update)))
            .await
    }

    /// Closes the open day. The analysis call runs first and cannot fail the
    /// operation; only a refused transition or a store failure can.
    ///
    /// Takes the session mutably for the whole call, so no other transition
    /// can interleave with a pending analysis.
    pub async fn complete_day(
        &self,
        session: &mut StudySession,
    ) -> Result<PerformanceFeedback, TrackerError> {
        let log = session.state.ready_to_complete()?.clone();
        let feedback = self.analyzer.analyze(&log).await;

        let committed = feedback.clone();
        self.apply(session, move |state| state.complete_day(committed))
            .await?;

        info!(
            user_id = %session.user.id,
            day_number = log.day_number,
            verdict = feedback.verdict.as_str(),
            streak = session.state.streak,
            "day completed"
        );
        Ok(feedback)
    }

    pub async fn add_progress_entry(
        &self,
        session: &mut StudySession,
        entry: ProgressEntry,
    ) -> Result<(), TrackerError> {
        self.apply(session, |state| {
            state.add_progress_entry(entry);
            Ok(())
        })
        .await
    }

    pub async fn add_mistake_entry(
        &self,
        session: &mut StudySession,
        entry: MistakeEntry,
    ) -> Result<(), TrackerError> {
        self.apply(session, |state| {
            state.add_mistake_entry(entry);
            Ok(())
        })
        .await
    }

    pub async fn add_current_affairs(
        &self,
        session: &mut StudySession,
        entry: CurrentAffairsEntry,
    ) -> Result<(), TrackerError> {
        self.apply(session, |state| {
            state.add_current_affairs(entry);
            Ok(())
        })
        .await
    }

    /// Sets a unit's coverage. Only units of the fixed syllabus are accepted.
    pub async fn update_syllabus_progress(
        &self,
        session: &mut StudySession,
        unit_id: &str,
        percentage: u32,
    ) -> Result<(), TrackerError> {
        if syllabus::unit(unit_id).is_none() {
            return Err(TrackerError::InvalidInput(format!(
                "Unknown syllabus unit '{}'.",
                unit_id
            )));
        }
        self.apply(session, |state| {
            state.update_syllabus_progress(unit_id, percentage);
            Ok(())
        })
        .await
    }

    /// Asks the planner for a day's drafts. Unlike the analysis, failures are
    /// reported: there is no safe plan to fall back to.
    pub async fn generate_plan(
        &self,
        session: &StudySession,
        available_hours: f64,
        constraints: &str,
    ) -> Result<Vec<TaskDraft>, TrackerError> {
        let planner = self.planner.as_ref().ok_or_else(|| {
            TrackerError::PlanUnavailable("no AI endpoint is configured".to_string())
        })?;

        let request = PlanRequest {
            day_number: session.state.current_day_number,
            available_hours,
            constraints: constraints.to_string(),
            previous_performance: previous_performance(session),
        };

        planner.generate_plan(&request).await.map_err(|e| {
            warn!(day_number = request.day_number, error = %e, "plan generation failed");
            TrackerError::PlanUnavailable(e.to_string())
        })
    }
}

/// One-line summary of the most recently completed day.
fn previous_performance(session: &StudySession) -> String {
    session
        .state
        .logs
        .iter()
        .rev()
        .find(|log| log.is_completed)
        .map(|log| {
            format!(
                "Day {}: {}. {}",
                log.day_number,
                log.verdict.map_or("Unrated", |v| v.as_str()),
                log.correction.as_deref().unwrap_or_default()
            )
        })
        .unwrap_or_else(|| NO_HISTORY_SUMMARY.to_string())
}
