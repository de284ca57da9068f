//! crates/study_os_core/src/state.rs
//!
//! The transition functions of the application state machine. Each one is a
//! plain, synchronous mutation of `AppState`; persistence and the AI call live
//! outside this module.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::{
    AppState, CurrentAffairsEntry, DailyLog, MistakeEntry, PerformanceFeedback, ProgressEntry,
    SlotUpdate, StudySlot, StudyStatus, TaskDraft,
};

pub const DEFAULT_SUBJECT: &str = "Others";
pub const DEFAULT_TOPIC: &str = "Untitled Topic";
pub const DEFAULT_TIME_ESTIMATE: u32 = 60;
pub const DEFAULT_OUTPUT_EXPECTED: &str = "Mastery";
pub const MANUAL_CONSTRAINTS: &str = "Manual Agenda";

/// Reasons a transition refuses to run. The state is untouched in every case.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("There is no open day to work on")]
    NoOpenDay,
    #[error("{0} slot(s) are still pending")]
    SlotsPending(usize),
    #[error("Day {0} is still in progress")]
    DayInProgress(u32),
}

fn non_blank(value: Option<String>, default: &str) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => default.to_string(),
    }
}

impl StudySlot {
    /// Builds a pending slot from a draft, defaulting every missing or blank field.
    pub fn from_draft(draft: TaskDraft) -> Self {
        Self {
            id: draft.id.unwrap_or_else(Uuid::new_v4),
            subject: non_blank(draft.subject, DEFAULT_SUBJECT),
            topic: non_blank(draft.topic, DEFAULT_TOPIC),
            time_estimate: match draft.time_estimate {
                Some(minutes) if minutes > 0 => minutes,
                _ => DEFAULT_TIME_ESTIMATE,
            },
            output_expected: non_blank(draft.output_expected, DEFAULT_OUTPUT_EXPECTED),
            status: StudyStatus::Pending,
            time_taken: None,
            difficulty: None,
            confusions: None,
        }
    }
}

/// Planned hours for a set of slots, rounded to one decimal.
pub fn available_hours(slots: &[StudySlot]) -> f64 {
    let minutes: u64 = slots.iter().map(|s| u64::from(s.time_estimate)).sum();
    (minutes as f64 / 60.0 * 10.0).round() / 10.0
}

/// Streak after completing a day dated `current`, given the date of the
/// previously completed day. Only those two dates are compared.
pub fn next_streak(streak: u32, previous: Option<NaiveDate>, current: NaiveDate) -> u32 {
    let Some(previous) = previous else {
        return 1;
    };

    let diff_days = current.signed_duration_since(previous).num_days();
    match diff_days {
        1 => streak + 1,
        d if d > 1 => 1,
        _ => streak,
    }
}

impl AppState {
    /// The last log, whatever its state.
    pub fn current_log(&self) -> Option<&DailyLog> {
        self.logs.last()
    }

    /// The last log if it has not been completed yet.
    pub fn open_log(&self) -> Option<&DailyLog> {
        self.logs.last().filter(|log| !log.is_completed)
    }

    fn open_log_mut(&mut self) -> Option<&mut DailyLog> {
        self.logs.last_mut().filter(|log| !log.is_completed)
    }

    /// Starts a new day from the given drafts. Returns `Ok(false)` and leaves
    /// the state alone when `drafts` is empty.
    pub fn check_in(
        &mut self,
        date: NaiveDate,
        day_number: u32,
        drafts: Vec<TaskDraft>,
    ) -> Result<bool, TransitionError> {
        if let Some(open) = self.open_log() {
            return Err(TransitionError::DayInProgress(open.day_number));
        }
        if drafts.is_empty() {
            return Ok(false);
        }

        let slots: Vec<StudySlot> = drafts.into_iter().map(StudySlot::from_draft).collect();
        let available_time = available_hours(&slots);

        self.logs.push(DailyLog {
            date,
            day_number,
            available_time,
            constraints: MANUAL_CONSTRAINTS.to_string(),
            slots,
            mcq_stats: None,
            verdict: None,
            correction: None,
            is_completed: false,
        });
        Ok(true)
    }

    /// Applies `update` to the matching slot of the open day. Every update to
    /// `Done` bumps the slot's pre-update topic in `completed_topics`.
    /// Returns whether a slot was found.
    pub fn update_slot(&mut self, slot_id: Uuid, update: SlotUpdate) -> bool {
        let Some(log) = self.open_log_mut() else {
            return false;
        };
        let Some(slot) = log.slots.iter_mut().find(|s| s.id == slot_id) else {
            return false;
        };

        let completed_topic = (update.status == Some(StudyStatus::Done)).then(|| slot.topic.clone());
        update.apply_to(slot);

        if let Some(topic) = completed_topic {
            *self.completed_topics.entry(topic).or_insert(0) += 1;
        }
        true
    }

    /// Checks that the open day exists and has no pending slot.
    pub fn ready_to_complete(&self) -> Result<&DailyLog, TransitionError> {
        let log = self.open_log().ok_or(TransitionError::NoOpenDay)?;
        let pending = log
            .slots
            .iter()
            .filter(|s| s.status == StudyStatus::Pending)
            .count();
        if pending > 0 {
            return Err(TransitionError::SlotsPending(pending));
        }
        Ok(log)
    }

    /// Closes the open day with the given feedback, advances the day counter
    /// and recomputes the streak.
    pub fn complete_day(&mut self, feedback: PerformanceFeedback) -> Result<(), TransitionError> {
        let current_date = self.ready_to_complete()?.date;
        let previous = self
            .logs
            .iter()
            .rev()
            .find(|log| log.is_completed)
            .map(|log| log.date);

        self.streak = next_streak(self.streak, previous, current_date);
        self.current_day_number += 1;

        let log = self.open_log_mut().ok_or(TransitionError::NoOpenDay)?;
        log.verdict = Some(feedback.verdict);
        log.correction = Some(feedback.correction);
        log.is_completed = true;
        Ok(())
    }

    pub fn add_progress_entry(&mut self, entry: ProgressEntry) {
        self.progress_logs.insert(0, entry);
    }

    pub fn add_mistake_entry(&mut self, entry: MistakeEntry) {
        self.mistake_entries.insert(0, entry);
    }

    pub fn add_current_affairs(&mut self, entry: CurrentAffairsEntry) {
        self.current_affairs.insert(0, entry);
    }

    /// Sets a unit's coverage, clamping anything above 100.
    pub fn update_syllabus_progress(&mut self, unit_id: &str, percentage: u32) {
        let clamped = percentage.min(100) as u8;
        self.syllabus_progress.insert(unit_id.to_string(), clamped);
    }
}
