//! crates/study_os_core/src/domain.rs
//!
//! Defines the core data structures for the study tracker.
//! These structs are independent of any database; the serde derives fix the
//! shape of the per-user state blob that the local store keeps.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::syllabus::SYLLABUS;

//=========================================================================================
// Enumerations
//=========================================================================================

/// Execution status of a single study slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StudyStatus {
    Pending,
    Done,
    Partial,
    Missed,
}

/// Self-reported difficulty of a finished slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Difficulty {
    Easy,
    Moderate,
    Hard,
}

/// Coarse end-of-day performance classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    Strong,
    Average,
    Poor,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Strong => "Strong",
            Verdict::Average => "Average",
            Verdict::Poor => "Poor",
        }
    }
}

impl std::str::FromStr for Verdict {
    type Err = String;

    /// Case-insensitive parse; models tend to shout.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strong" => Ok(Verdict::Strong),
            "average" => Ok(Verdict::Average),
            "poor" => Ok(Verdict::Poor),
            other => Err(format!("unknown verdict '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AffairsCategory {
    #[serde(rename = "TN")]
    TamilNadu,
    National,
    International,
}

/// Which exam stage a current-affairs item is relevant for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExamTag {
    Prelims,
    Mains,
    Both,
}

//=========================================================================================
// Identity
//=========================================================================================

/// A local, unauthenticated identity. Owns exactly one `AppState`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub last_login: DateTime<Utc>,
}

impl User {
    pub fn new(username: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.trim().to_string(),
            last_login: Utc::now(),
        }
    }
}

//=========================================================================================
// Daily planning and execution
//=========================================================================================

/// One planned unit of work within a day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudySlot {
    pub id: Uuid,
    pub subject: String,
    pub topic: String,
    /// Planned duration in minutes.
    pub time_estimate: u32,
    pub output_expected: String,
    pub status: StudyStatus,
    /// Actual minutes spent, set when the timed block ends.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_taken: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confusions: Option<String>,
}

/// A possibly incomplete slot as entered in the check-in form or returned by
/// the planner. Missing or blank fields are defaulted at check-in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub time_estimate: Option<u32>,
    #[serde(default)]
    pub output_expected: Option<String>,
}

impl TaskDraft {
    pub fn new(subject: &str, topic: &str, time_estimate: u32) -> Self {
        Self {
            id: None,
            subject: Some(subject.to_string()),
            topic: Some(topic.to_string()),
            time_estimate: Some(time_estimate),
            output_expected: None,
        }
    }
}

/// Partial update applied to a slot of the open day. `None` leaves a field alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SlotUpdate {
    pub subject: Option<String>,
    pub topic: Option<String>,
    pub time_estimate: Option<u32>,
    pub output_expected: Option<String>,
    pub status: Option<StudyStatus>,
    pub time_taken: Option<f64>,
    pub difficulty: Option<Difficulty>,
    pub confusions: Option<String>,
}

impl SlotUpdate {
    pub fn status(status: StudyStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub(crate) fn apply_to(self, slot: &mut StudySlot) {
        if let Some(subject) = self.subject {
            slot.subject = subject;
        }
        if let Some(topic) = self.topic {
            slot.topic = topic;
        }
        if let Some(time_estimate) = self.time_estimate {
            slot.time_estimate = time_estimate;
        }
        if let Some(output_expected) = self.output_expected {
            slot.output_expected = output_expected;
        }
        if let Some(status) = self.status {
            slot.status = status;
        }
        if self.time_taken.is_some() {
            slot.time_taken = self.time_taken;
        }
        if self.difficulty.is_some() {
            slot.difficulty = self.difficulty;
        }
        if self.confusions.is_some() {
            slot.confusions = self.confusions;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct McqStats {
    pub total: u32,
    pub correct: u32,
    pub wrong: u32,
}

/// The record of one calendar day's planned and executed slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyLog {
    pub date: NaiveDate,
    pub day_number: u32,
    /// Planned hours, fixed at check-in.
    pub available_time: f64,
    pub constraints: String,
    pub slots: Vec<StudySlot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mcq_stats: Option<McqStats>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verdict: Option<Verdict>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correction: Option<String>,
    pub is_completed: bool,
}

/// Result of the end-of-day analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceFeedback {
    pub verdict: Verdict,
    pub correction: String,
}

impl PerformanceFeedback {
    pub const FALLBACK_CORRECTION: &'static str = "Manual review required: AI analysis failed.";

    /// The fixed result substituted whenever analysis fails.
    pub fn fallback() -> Self {
        Self {
            verdict: Verdict::Average,
            correction: Self::FALLBACK_CORRECTION.to_string(),
        }
    }
}

/// Input to the plan generator.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanRequest {
    pub day_number: u32,
    pub available_hours: f64,
    pub constraints: String,
    pub previous_performance: String,
}

//=========================================================================================
// Append-only annotations
//=========================================================================================

/// A breakthrough or progress note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEntry {
    pub id: Uuid,
    pub date: DateTime<Utc>,
    pub subject: String,
    pub topic: String,
    pub notes: String,
}

impl ProgressEntry {
    pub fn new(subject: &str, topic: &str, notes: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            date: Utc::now(),
            subject: subject.to_string(),
            topic: topic.to_string(),
            notes: notes.to_string(),
        }
    }
}

/// A logged mistake with the reasoning that led to it and the fix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MistakeEntry {
    pub id: Uuid,
    pub date: DateTime<Utc>,
    pub subject: String,
    pub topic: String,
    pub question_ref: String,
    pub why_i_chose_it: String,
    pub correct_concept: String,
    pub fix_strategy: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentAffairsEntry {
    pub id: Uuid,
    pub date: DateTime<Utc>,
    pub title: String,
    pub content: String,
    pub category: AffairsCategory,
    pub tag: ExamTag,
}

impl CurrentAffairsEntry {
    pub fn new(title: &str, content: &str, category: AffairsCategory, tag: ExamTag) -> Self {
        Self {
            id: Uuid::new_v4(),
            date: Utc::now(),
            title: title.to_string(),
            content: content.to_string(),
            category,
            tag,
        }
    }
}

//=========================================================================================
// The aggregate root
//=========================================================================================

/// One user's entire tracked history. Read and written whole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub user: User,
    pub current_day_number: u32,
    #[serde(default)]
    pub streak: u32,
    #[serde(default)]
    pub logs: Vec<DailyLog>,
    #[serde(default)]
    pub progress_logs: Vec<ProgressEntry>,
    #[serde(default)]
    pub mistake_entries: Vec<MistakeEntry>,
    #[serde(default)]
    pub current_affairs: Vec<CurrentAffairsEntry>,
    /// Topic -> number of DONE transitions.
    #[serde(default)]
    pub completed_topics: BTreeMap<String, u32>,
    /// Syllabus unit id -> percentage in [0, 100].
    #[serde(default)]
    pub syllabus_progress: BTreeMap<String, u8>,
}

impl AppState {
    /// A fresh state for a newly registered user: day 1, no streak, every
    /// syllabus unit at 0%.
    pub fn new(user: User) -> Self {
        let syllabus_progress = SYLLABUS
            .iter()
            .map(|unit| (unit.id.to_string(), 0))
            .collect();

        Self {
            user,
            current_day_number: 1,
            streak: 0,
            logs: Vec::new(),
            progress_logs: Vec::new(),
            mistake_entries: Vec::new(),
            current_affairs: Vec::new(),
            completed_topics: BTreeMap::new(),
            syllabus_progress,
        }
    }
}
