//! crates/study_os_core/src/timeline.rs
//!
//! Read-only projections over an `AppState`. Nothing here is stored; every
//! view is recomputed from the source sequences on demand.

use chrono::{DateTime, NaiveTime, Utc};

use crate::domain::{
    AppState, CurrentAffairsEntry, DailyLog, MistakeEntry, ProgressEntry, StudyStatus,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimelineKind {
    DailyLog,
    Progress,
    Mistake,
    CurrentAffairs,
}

/// One entry of the unified history, borrowing from the state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimelineItem<'a> {
    DailyLog(&'a DailyLog),
    Progress(&'a ProgressEntry),
    Mistake(&'a MistakeEntry),
    CurrentAffairs(&'a CurrentAffairsEntry),
}

impl TimelineItem<'_> {
    pub fn kind(&self) -> TimelineKind {
        match self {
            TimelineItem::DailyLog(_) => TimelineKind::DailyLog,
            TimelineItem::Progress(_) => TimelineKind::Progress,
            TimelineItem::Mistake(_) => TimelineKind::Mistake,
            TimelineItem::CurrentAffairs(_) => TimelineKind::CurrentAffairs,
        }
    }

    /// The item's own date. Daily logs carry a calendar date, taken as
    /// midnight UTC.
    pub fn date(&self) -> DateTime<Utc> {
        match self {
            TimelineItem::DailyLog(log) => log.date.and_time(NaiveTime::MIN).and_utc(),
            TimelineItem::Progress(entry) => entry.date,
            TimelineItem::Mistake(entry) => entry.date,
            TimelineItem::CurrentAffairs(entry) => entry.date,
        }
    }
}

/// Completed days and every annotation, newest first.
pub fn timeline(state: &AppState) -> Vec<TimelineItem<'_>> {
    let mut items: Vec<TimelineItem<'_>> = state
        .logs
        .iter()
        .filter(|log| log.is_completed)
        .map(TimelineItem::DailyLog)
        .chain(state.progress_logs.iter().map(TimelineItem::Progress))
        .chain(state.mistake_entries.iter().map(TimelineItem::Mistake))
        .chain(state.current_affairs.iter().map(TimelineItem::CurrentAffairs))
        .collect();

    items.sort_by_key(|item| std::cmp::Reverse(item.date()));
    items
}

/// Execution summary of a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayProgress {
    pub total_slots: usize,
    pub done_slots: usize,
    /// Rounded share of DONE slots; 0 for an empty day.
    pub done_percentage: u8,
    /// Planned minutes still sitting in PENDING slots.
    pub remaining_minutes: u64,
    pub ready_to_complete: bool,
}

impl DayProgress {
    pub fn of(log: &DailyLog) -> Self {
        let total_slots = log.slots.len();
        let done_slots = log
            .slots
            .iter()
            .filter(|s| s.status == StudyStatus::Done)
            .count();
        let remaining_minutes = log
            .slots
            .iter()
            .filter(|s| s.status == StudyStatus::Pending)
            .map(|s| u64::from(s.time_estimate))
            .sum();
        let done_percentage = if total_slots == 0 {
            0
        } else {
            (done_slots as f64 / total_slots as f64 * 100.0).round() as u8
        };

        Self {
            total_slots,
            done_slots,
            done_percentage,
            remaining_minutes,
            ready_to_complete: total_slots > 0
                && log.slots.iter().all(|s| s.status != StudyStatus::Pending),
        }
    }
}

impl AppState {
    /// True when the last log is dated `today` and still open.
    pub fn is_today_started(&self, today: chrono::NaiveDate) -> bool {
        self.open_log().is_some_and(|log| log.date == today)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        AffairsCategory, ExamTag, PerformanceFeedback, SlotUpdate, TaskDraft, User,
    };
    use chrono::{Duration, NaiveDate, TimeZone};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_timeline_merges_and_sorts_descending() {
        let mut state = AppState::new(User::new("alice"));

        state
            .check_in(date("2024-03-02"), 1, vec![TaskDraft::new("Geo", "Rivers", 30)])
            .unwrap();
        let id = state.current_log().unwrap().slots[0].id;
        state.update_slot(id, SlotUpdate::status(StudyStatus::Done));
        state.complete_day(PerformanceFeedback::fallback()).unwrap();
        // Open days stay out of the history.
        state
            .check_in(date("2024-03-05"), 2, vec![TaskDraft::new("Geo", "Soils", 30)])
            .unwrap();

        let mut progress = crate::domain::ProgressEntry::new("Polity", "Art 14", "clicked");
        progress.date = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        state.add_progress_entry(progress);

        let mut affairs = CurrentAffairsEntry::new(
            "Budget",
            "Fiscal deficit target",
            AffairsCategory::National,
            ExamTag::Both,
        );
        affairs.date = Utc.with_ymd_and_hms(2024, 3, 3, 18, 30, 0).unwrap();
        state.add_current_affairs(affairs);

        let items = timeline(&state);
        let kinds: Vec<TimelineKind> = items.iter().map(|i| i.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                TimelineKind::CurrentAffairs,
                TimelineKind::DailyLog,
                TimelineKind::Progress,
            ]
        );
        assert!(items.windows(2).all(|w| w[0].date() >= w[1].date()));
    }

    #[test]
    fn test_timeline_empty_state() {
        let state = AppState::new(User::new("alice"));
        assert!(timeline(&state).is_empty());
    }

    #[test]
    fn test_day_progress() {
        let mut state = AppState::new(User::new("alice"));
        state
            .check_in(
                date("2024-03-02"),
                1,
                vec![
                    TaskDraft::new("Geo", "Rivers", 30),
                    TaskDraft::new("Geo", "Soils", 45),
                    TaskDraft::new("Geo", "Winds", 20),
                ],
            )
            .unwrap();
        let ids: Vec<_> = state.current_log().unwrap().slots.iter().map(|s| s.id).collect();
        state.update_slot(ids[0], SlotUpdate::status(StudyStatus::Done));
        state.update_slot(ids[1], SlotUpdate::status(StudyStatus::Partial));

        let progress = DayProgress::of(state.current_log().unwrap());
        assert_eq!(progress.done_slots, 1);
        assert_eq!(progress.done_percentage, 33);
        assert_eq!(progress.remaining_minutes, 20);
        assert!(!progress.ready_to_complete);

        state.update_slot(ids[2], SlotUpdate::status(StudyStatus::Missed));
        assert!(DayProgress::of(state.current_log().unwrap()).ready_to_complete);
    }

    #[test]
    fn test_is_today_started() {
        let mut state = AppState::new(User::new("alice"));
        let today = date("2024-03-02");
        assert!(!state.is_today_started(today));

        state
            .check_in(today, 1, vec![TaskDraft::new("Geo", "Rivers", 30)])
            .unwrap();
        assert!(state.is_today_started(today));
        assert!(!state.is_today_started(today + Duration::days(1)));
    }
}
