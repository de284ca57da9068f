//! crates/study_os_core/src/timer.rs
//!
//! Countdown for one timed study block. The caller drives `tick` once per
//! second; finishing the block yields the `SlotUpdate` that closes the slot.

use uuid::Uuid;

use crate::domain::{Difficulty, SlotUpdate, StudySlot, StudyStatus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotTimer {
    slot_id: Uuid,
    total_secs: u64,
    remaining_secs: u64,
}

impl SlotTimer {
    pub fn start(slot: &StudySlot) -> Self {
        let total_secs = u64::from(slot.time_estimate) * 60;
        Self {
            slot_id: slot.id,
            total_secs,
            remaining_secs: total_secs,
        }
    }

    pub fn slot_id(&self) -> Uuid {
        self.slot_id
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn is_elapsed(&self) -> bool {
        self.remaining_secs == 0
    }

    /// Advances one second. Stops at zero.
    pub fn tick(&mut self) {
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
    }

    /// Fraction of the block already spent, in [0, 1]. An empty block counts
    /// as fully spent.
    pub fn elapsed_fraction(&self) -> f64 {
        if self.total_secs == 0 {
            return 1.0;
        }
        (self.total_secs - self.remaining_secs) as f64 / self.total_secs as f64
    }

    /// Remaining time as `MM:SS`.
    pub fn format_remaining(&self) -> String {
        format!(
            "{:02}:{:02}",
            self.remaining_secs / 60,
            self.remaining_secs % 60
        )
    }

    /// Ends the block. `time_taken` is the elapsed time in minutes.
    pub fn finish(
        self,
        status: StudyStatus,
        difficulty: Difficulty,
        confusions: &str,
    ) -> (Uuid, SlotUpdate) {
        let elapsed = self.total_secs - self.remaining_secs;
        let update = SlotUpdate {
            status: Some(status),
            difficulty: Some(difficulty),
            confusions: Some(confusions.to_string()),
            time_taken: Some(elapsed as f64 / 60.0),
            ..SlotUpdate::default()
        };
        (self.slot_id, update)
    }
}
