pub mod domain;
pub mod feedback;
pub mod ports;
pub mod state;
pub mod syllabus;
pub mod timeline;
pub mod timer;

pub use domain::{
    AffairsCategory, AppState, CurrentAffairsEntry, DailyLog, Difficulty, ExamTag, McqStats,
    MistakeEntry, PerformanceFeedback, PlanRequest, ProgressEntry, SlotUpdate, StudySlot,
    StudyStatus, TaskDraft, User, Verdict,
};
pub use feedback::{FixedFeedback, ResilientAnalyzer};
pub use ports::{
    LocalStore, PerformanceAnalysisService, PlanGenerationService, PortError, PortResult,
    SessionRegistry,
};
pub use state::TransitionError;
pub use timeline::{timeline, DayProgress, TimelineItem, TimelineKind};
pub use timer::SlotTimer;
