pub mod activity;
pub mod report;
pub mod scope;

pub use activity::{
    ChecklistEntry, EventActivity, MemberActivity, RawRow, SessionActivity, VisitorEntry,
};
pub use report::{
    BlindedChapterReport, ChapterPerformanceReport, ChecklistSummary, EventCounts, EventReport,
    EventSummary, MemberReport, MemberSummary, MissingFragment, ReferralReport, ReferralSummary,
    RoundsOfPosts, SessionCounts, SessionReport, SessionSummary, SocialMediaReport,
    VisitorReport, VisitorSummary, WeeklyChecklistReport,
};
pub use scope::{Scope, TablePosition};
