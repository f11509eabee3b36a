//! 报表数据结构（纯数据，不含行为）
//!
//! 每个报表片段由两部分组成：
//! - `*Summary`：脱敏视图，只有计数和百分比
//! - 外层结构：在 Summary 之上追加姓名列表（非脱敏视图）
//!
//! 两者由同一次过滤产生，格式化器只通过 `blinded()` 拿到 Summary。

use serde::Serialize;

use crate::aggregation::classify::{EventType, SessionType};
use crate::models::Scope;

// ========== 成员 ==========

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MemberSummary {
    pub total_members: usize,
    pub zero_activity: usize,
    pub low_activity: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MemberReport {
    pub summary: MemberSummary,
    pub members_list: Vec<String>,
    pub zero_activity_list: Vec<String>,
    pub low_activity_list: Vec<String>,
}

// ========== 社交媒体（只有数字，无需脱敏） ==========

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RoundsOfPosts {
    pub raw: f64,
    pub rounded: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SocialMediaReport {
    pub total_posts: u64,
    pub avg_posts_per_member: f64,
    pub avg_rounds_of_posts: RoundsOfPosts,
}

// ========== 会面 ==========

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionCounts {
    pub activity: usize,
    pub coaching: usize,
    pub super_groups: usize,
    pub visitor: usize,
    pub mno: usize,
    pub quick: usize,
    pub unknown: usize,
}

impl SessionCounts {
    pub fn add(&mut self, kind: SessionType) {
        let bucket = match kind {
            SessionType::Activity => &mut self.activity,
            SessionType::Coaching => &mut self.coaching,
            SessionType::SuperGroups => &mut self.super_groups,
            SessionType::Visitor => &mut self.visitor,
            SessionType::Mno => &mut self.mno,
            SessionType::Quick => &mut self.quick,
            SessionType::Unknown => &mut self.unknown,
        };
        *bucket += 1;
    }

    pub fn get(&self, kind: SessionType) -> usize {
        match kind {
            SessionType::Activity => self.activity,
            SessionType::Coaching => self.coaching,
            SessionType::SuperGroups => self.super_groups,
            SessionType::Visitor => self.visitor,
            SessionType::Mno => self.mno,
            SessionType::Quick => self.quick,
            SessionType::Unknown => self.unknown,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    pub total: usize,
    pub counts: SessionCounts,
    pub members_submitted: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionReport {
    pub summary: SessionSummary,
    pub submitted_by: Vec<String>,
}

// ========== 活动 ==========

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EventCounts {
    pub training: usize,
    pub seminar: usize,
    pub mixer: usize,
    pub show: usize,
    pub open_mic: usize,
    pub promo_party: usize,
    pub listening_viewing: usize,
    pub other: usize,
}

impl EventCounts {
    pub fn add(&mut self, kind: EventType) {
        let bucket = match kind {
            EventType::Training => &mut self.training,
            EventType::Seminar => &mut self.seminar,
            EventType::Mixer => &mut self.mixer,
            EventType::Show => &mut self.show,
            EventType::OpenMic => &mut self.open_mic,
            EventType::PromoParty => &mut self.promo_party,
            EventType::ListeningViewing => &mut self.listening_viewing,
            EventType::Other => &mut self.other,
        };
        *bucket += 1;
    }

    pub fn get(&self, kind: EventType) -> usize {
        match kind {
            EventType::Training => self.training,
            EventType::Seminar => self.seminar,
            EventType::Mixer => self.mixer,
            EventType::Show => self.show,
            EventType::OpenMic => self.open_mic,
            EventType::PromoParty => self.promo_party,
            EventType::ListeningViewing => self.listening_viewing,
            EventType::Other => self.other,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EventSummary {
    pub total: usize,
    pub counts: EventCounts,
    pub members_submitted: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EventReport {
    pub summary: EventSummary,
    pub submitted_by: Vec<String>,
}

// ========== 访客 ==========

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VisitorSummary {
    pub total_visitors: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VisitorReport {
    pub summary: VisitorSummary,
    pub visitors_list: Vec<String>,
}

// ========== 推荐 + Business Bucks ==========

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReferralSummary {
    pub referrals: u64,
    pub business_bucks: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReferralReport {
    pub summary: ReferralSummary,
    pub referrers: Vec<String>,
    pub business_bucks_receivers: Vec<String>,
}

// ========== 章节报表 ==========

/// 没能生成的报表片段
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingFragment {
    pub scope: Scope,
    pub reason: String,
}

/// 章节表现报表（非脱敏视图，是脱敏视图的严格超集）
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChapterPerformanceReport {
    pub members: Option<MemberReport>,
    pub social_media: Option<SocialMediaReport>,
    pub sessions: Option<SessionReport>,
    pub events: Option<EventReport>,
    pub visitors: Option<VisitorReport>,
    pub referrals_and_business_bucks: Option<ReferralReport>,
    pub missing: Vec<MissingFragment>,
}

/// 章节报表的脱敏视图
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BlindedChapterReport {
    pub members: Option<MemberSummary>,
    pub social_media: Option<SocialMediaReport>,
    pub sessions: Option<SessionSummary>,
    pub events: Option<EventSummary>,
    pub visitors: Option<VisitorSummary>,
    pub referrals_and_business_bucks: Option<ReferralSummary>,
    pub missing: Vec<Scope>,
}

impl ChapterPerformanceReport {
    /// 投影出脱敏视图
    pub fn blinded(&self) -> BlindedChapterReport {
        BlindedChapterReport {
            members: self.members.as_ref().map(|m| m.summary.clone()),
            social_media: self.social_media.clone(),
            sessions: self.sessions.as_ref().map(|s| s.summary.clone()),
            events: self.events.as_ref().map(|e| e.summary.clone()),
            visitors: self.visitors.as_ref().map(|v| v.summary.clone()),
            referrals_and_business_bucks: self
                .referrals_and_business_bucks
                .as_ref()
                .map(|r| r.summary.clone()),
            missing: self.missing.iter().map(|m| m.scope).collect(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

// ========== 周检查表报表 ==========

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChecklistSummary {
    pub total_members: usize,
    pub total_checklists: usize,
    pub members_submitted: usize,
    pub missing_checklists: usize,
    pub created_percentage: f64,
    pub missing_percentage: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WeeklyChecklistReport {
    pub summary: ChecklistSummary,
    pub members_list: Vec<String>,
    pub submitted_by: Vec<String>,
    pub missing_list: Vec<String>,
}

impl WeeklyChecklistReport {
    pub fn blinded(&self) -> &ChecklistSummary {
        &self.summary
    }
}
