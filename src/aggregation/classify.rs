//! 类型分类
//!
//! 会面和活动的类型是封闭集合。文本解析（取首词 / 规范化整串）与
//! 桶选择（查表）分开：标签表只负责 "规范标签 → 枚举"，计数在
//! `SessionCounts::add` / `EventCounts::add` 中用穷尽匹配完成。
//!
//! 两种匹配策略不同：
//! - 会面：类型文本的第一个词（小写）与标签比较，"Activity Call" → activity
//! - 活动：整串规范化后与标签比较，"Listening/Viewing"、"Open Mic" 是多词标签

use phf::phf_map;
use serde::Serialize;
use tracing::warn;

/// 会面类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SessionType {
    Activity,
    Coaching,
    SuperGroups,
    Visitor,
    Mno,
    Quick,
    /// 无法识别
    Unknown,
}

impl SessionType {
    /// 报表中的展示顺序
    pub const REPORT_ORDER: [SessionType; 7] = [
        SessionType::Activity,
        SessionType::Coaching,
        SessionType::Mno,
        SessionType::Quick,
        SessionType::SuperGroups,
        SessionType::Visitor,
        SessionType::Unknown,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            SessionType::Activity => "Activity",
            SessionType::Coaching => "Coaching",
            SessionType::SuperGroups => "Supergroups",
            SessionType::Visitor => "Visitor",
            SessionType::Mno => "MNO",
            SessionType::Quick => "Quick",
            SessionType::Unknown => "Unknown",
        }
    }
}

/// 活动类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EventType {
    Training,
    Seminar,
    Mixer,
    Show,
    OpenMic,
    PromoParty,
    ListeningViewing,
    /// 显式的 "Other" 以及无法识别的类型
    Other,
}

impl EventType {
    pub const REPORT_ORDER: [EventType; 8] = [
        EventType::Training,
        EventType::Seminar,
        EventType::Mixer,
        EventType::Show,
        EventType::OpenMic,
        EventType::PromoParty,
        EventType::Other,
        EventType::ListeningViewing,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            EventType::Training => "Training",
            EventType::Seminar => "Seminar",
            EventType::Mixer => "Mixer",
            EventType::Show => "Show",
            EventType::OpenMic => "Open Mic",
            EventType::PromoParty => "Promo Party",
            EventType::ListeningViewing => "Listening/Viewing",
            EventType::Other => "Other",
        }
    }
}

/// 会面标签（首词）
static SESSION_LABELS: phf::Map<&'static str, SessionType> = phf_map! {
    "activity" => SessionType::Activity,
    "coaching" => SessionType::Coaching,
    "supergroups" => SessionType::SuperGroups,
    "visitor" => SessionType::Visitor,
    "mno" => SessionType::Mno,
    "quick" => SessionType::Quick,
};

/// 活动标签（整串）
static EVENT_LABELS: phf::Map<&'static str, EventType> = phf_map! {
    "training" => EventType::Training,
    "seminar" => EventType::Seminar,
    "mixer" => EventType::Mixer,
    "show" => EventType::Show,
    "open mic" => EventType::OpenMic,
    "promo party" => EventType::PromoParty,
    "listening/viewing" => EventType::ListeningViewing,
    "other" => EventType::Other,
};

/// 类型文本的首词（小写）
fn first_token(raw: &str) -> String {
    raw.split_whitespace().next().unwrap_or("").to_lowercase()
}

/// 合并连续空白并转小写
fn normalize(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

/// 查表，不输出诊断
pub fn lookup_session(raw: &str) -> Option<SessionType> {
    SESSION_LABELS.get(first_token(raw).as_str()).copied()
}

pub fn lookup_event(raw: &str) -> Option<EventType> {
    EVENT_LABELS.get(normalize(raw).as_str()).copied()
}

/// 会面分类，无法识别时归入 `Unknown` 并输出警告
pub fn classify_session(raw: &str) -> SessionType {
    lookup_session(raw).unwrap_or_else(|| {
        warn!("⚠️ 未知会面类型: {:?}", raw);
        SessionType::Unknown
    })
}

/// 活动分类，无法识别时归入 `Other` 并输出警告
pub fn classify_event(raw: &str) -> EventType {
    lookup_event(raw).unwrap_or_else(|| {
        warn!("⚠️ 未知活动类型: {:?}", raw);
        EventType::Other
    })
}

/// 领导层会面不计入统计
pub fn is_leadership_session(raw: &str) -> bool {
    raw.trim().to_lowercase().starts_with("leadership")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sessions_match_on_first_token() {
        assert_eq!(classify_session("Activity Call"), SessionType::Activity);
        assert_eq!(classify_session("QUICK Session"), SessionType::Quick);
        assert_eq!(classify_session("Supergroups Meetup"), SessionType::SuperGroups);
        assert_eq!(classify_session("MNO 1:1"), SessionType::Mno);
        assert_eq!(classify_session("Visitor Session"), SessionType::Visitor);
        // "Super Groups" 的首词是 "super"，不在标签表中
        assert_eq!(classify_session("Super Groups"), SessionType::Unknown);
        assert_eq!(classify_session(""), SessionType::Unknown);
    }

    #[test]
    fn events_match_on_full_string() {
        assert_eq!(classify_event("Listening/Viewing"), EventType::ListeningViewing);
        assert_eq!(classify_event("Open  Mic"), EventType::OpenMic);
        assert_eq!(classify_event("promo party"), EventType::PromoParty);
        assert_eq!(classify_event("Other"), EventType::Other);
        // 首词匹配对活动不生效
        assert_eq!(classify_event("Training Workshop"), EventType::Other);
        assert_eq!(lookup_event("Training Workshop"), None);
    }

    #[test]
    fn leadership_prefix() {
        assert!(is_leadership_session("Leadership Sync"));
        assert!(!is_leadership_session("Activity Call"));
    }
}
