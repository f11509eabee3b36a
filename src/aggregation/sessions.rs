//! 会面聚合

use tracing::{debug, info};

use super::classify::{classify_session, is_leadership_session, lookup_session, SessionType};
use super::names::{is_reserved_role, sorted_unique};
use crate::models::{SessionActivity, SessionCounts, SessionReport, SessionSummary};

/// 是否计入统计
///
/// 提交人是保留角色时排除；会面对象是保留角色时也排除，访客会面除外。
pub fn is_countable(session: &SessionActivity) -> bool {
    if session.is_sentinel() || is_leadership_session(&session.session_type) {
        return false;
    }
    if is_reserved_role(&session.submitted_by) {
        return false;
    }
    if is_reserved_role(&session.session_with) {
        return lookup_session(&session.session_type) == Some(SessionType::Visitor);
    }
    true
}

pub fn aggregate_sessions(records: &[SessionActivity]) -> SessionReport {
    let valid: Vec<&SessionActivity> = records.iter().filter(|s| is_countable(s)).collect();
    debug!("会面记录 {} 条, 有效 {} 条", records.len(), valid.len());

    let mut counts = SessionCounts::default();
    for session in &valid {
        counts.add(classify_session(&session.session_type));
    }

    let submitted_by = sorted_unique(valid.iter().map(|s| s.submitted_by_name.as_str()));
    info!(
        "会面统计: 共 {} 次, 提交成员 {} 人",
        valid.len(),
        submitted_by.len()
    );

    SessionReport {
        summary: SessionSummary {
            total: valid.len(),
            counts,
            members_submitted: submitted_by.len(),
        },
        submitted_by,
    }
}
