//! 报表组装
//!
//! 把各报表域的抓取结果聚合成报表片段。会话级致命错误直接向上传播，
//! 其余错误只让对应片段缺失。

use tracing::error;

use crate::aggregation::{
    aggregate_checklist, aggregate_events, aggregate_members, aggregate_sessions,
    aggregate_visitors,
};
use crate::error::{AppError, AppResult};
use crate::models::{
    ChapterPerformanceReport, ChecklistEntry, EventActivity, MemberActivity, MissingFragment,
    Scope, SessionActivity, VisitorEntry, WeeklyChecklistReport,
};

/// 章节报表各报表域的抓取结果
pub struct ChapterInputs {
    pub members: AppResult<Vec<MemberActivity>>,
    pub sessions: AppResult<Vec<SessionActivity>>,
    pub events: AppResult<Vec<EventActivity>>,
    pub visitors: AppResult<Vec<VisitorEntry>>,
}

pub fn assemble_chapter(inputs: ChapterInputs) -> AppResult<ChapterPerformanceReport> {
    let mut report = ChapterPerformanceReport::default();

    match inputs.members.and_then(|records| Ok(aggregate_members(&records)?)) {
        Ok(aggregate) => {
            report.members = Some(aggregate.members);
            report.social_media = Some(aggregate.social_media);
            report.referrals_and_business_bucks = Some(aggregate.referrals);
        }
        Err(e) => mark_missing(&mut report, Scope::Members, e)?,
    }

    match inputs.sessions {
        Ok(records) => report.sessions = Some(aggregate_sessions(&records)),
        Err(e) => mark_missing(&mut report, Scope::Sessions, e)?,
    }

    match inputs.events {
        Ok(records) => report.events = Some(aggregate_events(&records)),
        Err(e) => mark_missing(&mut report, Scope::Events, e)?,
    }

    match inputs.visitors {
        Ok(records) => report.visitors = Some(aggregate_visitors(&records)),
        Err(e) => mark_missing(&mut report, Scope::Visitors, e)?,
    }

    Ok(report)
}

pub fn assemble_checklist(
    members: Vec<MemberActivity>,
    entries: Vec<ChecklistEntry>,
) -> AppResult<WeeklyChecklistReport> {
    let aggregate = aggregate_members(&members)?;
    Ok(aggregate_checklist(&aggregate.members.members_list, &entries)?)
}

fn mark_missing(
    report: &mut ChapterPerformanceReport,
    scope: Scope,
    err: AppError,
) -> AppResult<()> {
    if err.is_session_fatal() {
        return Err(err);
    }
    error!("[{}] ❌ 报表片段缺失: {}", scope, err);
    report.missing.push(MissingFragment {
        scope,
        reason: err.to_string(),
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ScopeError, SessionError};

    fn session_rows() -> Vec<SessionActivity> {
        [("Jane Doe", "John Roe", "Activity Call")]
            .iter()
            .map(|(by, with, kind)| {
                SessionActivity::from_row(&[by.to_string(), with.to_string(), kind.to_string()])
                    .unwrap()
            })
            .collect()
    }

    #[test]
    fn table_not_found_only_drops_its_fragment() {
        let report = assemble_chapter(ChapterInputs {
            members: Err(ScopeError::TableNotFound { scope: Scope::Members }.into()),
            sessions: Ok(session_rows()),
            events: Ok(Vec::new()),
            visitors: Ok(Vec::new()),
        })
        .unwrap();

        assert!(report.members.is_none());
        assert!(report.social_media.is_none());
        assert_eq!(report.sessions.as_ref().unwrap().summary.total, 1);
        assert_eq!(report.missing.len(), 1);
        assert_eq!(report.missing[0].scope, Scope::Members);
        assert_eq!(report.blinded().missing, vec![Scope::Members]);
    }

    #[test]
    fn authentication_failure_propagates() {
        let result = assemble_chapter(ChapterInputs {
            members: Ok(Vec::new()),
            sessions: Err(SessionError::AuthenticationFailed("bad password".into()).into()),
            events: Ok(Vec::new()),
            visitors: Ok(Vec::new()),
        });

        assert!(matches!(
            result,
            Err(AppError::Session(SessionError::AuthenticationFailed(_)))
        ));
    }

    #[test]
    fn page_creation_failure_is_scope_local() {
        let report = assemble_chapter(ChapterInputs {
            members: Err(ScopeError::TableNotFound { scope: Scope::Members }.into()),
            sessions: Ok(Vec::new()),
            events: Err(SessionError::PageCreationFailed("tab crashed".into()).into()),
            visitors: Ok(Vec::new()),
        })
        .unwrap();

        assert_eq!(report.missing.len(), 2);
        assert!(report.visitors.is_some());
    }
}
