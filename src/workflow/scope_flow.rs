//! 报表域抓取流程 - 流程层
//!
//! 核心职责：定义"一个报表域"的完整抓取流程
//!
//! 流程顺序：
//! 1. 向协调器借页面
//! 2. 导航到报表页（周检查表需要先输入日期范围并等待重新加载）
//! 3. 读取表格、按列解析成活动记录
//! 4. 归还页面（无论成功失败）

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{AppResult, ScopeError};
use crate::infrastructure::RecordExtractor;
use crate::models::{
    ChecklistEntry, EventActivity, MemberActivity, RawRow, Scope, SessionActivity, VisitorEntry,
};
use crate::session::{SessionCoordinator, SessionHandle};

const DATE_INPUT: &str = r#"input[name="date"]"#;
const DATE_INPUT_FORMAT: &str = "%m/%d/%Y";

/// 报表域抓取流程
///
/// - 不持有页面，每次调用都重新借用
/// - 不做聚合，只产出解析后的记录
pub struct ScopeFlow {
    coordinator: Arc<SessionCoordinator>,
    extractor: Arc<dyn RecordExtractor>,
    config: Arc<Config>,
}

impl ScopeFlow {
    pub fn new(
        coordinator: Arc<SessionCoordinator>,
        extractor: Arc<dyn RecordExtractor>,
        config: Arc<Config>,
    ) -> Self {
        Self {
            coordinator,
            extractor,
            config,
        }
    }

    pub async fn members(&self) -> AppResult<Vec<MemberActivity>> {
        let rows = self.collect(Scope::Members).await?;
        Ok(parse_rows(Scope::Members, &rows, MemberActivity::from_row)?)
    }

    pub async fn sessions(&self) -> AppResult<Vec<SessionActivity>> {
        let rows = self.collect(Scope::Sessions).await?;
        Ok(parse_rows(Scope::Sessions, &rows, SessionActivity::from_row)?)
    }

    pub async fn events(&self) -> AppResult<Vec<EventActivity>> {
        let rows = self.collect(Scope::Events).await?;
        Ok(parse_rows(Scope::Events, &rows, EventActivity::from_row)?)
    }

    pub async fn visitors(&self) -> AppResult<Vec<VisitorEntry>> {
        let rows = self.collect(Scope::Visitors).await?;
        Ok(parse_rows(Scope::Visitors, &rows, VisitorEntry::from_row)?)
    }

    pub async fn checklist_entries(&self) -> AppResult<Vec<ChecklistEntry>> {
        let rows = self.collect(Scope::WeeklyChecklist).await?;
        Ok(parse_rows(Scope::WeeklyChecklist, &rows, ChecklistEntry::from_row)?)
    }

    /// 借页面 → 抓取 → 归还
    pub async fn collect(&self, scope: Scope) -> AppResult<Vec<RawRow>> {
        info!("[{}] 📄 开始抓取 {}", scope, scope.page_title());

        let handle = self.coordinator.acquire(scope).await?;
        let result = self.collect_on(&handle, scope).await;
        self.coordinator.release(&handle).await;

        match &result {
            Ok(rows) => info!("[{}] ✓ 抓取完成，共 {} 行", scope, rows.len()),
            Err(e) => warn!("[{}] ❌ 抓取失败: {}", scope, e),
        }
        result
    }

    async fn collect_on(&self, handle: &SessionHandle, scope: Scope) -> AppResult<Vec<RawRow>> {
        let page = handle.page();
        let url = self.config.scope_url(scope);
        page.goto(&url).await.map_err(|e| e.in_scope(scope))?;

        if scope == Scope::WeeklyChecklist {
            self.enter_date_range(handle).await?;
        }

        Ok(self.extractor.extract(page, scope).await?)
    }

    /// 在日期输入框填入 `MM/DD/YYYY - MM/DD/YYYY`，回车后等表格按新日期重新加载
    async fn enter_date_range(&self, handle: &SessionHandle) -> AppResult<()> {
        let scope = handle.scope();
        let page = handle.page();
        let (start, end) = self.config.report_date_range()?;
        let range = date_range_text(start, end);
        info!("[{}] 📅 报表日期: {}", scope, range);

        page.wait_for_selector(DATE_INPUT)
            .await
            .map_err(|e| e.in_scope(scope))?;
        page.type_text(DATE_INPUT, &range)
            .await
            .map_err(|e| e.in_scope(scope))?;
        page.press_enter(DATE_INPUT)
            .await
            .map_err(|e| e.in_scope(scope))?;
        // 页面上原有的表格还是旧日期的数据
        page.wait_for_network_idle()
            .await
            .map_err(|e| e.in_scope(scope))?;
        debug!("[{}] 日期筛选已生效", scope);
        Ok(())
    }
}

fn date_range_text(start: chrono::NaiveDate, end: chrono::NaiveDate) -> String {
    format!(
        "{} - {}",
        start.format(DATE_INPUT_FORMAT),
        end.format(DATE_INPUT_FORMAT)
    )
}

/// 逐行解析，行号从 1 开始
pub fn parse_rows<T>(
    scope: Scope,
    rows: &[RawRow],
    parse: fn(&[String]) -> Result<T, String>,
) -> Result<Vec<T>, ScopeError> {
    rows.iter()
        .enumerate()
        .map(|(index, cells)| {
            parse(cells).map_err(|reason| ScopeError::MalformedRow {
                scope,
                row: index + 1,
                reason,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn formats_date_range_for_input() {
        let start = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        let end = NaiveDate::from_ymd_opt(2026, 1, 11).unwrap();
        assert_eq!(date_range_text(start, end), "01/05/2026 - 01/11/2026");
    }

    #[test]
    fn malformed_row_reports_position() {
        let rows = vec![
            vec!["Jane Doe".to_string(), "Bob Roe".to_string(), "Activity".to_string()],
            vec!["Amy Lee".to_string()],
        ];
        let err = parse_rows(Scope::Sessions, &rows, SessionActivity::from_row).unwrap_err();
        assert!(matches!(err, ScopeError::MalformedRow { row: 2, .. }));
    }
}
