//! 表格抽取
//!
//! 把页面上的目标表格读成原始行（每行是去掉首尾空白的单元格文本），
//! 不做任何业务解释。

use async_trait::async_trait;
use tracing::debug;

use super::js_executor::JsExecutor;
use crate::browser::RemotePage;
use crate::error::{PageError, ScopeError};
use crate::models::{RawRow, Scope, TablePosition};

const TABLE_SELECTOR: &str = "table";

/// 原始记录抽取器
#[async_trait]
pub trait RecordExtractor: Send + Sync {
    /// 找不到预期的表格时返回 `ScopeError::TableNotFound`
    async fn extract(&self, page: &dyn RemotePage, scope: Scope) -> Result<Vec<RawRow>, ScopeError>;
}

/// 从渲染后的 DOM 中读取 `<table>`
#[derive(Debug, Default, Clone)]
pub struct DomTableExtractor;

impl DomTableExtractor {
    pub fn new() -> Self {
        Self
    }

    fn script(position: TablePosition) -> String {
        format!(
            r#"(() => {{
    const tables = document.querySelectorAll('table');
    if (tables.length === 0) return null;
    const table = '{}' === 'first' ? tables[0] : tables[tables.length - 1];
    return Array.from(table.querySelectorAll('tbody tr')).map(tr =>
        Array.from(tr.querySelectorAll('td')).map(td => (td.textContent || '').trim())
    );
}})()"#,
            position.as_js()
        )
    }
}

#[async_trait]
impl RecordExtractor for DomTableExtractor {
    async fn extract(&self, page: &dyn RemotePage, scope: Scope) -> Result<Vec<RawRow>, ScopeError> {
        match page.wait_for_selector(TABLE_SELECTOR).await {
            Ok(()) => {}
            Err(PageError::Timeout { .. }) => return Err(ScopeError::TableNotFound { scope }),
            Err(e) => return Err(e.in_scope(scope)),
        }

        let executor = JsExecutor::new(page);
        let rows: Option<Vec<RawRow>> = executor
            .eval_as(Self::script(scope.table_position()))
            .await
            .map_err(|e| e.in_scope(scope))?;

        let rows = rows.ok_or(ScopeError::TableNotFound { scope })?;
        debug!("[{}] 读取到 {} 行", scope, rows.len());
        Ok(rows)
    }
}
