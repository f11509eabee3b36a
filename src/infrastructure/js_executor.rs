//! JS 执行器 - 基础设施层
//!
//! 借用一个页面，只暴露"执行 JS"的能力

use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

use crate::browser::RemotePage;
use crate::error::PageError;

/// JS 执行器
///
/// 职责：
/// - 在借来的页面上执行脚本
/// - 把结果反序列化成调用方需要的类型
/// - 不认识报表域，不处理业务流程
pub struct JsExecutor<'a> {
    page: &'a dyn RemotePage,
}

impl<'a> JsExecutor<'a> {
    pub fn new(page: &'a dyn RemotePage) -> Self {
        Self { page }
    }

    /// 执行 JS 代码并返回 JSON 结果
    pub async fn eval(&self, js_code: impl Into<String>) -> Result<JsonValue, PageError> {
        self.page.evaluate(&js_code.into()).await
    }

    /// 执行 JS 代码并反序列化为指定类型
    pub async fn eval_as<T: DeserializeOwned>(
        &self,
        js_code: impl Into<String>,
    ) -> Result<T, PageError> {
        let json_value = self.eval(js_code).await?;
        let typed_value = serde_json::from_value(json_value)?;
        Ok(typed_value)
    }
}
