//! 浏览器抽象
//!
//! 协调器只通过这三个 trait 操作浏览器，真实实现见 `chromium`，
//! 测试中用计数的假实现替换。

pub mod chromium;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use crate::error::{PageError, SessionError};

pub use chromium::{ChromiumBrowser, ChromiumLauncher, ChromiumPage};

/// 浏览器启动器
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    async fn launch(&self) -> Result<Arc<dyn RemoteBrowser>, SessionError>;
}

/// 已启动的浏览器进程
#[async_trait]
pub trait RemoteBrowser: Send + Sync {
    /// 打开一个空白页
    async fn new_page(&self) -> Result<Arc<dyn RemotePage>, PageError>;

    /// 关闭浏览器，重复调用不报错
    async fn close(&self) -> Result<(), SessionError>;
}

/// 单个页面（标签页）
#[async_trait]
pub trait RemotePage: Send + Sync {
    async fn goto(&self, url: &str) -> Result<(), PageError>;

    async fn current_url(&self) -> Result<String, PageError>;

    /// 等待选择器出现，超时返回 `PageError::Timeout`
    async fn wait_for_selector(&self, selector: &str) -> Result<(), PageError>;

    async fn type_text(&self, selector: &str, text: &str) -> Result<(), PageError>;

    async fn press_enter(&self, selector: &str) -> Result<(), PageError>;

    async fn click(&self, selector: &str) -> Result<(), PageError>;

    async fn wait_for_navigation(&self) -> Result<(), PageError>;

    /// 等待页面没有进行中的请求并保持一段静默期
    async fn wait_for_network_idle(&self) -> Result<(), PageError>;

    /// 执行 JS 表达式并返回 JSON 结果
    async fn evaluate(&self, script: &str) -> Result<JsonValue, PageError>;

    async fn close(&self) -> Result<(), PageError>;
}
