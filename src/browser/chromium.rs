//! 基于 chromiumoxide 的浏览器实现

use std::future::Future;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::network::{
    EventLoadingFailed, EventLoadingFinished, EventRequestWillBeSent,
};
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use serde_json::Value as JsonValue;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Instant};
use tracing::{debug, error, info, warn};

use super::{BrowserLauncher, RemoteBrowser, RemotePage};
use crate::config::Config;
use crate::error::{PageError, SessionError};

/// 选择器轮询间隔
const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// 没有请求持续多久算网络空闲
const NETWORK_IDLE: Duration = Duration::from_millis(500);

/// 启动本地 Chromium
pub struct ChromiumLauncher {
    headless: bool,
    executable: Option<PathBuf>,
    operation_timeout: Duration,
}

impl ChromiumLauncher {
    pub fn new(config: &Config) -> Self {
        Self {
            headless: config.headless,
            executable: config.chrome_executable.clone(),
            operation_timeout: config.operation_timeout,
        }
    }

    fn browser_config(&self) -> Result<BrowserConfig, SessionError> {
        let mut builder = BrowserConfig::builder();
        builder = if self.headless {
            builder.new_headless_mode()
        } else {
            builder.with_head()
        };
        if let Some(path) = &self.executable {
            builder = builder.chrome_executable(path);
        }

        builder
            .args(vec![
                "--disable-gpu",
                "--no-sandbox",
                "--disable-dev-shm-usage",
                "--remote-debugging-port=0",
            ])
            .build()
            .map_err(|e| {
                error!("配置浏览器失败: {}", e);
                SessionError::LaunchFailed(format!("配置浏览器失败: {}", e))
            })
    }
}

#[async_trait]
impl BrowserLauncher for ChromiumLauncher {
    async fn launch(&self) -> Result<Arc<dyn RemoteBrowser>, SessionError> {
        info!(
            "🚀 启动浏览器 ({})...",
            if self.headless { "无头模式" } else { "有界面模式" }
        );

        let config = self.browser_config()?;
        let (browser, mut handler) = Browser::launch(config).await.map_err(|e| {
            error!("启动浏览器失败: {}", e);
            SessionError::LaunchFailed(e.to_string())
        })?;
        debug!("浏览器进程已启动");

        // 在后台处理浏览器事件
        let handler_task = tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if h.is_err() {
                    break;
                }
            }
        });

        Ok(Arc::new(ChromiumBrowser {
            browser: Mutex::new(Some(browser)),
            handler_task,
            operation_timeout: self.operation_timeout,
        }))
    }
}

/// 运行中的 Chromium
pub struct ChromiumBrowser {
    browser: Mutex<Option<Browser>>,
    handler_task: JoinHandle<()>,
    operation_timeout: Duration,
}

#[async_trait]
impl RemoteBrowser for ChromiumBrowser {
    async fn new_page(&self) -> Result<Arc<dyn RemotePage>, PageError> {
        let guard = self.browser.lock().await;
        let browser = guard.as_ref().ok_or(PageError::Closed)?;
        let page = browser.new_page("about:blank").await?;
        Ok(Arc::new(ChromiumPage::open(page, self.operation_timeout).await?))
    }

    async fn close(&self) -> Result<(), SessionError> {
        let Some(mut browser) = self.browser.lock().await.take() else {
            return Ok(());
        };

        let result = browser
            .close()
            .await
            .map(|_| ())
            .map_err(|e| SessionError::ShutdownFailed(e.to_string()));
        if let Err(e) = browser.wait().await {
            warn!("等待浏览器进程退出失败: {}", e);
        }
        self.handler_task.abort();

        info!("🛑 浏览器已关闭");
        result
    }
}

/// 页面上进行中的请求数和最近一次网络变化的时间
struct NetworkActivity {
    in_flight: AtomicUsize,
    last_change: std::sync::Mutex<Instant>,
}

impl NetworkActivity {
    fn new() -> Self {
        Self {
            in_flight: AtomicUsize::new(0),
            last_change: std::sync::Mutex::new(Instant::now()),
        }
    }

    fn touch(&self) {
        if let Ok(mut last) = self.last_change.lock() {
            *last = Instant::now();
        }
    }

    fn begin(&self) {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        self.touch();
    }

    fn end(&self) {
        let _ = self
            .in_flight
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
        self.touch();
    }

    /// `since` 之后没有请求在进行，且已静默 `quiet`
    fn is_idle(&self, since: Instant, quiet: Duration) -> bool {
        if self.in_flight.load(Ordering::SeqCst) > 0 {
            return false;
        }
        match self.last_change.lock() {
            Ok(last) => (*last).max(since).elapsed() >= quiet,
            Err(_) => false,
        }
    }
}

/// 单个 Chromium 页面，所有操作都受超时约束
pub struct ChromiumPage {
    page: Page,
    timeout: Duration,
    network: Arc<NetworkActivity>,
    network_task: JoinHandle<()>,
}

impl ChromiumPage {
    /// 包装页面并开始跟踪它的网络请求
    pub async fn open(page: Page, timeout: Duration) -> Result<Self, PageError> {
        let mut started = page.event_listener::<EventRequestWillBeSent>().await?;
        let mut finished = page.event_listener::<EventLoadingFinished>().await?;
        let mut failed = page.event_listener::<EventLoadingFailed>().await?;

        let network = Arc::new(NetworkActivity::new());
        let network_task = tokio::spawn({
            let network = network.clone();
            async move {
                loop {
                    tokio::select! {
                        Some(event) = started.next() => {
                            // 重定向沿用同一个请求
                            if event.redirect_response.is_none() {
                                network.begin();
                            } else {
                                network.touch();
                            }
                        }
                        Some(_) = finished.next() => network.end(),
                        Some(_) = failed.next() => network.end(),
                        else => break,
                    }
                }
            }
        });

        Ok(Self {
            page,
            timeout,
            network,
            network_task,
        })
    }

    async fn bounded<T, F>(&self, operation: String, fut: F) -> Result<T, PageError>
    where
        F: Future<Output = Result<T, PageError>> + Send,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(PageError::Timeout {
                operation,
                secs: self.timeout.as_secs(),
            }),
        }
    }
}

#[async_trait]
impl RemotePage for ChromiumPage {
    async fn goto(&self, url: &str) -> Result<(), PageError> {
        debug!("导航到: {}", url);
        self.bounded(format!("导航到 {}", url), async {
            self.page
                .goto(url)
                .await
                .map(|_| ())
                .map_err(|e| PageError::Navigation {
                    url: url.to_string(),
                    reason: e.to_string(),
                })
        })
        .await
    }

    async fn current_url(&self) -> Result<String, PageError> {
        self.bounded("读取页面地址".to_string(), async {
            Ok(self.page.url().await?.unwrap_or_default())
        })
        .await
    }

    async fn wait_for_selector(&self, selector: &str) -> Result<(), PageError> {
        self.bounded(format!("等待 {}", selector), async {
            loop {
                if self.page.find_element(selector).await.is_ok() {
                    return Ok(());
                }
                sleep(POLL_INTERVAL).await;
            }
        })
        .await
    }

    async fn type_text(&self, selector: &str, text: &str) -> Result<(), PageError> {
        self.bounded(format!("输入 {}", selector), async {
            let element = self
                .page
                .find_element(selector)
                .await
                .map_err(|_| PageError::ElementNotFound(selector.to_string()))?;
            element.click().await?;
            element.type_str(text).await?;
            Ok(())
        })
        .await
    }

    async fn press_enter(&self, selector: &str) -> Result<(), PageError> {
        self.bounded(format!("回车 {}", selector), async {
            let element = self
                .page
                .find_element(selector)
                .await
                .map_err(|_| PageError::ElementNotFound(selector.to_string()))?;
            element.press_key("Enter").await?;
            Ok(())
        })
        .await
    }

    async fn click(&self, selector: &str) -> Result<(), PageError> {
        self.bounded(format!("点击 {}", selector), async {
            let element = self
                .page
                .find_element(selector)
                .await
                .map_err(|_| PageError::ElementNotFound(selector.to_string()))?;
            element.click().await?;
            Ok(())
        })
        .await
    }

    async fn wait_for_navigation(&self) -> Result<(), PageError> {
        self.bounded("等待页面跳转".to_string(), async {
            self.page.wait_for_navigation().await?;
            Ok(())
        })
        .await
    }

    async fn wait_for_network_idle(&self) -> Result<(), PageError> {
        let since = Instant::now();
        self.bounded("等待网络空闲".to_string(), async {
            while !self.network.is_idle(since, NETWORK_IDLE) {
                sleep(POLL_INTERVAL).await;
            }
            Ok(())
        })
        .await
    }

    async fn evaluate(&self, script: &str) -> Result<JsonValue, PageError> {
        self.bounded("执行脚本".to_string(), async {
            let result = self.page.evaluate(script).await?;
            Ok(result.value().cloned().unwrap_or(JsonValue::Null))
        })
        .await
    }

    async fn close(&self) -> Result<(), PageError> {
        self.page.clone().close().await?;
        Ok(())
    }
}

impl Drop for ChromiumPage {
    fn drop(&mut self) {
        self.network_task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_flight_requests_block_idle() {
        let network = NetworkActivity::new();
        let since = Instant::now();
        assert!(network.is_idle(since, Duration::ZERO));

        network.begin();
        network.begin();
        network.end();
        assert!(!network.is_idle(since, Duration::ZERO));

        network.end();
        assert!(network.is_idle(since, Duration::ZERO));
        // 刚结束的请求还没静默够
        assert!(!network.is_idle(since, Duration::from_secs(60)));
    }

    #[test]
    fn unmatched_finish_does_not_underflow() {
        let network = NetworkActivity::new();
        network.end();
        assert_eq!(network.in_flight.load(Ordering::SeqCst), 0);
    }
}
