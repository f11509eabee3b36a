//! 测试用的假浏览器和假登录
//!
//! 每个假实现都带原子计数器，用来断言启动/登录/开页/关页的次数。

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chapter_report::browser::{BrowserLauncher, RemoteBrowser, RemotePage};
use chapter_report::error::{PageError, SessionError};
use chapter_report::models::RawRow;
use chapter_report::session::Authenticator;
use chapter_report::Config;
use serde_json::Value as JsonValue;

pub const BASE_URL: &str = "https://dash.example.com";

/// 页面地址 → 表格行；没有条目的页面没有表格
pub type Tables = HashMap<String, Vec<RawRow>>;

pub fn row(cells: &[&str]) -> RawRow {
    cells.iter().map(|c| c.to_string()).collect()
}

pub fn test_config() -> Config {
    Config {
        base_url: BASE_URL.to_string(),
        member_report_path: "reports/sm".to_string(),
        session_report_path: "reports/sessions".to_string(),
        event_report_path: "reports/events".to_string(),
        visitor_report_path: "reports/visitors".to_string(),
        weekly_checklist_path: "checklists".to_string(),
        username: "ops@example.com".to_string(),
        password: "secret".to_string(),
        report_start_date: "2026-01-05".to_string(),
        report_end_date: "2026-01-11".to_string(),
        operation_timeout: Duration::from_secs(2),
        ..Config::default()
    }
}

/// 所有假对象共享的计数器
#[derive(Default)]
pub struct Counters {
    pub launches: AtomicUsize,
    pub browser_closes: AtomicUsize,
    pub pages_opened: AtomicUsize,
    pub pages_closed: AtomicUsize,
    pub logins: AtomicUsize,
    pub typed: Mutex<Vec<(String, String)>>,
    /// 页面操作按发生顺序记录，例如 `"press_enter"`、`"evaluate"`
    pub actions: Mutex<Vec<String>>,
}

impl Counters {
    pub fn get(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }

    pub fn record(&self, action: &str) {
        self.actions.lock().unwrap().push(action.to_string());
    }

    pub fn actions(&self) -> Vec<String> {
        self.actions.lock().unwrap().clone()
    }

    pub fn typed_into(&self, selector: &str) -> usize {
        self.typed
            .lock()
            .unwrap()
            .iter()
            .filter(|(s, _)| s == selector)
            .count()
    }
}

/// 假后台的登录行为
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginGate {
    /// 仪表盘直接可见
    Open,
    /// 未登录时仪表盘跳转到登录页；`accepts` 决定提交后是否放行
    Required { accepts: bool },
}

pub struct FakeLauncher {
    pub counters: Arc<Counters>,
    tables: Arc<Tables>,
    delay: Duration,
    failures_left: AtomicUsize,
}

impl FakeLauncher {
    pub fn new(counters: Arc<Counters>, tables: Tables) -> Self {
        Self {
            counters,
            tables: Arc::new(tables),
            delay: Duration::from_millis(50),
            failures_left: AtomicUsize::new(0),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// 前 `n` 次启动失败
    pub fn failing(self, n: usize) -> Self {
        self.failures_left.store(n, Ordering::SeqCst);
        self
    }
}

#[async_trait]
impl BrowserLauncher for FakeLauncher {
    async fn launch(&self) -> Result<Arc<dyn RemoteBrowser>, SessionError> {
        self.counters.launches.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;

        let should_fail = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if should_fail {
            return Err(SessionError::LaunchFailed("chrome not found".to_string()));
        }

        Ok(Arc::new(FakeBrowser::new(
            self.counters.clone(),
            self.tables.clone(),
        )))
    }
}

pub struct FakeBrowser {
    counters: Arc<Counters>,
    tables: Arc<Tables>,
    closed: AtomicBool,
    gate: LoginGate,
    signed_in: Arc<AtomicBool>,
}

impl FakeBrowser {
    pub fn new(counters: Arc<Counters>, tables: Arc<Tables>) -> Self {
        Self {
            counters,
            tables,
            closed: AtomicBool::new(false),
            gate: LoginGate::Open,
            signed_in: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_login(mut self, gate: LoginGate) -> Self {
        self.gate = gate;
        self
    }
}

#[async_trait]
impl RemoteBrowser for FakeBrowser {
    async fn new_page(&self) -> Result<Arc<dyn RemotePage>, PageError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(PageError::Closed);
        }
        self.counters.pages_opened.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(FakePage {
            counters: self.counters.clone(),
            tables: self.tables.clone(),
            url: Mutex::new("about:blank".to_string()),
            gate: self.gate,
            signed_in: self.signed_in.clone(),
        }))
    }

    async fn close(&self) -> Result<(), SessionError> {
        if !self.closed.swap(true, Ordering::SeqCst) {
            self.counters.browser_closes.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }
}

pub struct FakePage {
    counters: Arc<Counters>,
    tables: Arc<Tables>,
    url: Mutex<String>,
    gate: LoginGate,
    signed_in: Arc<AtomicBool>,
}

impl FakePage {
    fn current(&self) -> String {
        self.url.lock().unwrap().clone()
    }

    fn set_url(&self, url: String) {
        *self.url.lock().unwrap() = url;
    }

    fn needs_login(&self) -> bool {
        self.gate != LoginGate::Open && !self.signed_in.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RemotePage for FakePage {
    async fn goto(&self, url: &str) -> Result<(), PageError> {
        self.counters.record("goto");
        if url.ends_with("/dashboard") && self.needs_login() {
            self.set_url(format!("{}/login?next=/dashboard", BASE_URL));
        } else {
            self.set_url(url.to_string());
        }
        Ok(())
    }

    async fn current_url(&self) -> Result<String, PageError> {
        Ok(self.current())
    }

    async fn wait_for_selector(&self, selector: &str) -> Result<(), PageError> {
        if selector == "table" && !self.tables.contains_key(&self.current()) {
            return Err(PageError::Timeout {
                operation: format!("等待 {}", selector),
                secs: 2,
            });
        }
        Ok(())
    }

    async fn type_text(&self, selector: &str, text: &str) -> Result<(), PageError> {
        self.counters
            .typed
            .lock()
            .unwrap()
            .push((selector.to_string(), text.to_string()));
        Ok(())
    }

    async fn press_enter(&self, _selector: &str) -> Result<(), PageError> {
        self.counters.record("press_enter");
        Ok(())
    }

    async fn click(&self, _selector: &str) -> Result<(), PageError> {
        self.counters.record("click");
        if let LoginGate::Required { accepts: true } = self.gate {
            self.signed_in.store(true, Ordering::SeqCst);
            self.set_url(format!("{}/dashboard", BASE_URL));
        }
        Ok(())
    }

    async fn wait_for_navigation(&self) -> Result<(), PageError> {
        self.counters.record("wait_for_navigation");
        Ok(())
    }

    async fn wait_for_network_idle(&self) -> Result<(), PageError> {
        self.counters.record("wait_for_network_idle");
        Ok(())
    }

    async fn evaluate(&self, _script: &str) -> Result<JsonValue, PageError> {
        self.counters.record("evaluate");
        match self.tables.get(&self.current()) {
            Some(rows) => Ok(serde_json::to_value(rows)?),
            None => Ok(JsonValue::Null),
        }
    }

    async fn close(&self) -> Result<(), PageError> {
        self.counters.pages_closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

pub struct FakeAuthenticator {
    counters: Arc<Counters>,
    delay: Duration,
    fail: bool,
}

impl FakeAuthenticator {
    pub fn new(counters: Arc<Counters>) -> Self {
        Self {
            counters,
            delay: Duration::from_millis(30),
            fail: false,
        }
    }

    pub fn rejecting(mut self) -> Self {
        self.fail = true;
        self
    }
}

#[async_trait]
impl Authenticator for FakeAuthenticator {
    async fn login(&self, _browser: &dyn RemoteBrowser) -> Result<(), SessionError> {
        self.counters.logins.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        if self.fail {
            return Err(SessionError::AuthenticationFailed("invalid credentials".to_string()));
        }
        Ok(())
    }
}
