//! 会话协调器
//!
//! 整次运行共享一个浏览器进程和一次登录：
//! - 启动与登录各自只有一个进行中的共享 future，并发的 `acquire` 都等待同一个
//! - 失败会交付给所有等待者，之后的 `acquire` 重新尝试
//! - `shutdown` 时仍在进行的 `acquire` 返回 `SessionError::Closed`；
//!   关闭之后新的 `acquire` 从头启动浏览器
//!
//! 每次关闭都会递增 `generation`，等待者醒来后据此判断会话是否已被关闭。
//! 状态锁从不跨越 await 持有。

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt, Shared};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use super::auth::Authenticator;
use super::handle::SessionHandle;
use crate::browser::{BrowserLauncher, RemoteBrowser};
use crate::error::SessionError;
use crate::models::Scope;

type LaunchFuture = Shared<BoxFuture<'static, Result<Arc<dyn RemoteBrowser>, SessionError>>>;
type LoginFuture = Shared<BoxFuture<'static, Result<(), SessionError>>>;

/// 会话生命周期
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionPhase {
    Unlaunched,
    Launching,
    Launched,
    Authenticating,
    Ready,
    ShuttingDown,
    Closed,
}

struct State {
    phase: SessionPhase,
    generation: u64,
    browser: Option<Arc<dyn RemoteBrowser>>,
    launching: Option<LaunchFuture>,
    authenticated: bool,
    logging_in: Option<LoginFuture>,
}

pub struct SessionCoordinator {
    launcher: Arc<dyn BrowserLauncher>,
    authenticator: Arc<dyn Authenticator>,
    operation_timeout: Duration,
    state: Mutex<State>,
    open_pages: Arc<AtomicUsize>,
    next_handle_id: AtomicU64,
}

impl SessionCoordinator {
    pub fn new(
        launcher: Arc<dyn BrowserLauncher>,
        authenticator: Arc<dyn Authenticator>,
        operation_timeout: Duration,
    ) -> Self {
        Self {
            launcher,
            authenticator,
            operation_timeout,
            state: Mutex::new(State {
                phase: SessionPhase::Unlaunched,
                generation: 0,
                browser: None,
                launching: None,
                authenticated: false,
                logging_in: None,
            }),
            open_pages: Arc::new(AtomicUsize::new(0)),
            next_handle_id: AtomicU64::new(1),
        }
    }

    pub async fn phase(&self) -> SessionPhase {
        self.state.lock().await.phase
    }

    /// 尚未释放的页面数
    pub fn open_pages(&self) -> usize {
        self.open_pages.load(Ordering::SeqCst)
    }

    /// 为报表域借出一个已登录的新页面
    pub async fn acquire(&self, scope: Scope) -> Result<SessionHandle, SessionError> {
        let (browser, generation) = self.ensure_browser().await?;
        self.ensure_authenticated(&browser, generation).await?;

        let page = match tokio::time::timeout(self.operation_timeout, browser.new_page()).await {
            Ok(Ok(page)) => page,
            Ok(Err(e)) => {
                error!("[{}] 创建页面失败: {}", scope, e);
                return Err(SessionError::PageCreationFailed(e.to_string()));
            }
            Err(_) => {
                return Err(SessionError::PageCreationFailed(format!(
                    "超时 ({} 秒)",
                    self.operation_timeout.as_secs()
                )))
            }
        };

        // 创建页面期间可能已经开始关闭
        if self.state.lock().await.generation != generation {
            let _ = page.close().await;
            return Err(SessionError::Closed);
        }

        let id = self.next_handle_id.fetch_add(1, Ordering::SeqCst);
        debug!("[{}] 借出页面 #{}", scope, id);
        Ok(SessionHandle::new(id, scope, page, self.open_pages.clone()))
    }

    /// 归还页面，可重复调用
    pub async fn release(&self, handle: &SessionHandle) {
        if let Err(e) = handle.release().await {
            warn!("[{}] 关闭页面 #{} 失败: {}", handle.scope(), handle.id(), e);
        }
    }

    /// 关闭浏览器并清空缓存状态，重复调用返回 Ok
    pub async fn shutdown(&self) -> Result<(), SessionError> {
        let (browser, launching) = {
            let mut state = self.state.lock().await;
            if matches!(state.phase, SessionPhase::ShuttingDown | SessionPhase::Closed) {
                return Ok(());
            }
            state.phase = SessionPhase::ShuttingDown;
            state.generation += 1;
            state.authenticated = false;
            state.logging_in = None;
            (state.browser.take(), state.launching.take())
        };

        let open = self.open_pages();
        if open > 0 {
            warn!("⚠️ 关闭浏览器时仍有 {} 个页面未释放", open);
        }

        // 启动中的浏览器要等它出来再关掉
        let browser = match (browser, launching) {
            (Some(browser), _) => Some(browser),
            (None, Some(launching)) => launching.await.ok(),
            (None, None) => None,
        };

        let result = match browser {
            Some(browser) => browser.close().await,
            None => Ok(()),
        };

        self.state.lock().await.phase = SessionPhase::Closed;
        match &result {
            Ok(()) => info!("✓ 会话已关闭"),
            Err(e) => error!("❌ 关闭会话失败: {}", e),
        }
        result
    }

    async fn ensure_browser(&self) -> Result<(Arc<dyn RemoteBrowser>, u64), SessionError> {
        let (launch, generation) = {
            let mut state = self.state.lock().await;
            if state.phase == SessionPhase::ShuttingDown {
                return Err(SessionError::Closed);
            }
            if let Some(browser) = &state.browser {
                return Ok((browser.clone(), state.generation));
            }
            let launch = match &state.launching {
                Some(launch) => launch.clone(),
                None => {
                    let launch = self.start_launch();
                    state.launching = Some(launch.clone());
                    state.phase = SessionPhase::Launching;
                    launch
                }
            };
            (launch, state.generation)
        };

        let result = launch.clone().await;

        let mut state = self.state.lock().await;
        if state.generation != generation {
            return Err(SessionError::Closed);
        }
        // 只有这次启动的等待者才能清理它，避免覆盖之后的重试
        if state.launching.as_ref().is_some_and(|l| l.ptr_eq(&launch)) {
            state.launching = None;
            match &result {
                Ok(browser) => {
                    state.browser = Some(browser.clone());
                    state.phase = SessionPhase::Launched;
                }
                Err(_) => state.phase = SessionPhase::Unlaunched,
            }
        }
        result.map(|browser| (browser, generation))
    }

    fn start_launch(&self) -> LaunchFuture {
        let launcher = self.launcher.clone();
        let limit = self.operation_timeout;
        async move {
            match tokio::time::timeout(limit, launcher.launch()).await {
                Ok(Ok(browser)) => {
                    info!("✓ 浏览器已启动");
                    Ok(browser)
                }
                Ok(Err(e)) => {
                    error!("❌ 浏览器启动失败: {}", e);
                    Err(e)
                }
                Err(_) => {
                    error!("❌ 浏览器启动超时");
                    Err(SessionError::LaunchFailed(format!(
                        "启动超时 ({} 秒)",
                        limit.as_secs()
                    )))
                }
            }
        }
        .boxed()
        .shared()
    }

    async fn ensure_authenticated(
        &self,
        browser: &Arc<dyn RemoteBrowser>,
        generation: u64,
    ) -> Result<(), SessionError> {
        let login = {
            let mut state = self.state.lock().await;
            if state.generation != generation {
                return Err(SessionError::Closed);
            }
            if state.authenticated {
                return Ok(());
            }
            match &state.logging_in {
                Some(login) => login.clone(),
                None => {
                    let login = self.start_login(browser.clone());
                    state.logging_in = Some(login.clone());
                    state.phase = SessionPhase::Authenticating;
                    login
                }
            }
        };

        let result = login.clone().await;

        let mut state = self.state.lock().await;
        if state.generation != generation {
            return Err(SessionError::Closed);
        }
        if state.logging_in.as_ref().is_some_and(|l| l.ptr_eq(&login)) {
            state.logging_in = None;
            match &result {
                Ok(()) => {
                    state.authenticated = true;
                    state.phase = SessionPhase::Ready;
                }
                Err(_) => state.phase = SessionPhase::Launched,
            }
        }
        result
    }

    fn start_login(&self, browser: Arc<dyn RemoteBrowser>) -> LoginFuture {
        let authenticator = self.authenticator.clone();
        let limit = self.operation_timeout;
        async move {
            match tokio::time::timeout(limit, authenticator.login(browser.as_ref())).await {
                Ok(result) => result,
                Err(_) => Err(SessionError::AuthenticationFailed(format!(
                    "登录超时 ({} 秒)",
                    limit.as_secs()
                ))),
            }
        }
        .boxed()
        .shared()
    }
}
