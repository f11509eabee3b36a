//! 页面租约

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use tracing::debug;

use crate::browser::RemotePage;
use crate::error::PageError;
use crate::models::Scope;

/// 某个报表域借用的页面
///
/// 只能通过 `SessionCoordinator::acquire` 获得。`release` 可以重复调用；
/// 忘记释放时在 drop 中后台关闭页面。
pub struct SessionHandle {
    id: u64,
    scope: Scope,
    page: Arc<dyn RemotePage>,
    released: AtomicBool,
    open_pages: Arc<AtomicUsize>,
}

impl SessionHandle {
    pub(crate) fn new(
        id: u64,
        scope: Scope,
        page: Arc<dyn RemotePage>,
        open_pages: Arc<AtomicUsize>,
    ) -> Self {
        open_pages.fetch_add(1, Ordering::SeqCst);
        Self {
            id,
            scope,
            page,
            released: AtomicBool::new(false),
            open_pages,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    pub fn page(&self) -> &dyn RemotePage {
        self.page.as_ref()
    }

    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::SeqCst)
    }

    /// 关闭页面；第二次调用直接返回
    pub async fn release(&self) -> Result<(), PageError> {
        if self.released.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        self.open_pages.fetch_sub(1, Ordering::SeqCst);
        debug!("[{}] 释放页面 #{}", self.scope, self.id);
        self.page.close().await
    }
}

impl Drop for SessionHandle {
    fn drop(&mut self) {
        if self.released.swap(true, Ordering::SeqCst) {
            return;
        }
        self.open_pages.fetch_sub(1, Ordering::SeqCst);
        if let Ok(runtime) = tokio::runtime::Handle::try_current() {
            let page = self.page.clone();
            runtime.spawn(async move {
                let _ = page.close().await;
            });
        }
    }
}

impl std::fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionHandle")
            .field("id", &self.id)
            .field("scope", &self.scope)
            .field("released", &self.is_released())
            .finish()
    }
}
