//! 后台登录

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::browser::{RemoteBrowser, RemotePage};
use crate::config::Config;
use crate::error::{PageError, SessionError};

const USERNAME_INPUT: &str = r#"input[name="username"]"#;
const PASSWORD_INPUT: &str = r#"input[name="password"]"#;
const SUBMIT_BUTTON: &str = r#"button[type="button"]"#;

/// 登录能力
///
/// 协调器保证同一时间最多只有一次 `login` 在进行。
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn login(&self, browser: &dyn RemoteBrowser) -> Result<(), SessionError>;
}

/// 用户名密码登录后台
///
/// 先打开仪表盘探测：被重定向到登录页才填写表单，否则视为已登录。
pub struct DashboardLogin {
    dashboard_url: String,
    login_url: String,
    username: String,
    password: String,
}

impl DashboardLogin {
    pub fn new(config: &Config) -> Self {
        Self {
            dashboard_url: config.dashboard_url(),
            login_url: config.login_url(),
            username: config.username.clone(),
            password: config.password.clone(),
        }
    }

    async fn login_on(&self, page: &dyn RemotePage) -> Result<(), PageError> {
        page.goto(&self.dashboard_url).await?;
        if !on_login_page(&page.current_url().await?) {
            info!("✓ 已处于登录状态");
            return Ok(());
        }

        debug!("需要登录，打开登录页: {}", self.login_url);
        page.goto(&self.login_url).await?;
        page.wait_for_selector(USERNAME_INPUT).await?;
        page.type_text(USERNAME_INPUT, &self.username).await?;
        page.type_text(PASSWORD_INPUT, &self.password).await?;
        page.click(SUBMIT_BUTTON).await?;
        page.wait_for_navigation().await?;
        Ok(())
    }
}

fn on_login_page(url: &str) -> bool {
    url.contains("login")
}

#[async_trait]
impl Authenticator for DashboardLogin {
    async fn login(&self, browser: &dyn RemoteBrowser) -> Result<(), SessionError> {
        info!("🔐 登录后台: {}", self.username);

        let page = browser
            .new_page()
            .await
            .map_err(|e| SessionError::AuthenticationFailed(e.to_string()))?;

        let result = self.login_on(page.as_ref()).await;
        let landed = page.current_url().await.unwrap_or_default();
        if let Err(e) = page.close().await {
            warn!("关闭登录页失败: {}", e);
        }

        result.map_err(|e| SessionError::AuthenticationFailed(e.to_string()))?;
        if on_login_page(&landed) {
            return Err(SessionError::AuthenticationFailed(
                "提交后仍停留在登录页，请检查用户名和密码".to_string(),
            ));
        }

        info!("✅ 登录成功");
        Ok(())
    }
}
