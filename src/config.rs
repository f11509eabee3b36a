use chrono::NaiveDate;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;
use crate::models::Scope;

/// 报表日期格式（环境变量中）
const DATE_FORMAT: &str = "%Y-%m-%d";

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 后台根地址
    pub base_url: String,
    pub login_path: String,
    pub dashboard_path: String,
    /// SM Report（成员活跃度）
    pub member_report_path: String,
    pub session_report_path: String,
    pub event_report_path: String,
    pub visitor_report_path: String,
    pub weekly_checklist_path: String,
    // --- 登录凭据 ---
    pub username: String,
    pub password: String,
    /// 是否使用无头模式
    pub headless: bool,
    /// 指定浏览器可执行文件（为空时由 chromiumoxide 自动探测）
    pub chrome_executable: Option<PathBuf>,
    /// 单次页面操作的超时时间
    pub operation_timeout: Duration,
    // --- 报表日期范围（YYYY-MM-DD） ---
    pub report_start_date: String,
    pub report_end_date: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            login_path: "login".to_string(),
            dashboard_path: "dashboard".to_string(),
            member_report_path: String::new(),
            session_report_path: String::new(),
            event_report_path: String::new(),
            visitor_report_path: String::new(),
            weekly_checklist_path: String::new(),
            username: String::new(),
            password: String::new(),
            headless: false,
            chrome_executable: None,
            operation_timeout: Duration::from_secs(15),
            report_start_date: String::new(),
            report_end_date: String::new(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            base_url: std::env::var("MNO_BASE_URL").unwrap_or(default.base_url),
            login_path: std::env::var("MNO_LOGIN_PATH").unwrap_or(default.login_path),
            dashboard_path: std::env::var("MNO_DASHBOARD_PATH").unwrap_or(default.dashboard_path),
            member_report_path: std::env::var("MNO_SM_REPORT_PATH").unwrap_or(default.member_report_path),
            session_report_path: std::env::var("MNO_SESSION_REPORT_PATH").unwrap_or(default.session_report_path),
            event_report_path: std::env::var("MNO_EVENT_REPORT_PATH").unwrap_or(default.event_report_path),
            visitor_report_path: std::env::var("MNO_VISITORS_PATH").unwrap_or(default.visitor_report_path),
            weekly_checklist_path: std::env::var("MNO_WEEKLY_CHECKLIST_PATH").unwrap_or(default.weekly_checklist_path),
            username: std::env::var("MNO_USERNAME").unwrap_or(default.username),
            password: std::env::var("MNO_PASSWORD").unwrap_or(default.password),
            headless: std::env::var("PUPPETEER_HEADLESS_MODE").map(|v| v == "true").unwrap_or(default.headless),
            chrome_executable: std::env::var("CHROME_EXECUTABLE").ok().filter(|v| !v.is_empty()).map(PathBuf::from),
            operation_timeout: std::env::var("OPERATION_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).map(Duration::from_secs).unwrap_or(default.operation_timeout),
            report_start_date: std::env::var("REPORT_START_DATE").unwrap_or(default.report_start_date),
            report_end_date: std::env::var("REPORT_END_DATE").unwrap_or(default.report_end_date),
        }
    }

    /// 校验配置
    ///
    /// `needs_date_range` 为 true 时（周检查表报表）额外要求日期范围有效
    pub fn validate(&self, needs_date_range: bool) -> Result<(), ConfigError> {
        if self.base_url.is_empty() {
            return Err(ConfigError::Missing { var_name: "MNO_BASE_URL" });
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                var_name: "MNO_BASE_URL",
                value: self.base_url.clone(),
                expected: "http(s) URL",
            });
        }

        let required = [
            ("MNO_LOGIN_PATH", &self.login_path),
            ("MNO_DASHBOARD_PATH", &self.dashboard_path),
            ("MNO_SM_REPORT_PATH", &self.member_report_path),
            ("MNO_SESSION_REPORT_PATH", &self.session_report_path),
            ("MNO_EVENT_REPORT_PATH", &self.event_report_path),
            ("MNO_VISITORS_PATH", &self.visitor_report_path),
            ("MNO_PASSWORD", &self.password),
        ];
        for (var_name, value) in required {
            if value.is_empty() {
                return Err(ConfigError::Missing { var_name });
            }
        }

        if !looks_like_email(&self.username) {
            return Err(ConfigError::Invalid {
                var_name: "MNO_USERNAME",
                value: self.username.clone(),
                expected: "email address",
            });
        }

        if needs_date_range {
            if self.weekly_checklist_path.is_empty() {
                return Err(ConfigError::Missing { var_name: "MNO_WEEKLY_CHECKLIST_PATH" });
            }
            self.report_date_range()?;
        }

        Ok(())
    }

    /// 解析报表日期范围
    pub fn report_date_range(&self) -> Result<(NaiveDate, NaiveDate), ConfigError> {
        let start = parse_date("REPORT_START_DATE", &self.report_start_date)?;
        let end = parse_date("REPORT_END_DATE", &self.report_end_date)?;
        if start > end {
            return Err(ConfigError::InvertedDateRange {
                start: self.report_start_date.clone(),
                end: self.report_end_date.clone(),
            });
        }
        Ok((start, end))
    }

    pub fn login_url(&self) -> String {
        self.join(&self.login_path)
    }

    pub fn dashboard_url(&self) -> String {
        self.join(&self.dashboard_path)
    }

    /// 报表域对应的页面地址
    pub fn scope_url(&self, scope: Scope) -> String {
        let path = match scope {
            Scope::Members => &self.member_report_path,
            Scope::Sessions => &self.session_report_path,
            Scope::Events => &self.event_report_path,
            Scope::Visitors => &self.visitor_report_path,
            Scope::WeeklyChecklist => &self.weekly_checklist_path,
        };
        self.join(path)
    }

    fn join(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path.trim_start_matches('/'))
    }
}

fn parse_date(var_name: &'static str, value: &str) -> Result<NaiveDate, ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Missing { var_name });
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| ConfigError::Invalid {
        var_name,
        value: value.to_string(),
        expected: "YYYY-MM-DD",
    })
}

fn looks_like_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.'),
        None => false,
    }
}
