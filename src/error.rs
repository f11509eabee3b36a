use thiserror::Error;

use crate::models::Scope;

/// 应用程序错误类型
///
/// 按影响范围分层：
/// - `Session`：整次运行致命（浏览器启动失败、登录失败）
/// - `Scope`：只影响单个报表域
/// - `Validation`：报表输入不合法，快速失败
/// - `Config`：配置错误
#[derive(Debug, Error)]
pub enum AppError {
    /// 会话级错误
    #[error("会话错误: {0}")]
    Session(#[from] SessionError),
    /// 报表域错误
    #[error("报表域错误: {0}")]
    Scope(#[from] ScopeError),
    /// 报表输入校验失败
    #[error("报表输入无效: {0}")]
    Validation(#[from] ValidationError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

impl AppError {
    /// 是否为整次运行致命的错误
    pub fn is_session_fatal(&self) -> bool {
        matches!(self, AppError::Session(e) if e.is_fatal())
    }
}

/// 会话级错误
///
/// 需要 `Clone`：同一次失败的启动/登录要交付给所有并发等待者。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// 浏览器启动失败
    #[error("无法启动浏览器: {0}")]
    LaunchFailed(String),
    /// 登录认证失败
    #[error("无法完成登录认证: {0}")]
    AuthenticationFailed(String),
    /// 创建页面失败
    #[error("创建页面失败: {0}")]
    PageCreationFailed(String),
    /// 会话已关闭（shutdown 期间或之后仍在进行的 acquire）
    #[error("浏览器会话已关闭")]
    Closed,
    /// 关闭浏览器失败
    #[error("关闭浏览器失败: {0}")]
    ShutdownFailed(String),
}

impl SessionError {
    /// 创建页面失败只影响当前报表域，其余都意味着会话不可用
    pub fn is_fatal(&self) -> bool {
        !matches!(self, SessionError::PageCreationFailed(_))
    }
}

/// 报表域错误，只中止对应的报表片段
#[derive(Debug, Error)]
pub enum ScopeError {
    /// 页面中找不到预期的数据表
    #[error("[{scope}] 找不到预期的数据表 - 页面可能已变化或无访问权限")]
    TableNotFound { scope: Scope },
    /// 行结构不符合预期
    #[error("[{scope}] 第 {row} 行格式错误: {reason}")]
    MalformedRow {
        scope: Scope,
        row: usize,
        reason: String,
    },
    /// 页面操作失败（导航、等待选择器、执行脚本）
    #[error("[{scope}] {source}")]
    Page {
        scope: Scope,
        #[source]
        source: PageError,
    },
}

/// 单个页面上的操作错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageError {
    /// 操作超时
    #[error("{operation} 超时 ({secs} 秒)")]
    Timeout { operation: String, secs: u64 },
    /// 导航失败
    #[error("导航到 {url} 失败: {reason}")]
    Navigation { url: String, reason: String },
    /// 找不到元素
    #[error("找不到元素: {0}")]
    ElementNotFound(String),
    /// 页面已关闭
    #[error("页面已关闭")]
    Closed,
    /// 浏览器协议层错误
    #[error("浏览器操作失败: {0}")]
    Protocol(String),
}

/// 数据校验错误
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// 传入舍入/百分比计算的值不是有限数字
    #[error("{context} 的输入不是有效数字: {value}")]
    NotANumber { context: &'static str, value: f64 },
    /// 精度为负
    #[error("精度必须为非负数: {0}")]
    NegativePrecision(i32),
    /// 分母为零
    #[error("{context} 的分母为零")]
    ZeroDenominator { context: &'static str },
}

/// 配置错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// 必填项为空
    #[error("环境变量 {var_name} 不能为空")]
    Missing { var_name: &'static str },
    /// 值格式不正确
    #[error("环境变量 {var_name} 的值 '{value}' 无效: 期望 {expected}")]
    Invalid {
        var_name: &'static str,
        value: String,
        expected: &'static str,
    },
    /// 报表日期范围倒置
    #[error("报表开始日期 {start} 晚于结束日期 {end}")]
    InvertedDateRange { start: String, end: String },
}

// ========== 从常见错误类型转换 ==========

impl From<chromiumoxide::error::CdpError> for PageError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        PageError::Protocol(err.to_string())
    }
}

impl From<serde_json::Error> for PageError {
    fn from(err: serde_json::Error) -> Self {
        PageError::Protocol(format!("JSON解析失败: {}", err))
    }
}

impl PageError {
    /// 绑定到报表域
    pub fn in_scope(self, scope: Scope) -> ScopeError {
        ScopeError::Page {
            scope,
            source: self,
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
