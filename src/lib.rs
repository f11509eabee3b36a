//! # Chapter Report
//!
//! 登录会员管理后台，抓取成员/会面/活动/访客/周检查表数据，
//! 生成脱敏（只有计数和百分比）与非脱敏（含姓名）两种报表。
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Infrastructure）
//! - `browser/` - 浏览器抽象（`BrowserLauncher` / `RemoteBrowser` / `RemotePage`）和 Chromium 实现
//! - `infrastructure/` - `JsExecutor` 执行脚本，`DomTableExtractor` 读取表格
//!
//! ### ② 会话层（Session）
//! - `SessionCoordinator` - 唯一的浏览器 owner，启动和登录各只进行一次
//! - `SessionHandle` - 借给报表域的页面，用完归还
//!
//! ### ③ 流程层（Workflow）
//! - `ScopeFlow` - 一个报表域的完整抓取流程（借页面 → 导航 → 读表 → 解析 → 归还）
//!
//! ### ④ 聚合层（Aggregation）
//! - `aggregation/` - 纯函数：排除规则、类型分类、去重排序、平均值与百分比
//!
//! ### ⑤ 编排层（Orchestration）
//! - `App` - 并发抓取各报表域，组装报表，关闭浏览器
//! - `render` - 文本报表
//!
//! ## 模块结构

pub mod aggregation;
pub mod browser;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod render;
pub mod session;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{ChapterPerformanceReport, Scope, WeeklyChecklistReport};
pub use orchestrator::App;
pub use session::{SessionCoordinator, SessionHandle, SessionPhase};
pub use workflow::ScopeFlow;
