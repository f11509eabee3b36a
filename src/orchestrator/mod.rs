//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责并发抓取和报表组装，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `app` - 应用主结构
//! - 管理应用生命周期（初始化、运行、关闭浏览器）
//! - 用 `tokio::join!` 同时抓取各报表域
//!
//! ### `assembler` - 报表组装
//! - 调用聚合引擎生成报表片段
//! - 决定错误是让片段缺失还是中止整次运行
//!
//! ## 层次关系
//!
//! ```text
//! app (章节报表 / 周检查表报表)
//!     ↓
//! workflow::ScopeFlow (单个报表域：借页面 → 抓取 → 归还)
//!     ↓
//! session::SessionCoordinator (共享浏览器 + 登录)
//!     ↓
//! infrastructure (JsExecutor / 表格抽取)
//! ```

pub mod app;
pub mod assembler;

pub use app::App;
pub use assembler::{assemble_chapter, assemble_checklist, ChapterInputs};
