//! 应用主结构 - 编排层
//!
//! ## 职责
//!
//! 1. **应用初始化**：创建浏览器启动器、登录器、会话协调器
//! 2. **并发抓取**：各报表域同时抓取，共享同一个浏览器
//! 3. **报表组装**：委托 `assembler` 聚合
//! 4. **资源管理**：运行结束时关闭浏览器

use std::sync::Arc;

use tracing::info;

use crate::browser::{BrowserLauncher, ChromiumLauncher};
use crate::config::Config;
use crate::error::AppResult;
use crate::infrastructure::{DomTableExtractor, RecordExtractor};
use crate::models::{ChapterPerformanceReport, WeeklyChecklistReport};
use crate::orchestrator::assembler::{self, ChapterInputs};
use crate::session::{Authenticator, DashboardLogin, SessionCoordinator};
use crate::utils::logging;
use crate::workflow::ScopeFlow;

/// 应用主结构
pub struct App {
    coordinator: Arc<SessionCoordinator>,
    flow: ScopeFlow,
}

impl App {
    /// 用真实浏览器初始化应用（浏览器在第一次抓取时才启动）
    pub fn initialize(config: Config) -> Self {
        let launcher = Arc::new(ChromiumLauncher::new(&config));
        let authenticator = Arc::new(DashboardLogin::new(&config));
        Self::with_parts(config, launcher, authenticator, Arc::new(DomTableExtractor::new()))
    }

    /// 用指定的组件组装应用
    pub fn with_parts(
        config: Config,
        launcher: Arc<dyn BrowserLauncher>,
        authenticator: Arc<dyn Authenticator>,
        extractor: Arc<dyn RecordExtractor>,
    ) -> Self {
        let config = Arc::new(config);
        let coordinator = Arc::new(SessionCoordinator::new(
            launcher,
            authenticator,
            config.operation_timeout,
        ));
        let flow = ScopeFlow::new(coordinator.clone(), extractor, config);
        Self { coordinator, flow }
    }

    pub fn coordinator(&self) -> &Arc<SessionCoordinator> {
        &self.coordinator
    }

    /// 章节表现报表
    pub async fn chapter_report(&self) -> AppResult<ChapterPerformanceReport> {
        logging::log_report_start("章节表现报表");

        let (members, sessions, events, visitors) = tokio::join!(
            self.flow.members(),
            self.flow.sessions(),
            self.flow.events(),
            self.flow.visitors(),
        );

        let report = assembler::assemble_chapter(ChapterInputs {
            members,
            sessions,
            events,
            visitors,
        })?;

        logging::log_report_complete(report.missing.len());
        Ok(report)
    }

    /// 周检查表报表
    pub async fn checklist_report(&self) -> AppResult<WeeklyChecklistReport> {
        logging::log_report_start("周检查表报表");

        let (members, entries) = tokio::join!(self.flow.members(), self.flow.checklist_entries());
        let report = assembler::assemble_checklist(members?, entries?)?;

        logging::log_report_complete(0);
        Ok(report)
    }

    /// 关闭浏览器，重复调用无副作用
    pub async fn shutdown(&self) -> AppResult<()> {
        info!("🧹 清理浏览器资源...");
        self.coordinator.shutdown().await?;
        Ok(())
    }
}
