/// 日志工具模块
///
/// 提供运行横幅和统计输出的辅助函数
use tracing::{info, warn};

use crate::config::Config;

/// 记录程序启动信息
///
/// # 参数
/// - `command`: 报表类型
/// - `config`: 程序配置
pub fn log_startup(command: &str, config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - {}", command);
    info!("🌐 后台地址: {}", config.base_url);
    info!(
        "🖥️ 浏览器模式: {}",
        if config.headless { "无头" } else { "有界面" }
    );
    info!("⏱️ 单步超时: {} 秒", config.operation_timeout.as_secs());
    info!("{}", "=".repeat(60));
}

/// 记录报表开始生成
pub fn log_report_start(title: &str) {
    info!("\n{}", "─".repeat(60));
    info!("📦 开始生成{}", title);
    info!("{}", "─".repeat(60));
}

/// 记录报表生成完成
///
/// # 参数
/// - `missing`: 缺失的报表片段数
pub fn log_report_complete(missing: usize) {
    info!("\n{}", "─".repeat(60));
    if missing == 0 {
        info!("✅ 报表生成完成");
    } else {
        warn!("⚠️ 报表生成完成，缺失 {} 个片段", missing);
    }
    info!("{}", "─".repeat(60));
}

/// 打印最终统计信息
///
/// # 参数
/// - `success`: 运行是否成功
pub fn print_final_stats(success: bool) {
    info!("\n{}", "=".repeat(60));
    info!("📊 运行结束");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    if success {
        info!("✅ 成功");
    } else {
        info!("❌ 失败");
    }
    info!("{}", "=".repeat(60));
}
