use anyhow::Result;
use chapter_report::utils::logging;
use chapter_report::{logger, render, App, Config};
use clap::{Parser, Subcommand};
use tracing::error;

#[derive(Parser, Debug)]
#[command(name = "chapter-report", version, about = "会员后台周报生成工具")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// 以 JSON 输出报表
    #[arg(long, global = true)]
    json: bool,

    /// 输出 debug 日志
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// 章节表现报表
    Chapter,
    /// 周检查表报表
    Checklist,
}

impl Command {
    fn title(self) -> &'static str {
        match self {
            Command::Chapter => "章节表现报表",
            Command::Checklist => "周检查表报表",
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 初始化日志
    logger::init(cli.verbose);

    // 加载并校验配置
    let config = Config::from_env();
    config.validate(cli.command == Command::Checklist)?;
    logging::log_startup(cli.command.title(), &config);

    let app = App::initialize(config);
    let outcome = run(&app, &cli).await;

    // 无论成功失败都关闭一次浏览器
    if let Err(e) = app.shutdown().await {
        error!("关闭浏览器失败: {}", e);
    }
    logging::print_final_stats(outcome.is_ok());

    outcome
}

async fn run(app: &App, cli: &Cli) -> Result<()> {
    let now = chrono::Local::now();
    match cli.command {
        Command::Chapter => {
            let report = app.chapter_report().await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", render::chapter_blinded(&report.blinded(), &now));
                println!();
                println!("{}", render::chapter_unblinded(&report));
            }
        }
        Command::Checklist => {
            let report = app.checklist_report().await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", render::checklist_blinded(report.blinded(), &now));
                println!();
                println!("{}", render::checklist_unblinded(&report));
            }
        }
    }
    Ok(())
}
