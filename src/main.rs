// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use fandomrs::application::use_cases::harvest_use_case::HarvestUseCase;
use fandomrs::config::settings::Settings;
use fandomrs::domain::models::crawl::CrawlTarget;
use fandomrs::engines::reqwest_engine::ReqwestEngine;
use fandomrs::storage::catalog::Catalog;
use fandomrs::utils::cancellation::CancelToken;
use fandomrs::utils::robots::{AllowAllRobots, RobotsChecker, RobotsCheckerTrait};
use fandomrs::utils::telemetry;

/// fandom wiki角色数据集采集器
#[derive(Parser)]
#[command(name = "fandomrs", version, about = "Fandom wiki character dataset builder")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// 爬取一个fandom wiki并发布数据集
    Crawl {
        /// wiki根URL，必须位于*.fandom.com
        url: String,
        /// 页面预算，缺省使用配置值
        #[arg(long)]
        max_pages: Option<usize>,
        /// 输出目录，覆盖配置值
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// 列出已发布的数据集
    List {
        /// 输出目录，覆盖配置值
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// 检查输出目录是否可用
    Health {
        /// 输出目录，覆盖配置值
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
}

/// 主函数
///
/// 成功时退出码为0且latest工件已就位；失败时退出码非0、
/// 诊断写stderr、之前发布的工件保持不变。
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init_telemetry();

    let cli = Cli::parse();
    let settings = Settings::new()?;

    match cli.command {
        Command::Crawl {
            url,
            max_pages,
            output_dir,
        } => {
            let budget = max_pages.unwrap_or(settings.crawler.default_page_budget);
            let target = CrawlTarget::new(&url, budget)?;
            let output_dir =
                output_dir.unwrap_or_else(|| PathBuf::from(&settings.storage.output_dir));

            let engine = Arc::new(ReqwestEngine::new(&settings.crawler.user_agent)?);
            let robots: Arc<dyn RobotsCheckerTrait> = if settings.crawler.respect_robots {
                Arc::new(RobotsChecker::new())
            } else {
                Arc::new(AllowAllRobots)
            };

            let use_case =
                HarvestUseCase::new(engine, robots, settings.crawler.clone(), output_dir);

            // Ctrl-C requests cooperative cancellation; a cancelled run
            // never publishes a partial latest artifact
            let cancel = CancelToken::new();
            let signal_cancel = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    warn!("interrupt received, cancelling crawl");
                    signal_cancel.cancel();
                }
            });

            let summary = use_case.run(target, cancel).await?;
            info!(
                fandom = summary.fandom_id,
                records = summary.records,
                "published {}",
                summary.latest_path.display()
            );
            println!("{}", summary.latest_path.display());
        }
        Command::List { output_dir } => {
            let output_dir =
                output_dir.unwrap_or_else(|| PathBuf::from(&settings.storage.output_dir));
            let catalog = Catalog::new(&output_dir, &settings.known_fandoms);
            let entries = catalog.list_datasets()?;
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
        Command::Health { output_dir } => {
            let output_dir =
                output_dir.unwrap_or_else(|| PathBuf::from(&settings.storage.output_dir));
            let catalog = Catalog::new(&output_dir, &settings.known_fandoms);
            catalog.health()?;
            println!("ok");
        }
    }

    Ok(())
}
