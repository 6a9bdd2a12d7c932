// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::Utc;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;
use uuid::Uuid;

use crate::config::settings::CrawlerSettings;
use crate::crawler::spider::Spider;
use crate::domain::models::crawl::{CrawlReport, CrawlStats, CrawlTarget, PageKind};
use crate::domain::services::dedup_service::DedupService;
use crate::domain::services::extraction_service::ExtractionService;
use crate::engines::traits::FetchEngine;
use crate::storage::dataset_writer::DatasetWriter;
use crate::utils::cancellation::CancelToken;
use crate::utils::errors::HarvestError;
use crate::utils::fandom_lock;
use crate::utils::robots::RobotsCheckerTrait;

/// 采集运行摘要
///
/// 调用方看到的聚合结果：一次成功/失败信号加上诊断计数。
#[derive(Debug, Clone)]
pub struct HarvestSummary {
    /// fandom标识符
    pub fandom_id: String,
    /// 发布的记录数
    pub records: usize,
    /// 运行统计
    pub stats: CrawlStats,
    /// 快照工件路径
    pub snapshot_path: PathBuf,
    /// latest工件路径
    pub latest_path: PathBuf,
}

/// 采集流水线用例
///
/// 串联爬取、提取、去重和发布四个阶段。每个阶段都是对上一阶段
/// 输出的纯变换；运行期间持有按fandom标识符键控的独占锁，同一
/// fandom不会有两个并发运行竞争写latest工件。
pub struct HarvestUseCase<E: FetchEngine> {
    /// 爬虫
    spider: Spider<E>,
    /// 数据集写入器
    writer: DatasetWriter,
}

impl<E: FetchEngine> HarvestUseCase<E> {
    /// 创建新的用例实例
    ///
    /// # 参数
    ///
    /// * `engine` - 抓取引擎
    /// * `robots` - Robots.txt检查器
    /// * `settings` - 爬虫配置
    /// * `output_dir` - 工件输出目录
    pub fn new(
        engine: Arc<E>,
        robots: Arc<dyn RobotsCheckerTrait>,
        settings: CrawlerSettings,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            spider: Spider::new(engine, robots, settings),
            writer: DatasetWriter::new(output_dir),
        }
    }

    /// 执行一次完整的采集运行
    ///
    /// 单页失败只进入统计；被取消的运行不发布任何工件。
    ///
    /// # 参数
    ///
    /// * `target` - 爬取目标
    /// * `cancel` - 取消令牌
    ///
    /// # 返回值
    ///
    /// * `Ok(HarvestSummary)` - 运行摘要，latest工件已就位
    /// * `Err(HarvestError)` - 运行中止，之前发布的工件未受影响
    pub async fn run(
        &self,
        target: CrawlTarget,
        cancel: CancelToken,
    ) -> Result<HarvestSummary, HarvestError> {
        let _permit = fandom_lock::registry()
            .try_acquire(target.fandom_id())
            .ok_or_else(|| HarvestError::CrawlInProgress(target.fandom_id().to_string()))?;

        let run_id = Uuid::new_v4();
        let started = Instant::now();
        info!(
            %run_id,
            fandom = target.fandom_id(),
            budget = target.page_budget(),
            "starting crawl of {}",
            target.root_url()
        );

        let output = self.spider.crawl(&target, &cancel).await;
        let mut stats = output.stats;

        let mut records = Vec::new();
        for fetched in &output.pages {
            // Listing pages only feed link discovery
            if fetched.page.kind != PageKind::Article {
                continue;
            }
            match ExtractionService::extract(&fetched.content, &fetched.page.url, &target) {
                Some(record) => records.push(record),
                None => stats.pages_skipped += 1,
            }
        }

        let dataset = DedupService::normalize(records, target.fandom_id(), Utc::now());

        // A cancelled run publishes nothing at all
        if cancel.is_cancelled() {
            info!(%run_id, "run cancelled, nothing published");
            return Err(HarvestError::Cancelled);
        }

        let write_result = self.writer.publish(&dataset).await?;

        let report = CrawlReport {
            fandom_name: target.fandom_id().to_string(),
            fandom_url: target.root_url().to_string(),
            pages_scraped: stats.pages_fetched,
            pages_failed: stats.pages_failed,
            pages_skipped: stats.pages_skipped,
            duration_seconds: started.elapsed().as_secs_f64(),
            errors_count: stats.errors.len(),
            errors: stats.errors.clone(),
            finished_at: Utc::now(),
        };
        self.writer.write_report(&report).await;

        info!(
            %run_id,
            records = write_result.records,
            fetched = stats.pages_fetched,
            failed = stats.pages_failed,
            skipped = stats.pages_skipped,
            "harvest completed in {:.1}s",
            started.elapsed().as_secs_f64()
        );

        Ok(HarvestSummary {
            fandom_id: target.fandom_id().to_string(),
            records: write_result.records,
            stats,
            snapshot_path: write_result.snapshot_path,
            latest_path: write_result.latest_path,
        })
    }
}
