// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use futures::future::join_all;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::settings::CrawlerSettings;
use crate::crawler::frontier::Frontier;
use crate::crawler::link_discoverer::LinkDiscoverer;
use crate::domain::models::crawl::{CrawlStats, CrawlTarget, PageKind, PageRef};
use crate::engines::traits::{FetchEngine, FetchRequest};
use crate::utils::cancellation::CancelToken;
use crate::utils::robots::RobotsCheckerTrait;

/// 爬虫在根URL之外尝试的标准列表入口
///
/// 覆盖常见fandom皮肤的角色分类命名，不存在的入口404后被跳过。
const LISTING_SEEDS: [&str; 9] = [
    "/wiki/Special:AllPages",
    "/wiki/Category:Characters",
    "/wiki/Category:Character",
    "/wiki/Category:People",
    "/wiki/Category:Heroes",
    "/wiki/Category:Villains",
    "/wiki/Category:Champions",
    "/wiki/Category:Pokemon",
    "/wiki/Category:Jedi",
];

/// 抓取成功的页面
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// 页面引用
    pub page: PageRef,
    /// 页面HTML内容
    pub content: String,
}

/// 爬取输出
///
/// 按抓取顺序排列的页面序列，有限且受页面预算约束。
#[derive(Debug, Default)]
pub struct CrawlOutput {
    /// 成功抓取的页面
    pub pages: Vec<FetchedPage>,
    /// 运行统计
    pub stats: CrawlStats,
}

/// 广度优先爬虫
///
/// 从根URL和标准列表入口出发做严格FIFO的广度优先遍历，
/// 直到边界队列耗尽或达到页面预算。预算耗尽是正常的终止
/// 条件；单页抓取失败被记录后跳过，不在本次运行内重试。
pub struct Spider<E: FetchEngine> {
    /// 抓取引擎
    engine: Arc<E>,
    /// Robots.txt检查器
    robots: Arc<dyn RobotsCheckerTrait>,
    /// 爬虫配置
    settings: CrawlerSettings,
}

impl<E: FetchEngine> Spider<E> {
    /// 创建新的爬虫实例
    pub fn new(
        engine: Arc<E>,
        robots: Arc<dyn RobotsCheckerTrait>,
        settings: CrawlerSettings,
    ) -> Self {
        Self {
            engine,
            robots,
            settings,
        }
    }

    /// 执行一次受预算约束的爬取
    ///
    /// 同时在途的抓取数不超过`max_concurrency`，但结果严格按
    /// 出队顺序处理，链接发现顺序（进而数据集顺序）是确定的。
    /// 收到取消请求后不再发起新抓取，在途请求各自完成。
    ///
    /// # 参数
    ///
    /// * `target` - 爬取目标
    /// * `cancel` - 取消令牌
    ///
    /// # 返回值
    ///
    /// 抓取到的页面序列和运行统计
    pub async fn crawl(&self, target: &CrawlTarget, cancel: &CancelToken) -> CrawlOutput {
        let mut frontier = Frontier::new();
        let mut output = CrawlOutput::default();
        let budget = target.page_budget();
        let concurrency = self.settings.max_concurrency.max(1);

        self.seed_frontier(&mut frontier, target);

        while !frontier.is_empty() && output.pages.len() < budget {
            if cancel.is_cancelled() {
                info!("cancellation requested, no further fetches will be issued");
                break;
            }

            let batch_size = concurrency.min(budget - output.pages.len());
            let batch = frontier.dequeue_batch(batch_size);
            let batch = self.filter_by_robots(batch, &mut output.stats).await;
            if batch.is_empty() {
                continue;
            }

            // Fetch the whole batch concurrently, then process results in
            // dequeue order so traversal stays deterministic
            let fetches = batch.iter().map(|page| {
                let request = FetchRequest {
                    url: page.url.to_string(),
                    timeout: Duration::from_secs(self.settings.request_timeout_secs),
                };
                let engine = self.engine.clone();
                async move { engine.fetch(&request).await }
            });
            let results = join_all(fetches).await;

            for (page, result) in batch.into_iter().zip(results) {
                match result {
                    Ok(response) => {
                        debug!(
                            url = %page.url,
                            ms = response.response_time_ms,
                            "fetched page"
                        );
                        self.discover_links(&mut frontier, &page, &response.content, &output);
                        output.pages.push(FetchedPage {
                            page,
                            content: response.content,
                        });
                    }
                    Err(e) => {
                        warn!(url = %page.url, "fetch failed: {}", e);
                        output.stats.record_failure(&page.url, e);
                    }
                }
            }

            if self.settings.download_delay_ms > 0 && !frontier.is_empty() {
                tokio::time::sleep(self.batch_delay()).await;
            }
        }

        output.stats.pages_fetched = output.pages.len();
        info!(
            fetched = output.stats.pages_fetched,
            failed = output.stats.pages_failed,
            discovered = frontier.discovered(),
            "crawl finished for {}",
            target.fandom_id()
        );
        output
    }

    /// 用根URL和标准列表入口填充边界队列
    fn seed_frontier(&self, frontier: &mut Frontier, target: &CrawlTarget) {
        frontier.enqueue(target.root_url().clone(), PageKind::Listing, None);
        for seed in LISTING_SEEDS {
            if let Ok(url) = target.root_url().join(seed) {
                frontier.enqueue(url, PageKind::Listing, None);
            }
        }
    }

    /// 过滤robots.txt不允许的页面
    async fn filter_by_robots(&self, batch: Vec<PageRef>, stats: &mut CrawlStats) -> Vec<PageRef> {
        if !self.settings.respect_robots {
            return batch;
        }

        let mut allowed = Vec::with_capacity(batch.len());
        for page in batch {
            match self
                .robots
                .is_allowed(page.url.as_str(), &self.settings.user_agent)
                .await
            {
                Ok(true) => allowed.push(page),
                Ok(false) => {
                    debug!(url = %page.url, "disallowed by robots.txt");
                    stats.record_failure(&page.url, "disallowed by robots.txt");
                }
                Err(e) => {
                    debug!(url = %page.url, "robots check failed: {}", e);
                    allowed.push(page);
                }
            }
        }
        allowed
    }

    /// 从抓取到的页面发现并入队新链接
    ///
    /// 列表页的文章链接和子分类/翻页链接都会入队；
    /// 文章页只跟踪文章链接。
    fn discover_links(
        &self,
        frontier: &mut Frontier,
        page: &PageRef,
        content: &str,
        output: &CrawlOutput,
    ) {
        let links = match LinkDiscoverer::extract_links(content, &page.url) {
            Ok(links) => links,
            Err(e) => {
                warn!(url = %page.url, "link extraction failed: {}", e);
                return;
            }
        };

        // Back-reference to the parent is its position in the fetch sequence
        let parent = Some(output.pages.len());

        for link in links {
            if page.kind == PageKind::Article && link.kind == PageKind::Listing {
                continue;
            }
            frontier.enqueue(link.url, link.kind, parent);
        }
    }

    /// 计算批次间的下载延迟
    fn batch_delay(&self) -> Duration {
        let base = self.settings.download_delay_ms;
        let millis = if self.settings.randomize_delay {
            // Same 0.5x..1.5x spread Scrapy applies to its download delay
            let factor: f64 = rand::rng().random_range(0.5..1.5);
            (base as f64 * factor) as u64
        } else {
            base
        };
        Duration::from_millis(millis)
    }
}

#[cfg(test)]
#[path = "spider_test.rs"]
mod tests;
