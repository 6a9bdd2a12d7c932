// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::Serialize;
use url::Url;

use crate::utils::errors::HarvestError;
use crate::utils::url_utils;

/// 爬取目标
///
/// 一次采集运行的不可变输入：根URL和页面预算。
/// 构造时即完成校验，非法目标在任何网络访问之前被拒绝。
#[derive(Debug, Clone)]
pub struct CrawlTarget {
    root_url: Url,
    page_budget: usize,
    fandom_id: String,
}

impl CrawlTarget {
    /// 创建并校验爬取目标
    ///
    /// # 参数
    ///
    /// * `root_url` - wiki根URL，必须位于`*.fandom.com`
    /// * `page_budget` - 成功抓取的页面数上限，必须≥1
    ///
    /// # 返回值
    ///
    /// * `Ok(CrawlTarget)` - 校验通过的目标
    /// * `Err(HarvestError::InvalidTarget)` - URL或预算非法
    pub fn new(root_url: &str, page_budget: usize) -> Result<Self, HarvestError> {
        let url = Url::parse(root_url)
            .map_err(|e| HarvestError::InvalidTarget(format!("unparseable URL: {}", e)))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(HarvestError::InvalidTarget(format!(
                "unsupported scheme '{}'",
                url.scheme()
            )));
        }

        if !url_utils::is_fandom_host(&url) {
            return Err(HarvestError::InvalidTarget(format!(
                "'{}' is not a *.fandom.com wiki",
                root_url
            )));
        }

        let fandom_id = url_utils::fandom_id(&url).ok_or_else(|| {
            HarvestError::InvalidTarget(format!("cannot derive fandom id from '{}'", root_url))
        })?;

        if page_budget == 0 {
            return Err(HarvestError::InvalidTarget(
                "page budget must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            root_url: url,
            page_budget,
            fandom_id,
        })
    }

    /// wiki根URL
    pub fn root_url(&self) -> &Url {
        &self.root_url
    }

    /// 页面预算
    pub fn page_budget(&self) -> usize {
        self.page_budget
    }

    /// fandom标识符（托管域名第一个`.`之前的子域名标签）
    pub fn fandom_id(&self) -> &str {
        &self.fandom_id
    }
}

/// 页面种类
///
/// 列表页（分类页、Special:AllPages等）只用于发现链接；
/// 文章页才会交给提取器。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    /// 列表页
    Listing,
    /// 文章页
    Article,
}

/// 页面引用
///
/// 遍历过程中对单个待抓取页面的描述。`discovered_from`
/// 是父页面在抓取序列中的下标，仅用于循环诊断，是非拥有的
/// 回溯引用，不会进入保留的数据集。
#[derive(Debug, Clone)]
pub struct PageRef {
    /// 页面URL
    pub url: Url,
    /// 页面种类
    pub kind: PageKind,
    /// 发现顺序下标
    pub discovery_index: usize,
    /// 发现该页面的父页面下标
    pub discovered_from: Option<usize>,
}

/// 采集运行统计
///
/// 单页失败在这里收集，不会中止运行。
#[derive(Debug, Clone, Default, Serialize)]
pub struct CrawlStats {
    /// 成功抓取的页面数
    pub pages_fetched: usize,
    /// 抓取失败的页面数
    pub pages_failed: usize,
    /// 抓取成功但未产出记录的页面数
    pub pages_skipped: usize,
    /// 失败明细
    pub errors: Vec<String>,
}

impl CrawlStats {
    /// 记录一次单页失败
    pub fn record_failure(&mut self, url: &Url, reason: impl std::fmt::Display) {
        self.pages_failed += 1;
        self.errors.push(format!("{}: {}", url, reason));
    }
}

/// 采集运行报告
///
/// 运行结束后以`<fandomId>_scraping_report.json`形式写出，
/// 供外部启动器做诊断展示。
#[derive(Debug, Clone, Serialize)]
pub struct CrawlReport {
    /// fandom标识符
    pub fandom_name: String,
    /// wiki根URL
    pub fandom_url: String,
    /// 成功抓取的页面数
    pub pages_scraped: usize,
    /// 抓取失败的页面数
    pub pages_failed: usize,
    /// 未产出记录的页面数
    pub pages_skipped: usize,
    /// 运行时长（秒）
    pub duration_seconds: f64,
    /// 失败明细数量
    pub errors_count: usize,
    /// 失败明细
    pub errors: Vec<String>,
    /// 结束时间
    pub finished_at: DateTime<Utc>,
}

#[cfg(test)]
#[path = "crawl_test.rs"]
mod tests;
