// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use thiserror::Error;

/// 采集运行错误类型
///
/// 只有 `InvalidTarget`（启动前）和 `WriteFailure`（爬取后）会中止整个运行；
/// 单页抓取或解析失败在 `CrawlStats` 中收集，不会传播到这里。
#[derive(Error, Debug)]
pub enum HarvestError {
    /// 目标URL不是合法的fandom wiki
    #[error("invalid crawl target: {0}")]
    InvalidTarget(String),

    /// 同一fandom的另一个采集正在进行
    #[error("a crawl for fandom '{0}' is already in progress")]
    CrawlInProgress(String),

    /// 数据集工件写入失败
    #[error("failed to write dataset artifact: {0}")]
    WriteFailure(#[from] std::io::Error),

    /// 读取输出目录失败
    #[error("failed to read output directory: {0}")]
    ListingFailure(#[source] std::io::Error),

    /// 运行被取消，未发布任何工件
    #[error("crawl run was cancelled before publishing")]
    Cancelled,

    /// JSON序列化失败
    #[error("failed to serialize dataset: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl HarvestError {
    /// 判断错误是否由调用方输入引起
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            HarvestError::InvalidTarget(_) | HarvestError::CrawlInProgress(_)
        )
    }
}
