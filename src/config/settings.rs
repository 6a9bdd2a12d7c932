// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;

/// 应用程序配置设置
#[derive(Debug, Deserialize)]
pub struct Settings {
    /// 爬虫配置
    pub crawler: CrawlerSettings,
    /// 存储配置
    pub storage: StorageSettings,
    /// 已知fandom的展示名映射
    #[serde(default)]
    pub known_fandoms: HashMap<String, String>,
}

/// 爬虫配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerSettings {
    /// 默认页面预算
    pub default_page_budget: usize,
    /// 最大并发抓取数
    pub max_concurrency: usize,
    /// 单次请求超时时间（秒）
    pub request_timeout_secs: u64,
    /// 批次间的下载延迟（毫秒，0为不延迟）
    pub download_delay_ms: u64,
    /// 延迟是否加入随机抖动
    pub randomize_delay: bool,
    /// 是否遵循robots.txt
    pub respect_robots: bool,
    /// 请求使用的User-Agent
    pub user_agent: String,
}

/// 存储配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    /// 数据集工件输出目录
    pub output_dir: String,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 从环境变量加载配置，支持默认值
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Config::builder()
            // Default crawler settings
            .set_default("crawler.default_page_budget", 50)?
            .set_default("crawler.max_concurrency", 4)?
            .set_default("crawler.request_timeout_secs", 30)?
            .set_default("crawler.download_delay_ms", 250)?
            .set_default("crawler.randomize_delay", true)?
            .set_default("crawler.respect_robots", true)?
            .set_default(
                "crawler.user_agent",
                "Mozilla/5.0 (compatible; fandomrs/0.1; +https://github.com/fandomrs)",
            )?
            // Default storage settings
            .set_default("storage.output_dir", "./data")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("FANDOMRS").separator("__"));

        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
