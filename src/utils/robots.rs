// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use anyhow::Result;
use reqwest::Client;
use robotstxt::DefaultMatcher;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use url::Url;

use async_trait::async_trait;

/// Robots缓存有效期
const CACHE_TTL: Duration = Duration::from_secs(3600);

/// Robots.txt检查器接口
#[async_trait]
pub trait RobotsCheckerTrait: Send + Sync {
    /// 检查URL是否被允许访问
    async fn is_allowed(&self, url_str: &str, user_agent: &str) -> Result<bool>;
}

/// 缓存的Robots.txt内容
#[derive(Clone)]
struct CachedRobots {
    /// 内容
    content: String,

    /// 过期时间
    expires_at: Instant,
}

/// Robots.txt检查器
///
/// 按主机抓取并缓存robots.txt；抓取失败时视为允许，
/// 单个wiki的robots不可达不应中止整个采集。
#[derive(Clone)]
pub struct RobotsChecker {
    /// HTTP客户端
    client: Client,

    /// 内存缓存
    memory_cache: Arc<Mutex<HashMap<String, CachedRobots>>>,
}

impl Default for RobotsChecker {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RobotsCheckerTrait for RobotsChecker {
    async fn is_allowed(&self, url_str: &str, user_agent: &str) -> Result<bool> {
        let content = match self.get_robots_content(url_str).await {
            Ok(content) => content,
            Err(e) => {
                tracing::debug!("robots.txt unavailable for {}: {}", url_str, e);
                return Ok(true);
            }
        };
        let url = Url::parse(url_str)?;
        let mut matcher = DefaultMatcher::default();
        Ok(matcher.one_agent_allowed_by_robots(user_agent, url.path(), &content))
    }
}

impl RobotsChecker {
    /// 创建新的Robots检查器实例
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            memory_cache: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// 获取Robots.txt内容（带缓存）
    async fn get_robots_content(&self, url_str: &str) -> Result<String> {
        let url = Url::parse(url_str)?;
        let host = url
            .host_str()
            .ok_or_else(|| anyhow::anyhow!("Invalid URL"))?;
        let scheme = url.scheme();

        let robots_url = format!("{}://{}/robots.txt", scheme, host);

        // 1. Check memory cache
        {
            let mut cache = self.memory_cache.lock().unwrap();
            if let Some(cached) = cache.get(&robots_url) {
                if cached.expires_at > Instant::now() {
                    return Ok(cached.content.clone());
                } else {
                    cache.remove(&robots_url);
                }
            }
        }

        // 2. Fetch from the wiki
        let response = self.client.get(&robots_url).send().await?;
        let content = if response.status().is_success() {
            response.text().await?
        } else {
            // Missing robots.txt means everything is allowed
            String::new()
        };

        let mut cache = self.memory_cache.lock().unwrap();
        cache.insert(
            robots_url,
            CachedRobots {
                content: content.clone(),
                expires_at: Instant::now() + CACHE_TTL,
            },
        );

        Ok(content)
    }
}

/// 始终放行的检查器（用于测试和禁用robots的配置）
#[derive(Clone, Default)]
pub struct AllowAllRobots;

#[async_trait]
impl RobotsCheckerTrait for AllowAllRobots {
    async fn is_allowed(&self, _url_str: &str, _user_agent: &str) -> Result<bool> {
        Ok(true)
    }
}
