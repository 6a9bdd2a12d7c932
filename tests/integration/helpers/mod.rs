use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use fandomrs::config::settings::CrawlerSettings;
use fandomrs::engines::traits::{EngineError, FetchEngine, FetchRequest, FetchResponse};

/// 按路径提供固定HTML的测试引擎
pub struct FixtureEngine {
    pages: HashMap<String, String>,
    fetches: AtomicUsize,
}

impl FixtureEngine {
    pub fn new(pages: Vec<(&str, &str)>) -> Self {
        Self {
            pages: pages
                .into_iter()
                .map(|(path, html)| (path.to_string(), html.to_string()))
                .collect(),
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FetchEngine for FixtureEngine {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse, EngineError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);

        let path = url::Url::parse(&request.url)
            .map_err(|e| EngineError::Other(e.to_string()))?
            .path()
            .to_string();

        match self.pages.get(&path) {
            Some(html) => Ok(FetchResponse {
                status_code: 200,
                content: html.clone(),
                content_type: "text/html".to_string(),
                response_time_ms: 0,
            }),
            None => Err(EngineError::BadStatus(404)),
        }
    }

    fn name(&self) -> &'static str {
        "fixture"
    }
}

/// 无延迟、不查robots的测试配置
pub fn test_settings() -> CrawlerSettings {
    CrawlerSettings {
        default_page_budget: 50,
        max_concurrency: 2,
        request_timeout_secs: 5,
        download_delay_ms: 0,
        randomize_delay: false,
        respect_robots: false,
        user_agent: "fandomrs-test".to_string(),
    }
}

/// 构造一个指向`name`的角色文章页
pub fn character_page(name: &str, species: &str) -> String {
    format!(
        r#"<html><body>
            <h1 class="page-header__title">{name}</h1>
            <aside class="portable-infobox">
                <img src="/images/{name}.png" />
                <div class="pi-item">
                    <h3 class="pi-data-label">Species</h3>
                    <div class="pi-data-value">{species}</div>
                </div>
            </aside>
            <div class="mw-parser-output">
                <p>{name} is a well known character whose story spans many
                   seasons of the example franchise.</p>
            </div>
        </body></html>"#
    )
}
