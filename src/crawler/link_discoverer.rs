// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use anyhow::Result;
use scraper::{Html, Selector};
use url::Url;

use crate::domain::models::crawl::PageKind;

/// 不跟踪的wiki系统命名空间
const EXCLUDED_NAMESPACES: [&str; 7] = [
    "Special:",
    "Template:",
    "File:",
    "User:",
    "Talk:",
    "Help:",
    "MediaWiki:",
];

/// 链接发现器
///
/// 负责从wiki页面中提取并过滤站内链接。
pub struct LinkDiscoverer;

/// 发现的站内链接
#[derive(Debug, Clone)]
pub struct DiscoveredLink {
    /// 链接URL
    pub url: Url,
    /// 目标页面种类
    pub kind: PageKind,
}

impl LinkDiscoverer {
    /// 从HTML内容中提取同一wiki的文章和列表链接
    ///
    /// 只保留与基准URL同主机、位于`/wiki/`命名空间的链接；
    /// 系统命名空间、编辑链接和红链被排除。分类页链接作为
    /// 列表页返回，其余作为文章页。片段标识符被移除。
    ///
    /// # 参数
    ///
    /// * `html_content` - HTML内容
    /// * `base_url` - 发现链接的页面URL
    ///
    /// # 返回值
    ///
    /// * `Ok(Vec<DiscoveredLink>)` - 按文档顺序排列的链接
    /// * `Err(anyhow::Error)` - 选择器解析失败
    pub fn extract_links(html_content: &str, base_url: &Url) -> Result<Vec<DiscoveredLink>> {
        let fragment = Html::parse_document(html_content);
        let selector =
            Selector::parse("a[href]").map_err(|e| anyhow::anyhow!("Invalid selector: {:?}", e))?;

        let mut links = Vec::new();

        for element in fragment.select(&selector) {
            let Some(href) = element.value().attr("href") else {
                continue;
            };

            if href.starts_with('#') || href.starts_with("mailto:") || href.starts_with("javascript:")
            {
                continue;
            }

            let Ok(mut url) = base_url.join(href) else {
                continue;
            };
            if url.scheme() != "http" && url.scheme() != "https" {
                continue;
            }
            // Remove fragment to improve deduplication
            url.set_fragment(None);

            if let Some(kind) = Self::classify(&url, base_url) {
                links.push(DiscoveredLink { url, kind });
            }
        }

        Ok(links)
    }

    /// 判定链接是否值得跟踪，以及目标页面的种类
    fn classify(url: &Url, base_url: &Url) -> Option<PageKind> {
        if url.host_str() != base_url.host_str() {
            return None;
        }

        let path = url.path();
        if !path.starts_with("/wiki/") {
            return None;
        }

        // Edit links and red links point at non-articles
        if let Some(query) = url.query() {
            if query.contains("action=edit") || query.contains("redlink=1") {
                return None;
            }
        }

        let page_name = &path["/wiki/".len()..];
        if page_name.is_empty() {
            return None;
        }

        // Decode so that e.g. "Talk%3A" is still recognized
        let decoded = urlencoding::decode(page_name)
            .map(|d| d.into_owned())
            .unwrap_or_else(|_| page_name.to_string());

        if decoded.starts_with("Category:") {
            return Some(PageKind::Listing);
        }
        if EXCLUDED_NAMESPACES.iter().any(|ns| decoded.starts_with(ns)) {
            return None;
        }

        Some(PageKind::Article)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HTML: &str = r##"
        <html><body>
            <div class="category-page__members">
                <a href="/wiki/Ahri">Ahri</a>
                <a href="/wiki/Category:Champions">Champions</a>
                <a href="/wiki/Special:AllPages">All pages</a>
                <a href="/wiki/Template:Infobox">Template</a>
                <a href="/wiki/Akali?action=edit&redlink=1">Red link</a>
                <a href="/wiki/Garen#Trivia">Garen</a>
                <a href="https://other.fandom.com/wiki/Elsewhere">Other wiki</a>
                <a href="mailto:someone@example.com">Mail</a>
                <a href="#top">Top</a>
            </div>
        </body></html>
    "##;

    #[test]
    fn test_extract_keeps_article_and_category_links_only() {
        let base = Url::parse("https://example.fandom.com/wiki/Category:Characters").unwrap();
        let links = LinkDiscoverer::extract_links(HTML, &base).unwrap();

        let paths: Vec<(&str, PageKind)> = links
            .iter()
            .map(|l| (l.url.path(), l.kind))
            .collect();

        assert_eq!(
            paths,
            vec![
                ("/wiki/Ahri", PageKind::Article),
                ("/wiki/Category:Champions", PageKind::Listing),
                ("/wiki/Garen", PageKind::Article),
            ]
        );

        // Fragment was stripped
        assert!(links[2].url.fragment().is_none());
    }

    #[test]
    fn test_document_order_is_preserved() {
        let base = Url::parse("https://example.fandom.com/").unwrap();
        let html = r#"<a href="/wiki/B">B</a><a href="/wiki/A">A</a>"#;
        let links = LinkDiscoverer::extract_links(html, &base).unwrap();
        assert_eq!(links[0].url.path(), "/wiki/B");
        assert_eq!(links[1].url.path(), "/wiki/A");
    }
}
