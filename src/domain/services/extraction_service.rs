// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::warn;
use url::Url;

use crate::domain::models::character::CharacterRecord;
use crate::domain::models::crawl::CrawlTarget;
use crate::utils::text_processing::{clean_image_url, collapse_whitespace, is_valid_image_url};
use crate::utils::url_utils;

/// 标题选择器，按fandom皮肤的常见程度排序
const TITLE_SELECTORS: [&str; 4] = [
    "h1.page-header__title",
    "h1#firstHeading",
    "h1.mw-page-title-main",
    "h1",
];

/// 主图片选择器
const IMAGE_SELECTORS: [&str; 5] = [
    ".portable-infobox img",
    ".infobox img",
    ".infobox-image img",
    "figure.thumb img",
    ".mw-content-text img",
];

/// 正文容器选择器
const BODY_SELECTORS: [&str; 2] = [".mw-parser-output", ".mw-content-text"];

/// 被视为角色分类的信息框标签
const TYPE_LABELS: [&str; 10] = [
    "type",
    "class",
    "role",
    "species",
    "occupation",
    "position",
    "race",
    "faction",
    "allegiance",
    "origin",
];

/// 描述段落的最小长度，短于此值的段落继续向后找
const MIN_DESCRIPTION_LEN: usize = 50;

static PARAGRAPH: Lazy<Selector> = Lazy::new(|| Selector::parse("p").expect("valid selector"));

/// 角色信息提取服务
///
/// 从单个wiki文章页的HTML中提取结构化角色记录。
/// 不像文章页的内容（既没有标题也没有正文）返回None；
/// 解析问题只记日志，永远不会中止整个爬取。
pub struct ExtractionService;

impl ExtractionService {
    /// 提取角色记录
    ///
    /// # 参数
    ///
    /// * `html_content` - 页面HTML内容
    /// * `page_url` - 页面URL
    /// * `target` - 本次运行的爬取目标
    ///
    /// # 返回值
    ///
    /// * `Some(CharacterRecord)` - 提取到的记录
    /// * `None` - 页面不是角色文章页
    pub fn extract(
        html_content: &str,
        page_url: &Url,
        target: &CrawlTarget,
    ) -> Option<CharacterRecord> {
        let document = Html::parse_document(html_content);

        let title = Self::extract_title(&document);
        let body = Self::select_body(&document);

        // Pages with neither a title nor a content body are not articles
        if title.is_none() && body.is_none() {
            warn!(url = %page_url, "page has no title and no body, skipping");
            return None;
        }

        let name = match title.or_else(|| url_utils::title_from_url(page_url)) {
            Some(name) if !name.is_empty() => name,
            _ => {
                warn!(url = %page_url, "no usable name, skipping");
                return None;
            }
        };

        let infobox = Self::extract_infobox_pairs(&document);
        let (character_type, attribute_1, attribute_2) = Self::pick_attributes(&name, infobox);

        Some(CharacterRecord {
            name,
            image_url: Self::extract_main_image(&document, page_url),
            description: Self::extract_description(body),
            character_type,
            attribute_1,
            attribute_2,
            fandom_name: target.fandom_id().to_string(),
            page_url: page_url.to_string(),
        })
    }

    /// 提取页面标题
    fn extract_title(document: &Html) -> Option<String> {
        for selector_str in TITLE_SELECTORS {
            let Ok(selector) = Selector::parse(selector_str) else {
                continue;
            };
            if let Some(element) = document.select(&selector).next() {
                let text = collapse_whitespace(&element.text().collect::<Vec<_>>().join(" "));
                if !text.is_empty() {
                    return Some(text);
                }
            }
        }
        None
    }

    /// 定位正文容器
    fn select_body(document: &Html) -> Option<ElementRef<'_>> {
        for selector_str in BODY_SELECTORS {
            let Ok(selector) = Selector::parse(selector_str) else {
                continue;
            };
            if let Some(element) = document.select(&selector).next() {
                return Some(element);
            }
        }
        None
    }

    /// 提取第一张有效的内容图片
    fn extract_main_image(document: &Html, page_url: &Url) -> Option<String> {
        for selector_str in IMAGE_SELECTORS {
            let Ok(selector) = Selector::parse(selector_str) else {
                continue;
            };
            for element in document.select(&selector) {
                let Some(src) = element
                    .value()
                    .attr("data-src")
                    .or_else(|| element.value().attr("src"))
                else {
                    continue;
                };
                if !is_valid_image_url(src) {
                    continue;
                }
                if let Ok(absolute) = url_utils::resolve_url(page_url, src) {
                    return Some(clean_image_url(absolute.as_str()));
                }
            }
        }
        None
    }

    /// 提取描述
    ///
    /// 取正文里第一个足够长的段落；都太短时退回拼接前几段。
    fn extract_description(body: Option<ElementRef<'_>>) -> String {
        let Some(body) = body else {
            return String::new();
        };

        let mut short_paragraphs = Vec::new();
        for paragraph in body.select(&PARAGRAPH) {
            let text = collapse_whitespace(&paragraph.text().collect::<Vec<_>>().join(" "));
            if text.len() >= MIN_DESCRIPTION_LEN {
                return text;
            }
            if !text.is_empty() && short_paragraphs.len() < 3 {
                short_paragraphs.push(text);
            }
        }
        short_paragraphs.join(" ")
    }

    /// 按文档顺序提取信息框键值对
    ///
    /// 同时支持portable-infobox和传统表格式infobox。
    fn extract_infobox_pairs(document: &Html) -> Vec<(String, String)> {
        let mut pairs = Vec::new();

        let portable = Selector::parse(".portable-infobox .pi-item").ok();
        let label_sel = Selector::parse(".pi-data-label").ok();
        let value_sel = Selector::parse(".pi-data-value").ok();
        if let (Some(item), Some(label_sel), Some(value_sel)) = (portable, label_sel, value_sel) {
            for row in document.select(&item) {
                let label = row
                    .select(&label_sel)
                    .next()
                    .map(|e| collapse_whitespace(&e.text().collect::<Vec<_>>().join(" ")));
                let value = row
                    .select(&value_sel)
                    .next()
                    .map(|e| collapse_whitespace(&e.text().collect::<Vec<_>>().join(" ")));
                if let (Some(label), Some(value)) = (label, value) {
                    if !label.is_empty() && !value.is_empty() {
                        pairs.push((label, value));
                    }
                }
            }
        }

        if pairs.is_empty() {
            let row_sel = Selector::parse(".infobox tr").ok();
            let th_sel = Selector::parse("th").ok();
            let td_sel = Selector::parse("td").ok();
            if let (Some(row_sel), Some(th_sel), Some(td_sel)) = (row_sel, th_sel, td_sel) {
                for row in document.select(&row_sel) {
                    let label = row
                        .select(&th_sel)
                        .next()
                        .map(|e| collapse_whitespace(&e.text().collect::<Vec<_>>().join(" ")));
                    let value = row
                        .select(&td_sel)
                        .next()
                        .map(|e| collapse_whitespace(&e.text().collect::<Vec<_>>().join(" ")));
                    if let (Some(label), Some(value)) = (label, value) {
                        if !label.is_empty() && !value.is_empty() {
                            pairs.push((label, value));
                        }
                    }
                }
            }
        }

        pairs
    }

    /// 从信息框键值对中选出分类标签和前两个附加属性
    ///
    /// 标签命中类型词表的对成为`character_type`；其余按文档顺序
    /// 取前两个非标题对作为`attribute_1`/`attribute_2`，格式为
    /// `"Label: Value"`。不足两个不是错误，留空即可。
    fn pick_attributes(
        name: &str,
        pairs: Vec<(String, String)>,
    ) -> (Option<String>, Option<String>, Option<String>) {
        let mut character_type = None;
        let mut attributes: Vec<String> = Vec::new();
        let name_lower = name.to_lowercase();

        for (label, value) in pairs {
            let label_lower = label.to_lowercase();

            // Rows that just repeat the title carry no information
            if value.to_lowercase() == name_lower {
                continue;
            }

            if character_type.is_none() && TYPE_LABELS.iter().any(|t| label_lower.contains(t)) {
                character_type = Some(value);
                continue;
            }

            if attributes.len() < 2 {
                attributes.push(format!("{}: {}", label, value));
            }
        }

        let mut iter = attributes.into_iter();
        (character_type, iter.next(), iter.next())
    }
}

#[cfg(test)]
#[path = "extraction_service_test.rs"]
mod tests;
