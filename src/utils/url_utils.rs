// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use url::{ParseError, Url};

/// fandom wiki的托管域名后缀
const FANDOM_DOMAIN: &str = "fandom.com";

/// 将可能为相对路径的URL转换为绝对路径URL
pub fn resolve_url(base_url: &Url, path: &str) -> Result<Url, ParseError> {
    base_url.join(path)
}

/// 判断URL是否属于fandom托管域名
pub fn is_fandom_host(url: &Url) -> bool {
    match url.host_str() {
        Some(host) => {
            host == FANDOM_DOMAIN || host.ends_with(&format!(".{}", FANDOM_DOMAIN))
        }
        None => false,
    }
}

/// 从URL中推导fandom标识符
///
/// 取托管域名第一个`.`之前的子域名标签，
/// 例如 `https://leagueoflegends.fandom.com/` 得到 `leagueoflegends`。
pub fn fandom_id(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    let label = host.split('.').next()?;
    if label.is_empty() {
        None
    } else {
        Some(label.to_string())
    }
}

/// 规范化URL用于访问集合比较
///
/// 移除片段标识符，其余部分保持原样。规范化后的字符串
/// 是访问集合的键，保证同一页面经由带锚点的链接不会被重复抓取。
pub fn normalize_url(url: &Url) -> String {
    let mut clean = url.clone();
    clean.set_fragment(None);
    clean.to_string()
}

/// 从页面URL解码文章标题
///
/// 用于标题选择器全部落空时的兜底：取路径最后一段，
/// 下划线还原为空格并进行百分号解码。
pub fn title_from_url(url: &Url) -> Option<String> {
    let segment = url.path_segments()?.filter(|s| !s.is_empty()).next_back()?;
    let decoded = urlencoding::decode(segment).ok()?;
    let title = decoded.replace('_', " ");
    if title.is_empty() {
        None
    } else {
        Some(title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_fandom_host() {
        let ok = Url::parse("https://leagueoflegends.fandom.com/wiki/Ahri").unwrap();
        assert!(is_fandom_host(&ok));

        let bare = Url::parse("https://fandom.com/").unwrap();
        assert!(is_fandom_host(&bare));

        let bad = Url::parse("https://notfandom.org/").unwrap();
        assert!(!is_fandom_host(&bad));

        // Suffix match must respect label boundaries
        let sneaky = Url::parse("https://evilfandom.com/").unwrap();
        assert!(!is_fandom_host(&sneaky));
    }

    #[test]
    fn test_fandom_id() {
        let url = Url::parse("https://starwars.fandom.com/").unwrap();
        assert_eq!(fandom_id(&url).unwrap(), "starwars");
    }

    #[test]
    fn test_normalize_url_strips_fragment() {
        let url = Url::parse("https://example.fandom.com/wiki/Ahri#History").unwrap();
        assert_eq!(
            normalize_url(&url),
            "https://example.fandom.com/wiki/Ahri"
        );
    }

    #[test]
    fn test_title_from_url() {
        let url = Url::parse("https://example.fandom.com/wiki/Miss_Fortune").unwrap();
        assert_eq!(title_from_url(&url).unwrap(), "Miss Fortune");

        let encoded = Url::parse("https://example.fandom.com/wiki/Kai%27Sa").unwrap();
        assert_eq!(title_from_url(&encoded).unwrap(), "Kai'Sa");
    }
}
