// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

static IMAGE_REVISION_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/revision/.*$").expect("valid regex"));

/// 折叠文本中的冗余空白
///
/// 去除首尾空白并把内部连续空白压缩为单个空格。
/// 所有进入数据集的文本字段都先经过此函数。
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RUN.replace_all(text.trim(), " ").into_owned()
}

/// 清理fandom图片URL
///
/// 移除`/revision/...`缩放后缀和查询参数，得到原始质量的图片地址。
pub fn clean_image_url(url: &str) -> String {
    let without_query = match url.split_once('?') {
        Some((head, _)) => head,
        None => url,
    };
    IMAGE_REVISION_SUFFIX.replace(without_query, "").into_owned()
}

/// 判断URL是否指向有效的内容图片
///
/// 排除站点logo、编辑图标和占位图，并要求常见图片扩展名。
pub fn is_valid_image_url(url: &str) -> bool {
    if url.is_empty() {
        return false;
    }

    let lower = url.to_lowercase();

    const EXCLUDED: [&str; 6] = [
        "edit-icon",
        "commons-logo",
        "wikia-logo",
        "fandom-logo",
        "blank.gif",
        "pixel.gif",
    ];
    if EXCLUDED.iter().any(|p| lower.contains(p)) {
        return false;
    }

    const EXTENSIONS: [&str; 5] = [".jpg", ".jpeg", ".png", ".gif", ".webp"];
    EXTENSIONS.iter().any(|ext| lower.contains(ext))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  Ahri  "), "Ahri");
        assert_eq!(
            collapse_whitespace("the\n Nine-Tailed\t\tFox"),
            "the Nine-Tailed Fox"
        );
        assert_eq!(collapse_whitespace(""), "");
    }

    #[test]
    fn test_clean_image_url() {
        let raw = "https://static.wikia.nocookie.net/lol/images/a/a1/Ahri.png/revision/latest/scale-to-width-down/300?cb=123";
        assert_eq!(
            clean_image_url(raw),
            "https://static.wikia.nocookie.net/lol/images/a/a1/Ahri.png"
        );

        let plain = "https://example.com/a.jpg";
        assert_eq!(clean_image_url(plain), plain);
    }

    #[test]
    fn test_is_valid_image_url() {
        assert!(is_valid_image_url("https://x.net/img/Ahri.png"));
        assert!(!is_valid_image_url("https://x.net/fandom-logo.png"));
        assert!(!is_valid_image_url("https://x.net/document.pdf"));
        assert!(!is_valid_image_url(""));
    }
}
