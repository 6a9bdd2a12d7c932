// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;

use crate::utils::errors::HarvestError;

/// latest工件的文件名后缀
const LATEST_SUFFIX: &str = "_latest.json";

/// 已发布数据集的目录条目
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DatasetEntry {
    /// fandom标识符
    pub id: String,
    /// 展示名称
    pub name: String,
    /// wiki根URL
    pub url: String,
    /// latest工件文件名
    #[serde(rename = "dataFile")]
    pub data_file: String,
}

/// 已发布工件目录
///
/// 对输出目录中文件系统状态的纯粹反映，不包含任何爬虫逻辑。
pub struct Catalog<'a> {
    /// 输出目录
    output_dir: &'a Path,
    /// 已知fandom的展示名映射
    known_fandoms: &'a HashMap<String, String>,
}

impl<'a> Catalog<'a> {
    /// 创建目录实例
    pub fn new(output_dir: &'a Path, known_fandoms: &'a HashMap<String, String>) -> Self {
        Self {
            output_dir,
            known_fandoms,
        }
    }

    /// 列出所有已发布的数据集
    ///
    /// 扫描输出目录下的`*_latest.json`文件，按fandom标识符排序。
    /// 输出目录不存在视为空目录，不是错误。
    pub fn list_datasets(&self) -> Result<Vec<DatasetEntry>, HarvestError> {
        let mut entries = Vec::new();

        let read_dir = match std::fs::read_dir(self.output_dir) {
            Ok(read_dir) => read_dir,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(entries),
            Err(e) => return Err(HarvestError::ListingFailure(e)),
        };

        for entry in read_dir {
            let entry = entry.map_err(HarvestError::ListingFailure)?;
            let file_name = entry.file_name();
            let Some(file_name) = file_name.to_str() else {
                continue;
            };
            let Some(id) = file_name.strip_suffix(LATEST_SUFFIX) else {
                continue;
            };
            if id.is_empty() || id.starts_with('.') {
                continue;
            }

            entries.push(DatasetEntry {
                id: id.to_string(),
                name: self.display_name(id),
                url: format!("https://{}.fandom.com/", id),
                data_file: file_name.to_string(),
            });
        }

        entries.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(entries)
    }

    /// 检查输出目录是否可用
    ///
    /// 目录存在（或可创建）且可写即视为健康。
    pub fn health(&self) -> Result<(), HarvestError> {
        std::fs::create_dir_all(self.output_dir)?;

        let probe = self.output_dir.join(".health_probe");
        std::fs::write(&probe, b"ok")?;
        std::fs::remove_file(&probe)?;
        Ok(())
    }

    /// fandom标识符的展示名
    ///
    /// 优先使用配置映射，否则首字母大写兜底。
    fn display_name(&self, id: &str) -> String {
        if let Some(name) = self.known_fandoms.get(id) {
            return name.clone();
        }

        let mut chars = id.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            None => String::new(),
        }
    }
}
