// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 角色记录实体
///
/// 从单个wiki文章页提取的结构化角色信息。
/// `name`在一个数据集内唯一（忽略大小写和多余空白）；
/// 字段顺序即发布工件中的JSON字段顺序。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterRecord {
    /// 角色名称，数据集内的唯一键
    pub name: String,
    /// 主图片URL
    pub image_url: Option<String>,
    /// 角色描述，缺省为空字符串
    #[serde(default)]
    pub description: String,
    /// 类型/职业/种族等分类标签
    pub character_type: Option<String>,
    /// 信息框中的第一个附加属性
    pub attribute_1: Option<String>,
    /// 信息框中的第二个附加属性
    pub attribute_2: Option<String>,
    /// 所属fandom标识符
    pub fandom_name: String,
    /// 来源页面URL
    pub page_url: String,
}

impl CharacterRecord {
    /// 判断记录的某个可选字段是否为空
    fn field_is_empty(value: &Option<String>) -> bool {
        match value {
            Some(v) => v.is_empty(),
            None => true,
        }
    }

    /// 用后续发现的记录补全空缺字段
    ///
    /// 每个字段保留发现顺序中第一个非空的值；
    /// 当前记录已有的非空字段不会被覆盖。
    pub fn merge_missing_from(&mut self, other: &CharacterRecord) {
        if Self::field_is_empty(&self.image_url) && !Self::field_is_empty(&other.image_url) {
            self.image_url = other.image_url.clone();
        }
        if self.description.is_empty() && !other.description.is_empty() {
            self.description = other.description.clone();
        }
        if Self::field_is_empty(&self.character_type)
            && !Self::field_is_empty(&other.character_type)
        {
            self.character_type = other.character_type.clone();
        }
        if Self::field_is_empty(&self.attribute_1) && !Self::field_is_empty(&other.attribute_1) {
            self.attribute_1 = other.attribute_1.clone();
        }
        if Self::field_is_empty(&self.attribute_2) && !Self::field_is_empty(&other.attribute_2) {
            self.attribute_2 = other.attribute_2.clone();
        }
    }
}

/// 数据集实体
///
/// 一次采集运行产出的去重归一化角色集合。
/// 运行期间由流水线独占持有，发布后工件成为事实来源。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    /// fandom标识符
    pub fandom_id: String,
    /// 采集完成时间
    pub crawled_at: DateTime<Utc>,
    /// 按首次发现顺序排列的角色记录
    pub records: Vec<CharacterRecord>,
}

impl Dataset {
    /// 数据集内的记录数
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// 数据集是否为空
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
