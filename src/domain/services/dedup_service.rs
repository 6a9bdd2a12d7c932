// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use std::collections::HashMap;

use crate::domain::models::character::{CharacterRecord, Dataset};
use crate::utils::text_processing::collapse_whitespace;

/// 去重归一化服务
///
/// 把提取阶段产出的记录序列折叠成数据集：同名记录
/// （忽略大小写和多余空白）合并为一条，每个字段取发现顺序中
/// 第一个非空的值。输出顺序是名字首次被发现的顺序，给定确定的
/// 遍历顺序，归一化结果也是确定的。对已归一化的数据集再次归一化
/// 得到相同结果。
pub struct DedupService;

impl DedupService {
    /// 归一化记录序列
    ///
    /// # 参数
    ///
    /// * `records` - 按发现顺序排列的角色记录
    /// * `fandom_id` - fandom标识符
    /// * `crawled_at` - 采集完成时间
    ///
    /// # 返回值
    ///
    /// 去重后的数据集
    pub fn normalize(
        records: Vec<CharacterRecord>,
        fandom_id: &str,
        crawled_at: DateTime<Utc>,
    ) -> Dataset {
        let mut merged: Vec<CharacterRecord> = Vec::new();
        let mut index_by_key: HashMap<String, usize> = HashMap::new();

        for mut record in records {
            record.name = collapse_whitespace(&record.name);
            if record.name.is_empty() {
                continue;
            }

            let key = record.name.to_lowercase();
            match index_by_key.get(&key) {
                Some(&index) => {
                    // Earliest discovery wins per field; later records only
                    // fill the gaps
                    merged[index].merge_missing_from(&record);
                }
                None => {
                    index_by_key.insert(key, merged.len());
                    merged.push(record);
                }
            }
        }

        Dataset {
            fandom_id: fandom_id.to_string(),
            crawled_at,
            records: merged,
        }
    }
}
