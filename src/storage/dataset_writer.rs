// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

use crate::domain::models::character::Dataset;
use crate::domain::models::crawl::CrawlReport;
use crate::utils::errors::HarvestError;

/// 写入结果
#[derive(Debug, Clone)]
pub struct WriteResult {
    /// 带时间戳的快照工件路径
    pub snapshot_path: PathBuf,
    /// `<fandomId>_latest.json`工件路径
    pub latest_path: PathBuf,
    /// 写入的记录数
    pub records: usize,
}

/// 数据集写入器
///
/// 每次成功的运行写两个工件：不可变的时间戳快照，以及被原子
/// 替换的`<fandomId>_latest.json`。latest先写入同目录下的临时
/// 文件再改名就位，读者永远看不到写了一半的文件；写入失败时
/// 之前发布的latest保持原样有效。
pub struct DatasetWriter {
    /// 输出目录
    output_dir: PathBuf,
}

impl DatasetWriter {
    /// 创建新的写入器实例
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// 输出目录
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// 发布数据集
    ///
    /// # 参数
    ///
    /// * `dataset` - 归一化后的数据集
    ///
    /// # 返回值
    ///
    /// * `Ok(WriteResult)` - 两个工件的路径
    /// * `Err(HarvestError::WriteFailure)` - I/O失败，旧工件未受影响
    pub async fn publish(&self, dataset: &Dataset) -> Result<WriteResult, HarvestError> {
        fs::create_dir_all(&self.output_dir).await?;

        // The artifact is the JSON array of records, matching what every
        // downstream reader of `<fandomId>_latest.json` expects
        let payload = serde_json::to_vec_pretty(&dataset.records)?;

        let timestamp = dataset.crawled_at.format("%Y%m%d_%H%M%S");
        let snapshot_path = self
            .output_dir
            .join(format!("{}_{}.json", dataset.fandom_id, timestamp));
        Self::write_file(&snapshot_path, &payload).await?;

        let latest_path = self
            .output_dir
            .join(format!("{}_latest.json", dataset.fandom_id));
        self.replace_atomically(&latest_path, &payload, &dataset.fandom_id)
            .await?;

        info!(
            records = dataset.len(),
            latest = %latest_path.display(),
            "dataset published"
        );

        Ok(WriteResult {
            snapshot_path,
            latest_path,
            records: dataset.len(),
        })
    }

    /// 写出采集运行报告
    ///
    /// 报告是诊断用的附属工件，写入失败只记警告，不影响运行结果。
    pub async fn write_report(&self, report: &CrawlReport) {
        let path = self
            .output_dir
            .join(format!("{}_scraping_report.json", report.fandom_name));

        let payload = match serde_json::to_vec_pretty(report) {
            Ok(payload) => payload,
            Err(e) => {
                warn!("could not serialize crawl report: {}", e);
                return;
            }
        };

        if let Err(e) = Self::write_file(&path, &payload).await {
            warn!(path = %path.display(), "could not save crawl report: {}", e);
        }
    }

    /// 原子替换latest工件
    ///
    /// 临时文件写在目标同一目录下，rename不会跨文件系统。
    async fn replace_atomically(
        &self,
        latest_path: &Path,
        payload: &[u8],
        fandom_id: &str,
    ) -> Result<(), HarvestError> {
        let tmp_path = self
            .output_dir
            .join(format!(".{}_latest.json.tmp", fandom_id));

        Self::write_file(&tmp_path, payload).await?;
        fs::rename(&tmp_path, latest_path).await?;
        Ok(())
    }

    /// 写入单个文件并落盘
    async fn write_file(path: &Path, payload: &[u8]) -> Result<(), std::io::Error> {
        let mut file = fs::File::create(path).await?;
        file.write_all(payload).await?;
        file.flush().await?;
        file.sync_all().await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "dataset_writer_test.rs"]
mod tests;
