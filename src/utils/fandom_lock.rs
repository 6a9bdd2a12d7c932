// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use dashmap::DashMap;
use once_cell::sync::Lazy;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore, TryAcquireError};

/// 进程级的fandom锁注册表
static REGISTRY: Lazy<FandomLockRegistry> = Lazy::new(FandomLockRegistry::new);

/// 每个fandom的采集互斥锁管理器
///
/// 同一fandom同时只允许一个采集运行，避免并发运行
/// 竞争写同一个`<fandomId>_latest.json`工件。
#[derive(Debug)]
pub struct FandomLockRegistry {
    /// 存储每个fandom的信号量
    locks: DashMap<String, Arc<Semaphore>>,
}

impl FandomLockRegistry {
    fn new() -> Self {
        Self {
            locks: DashMap::new(),
        }
    }

    /// 尝试获取指定fandom的独占许可
    ///
    /// # 参数
    ///
    /// * `fandom_id` - fandom标识符
    ///
    /// # 返回值
    ///
    /// * `Some(permit)` - 获取成功，许可在drop时释放
    /// * `None` - 该fandom已有采集在进行
    pub fn try_acquire(&self, fandom_id: &str) -> Option<OwnedSemaphorePermit> {
        let semaphore = self
            .locks
            .entry(fandom_id.to_string())
            .or_insert_with(|| Arc::new(Semaphore::new(1)))
            .clone();

        match semaphore.try_acquire_owned() {
            Ok(permit) => Some(permit),
            Err(TryAcquireError::NoPermits) => None,
            Err(TryAcquireError::Closed) => None,
        }
    }
}

/// 获取全局锁注册表
pub fn registry() -> &'static FandomLockRegistry {
    &REGISTRY
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_acquire_fails_until_release() {
        let registry = FandomLockRegistry::new();

        let permit = registry.try_acquire("example").expect("first acquire");
        assert!(registry.try_acquire("example").is_none());

        // A different fandom is unaffected
        assert!(registry.try_acquire("other").is_some());

        drop(permit);
        assert!(registry.try_acquire("example").is_some());
    }
}
