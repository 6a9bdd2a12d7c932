// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use dashmap::DashSet;
use std::collections::VecDeque;
use url::Url;

use crate::domain::models::crawl::{PageKind, PageRef};
use crate::utils::url_utils;

/// URL边界队列
///
/// 严格FIFO的待抓取队列加访问集合。URL在入队时即标记为已访问，
/// 标记和入队作为一次检查并标记操作完成，同一URL在一次运行中
/// 不会被抓取两次，循环链接图也能保证终止。
#[derive(Debug, Default)]
pub struct Frontier {
    /// FIFO待抓取队列
    queue: VecDeque<PageRef>,
    /// 规范化URL的访问集合
    visited: DashSet<String>,
    /// 下一个发现顺序下标
    next_index: usize,
}

impl Frontier {
    /// 创建空的边界队列
    pub fn new() -> Self {
        Self::default()
    }

    /// 尝试入队一个页面
    ///
    /// # 参数
    ///
    /// * `url` - 页面URL
    /// * `kind` - 页面种类
    /// * `discovered_from` - 发现该页面的父页面下标
    ///
    /// # 返回值
    ///
    /// 页面首次出现并成功入队时返回true，已访问过返回false
    pub fn enqueue(&mut self, url: Url, kind: PageKind, discovered_from: Option<usize>) -> bool {
        let key = url_utils::normalize_url(&url);

        // Check-and-mark is a single insert on the visited set
        if !self.visited.insert(key) {
            return false;
        }

        let page = PageRef {
            url,
            kind,
            discovery_index: self.next_index,
            discovered_from,
        };
        self.next_index += 1;
        self.queue.push_back(page);
        true
    }

    /// 按FIFO顺序出队最多`n`个页面
    pub fn dequeue_batch(&mut self, n: usize) -> Vec<PageRef> {
        let take = n.min(self.queue.len());
        self.queue.drain(..take).collect()
    }

    /// 队列是否为空
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// 已发现的页面总数
    pub fn discovered(&self) -> usize {
        self.next_index
    }
}
