// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// URL边界队列和访问集合
pub mod frontier;

/// wiki链接发现与过滤
pub mod link_discoverer;

/// 广度优先爬虫
pub mod spider;
