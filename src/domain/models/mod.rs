// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 角色记录和数据集
pub mod character;

/// 爬取目标、页面引用和运行统计
pub mod crawl;
