// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 已发布工件目录查询
pub mod catalog;

/// 数据集工件写入与发布
pub mod dataset_writer;
