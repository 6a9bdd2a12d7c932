// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 去重归一化服务
pub mod dedup_service;

/// 角色信息提取服务
pub mod extraction_service;
