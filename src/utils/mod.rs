// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 取消令牌
pub mod cancellation;

/// 错误类型定义
pub mod errors;

/// 每个fandom的采集互斥锁
pub mod fandom_lock;

/// Robots.txt检查器
pub mod robots;

/// 遥测和日志初始化
pub mod telemetry;

/// 文本处理工具
pub mod text_processing;

/// URL处理工具
pub mod url_utils;
