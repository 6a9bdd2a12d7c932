// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 包含采集流水线的编排用例
pub mod application;

/// 配置模块
///
/// 处理应用程序的配置设置和环境变量
pub mod config;

/// 爬虫模块
///
/// 实现广度优先遍历、URL边界队列和链接发现
pub mod crawler;

/// 领域模块
///
/// 包含核心业务实体和领域服务
pub mod domain;

/// 引擎模块
///
/// 实现网页抓取引擎
pub mod engines;

/// 存储模块
///
/// 负责数据集工件的写入、发布和目录查询
pub mod storage;

/// 工具模块
///
/// 提供通用的工具函数和辅助功能
pub mod utils;
