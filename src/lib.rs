// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 持久化门面，爬虫生产者保存数据的入口
pub mod application;

/// 配置模块
///
/// 处理应用程序的配置设置和环境变量
pub mod config;

/// 领域模块
///
/// 记录模型、表模式目录和存储特质
pub mod domain;

/// 基础设施模块
///
/// 数据库、文件存储后端和指标
pub mod infrastructure;

/// 工具模块
///
/// 提供时钟、重试策略和日志初始化等通用功能
pub mod utils;
