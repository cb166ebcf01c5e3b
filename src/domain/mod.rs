// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// 该模块包含持久化核心的业务概念，包括：
/// - 领域模型（models）：记录、平台、话题、爬取任务、新闻
/// - 记录模式（schema）：各平台实体的字段布局与身份键
/// - 仓库接口（repositories）：存储后端的统一契约
///
/// 领域层不依赖于任何具体的存储实现。
pub mod models;
pub mod repositories;
pub mod schema;
