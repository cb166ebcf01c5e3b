// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 仓库接口模块
///
/// 该模块定义了领域层的存储接口，遵循依赖倒置原则。
/// 具体实现（关系型数据库、JSON 文件、CSV 文件）由基础设施层提供。
pub mod crawler_store;

pub use crawler_store::{CrawlerStore, StoreError, StoreOutcome};
