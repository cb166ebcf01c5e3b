// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施层模块
///
/// 该模块包含存储相关的技术实现细节。
///
/// 包含的子模块：
/// - 数据库（database）：连接池、表结构同步与值转换
/// - 可观测性（observability）：存储写入指标
/// - 存储（stores）：领域存储接口的具体实现与后端选择器
///
/// 基础设施层依赖于领域层的抽象接口，领域层不感知具体存储技术。
pub mod database;
pub mod observability;
pub mod stores;
