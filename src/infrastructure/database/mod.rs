// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 数据库模块
///
/// 提供数据库连接、按模式目录同步表结构，以及记录与 SQL 值之间的转换
pub mod connection;
pub mod schema_sync;
pub mod values;
