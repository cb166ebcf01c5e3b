// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 爬虫生产者面向的持久化入口
pub mod persistence;

pub use persistence::PersistenceFacade;
