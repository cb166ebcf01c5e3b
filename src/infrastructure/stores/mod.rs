// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 存储后端模块
///
/// 提供 `CrawlerStore` 的各个实现：
/// - 关系型数据库（db_store）：Postgres 与 SQLite 共用的 upsert 实现
/// - JSON 文件（json_store）：按身份原地替换或追加
/// - CSV 文件（csv_store）：只追加
/// - 文件写入（file_writer）：按文件加锁的异步写入
/// - 选择器（factory）：根据配置解析唯一后端
pub mod csv_store;
pub mod db_store;
pub mod factory;
pub mod file_writer;
pub mod json_store;

pub use csv_store::CsvCrawlerStore;
pub use db_store::SqlCrawlerStore;
pub use factory::{SaveDataOption, StoreSelector};
pub use file_writer::{AsyncFileWriter, FileLocks};
pub use json_store::JsonCrawlerStore;
