// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::{EntityKind, Platform, Record};
use crate::domain::schema::SchemaError;
use async_trait::async_trait;
use thiserror::Error;

/// 存储错误类型
#[derive(Error, Debug)]
pub enum StoreError {
    /// 配置错误（未知后端、数据库地址缺失等），不重试
    #[error("Configuration error: {0}")]
    Configuration(String),
    /// 当前后端不支持该操作
    #[error("Operation {operation} is not supported by the {backend} backend")]
    UnsupportedOperation {
        backend: &'static str,
        operation: &'static str,
    },
    /// 输入记录不符合模式
    #[error("Invalid record: {0}")]
    InvalidRecord(#[from] SchemaError),
    /// 唯一约束冲突，upsert 内部会转为重试
    #[error("Constraint violation on {table}: {detail}")]
    ConstraintViolation { table: &'static str, detail: String },
    /// 持久化失败（重试耗尽或数据库拒绝写入）
    #[error("Persistence error: {0}")]
    Persistence(String),
    /// 存储引擎不可用，交由调用方决定是否重试
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
    /// 文件读写错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// JSON 序列化错误
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// CSV 编码错误
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// 单次写入的结果，用于日志和指标
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOutcome {
    Inserted,
    Updated,
    Appended,
    Skipped,
}

impl StoreOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreOutcome::Inserted => "inserted",
            StoreOutcome::Updated => "updated",
            StoreOutcome::Appended => "appended",
            StoreOutcome::Skipped => "skipped",
        }
    }
}

/// 爬虫数据存储特质
///
/// 每个实例绑定一个平台。所有方法接收一条完整的记录，成功即返回 `()`，
/// 调用方不依赖返回值做流程控制。平台未声明的实体类型视为成功的空操作。
#[async_trait]
pub trait CrawlerStore: Send + Sync {
    /// 后端名称（csv/db/json/sqlite）
    fn backend(&self) -> &'static str;

    /// 绑定的平台
    fn platform(&self) -> Platform;

    /// 按实体类型写入一条记录
    async fn store(&self, kind: EntityKind, record: &Record) -> Result<(), StoreError>;

    /// 存储内容
    async fn store_content(&self, record: &Record) -> Result<(), StoreError> {
        self.store(EntityKind::Content, record).await
    }

    /// 存储评论
    async fn store_comment(&self, record: &Record) -> Result<(), StoreError> {
        self.store(EntityKind::Comment, record).await
    }

    /// 存储创作者
    async fn store_creator(&self, record: &Record) -> Result<(), StoreError> {
        self.store(EntityKind::Creator, record).await
    }

    /// 存储关注关系
    async fn store_contact(&self, record: &Record) -> Result<(), StoreError> {
        self.store(EntityKind::Contact, record).await
    }

    /// 存储动态
    async fn store_dynamic(&self, record: &Record) -> Result<(), StoreError> {
        self.store(EntityKind::Dynamic, record).await
    }

    /// 存储话题
    async fn store_topic(&self, record: &Record) -> Result<(), StoreError> {
        self.store(EntityKind::Topic, record).await
    }

    /// 存储爬取任务
    async fn store_crawling_task(&self, record: &Record) -> Result<(), StoreError> {
        self.store(EntityKind::CrawlingTask, record).await
    }
}
