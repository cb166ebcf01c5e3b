// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;

use crate::domain::models::{CrawlingTask, EntityKind, NewsItem, Platform, Record, Topic};
use crate::domain::repositories::{CrawlerStore, StoreError};

/// 持久化门面
///
/// 爬虫生产者保存数据的唯一入口，按实体类型转发到启动时选定的存储。
/// 不做重试、批量或缓存，这些交给存储本身或调用方。
#[derive(Clone)]
pub struct PersistenceFacade {
    store: Arc<dyn CrawlerStore>,
}

impl PersistenceFacade {
    pub fn new(store: Arc<dyn CrawlerStore>) -> Self {
        Self { store }
    }

    pub fn platform(&self) -> Platform {
        self.store.platform()
    }

    pub fn backend(&self) -> &'static str {
        self.store.backend()
    }

    /// 按实体类型标签保存一条记录
    pub async fn save(&self, kind: EntityKind, record: &Record) -> Result<(), StoreError> {
        self.store.store(kind, record).await
    }

    /// 保存内容类数据（笔记、视频、新闻）
    pub async fn save_content(&self, record: &Record) -> Result<(), StoreError> {
        self.store.store_content(record).await
    }

    /// 保存话题类数据
    pub async fn save_topic(&self, record: &Record) -> Result<(), StoreError> {
        self.store.store_topic(record).await
    }

    pub async fn save_comment(&self, record: &Record) -> Result<(), StoreError> {
        self.store.store_comment(record).await
    }

    pub async fn save_creator(&self, record: &Record) -> Result<(), StoreError> {
        self.store.store_creator(record).await
    }

    pub async fn save_contact(&self, record: &Record) -> Result<(), StoreError> {
        self.store.store_contact(record).await
    }

    pub async fn save_dynamic(&self, record: &Record) -> Result<(), StoreError> {
        self.store.store_dynamic(record).await
    }

    pub async fn save_crawling_task(&self, record: &Record) -> Result<(), StoreError> {
        self.store.store_crawling_task(record).await
    }

    pub async fn save_news(&self, news: &NewsItem) -> Result<(), StoreError> {
        self.save_content(&news.to_record()).await
    }

    pub async fn save_topic_model(&self, topic: &Topic) -> Result<(), StoreError> {
        self.save_topic(&topic.to_record()).await
    }

    /// 保存爬取任务的当前状态，任务每次状态变化后调用
    pub async fn save_task(&self, task: &CrawlingTask) -> Result<(), StoreError> {
        self.save_crawling_task(&task.to_record()).await
    }
}
