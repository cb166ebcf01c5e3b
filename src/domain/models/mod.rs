// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 该模块定义了持久化核心的业务实体，包括：
/// - 通用记录（record）：生产者交付的键值记录与实体类型标签
/// - 平台（platform）：内容来源平台
/// - 话题（topic）：每日提取的话题及其处理状态
/// - 爬取任务（crawling_task）：围绕话题调度的爬取工作
/// - 新闻（news）：每日热榜新闻
pub mod crawling_task;
pub mod news;
pub mod platform;
pub mod record;
pub mod topic;

pub use crawling_task::{CrawlingTask, CrawlingTaskStatus};
pub use news::NewsItem;
pub use platform::Platform;
pub use record::{EntityKind, Record, ADD_TS, LAST_MODIFY_TS};
pub use topic::{ProcessingStatus, Topic};
