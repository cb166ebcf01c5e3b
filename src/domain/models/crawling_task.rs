// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::platform::Platform;
use super::record::Record;

/// 爬取任务
///
/// 为某个话题在目标平台上调度的一次爬取工作。`topic_id` 不要求话题
/// 已经落库（松耦合）。计数器和状态按调用方给出的值原样持久化。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrawlingTask {
    /// 任务唯一ID
    pub task_id: String,
    /// 关联的话题ID
    pub topic_id: String,
    /// 目标平台
    pub platform: Platform,
    /// 搜索关键词，持久化时序列化为 JSON 文本
    pub search_keywords: Vec<String>,
    /// 任务状态
    pub task_status: CrawlingTaskStatus,
    /// 任务开始时间戳（毫秒）
    pub start_time: Option<i64>,
    /// 任务结束时间戳（毫秒）
    pub end_time: Option<i64>,
    /// 已爬取内容数量
    pub total_crawled: i64,
    /// 成功爬取数量
    pub success_count: i64,
    /// 错误数量
    pub error_count: i64,
    /// 最近一次错误信息
    pub error_message: Option<String>,
    /// 爬取配置参数
    pub config_params: Option<serde_json::Value>,
    /// 调度日期
    pub scheduled_date: NaiveDate,
}

/// 爬取任务状态
///
/// Pending → Running → Completed/Failed/Paused，Paused 可恢复为 Running。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CrawlingTaskStatus {
    #[default]
    Pending,
    Running,
    Completed,
    Failed,
    Paused,
}

impl CrawlingTaskStatus {
    /// 是否为终止状态
    pub fn is_terminal(&self) -> bool {
        matches!(self, CrawlingTaskStatus::Completed | CrawlingTaskStatus::Failed)
    }
}

impl fmt::Display for CrawlingTaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CrawlingTaskStatus::Pending => write!(f, "pending"),
            CrawlingTaskStatus::Running => write!(f, "running"),
            CrawlingTaskStatus::Completed => write!(f, "completed"),
            CrawlingTaskStatus::Failed => write!(f, "failed"),
            CrawlingTaskStatus::Paused => write!(f, "paused"),
        }
    }
}

impl FromStr for CrawlingTaskStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(CrawlingTaskStatus::Pending),
            "running" => Ok(CrawlingTaskStatus::Running),
            "completed" => Ok(CrawlingTaskStatus::Completed),
            "failed" => Ok(CrawlingTaskStatus::Failed),
            "paused" => Ok(CrawlingTaskStatus::Paused),
            _ => Err(()),
        }
    }
}

impl CrawlingTask {
    /// 为话题创建新的爬取任务
    ///
    /// # 参数
    ///
    /// * `topic_id` - 关联的话题ID
    /// * `platform` - 目标平台
    /// * `search_keywords` - 搜索关键词
    /// * `scheduled_date` - 调度日期
    pub fn new(
        topic_id: impl Into<String>,
        platform: Platform,
        search_keywords: Vec<String>,
        scheduled_date: NaiveDate,
    ) -> Self {
        Self {
            task_id: Uuid::new_v4().to_string(),
            topic_id: topic_id.into(),
            platform,
            search_keywords,
            task_status: CrawlingTaskStatus::Pending,
            start_time: None,
            end_time: None,
            total_crawled: 0,
            success_count: 0,
            error_count: 0,
            error_message: None,
            config_params: None,
            scheduled_date,
        }
    }

    pub fn start(&mut self, now_ms: i64) {
        self.task_status = CrawlingTaskStatus::Running;
        self.start_time.get_or_insert(now_ms);
    }

    pub fn record_success(&mut self) {
        self.total_crawled += 1;
        self.success_count += 1;
    }

    pub fn record_error(&mut self, message: impl Into<String>) {
        self.total_crawled += 1;
        self.error_count += 1;
        self.error_message = Some(message.into());
    }

    pub fn pause(&mut self) {
        self.task_status = CrawlingTaskStatus::Paused;
    }

    pub fn resume(&mut self) {
        self.task_status = CrawlingTaskStatus::Running;
    }

    pub fn complete(&mut self, now_ms: i64) {
        self.task_status = CrawlingTaskStatus::Completed;
        self.end_time = Some(now_ms);
    }

    pub fn fail(&mut self, now_ms: i64, message: impl Into<String>) {
        self.task_status = CrawlingTaskStatus::Failed;
        self.end_time = Some(now_ms);
        self.error_message = Some(message.into());
    }

    pub fn to_record(&self) -> Record {
        Record::new()
            .with("task_id", self.task_id.clone())
            .with("topic_id", self.topic_id.clone())
            .with("platform", self.platform.code())
            .with("search_keywords", json!(self.search_keywords))
            .with("task_status", self.task_status.to_string())
            .with("start_time", json!(self.start_time))
            .with("end_time", json!(self.end_time))
            .with("total_crawled", self.total_crawled)
            .with("success_count", self.success_count)
            .with("error_count", self.error_count)
            .with("error_message", json!(self.error_message))
            .with("config_params", json!(self.config_params))
            .with("scheduled_date", self.scheduled_date.format("%Y-%m-%d").to_string())
    }
}
