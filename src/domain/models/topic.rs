// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;
use std::str::FromStr;

use super::record::Record;

/// 每日话题
///
/// 由话题提取协作方在某个提取日产出。同一话题在不同日期重复出现时，
/// 以 `(topic_id, extract_date)` 作为独立的一行记录。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    /// 话题唯一ID
    pub topic_id: String,
    /// 话题名称
    pub topic_name: String,
    /// 话题描述
    pub topic_description: Option<String>,
    /// 话题关键词，持久化时序列化为 JSON 文本
    pub keywords: Vec<String>,
    /// 提取日期
    pub extract_date: NaiveDate,
    /// 相关性得分（由外部评分算法给出）
    pub relevance_score: Option<f64>,
    /// 关联的新闻数量（冗余字段）
    pub news_count: i32,
    /// 处理状态
    pub processing_status: ProcessingStatus,
}

/// 话题处理状态
///
/// 状态流转：Pending → Processing → Completed/Failed。
/// 流转由外部协作方驱动，持久化层只记录给定的状态，不做合法性校验。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingStatus {
    #[default]
    Pending,
    Processing,
    Completed,
    Failed,
}

impl fmt::Display for ProcessingStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ProcessingStatus::Pending => write!(f, "pending"),
            ProcessingStatus::Processing => write!(f, "processing"),
            ProcessingStatus::Completed => write!(f, "completed"),
            ProcessingStatus::Failed => write!(f, "failed"),
        }
    }
}

impl FromStr for ProcessingStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ProcessingStatus::Pending),
            "processing" => Ok(ProcessingStatus::Processing),
            "completed" => Ok(ProcessingStatus::Completed),
            "failed" => Ok(ProcessingStatus::Failed),
            _ => Err(()),
        }
    }
}

impl Topic {
    /// 创建首次提取的话题，状态为 `pending`
    pub fn new(
        topic_id: impl Into<String>,
        topic_name: impl Into<String>,
        keywords: Vec<String>,
        extract_date: NaiveDate,
    ) -> Self {
        Self {
            topic_id: topic_id.into(),
            topic_name: topic_name.into(),
            topic_description: None,
            keywords,
            extract_date,
            relevance_score: None,
            news_count: 0,
            processing_status: ProcessingStatus::Pending,
        }
    }

    pub fn to_record(&self) -> Record {
        Record::new()
            .with("topic_id", self.topic_id.clone())
            .with("topic_name", self.topic_name.clone())
            .with("topic_description", json!(self.topic_description))
            .with("keywords", json!(self.keywords))
            .with("extract_date", self.extract_date.format("%Y-%m-%d").to_string())
            .with("relevance_score", json!(self.relevance_score))
            .with("news_count", self.news_count)
            .with("processing_status", self.processing_status.to_string())
    }
}
