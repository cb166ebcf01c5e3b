// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::record::Record;

/// 每日热榜新闻
///
/// 身份键为 `(news_id, source_platform, crawl_date)`，同一天重复抓取
/// 同一条新闻会合并到同一行。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    /// 新闻唯一ID
    pub news_id: String,
    /// 新闻源平台(weibo|zhihu|bilibili|toutiao|douyin等)
    pub source_platform: String,
    /// 新闻标题
    pub title: String,
    /// 新闻链接
    pub url: Option<String>,
    /// 新闻描述或摘要
    pub description: Option<String>,
    /// 额外信息
    pub extra_info: Option<serde_json::Value>,
    /// 爬取日期 (YYYY-MM-DD)
    pub crawl_date: String,
    /// 在热榜中的排名位置
    pub rank_position: Option<i32>,
}

impl NewsItem {
    pub fn to_record(&self) -> Record {
        Record::new()
            .with("news_id", self.news_id.clone())
            .with("source_platform", self.source_platform.clone())
            .with("title", self.title.clone())
            .with("url", json!(self.url))
            .with("description", json!(self.description))
            .with("extra_info", json!(self.extra_info))
            .with("crawl_date", self.crawl_date.clone())
            .with("rank_position", json!(self.rank_position))
    }
}
