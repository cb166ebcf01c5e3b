// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// 记录添加时间戳字段名（毫秒）
pub const ADD_TS: &str = "add_ts";
/// 记录最后修改时间戳字段名（毫秒）
pub const LAST_MODIFY_TS: &str = "last_modify_ts";

/// 通用记录
///
/// 爬虫生产者交给持久化层的键值映射。不同平台的字段布局不同，
/// 因此这里不固定结构，由 [`RecordSchema`](crate::domain::schema::RecordSchema)
/// 负责校验和类型归一化。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    pub fn new() -> Self {
        Self(Map::new())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// 读取字符串字段，非字符串返回 `None`
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.0.get(key).and_then(Value::as_i64)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// 链式设置字段，便于测试和生产者构造记录
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// 去掉审计时间戳后的副本，用于比较业务字段
    pub fn without_audit(&self) -> Self {
        let mut copy = self.clone();
        copy.remove(ADD_TS);
        copy.remove(LAST_MODIFY_TS);
        copy
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for Record {
    type Error = serde_json::Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        serde_json::from_value(value)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Object(record.0)
    }
}

impl FromIterator<(String, Value)> for Record {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// 实体类型
///
/// 持久化门面按实体类型把记录分派到后端的对应操作。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// 内容（新闻、视频、帖子、文章、问答）
    Content,
    /// 评论
    Comment,
    /// 创作者资料
    Creator,
    /// 关注关系
    Contact,
    /// 动态
    Dynamic,
    /// 每日话题
    Topic,
    /// 爬取任务
    CrawlingTask,
}

impl EntityKind {
    pub const ALL: [EntityKind; 7] = [
        EntityKind::Content,
        EntityKind::Comment,
        EntityKind::Creator,
        EntityKind::Contact,
        EntityKind::Dynamic,
        EntityKind::Topic,
        EntityKind::CrawlingTask,
    ];

    /// 文件后端使用的文件名标签
    pub fn file_label(&self) -> &'static str {
        match self {
            EntityKind::Content => "contents",
            EntityKind::Comment => "comments",
            EntityKind::Creator => "creators",
            EntityKind::Contact => "contacts",
            EntityKind::Dynamic => "dynamics",
            EntityKind::Topic => "topics",
            EntityKind::CrawlingTask => "crawling_tasks",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Content => "content",
            EntityKind::Comment => "comment",
            EntityKind::Creator => "creator",
            EntityKind::Contact => "contact",
            EntityKind::Dynamic => "dynamic",
            EntityKind::Topic => "topic",
            EntityKind::CrawlingTask => "crawling_task",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown entity kind: {}", s))
    }
}
