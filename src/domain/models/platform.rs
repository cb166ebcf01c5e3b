// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 内容来源平台
///
/// `HotTopics` 表示每日热点新闻/话题域，其余为各内容平台。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Platform {
    /// 小红书
    Xhs,
    /// 抖音
    Douyin,
    /// 快手
    Kuaishou,
    /// 哔哩哔哩
    Bilibili,
    /// 微博
    Weibo,
    /// 百度贴吧
    Tieba,
    /// 知乎
    Zhihu,
    /// 热点新闻与话题
    HotTopics,
}

impl Platform {
    pub const ALL: [Platform; 8] = [
        Platform::Xhs,
        Platform::Douyin,
        Platform::Kuaishou,
        Platform::Bilibili,
        Platform::Weibo,
        Platform::Tieba,
        Platform::Zhihu,
        Platform::HotTopics,
    ];

    /// 平台短代码，同时用作文件后端的目录名
    pub fn code(&self) -> &'static str {
        match self {
            Platform::Xhs => "xhs",
            Platform::Douyin => "dy",
            Platform::Kuaishou => "ks",
            Platform::Bilibili => "bili",
            Platform::Weibo => "wb",
            Platform::Tieba => "tieba",
            Platform::Zhihu => "zhihu",
            Platform::HotTopics => "hot_topics",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "xhs" => Ok(Platform::Xhs),
            "dy" | "douyin" => Ok(Platform::Douyin),
            "ks" | "kuaishou" => Ok(Platform::Kuaishou),
            "bili" | "bilibili" => Ok(Platform::Bilibili),
            "wb" | "weibo" => Ok(Platform::Weibo),
            "tieba" => Ok(Platform::Tieba),
            "zhihu" => Ok(Platform::Zhihu),
            "hot_topics" | "news" => Ok(Platform::HotTopics),
            other => Err(format!("unknown platform: {}", other)),
        }
    }
}

impl TryFrom<String> for Platform {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Platform> for String {
    fn from(platform: Platform) -> Self {
        platform.code().to_string()
    }
}
