// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 平台模式目录
//!
//! 每个平台一份描述：列出该平台拥有的实体类型及其表名、字段布局。
//! 内容表共用同一形状（自然ID + 平台字段 + 话题关联字段），
//! 话题与爬取任务表与平台无关。

use once_cell::sync::Lazy;
use std::collections::HashMap;

use super::{FieldDef, RecordSchema};
use crate::domain::models::{EntityKind, Platform};

static CATALOG: Lazy<HashMap<(Platform, EntityKind), RecordSchema>> = Lazy::new(|| {
    Platform::ALL
        .into_iter()
        .flat_map(|platform| {
            describe(platform)
                .into_iter()
                .map(move |schema| ((platform, schema.kind), schema))
        })
        .collect()
});

static DAILY_TOPICS: Lazy<RecordSchema> = Lazy::new(|| RecordSchema {
    table: "daily_topics",
    kind: EntityKind::Topic,
    identity: vec!["topic_id", "extract_date"],
    fields: vec![
        FieldDef::varchar("topic_id", 64),
        FieldDef::varchar("topic_name", 255),
        FieldDef::text("topic_description"),
        FieldDef::text("keywords"),
        FieldDef::date("extract_date").indexed(),
        FieldDef::float("relevance_score").indexed(),
        FieldDef::int("news_count"),
        FieldDef::varchar("processing_status", 16).indexed(),
    ],
});

static CRAWLING_TASKS: Lazy<RecordSchema> = Lazy::new(|| RecordSchema {
    table: "crawling_tasks",
    kind: EntityKind::CrawlingTask,
    identity: vec!["task_id"],
    fields: vec![
        FieldDef::varchar("task_id", 64),
        FieldDef::varchar("topic_id", 64).indexed().required(),
        FieldDef::varchar("platform", 32).indexed().required(),
        FieldDef::text("search_keywords").required(),
        FieldDef::varchar("task_status", 16).indexed(),
        FieldDef::bigint("start_time"),
        FieldDef::bigint("end_time"),
        FieldDef::bigint("total_crawled"),
        FieldDef::bigint("success_count"),
        FieldDef::bigint("error_count"),
        FieldDef::text("error_message"),
        FieldDef::text("config_params"),
        FieldDef::date("scheduled_date").indexed().required(),
    ],
});

/// 查找平台上某实体类型的模式
///
/// 话题与爬取任务在所有平台上都解析到共享模式；
/// 平台未声明的实体类型返回 `None`，存储层据此做空操作。
pub fn schema_for(platform: Platform, kind: EntityKind) -> Option<&'static RecordSchema> {
    match kind {
        EntityKind::Topic => Some(&*DAILY_TOPICS),
        EntityKind::CrawlingTask => Some(&*CRAWLING_TASKS),
        _ => CATALOG.get(&(platform, kind)),
    }
}

/// 目录中的全部表，按表名排序
pub fn all_schemas() -> Vec<&'static RecordSchema> {
    let mut schemas: Vec<&'static RecordSchema> = CATALOG.values().collect();
    schemas.push(&*DAILY_TOPICS);
    schemas.push(&*CRAWLING_TASKS);
    schemas.sort_by_key(|s| s.table);
    schemas
}

/// 内容表：自然ID为身份键，并追加话题关联字段
fn content(table: &'static str, natural_id: FieldDef, fields: Vec<FieldDef>) -> RecordSchema {
    let mut all = vec![natural_id];
    all.extend(fields);
    all.extend([
        FieldDef::text("source_keyword"),
        FieldDef::varchar("topic_id", 64).unique(),
        FieldDef::varchar("crawling_task_id", 64).unique(),
    ]);
    RecordSchema {
        table,
        kind: EntityKind::Content,
        identity: vec![natural_id.name],
        fields: all,
    }
}

/// 无身份键的表，写入即追加
fn appended(table: &'static str, kind: EntityKind, fields: Vec<FieldDef>) -> RecordSchema {
    RecordSchema {
        table,
        kind,
        identity: Vec::new(),
        fields,
    }
}

fn user_profile() -> [FieldDef; 4] {
    [
        FieldDef::varchar("user_id", 255),
        FieldDef::text("nickname"),
        FieldDef::text("avatar"),
        FieldDef::text("ip_location"),
    ]
}

fn describe(platform: Platform) -> Vec<RecordSchema> {
    match platform {
        Platform::Xhs => xhs(),
        Platform::Douyin => douyin(),
        Platform::Kuaishou => kuaishou(),
        Platform::Bilibili => bilibili(),
        Platform::Weibo => weibo(),
        Platform::Tieba => tieba(),
        Platform::Zhihu => zhihu(),
        Platform::HotTopics => hot_topics(),
    }
}

fn xhs() -> Vec<RecordSchema> {
    let mut note = user_profile().to_vec();
    note.extend([
        FieldDef::text("type"),
        FieldDef::text("title"),
        FieldDef::text("desc"),
        FieldDef::text("video_url"),
        FieldDef::bigint("time").indexed(),
        FieldDef::bigint("last_update_time"),
        FieldDef::text("liked_count"),
        FieldDef::text("collected_count"),
        FieldDef::text("comment_count"),
        FieldDef::text("share_count"),
        FieldDef::text("image_list"),
        FieldDef::text("tag_list"),
        FieldDef::text("note_url"),
        FieldDef::text("xsec_token"),
    ]);

    let mut comment = user_profile().to_vec();
    comment.extend([
        FieldDef::varchar("comment_id", 255).indexed(),
        FieldDef::bigint("create_time").indexed(),
        FieldDef::varchar("note_id", 255),
        FieldDef::text("content"),
        FieldDef::int("sub_comment_count"),
        FieldDef::text("pictures"),
        FieldDef::varchar("parent_comment_id", 255),
        FieldDef::text("like_count"),
    ]);

    let mut creator = user_profile().to_vec();
    creator.extend([
        FieldDef::text("desc"),
        FieldDef::text("gender"),
        FieldDef::text("follows"),
        FieldDef::text("fans"),
        FieldDef::text("interaction"),
        FieldDef::text("tag_list"),
    ]);

    vec![
        content("xhs_note", FieldDef::varchar("note_id", 255), note),
        appended("xhs_note_comment", EntityKind::Comment, comment),
        appended("xhs_creator", EntityKind::Creator, creator),
    ]
}

fn douyin() -> Vec<RecordSchema> {
    let account = || {
        vec![
            FieldDef::varchar("user_id", 255),
            FieldDef::varchar("sec_uid", 255),
            FieldDef::varchar("short_user_id", 255),
            FieldDef::varchar("user_unique_id", 255),
            FieldDef::text("nickname"),
            FieldDef::text("avatar"),
            FieldDef::text("user_signature"),
            FieldDef::text("ip_location"),
        ]
    };

    let mut aweme = account();
    aweme.extend([
        FieldDef::text("aweme_type"),
        FieldDef::text("title"),
        FieldDef::text("desc"),
        FieldDef::bigint("create_time").indexed(),
        FieldDef::text("liked_count"),
        FieldDef::text("comment_count"),
        FieldDef::text("share_count"),
        FieldDef::text("collected_count"),
        FieldDef::text("aweme_url"),
        FieldDef::text("cover_url"),
        FieldDef::text("video_download_url"),
        FieldDef::text("music_download_url"),
        FieldDef::text("note_download_url"),
    ]);

    let mut comment = account();
    comment.extend([
        FieldDef::bigint("comment_id").indexed(),
        FieldDef::bigint("aweme_id").indexed(),
        FieldDef::text("content"),
        FieldDef::bigint("create_time"),
        FieldDef::text("sub_comment_count"),
        FieldDef::varchar("parent_comment_id", 255),
        FieldDef::text("like_count"),
        FieldDef::text("pictures"),
    ]);

    let mut creator = user_profile().to_vec();
    creator.extend([
        FieldDef::text("desc"),
        FieldDef::text("gender"),
        FieldDef::text("follows"),
        FieldDef::text("fans"),
        FieldDef::text("interaction"),
        FieldDef::varchar("videos_count", 255),
    ]);

    vec![
        content("douyin_aweme", FieldDef::bigint("aweme_id"), aweme),
        appended("douyin_aweme_comment", EntityKind::Comment, comment),
        appended("dy_creator", EntityKind::Creator, creator),
    ]
}

fn kuaishou() -> Vec<RecordSchema> {
    let video = vec![
        FieldDef::varchar("user_id", 64),
        FieldDef::text("nickname"),
        FieldDef::text("avatar"),
        FieldDef::text("video_type"),
        FieldDef::text("title"),
        FieldDef::text("desc"),
        FieldDef::bigint("create_time").indexed(),
        FieldDef::text("liked_count"),
        FieldDef::text("viewd_count"),
        FieldDef::text("video_url"),
        FieldDef::text("video_cover_url"),
        FieldDef::text("video_play_url"),
    ];

    let comment = vec![
        FieldDef::text("user_id"),
        FieldDef::text("nickname"),
        FieldDef::text("avatar"),
        FieldDef::bigint("comment_id").indexed(),
        FieldDef::varchar("video_id", 255).indexed(),
        FieldDef::text("content"),
        FieldDef::bigint("create_time"),
        FieldDef::text("sub_comment_count"),
    ];

    vec![
        content("kuaishou_video", FieldDef::varchar("video_id", 255), video),
        appended("kuaishou_video_comment", EntityKind::Comment, comment),
    ]
}

fn bilibili() -> Vec<RecordSchema> {
    let video = vec![
        FieldDef::text("video_url"),
        FieldDef::bigint("user_id").indexed(),
        FieldDef::text("nickname"),
        FieldDef::text("avatar"),
        FieldDef::text("liked_count"),
        FieldDef::text("video_type"),
        FieldDef::text("title"),
        FieldDef::text("desc"),
        FieldDef::bigint("create_time").indexed(),
        FieldDef::text("disliked_count"),
        FieldDef::text("video_play_count"),
        FieldDef::text("video_favorite_count"),
        FieldDef::text("video_share_count"),
        FieldDef::text("video_coin_count"),
        FieldDef::text("video_danmaku"),
        FieldDef::text("video_comment"),
        FieldDef::text("video_cover_url"),
    ];

    let comment = vec![
        FieldDef::varchar("user_id", 255),
        FieldDef::text("nickname"),
        FieldDef::text("sex"),
        FieldDef::text("sign"),
        FieldDef::text("avatar"),
        FieldDef::bigint("comment_id").indexed(),
        FieldDef::bigint("video_id").indexed(),
        FieldDef::text("content"),
        FieldDef::bigint("create_time"),
        FieldDef::text("sub_comment_count"),
        FieldDef::varchar("parent_comment_id", 255),
        FieldDef::text("like_count"),
    ];

    let up_info = vec![
        FieldDef::bigint("user_id").indexed(),
        FieldDef::text("nickname"),
        FieldDef::text("sex"),
        FieldDef::text("sign"),
        FieldDef::text("avatar"),
        FieldDef::int("total_fans"),
        FieldDef::int("total_liked"),
        FieldDef::int("user_rank"),
        FieldDef::int("is_official"),
    ];

    let contact = vec![
        FieldDef::bigint("up_id").indexed(),
        FieldDef::bigint("fan_id").indexed(),
        FieldDef::text("up_name"),
        FieldDef::text("fan_name"),
        FieldDef::text("up_sign"),
        FieldDef::text("fan_sign"),
        FieldDef::text("up_avatar"),
        FieldDef::text("fan_avatar"),
    ];

    let dynamic = vec![
        FieldDef::bigint("dynamic_id").indexed(),
        FieldDef::varchar("user_id", 255),
        FieldDef::text("user_name"),
        FieldDef::text("text"),
        FieldDef::text("type"),
        FieldDef::bigint("pub_ts"),
        FieldDef::int("total_comments"),
        FieldDef::int("total_forwards"),
        FieldDef::int("total_liked"),
    ];

    vec![
        content("bilibili_video", FieldDef::bigint("video_id"), video),
        appended("bilibili_video_comment", EntityKind::Comment, comment),
        appended("bilibili_up_info", EntityKind::Creator, up_info),
        appended("bilibili_contact_info", EntityKind::Contact, contact),
        appended("bilibili_up_dynamic", EntityKind::Dynamic, dynamic),
    ]
}

fn weibo() -> Vec<RecordSchema> {
    let author = || {
        vec![
            FieldDef::varchar("user_id", 255),
            FieldDef::text("nickname"),
            FieldDef::text("avatar"),
            FieldDef::text("gender"),
            FieldDef::text("profile_url"),
            FieldDef::text("ip_location"),
        ]
    };

    let mut note = author();
    note.extend([
        FieldDef::text("content"),
        FieldDef::bigint("create_time").indexed(),
        FieldDef::varchar("create_date_time", 255).indexed(),
        FieldDef::text("liked_count"),
        FieldDef::text("comments_count"),
        FieldDef::text("shared_count"),
        FieldDef::text("note_url"),
    ]);

    let mut comment = author();
    comment.extend([
        FieldDef::bigint("comment_id").indexed(),
        FieldDef::bigint("note_id").indexed(),
        FieldDef::text("content"),
        FieldDef::bigint("create_time"),
        FieldDef::varchar("create_date_time", 255).indexed(),
        FieldDef::text("comment_like_count"),
        FieldDef::text("sub_comment_count"),
        FieldDef::varchar("parent_comment_id", 255),
    ]);

    let mut creator = user_profile().to_vec();
    creator.extend([
        FieldDef::text("desc"),
        FieldDef::text("gender"),
        FieldDef::text("follows"),
        FieldDef::text("fans"),
        FieldDef::text("tag_list"),
    ]);

    vec![
        content("weibo_note", FieldDef::bigint("note_id"), note),
        appended("weibo_note_comment", EntityKind::Comment, comment),
        appended("weibo_creator", EntityKind::Creator, creator),
    ]
}

fn tieba() -> Vec<RecordSchema> {
    let note = vec![
        FieldDef::text("title"),
        FieldDef::text("desc"),
        FieldDef::text("note_url"),
        FieldDef::varchar("publish_time", 255).indexed(),
        FieldDef::text("user_link"),
        FieldDef::text("user_nickname"),
        FieldDef::text("user_avatar"),
        FieldDef::varchar("tieba_id", 255),
        FieldDef::text("tieba_name"),
        FieldDef::text("tieba_link"),
        FieldDef::text("total_replay_num"),
        FieldDef::text("total_replay_page"),
        FieldDef::text("ip_location"),
    ];

    let comment = vec![
        FieldDef::varchar("comment_id", 255).indexed(),
        FieldDef::varchar("parent_comment_id", 255),
        FieldDef::text("content"),
        FieldDef::text("user_link"),
        FieldDef::text("user_nickname"),
        FieldDef::text("user_avatar"),
        FieldDef::varchar("tieba_id", 255),
        FieldDef::text("tieba_name"),
        FieldDef::text("tieba_link"),
        FieldDef::varchar("publish_time", 255).indexed(),
        FieldDef::text("ip_location"),
        FieldDef::int("sub_comment_count"),
        FieldDef::varchar("note_id", 255).indexed(),
        FieldDef::text("note_url"),
    ];

    let creator = vec![
        FieldDef::varchar("user_id", 64),
        FieldDef::text("user_name"),
        FieldDef::text("nickname"),
        FieldDef::text("avatar"),
        FieldDef::text("ip_location"),
        FieldDef::text("gender"),
        FieldDef::text("follows"),
        FieldDef::text("fans"),
        FieldDef::text("registration_duration"),
    ];

    vec![
        content("tieba_note", FieldDef::varchar("note_id", 644), note),
        appended("tieba_comment", EntityKind::Comment, comment),
        appended("tieba_creator", EntityKind::Creator, creator),
    ]
}

fn zhihu() -> Vec<RecordSchema> {
    let article = vec![
        FieldDef::text("content_type"),
        FieldDef::text("content_text"),
        FieldDef::text("content_url"),
        FieldDef::varchar("question_id", 255),
        FieldDef::text("title"),
        FieldDef::text("desc"),
        FieldDef::varchar("created_time", 32).indexed(),
        FieldDef::text("updated_time"),
        FieldDef::text("voteup_count"),
        FieldDef::text("comment_count"),
        FieldDef::varchar("user_id", 255),
        FieldDef::text("user_link"),
        FieldDef::text("user_nickname"),
        FieldDef::text("user_avatar"),
        FieldDef::text("user_url_token"),
    ];

    let comment = vec![
        FieldDef::varchar("comment_id", 64).indexed(),
        FieldDef::varchar("parent_comment_id", 64),
        FieldDef::text("content"),
        FieldDef::varchar("publish_time", 32).indexed(),
        FieldDef::text("ip_location"),
        FieldDef::int("sub_comment_count"),
        FieldDef::int("like_count"),
        FieldDef::int("dislike_count"),
        FieldDef::varchar("content_id", 64).indexed(),
        FieldDef::text("content_type"),
        FieldDef::varchar("user_id", 64),
        FieldDef::text("user_link"),
        FieldDef::text("user_nickname"),
        FieldDef::text("user_avatar"),
    ];

    // 创作者按追加语义写入，user_id 只建普通索引
    let creator = vec![
        FieldDef::varchar("user_id", 64).indexed(),
        FieldDef::text("user_link"),
        FieldDef::text("user_nickname"),
        FieldDef::text("user_avatar"),
        FieldDef::text("url_token"),
        FieldDef::text("gender"),
        FieldDef::text("ip_location"),
        FieldDef::int("follows"),
        FieldDef::int("fans"),
        FieldDef::int("anwser_count"),
        FieldDef::int("video_count"),
        FieldDef::int("question_count"),
        FieldDef::int("article_count"),
        FieldDef::int("column_count"),
        FieldDef::int("get_voteup_count"),
    ];

    vec![
        content("zhihu_content", FieldDef::varchar("content_id", 64), article),
        appended("zhihu_comment", EntityKind::Comment, comment),
        appended("zhihu_creator", EntityKind::Creator, creator),
    ]
}

/// 热点新闻域只有新闻内容，身份键为 (news_id, source_platform, crawl_date)
fn hot_topics() -> Vec<RecordSchema> {
    vec![RecordSchema {
        table: "daily_news",
        kind: EntityKind::Content,
        identity: vec!["news_id", "source_platform", "crawl_date"],
        fields: vec![
            FieldDef::varchar("news_id", 255),
            FieldDef::varchar("source_platform", 32).indexed(),
            FieldDef::varchar("title", 512).required(),
            FieldDef::varchar("url", 512),
            FieldDef::text("description"),
            FieldDef::text("extra_info"),
            FieldDef::varchar("crawl_date", 10).indexed(),
            FieldDef::int("rank_position").indexed(),
        ],
    }]
}
