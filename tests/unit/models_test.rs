// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::NaiveDate;
use crawlstore::domain::models::{
    CrawlingTask, CrawlingTaskStatus, EntityKind, NewsItem, Platform, ProcessingStatus, Record,
    Topic,
};
use crawlstore::domain::schema::schema_for;
use serde_json::{json, Value};

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 9, 5).unwrap()
}

#[test]
fn test_crawling_task_lifecycle_happy_path() {
    // Given: 新创建的任务
    let mut task = CrawlingTask::new("t1", Platform::Xhs, vec!["rust".into()], date());
    assert_eq!(task.task_status, CrawlingTaskStatus::Pending);
    assert_eq!(task.total_crawled, 0);

    // When: 开始并处理若干条
    task.start(1_000);
    task.record_success();
    task.record_success();
    task.record_error("rate limited");

    // Then: 计数器累加
    assert_eq!(task.task_status, CrawlingTaskStatus::Running);
    assert_eq!(task.start_time, Some(1_000));
    assert_eq!(task.total_crawled, 3);
    assert_eq!(task.success_count, 2);
    assert_eq!(task.error_count, 1);
    assert_eq!(task.error_message.as_deref(), Some("rate limited"));

    task.complete(9_000);
    assert!(task.task_status.is_terminal());
    assert_eq!(task.end_time, Some(9_000));
}

#[test]
fn test_crawling_task_pause_and_resume_keeps_start_time() {
    let mut task = CrawlingTask::new("t1", Platform::Douyin, vec![], date());
    task.start(1_000);
    task.pause();
    assert_eq!(task.task_status, CrawlingTaskStatus::Paused);
    assert!(!task.task_status.is_terminal());

    task.resume();
    task.start(5_000);
    assert_eq!(task.task_status, CrawlingTaskStatus::Running);
    assert_eq!(task.start_time, Some(1_000));

    task.fail(6_000, "blocked");
    assert_eq!(task.task_status, CrawlingTaskStatus::Failed);
    assert_eq!(task.error_message.as_deref(), Some("blocked"));
}

#[test]
fn test_crawling_task_ids_are_unique() {
    let a = CrawlingTask::new("t1", Platform::Xhs, vec![], date());
    let b = CrawlingTask::new("t1", Platform::Xhs, vec![], date());
    assert_ne!(a.task_id, b.task_id);
}

#[test]
fn test_crawling_task_record_fits_its_schema() {
    let task = CrawlingTask::new("t1", Platform::Kuaishou, vec!["a".into(), "b".into()], date());
    let record = task.to_record();

    assert_eq!(record.get_str("platform"), Some("ks"));
    assert_eq!(record.get_str("scheduled_date"), Some("2025-09-05"));
    assert_eq!(record.get_str("task_status"), Some("pending"));

    let schema = schema_for(Platform::Kuaishou, EntityKind::CrawlingTask).unwrap();
    let normalized = schema.normalize(&record).unwrap();
    assert_eq!(normalized.get_str("search_keywords"), Some(r#"["a","b"]"#));
}

#[test]
fn test_status_strings_round_trip() {
    for status in [
        ProcessingStatus::Pending,
        ProcessingStatus::Processing,
        ProcessingStatus::Completed,
        ProcessingStatus::Failed,
    ] {
        assert_eq!(status.to_string().parse::<ProcessingStatus>(), Ok(status));
    }
    assert_eq!("paused".parse::<CrawlingTaskStatus>(), Ok(CrawlingTaskStatus::Paused));
    assert!("archived".parse::<CrawlingTaskStatus>().is_err());
}

#[test]
fn test_topic_record_fits_its_schema() {
    let mut topic = Topic::new("t1", "AI", vec!["llm".into()], date());
    topic.relevance_score = Some(0.75);
    topic.news_count = 12;

    let record = topic.to_record();
    assert_eq!(record.get_str("processing_status"), Some("pending"));
    assert_eq!(record.get_str("extract_date"), Some("2025-09-05"));

    let schema = schema_for(Platform::HotTopics, EntityKind::Topic).unwrap();
    let normalized = schema.normalize(&record).unwrap();
    assert_eq!(normalized.get("relevance_score"), Some(&json!(0.75)));
    assert_eq!(normalized.get_i64("news_count"), Some(12));
}

#[test]
fn test_news_item_record_fits_its_schema() {
    let news = NewsItem {
        news_id: "n1".to_string(),
        source_platform: "zhihu".to_string(),
        title: "Title".to_string(),
        url: None,
        description: Some("desc".to_string()),
        extra_info: Some(json!({"hot": 100})),
        crawl_date: "2025-09-05".to_string(),
        rank_position: Some(1),
    };

    let schema = schema_for(Platform::HotTopics, EntityKind::Content).unwrap();
    let normalized = schema.normalize(&news.to_record()).unwrap();
    assert_eq!(normalized.get_str("extra_info"), Some(r#"{"hot":100}"#));
    assert_eq!(normalized.get("url"), Some(&Value::Null));
}

#[test]
fn test_platform_and_kind_serde_names() {
    let parsed: Platform = serde_json::from_value(json!("bilibili")).unwrap();
    assert_eq!(parsed, Platform::Bilibili);
    assert_eq!(serde_json::to_value(Platform::Weibo).unwrap(), json!("wb"));

    let kind: EntityKind = serde_json::from_value(json!("crawling_task")).unwrap();
    assert_eq!(kind, EntityKind::CrawlingTask);
}

#[test]
fn test_record_from_json_object() {
    let record = Record::try_from(json!({"note_id": "n1", "liked_count": 3})).unwrap();
    assert_eq!(record.len(), 2);
    assert_eq!(record.get_str("note_id"), Some("n1"));
    assert!(Record::try_from(json!([1, 2])).is_err());
}
