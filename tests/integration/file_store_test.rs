// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{clock, file_selector, files_under, news, topic};
use chrono::NaiveDate;
use crawlstore::application::PersistenceFacade;
use crawlstore::domain::models::{CrawlingTask, Platform, Record};
use crawlstore::infrastructure::stores::{SaveDataOption, StoreSelector};
use crawlstore::utils::clock::Clock;
use serde_json::Value;
use std::path::{Path, PathBuf};

const DAY_MS: i64 = 86_400_000;

fn xhs_note(id: &str) -> Record {
    Record::new()
        .with("note_id", id)
        .with("title", "a note")
        .with("liked_count", 7)
}

fn xhs_comment(id: &str) -> Record {
    Record::new()
        .with("comment_id", id)
        .with("note_id", "n1")
        .with("content", "nice")
}

fn expected(dir: &Path, platform: &str, ext: &str, name: &str) -> PathBuf {
    dir.join(platform).join(ext).join(name)
}

/// JSON 文件按 平台/扩展名/爬取类型_类别_日期 分布
#[tokio::test]
async fn test_json_layout_across_platforms_and_kinds() {
    let dir = tempfile::tempdir().unwrap();
    let clock = clock();
    let today = clock.today().format("%Y-%m-%d").to_string();
    let selector = file_selector(SaveDataOption::Json, dir.path(), clock.clone()).await;

    let hot = PersistenceFacade::new(selector.store_for(Platform::HotTopics));
    hot.save_content(&news("A")).await.unwrap();
    hot.save_topic(&topic("pending")).await.unwrap();

    let xhs = PersistenceFacade::new(selector.store_for(Platform::Xhs));
    xhs.save_content(&xhs_note("n1")).await.unwrap();
    xhs.save_comment(&xhs_comment("c1")).await.unwrap();

    let bili = PersistenceFacade::new(selector.store_for(Platform::Bilibili));
    let date = NaiveDate::from_ymd_opt(2025, 9, 5).unwrap();
    bili.save_task(&CrawlingTask::new("t1", Platform::Bilibili, vec!["rust".into()], date))
        .await
        .unwrap();

    let root = dir.path();
    let mut want = vec![
        expected(root, "hot_topics", "json", &format!("search_contents_{}.json", today)),
        expected(root, "hot_topics", "json", &format!("search_topics_{}.json", today)),
        expected(root, "xhs", "json", &format!("search_contents_{}.json", today)),
        expected(root, "xhs", "json", &format!("search_comments_{}.json", today)),
        expected(root, "bili", "json", &format!("search_crawling_tasks_{}.json", today)),
    ];
    want.sort();
    assert_eq!(files_under(root), want);
}

/// CSV 文件使用同样的布局，扩展名目录为 csv
#[tokio::test]
async fn test_csv_layout_uses_csv_directory() {
    let dir = tempfile::tempdir().unwrap();
    let clock = clock();
    let today = clock.today().format("%Y-%m-%d").to_string();
    let selector = file_selector(SaveDataOption::Csv, dir.path(), clock.clone()).await;

    let xhs = PersistenceFacade::new(selector.store_for(Platform::Xhs));
    xhs.save_content(&xhs_note("n1")).await.unwrap();
    xhs.save_comment(&xhs_comment("c1")).await.unwrap();
    xhs.save_comment(&xhs_comment("c2")).await.unwrap();

    let root = dir.path();
    let comments = expected(root, "xhs", "csv", &format!("search_comments_{}.csv", today));
    let mut want = vec![
        comments.clone(),
        expected(root, "xhs", "csv", &format!("search_contents_{}.csv", today)),
    ];
    want.sort();
    assert_eq!(files_under(root), want);

    let mut reader = csv::Reader::from_path(&comments).unwrap();
    let headers = reader.headers().unwrap().clone();
    assert!(headers.iter().any(|h| h == "comment_id"));
    assert_eq!(reader.records().count(), 2);
}

/// 日期变化后写入新文件，旧文件保持不变
#[tokio::test]
async fn test_new_day_starts_a_new_file() {
    let dir = tempfile::tempdir().unwrap();
    let clock = clock();
    let first_day = clock.today().format("%Y-%m-%d").to_string();
    let selector = file_selector(SaveDataOption::Json, dir.path(), clock.clone()).await;
    let facade = PersistenceFacade::new(selector.store_for(Platform::Xhs));

    facade.save_content(&xhs_note("n1")).await.unwrap();
    clock.advance(DAY_MS);
    let second_day = clock.today().format("%Y-%m-%d").to_string();
    facade.save_content(&xhs_note("n1")).await.unwrap();

    assert_ne!(first_day, second_day);
    let root = dir.path();
    let first = expected(root, "xhs", "json", &format!("search_contents_{}.json", first_day));
    let second = expected(root, "xhs", "json", &format!("search_contents_{}.json", second_day));
    assert_eq!(files_under(root), vec![first.clone(), second.clone()]);

    for path in [first, second] {
        let items: Vec<Value> = serde_json::from_slice(&std::fs::read(path).unwrap()).unwrap();
        assert_eq!(items.len(), 1);
    }
}

/// 爬取类型作为文件名前缀
#[tokio::test]
async fn test_crawler_type_prefixes_file_names() {
    let dir = tempfile::tempdir().unwrap();
    let clock = clock();
    let today = clock.today().format("%Y-%m-%d").to_string();
    let selector = StoreSelector::with_files(SaveDataOption::Json, dir.path(), "detail", clock)
        .await
        .unwrap();

    PersistenceFacade::new(selector.store_for(Platform::Weibo))
        .save_content(&Record::new().with("note_id", 42).with("content", "hi"))
        .await
        .unwrap();

    assert_eq!(
        files_under(dir.path()),
        vec![expected(
            dir.path(),
            "wb",
            "json",
            &format!("detail_contents_{}.json", today)
        )]
    );
}
