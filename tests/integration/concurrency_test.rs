// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{clock, file_selector, files_under, news, sqlite_selector, topic};
use crawlstore::application::PersistenceFacade;
use crawlstore::domain::models::{EntityKind, Platform, LAST_MODIFY_TS};
use crawlstore::infrastructure::stores::{SaveDataOption, StoreSelector};
use crawlstore::utils::clock::Clock;
use crawlstore::utils::retry_policy::RetryPolicy;
use futures::future::join_all;
use sea_orm::{ConnectOptions, Database};
use serde_json::Value;
use std::time::Duration;

const WRITERS: usize = 16;

/// 多个并发任务写同一话题，最终只有一行
#[tokio::test]
async fn test_concurrent_topic_stores_yield_one_row() {
    let clock = clock();
    let selector = sqlite_selector(clock.clone()).await;
    let facade = PersistenceFacade::new(selector.store_for(Platform::HotTopics));

    let writes = (0..WRITERS).map(|i| {
        let facade = facade.clone();
        let clock = clock.clone();
        tokio::spawn(async move {
            clock.advance(1);
            let status = if i % 2 == 0 { "processing" } else { "completed" };
            facade.save_topic(&topic(status)).await
        })
    });
    for result in join_all(writes).await {
        result.unwrap().unwrap();
    }

    let store = selector.sql_store_for(Platform::HotTopics).unwrap();
    assert_eq!(store.count(EntityKind::Topic).await.unwrap(), 1);
    let row = store
        .find_by_identity(EntityKind::Topic, &topic("any"))
        .await
        .unwrap()
        .unwrap();
    assert!(row.get_i64(LAST_MODIFY_TS).unwrap() >= clock.now_millis());
}

/// 多连接的 SQLite 文件库上两个写入方同时插入同一新身份，
/// 冲突被重试成更新，两次调用都成功且只留一行
#[tokio::test]
async fn test_concurrent_insert_race_converts_to_update() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("race.db").display());
    let mut opt = ConnectOptions::new(url);
    opt.max_connections(4)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(30));
    let db = Database::connect(opt).await.unwrap();

    let selector = StoreSelector::with_database(
        db,
        SaveDataOption::Sqlite,
        clock(),
        RetryPolicy::for_upserts(10, 5),
    )
    .await
    .unwrap();

    let writes = ["A", "B"].map(|title| {
        let facade = PersistenceFacade::new(selector.store_for(Platform::HotTopics));
        tokio::spawn(async move { facade.save_content(&news(title)).await })
    });
    for result in join_all(writes).await {
        result.unwrap().unwrap();
    }

    let store = selector.sql_store_for(Platform::HotTopics).unwrap();
    assert_eq!(store.count(EntityKind::Content).await.unwrap(), 1);
    let row = store
        .find_by_identity(EntityKind::Content, &news("any"))
        .await
        .unwrap()
        .unwrap();
    assert!(matches!(row.get_str("title"), Some("A") | Some("B")));
}

/// JSON 文件后端的并发写入在文件锁内串行，不丢记录
#[tokio::test]
async fn test_concurrent_json_appends_keep_every_record() {
    let dir = tempfile::tempdir().unwrap();
    let selector = file_selector(SaveDataOption::Json, dir.path(), clock()).await;

    let writes = (0..WRITERS).map(|i| {
        let facade = PersistenceFacade::new(selector.store_for(Platform::HotTopics));
        tokio::spawn(async move {
            let record = news("same")
                .with("news_id", format!("n{}", i))
                .with("rank_position", i as i64);
            facade.save_content(&record).await
        })
    });
    for result in join_all(writes).await {
        result.unwrap().unwrap();
    }

    let files = files_under(dir.path());
    assert_eq!(files.len(), 1);
    let items: Vec<Value> = serde_json::from_slice(&std::fs::read(&files[0]).unwrap()).unwrap();
    assert_eq!(items.len(), WRITERS);
}

/// CSV 并发追加不交错，每行完整
#[tokio::test]
async fn test_concurrent_csv_appends_are_not_interleaved() {
    let dir = tempfile::tempdir().unwrap();
    let selector = file_selector(SaveDataOption::Csv, dir.path(), clock()).await;

    let writes = (0..WRITERS).map(|i| {
        let facade = PersistenceFacade::new(selector.store_for(Platform::HotTopics));
        tokio::spawn(async move {
            let record = news("a title, with a comma").with("news_id", format!("n{}", i));
            facade.save_content(&record).await
        })
    });
    for result in join_all(writes).await {
        result.unwrap().unwrap();
    }

    let files = files_under(dir.path());
    let mut reader = csv::Reader::from_path(&files[0]).unwrap();
    let width = reader.headers().unwrap().len();
    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), WRITERS);
    assert!(rows.iter().all(|row| row.len() == width));
}
