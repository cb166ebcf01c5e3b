// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crawlstore::config::settings::SqliteSettings;
use crawlstore::domain::models::Record;
use crawlstore::infrastructure::database::connection::create_sqlite_pool;
use crawlstore::infrastructure::stores::{SaveDataOption, StoreSelector};
use crawlstore::utils::clock::ManualClock;
use crawlstore::utils::retry_policy::RetryPolicy;
use std::path::Path;
use std::sync::Arc;

/// 2025-09-05 12:00:00 UTC
pub const T0: i64 = 1_757_073_600_000;

pub fn clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(T0))
}

/// 内存 SQLite 上的选择器
pub async fn sqlite_selector(clock: Arc<ManualClock>) -> StoreSelector {
    let db = create_sqlite_pool(&SqliteSettings {
        path: ":memory:".to_string(),
    })
    .await
    .expect("Failed to open in-memory sqlite");
    StoreSelector::with_database(db, SaveDataOption::Sqlite, clock, RetryPolicy::for_upserts(5, 1))
        .await
        .expect("Failed to prepare sqlite store")
}

/// 临时目录上的文件后端选择器
pub async fn file_selector(
    option: SaveDataOption,
    dir: &Path,
    clock: Arc<ManualClock>,
) -> StoreSelector {
    StoreSelector::with_files(option, dir, "search", clock)
        .await
        .expect("Failed to prepare file store")
}

pub fn news(title: &str) -> Record {
    Record::new()
        .with("news_id", "n1")
        .with("source_platform", "weibo")
        .with("crawl_date", "2025-09-05")
        .with("title", title)
}

pub fn topic(status: &str) -> Record {
    Record::new()
        .with("topic_id", "t1")
        .with("extract_date", "2025-09-05")
        .with("processing_status", status)
}

/// 目录下所有文件（递归），按路径排序
pub fn files_under(dir: &Path) -> Vec<std::path::PathBuf> {
    let mut files = Vec::new();
    let mut pending = vec![dir.to_path_buf()];
    while let Some(current) = pending.pop() {
        let Ok(entries) = std::fs::read_dir(&current) else {
            continue;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                pending.push(path);
            } else {
                files.push(path);
            }
        }
    }
    files.sort();
    files
}
