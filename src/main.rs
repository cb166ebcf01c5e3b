// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Context;
use crawlstore::application::PersistenceFacade;
use crawlstore::config::settings::Settings;
use crawlstore::domain::models::{EntityKind, Platform, Record};
use crawlstore::infrastructure::observability::metrics::describe_store_metrics;
use crawlstore::infrastructure::stores::StoreSelector;
use crawlstore::utils::clock::SystemClock;
use crawlstore::utils::telemetry;
use serde::Deserialize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

/// 标准输入中每行一个的数据信封
#[derive(Debug, Deserialize)]
struct Envelope {
    platform: Platform,
    kind: EntityKind,
    item: Record,
}

/// 主函数
///
/// 从标准输入逐行读取 JSON 信封，经持久化门面写入配置选定的后端
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    describe_store_metrics();
    info!("Starting crawlstore...");

    // 2. Load configuration
    let settings = Settings::new().context("failed to load configuration")?;
    info!(backend = %settings.store.save_data_option, "Configuration loaded");

    // 3. Resolve the backend once
    let selector = StoreSelector::from_settings(&settings, Arc::new(SystemClock))
        .await
        .context("failed to resolve storage backend")?;

    // 4. Persist every envelope on stdin
    let mut facades: HashMap<Platform, PersistenceFacade> = HashMap::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let (mut stored, mut failed) = (0u64, 0u64);
    let mut line_no = 0u64;

    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        if line.trim().is_empty() {
            continue;
        }

        let envelope: Envelope = match serde_json::from_str(&line) {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!(line = line_no, error = %e, "Skipping malformed envelope");
                failed += 1;
                continue;
            }
        };

        let facade = facades
            .entry(envelope.platform)
            .or_insert_with(|| PersistenceFacade::new(selector.store_for(envelope.platform)));

        match facade.save(envelope.kind, &envelope.item).await {
            Ok(()) => stored += 1,
            Err(e) => {
                warn!(
                    line = line_no,
                    platform = %envelope.platform,
                    kind = %envelope.kind,
                    error = %e,
                    "Failed to persist item"
                );
                failed += 1;
            }
        }
    }

    info!(stored, failed, "Input drained");
    println!("stored={} failed={}", stored, failed);
    Ok(())
}
