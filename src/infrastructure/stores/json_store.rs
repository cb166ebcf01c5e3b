// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

use super::file_writer::AsyncFileWriter;
use crate::domain::models::{EntityKind, Platform, Record, ADD_TS, LAST_MODIFY_TS};
use crate::domain::repositories::{CrawlerStore, StoreError, StoreOutcome};
use crate::domain::schema::{schema_for, RecordSchema};
use crate::infrastructure::observability::metrics::record_write;
use crate::utils::clock::Clock;

pub const BACKEND: &str = "json";

/// JSON 文件存储
///
/// 每个 (爬取类型, 平台, 实体类型, 日期) 一个 JSON 数组文件。
/// 有身份键的实体原地替换同一身份的元素，否则追加。
pub struct JsonCrawlerStore {
    writer: AsyncFileWriter,
    platform: Platform,
    clock: Arc<dyn Clock>,
}

impl JsonCrawlerStore {
    pub fn new(writer: AsyncFileWriter, platform: Platform, clock: Arc<dyn Clock>) -> Self {
        Self {
            writer,
            platform,
            clock,
        }
    }

    async fn write(
        &self,
        kind: EntityKind,
        schema: &'static RecordSchema,
        record: Record,
    ) -> Result<StoreOutcome, StoreError> {
        let path = self.writer.path_for(kind, "json");
        let now = self.clock.now_millis();

        self.writer
            .update_json_array(&path, move |items| {
                if schema.has_identity() {
                    let key = schema.identity_of(&record);
                    let position = items.iter().position(|item| {
                        key.iter()
                            .all(|(name, value)| item.get(*name) == Some(value))
                    });
                    if let Some(index) = position {
                        let merged = merge_item(schema, &items[index], &record, now);
                        items[index] = merged;
                        return Ok(StoreOutcome::Updated);
                    }
                }

                let stamped = record.with(ADD_TS, now).with(LAST_MODIFY_TS, now);
                items.push(stamped.into());
                Ok(if schema.has_identity() {
                    StoreOutcome::Inserted
                } else {
                    StoreOutcome::Appended
                })
            })
            .await
    }
}

fn merge_item(schema: &RecordSchema, existing: &Value, incoming: &Record, now: i64) -> Value {
    let existing = match existing {
        Value::Object(map) => Record::from(map.clone()),
        _ => Record::new(),
    };
    let previous = existing.get_i64(LAST_MODIFY_TS).unwrap_or(0);
    let add_ts = existing.get_i64(ADD_TS).unwrap_or(now);

    schema
        .merge(&existing, incoming)
        .with(ADD_TS, add_ts)
        .with(LAST_MODIFY_TS, now.max(previous + 1))
        .into()
}

#[async_trait]
impl CrawlerStore for JsonCrawlerStore {
    fn backend(&self) -> &'static str {
        BACKEND
    }

    fn platform(&self) -> Platform {
        self.platform
    }

    async fn store(&self, kind: EntityKind, record: &Record) -> Result<(), StoreError> {
        let Some(schema) = schema_for(self.platform, kind) else {
            debug!(platform = %self.platform, kind = %kind, "No file for entity kind, skipping");
            record_write(BACKEND, kind, StoreOutcome::Skipped.as_str());
            return Ok(());
        };

        let result = match schema.normalize(record) {
            Ok(normalized) => self.write(kind, schema, normalized).await,
            Err(e) => Err(e.into()),
        };

        match result {
            Ok(outcome) => {
                debug!(table = schema.table, outcome = outcome.as_str(), "Record written to JSON");
                record_write(BACKEND, kind, outcome.as_str());
                Ok(())
            }
            Err(e) => {
                warn!(table = schema.table, error = %e, "Failed to write JSON record");
                record_write(BACKEND, kind, "failed");
                Err(e)
            }
        }
    }
}
