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
use crate::domain::schema::schema_for;
use crate::infrastructure::observability::metrics::record_write;
use crate::utils::clock::Clock;

pub const BACKEND: &str = "csv";

/// CSV 文件存储
///
/// 每次调用追加一行，列顺序与模式一致。平台声明了创作者或动态表时，
/// 这两类写入直接报错且不触碰文件系统；未声明的实体类型照常为空操作。
pub struct CsvCrawlerStore {
    writer: AsyncFileWriter,
    platform: Platform,
    clock: Arc<dyn Clock>,
}

impl CsvCrawlerStore {
    pub fn new(writer: AsyncFileWriter, platform: Platform, clock: Arc<dyn Clock>) -> Self {
        Self {
            writer,
            platform,
            clock,
        }
    }
}

fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

#[async_trait]
impl CrawlerStore for CsvCrawlerStore {
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

        let operation = match kind {
            EntityKind::Creator => Some("store_creator"),
            EntityKind::Dynamic => Some("store_dynamic"),
            _ => None,
        };
        if let Some(operation) = operation {
            warn!(table = schema.table, operation, "Operation not supported by CSV store");
            record_write(BACKEND, kind, "failed");
            return Err(StoreError::UnsupportedOperation {
                backend: BACKEND,
                operation,
            });
        }

        let result = match schema.normalize(record) {
            Ok(normalized) => {
                let now = self.clock.now_millis();
                let stamped = normalized.with(ADD_TS, now).with(LAST_MODIFY_TS, now);
                let columns = schema.columns();
                let row: Vec<String> = columns.iter().map(|c| cell(stamped.get(c))).collect();
                let path = self.writer.path_for(kind, "csv");
                self.writer.append_csv_row(&path, &columns, &row).await
            }
            Err(e) => Err(e.into()),
        };

        match result {
            Ok(()) => {
                debug!(table = schema.table, "Row appended to CSV");
                record_write(BACKEND, kind, StoreOutcome::Appended.as_str());
                Ok(())
            }
            Err(e) => {
                warn!(table = schema.table, error = %e, "Failed to append CSV row");
                record_write(BACKEND, kind, "failed");
                Err(e)
            }
        }
    }
}
