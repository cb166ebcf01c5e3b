// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use metrics::{counter, describe_counter};

use crate::domain::models::EntityKind;

/// 注册存储指标的描述
///
/// 只登记元数据；未安装 recorder 时记录操作为空操作。
pub fn describe_store_metrics() {
    describe_counter!(
        "store_writes_total",
        "Total number of store calls by backend, entity kind and outcome"
    );
    describe_counter!(
        "store_upsert_retries_total",
        "Total number of upsert attempts retried after a write conflict"
    );
}

/// 记录一次写入结果
pub fn record_write(backend: &'static str, kind: EntityKind, outcome: &'static str) {
    counter!(
        "store_writes_total",
        "backend" => backend,
        "kind" => kind.as_str(),
        "outcome" => outcome
    )
    .increment(1);
}

/// 记录一次 upsert 冲突重试
pub fn record_upsert_retry(backend: &'static str, table: &'static str) {
    counter!("store_upsert_retries_total", "backend" => backend, "table" => table).increment(1);
}
