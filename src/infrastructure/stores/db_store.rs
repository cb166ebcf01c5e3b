// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use sea_orm::sea_query::{Alias, Expr, LockType, Query, SelectStatement, SimpleExpr};
use sea_orm::{
    ConnectionTrait, DatabaseBackend, DatabaseConnection, DbErr, RuntimeErr, SqlErr,
    TransactionTrait,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::domain::models::{EntityKind, Platform, Record, ADD_TS, LAST_MODIFY_TS};
use crate::domain::repositories::{CrawlerStore, StoreError, StoreOutcome};
use crate::domain::schema::{schema_for, RecordSchema};
use crate::infrastructure::database::values::{row_to_record, to_sql_value};
use crate::infrastructure::observability::metrics::{record_upsert_retry, record_write};
use crate::utils::clock::Clock;
use crate::utils::retry_policy::RetryPolicy;

/// 关系型数据库存储
///
/// `db` 后端连接 Postgres，`sqlite` 后端连接单连接的 SQLite 文件，
/// 两者共用同一套 upsert 算法，只是传输不同。
#[derive(Clone)]
pub struct SqlCrawlerStore {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
    platform: Platform,
    backend: &'static str,
    clock: Arc<dyn Clock>,
    retry: RetryPolicy,
}

impl SqlCrawlerStore {
    /// 创建新的数据库存储实例
    ///
    /// # 参数
    ///
    /// * `db` - 数据库连接（表结构需已同步）
    /// * `platform` - 绑定的平台
    /// * `backend` - 后端名称，用于日志和指标
    /// * `clock` - 审计时间戳来源
    /// * `retry` - upsert 冲突重试策略
    pub fn new(
        db: Arc<DatabaseConnection>,
        platform: Platform,
        backend: &'static str,
        clock: Arc<dyn Clock>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            db,
            platform,
            backend,
            clock,
            retry,
        }
    }

    /// 按身份键读取一条记录
    pub async fn find_by_identity(
        &self,
        kind: EntityKind,
        key: &Record,
    ) -> Result<Option<Record>, StoreError> {
        let schema = self.schema(kind)?;
        if !schema.has_identity() {
            return Err(StoreError::UnsupportedOperation {
                backend: self.backend,
                operation: "find_by_identity",
            });
        }

        let mut select = select_columns(schema);
        for (name, value) in schema.key_of(key)? {
            select.and_where(Expr::col(Alias::new(name)).eq(bind(schema, name, &value)?));
        }

        let backend = self.db.get_database_backend();
        let row = self
            .db
            .query_one(backend.build(&select))
            .await
            .map_err(|e| classify(schema.table, e))?;
        row.map(|row| row_to_record(schema, &row))
            .transpose()
            .map_err(|e| classify(schema.table, e))
    }

    /// 读取某实体类型的全部记录，按写入顺序
    pub async fn find_all(&self, kind: EntityKind) -> Result<Vec<Record>, StoreError> {
        let schema = self.schema(kind)?;
        let mut select = select_columns(schema);
        select.order_by(Alias::new("id"), sea_orm::Order::Asc);

        let backend = self.db.get_database_backend();
        let rows = self
            .db
            .query_all(backend.build(&select))
            .await
            .map_err(|e| classify(schema.table, e))?;
        rows.iter()
            .map(|row| row_to_record(schema, row))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| classify(schema.table, e))
    }

    /// 某实体类型的行数
    pub async fn count(&self, kind: EntityKind) -> Result<u64, StoreError> {
        let schema = self.schema(kind)?;
        let select = Query::select()
            .expr_as(Expr::cust("COUNT(*)"), Alias::new("total"))
            .from(Alias::new(schema.table))
            .to_owned();

        let backend = self.db.get_database_backend();
        let row = self
            .db
            .query_one(backend.build(&select))
            .await
            .map_err(|e| classify(schema.table, e))?;
        let total = match row {
            Some(row) => row
                .try_get::<i64>("", "total")
                .map_err(|e| classify(schema.table, e))?,
            None => 0,
        };
        Ok(total.max(0) as u64)
    }

    fn schema(&self, kind: EntityKind) -> Result<&'static RecordSchema, StoreError> {
        schema_for(self.platform, kind).ok_or_else(|| {
            StoreError::Configuration(format!(
                "platform {} declares no {} table",
                self.platform, kind
            ))
        })
    }

    /// 插入或合并更新，冲突时按策略整体重试
    async fn upsert(
        &self,
        schema: &'static RecordSchema,
        record: &Record,
    ) -> Result<StoreOutcome, StoreError> {
        let mut attempt = 0;
        loop {
            match self.try_upsert(schema, record).await {
                Err(StoreError::ConstraintViolation { table, detail }) => {
                    if !self.retry.should_retry(attempt) {
                        return Err(StoreError::Persistence(format!(
                            "upsert into {} still conflicting after {} retries: {}",
                            table, attempt, detail
                        )));
                    }
                    attempt += 1;
                    record_upsert_retry(self.backend, table);
                    warn!(
                        table,
                        attempt,
                        detail = %detail,
                        "Write conflict during upsert, retrying"
                    );
                    tokio::time::sleep(self.retry.calculate_backoff(attempt)).await;
                }
                other => return other,
            }
        }
    }

    /// 单次 upsert：一个事务内完成查找、插入或更新
    ///
    /// 事务在提交前被丢弃时自动回滚，目标行要么保持调用前状态，要么整体更新。
    async fn try_upsert(
        &self,
        schema: &'static RecordSchema,
        record: &Record,
    ) -> Result<StoreOutcome, StoreError> {
        let table = schema.table;
        let backend = self.db.get_database_backend();
        let txn = self.db.begin().await.map_err(|e| classify(table, e))?;

        let mut select = Query::select();
        select
            .column(Alias::new(LAST_MODIFY_TS))
            .from(Alias::new(table));
        for (name, value) in schema.identity_of(record) {
            select.and_where(Expr::col(Alias::new(name)).eq(bind(schema, name, &value)?));
        }
        if backend != DatabaseBackend::Sqlite {
            select.lock(LockType::Update);
        }

        let existing = txn
            .query_one(backend.build(&select))
            .await
            .map_err(|e| classify(table, e))?;

        let now = self.clock.now_millis();
        let outcome = match existing {
            None => {
                let insert = insert_statement(schema, record, now)?;
                txn.execute(backend.build(&insert))
                    .await
                    .map_err(|e| classify(table, e))?;
                StoreOutcome::Inserted
            }
            Some(row) => {
                let previous = row
                    .try_get::<Option<i64>>("", LAST_MODIFY_TS)
                    .map_err(|e| classify(table, e))?
                    .unwrap_or(0);
                let mut update = Query::update();
                update.table(Alias::new(table));
                for field in schema.mutable_fields() {
                    if let Some(value) = record.get(field.name) {
                        update.value(Alias::new(field.name), bind(schema, field.name, value)?);
                    }
                }
                update.value(Alias::new(LAST_MODIFY_TS), now.max(previous + 1));
                for (name, value) in schema.identity_of(record) {
                    update.and_where(Expr::col(Alias::new(name)).eq(bind(schema, name, &value)?));
                }
                txn.execute(backend.build(&update))
                    .await
                    .map_err(|e| classify(table, e))?;
                StoreOutcome::Updated
            }
        };

        txn.commit().await.map_err(|e| classify(table, e))?;
        Ok(outcome)
    }

    async fn append(
        &self,
        schema: &'static RecordSchema,
        record: &Record,
    ) -> Result<StoreOutcome, StoreError> {
        let backend = self.db.get_database_backend();
        let insert = insert_statement(schema, record, self.clock.now_millis())?;
        self.db
            .execute(backend.build(&insert))
            .await
            .map_err(|e| classify(schema.table, e))?;
        Ok(StoreOutcome::Appended)
    }
}

#[async_trait]
impl CrawlerStore for SqlCrawlerStore {
    fn backend(&self) -> &'static str {
        self.backend
    }

    fn platform(&self) -> Platform {
        self.platform
    }

    async fn store(&self, kind: EntityKind, record: &Record) -> Result<(), StoreError> {
        let Some(schema) = schema_for(self.platform, kind) else {
            debug!(platform = %self.platform, kind = %kind, "No table for entity kind, skipping");
            record_write(self.backend, kind, StoreOutcome::Skipped.as_str());
            return Ok(());
        };

        let result = match schema.normalize(record) {
            Ok(normalized) if schema.has_identity() => self.upsert(schema, &normalized).await,
            Ok(normalized) => self.append(schema, &normalized).await,
            Err(e) => Err(e.into()),
        };

        match result {
            Ok(outcome) => {
                debug!(table = schema.table, outcome = outcome.as_str(), "Record stored");
                record_write(self.backend, kind, outcome.as_str());
                Ok(())
            }
            Err(e) => {
                warn!(table = schema.table, error = %e, "Failed to store record");
                record_write(self.backend, kind, "failed");
                Err(e)
            }
        }
    }
}

fn select_columns(schema: &RecordSchema) -> SelectStatement {
    Query::select()
        .columns(schema.columns().into_iter().map(Alias::new))
        .from(Alias::new(schema.table))
        .to_owned()
}

fn bind(schema: &RecordSchema, name: &str, value: &Value) -> Result<SimpleExpr, StoreError> {
    let field = schema.field(name).ok_or_else(|| {
        StoreError::Persistence(format!("{} has no column {}", schema.table, name))
    })?;
    to_sql_value(field.ty, value)
        .map(SimpleExpr::from)
        .map_err(|e| classify(schema.table, e))
}

fn insert_statement(
    schema: &RecordSchema,
    record: &Record,
    now: i64,
) -> Result<sea_orm::sea_query::InsertStatement, StoreError> {
    let mut columns = Vec::with_capacity(record.len() + 2);
    let mut values = Vec::with_capacity(record.len() + 2);
    for (name, value) in record.iter() {
        columns.push(Alias::new(name.as_str()));
        values.push(bind(schema, name, value)?);
    }
    columns.push(Alias::new(ADD_TS));
    values.push(SimpleExpr::from(now));
    columns.push(Alias::new(LAST_MODIFY_TS));
    values.push(SimpleExpr::from(now));

    let mut insert = Query::insert();
    insert
        .into_table(Alias::new(schema.table))
        .columns(columns)
        .values(values)
        .map_err(|e| StoreError::Persistence(e.to_string()))?;
    Ok(insert)
}

/// 把数据库错误归类为存储错误
///
/// 唯一约束冲突与 SQLite 写锁冲突归为可重试的 `ConstraintViolation`，
/// 连接类错误归为 `Unavailable`，其余为 `Persistence`。
pub(crate) fn classify(table: &'static str, err: DbErr) -> StoreError {
    if let Some(SqlErr::UniqueConstraintViolation(detail)) = err.sql_err() {
        return StoreError::ConstraintViolation { table, detail };
    }

    let message = err.to_string();
    let lowered = message.to_lowercase();
    if lowered.contains("database is locked")
        || lowered.contains("database table is locked")
        || lowered.contains("sqlite_busy")
    {
        return StoreError::ConstraintViolation {
            table,
            detail: message,
        };
    }

    match err {
        DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => StoreError::Unavailable(message),
        DbErr::Exec(RuntimeErr::SqlxError(ref e)) | DbErr::Query(RuntimeErr::SqlxError(ref e))
            if is_connection_error(e) =>
        {
            StoreError::Unavailable(message)
        }
        _ => StoreError::Persistence(message),
    }
}

fn is_connection_error(err: &sea_orm::sqlx::Error) -> bool {
    matches!(
        err,
        sea_orm::sqlx::Error::Io(_)
            | sea_orm::sqlx::Error::Tls(_)
            | sea_orm::sqlx::Error::PoolTimedOut
            | sea_orm::sqlx::Error::PoolClosed
            | sea_orm::sqlx::Error::WorkerCrashed
    )
}
