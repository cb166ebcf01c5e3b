// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm::DatabaseConnection;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;

use super::csv_store::CsvCrawlerStore;
use super::db_store::SqlCrawlerStore;
use super::file_writer::{AsyncFileWriter, FileLocks};
use super::json_store::JsonCrawlerStore;
use crate::config::settings::Settings;
use crate::domain::models::Platform;
use crate::domain::repositories::{CrawlerStore, StoreError};
use crate::infrastructure::database::connection::{
    create_pool, create_sqlite_pool, SQLITE_MEMORY_PATH,
};
use crate::infrastructure::database::schema_sync::sync_schema;
use crate::utils::clock::Clock;
use crate::utils::retry_policy::RetryPolicy;

/// 存储后端选项
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveDataOption {
    Csv,
    Db,
    Json,
    Sqlite,
}

impl SaveDataOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            SaveDataOption::Csv => "csv",
            SaveDataOption::Db => "db",
            SaveDataOption::Json => "json",
            SaveDataOption::Sqlite => "sqlite",
        }
    }
}

impl fmt::Display for SaveDataOption {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SaveDataOption {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(SaveDataOption::Csv),
            "db" => Ok(SaveDataOption::Db),
            "json" => Ok(SaveDataOption::Json),
            "sqlite" => Ok(SaveDataOption::Sqlite),
            other => Err(StoreError::Configuration(format!(
                "Invalid save option {:?}, only csv, db, json or sqlite are supported",
                other
            ))),
        }
    }
}

/// 后端共享资源，进程内只解析一次
enum Resources {
    Sql {
        db: Arc<DatabaseConnection>,
        retry: RetryPolicy,
    },
    Files {
        data_dir: PathBuf,
        crawler_type: String,
        locks: FileLocks,
    },
}

/// 存储选择器
///
/// 启动时根据配置解析出唯一的后端，之后按平台分发共享同一资源的存储实例。
/// 由调用方构造并注入，不持有任何全局状态。
pub struct StoreSelector {
    option: SaveDataOption,
    clock: Arc<dyn Clock>,
    resources: Resources,
}

impl StoreSelector {
    /// 根据配置解析后端
    ///
    /// `db` / `sqlite` 打开数据库并同步表结构，`json` / `csv` 准备数据目录。
    pub async fn from_settings(
        settings: &Settings,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, StoreError> {
        let option: SaveDataOption = settings.store.save_data_option.parse()?;
        let retry = RetryPolicy::for_upserts(
            settings.store.upsert_max_retries,
            settings.store.upsert_backoff_ms,
        );

        match option {
            SaveDataOption::Db => {
                let db = create_pool(&settings.database)
                    .await
                    .map_err(|e| StoreError::Unavailable(format!("cannot open database: {}", e)))?;
                Self::with_database(db, option, clock, retry).await
            }
            SaveDataOption::Sqlite => {
                if settings.sqlite.path == SQLITE_MEMORY_PATH {
                    return Err(StoreError::Configuration(
                        "sqlite.path must name a database file, in-memory sqlite is not durable"
                            .to_string(),
                    ));
                }
                let db = create_sqlite_pool(&settings.sqlite)
                    .await
                    .map_err(|e| StoreError::Unavailable(format!("cannot open sqlite: {}", e)))?;
                Self::with_database(db, option, clock, retry).await
            }
            SaveDataOption::Json | SaveDataOption::Csv => {
                Self::with_files(
                    option,
                    &settings.store.data_dir,
                    &settings.store.crawler_type,
                    clock,
                )
                .await
            }
        }
    }

    /// 使用已打开的数据库连接，同步表结构
    pub async fn with_database(
        db: DatabaseConnection,
        option: SaveDataOption,
        clock: Arc<dyn Clock>,
        retry: RetryPolicy,
    ) -> Result<Self, StoreError> {
        if !matches!(option, SaveDataOption::Db | SaveDataOption::Sqlite) {
            return Err(StoreError::Configuration(format!(
                "{} is not a database backend",
                option
            )));
        }
        sync_schema(&db)
            .await
            .map_err(|e| StoreError::Persistence(format!("schema sync failed: {}", e)))?;
        info!(backend = %option, "Database store ready");

        Ok(Self {
            option,
            clock,
            resources: Resources::Sql {
                db: Arc::new(db),
                retry,
            },
        })
    }

    /// 使用数据目录，供 `json` / `csv` 后端
    pub async fn with_files(
        option: SaveDataOption,
        data_dir: impl Into<PathBuf>,
        crawler_type: &str,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, StoreError> {
        if !matches!(option, SaveDataOption::Json | SaveDataOption::Csv) {
            return Err(StoreError::Configuration(format!(
                "{} is not a file backend",
                option
            )));
        }
        let data_dir = data_dir.into();
        tokio::fs::create_dir_all(&data_dir).await?;
        info!(backend = %option, data_dir = %data_dir.display(), "File store ready");

        Ok(Self {
            option,
            clock,
            resources: Resources::Files {
                data_dir,
                crawler_type: crawler_type.to_string(),
                locks: FileLocks::new(),
            },
        })
    }

    pub fn option(&self) -> SaveDataOption {
        self.option
    }

    /// 平台对应的存储实例
    pub fn store_for(&self, platform: Platform) -> Arc<dyn CrawlerStore> {
        match &self.resources {
            Resources::Sql { db, retry } => {
                let store: Arc<dyn CrawlerStore> = Arc::new(self.sql_store(db, retry, platform));
                store
            }
            Resources::Files {
                data_dir,
                crawler_type,
                locks,
            } => {
                let writer = AsyncFileWriter::new(
                    data_dir.clone(),
                    crawler_type.clone(),
                    platform,
                    locks.clone(),
                    self.clock.clone(),
                );
                let store: Arc<dyn CrawlerStore> = if self.option == SaveDataOption::Csv {
                    Arc::new(CsvCrawlerStore::new(writer, platform, self.clock.clone()))
                } else {
                    Arc::new(JsonCrawlerStore::new(writer, platform, self.clock.clone()))
                };
                store
            }
        }
    }

    /// 数据库后端下的具体存储类型，便于读回校验
    pub fn sql_store_for(&self, platform: Platform) -> Option<SqlCrawlerStore> {
        match &self.resources {
            Resources::Sql { db, retry } => Some(self.sql_store(db, retry, platform)),
            Resources::Files { .. } => None,
        }
    }

    fn sql_store(
        &self,
        db: &Arc<DatabaseConnection>,
        retry: &RetryPolicy,
        platform: Platform,
    ) -> SqlCrawlerStore {
        SqlCrawlerStore::new(
            db.clone(),
            platform,
            self.option.as_str(),
            self.clock.clone(),
            retry.clone(),
        )
    }
}
