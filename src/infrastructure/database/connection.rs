// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::{DatabaseSettings, SqliteSettings};
use sea_orm::sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sea_orm::{
    ConnectOptions, Database, DatabaseConnection, DbErr, RuntimeErr, SqlxSqliteConnector,
};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// SQLite 内存库的路径写法
pub const SQLITE_MEMORY_PATH: &str = ":memory:";

/// 创建关系型数据库连接池
///
/// # 参数
///
/// * `settings` - 数据库配置
///
/// # 返回值
///
/// * `Ok(DatabaseConnection)` - 数据库连接
/// * `Err(DbErr)` - 连接过程中出现的错误
pub async fn create_pool(settings: &DatabaseSettings) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(settings.url.to_owned());

    if let Some(max) = settings.max_connections {
        opt.max_connections(max);
    }

    if let Some(min) = settings.min_connections {
        opt.min_connections(min);
    }

    if let Some(timeout) = settings.connect_timeout {
        opt.connect_timeout(Duration::from_secs(timeout));
        opt.acquire_timeout(Duration::from_secs(timeout));
    }

    if let Some(idle) = settings.idle_timeout {
        opt.idle_timeout(Duration::from_secs(idle));
    }

    opt.max_lifetime(Duration::from_secs(3600))
        .sqlx_logging(true);

    Database::connect(opt).await
}

/// 打开 SQLite 数据库文件
///
/// 连接池只保留一个连接，所有写入在进程内排队执行，
/// 同一身份键的 upsert 因此天然串行。`:memory:` 打开内存库。
pub async fn create_sqlite_pool(settings: &SqliteSettings) -> Result<DatabaseConnection, DbErr> {
    if settings.path == SQLITE_MEMORY_PATH {
        return create_sqlite_memory_pool().await;
    }

    if let Some(parent) = Path::new(&settings.path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                DbErr::Custom(format!(
                    "failed to create sqlite directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    let mut opt = ConnectOptions::new(format!("sqlite://{}?mode=rwc", settings.path));
    opt.max_connections(1)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(30))
        .sqlx_logging(true);

    Database::connect(opt).await
}

/// 内存库只存在于打开它的连接上，连接一旦被回收表和数据随之消失。
/// 这里关闭空闲回收和寿命回收，唯一的连接在连接池存续期间一直保留。
/// 被取消的在途调用仍可能让连接被丢弃，因此内存库只用于测试和基准。
async fn create_sqlite_memory_pool() -> Result<DatabaseConnection, DbErr> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .map_err(|e| DbErr::Conn(RuntimeErr::SqlxError(e)))?;
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .max_lifetime(None)
        .idle_timeout(None)
        .acquire_timeout(Duration::from_secs(30))
        .connect_with(options)
        .await
        .map_err(|e| DbErr::Conn(RuntimeErr::SqlxError(e)))?;
    Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
}
