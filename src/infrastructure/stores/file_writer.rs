// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use dashmap::DashMap;
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::domain::models::{EntityKind, Platform};
use crate::domain::repositories::StoreError;
use crate::utils::clock::Clock;

/// 进程内的文件锁表
///
/// 同一路径的所有写入方共享一把异步互斥锁，不同文件之间互不排序。
/// 由选择器创建一次并注入到各平台的文件存储中。
#[derive(Clone, Default)]
pub struct FileLocks {
    inner: Arc<DashMap<PathBuf, Arc<Mutex<()>>>>,
}

impl FileLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// 取得某个文件的锁，不存在时创建
    pub fn lock_for(&self, path: &Path) -> Arc<Mutex<()>> {
        self.inner
            .entry(path.to_path_buf())
            .or_default()
            .value()
            .clone()
    }

    /// 归还 `lock_for` 取得的锁，没有其他持有者时移除表项
    pub fn release(&self, path: &Path, lock: Arc<Mutex<()>>) {
        drop(lock);
        self.inner
            .remove_if(path, |_, entry| Arc::strong_count(entry) == 1);
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

/// 异步文件写入器
///
/// 按 `{data_dir}/{platform}/{ext}/{crawler_type}_{label}_{YYYY-MM-DD}.{ext}`
/// 组织文件，每次写入都在该文件的锁内完成。
#[derive(Clone)]
pub struct AsyncFileWriter {
    data_dir: PathBuf,
    crawler_type: String,
    platform: Platform,
    locks: FileLocks,
    clock: Arc<dyn Clock>,
}

impl AsyncFileWriter {
    pub fn new(
        data_dir: impl Into<PathBuf>,
        crawler_type: impl Into<String>,
        platform: Platform,
        locks: FileLocks,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            data_dir: data_dir.into(),
            crawler_type: crawler_type.into(),
            platform,
            locks,
            clock,
        }
    }

    /// 当天该实体类型对应的文件路径
    pub fn path_for(&self, kind: EntityKind, ext: &str) -> PathBuf {
        let file_name = format!(
            "{}_{}_{}.{}",
            self.crawler_type,
            kind.file_label(),
            self.clock.today().format("%Y-%m-%d"),
            ext
        );
        self.data_dir
            .join(self.platform.code())
            .join(ext)
            .join(file_name)
    }

    /// 追加一行 CSV，文件为新建或为空时先写表头
    ///
    /// 表头和数据行先编码到内存，再一次性写入，避免与其他写入方交错。
    pub async fn append_csv_row(
        &self,
        path: &Path,
        header: &[&str],
        row: &[String],
    ) -> Result<(), StoreError> {
        let lock = self.locks.lock_for(path);
        let result = {
            let _guard = lock.lock().await;
            write_csv_row(path, header, row).await
        };
        self.locks.release(path, lock);
        result
    }

    /// 在文件锁内读出 JSON 数组、交给 `update` 修改、再整体写回
    ///
    /// 写回先落到同目录的临时文件再重命名，中途取消不会留下半个文件。
    pub async fn update_json_array<T, F>(&self, path: &Path, update: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut Vec<Value>) -> Result<T, StoreError>,
    {
        let lock = self.locks.lock_for(path);
        let result = {
            let _guard = lock.lock().await;
            rewrite_json_array(path, update).await
        };
        self.locks.release(path, lock);
        result
    }
}

async fn write_csv_row(path: &Path, header: &[&str], row: &[String]) -> Result<(), StoreError> {
    ensure_parent(path).await?;
    let needs_header = match fs::metadata(path).await {
        Ok(meta) => meta.len() == 0,
        Err(e) if e.kind() == ErrorKind::NotFound => true,
        Err(e) => return Err(e.into()),
    };

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    if needs_header {
        writer.write_record(header)?;
    }
    writer.write_record(row)?;
    let bytes = writer
        .into_inner()
        .map_err(|e| StoreError::Io(e.into_error()))?;

    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;
    file.write_all(&bytes).await?;
    file.flush().await?;
    Ok(())
}

async fn rewrite_json_array<T, F>(path: &Path, update: F) -> Result<T, StoreError>
where
    F: FnOnce(&mut Vec<Value>) -> Result<T, StoreError>,
{
    ensure_parent(path).await?;
    let mut items: Vec<Value> = match fs::read(path).await {
        Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Vec::new(),
        Ok(bytes) => serde_json::from_slice(&bytes)?,
        Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
        Err(e) => return Err(e.into()),
    };

    let result = update(&mut items)?;

    let bytes = serde_json::to_vec_pretty(&items)?;
    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);

    let mut file = fs::File::create(&tmp_path).await?;
    file.write_all(&bytes).await?;
    file.sync_all().await?;
    drop(file);
    fs::rename(&tmp_path, path).await?;

    Ok(result)
}

async fn ensure_parent(path: &Path) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }
    Ok(())
}
