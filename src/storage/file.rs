//! Append-only file log backend
//!
//! 每次成功写入追加一行 JSON，启动时完整回放到内存索引。

use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use super::{MemoryStorage, OwnerId, SetError, UrlMapping, UrlStorage};
use crate::errors::{Result, SnaplinkError};

/// One line of the log.
#[derive(Debug, Serialize, Deserialize)]
struct LogRecord {
    #[serde(rename = "userID", default, skip_serializing_if = "OwnerId::is_anonymous")]
    owner: OwnerId,
    short: String,
    long: String,
}

impl From<&UrlMapping> for LogRecord {
    fn from(mapping: &UrlMapping) -> Self {
        Self {
            owner: mapping.owner,
            short: mapping.short.clone(),
            long: mapping.long.clone(),
        }
    }
}

impl From<LogRecord> for UrlMapping {
    fn from(record: LogRecord) -> Self {
        UrlMapping::new(record.owner, record.short, record.long)
    }
}

pub struct FileStorage {
    inner: Arc<FileLog>,
}

/// 内存索引与日志文件，追加写在阻塞线程池中执行
struct FileLog {
    path: PathBuf,
    index: MemoryStorage,
    log: Mutex<File>,
}

impl FileStorage {
    /// Open (or create) the log at `path` and replay it.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                SnaplinkError::file_operation(format!(
                    "Failed to create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let file = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(&path)
            .map_err(|e| {
                SnaplinkError::file_operation(format!("Failed to open {}: {}", path.display(), e))
            })?;

        let index = MemoryStorage::new();
        let (loaded, skipped) = replay(&file, &path, &index)?;

        if skipped > 0 {
            warn!(
                "Skipped {} conflicting record(s) while replaying {}",
                skipped,
                path.display()
            );
        }
        info!("FileStorage loaded {} mapping(s) from {}", loaded, path.display());

        Ok(Self {
            inner: Arc::new(FileLog {
                path,
                index,
                log: Mutex::new(file),
            }),
        })
    }
}

impl FileLog {
    /// 同步写入：日志锁覆盖索引写入和追加，保证日志顺序与索引一致
    fn insert(&self, mapping: UrlMapping) -> std::result::Result<(), SetError> {
        let mut file = self.log.lock();
        self.index.index().write().insert(mapping.clone())?;

        if let Err(e) = Self::append(&mut file, &mapping) {
            error!(
                "Mapping {} stored in memory but not persisted to {}: {}",
                mapping.short,
                self.path.display(),
                e
            );
            return Err(SetError::Other(e));
        }
        Ok(())
    }

    fn append(file: &mut File, mapping: &UrlMapping) -> Result<()> {
        let mut line = serde_json::to_vec(&LogRecord::from(mapping))?;
        line.push(b'\n');
        file.write_all(&line)?;
        file.flush()?;
        Ok(())
    }
}

/// Replay every record into `index`, returning `(loaded, skipped)`.
fn replay(file: &File, path: &Path, index: &MemoryStorage) -> Result<(usize, usize)> {
    let mut loaded = 0;
    let mut skipped = 0;
    let mut guard = index.index().write();

    for (lineno, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|e| {
            SnaplinkError::file_operation(format!("Failed to read {}: {}", path.display(), e))
        })?;
        if line.trim().is_empty() {
            continue;
        }

        let record: LogRecord = serde_json::from_str(&line).map_err(|e| {
            SnaplinkError::serialization(format!(
                "Malformed record at {}:{}: {}",
                path.display(),
                lineno + 1,
                e
            ))
        })?;

        match guard.insert(record.into()) {
            Ok(()) => loaded += 1,
            Err(e) => {
                debug!("Replay line {} skipped: {}", lineno + 1, e);
                skipped += 1;
            }
        }
    }

    Ok((loaded, skipped))
}

#[async_trait]
impl UrlStorage for FileStorage {
    async fn get(&self, short: &str) -> Option<String> {
        self.inner.index.get(short).await
    }

    async fn set(&self, owner: OwnerId, short: &str, long: &str) -> std::result::Result<(), SetError> {
        let mapping = UrlMapping::new(owner, short, long);
        let inner = self.inner.clone();

        // 使用 spawn_blocking 执行同步文件写入
        tokio::task::spawn_blocking(move || inner.insert(mapping))
            .await
            .unwrap_or_else(|e| {
                error!("FileStorage append task failed: {}", e);
                Err(SetError::Other(SnaplinkError::file_operation(format!(
                    "Append task failed: {}",
                    e
                ))))
            })
    }

    async fn get_history(&self, owner: OwnerId) -> Result<HashMap<String, String>> {
        self.inner.index.get_history(owner).await
    }

    fn backend_name(&self) -> &'static str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn log_path(dir: &TempDir) -> PathBuf {
        dir.path().join("urls.log")
    }

    #[tokio::test]
    async fn test_open_creates_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("urls.log");

        let storage = FileStorage::open(&path).unwrap();
        assert!(path.exists());
        assert!(storage.get("abcde").await.is_none());
    }

    #[tokio::test]
    async fn test_set_appends_one_line_per_mapping() {
        let dir = TempDir::new().unwrap();
        let path = log_path(&dir);
        let owner = OwnerId::generate();

        let storage = FileStorage::open(&path).unwrap();
        storage.set(owner, "aaaaa", "https://a.example").await.unwrap();
        storage
            .set(OwnerId::ANONYMOUS, "bbbbb", "https://b.example")
            .await
            .unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["userID"], owner.to_string());
        assert_eq!(first["short"], "aaaaa");
        assert_eq!(first["long"], "https://a.example");

        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert!(second.get("userID").is_none());
    }

    #[tokio::test]
    async fn test_rejected_set_is_not_logged() {
        let dir = TempDir::new().unwrap();
        let path = log_path(&dir);

        let storage = FileStorage::open(&path).unwrap();
        storage
            .set(OwnerId::ANONYMOUS, "aaaaa", "https://a.example")
            .await
            .unwrap();
        let err = storage
            .set(OwnerId::ANONYMOUS, "bbbbb", "https://a.example")
            .await
            .unwrap_err();
        assert!(matches!(err, SetError::UniqueViolation(_)));

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_sets_log_each_mapping_once() {
        let dir = TempDir::new().unwrap();
        let path = log_path(&dir);
        let storage = Arc::new(FileStorage::open(&path).unwrap());

        let mut handles = Vec::new();
        for i in 0..64 {
            let storage = storage.clone();
            handles.push(tokio::spawn(async move {
                storage
                    .set(
                        OwnerId::ANONYMOUS,
                        &format!("c{:04}", i),
                        &format!("https://c.example/{}", i % 16),
                    )
                    .await
            }));
        }

        let mut created = 0;
        let mut conflicts = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(()) => created += 1,
                Err(SetError::UniqueViolation(_)) => conflicts += 1,
                Err(e) => panic!("unexpected error: {e}"),
            }
        }
        assert_eq!(created, 16);
        assert_eq!(conflicts, 48);

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 16);

        drop(storage);
        let reopened = FileStorage::open(&path).unwrap();
        assert_eq!(reopened.inner.index.len(), 16);
    }

    #[tokio::test]
    async fn test_replay_restores_mappings_and_history() {
        let dir = TempDir::new().unwrap();
        let path = log_path(&dir);
        let owner = OwnerId::generate();

        {
            let storage = FileStorage::open(&path).unwrap();
            storage.set(owner, "aaaaa", "https://a.example").await.unwrap();
            storage
                .set(OwnerId::ANONYMOUS, "bbbbb", "https://b.example")
                .await
                .unwrap();
        }

        let storage = FileStorage::open(&path).unwrap();
        assert_eq!(storage.get("aaaaa").await.as_deref(), Some("https://a.example"));
        assert_eq!(storage.get("bbbbb").await.as_deref(), Some("https://b.example"));

        let history = storage.get_history(owner).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history["aaaaa"], "https://a.example");
    }

    #[tokio::test]
    async fn test_replay_skips_blank_lines() {
        let dir = TempDir::new().unwrap();
        let path = log_path(&dir);
        fs::write(
            &path,
            "\n{\"short\":\"aaaaa\",\"long\":\"https://a.example\"}\n\n   \n",
        )
        .unwrap();

        let storage = FileStorage::open(&path).unwrap();
        assert_eq!(storage.get("aaaaa").await.as_deref(), Some("https://a.example"));
    }

    #[test]
    fn test_replay_fails_on_malformed_record() {
        let dir = TempDir::new().unwrap();
        let path = log_path(&dir);
        fs::write(
            &path,
            "{\"short\":\"aaaaa\",\"long\":\"https://a.example\"}\nnot json\n",
        )
        .unwrap();

        let err = FileStorage::open(&path).err().unwrap();
        assert!(matches!(err, SnaplinkError::Serialization(_)));
        assert!(err.message().contains(":2:"));
    }

    #[tokio::test]
    async fn test_replay_keeps_first_of_conflicting_records() {
        let dir = TempDir::new().unwrap();
        let path = log_path(&dir);
        fs::write(
            &path,
            concat!(
                "{\"short\":\"aaaaa\",\"long\":\"https://a.example\"}\n",
                "{\"short\":\"bbbbb\",\"long\":\"https://a.example\"}\n",
                "{\"short\":\"aaaaa\",\"long\":\"https://c.example\"}\n",
            ),
        )
        .unwrap();

        let storage = FileStorage::open(&path).unwrap();
        assert_eq!(storage.get("aaaaa").await.as_deref(), Some("https://a.example"));
        assert!(storage.get("bbbbb").await.is_none());
    }
}
