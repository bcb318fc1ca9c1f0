use crate::cache::{Clock, SystemClock};
use chrono::{DateTime, TimeDelta, Utc};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::fs;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::ReadDirStream;
use tracing::{debug, info, instrument, warn};

const EXTENSION: &str = "json";

/// Expiring key/value store backed by one JSON file per key.
///
/// An entry is fresh while `now - fetched_at < ttl`. Entries are never evicted
/// on read; a stale entry is simply overwritten by the next successful fetch.
#[derive(Debug)]
pub struct TtlCache {
    directory: PathBuf,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry<T> {
    fetched_at: DateTime<Utc>,
    value: T,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntryInfo {
    pub key: String,
    pub fetched_at: DateTime<Utc>,
    pub age: TimeDelta,
    pub fresh: bool,
}

impl TtlCache {
    pub fn new(directory: &Path, ttl: Duration) -> Self {
        Self::with_clock(directory, ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(directory: &Path, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        TtlCache {
            directory: directory.to_path_buf(),
            ttl,
            clock,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Returns the cached value for `key` if it is still fresh.
    #[instrument(skip(self))]
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.read_entry::<T>(key).await {
            Ok(Some(entry)) if self.is_fresh(entry.fetched_at) => Some(entry.value),
            Ok(Some(entry)) => {
                debug!(fetched_at = %entry.fetched_at, "🗄️ Cache entry '{}' is stale", key);
                None
            }
            Ok(None) => None,
            Err(e) => {
                warn!("⚠️ Ignoring unreadable cache entry '{}': {}", key, e);
                None
            }
        }
    }

    #[instrument(skip(self, value))]
    pub async fn put<T: Serialize>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        let entry = CacheEntry {
            fetched_at: self.clock.now(),
            value,
        };
        let json = serde_json::to_vec(&entry)?;

        fs::create_dir_all(&self.directory).await.map_err(|e| io_error(e, &self.directory))?;

        // Write then rename so a reader never sees a half written entry
        let path = self.path(key);
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, json).await.map_err(|e| io_error(e, &temp_path))?;
        fs::rename(&temp_path, &path).await.map_err(|e| io_error(e, &path))?;

        debug!("🗄️ Stored cache entry '{}'", key);
        Ok(())
    }

    /// Returns the fresh cached value, or runs `fetch` once and caches its result.
    ///
    /// A failed fetch leaves the existing entry untouched. A failure to write the
    /// cache is logged and does not fail the call.
    #[instrument(skip(self, fetch))]
    pub async fn get_or_fetch<T, E, F, Fut>(&self, key: &str, fetch: F) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(value) = self.get::<T>(key).await {
            debug!("🗄️ Cache hit for '{}'", key);
            return Ok(value);
        }

        debug!("🗄️ Cache miss for '{}', fetching...", key);
        let value = fetch().await?;

        if let Err(e) = self.put(key, &value).await {
            warn!("⚠️ Could not cache '{}': {}", key, e);
        }

        Ok(value)
    }

    /// Lists the stored entries, sorted by key.
    #[instrument(skip(self))]
    pub async fn entries(&self) -> Result<Vec<CacheEntryInfo>, CacheError> {
        let now = self.clock.now();
        let mut entries = Vec::new();

        for path in self.list_files().await? {
            let Some(key) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            match self.read_entry::<IgnoredAny>(key).await {
                Ok(Some(entry)) => entries.push(CacheEntryInfo {
                    key: key.to_string(),
                    fetched_at: entry.fetched_at,
                    age: now.signed_duration_since(entry.fetched_at),
                    fresh: self.is_fresh(entry.fetched_at),
                }),
                Ok(None) => {}
                Err(e) => warn!("⚠️ Skipping unreadable cache entry '{}': {}", key, e),
            }
        }

        entries.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(entries)
    }

    /// Removes every entry and returns how many were removed.
    #[instrument(skip(self))]
    pub async fn clear(&self) -> Result<usize, CacheError> {
        info!("🧹 Clearing cache...");
        let files = self.list_files().await?;
        for path in &files {
            fs::remove_file(path).await.map_err(|e| io_error(e, path))?;
        }

        info!("🧹 Clearing cache... OK, {} entries removed", files.len());
        Ok(files.len())
    }

    fn path(&self, key: &str) -> PathBuf {
        self.directory.join(format!("{}.{}", key, EXTENSION))
    }

    fn is_fresh(&self, fetched_at: DateTime<Utc>) -> bool {
        let ttl = TimeDelta::from_std(self.ttl).unwrap_or(TimeDelta::MAX);
        self.clock.now().signed_duration_since(fetched_at) < ttl
    }

    async fn read_entry<T: DeserializeOwned>(&self, key: &str) -> Result<Option<CacheEntry<T>>, CacheError> {
        let path = self.path(key);
        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(io_error(e, &path)),
        };

        Ok(Some(serde_json::from_str(&content)?))
    }

    async fn list_files(&self) -> Result<Vec<PathBuf>, CacheError> {
        let dir = match fs::read_dir(&self.directory).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_error(e, &self.directory)),
        };

        let mut files = Vec::new();
        let mut entries = ReadDirStream::new(dir);
        while let Some(entry) = entries.next().await {
            match entry {
                Ok(entry) => {
                    let path = entry.path();
                    if path.is_file() && path.extension().and_then(|e| e.to_str()) == Some(EXTENSION) {
                        files.push(path);
                    }
                }
                Err(e) => warn!("⚠️ Unable to read cache directory entry: {}", e),
            }
        }

        Ok(files)
    }
}

fn io_error(source: io::Error, path: &Path) -> CacheError {
    CacheError::Io {
        source,
        path: path.to_path_buf(),
    }
}

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("{source} ({})", .path.display())]
    Io { source: io::Error, path: PathBuf },
    #[error("invalid cache entry: {0}")]
    Serde(#[from] serde_json::Error),
}
