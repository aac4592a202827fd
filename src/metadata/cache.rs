//! File-backed cache of the normalized camera list

use super::fetcher::{MetadataSource, fetch_or_empty};
use crate::camera::{CameraRecord, normalize};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CacheError>;

/// Normalized camera list persisted as a JSON array.
///
/// Freshness is the file's modification time compared against a caller
/// supplied `now`. The file is only ever replaced wholesale.
#[derive(Debug, Clone)]
pub struct MetadataCache {
    path: PathBuf,
    max_age: Duration,
}

impl MetadataCache {
    pub fn new(path: impl Into<PathBuf>, max_age: Duration) -> Self {
        Self {
            path: path.into(),
            max_age,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Age of the cache file at `now`, or `None` if there is no cache file.
    /// A modification time in the future counts as age zero.
    pub async fn age(&self, now: SystemTime) -> Option<Duration> {
        let modified = tokio::fs::metadata(&self.path).await.ok()?.modified().ok()?;
        Some(now.duration_since(modified).unwrap_or(Duration::ZERO))
    }

    pub async fn is_fresh(&self, now: SystemTime) -> bool {
        self.age(now).await.is_some_and(|age| age < self.max_age)
    }

    pub async fn read(&self) -> Result<Vec<CameraRecord>> {
        let data = tokio::fs::read(&self.path).await?;
        Ok(serde_json::from_slice(&data)?)
    }

    /// Replace the cache file with `records`
    pub async fn write(&self, records: &[CameraRecord]) -> Result<()> {
        let json = serde_json::to_string_pretty(records)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        debug!(path = %self.path.display(), count = records.len(), "Cache written");
        Ok(())
    }

    /// Return cached records if fresh, otherwise fetch, normalize and cache.
    ///
    /// An empty fetch result is returned as-is and never overwrites the
    /// existing cache file.
    pub async fn load_or_refresh<S>(&self, source: &S, now: SystemTime) -> Vec<CameraRecord>
    where
        S: MetadataSource + ?Sized,
    {
        if let Some(age) = self.age(now).await.filter(|age| *age < self.max_age) {
            match self.read().await {
                Ok(records) => {
                    info!(
                        path = %self.path.display(),
                        age_secs = age.as_secs(),
                        count = records.len(),
                        "Using cached camera list"
                    );
                    return records;
                }
                Err(e) => {
                    warn!(path = %self.path.display(), error = %e, "Unreadable cache, refreshing");
                }
            }
        }

        let raw = fetch_or_empty(source).await;
        let records = normalize(&raw);

        if records.is_empty() {
            warn!(path = %self.path.display(), "No camera records fetched, keeping existing cache");
            return records;
        }

        if let Err(e) = self.write(&records).await {
            warn!(path = %self.path.display(), error = %e, "Failed to write cache");
        }

        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::fetcher::{MetadataFetchError, Result as FetchResult};
    use async_trait::async_trait;
    use serde_json::{Value, json};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    const HOUR: Duration = Duration::from_secs(3600);

    /// In-memory source that counts calls
    struct StaticSource {
        cameras: Option<Vec<Value>>,
        calls: AtomicUsize,
    }

    impl StaticSource {
        fn with(cameras: Vec<Value>) -> Self {
            Self {
                cameras: Some(cameras),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                cameras: None,
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl MetadataSource for StaticSource {
        async fn fetch_camera_list(&self) -> FetchResult<Vec<Value>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.cameras {
                Some(cameras) => Ok(cameras.clone()),
                None => Err(MetadataFetchError::Decode(
                    serde_json::from_str::<Value>("{").unwrap_err(),
                )),
            }
        }
    }

    fn cached_record(id: &str) -> CameraRecord {
        normalize(&[json!({"id": id, "nombre": "Cached", "url": "http://x/cam.php"})])
            .remove(0)
    }

    fn mtime(path: &Path) -> SystemTime {
        std::fs::metadata(path).unwrap().modified().unwrap()
    }

    #[tokio::test]
    async fn test_fresh_cache_skips_fetch() {
        let dir = TempDir::new().unwrap();
        let cache = MetadataCache::new(dir.path().join("cache.json"), 24 * HOUR);
        cache.write(&[cached_record("c1")]).await.unwrap();

        let source = StaticSource::with(vec![json!({"id": "fresh"})]);
        let now = mtime(cache.path()) + 23 * HOUR;

        let records = cache.load_or_refresh(&source, now).await;
        assert_eq!(source.calls(), 0);
        assert_eq!(records, vec![cached_record("c1")]);
    }

    #[tokio::test]
    async fn test_stale_cache_is_refreshed() {
        let dir = TempDir::new().unwrap();
        let cache = MetadataCache::new(dir.path().join("cache.json"), 24 * HOUR);
        cache.write(&[cached_record("c1")]).await.unwrap();

        let source = StaticSource::with(vec![json!({"id": "fresh", "nombre": "Nova"})]);
        let now = mtime(cache.path()) + 25 * HOUR;

        let records = cache.load_or_refresh(&source, now).await;
        assert_eq!(source.calls(), 1);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "fresh");

        // Cache was replaced
        assert_eq!(cache.read().await.unwrap()[0].id, "fresh");
    }

    #[tokio::test]
    async fn test_exact_max_age_is_stale() {
        let dir = TempDir::new().unwrap();
        let cache = MetadataCache::new(dir.path().join("cache.json"), 24 * HOUR);
        cache.write(&[cached_record("c1")]).await.unwrap();

        let now = mtime(cache.path()) + 24 * HOUR;
        assert!(!cache.is_fresh(now).await);
        assert!(cache.is_fresh(now - Duration::from_secs(1)).await);
    }

    #[tokio::test]
    async fn test_missing_cache_fetches_and_writes() {
        let dir = TempDir::new().unwrap();
        let cache = MetadataCache::new(dir.path().join("nested/cache.json"), 24 * HOUR);
        assert!(cache.age(SystemTime::now()).await.is_none());

        let source = StaticSource::with(vec![json!({"id": "a", "nombre": "Rúa Urzáiz"})]);
        let records = cache.load_or_refresh(&source, SystemTime::now()).await;

        assert_eq!(source.calls(), 1);
        assert_eq!(records.len(), 1);

        let on_disk = std::fs::read_to_string(cache.path()).unwrap();
        assert!(on_disk.contains("Rúa Urzáiz"), "non-ASCII should be literal");
        assert!(on_disk.contains("\n  "), "should be pretty printed");
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_old_cache() {
        let dir = TempDir::new().unwrap();
        let cache = MetadataCache::new(dir.path().join("cache.json"), 24 * HOUR);
        cache.write(&[cached_record("old")]).await.unwrap();

        let source = StaticSource::failing();
        let now = mtime(cache.path()) + 48 * HOUR;

        let records = cache.load_or_refresh(&source, now).await;
        assert!(records.is_empty());
        assert_eq!(source.calls(), 1);
        assert_eq!(cache.read().await.unwrap(), vec![cached_record("old")]);
    }

    #[tokio::test]
    async fn test_corrupt_cache_is_refreshed() {
        let dir = TempDir::new().unwrap();
        let cache = MetadataCache::new(dir.path().join("cache.json"), 24 * HOUR);
        std::fs::write(cache.path(), "not json").unwrap();

        let source = StaticSource::with(vec![json!({"id": "new"})]);
        let records = cache.load_or_refresh(&source, mtime(cache.path())).await;

        assert_eq!(source.calls(), 1);
        assert_eq!(records[0].id, "new");
    }

    #[tokio::test]
    async fn test_non_finite_coordinates_do_not_poison_cache() {
        let dir = TempDir::new().unwrap();
        let cache = MetadataCache::new(dir.path().join("cache.json"), 24 * HOUR);
        let source = StaticSource::with(vec![
            json!({"id": "1", "lat": "NaN", "lon": "inf"}),
            json!({"id": "2", "lat": "42.2", "lon": "-8.7"}),
        ]);

        let first = cache.load_or_refresh(&source, SystemTime::now()).await;
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].id, "2");

        let now = mtime(cache.path()) + HOUR;
        let second = cache.load_or_refresh(&source, now).await;
        assert_eq!(second, first);
        assert_eq!(source.calls(), 1);
    }
}
