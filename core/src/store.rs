// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::path::{Path, PathBuf};

use tokio::fs;

use crate::cache::SyncCache;
use crate::config::Config;
use crate::error::Error;

const CACHE_FILE: &str = "kanji_list_cache.json";

/// Persists the [`SyncCache`] as a JSON file in the state directory.
#[derive(Debug, Clone)]
pub struct CacheStore {
    path: PathBuf,
}

impl CacheStore {
    /// Store backed by the cache file in `state_dir`.
    #[must_use]
    pub fn new(state_dir: &Path) -> Self {
        Self {
            path: state_dir.join(CACHE_FILE),
        }
    }

    /// Store for a normalized configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if no state directory is configured.
    pub fn for_config(config: &Config) -> Result<Self, Error> {
        match &config.state_dir {
            Some(dir) => Ok(Self::new(dir)),
            None => Err(Error::Config("no state directory configured".to_string())),
        }
    }

    /// Path of the cache file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the cache, starting empty if it has never been saved.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub async fn load(&self) -> Result<SyncCache, Error> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no cache file yet");
                return Ok(SyncCache::default());
            }
            Err(source) => {
                return Err(Error::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        serde_json::from_slice(&bytes).map_err(|source| Error::Json {
            path: self.path.clone(),
            source,
        })
    }

    /// Saves the cache, replacing the previous file in one step so that a
    /// failed write never leaves a truncated cache behind.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub async fn save(&self, cache: &SyncCache) -> Result<(), Error> {
        let io_err = |source| Error::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await.map_err(io_err)?;
        }

        let json = serde_json::to_vec_pretty(cache).map_err(|source| Error::Json {
            path: self.path.clone(),
            source,
        })?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).await.map_err(io_err)?;
        fs::rename(&tmp, &self.path).await.map_err(io_err)?;

        tracing::debug!(path = %self.path.display(), entries = cache.len(), "cache saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use wanisync_wanikani::{ETag, SubjectId};

    use super::*;

    #[tokio::test]
    async fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::new(dir.path());
        assert_eq!(store.load().await.unwrap(), SyncCache::default());
    }

    #[tokio::test]
    async fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::new(&dir.path().join("nested"));

        let mut cache = SyncCache::default();
        cache.merge_definitions([(SubjectId::new(440), "一".to_string())]);
        cache.merge_list_watermarks(Some(ETag::from("e")), Some("t".to_string()));
        store.save(&cache).await.unwrap();

        assert!(store.path().exists());
        assert!(!store.path().with_extension("json.tmp").exists());
        assert_eq!(store.load().await.unwrap(), cache);
    }

    #[tokio::test]
    async fn corrupt_file_is_json_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::new(dir.path());
        fs::write(store.path(), b"{ not json").await.unwrap();

        let err = store.load().await.unwrap_err();
        assert!(matches!(err, Error::Json { .. }));
    }

    #[test]
    fn for_config_requires_state_dir() {
        assert!(CacheStore::for_config(&Config::default()).is_err());

        let config = Config {
            state_dir: Some(PathBuf::from("/tmp/wanisync")),
            ..Default::default()
        };
        let store = CacheStore::for_config(&config).unwrap();
        assert_eq!(
            store.path(),
            Path::new("/tmp/wanisync/kanji_list_cache.json")
        );
    }
}
