//! File-backed cache for AniList read responses.
//!
//! Entries carry their storage time; a lookup only returns an entry younger
//! than the lifetime the caller asks for.

use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Cached response body
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CachedResponse {
    stored_at: DateTime<Utc>,
    body: String,
}

/// Response cache rooted at a directory
#[derive(Debug)]
pub struct ResponseCache {
    cache_dir: PathBuf,
    enabled: bool,
}

impl ResponseCache {
    /// Create a new response cache
    pub fn new(cache_dir: impl AsRef<Path>, enabled: bool) -> Result<Self> {
        let cache_dir = cache_dir.as_ref().to_path_buf();

        if enabled {
            std::fs::create_dir_all(&cache_dir)?;
            info!(cache_dir = %cache_dir.display(), "Response cache initialized");
        }

        Ok(Self { cache_dir, enabled })
    }

    /// Build the cache key for a request body
    ///
    /// Keys are stable across builds: `<operation>_<first 16 hex digits of
    /// sha256(body, token)>`.
    pub fn key_for(operation: &str, body: &str, token: Option<&str>) -> String {
        let mut hasher = Sha256::new();
        hasher.update(body.as_bytes());
        if let Some(token) = token {
            hasher.update([0u8]);
            hasher.update(token.as_bytes());
        }
        let hash = format!("{:x}", hasher.finalize());

        format!("{}_{}", operation, &hash[..16])
    }

    /// Get a cached body no older than `max_age`
    pub fn get(&self, key: &str, max_age: Duration) -> Result<Option<String>> {
        if !self.enabled {
            return Ok(None);
        }

        let path = self.cache_path(key);
        if !path.exists() {
            debug!(key = key, "Cache miss");
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path)?;
        let entry: CachedResponse = serde_json::from_str(&content)?;

        let age = Utc::now()
            .signed_duration_since(entry.stored_at)
            .to_std()
            .unwrap_or(Duration::ZERO);
        if age > max_age {
            debug!(key = key, age_secs = age.as_secs(), "Cache entry expired");
            return Ok(None);
        }

        debug!(key = key, "Cache hit");
        Ok(Some(entry.body))
    }

    /// Store a response body
    pub fn set(&self, key: &str, body: &str) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        let path = self.cache_path(key);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let entry = CachedResponse {
            stored_at: Utc::now(),
            body: body.to_string(),
        };
        std::fs::write(&path, serde_json::to_string(&entry)?)?;

        debug!(key = key, path = %path.display(), "Cache stored");
        Ok(())
    }

    fn cache_path(&self, key: &str) -> PathBuf {
        let safe_key = key
            .replace(['/', '\\', ':', '*', '?', '"', '<', '>', '|'], "_")
            .replace("__", "_");

        self.cache_dir.join(format!("{}.json", safe_key))
    }

    /// Clear all cache
    pub fn clear(&self) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        if self.cache_dir.exists() {
            std::fs::remove_dir_all(&self.cache_dir)?;
            std::fs::create_dir_all(&self.cache_dir)?;
            info!("Response cache cleared");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const HOUR: Duration = Duration::from_secs(3600);

    #[test]
    fn test_cache_enabled() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let cache = ResponseCache::new(temp_dir.path(), true)?;

        cache.set("TopAnime_1", r#"{"data":{}}"#)?;

        let retrieved = cache.get("TopAnime_1", HOUR)?;
        assert_eq!(retrieved.as_deref(), Some(r#"{"data":{}}"#));

        Ok(())
    }

    #[test]
    fn test_cache_disabled() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let cache = ResponseCache::new(temp_dir.path(), false)?;

        // Store should succeed but do nothing
        cache.set("TopAnime_1", "{}")?;

        assert_eq!(cache.get("TopAnime_1", HOUR)?, None);
        assert!(!cache.cache_path("TopAnime_1").exists());

        Ok(())
    }

    #[test]
    fn test_cache_miss() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let cache = ResponseCache::new(temp_dir.path(), true)?;

        assert_eq!(cache.get("nonexistent", HOUR)?, None);

        Ok(())
    }

    #[test]
    fn test_expired_entry_is_ignored() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let cache = ResponseCache::new(temp_dir.path(), true)?;

        let stale = CachedResponse {
            stored_at: Utc::now() - chrono::Duration::seconds(120),
            body: "{}".to_string(),
        };
        std::fs::write(
            cache.cache_path("stale"),
            serde_json::to_string(&stale)?,
        )?;

        assert!(cache.cache_path("stale").exists());
        assert_eq!(cache.get("stale", Duration::from_secs(60))?, None);
        assert_eq!(cache.get("stale", HOUR)?.as_deref(), Some("{}"));

        Ok(())
    }

    #[test]
    fn test_key_depends_on_body_and_token() {
        let a = ResponseCache::key_for("TopAnime", "{\"query\":1}", None);
        let b = ResponseCache::key_for("TopAnime", "{\"query\":2}", None);
        let c = ResponseCache::key_for("TopAnime", "{\"query\":1}", Some("token"));

        assert!(a.starts_with("TopAnime_"));
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_eq!(a, ResponseCache::key_for("TopAnime", "{\"query\":1}", None));
    }

    #[test]
    fn test_key_is_stable_across_builds() {
        assert_eq!(
            ResponseCache::key_for("TopAnime", "{\"query\":1}", None),
            "TopAnime_5dac66b7458f5900"
        );
        assert_eq!(
            ResponseCache::key_for("TopAnime", "{\"query\":1}", Some("token")),
            "TopAnime_87256e3419d282ce"
        );
    }

    #[test]
    fn test_clear() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let cache = ResponseCache::new(temp_dir.path().join("responses"), true)?;

        cache.set("one", "{}")?;
        assert!(cache.cache_path("one").exists());

        cache.clear()?;
        assert!(!cache.cache_path("one").exists());

        Ok(())
    }
}
