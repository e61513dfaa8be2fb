//! Degraded-mode reads from the Jikan API.
//!
//! When an AniList read fails, the top anime list from Jikan is reshaped into
//! an AniList `Page` payload. The result only approximates what AniList would
//! have returned and is never used to stand in for a mutation.

use crate::api::rate_limiter::RateLimiter;
use crate::api::types::GraphQlResponse;
use crate::error::{AniListError, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use shared::config::JikanConfig;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Status given to every reshaped entry; Jikan's list does not map onto
/// AniList's status enum.
pub const FALLBACK_STATUS: &str = "RELEASING";

/// Jikan requests per second / per minute
const JIKAN_PER_SECOND: f64 = 3.0;
const JIKAN_PER_MINUTE: u32 = 60;

/// Jikan fallback reader
#[derive(Debug)]
pub struct JikanFallback {
    client: Client,
    url: String,
    rate_limiter: Mutex<RateLimiter>,
}

impl JikanFallback {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
            rate_limiter: Mutex::new(RateLimiter::new(JIKAN_PER_SECOND, JIKAN_PER_MINUTE)),
        }
    }

    /// `None` when the fallback is switched off
    pub fn from_config(client: Client, config: &JikanConfig) -> Option<Self> {
        config
            .enabled
            .then(|| Self::new(client, config.fallback_url.clone()))
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch the Jikan list and decode it as an AniList response
    pub async fn fetch<T: DeserializeOwned>(&self, show: bool) -> Result<GraphQlResponse<T>> {
        self.rate_limiter.lock().await.acquire().await;

        debug!(url = %self.url, "Requesting Jikan fallback");
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| AniListError::fallback(format!("request failed: {}", e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| AniListError::fallback(format!("failed to read body: {}", e)))?;

        if show {
            info!(status = %status, body = %text, "Jikan API response");
        }

        if !status.is_success() {
            return Err(AniListError::fallback(format!(
                "Jikan returned status {}",
                status
            )));
        }

        let jikan: Value = serde_json::from_str(&text)
            .map_err(|e| AniListError::fallback(format!("invalid JSON: {}", e)))?;
        let reshaped = transform_jikan_to_anilist(&jikan)?;

        serde_json::from_value(reshaped)
            .map_err(|e| AniListError::fallback(format!("shape mismatch: {}", e)))
    }
}

/// Reshape a Jikan list response into `{"data":{"Page":{"media":[...]}}}`
///
/// Each entry maps `mal_id` to `id`, `members` to `popularity` and
/// `aired.from` to `start_date`; `status` is always [`FALLBACK_STATUS`].
pub fn transform_jikan_to_anilist(jikan: &Value) -> Result<Value> {
    let entries = jikan
        .get("data")
        .and_then(Value::as_array)
        .ok_or_else(|| AniListError::fallback("response has no data array"))?;

    let media = entries
        .iter()
        .map(reshape_entry)
        .collect::<Result<Vec<_>>>()?;

    Ok(json!({ "data": { "Page": { "media": media } } }))
}

fn reshape_entry(entry: &Value) -> Result<Value> {
    let missing = |field: &str| AniListError::fallback(format!("entry is missing `{}`", field));
    // Present keys are copied as they are, null included
    let present = |field: &str| entry.get(field).cloned().ok_or_else(|| missing(field));

    let id = entry
        .get("mal_id")
        .filter(|v| !v.is_null())
        .cloned()
        .ok_or_else(|| missing("mal_id"))?;

    let mut media = Map::new();
    media.insert("id".to_string(), id);
    media.insert("title".to_string(), present("title")?);
    media.insert("popularity".to_string(), present("members")?);
    media.insert(
        "episodes".to_string(),
        entry.get("episodes").cloned().unwrap_or(Value::Null),
    );
    media.insert("status".to_string(), json!(FALLBACK_STATUS));
    media.insert(
        "start_date".to_string(),
        entry
            .get("aired")
            .and_then(|aired| aired.get("from"))
            .cloned()
            .unwrap_or(Value::Null),
    );

    Ok(Value::Object(media))
}
