//! AniList GraphQL client with pacing, retries, response caching and the
//! Jikan read fallback.

use super::rate_limiter::{parse_header_i64, RateLimitState, RateLimiter};
use super::types::{GraphQlRequest, GraphQlResponse};
use crate::cache::ResponseCache;
use crate::error::{AniListError, Result};
use crate::fallback::JikanFallback;
use crate::operations::{Operation, OperationKind};
use crate::sanitize::to_html_safe_json;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use shared::config::AniListConfig;
use shared::Config;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::sleep;
use tracing::{debug, info, warn};

const USER_AGENT: &str = concat!("anilist-client/", env!("CARGO_PKG_VERSION"));

/// Per-call execution flags
#[derive(Debug, Clone, Copy)]
pub struct ExecuteOptions {
    /// Skip the response cache
    pub force: bool,
    /// Send the bearer token, if one is configured
    pub use_token: bool,
    /// Log the query and fallback activity at info level
    pub show: bool,
    /// Cache lifetime in seconds; `None` uses the configured default
    pub cache: Option<u64>,
}

impl Default for ExecuteOptions {
    fn default() -> Self {
        Self {
            force: false,
            use_token: true,
            show: false,
            cache: None,
        }
    }
}

impl ExecuteOptions {
    pub fn show() -> Self {
        Self {
            show: true,
            ..Default::default()
        }
    }
}

/// AniList GraphQL client
///
/// Cheap to clone; clones share the pacing limiter, cache and rate-limit state.
#[derive(Debug, Clone)]
pub struct AniListClient {
    client: Client,
    endpoint: String,
    token: Option<String>,
    max_retries: u32,
    retry_delay_ms: u64,
    default_cache_seconds: u64,
    rate_limiter: Arc<Mutex<RateLimiter>>,
    rate_limit_state: RateLimitState,
    cache: Option<Arc<ResponseCache>>,
    fallback: Option<Arc<JikanFallback>>,
}

impl AniListClient {
    /// Create a client without cache or fallback
    pub fn new(config: &AniListConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            token: config.token.clone().filter(|t| !t.is_empty()),
            max_retries: config.max_retries,
            retry_delay_ms: config.retry_delay_ms,
            default_cache_seconds: config.cache.expiration_seconds,
            rate_limiter: Arc::new(Mutex::new(RateLimiter::from_config(&config.rate_limit))),
            rate_limit_state: RateLimitState::new(),
            cache: None,
            fallback: None,
        })
    }

    /// Create a fully configured client: cache under the data directory and
    /// the Jikan fallback when enabled
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut client = Self::new(&config.anilist)?;

        if config.anilist.cache.enabled {
            client = client.with_cache(ResponseCache::new(config.cache_dir(), true)?);
        }
        if let Some(fallback) = JikanFallback::from_config(client.client.clone(), &config.jikan) {
            client = client.with_fallback(fallback);
        }

        Ok(client)
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_cache(mut self, cache: ResponseCache) -> Self {
        self.cache = Some(Arc::new(cache));
        self
    }

    pub fn with_fallback(mut self, fallback: JikanFallback) -> Self {
        self.fallback = Some(Arc::new(fallback));
        self
    }

    /// Jikan fallback pointed at `url`, sharing this client's HTTP pool
    pub fn with_fallback_url(self, url: impl Into<String>) -> Self {
        let fallback = JikanFallback::new(self.client.clone(), url);
        self.with_fallback(fallback)
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Remove every cached response. Does nothing without a cache.
    pub fn clear_cache(&self) -> Result<()> {
        match &self.cache {
            Some(cache) => cache.clear(),
            None => Ok(()),
        }
    }

    /// Rate-limit state written when AniList answers 429
    pub fn rate_limit_state(&self) -> &RateLimitState {
        &self.rate_limit_state
    }

    /// Execute an operation
    ///
    /// A failed read is retried against the Jikan fallback when one is
    /// configured. Failed mutations are returned as they are.
    pub async fn execute<O: Operation>(
        &self,
        operation: &O,
        options: ExecuteOptions,
    ) -> Result<GraphQlResponse<O::Data>> {
        let request = GraphQlRequest::new(O::DOCUMENT, operation.variables());
        if options.show {
            info!(operation = O::NAME, query = O::DOCUMENT, "AniList query");
        }

        let error = match self.execute_anilist::<O>(&request, options).await {
            Ok(response) => return Ok(response),
            Err(e) => e,
        };

        match (&self.fallback, O::KIND) {
            (Some(fallback), OperationKind::Query) => {
                if options.show {
                    info!(operation = O::NAME, "Falling back to Jikan API");
                }
                warn!(
                    operation = O::NAME,
                    error = %error,
                    url = fallback.url(),
                    "AniList query failed, falling back to Jikan"
                );
                fallback.fetch::<O::Data>(options.show).await
            }
            _ => {
                warn!(operation = O::NAME, error = %error, "AniList request failed");
                Err(error)
            }
        }
    }

    async fn execute_anilist<O: Operation>(
        &self,
        request: &GraphQlRequest,
        options: ExecuteOptions,
    ) -> Result<GraphQlResponse<O::Data>> {
        let body = to_html_safe_json(request)?;
        let token = if options.use_token {
            self.token.as_deref()
        } else {
            None
        };

        let cache = match (&self.cache, O::KIND) {
            (Some(cache), OperationKind::Query) => Some(cache),
            _ => None,
        };
        let cache_key = ResponseCache::key_for(O::NAME, &body, token);
        let max_age = Duration::from_secs(options.cache.unwrap_or(self.default_cache_seconds));

        if let (Some(cache), false) = (cache, options.force) {
            match cache.get(&cache_key, max_age) {
                Ok(Some(cached)) => {
                    debug!(operation = O::NAME, "Serving cached response");
                    return Ok(serde_json::from_str(&cached)?);
                }
                Ok(None) => {}
                Err(e) => warn!(operation = O::NAME, error = %e, "Failed to read cached response"),
            }
        }

        let text = self.post(body, token).await?;
        let response: GraphQlResponse<O::Data> = serde_json::from_str(&text)?;

        if let Some(cache) = cache {
            if response.is_success() {
                if let Err(e) = cache.set(&cache_key, &text) {
                    warn!(operation = O::NAME, error = %e, "Failed to cache response");
                }
            }
        }

        Ok(response)
    }

    /// POST a body to the GraphQL endpoint and return the JSON text
    async fn post(&self, body: String, token: Option<&str>) -> Result<String> {
        let mut attempt = 0;

        loop {
            self.rate_limiter.lock().await.acquire().await;

            debug!(url = %self.endpoint, attempt = attempt + 1, "Making AniList request");

            let mut request = self
                .client
                .post(&self.endpoint)
                .header(CONTENT_TYPE, "application/json; charset=utf-8")
                .header(ACCEPT, "application/json")
                .body(body.clone());
            if let Some(token) = token {
                request = request.bearer_auth(token);
            }

            match request.send().await {
                Ok(response) => {
                    let status = response.status();

                    if status == StatusCode::TOO_MANY_REQUESTS {
                        let header = |name: &str| {
                            parse_header_i64(
                                response.headers().get(name).and_then(|v| v.to_str().ok()),
                            )
                        };
                        let reset_at = header("X-RateLimit-Reset").unwrap_or(0);
                        let retry_after = header("Retry-After").unwrap_or(-1);

                        self.rate_limit_state.record_reset(reset_at);
                        warn!(reset_at, retry_after, "Rate limited by AniList");
                        return Err(AniListError::RateLimited {
                            reset_at,
                            retry_after,
                        });
                    }

                    if status.is_server_error() && attempt < self.max_retries {
                        let delay = self.backoff(attempt);
                        warn!(
                            status = %status,
                            delay_ms = delay.as_millis(),
                            "AniList server error, retrying"
                        );
                        sleep(delay).await;
                        attempt += 1;
                        continue;
                    }

                    let text = response.text().await?;
                    if !text.starts_with('{') {
                        warn!(status = %status, "AniList returned a non-JSON body");
                        return Err(AniListError::ServiceUnavailable);
                    }

                    debug!(status = %status, "AniList request complete");
                    return Ok(text);
                }
                Err(e) if attempt < self.max_retries => {
                    let delay = self.backoff(attempt);
                    warn!(error = %e, delay_ms = delay.as_millis(), "Request error, retrying");
                    sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(AniListError::Http(e)),
            }
        }
    }

    fn backoff(&self, attempt: u32) -> Duration {
        Duration::from_millis(self.retry_delay_ms.saturating_mul(2u64.saturating_pow(attempt)))
    }
}
