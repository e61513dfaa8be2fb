#![allow(dead_code)]

use anilist_client::AniListClient;
use httpmock::MockServer;
use serde_json::{json, Value};
use shared::Config;

/// Config pointing at a mock GraphQL server, without pacing delays
pub fn test_config(server: &MockServer) -> Config {
    let mut config = Config::default();
    config.anilist.endpoint = server.url("/");
    config.anilist.max_retries = 0;
    config.anilist.retry_delay_ms = 1;
    config.anilist.rate_limit.requests_per_second = 1000.0;
    config.anilist.rate_limit.requests_per_minute = 1000;
    config.anilist.cache.enabled = false;
    config
}

pub fn test_client(server: &MockServer) -> AniListClient {
    AniListClient::new(&test_config(server).anilist).unwrap()
}

pub fn jikan_top_anime(n: usize) -> Value {
    let data: Vec<Value> = (1..=n)
        .map(|i| {
            json!({
                "mal_id": i,
                "title": format!("Anime {}", i),
                "members": 10_000 * i,
                "episodes": if i % 2 == 0 { json!(null) } else { json!(24) },
                "aired": { "from": "2019-01-01T00:00:00+00:00" },
            })
        })
        .collect();

    json!({ "pagination": { "has_next_page": true }, "data": data })
}
