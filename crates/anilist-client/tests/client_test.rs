mod common;

use anilist_client::api::types::{FavType, PageData};
use anilist_client::operations::{ToggleFavourite, TopAnime};
use anilist_client::{AniListError, ExecuteOptions, ResponseCache};
use common::{jikan_top_anime, test_client, test_config};
use httpmock::prelude::*;
use serde_json::json;
use tempfile::TempDir;

#[tokio::test]
async fn test_request_headers_and_bearer_token() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/")
                .header("Content-Type", "application/json; charset=utf-8")
                .header("Accept", "application/json")
                .header("Authorization", "Bearer secret-token")
                .body_includes("ToggleFavourite")
                .body_includes(r#""characterId":42"#);
            then.status(200)
                .json_body(json!({ "data": { "ToggleFavourite": { "anime": null } } }));
        })
        .await;

    let client = test_client(&server).with_token("secret-token");
    let response = client
        .execute(
            &ToggleFavourite {
                kind: FavType::Character,
                id: 42,
            },
            ExecuteOptions::default(),
        )
        .await
        .unwrap();

    mock.assert_async().await;
    assert!(response.is_success());
}

#[tokio::test]
async fn test_token_can_be_left_out() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/").header_missing("Authorization");
            then.status(200).json_body(json!({ "data": {} }));
        })
        .await;

    let client = test_client(&server).with_token("secret-token");
    let options = ExecuteOptions {
        use_token: false,
        ..Default::default()
    };
    client
        .execute(&ToggleFavourite { kind: FavType::Anime, id: 1 }, options)
        .await
        .unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_rate_limited_records_reset() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/");
            then.status(429)
                .header("X-RateLimit-Reset", "1735689600")
                .header("Retry-After", "30")
                .body("Too Many Requests.");
        })
        .await;

    let client = test_client(&server);
    let result = client
        .execute(&ToggleFavourite { kind: FavType::Anime, id: 1 }, ExecuteOptions::default())
        .await;

    match result {
        Err(AniListError::RateLimited {
            reset_at,
            retry_after,
        }) => {
            assert_eq!(reset_at, 1_735_689_600);
            assert_eq!(retry_after, 30);
        }
        other => panic!("expected rate limit error, got {:?}", other),
    }
    assert_eq!(client.rate_limit_state().reset_at(), 1_735_689_600);
}

#[tokio::test]
async fn test_rate_limited_without_headers_records_zero() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/");
            then.status(429).header("X-RateLimit-Reset", "later");
        })
        .await;

    let client = test_client(&server);
    client.rate_limit_state().record_reset(99);

    let result = client
        .execute(&ToggleFavourite { kind: FavType::Anime, id: 1 }, ExecuteOptions::default())
        .await;

    assert!(matches!(
        result,
        Err(AniListError::RateLimited {
            reset_at: 0,
            retry_after: -1
        })
    ));
    assert_eq!(client.rate_limit_state().reset_at(), 0);
}

#[tokio::test]
async fn test_non_json_body_is_service_unavailable() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/");
            then.status(200).body("<html>AniList is down for maintenance</html>");
        })
        .await;

    let client = test_client(&server);
    let result = client
        .execute(&ToggleFavourite { kind: FavType::Anime, id: 1 }, ExecuteOptions::default())
        .await;

    assert!(matches!(result, Err(AniListError::ServiceUnavailable)));
}

#[tokio::test]
async fn test_server_errors_are_retried() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/");
            then.status(502).body("Bad Gateway");
        })
        .await;

    let mut config = test_config(&server);
    config.anilist.max_retries = 2;
    let client = anilist_client::AniListClient::new(&config.anilist).unwrap();

    let result = client
        .execute(&ToggleFavourite { kind: FavType::Anime, id: 1 }, ExecuteOptions::default())
        .await;

    assert!(matches!(result, Err(AniListError::ServiceUnavailable)));
    assert_eq!(mock.hits_async().await, 3);
}

#[tokio::test]
async fn test_mutation_failure_does_not_fall_back() {
    let anilist = MockServer::start_async().await;
    let jikan = MockServer::start_async().await;

    anilist
        .mock_async(|when, then| {
            when.method(POST).path("/");
            then.status(503).body("Service Unavailable");
        })
        .await;
    let jikan_mock = jikan
        .mock_async(|when, then| {
            when.method(GET).path("/v4/top/anime");
            then.status(200).json_body(jikan_top_anime(3));
        })
        .await;

    let client = test_client(&anilist).with_fallback_url(jikan.url("/v4/top/anime"));
    let result = client
        .execute(&ToggleFavourite { kind: FavType::Anime, id: 1 }, ExecuteOptions::default())
        .await;

    assert!(matches!(result, Err(AniListError::ServiceUnavailable)));
    assert_eq!(jikan_mock.hits_async().await, 0);
}

#[tokio::test]
async fn test_failed_read_falls_back_to_jikan() {
    let anilist = MockServer::start_async().await;
    let jikan = MockServer::start_async().await;

    anilist
        .mock_async(|when, then| {
            when.method(POST).path("/");
            then.status(200).body("not json");
        })
        .await;
    let jikan_mock = jikan
        .mock_async(|when, then| {
            when.method(GET).path("/v4/top/anime");
            then.status(200).json_body(jikan_top_anime(4));
        })
        .await;

    let client = test_client(&anilist).with_fallback_url(jikan.url("/v4/top/anime"));
    let response = client
        .execute(&TopAnime::default(), ExecuteOptions::show())
        .await
        .unwrap();

    jikan_mock.assert_async().await;
    let page: PageData = response.data.unwrap();
    assert_eq!(page.page.media.len(), 4);
    assert!(page
        .page
        .media
        .iter()
        .all(|m| m.status.as_deref() == Some("RELEASING")));
    assert_eq!(page.page.media[0].id, 1);
    assert_eq!(page.page.media[0].display_title(), "Anime 1");
    assert_eq!(page.page.media[1].episodes, None);
}

#[tokio::test]
async fn test_broken_fallback_is_reported() {
    let anilist = MockServer::start_async().await;
    let jikan = MockServer::start_async().await;

    anilist
        .mock_async(|when, then| {
            when.method(POST).path("/");
            then.status(429);
        })
        .await;
    jikan
        .mock_async(|when, then| {
            when.method(GET).path("/top");
            then.status(200).json_body(json!({ "message": "no data here" }));
        })
        .await;

    let client = test_client(&anilist).with_fallback_url(jikan.url("/top"));
    let result = client
        .execute(&TopAnime::default(), ExecuteOptions::default())
        .await;

    assert!(matches!(result, Err(AniListError::Fallback { .. })));
    assert_eq!(client.rate_limit_state().reset_at(), 0);
}

#[tokio::test]
async fn test_reads_are_cached_until_forced() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/").body_includes("POPULARITY_DESC");
            then.status(200).json_body(json!({
                "data": { "Page": { "media": [{
                    "id": 16498,
                    "title": { "romaji": "Shingeki no Kyojin", "userPreferred": "Shingeki no Kyojin" },
                    "popularity": 900000,
                    "episodes": 25,
                    "status": "FINISHED",
                    "startDate": { "year": 2013, "month": 4, "day": 7 }
                }] } }
            }));
        })
        .await;

    let temp_dir = TempDir::new().unwrap();
    let cache = ResponseCache::new(temp_dir.path(), true).unwrap();
    let client = test_client(&server).with_cache(cache);

    let first = client
        .execute(&TopAnime::default(), ExecuteOptions::default())
        .await
        .unwrap();
    let second = client
        .execute(&TopAnime::default(), ExecuteOptions::default())
        .await
        .unwrap();
    assert_eq!(mock.hits_async().await, 1);

    let media = &second.data.unwrap().page.media[0];
    assert_eq!(media.id, 16498);
    assert_eq!(media.start_date.and_then(|d| d.year), Some(2013));
    assert_eq!(first.data.unwrap().page.media.len(), 1);

    let forced = ExecuteOptions {
        force: true,
        ..Default::default()
    };
    client.execute(&TopAnime::default(), forced).await.unwrap();
    assert_eq!(mock.hits_async().await, 2);
}

#[tokio::test]
async fn test_mutations_are_never_cached() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/");
            then.status(200).json_body(json!({ "data": {} }));
        })
        .await;

    let temp_dir = TempDir::new().unwrap();
    let cache = ResponseCache::new(temp_dir.path(), true).unwrap();
    let client = test_client(&server).with_cache(cache);

    for _ in 0..2 {
        client
            .execute(&ToggleFavourite { kind: FavType::Staff, id: 9 }, ExecuteOptions::default())
            .await
            .unwrap();
    }

    assert_eq!(mock.hits_async().await, 2);
}

#[tokio::test]
async fn test_clear_cache_forces_refetch() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/");
            then.status(200)
                .json_body(json!({ "data": { "Page": { "media": [] } } }));
        })
        .await;

    let temp_dir = TempDir::new().unwrap();
    let cache = ResponseCache::new(temp_dir.path().join("responses"), true).unwrap();
    let client = test_client(&server).with_cache(cache);

    client
        .execute(&TopAnime::default(), ExecuteOptions::default())
        .await
        .unwrap();
    client
        .execute(&TopAnime::default(), ExecuteOptions::default())
        .await
        .unwrap();
    assert_eq!(mock.hits_async().await, 1);

    client.clear_cache().unwrap();
    client
        .execute(&TopAnime::default(), ExecuteOptions::default())
        .await
        .unwrap();
    assert_eq!(mock.hits_async().await, 2);

    test_client(&server).clear_cache().unwrap();
}
