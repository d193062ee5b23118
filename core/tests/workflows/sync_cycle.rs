// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Full sync passes: fetch, merge, persist, reload.

use wanisync_core::{CacheStore, ETag, Error, SubjectId, WaniKaniClient, synchronize};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{
    assignment_page, lacks_header, lacks_query, setup_temp_dirs, subject_page, test_config,
};

#[tokio::test]
async fn sync_second_pass_not_modified_keeps_cache_file_identical() {
    // Arrange
    let server = MockServer::start().await;
    let temp_dirs = setup_temp_dirs().await.unwrap();

    Mock::given(method("GET"))
        .and(path("/v2/assignments"))
        .and(header("If-None-Match", r#"W/"list-1""#))
        .respond_with(ResponseTemplate::new(304))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/assignments"))
        .and(lacks_header("If-None-Match"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("ETag", r#"W/"list-1""#)
                .set_body_json(assignment_page(&[440, 450], "2024-01-01T00:00:00Z")),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/subjects"))
        .and(header("If-None-Match", r#"W/"defs-1""#))
        .respond_with(ResponseTemplate::new(304))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/subjects"))
        .and(query_param("ids", "440,450"))
        .and(lacks_header("If-None-Match"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("ETag", r#"W/"defs-1""#)
                .set_body_json(subject_page(
                    &[(440, "一"), (450, "口")],
                    "2024-01-01T00:00:00Z",
                )),
        )
        .expect(1)
        .mount(&server)
        .await;

    let config = test_config(&server, &temp_dirs.state_dir);
    let client = WaniKaniClient::new(config.api_config()).unwrap();
    let store = CacheStore::for_config(&config).unwrap();

    // Act
    let (config, first) = synchronize(config, &client).await.unwrap();
    store.save(&config.kanji_list_cache).await.unwrap();
    let first_bytes = tokio::fs::read(store.path()).await.unwrap();

    let mut reloaded = config.clone();
    reloaded.kanji_list_cache = store.load().await.unwrap();
    let (config, second) = synchronize(reloaded, &client).await.unwrap();
    store.save(&config.kanji_list_cache).await.unwrap();
    let second_bytes = tokio::fs::read(store.path()).await.unwrap();

    // Assert
    assert_eq!(first.total_definitions, 2);
    assert!(second.is_unchanged());
    assert!(!second.assignments_modified);
    assert_eq!(first_bytes, second_bytes);
    assert_eq!(
        config.kanji_query().unwrap(),
        "deck:Kanji is:suspended (Kanji:一 or Kanji:口)"
    );
}

#[tokio::test]
async fn sync_new_kanji_hidden_by_watermark_fetched_unconditionally() {
    // Arrange
    let server = MockServer::start().await;
    let temp_dirs = setup_temp_dirs().await.unwrap();

    let mut config = test_config(&server, &temp_dirs.state_dir);
    let cache = &mut config.kanji_list_cache;
    cache.merge_definitions([(SubjectId::new(440), "一".to_string())]);
    cache.merge_list_watermarks(
        Some(ETag::from(r#"W/"list-1""#)),
        Some("2024-01-01T00:00:00Z".to_string()),
    );
    cache.merge_definition_watermarks(
        Some(ETag::from(r#"W/"defs-1""#)),
        Some("2024-01-01T00:00:00Z".to_string()),
    );

    Mock::given(method("GET"))
        .and(path("/v2/assignments"))
        .and(query_param("updated_after", "2024-01-01T00:00:00Z"))
        .and(header("If-None-Match", r#"W/"list-1""#))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("ETag", r#"W/"list-2""#)
                .set_body_json(assignment_page(&[450], "2024-02-01T00:00:00Z")),
        )
        .expect(1)
        .mount(&server)
        .await;
    // the subject itself is older than the definition watermark
    Mock::given(method("GET"))
        .and(path("/v2/subjects"))
        .and(query_param("ids", "440,450"))
        .and(query_param("updated_after", "2024-01-01T00:00:00Z"))
        .and(header("If-None-Match", r#"W/"defs-1""#))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("ETag", r#"W/"defs-2""#)
                .set_body_json(subject_page(&[], "2024-01-15T00:00:00Z")),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/subjects"))
        .and(query_param("ids", "450"))
        .and(lacks_query("updated_after"))
        .and(lacks_header("If-None-Match"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("ETag", r#"W/"unconditional""#)
                .set_body_json(subject_page(&[(450, "口")], "2023-06-01T00:00:00Z")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = WaniKaniClient::new(config.api_config()).unwrap();

    // Act
    let (config, report) = synchronize(config, &client).await.unwrap();

    // Assert
    let cache = &config.kanji_list_cache;
    assert_eq!(cache.kanji().collect::<Vec<_>>(), vec!["一", "口"]);
    assert_eq!(cache.last_list_etag, Some(ETag::from(r#"W/"list-2""#)));
    assert_eq!(cache.last_definition_etag, Some(ETag::from(r#"W/"defs-2""#)));
    assert_eq!(
        cache.last_definition_update.as_deref(),
        Some("2024-01-15T00:00:00Z")
    );
    assert_eq!(report.missing_ids, 1);
    assert_eq!(report.new_definitions, 1);
}

#[tokio::test]
async fn sync_failure_leaves_persisted_cache_untouched() {
    // Arrange
    let server = MockServer::start().await;
    let temp_dirs = setup_temp_dirs().await.unwrap();

    let mut config = test_config(&server, &temp_dirs.state_dir);
    config
        .kanji_list_cache
        .merge_definitions([(SubjectId::new(440), "一".to_string())]);
    let store = CacheStore::for_config(&config).unwrap();
    store.save(&config.kanji_list_cache).await.unwrap();
    let before = tokio::fs::read(store.path()).await.unwrap();

    Mock::given(method("GET"))
        .and(path("/v2/assignments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(assignment_page(
            &[450],
            "2024-02-01T00:00:00Z",
        )))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/subjects"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let client = WaniKaniClient::new(config.api_config()).unwrap();

    // Act
    let err = synchronize(config, &client).await.unwrap_err();

    // Assert
    assert!(matches!(err, Error::Remote(_)));
    let after = tokio::fs::read(store.path()).await.unwrap();
    assert_eq!(before, after);
}

#[tokio::test]
async fn sync_unauthorized_is_reported() {
    let server = MockServer::start().await;
    let temp_dirs = setup_temp_dirs().await.unwrap();

    Mock::given(method("GET"))
        .and(path("/v2/assignments"))
        .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
        .expect(1)
        .mount(&server)
        .await;

    let config = test_config(&server, &temp_dirs.state_dir);
    let client = WaniKaniClient::new(config.api_config()).unwrap();

    let err = synchronize(config, &client).await.unwrap_err();

    match err {
        Error::Remote(remote) => {
            assert_eq!(remote.status().map(|s| s.as_u16()), Some(401));
        }
        other => panic!("Expected remote error, got {other:?}"),
    }
}
