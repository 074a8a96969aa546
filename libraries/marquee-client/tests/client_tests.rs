//! HTTP contract tests for the Marquee client.
//!
//! These tests use mock servers to verify request shapes and response
//! handling without requiring a real backend.

use marquee_client::{CatalogApi, CatalogClient, ClientConfig, ClientError};
use marquee_core::types::{CreateEntity, CreatePart, DuplicateQuery, EntityKind};
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> CatalogClient {
    CatalogClient::new(ClientConfig::new(server.uri())).unwrap()
}

fn inception() -> CreateEntity {
    CreateEntity {
        name: "Inception".to_string(),
        category_id: 1,
        subcategory_id: None,
        release_year: Some(2010),
        poster_url: None,
        genre_ids: vec![3, 8],
        is_watched: false,
    }
}

// =============================================================================
// Client Creation Tests
// =============================================================================

mod client_creation {
    use super::*;

    #[test]
    fn test_valid_urls() {
        assert!(CatalogClient::new(ClientConfig::new("https://example.com")).is_ok());
        assert!(CatalogClient::new(ClientConfig::new("http://localhost:8080/api")).is_ok());
    }

    #[test]
    fn test_empty_url_rejected() {
        match CatalogClient::new(ClientConfig::new("")) {
            Err(ClientError::InvalidUrl(msg)) => assert!(msg.contains("empty")),
            Err(e) => panic!("Expected InvalidUrl error, got: {:?}", e),
            Ok(_) => panic!("Expected InvalidUrl error"),
        }
    }

    #[test]
    fn test_url_without_scheme_rejected() {
        match CatalogClient::new(ClientConfig::new("example.com")) {
            Err(ClientError::InvalidUrl(msg)) => {
                assert!(msg.contains("http://") || msg.contains("https://"));
            }
            Err(e) => panic!("Expected InvalidUrl error, got: {:?}", e),
            Ok(_) => panic!("Expected InvalidUrl error"),
        }
    }

    #[test]
    fn test_trailing_slashes_removed() {
        let client = CatalogClient::new(ClientConfig::new("https://example.com///")).unwrap();
        assert_eq!(client.url(), "https://example.com");
    }

    #[test]
    fn test_token_from_config() {
        let client =
            CatalogClient::new(ClientConfig::with_token("https://example.com", "abc")).unwrap();
        assert!(client.is_authenticated());
    }
}

// =============================================================================
// Duplicate Check Tests
// =============================================================================

mod duplicate_check {
    use super::*;

    #[tokio::test]
    async fn test_name_only_query() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/movies/duplicate-check"))
            .and(query_param("name", "Inception"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "duplicate": true })),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let duplicate = client
            .check_duplicate(EntityKind::Movie, &DuplicateQuery::name_only("Inception"))
            .await
            .unwrap();
        assert!(duplicate);

        let requests = mock_server.received_requests().await.unwrap();
        let keys: Vec<String> = requests[0]
            .url
            .query_pairs()
            .map(|(k, _)| k.into_owned())
            .collect();
        assert_eq!(keys, vec!["name".to_string()]);
    }

    #[tokio::test]
    async fn test_composite_query() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/series/duplicate-check"))
            .and(query_param("name", "Dark Matter"))
            .and(query_param("category_id", "2"))
            .and(query_param("release_year", "2015"))
            .and(query_param("subcategory_id", "9"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "duplicate": false })),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let query = DuplicateQuery::composite("Dark Matter", 2, 2015, Some(9));
        let duplicate = client
            .check_duplicate(EntityKind::Series, &query)
            .await
            .unwrap();
        assert!(!duplicate);
    }

    #[tokio::test]
    async fn test_invalid_json_is_parse_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/movies/duplicate-check"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not valid json"))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let result = client
            .check_duplicate(EntityKind::Movie, &DuplicateQuery::name_only("x"))
            .await;

        match result {
            Err(ClientError::ParseError(_)) => {}
            other => panic!("Expected ParseError, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unauthorized_maps_to_auth_required() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/movies/duplicate-check"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let result = client
            .check_duplicate(EntityKind::Movie, &DuplicateQuery::name_only("x"))
            .await;

        assert!(matches!(result, Err(ClientError::AuthRequired)));
    }

    #[tokio::test]
    async fn test_unreachable_server() {
        let client = CatalogClient::new(ClientConfig::new("http://127.0.0.1:9")).unwrap();
        let result = client
            .check_duplicate(EntityKind::Movie, &DuplicateQuery::name_only("x"))
            .await;

        match result {
            Err(ClientError::ServerUnreachable(_)) | Err(ClientError::Request(_)) => {}
            other => panic!("Expected ServerUnreachable or Request error, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_slow_server_times_out() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/movies/duplicate-check"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "duplicate": false }))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&mock_server)
            .await;

        let config = ClientConfig::new(mock_server.uri()).timeout(Duration::from_millis(200));
        let client = CatalogClient::new(config).unwrap();
        let result = client
            .check_duplicate(EntityKind::Movie, &DuplicateQuery::name_only("x"))
            .await;

        assert!(matches!(result, Err(ClientError::ServerUnreachable(_))));
    }
}

// =============================================================================
// Suggest Tests
// =============================================================================

mod suggest {
    use super::*;

    #[tokio::test]
    async fn test_suggest_sends_query_and_limit() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/movies/suggest"))
            .and(query_param("q", "the mat"))
            .and(query_param("limit", "8"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                "The Matrix",
                "The Matrix Reloaded"
            ])))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let titles = client
            .suggest(EntityKind::Movie, "the mat", 8)
            .await
            .unwrap();
        assert_eq!(titles, vec!["The Matrix", "The Matrix Reloaded"]);
    }

    #[tokio::test]
    async fn test_suggest_server_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/series/suggest"))
            .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        match client.suggest(EntityKind::Series, "da", 8).await {
            Err(ClientError::ServerError { status, message }) => {
                assert_eq!(status, 500);
                assert!(message.contains("Internal Server Error"));
            }
            other => panic!("Expected ServerError, got: {:?}", other),
        }
    }
}

// =============================================================================
// Create Tests
// =============================================================================

mod create {
    use super::*;

    #[tokio::test]
    async fn test_create_entity_posts_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/movies"))
            .and(body_json(serde_json::json!({
                "name": "Inception",
                "category_id": 1,
                "release_year": 2010,
                "genre_ids": [3, 8],
                "is_watched": false
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "id": 41,
                "name": "Inception"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let created = client
            .create_entity(EntityKind::Movie, &inception())
            .await
            .unwrap();
        assert_eq!(created.id, 41);
    }

    #[tokio::test]
    async fn test_create_entity_error_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/movies"))
            .respond_with(ResponseTemplate::new(409).set_body_json(serde_json::json!({
                "error": "Movie already exists"
            })))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let err = client
            .create_entity(EntityKind::Movie, &inception())
            .await
            .unwrap_err();

        assert_eq!(err.api_message(), Some("Movie already exists"));
        match err {
            ClientError::ApiError { status, .. } => assert_eq!(status, 409),
            other => panic!("Expected ApiError, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_create_part_and_season_paths() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/movies/parts"))
            .and(body_json(serde_json::json!({
                "parent_id": 41,
                "number": 2,
                "year": 2012
            })))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("POST"))
            .and(path("/series/seasons"))
            .and(body_json(serde_json::json!({
                "parent_id": 7,
                "number": 3
            })))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        client
            .create_part(
                EntityKind::Movie,
                &CreatePart {
                    parent_id: 41,
                    number: 2,
                    year: Some(2012),
                },
            )
            .await
            .unwrap();
        client
            .create_part(
                EntityKind::Series,
                &CreatePart {
                    parent_id: 7,
                    number: 3,
                    year: None,
                },
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_next_number() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/series/next-number"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "next_number": 58 })),
            )
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        assert_eq!(client.next_number(EntityKind::Series).await.unwrap(), 58);
    }
}

// =============================================================================
// Authorization Tests
// =============================================================================

mod authorization {
    use super::*;

    #[tokio::test]
    async fn test_token_sent_per_client() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/movies/next-number"))
            .and(header("authorization", "Bearer scoped-token"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "next_number": 3 })),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/movies/next-number"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&mock_server)
            .await;

        let anonymous = client_for(&mock_server);
        let scoped = anonymous.with_access_token("scoped-token");

        assert_eq!(scoped.next_number(EntityKind::Movie).await.unwrap(), 3);
        assert!(matches!(
            anonymous.next_number(EntityKind::Movie).await,
            Err(ClientError::AuthRequired)
        ));
    }
}
