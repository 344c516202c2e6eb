//! Request execution and the core endpoints, exercised against a mock server.

mod common;

use std::time::{Duration, Instant};

use chrono::{TimeZone, Utc};
use graphiti::config::Config;
use graphiti::{
    AddEntityNodeRequest, AddMessagesRequest, GetMemoryRequest, GraphitiClient, GraphitiError,
    Message, Observation, SearchQuery,
};
use pretty_assertions::assert_eq;
use reqwest::StatusCode;
use serde_json::{json, Value};
use wiremock::matchers::{body_json, body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::client_for;

// =============================================================================
// Status handling and decoding
// =============================================================================

#[tokio::test]
async fn test_health_check_ok() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/healthcheck"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let health = client_for(&mock_server).health_check().await.unwrap();
    assert_eq!(health.status, "ok");
}

#[tokio::test]
async fn test_unknown_response_fields_are_ignored() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/healthcheck"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "version": "0.4.2",
            "neo4j": {"connected": true}
        })))
        .mount(&mock_server)
        .await;

    let health = client_for(&mock_server).health_check().await.unwrap();
    assert_eq!(health.status, "ok");
}

#[tokio::test]
async fn test_not_found_is_status_error_with_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/entity-edge/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string(r#"{"error":"not found"}"#))
        .mount(&mock_server)
        .await;

    let result = client_for(&mock_server).get_entity_edge("missing").await;

    match result {
        Err(GraphitiError::Status { status, body }) => {
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert!(body.contains("not found"));
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_server_error_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server)
        .search(&SearchQuery::new("anything"))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(StatusCode::SERVICE_UNAVAILABLE));
    assert_eq!(err.body(), Some("overloaded"));
}

#[tokio::test]
async fn test_malformed_json_is_deserialization_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/healthcheck"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server).health_check().await.unwrap_err();

    match err {
        GraphitiError::Deserialization { endpoint, body, .. } => {
            assert_eq!(endpoint, "GET /healthcheck");
            assert_eq!(body, "<html>oops</html>");
        }
        other => panic!("expected deserialization error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_shape_mismatch_is_deserialization_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"facts": "not a list"})))
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server)
        .search(&SearchQuery::new("q"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        GraphitiError::Deserialization { ref endpoint, .. } if endpoint == "POST /search"
    ));
}

// =============================================================================
// Transport failures
// =============================================================================

#[tokio::test]
async fn test_timeout_is_transport_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/healthcheck"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"status": "ok"}))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&mock_server)
        .await;

    let client = GraphitiClient::builder(mock_server.uri())
        .timeout(Duration::from_millis(50))
        .build()
        .unwrap();

    let started = Instant::now();
    let err = client.health_check().await.unwrap_err();

    assert!(started.elapsed() <= Duration::from_millis(500));
    assert!(matches!(err, GraphitiError::Transport(_)));
    assert!(err.is_timeout());
}

#[tokio::test]
async fn test_timeout_after_custom_client_applies_per_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/healthcheck"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"status": "ok"}))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&mock_server)
        .await;

    let custom = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .unwrap();
    let client = GraphitiClient::builder(mock_server.uri())
        .http_client(custom)
        .timeout(Duration::from_millis(50))
        .build()
        .unwrap();

    let started = Instant::now();
    let err = client.health_check().await.unwrap_err();

    assert!(started.elapsed() <= Duration::from_millis(500));
    assert!(err.is_timeout());
}

#[tokio::test]
async fn test_config_timeout_applies_to_requests() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/healthcheck"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"status": "ok"}))
                .set_delay(Duration::from_secs(10)),
        )
        .mount(&mock_server)
        .await;

    let config = Config {
        base_url: mock_server.uri(),
        timeout_secs: 1,
    };
    let client = config.client_builder().build().unwrap();

    let started = Instant::now();
    let err = client.health_check().await.unwrap_err();

    assert!(err.is_timeout());
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let client = GraphitiClient::new(format!("http://127.0.0.1:{port}")).unwrap();
    let err = client.health_check().await.unwrap_err();

    assert!(matches!(err, GraphitiError::Transport(_)));
    assert!(err.status().is_none());
}

#[tokio::test]
async fn test_malformed_base_url_is_request_construction_error() {
    let client = GraphitiClient::new("localhost without scheme").unwrap();
    let err = client.health_check().await.unwrap_err();

    assert!(matches!(err, GraphitiError::RequestConstruction(_)));
}

#[tokio::test]
async fn test_client_recovers_after_failed_calls() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/episodes/broken"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/episodes/garbled"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{"))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/healthcheck"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    for _ in 0..10 {
        assert!(client.get_episodes("broken", 1).await.is_err());
        assert!(client.get_episodes("garbled", 1).await.is_err());
    }

    assert_eq!(client.health_check().await.unwrap().status, "ok");
}

// =============================================================================
// Request encoding
// =============================================================================

#[tokio::test]
async fn test_search_omits_unset_optional_fields() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"query": "What does the user like to do?"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"facts": []})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let results = client_for(&mock_server)
        .search(&SearchQuery::new("What does the user like to do?"))
        .await
        .unwrap();
    assert!(results.facts.is_empty());
}

#[tokio::test]
async fn test_search_sends_filters_and_observation() {
    let mock_server = MockServer::start().await;
    let time = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();

    Mock::given(method("POST"))
        .and(path("/search"))
        .and(body_json(json!({
            "query": "hobbies",
            "group_ids": ["g1", "g2"],
            "max_facts": 5,
            "observation": {"id": "obs-1", "trace_id": "trace-1", "time": "2024-03-01T09:00:00Z"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "facts": [{
                "uuid": "f-1",
                "name": "ENJOYS",
                "fact": "Alice enjoys hiking",
                "created_at": "2024-03-01T08:00:00Z"
            }]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let query = SearchQuery::new("hobbies")
        .with_group_ids(["g1", "g2"])
        .with_max_facts(5)
        .with_observation(Observation::new("obs-1", "trace-1").with_time(time));

    let results = client_for(&mock_server).search(&query).await.unwrap();
    assert_eq!(results.facts.len(), 1);
    assert_eq!(results.facts[0].fact, "Alice enjoys hiking");
    assert!(results.facts[0].valid_at.is_none());
}

#[tokio::test]
async fn test_get_requests_carry_no_body_or_content_type() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/healthcheck"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .mount(&mock_server)
        .await;

    client_for(&mock_server).health_check().await.unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].body.is_empty());
    assert!(requests[0].headers.get("content-type").is_none());
}

#[tokio::test]
async fn test_identifier_slash_is_percent_encoded() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/entity-edge/a%2Fb"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "uuid": "a/b",
            "name": "RELATES_TO",
            "fact": "escaped",
            "created_at": "2024-03-01T08:00:00Z"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let edge = client_for(&mock_server).get_entity_edge("a/b").await.unwrap();
    assert_eq!(edge.uuid, "a/b");

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.path(), "/entity-edge/a%2Fb");
}

#[tokio::test]
async fn test_base_url_path_prefix_is_kept() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/graphiti/healthcheck"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = GraphitiClient::new(format!("{}/graphiti/", mock_server.uri())).unwrap();
    assert_eq!(client.health_check().await.unwrap().status, "ok");
}

// =============================================================================
// Endpoints
// =============================================================================

#[tokio::test]
async fn test_get_entity_edge_preserves_validity_interval() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/entity-edge/f-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "uuid": "f-1",
            "name": "WORKS_AT",
            "fact": "Bob worked at Acme",
            "valid_at": "2020-01-01T00:00:00Z",
            "invalid_at": "2023-06-30T00:00:00Z",
            "created_at": "2024-01-01T00:00:00Z",
            "expired_at": "2024-02-01T00:00:00Z"
        })))
        .mount(&mock_server)
        .await;

    let fact = client_for(&mock_server).get_entity_edge("f-1").await.unwrap();

    assert_eq!(fact.valid_at, Some(Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap()));
    assert_eq!(fact.invalid_at, Some(Utc.with_ymd_and_hms(2023, 6, 30, 0, 0, 0).unwrap()));
    assert_eq!(fact.expired_at, Some(Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap()));
    assert!(fact.valid_at <= fact.invalid_at);
}

#[tokio::test]
async fn test_get_episodes_sends_last_n() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/episodes/g1"))
        .and(query_param("last_n", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "uuid": "e-1",
                "group_id": "g1",
                "name": "Message 1",
                "content": "I love hiking",
                "source": "message",
                "created_at": "2024-03-01T08:05:00Z",
                "valid_at": "2024-03-01T08:00:00Z"
            }
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let episodes = client_for(&mock_server).get_episodes("g1", 5).await.unwrap();
    assert_eq!(episodes.len(), 1);
    assert_eq!(episodes[0].group_id, "g1");
    assert!(episodes[0].metadata.is_empty());
}

#[tokio::test]
async fn test_get_memory() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/get-memory"))
        .and(body_partial_json(json!({
            "group_id": "g1",
            "max_facts": 10,
            "center_node_uuid": "n-1"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "facts": [{
                "uuid": "f-1",
                "name": "OWNS",
                "fact": "Alice owns a Canon EOS R5",
                "created_at": "2024-03-01T08:00:00Z"
            }]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let request = GetMemoryRequest::new(
        "g1",
        vec![Message::new("User", "What equipment does the user have?")],
    )
    .with_max_facts(10)
    .with_center_node_uuid("n-1");

    let response = client_for(&mock_server).get_memory(&request).await.unwrap();
    assert_eq!(response.facts[0].fact, "Alice owns a Canon EOS R5");
}

#[tokio::test]
async fn test_add_messages_returns_acknowledgement() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/messages"))
        .and(body_partial_json(json!({"group_id": "g1"})))
        .respond_with(
            ResponseTemplate::new(202)
                .set_body_json(json!({"message": "queued", "success": true})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let ts = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
    let request = AddMessagesRequest::new(
        "g1",
        vec![
            Message::new("Alice", "I love hiking").with_timestamp(ts),
            Message::new("Assistant", "Do you camp as well?").with_timestamp(ts),
        ],
    );

    let result = client_for(&mock_server).add_messages(&request).await.unwrap();
    assert!(result.success);
    assert_eq!(result.message, "queued");

    let requests = mock_server.received_requests().await.unwrap();
    let sent: Value = requests[0].body_json().unwrap();
    assert_eq!(
        sent,
        json!({
            "group_id": "g1",
            "messages": [
                {"content": "I love hiking", "author": "Alice", "timestamp": "2024-03-01T08:00:00Z"},
                {"content": "Do you camp as well?", "author": "Assistant", "timestamp": "2024-03-01T08:00:00Z"}
            ]
        })
    );
}

#[tokio::test]
async fn test_add_entity_node() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/entity-node"))
        .and(body_json(json!({
            "uuid": "n-1",
            "group_id": "g1",
            "name": "User Interests",
            "summary": "hiking and photography"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "uuid": "n-1",
            "group_id": "g1",
            "name": "User Interests",
            "summary": "hiking and photography",
            "created_at": "2024-03-01T08:00:00Z",
            "labels": ["Entity"]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let request = AddEntityNodeRequest::new("n-1", "g1", "User Interests")
        .with_summary("hiking and photography");
    let node = client_for(&mock_server).add_entity_node(&request).await.unwrap();

    assert_eq!(node.uuid, "n-1");
    assert_eq!(node.summary.as_deref(), Some("hiking and photography"));
    assert_eq!(node.labels, vec!["Entity".to_string()]);
}

#[tokio::test]
async fn test_delete_endpoints() {
    let mock_server = MockServer::start().await;
    let ack = json!({"message": "deleted", "success": true});

    Mock::given(method("DELETE"))
        .and(path("/entity-edge/f-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ack.clone()))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/group/team%20a%2Fb"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ack.clone()))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/episode/e-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ack.clone()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    assert!(client.delete_entity_edge("f-1").await.unwrap().success);
    assert!(client.delete_group("team a/b").await.unwrap().success);
    assert!(client.delete_episode("e-1").await.unwrap().success);
}

#[tokio::test]
async fn test_clear_posts_without_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/clear"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"message": "Graph cleared", "success": true})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = client_for(&mock_server).clear().await.unwrap();
    assert_eq!(result.message, "Graph cleared");

    let requests = mock_server.received_requests().await.unwrap();
    assert!(requests[0].body.is_empty());
    assert!(requests[0].headers.get("content-type").is_none());
}

// =============================================================================
// Concurrency
// =============================================================================

#[tokio::test]
async fn test_one_client_serves_concurrent_calls() {
    let mock_server = MockServer::start().await;

    for group in ["g0", "g1", "g2", "g3", "g4", "g5", "g6", "g7"] {
        Mock::given(method("GET"))
            .and(path(format!("/episodes/{group}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {
                    "uuid": format!("{group}-e"),
                    "group_id": group,
                    "name": "episode",
                    "content": "",
                    "source": "message",
                    "created_at": "2024-03-01T08:05:00Z",
                    "valid_at": "2024-03-01T08:00:00Z"
                }
            ])))
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let client = client_for(&mock_server);
    let groups: Vec<String> = (0..8).map(|i| format!("g{i}")).collect();

    let calls = groups.iter().map(|group| client.get_episodes(group, 1));
    let results = futures::future::join_all(calls).await;

    for (group, result) in groups.iter().zip(results) {
        let episodes = result.unwrap();
        assert_eq!(&episodes[0].group_id, group);
    }
}
