use serde_json::json;

use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use materna::config::Config;
use materna::error::GatewayError;
use materna::gateway::{AdvisorGateway, ChatTurnRequest, HttpGateway};

fn config_for(uri: &str) -> Config {
    let mut config = Config::default();
    config.backend.base_url = uri.to_string();
    config
}

fn gateway_for(uri: &str) -> HttpGateway {
    HttpGateway::new(&config_for(uri)).unwrap()
}

#[tokio::test]
async fn test_health_healthy() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "healthy"})))
        .expect(1)
        .mount(&server)
        .await;

    let health = gateway_for(&server.uri()).health().await.unwrap();
    assert!(health.healthy);
    assert!(health.detail.is_none());
}

#[tokio::test]
async fn test_health_unhealthy_reports_detail() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({
            "status": "degraded",
            "error": "vector index not loaded"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let health = gateway_for(&server.uri()).health().await.unwrap();
    assert!(!health.healthy);
    assert_eq!(health.detail.as_deref(), Some("vector index not loaded"));
}

#[tokio::test]
async fn test_health_unreachable_is_network_error() {
    // Nothing listens on port 1; the connection is refused.
    let gateway = gateway_for("http://127.0.0.1:1");
    let err = gateway.health().await.unwrap_err();
    assert!(matches!(err, GatewayError::Network(_)));
}

#[tokio::test]
async fn test_stats_returns_chunk_count() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "knowledge_base_stats": { "total_chunks": 1234 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let stats = gateway_for(&server.uri()).stats().await.unwrap();
    assert_eq!(stats.total_chunks, 1234);
}

#[tokio::test]
async fn test_stats_http_error_is_application_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/stats"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&server)
        .await;

    let err = gateway_for(&server.uri()).stats().await.unwrap_err();
    match err {
        GatewayError::Application { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "boom");
        }
        other => panic!("Expected application error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_chat_success_round_trip() {
    let server = MockServer::start().await;

    let expected_body = json!({
        "message": "What foods should I avoid?",
        "session_id": 3,
        "top_k": 3,
        "similarity_threshold": 0.1
    });

    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(body_json(&expected_body))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "response": "Avoid raw fish...",
            "processing_time_seconds": 1.2
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = ChatTurnRequest {
        message: "What foods should I avoid?".to_string(),
        session_id: Some(3),
        top_k: Some(3),
        similarity_threshold: Some(0.1),
    };

    let reply = gateway_for(&server.uri()).send_chat(&request).await.unwrap();
    assert_eq!(reply.response, "Avoid raw fish...");
    assert_eq!(reply.latency_ms(), 1200);
}

#[tokio::test]
async fn test_chat_failure_envelope_is_application_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "error",
            "response": "no relevant context found",
            "processing_time_seconds": 0.1
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = ChatTurnRequest {
        message: "hello".to_string(),
        session_id: Some(1),
        top_k: None,
        similarity_threshold: None,
    };

    let err = gateway_for(&server.uri()).send_chat(&request).await.unwrap_err();
    match err {
        GatewayError::Application { message, .. } => {
            assert_eq!(message, "no relevant context found");
        }
        other => panic!("Expected application error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_chat_http_500_is_application_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .expect(1)
        .mount(&server)
        .await;

    let request = ChatTurnRequest {
        message: "hello".to_string(),
        session_id: Some(1),
        top_k: None,
        similarity_threshold: None,
    };

    let err = gateway_for(&server.uri()).send_chat(&request).await.unwrap_err();
    assert!(matches!(err, GatewayError::Application { status: 500, .. }));
}

#[tokio::test]
async fn test_list_sessions_normalizes_both_namings() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/chats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sessions": [
                {
                    "id": 7,
                    "session_name": "Week 20 checkup",
                    "updated_at": "2024-01-01T00:00:00Z",
                    "message_count": 4
                },
                {
                    "session_id": 8,
                    "session_name": "Nutrition",
                    "last_message_at": "2024-01-02T09:30:00Z",
                    "message_count": 2
                }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let sessions = gateway_for(&server.uri()).list_sessions().await.unwrap();
    assert_eq!(sessions.len(), 2);

    assert_eq!(sessions[0].session_id, 7);
    assert_eq!(
        sessions[0].last_activity_at.unwrap().to_rfc3339(),
        "2024-01-01T00:00:00+00:00"
    );
    assert_eq!(sessions[1].session_id, 8);
    assert_eq!(sessions[1].session_name.as_deref(), Some("Nutrition"));
}

#[tokio::test]
async fn test_list_sessions_drops_unidentifiable_entries() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/chats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sessions": [
                { "session_name": "orphan", "message_count": 9 },
                { "id": 2, "message_count": 1 }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let sessions = gateway_for(&server.uri()).list_sessions().await.unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].session_id, 2);
}

#[tokio::test]
async fn test_create_session_with_default_payload() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chats"))
        .and(body_json(&json!({})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "session_id": 42,
            "session_name": "Chat 42"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let session = gateway_for(&server.uri()).create_session(None).await.unwrap();
    assert_eq!(session.session_id, 42);
    assert_eq!(session.session_name.as_deref(), Some("Chat 42"));
    assert_eq!(session.message_count, 0);
    // Brand new: no recency timestamp until the first round-trip.
    assert!(session.last_activity_at.is_none());
    assert!(session.created_at.is_some());
}

#[tokio::test]
async fn test_create_session_sends_requested_name() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chats"))
        .and(body_json(&json!({"session_name": "Third trimester"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "session_id": 43,
            "session_name": "Third trimester"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let session = gateway_for(&server.uri())
        .create_session(Some("Third trimester"))
        .await
        .unwrap();
    assert_eq!(session.session_id, 43);
}

#[tokio::test]
async fn test_create_session_failure_is_application_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chats"))
        .respond_with(ResponseTemplate::new(500).set_body_string("db unavailable"))
        .expect(1)
        .mount(&server)
        .await;

    let err = gateway_for(&server.uri()).create_session(None).await.unwrap_err();
    assert!(matches!(err, GatewayError::Application { status: 500, .. }));
}

#[tokio::test]
async fn test_fetch_history_preserves_backend_order() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/chats/4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "messages": [
                { "session_id": 4, "message": "first", "response": "answer one", "response_time_ms": 900 },
                { "session_id": 4, "message": "second", "response": null, "response_time_ms": null }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let messages = gateway_for(&server.uri()).fetch_history(4).await.unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].message, "first");
    assert_eq!(messages[0].response.as_deref(), Some("answer one"));
    assert_eq!(messages[0].response_time_ms, Some(900));
    assert_eq!(messages[1].message, "second");
    assert!(messages[1].response.is_none());
}

#[tokio::test]
async fn test_delete_session_success() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/chats/9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "success"})))
        .expect(1)
        .mount(&server)
        .await;

    assert!(gateway_for(&server.uri()).delete_session(9).await.is_ok());
}

#[tokio::test]
async fn test_delete_session_failure_status_is_application_error() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/chats/9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "not_found"})))
        .expect(1)
        .mount(&server)
        .await;

    let err = gateway_for(&server.uri()).delete_session(9).await.unwrap_err();
    match err {
        GatewayError::Application { message, .. } => {
            assert!(message.contains("not_found"));
        }
        other => panic!("Expected application error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_slow_backend_times_out_as_network_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/stats"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"knowledge_base_stats": {"total_chunks": 1}}))
                .set_delay(std::time::Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let mut config = config_for(&server.uri());
    config.backend.timeout_seconds = 1;
    let gateway = HttpGateway::new(&config).unwrap();

    let err = gateway.stats().await.unwrap_err();
    match err {
        GatewayError::Network(message) => assert!(message.contains("timed out")),
        other => panic!("Expected network error, got {:?}", other),
    }
}
