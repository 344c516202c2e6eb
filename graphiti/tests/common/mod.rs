#![allow(dead_code)]

use std::time::Duration;

use graphiti::GraphitiClient;
use serde_json::{json, Value};
use wiremock::MockServer;

/// Client pointed at a mock server with a short timeout.
pub fn client_for(server: &MockServer) -> GraphitiClient {
    GraphitiClient::builder(server.uri())
        .timeout(Duration::from_secs(5))
        .build()
        .expect("Failed to build client")
}

pub fn edge_json(uuid: &str, fact: &str) -> Value {
    json!({
        "uuid": uuid,
        "name": "RUNS_ON",
        "fact": fact,
        "source_node_uuid": format!("{uuid}-src"),
        "target_node_uuid": format!("{uuid}-dst"),
        "valid_at": "2024-03-01T08:00:00Z",
        "created_at": "2024-03-01T08:05:00Z"
    })
}

pub fn node_json(uuid: &str, name: &str, labels: &[&str]) -> Value {
    json!({
        "uuid": uuid,
        "name": name,
        "labels": labels,
        "summary": format!("{name} summary"),
        "created_at": "2024-03-01T08:05:00Z"
    })
}

pub fn episode_json(uuid: &str, content: &str) -> Value {
    json!({
        "uuid": uuid,
        "content": content,
        "source": "message",
        "source_description": "pentest session",
        "created_at": "2024-03-01T08:05:00Z",
        "valid_at": "2024-03-01T08:00:00Z"
    })
}

pub fn community_json(uuid: &str, name: &str) -> Value {
    json!({
        "uuid": uuid,
        "name": name,
        "summary": format!("{name} community"),
        "created_at": "2024-03-01T08:05:00Z"
    })
}

pub fn time_window_json() -> Value {
    json!({"start": "2024-03-01T06:00:00Z", "end": "2024-03-01T10:00:00Z"})
}
