use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::{null_as_default, Metadata};

// Required timestamps the server leaves out decode as the Unix epoch.

/// A fact retrieved from the graph.
///
/// `valid_at`/`invalid_at` bound the period the fact held in the world; a fact
/// can be invalidated without being deleted. `expired_at` records when the
/// graph itself superseded it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactResult {
    pub uuid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub fact: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invalid_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expired_at: Option<DateTime<Utc>>,
}

/// An edge returned by the advanced search endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeResult {
    pub uuid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub fact: String,
    #[serde(default)]
    pub source_node_uuid: String,
    #[serde(default)]
    pub target_node_uuid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invalid_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expired_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeResult {
    pub uuid: String,
    #[serde(default)]
    pub name: String,
    /// Open set of type tags, e.g. `"SERVICE"`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub labels: Vec<String>,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
}

impl NodeResult {
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeResult {
    pub uuid: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub source_description: String,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub valid_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommunityResult {
    pub uuid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
}

/// An entity node as stored by `POST /entity-node`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityNode {
    pub uuid: String,
    #[serde(default)]
    pub group_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Metadata::is_empty")]
    pub metadata: Metadata,
}

/// A stored episode, the provenance record facts are extracted from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    pub uuid: String,
    #[serde(default)]
    pub group_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub source: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub source_description: String,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub valid_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Metadata::is_empty")]
    pub metadata: Metadata,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_fact_result_keeps_validity_interval() {
        let fact: FactResult = serde_json::from_value(json!({
            "uuid": "f-1",
            "name": "LIKES",
            "fact": "Alice likes hiking",
            "valid_at": "2024-01-01T00:00:00Z",
            "invalid_at": "2024-06-01T00:00:00+00:00",
            "created_at": "2024-01-02T00:00:00Z"
        }))
        .unwrap();

        assert_eq!(fact.valid_at, Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()));
        assert_eq!(fact.invalid_at, Some(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()));
        assert!(fact.expired_at.is_none());
        assert!(fact.valid_at <= fact.invalid_at);
    }

    #[test]
    fn test_node_result_null_labels() {
        let node: NodeResult = serde_json::from_value(json!({
            "uuid": "n-1",
            "name": "nginx",
            "labels": null,
            "summary": "web server",
            "created_at": "2024-01-02T00:00:00Z"
        }))
        .unwrap();

        assert!(node.labels.is_empty());
        assert!(!node.has_label("SERVICE"));
    }

    #[test]
    fn test_entity_node_ignores_unknown_fields() {
        let node: EntityNode = serde_json::from_value(json!({
            "uuid": "n-2",
            "group_id": "g1",
            "name": "User Interests",
            "created_at": "2024-01-02T00:00:00Z",
            "labels": ["Entity"],
            "name_embedding": [0.1, 0.2],
            "attributes": {"k": "v"}
        }))
        .unwrap();

        assert_eq!(node.labels, vec!["Entity".to_string()]);
        assert!(node.summary.is_none());
        assert!(node.metadata.is_empty());
    }

    #[test]
    fn test_episode_metadata_round_trip() {
        let value = json!({
            "uuid": "e-1",
            "group_id": "g1",
            "name": "Message 1",
            "content": "hello",
            "source": "message",
            "created_at": "2024-01-02T00:00:00Z",
            "valid_at": "2024-01-01T00:00:00Z",
            "metadata": {"agent": "pentester"}
        });
        let episode: Episode = serde_json::from_value(value.clone()).unwrap();

        assert_eq!(episode.metadata.get("agent"), Some(&json!("pentester")));
        assert_eq!(serde_json::to_value(&episode).unwrap(), value);
    }

    #[test]
    fn test_missing_timestamps_decode_as_epoch() {
        let episode: EpisodeResult = serde_json::from_value(json!({"uuid": "ep-1"})).unwrap();
        assert_eq!(episode.created_at, Utc.timestamp_opt(0, 0).unwrap());
        assert_eq!(episode.valid_at, Utc.timestamp_opt(0, 0).unwrap());

        let node: NodeResult = serde_json::from_value(json!({"uuid": "n-1", "name": "nmap"})).unwrap();
        assert_eq!(node.created_at, Utc.timestamp_opt(0, 0).unwrap());
    }
}
