use serde::{Deserialize, Serialize};

use super::common::{null_as_default, Message, Observation};
use super::graph::FactResult;

/// Request body for `POST /search`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_ids: Option<Vec<String>>,
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_facts: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observation: Option<Observation>,
}

impl SearchQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            group_ids: None,
            query: query.into(),
            max_facts: None,
            observation: None,
        }
    }

    pub fn with_group_ids<I, S>(mut self, group_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.group_ids = Some(group_ids.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_max_facts(mut self, max_facts: u32) -> Self {
        self.max_facts = Some(max_facts);
        self
    }

    pub fn with_observation(mut self, observation: Observation) -> Self {
        self.observation = Some(observation);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SearchResults {
    #[serde(default, deserialize_with = "null_as_default")]
    pub facts: Vec<FactResult>,
}

/// Request body for `POST /get-memory`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetMemoryRequest {
    pub group_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_facts: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center_node_uuid: Option<String>,
    pub messages: Vec<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observation: Option<Observation>,
}

impl GetMemoryRequest {
    pub fn new(group_id: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            group_id: group_id.into(),
            max_facts: None,
            center_node_uuid: None,
            messages,
            observation: None,
        }
    }

    pub fn with_max_facts(mut self, max_facts: u32) -> Self {
        self.max_facts = Some(max_facts);
        self
    }

    pub fn with_center_node_uuid(mut self, uuid: impl Into<String>) -> Self {
        self.center_node_uuid = Some(uuid.into());
        self
    }

    pub fn with_observation(mut self, observation: Observation) -> Self {
        self.observation = Some(observation);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GetMemoryResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub facts: Vec<FactResult>,
}

/// Request body for `POST /messages`.
///
/// The server only queues the batch; entity and fact extraction happen later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddMessagesRequest {
    pub group_id: String,
    pub messages: Vec<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observation: Option<Observation>,
}

impl AddMessagesRequest {
    pub fn new(group_id: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            group_id: group_id.into(),
            messages,
            observation: None,
        }
    }

    pub fn with_observation(mut self, observation: Observation) -> Self {
        self.observation = Some(observation);
        self
    }
}

/// Request body for `POST /entity-node`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddEntityNodeRequest {
    pub uuid: String,
    pub group_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observation: Option<Observation>,
}

impl AddEntityNodeRequest {
    pub fn new(
        uuid: impl Into<String>,
        group_id: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            uuid: uuid.into(),
            group_id: group_id.into(),
            name: name.into(),
            summary: None,
            observation: None,
        }
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn with_observation(mut self, observation: Observation) -> Self {
        self.observation = Some(observation);
        self
    }
}
