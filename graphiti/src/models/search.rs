//! Request and response types for the advanced search endpoints.
//!
//! Responses carry results and their scores as parallel arrays, exactly as the
//! server sends them. A score array may be shorter than its result array when
//! the server omits scoring, so the `scored_*` accessors pair them up to the
//! shorter of the two lengths.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::{null_as_default, TimeWindow};
use super::graph::{CommunityResult, EdgeResult, EpisodeResult, NodeResult};

/// A result paired with the score at the same index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scored<'a, T> {
    pub item: &'a T,
    pub score: f64,
}

/// Zip a result slice with its parallel score slice.
pub fn pair_scores<'a, T>(
    items: &'a [T],
    scores: &'a [f64],
) -> impl Iterator<Item = Scored<'a, T>> + 'a {
    items
        .iter()
        .zip(scores.iter().copied())
        .map(|(item, score)| Scored { item, score })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiversityLevel {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for DiversityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

impl std::str::FromStr for DiversityLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(format!("Unknown diversity level: {s}")),
        }
    }
}

/// How far back a recent-context search looks, e.g. `"1h"`, `"24h"`, `"7d"`.
///
/// The server owns the set of accepted tokens, so any string is passed through.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecencyWindow(String);

impl RecencyWindow {
    pub fn hours(hours: u32) -> Self {
        Self(format!("{hours}h"))
    }

    pub fn days(days: u32) -> Self {
        Self(format!("{days}d"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RecencyWindow {
    fn from(token: &str) -> Self {
        Self(token.to_string())
    }
}

impl From<String> for RecencyWindow {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl std::fmt::Display for RecencyWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for RecencyWindow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        if token.is_empty() {
            return Err("Recency window cannot be empty".to_string());
        }
        Ok(Self(token.to_string()))
    }
}

// -----------------------------------------------------------------------------
// Temporal window
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemporalSearchRequest {
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    pub time_start: DateTime<Utc>,
    pub time_end: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u32>,
}

impl TemporalSearchRequest {
    pub fn new(query: impl Into<String>, time_start: DateTime<Utc>, time_end: DateTime<Utc>) -> Self {
        Self {
            query: query.into(),
            group_id: None,
            time_start,
            time_end,
            max_results: None,
        }
    }

    pub fn with_group_id(mut self, group_id: impl Into<String>) -> Self {
        self.group_id = Some(group_id.into());
        self
    }

    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = Some(max_results);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TemporalSearchResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub edges: Vec<EdgeResult>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub edge_scores: Vec<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub nodes: Vec<NodeResult>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub node_scores: Vec<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub episodes: Vec<EpisodeResult>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub episode_scores: Vec<f64>,
    /// Window the server actually searched; `None` when it did not report one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_window: Option<TimeWindow>,
}

impl TemporalSearchResponse {
    pub fn scored_edges(&self) -> impl Iterator<Item = Scored<'_, EdgeResult>> {
        pair_scores(&self.edges, &self.edge_scores)
    }

    pub fn scored_nodes(&self) -> impl Iterator<Item = Scored<'_, NodeResult>> {
        pair_scores(&self.nodes, &self.node_scores)
    }

    pub fn scored_episodes(&self) -> impl Iterator<Item = Scored<'_, EpisodeResult>> {
        pair_scores(&self.episodes, &self.episode_scores)
    }
}

// -----------------------------------------------------------------------------
// Entity relationships (graph traversal around a center node)
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRelationshipSearchRequest {
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    pub center_node_uuid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_labels: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge_types: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u32>,
}

impl EntityRelationshipSearchRequest {
    pub fn new(query: impl Into<String>, center_node_uuid: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            group_id: None,
            center_node_uuid: center_node_uuid.into(),
            max_depth: None,
            node_labels: None,
            edge_types: None,
            max_results: None,
        }
    }

    pub fn with_group_id(mut self, group_id: impl Into<String>) -> Self {
        self.group_id = Some(group_id.into());
        self
    }

    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    pub fn with_node_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.node_labels = Some(labels.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_edge_types<I, S>(mut self, edge_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.edge_types = Some(edge_types.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = Some(max_results);
        self
    }
}

/// Results around a center node. The "scores" here are graph distances.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EntityRelationshipSearchResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub edges: Vec<EdgeResult>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub edge_distances: Vec<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub nodes: Vec<NodeResult>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub node_distances: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center_node: Option<NodeResult>,
}

impl EntityRelationshipSearchResponse {
    pub fn edges_with_distances(&self) -> impl Iterator<Item = Scored<'_, EdgeResult>> {
        pair_scores(&self.edges, &self.edge_distances)
    }

    pub fn nodes_with_distances(&self) -> impl Iterator<Item = Scored<'_, NodeResult>> {
        pair_scores(&self.nodes, &self.node_distances)
    }
}

// -----------------------------------------------------------------------------
// Diverse results (MMR reranking)
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiverseSearchRequest {
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diversity_level: Option<DiversityLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u32>,
}

impl DiverseSearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            group_id: None,
            diversity_level: None,
            max_results: None,
        }
    }

    pub fn with_group_id(mut self, group_id: impl Into<String>) -> Self {
        self.group_id = Some(group_id.into());
        self
    }

    pub fn with_diversity_level(mut self, level: DiversityLevel) -> Self {
        self.diversity_level = Some(level);
        self
    }

    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = Some(max_results);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DiverseSearchResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub edges: Vec<EdgeResult>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub edge_mmr_scores: Vec<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub nodes: Vec<NodeResult>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub node_mmr_scores: Vec<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub episodes: Vec<EpisodeResult>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub episode_scores: Vec<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub communities: Vec<CommunityResult>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub community_mmr_scores: Vec<f64>,
}

impl DiverseSearchResponse {
    pub fn scored_edges(&self) -> impl Iterator<Item = Scored<'_, EdgeResult>> {
        pair_scores(&self.edges, &self.edge_mmr_scores)
    }

    pub fn scored_nodes(&self) -> impl Iterator<Item = Scored<'_, NodeResult>> {
        pair_scores(&self.nodes, &self.node_mmr_scores)
    }

    pub fn scored_episodes(&self) -> impl Iterator<Item = Scored<'_, EpisodeResult>> {
        pair_scores(&self.episodes, &self.episode_scores)
    }

    pub fn scored_communities(&self) -> impl Iterator<Item = Scored<'_, CommunityResult>> {
        pair_scores(&self.communities, &self.community_mmr_scores)
    }
}

// -----------------------------------------------------------------------------
// Episode context
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeContextSearchRequest {
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_types: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_tool_calls: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u32>,
}

impl EpisodeContextSearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            group_id: None,
            agent_types: None,
            include_tool_calls: None,
            max_results: None,
        }
    }

    pub fn with_group_id(mut self, group_id: impl Into<String>) -> Self {
        self.group_id = Some(group_id.into());
        self
    }

    pub fn with_agent_types<I, S>(mut self, agent_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.agent_types = Some(agent_types.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_include_tool_calls(mut self, include: bool) -> Self {
        self.include_tool_calls = Some(include);
        self
    }

    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = Some(max_results);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EpisodeContextSearchResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub episodes: Vec<EpisodeResult>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub reranker_scores: Vec<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub mentioned_nodes: Vec<NodeResult>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub mentioned_node_scores: Vec<f64>,
}

impl EpisodeContextSearchResponse {
    pub fn scored_episodes(&self) -> impl Iterator<Item = Scored<'_, EpisodeResult>> {
        pair_scores(&self.episodes, &self.reranker_scores)
    }

    pub fn scored_mentioned_nodes(&self) -> impl Iterator<Item = Scored<'_, NodeResult>> {
        pair_scores(&self.mentioned_nodes, &self.mentioned_node_scores)
    }
}

// -----------------------------------------------------------------------------
// Successful tools
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuccessfulToolsSearchRequest {
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_names: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_mentions: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u32>,
}

impl SuccessfulToolsSearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            group_id: None,
            tool_names: None,
            min_mentions: None,
            max_results: None,
        }
    }

    pub fn with_group_id(mut self, group_id: impl Into<String>) -> Self {
        self.group_id = Some(group_id.into());
        self
    }

    pub fn with_tool_names<I, S>(mut self, tool_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tool_names = Some(tool_names.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_min_mentions(mut self, min_mentions: u32) -> Self {
        self.min_mentions = Some(min_mentions);
        self
    }

    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = Some(max_results);
        self
    }
}

/// Edges and nodes are ranked by how often they were mentioned.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SuccessfulToolsSearchResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub edges: Vec<EdgeResult>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub edge_mention_counts: Vec<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub nodes: Vec<NodeResult>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub node_mention_counts: Vec<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub episodes: Vec<EpisodeResult>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub episode_scores: Vec<f64>,
}

impl SuccessfulToolsSearchResponse {
    pub fn edges_with_mentions(&self) -> impl Iterator<Item = Scored<'_, EdgeResult>> {
        pair_scores(&self.edges, &self.edge_mention_counts)
    }

    pub fn nodes_with_mentions(&self) -> impl Iterator<Item = Scored<'_, NodeResult>> {
        pair_scores(&self.nodes, &self.node_mention_counts)
    }

    pub fn scored_episodes(&self) -> impl Iterator<Item = Scored<'_, EpisodeResult>> {
        pair_scores(&self.episodes, &self.episode_scores)
    }
}

// -----------------------------------------------------------------------------
// Recent context
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentContextSearchRequest {
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recency_window: Option<RecencyWindow>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u32>,
}

impl RecentContextSearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            group_id: None,
            recency_window: None,
            max_results: None,
        }
    }

    pub fn with_group_id(mut self, group_id: impl Into<String>) -> Self {
        self.group_id = Some(group_id.into());
        self
    }

    pub fn with_recency_window(mut self, window: impl Into<RecencyWindow>) -> Self {
        self.recency_window = Some(window.into());
        self
    }

    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = Some(max_results);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RecentContextSearchResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub edges: Vec<EdgeResult>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub edge_scores: Vec<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub nodes: Vec<NodeResult>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub node_scores: Vec<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub episodes: Vec<EpisodeResult>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub episode_scores: Vec<f64>,
    /// Window the server actually searched; `None` when it did not report one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_window: Option<TimeWindow>,
}

impl RecentContextSearchResponse {
    pub fn scored_edges(&self) -> impl Iterator<Item = Scored<'_, EdgeResult>> {
        pair_scores(&self.edges, &self.edge_scores)
    }

    pub fn scored_nodes(&self) -> impl Iterator<Item = Scored<'_, NodeResult>> {
        pair_scores(&self.nodes, &self.node_scores)
    }

    pub fn scored_episodes(&self) -> impl Iterator<Item = Scored<'_, EpisodeResult>> {
        pair_scores(&self.episodes, &self.episode_scores)
    }
}

// -----------------------------------------------------------------------------
// Entity by label
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityByLabelSearchRequest {
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    pub node_labels: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge_types: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u32>,
}

impl EntityByLabelSearchRequest {
    pub fn new<I, S>(query: impl Into<String>, node_labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            query: query.into(),
            group_id: None,
            node_labels: node_labels.into_iter().map(Into::into).collect(),
            edge_types: None,
            max_results: None,
        }
    }

    pub fn with_group_id(mut self, group_id: impl Into<String>) -> Self {
        self.group_id = Some(group_id.into());
        self
    }

    pub fn with_edge_types<I, S>(mut self, edge_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.edge_types = Some(edge_types.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = Some(max_results);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EntityByLabelSearchResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub nodes: Vec<NodeResult>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub node_scores: Vec<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub edges: Vec<EdgeResult>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub edge_scores: Vec<f64>,
}

impl EntityByLabelSearchResponse {
    pub fn scored_nodes(&self) -> impl Iterator<Item = Scored<'_, NodeResult>> {
        pair_scores(&self.nodes, &self.node_scores)
    }

    pub fn scored_edges(&self) -> impl Iterator<Item = Scored<'_, EdgeResult>> {
        pair_scores(&self.edges, &self.edge_scores)
    }
}
