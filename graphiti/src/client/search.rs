use super::GraphitiClient;
use crate::error::Result;
use crate::models::{
    DiverseSearchRequest, DiverseSearchResponse, EntityByLabelSearchRequest,
    EntityByLabelSearchResponse, EntityRelationshipSearchRequest,
    EntityRelationshipSearchResponse, EpisodeContextSearchRequest,
    EpisodeContextSearchResponse, RecentContextSearchRequest, RecentContextSearchResponse,
    SuccessfulToolsSearchRequest, SuccessfulToolsSearchResponse, TemporalSearchRequest,
    TemporalSearchResponse,
};

impl GraphitiClient {
    /// Edges, nodes and episodes that fall inside `[time_start, time_end]`.
    pub async fn temporal_window_search(
        &self,
        request: &TemporalSearchRequest,
    ) -> Result<TemporalSearchResponse> {
        self.post(&["search", "temporal-window"], request).await
    }

    /// Graph traversal from a center node, up to `max_depth` hops.
    pub async fn entity_relationships_search(
        &self,
        request: &EntityRelationshipSearchRequest,
    ) -> Result<EntityRelationshipSearchResponse> {
        self.post(&["search", "entity-relationships"], request)
            .await
    }

    /// Results reranked with maximal marginal relevance.
    pub async fn diverse_results_search(
        &self,
        request: &DiverseSearchRequest,
    ) -> Result<DiverseSearchResponse> {
        self.post(&["search", "diverse"], request).await
    }

    pub async fn episode_context_search(
        &self,
        request: &EpisodeContextSearchRequest,
    ) -> Result<EpisodeContextSearchResponse> {
        self.post(&["search", "episode-context"], request).await
    }

    pub async fn successful_tools_search(
        &self,
        request: &SuccessfulToolsSearchRequest,
    ) -> Result<SuccessfulToolsSearchResponse> {
        self.post(&["search", "successful-tools"], request).await
    }

    /// Context from a trailing window such as `"6h"` or `"7d"`.
    pub async fn recent_context_search(
        &self,
        request: &RecentContextSearchRequest,
    ) -> Result<RecentContextSearchResponse> {
        self.post(&["search", "recent-context"], request).await
    }

    pub async fn entity_by_label_search(
        &self,
        request: &EntityByLabelSearchRequest,
    ) -> Result<EntityByLabelSearchResponse> {
        self.post(&["search", "entity-by-label"], request).await
    }
}
