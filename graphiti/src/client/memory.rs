use super::GraphitiClient;
use crate::error::Result;
use crate::models::{
    AddEntityNodeRequest, AddMessagesRequest, EntityNode, Episode, FactResult,
    GetMemoryRequest, GetMemoryResponse, HealthCheckResponse, OperationResult, SearchQuery,
    SearchResults,
};

impl GraphitiClient {
    pub async fn health_check(&self) -> Result<HealthCheckResponse> {
        self.get(&["healthcheck"], &[]).await
    }

    /// Search facts in the graph.
    pub async fn search(&self, query: &SearchQuery) -> Result<SearchResults> {
        self.post(&["search"], query).await
    }

    pub async fn get_entity_edge(&self, uuid: &str) -> Result<FactResult> {
        self.get(&["entity-edge", uuid], &[]).await
    }

    /// The `last_n` most recent episodes of a group.
    pub async fn get_episodes(&self, group_id: &str, last_n: u32) -> Result<Vec<Episode>> {
        self.get(&["episodes", group_id], &[("last_n", last_n.to_string())])
            .await
    }

    /// Facts relevant to a conversation excerpt.
    pub async fn get_memory(&self, request: &GetMemoryRequest) -> Result<GetMemoryResponse> {
        self.post(&["get-memory"], request).await
    }

    /// Queue a batch of messages for ingestion.
    ///
    /// Returns once the server has accepted the batch. Extraction runs later on
    /// the server and there is no completion signal; poll
    /// [`get_episodes`](Self::get_episodes) to see the results land.
    pub async fn add_messages(&self, request: &AddMessagesRequest) -> Result<OperationResult> {
        self.post(&["messages"], request).await
    }

    pub async fn add_entity_node(&self, request: &AddEntityNodeRequest) -> Result<EntityNode> {
        self.post(&["entity-node"], request).await
    }

    pub async fn delete_entity_edge(&self, uuid: &str) -> Result<OperationResult> {
        self.delete(&["entity-edge", uuid]).await
    }

    /// Delete a group with all of its episodes, entities and facts.
    pub async fn delete_group(&self, group_id: &str) -> Result<OperationResult> {
        self.delete(&["group", group_id]).await
    }

    pub async fn delete_episode(&self, uuid: &str) -> Result<OperationResult> {
        self.delete(&["episode", uuid]).await
    }

    /// Remove all data from the graph.
    pub async fn clear(&self) -> Result<OperationResult> {
        self.post_empty(&["clear"]).await
    }
}
