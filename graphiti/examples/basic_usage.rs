//! Basic usage: health check, ingestion, polling, search, memory, entity nodes.
//!
//! `POST /messages` only queues the batch, so this example polls
//! `get_episodes` until the server has processed it before searching.
//!
//! Run against a local server with `cargo run --example basic_usage`.

use std::time::Duration;

use chrono::Utc;
use graphiti::{
    AddEntityNodeRequest, AddMessagesRequest, Episode, GetMemoryRequest, GraphitiClient,
    Message, Observation, SearchQuery,
};
use uuid::Uuid;

const MAX_ATTEMPTS: u32 = 12;
const POLL_INTERVAL: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "graphiti=debug".into()),
        )
        .init();

    let client = GraphitiClient::builder("http://localhost:8000")
        .timeout(Duration::from_secs(60))
        .build()?;

    println!("=== Health Check ===");
    let health = client.health_check().await?;
    println!("Status: {}\n", health.status);

    let group_id = Uuid::new_v4().to_string();
    println!("Using group ID: {group_id}\n");

    let observation = Observation::new(Uuid::new_v4().to_string(), Uuid::new_v4().to_string());

    println!("=== Adding Messages ===");
    let now = Utc::now();
    let messages = vec![
        Message::new(
            "Alice",
            "I love hiking in the mountains on weekends. My favorite trail is the Pacific Crest Trail.",
        )
        .with_timestamp(now - chrono::Duration::hours(5)),
        Message::new("Assistant", "That sounds amazing! Do you go camping as well?")
            .with_timestamp(now - chrono::Duration::hours(4)),
        Message::new(
            "Alice",
            "Yes! I usually camp near the trail. I also enjoy nature and landscape photography.",
        )
        .with_timestamp(now - chrono::Duration::hours(3)),
        Message::new("Alice", "I recently bought a Canon EOS R5 for my trips.")
            .with_timestamp(now - chrono::Duration::hours(2)),
    ];

    let ack = client
        .add_messages(
            &AddMessagesRequest::new(group_id.clone(), messages)
                .with_observation(observation.clone()),
        )
        .await?;
    println!("{}: {}\n", ack.message, ack.success);

    println!("Waiting for messages to be processed...");
    let episodes = wait_for_episodes(&client, &group_id).await?;
    println!("Found {} episodes\n", episodes.len());

    println!("=== Basic Search ===");
    let results = client
        .search(
            &SearchQuery::new("What does the user like to do?")
                .with_group_ids([group_id.clone()])
                .with_max_facts(5)
                .with_observation(observation.clone()),
        )
        .await?;
    for (i, fact) in results.facts.iter().enumerate() {
        println!("{}. {} (from: {}, created: {})", i + 1, fact.fact, fact.name, fact.created_at);
    }
    println!();

    println!("=== Getting Memory ===");
    let memory = client
        .get_memory(
            &GetMemoryRequest::new(
                group_id.clone(),
                vec![Message::new("User", "What hobbies and equipment does the user have?")],
            )
            .with_max_facts(10)
            .with_observation(observation.clone()),
        )
        .await?;
    for (i, fact) in memory.facts.iter().enumerate() {
        println!("{}. {}", i + 1, fact.fact);
    }
    println!();

    println!("=== Adding Entity Node ===");
    let node = client
        .add_entity_node(
            &AddEntityNodeRequest::new(Uuid::new_v4().to_string(), group_id.clone(), "User Interests")
                .with_summary("Hiking, camping and photography")
                .with_observation(observation),
        )
        .await?;
    println!("Created entity node: {} (UUID: {})\n", node.name, node.uuid);

    println!("=== Cleanup ===");
    match client.delete_group(&group_id).await {
        Ok(result) => println!("{}: {}", result.message, result.success),
        Err(e) => eprintln!("Warning: failed to delete group: {e}"),
    }

    Ok(())
}

async fn wait_for_episodes(client: &GraphitiClient, group_id: &str) -> anyhow::Result<Vec<Episode>> {
    for attempt in 1..=MAX_ATTEMPTS {
        println!("  Polling for episodes (attempt {attempt}/{MAX_ATTEMPTS})...");
        match client.get_episodes(group_id, 10).await {
            Ok(episodes) if !episodes.is_empty() => return Ok(episodes),
            Ok(_) => {}
            Err(e) => eprintln!("  Warning: failed to get episodes: {e}"),
        }

        if attempt < MAX_ATTEMPTS {
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    anyhow::bail!(
        "No episodes were created after {:?}; the server-side job may have failed",
        POLL_INTERVAL * MAX_ATTEMPTS
    )
}
