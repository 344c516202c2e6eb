//! Runs each of the seven advanced search endpoints against a local server.
//!
//! Seed the group first (for instance with the `basic_usage` example or the
//! `graphiti add-message` command) so the searches have something to find.

use std::time::Duration;

use chrono::Utc;
use graphiti::{
    DiverseSearchRequest, DiversityLevel, EntityByLabelSearchRequest,
    EntityRelationshipSearchRequest, EpisodeContextSearchRequest, GraphitiClient,
    RecencyWindow, RecentContextSearchRequest, SuccessfulToolsSearchRequest,
    TemporalSearchRequest,
};

const GROUP_ID: &str = "pentest-demo-2024";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let client = GraphitiClient::builder("http://localhost:8000")
        .timeout(Duration::from_secs(60))
        .build()?;

    let health = client.health_check().await?;
    println!("Server is running (status: {})", health.status);

    let now = Utc::now();

    section("Temporal Window Search");
    let temporal = client
        .temporal_window_search(
            &TemporalSearchRequest::new(
                "vulnerability exploitation attempts",
                now - chrono::Duration::hours(4),
                now - chrono::Duration::hours(2),
            )
            .with_group_id(GROUP_ID)
            .with_max_results(10),
        )
        .await?;
    println!(
        "{} edges, {} nodes, {} episodes",
        temporal.edges.len(),
        temporal.nodes.len(),
        temporal.episodes.len()
    );
    if let Some(window) = temporal.time_window {
        println!("searched {} .. {}", window.start, window.end);
    }

    section("Entity Relationships Search");
    match temporal.edges.first().map(|e| e.source_node_uuid.clone()) {
        Some(center) if !center.is_empty() => {
            let related = client
                .entity_relationships_search(
                    &EntityRelationshipSearchRequest::new("related entities and connections", center)
                        .with_group_id(GROUP_ID)
                        .with_max_depth(2)
                        .with_max_results(20),
                )
                .await?;
            let center_name = related.center_node.as_ref().map_or("Unknown", |n| n.name.as_str());
            println!("center node: {center_name}");
            for scored in related.nodes_with_distances() {
                println!("  {} (distance {})", scored.item.name, scored.score);
            }
        }
        _ => println!("No edges found to pick a center node from"),
    }

    section("Diverse Results Search (MMR)");
    let diverse = client
        .diverse_results_search(
            &DiverseSearchRequest::new("CVE vulnerabilities and exploitation")
                .with_group_id(GROUP_ID)
                .with_diversity_level(DiversityLevel::Medium)
                .with_max_results(10),
        )
        .await?;
    for scored in diverse.scored_edges() {
        println!("  [{:.3}] {}", scored.score, scored.item.fact);
    }

    section("Episode Context Search");
    let context = client
        .episode_context_search(
            &EpisodeContextSearchRequest::new("reconnaissance and scanning")
                .with_group_id(GROUP_ID)
                .with_include_tool_calls(true)
                .with_max_results(5),
        )
        .await?;
    for scored in context.scored_episodes() {
        println!("  [{:.3}] {}", scored.score, preview(&scored.item.content, 80));
    }

    section("Successful Tools Search");
    let tools = client
        .successful_tools_search(
            &SuccessfulToolsSearchRequest::new("tools that discovered vulnerabilities")
                .with_group_id(GROUP_ID)
                .with_min_mentions(1)
                .with_max_results(10),
        )
        .await?;
    for scored in tools.nodes_with_mentions() {
        println!("  {} ({} mentions)", scored.item.name, scored.score);
    }

    section("Recent Context Search");
    let recent = client
        .recent_context_search(
            &RecentContextSearchRequest::new("latest findings")
                .with_group_id(GROUP_ID)
                .with_recency_window(RecencyWindow::hours(6))
                .with_max_results(10),
        )
        .await?;
    println!(
        "{} edges, {} nodes, {} episodes",
        recent.edges.len(),
        recent.nodes.len(),
        recent.episodes.len()
    );

    section("Entity By Label Search");
    let labelled = client
        .entity_by_label_search(
            &EntityByLabelSearchRequest::new("network services", ["SERVICE"])
                .with_group_id(GROUP_ID)
                .with_max_results(10),
        )
        .await?;
    for scored in labelled.scored_nodes() {
        println!("  [{:.3}] {} {:?}", scored.score, scored.item.name, scored.item.labels);
    }

    Ok(())
}

fn section(title: &str) {
    println!("\n{}\n{title}\n{}", "=".repeat(80), "=".repeat(80));
}

fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
