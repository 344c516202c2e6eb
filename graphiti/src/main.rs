use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use graphiti::config::Config;
use graphiti::{
    AddEntityNodeRequest, AddMessagesRequest, DiverseSearchRequest, DiversityLevel,
    EntityByLabelSearchRequest, EntityRelationshipSearchRequest, EpisodeContextSearchRequest,
    GetMemoryRequest, GraphitiClient, Message, RecencyWindow, RecentContextSearchRequest,
    SearchQuery, SuccessfulToolsSearchRequest, TemporalSearchRequest,
};

#[derive(Parser)]
#[command(name = "graphiti")]
#[command(about = "Command-line client for the Graphiti knowledge-graph service")]
struct Args {
    /// Server base URL (overrides GRAPHITI_URL)
    #[arg(long, global = true)]
    url: Option<String>,

    /// Request timeout in seconds (overrides GRAPHITI_TIMEOUT_SECS)
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check that the server is up
    Health,
    /// Search facts
    Search {
        query: String,
        #[arg(long = "group")]
        groups: Vec<String>,
        #[arg(long)]
        max_facts: Option<u32>,
    },
    /// Read or delete a single fact edge
    Edge {
        #[command(subcommand)]
        action: EdgeAction,
    },
    /// List the most recent episodes of a group
    Episodes {
        group_id: String,
        #[arg(long, default_value_t = 10)]
        last_n: u32,
    },
    /// Retrieve facts relevant to a message
    Memory {
        group_id: String,
        content: String,
        #[arg(long, default_value = "user")]
        author: String,
        #[arg(long)]
        max_facts: Option<u32>,
        #[arg(long)]
        center_node: Option<String>,
    },
    /// Queue a single message for ingestion
    AddMessage {
        group_id: String,
        content: String,
        #[arg(long, default_value = "user")]
        author: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        source_description: Option<String>,
    },
    /// Create an entity node
    AddNode {
        group_id: String,
        name: String,
        #[arg(long)]
        summary: Option<String>,
        /// Node UUID (generated when omitted)
        #[arg(long)]
        uuid: Option<String>,
    },
    /// Delete a group and everything in it
    DeleteGroup {
        group_id: String,
        #[arg(long)]
        yes: bool,
    },
    DeleteEpisode {
        uuid: String,
    },
    /// Remove all data from the graph
    Clear {
        #[arg(long)]
        yes: bool,
    },
    /// Search inside a time window
    Temporal {
        query: String,
        #[arg(long)]
        start: DateTime<Utc>,
        #[arg(long)]
        end: DateTime<Utc>,
        #[arg(long)]
        group: Option<String>,
        #[arg(long)]
        max_results: Option<u32>,
    },
    /// Traverse relationships around an entity
    Relationships {
        query: String,
        center_node: String,
        #[arg(long)]
        group: Option<String>,
        #[arg(long)]
        max_depth: Option<u32>,
        #[arg(long = "label")]
        labels: Vec<String>,
        #[arg(long = "edge-type")]
        edge_types: Vec<String>,
        #[arg(long)]
        max_results: Option<u32>,
    },
    /// MMR-diversified search
    Diverse {
        query: String,
        #[arg(long)]
        group: Option<String>,
        #[arg(long)]
        level: Option<DiversityLevel>,
        #[arg(long)]
        max_results: Option<u32>,
    },
    /// Search episodes with agent context
    EpisodeContext {
        query: String,
        #[arg(long)]
        group: Option<String>,
        #[arg(long = "agent-type")]
        agent_types: Vec<String>,
        #[arg(long)]
        include_tool_calls: bool,
        #[arg(long)]
        max_results: Option<u32>,
    },
    /// Find tools that worked before
    Tools {
        query: String,
        #[arg(long)]
        group: Option<String>,
        #[arg(long = "tool")]
        tools: Vec<String>,
        #[arg(long)]
        min_mentions: Option<u32>,
        #[arg(long)]
        max_results: Option<u32>,
    },
    /// Search recent context, e.g. --window 6h
    Recent {
        query: String,
        #[arg(long)]
        group: Option<String>,
        #[arg(long)]
        window: Option<RecencyWindow>,
        #[arg(long)]
        max_results: Option<u32>,
    },
    /// Search entities carrying the given labels
    ByLabel {
        query: String,
        #[arg(long = "label", required = true)]
        labels: Vec<String>,
        #[arg(long = "edge-type")]
        edge_types: Vec<String>,
        #[arg(long)]
        group: Option<String>,
        #[arg(long)]
        max_results: Option<u32>,
    },
}

#[derive(Subcommand)]
enum EdgeAction {
    Get { uuid: String },
    Delete { uuid: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "graphiti=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = Config::from_env();
    if let Some(url) = args.url {
        config.base_url = url;
    }
    if let Some(timeout_secs) = args.timeout_secs {
        config.timeout_secs = timeout_secs;
    }

    let client = config.client_builder().build()?;
    tracing::debug!("Using Graphiti server at {}", client.base_url());

    run(&client, args.command).await
}

async fn run(client: &GraphitiClient, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Health => print_json(&client.health_check().await?),
        Command::Search {
            query,
            groups,
            max_facts,
        } => {
            let mut request = SearchQuery::new(query);
            request.group_ids = non_empty(groups);
            request.max_facts = max_facts;
            print_json(&client.search(&request).await?)
        }
        Command::Edge { action } => match action {
            EdgeAction::Get { uuid } => print_json(&client.get_entity_edge(&uuid).await?),
            EdgeAction::Delete { uuid } => print_json(&client.delete_entity_edge(&uuid).await?),
        },
        Command::Episodes { group_id, last_n } => {
            print_json(&client.get_episodes(&group_id, last_n).await?)
        }
        Command::Memory {
            group_id,
            content,
            author,
            max_facts,
            center_node,
        } => {
            let mut request = GetMemoryRequest::new(group_id, vec![Message::new(author, content)]);
            request.max_facts = max_facts;
            request.center_node_uuid = center_node;
            print_json(&client.get_memory(&request).await?)
        }
        Command::AddMessage {
            group_id,
            content,
            author,
            name,
            source_description,
        } => {
            let mut message = Message::new(author, content);
            message.name = name;
            message.source_description = source_description;
            let result = client
                .add_messages(&AddMessagesRequest::new(group_id, vec![message]))
                .await?;
            tracing::info!("Messages are processed asynchronously; poll `episodes` to follow up");
            print_json(&result)
        }
        Command::AddNode {
            group_id,
            name,
            summary,
            uuid,
        } => {
            let uuid = uuid.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
            let mut request = AddEntityNodeRequest::new(uuid, group_id, name);
            request.summary = summary;
            print_json(&client.add_entity_node(&request).await?)
        }
        Command::DeleteGroup { group_id, yes } => {
            if !yes {
                anyhow::bail!("Refusing to delete group '{group_id}' without --yes");
            }
            print_json(&client.delete_group(&group_id).await?)
        }
        Command::DeleteEpisode { uuid } => print_json(&client.delete_episode(&uuid).await?),
        Command::Clear { yes } => {
            if !yes {
                anyhow::bail!("Refusing to clear the graph without --yes");
            }
            print_json(&client.clear().await?)
        }
        Command::Temporal {
            query,
            start,
            end,
            group,
            max_results,
        } => {
            let mut request = TemporalSearchRequest::new(query, start, end);
            request.group_id = group;
            request.max_results = max_results;
            print_json(&client.temporal_window_search(&request).await?)
        }
        Command::Relationships {
            query,
            center_node,
            group,
            max_depth,
            labels,
            edge_types,
            max_results,
        } => {
            let mut request = EntityRelationshipSearchRequest::new(query, center_node);
            request.group_id = group;
            request.max_depth = max_depth;
            request.node_labels = non_empty(labels);
            request.edge_types = non_empty(edge_types);
            request.max_results = max_results;
            print_json(&client.entity_relationships_search(&request).await?)
        }
        Command::Diverse {
            query,
            group,
            level,
            max_results,
        } => {
            let mut request = DiverseSearchRequest::new(query);
            request.group_id = group;
            request.diversity_level = level;
            request.max_results = max_results;
            print_json(&client.diverse_results_search(&request).await?)
        }
        Command::EpisodeContext {
            query,
            group,
            agent_types,
            include_tool_calls,
            max_results,
        } => {
            let mut request = EpisodeContextSearchRequest::new(query);
            request.group_id = group;
            request.agent_types = non_empty(agent_types);
            request.include_tool_calls = include_tool_calls.then_some(true);
            request.max_results = max_results;
            print_json(&client.episode_context_search(&request).await?)
        }
        Command::Tools {
            query,
            group,
            tools,
            min_mentions,
            max_results,
        } => {
            let mut request = SuccessfulToolsSearchRequest::new(query);
            request.group_id = group;
            request.tool_names = non_empty(tools);
            request.min_mentions = min_mentions;
            request.max_results = max_results;
            print_json(&client.successful_tools_search(&request).await?)
        }
        Command::Recent {
            query,
            group,
            window,
            max_results,
        } => {
            let mut request = RecentContextSearchRequest::new(query);
            request.group_id = group;
            request.recency_window = window;
            request.max_results = max_results;
            print_json(&client.recent_context_search(&request).await?)
        }
        Command::ByLabel {
            query,
            labels,
            edge_types,
            group,
            max_results,
        } => {
            let mut request = EntityByLabelSearchRequest::new(query, labels);
            request.group_id = group;
            request.edge_types = non_empty(edge_types);
            request.max_results = max_results;
            print_json(&client.entity_by_label_search(&request).await?)
        }
    }
}

fn non_empty(values: Vec<String>) -> Option<Vec<String>> {
    (!values.is_empty()).then_some(values)
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
