//! Typed async client for the Graphiti temporal knowledge-graph service.
//!
//! ```no_run
//! use graphiti::{AddMessagesRequest, GraphitiClient, Message, SearchQuery};
//! use std::time::Duration;
//!
//! # async fn run() -> graphiti::Result<()> {
//! let client = GraphitiClient::builder("http://localhost:8000")
//!     .timeout(Duration::from_secs(60))
//!     .build()?;
//!
//! client
//!     .add_messages(&AddMessagesRequest::new(
//!         "g1",
//!         vec![Message::new("Alice", "I love hiking in the mountains")],
//!     ))
//!     .await?;
//!
//! let results = client
//!     .search(&SearchQuery::new("What does Alice like?").with_group_ids(["g1"]))
//!     .await?;
//! for fact in &results.facts {
//!     println!("{}", fact.fact);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod models;

pub use client::{ClientBuilder, GraphitiClient, DEFAULT_TIMEOUT};
pub use error::{GraphitiError, Result};
pub use models::*;
