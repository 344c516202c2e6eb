//! Environment configuration for the `graphiti` binary.
//!
//! The library itself never reads the environment; only the command-line
//! front end does, through [`Config::from_env`].

use std::env;
use std::time::Duration;

use crate::client::{ClientBuilder, DEFAULT_TIMEOUT};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
                default
            }
        },
        Err(_) => default,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: env::var("GRAPHITI_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            timeout_secs: parse_env_or("GRAPHITI_TIMEOUT_SECS", DEFAULT_TIMEOUT.as_secs()),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn client_builder(&self) -> ClientBuilder {
        ClientBuilder::new(self.base_url.clone()).timeout(self.timeout())
    }
}
