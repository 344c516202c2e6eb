//! HTTP client for the Graphiti knowledge-graph service.
//!
//! Every endpoint method funnels into [`GraphitiClient::send`]: encode the body,
//! build the URL from escaped path segments, execute once, check the status,
//! decode. There are no retries, no backoff and no caching; every failure is
//! returned to the caller as a [`GraphitiError`].

mod memory;
mod search;

use std::time::Duration;

use reqwest::{header::CONTENT_TYPE, Client, Method};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;
use url::Url;

use crate::error::{GraphitiError, Result};

/// Transport timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Collects client options and resolves them once in [`ClientBuilder::build`].
///
/// Conflicting options resolve last-write-wins:
/// - `http_client` replaces the transport wholesale and discards any timeout
///   set before it; the custom client's own timeout then applies.
/// - `timeout` set after `http_client` keeps the custom client and applies the
///   timeout to each request, overriding the client's own setting.
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    base_url: String,
    timeout: Option<Duration>,
    http_client: Option<Client>,
}

impl ClientBuilder {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: None,
            http_client: None,
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Use a caller-supplied transport (proxies, custom TLS, test doubles).
    pub fn http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self.timeout = None;
        self
    }

    /// The base URL is not checked here; a malformed one fails at call time.
    pub fn build(self) -> Result<GraphitiClient> {
        let (http, request_timeout) = match self.http_client {
            Some(client) => (client, self.timeout),
            None => {
                let client = Client::builder()
                    .timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT))
                    .build()
                    .map_err(client_build_error)?;
                (client, None)
            }
        };

        Ok(GraphitiClient {
            http,
            base_url: self.base_url,
            request_timeout,
        })
    }
}

// Client setup happens before any request exists.
fn client_build_error(err: reqwest::Error) -> GraphitiError {
    GraphitiError::RequestConstruction(format!("failed to build HTTP client: {err}"))
}

/// Typed client for the Graphiti REST API.
///
/// Immutable once built and cheap to clone; one instance can serve any number
/// of concurrent calls.
#[derive(Debug, Clone)]
pub struct GraphitiClient {
    http: Client,
    base_url: String,
    request_timeout: Option<Duration>,
}

impl GraphitiClient {
    /// Client with the default transport and a 30 second timeout.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        ClientBuilder::new(base_url).build()
    }

    pub fn builder(base_url: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint_url(&self, segments: &[&str], query: &[(&str, String)]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            GraphitiError::RequestConstruction(format!("invalid base URL '{}': {e}", self.base_url))
        })?;

        // Each segment is pushed whole, so '/' inside an identifier becomes %2F.
        url.path_segments_mut()
            .map_err(|_| {
                GraphitiError::RequestConstruction(format!(
                    "base URL '{}' cannot carry a path",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);

        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }

        Ok(url)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        segments: &[&str],
        query: &[(&str, String)],
        body: Option<Vec<u8>>,
    ) -> Result<T> {
        let url = self.endpoint_url(segments, query)?;
        let endpoint = format!("{} {}", method, url.path());

        let mut builder = self.http.request(method, url);
        if let Some(timeout) = self.request_timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(body) = body {
            builder = builder.header(CONTENT_TYPE, "application/json").body(body);
        }
        let request = builder
            .build()
            .map_err(|e| GraphitiError::RequestConstruction(e.to_string()))?;

        debug!("Sending request {}", endpoint);
        let response = self.http.execute(request).await?;
        let status = response.status();
        debug!("{} responded with {}", endpoint, status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GraphitiError::Status { status, body });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|source| GraphitiError::Deserialization {
            endpoint,
            body: String::from_utf8_lossy(&bytes).into_owned(),
            source,
        })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> Result<T> {
        self.send(Method::GET, segments, query, None).await
    }

    async fn post<B, T>(&self, segments: &[&str], body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_vec(body).map_err(GraphitiError::Serialization)?;
        self.send(Method::POST, segments, &[], Some(body)).await
    }

    async fn post_empty<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T> {
        self.send(Method::POST, segments, &[], None).await
    }

    async fn delete<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T> {
        self.send(Method::DELETE, segments, &[], None).await
    }
}
