//! FDSN event webservice client.
//!
//! One HTTP GET per fetch, no retries and no caching. Uses reqwest with
//! rustls for TLS.

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode, Url};
use tokio::task::JoinHandle;
use tracing::{debug, instrument};

use crate::errors::QuakesError;
use crate::events::EventList;
use crate::models::QueryResponse;
use crate::query;
use crate::settings::FilterSnapshot;

/// Default request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// User agent string for API requests.
const USER_AGENT: &str = concat!("quakes/", env!("CARGO_PKG_VERSION"));

/// USGS FDSN event query endpoint.
/// Docs: <https://earthquake.usgs.gov/fdsnws/event/1/>
pub const DEFAULT_ENDPOINT: &str = "https://earthquake.usgs.gov/fdsnws/event/1/query";

/// Client for the FDSN event query webservice.
#[derive(Debug, Clone)]
pub struct QuakeClient {
    client: Client,
    endpoint: Url,
}

impl QuakeClient {
    /// Create a client for the USGS endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new() -> Result<Self, QuakesError> {
        Self::with_endpoint(DEFAULT_ENDPOINT)
    }

    /// Create a client for another FDSN-compatible endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if `endpoint` is not a URL or the HTTP client cannot
    /// be initialized.
    pub fn with_endpoint(endpoint: &str) -> Result<Self, QuakesError> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| QuakesError::InvalidEndpoint(format!("{endpoint}: {e}")))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { client, endpoint })
    }

    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Full request URL for `filter` with the clock fixed at `now`.
    #[must_use]
    pub fn request_url(&self, filter: &FilterSnapshot, now: DateTime<Utc>) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .extend_pairs(query::build(filter, now));
        url
    }

    /// Fetch and decode the raw query response.
    ///
    /// # Errors
    ///
    /// Returns [`QuakesError::Transport`] if the request fails,
    /// [`QuakesError::Status`] for any status other than 200, and
    /// [`QuakesError::Decode`] if the body is not a JSON object of the
    /// expected shape.
    #[instrument(skip_all)]
    pub async fn fetch_response(&self, filter: &FilterSnapshot) -> Result<QueryResponse, QuakesError> {
        let url = self.request_url(filter, Utc::now());

        debug!("fetching events from {}", url);

        let response = self.client.get(url).send().await?;

        // Check status before parsing
        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(QuakesError::Status {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.bytes().await?;
        let decoded: QueryResponse = serde_json::from_slice(&body)?;

        debug!(
            "fetched {} events",
            decoded.features.as_ref().map_or(0, Vec::len)
        );
        Ok(decoded)
    }

    /// Fetch events matching `filter` and map them to domain events.
    ///
    /// # Errors
    ///
    /// See [`QuakeClient::fetch_response`].
    pub async fn fetch_events(&self, filter: &FilterSnapshot) -> Result<EventList, QuakesError> {
        let response = self.fetch_response(filter).await?;
        Ok(EventList::from(response))
    }

    /// Run [`QuakeClient::fetch_events`] on the tokio runtime.
    ///
    /// The handle resolves exactly once. There is no cancellation; callers
    /// that lose interest drop the result.
    pub fn spawn_fetch(&self, filter: FilterSnapshot) -> JoinHandle<Result<EventList, QuakesError>> {
        let client = self.clone();
        tokio::spawn(async move { client.fetch_events(&filter).await })
    }
}
