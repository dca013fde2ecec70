//!  Farefinder Flights Agent
//!
//!  Copyright (C) 2026  Farefinder contributors
//!
//!  This program is free software: you can redistribute it and/or modify
//!  it under the terms of the GNU Affero General Public License as published by
//!  the Free Software Foundation, either version 3 of the License, or
//!  (at your option) any later version.
//!
//!  This program is distributed in the hope that it will be useful,
//!  but WITHOUT ANY WARRANTY; without even the implied warranty of
//!  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//!  GNU Affero General Public License for more details.
//!
//!  You should have received a copy of the GNU Affero General Public License
//!  along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! # SerpApi Flights Client
//!
//! Effectful (network) operations for Google Flights search via SerpApi.
//! One request per search, no retry, no rate limiting: a failed attempt is
//! reported as a `Failure` outcome immediately.

use crate::flights_query::FlightQuery;
use crate::flights_results::{extract_best_flights, FlightSearchOutcome, SearchError};
use anyhow::{Context, Result};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Production SerpApi endpoint.
pub const DEFAULT_BASE_URL: &str = "https://serpapi.com";
/// Environment variable holding the SerpApi credential.
pub const API_KEY_ENV: &str = "SERPAPI_API_KEY";

#[derive(Clone)]
pub struct SerpApiFlightsClient {
    client: Arc<wreq::Client>,
    api_key: String,
    base_url: String,
}

impl SerpApiFlightsClient {
    /// Build a client with an explicit credential.
    ///
    /// The credential is not validated here; a missing or bogus key comes
    /// back from the provider as an authentication error at search time.
    pub fn new(api_key: impl Into<String>, timeout_secs: u64) -> Result<Self> {
        let client = wreq::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client: Arc::new(client),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Build a client with the credential from `SERPAPI_API_KEY`.
    ///
    /// An unset variable is not an error here either: the search proceeds
    /// with an empty key and the provider's rejection surfaces in the
    /// outcome.
    pub fn from_env(timeout_secs: u64) -> Result<Self> {
        let api_key = std::env::var(API_KEY_ENV).unwrap_or_default();
        Self::new(api_key, timeout_secs)
    }

    /// Point the client at a different endpoint. Used by tests.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn search_url(&self, query: &FlightQuery) -> String {
        format!(
            "{}/search?{}",
            self.base_url,
            query.to_query_string(&self.api_key)
        )
    }

    /// Issue the HTTP request and return the raw body of a 2xx response.
    pub async fn fetch_raw(&self, query: &FlightQuery) -> Result<String, SearchError> {
        let url = self.search_url(query);
        tracing::debug!("[fetch_raw] GET {}", self.redacted(&url));

        let http_start = std::time::Instant::now();
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        let body = response.text().await?;
        tracing::debug!(
            "[fetch_raw] HTTP {} in {:?}: {} bytes",
            status.as_u16(),
            http_start.elapsed(),
            body.len()
        );

        if !status.is_success() {
            let body_preview = body.chars().take(500).collect::<String>();
            return Err(SearchError::Status {
                status: status.as_u16(),
                body_preview,
            });
        }

        Ok(body)
    }

    /// Fallible search, used by the binaries when they want the typed error.
    pub async fn try_search(&self, query: &FlightQuery) -> Result<Vec<Value>, SearchError> {
        let overall_start = std::time::Instant::now();
        let body = self.fetch_raw(query).await?;
        let flights = extract_best_flights(&body)?;
        tracing::info!(
            "Found {} best flights in {:?}",
            flights.len(),
            overall_start.elapsed()
        );
        Ok(flights)
    }

    /// One flight search, one outcome. Never returns `Err` and never
    /// panics: every transport, status, parse, provider, and extraction
    /// error is collapsed into `FlightSearchOutcome::Failure`.
    pub async fn search(&self, query: &FlightQuery) -> FlightSearchOutcome {
        match self.try_search(query).await {
            Ok(flights) => FlightSearchOutcome::Flights(flights),
            Err(e) => {
                tracing::warn!("Flight search failed: {}", e);
                FlightSearchOutcome::Failure(e.to_string())
            }
        }
    }

    /// Search URL with the credential blanked for logging.
    fn redacted(&self, url: &str) -> String {
        if self.api_key.is_empty() {
            return url.to_string();
        }
        url.replacen(urlencoding::encode(&self.api_key).as_ref(), "***", 1)
    }
}
