//! SerpApi Google Flights client
//!
//! Issues one search per call and hands back the raw JSON body. Offer-level
//! validation is left to [`crate::extract`].

use super::{FetchError, FlightSearch, RawResponse};
use crate::models::TripParams;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://serpapi.com/search";

const ENGINE: &str = "google_flights";
const LANGUAGE: &str = "en";
const COUNTRY: &str = "co";
const DATE_FORMAT: &str = "%Y-%m-%d";

pub struct SerpApiClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl SerpApiClient {
    /// Create a client. `timeout` of `None` keeps reqwest's default.
    pub fn new(base_url: String, api_key: String, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder().user_agent("FareWatch/1.0");
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }

    /// Query parameters for one search, in the order the provider documents them
    pub fn query_params(&self, trip: &TripParams) -> Vec<(&'static str, String)> {
        let outbound = trip.outbound_date().format(DATE_FORMAT).to_string();
        let inbound = trip.return_date().format(DATE_FORMAT).to_string();
        vec![
            ("engine", ENGINE.to_string()),
            (
                "q",
                format!(
                    "Flights to {} from {} on {} through {}",
                    trip.destination(),
                    trip.origin(),
                    outbound,
                    inbound
                ),
            ),
            ("hl", LANGUAGE.to_string()),
            ("gl", COUNTRY.to_string()),
            ("departure_id", trip.origin().code().to_string()),
            ("arrival_id", trip.destination().code().to_string()),
            ("outbound_date", outbound),
            ("return_date", inbound),
            ("api_key", self.api_key.clone()),
        ]
    }
}

#[async_trait]
impl FlightSearch for SerpApiClient {
    async fn fetch(&self, trip: &TripParams) -> Result<RawResponse, FetchError> {
        debug!(
            "Searching flights {} -> {} ({} / {})",
            trip.origin(),
            trip.destination(),
            trip.outbound_date(),
            trip.return_date()
        );

        let response = self
            .client
            .get(&self.base_url)
            .query(&self.query_params(trip))
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.without_url()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Transport(e.without_url()))?;
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        match serde_json::from_str(&body) {
            Ok(value) => Ok(RawResponse::new(value)),
            Err(source) => Err(FetchError::Decode { source, body }),
        }
    }

    fn provider_name(&self) -> &str {
        "serpapi"
    }
}
