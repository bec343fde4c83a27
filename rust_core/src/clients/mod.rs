//! External collaborators: the flight-search provider and the messaging API.
//!
//! Each collaborator sits behind a trait so the monitor loop can run
//! against test doubles.

use crate::models::TripParams;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod serpapi;
pub mod twilio;

pub use serpapi::SerpApiClient;
pub use twilio::TwilioClient;

// ============================================================================
// Flight search
// ============================================================================

/// Parsed JSON body returned by the flight-search provider.
///
/// Kept as a loose JSON value; the extractor validates each offer on its own.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub body: serde_json::Value,
}

impl RawResponse {
    pub fn new(body: serde_json::Value) -> Self {
        Self { body }
    }

    /// Entries of the `best_flights` list, or an empty slice when absent
    pub fn best_flights(&self) -> &[serde_json::Value] {
        self.body
            .get("best_flights")
            .and_then(|v| v.as_array())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Request never produced a response (DNS, connect, timeout, ...).
    /// The wrapped error carries no URL, since the query holds the API key.
    #[error("flight search request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("flight search returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("flight search returned a non-JSON body: {source}")]
    Decode {
        #[source]
        source: serde_json::Error,
        body: String,
    },
}

#[async_trait]
pub trait FlightSearch: Send + Sync {
    /// Issue one search request for the trip. No retries.
    async fn fetch(&self, trip: &TripParams) -> Result<RawResponse, FetchError>;

    /// Provider name for logging
    fn provider_name(&self) -> &str;
}

// ============================================================================
// Messaging
// ============================================================================

/// Acknowledgement identifier returned by the messaging API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageAck {
    pub sid: String,
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("messaging request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("messaging API returned {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("messaging API response had no message sid: {body}")]
    MissingSid { body: String },
}

#[async_trait]
pub trait MessageSender: Send + Sync {
    /// Send one message body to the configured recipient.
    async fn send(&self, body: &str) -> Result<MessageAck, NotifyError>;
}
