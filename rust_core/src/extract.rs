//! Offer extraction
//!
//! Turns a raw search payload into [`Quote`]s in the normalized currency.
//! Bad offers are skipped one at a time; a payload without offers simply
//! yields nothing.

use crate::clients::RawResponse;
use crate::models::Quote;
use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, info, warn};

pub const UNKNOWN_CARRIER: &str = "Unknown";

/// Why a single offer was left out of the extracted quotes
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OfferRejected {
    #[error("converted price {0} is not positive")]
    NonPositivePrice(f64),
    #[error("offer has no flights list")]
    MissingFlights,
    #[error("offer has an empty flights list")]
    NoLegs,
}

/// Extract quotes stamped with the current wall-clock time
pub fn extract(raw: &RawResponse, exchange_rate: f64) -> Vec<Quote> {
    extract_at(raw, exchange_rate, Utc::now())
}

/// Extract quotes stamped with `observed_at`
pub fn extract_at(raw: &RawResponse, exchange_rate: f64, observed_at: DateTime<Utc>) -> Vec<Quote> {
    let offers = raw.best_flights();
    if offers.is_empty() {
        info!("No flights found in this search");
        return Vec::new();
    }

    let mut quotes = Vec::with_capacity(offers.len());
    for (idx, offer) in offers.iter().enumerate() {
        match parse_offer(offer, exchange_rate, observed_at) {
            Ok(quote) => {
                info!(
                    "Offer {}: price={:.2} carrier={} at {}",
                    idx,
                    quote.price,
                    quote.carrier,
                    quote.observed_at.format("%Y-%m-%d %H:%M:%S")
                );
                quotes.push(quote);
            }
            Err(OfferRejected::NonPositivePrice(price)) => {
                debug!("Skipping offer {} with price {}", idx, price);
            }
            Err(e) => {
                warn!("Skipping malformed offer {}: {}", idx, e);
            }
        }
    }
    quotes
}

/// Validate one `best_flights` entry.
///
/// A missing or non-numeric price counts as zero and is rejected with the
/// other non-positive prices.
pub fn parse_offer(
    offer: &Value,
    exchange_rate: f64,
    observed_at: DateTime<Utc>,
) -> Result<Quote, OfferRejected> {
    let source_price = offer.get("price").and_then(Value::as_f64).unwrap_or(0.0);
    let price = source_price * exchange_rate;
    // NaN fails this comparison too
    if !(price > 0.0 && price.is_finite()) {
        return Err(OfferRejected::NonPositivePrice(price));
    }

    let legs = offer
        .get("flights")
        .and_then(Value::as_array)
        .ok_or(OfferRejected::MissingFlights)?;
    let first_leg = legs.first().ok_or(OfferRejected::NoLegs)?;

    let carrier = first_leg
        .get("airline")
        .and_then(Value::as_str)
        .unwrap_or(UNKNOWN_CARRIER);

    Ok(Quote::new(price, carrier, observed_at))
}
