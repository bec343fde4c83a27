// Shared models for the fare watch services
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Airports
// ============================================================================

/// Airports the watcher can search between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Airport {
    Bog,
    Ctg,
    Smr,
    Baq,
}

impl Airport {
    pub const ALL: [Airport; 4] = [Airport::Bog, Airport::Ctg, Airport::Smr, Airport::Baq];

    /// IATA code as sent to the flight-search provider
    pub fn code(&self) -> &'static str {
        match self {
            Airport::Bog => "BOG",
            Airport::Ctg => "CTG",
            Airport::Smr => "SMR",
            Airport::Baq => "BAQ",
        }
    }

    /// City name used in user-facing messages
    pub fn city_name(&self) -> &'static str {
        match self {
            Airport::Bog => "BOGOTA",
            Airport::Ctg => "CARTAGENA",
            Airport::Smr => "SANTA MARTA",
            Airport::Baq => "BARRANQUILLA",
        }
    }
}

impl fmt::Display for Airport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown airport code: {0} (expected one of BOG, CTG, SMR, BAQ)")]
pub struct UnknownAirport(pub String);

impl FromStr for Airport {
    type Err = UnknownAirport;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_uppercase();
        Airport::ALL
            .into_iter()
            .find(|a| a.code() == code)
            .ok_or_else(|| UnknownAirport(s.trim().to_string()))
    }
}

// ============================================================================
// Trip parameters
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TripError {
    #[error("return date {return_date} must be after outbound date {outbound_date}")]
    ReturnNotAfterOutbound {
        outbound_date: NaiveDate,
        return_date: NaiveDate,
    },
    #[error("origin and destination are both {0}")]
    SameAirport(Airport),
}

/// A validated round trip to search for.
///
/// The only way to build one is [`TripParams::new`], so holders can rely on
/// `outbound_date < return_date` and distinct endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TripParams {
    origin: Airport,
    destination: Airport,
    outbound_date: NaiveDate,
    return_date: NaiveDate,
}

impl TripParams {
    pub fn new(
        origin: Airport,
        destination: Airport,
        outbound_date: NaiveDate,
        return_date: NaiveDate,
    ) -> Result<Self, TripError> {
        if origin == destination {
            return Err(TripError::SameAirport(origin));
        }
        if outbound_date >= return_date {
            return Err(TripError::ReturnNotAfterOutbound {
                outbound_date,
                return_date,
            });
        }
        Ok(Self {
            origin,
            destination,
            outbound_date,
            return_date,
        })
    }

    pub fn origin(&self) -> Airport {
        self.origin
    }

    pub fn destination(&self) -> Airport {
        self.destination
    }

    pub fn outbound_date(&self) -> NaiveDate {
        self.outbound_date
    }

    pub fn return_date(&self) -> NaiveDate {
        self.return_date
    }
}

// ============================================================================
// Quotes & buckets
// ============================================================================

/// One priced offer, already converted into the normalized currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub price: f64,
    pub carrier: String,
    pub observed_at: DateTime<Utc>,
}

impl Quote {
    pub fn new(price: f64, carrier: impl Into<String>, observed_at: DateTime<Utc>) -> Self {
        Self {
            price,
            carrier: carrier.into(),
            observed_at,
        }
    }
}

/// Lowest-priced quote seen inside one aggregation window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    pub window_index: u64,
    pub min_quote: Quote,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_airport_parse_case_insensitive() {
        assert_eq!("smr".parse::<Airport>().unwrap(), Airport::Smr);
        assert_eq!(" BOG ".parse::<Airport>().unwrap(), Airport::Bog);
        assert!("MDE".parse::<Airport>().is_err());
    }

    #[test]
    fn test_airport_city_names() {
        assert_eq!(Airport::Smr.city_name(), "SANTA MARTA");
        assert_eq!(Airport::Baq.to_string(), "BAQ");
    }

    #[test]
    fn test_trip_requires_return_after_outbound() {
        let err = TripParams::new(
            Airport::Bog,
            Airport::Smr,
            date("2026-11-02"),
            date("2026-11-02"),
        )
        .unwrap_err();
        assert!(matches!(err, TripError::ReturnNotAfterOutbound { .. }));

        let err = TripParams::new(
            Airport::Bog,
            Airport::Smr,
            date("2026-11-03"),
            date("2026-11-02"),
        )
        .unwrap_err();
        assert!(matches!(err, TripError::ReturnNotAfterOutbound { .. }));
    }

    #[test]
    fn test_trip_rejects_same_airport() {
        let err = TripParams::new(
            Airport::Ctg,
            Airport::Ctg,
            date("2026-11-01"),
            date("2026-11-02"),
        )
        .unwrap_err();
        assert_eq!(err, TripError::SameAirport(Airport::Ctg));
    }

    #[test]
    fn test_trip_valid() {
        let trip =
            TripParams::new(Airport::Bog, Airport::Smr, date("2026-11-01"), date("2026-11-08"))
                .unwrap();
        assert_eq!(trip.origin(), Airport::Bog);
        assert_eq!(trip.destination(), Airport::Smr);
        assert_eq!(trip.return_date(), date("2026-11-08"));
    }
}
