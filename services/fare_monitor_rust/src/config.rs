//! Configuration for fare_monitor_rust

use anyhow::{anyhow, Context, Result};
use chrono::{Duration as ChronoDuration, NaiveDate, Utc};
use fare_core::clients::{serpapi, twilio};
use fare_core::models::{Airport, TripParams};
use std::env;
use std::time::Duration;

pub const DEFAULT_EXCHANGE_RATE: f64 = 4300.0;
pub const DEFAULT_CURRENCY: &str = "COP";
pub const DEFAULT_WINDOW_SECS: u64 = 30;
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;
pub const DEFAULT_STARTUP_DELAY_SECS: u64 = 10;

/// Knobs the monitor loop needs, independent of credentials.
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorSettings {
    /// Multiplier from the provider's currency into `currency`
    pub exchange_rate: f64,
    pub currency: String,
    pub window: Duration,
    pub poll_interval: Duration,
    pub startup_delay: Duration,
    /// Destination name embedded in notifications
    pub destination_label: String,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            exchange_rate: DEFAULT_EXCHANGE_RATE,
            currency: DEFAULT_CURRENCY.to_string(),
            window: Duration::from_secs(DEFAULT_WINDOW_SECS),
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            startup_delay: Duration::from_secs(DEFAULT_STARTUP_DELAY_SECS),
            destination_label: Airport::Smr.city_name().to_string(),
        }
    }
}

impl MonitorSettings {
    pub fn validate(&self) -> Result<()> {
        if !(self.exchange_rate > 0.0 && self.exchange_rate.is_finite()) {
            return Err(anyhow!("FARE_EXCHANGE_RATE must be > 0"));
        }
        if self.window.is_zero() {
            return Err(anyhow!("FARE_WINDOW_SECS must be > 0"));
        }
        if self.poll_interval.is_zero() {
            return Err(anyhow!("FARE_POLL_INTERVAL_SECS must be > 0"));
        }
        if self.currency.trim().is_empty() {
            return Err(anyhow!("FARE_CURRENCY must not be empty"));
        }
        if self.destination_label.trim().is_empty() {
            return Err(anyhow!("NOTIFY_DESTINATION_LABEL must not be empty"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub serpapi_base_url: String,
    pub serpapi_api_key: String,
    pub serpapi_timeout: Option<Duration>,

    pub trip: TripParams,
    pub monitor: MonitorSettings,

    pub twilio_api_base_url: String,
    pub twilio_account_sid: String,
    pub twilio_auth_token: String,
    pub twilio_from_number: String,
    pub twilio_to_number: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let serpapi_base_url =
            env::var("SERPAPI_BASE_URL").unwrap_or_else(|_| serpapi::DEFAULT_BASE_URL.to_string());
        let serpapi_api_key = required_env("SERPAPI_API_KEY")?;
        let serpapi_timeout = parse_timeout_env("SERPAPI_TIMEOUT_SECS")?;

        let origin = parse_airport_env("FARE_ORIGIN", Airport::Bog)?;
        let destination = parse_airport_env("FARE_DESTINATION", Airport::Smr)?;
        let today = Utc::now().date_naive();
        let outbound_date = parse_date_env("FARE_OUTBOUND_DATE", today + ChronoDuration::days(6))?;
        let return_date = parse_date_env("FARE_RETURN_DATE", today + ChronoDuration::days(7))?;
        let trip = TripParams::new(origin, destination, outbound_date, return_date)
            .context("Invalid trip configuration")?;

        let monitor = MonitorSettings {
            exchange_rate: parse_f64_env("FARE_EXCHANGE_RATE", DEFAULT_EXCHANGE_RATE)?,
            currency: env::var("FARE_CURRENCY").unwrap_or_else(|_| DEFAULT_CURRENCY.to_string()),
            window: Duration::from_secs(parse_u64_env("FARE_WINDOW_SECS", DEFAULT_WINDOW_SECS)?),
            poll_interval: Duration::from_secs(parse_u64_env(
                "FARE_POLL_INTERVAL_SECS",
                DEFAULT_POLL_INTERVAL_SECS,
            )?),
            startup_delay: Duration::from_secs(parse_u64_env(
                "FARE_STARTUP_DELAY_SECS",
                DEFAULT_STARTUP_DELAY_SECS,
            )?),
            destination_label: destination_label_env("NOTIFY_DESTINATION_LABEL", destination),
        };
        monitor.validate()?;

        Ok(Self {
            serpapi_base_url,
            serpapi_api_key,
            serpapi_timeout,
            trip,
            monitor,
            twilio_api_base_url: env::var("TWILIO_API_BASE_URL")
                .unwrap_or_else(|_| twilio::DEFAULT_BASE_URL.to_string()),
            twilio_account_sid: required_env("TWILIO_ACCOUNT_SID")?,
            twilio_auth_token: required_env("TWILIO_AUTH_TOKEN")?,
            twilio_from_number: required_env("TWILIO_WHATSAPP_NUMBER")?,
            twilio_to_number: required_env("TWILIO_TO_WHATSAPP_NUMBER")?,
        })
    }
}

fn required_env(key: &str) -> Result<String> {
    let val = env::var(key).with_context(|| format!("{key} must be set"))?;
    if val.trim().is_empty() {
        return Err(anyhow!("{key} must not be empty"));
    }
    Ok(val.trim().to_string())
}

fn parse_u64_env(key: &str, default: u64) -> Result<u64> {
    let raw = env::var(key).unwrap_or_else(|_| default.to_string());
    raw.trim()
        .parse::<u64>()
        .with_context(|| format!("Invalid {key}: {raw} (expected integer)"))
}

/// Unset means "use the transport default"; a set value must be a positive
/// number of seconds.
fn parse_timeout_env(key: &str) -> Result<Option<Duration>> {
    match env::var(key) {
        Ok(raw) => parse_timeout(key, &raw).map(Some),
        Err(_) => Ok(None),
    }
}

fn parse_timeout(key: &str, raw: &str) -> Result<Duration> {
    let secs = raw
        .trim()
        .parse::<u64>()
        .with_context(|| format!("Invalid {key}: {raw} (expected integer)"))?;
    if secs == 0 {
        return Err(anyhow!("{key} must be > 0"));
    }
    Ok(Duration::from_secs(secs))
}

fn parse_f64_env(key: &str, default: f64) -> Result<f64> {
    match env::var(key) {
        Ok(val) => val
            .trim()
            .parse()
            .map_err(|_| anyhow!("{key} must be a valid number, got {val}")),
        Err(_) => Ok(default),
    }
}

fn parse_airport_env(key: &str, default: Airport) -> Result<Airport> {
    match env::var(key) {
        Ok(val) => val.parse().with_context(|| format!("Invalid {key}")),
        Err(_) => Ok(default),
    }
}

/// Label used in notifications, defaulting to the destination's city name
fn destination_label_env(key: &str, destination: Airport) -> String {
    env::var(key).unwrap_or_else(|_| destination.city_name().to_string())
}

fn parse_date_env(key: &str, default: NaiveDate) -> Result<NaiveDate> {
    match env::var(key) {
        Ok(raw) => parse_date(&raw)
            .with_context(|| format!("Invalid {key}: {raw} (expected YYYY-MM-DD)")),
        Err(_) => Ok(default),
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    Ok(NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")?)
}
