//! Test doubles shared by the monitor integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::NaiveDate;
use fare_core::clients::{
    FetchError, FlightSearch, MessageAck, MessageSender, NotifyError, RawResponse,
};
use fare_core::models::{Airport, Quote, TripParams};
use fare_monitor_rust::display::{CycleSummary, DisplaySurface};
use fare_monitor_rust::notifier::PriceNotifier;
use fare_monitor_rust::{FareMonitor, MonitorSettings};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// One scripted response from the fake search provider
pub enum Step {
    Offers(Value),
    Status(u16),
    /// Request never reached the provider
    Transport,
}

/// Build a payload from `(price, airline)` pairs
pub fn offers(entries: &[(f64, &str)]) -> Step {
    let best: Vec<Value> = entries
        .iter()
        .map(|(price, airline)| json!({"price": price, "flights": [{"airline": airline}]}))
        .collect();
    Step::Offers(json!({ "best_flights": best }))
}

/// Replays scripted steps; an exhausted script answers with no offers
#[derive(Default)]
pub struct ScriptedSearch {
    script: Mutex<VecDeque<Step>>,
    calls: AtomicUsize,
}

impl ScriptedSearch {
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            script: Mutex::new(steps.into()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

/// A real `reqwest::Error` without touching the network
fn transport_error() -> reqwest::Error {
    reqwest::Client::new()
        .get("not a url")
        .build()
        .unwrap_err()
}

#[async_trait]
impl FlightSearch for ScriptedSearch {
    async fn fetch(&self, _trip: &TripParams) -> Result<RawResponse, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let step = self.script.lock().unwrap().pop_front();
        match step {
            Some(Step::Offers(body)) => Ok(RawResponse::new(body)),
            Some(Step::Status(status)) => Err(FetchError::Status {
                status,
                body: "upstream error".to_string(),
            }),
            Some(Step::Transport) => Err(FetchError::Transport(transport_error())),
            None => Ok(RawResponse::new(json!({ "best_flights": [] }))),
        }
    }

    fn provider_name(&self) -> &str {
        "scripted"
    }
}

#[derive(Default)]
pub struct RecordingSender {
    pub sent: Mutex<Vec<String>>,
    fail: AtomicBool,
}

impl RecordingSender {
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessageSender for RecordingSender {
    async fn send(&self, body: &str) -> Result<MessageAck, NotifyError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(NotifyError::Rejected {
                status: 500,
                body: "messaging down".to_string(),
            });
        }
        let mut sent = self.sent.lock().unwrap();
        sent.push(body.to_string());
        Ok(MessageAck {
            sid: format!("SM{}", sent.len()),
        })
    }
}

/// Records every publish as (summary, history length)
#[derive(Default)]
pub struct RecordingDisplay {
    pub published: Mutex<Vec<(CycleSummary, usize)>>,
    pub best_requests: Mutex<Vec<Option<Quote>>>,
}

impl RecordingDisplay {
    pub fn published(&self) -> Vec<(CycleSummary, usize)> {
        self.published.lock().unwrap().clone()
    }
}

impl DisplaySurface for RecordingDisplay {
    fn publish(&self, summary: &CycleSummary, history: &[Quote]) {
        self.published
            .lock()
            .unwrap()
            .push((summary.clone(), history.len()));
    }

    fn show_best_price(&self, best: Option<&Quote>) {
        self.best_requests.lock().unwrap().push(best.cloned());
    }
}

pub fn trip() -> TripParams {
    TripParams::new(
        Airport::Bog,
        Airport::Smr,
        NaiveDate::from_ymd_opt(2026, 11, 1).unwrap(),
        NaiveDate::from_ymd_opt(2026, 11, 8).unwrap(),
    )
    .unwrap()
}

pub struct Harness {
    pub search: Arc<ScriptedSearch>,
    pub sender: Arc<RecordingSender>,
    pub display: Arc<RecordingDisplay>,
    pub monitor: FareMonitor,
}

pub fn harness(steps: Vec<Step>, settings: MonitorSettings) -> Harness {
    let search = Arc::new(ScriptedSearch::new(steps));
    let sender = Arc::new(RecordingSender::default());
    let display = Arc::new(RecordingDisplay::default());
    let notifier = PriceNotifier::new(
        sender.clone(),
        settings.destination_label.clone(),
        settings.currency.clone(),
    );
    let monitor = FareMonitor::new(trip(), settings, search.clone(), notifier, display.clone());
    Harness {
        search,
        sender,
        display,
        monitor,
    }
}
