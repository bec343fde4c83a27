//! FareMonitor: the periodic fetch → extract → aggregate → notify loop
//!
//! A single task owns the history and runs cycles back to back on a timer:
//! - first cycle after the startup delay
//! - every later cycle `poll_interval` after the previous one completed
//! - at most one cycle in flight; commands wait for the running cycle
//!
//! Other tasks read the history through a [`MonitorHandle`].

use crate::config::MonitorSettings;
use crate::display::{CycleSummary, DisplaySurface};
use crate::notifier::PriceNotifier;
use anyhow::{anyhow, Result};
use fare_core::aggregate::aggregate;
use fare_core::clients::{FetchError, FlightSearch, MessageAck, NotifyError};
use fare_core::extract::extract;
use fare_core::history::History;
use fare_core::models::{Quote, TripParams};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, error, info};

const COMMAND_BUFFER: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    /// Waiting for the timer
    Idle,
    /// A cycle is in flight
    Running,
}

/// Result of one cycle, as seen by the loop
#[derive(Debug)]
pub enum CycleOutcome {
    /// Winner recorded and notification delivered
    Notified { quote: Quote, ack: MessageAck },
    /// Winner recorded but the notification failed
    NotifyFailed { quote: Quote, error: NotifyError },
    /// Search succeeded without any valid offer
    NoQuotes,
    FetchFailed(FetchError),
}

impl CycleOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Notified { .. } => "notified",
            Self::NotifyFailed { .. } => "notify_failed",
            Self::NoQuotes => "no_quotes",
            Self::FetchFailed(_) => "fetch_failed",
        }
    }

    /// Quote appended to the history by this cycle, if any
    pub fn winning_quote(&self) -> Option<&Quote> {
        match self {
            Self::Notified { quote, .. } | Self::NotifyFailed { quote, .. } => Some(quote),
            Self::NoQuotes | Self::FetchFailed(_) => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonitorStats {
    pub cycles: u64,
    pub notified: u64,
    pub notify_failures: u64,
    pub empty_cycles: u64,
    pub fetch_failures: u64,
}

impl MonitorStats {
    fn record(&mut self, outcome: &CycleOutcome) {
        self.cycles += 1;
        match outcome {
            CycleOutcome::Notified { .. } => self.notified += 1,
            CycleOutcome::NotifyFailed { .. } => self.notify_failures += 1,
            CycleOutcome::NoQuotes => self.empty_cycles += 1,
            CycleOutcome::FetchFailed(_) => self.fetch_failures += 1,
        }
    }
}

#[derive(Debug)]
pub enum MonitorCommand {
    BestPrice(oneshot::Sender<Option<Quote>>),
    History(oneshot::Sender<Vec<Quote>>),
}

/// Cloneable access to a running monitor
#[derive(Debug, Clone)]
pub struct MonitorHandle {
    tx: mpsc::Sender<MonitorCommand>,
}

impl MonitorHandle {
    /// Cheapest quote recorded so far
    pub async fn best_price(&self) -> Result<Option<Quote>> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(MonitorCommand::BestPrice(reply))
            .await
            .map_err(|_| anyhow!("fare monitor is not running"))?;
        rx.await.map_err(|_| anyhow!("fare monitor dropped the request"))
    }

    /// Copy of the full history, oldest first
    pub async fn history(&self) -> Result<Vec<Quote>> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(MonitorCommand::History(reply))
            .await
            .map_err(|_| anyhow!("fare monitor is not running"))?;
        rx.await.map_err(|_| anyhow!("fare monitor dropped the request"))
    }
}

pub struct FareMonitor {
    trip: TripParams,
    settings: MonitorSettings,
    search: Arc<dyn FlightSearch>,
    notifier: PriceNotifier,
    display: Arc<dyn DisplaySurface>,
    history: History,
    state: MonitorState,
    stats: MonitorStats,
}

impl FareMonitor {
    pub fn new(
        trip: TripParams,
        settings: MonitorSettings,
        search: Arc<dyn FlightSearch>,
        notifier: PriceNotifier,
        display: Arc<dyn DisplaySurface>,
    ) -> Self {
        Self {
            trip,
            settings,
            search,
            notifier,
            display,
            history: History::new(),
            state: MonitorState::Idle,
            stats: MonitorStats::default(),
        }
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn state(&self) -> MonitorState {
        self.state
    }

    pub fn stats(&self) -> &MonitorStats {
        &self.stats
    }

    /// Move the monitor onto its own task and return a handle to it
    pub fn spawn(self) -> (MonitorHandle, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(COMMAND_BUFFER);
        let task = tokio::spawn(self.run(rx));
        (MonitorHandle { tx }, task)
    }

    /// Drive cycles forever.
    ///
    /// The timer is re-armed only after a cycle completes, whatever its
    /// outcome. A closed command channel does not stop the loop.
    pub async fn run(mut self, mut commands: mpsc::Receiver<MonitorCommand>) {
        let mut next_cycle = Instant::now() + self.settings.startup_delay;
        let mut commands_open = true;

        info!(
            "Fare monitor started: {} -> {} ({} / {}), first search in {:?}, then every {:?}",
            self.trip.origin(),
            self.trip.destination(),
            self.trip.outbound_date(),
            self.trip.return_date(),
            self.settings.startup_delay,
            self.settings.poll_interval
        );

        loop {
            tokio::select! {
                _ = sleep_until(next_cycle) => {
                    let outcome = self.run_cycle().await;
                    next_cycle = Instant::now() + self.settings.poll_interval;
                    info!(
                        "Cycle {} finished: {} (history={}), next search in {:?}",
                        self.stats.cycles,
                        outcome.as_str(),
                        self.history.len(),
                        self.settings.poll_interval
                    );
                }
                cmd = commands.recv(), if commands_open => match cmd {
                    Some(cmd) => self.handle_command(cmd),
                    None => {
                        debug!("All monitor handles dropped; continuing without commands");
                        commands_open = false;
                    }
                },
            }
        }
    }

    fn handle_command(&self, cmd: MonitorCommand) {
        // A requester that went away is not an error
        match cmd {
            MonitorCommand::BestPrice(reply) => {
                let _ = reply.send(self.history.best().cloned());
            }
            MonitorCommand::History(reply) => {
                let _ = reply.send(self.history.entries().to_vec());
            }
        }
    }

    /// Run one full cycle and return to `Idle`
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        self.state = MonitorState::Running;
        let outcome = self.execute_cycle().await;
        self.stats.record(&outcome);
        self.state = MonitorState::Idle;
        outcome
    }

    async fn execute_cycle(&mut self) -> CycleOutcome {
        let raw = match self.search.fetch(&self.trip).await {
            Ok(raw) => raw,
            Err(e) => {
                error!("Flight search via {} failed: {}", self.search.provider_name(), e);
                return CycleOutcome::FetchFailed(e);
            }
        };

        let quotes = extract(&raw, self.settings.exchange_rate);
        let buckets = aggregate(&quotes, self.settings.window);

        let Some(last) = buckets.last() else {
            info!("No valid flights found in this cycle");
            self.display
                .publish(&CycleSummary::NoValidFlights, self.history.entries());
            return CycleOutcome::NoQuotes;
        };

        let quote = last.min_quote.clone();
        self.history.append(quote.clone());
        info!(
            "Cheapest this cycle: {:.2} {} with {} ({} quotes, {} windows)",
            quote.price,
            self.settings.currency,
            quote.carrier,
            quotes.len(),
            buckets.len()
        );

        let outcome = match self.notifier.notify(quote.price, &quote.carrier).await {
            Ok(ack) => CycleOutcome::Notified {
                quote: quote.clone(),
                ack,
            },
            Err(error) => {
                error!("Failed to send price notification: {}", error);
                CycleOutcome::NotifyFailed {
                    quote: quote.clone(),
                    error,
                }
            }
        };

        self.display
            .publish(&CycleSummary::Cheapest(quote), self.history.entries());
        outcome
    }
}
