use anyhow::{Context, Result};
use dotenv::dotenv;
use fare_core::clients::{SerpApiClient, TwilioClient};
use fare_monitor_rust::display::{render_history, DisplaySurface, TerminalDisplay};
use fare_monitor_rust::notifier::PriceNotifier;
use fare_monitor_rust::{Config, FareMonitor, MonitorHandle};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const HELP: &str = "Commands: best (cheapest price so far), history, help";

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    info!("Starting Rust Fare Monitor...");

    let cfg = Config::from_env()?;
    info!(
        "Config: trip={} -> {} {}..{} rate={} window={:?} interval={:?} startup_delay={:?}",
        cfg.trip.origin(),
        cfg.trip.destination(),
        cfg.trip.outbound_date(),
        cfg.trip.return_date(),
        cfg.monitor.exchange_rate,
        cfg.monitor.window,
        cfg.monitor.poll_interval,
        cfg.monitor.startup_delay,
    );

    let search = SerpApiClient::new(
        cfg.serpapi_base_url.clone(),
        cfg.serpapi_api_key.clone(),
        cfg.serpapi_timeout,
    )
    .context("Failed to initialize flight search client")?;

    let messaging = TwilioClient::new(
        cfg.twilio_api_base_url.clone(),
        cfg.twilio_account_sid.clone(),
        cfg.twilio_auth_token.clone(),
        &cfg.twilio_from_number,
        &cfg.twilio_to_number,
    )
    .context("Failed to initialize messaging client")?;

    let notifier = PriceNotifier::new(
        Arc::new(messaging),
        cfg.monitor.destination_label.clone(),
        cfg.monitor.currency.clone(),
    );
    let display = Arc::new(TerminalDisplay::new(cfg.monitor.currency.clone()));

    let monitor = FareMonitor::new(
        cfg.trip.clone(),
        cfg.monitor.clone(),
        Arc::new(search),
        notifier,
        display.clone(),
    );
    let (handle, mut task) = monitor.spawn();

    println!("{HELP}");

    tokio::select! {
        res = &mut task => {
            error!("Fare monitor task exited: {:?}", res);
        }
        res = command_loop(handle, display, cfg.monitor.currency.clone()) => {
            if let Err(e) = res {
                error!("Command loop error: {}", e);
            }
            // stdin closed; keep monitoring until interrupted
            tokio::select! {
                _ = &mut task => error!("Fare monitor task exited"),
                _ = tokio::signal::ctrl_c() => info!("Interrupted, shutting down"),
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted, shutting down");
        }
    }

    Ok(())
}

/// Read user commands from stdin until it closes
async fn command_loop(
    handle: MonitorHandle,
    display: Arc<TerminalDisplay>,
    currency: String,
) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match line.trim().to_lowercase().as_str() {
            "" => {}
            "best" => {
                let best = handle.best_price().await?;
                display.show_best_price(best.as_ref());
            }
            "history" => {
                let history = handle.history().await?;
                if history.is_empty() {
                    println!("History is empty.");
                } else {
                    print!("{}", render_history(&history, &currency));
                }
            }
            "help" => println!("{HELP}"),
            other => warn!("Unknown command: {} ({})", other, HELP),
        }
    }
    Ok(())
}
