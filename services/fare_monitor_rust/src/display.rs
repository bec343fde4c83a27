//! Display surface for cycle results
//!
//! The monitor publishes through [`DisplaySurface`]; [`TerminalDisplay`]
//! renders to stdout for interactive use.

use fare_core::models::Quote;
use std::io::Write;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const SEPARATOR_WIDTH: usize = 40;

/// What a finished cycle has to show
#[derive(Debug, Clone, PartialEq)]
pub enum CycleSummary {
    Cheapest(Quote),
    NoValidFlights,
}

pub trait DisplaySurface: Send + Sync {
    /// Show the latest cycle result together with the full history
    fn publish(&self, summary: &CycleSummary, history: &[Quote]);

    /// Answer the user's "best price overall" request
    fn show_best_price(&self, best: Option<&Quote>);
}

pub fn render_summary(summary: &CycleSummary, currency: &str) -> String {
    match summary {
        CycleSummary::Cheapest(quote) => format!(
            "Cheapest price found: {:.2} {}\nCarrier of the cheapest flight: {}\nTime: {}",
            quote.price,
            currency,
            quote.carrier,
            quote.observed_at.format(TIMESTAMP_FORMAT)
        ),
        CycleSummary::NoValidFlights => "No valid flights found.".to_string(),
    }
}

pub fn render_history(history: &[Quote], currency: &str) -> String {
    let separator = "-".repeat(SEPARATOR_WIDTH);
    history
        .iter()
        .map(|q| {
            format!(
                "Time: {}\nPrice: {:.2} {}\nCarrier: {}\n{}\n",
                q.observed_at.format(TIMESTAMP_FORMAT),
                q.price,
                currency,
                q.carrier,
                separator
            )
        })
        .collect()
}

pub fn render_best(best: Option<&Quote>, currency: &str) -> String {
    match best {
        Some(q) => format!(
            "The cheapest flight was at {} with a price of {:.2} {} on {}.",
            q.observed_at.format(TIMESTAMP_FORMAT),
            q.price,
            currency,
            q.carrier
        ),
        None => "No data available yet to compute the best price.".to_string(),
    }
}

/// Writes results to stdout
#[derive(Debug, Clone)]
pub struct TerminalDisplay {
    currency: String,
}

impl TerminalDisplay {
    pub fn new(currency: String) -> Self {
        Self { currency }
    }

    fn write(&self, text: &str) {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        // Write errors are ignored
        let _ = writeln!(out, "{text}");
        let _ = out.flush();
    }
}

impl DisplaySurface for TerminalDisplay {
    fn publish(&self, summary: &CycleSummary, history: &[Quote]) {
        let mut text = render_summary(summary, &self.currency);
        text.push_str("\n\n=== Flight price history ===\n");
        text.push_str(&render_history(history, &self.currency));
        self.write(&text);
    }

    fn show_best_price(&self, best: Option<&Quote>) {
        self.write(&render_best(best, &self.currency));
    }
}
