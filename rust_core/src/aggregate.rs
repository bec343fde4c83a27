//! Windowed minimum aggregation
//!
//! Quotes are grouped into fixed-width windows measured from the first quote
//! in the sequence, and each window keeps its cheapest quote.

use crate::models::{Bucket, Quote};
use std::collections::BTreeMap;
use std::time::Duration;

/// Default width of one aggregation window
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(30);

/// Window index of `quote` relative to `t0`.
///
/// Quotes observed before `t0` land in window 0.
pub fn window_index(quote: &Quote, t0: &Quote, window: Duration) -> u64 {
    let elapsed = quote
        .observed_at
        .signed_duration_since(t0.observed_at)
        .to_std()
        .unwrap_or(Duration::ZERO);
    let width = window.as_nanos().max(1);
    (elapsed.as_nanos() / width) as u64
}

/// Bucket `quotes` by window and keep the minimum price per window.
///
/// Buckets come back ordered by window index. Ties on price keep the quote
/// that appears first in `quotes`.
pub fn aggregate(quotes: &[Quote], window: Duration) -> Vec<Bucket> {
    let Some(first) = quotes.first() else {
        return Vec::new();
    };

    let mut minima: BTreeMap<u64, &Quote> = BTreeMap::new();
    for quote in quotes {
        let idx = window_index(quote, first, window);
        minima
            .entry(idx)
            .and_modify(|current| {
                // Strict comparison keeps the first-seen quote on ties
                if quote.price < current.price {
                    *current = quote;
                }
            })
            .or_insert(quote);
    }

    minima
        .into_iter()
        .map(|(window_index, quote)| Bucket {
            window_index,
            min_quote: quote.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};
    use std::collections::HashSet;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
    }

    fn q(price: f64, carrier: &str, secs: i64) -> Quote {
        Quote::new(price, carrier, t0() + ChronoDuration::seconds(secs))
    }

    #[test]
    fn test_empty_input() {
        assert!(aggregate(&[], DEFAULT_WINDOW).is_empty());
    }

    #[test]
    fn test_single_window_minimum_first_seen() {
        let rate = 4300.0;
        let quotes = vec![
            q(10.0 * rate, "A", 0),
            q(5.0 * rate, "B", 1),
            q(5.0 * rate, "C", 2),
            q(8.0 * rate, "D", 3),
        ];
        let buckets = aggregate(&quotes, DEFAULT_WINDOW);
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].window_index, 0);
        assert_eq!(buckets[0].min_quote.price, 5.0 * rate);
        assert_eq!(buckets[0].min_quote.carrier, "B");
    }

    #[test]
    fn test_multiple_windows_ordered() {
        let quotes = vec![
            q(300.0, "A", 0),
            q(100.0, "B", 65),
            q(200.0, "C", 29),
            q(50.0, "D", 30),
            q(90.0, "E", 61),
        ];
        let buckets = aggregate(&quotes, DEFAULT_WINDOW);
        let indices: Vec<u64> = buckets.iter().map(|b| b.window_index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(buckets[0].min_quote.carrier, "C");
        assert_eq!(buckets[1].min_quote.carrier, "D");
        assert_eq!(buckets[2].min_quote.carrier, "E");
    }

    #[test]
    fn test_windows_measured_from_first_in_sequence() {
        // The first quote is not the earliest one
        let quotes = vec![q(10.0, "A", 40), q(20.0, "B", 0), q(30.0, "C", 75)];
        let buckets = aggregate(&quotes, DEFAULT_WINDOW);
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].window_index, 0);
        assert_eq!(buckets[0].min_quote.carrier, "A");
        assert_eq!(buckets[1].window_index, 1);
        assert_eq!(buckets[1].min_quote.carrier, "C");
    }

    #[test]
    fn test_no_duplicate_windows_and_minimum_property() {
        let quotes: Vec<Quote> = (0..200)
            .map(|i| q(((i * 37) % 101) as f64 + 1.0, &format!("C{i}"), (i * 7) % 180))
            .collect();
        let buckets = aggregate(&quotes, DEFAULT_WINDOW);

        let unique: HashSet<u64> = buckets.iter().map(|b| b.window_index).collect();
        assert_eq!(unique.len(), buckets.len());

        for bucket in &buckets {
            let in_window: Vec<&Quote> = quotes
                .iter()
                .filter(|x| window_index(x, &quotes[0], DEFAULT_WINDOW) == bucket.window_index)
                .collect();
            assert!(in_window.iter().all(|x| bucket.min_quote.price <= x.price));
            let first_min = in_window
                .iter()
                .find(|x| x.price == bucket.min_quote.price)
                .unwrap();
            assert_eq!(first_min.carrier, bucket.min_quote.carrier);
        }
    }

    #[test]
    fn test_idempotent() {
        let quotes = vec![q(3.0, "A", 0), q(1.0, "B", 45), q(2.0, "C", 10)];
        assert_eq!(
            aggregate(&quotes, DEFAULT_WINDOW),
            aggregate(&quotes, DEFAULT_WINDOW)
        );
    }

    #[test]
    fn test_custom_window_width() {
        let quotes = vec![q(3.0, "A", 0), q(1.0, "B", 10), q(2.0, "C", 20)];
        let buckets = aggregate(&quotes, Duration::from_secs(10));
        assert_eq!(buckets.len(), 3);
    }
}
