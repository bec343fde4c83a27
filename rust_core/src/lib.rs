//! Fare Watch Core - flight price polling building blocks.
//!
//! This module provides:
//! - Flight-search and messaging clients behind swappable traits
//! - Offer extraction with currency conversion
//! - Windowed minimum aggregation
//! - The in-memory best-price history

pub mod aggregate;
pub mod clients;
pub mod extract;
pub mod history;
pub mod models;

pub use aggregate::aggregate;
pub use extract::{extract, extract_at};
pub use history::History;
pub use models::{Airport, Bucket, Quote, TripParams};
