//! fare_monitor_rust - polls flight prices and alerts on the cheapest fare

pub mod config;
pub mod display;
pub mod monitor;
pub mod notifier;

pub use config::{Config, MonitorSettings};
pub use monitor::{CycleOutcome, FareMonitor, MonitorHandle, MonitorState};
