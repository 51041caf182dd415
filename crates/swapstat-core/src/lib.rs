//! swapstat-core: swap usage and swap I/O metrics from the Linux proc
//! filesystem.
//!
//! Provides:
//! - `collector`: source parsing, rate computation and the swap collector
//! - `metric`: metric identifiers, categories and the metric catalog
//! - `config`: host configuration and the static collector description
//! - `fmt`: human-readable formatting of metric values

pub mod collector;
pub mod config;
pub mod fmt;
pub mod metric;

pub use collector::{SwapCollector, SwapError};
pub use config::Config;
pub use metric::{Category, Metric, MetricIdentifier};
