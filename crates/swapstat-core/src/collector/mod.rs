//! Swap metrics collector for Linux.
//!
//! This module reads swap usage and swap I/O counters from the Linux `/proc`
//! filesystem and turns them into namespaced metrics, with support for
//! mocking for testing on macOS.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       SwapCollector                         │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────────┐   │
//! │  │  io          │  │  device      │  │  all             │   │
//! │  │  - vmstat    │  │  - swaps     │  │  - meminfo       │   │
//! │  │  - stat      │  │              │  │                  │   │
//! │  │  IoHistory   │  │              │  │                  │   │
//! │  └──────┬───────┘  └──────┬───────┘  └────────┬─────────┘   │
//! │         └─────────────────┼───────────────────┘             │
//! │                    ┌──────▼──────┐   ┌─────────┐            │
//! │                    │  FileSystem │   │  Clock  │ (traits)   │
//! │                    └──────┬──────┘   └─────────┘            │
//! └───────────────────────────┼─────────────────────────────────┘
//!                             │
//!              ┌──────────────┼──────────────┐
//!              │              │              │
//!       ┌──────▼──────┐ ┌─────▼───────┐ ┌────▼────────┐
//!       │   RealFs    │ │   MockFs    │ │  Scenarios  │
//!       │ (Linux)     │ │ (Testing)   │ │ (Fixtures)  │
//!       └─────────────┘ └─────────────┘ └─────────────┘
//! ```
//!
//! # Usage
//!
//! ## Production (Linux)
//!
//! ```ignore
//! use swapstat_core::collector::{RealFs, SwapCollector};
//! use swapstat_core::{Config, MetricIdentifier};
//!
//! let mut collector = SwapCollector::new(RealFs::new(), "/proc");
//! let metrics = collector
//!     .collect(&Config::new(), &MetricIdentifier::catalog())
//!     .unwrap();
//! ```
//!
//! ## Testing (with MockFs)
//!
//! ```
//! use swapstat_core::collector::{MockFs, SwapCollector};
//! use swapstat_core::{Config, MetricIdentifier};
//!
//! let collector = SwapCollector::new(MockFs::typical_swap(), "/proc");
//! let catalog = collector.discover(&Config::new()).unwrap();
//! assert_eq!(catalog.len(), 14);
//! ```

pub mod error;
pub mod mock;
pub mod procfs;
pub mod rates;
mod swap;
pub mod traits;

pub use error::SwapError;
pub use mock::{MockClock, MockFs, SwapFixture};
pub use procfs::{IoFormat, ParseError, SourceLocator};
pub use rates::{IoHistory, IoRates};
pub use swap::{ComputedMetrics, StatMap, SwapCollector};
pub use traits::{Clock, FileSystem, RealFs, SystemClock};
