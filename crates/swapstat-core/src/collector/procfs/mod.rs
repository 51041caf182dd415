//! Collectors for Linux `/proc` swap sources.
//!
//! This module provides the parsers for the swap-related files of the `/proc`
//! virtual filesystem and the locator that decides which of them to read.

pub mod parser;
pub mod sources;

pub use parser::{ParseError, SwapArea, SwapIoCounters, SwapUsage};
pub use sources::{DEFAULT_PROC_PATH, IoFormat, SourceLocator, SourcePaths};
