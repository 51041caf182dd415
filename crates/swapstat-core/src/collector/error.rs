//! Error type for swap collection.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::collector::procfs::parser::ParseError;
use crate::metric::Category;

/// Error type for discovery and collection failures.
///
/// Every variant aborts the whole call; there is no partial result.
#[derive(Debug, Error)]
pub enum SwapError {
    /// The `proc_path` override is unusable.
    #[error("invalid proc_path {}: {reason}", .path.display())]
    Config { path: PathBuf, reason: String },

    /// A data source could not be opened or read.
    #[error("data source {} not accessible: {source}", .path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A data source contained a malformed value.
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    /// The clock did not advance since the previous I/O sample.
    #[error("invalid duration time: {elapsed_secs}s since previous swap I/O sample")]
    InvalidDuration { elapsed_secs: f64 },

    /// A requested metric has no computed value.
    #[error(
        "requested {} swap stat {} is not available",
        .category.label(),
        qualified(.device.as_deref(), .statistic)
    )]
    MetricNotFound {
        category: Category,
        statistic: String,
        device: Option<String>,
    },

    /// A requested identifier does not fit the swap namespace.
    #[error("invalid metric {metric}: {reason}")]
    InvalidMetric {
        metric: String,
        reason: &'static str,
    },
}

fn qualified(device: Option<&str>, statistic: &str) -> String {
    match device {
        Some(device) => format!("{device}/{statistic}"),
        None => statistic.to_string(),
    }
}
