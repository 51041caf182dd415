//! Parsers for the `/proc` files that describe swap.
//!
//! These are pure functions that parse the content of the swap-related `/proc`
//! files into structured data. They are designed to be easily testable with
//! string inputs.

use thiserror::Error;

/// Error type for parsing failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A labelled record carried a non-numeric value.
    #[error("{field} is not a number: {value}")]
    InvalidField { field: &'static str, value: String },
    /// A per-device record carried a non-numeric size.
    #[error("{field} for {device} is not a number: {value}")]
    InvalidDeviceField {
        device: String,
        field: &'static str,
        value: String,
    },
    /// A labelled record ended before the named field.
    #[error("{record} record is missing the {field} field")]
    MissingField {
        record: &'static str,
        field: &'static str,
    },
}

/// One swap area from `/proc/swaps`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapArea {
    /// Sanitized device name, e.g. `dev_sda5` for `/dev/sda5`.
    pub device: String,
    /// Size of the area in kB.
    pub size_kb: u64,
    /// Used part of the area in kB.
    pub used_kb: u64,
}

/// System-wide swap usage from `/proc/meminfo`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SwapUsage {
    pub total_kb: u64,
    pub free_kb: u64,
    pub cached_kb: u64,
}

/// Cumulative swap page counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SwapIoCounters {
    pub pages_in: u64,
    pub pages_out: u64,
}

/// Turns a swap device path into a string usable as a metric segment.
///
/// The leading `/` is dropped and the remaining separators become `_`:
/// `/dev/mapper/swap` → `dev_mapper_swap`.
pub fn sanitize_device(path: &str) -> String {
    path.strip_prefix('/').unwrap_or(path).replace('/', "_")
}

/// Parses `/proc/swaps` content.
///
/// Format (header plus one line per area):
/// ```text
/// Filename        Type        Size    Used  Priority
/// /dev/sda5       partition   55555   6666  -1
/// ```
/// Lines that do not have exactly five fields are skipped.
pub fn parse_swaps(content: &str) -> Result<Vec<SwapArea>, ParseError> {
    let mut areas = Vec::new();

    for line in content.lines() {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() != 5 || parts[0] == "Filename" {
            continue;
        }

        let device = sanitize_device(parts[0]);
        let size_kb: u64 = parts[2]
            .parse()
            .map_err(|_| ParseError::InvalidDeviceField {
                device: device.clone(),
                field: "swap size",
                value: parts[2].to_string(),
            })?;
        let used_kb: u64 = parts[3]
            .parse()
            .map_err(|_| ParseError::InvalidDeviceField {
                device: device.clone(),
                field: "used swap size",
                value: parts[3].to_string(),
            })?;

        areas.push(SwapArea {
            device,
            size_kb,
            used_kb,
        });
    }

    Ok(areas)
}

fn parse_labelled(field: &'static str, value: &str) -> Result<u64, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidField {
        field,
        value: value.to_string(),
    })
}

/// Parses the swap lines of `/proc/meminfo`.
///
/// Only `SwapTotal:`, `SwapFree:` and `SwapCached:` are read; everything else,
/// including malformed lines, is ignored. Absent records stay at zero.
pub fn parse_meminfo_swap(content: &str) -> Result<SwapUsage, ParseError> {
    let mut usage = SwapUsage::default();

    for line in content.lines() {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 2 {
            continue;
        }

        match parts[0] {
            "SwapTotal:" => usage.total_kb = parse_labelled("SwapTotal", parts[1])?,
            "SwapFree:" => usage.free_kb = parse_labelled("SwapFree", parts[1])?,
            "SwapCached:" => usage.cached_kb = parse_labelled("SwapCached", parts[1])?,
            _ => {}
        }
    }

    Ok(usage)
}

/// Parses the swap counters of `/proc/vmstat` (kernel 2.6+).
///
/// Format: `pswpin N` and `pswpout N`, one key per line.
pub fn parse_vmstat_swap(content: &str) -> Result<SwapIoCounters, ParseError> {
    let mut counters = SwapIoCounters::default();

    for line in content.lines() {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 2 {
            continue;
        }

        match parts[0] {
            "pswpin" => counters.pages_in = parse_labelled("pswpin", parts[1])?,
            "pswpout" => counters.pages_out = parse_labelled("pswpout", parts[1])?,
            _ => {}
        }
    }

    Ok(counters)
}

/// Parses the swap counters of `/proc/stat` on kernels older than 2.6.
///
/// Format: a single `page IN OUT` record.
pub fn parse_stat_swap(content: &str) -> Result<SwapIoCounters, ParseError> {
    let mut counters = SwapIoCounters::default();

    for line in content.lines() {
        let mut parts = line.split_whitespace();
        if parts.next() != Some("page") {
            continue;
        }

        let pages_in = parts.next().ok_or(ParseError::MissingField {
            record: "page",
            field: "swap in",
        })?;
        counters.pages_in = parse_labelled("swap in metric", pages_in)?;

        let pages_out = parts.next().ok_or(ParseError::MissingField {
            record: "page",
            field: "swap out",
        })?;
        counters.pages_out = parse_labelled("swap out metric", pages_out)?;
    }

    Ok(counters)
}
