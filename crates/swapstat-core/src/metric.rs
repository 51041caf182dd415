//! Metric namespace: identifiers, categories and collected values.
//!
//! Every swap metric lives under `intel/procfs/swap/{category}/...`:
//!
//! ```text
//! intel/procfs/swap/io/in_bytes_per_sec
//! intel/procfs/swap/device/*/used_percent      (template, any device)
//! intel/procfs/swap/device/dev_sda5/used_bytes (concrete device)
//! intel/procfs/swap/all/cached_bytes
//! ```

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::collector::error::SwapError;

/// First namespace segment.
pub const VENDOR: &str = "intel";
/// Second namespace segment.
pub const SOURCE_KIND: &str = "procfs";
/// Third namespace segment.
pub const PLUGIN_NAME: &str = "swap";
/// Device segment meaning "every known device".
pub const WILDCARD: &str = "*";

/// Statistics of the `io` category.
pub const IO_METRICS: [&str; 4] = [
    "in_bytes_per_sec",
    "in_pages_per_sec",
    "out_bytes_per_sec",
    "out_pages_per_sec",
];

/// Statistics of the `device` category.
pub const DEVICE_METRICS: [&str; 4] = ["used_bytes", "used_percent", "free_bytes", "free_percent"];

/// Statistics of the `all` category.
pub const COMBINED_METRICS: [&str; 6] = [
    "used_bytes",
    "used_percent",
    "free_bytes",
    "free_percent",
    "cached_bytes",
    "cached_percent",
];

/// Group of metrics backed by one data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Swap-in/swap-out rates.
    Io,
    /// Per swap area usage.
    Device,
    /// System-wide usage.
    All,
}

impl Category {
    /// Namespace segment of this category.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Io => "io",
            Category::Device => "device",
            Category::All => "all",
        }
    }

    /// Human-readable name used in error messages.
    pub fn label(self) -> &'static str {
        match self {
            Category::Io => "IO",
            Category::Device => "per device",
            Category::All => "combined",
        }
    }

    /// Statistics that this category can produce.
    pub fn statistics(self) -> &'static [&'static str] {
        match self {
            Category::Io => &IO_METRICS,
            Category::Device => &DEVICE_METRICS,
            Category::All => &COMBINED_METRICS,
        }
    }

    fn from_segment(segment: &str) -> Option<Self> {
        match segment {
            "io" => Some(Category::Io),
            "device" => Some(Category::Device),
            "all" => Some(Category::All),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a single identifier asks for, once validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target<'a> {
    /// A statistic of the `io` category.
    Io(&'a str),
    /// A statistic of one device, or of every device when `device` is `None`.
    Device {
        device: Option<&'a str>,
        statistic: &'a str,
    },
    /// A statistic of the `all` category.
    All(&'a str),
}

impl Target<'_> {
    pub fn category(&self) -> Category {
        match self {
            Target::Io(_) => Category::Io,
            Target::Device { .. } => Category::Device,
            Target::All(_) => Category::All,
        }
    }
}

/// Ordered namespace path naming one metric or a family of metrics.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct MetricIdentifier {
    segments: Vec<String>,
}

impl MetricIdentifier {
    /// Builds an identifier from raw segments.
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// Builds an identifier under the swap namespace.
    ///
    /// `device` is only meaningful for [`Category::Device`]; pass
    /// [`WILDCARD`] for the per-device template.
    pub fn swap(category: Category, device: Option<&str>, statistic: &str) -> Self {
        let mut segments = vec![VENDOR, SOURCE_KIND, PLUGIN_NAME, category.as_str()];
        if let Some(device) = device {
            segments.push(device);
        }
        segments.push(statistic);
        Self::new(segments)
    }

    /// Every identifier the swap collector can produce; per-device entries
    /// carry the wildcard device segment.
    pub fn catalog() -> Vec<Self> {
        let io = IO_METRICS
            .iter()
            .map(|stat| Self::swap(Category::Io, None, stat));
        let devices = DEVICE_METRICS
            .iter()
            .map(|stat| Self::swap(Category::Device, Some(WILDCARD), stat));
        let combined = COMBINED_METRICS
            .iter()
            .map(|stat| Self::swap(Category::All, None, stat));
        io.chain(devices).chain(combined).collect()
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Category segment, if present and known.
    pub fn category(&self) -> Option<Category> {
        self.segments
            .get(3)
            .and_then(|segment| Category::from_segment(segment))
    }

    /// Copy of this identifier with the device segment replaced.
    pub fn with_device(&self, device: &str) -> Self {
        let mut segments = self.segments.clone();
        if let Some(segment) = segments.get_mut(4) {
            *segment = device.to_string();
        }
        Self { segments }
    }

    /// Validates the shape of the identifier and extracts what it asks for.
    pub fn target(&self) -> Result<Target<'_>, SwapError> {
        let invalid = |reason: &'static str| SwapError::InvalidMetric {
            metric: self.to_string(),
            reason,
        };

        if self.segments.len() < 5 {
            return Err(invalid("expected at least 5 namespace segments"));
        }
        let category = self.category().ok_or_else(|| invalid("unknown swap category"))?;

        match (category, self.segments.len()) {
            (Category::Io, 5) => Ok(Target::Io(&self.segments[4])),
            (Category::All, 5) => Ok(Target::All(&self.segments[4])),
            (Category::Device, 6) => {
                let device = self.segments[4].as_str();
                Ok(Target::Device {
                    device: (device != WILDCARD).then_some(device),
                    statistic: &self.segments[5],
                })
            }
            (Category::Device, _) => Err(invalid("per device metrics need a device segment")),
            _ => Err(invalid("unexpected segment after the statistic")),
        }
    }
}

impl fmt::Display for MetricIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("/"))
    }
}

impl FromStr for MetricIdentifier {
    type Err = SwapError;

    /// Parses `intel/procfs/swap/io/in_bytes_per_sec`; a leading `/` is allowed.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_start_matches('/');
        let segments: Vec<&str> = trimmed.split('/').collect();
        if segments.iter().any(|segment| segment.is_empty()) {
            return Err(SwapError::InvalidMetric {
                metric: s.to_string(),
                reason: "empty namespace segment",
            });
        }
        Ok(Self::new(segments))
    }
}

impl From<MetricIdentifier> for String {
    fn from(id: MetricIdentifier) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for MetricIdentifier {
    type Error = SwapError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// One collected value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metric {
    pub id: MetricIdentifier,
    pub value: f64,
    pub timestamp: DateTime<Utc>,
}
