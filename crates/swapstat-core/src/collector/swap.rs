//! Swap collector: turns the swap sources into namespaced metrics.
//!
//! The collector answers two calls from its host:
//!
//! - [`SwapCollector::discover`] lists every metric it can produce;
//! - [`SwapCollector::collect`] reads only the sources needed for the
//!   requested metrics and returns their values.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use tracing::{debug, warn};

use crate::collector::error::SwapError;
use crate::collector::procfs::parser::{
    ParseError, parse_meminfo_swap, parse_stat_swap, parse_swaps, parse_vmstat_swap,
};
use crate::collector::procfs::sources::validate_proc_path;
use crate::collector::procfs::{IoFormat, SourceLocator};
use crate::collector::rates::{IoHistory, combined_stats, device_stats, system_page_size};
use crate::collector::traits::{Clock, FileSystem, SystemClock};
use crate::config::Config;
use crate::metric::{Category, Metric, MetricIdentifier, Target, WILDCARD};

/// Statistic name to value.
pub type StatMap = HashMap<String, f64>;

/// Values computed by the most recent poll of each category.
#[derive(Debug, Clone, Default)]
pub struct ComputedMetrics {
    /// I/O rates.
    pub io: StatMap,
    /// Sanitized device name to its statistics.
    pub devices: HashMap<String, StatMap>,
    /// System-wide usage.
    pub combined: StatMap,
}

impl ComputedMetrics {
    /// Value of a single (non-wildcard) target.
    fn lookup(&self, target: &Target<'_>) -> Result<f64, SwapError> {
        let value = match *target {
            Target::Io(statistic) => self.io.get(statistic),
            Target::All(statistic) => self.combined.get(statistic),
            Target::Device {
                device: Some(device),
                statistic,
            } => self
                .devices
                .get(device)
                .and_then(|stats| stats.get(statistic)),
            Target::Device { device: None, .. } => None,
        };

        value.copied().ok_or_else(|| match *target {
            Target::Io(statistic) | Target::All(statistic) => SwapError::MetricNotFound {
                category: target.category(),
                statistic: statistic.to_string(),
                device: None,
            },
            Target::Device { device, statistic } => SwapError::MetricNotFound {
                category: Category::Device,
                statistic: statistic.to_string(),
                device: Some(device.unwrap_or(WILDCARD).to_string()),
            },
        })
    }
}

fn stat_map<'a>(entries: impl IntoIterator<Item = &'a (&'static str, f64)>) -> StatMap {
    entries
        .into_iter()
        .map(|(name, value)| (name.to_string(), *value))
        .collect()
}

/// Collects swap metrics from the `/proc` swap sources.
pub struct SwapCollector<F: FileSystem, C: Clock = SystemClock> {
    fs: F,
    clock: C,
    page_size: u64,
    default_base: PathBuf,
    /// `None` until the first successful configuration.
    sources: Mutex<Option<SourceLocator>>,
    history: IoHistory,
    metrics: ComputedMetrics,
}

impl<F: FileSystem> SwapCollector<F> {
    /// Creates a new swap collector using the system clock.
    ///
    /// # Arguments
    /// * `fs` - Filesystem implementation (real or mock)
    /// * `proc_path` - Base path used unless the first configuration
    ///   overrides it (usually "/proc")
    pub fn new(fs: F, proc_path: impl Into<PathBuf>) -> Self {
        Self::with_clock(fs, SystemClock, proc_path)
    }
}

impl<F: FileSystem, C: Clock> SwapCollector<F, C> {
    /// Creates a new swap collector with an explicit clock.
    ///
    /// The I/O history starts with zero counters at the current time.
    pub fn with_clock(fs: F, clock: C, proc_path: impl Into<PathBuf>) -> Self {
        let history = IoHistory::new(clock.now());
        Self {
            fs,
            clock,
            page_size: system_page_size(),
            default_base: proc_path.into(),
            sources: Mutex::new(None),
            history,
            metrics: ComputedMetrics::default(),
        }
    }

    /// Overrides the memory page size used for byte rates.
    pub fn with_page_size(mut self, page_size: u64) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Values computed by the most recent polls.
    pub fn metrics(&self) -> &ComputedMetrics {
        &self.metrics
    }

    /// Baseline of the next I/O rate computation.
    pub fn history(&self) -> &IoHistory {
        &self.history
    }

    /// Returns `true` once a configuration has been applied.
    pub fn is_configured(&self) -> bool {
        self.sources
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Applies `config` if no configuration has been applied yet.
    ///
    /// The first successful call fixes the base path (the `proc_path`
    /// override, or the default) and detects the I/O format. Later calls
    /// return the existing sources and ignore their configuration. A failing
    /// call leaves the collector unconfigured.
    pub fn configure(&self, config: &Config) -> Result<SourceLocator, SwapError> {
        let mut sources = self.sources.lock().unwrap_or_else(PoisonError::into_inner);
        self.configure_locked(&mut sources, config).cloned()
    }

    /// Configures `sources` unless already configured. The caller holds the
    /// sources lock.
    fn configure_locked<'s>(
        &self,
        sources: &'s mut Option<SourceLocator>,
        config: &Config,
    ) -> Result<&'s mut SourceLocator, SwapError> {
        let locator = match sources.take() {
            Some(locator) => locator,
            None => {
                let base = match config.proc_path() {
                    Some(path) => validate_proc_path(&self.fs, path)?,
                    None => self.default_base.clone(),
                };
                let locator = SourceLocator::locate(&self.fs, base);
                debug!(
                    proc_path = %locator.base().display(),
                    io_format = ?locator.io_format(),
                    "swap collector configured"
                );
                locator
            }
        };
        Ok(sources.insert(locator))
    }

    /// Lists every metric this collector can produce.
    ///
    /// Re-detects the I/O format and fails if any required source cannot be
    /// opened. Per-device metrics are returned as templates with a wildcard
    /// device segment.
    pub fn discover(&self, config: &Config) -> Result<Vec<MetricIdentifier>, SwapError> {
        let locator = {
            let mut sources = self.sources.lock().unwrap_or_else(PoisonError::into_inner);
            let locator = self.configure_locked(&mut sources, config)?;
            locator.detect_io_format(&self.fs);
            locator.clone()
        };

        locator.check_accessible(&self.fs)?;
        Ok(MetricIdentifier::catalog())
    }

    /// Collects the requested metrics.
    ///
    /// Each category is read at most once per call. Results keep the request
    /// order; a wildcard device segment expands to one result per device in
    /// no particular order. All results share one timestamp. Any failure
    /// fails the whole call.
    pub fn collect(
        &mut self,
        config: &Config,
        requested: &[MetricIdentifier],
    ) -> Result<Vec<Metric>, SwapError> {
        let locator = self.configure(config)?;

        let targets = requested
            .iter()
            .map(|id| id.target().map(|target| (id, target)))
            .collect::<Result<Vec<_>, _>>()?;

        // Nothing is committed until every refresh and lookup has succeeded.
        let mut staged = self.metrics.clone();
        let mut next_history = None;
        let mut refreshed = HashSet::new();
        for (_, target) in &targets {
            let category = target.category();
            if !refreshed.insert(category) {
                continue;
            }
            match category {
                Category::Device => staged.devices = self.read_devices(&locator.paths().swaps)?,
                Category::All => staged.combined = self.read_combined(&locator.paths().meminfo)?,
                Category::Io => {
                    let (history, rates) =
                        self.read_io(locator.io_path(), locator.io_format())?;
                    staged.io = rates;
                    next_history = Some(history);
                }
            }
        }

        let timestamp = self.clock.now();
        let mut metrics = Vec::with_capacity(targets.len());
        for (id, target) in targets {
            match target {
                Target::Device {
                    device: None,
                    statistic,
                } => {
                    let known = Category::Device.statistics();
                    if !known.iter().any(|name| *name == statistic) {
                        return Err(SwapError::MetricNotFound {
                            category: Category::Device,
                            statistic: statistic.to_string(),
                            device: Some(WILDCARD.to_string()),
                        });
                    }
                    for (device, stats) in &staged.devices {
                        if let Some(&value) = stats.get(statistic) {
                            metrics.push(Metric {
                                id: id.with_device(device),
                                value,
                                timestamp,
                            });
                        }
                    }
                }
                target => {
                    let value = staged.lookup(&target)?;
                    metrics.push(Metric {
                        id: id.clone(),
                        value,
                        timestamp,
                    });
                }
            }
        }

        self.metrics = staged;
        if let Some(history) = next_history {
            self.history = history;
        }
        Ok(metrics)
    }

    fn read_source(&self, path: &Path) -> Result<String, SwapError> {
        self.fs
            .read_to_string(path)
            .map_err(|source| SwapError::SourceUnavailable {
                path: path.to_path_buf(),
                source,
            })
    }

    fn read_devices(&self, path: &Path) -> Result<HashMap<String, StatMap>, SwapError> {
        let content = self.read_source(path)?;
        let areas = parse_swaps(&content).map_err(|e| parse_error(path, e))?;
        debug!(devices = areas.len(), "swap devices read");

        Ok(areas
            .iter()
            .map(|area| (area.device.clone(), stat_map(&device_stats(area))))
            .collect())
    }

    fn read_combined(&self, path: &Path) -> Result<StatMap, SwapError> {
        let content = self.read_source(path)?;
        let usage = parse_meminfo_swap(&content).map_err(|e| parse_error(path, e))?;

        if usage.total_kb == 0 {
            warn!("total size of swap is zero, swap might be turned off");
        }
        Ok(stat_map(&combined_stats(&usage)))
    }

    /// Rates since the current baseline, plus the baseline to keep if the
    /// poll succeeds.
    fn read_io(&self, path: &Path, format: IoFormat) -> Result<(IoHistory, StatMap), SwapError> {
        let content = self.read_source(path)?;
        let counters = match format {
            IoFormat::Vmstat => parse_vmstat_swap(&content),
            IoFormat::Stat => parse_stat_swap(&content),
        }
        .map_err(|e| parse_error(path, e))?;

        let mut history = self.history;
        let rates = history.advance(counters, self.clock.now(), self.page_size)?;
        Ok((history, stat_map(&rates.entries())))
    }
}

fn parse_error(path: &Path, source: ParseError) -> SwapError {
    SwapError::Parse {
        path: path.to_path_buf(),
        source,
    }
}
