//! Percentages and swap I/O rates derived from raw samples.

use chrono::{DateTime, Utc};

use crate::collector::error::SwapError;
use crate::collector::procfs::{SwapArea, SwapIoCounters, SwapUsage};

/// Returns `numerator` as a percentage of `denominator`, or 0 when the
/// denominator is zero (an empty swap area).
pub fn percentage(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        return 0.0;
    }
    100.0 * numerator / denominator
}

/// Usage of one swap area: `used_bytes`, `used_percent`, `free_bytes`,
/// `free_percent`.
pub fn device_stats(area: &SwapArea) -> [(&'static str, f64); 4] {
    let total = area.size_kb as f64;
    let used = area.used_kb as f64;
    [
        ("used_bytes", used * 1024.0),
        ("used_percent", percentage(used, total)),
        ("free_bytes", (total - used) * 1024.0),
        ("free_percent", percentage(total - used, total)),
    ]
}

/// System-wide swap usage.
///
/// Percentages are taken against `SwapTotal + SwapCached`, so with a non-zero
/// cache they do not add up to 100.
pub fn combined_stats(usage: &SwapUsage) -> [(&'static str, f64); 6] {
    let total = usage.total_kb as f64;
    let free = usage.free_kb as f64;
    let cached = usage.cached_kb as f64;
    let used = total - free;
    let denominator = total + cached;
    [
        ("used_bytes", used * 1024.0),
        ("used_percent", percentage(used, denominator)),
        ("free_bytes", free * 1024.0),
        ("free_percent", percentage(free, denominator)),
        ("cached_bytes", cached * 1024.0),
        ("cached_percent", percentage(cached, denominator)),
    ]
}

/// Previous swap I/O sample used as the baseline for rates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IoHistory {
    pub counters: SwapIoCounters,
    pub timestamp: DateTime<Utc>,
}

impl IoHistory {
    /// Zero counters at `now`, so the first rate covers everything counted
    /// since boot.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            counters: SwapIoCounters::default(),
            timestamp: now,
        }
    }

    /// Computes rates against this baseline and, on success only, moves the
    /// baseline to `current` at `now`.
    pub fn advance(
        &mut self,
        current: SwapIoCounters,
        now: DateTime<Utc>,
        page_size: u64,
    ) -> Result<IoRates, SwapError> {
        let rates = IoRates::between(self, &current, now, page_size)?;
        self.counters = current;
        self.timestamp = now;
        Ok(rates)
    }
}

/// Swap throughput in both directions.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct IoRates {
    pub in_bytes_per_sec: f64,
    pub in_pages_per_sec: f64,
    pub out_bytes_per_sec: f64,
    pub out_pages_per_sec: f64,
}

impl IoRates {
    /// Rates from `previous` to `current`.
    ///
    /// Fails with [`SwapError::InvalidDuration`] unless `now` is strictly
    /// after the previous sample.
    pub fn between(
        previous: &IoHistory,
        current: &SwapIoCounters,
        now: DateTime<Utc>,
        page_size: u64,
    ) -> Result<Self, SwapError> {
        let elapsed = now - previous.timestamp;
        let elapsed_secs = elapsed
            .num_microseconds()
            .map(|us| us as f64 / 1_000_000.0)
            .unwrap_or_else(|| elapsed.num_milliseconds() as f64 / 1000.0);
        if elapsed_secs <= 0.0 {
            return Err(SwapError::InvalidDuration { elapsed_secs });
        }

        let page_size = page_size as f64;
        let pages_in = current.pages_in as f64 - previous.counters.pages_in as f64;
        let pages_out = current.pages_out as f64 - previous.counters.pages_out as f64;

        Ok(Self {
            in_bytes_per_sec: pages_in * page_size / elapsed_secs,
            in_pages_per_sec: pages_in / elapsed_secs,
            out_bytes_per_sec: pages_out * page_size / elapsed_secs,
            out_pages_per_sec: pages_out / elapsed_secs,
        })
    }

    /// Statistic name/value pairs in catalog order.
    pub fn entries(&self) -> [(&'static str, f64); 4] {
        [
            ("in_bytes_per_sec", self.in_bytes_per_sec),
            ("in_pages_per_sec", self.in_pages_per_sec),
            ("out_bytes_per_sec", self.out_bytes_per_sec),
            ("out_pages_per_sec", self.out_pages_per_sec),
        ]
    }
}

/// Memory page size of the running system.
#[cfg(unix)]
pub fn system_page_size() -> u64 {
    // SAFETY: sysconf has no preconditions; it returns -1 for unknown names.
    let size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
    if size > 0 { size as u64 } else { 4096 }
}

/// Memory page size of the running system.
#[cfg(not(unix))]
pub fn system_page_size() -> u64 {
    4096
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn start() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    fn counters(pages_in: u64, pages_out: u64) -> SwapIoCounters {
        SwapIoCounters {
            pages_in,
            pages_out,
        }
    }

    fn stat(entries: &[(&'static str, f64)], name: &str) -> f64 {
        entries
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| *value)
            .unwrap()
    }

    #[test]
    fn test_device_stats() {
        let area = SwapArea {
            device: "dev_sda5".to_string(),
            size_kb: 55555,
            used_kb: 6666,
        };
        let stats = device_stats(&area);

        assert_eq!(stat(&stats, "used_bytes"), 6_825_984.0);
        assert_eq!(stat(&stats, "free_bytes"), 50_062_336.0);
        assert!((stat(&stats, "used_percent") - 12.0).abs() < 0.01);
        assert!((stat(&stats, "used_percent") + stat(&stats, "free_percent") - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_device_stats_empty_area() {
        let area = SwapArea {
            device: "zram0".to_string(),
            size_kb: 0,
            used_kb: 0,
        };
        let stats = device_stats(&area);
        assert_eq!(stat(&stats, "used_percent"), 0.0);
        assert_eq!(stat(&stats, "free_percent"), 0.0);
        assert_eq!(stat(&stats, "free_bytes"), 0.0);
    }

    #[test]
    fn test_device_percentages_sum_to_hundred() {
        for (size_kb, used_kb) in [(1, 0), (1, 1), (3, 1), (8_388_604, 123_457), (77777, 8888)] {
            let area = SwapArea {
                device: "swapfile".to_string(),
                size_kb,
                used_kb,
            };
            let stats = device_stats(&area);
            let sum = stat(&stats, "used_percent") + stat(&stats, "free_percent");
            assert!((sum - 100.0).abs() < 1e-9, "{size_kb}/{used_kb}: {sum}");
        }
    }

    #[test]
    fn test_combined_stats() {
        let usage = SwapUsage {
            total_kb: 99999,
            free_kb: 1010,
            cached_kb: 2020,
        };
        let stats = combined_stats(&usage);
        let denominator = 99999.0 + 2020.0;

        assert_eq!(stat(&stats, "used_bytes"), (99999.0 - 1010.0) * 1024.0);
        assert_eq!(stat(&stats, "free_bytes"), 1010.0 * 1024.0);
        assert_eq!(stat(&stats, "cached_bytes"), 2020.0 * 1024.0);
        assert!((stat(&stats, "used_percent") - 100.0 * 98989.0 / denominator).abs() < 1e-9);
        assert!((stat(&stats, "free_percent") - 100.0 * 1010.0 / denominator).abs() < 1e-9);
        assert!((stat(&stats, "cached_percent") - 100.0 * 2020.0 / denominator).abs() < 1e-9);
    }

    #[test]
    fn test_combined_bytes_add_up_without_cache() {
        let usage = SwapUsage {
            total_kb: 4_096_000,
            free_kb: 1_000_000,
            cached_kb: 0,
        };
        let stats = combined_stats(&usage);
        assert_eq!(
            stat(&stats, "used_bytes") + stat(&stats, "free_bytes"),
            4_096_000.0 * 1024.0
        );
        assert!((stat(&stats, "used_percent") + stat(&stats, "free_percent") - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_combined_stats_swap_off() {
        let stats = combined_stats(&SwapUsage::default());
        for (name, value) in stats {
            assert_eq!(value, 0.0, "{name}");
        }
    }

    #[test]
    fn test_percentage() {
        assert!((percentage(1.0, 4.0) - 25.0).abs() < 1e-9);
        assert!((percentage(6666.0, 55555.0) - 11.9989).abs() < 0.001);
        assert_eq!(percentage(1.0, 0.0), 0.0);
        assert_eq!(percentage(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_rates_between() {
        let history = IoHistory {
            counters: counters(100, 200),
            timestamp: start(),
        };
        let rates = IoRates::between(
            &history,
            &counters(150, 300),
            start() + TimeDelta::seconds(10),
            4096,
        )
        .unwrap();

        assert!((rates.in_pages_per_sec - 5.0).abs() < 1e-9);
        assert!((rates.in_bytes_per_sec - 5.0 * 4096.0).abs() < 1e-9);
        assert!((rates.out_pages_per_sec - 10.0).abs() < 1e-9);
        assert!((rates.out_bytes_per_sec - 10.0 * 4096.0).abs() < 1e-9);
    }

    #[test]
    fn test_rates_scale_with_delta() {
        let history = IoHistory::new(start());
        let now = start() + TimeDelta::milliseconds(2500);

        let single = IoRates::between(&history, &counters(1000, 40), now, 4096).unwrap();
        let double = IoRates::between(&history, &counters(2000, 80), now, 4096).unwrap();

        assert!((double.in_bytes_per_sec - 2.0 * single.in_bytes_per_sec).abs() < 1e-6);
        assert!((double.in_pages_per_sec - 2.0 * single.in_pages_per_sec).abs() < 1e-6);
        assert!((double.out_bytes_per_sec - 2.0 * single.out_bytes_per_sec).abs() < 1e-6);
        assert!((double.out_pages_per_sec - 2.0 * single.out_pages_per_sec).abs() < 1e-6);
    }

    #[test]
    fn test_zero_elapsed_is_invalid() {
        let history = IoHistory::new(start());
        let err = IoRates::between(&history, &counters(1, 1), start(), 4096).unwrap_err();
        assert!(matches!(err, SwapError::InvalidDuration { elapsed_secs } if elapsed_secs == 0.0));
    }

    #[test]
    fn test_backwards_clock_is_invalid() {
        let history = IoHistory::new(start());
        let earlier = start() - TimeDelta::seconds(1);
        let err = IoRates::between(&history, &counters(1, 1), earlier, 4096).unwrap_err();
        assert!(err.to_string().contains("invalid duration time"));
    }

    #[test]
    fn test_advance_moves_baseline_only_on_success() {
        let mut history = IoHistory::new(start());

        assert!(history.advance(counters(10, 20), start(), 4096).is_err());
        assert_eq!(history, IoHistory::new(start()));

        let later = start() + TimeDelta::seconds(1);
        let rates = history.advance(counters(10, 20), later, 4096).unwrap();
        assert!((rates.in_pages_per_sec - 10.0).abs() < 1e-9);
        assert_eq!(history.counters, counters(10, 20));
        assert_eq!(history.timestamp, later);
    }

    #[test]
    fn test_system_page_size_is_power_of_two() {
        let size = system_page_size();
        assert!(size >= 4096);
        assert!(size.is_power_of_two());
    }
}
