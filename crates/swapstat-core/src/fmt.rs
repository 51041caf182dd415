//! Human-readable formatting of swap metric values for log lines.
//!
//! Functions that differ between terse log fields and verbose listings are
//! parameterized via [`FmtStyle`].

use crate::metric::Metric;

/// Controls compact (log fields) vs verbose (listings) output.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum FmtStyle {
    /// Compact: no spaces, short suffixes ("1.5G")
    Compact,
    /// Detail: spaces, full suffixes ("1.5 GiB")
    Detail,
}

/// Format byte count as human-readable size.
///
/// Compact: `"1.5G"`, `"100.3M"`, `"50.0K"`, `"512B"`
/// Detail:  `"1.5 GiB"`, `"100.3 MiB"`, `"50.0 KiB"`, `"512 B"`
pub fn format_bytes(bytes: f64, style: FmtStyle) -> String {
    let (g, m, k, b) = match style {
        FmtStyle::Compact => ("G", "M", "K", "B"),
        FmtStyle::Detail => (" GiB", " MiB", " KiB", " B"),
    };
    if bytes >= 1024.0 * 1024.0 * 1024.0 {
        format!("{:.1}{}", bytes / (1024.0 * 1024.0 * 1024.0), g)
    } else if bytes >= 1024.0 * 1024.0 {
        format!("{:.1}{}", bytes / (1024.0 * 1024.0), m)
    } else if bytes >= 1024.0 {
        format!("{:.1}{}", bytes / 1024.0, k)
    } else {
        format!("{:.0}{}", bytes.max(0.0), b)
    }
}

/// Format bytes-per-second rate as human-readable.
///
/// Compact: `"1.5G/s"`, `"100.3M/s"`
/// Detail:  `"1.5 GiB/s"`, `"100.3 MiB/s"`
pub fn format_bytes_rate(rate: f64, style: FmtStyle) -> String {
    if rate < 1.0 {
        return "0".to_string();
    }
    let (g, m, k, b) = match style {
        FmtStyle::Compact => ("G/s", "M/s", "K/s", "B/s"),
        FmtStyle::Detail => (" GiB/s", " MiB/s", " KiB/s", " B/s"),
    };
    if rate >= 1024.0 * 1024.0 * 1024.0 {
        format!("{:.1}{}", rate / (1024.0 * 1024.0 * 1024.0), g)
    } else if rate >= 1024.0 * 1024.0 {
        format!("{:.1}{}", rate / (1024.0 * 1024.0), m)
    } else if rate >= 1024.0 {
        format!("{:.1}{}", rate / 1024.0, k)
    } else {
        format!("{:.0}{}", rate, b)
    }
}

/// Format pages-per-second rate.
///
/// Compact: always `"{:.0}/s"` below 1000
/// Detail:  `"{:.1}/s"` below 10
pub fn format_rate(rate: f64, style: FmtStyle) -> String {
    if rate < 0.01 {
        return "0".to_string();
    }
    if rate >= 1_000_000.0 {
        format!("{:.1}M/s", rate / 1_000_000.0)
    } else if rate >= 1_000.0 {
        format!("{:.1}K/s", rate / 1_000.0)
    } else {
        match style {
            FmtStyle::Compact => format!("{:.0}/s", rate),
            FmtStyle::Detail if rate >= 10.0 => format!("{:.0}/s", rate),
            FmtStyle::Detail => format!("{:.1}/s", rate),
        }
    }
}

pub fn format_percent(percent: f64) -> String {
    format!("{:.1}%", percent)
}

/// Formats a metric value by the unit its statistic name carries.
pub fn format_metric_value(metric: &Metric, style: FmtStyle) -> String {
    let statistic = metric
        .id
        .segments()
        .last()
        .map(String::as_str)
        .unwrap_or_default();

    if statistic.ends_with("_bytes_per_sec") {
        format_bytes_rate(metric.value, style)
    } else if statistic.ends_with("_pages_per_sec") {
        format_rate(metric.value, style)
    } else if statistic.ends_with("_bytes") {
        format_bytes(metric.value, style)
    } else if statistic.ends_with("_percent") {
        format_percent(metric.value)
    } else {
        format!("{}", metric.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metric::{Category, MetricIdentifier};
    use chrono::DateTime;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512.0, FmtStyle::Compact), "512B");
        assert_eq!(format_bytes(512.0, FmtStyle::Detail), "512 B");
        assert_eq!(format_bytes(6_825_984.0, FmtStyle::Compact), "6.5M");
        assert_eq!(format_bytes(1024.0 * 1024.0 * 1024.0 * 1.5, FmtStyle::Detail), "1.5 GiB");
        assert_eq!(format_bytes(0.0, FmtStyle::Compact), "0B");
    }

    #[test]
    fn test_format_bytes_rate() {
        assert_eq!(format_bytes_rate(0.5, FmtStyle::Compact), "0");
        assert_eq!(format_bytes_rate(2048.0, FmtStyle::Compact), "2.0K/s");
        assert_eq!(format_bytes_rate(100.0, FmtStyle::Detail), "100 B/s");
    }

    #[test]
    fn test_format_rate() {
        assert_eq!(format_rate(0.0, FmtStyle::Compact), "0");
        assert_eq!(format_rate(5.31, FmtStyle::Detail), "5.3/s");
        assert_eq!(format_rate(5.31, FmtStyle::Compact), "5/s");
        assert_eq!(format_rate(1111.1, FmtStyle::Compact), "1.1K/s");
    }

    #[test]
    fn test_format_metric_value() {
        let timestamp = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let metric = |category, device, stat: &str, value| Metric {
            id: MetricIdentifier::swap(category, device, stat),
            value,
            timestamp,
        };

        assert_eq!(
            format_metric_value(
                &metric(Category::Device, Some("dev_sda5"), "used_bytes", 2048.0),
                FmtStyle::Compact
            ),
            "2.0K"
        );
        assert_eq!(
            format_metric_value(&metric(Category::All, None, "free_percent", 12.345), FmtStyle::Compact),
            "12.3%"
        );
        assert_eq!(
            format_metric_value(
                &metric(Category::Io, None, "out_bytes_per_sec", 4096.0),
                FmtStyle::Detail
            ),
            "4.0 KiB/s"
        );
        assert_eq!(
            format_metric_value(&metric(Category::Io, None, "in_pages_per_sec", 42.0), FmtStyle::Detail),
            "42/s"
        );
    }
}
