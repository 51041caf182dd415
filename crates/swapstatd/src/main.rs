//! swapstatd - swap metrics collector daemon.
//!
//! Polls swap usage and swap I/O rates from the /proc filesystem at a fixed
//! interval and writes every poll to stdout as one JSON line.

use std::io::{self, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use clap::Parser;
use serde::Serialize;
use tracing::{Level, debug, error, info, warn};
use tracing_subscriber::EnvFilter;

#[cfg(target_os = "linux")]
use swapstat_core::collector::RealFs;
#[cfg(not(target_os = "linux"))]
use swapstat_core::collector::mock::MockFs;
use swapstat_core::collector::{Clock, FileSystem, SwapCollector};
use swapstat_core::config::{self, ConfigPolicy, PluginMeta};
use swapstat_core::fmt::{FmtStyle, format_metric_value};
use swapstat_core::{Config, Metric, MetricIdentifier};

/// Swap metrics collector daemon.
#[derive(Parser)]
#[command(name = "swapstatd", about = "Swap metrics collector daemon", version)]
struct Args {
    /// Collection interval in seconds.
    #[arg(short, long, default_value = "10")]
    interval: u64,

    /// Path to /proc filesystem (for testing/mocking).
    #[arg(long, default_value = "/proc")]
    proc_path: String,

    /// Metric to collect, e.g. "intel/procfs/swap/device/*/used_bytes".
    /// Repeat for several metrics. Defaults to every metric.
    #[arg(short, long = "metric", value_name = "METRIC")]
    metrics: Vec<MetricIdentifier>,

    /// Stop after this many polls, failed ones included.
    #[arg(short, long)]
    count: Option<u64>,

    /// Print the metric catalog and the config policy, then exit.
    #[arg(long)]
    list: bool,

    /// Increase logging verbosity (-v for debug, -vv for trace). Default is info level.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode - only show errors.
    #[arg(short, long)]
    quiet: bool,
}

/// Initializes the tracing subscriber with the appropriate log level.
/// Default level is INFO. Use -q for quiet mode (errors only).
fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let mut filter = EnvFilter::from_default_env();
    for target in ["swapstatd", "swapstat_core"] {
        match format!("{target}={level}").parse() {
            Ok(directive) => filter = filter.add_directive(directive),
            Err(e) => eprintln!("invalid log directive for {target}: {e}"),
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Output of `--list`.
#[derive(Serialize)]
struct Listing {
    plugin: PluginMeta,
    config_policy: ConfigPolicy,
    metrics: Vec<MetricIdentifier>,
}

/// One poll as written to stdout.
#[derive(Serialize)]
struct PollRecord<'a> {
    poll: u64,
    timestamp: Option<DateTime<Utc>>,
    metrics: &'a [Metric],
}

impl<'a> PollRecord<'a> {
    fn new(poll: u64, metrics: &'a [Metric]) -> Self {
        Self {
            poll,
            timestamp: metrics.first().map(|m| m.timestamp),
            metrics,
        }
    }
}

/// Describes the contents of a poll for logging.
fn describe_poll(metrics: &[Metric]) -> String {
    const HIGHLIGHTS: [&str; 3] = [
        "intel/procfs/swap/all/used_bytes",
        "intel/procfs/swap/all/used_percent",
        "intel/procfs/swap/io/out_bytes_per_sec",
    ];

    let mut parts = vec![format!("{} metrics", metrics.len())];
    for metric in metrics {
        let id = metric.id.to_string();
        if HIGHLIGHTS.contains(&id.as_str()) {
            let name = id.trim_start_matches("intel/procfs/swap/");
            parts.push(format!(
                "{name}={}",
                format_metric_value(metric, FmtStyle::Compact)
            ));
        }
    }

    parts.join(", ")
}

fn write_json<T: Serialize>(value: &T) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer(&mut stdout, value)?;
    writeln!(stdout)?;
    stdout.flush()
}

/// When and how often to poll.
struct PollSchedule {
    interval: Duration,
    /// Stop after this many attempts, failed ones included.
    count: Option<u64>,
}

/// Polls until `running` is cleared or the schedule's count is reached.
///
/// Each successful poll is handed to `emit`, numbered by attempt. Returns the
/// number of attempts and of successful polls.
fn poll_loop<F: FileSystem, C: Clock>(
    collector: &mut SwapCollector<F, C>,
    config: &Config,
    requested: &[MetricIdentifier],
    schedule: &PollSchedule,
    running: &AtomicBool,
    mut emit: impl FnMut(&PollRecord<'_>) -> io::Result<()>,
) -> (u64, u64) {
    let mut attempts: u64 = 0;
    let mut successes: u64 = 0;

    while running.load(Ordering::SeqCst) {
        attempts += 1;
        match collector.collect(config, requested) {
            Ok(metrics) => {
                successes += 1;
                info!("Poll #{}: {}", attempts, describe_poll(&metrics));

                if let Err(e) = emit(&PollRecord::new(attempts, &metrics)) {
                    error!("Failed to write poll: {}", e);
                    break;
                }
            }
            Err(e) => {
                error!("Poll #{} failed: {}", attempts, e);
            }
        }

        if schedule.count.is_some_and(|count| attempts >= count) {
            break;
        }

        // Sleep with periodic checks for shutdown signal
        let sleep_interval = Duration::from_millis(100);
        let mut remaining = schedule.interval;
        while remaining > Duration::ZERO && running.load(Ordering::SeqCst) {
            let sleep_time = remaining.min(sleep_interval);
            std::thread::sleep(sleep_time);
            remaining = remaining.saturating_sub(sleep_time);
        }
    }

    (attempts, successes)
}

fn list<F: FileSystem>(collector: &SwapCollector<F>, config: &Config) -> Result<(), String> {
    let metrics = collector.discover(config).map_err(|e| e.to_string())?;
    let listing = Listing {
        plugin: config::plugin_meta(),
        config_policy: config::config_policy(),
        metrics,
    };
    write_json(&listing).map_err(|e| e.to_string())
}

fn main() {
    let args = Args::parse();

    init_logging(args.verbose, args.quiet);

    let meta = config::plugin_meta();
    info!(
        "swapstatd {} starting ({} plugin v{}, {:?} routing)",
        env!("CARGO_PKG_VERSION"),
        meta.name,
        meta.version,
        meta.routing
    );

    let config = Config::with_proc_path(&args.proc_path);

    #[cfg(target_os = "linux")]
    let mut collector = SwapCollector::new(RealFs::new(), "/proc");
    #[cfg(not(target_os = "linux"))]
    let mut collector = SwapCollector::new(MockFs::typical_swap(), "/proc");

    info!(
        "Config: interval={}s, proc={}, page_size={}, count={}",
        args.interval,
        args.proc_path,
        collector.page_size(),
        args.count
            .map_or_else(|| "unlimited".to_string(), |c| c.to_string())
    );

    if args.list {
        if let Err(e) = list(&collector, &config) {
            error!("Failed to list metrics: {}", e);
            std::process::exit(1);
        }
        return;
    }

    let requested = if args.metrics.is_empty() {
        match collector.discover(&config) {
            Ok(catalog) => catalog,
            Err(e) => {
                error!("Failed to discover swap metrics: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        args.metrics
    };
    debug!("Requested {} metrics", requested.len());

    let schedule = PollSchedule {
        interval: Duration::from_secs(args.interval),
        count: args.count,
    };

    // Setup graceful shutdown
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();

    if let Err(e) = ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        r.store(false, Ordering::SeqCst);
    }) {
        warn!("Failed to set Ctrl-C handler: {}", e);
    }

    info!("Starting collection loop");

    let (attempts, successes) = poll_loop(
        &mut collector,
        &config,
        &requested,
        &schedule,
        &running,
        |record| write_json(record),
    );

    info!(
        "Shutdown complete after {} polls ({} failed)",
        attempts,
        attempts - successes
    );
}
