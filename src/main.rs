//! Synthetic Telemetry Generator
//!
//! Builds a configurable population of Prometheus instruments, mutates them
//! on a fixed schedule, and serves the result as OpenMetrics text.

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use prometheus_client::registry::Registry;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use metrigen::catalog::{Catalog, CatalogSpec};
use metrigen::driver::TickDriver;
use metrigen::error::Result;
use metrigen::server;

// =============================================================================
// CLI Arguments
// =============================================================================

/// Synthetic telemetry generator - reproducible load for metrics pipelines
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Frequency of evaluation of metrics and exemplars
    #[arg(long, env = "EVALUATE_EVERY", default_value = "1s", value_parser = humantime::parse_duration)]
    evaluate_every: Duration,

    /// Number of counters to be generated
    #[arg(long, env = "NUM_COUNTERS", default_value = "1")]
    num_counters: usize,

    /// Number of counters to be generated with exemplars
    #[arg(long, env = "NUM_COUNTERS_WITH_EXEMPLARS", default_value = "1")]
    num_counters_with_exemplars: usize,

    /// Number of gauges to be generated
    #[arg(long, env = "NUM_GAUGES", default_value = "1")]
    num_gauges: usize,

    /// Number of histograms to be generated
    #[arg(long, env = "NUM_HISTOGRAMS", default_value = "1")]
    num_histograms: usize,

    /// Number of histograms to be generated with exemplars
    #[arg(long, env = "NUM_HISTOGRAMS_WITH_EXEMPLARS", default_value = "1")]
    num_histograms_with_exemplars: usize,

    /// Number of native high-resolution histograms to be generated
    #[arg(long, env = "NUM_NATIVE_HISTOGRAMS", default_value = "1")]
    num_native_histograms: usize,

    /// Exposition server bind address
    #[arg(long, env = "LISTEN_ADDR", default_value = "0.0.0.0:9001")]
    listen_addr: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long, env = "LOG_JSON")]
    log_json: bool,
}

impl Args {
    fn catalog_spec(&self) -> CatalogSpec {
        CatalogSpec {
            evaluate_every: self.evaluate_every,
            num_counters: self.num_counters,
            num_counters_with_exemplars: self.num_counters_with_exemplars,
            num_gauges: self.num_gauges,
            num_histograms: self.num_histograms,
            num_histograms_with_exemplars: self.num_histograms_with_exemplars,
            num_native_histograms: self.num_native_histograms,
            ..CatalogSpec::default()
        }
    }
}

// =============================================================================
// Main
// =============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args);

    let spec = args.catalog_spec();

    info!("Starting telemetry generator");
    info!("  Evaluate every: {:?}", spec.evaluate_every);
    info!(
        "  Counters: {} plain, {} with exemplars",
        spec.num_counters, spec.num_counters_with_exemplars
    );
    info!("  Gauges: {}", spec.num_gauges);
    info!(
        "  Histograms: {} plain, {} with exemplars",
        spec.num_histograms, spec.num_histograms_with_exemplars
    );
    info!("  Native histograms: {}", spec.num_native_histograms);

    let mut registry = Registry::default();
    let catalog = Arc::new(Catalog::build(&spec, &mut registry)?);
    info!("Registered {} instruments", catalog.len());

    let driver = TickDriver::new(catalog, spec.evaluate_every);
    tokio::spawn(driver.run());

    server::run(&args.listen_addr, Arc::new(registry)).await
}

// =============================================================================
// Logging Setup
// =============================================================================

fn init_logging(args: &Args) {
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env()
        .add_directive(level.into())
        .add_directive("hyper=warn".parse().unwrap());

    if args.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true))
            .init();
    }
}
