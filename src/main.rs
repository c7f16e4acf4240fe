// Fulfillment Analytics Simulator - Main Entry Point
//
// You can run it via Cargo:
//
// ```console
// $ cargo build --release
// $ ./target/release/fulfillment-sim
// ```
//
// Or with custom configuration:
//
// ```console
// $ ./target/release/fulfillment-sim --order-count 5000 --seed 7 --output-format json --verbose
// ```

use anyhow::{Context, Result};
use clap::Parser;
use std::process;
use tracing::{error, info, Level};

use fulfillment_analytics_simulator::simulation::{self, LoggingConfig, LoggingGuard, SimulationError};
use fulfillment_analytics_simulator::store::EventStore;
use fulfillment_analytics_simulator::types::config::{CliArgs, ConfigError, ConfigValidationError};
use fulfillment_analytics_simulator::types::SimulationConfig;
use fulfillment_analytics_simulator::Report;

fn main() {
    // Parse CLI arguments first to check for special flags
    let args = CliArgs::parse();

    // Handle special CLI flags that don't require full initialization
    if args.print_config {
        match SimulationConfig::default().print_json() {
            Ok(json) => {
                println!("{}", json);
                return;
            }
            Err(e) => {
                eprintln!("Failed to serialize default configuration: {}", e);
                process::exit(1);
            }
        }
    }

    let _logging_guard = match init_logging(&args) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            process::exit(1);
        }
    };

    info!("Starting Fulfillment Analytics Simulator");

    if let Err(e) = run(args) {
        error!(category = error_category(&e), "Run failed: {:#}", e);
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }

    info!("Fulfillment Analytics Simulator completed successfully");
}

/// Category of the first simulator error in the chain
fn error_category(error: &anyhow::Error) -> &'static str {
    error
        .chain()
        .find_map(|cause| {
            if let Some(e) = cause.downcast_ref::<SimulationError>() {
                Some(e.category())
            } else if cause.is::<ConfigError>() || cause.is::<ConfigValidationError>() {
                Some("Configuration")
            } else {
                None
            }
        })
        .unwrap_or("Other")
}

/// Initialize logging based on CLI flags
fn init_logging(
    args: &CliArgs,
) -> Result<LoggingGuard, Box<dyn std::error::Error + Send + Sync>> {
    let level = if args.debug {
        Level::DEBUG
    } else if args.verbose {
        Level::INFO
    } else {
        // Default: minimal logging for normal users
        Level::WARN
    };

    let mut logging = LoggingConfig::new().with_level(level);
    if args.debug {
        logging = logging.with_span_events();
    }
    if args.log_json {
        logging = logging.with_json_format();
    }
    if let Some(directory) = &args.log_dir {
        logging = logging.with_file_logging(directory.clone());
    }
    logging.init()
}

/// Load configuration, then init, generate and report as requested
fn run(args: CliArgs) -> Result<()> {
    let report_only = args.report_only;
    let init_only = args.init_only;
    let dry_run = args.dry_run;

    // Load configuration from CLI arguments and optional config file
    let config =
        SimulationConfig::from_cli_args(args).context("Failed to load configuration")?;
    config.validate().context("Configuration validation failed")?;
    let output_format = config.get_output_format().map_err(anyhow::Error::msg)?;

    info!("Configuration loaded and validated successfully");

    if dry_run {
        eprintln!("Configuration validation successful!");
        eprintln!("Dry run mode - nothing will be generated or read.");
        print_configuration_summary(&config);
        return Ok(());
    }

    let mut store = EventStore::open(&config.db_path)
        .with_context(|| format!("Failed to open event store at {}", config.db_path))?;

    if init_only {
        eprintln!("Initialized event store at {}", store.location());
        return Ok(());
    }

    if !report_only {
        let stats = simulation::run(&mut store, &config).context("Order generation failed")?;
        eprintln!("{}", stats);
    }

    let report = Report::collect(
        &store,
        config.detail_limit,
        config.histogram_bins,
        &config.detail_filter,
    )
    .context("Failed to aggregate the event store")?;
    println!("{}", report.render(output_format)?);

    Ok(())
}

/// Print configuration summary
fn print_configuration_summary(config: &SimulationConfig) {
    eprintln!("Configuration:");
    eprintln!("  Event Store: {}", config.db_path);
    eprintln!("  Order Count: {}", config.order_count);
    eprintln!("  Seed: {}", config.seed);
    eprintln!("  History Window: {} days", config.history_days);
    match &config.anchor_time {
        Some(anchor) => eprintln!("  Anchor Time: {}", anchor),
        None => eprintln!("  Anchor Time: now"),
    }
    eprintln!("  Workers: {}", config.worker_pool.join(", "));
    eprintln!("  Detail Limit: {}", config.detail_limit);
    eprintln!("  Histogram Bins: {}", config.histogram_bins);
    eprintln!("  Output Format: {}", config.output_format);
    if !config.detail_filter.is_empty() {
        eprintln!("  Detail Filter: {:?}", config.detail_filter);
    }
    eprintln!(
        "  Late Flag Probability: {:.0}%",
        config.process_model.late_flag_probability * 100.0
    );
    eprintln!();
}
