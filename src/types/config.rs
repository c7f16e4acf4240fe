//! Configuration structures for the fulfillment simulator
//!
//! This module contains the simulation configuration, the stochastic process
//! model parameters, and the validation logic used to control a run.

use super::{parse_timestamp, Channel, FulfillmentStatus, OutputFormat};
use crate::analysis::DetailFilter;
use chrono::{Datelike, NaiveDateTime};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Run size limits
pub mod limits {
    /// Default number of orders generated per run
    pub const DEFAULT_ORDER_COUNT: usize = 400;

    /// Upper bound on orders generated in a single run
    pub const MAX_ORDERS_PER_RUN: usize = 1_000_000;

    /// Default number of rows returned by the order detail query
    pub const DEFAULT_DETAIL_LIMIT: usize = 500;

    /// Default number of histogram buckets for the ready-time distribution
    pub const DEFAULT_HISTOGRAM_BINS: usize = 20;

    /// Longest simulated history, in days
    pub const MAX_HISTORY_DAYS: u32 = 36_500;

    /// Longest due window, in hours
    pub const MAX_DUE_HOURS: i64 = 8_760;

    /// Longest single process stage, in minutes
    pub const MAX_STAGE_MINUTES: i64 = 525_600;

    /// Largest basket
    pub const MAX_ITEMS_PER_ORDER: i64 = 10_000;

    /// Anchor times must fall in years `1..=MAX_ANCHOR_YEAR`
    pub const MAX_ANCHOR_YEAR: i32 = 9_999;
}

/// Inclusive integer range a uniform draw is taken from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawRange {
    /// Smallest value that can be drawn
    pub min: i64,
    /// Largest value that can be drawn
    pub max: i64,
}

impl DrawRange {
    /// Create a new inclusive range
    pub const fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    /// Whether the range is non-empty and lies within `floor..=ceiling`
    pub fn is_within(&self, floor: i64, ceiling: i64) -> bool {
        self.min >= floor && self.min <= self.max && self.max <= ceiling
    }
}

/// Parameters of the stochastic fulfillment process
///
/// Every probability and range the generator draws from lives here so that a
/// configuration file can reshape the process without code changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessModel {
    /// Hours between order creation and due time
    pub due_hours: DrawRange,
    /// Items per order
    pub items_count: DrawRange,
    /// Smallest customer distance in miles
    pub min_distance_miles: f64,
    /// Largest customer distance in miles
    pub max_distance_miles: f64,
    /// Probability an order is expedited
    pub expedited_probability: f64,
    /// Minutes from creation to pick
    pub pick_minutes: DrawRange,
    /// Minutes from pick to pack
    pub pack_minutes: DrawRange,
    /// Minutes from pack to ready
    pub ready_minutes: DrawRange,
    /// Out-of-stock probability for an empty basket
    pub out_of_stock_base_probability: f64,
    /// Out-of-stock probability added per item in the basket
    pub out_of_stock_per_item_probability: f64,
    /// Ceiling on the out-of-stock probability
    pub out_of_stock_probability_cap: f64,
    /// Most items that can be out of stock on one order
    pub max_out_of_stock_items: u32,
    /// Probability an out-of-stock order is canceled
    pub cancel_on_out_of_stock_probability: f64,
    /// Probability an overdue delivery is reported as late
    pub late_flag_probability: f64,
    /// Minutes from ready to customer hand-off for in-store pickup
    pub bopis_delivery_minutes: DrawRange,
    /// Minutes from ready to customer hand-off for local delivery
    pub delivery_delivery_minutes: DrawRange,
    /// Minutes from ready to customer hand-off for shipped orders
    pub ship_to_home_delivery_minutes: DrawRange,
}

impl Default for ProcessModel {
    fn default() -> Self {
        Self {
            due_hours: DrawRange::new(2, 48),
            items_count: DrawRange::new(1, 25),
            min_distance_miles: 0.5,
            max_distance_miles: 25.0,
            expedited_probability: 0.18,
            pick_minutes: DrawRange::new(8, 120),
            pack_minutes: DrawRange::new(3, 40),
            ready_minutes: DrawRange::new(2, 35),
            out_of_stock_base_probability: 0.05,
            out_of_stock_per_item_probability: 0.01,
            out_of_stock_probability_cap: 0.35,
            max_out_of_stock_items: 3,
            cancel_on_out_of_stock_probability: 0.25,
            late_flag_probability: 0.35,
            bopis_delivery_minutes: DrawRange::new(10, 600),
            delivery_delivery_minutes: DrawRange::new(60, 1440),
            ship_to_home_delivery_minutes: DrawRange::new(240, 2880),
        }
    }
}

impl ProcessModel {
    /// Out-of-stock probability for a basket of `items_count` items
    pub fn out_of_stock_probability(&self, items_count: u32) -> f64 {
        (self.out_of_stock_base_probability
            + self.out_of_stock_per_item_probability * items_count as f64)
            .min(self.out_of_stock_probability_cap)
    }

    /// Last-mile latency range for a channel
    pub fn delivery_minutes(&self, channel: Channel) -> DrawRange {
        match channel {
            Channel::Bopis => self.bopis_delivery_minutes,
            Channel::Delivery => self.delivery_delivery_minutes,
            Channel::ShipToHome => self.ship_to_home_delivery_minutes,
        }
    }

    /// Validate ranges and probabilities
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        // Every stage must advance the clock for causal ordering to hold
        let ranges = [
            ("due_hours", self.due_hours, limits::MAX_DUE_HOURS),
            ("items_count", self.items_count, limits::MAX_ITEMS_PER_ORDER),
            ("pick_minutes", self.pick_minutes, limits::MAX_STAGE_MINUTES),
            ("pack_minutes", self.pack_minutes, limits::MAX_STAGE_MINUTES),
            ("ready_minutes", self.ready_minutes, limits::MAX_STAGE_MINUTES),
            ("bopis_delivery_minutes", self.bopis_delivery_minutes, limits::MAX_STAGE_MINUTES),
            ("delivery_delivery_minutes", self.delivery_delivery_minutes, limits::MAX_STAGE_MINUTES),
            (
                "ship_to_home_delivery_minutes",
                self.ship_to_home_delivery_minutes,
                limits::MAX_STAGE_MINUTES,
            ),
        ];
        for (field, range, ceiling) in ranges {
            if !range.is_within(1, ceiling) {
                return Err(ConfigValidationError::InvalidRange {
                    field: field.to_string(),
                    min: range.min,
                    max: range.max,
                });
            }
        }

        if !(self.min_distance_miles >= 0.0
            && self.min_distance_miles <= self.max_distance_miles
            && self.max_distance_miles.is_finite())
        {
            return Err(ConfigValidationError::InvalidDistanceRange(
                self.min_distance_miles,
                self.max_distance_miles,
            ));
        }

        if self.max_out_of_stock_items == 0 {
            return Err(ConfigValidationError::InvalidOutOfStockItems);
        }

        let probabilities = [
            ("expedited_probability", self.expedited_probability),
            ("out_of_stock_base_probability", self.out_of_stock_base_probability),
            ("out_of_stock_per_item_probability", self.out_of_stock_per_item_probability),
            ("out_of_stock_probability_cap", self.out_of_stock_probability_cap),
            ("cancel_on_out_of_stock_probability", self.cancel_on_out_of_stock_probability),
            ("late_flag_probability", self.late_flag_probability),
        ];
        for (field, value) in probabilities {
            validate_probability(field, value)?;
        }

        Ok(())
    }
}

/// Command line arguments structure
#[derive(Debug, Clone, Parser)]
#[command(
    name = "fulfillment-sim",
    version = "0.1.0",
    about = "Fulfillment Analytics Simulator - Generates synthetic fulfillment history and reports KPIs",
    long_about = "Generates a synthetic order-fulfillment history into a SQLite event store and reports KPIs, status breakdown, worker performance, ready-time distribution and recent order detail.

EXAMPLES:
    # Generate 400 orders with seed 42 and print the report
    fulfillment-sim

    # Generate a larger, reproducible history
    fulfillment-sim --order-count 2000 --seed 7 --anchor-time 2024-06-01T00:00:00

    # Report on an existing store without generating
    fulfillment-sim --report-only --output-format json

    # Only late BOPIS orders in the detail table
    fulfillment-sim --report-only --channel bopis --status late

    # Generate configuration template
    fulfillment-sim --print-config > my-config.json

CONFIGURATION:
    Configuration can be provided via:
    1. Command line arguments (highest priority)
    2. Configuration file (--config flag)
    3. Default values (lowest priority)

    Supported configuration file formats: JSON (.json)"
)]
pub struct CliArgs {
    /// Configuration file path (JSON format)
    #[arg(
        short,
        long,
        help = "Configuration file path (JSON format)",
        long_help = "Path to a JSON configuration file. CLI arguments will override file settings."
    )]
    pub config: Option<String>,

    /// Path of the SQLite event store
    #[arg(long, help = "Path of the SQLite event store")]
    pub db_path: Option<String>,

    /// Number of orders to generate
    #[arg(
        long,
        help = "Number of orders to generate",
        long_help = "Number of synthetic orders to generate in this run. Zero generates nothing. Default: 400"
    )]
    pub order_count: Option<usize>,

    /// Random seed for reproducible results
    #[arg(long, help = "Random seed for reproducible results")]
    pub seed: Option<u64>,

    /// Length of the simulated history in days
    #[arg(long, help = "Length of the simulated history in days")]
    pub history_days: Option<u32>,

    /// End of the simulated history window
    #[arg(
        long,
        help = "End of the history window (ISO-8601)",
        long_help = "End of the simulated history window as ISO-8601 text. Pinning it makes runs reproducible across invocations. Default: now (UTC)"
    )]
    pub anchor_time: Option<String>,

    /// Number of recent orders in the detail table
    #[arg(long, help = "Number of recent orders in the detail table")]
    pub detail_limit: Option<usize>,

    /// Number of ready-time histogram buckets
    #[arg(long, help = "Number of ready-time histogram buckets")]
    pub histogram_bins: Option<usize>,

    /// Output format for the report
    #[arg(long, help = "Output format (text or json)")]
    pub output_format: Option<String>,

    /// Restrict the detail table to these channels
    #[arg(long = "channel", help = "Restrict order detail to a channel (repeatable)")]
    pub channels: Vec<Channel>,

    /// Restrict the detail table to these statuses
    #[arg(long = "status", help = "Restrict order detail to a status (repeatable)")]
    pub statuses: Vec<FulfillmentStatus>,

    /// Restrict the detail table to these workers
    #[arg(long = "worker", help = "Restrict order detail to a worker (repeatable)")]
    pub workers: Vec<String>,

    /// Skip generation and report on the existing store
    #[arg(long, help = "Skip generation and report on the existing store")]
    pub report_only: bool,

    /// Create the schema and exit
    #[arg(long, help = "Initialize the event store schema and exit")]
    pub init_only: bool,

    /// Enable verbose logging
    #[arg(short, long, help = "Enable verbose logging")]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(short, long, help = "Enable debug logging")]
    pub debug: bool,

    /// Emit logs as JSON
    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,

    /// Also write logs to daily rolling files in this directory
    #[arg(long, help = "Directory for rolling log files")]
    pub log_dir: Option<String>,

    /// Dry run mode - validate configuration without running
    #[arg(long, help = "Validate configuration without running")]
    pub dry_run: bool,

    /// Print default configuration and exit
    #[arg(long, help = "Print default configuration in JSON format and exit")]
    pub print_config: bool,
}

/// Configuration file structure (allows partial configuration)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigFile {
    /// Path of the SQLite event store
    pub db_path: Option<String>,

    /// Number of orders to generate
    pub order_count: Option<usize>,

    /// Upper bound on orders per run
    pub max_orders_per_run: Option<usize>,

    /// Random seed for reproducible results
    pub seed: Option<u64>,

    /// Length of the simulated history in days
    pub history_days: Option<u32>,

    /// End of the simulated history window
    pub anchor_time: Option<String>,

    /// Worker pool labels
    pub worker_pool: Option<Vec<String>>,

    /// Number of recent orders in the detail table
    pub detail_limit: Option<usize>,

    /// Number of ready-time histogram buckets
    pub histogram_bins: Option<usize>,

    /// Output format for the report
    pub output_format: Option<String>,

    /// Detail table filter
    pub detail_filter: Option<DetailFilter>,

    /// Stochastic process parameters (missing fields take defaults)
    pub process_model: Option<ProcessModel>,
}

/// Configuration for a fulfillment simulation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Path of the SQLite event store
    pub db_path: String,

    /// Number of orders to generate
    pub order_count: usize,

    /// Upper bound on orders per run
    pub max_orders_per_run: usize,

    /// Random seed for reproducible results
    pub seed: u64,

    /// Length of the simulated history in days
    pub history_days: u32,

    /// End of the simulated history window; `None` means now
    pub anchor_time: Option<String>,

    /// Worker pool labels
    pub worker_pool: Vec<String>,

    /// Number of recent orders in the detail table
    pub detail_limit: usize,

    /// Number of ready-time histogram buckets
    pub histogram_bins: usize,

    /// Output format for the report
    pub output_format: String,

    /// Detail table filter
    pub detail_filter: DetailFilter,

    /// Stochastic process parameters
    pub process_model: ProcessModel,
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    /// Configuration file read error
    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    /// JSON parsing error
    #[error("Failed to parse JSON configuration: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Unsupported configuration file format
    #[error("Unsupported configuration file format: {0} (supported: .json)")]
    UnsupportedFormat(String),
}

/// Validation errors for simulation configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    /// Order count exceeds the per-run bound
    #[error("Order count {count} exceeds the per-run maximum of {max}")]
    InvalidOrderCount {
        /// Requested order count
        count: usize,
        /// Configured maximum
        max: usize,
    },

    /// History window is empty or too long
    #[error("History must span 1 to 36500 days, got {0}")]
    InvalidHistoryDays(u32),

    /// Worker pool is empty or has blank labels
    #[error("Worker pool must contain at least one non-empty label")]
    EmptyWorkerPool,

    /// Detail limit is zero
    #[error("Detail limit must be greater than 0, got {0}")]
    InvalidDetailLimit(usize),

    /// Histogram bin count is zero
    #[error("Histogram bins must be greater than 0, got {0}")]
    InvalidHistogramBins(usize),

    /// Anchor time text could not be parsed
    #[error("Invalid anchor time: {0}")]
    InvalidAnchorTime(String),

    /// Output format is unknown
    #[error("Invalid output format: {0}")]
    InvalidOutputFormat(String),

    /// Integer draw range is empty or below its floor
    #[error("Invalid range for {field}: {min}..={max}")]
    InvalidRange {
        /// Name of the field with the invalid range
        field: String,
        /// Range minimum
        min: i64,
        /// Range maximum
        max: i64,
    },

    /// Distance range is negative or inverted
    #[error("Invalid distance range: min ({0}) must be >= 0 and <= max ({1})")]
    InvalidDistanceRange(f64, f64),

    /// Out-of-stock item ceiling is zero
    #[error("max_out_of_stock_items must be greater than 0")]
    InvalidOutOfStockItems,

    /// Probability value is out of range
    #[error("Invalid probability for {field}: {value} (must be between 0.0 and 1.0)")]
    InvalidProbability {
        /// Name of the field with invalid probability
        field: String,
        /// The invalid probability value
        value: f64,
    },
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            db_path: "data/fulfillment.db".to_string(),
            order_count: limits::DEFAULT_ORDER_COUNT,
            max_orders_per_run: limits::MAX_ORDERS_PER_RUN,
            seed: 42,
            history_days: 30,
            anchor_time: None,
            worker_pool: ["W1", "W2", "W3", "W4", "W5"].iter().map(|w| w.to_string()).collect(),
            detail_limit: limits::DEFAULT_DETAIL_LIMIT,
            histogram_bins: limits::DEFAULT_HISTOGRAM_BINS,
            output_format: "text".to_string(),
            detail_filter: DetailFilter::default(),
            process_model: ProcessModel::default(),
        }
    }
}

impl SimulationConfig {
    /// Create configuration from parsed CLI arguments
    pub fn from_cli_args(args: CliArgs) -> Result<Self, ConfigError> {
        // Start with default configuration
        let mut config = Self::default();

        // Load from config file if specified
        if let Some(config_path) = &args.config {
            config = Self::from_file(config_path)?;
        }

        // Override with command line arguments (CLI takes precedence)
        Self::apply_cli_overrides(&mut config, args);

        Ok(config)
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let content = fs::read_to_string(path)?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => {
                let config_file: ConfigFile = serde_json::from_str(&content)?;
                Ok(Self::from_config_file(config_file))
            }
            Some(ext) => Err(ConfigError::UnsupportedFormat(ext.to_string())),
            None => Err(ConfigError::UnsupportedFormat("no extension".to_string())),
        }
    }

    /// Create configuration from a config file, merging with defaults
    fn from_config_file(config_file: ConfigFile) -> Self {
        let defaults = Self::default();

        Self {
            db_path: config_file.db_path.unwrap_or(defaults.db_path),
            order_count: config_file.order_count.unwrap_or(defaults.order_count),
            max_orders_per_run: config_file
                .max_orders_per_run
                .unwrap_or(defaults.max_orders_per_run),
            seed: config_file.seed.unwrap_or(defaults.seed),
            history_days: config_file.history_days.unwrap_or(defaults.history_days),
            anchor_time: config_file.anchor_time.or(defaults.anchor_time),
            worker_pool: config_file.worker_pool.unwrap_or(defaults.worker_pool),
            detail_limit: config_file.detail_limit.unwrap_or(defaults.detail_limit),
            histogram_bins: config_file.histogram_bins.unwrap_or(defaults.histogram_bins),
            output_format: config_file.output_format.unwrap_or(defaults.output_format),
            detail_filter: config_file.detail_filter.unwrap_or(defaults.detail_filter),
            process_model: config_file.process_model.unwrap_or(defaults.process_model),
        }
    }

    /// Apply CLI argument overrides to configuration
    fn apply_cli_overrides(config: &mut Self, args: CliArgs) {
        if let Some(value) = args.db_path {
            config.db_path = value;
        }
        if let Some(value) = args.order_count {
            config.order_count = value;
        }
        if let Some(value) = args.seed {
            config.seed = value;
        }
        if let Some(value) = args.history_days {
            config.history_days = value;
        }
        if let Some(value) = args.anchor_time {
            config.anchor_time = Some(value);
        }
        if let Some(value) = args.detail_limit {
            config.detail_limit = value;
        }
        if let Some(value) = args.histogram_bins {
            config.histogram_bins = value;
        }
        if let Some(value) = args.output_format {
            config.output_format = value;
        }

        // Filter flags replace the file's filter dimension by dimension
        if !args.channels.is_empty() {
            config.detail_filter.channels = args.channels;
        }
        if !args.statuses.is_empty() {
            config.detail_filter.statuses = args.statuses;
        }
        if !args.workers.is_empty() {
            config.detail_filter.workers = args.workers;
        }
    }

    /// Print configuration as JSON
    pub fn print_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate the configuration parameters
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.order_count > self.max_orders_per_run {
            return Err(ConfigValidationError::InvalidOrderCount {
                count: self.order_count,
                max: self.max_orders_per_run,
            });
        }

        if self.history_days == 0 || self.history_days > limits::MAX_HISTORY_DAYS {
            return Err(ConfigValidationError::InvalidHistoryDays(self.history_days));
        }

        if self.worker_pool.is_empty() || self.worker_pool.iter().any(|w| w.trim().is_empty()) {
            return Err(ConfigValidationError::EmptyWorkerPool);
        }

        if self.detail_limit == 0 {
            return Err(ConfigValidationError::InvalidDetailLimit(self.detail_limit));
        }

        if self.histogram_bins == 0 {
            return Err(ConfigValidationError::InvalidHistogramBins(self.histogram_bins));
        }

        self.anchor()?;
        self.get_output_format().map_err(ConfigValidationError::InvalidOutputFormat)?;
        self.process_model.validate()?;

        Ok(())
    }

    /// Parsed anchor time, if one is pinned
    pub fn anchor(&self) -> Result<Option<NaiveDateTime>, ConfigValidationError> {
        match &self.anchor_time {
            None => Ok(None),
            Some(text) => parse_timestamp(text)
                .filter(|ts| (1..=limits::MAX_ANCHOR_YEAR).contains(&ts.year()))
                .map(Some)
                .ok_or_else(|| ConfigValidationError::InvalidAnchorTime(text.clone())),
        }
    }

    /// Get the output format as an enum value
    pub fn get_output_format(&self) -> Result<OutputFormat, String> {
        self.output_format.parse()
    }
}

/// Helper to validate probability values
fn validate_probability(field: &str, value: f64) -> Result<(), ConfigValidationError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigValidationError::InvalidProbability { field: field.to_string(), value });
    }
    Ok(())
}
