//! Fulfillment Analytics Simulator
//!
//! A synthetic order-fulfillment generator and KPI aggregator. The simulator
//! produces correlated orders and fulfillment events from a seeded process
//! model and writes them to a SQLite event store; the aggregator reads them
//! back and derives throughput, timing and quality metrics.
//!
//! # Overview
//!
//! Data flows in one direction:
//!
//! ```text
//! ┌─────────────┐    ┌─────────────┐    ┌─────────────┐    ┌─────────────┐
//! │ Simulation  │───►│    Store    │───►│  Analysis   │───►│   Report    │
//! │             │    │             │    │             │    │             │
//! │ Context     │    │ orders      │    │ KPIs        │    │ Text        │
//! │ Generator   │    │ events      │    │ Breakdown   │    │ JSON        │
//! │ Statistics  │    │             │    │ Workers     │    │             │
//! └─────────────┘    └─────────────┘    └─────────────┘    └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use fulfillment_analytics_simulator::*;
//!
//! let config = SimulationConfig {
//!     order_count: 50,
//!     seed: 7,
//!     anchor_time: Some("2024-06-01T00:00:00".to_string()),
//!     ..Default::default()
//! };
//!
//! let mut store = EventStore::in_memory()?;
//! let stats = simulation::run(&mut store, &config)?;
//! assert_eq!(stats.orders_generated, 50);
//!
//! let kpis = Aggregator::new(&store).kpis()?;
//! assert_eq!(kpis.total, 50);
//! # Ok::<(), SimulationError>(())
//! ```
//!
//! ## Module Organization
//!
//! - [`types`]: identifiers, enums, timestamps and configuration
//! - [`orders`]: the order and fulfillment event records
//! - [`store`]: SQLite event store
//! - [`simulation`]: generation context, process model and run statistics
//! - [`analysis`]: aggregator queries, histogram and detail filter
//! - [`report`]: text and JSON rendering
#![warn(missing_docs, missing_debug_implementations, unreachable_pub)]

// Module declarations
pub mod analysis;
pub mod orders;
pub mod report;
pub mod simulation;
pub mod store;
pub mod types;

// Core types and identifiers
pub use types::{
    Channel, ConfigValidationError, FulfillmentStatus, OrderId, OutputFormat, ProcessModel,
    SimulationConfig, WorkerId,
};

// Records
pub use orders::{FulfillmentEvent, Order};

// Storage
pub use store::EventStore;

// Generation
pub use simulation::{
    BatchOrderGenerator, GenerationContext, GenerationStatistics, OrderGenerator,
    SimulationError, SimulationResult,
};

// Aggregation and reporting
pub use analysis::{
    Aggregator, DetailFilter, KpiSummary, OrderDetail, ReadyTimeHistogram, StatusCount,
    WorkerPerformance,
};
pub use report::Report;
