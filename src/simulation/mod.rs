//! Order generation and run control
//!
//! This module contains the synthetic order generator, the explicit generation
//! context, run statistics, logging setup and error handling.
//!
//! # Overview
//!
//! - **GenerationContext**: seeded random generator, history anchor and target store for one run
//! - **OrderGenerator**: walks the fulfillment process for a single order
//! - **BatchOrderGenerator**: builds `n` orders and commits them in one transaction
//! - **GenerationStatistics**: counters describing what a run produced
//! - **SimulationError**: errors shared by the simulator, store and aggregator
//!
//! # Usage Example
//!
//! ```rust
//! use fulfillment_analytics_simulator::simulation::*;
//! use fulfillment_analytics_simulator::store::EventStore;
//! use fulfillment_analytics_simulator::types::*;
//!
//! let config = SimulationConfig {
//!     order_count: 25,
//!     anchor_time: Some("2024-06-01T00:00:00".to_string()),
//!     ..Default::default()
//! };
//!
//! let mut store = EventStore::in_memory().unwrap();
//! let stats = run(&mut store, &config).unwrap();
//! assert_eq!(stats.orders_generated, 25);
//! ```

pub mod batch_generator;
pub mod context;
pub mod error;
pub mod logging;
pub mod order_generator;
pub mod statistics;

// Re-export all public types for convenience
pub use batch_generator::*;
pub use context::*;
pub use error::*;
pub use logging::*;
pub use order_generator::*;
pub use statistics::*;
