//! Core types and identifiers for the fulfillment simulator
//!
//! This module contains fundamental types, identifiers, timestamp helpers and
//! configuration structures used throughout the simulation system.
//!
//! # Overview
//!
//! - **Identifiers**: UUID-based order identifiers and worker labels
//! - **Enums**: Channels, fulfillment statuses and output formats
//! - **Timestamps**: Fixed-width ISO-8601 storage text and minute deltas
//! - **Configuration**: Simulation configuration with validation and CLI support
//!
//! # Usage Example
//!
//! ```rust
//! use fulfillment_analytics_simulator::types::*;
//!
//! let order_id = OrderId::from_random_bytes([9u8; 16]);
//! assert_eq!(order_id, OrderId::from_random_bytes([9u8; 16]));
//!
//! let channel: Channel = "bopis".parse().unwrap();
//! assert_eq!(channel.as_str(), "BOPIS");
//!
//! let config = SimulationConfig {
//!     order_count: 100,
//!     seed: 7,
//!     ..Default::default()
//! };
//! assert!(config.validate().is_ok());
//! ```

pub mod config;
pub mod enums;
pub mod identifiers;
pub mod timestamp;

// Re-export all public types for convenience
pub use config::*;
pub use enums::*;
pub use identifiers::*;
pub use timestamp::*;
