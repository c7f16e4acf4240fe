//! KPI aggregation over the event store
//!
//! The [`Aggregator`] answers five read-only queries, each returning its own
//! record type. [`ReadyTimeHistogram`] and [`DetailFilter`] shape those results
//! for the report.

pub mod aggregator;
pub mod filter;
pub mod histogram;
pub mod records;

pub use aggregator::*;
pub use filter::*;
pub use histogram::*;
pub use records::*;
