//! Event store
//!
//! SQLite persistence for orders and fulfillment events. Only this module
//! talks to the database; the simulator writes through
//! [`EventStore::persist_batch`] and the aggregator reads through the bulk
//! read methods.

pub mod event_store;
pub mod schema;

pub use event_store::*;
