//! Order and fulfillment event records
//!
//! An [`Order`] is placed once and never changes. Exactly one
//! [`FulfillmentEvent`] is generated with it, carrying the pick, pack, ready and
//! hand-off timestamps plus the terminal status.

pub mod fulfillment_event;
pub mod order;

pub use fulfillment_event::*;
pub use order::*;
