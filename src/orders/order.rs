//! Order record

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::types::{Channel, OrderId};

/// A customer order as placed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Primary key
    pub order_id: OrderId,
    /// When the order was placed
    pub created_ts: NaiveDateTime,
    /// When fulfillment is expected to be finished
    pub due_ts: NaiveDateTime,
    /// Fulfillment method
    pub channel: Channel,
    /// Number of items in the basket (at least one)
    pub items_count: u32,
    /// Distance to the customer in miles
    pub distance_miles: f64,
    /// Whether the customer paid for expedited handling
    pub is_expedited: bool,
}

impl Order {
    /// Time allowed between placement and the due time
    pub fn promised_window(&self) -> chrono::Duration {
        self.due_ts - self.created_ts
    }

    /// Whether a hand-off at `delivered_ts` missed the due time
    pub fn is_overdue_at(&self, delivered_ts: &NaiveDateTime) -> bool {
        *delivered_ts > self.due_ts
    }
}
