//! Fulfillment event record

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::Order;
use crate::types::{FulfillmentStatus, OrderId, WorkerId};

/// The warehouse history of one order
///
/// Stage timestamps are strictly increasing from the order's creation:
/// `created < picked < packed < ready [< delivered]`. `delivered_ts` is absent
/// exactly when the status is [`FulfillmentStatus::Canceled`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FulfillmentEvent {
    /// Store-assigned key; `None` until the event has been appended
    pub event_id: Option<i64>,
    /// Order this event belongs to
    pub order_id: OrderId,
    /// Worker who picked and packed the order
    pub worker_id: WorkerId,
    /// When the items were picked
    pub picked_ts: NaiveDateTime,
    /// When the order was packed
    pub packed_ts: NaiveDateTime,
    /// When the order was staged for hand-off
    pub ready_ts: NaiveDateTime,
    /// When the customer received the order
    pub delivered_ts: Option<NaiveDateTime>,
    /// Terminal outcome
    pub status: FulfillmentStatus,
    /// Items that could not be picked
    pub out_of_stock_items: u32,
}

impl FulfillmentEvent {
    /// Whether the stage timestamps are strictly increasing after `created_ts`
    pub fn is_causally_ordered(&self, created_ts: &NaiveDateTime) -> bool {
        let staged = *created_ts < self.picked_ts
            && self.picked_ts < self.packed_ts
            && self.packed_ts < self.ready_ts;
        match self.delivered_ts {
            Some(delivered) => staged && self.ready_ts < delivered,
            None => staged,
        }
    }

    /// Whether the status agrees with the presence of a delivery timestamp
    pub fn is_status_consistent(&self) -> bool {
        self.status.is_delivered() == self.delivered_ts.is_some()
    }

    /// Full record check against the order it belongs to
    pub fn is_consistent_with(&self, order: &Order) -> bool {
        self.order_id == order.order_id
            && self.is_causally_ordered(&order.created_ts)
            && self.is_status_consistent()
            && self.out_of_stock_items <= order.items_count
    }
}
