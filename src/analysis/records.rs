//! Typed aggregator outputs

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::types::{Channel, FulfillmentStatus, OrderId, WorkerId};

/// Headline metrics over every joined (event, order) row
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KpiSummary {
    /// Joined rows
    pub total: usize,
    /// Rows with status Completed
    pub completed: usize,
    /// Rows with status Late
    pub late: usize,
    /// Rows with status Canceled
    pub canceled: usize,
    /// Mean minutes from placement to ready, 1 decimal; `None` without rows
    pub avg_minutes_to_ready: Option<f64>,
    /// Mean missing items per row, 2 decimals; `None` without rows
    pub avg_out_of_stock_items: Option<f64>,
}

impl KpiSummary {
    /// Late rows as a percentage of all rows
    pub fn late_rate(&self) -> f64 {
        rate(self.late, self.total)
    }

    /// Canceled rows as a percentage of all rows
    pub fn cancel_rate(&self) -> f64 {
        rate(self.canceled, self.total)
    }
}

fn rate(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

/// Event count for one status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCount {
    /// Status
    pub status: FulfillmentStatus,
    /// Events with that status
    pub count: usize,
}

/// Per-worker throughput and timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerPerformance {
    /// Worker
    pub worker_id: WorkerId,
    /// Joined rows handled by the worker
    pub orders_handled: usize,
    /// Mean minutes from placement to pick, 1 decimal
    pub avg_minutes_to_pick: f64,
    /// Mean minutes from placement to ready, 1 decimal
    pub avg_minutes_to_ready: f64,
    /// Rows with status Late
    pub late: usize,
    /// Rows with status Canceled
    pub canceled: usize,
}

/// One joined row with derived durations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderDetail {
    /// Store-assigned event id
    pub event_id: i64,
    /// Order
    pub order_id: OrderId,
    /// Placement time
    pub created_ts: NaiveDateTime,
    /// Promised time
    pub due_ts: NaiveDateTime,
    /// Fulfillment channel
    pub channel: Channel,
    /// Basket size
    pub items_count: u32,
    /// Distance to the customer
    pub distance_miles: f64,
    /// Expedited flag
    pub is_expedited: bool,
    /// Worker who handled the order
    pub worker_id: WorkerId,
    /// Terminal status
    pub status: FulfillmentStatus,
    /// Items that could not be picked
    pub out_of_stock_items: u32,
    /// Minutes from placement to ready, 1 decimal
    pub minutes_to_ready: f64,
    /// Minutes from placement to delivery, 1 decimal; `None` when not delivered
    pub minutes_to_delivered: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rates() {
        let summary = KpiSummary { total: 8, late: 2, canceled: 1, completed: 5, ..Default::default() };
        assert_eq!(summary.late_rate(), 25.0);
        assert_eq!(summary.cancel_rate(), 12.5);
    }

    #[test]
    fn test_rates_on_empty_summary() {
        let summary = KpiSummary::default();
        assert_eq!(summary.late_rate(), 0.0);
        assert_eq!(summary.cancel_rate(), 0.0);
        assert!(summary.avg_minutes_to_ready.is_none());
    }
}
