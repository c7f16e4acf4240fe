//! Statistics collection and reporting
//!
//! Counters gathered while a generation run builds its batch. They describe
//! what the run produced, independent of what was already in the store.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use crate::orders::{FulfillmentEvent, Order};
use crate::types::{Channel, FulfillmentStatus};

/// Summary of one generation run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationStatistics {
    /// Seed the run was generated from
    pub seed: u64,
    /// Number of orders written
    pub orders_generated: usize,
    /// Orders delivered without a late flag
    pub completed: usize,
    /// Orders delivered and flagged late
    pub late: usize,
    /// Orders canceled after a short pick
    pub canceled: usize,
    /// Orders per channel
    pub by_channel: BTreeMap<Channel, usize>,
    /// Orders flagged as expedited
    pub expedited: usize,
    /// Orders with at least one missing item
    pub out_of_stock_orders: usize,
    /// Orders delivered after the due time that were not flagged late
    pub overdue_unflagged: usize,
    /// Wall-clock time the run took
    pub duration: Duration,
}

impl GenerationStatistics {
    /// Create empty statistics for a run with the given seed
    pub fn new(seed: u64) -> Self {
        Self { seed, ..Default::default() }
    }

    /// Record one generated pair
    pub fn record(&mut self, order: &Order, event: &FulfillmentEvent) {
        self.orders_generated += 1;
        match event.status {
            FulfillmentStatus::Completed => self.completed += 1,
            FulfillmentStatus::Late => self.late += 1,
            FulfillmentStatus::Canceled => self.canceled += 1,
        }
        *self.by_channel.entry(order.channel).or_insert(0) += 1;

        if order.is_expedited {
            self.expedited += 1;
        }
        if event.out_of_stock_items > 0 {
            self.out_of_stock_orders += 1;
        }
        if event.status == FulfillmentStatus::Completed {
            if let Some(delivered) = event.delivered_ts {
                if order.is_overdue_at(&delivered) {
                    self.overdue_unflagged += 1;
                }
            }
        }
    }

    /// Set the run duration
    pub fn set_duration(&mut self, duration: Duration) {
        self.duration = duration;
    }

    /// Orders generated for one channel
    pub fn channel_count(&self, channel: Channel) -> usize {
        self.by_channel.get(&channel).copied().unwrap_or(0)
    }

    fn percentage(&self, count: usize) -> f64 {
        if self.orders_generated == 0 {
            0.0
        } else {
            (count as f64 / self.orders_generated as f64) * 100.0
        }
    }

    /// Percentage of orders flagged late
    pub fn late_percentage(&self) -> f64 {
        self.percentage(self.late)
    }

    /// Percentage of orders canceled
    pub fn canceled_percentage(&self) -> f64 {
        self.percentage(self.canceled)
    }

    /// Percentage of orders with a short pick
    pub fn out_of_stock_percentage(&self) -> f64 {
        self.percentage(self.out_of_stock_orders)
    }

    /// One-line summary suitable for logging
    pub fn summary_output(&self) -> String {
        format!(
            "Generated {} orders (seed {}) | completed {} | late {} ({:.1}%) | canceled {} ({:.1}%) | {:.2}s",
            self.orders_generated,
            self.seed,
            self.completed,
            self.late,
            self.late_percentage(),
            self.canceled,
            self.canceled_percentage(),
            self.duration.as_secs_f64()
        )
    }
}

impl fmt::Display for GenerationStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Generation Statistics:")?;
        writeln!(f, "  Seed: {}", self.seed)?;
        writeln!(f, "  Orders Generated: {}", self.orders_generated)?;
        writeln!(f, "  Completed: {}", self.completed)?;
        writeln!(f, "  Late: {} ({:.1}%)", self.late, self.late_percentage())?;
        writeln!(f, "  Canceled: {} ({:.1}%)", self.canceled, self.canceled_percentage())?;
        writeln!(
            f,
            "  Short Picks: {} ({:.1}%)",
            self.out_of_stock_orders,
            self.out_of_stock_percentage()
        )?;
        writeln!(f, "  Expedited: {}", self.expedited)?;
        writeln!(f, "  Overdue Without Late Flag: {}", self.overdue_unflagged)?;
        for channel in Channel::ALL {
            writeln!(f, "  {}: {}", channel, self.channel_count(channel))?;
        }
        write!(f, "  Duration: {:.2}s", self.duration.as_secs_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{OrderId, WorkerId};
    use chrono::{Duration as ChronoDuration, NaiveDate};

    fn pair(
        channel: Channel,
        status: FulfillmentStatus,
        delivered_after_hours: Option<i64>,
        out_of_stock_items: u32,
    ) -> (Order, FulfillmentEvent) {
        let created = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap().and_hms_opt(9, 0, 0).unwrap();
        let order = Order {
            order_id: OrderId::new(),
            created_ts: created,
            due_ts: created + ChronoDuration::hours(4),
            channel,
            items_count: 3,
            distance_miles: 2.5,
            is_expedited: false,
        };
        let event = FulfillmentEvent {
            event_id: None,
            order_id: order.order_id,
            worker_id: WorkerId::from("W1"),
            picked_ts: created + ChronoDuration::minutes(10),
            packed_ts: created + ChronoDuration::minutes(20),
            ready_ts: created + ChronoDuration::minutes(30),
            delivered_ts: delivered_after_hours.map(|h| created + ChronoDuration::hours(h)),
            status,
            out_of_stock_items,
        };
        (order, event)
    }

    #[test]
    fn test_empty_statistics() {
        let stats = GenerationStatistics::new(42);
        assert_eq!(stats.seed, 42);
        assert_eq!(stats.orders_generated, 0);
        assert_eq!(stats.late_percentage(), 0.0);
        assert_eq!(stats.channel_count(Channel::Bopis), 0);
    }

    #[test]
    fn test_record_counts() {
        let mut stats = GenerationStatistics::new(1);
        let pairs = [
            pair(Channel::Bopis, FulfillmentStatus::Completed, Some(2), 0),
            pair(Channel::Bopis, FulfillmentStatus::Completed, Some(6), 0),
            pair(Channel::Delivery, FulfillmentStatus::Late, Some(8), 1),
            pair(Channel::ShipToHome, FulfillmentStatus::Canceled, None, 2),
        ];
        for (order, event) in &pairs {
            stats.record(order, event);
        }

        assert_eq!(stats.orders_generated, 4);
        assert_eq!(stats.completed, 2);
        assert_eq!(stats.late, 1);
        assert_eq!(stats.canceled, 1);
        assert_eq!(stats.out_of_stock_orders, 2);
        assert_eq!(stats.overdue_unflagged, 1);
        assert_eq!(stats.channel_count(Channel::Bopis), 2);
        assert_eq!(stats.late_percentage(), 25.0);
    }

    #[test]
    fn test_summary_output() {
        let mut stats = GenerationStatistics::new(7);
        let (order, event) = pair(Channel::Delivery, FulfillmentStatus::Late, Some(9), 0);
        stats.record(&order, &event);

        let summary = stats.summary_output();
        assert!(summary.contains("Generated 1 orders (seed 7)"));
        assert!(summary.contains("late 1 (100.0%)"));

        let display = stats.to_string();
        assert!(display.contains("Late: 1 (100.0%)"));
        assert!(display.contains("Delivery: 1"));
    }
}
