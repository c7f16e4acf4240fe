//! Detail row filtering

use serde::{Deserialize, Serialize};

use super::OrderDetail;
use crate::types::{Channel, FulfillmentStatus};

/// Optional channel, status and worker sets applied to detail rows
///
/// An empty set places no restriction. A row passes when it matches every
/// non-empty set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetailFilter {
    /// Channels to keep
    pub channels: Vec<Channel>,
    /// Statuses to keep
    pub statuses: Vec<FulfillmentStatus>,
    /// Worker ids to keep
    pub workers: Vec<String>,
}

impl DetailFilter {
    /// Whether the filter restricts anything
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty() && self.statuses.is_empty() && self.workers.is_empty()
    }

    /// Whether a single row passes
    pub fn matches(&self, row: &OrderDetail) -> bool {
        (self.channels.is_empty() || self.channels.contains(&row.channel))
            && (self.statuses.is_empty() || self.statuses.contains(&row.status))
            && (self.workers.is_empty() || self.workers.iter().any(|w| w == row.worker_id.as_str()))
    }

    /// Keep the passing rows, preserving their order
    pub fn apply(&self, rows: Vec<OrderDetail>) -> Vec<OrderDetail> {
        if self.is_empty() {
            return rows;
        }
        rows.into_iter().filter(|row| self.matches(row)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{OrderId, WorkerId};
    use chrono::NaiveDate;

    fn row(event_id: i64, channel: Channel, status: FulfillmentStatus, worker: &str) -> OrderDetail {
        let created = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap().and_hms_opt(9, 0, 0).unwrap();
        OrderDetail {
            event_id,
            order_id: OrderId::new(),
            created_ts: created,
            due_ts: created,
            channel,
            items_count: 1,
            distance_miles: 1.0,
            is_expedited: false,
            worker_id: WorkerId::from(worker),
            status,
            out_of_stock_items: 0,
            minutes_to_ready: 30.0,
            minutes_to_delivered: None,
        }
    }

    fn rows() -> Vec<OrderDetail> {
        vec![
            row(1, Channel::Bopis, FulfillmentStatus::Completed, "W1"),
            row(2, Channel::Delivery, FulfillmentStatus::Late, "W2"),
            row(3, Channel::Bopis, FulfillmentStatus::Canceled, "W2"),
            row(4, Channel::ShipToHome, FulfillmentStatus::Late, "W3"),
        ]
    }

    #[test]
    fn test_empty_filter_keeps_everything() {
        let filter = DetailFilter::default();
        assert!(filter.is_empty());
        assert_eq!(filter.apply(rows()).len(), 4);
    }

    #[test]
    fn test_single_dimension() {
        let filter = DetailFilter { channels: vec![Channel::Bopis], ..Default::default() };
        let kept: Vec<i64> = filter.apply(rows()).iter().map(|r| r.event_id).collect();
        assert_eq!(kept, vec![1, 3]);
    }

    #[test]
    fn test_dimensions_combine() {
        let filter = DetailFilter {
            statuses: vec![FulfillmentStatus::Late, FulfillmentStatus::Canceled],
            workers: vec!["W2".to_string()],
            ..Default::default()
        };
        let kept: Vec<i64> = filter.apply(rows()).iter().map(|r| r.event_id).collect();
        assert_eq!(kept, vec![2, 3]);
    }

    #[test]
    fn test_no_match() {
        let filter = DetailFilter { workers: vec!["W9".to_string()], ..Default::default() };
        assert!(filter.apply(rows()).is_empty());
    }
}
