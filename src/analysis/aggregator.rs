//! Read-only KPI queries over the event store
//!
//! Joins, grouping, ordering and limits run in SQLite. Joined queries pair each
//! fulfillment event with its order by `order_id` and ignore events whose order
//! is missing. Durations are minutes computed in memory from millisecond
//! differences; means are taken over unrounded values and rounded once at the
//! end.

use std::collections::BTreeMap;
use tracing::{debug, instrument, warn};

use super::{KpiSummary, OrderDetail, ReadyTimeHistogram, StatusCount, WorkerPerformance};
use crate::orders::{FulfillmentEvent, Order};
use crate::simulation::{SimulationError, SimulationResult};
use crate::store::EventStore;
use crate::types::{minutes_between, round_to, FulfillmentStatus, WorkerId};

/// An event together with the order it belongs to
#[derive(Debug)]
struct JoinedRow {
    order: Order,
    event: FulfillmentEvent,
}

impl JoinedRow {
    fn event_id(&self) -> i64 {
        self.event.event_id.unwrap_or_default()
    }

    fn minutes_to_pick(&self) -> f64 {
        minutes_between(&self.order.created_ts, &self.event.picked_ts)
    }

    fn minutes_to_ready(&self) -> f64 {
        minutes_between(&self.order.created_ts, &self.event.ready_ts)
    }

    fn minutes_to_delivered(&self) -> Option<f64> {
        self.event.delivered_ts.as_ref().map(|ts| minutes_between(&self.order.created_ts, ts))
    }
}

#[derive(Debug, Default)]
struct WorkerAccumulator {
    orders: usize,
    pick_minutes: f64,
    ready_minutes: f64,
    late: usize,
    canceled: usize,
}

/// Aggregator borrowing an event store
#[derive(Debug, Clone, Copy)]
pub struct Aggregator<'a> {
    store: &'a EventStore,
}

impl<'a> Aggregator<'a> {
    /// Create an aggregator over `store`
    pub fn new(store: &'a EventStore) -> Self {
        Self { store }
    }

    fn joined_rows(&self) -> SimulationResult<Vec<JoinedRow>> {
        let orphaned = self.store.orphaned_event_count()?;
        if orphaned > 0 {
            warn!(orphaned, "Ignoring events without a stored order");
        }

        Ok(self
            .store
            .joined_events()?
            .into_iter()
            .map(|(order, event)| JoinedRow { order, event })
            .collect())
    }

    /// Headline KPIs over every joined row
    #[instrument(skip(self))]
    pub fn kpis(&self) -> SimulationResult<KpiSummary> {
        let rows = self.joined_rows()?;
        let mut summary = KpiSummary { total: rows.len(), ..Default::default() };
        if rows.is_empty() {
            return Ok(summary);
        }

        let mut ready_minutes = 0.0;
        let mut out_of_stock_items = 0u64;
        for row in &rows {
            match row.event.status {
                FulfillmentStatus::Completed => summary.completed += 1,
                FulfillmentStatus::Late => summary.late += 1,
                FulfillmentStatus::Canceled => summary.canceled += 1,
            }
            ready_minutes += row.minutes_to_ready();
            out_of_stock_items += row.event.out_of_stock_items as u64;
        }

        let total = rows.len() as f64;
        summary.avg_minutes_to_ready = Some(round_to(ready_minutes / total, 1));
        summary.avg_out_of_stock_items = Some(round_to(out_of_stock_items as f64 / total, 2));

        debug!(total = summary.total, late = summary.late, "Computed KPIs");
        Ok(summary)
    }

    /// Event counts per status, largest first
    ///
    /// Counts every stored event, whether or not its order exists.
    #[instrument(skip(self))]
    pub fn status_breakdown(&self) -> SimulationResult<Vec<StatusCount>> {
        Ok(self
            .store
            .status_counts()?
            .into_iter()
            .map(|(status, count)| StatusCount { status, count })
            .collect())
    }

    /// Throughput and timing per worker, busiest first
    #[instrument(skip(self))]
    pub fn worker_performance(&self) -> SimulationResult<Vec<WorkerPerformance>> {
        let mut by_worker: BTreeMap<WorkerId, WorkerAccumulator> = BTreeMap::new();
        for row in self.joined_rows()? {
            let acc = by_worker.entry(row.event.worker_id.clone()).or_default();
            acc.orders += 1;
            acc.pick_minutes += row.minutes_to_pick();
            acc.ready_minutes += row.minutes_to_ready();
            match row.event.status {
                FulfillmentStatus::Late => acc.late += 1,
                FulfillmentStatus::Canceled => acc.canceled += 1,
                FulfillmentStatus::Completed => {}
            }
        }

        let mut performance: Vec<WorkerPerformance> = by_worker
            .into_iter()
            .map(|(worker_id, acc)| {
                let orders = acc.orders as f64;
                WorkerPerformance {
                    worker_id,
                    orders_handled: acc.orders,
                    avg_minutes_to_pick: round_to(acc.pick_minutes / orders, 1),
                    avg_minutes_to_ready: round_to(acc.ready_minutes / orders, 1),
                    late: acc.late,
                    canceled: acc.canceled,
                }
            })
            .collect();
        // Stable: ties keep worker id order
        performance.sort_by(|a, b| b.orders_handled.cmp(&a.orders_handled));
        Ok(performance)
    }

    /// Minutes from placement to ready for every joined row, in event id order
    #[instrument(skip(self))]
    pub fn ready_time_distribution(&self) -> SimulationResult<Vec<f64>> {
        Ok(self.joined_rows()?.iter().map(|row| round_to(row.minutes_to_ready(), 1)).collect())
    }

    /// Histogram of [`Aggregator::ready_time_distribution`]
    pub fn ready_time_histogram(&self, bins: usize) -> SimulationResult<ReadyTimeHistogram> {
        ReadyTimeHistogram::from_values(&self.ready_time_distribution()?, bins)
    }

    /// The `limit` most recently placed joined rows
    #[instrument(skip(self))]
    pub fn orders_detail(&self, limit: usize) -> SimulationResult<Vec<OrderDetail>> {
        if limit == 0 {
            return Err(SimulationError::invalid_argument("limit must be greater than 0"));
        }

        Ok(self
            .store
            .recent_joined_events(limit)?
            .into_iter()
            .map(|(order, event)| detail_from_row(JoinedRow { order, event }))
            .collect())
    }
}

fn detail_from_row(row: JoinedRow) -> OrderDetail {
    let minutes_to_ready = round_to(row.minutes_to_ready(), 1);
    let minutes_to_delivered = row.minutes_to_delivered().map(|m| round_to(m, 1));
    let event_id = row.event_id();
    let JoinedRow { order, event } = row;

    OrderDetail {
        event_id,
        order_id: order.order_id,
        created_ts: order.created_ts,
        due_ts: order.due_ts,
        channel: order.channel,
        items_count: order.items_count,
        distance_miles: order.distance_miles,
        is_expedited: order.is_expedited,
        worker_id: event.worker_id,
        status: event.status,
        out_of_stock_items: event.out_of_stock_items,
        minutes_to_ready,
        minutes_to_delivered,
    }
}
