//! Per-order process model
//!
//! One call to [`OrderGenerator::generate_pair`] walks the fulfillment process
//! for a single order as a fixed sequence of draws from the caller's generator:
//!
//! 1. placement time, due time, order id
//! 2. channel, basket size, distance, expedited flag
//! 3. worker
//! 4. pick, pack and ready offsets, each added to the previous stage
//! 5. stock outcome (short pick, then possible cancellation)
//! 6. hand-off time and late flag, for orders that were not canceled
//!
//! The order of draws is part of the determinism contract: reordering them
//! changes every dataset produced from a given seed.

use chrono::{Duration, NaiveDateTime};
use rand::Rng;
use tracing::trace;

use crate::orders::{FulfillmentEvent, Order};
use crate::simulation::{SimulationError, SimulationResult};
use crate::types::config::limits;
use crate::types::{
    round_to, Channel, DrawRange, FulfillmentStatus, OrderId, ProcessModel, WorkerId,
};

/// Result of the out-of-stock branch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockOutcome {
    /// Every item was picked
    InStock,
    /// Some items were missing but the order continued
    ShortPicked {
        /// Items that could not be picked
        missing: u32,
    },
    /// Some items were missing and the order was canceled
    Canceled {
        /// Items that could not be picked
        missing: u32,
    },
}

impl StockOutcome {
    /// Items that could not be picked
    pub fn missing_items(&self) -> u32 {
        match self {
            StockOutcome::InStock => 0,
            StockOutcome::ShortPicked { missing } | StockOutcome::Canceled { missing } => *missing,
        }
    }
}

/// Result of the hand-off stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handoff {
    /// The order never left the warehouse
    NotDelivered,
    /// Delivered by the due time
    OnTime(NaiveDateTime),
    /// Delivered after the due time without being reported late
    OverdueUnreported(NaiveDateTime),
    /// Delivered after the due time and reported late
    Late(NaiveDateTime),
}

impl Handoff {
    /// Terminal status for this hand-off
    pub fn status(&self) -> FulfillmentStatus {
        match self {
            Handoff::NotDelivered => FulfillmentStatus::Canceled,
            Handoff::OnTime(_) | Handoff::OverdueUnreported(_) => FulfillmentStatus::Completed,
            Handoff::Late(_) => FulfillmentStatus::Late,
        }
    }

    /// Delivery timestamp, if the order was delivered
    pub fn delivered_ts(&self) -> Option<NaiveDateTime> {
        match self {
            Handoff::NotDelivered => None,
            Handoff::OnTime(ts) | Handoff::OverdueUnreported(ts) | Handoff::Late(ts) => Some(*ts),
        }
    }
}

/// Generator of correlated (order, fulfillment event) pairs
#[derive(Debug, Clone)]
pub struct OrderGenerator {
    model: ProcessModel,
    worker_pool: Vec<WorkerId>,
    history_days: u32,
}

impl OrderGenerator {
    /// Create a generator over a non-empty worker pool
    pub fn new(
        model: ProcessModel,
        worker_pool: Vec<WorkerId>,
        history_days: u32,
    ) -> SimulationResult<Self> {
        if worker_pool.is_empty() {
            return Err(SimulationError::invalid_argument("worker pool must not be empty"));
        }
        if history_days == 0 || history_days > limits::MAX_HISTORY_DAYS {
            return Err(SimulationError::invalid_argument(format!(
                "history must span 1 to {} days, got {}",
                limits::MAX_HISTORY_DAYS,
                history_days
            )));
        }
        model.validate()?;
        Ok(Self { model, worker_pool, history_days })
    }

    /// Process parameters in use
    pub fn model(&self) -> &ProcessModel {
        &self.model
    }

    /// Length of the history window in days
    pub fn history_days(&self) -> u32 {
        self.history_days
    }

    /// Check that every timestamp a history ending at `anchor` can reach is
    /// representable
    pub fn check_horizon(&self, anchor: NaiveDateTime) -> SimulationResult<()> {
        let model = &self.model;
        let slowest_handoff = Channel::ALL
            .iter()
            .map(|channel| model.delivery_minutes(*channel).max)
            .max()
            .unwrap_or_default();
        let stage_minutes = model.pick_minutes.max
            + model.pack_minutes.max
            + model.ready_minutes.max
            + slowest_handoff;
        let horizon = stage_minutes.max(model.due_hours.max * 60);

        Duration::try_minutes(horizon)
            .and_then(|horizon| anchor.checked_add_signed(horizon))
            .map(|_| ())
            .ok_or_else(|| {
                SimulationError::invalid_argument(format!(
                    "orders placed up to {} would end past the representable range",
                    anchor
                ))
            })
    }

    /// Generate one order and its fulfillment event
    pub fn generate_pair<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        window_start: NaiveDateTime,
    ) -> (Order, FulfillmentEvent) {
        let model = &self.model;

        let window_minutes = self.history_days as i64 * 24 * 60;
        let created_ts = window_start + Duration::minutes(rng.gen_range(0..=window_minutes));
        let due_ts = created_ts + Duration::hours(draw(rng, model.due_hours));
        let order_id = OrderId::from_random_bytes(rng.gen());

        let channel = Channel::ALL[rng.gen_range(0..Channel::ALL.len())];
        let items_count = draw(rng, model.items_count) as u32;
        let distance_miles =
            round_to(rng.gen_range(model.min_distance_miles..=model.max_distance_miles), 2);
        let is_expedited = rng.gen_bool(model.expedited_probability);

        let worker_id = self.worker_pool[rng.gen_range(0..self.worker_pool.len())].clone();

        let picked_ts = created_ts + Duration::minutes(draw(rng, model.pick_minutes));
        let packed_ts = picked_ts + Duration::minutes(draw(rng, model.pack_minutes));
        let ready_ts = packed_ts + Duration::minutes(draw(rng, model.ready_minutes));

        let stock = self.draw_stock_outcome(rng, items_count);
        let handoff = match stock {
            StockOutcome::Canceled { .. } => Handoff::NotDelivered,
            _ => self.draw_handoff(rng, channel, ready_ts, due_ts),
        };

        trace!(%order_id, %channel, ?stock, ?handoff, "Generated order");

        let order = Order {
            order_id,
            created_ts,
            due_ts,
            channel,
            items_count,
            distance_miles,
            is_expedited,
        };
        let event = FulfillmentEvent {
            event_id: None,
            order_id,
            worker_id,
            picked_ts,
            packed_ts,
            ready_ts,
            delivered_ts: handoff.delivered_ts(),
            status: handoff.status(),
            out_of_stock_items: stock.missing_items(),
        };

        debug_assert!(order.due_ts > order.created_ts);
        debug_assert!(event.is_consistent_with(&order));
        (order, event)
    }

    /// Out-of-stock branch: short pick grows likelier with basket size, and a
    /// short pick may then be canceled
    pub fn draw_stock_outcome<R: Rng + ?Sized>(&self, rng: &mut R, items_count: u32) -> StockOutcome {
        let model = &self.model;
        let short_probability = model.out_of_stock_probability(items_count).clamp(0.0, 1.0);
        if !rng.gen_bool(short_probability) {
            return StockOutcome::InStock;
        }

        let ceiling = model.max_out_of_stock_items.min(items_count).max(1);
        let missing = rng.gen_range(1..=ceiling);
        if rng.gen_bool(model.cancel_on_out_of_stock_probability) {
            StockOutcome::Canceled { missing }
        } else {
            StockOutcome::ShortPicked { missing }
        }
    }

    /// Hand-off stage: channel latency after ready, then the late flag, which is
    /// only drawn for overdue deliveries
    pub fn draw_handoff<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        channel: Channel,
        ready_ts: NaiveDateTime,
        due_ts: NaiveDateTime,
    ) -> Handoff {
        let delivered_ts =
            ready_ts + Duration::minutes(draw(rng, self.model.delivery_minutes(channel)));
        if delivered_ts <= due_ts {
            Handoff::OnTime(delivered_ts)
        } else if rng.gen_bool(self.model.late_flag_probability) {
            Handoff::Late(delivered_ts)
        } else {
            Handoff::OverdueUnreported(delivered_ts)
        }
    }
}

fn draw<R: Rng + ?Sized>(rng: &mut R, range: DrawRange) -> i64 {
    rng.gen_range(range.min..=range.max)
}
