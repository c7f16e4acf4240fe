//! Batch order generator
//!
//! This module contains the BatchOrderGenerator, which builds a complete batch
//! of correlated orders and fulfillment events in memory and then commits it to
//! the event store in a single transaction. A failed run leaves the store as it
//! was before the run started.

use std::time::Instant;
use tracing::{debug, info, instrument};

use crate::simulation::{
    GenerationContext, GenerationStatistics, OrderGenerator, SimulationError, SimulationResult,
};
use crate::store::EventStore;
use crate::types::{SimulationConfig, WorkerId};

/// Batch generator that writes `n` orders per call
#[derive(Debug, Clone)]
pub struct BatchOrderGenerator {
    /// Per-order process model
    order_generator: OrderGenerator,
    /// Largest batch accepted in one call
    max_orders_per_run: usize,
}

impl BatchOrderGenerator {
    /// Create a batch generator from configuration
    #[instrument(skip(config), fields(workers = config.worker_pool.len(), history_days = config.history_days))]
    pub fn new(config: &SimulationConfig) -> SimulationResult<Self> {
        let worker_pool = config.worker_pool.iter().map(|w| WorkerId::new(w.clone())).collect();
        let order_generator =
            OrderGenerator::new(config.process_model.clone(), worker_pool, config.history_days)?;

        debug!(max_orders_per_run = config.max_orders_per_run, "Initialized batch order generator");
        Ok(Self { order_generator, max_orders_per_run: config.max_orders_per_run })
    }

    /// Per-order generator in use
    pub fn order_generator(&self) -> &OrderGenerator {
        &self.order_generator
    }

    /// Generate `n` orders with one fulfillment event each and persist them
    ///
    /// `n == 0` is a no-op. `n` above the configured maximum is rejected before
    /// anything is drawn or written.
    #[instrument(skip(self, ctx), fields(seed = ctx.seed(), anchor = %ctx.anchor()))]
    pub fn generate(
        &self,
        ctx: &mut GenerationContext<'_>,
        n: usize,
    ) -> SimulationResult<GenerationStatistics> {
        if n > self.max_orders_per_run {
            return Err(SimulationError::invalid_argument(format!(
                "order count {} exceeds the maximum of {} per run",
                n, self.max_orders_per_run
            )));
        }

        let mut statistics = GenerationStatistics::new(ctx.seed());
        if n == 0 {
            debug!("Nothing to generate");
            return Ok(statistics);
        }

        info!("Generating {} orders", n);
        let start_time = Instant::now();
        let window_start = ctx.window_start(self.order_generator.history_days())?;
        self.order_generator.check_horizon(ctx.anchor())?;

        let mut pairs = Vec::with_capacity(n);
        for _ in 0..n {
            let (order, event) = self.order_generator.generate_pair(ctx.rng_mut(), window_start);
            statistics.record(&order, &event);
            pairs.push((order, event));
        }

        ctx.store_mut().persist_batch(&pairs)?;
        statistics.set_duration(start_time.elapsed());

        info!("{}", statistics.summary_output());
        Ok(statistics)
    }
}

/// Generate `config.order_count` orders into `store`
pub fn run(store: &mut EventStore, config: &SimulationConfig) -> SimulationResult<GenerationStatistics> {
    let generator = BatchOrderGenerator::new(config)?;
    let mut ctx = GenerationContext::from_config(store, config)?;
    generator.generate(&mut ctx, config.order_count)
}
