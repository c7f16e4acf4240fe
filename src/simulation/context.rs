//! Generation context
//!
//! Carries everything a run needs that would otherwise be process-wide state:
//! the single seeded random generator, the end of the history window, and the
//! store the run writes to.

use chrono::{Duration, NaiveDateTime};
use rand::{rngs::StdRng, SeedableRng};

use crate::simulation::{SimulationError, SimulationResult};
use crate::store::EventStore;
use crate::types::{now_truncated, SimulationConfig};

/// Explicit state for one generation run
#[derive(Debug)]
pub struct GenerationContext<'s> {
    store: &'s mut EventStore,
    rng: StdRng,
    seed: u64,
    anchor: NaiveDateTime,
}

impl<'s> GenerationContext<'s> {
    /// Create a context whose history window ends at `anchor`
    pub fn new(store: &'s mut EventStore, seed: u64, anchor: NaiveDateTime) -> Self {
        Self { store, rng: StdRng::seed_from_u64(seed), seed, anchor }
    }

    /// Create a context from configuration; an unpinned anchor means now
    pub fn from_config(store: &'s mut EventStore, config: &SimulationConfig) -> SimulationResult<Self> {
        let anchor = config.anchor()?.unwrap_or_else(now_truncated);
        Ok(Self::new(store, config.seed, anchor))
    }

    /// Seed the generator was created from
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// End of the history window
    pub fn anchor(&self) -> NaiveDateTime {
        self.anchor
    }

    /// Start of a history window of `history_days` ending at the anchor
    pub fn window_start(&self, history_days: u32) -> SimulationResult<NaiveDateTime> {
        Duration::try_days(history_days as i64)
            .and_then(|window| self.anchor.checked_sub_signed(window))
            .ok_or_else(|| {
                SimulationError::invalid_argument(format!(
                    "a {} day history ending at {} is out of range",
                    history_days, self.anchor
                ))
            })
    }

    /// The run's random generator
    pub fn rng_mut(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// The store the run writes to
    pub fn store_mut(&mut self) -> &mut EventStore {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rand::Rng;

    fn anchor() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap().and_hms_opt(0, 0, 0).unwrap()
    }

    #[test]
    fn test_window_start() {
        let mut store = EventStore::in_memory().unwrap();
        let ctx = GenerationContext::new(&mut store, 1, anchor());
        assert_eq!(ctx.window_start(30).unwrap(), anchor() - Duration::days(30));
        assert_eq!(ctx.anchor(), anchor());
    }

    #[test]
    fn test_window_start_out_of_range() {
        let mut store = EventStore::in_memory().unwrap();
        let ctx = GenerationContext::new(&mut store, 1, NaiveDateTime::MIN);
        assert!(matches!(ctx.window_start(1), Err(SimulationError::InvalidArgument(_))));
    }

    #[test]
    fn test_same_seed_same_stream() {
        let mut store_a = EventStore::in_memory().unwrap();
        let mut store_b = EventStore::in_memory().unwrap();
        let mut ctx_a = GenerationContext::new(&mut store_a, 99, anchor());
        let mut ctx_b = GenerationContext::new(&mut store_b, 99, anchor());

        let a: Vec<u64> = (0..8).map(|_| ctx_a.rng_mut().gen()).collect();
        let b: Vec<u64> = (0..8).map(|_| ctx_b.rng_mut().gen()).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_from_config_uses_pinned_anchor() {
        let mut store = EventStore::in_memory().unwrap();
        let config = SimulationConfig {
            seed: 5,
            anchor_time: Some("2024-06-01T00:00:00".to_string()),
            ..Default::default()
        };
        let ctx = GenerationContext::from_config(&mut store, &config).unwrap();
        assert_eq!(ctx.seed(), 5);
        assert_eq!(ctx.anchor(), anchor());
    }
}
