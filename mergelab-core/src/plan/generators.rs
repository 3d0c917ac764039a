//! Workload generators: seeded, lazily evaluated plan producers.
//!
//! Generators implement `Iterator<Item = PlanAction>` and therefore
//! `InsertionPlan` via the blanket impl. They never materialize the plan,
//! so unbounded workloads cost nothing until pulled.

use std::ops::RangeInclusive;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::plan::PlanAction;
use crate::time::SimDelay;

/// Fixed-cadence workload: insert `bytes`, sleep `delay`, repeat.
pub struct PeriodicPlan {
    bytes: u64,
    delay: SimDelay,
    remaining: Option<u64>,
    sleep_pending: bool,
}

impl PeriodicPlan {
    /// A bounded plan of `count` inserts. Ends on the last insert, with no
    /// trailing sleep.
    pub fn new(bytes: u64, delay: SimDelay, count: u64) -> Self {
        Self {
            bytes,
            delay,
            remaining: Some(count),
            sleep_pending: false,
        }
    }

    /// An infinite insert/sleep cycle, bounded only by the host stopping
    /// the scheduler.
    pub fn unbounded(bytes: u64, delay: SimDelay) -> Self {
        Self {
            bytes,
            delay,
            remaining: None,
            sleep_pending: false,
        }
    }
}

impl Iterator for PeriodicPlan {
    type Item = PlanAction;

    fn next(&mut self) -> Option<PlanAction> {
        if self.sleep_pending {
            self.sleep_pending = false;
            return Some(PlanAction::Sleep { delay: self.delay });
        }
        match &mut self.remaining {
            Some(0) => return None,
            Some(remaining) => {
                *remaining -= 1;
                self.sleep_pending = *remaining > 0;
            }
            None => self.sleep_pending = true,
        }
        Some(PlanAction::Insert { bytes: self.bytes })
    }
}

/// Seeded randomized workload: part sizes and inter-insert delays drawn
/// uniformly from the given ranges. Same seed, same plan.
pub struct RandomPlan {
    rng: SmallRng,
    bytes: RangeInclusive<u64>,
    delay: RangeInclusive<SimDelay>,
    remaining: u64,
    sleep_pending: bool,
}

impl RandomPlan {
    pub fn new(
        seed: u64,
        bytes: RangeInclusive<u64>,
        delay: RangeInclusive<SimDelay>,
        parts: u64,
    ) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            bytes,
            delay,
            remaining: parts,
            sleep_pending: false,
        }
    }
}

impl Iterator for RandomPlan {
    type Item = PlanAction;

    fn next(&mut self) -> Option<PlanAction> {
        if self.sleep_pending {
            self.sleep_pending = false;
            return Some(PlanAction::Sleep {
                delay: self.rng.random_range(self.delay.clone()),
            });
        }
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        self.sleep_pending = self.remaining > 0;
        Some(PlanAction::Insert {
            bytes: self.rng.random_range(self.bytes.clone()),
        })
    }
}
