//! Insertion plans: the action vocabulary and the pull-based plan contract.
//!
//! A plan is a lazy, possibly infinite sequence of actions consumed one at a
//! time by exactly one driver. Plans are not restartable: once an action has
//! been pulled it is gone.

use serde::{Deserialize, Serialize};

use crate::time::SimDelay;

pub mod generators;

/// One instruction in an insertion plan.
///
/// Scenario files spell these as `{type: insert, bytes: N}` and
/// `{type: sleep, delay: D}`. Any other tag is captured verbatim by
/// `Unknown` and rejected by the driver when dequeued.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PlanAction {
    /// Insert one part of the given byte size.
    Insert { bytes: u64 },
    /// Pause the plan for `delay` virtual ticks; `delay <= 0` is a no-op.
    Sleep { delay: SimDelay },
    /// Anything else found in a scenario file. Not a valid action.
    #[serde(untagged)]
    Unknown(serde_yaml::Value),
}

/// Pull protocol for insertion plans.
///
/// Yields `Some(action)` until exhaustion, then `None` forever after.
/// Exhaustion is the designed terminal condition, not an error.
pub trait InsertionPlan {
    fn next_action(&mut self) -> Option<PlanAction>;
}

impl<I: Iterator<Item = PlanAction>> InsertionPlan for I {
    #[inline]
    fn next_action(&mut self) -> Option<PlanAction> {
        self.next()
    }
}
