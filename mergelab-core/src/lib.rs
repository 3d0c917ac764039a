//! # mergelab-core
//!
//! Domain model for deterministic merge-tree write-path experiments.
//! Built so that a whole experiment run is reproducible from a seed and a
//! plan, with no wall-clock dependence anywhere.
//!
//! ### Key Submodules:
//! - `time`: virtual-time types and the `VirtualClock` owned by the scheduler
//! - `plan`: insertion-plan actions, the pull-based `InsertionPlan` contract,
//!   and seeded workload generators
//! - `storage`: the `InsertTarget` entry point and the `MergeTree` part store
//! - `error`: simulation error taxonomy

pub mod error;
pub mod plan;
pub mod storage;
pub mod time;

pub mod prelude {
    pub use crate::error::SimulationError;
    pub use crate::plan::{InsertionPlan, PlanAction};
    pub use crate::storage::{InsertTarget, MergeTree};
    pub use crate::time::{SimDelay, SimTime, VirtualClock};
}

pub use error::SimulationError;
