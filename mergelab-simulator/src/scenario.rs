//! Scenario harness: YAML scenario model, workload construction, and run
//! orchestration with deterministic state-hash validation.

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use mergelab_core::error::SimulationError;
use mergelab_core::plan::generators::{PeriodicPlan, RandomPlan};
use mergelab_core::plan::PlanAction;
use mergelab_core::storage::MergeTree;
use mergelab_core::time::{SimDelay, SimTime};

use crate::inserter::InsertionDriver;
use crate::scheduler::EventSimulator;

/// A complete experiment description. Everything a run needs to be
/// reproduced lives here.
#[derive(Debug, Serialize, Deserialize)]
pub struct Scenario {
    /// Seed for randomized workloads.
    #[serde(default)]
    pub seed: u64,
    /// Stop the run at this virtual time. Required in spirit for unbounded
    /// workloads, which never exhaust on their own.
    #[serde(default)]
    pub limit: Option<SimTime>,
    /// Expected state hash from a previous run of this scenario.
    #[serde(default)]
    pub expect_hash: Option<String>,
    /// The insertion workload to replay.
    pub workload: Workload,
}

/// How the insertion plan is produced.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Workload {
    /// A literal action list, in plan order.
    Explicit { actions: Vec<PlanAction> },
    /// Insert `bytes`, sleep `delay`, repeat. `count: ~` means unbounded.
    Periodic {
        bytes: u64,
        delay: SimDelay,
        #[serde(default)]
        count: Option<u64>,
    },
    /// Seeded random part sizes and delays, uniform in the given bounds.
    Random {
        parts: u64,
        min_bytes: u64,
        max_bytes: u64,
        min_delay: SimDelay,
        max_delay: SimDelay,
    },
}

impl Workload {
    /// Builds the lazy plan this workload describes.
    pub fn build_plan(&self, seed: u64) -> Box<dyn Iterator<Item = PlanAction>> {
        match self {
            Workload::Explicit { actions } => Box::new(actions.clone().into_iter()),
            Workload::Periodic {
                bytes,
                delay,
                count: Some(count),
            } => Box::new(PeriodicPlan::new(*bytes, *delay, *count)),
            Workload::Periodic {
                bytes,
                delay,
                count: None,
            } => Box::new(PeriodicPlan::unbounded(*bytes, *delay)),
            Workload::Random {
                parts,
                min_bytes,
                max_bytes,
                min_delay,
                max_delay,
            } => Box::new(RandomPlan::new(
                seed,
                *min_bytes..=*max_bytes,
                *min_delay..=*max_delay,
                *parts,
            )),
        }
    }
}

#[derive(Error, Debug)]
pub enum ScenarioError {
    #[error("Scenario file not found: {0}")]
    FileNotFound(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Deserialization error: {0}")]
    Serde(#[from] serde_yaml::Error),
}

/// Loads a scenario from a YAML file.
pub fn load_scenario<P: AsRef<Path>>(path: P) -> Result<Scenario, ScenarioError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ScenarioError::FileNotFound(format!(
            "{} does not exist",
            path.display()
        )));
    }
    let content = std::fs::read_to_string(path)?;
    let scenario: Scenario = serde_yaml::from_str(&content)?;
    Ok(scenario)
}

/// What a finished run looked like.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub final_time: SimTime,
    pub inserted_parts: u64,
    pub inserted_bytes: u64,
    pub state_hash: String,
}

/// Runs a scenario to completion (or to its time limit) and reports on it.
///
/// If the scenario carries an expected hash, the run fails with
/// [`SimulationError::HashMismatch`] when the replay diverges.
pub fn run_scenario(scenario: &Scenario) -> Result<RunReport, SimulationError> {
    let mut sim = EventSimulator::new(0);
    let storage = Rc::new(RefCell::new(MergeTree::new()));
    let plan = scenario.workload.build_plan(scenario.seed);

    InsertionDriver::spawn(&mut sim, Rc::clone(&storage), plan)?;
    match scenario.limit {
        Some(limit) => sim.run_until(limit)?,
        None => sim.run()?,
    }

    let report = {
        let storage = storage.borrow();
        RunReport {
            final_time: sim.now(),
            inserted_parts: storage.inserted_parts(),
            inserted_bytes: storage.inserted_bytes(),
            state_hash: storage.state_hash(),
        }
    };
    info!(
        final_time = report.final_time,
        parts = report.inserted_parts,
        bytes = report.inserted_bytes,
        hash = %report.state_hash,
        "run complete"
    );

    if let Some(expected) = &scenario.expect_hash {
        if *expected != report.state_hash {
            return Err(SimulationError::HashMismatch {
                expected: expected.clone(),
                actual: report.state_hash,
            });
        }
    }
    Ok(report)
}
