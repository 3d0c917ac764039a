// mergelab-simulator/src/lib.rs

/*!
# Mergelab Simulator

Discrete-event simulation of a merge-tree write path under virtual time.
An insertion plan (lazy action sequence) is replayed by a driver against a
part store; the scheduler owns virtual time and serializes all callbacks, so
every run is deterministic and reproducible from its scenario alone.

## Key Components:
- **Event Simulator:** virtual-time owner with a (time, label, callback) queue.
- **Insertion Driver:** drains a plan, inserting parts immediately and
  suspending only across positive sleeps.
- **Scenario Harness:** YAML scenario loading, run orchestration, and
  deterministic state-hash validation for replays.
*/

pub mod inserter;
pub mod scenario;
pub mod scheduler;

pub use inserter::InsertionDriver;
pub use scenario::{run_scenario, RunReport, Scenario, ScenarioError, Workload};
pub use scheduler::EventSimulator;
