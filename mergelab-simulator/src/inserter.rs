//! The insertion driver: replays an insertion plan against a storage target
//! under the scheduler's virtual time.
//!
//! The driver drains its plan eagerly — back-to-back inserts cost no
//! scheduler round-trips — and suspends at exactly one point: a sleep with
//! positive delay, where it registers its own resume callback and returns
//! control to the scheduler. Resume re-enters the same drive loop, so
//! behavior after any number of sleeps is identical to the zero-delay case
//! except for the virtual times at which inserts land.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, trace};

use mergelab_core::error::SimulationError;
use mergelab_core::plan::{InsertionPlan, PlanAction};
use mergelab_core::storage::InsertTarget;

use crate::scheduler::EventSimulator;

/// Drives one insertion plan to completion.
///
/// Exclusively owns its plan; the storage handle is shared with the caller,
/// which inspects it after the run. One driver per plan per run — plans are
/// consumed, not restartable.
pub struct InsertionDriver<P, T> {
    storage: Rc<RefCell<T>>,
    plan: P,
}

impl<P, T> InsertionDriver<P, T>
where
    P: InsertionPlan + 'static,
    T: InsertTarget + 'static,
{
    /// Binds a driver to a scheduler, a storage target, and a plan, and
    /// immediately begins draining the plan.
    ///
    /// Returns once the plan is exhausted or the driver has suspended on a
    /// positive sleep; in the latter case draining continues from inside
    /// the scheduler's run loop. A malformed action pulled before the first
    /// suspension surfaces here; one pulled after a resume surfaces from
    /// [`EventSimulator::run`].
    pub fn spawn(
        sim: &mut EventSimulator,
        storage: Rc<RefCell<T>>,
        plan: P,
    ) -> Result<(), SimulationError> {
        Self { storage, plan }.drive(sim)
    }

    // The re-entrant drive step: first entry and every resume run the exact
    // same loop.
    fn drive(mut self, sim: &mut EventSimulator) -> Result<(), SimulationError> {
        loop {
            let Some(action) = self.plan.next_action() else {
                // Exhaustion: terminal, nothing further is scheduled.
                debug!(at = sim.now(), "insertion plan exhausted");
                return Ok(());
            };
            match action {
                PlanAction::Insert { bytes } => {
                    let now = sim.now();
                    self.storage.borrow_mut().insert_part(bytes, now);
                }
                PlanAction::Sleep { delay } if delay > 0 => {
                    let at = sim.now().saturating_add(delay as u64);
                    sim.schedule_at(at, "inserter_sleep", move |sim| self.drive(sim));
                    return Ok(());
                }
                PlanAction::Sleep { delay } => {
                    // Zero and negative delays are no-ops, by the plan
                    // contract. Traced so plan-construction bugs stay
                    // visible.
                    trace!(delay, "skipping non-positive sleep");
                }
                PlanAction::Unknown(raw) => {
                    return Err(SimulationError::MalformedPlan(raw));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mergelab_core::time::SimTime;

    /// Records every insert call with its virtual time.
    #[derive(Default)]
    struct RecordingTarget {
        calls: Vec<(u64, SimTime)>,
    }

    impl InsertTarget for RecordingTarget {
        fn insert_part(&mut self, bytes: u64, now: SimTime) {
            self.calls.push((bytes, now));
        }
    }

    fn spawn_plan(
        sim: &mut EventSimulator,
        actions: Vec<PlanAction>,
    ) -> Result<Rc<RefCell<RecordingTarget>>, SimulationError> {
        let storage = Rc::new(RefCell::new(RecordingTarget::default()));
        InsertionDriver::spawn(sim, Rc::clone(&storage), actions.into_iter())?;
        Ok(storage)
    }

    #[test]
    fn back_to_back_inserts_apply_immediately() {
        let mut sim = EventSimulator::new(0);
        let storage = spawn_plan(
            &mut sim,
            vec![
                PlanAction::Insert { bytes: 100 },
                PlanAction::Insert { bytes: 200 },
            ],
        )
        .unwrap();
        // Both inserts happen during spawn, at time 0, with nothing queued.
        assert_eq!(storage.borrow().calls, vec![(100, 0), (200, 0)]);
        assert_eq!(sim.pending(), 0);
    }

    #[test]
    fn positive_sleep_defers_the_rest_of_the_plan() {
        let mut sim = EventSimulator::new(0);
        let storage = spawn_plan(
            &mut sim,
            vec![
                PlanAction::Insert { bytes: 50 },
                PlanAction::Sleep { delay: 10 },
                PlanAction::Insert { bytes: 60 },
            ],
        )
        .unwrap();
        assert_eq!(storage.borrow().calls, vec![(50, 0)]);
        assert_eq!(sim.pending(), 1);
        sim.run().unwrap();
        assert_eq!(storage.borrow().calls, vec![(50, 0), (60, 10)]);
        assert_eq!(sim.pending(), 0);
    }

    #[test]
    fn non_positive_sleeps_are_noops() {
        let mut sim = EventSimulator::new(0);
        let storage = spawn_plan(
            &mut sim,
            vec![
                PlanAction::Sleep { delay: 0 },
                PlanAction::Sleep { delay: -7 },
                PlanAction::Insert { bytes: 5 },
            ],
        )
        .unwrap();
        assert_eq!(storage.borrow().calls, vec![(5, 0)]);
        assert_eq!(sim.pending(), 0);
    }

    #[test]
    fn smallest_positive_delay_still_suspends() {
        let mut sim = EventSimulator::new(0);
        let storage = spawn_plan(
            &mut sim,
            vec![
                PlanAction::Sleep { delay: 1 },
                PlanAction::Insert { bytes: 1 },
            ],
        )
        .unwrap();
        assert!(storage.borrow().calls.is_empty());
        assert_eq!(sim.pending(), 1);
        sim.run().unwrap();
        assert_eq!(storage.borrow().calls, vec![(1, 1)]);
    }

    #[test]
    fn sleep_delays_accumulate_across_the_plan() {
        let mut sim = EventSimulator::new(0);
        let storage = spawn_plan(
            &mut sim,
            vec![
                PlanAction::Sleep { delay: 10 },
                PlanAction::Insert { bytes: 1 },
                PlanAction::Sleep { delay: -3 },
                PlanAction::Sleep { delay: 5 },
                PlanAction::Insert { bytes: 2 },
            ],
        )
        .unwrap();
        sim.run().unwrap();
        assert_eq!(storage.borrow().calls, vec![(1, 10), (2, 15)]);
    }

    #[test]
    fn malformed_action_fails_before_later_actions() {
        let mut sim = EventSimulator::new(0);
        let storage = Rc::new(RefCell::new(RecordingTarget::default()));
        let bad = serde_yaml::from_str::<PlanAction>("type: wait\n").unwrap();
        let plan = vec![
            PlanAction::Insert { bytes: 1 },
            bad,
            PlanAction::Insert { bytes: 2 },
        ];
        let result = InsertionDriver::spawn(&mut sim, Rc::clone(&storage), plan.into_iter());
        assert!(matches!(result, Err(SimulationError::MalformedPlan(_))));
        // Everything before the bad action was applied; nothing after.
        assert_eq!(storage.borrow().calls, vec![(1, 0)]);
        assert_eq!(sim.pending(), 0);
    }

    #[test]
    fn malformed_action_after_resume_surfaces_from_run() {
        let mut sim = EventSimulator::new(0);
        let storage = Rc::new(RefCell::new(RecordingTarget::default()));
        let bad = serde_yaml::from_str::<PlanAction>("type: wait\n").unwrap();
        let plan = vec![PlanAction::Sleep { delay: 3 }, bad];
        InsertionDriver::spawn(&mut sim, Rc::clone(&storage), plan.into_iter()).unwrap();
        let result = sim.run();
        assert!(matches!(result, Err(SimulationError::MalformedPlan(_))));
    }

    #[test]
    fn infinite_plan_keeps_rescheduling_itself() {
        use mergelab_core::plan::generators::PeriodicPlan;
        let mut sim = EventSimulator::new(0);
        let storage = Rc::new(RefCell::new(RecordingTarget::default()));
        InsertionDriver::spawn(
            &mut sim,
            Rc::clone(&storage),
            PeriodicPlan::unbounded(1, 5),
        )
        .unwrap();
        sim.run_until(50).unwrap();
        // One insert at t=0, then one every 5 ticks through t=50.
        assert_eq!(storage.borrow().calls.len(), 11);
        assert_eq!(sim.pending(), 1);
        let times: Vec<_> = storage.borrow().calls.iter().map(|c| c.1).collect();
        assert_eq!(times, (0..=50).step_by(5).collect::<Vec<_>>());
    }

    #[test]
    fn two_drivers_interleave_by_virtual_time() {
        let mut sim = EventSimulator::new(0);
        let a = Rc::new(RefCell::new(RecordingTarget::default()));
        let b = Rc::new(RefCell::new(RecordingTarget::default()));
        InsertionDriver::spawn(
            &mut sim,
            Rc::clone(&a),
            vec![
                PlanAction::Sleep { delay: 4 },
                PlanAction::Insert { bytes: 10 },
            ]
            .into_iter(),
        )
        .unwrap();
        InsertionDriver::spawn(
            &mut sim,
            Rc::clone(&b),
            vec![
                PlanAction::Sleep { delay: 2 },
                PlanAction::Insert { bytes: 20 },
            ]
            .into_iter(),
        )
        .unwrap();
        sim.run().unwrap();
        assert_eq!(a.borrow().calls, vec![(10, 4)]);
        assert_eq!(b.borrow().calls, vec![(20, 2)]);
    }
}
