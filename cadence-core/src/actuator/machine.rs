//! Per-actuator recipe state machine
//!
//! Each actuator plays back its own recipe one instruction per tick.
//!
//! ```text
//!            resume / restart
//!   Paused ───────────────────▶ Running
//!     ▲                           │
//!     │ pause, RECIPE_END,        │ bad MOVE target, nested LOOP_START,
//!     │ undecodable byte          │ unmatched LOOP_END
//!     └───────────────────────────┤
//!                                 ▼
//!                              Faulted (absorbing)
//! ```

use crate::recipe::{Opcode, Recipe};

use super::position::Position;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Playback status of a healthy actuator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RunStatus {
    /// Not consuming instructions
    #[default]
    Paused,
    /// Consuming one instruction per tick
    Running,
}

/// Terminal recipe faults
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FaultKind {
    /// MOVE parameter outside 0..=5
    InvalidTarget { target: u8 },
    /// LOOP_START while a loop is already open
    NestedLoop,
    /// LOOP_END with no open loop
    UnmatchedLoopEnd,
}

/// Bookkeeping for the single open loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LoopFrame {
    /// First instruction of the loop body
    pub resume_index: usize,
    /// Body passes still to run after the current one
    pub remaining_iterations: u8,
}

/// Non-fatal conditions raised by a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StepNotice {
    /// The step faulted the actuator
    Fault(FaultKind),
    /// The byte at `index` has no valid opcode
    InvalidInstruction { index: usize, byte: u8 },
}

/// What one step did, for the timing coordinator and the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StepReport {
    /// Slots travelled by a MOVE (0-5)
    pub moved_distance: u8,
    /// Wait units requested by a WAIT (0-31)
    pub wait_units: u8,
    /// RECIPE_END was reached
    pub completed: bool,
    /// Target of a MOVE, to be applied to the servo
    pub moved_to: Option<Position>,
    /// Fault or invalid-instruction condition raised by this step
    pub notice: Option<StepNotice>,
}

/// Mutable per-actuator record
///
/// Only [`ActuatorState::step`] and the operator override methods mutate it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ActuatorState {
    instruction_pointer: usize,
    position: Position,
    run_status: RunStatus,
    loop_frame: Option<LoopFrame>,
    fault: Option<FaultKind>,
}

impl ActuatorState {
    /// Power-on state: pointer 0, slot 0, paused
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the next instruction
    pub fn instruction_pointer(&self) -> usize {
        self.instruction_pointer
    }

    /// Last commanded slot
    pub fn position(&self) -> Position {
        self.position
    }

    /// Playback status
    pub fn run_status(&self) -> RunStatus {
        self.run_status
    }

    /// Open loop, if any
    pub fn loop_frame(&self) -> Option<LoopFrame> {
        self.loop_frame
    }

    /// Terminal fault, if any
    pub fn fault(&self) -> Option<FaultKind> {
        self.fault
    }

    /// Check if the actuator has faulted
    pub fn is_faulted(&self) -> bool {
        self.fault.is_some()
    }

    /// Check if the actuator will consume an instruction on the next step
    pub fn is_running(&self) -> bool {
        self.fault.is_none() && self.run_status == RunStatus::Running
    }

    /// Execute the instruction under the pointer
    ///
    /// A no-op unless running. Faulted actuators never change again.
    pub fn step(&mut self, recipe: &Recipe) -> StepReport {
        let mut report = StepReport::default();

        if !self.is_running() {
            return report;
        }

        let Some(instruction) = recipe.instruction(self.instruction_pointer) else {
            // Pointer is kept in range, but a shorter recipe may have been swapped in
            self.rewind();
            report.completed = true;
            return report;
        };
        let param = instruction.parameter;

        match instruction.opcode {
            Opcode::Move => match Position::new(param) {
                Some(target) => {
                    report.moved_distance = self.position.distance(target);
                    report.moved_to = Some(target);
                    self.position = target;
                    self.advance(recipe, &mut report);
                }
                None => self.trip(FaultKind::InvalidTarget { target: param }, &mut report),
            },

            Opcode::Wait => {
                report.wait_units = param;
                self.advance(recipe, &mut report);
            }

            Opcode::LoopStart => {
                if self.loop_frame.is_some() {
                    self.trip(FaultKind::NestedLoop, &mut report);
                } else {
                    self.loop_frame = Some(LoopFrame {
                        resume_index: self.instruction_pointer + 1,
                        remaining_iterations: param.saturating_sub(1),
                    });
                    self.advance(recipe, &mut report);
                }
            }

            Opcode::LoopEnd => match self.loop_frame {
                None => self.trip(FaultKind::UnmatchedLoopEnd, &mut report),
                Some(frame) if frame.remaining_iterations == 0 => {
                    self.loop_frame = None;
                    self.advance(recipe, &mut report);
                }
                Some(frame) => {
                    self.instruction_pointer = frame.resume_index;
                    self.loop_frame = Some(LoopFrame {
                        remaining_iterations: frame.remaining_iterations - 1,
                        ..frame
                    });
                }
            },

            Opcode::RecipeEnd => {
                self.rewind();
                report.completed = true;
            }

            Opcode::Invalid => {
                // Hold the pointer and stop so the same byte is not re-run every tick
                report.notice = Some(StepNotice::InvalidInstruction {
                    index: self.instruction_pointer,
                    byte: recipe.as_bytes()[self.instruction_pointer],
                });
                self.run_status = RunStatus::Paused;
            }
        }

        report
    }

    /// Operator pause
    pub fn pause(&mut self) {
        if !self.is_faulted() {
            self.run_status = RunStatus::Paused;
        }
    }

    /// Operator continue
    pub fn resume(&mut self) {
        if !self.is_faulted() {
            self.run_status = RunStatus::Running;
        }
    }

    /// Operator restart: back to the first instruction and running
    pub fn restart(&mut self) {
        if !self.is_faulted() {
            self.instruction_pointer = 0;
            self.loop_frame = None;
            self.run_status = RunStatus::Running;
        }
    }

    /// Direct one-slot move outside the recipe
    ///
    /// Returns the new slot, or `None` when already at the edge or faulted.
    pub fn nudge(&mut self, toward_right: bool) -> Option<Position> {
        if self.is_faulted() {
            return None;
        }
        let next = if toward_right {
            self.position.right()
        } else {
            self.position.left()
        }?;
        self.position = next;
        Some(next)
    }

    fn advance(&mut self, recipe: &Recipe, report: &mut StepReport) {
        let next = self.instruction_pointer + 1;
        if next >= recipe.len() {
            // Ran off the end without RECIPE_END
            self.rewind();
            report.completed = true;
        } else {
            self.instruction_pointer = next;
        }
    }

    fn rewind(&mut self) {
        self.instruction_pointer = 0;
        self.loop_frame = None;
        self.run_status = RunStatus::Paused;
    }

    fn trip(&mut self, kind: FaultKind, report: &mut StepReport) {
        self.fault = Some(kind);
        report.notice = Some(StepNotice::Fault(kind));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::assemble;
    use proptest::prelude::*;

    fn running() -> ActuatorState {
        let mut state = ActuatorState::new();
        state.resume();
        state
    }

    fn run_until_paused(state: &mut ActuatorState, recipe: &Recipe) -> heapless::Vec<StepReport, 64> {
        let mut reports = heapless::Vec::new();
        while state.is_running() {
            reports.push(state.step(recipe)).unwrap();
        }
        reports
    }

    #[test]
    fn test_initial_state() {
        let state = ActuatorState::new();
        assert_eq!(state.instruction_pointer(), 0);
        assert_eq!(state.position(), Position::MIN);
        assert_eq!(state.run_status(), RunStatus::Paused);
        assert_eq!(state.loop_frame(), None);
        assert_eq!(state.fault(), None);
    }

    #[test]
    fn test_paused_step_is_noop() {
        let recipe = assemble("MOV 3\nEND").unwrap();
        let mut state = ActuatorState::new();
        let report = state.step(&recipe);
        assert_eq!(report, StepReport::default());
        assert_eq!(state, ActuatorState::new());
    }

    #[test]
    fn test_move_sweep_scenario() {
        let recipe = assemble("MOV 0\nMOV 5\nEND").unwrap();
        let mut state = running();

        let first = state.step(&recipe);
        assert_eq!(first.moved_distance, 0);
        assert_eq!(state.position(), Position::MIN);

        let second = state.step(&recipe);
        assert_eq!(second.moved_distance, 5);
        assert_eq!(second.moved_to, Position::new(5));
        assert_eq!(state.position(), Position::MAX);

        let third = state.step(&recipe);
        assert!(third.completed);
        assert_eq!(state.instruction_pointer(), 0);
        assert_eq!(state.run_status(), RunStatus::Paused);
    }

    #[test]
    fn test_wait_reports_units() {
        let recipe = assemble("WAIT 31\nEND").unwrap();
        let mut state = running();
        let report = state.step(&recipe);
        assert_eq!(report.wait_units, 31);
        assert_eq!(report.moved_distance, 0);
        assert_eq!(state.instruction_pointer(), 1);
    }

    #[test]
    fn test_loop_body_runs_count_times() {
        let recipe = assemble("LOOP 3\nMOV 1\nENDLOOP\nEND").unwrap();
        let mut state = running();

        let reports = run_until_paused(&mut state, &recipe);
        let moves = reports.iter().filter(|r| r.moved_to.is_some()).count();

        assert_eq!(moves, 3);
        assert_eq!(state.position().slot(), 1);
        assert!(reports.last().unwrap().completed);
        assert_eq!(state.loop_frame(), None);
    }

    #[test]
    fn test_loop_counts_for_every_parameter() {
        for count in 1..=31u8 {
            let mut bytes = [0u8; 4];
            bytes[0] = 0x80 | count;
            bytes[1] = 0x40; // WAIT 0
            bytes[2] = 0xA0;
            bytes[3] = 0x00;
            let recipe = Recipe::from_bytes(&bytes).unwrap();
            let mut state = running();

            let mut passes = 0;
            while state.is_running() {
                if state.instruction_pointer() == 1 {
                    passes += 1;
                }
                state.step(&recipe);
            }
            assert_eq!(passes, count, "LOOP {}", count);
        }
    }

    #[test]
    fn test_loop_zero_runs_once() {
        let recipe = assemble("LOOP 0\nMOV 2\nENDLOOP\nEND").unwrap();
        let mut state = running();
        let reports = run_until_paused(&mut state, &recipe);
        assert_eq!(reports.iter().filter(|r| r.moved_to.is_some()).count(), 1);
    }

    #[test]
    fn test_nested_loop_faults_forever() {
        let recipe = assemble("LOOP 2\nLOOP 2\nENDLOOP\nENDLOOP\nEND").unwrap();
        let mut state = running();

        state.step(&recipe);
        let report = state.step(&recipe);
        assert_eq!(report.notice, Some(StepNotice::Fault(FaultKind::NestedLoop)));
        assert!(state.is_faulted());

        let frozen = state.clone();
        for _ in 0..5 {
            assert_eq!(state.step(&recipe), StepReport::default());
        }
        state.resume();
        state.restart();
        assert_eq!(state.nudge(true), None);
        assert_eq!(state, frozen);
    }

    #[test]
    fn test_invalid_target_faults() {
        let recipe = assemble("MOV 2\nMOV 6\nEND").unwrap();
        let mut state = running();
        state.step(&recipe);
        let report = state.step(&recipe);

        assert_eq!(
            report.notice,
            Some(StepNotice::Fault(FaultKind::InvalidTarget { target: 6 }))
        );
        assert_eq!(report.moved_to, None);
        assert_eq!(state.position().slot(), 2);
        assert_eq!(state.instruction_pointer(), 1);
    }

    #[test]
    fn test_unmatched_loop_end_faults() {
        let recipe = assemble("ENDLOOP\nEND").unwrap();
        let mut state = running();
        let report = state.step(&recipe);
        assert_eq!(
            report.notice,
            Some(StepNotice::Fault(FaultKind::UnmatchedLoopEnd))
        );
    }

    #[test]
    fn test_invalid_instruction_holds_pointer_and_pauses() {
        let recipe = Recipe::from_bytes(&[0x21, 0xE3, 0x00]).unwrap();
        let mut state = running();
        state.step(&recipe);

        let report = state.step(&recipe);
        assert_eq!(
            report.notice,
            Some(StepNotice::InvalidInstruction { index: 1, byte: 0xE3 })
        );
        assert_eq!(state.instruction_pointer(), 1);
        assert_eq!(state.run_status(), RunStatus::Paused);
        assert!(!state.is_faulted());

        // Resuming hits the same byte again
        state.resume();
        assert!(state.step(&recipe).notice.is_some());
        assert_eq!(state.instruction_pointer(), 1);
    }

    #[test]
    fn test_recipe_end_is_idempotent() {
        let recipe = assemble("END").unwrap();
        let mut state = running();

        assert!(state.step(&recipe).completed);
        let after_first = state.clone();
        state.resume();
        assert!(state.step(&recipe).completed);
        assert_eq!(state, after_first);
    }

    #[test]
    fn test_implicit_end_without_terminator() {
        let recipe = assemble("MOV 1\nMOV 2").unwrap();
        let mut state = running();
        state.step(&recipe);
        let report = state.step(&recipe);
        assert!(report.completed);
        assert_eq!(state.instruction_pointer(), 0);
        assert_eq!(state.position().slot(), 2);
    }

    #[test]
    fn test_restart_keeps_position() {
        let recipe = assemble("MOV 4\nLOOP 2\nWAIT 1\nENDLOOP\nEND").unwrap();
        let mut state = running();
        state.step(&recipe);
        state.step(&recipe);
        assert!(state.loop_frame().is_some());

        state.pause();
        state.restart();
        assert_eq!(state.instruction_pointer(), 0);
        assert_eq!(state.loop_frame(), None);
        assert_eq!(state.run_status(), RunStatus::Running);
        assert_eq!(state.position().slot(), 4);
    }

    #[test]
    fn test_nudge_edges() {
        let mut state = ActuatorState::new();
        assert_eq!(state.nudge(false), None);
        assert_eq!(state.nudge(true).map(Position::slot), Some(1));
        assert_eq!(state.nudge(false).map(Position::slot), Some(0));
    }

    proptest! {
        #[test]
        fn prop_invariants_hold(bytes in proptest::collection::vec(any::<u8>(), 1..=100), steps in 1usize..300) {
            let recipe = Recipe::from_bytes(&bytes).unwrap();
            let mut state = running();

            for _ in 0..steps {
                let before = state.clone();
                state.step(&recipe);

                prop_assert!(state.instruction_pointer() < recipe.len());
                prop_assert!(state.position() <= Position::MAX);
                if before.is_faulted() {
                    prop_assert_eq!(&state, &before);
                }
                state.resume();
            }
        }
    }
}
