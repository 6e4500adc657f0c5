//! Recipe engine
//!
//! Composition root: owns both actuator states, their recipes, the
//! operator console, the servo outputs and the delay provider, and runs
//! one tick per call:
//!
//! ```text
//! console line ──▶ overrides ──▶ step actuator 0 ──▶ step actuator 1 ──▶ barrier
//! ```
//!
//! Faults are isolated per actuator: a faulted lane stops stepping and
//! ignores overrides while the other lane and the console keep running.

use cadence_hal::uart::{UartRx, UartTx};
use embedded_hal::delay::DelayNs;
use heapless::Vec;

use crate::actuator::{ActuatorId, ActuatorState, StepNotice, StepReport};
use crate::command::{apply_line, ConsoleInput, LineOutcome, OperatorConsole, Override, PROMPT};
use crate::config::TimingConfig;
use crate::recipe::Recipe;
use crate::timing::{Barrier, TimingCoordinator};
use crate::traits::ServoOutput;
use crate::NUM_ACTUATORS;

use super::events::Notice;

/// Upper bound on notices a single tick can raise
const MAX_NOTICES: usize = 2 * NUM_ACTUATORS + 1;

/// Peripheral failures while running a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EngineError<C, S> {
    /// Console UART failed
    Console(C),
    /// Servo output failed
    Servo(S),
}

/// Everything that happened in one tick
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickSummary {
    /// Overrides from a submitted command line
    pub line: Option<LineOutcome>,
    /// The operator aborted a line
    pub aborted: bool,
    /// Step report per actuator
    pub reports: [StepReport; NUM_ACTUATORS],
    /// Barrier applied after stepping
    pub barrier: Barrier,
    /// Notices written to the console, in order
    pub notices: Vec<Notice, MAX_NOTICES>,
}

impl TickSummary {
    /// Check if any actuator finished its recipe this tick
    pub fn completed(&self) -> bool {
        self.reports.iter().any(|r| r.completed)
    }
}

/// Dual-actuator recipe engine
pub struct RecipeEngine<'r, U, S, D> {
    states: [ActuatorState; NUM_ACTUATORS],
    recipes: [&'r Recipe; NUM_ACTUATORS],
    console: OperatorConsole<U>,
    servos: S,
    delay: D,
    timing: TimingCoordinator,
}

impl<'r, U, S, D, E> RecipeEngine<'r, U, S, D>
where
    U: UartTx<Error = E> + UartRx<Error = E>,
    S: ServoOutput,
    D: DelayNs,
{
    /// Create an engine with every actuator at its power-on state
    pub fn new(
        recipes: [&'r Recipe; NUM_ACTUATORS],
        timing: TimingConfig,
        uart: U,
        servos: S,
        delay: D,
    ) -> Self {
        Self {
            states: [ActuatorState::new(), ActuatorState::new()],
            recipes,
            console: OperatorConsole::new(uart),
            servos,
            delay,
            timing: TimingCoordinator::new(timing),
        }
    }

    /// Drive every servo to its initial slot and greet the operator
    pub fn start(&mut self) -> Result<(), EngineError<E, S::Error>> {
        for id in ActuatorId::ALL {
            let position = self.states[id.index()].position();
            self.servos
                .set_position(id, position)
                .map_err(EngineError::Servo)?;
        }
        self.notify(Notice::Banner, None)
    }

    /// Run one tick
    pub fn tick(&mut self) -> Result<TickSummary, EngineError<E, S::Error>> {
        let mut summary = TickSummary::default();

        match self.console.poll_line().map_err(EngineError::Console)? {
            ConsoleInput::Idle => {}
            ConsoleInput::Aborted => summary.aborted = true,
            ConsoleInput::Line(line) => {
                let outcome = apply_line(&mut self.states, &line);
                self.apply_overrides(&outcome, &mut summary)?;
                summary.line = Some(outcome);
            }
        }

        for id in ActuatorId::ALL {
            let i = id.index();
            let report = self.states[i].step(self.recipes[i]);

            if let Some(position) = report.moved_to {
                self.servos
                    .set_position(id, position)
                    .map_err(EngineError::Servo)?;
            }

            match report.notice {
                Some(StepNotice::Fault(kind)) => {
                    self.notify(Notice::RecipeFault { actuator: id, kind }, Some(&mut summary))?;
                }
                Some(StepNotice::InvalidInstruction { index, byte }) => {
                    let notice = Notice::InvalidInstruction {
                        actuator: id,
                        index,
                        byte,
                    };
                    self.notify(notice, Some(&mut summary))?;
                }
                None => {}
            }

            summary.reports[i] = report;
        }

        summary.barrier = self.timing.barrier(&summary.reports);
        self.timing.apply(summary.barrier, &mut self.delay);

        if summary.completed() {
            self.notify(Notice::RecipeEnded, Some(&mut summary))?;
        }

        Ok(summary)
    }

    /// State of one actuator
    pub fn state(&self, actuator: ActuatorId) -> &ActuatorState {
        &self.states[actuator.index()]
    }

    /// Check if every actuator has faulted
    pub fn all_faulted(&self) -> bool {
        self.states.iter().all(ActuatorState::is_faulted)
    }

    /// Console UART, for feeding input in tests and diagnostics
    pub fn uart_mut(&mut self) -> &mut U {
        self.console.uart_mut()
    }

    /// Servo outputs
    pub fn servos(&self) -> &S {
        &self.servos
    }

    /// Delay provider
    pub fn delay(&self) -> &D {
        &self.delay
    }

    fn apply_overrides(
        &mut self,
        outcome: &LineOutcome,
        summary: &mut TickSummary,
    ) -> Result<(), EngineError<E, S::Error>> {
        for id in ActuatorId::ALL {
            if let Override::Invalid(input) = outcome.get(id) {
                let notice = Notice::InvalidCommand { actuator: id, input };
                self.notify(notice, Some(&mut *summary))?;
            }
        }

        for (id, position) in outcome.moves() {
            self.servos
                .set_position(id, position)
                .map_err(EngineError::Servo)?;
        }

        if outcome.needs_settle() {
            self.timing.settle(&mut self.delay);
        }

        self.console.write(PROMPT).map_err(EngineError::Console)
    }

    fn notify(
        &mut self,
        notice: Notice,
        summary: Option<&mut TickSummary>,
    ) -> Result<(), EngineError<E, S::Error>> {
        if let Some(summary) = summary {
            // Bounded by MAX_NOTICES
            let _ = summary.notices.push(notice);
        }
        self.console
            .write(notice.message())
            .map_err(EngineError::Console)
    }
}
