//! Operator override processing
//!
//! Maps each character of a submitted line onto the matching actuator.
//! Overrides run before that actuator's next recipe step.
//!
//! | char | effect                                    |
//! |------|-------------------------------------------|
//! | P    | pause                                     |
//! | C    | continue                                  |
//! | R    | move one slot right (outside the recipe)  |
//! | L    | move one slot left (outside the recipe)   |
//! | N    | nothing                                   |
//! | B    | restart recipe from the top and run       |

use crate::actuator::{ActuatorId, ActuatorState, Position};
use crate::NUM_ACTUATORS;

use super::line::CommandLine;

/// Recognized operator commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    Pause,
    Continue,
    Right,
    Left,
    NoOp,
    Restart,
}

impl Command {
    /// Parse a command character, ignoring case
    pub fn from_char(c: u8) -> Option<Self> {
        match c.to_ascii_uppercase() {
            b'P' => Some(Command::Pause),
            b'C' => Some(Command::Continue),
            b'R' => Some(Command::Right),
            b'L' => Some(Command::Left),
            b'N' => Some(Command::NoOp),
            b'B' => Some(Command::Restart),
            _ => None,
        }
    }
}

/// What an override did to one actuator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Override {
    /// No character addressed this actuator
    #[default]
    Absent,
    /// Status command applied
    Applied(Command),
    /// Direct move performed; the servo must follow
    Moved(Position),
    /// R/L at the end of travel
    AtLimit,
    /// Unrecognized character
    Invalid(u8),
    /// Actuator is faulted and ignores overrides
    Ignored,
}

/// Per-actuator results of one command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LineOutcome {
    pub overrides: [Override; NUM_ACTUATORS],
}

impl LineOutcome {
    /// Result for one actuator
    pub fn get(&self, actuator: ActuatorId) -> Override {
        self.overrides[actuator.index()]
    }

    /// Direct moves the servo outputs must apply
    pub fn moves(&self) -> impl Iterator<Item = (ActuatorId, Position)> + '_ {
        ActuatorId::ALL
            .into_iter()
            .filter_map(|id| match self.get(id) {
                Override::Moved(pos) => Some((id, pos)),
                _ => None,
            })
    }

    /// Check if any R/L move happened (settle delay required)
    pub fn needs_settle(&self) -> bool {
        self.moves().next().is_some()
    }

    /// Number of unrecognized characters
    pub fn invalid_count(&self) -> usize {
        self.overrides
            .iter()
            .filter(|o| matches!(o, Override::Invalid(_)))
            .count()
    }
}

/// Apply a command line to the actuator table
pub fn apply_line(
    states: &mut [ActuatorState; NUM_ACTUATORS],
    line: &CommandLine,
) -> LineOutcome {
    let mut outcome = LineOutcome::default();

    for id in ActuatorId::ALL {
        let Some(c) = line.char_for(id) else {
            continue;
        };
        outcome.overrides[id.index()] = apply_char(&mut states[id.index()], c);
    }

    outcome
}

fn apply_char(state: &mut ActuatorState, c: u8) -> Override {
    let Some(command) = Command::from_char(c) else {
        return Override::Invalid(c);
    };

    if state.is_faulted() {
        return Override::Ignored;
    }

    match command {
        Command::Pause => state.pause(),
        Command::Continue => state.resume(),
        Command::Restart => state.restart(),
        Command::NoOp => {}
        Command::Right | Command::Left => {
            return match state.nudge(command == Command::Right) {
                Some(pos) => Override::Moved(pos),
                None => Override::AtLimit,
            };
        }
    }

    Override::Applied(command)
}
