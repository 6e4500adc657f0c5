//! Engine run loop
//!
//! Ticks the engine forever and mirrors console notices to the defmt log.
//! When neither actuator is running the loop yields briefly so the
//! console can be polled without spinning.

use defmt::*;
use embassy_time::Timer;

use embedded_hal::delay::DelayNs;

use cadence_core::traits::ServoOutput;
use cadence_core::{EngineError, Notice, RecipeEngine, TickSummary};
use cadence_hal::uart::{UartRx, UartTx};

/// Console poll interval while idle
const IDLE_POLL_MS: u64 = 1;

/// Run the engine; never returns
pub async fn run<U, S, D, E>(mut engine: RecipeEngine<'_, U, S, D>) -> !
where
    U: UartTx<Error = E> + UartRx<Error = E>,
    S: ServoOutput,
    D: DelayNs,
    E: Format,
    S::Error: Format,
{
    if let Err(e) = engine.start() {
        report(&e);
    }
    info!("Engine started, waiting for operator");

    let mut all_faulted = false;

    loop {
        match engine.tick() {
            Ok(summary) => {
                log_summary(&summary);
                if summary.barrier.is_zero() {
                    Timer::after_millis(IDLE_POLL_MS).await;
                }
            }
            Err(e) => {
                report(&e);
                Timer::after_millis(IDLE_POLL_MS).await;
            }
        }

        if engine.all_faulted() && !all_faulted {
            warn!("Both actuators faulted; console remains active");
        }
        all_faulted = engine.all_faulted();
    }
}

fn log_summary(summary: &TickSummary) {
    if let Some(line) = &summary.line {
        debug!("Command line applied: {}", line);
    }
    if summary.aborted {
        debug!("Command line aborted");
    }

    for notice in &summary.notices {
        match notice {
            Notice::RecipeFault { actuator, kind } => {
                error!("Actuator {} faulted: {}", actuator, kind);
            }
            Notice::InvalidInstruction {
                actuator,
                index,
                byte,
            } => {
                warn!(
                    "Actuator {} paused on invalid byte {=u8:#x} at {}",
                    actuator, byte, index
                );
            }
            Notice::InvalidCommand { actuator, input } => {
                warn!("Invalid command {=u8:#x} for actuator {}", input, actuator);
            }
            Notice::RecipeEnded => info!("Recipe ended"),
            Notice::Banner => {}
        }
    }

    if !summary.barrier.is_zero() {
        trace!("Barrier {} us", summary.barrier.total_us());
    }
}

fn report<C: Format, S: Format>(e: &EngineError<C, S>) {
    match e {
        EngineError::Console(e) => error!("Console error: {}", e),
        EngineError::Servo(e) => error!("Servo error: {}", e),
    }
}
