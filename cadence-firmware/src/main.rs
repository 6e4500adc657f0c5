//! Cadence - Dual-Servo Recipe Firmware
//!
//! Main firmware binary for STM32L476-based boards. Two hobby servos
//! step through byte-coded recipes in lockstep while an operator console
//! on USART2 pauses, nudges or restarts them.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_time::Delay;
use {defmt_rtt as _, panic_probe as _};

use cadence_core::recipe::Recipe;
use cadence_core::RecipeEngine;

mod board;
mod control;

/// Configuration generated from machine.toml by build.rs
mod machine {
    include!(concat!(env!("OUT_DIR"), "/machine.rs"));
}

/// Main entry point
#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("Cadence firmware starting...");

    let board = board::init(machine::CONSOLE_BAUDRATE, machine::SERVO);

    let recipes = [
        unwrap!(Recipe::from_bytes(machine::RECIPES[0])),
        unwrap!(Recipe::from_bytes(machine::RECIPES[1])),
    ];
    for (name, recipe) in machine::RECIPE_NAMES.iter().zip(recipes.iter()) {
        info!("Loaded recipe '{}' ({} bytes)", name, recipe.len());
    }

    let engine = RecipeEngine::new(
        [&recipes[0], &recipes[1]],
        machine::TIMING,
        board.console,
        board.servos,
        Delay,
    );

    control::run(engine).await
}
