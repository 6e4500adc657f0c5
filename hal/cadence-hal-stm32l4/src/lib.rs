//! STM32L4-specific HAL for the Cadence firmware
//!
//! Implements the `cadence-hal` console traits and the `cadence-core`
//! servo output on top of embassy-stm32:
//!
//! - [`uart::ConsoleUart`] - blocking USART operator console
//! - [`servo::ServoPwm`] - two servo channels on one general-purpose timer
//!
//! # Features
//!
//! - `stm32l476rg` - Enable support for the STM32L476RG (Nucleo-L476RG)
//! - `defmt` - Enable debug formatting support

#![no_std]

pub mod servo;
pub mod uart;

pub use servo::ServoPwm;
pub use uart::{usart_config, ConsoleUart, UartBusError};
