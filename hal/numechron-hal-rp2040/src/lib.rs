//! RP2040-specific HAL for the Numechron clock controller
//!
//! The timing-critical half of the clock: PIO state machines that turn a
//! queued step count into a cycle-accurate 4-phase pulse train on the
//! coil pins, independent of whatever the executor is doing.

#![no_std]

pub mod pio;
pub mod pulse;
