//! Board-agnostic core logic for the Numechron clock controller
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Step sequencer state machine (software model of the PIO program)
//! - Bounded motor command queues
//! - Rotation controller (signed steps -> direction + magnitude)
//! - Control loop engine (minute/hour rollover scheduling)
//! - Button debounce edge detection
//! - Calendar math for applying NTP timestamps
//! - Configuration type definitions

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod engine;
pub mod error;
pub mod input;
pub mod queue;
pub mod rotation;
pub mod sequencer;
pub mod time;
