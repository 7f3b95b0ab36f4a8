//! Inter-task communication
//!
//! Uses embassy-sync primitives for safe cross-task signalling.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

/// Manual test hook: stops the control loop at the top of its next
/// iteration. The loop consumes the signal when it honors it.
pub static STOP: Signal<CriticalSectionRawMutex, ()> = Signal::new();
