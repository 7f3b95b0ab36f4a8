//! Embassy async tasks
//!
//! The control loop runs here; the network runners live in `net.rs`
//! next to the stack they drive.

pub mod clock;

pub use clock::clock_task;
