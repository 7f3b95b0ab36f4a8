//! Step pulse sequencer
//!
//! Software model of the PIO pulse generator program. The hardware runs
//! the same state machine cycle-accurately; this model defines the
//! contract and makes it testable on the host.

pub mod model;
pub mod phase;

pub use model::{SequencerState, StepSequencer};
pub use phase::{Phase, COIL_LINES};
