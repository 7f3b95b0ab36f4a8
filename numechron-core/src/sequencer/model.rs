//! Step sequencer state machine
//!
//! Mirrors the PIO pulse generator program, one [`advance`] call per dwell
//! interval:
//!
//! ```text
//! pull block            ; wait for a step count
//! mov x, osr
//! jmp !x end            ; zero is a no-op
//! loop:
//!   set pins, 0b0001 [dwell]
//!   set pins, 0b0010 [dwell]
//!   set pins, 0b0100 [dwell]
//!   set pins, 0b1000 [dwell]
//!   jmp x-- loop
//! end:
//!   set pins, 0 [dwell]  ; de-energize, then wrap
//! ```
//!
//! Invariants: pins are low before the first phase of a command and low
//! again after the last; a command runs to completion once dequeued; a
//! magnitude of zero produces no phase transitions.
//!
//! [`advance`]: StepSequencer::advance

use crate::queue::CommandQueue;
use crate::rotation::Direction;
use crate::sequencer::phase::Phase;

/// Execution state of a sequencer instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SequencerState {
    /// Suspended, pins low, waiting on the command queue
    Idle,
    /// Mid pulse train
    Driving { remaining: u32, phase: Phase },
}

/// One directional pulse generator instance
#[derive(Debug)]
pub struct StepSequencer {
    direction: Direction,
    state: SequencerState,
    pins: u8,
}

impl StepSequencer {
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            state: SequencerState::Idle,
            pins: 0,
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn state(&self) -> SequencerState {
        self.state
    }

    /// Current pin image, one bit per coil line
    pub fn pins(&self) -> u8 {
        self.pins
    }

    pub fn is_idle(&self) -> bool {
        self.state == SequencerState::Idle
    }

    /// Execute one dwell interval
    ///
    /// Idle with an empty queue is the suspended state; pins stay low.
    /// Returns the pin image held for this interval.
    pub fn advance(&mut self, queue: &mut CommandQueue) -> u8 {
        self.state = match self.state {
            SequencerState::Idle => match queue.dequeue() {
                None | Some(0) => {
                    self.pins = 0;
                    SequencerState::Idle
                }
                Some(cycles) => {
                    let phase = Phase::first(self.direction);
                    self.pins = phase.bits();
                    SequencerState::Driving {
                        remaining: cycles,
                        phase,
                    }
                }
            },
            SequencerState::Driving { remaining, phase } => {
                if phase == Phase::last(self.direction) {
                    if remaining == 1 {
                        // n-th cycle finished: de-energize
                        self.pins = 0;
                        SequencerState::Idle
                    } else {
                        let phase = Phase::first(self.direction);
                        self.pins = phase.bits();
                        SequencerState::Driving {
                            remaining: remaining - 1,
                            phase,
                        }
                    }
                } else {
                    let phase = phase.next(self.direction);
                    self.pins = phase.bits();
                    SequencerState::Driving { remaining, phase }
                }
            }
        };
        self.pins
    }

    /// Run until idle again, collecting every non-idle pin image
    ///
    /// Convenience for tests and simulations: drains the queue and returns
    /// the number of dwell intervals spent driving.
    pub fn run_to_idle(&mut self, queue: &mut CommandQueue, mut emit: impl FnMut(u8)) -> u32 {
        let mut intervals = 0;
        loop {
            let pins = self.advance(queue);
            if self.is_idle() && queue.is_empty() {
                break;
            }
            emit(pins);
            intervals += 1;
        }
        intervals
    }
}
