//! PIO-backed step pulse generator
//!
//! One instance per direction. The state machine owns the four coil pins
//! while it runs; its TX FIFO is the motor command queue (depth 4) and
//! the program's `pull block` is the blocking dequeue, so a queued step
//! count executes with cycle-accurate timing no matter what the executor
//! is doing. Both instances are bound to the same four consecutive coil
//! pins (the movement's wiring scheme): every command ends by parking the
//! pins low, so the idle instance never corrupts the other's output.

use embassy_rp::pio::{
    Common, Config, Direction as PioDirection, Instance, Pin, StateMachine,
};
use embassy_time::Timer;
use fixed::types::U24F8;

use numechron_core::error::QueueFull;
use numechron_core::rotation::Direction;

use crate::pio::{clock_divider_bits, commutation_program};

/// One directional pulse generator on a PIO state machine
pub struct PulseGenerator<'d, PIO: Instance, const SM: usize> {
    sm: StateMachine<'d, PIO, SM>,
    direction: Direction,
    active: bool,
}

impl<'d, PIO: Instance, const SM: usize> PulseGenerator<'d, PIO, SM> {
    /// Load the directional program and configure the state machine
    ///
    /// `coil_pins` are the four consecutive output lines, lowest phase
    /// first. The generator starts deactivated with all lines low.
    pub fn new(
        common: &mut Common<'d, PIO>,
        mut sm: StateMachine<'d, PIO, SM>,
        coil_pins: &[Pin<'d, PIO>; 4],
        direction: Direction,
        clock_hz: u32,
        dwell_ticks: u8,
    ) -> Self {
        let program = commutation_program(direction, dwell_ticks);
        let installed = common.load_program(&program);

        let pin_refs = [&coil_pins[0], &coil_pins[1], &coil_pins[2], &coil_pins[3]];

        let mut cfg = Config::default();
        cfg.use_program(&installed, &[]);
        cfg.set_set_pins(&pin_refs);
        cfg.clock_divider = U24F8::from_bits(clock_divider_bits(clock_hz));

        sm.set_config(&cfg);
        sm.set_pin_dirs(PioDirection::Out, &pin_refs);

        Self {
            sm,
            direction,
            active: false,
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Start the sequencer loop; idempotent
    pub fn activate(&mut self) {
        if !self.active {
            self.sm.set_enable(true);
            self.active = true;
        }
    }

    /// Drain queued commands, then pause the sequencer; idempotent
    ///
    /// Disabling the state machine mid-command would latch a coil line
    /// high, so this waits until the program blocks on its `pull` with
    /// all lines parked low. Bounded by the duration of the queued
    /// commands.
    pub async fn deactivate(&mut self) {
        if !self.active {
            return;
        }
        // The stall flag is sticky; clear it, then wait for the program
        // to block on `pull` again with nothing left to feed it
        self.sm.tx().stalled();
        while !(self.sm.tx().empty() && self.sm.tx().stalled()) {
            Timer::after_millis(1).await;
        }
        self.sm.set_enable(false);
        self.active = false;
    }

    /// Enqueue a step command without blocking
    pub fn try_submit(&mut self, cycles: u32) -> Result<(), QueueFull> {
        if self.sm.tx().try_push(cycles) {
            Ok(())
        } else {
            Err(QueueFull)
        }
    }
}
