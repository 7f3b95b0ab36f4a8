//! PIO program and clocking for the pulse generators
//!
//! Each direction gets its own PIO state machine running the same small
//! program, assembled at startup so the phase dwell stays a configuration
//! value instead of a compile-time constant:
//!
//! ```text
//! .wrap_target
//!     pull block              ; suspend until a step count arrives
//!     mov x, osr
//!     jmp !x end              ; zero steps: skip straight to de-energize
//! loop:
//!     set pins, 0b0001 [dwell]
//!     set pins, 0b0010 [dwell]
//!     set pins, 0b0100 [dwell]
//!     set pins, 0b1000 [dwell]
//!     jmp x-- loop
//! end:
//!     set pins, 0 [dwell]     ; all lines low while idle
//! .wrap
//! ```
//!
//! The reverse program is identical with the four `set` patterns in the
//! opposite order. The TX FIFO (depth 4) is the motor command queue; the
//! `pull block` is the consumer's blocking dequeue.

use numechron_core::rotation::Direction;
use numechron_core::sequencer::phase::commutation_sequence;
use pio::{Assembler, JmpCondition, MovDestination, MovOperation, MovSource, SetDestination};

/// System clock frequency (RP2040 default)
pub const SYS_CLK_HZ: u32 = 125_000_000;

/// Instruction slots the commutation program occupies
pub const PROGRAM_SIZE: usize = 9;

/// Calculate the clock divider for a target state machine frequency
///
/// The PIO runs at SYS_CLK / divider Hz; with the dwell delays that sets
/// the phase rate directly. Returns (integer_part, fractional_part) for
/// the 16.8 fixed-point divider register.
pub fn clock_divider(freq_hz: u32) -> (u16, u8) {
    if freq_hz == 0 {
        return (0xFFFF, 0xFF); // Maximum divider = stopped
    }

    // To get 8-bit fractional precision, scale by 256 first
    let divider_x256 = (SYS_CLK_HZ as u64 * 256) / freq_hz as u64;

    let int_part = (divider_x256 / 256) as u32;
    let frac_part = (divider_x256 % 256) as u32;

    // Clamp to valid range
    let int_part = int_part.min(0xFFFF) as u16;
    let frac_part = frac_part.min(0xFF) as u8;

    (int_part, frac_part)
}

/// Divider register bits for [`fixed::types::U24F8::from_bits`]
pub fn clock_divider_bits(freq_hz: u32) -> u32 {
    let (int_part, frac_part) = clock_divider(freq_hz);
    (u32::from(int_part) << 8) | u32::from(frac_part)
}

/// Assemble the commutation program for one direction
///
/// `dwell` is the per-phase hold in state machine ticks; it must fit the
/// 5-bit delay field (the caller clamps via `ClockConfig::dwell_ticks`).
pub fn commutation_program(direction: Direction, dwell: u8) -> pio::Program<32> {
    let mut a = Assembler::<32>::new();
    let mut wrap_target = a.label();
    let mut wrap_source = a.label();
    let mut cycle = a.label();
    let mut end = a.label();

    a.bind(&mut wrap_target);
    a.pull(false, true);
    a.mov(MovDestination::X, MovOperation::None, MovSource::OSR);
    a.jmp(JmpCondition::XIsZero, &mut end);
    a.bind(&mut cycle);
    for pattern in commutation_sequence(direction) {
        a.set_with_delay(SetDestination::PINS, pattern, dwell);
    }
    a.jmp(JmpCondition::XDecNonZero, &mut cycle);
    a.bind(&mut end);
    a.set_with_delay(SetDestination::PINS, 0, dwell);
    a.bind(&mut wrap_source);

    a.assemble_with_wrap(wrap_source, wrap_target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_divider() {
        // At the default 2 kHz sequencer clock: 125 MHz / 2000 = 62500
        let (int_part, frac_part) = clock_divider(2_000);
        assert_eq!(int_part, 62_500);
        assert_eq!(frac_part, 0);

        // Zero requests the stopped divider
        assert_eq!(clock_divider(0), (0xFFFF, 0xFF));
    }

    #[test]
    fn test_divider_bits_layout() {
        assert_eq!(clock_divider_bits(2_000), 62_500 << 8);
    }

    #[test]
    fn test_program_fits_one_pio_block_twice() {
        let forward = commutation_program(Direction::Forward, 4);
        let reverse = commutation_program(Direction::Reverse, 4);
        assert_eq!(forward.code.len(), PROGRAM_SIZE);
        assert_eq!(reverse.code.len(), PROGRAM_SIZE);
        // Both directions must coexist in the 32-slot instruction memory
        assert!(forward.code.len() + reverse.code.len() <= 32);
    }

    #[test]
    fn test_directions_differ_only_in_set_order() {
        let forward = commutation_program(Direction::Forward, 4);
        let reverse = commutation_program(Direction::Reverse, 4);

        let mut mirrored: heapless::Vec<u16, 32> = forward.code.iter().copied().collect();
        mirrored[3..7].reverse();
        assert_eq!(&mirrored[..], &reverse.code[..]);
    }
}
