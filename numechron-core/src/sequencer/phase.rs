//! Commutation phases
//!
//! One commutation cycle energizes the four coil lines one at a time.
//! Forward runs A→B→C→D, reverse runs D→C→B→A; the bit patterns are what
//! the pulse generator writes to its four consecutive output pins.

use crate::rotation::Direction;

/// Number of output lines driving the motor coils
pub const COIL_LINES: usize = 4;

/// One of the four coil-energization phases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    A,
    B,
    C,
    D,
}

impl Phase {
    /// Pin bit pattern for this phase (one line high)
    pub fn bits(self) -> u8 {
        match self {
            Phase::A => 0b0001,
            Phase::B => 0b0010,
            Phase::C => 0b0100,
            Phase::D => 0b1000,
        }
    }

    /// First phase of a commutation cycle in the given direction
    pub fn first(direction: Direction) -> Self {
        match direction {
            Direction::Forward => Phase::A,
            Direction::Reverse => Phase::D,
        }
    }

    /// Last phase of a commutation cycle in the given direction
    pub fn last(direction: Direction) -> Self {
        Phase::first(direction.opposite())
    }

    /// Successor phase in the given direction
    pub fn next(self, direction: Direction) -> Self {
        match direction {
            Direction::Forward => match self {
                Phase::A => Phase::B,
                Phase::B => Phase::C,
                Phase::C => Phase::D,
                Phase::D => Phase::A,
            },
            Direction::Reverse => match self {
                Phase::D => Phase::C,
                Phase::C => Phase::B,
                Phase::B => Phase::A,
                Phase::A => Phase::D,
            },
        }
    }
}

/// Commutation sequence for one cycle, in emission order
pub fn commutation_sequence(direction: Direction) -> [u8; COIL_LINES] {
    let mut sequence = [0; COIL_LINES];
    let mut phase = Phase::first(direction);
    for slot in sequence.iter_mut() {
        *slot = phase.bits();
        phase = phase.next(direction);
    }
    sequence
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_sequence() {
        assert_eq!(
            commutation_sequence(Direction::Forward),
            [0b0001, 0b0010, 0b0100, 0b1000]
        );
    }

    #[test]
    fn test_reverse_sequence() {
        assert_eq!(
            commutation_sequence(Direction::Reverse),
            [0b1000, 0b0100, 0b0010, 0b0001]
        );
    }

    #[test]
    fn test_reverse_is_not_forward_replayed() {
        // Opposite rotations are inverses in net cycles, but the
        // instantaneous output order differs.
        let forward = commutation_sequence(Direction::Forward);
        let reverse = commutation_sequence(Direction::Reverse);
        assert_ne!(forward, reverse);

        let mut flipped = forward;
        flipped.reverse();
        assert_eq!(flipped, reverse);
    }

    #[test]
    fn test_cycle_wraps() {
        assert_eq!(
            Phase::last(Direction::Forward).next(Direction::Forward),
            Phase::first(Direction::Forward)
        );
        assert_eq!(
            Phase::last(Direction::Reverse).next(Direction::Reverse),
            Phase::first(Direction::Reverse)
        );
    }

    #[test]
    fn test_one_line_high_per_phase() {
        for phase in [Phase::A, Phase::B, Phase::C, Phase::D] {
            assert_eq!(phase.bits().count_ones(), 1);
        }
    }
}
