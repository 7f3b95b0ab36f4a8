//! Rotation controller
//!
//! Translates a signed step delta into a direction choice and an unsigned
//! magnitude, and hands it to a [`StepSink`]. Stateless; purely dispatch.

use crate::error::QueueFull;

/// Rotation direction, selecting which pulse generator receives a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Clock face advances
    Forward,
    /// Clock face retreats
    Reverse,
}

impl Direction {
    /// Get the opposite direction
    pub fn opposite(self) -> Self {
        match self {
            Direction::Forward => Direction::Reverse,
            Direction::Reverse => Direction::Forward,
        }
    }
}

/// Consumer of step commands
///
/// Implemented by the host-side [`MotorQueues`](crate::queue::MotorQueues)
/// and by the firmware's pair of PIO TX FIFOs. Single producer per sink;
/// commands for one direction execute in submission order.
pub trait StepSink {
    /// Enqueue `cycles` commutation cycles without blocking
    fn try_submit(&mut self, direction: Direction, cycles: u32) -> Result<(), QueueFull>;
}

/// Stateless dispatch from signed step deltas to directional commands
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RotationController {
    steps_per_rotation: u16,
}

impl RotationController {
    pub fn new(steps_per_rotation: u16) -> Self {
        Self { steps_per_rotation }
    }

    pub fn steps_per_rotation(&self) -> u16 {
        self.steps_per_rotation
    }

    /// Split a signed delta into direction and magnitude
    pub fn split(steps: i32) -> (Direction, u32) {
        if steps >= 0 {
            (Direction::Forward, steps as u32)
        } else {
            (Direction::Reverse, steps.unsigned_abs())
        }
    }

    /// Rotate by a signed number of commutation cycles
    ///
    /// Zero is a well-defined no-op for the sequencer, not an error, so it
    /// is submitted like any other command.
    pub fn rotate<S: StepSink>(&self, sink: &mut S, steps: i32) -> Result<(), QueueFull> {
        let (direction, cycles) = Self::split(steps);
        sink.try_submit(direction, cycles)
    }

    /// Advance the clock face one minute
    pub fn tick<S: StepSink>(&self, sink: &mut S) -> Result<(), QueueFull> {
        self.rotate(sink, i32::from(self.steps_per_rotation))
    }

    /// Move the clock face by a percentage of a minute, either direction
    pub fn adjust_angle<S: StepSink>(&self, sink: &mut S, percent: i32) -> Result<(), QueueFull> {
        self.rotate(sink, scaled_steps(self.steps_per_rotation, percent))
    }
}

/// `round(steps_per_rotation * percent / 100)` in integer math,
/// half away from zero
pub fn scaled_steps(steps_per_rotation: u16, percent: i32) -> i32 {
    let scaled = i32::from(steps_per_rotation) * percent;
    if scaled >= 0 {
        (scaled + 50) / 100
    } else {
        (scaled - 50) / 100
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue::MotorQueues;

    #[test]
    fn test_split_signs() {
        assert_eq!(
            RotationController::split(383),
            (Direction::Forward, 383)
        );
        assert_eq!(
            RotationController::split(-19),
            (Direction::Reverse, 19)
        );
        assert_eq!(RotationController::split(0), (Direction::Forward, 0));
    }

    #[test]
    fn test_tick_enqueues_full_rotation_forward() {
        let controller = RotationController::new(383);
        let mut queues = MotorQueues::new();
        controller.tick(&mut queues).unwrap();

        assert_eq!(queues.forward.dequeue(), Some(383));
        assert!(queues.reverse.is_empty());
    }

    #[test]
    fn test_adjust_angle_rounds_to_correct_queue() {
        // 383 * 5 / 100 = 19.15 -> 19, both directions
        let controller = RotationController::new(383);
        let mut queues = MotorQueues::new();

        controller.adjust_angle(&mut queues, 5).unwrap();
        controller.adjust_angle(&mut queues, -5).unwrap();

        assert_eq!(queues.forward.dequeue(), Some(19));
        assert_eq!(queues.reverse.dequeue(), Some(19));
    }

    #[test]
    fn test_scaled_steps_rounds_half_away_from_zero() {
        assert_eq!(scaled_steps(383, 5), 19);
        assert_eq!(scaled_steps(383, -5), -19);
        assert_eq!(scaled_steps(100, 5), 5);
        // 150 * 5 / 100 = 7.5 rounds up
        assert_eq!(scaled_steps(150, 5), 8);
        assert_eq!(scaled_steps(150, -5), -8);
    }

    #[test]
    fn test_opposite_rotations_are_inverses() {
        // rotate(+S) then rotate(-S): equal magnitudes on opposite queues,
        // so the net cycle count once both are consumed is zero.
        let controller = RotationController::new(383);
        let mut queues = MotorQueues::new();

        controller.rotate(&mut queues, 57).unwrap();
        controller.rotate(&mut queues, -57).unwrap();

        assert_eq!(queues.forward.dequeue(), queues.reverse.dequeue());
    }

    #[test]
    fn test_direction_opposite() {
        assert_eq!(Direction::Forward.opposite(), Direction::Reverse);
        assert_eq!(Direction::Reverse.opposite(), Direction::Forward);
    }
}
