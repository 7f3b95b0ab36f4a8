//! Motor command queues
//!
//! A [`CommandQueue`] hands step counts from the control loop to a pulse
//! generator without blocking the sender mid-sequence. The depth matches
//! the PIO TX FIFO so the host model and the hardware agree on when
//! backpressure starts.
//!
//! Queue-full policy: backpressure. [`CommandQueue::enqueue`] is
//! non-blocking and fails with [`QueueFull`]; the producer retries after a
//! short sleep. Nothing is dropped, and FIFO order among accepted commands
//! is preserved.

use heapless::Deque;

use crate::error::QueueFull;
use crate::rotation::{Direction, StepSink};

/// Queue depth, matching the RP2040 PIO TX FIFO
pub const QUEUE_DEPTH: usize = 4;

/// Bounded FIFO of step-command magnitudes for one direction
#[derive(Debug, Default)]
pub struct CommandQueue {
    inner: Deque<u32, QUEUE_DEPTH>,
}

impl CommandQueue {
    pub const fn new() -> Self {
        Self {
            inner: Deque::new(),
        }
    }

    /// Append a command without blocking
    pub fn enqueue(&mut self, cycles: u32) -> Result<(), QueueFull> {
        self.inner.push_back(cycles).map_err(|_| QueueFull)
    }

    /// Remove the oldest command, if any
    pub fn dequeue(&mut self) -> Option<u32> {
        self.inner.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }
}

/// Forward and reverse queues bundled as a [`StepSink`]
///
/// This is the host-side stand-in for the pair of PIO TX FIFOs; the
/// sequencer model consumes from it in tests and simulations.
#[derive(Debug, Default)]
pub struct MotorQueues {
    pub forward: CommandQueue,
    pub reverse: CommandQueue,
}

impl MotorQueues {
    pub const fn new() -> Self {
        Self {
            forward: CommandQueue::new(),
            reverse: CommandQueue::new(),
        }
    }

    pub fn queue_mut(&mut self, direction: Direction) -> &mut CommandQueue {
        match direction {
            Direction::Forward => &mut self.forward,
            Direction::Reverse => &mut self.reverse,
        }
    }
}

impl StepSink for MotorQueues {
    fn try_submit(&mut self, direction: Direction, cycles: u32) -> Result<(), QueueFull> {
        self.queue_mut(direction).enqueue(cycles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_order() {
        let mut queue = CommandQueue::new();
        queue.enqueue(3).unwrap();
        queue.enqueue(1).unwrap();
        queue.enqueue(2).unwrap();

        assert_eq!(queue.dequeue(), Some(3));
        assert_eq!(queue.dequeue(), Some(1));
        assert_eq!(queue.dequeue(), Some(2));
        assert_eq!(queue.dequeue(), None);
    }

    #[test]
    fn test_full_queue_rejects_without_corruption() {
        let mut queue = CommandQueue::new();
        for n in 0..QUEUE_DEPTH as u32 {
            queue.enqueue(n).unwrap();
        }
        assert!(queue.enqueue(99).is_err());

        // Order among accepted commands survives the rejection
        for n in 0..QUEUE_DEPTH as u32 {
            assert_eq!(queue.dequeue(), Some(n));
        }
        assert!(queue.is_empty());
    }

    #[test]
    fn test_routes_by_direction() {
        let mut queues = MotorQueues::new();
        queues.try_submit(Direction::Forward, 383).unwrap();
        queues.try_submit(Direction::Reverse, 19).unwrap();

        assert_eq!(queues.forward.dequeue(), Some(383));
        assert_eq!(queues.reverse.dequeue(), Some(19));
    }
}
