//! Control loop engine
//!
//! The schedule half of the control loop: compares each fresh RTC snapshot
//! against the previous iteration's cached minute and hour fields and
//! decides what the loop has to do. Button handling and the actual sleeps
//! live in the firmware task; the engine is pure and runs in host tests.

use crate::time::ClockSnapshot;

/// Control loop state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EngineState {
    Running,
    /// Terminal; entered only through an explicit stop request
    Stopped,
}

/// What one iteration has to do
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Observation {
    /// Minute rolled over: advance the clock face one rotation
    pub tick: bool,
    /// Hour rolled over: refresh the RTC from the network
    pub sync_due: bool,
}

/// Rollover detector and stop latch for the control loop
#[derive(Debug)]
pub struct ClockEngine {
    state: EngineState,
    stop_requested: bool,
    prev_minute: u8,
    prev_hour: u8,
    hourly_sync: bool,
}

impl ClockEngine {
    /// Seed the previous-field cache from the snapshot taken right after
    /// the startup sync, so the first iteration does not fire a spurious
    /// tick.
    pub fn new(initial: &ClockSnapshot, hourly_sync: bool) -> Self {
        Self {
            state: EngineState::Running,
            stop_requested: false,
            prev_minute: initial.minute,
            prev_hour: initial.hour,
            hourly_sync,
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Manual test hook: stop the loop at the top of its next iteration
    pub fn request_stop(&mut self) {
        self.stop_requested = true;
    }

    /// Run one iteration against a fresh snapshot
    ///
    /// Returns `None` once stopped; the caller exits its loop. A pending
    /// stop request is consumed here, at the top of the iteration.
    pub fn step(&mut self, snapshot: &ClockSnapshot) -> Option<Observation> {
        if self.stop_requested {
            self.stop_requested = false;
            self.state = EngineState::Stopped;
        }
        if self.state == EngineState::Stopped {
            return None;
        }

        let mut observation = Observation::default();

        if snapshot.minute != self.prev_minute {
            self.prev_minute = snapshot.minute;
            observation.tick = true;
        }

        if snapshot.hour != self.prev_hour {
            self.prev_hour = snapshot.hour;
            observation.sync_due = self.hourly_sync;
        }

        Some(observation)
    }

    /// Reseed the cache after a successful sync so a stepped RTC does not
    /// fire a tick for time the face never displayed.
    pub fn note_synced(&mut self, snapshot: &ClockSnapshot) {
        self.prev_minute = snapshot.minute;
        self.prev_hour = snapshot.hour;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(hour: u8, minute: u8) -> ClockSnapshot {
        ClockSnapshot {
            year: 2024,
            month: 3,
            day: 9,
            weekday: 6,
            hour,
            minute,
            second: 0,
        }
    }

    #[test]
    fn test_unchanged_minute_fires_nothing() {
        let mut engine = ClockEngine::new(&at(10, 30), true);
        for _ in 0..100 {
            assert_eq!(engine.step(&at(10, 30)), Some(Observation::default()));
        }
    }

    #[test]
    fn test_minute_rollover_ticks_once() {
        let mut engine = ClockEngine::new(&at(10, 30), true);

        let observation = engine.step(&at(10, 31)).unwrap();
        assert!(observation.tick);
        assert!(!observation.sync_due);

        // Same minute again: no second tick
        assert_eq!(engine.step(&at(10, 31)), Some(Observation::default()));
    }

    #[test]
    fn test_hour_rollover_fires_one_tick_and_one_sync() {
        // 10:59 -> 11:00, minute wraps 59 -> 0 while the hour changes
        let mut engine = ClockEngine::new(&at(10, 59), true);

        let observation = engine.step(&at(11, 0)).unwrap();
        assert!(observation.tick);
        assert!(observation.sync_due);

        assert_eq!(engine.step(&at(11, 0)), Some(Observation::default()));
    }

    #[test]
    fn test_hourly_sync_disabled() {
        let mut engine = ClockEngine::new(&at(10, 59), false);
        let observation = engine.step(&at(11, 0)).unwrap();
        assert!(observation.tick);
        assert!(!observation.sync_due);
    }

    #[test]
    fn test_stop_request_consumed_at_top_of_iteration() {
        let mut engine = ClockEngine::new(&at(10, 30), true);
        engine.request_stop();

        assert_eq!(engine.step(&at(10, 31)), None);
        assert_eq!(engine.state(), EngineState::Stopped);

        // Terminal: further snapshots never revive the loop
        assert_eq!(engine.step(&at(10, 32)), None);
    }

    #[test]
    fn test_note_synced_suppresses_spurious_tick() {
        let mut engine = ClockEngine::new(&at(10, 30), true);

        // Sync stepped the RTC several minutes ahead
        engine.note_synced(&at(10, 34));
        assert_eq!(engine.step(&at(10, 34)), Some(Observation::default()));

        // The next real rollover still fires
        assert!(engine.step(&at(10, 35)).unwrap().tick);
    }
}
