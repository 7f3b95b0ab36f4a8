//! Configuration type definitions
//!
//! Startup constants for the clock. Everything here is read once during
//! bring-up and stays fixed for the process lifetime.

/// Maximum PIO instruction delay field (5 bits, no side-set)
pub const MAX_DWELL_TICKS: u8 = 31;

/// Clock configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockConfig {
    /// Steps per full rotation of the minute drum. This is a quarter of
    /// the physical step count because the sequencer advances four steps
    /// per commutation cycle.
    pub steps_per_rotation: u16,
    /// Settle delay after a button press edge, in milliseconds
    pub debounce_ms: u16,
    /// Ticks each phase output is held before advancing. Larger means
    /// slower, quieter rotation. Must not exceed [`MAX_DWELL_TICKS`].
    pub phase_dwell_ticks: u8,
    /// Clock frequency of the pulse generator state machines, in Hz
    pub sequencer_clock_hz: u32,
    /// Refresh the RTC from the network once per hour
    pub hourly_sync: bool,
    /// Delay before an hourly sync, so it does not overlap with the
    /// just-issued minute tick, in seconds
    pub sync_settle_secs: u8,
    /// Local offset from UTC applied to fetched timestamps, in minutes
    pub utc_offset_minutes: i32,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            steps_per_rotation: 383,
            debounce_ms: 100,
            phase_dwell_ticks: 4,
            sequencer_clock_hz: 2_000,
            hourly_sync: true,
            sync_settle_secs: 5,
            utc_offset_minutes: 0,
        }
    }
}

impl ClockConfig {
    /// Dwell clamped to the range the PIO delay field can express
    pub fn dwell_ticks(&self) -> u8 {
        self.phase_dwell_ticks.min(MAX_DWELL_TICKS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_movement() {
        let config = ClockConfig::default();
        assert_eq!(config.steps_per_rotation, 383);
        assert_eq!(config.sequencer_clock_hz, 2_000);
        assert!(config.hourly_sync);
    }

    #[test]
    fn test_dwell_clamped_to_delay_field() {
        let config = ClockConfig {
            phase_dwell_ticks: 200,
            ..Default::default()
        };
        assert_eq!(config.dwell_ticks(), MAX_DWELL_TICKS);
    }
}
