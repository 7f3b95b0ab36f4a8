//! Startup configuration
//!
//! Everything the firmware reads once at boot. Pin assignments live in
//! `main.rs` next to the peripherals they claim (stepper lines on
//! GPIO6..9, buttons on GPIO10..12).

use numechron_core::config::ClockConfig;

/// Clock constants for this movement
pub const CLOCK_CONFIG: ClockConfig = ClockConfig {
    // A quarter of the physical count; the sequencer does four steps per
    // commutation cycle.
    steps_per_rotation: 383,
    debounce_ms: 100,
    phase_dwell_ticks: 4,
    sequencer_clock_hz: 2_000,
    hourly_sync: true,
    sync_settle_secs: 5,
    utc_offset_minutes: 0,
};

/// Manual nudge size as a percentage of one rotation
pub const NUDGE_PERCENT: i32 = 5;

/// NTP endpoint for the hourly sync
pub const NTP_SERVER: &str = "pool.ntp.org";
pub const NTP_PORT: u16 = 123;

/// Wi-Fi credentials, baked in at build time:
/// `WIFI_SSID=... WIFI_PASS=... cargo build --release`
pub const WIFI_SSID: &str = match option_env!("WIFI_SSID") {
    Some(ssid) => ssid,
    None => "",
};
pub const WIFI_PASS: &str = match option_env!("WIFI_PASS") {
    Some(pass) => pass,
    None => "",
};
