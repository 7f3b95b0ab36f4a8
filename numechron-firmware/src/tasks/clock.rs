//! The control loop
//!
//! One cooperative task owning the RTC, the buttons and both pulse
//! generators. Each iteration: honor a stop request, snapshot the RTC,
//! fire the minute tick and the hourly sync on rollover, then poll the
//! buttons. All waits are short bounded sleeps; the pulse trains
//! themselves run on the PIO and are never stalled by anything here.

use defmt::*;
use embassy_rp::peripherals::{PIO1, RTC};
use embassy_rp::rtc::Rtc;
use embassy_time::Timer;

use numechron_core::config::ClockConfig;
use numechron_core::engine::ClockEngine;
use numechron_core::error::QueueFull;
use numechron_core::rotation::{Direction, RotationController, StepSink};
use numechron_core::time::ClockSnapshot;
use numechron_hal_rp2040::pulse::PulseGenerator;

use crate::buttons::{ButtonAction, ButtonPanel};
use crate::channels::STOP;
use crate::config::NUDGE_PERCENT;
use crate::net::TimeSync;
use crate::rtc::{datetime_to_snapshot, snapshot_to_datetime};

/// Idle sleep per iteration, keeping the loop cooperative
const POLL_INTERVAL_MS: u64 = 10;

/// Retry interval when a command queue is saturated
const BACKPRESSURE_RETRY_MS: u64 = 5;

/// Both directional generators as one [`StepSink`]
struct PulseSink<'a> {
    forward: &'a mut PulseGenerator<'static, PIO1, 0>,
    reverse: &'a mut PulseGenerator<'static, PIO1, 1>,
}

impl StepSink for PulseSink<'_> {
    fn try_submit(&mut self, direction: Direction, cycles: u32) -> Result<(), QueueFull> {
        match direction {
            Direction::Forward => self.forward.try_submit(cycles),
            Direction::Reverse => self.reverse.try_submit(cycles),
        }
    }
}

/// Queue-full policy: backpressure. Retry until the generator drains a
/// slot; bounded by the duration of the command it is executing.
async fn submit<F>(mut attempt: F)
where
    F: FnMut() -> Result<(), QueueFull>,
{
    while attempt().is_err() {
        trace!("Command queue saturated, retrying");
        Timer::after_millis(BACKPRESSURE_RETRY_MS).await;
    }
}

/// Control loop task
#[embassy_executor::task]
pub async fn clock_task(
    mut rtc: Rtc<'static, RTC>,
    mut forward: PulseGenerator<'static, PIO1, 0>,
    mut reverse: PulseGenerator<'static, PIO1, 1>,
    mut buttons: ButtonPanel<'static>,
    mut sync: TimeSync,
    config: ClockConfig,
    initial: ClockSnapshot,
) {
    info!("Clock task started");

    forward.activate();
    reverse.activate();

    let controller = RotationController::new(config.steps_per_rotation);
    let mut engine = ClockEngine::new(&initial, config.hourly_sync);

    loop {
        if STOP.try_take().is_some() {
            engine.request_stop();
        }

        let snapshot = match rtc.now() {
            Ok(now) => datetime_to_snapshot(&now),
            Err(_) => {
                warn!("RTC read failed");
                Timer::after_millis(POLL_INTERVAL_MS).await;
                continue;
            }
        };

        let Some(observation) = engine.step(&snapshot) else {
            break;
        };

        if observation.tick {
            info!("Tick: {}:{:02}", snapshot.hour, snapshot.minute);
            let mut sink = PulseSink {
                forward: &mut forward,
                reverse: &mut reverse,
            };
            submit(|| controller.tick(&mut sink)).await;
        }

        if observation.sync_due {
            info!("Hour is {}, refreshing time", snapshot.hour);
            // Let the minute tick and any button handling finish first
            Timer::after_secs(u64::from(config.sync_settle_secs)).await;
            match sync.resync().await {
                Ok(unix) => {
                    let synced = ClockSnapshot::from_unix(unix, config.utc_offset_minutes);
                    if rtc.set_datetime(snapshot_to_datetime(&synced)).is_err() {
                        warn!("RTC rejected synced datetime");
                    }
                    engine.note_synced(&synced);
                    info!(
                        "Time is now {}:{:02}:{:02}",
                        synced.hour, synced.minute, synced.second
                    );
                }
                // Stale time is fine; try again next hour
                Err(failure) => warn!("Hourly sync failed: {}", failure),
            }
        }

        for action in buttons.poll() {
            debug!("Button: {}", action);
            let mut sink = PulseSink {
                forward: &mut forward,
                reverse: &mut reverse,
            };
            match action {
                ButtonAction::Tick => submit(|| controller.tick(&mut sink)).await,
                ButtonAction::NudgeForward => {
                    submit(|| controller.adjust_angle(&mut sink, NUDGE_PERCENT)).await
                }
                ButtonAction::NudgeBackward => {
                    submit(|| controller.adjust_angle(&mut sink, -NUDGE_PERCENT)).await
                }
            }
            Timer::after_millis(u64::from(config.debounce_ms)).await;
        }

        Timer::after_millis(POLL_INTERVAL_MS).await;
    }

    // Stop is a test hook; leave the motor de-energized behind us
    forward.deactivate().await;
    reverse.deactivate().await;
    info!("Clock loop stopped");
}
