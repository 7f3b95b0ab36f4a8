//! Numechron - Mechanical Digit Clock Firmware
//!
//! Firmware binary for the RP2040-based stepper clock. A 28BYJ-48 motor
//! advances the digit drum once per minute; two PIO state machines hold
//! the commutation programs so the movement keeps cycle-accurate timing
//! while the executor handles buttons and the network.

#![no_std]
#![no_main]

use cyw43_pio::{DEFAULT_CLOCK_DIVIDER, PioSpi};
use defmt::*;
use embassy_executor::Spawner;
use embassy_net::{Config as NetConfig, StackResources};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::peripherals::{PIO0, PIO1};
use embassy_rp::pio::{InterruptHandler, Pio};
use embassy_rp::rtc::Rtc;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use numechron_core::rotation::Direction;
use numechron_core::time::ClockSnapshot;
use numechron_hal_rp2040::pulse::PulseGenerator;

use crate::buttons::ButtonPanel;
use crate::config::CLOCK_CONFIG;
use crate::net::TimeSync;
use crate::rtc::snapshot_to_datetime;

mod buttons;
mod channels;
mod config;
mod net;
mod rtc;
mod tasks;

bind_interrupts!(struct Irqs {
    PIO0_IRQ_0 => InterruptHandler<PIO0>;
    PIO1_IRQ_0 => InterruptHandler<PIO1>;
});

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Numechron firmware starting...");

    let p = embassy_rp::init(Default::default());
    let clock_config = CLOCK_CONFIG;
    info!("Peripherals initialized");

    // Setup the CYW43 radio on PIO0 (onboard wiring of the Pico W)
    let fw = cyw43_firmware::CYW43_43439A0;
    let clm = cyw43_firmware::CYW43_43439A0_CLM;

    let pwr = Output::new(p.PIN_23, Level::Low);
    let cs = Output::new(p.PIN_25, Level::High);
    let mut wifi_pio = Pio::new(p.PIO0, Irqs);
    let spi = PioSpi::new(
        &mut wifi_pio.common,
        wifi_pio.sm0,
        DEFAULT_CLOCK_DIVIDER,
        wifi_pio.irq0,
        cs,
        p.PIN_24,
        p.PIN_29,
        p.DMA_CH0,
    );

    static STATE: StaticCell<cyw43::State> = StaticCell::new();
    let state = STATE.init(cyw43::State::new());
    let (net_device, mut control, wifi_runner) = cyw43::new(state, pwr, spi, fw).await;
    unwrap!(spawner.spawn(net::wifi_task(wifi_runner)));

    control.init(clm).await;
    control
        .set_power_management(cyw43::PowerManagementMode::PowerSave)
        .await;

    let net_config = NetConfig::dhcpv4(Default::default());
    let seed = 0x0b8d_5f27_41c6_93e8;

    static RESOURCES: StaticCell<StackResources<3>> = StaticCell::new();
    let (stack, net_runner) = embassy_net::new(
        net_device,
        net_config,
        RESOURCES.init(StackResources::<3>::new()),
        seed,
    );
    unwrap!(spawner.spawn(net::net_task(net_runner)));

    let mut sync = TimeSync::new(control, stack);
    info!("Network stack initialized");

    // One blink says hello
    sync.blink(1, 500).await;

    // Setup PIO1 for the stepper, one state machine per direction. Both
    // programs drive the same four coil lines.
    let Pio {
        mut common,
        sm0,
        sm1,
        ..
    } = Pio::new(p.PIO1, Irqs);

    let coil_pins = [
        common.make_pio_pin(p.PIN_6),
        common.make_pio_pin(p.PIN_7),
        common.make_pio_pin(p.PIN_8),
        common.make_pio_pin(p.PIN_9),
    ];

    let forward = PulseGenerator::new(
        &mut common,
        sm0,
        &coil_pins,
        Direction::Forward,
        clock_config.sequencer_clock_hz,
        clock_config.dwell_ticks(),
    );
    let reverse = PulseGenerator::new(
        &mut common,
        sm1,
        &coil_pins,
        Direction::Reverse,
        clock_config.sequencer_clock_hz,
        clock_config.dwell_ticks(),
    );
    info!("Pulse generators initialized");

    let buttons = ButtonPanel::new(
        Input::new(p.PIN_10, Pull::Up),
        Input::new(p.PIN_11, Pull::Up),
        Input::new(p.PIN_12, Pull::Up),
    );

    let mut rtc = Rtc::new(p.RTC);

    // The startup sync is mandatory: the face has no meaning until the
    // RTC holds real time. If the network will not give it to us, reset
    // and try again from scratch.
    let initial = match sync.resync().await {
        Ok(unix) => {
            let snapshot = ClockSnapshot::from_unix(unix, clock_config.utc_offset_minutes);
            if rtc.set_datetime(snapshot_to_datetime(&snapshot)).is_err() {
                error!("RTC rejected the startup datetime");
                cortex_m::peripheral::SCB::sys_reset();
            }
            info!(
                "Startup sync: {}-{:02}-{:02} {}:{:02}:{:02}",
                snapshot.year,
                snapshot.month,
                snapshot.day,
                snapshot.hour,
                snapshot.minute,
                snapshot.second
            );
            snapshot
        }
        Err(failure) => {
            error!("Startup sync failed: {}", failure);
            cortex_m::peripheral::SCB::sys_reset();
        }
    };

    unwrap!(spawner.spawn(tasks::clock_task(
        rtc,
        forward,
        reverse,
        buttons,
        sync,
        clock_config,
        initial,
    )));

    info!("All tasks spawned, firmware running");

    // Main task has nothing else to do - all work happens in spawned tasks
    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}
