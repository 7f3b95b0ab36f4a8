//! Network time synchronization
//!
//! External collaborator for the control loop: on demand, join the
//! access point, ask an NTP server for the time, and leave again. The
//! radio stays associated only for the duration of a sync, like the
//! original movement - the clock spends 59 minutes an hour offline.
//!
//! The Pico W status LED hangs off the wireless chip, so this module
//! also owns the blink notifier (one blink at boot, four after
//! association, three after leaving).

use cyw43::{Control, JoinOptions};
use cyw43_pio::PioSpi;
use defmt::*;
use embassy_net::dns::DnsQueryType;
use embassy_net::udp::{PacketMetadata, UdpSocket};
use embassy_net::Stack;
use embassy_rp::gpio::Output;
use embassy_rp::peripherals::{DMA_CH0, PIO0};
use embassy_time::{with_timeout, Duration, Timer};

use numechron_core::error::{ConnectError, SyncError};

use crate::config::{NTP_PORT, NTP_SERVER, WIFI_PASS, WIFI_SSID};

/// Attempts before an association is declared failed
const JOIN_ATTEMPTS: u32 = 10;

/// Upper bound on waiting for a DHCP lease
const DHCP_TIMEOUT: Duration = Duration::from_secs(30);

/// Upper bound on waiting for the NTP response
const NTP_TIMEOUT: Duration = Duration::from_secs(5);

/// Seconds between the NTP epoch (1900) and the Unix epoch (1970)
const NTP_TO_UNIX_OFFSET: u64 = 2_208_988_800;

/// Why a full sync cycle failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum SyncFailure {
    /// Could not associate; fatal at startup, transient afterwards
    Connect(ConnectError),
    /// Associated but the time fetch failed; always transient
    Fetch(SyncError),
}

/// Wi-Fi control and network stack bundled for on-demand syncs
pub struct TimeSync {
    control: Control<'static>,
    stack: Stack<'static>,
}

impl TimeSync {
    pub fn new(control: Control<'static>, stack: Stack<'static>) -> Self {
        Self { control, stack }
    }

    /// Blink the status LED `count` times
    pub async fn blink(&mut self, count: u32, interval_ms: u64) {
        for _ in 0..count {
            self.control.gpio_set(0, true).await;
            Timer::after_millis(interval_ms).await;
            self.control.gpio_set(0, false).await;
            Timer::after_millis(interval_ms).await;
        }
    }

    /// Associate and wait for a DHCP lease
    pub async fn connect(&mut self) -> Result<(), ConnectError> {
        info!("Joining {}", WIFI_SSID);

        let mut joined = false;
        for attempt in 1..=JOIN_ATTEMPTS {
            match self
                .control
                .join(WIFI_SSID, JoinOptions::new(WIFI_PASS.as_bytes()))
                .await
            {
                Ok(()) => {
                    joined = true;
                    break;
                }
                Err(err) => {
                    warn!("Join attempt {} failed: {}", attempt, err.status);
                    Timer::after_secs(1).await;
                }
            }
        }
        if !joined {
            return Err(ConnectError::JoinFailed);
        }

        if with_timeout(DHCP_TIMEOUT, self.stack.wait_config_up())
            .await
            .is_err()
        {
            // Associated but no lease; do not stay on the network
            self.disconnect().await;
            return Err(ConnectError::DhcpTimeout);
        }

        if let Some(config) = self.stack.config_v4() {
            info!("Connected, address {}", config.address);
        }
        // Four blinks: associated
        self.blink(4, 250).await;
        Ok(())
    }

    /// Drop the association
    pub async fn disconnect(&mut self) {
        self.control.leave().await;
        // Three blinks: offline again
        self.blink(3, 250).await;
        info!("Disconnected");
    }

    /// One SNTP exchange; returns seconds since the Unix epoch
    pub async fn fetch_unix(&mut self) -> Result<u64, SyncError> {
        let addrs = self
            .stack
            .dns_query(NTP_SERVER, DnsQueryType::A)
            .await
            .map_err(|_| SyncError::DnsFailed)?;
        let server = *addrs.first().ok_or(SyncError::NoAddress)?;

        let mut rx_meta = [PacketMetadata::EMPTY; 1];
        let mut rx_buffer = [0; 128];
        let mut tx_meta = [PacketMetadata::EMPTY; 1];
        let mut tx_buffer = [0; 128];
        let mut socket = UdpSocket::new(
            self.stack,
            &mut rx_meta,
            &mut rx_buffer,
            &mut tx_meta,
            &mut tx_buffer,
        );
        socket.bind(0).map_err(|_| SyncError::BindFailed)?;

        // 48-byte request: LI=0, VN=3, mode 3 (client)
        let mut request = [0u8; 48];
        request[0] = 0x1B;
        socket
            .send_to(&request, (server, NTP_PORT))
            .await
            .map_err(|_| SyncError::SendFailed)?;

        let mut response = [0u8; 48];
        let (len, _from) = with_timeout(NTP_TIMEOUT, socket.recv_from(&mut response))
            .await
            .map_err(|_| SyncError::Timeout)?
            .map_err(|_| SyncError::RecvFailed)?;
        if len < 48 {
            return Err(SyncError::TruncatedResponse);
        }

        // Transmit timestamp seconds, bytes 40..44, big-endian
        let seconds = u32::from_be_bytes([response[40], response[41], response[42], response[43]]);
        let seconds = u64::from(seconds);
        if seconds < NTP_TO_UNIX_OFFSET {
            return Err(SyncError::InvalidTimestamp);
        }

        Ok(seconds - NTP_TO_UNIX_OFFSET)
    }

    /// Full best-effort sync cycle: connect, fetch, disconnect
    pub async fn resync(&mut self) -> Result<u64, SyncFailure> {
        self.connect().await.map_err(SyncFailure::Connect)?;
        let fetched = self.fetch_unix().await;
        // Leave the network even when the fetch failed
        self.disconnect().await;
        fetched.map_err(SyncFailure::Fetch)
    }
}

#[embassy_executor::task]
pub async fn wifi_task(
    runner: cyw43::Runner<'static, Output<'static>, PioSpi<'static, PIO0, 0, DMA_CH0>>,
) -> ! {
    runner.run().await
}

#[embassy_executor::task]
pub async fn net_task(mut runner: embassy_net::Runner<'static, cyw43::NetDriver<'static>>) -> ! {
    runner.run().await
}
