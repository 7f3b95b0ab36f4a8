//! Error taxonomy
//!
//! Three failure classes exist:
//!
//! - [`SyncError`]: a time fetch failed after startup. Non-fatal; the RTC
//!   keeps its previous value and the sync is retried next hour.
//! - [`ConnectError`]: network association failed. During the initial
//!   startup sync this is fatal and the firmware restarts the process,
//!   because without a time base the clock cannot schedule ticks.
//! - [`QueueFull`]: a step command hit a saturated queue. Handled by
//!   backpressure; never corrupts ordering.

/// Network time fetch failure (transient, retried next cycle)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SyncError {
    /// DNS lookup for the time server failed
    DnsFailed,
    /// DNS returned no addresses
    NoAddress,
    /// UDP socket could not be bound
    BindFailed,
    /// Request could not be sent
    SendFailed,
    /// No response within the timeout
    Timeout,
    /// Receive failed after the request went out
    RecvFailed,
    /// Response shorter than an NTP packet
    TruncatedResponse,
    /// Transmit timestamp predates the Unix epoch
    InvalidTimestamp,
}

/// Network association failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConnectError {
    /// Could not join the access point within the retry budget
    JoinFailed,
    /// No DHCP lease within the timeout
    DhcpTimeout,
}

/// A bounded command queue rejected an enqueue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct QueueFull;
