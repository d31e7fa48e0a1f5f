//! A trait for exchanging classic CAN frames over an interface, plus the
//! health and configuration types shared by all drivers.

#[cfg(feature = "mock")]
mod mock;

#[cfg(feature = "mock")]
pub use mock::{MockListener, MockTransport};

use std::fmt;
use std::time::Duration;

use crate::frame::{Event, Frame};

/// An abstraction over one CAN controller.
///
/// Implementations wrap a concrete driver (an on-chip controller, an SPI
/// attached controller, a socket). The bridge owns its transports
/// exclusively and calls them from a single thread.
pub trait Transport {
    /// Driver-specific fault type. Faults are reported by the bridge and
    /// never stop the loop.
    type Error: std::error::Error + Send + Sync + 'static;

    /// A scoped polling session: a lazy, finite, non-restartable sequence of
    /// events. Dropping the listener releases the underlying receive
    /// session on every exit path.
    type Listener<'a>: Iterator<Item = Event>
    where
        Self: 'a;

    /// Queues one frame for transmission.
    ///
    /// `Ok(false)` signals a non-fatal transmit failure (lost arbitration,
    /// full mailbox); `Err` signals a driver fault. The bridge treats both
    /// the same way: log and carry on.
    fn send(&mut self, frame: &Frame) -> Result<bool, Self::Error>;

    /// Opens a polling session bounded by `timeout`.
    ///
    /// Returning with zero events is the common case, not an error.
    fn listen(&mut self, timeout: Duration) -> Result<Self::Listener<'_>, Self::Error>;

    /// Current error counters and bus state. Side-effect free.
    fn health(&self) -> HealthSnapshot;
}

/// Transport-level health classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusState {
    /// Normal operation.
    ErrorActive,
    /// Error counters are elevated; the controller no longer signals errors
    /// dominantly.
    ErrorPassive,
    /// The controller has taken itself off the bus.
    BusOff,
}

impl fmt::Display for BusState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BusState::ErrorActive => "error-active",
            BusState::ErrorPassive => "error-passive",
            BusState::BusOff => "bus-off",
        };
        f.write_str(s)
    }
}

/// Per-transport error counters and bus state, refreshed every cycle and
/// never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthSnapshot {
    /// Transmit error counter.
    pub tx_error_count: u32,
    /// Receive error counter.
    pub rx_error_count: u32,
    /// Bus state classification.
    pub state: BusState,
}

impl HealthSnapshot {
    /// Whether the transport is in a state other than error-active.
    pub fn is_degraded(&self) -> bool {
        self.state != BusState::ErrorActive
    }
}

impl Default for HealthSnapshot {
    fn default() -> Self {
        Self {
            tx_error_count: 0,
            rx_error_count: 0,
            state: BusState::ErrorActive,
        }
    }
}

/// Configuration handed to a transport constructor.
///
/// Pin and bus selection are driver-specific and belong to the driver crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkConfig {
    /// Bit rate in bits per second.
    pub baudrate: u32,
    /// Recover automatically from a bus-off state.
    pub auto_restart: bool,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            baudrate: 500_000,
            auto_restart: true,
        }
    }
}
