//! Port traits: the hexagonal boundary between the link protocol and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ Commander (protocol core)
//! ```
//!
//! The transceiver driver, the time source and the status observer are all
//! external collaborators.  The [`Commander`](super::service::Commander)
//! consumes them through these traits, so the protocol core never touches
//! SPI, GPIO or timers directly.

use super::events::Status;
use crate::error::RadioError;

// ───────────────────────────────────────────────────────────────
// Transceiver port (driven adapter: domain ↔ packet radio)
// ───────────────────────────────────────────────────────────────

/// Half-duplex packet radio.
///
/// Mirrors the RadioHead-style driver surface: one packet in flight at a
/// time, blocking transmit, polled or timed receive.
pub trait Transceiver {
    /// Bring the radio up on `frequency_mhz` at `tx_power_dbm`.
    /// Failure here is fatal for the node.
    fn init(&mut self, frequency_mhz: f32, tx_power_dbm: i8) -> Result<(), RadioError>;

    /// A received packet is waiting to be read.
    fn is_available(&mut self) -> bool;

    /// Copy the waiting packet into `buf` and return its length.
    /// A packet that does not fit is an error, never truncated.
    fn receive(&mut self, buf: &mut [u8]) -> Result<usize, RadioError>;

    /// Queue `data` for transmission.
    fn transmit(&mut self, data: &[u8]) -> Result<(), RadioError>;

    /// Block until the last queued packet has left the antenna.
    fn wait_transmit_complete(&mut self) -> Result<(), RadioError>;

    /// Block until a packet is available or `timeout_ms` passes.
    /// Returns `true` if a packet is available.
    fn wait_available_timeout(&mut self, timeout_ms: u32) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Monotonic time since boot.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

// ───────────────────────────────────────────────────────────────
// Status observer port (driven adapter: domain → UI / logging)
// ───────────────────────────────────────────────────────────────

/// Receives every [`Status`] transition, synchronously, from inside the
/// call that caused it.  Must return quickly: the protocol is stalled
/// while it runs.
pub trait StatusObserver {
    fn on_status_change(&mut self, status: Status);
}

impl<F: FnMut(Status)> StatusObserver for F {
    fn on_status_change(&mut self, status: Status) {
        self(status);
    }
}
