//! Wire protocol: addressing, nonces, framing and inbound filtering.
//!
//! ```text
//! Data frame:  ┌────────┬───────┬─────┬───────────────┬─────┬───────┐
//!              │ net(2) │ to(1) │ '.' │ payload(n-1)  │ '.' │ nonce │
//!              └────────┴───────┴─────┴───────────────┴─────┴───────┘
//! Ack frame:   ┌────────┬───────┬─────┬──────────────┐
//!              │ net(2) │ id(1) │ '>' │ echoed nonce │
//!              └────────┴───────┴─────┴──────────────┘
//! ```
//!
//! The final payload byte is overwritten with `.` before transmission.  It
//! acts as a second marker in front of the fixed-size nonce, so frames need
//! no length field.  A payload's true last byte therefore never survives;
//! callers reserve a terminator slot for it.
//!
//! Everything here is pure and allocation-free.  The
//! [`Commander`](crate::app::service::Commander) composes it with the
//! transceiver port.

pub mod address;
pub mod codec;
pub mod filter;
pub mod nonce;

pub use address::NetworkAddress;
pub use codec::{Frame, Separator};
pub use filter::{Accepted, FilterMode, Rejection};
pub use nonce::Nonce;

/// Largest payload (terminator slot included) one frame carries.
pub const MAX_PAYLOAD_LEN: usize = 128;

/// Header bytes: network id, board id, separator.
pub const HEADER_LEN: usize = 4;

/// Bytes a data frame adds around its payload.
pub const FRAME_OVERHEAD: usize = HEADER_LEN + Nonce::LEN;

/// Longest valid frame.  Anything longer is rejected on receive.
pub const MAX_FRAME_LEN: usize = MAX_PAYLOAD_LEN + FRAME_OVERHEAD;

/// Largest packet a LoRa transceiver can hand over (RFM95 FIFO limit).
/// Receive buffers are this big so an oversized frame arrives whole and
/// is rejected by length instead of being cut down to something valid.
pub const MAX_PACKET_LEN: usize = 255;

/// Frames below this length are discarded unread.
pub const MIN_FRAME_LEN: usize = 5;

/// Length of every ack frame.
pub const ACK_FRAME_LEN: usize = HEADER_LEN + Nonce::LEN;

/// Separator byte of data frames (also the overwritten terminator).
pub const DATA_MARKER: u8 = b'.';

/// Separator byte of ack frames.
pub const ACK_MARKER: u8 = b'>';

/// Announcement sent once after the radio comes up.
pub const BOOT_PAYLOAD: &[u8] = b"1\0";

/// Keep-alive payload sent by [`Commander::tick`](crate::app::service::Commander::tick).
pub const PING_PAYLOAD: &[u8] = b"9\0";
