//! Unified error types for the Commander radio link.
//!
//! A single `Error` enum that every subsystem converts into, so the caller's
//! control loop handles failures uniformly.  All variants are `Copy` so they
//! can be passed through the delivery state machine without allocation.
//!
//! Most link-level trouble (filter rejections, missing acks) is *not* an
//! error: it is reported through [`Status`](crate::app::events::Status)
//! transitions.  Only malformed outbound requests, transceiver faults and
//! invalid configuration end up here.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the crate funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A frame could not be encoded or decoded.
    Frame(FrameError),
    /// The transceiver reported a failure.
    Radio(RadioError),
    /// Configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Frame(e) => write!(f, "frame: {e}"),
            Self::Radio(e) => write!(f, "radio: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Framing errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    /// Fewer bytes than the smallest legal frame.
    TooShort(usize),
    /// More bytes than the frame buffer can hold.
    TooLong(usize),
    /// Separator present but the body cannot hold a payload and nonce.
    Truncated,
    /// Data frames need at least one payload byte (it becomes the marker).
    EmptyPayload,
    /// Output buffer is smaller than the encoded frame.
    BufferTooSmall,
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooShort(len) => write!(f, "frame too short ({len} bytes)"),
            Self::TooLong(len) => write!(f, "frame too long ({len} bytes)"),
            Self::Truncated => write!(f, "frame body truncated"),
            Self::EmptyPayload => write!(f, "empty payload"),
            Self::BufferTooSmall => write!(f, "output buffer too small"),
        }
    }
}

impl From<FrameError> for Error {
    fn from(e: FrameError) -> Self {
        Self::Frame(e)
    }
}

// ---------------------------------------------------------------------------
// Transceiver errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadioError {
    /// The transceiver did not respond during initialisation.
    InitFailed,
    /// The requested carrier frequency was rejected.
    FrequencyRejected,
    /// The transmit call failed or the packet was never sent.
    TransmitFailed,
    /// A packet was signalled available but could not be read.
    ReceiveFailed,
}

impl fmt::Display for RadioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InitFailed => write!(f, "transceiver init failed"),
            Self::FrequencyRejected => write!(f, "frequency rejected"),
            Self::TransmitFailed => write!(f, "transmit failed"),
            Self::ReceiveFailed => write!(f, "receive failed"),
        }
    }
}

impl From<RadioError> for Error {
    fn from(e: RadioError) -> Self {
        Self::Radio(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
