//! Outbound link events.
//!
//! The [`Commander`](super::service::Commander) reports every state
//! transition as a [`Status`] through the
//! [`StatusObserver`](super::ports::StatusObserver) port.  Observers decide
//! what to do with them: blink an LED, log to serial, update a display.

use core::fmt;

/// State transitions of the delivery state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// An operation finished successfully; the machine is idle again.
    Ok,
    /// A transceiver fault, invalid request or malformed frame.
    Error,
    /// A frame was read off the radio and is being classified.
    Reading,
    /// A data frame for this board was accepted and is being acked.
    Receiving,
    /// An outbound data frame is being transmitted.
    Sending,
    /// The first ack window passed without a match; still waiting.
    AwaitingResponse,
    /// Every ack window expired without a matching ack.
    NoResponse,
    /// The keep-alive interval elapsed and a ping is going out.
    PingStart,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Ok => "OK",
            Self::Error => "ERROR",
            Self::Reading => "READING",
            Self::Receiving => "RECEIVING",
            Self::Sending => "SENDING",
            Self::AwaitingResponse => "AWAITING_RESPONSE",
            Self::NoResponse => "NO_RESPONSE",
            Self::PingStart => "PING_START",
        };
        f.write_str(s)
    }
}

/// Outcome of a completed [`send`](super::service::Commander::send).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Transmitted without asking for a reply.
    Sent,
    /// A matching ack arrived.
    Acked,
    /// Every ack window expired.
    NoResponse,
}

impl Delivery {
    /// `true` unless a requested ack never came.
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::NoResponse)
    }
}
