//! Inbound address filter.
//!
//! Every board on the channel hears every frame.  The filter decides which
//! ones belong to us, applying its rules in order (first match wins):
//!
//! 1. malformed length            → [`Rejection::Malformed`]
//! 2. network id differs          → [`Rejection::ForeignNetwork`]
//! 3. ack-check mode: separator must be `>`
//! 4. receive mode: board id must be ours, separator must be `.`,
//!    body must hold a payload byte plus nonce
//!
//! A rejection is normal background noise, not an error.

use super::address::NetworkAddress;
use super::codec::{Frame, Separator};
use super::nonce::Nonce;
use crate::error::FrameError;

/// Which kind of frame the caller is waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    /// Regular polling: accept data frames addressed to this board.
    Receive,
    /// Inside a send's ack-wait loop: accept ack frames on this network.
    AckCheck,
}

/// A frame that passed the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accepted<'a> {
    /// Data for this board.  `payload` includes the trailing marker byte.
    Data { payload: &'a [u8], nonce: Nonce },
    /// An ack echoing `nonce`.
    Ack(Nonce),
}

/// Why a frame was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    Malformed(FrameError),
    ForeignNetwork,
    NotAddressed,
    BadSeparator(Separator),
}

impl Rejection {
    /// Framing faults are reported as `Status::Error`; addressing
    /// mismatches are expected on a shared channel and stay silent.
    pub fn is_framing_fault(&self) -> bool {
        matches!(self, Self::Malformed(_) | Self::BadSeparator(_))
    }
}

/// Classify raw received bytes for `local`.
pub fn classify<'a>(
    bytes: &'a [u8],
    local: &NetworkAddress,
    mode: FilterMode,
) -> Result<Accepted<'a>, Rejection> {
    match mode {
        FilterMode::AckCheck => accept_ack(bytes, local).map(Accepted::Ack),
        FilterMode::Receive => {
            accept_data(bytes, local).map(|(payload, nonce)| Accepted::Data { payload, nonce })
        }
    }
}

/// Ack-check rules: our network, `>` separator.  The board id is not
/// checked; the nonce comparison does the correlation.
pub fn accept_ack(bytes: &[u8], local: &NetworkAddress) -> Result<Nonce, Rejection> {
    let frame = decode_on_network(bytes, local)?;
    if frame.separator() != Separator::Ack {
        return Err(Rejection::BadSeparator(frame.separator()));
    }
    frame
        .nonce()
        .ok_or(Rejection::Malformed(FrameError::Truncated))
}

/// Receive rules: our network, our board, `.` separator, non-empty payload.
pub fn accept_data<'a>(
    bytes: &'a [u8],
    local: &NetworkAddress,
) -> Result<(&'a [u8], Nonce), Rejection> {
    let frame = decode_on_network(bytes, local)?;
    if frame.board_id() != local.board_id() {
        return Err(Rejection::NotAddressed);
    }
    if frame.separator() != Separator::Data {
        return Err(Rejection::BadSeparator(frame.separator()));
    }
    match (frame.payload(), frame.nonce()) {
        (Some(payload), Some(nonce)) => Ok((payload, nonce)),
        _ => Err(Rejection::Malformed(FrameError::Truncated)),
    }
}

fn decode_on_network<'a>(bytes: &'a [u8], local: &NetworkAddress) -> Result<Frame<'a>, Rejection> {
    let frame = Frame::decode(bytes).map_err(Rejection::Malformed)?;
    if frame.network_id() != local.network_id() {
        return Err(Rejection::ForeignNetwork);
    }
    Ok(frame)
}
