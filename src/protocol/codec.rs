//! Frame codec.
//!
//! Wire format:
//! ```text
//! ┌────────┬──────────┬─────┬──────────────────────────────┐
//! │ net(2) │ board(1) │ sep │ body                         │
//! └────────┴──────────┴─────┴──────────────────────────────┘
//!   sep '.' → body = payload[..n-1] + '.' + nonce(3)
//!   sep '>' → body = echoed nonce(3)
//! ```
//!
//! Encoding writes into a caller-supplied buffer (the commander's scratch
//! buffer) and returns the number of bytes used.  Decoding borrows the
//! received bytes and only splits them into fields; deciding whether a
//! frame is ours is the [`filter`](super::filter)'s job.

use super::address::NetworkAddress;
use super::nonce::Nonce;
use super::{
    ACK_FRAME_LEN, ACK_MARKER, DATA_MARKER, FRAME_OVERHEAD, HEADER_LEN, MAX_FRAME_LEN,
    MAX_PAYLOAD_LEN, MIN_FRAME_LEN,
};
use crate::error::FrameError;

/// Encode a data frame for `to`.
///
/// The last payload byte is replaced by `.` on the wire.  Returns the
/// total number of bytes written to `out`.
pub fn encode_data(
    to: &NetworkAddress,
    payload: &[u8],
    nonce: &Nonce,
    out: &mut [u8],
) -> Result<usize, FrameError> {
    if payload.is_empty() {
        return Err(FrameError::EmptyPayload);
    }
    let total = FRAME_OVERHEAD + payload.len();
    if payload.len() > MAX_PAYLOAD_LEN {
        return Err(FrameError::TooLong(total));
    }
    if total > out.len() {
        return Err(FrameError::BufferTooSmall);
    }

    write_header(to, DATA_MARKER, out);
    let body_end = HEADER_LEN + payload.len();
    out[HEADER_LEN..body_end].copy_from_slice(payload);
    out[body_end - 1] = DATA_MARKER;
    out[body_end..total].copy_from_slice(nonce.as_bytes());

    Ok(total)
}

/// Encode an ack frame echoing `nonce`.  Always [`ACK_FRAME_LEN`] bytes.
pub fn encode_ack(
    to: &NetworkAddress,
    nonce: &Nonce,
    out: &mut [u8],
) -> Result<usize, FrameError> {
    if out.len() < ACK_FRAME_LEN {
        return Err(FrameError::BufferTooSmall);
    }
    write_header(to, ACK_MARKER, out);
    out[HEADER_LEN..ACK_FRAME_LEN].copy_from_slice(nonce.as_bytes());
    Ok(ACK_FRAME_LEN)
}

fn write_header(to: &NetworkAddress, separator: u8, out: &mut [u8]) {
    out[..2].copy_from_slice(&to.network_id());
    out[2] = to.board_id();
    out[3] = separator;
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// The byte after the address header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Separator {
    /// `.`: data frame.
    Data,
    /// `>`: ack frame.
    Ack,
    /// Anything else; never accepted.
    Other(u8),
}

impl From<u8> for Separator {
    fn from(b: u8) -> Self {
        match b {
            DATA_MARKER => Self::Data,
            ACK_MARKER => Self::Ack,
            other => Self::Other(other),
        }
    }
}

/// A received frame split into its fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame<'a> {
    network_id: [u8; 2],
    board_id: u8,
    separator: Separator,
    body: &'a [u8],
}

impl<'a> Frame<'a> {
    /// Split raw bytes into header fields and body.
    ///
    /// Fails only on length: fewer than [`MIN_FRAME_LEN`] or more than
    /// [`MAX_FRAME_LEN`] bytes.
    pub fn decode(bytes: &'a [u8]) -> Result<Self, FrameError> {
        if bytes.len() < MIN_FRAME_LEN {
            return Err(FrameError::TooShort(bytes.len()));
        }
        if bytes.len() > MAX_FRAME_LEN {
            return Err(FrameError::TooLong(bytes.len()));
        }
        Ok(Self {
            network_id: [bytes[0], bytes[1]],
            board_id: bytes[2],
            separator: Separator::from(bytes[3]),
            body: &bytes[HEADER_LEN..],
        })
    }

    pub fn network_id(&self) -> [u8; 2] {
        self.network_id
    }

    pub fn board_id(&self) -> u8 {
        self.board_id
    }

    pub fn separator(&self) -> Separator {
        self.separator
    }

    /// Everything after the separator.
    pub fn body(&self) -> &'a [u8] {
        self.body
    }

    /// The trailing three bytes of the frame.
    pub fn nonce(&self) -> Option<Nonce> {
        Nonce::from_tail(self.body)
    }

    /// Payload of a data frame, marker byte included.
    ///
    /// `None` for non-data frames and for bodies too short to hold one
    /// payload byte in front of the nonce.
    pub fn payload(&self) -> Option<&'a [u8]> {
        if self.separator != Separator::Data || self.body.len() <= Nonce::LEN {
            return None;
        }
        Some(&self.body[..self.body.len() - Nonce::LEN])
    }
}
