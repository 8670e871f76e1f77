//! Logical network + board addressing.

use core::fmt;

use super::{ACK_MARKER, DATA_MARKER};
use crate::error::{Error, Result};

/// Identity of one board: a 2-byte network id and a 1-byte board id.
///
/// Both are single ASCII characters on the wire.  Construction rejects
/// non-printable bytes and the two separator characters so a header can
/// never be mistaken for a frame marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NetworkAddress {
    network_id: [u8; 2],
    board_id: u8,
}

impl NetworkAddress {
    pub fn new(network_id: [u8; 2], board_id: u8) -> Result<Self> {
        if !network_id.iter().all(|&b| is_address_byte(b)) {
            return Err(Error::Config("network id must be printable ASCII, not '.' or '>'"));
        }
        if !is_address_byte(board_id) {
            return Err(Error::Config("board id must be printable ASCII, not '.' or '>'"));
        }
        Ok(Self {
            network_id,
            board_id,
        })
    }

    /// Parse `"AB"` + `"1"` style identifiers.
    pub fn parse(network_id: &str, board_id: &str) -> Result<Self> {
        let net: [u8; 2] = network_id
            .as_bytes()
            .try_into()
            .map_err(|_| Error::Config("network id must be exactly 2 characters"))?;
        let &[board] = board_id.as_bytes() else {
            return Err(Error::Config("board id must be exactly 1 character"));
        };
        Self::new(net, board)
    }

    pub fn network_id(&self) -> [u8; 2] {
        self.network_id
    }

    pub fn board_id(&self) -> u8 {
        self.board_id
    }

    /// Same network, different board.
    pub fn with_board(&self, board_id: u8) -> Result<Self> {
        Self::new(self.network_id, board_id)
    }
}

impl fmt::Display for NetworkAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}/{}",
            self.network_id[0] as char, self.network_id[1] as char, self.board_id as char
        )
    }
}

fn is_address_byte(b: u8) -> bool {
    b.is_ascii_graphic() && b != DATA_MARKER && b != ACK_MARKER
}
