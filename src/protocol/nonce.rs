//! Three-character correlation tokens.
//!
//! A nonce is appended to every outbound data frame and echoed back in the
//! ack.  It only disambiguates in-flight sends on one link; it carries no
//! security properties.

use core::fmt;

use rand::Rng;

/// Symbols a nonce is drawn from (62 characters).
pub const ALPHABET: &[u8; 62] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

const NONCE_LEN: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Nonce([u8; NONCE_LEN]);

impl Nonce {
    pub const LEN: usize = NONCE_LEN;

    /// Draw each character uniformly from [`ALPHABET`].
    pub fn generate<R: Rng>(rng: &mut R) -> Self {
        Self(core::array::from_fn(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())]))
    }

    /// Wrap bytes taken off the wire.  No alphabet check: a received
    /// nonce only has to compare equal to the one we sent.
    pub const fn from_bytes(bytes: [u8; Self::LEN]) -> Self {
        Self(bytes)
    }

    /// Take the last [`Nonce::LEN`] bytes of `bytes`.
    pub fn from_tail(bytes: &[u8]) -> Option<Self> {
        let start = bytes.len().checked_sub(Self::LEN)?;
        bytes[start..].try_into().ok().map(Self)
    }

    pub fn as_bytes(&self) -> &[u8; Self::LEN] {
        &self.0
    }
}

impl fmt::Display for Nonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.0 {
            write!(f, "{}", b as char)?;
        }
        Ok(())
    }
}
