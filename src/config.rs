//! Link configuration parameters
//!
//! All tunable parameters for one Commander node.  Defaults match the
//! RFM95 deployment the protocol was designed for.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// What the ack-wait loop does when an attempt window expires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetryPolicy {
    /// Keep listening for the ack; the frame is transmitted once.
    #[default]
    Relisten,
    /// Re-send the identical frame (same nonce) before each further attempt.
    Retransmit,
}

/// Core link configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommanderConfig {
    // --- Radio ---
    /// Carrier frequency in MHz
    pub frequency_mhz: f32,
    /// Transmit power in dBm (RFM95 PA_BOOST accepts 5-23)
    pub tx_power_dbm: i8,

    // --- Delivery ---
    /// Length of one ack-wait attempt window (milliseconds)
    pub resend_delay_ms: u32,
    /// Number of ack-wait attempts before giving up
    pub max_retries: u8,
    /// Behaviour on attempt timeout
    pub retry_policy: RetryPolicy,

    // --- Keep-alive ---
    /// Idle time after the last data send before a ping goes out (milliseconds)
    pub ping_interval_ms: u32,
}

impl Default for CommanderConfig {
    fn default() -> Self {
        Self {
            // Radio
            frequency_mhz: 868.0,
            tx_power_dbm: 23,

            // Delivery
            resend_delay_ms: 300,
            max_retries: 3,
            retry_policy: RetryPolicy::Relisten,

            // Keep-alive
            ping_interval_ms: 5000,
        }
    }
}

impl CommanderConfig {
    /// Reject values the radio or the state machine cannot work with.
    pub fn validate(&self) -> Result<()> {
        if !(137.0..=1020.0).contains(&self.frequency_mhz) {
            return Err(Error::Config("frequency_mhz outside 137-1020 MHz"));
        }
        if !(5..=23).contains(&self.tx_power_dbm) {
            return Err(Error::Config("tx_power_dbm outside 5-23 dBm"));
        }
        if self.max_retries == 0 {
            return Err(Error::Config("max_retries must be at least 1"));
        }
        if self.resend_delay_ms == 0 {
            return Err(Error::Config("resend_delay_ms must be non-zero"));
        }
        if self.ping_interval_ms == 0 {
            return Err(Error::Config("ping_interval_ms must be non-zero"));
        }
        Ok(())
    }

    /// Worst-case time a replying `send` can block for.
    pub fn max_ack_wait_ms(&self) -> u64 {
        u64::from(self.max_retries) * u64::from(self.resend_delay_ms)
    }
}
