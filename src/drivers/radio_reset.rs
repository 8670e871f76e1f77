//! Transceiver reset line.
//!
//! The RFM95 latches its configuration only after a clean reset pulse on
//! its active-low RST pin.  Generic over `embedded-hal` so the same
//! sequence runs on any HAL.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use log::debug;

use crate::error::{RadioError, Result};

/// Settle time with RST released before the pulse.
pub const SETTLE_MS: u32 = 100;
/// Width of the low pulse.
pub const PULSE_MS: u32 = 10;
/// Time the chip needs after release before SPI access.
pub const RECOVER_MS: u32 = 10;

/// Drive RST high, pulse it low, and release it again.
pub fn pulse_reset<P: OutputPin, D: DelayNs>(pin: &mut P, delay: &mut D) -> Result<()> {
    drive(pin, true)?;
    delay.delay_ms(SETTLE_MS);
    drive(pin, false)?;
    delay.delay_ms(PULSE_MS);
    drive(pin, true)?;
    delay.delay_ms(RECOVER_MS);
    debug!("radio reset pulse complete");
    Ok(())
}

fn drive<P: OutputPin>(pin: &mut P, high: bool) -> Result<()> {
    let result = if high { pin.set_high() } else { pin.set_low() };
    result.map_err(|e| {
        debug!("reset pin write failed: {:?}", e);
        RadioError::InitFailed.into()
    })
}
