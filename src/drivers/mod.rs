//! Hardware helpers that sit below the transceiver port.

pub mod radio_reset;
