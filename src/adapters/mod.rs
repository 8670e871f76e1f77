//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter     | Implements      | Connects to                    |
//! |-------------|-----------------|--------------------------------|
//! | `log_sink`  | StatusObserver  | `log` facade                   |
//! | `sim_radio` | Transceiver     | In-memory shared channel       |
//! | `time`      | Clock           | `std::time::Instant`           |

pub mod log_sink;
pub mod sim_radio;
pub mod time;
