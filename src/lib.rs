//! Commander radio link library.
//!
//! Addressed, acknowledged point-to-multipoint messaging for half-duplex
//! packet radios shared by many boards on one channel.
//!
//! - [`protocol`]: pure framing, nonces and address filtering.
//! - [`app`]: the [`Commander`] delivery state machine and its port traits.
//! - [`adapters`]: host-side port implementations (log observer, clock,
//!   simulated radio channel).
//! - [`drivers`]: hardware helpers below the transceiver port.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod drivers;
pub mod protocol;

mod error;

pub use app::events::{Delivery, Status};
pub use app::ports::{Clock, StatusObserver, Transceiver};
pub use app::service::{Commander, InboundMessage};
pub use config::{CommanderConfig, RetryPolicy};
pub use error::{Error, FrameError, RadioError, Result};
pub use protocol::NetworkAddress;
