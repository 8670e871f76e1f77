//! Link core: the delivery state machine, zero direct I/O.
//!
//! [`service::Commander`] ties the pure [`protocol`](crate::protocol)
//! pieces to the outside world.  All interaction with hardware happens
//! through the **port traits** in [`ports`], keeping this layer fully
//! testable without a radio attached.

pub mod events;
pub mod ports;
pub mod service;
