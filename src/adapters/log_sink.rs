//! Log-based status observer adapter.
//!
//! Implements [`StatusObserver`] by writing every link state transition to
//! the `log` facade (serial console on a board, `env_logger` in the host
//! simulator).  A display or LED adapter would implement the same trait.

use log::{info, warn};

use crate::app::events::Status;
use crate::app::ports::StatusObserver;
use crate::protocol::NetworkAddress;

/// Adapter that logs every [`Status`] under the board's address.
pub struct LogStatusObserver {
    label: NetworkAddress,
}

impl LogStatusObserver {
    pub fn new(label: NetworkAddress) -> Self {
        Self { label }
    }
}

impl StatusObserver for LogStatusObserver {
    fn on_status_change(&mut self, status: Status) {
        match status {
            Status::Error | Status::NoResponse => {
                warn!("LINK  | {} | {}", self.label, status);
            }
            Status::Reading | Status::Receiving | Status::Sending | Status::Ok => {
                log::debug!("LINK  | {} | {}", self.label, status);
            }
            Status::AwaitingResponse | Status::PingStart => {
                info!("LINK  | {} | {}", self.label, status);
            }
        }
    }
}
