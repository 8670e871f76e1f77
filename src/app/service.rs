//! Delivery state machine: the hexagonal core.
//!
//! [`Commander`] owns the transceiver, clock and nonce generator for one
//! board, plus the single scratch buffer every frame passes through.  It
//! exposes a small blocking API meant to be driven from one control loop:
//!
//! ```text
//!  loop {
//!      if node.poll() { handle(node.message()) }   // inbound + auto-ack
//!      node.tick()?;                               // keep-alive
//!      node.send(b"ON\0", Some(b'2'), true)?;      // outbound, on demand
//!  }
//! ```
//!
//! ```text
//!             ┌──────────────────────────────────────────┐
//!  send ────▶ │ Sending ─▶ [AwaitingResponse] ─▶ Ok      │
//!             │                            └──▶ NoResponse│
//!  poll ────▶ │ Reading ─▶ Receiving ─▶ (ack) ─▶ Ok      │ ──▶ StatusObserver
//!  tick ────▶ │ PingStart ─▶ Ok                           │
//!             └──────────────────────────────────────────┘
//! ```
//!
//! Every operation takes `&mut self`, so two operations can never share the
//! scratch buffer at once.

use log::{debug, error, info, trace, warn};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::config::{CommanderConfig, RetryPolicy};
use crate::error::{Error, RadioError, Result};
use crate::protocol::codec::{encode_ack, encode_data};
use crate::protocol::filter::{accept_ack, accept_data};
use crate::protocol::{
    BOOT_PAYLOAD, MAX_PACKET_LEN, MAX_PAYLOAD_LEN, NetworkAddress, Nonce, PING_PAYLOAD,
};

use super::events::{Delivery, Status};
use super::ports::{Clock, StatusObserver, Transceiver};

// ───────────────────────────────────────────────────────────────
// Inbound message slot
// ───────────────────────────────────────────────────────────────

/// The most recent data frame accepted by [`Commander::poll`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    payload: heapless::Vec<u8, MAX_PAYLOAD_LEN>,
    nonce: Nonce,
}

impl InboundMessage {
    fn new(payload: &[u8], nonce: Nonce) -> Option<Self> {
        Some(Self {
            payload: heapless::Vec::from_slice(payload).ok()?,
            nonce,
        })
    }

    /// Payload exactly as received, trailing `.` marker included.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// The payload without its marker byte: what the sender put in front
    /// of its terminator slot.
    pub fn content(&self) -> &[u8] {
        &self.payload[..self.payload.len().saturating_sub(1)]
    }

    pub fn len(&self) -> usize {
        self.payload.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    /// Nonce of the frame that carried this message.
    pub fn nonce(&self) -> Nonce {
        self.nonce
    }
}

// ───────────────────────────────────────────────────────────────
// In-flight send
// ───────────────────────────────────────────────────────────────

/// Bookkeeping for one data frame waiting for its ack.
#[derive(Debug)]
struct PendingSend {
    destination: NetworkAddress,
    nonce: Nonce,
    attempt: u8,
    deadline_ms: u64,
}

// ───────────────────────────────────────────────────────────────
// Commander
// ───────────────────────────────────────────────────────────────

/// One board's endpoint on the shared channel.
pub struct Commander<R, C, G = SmallRng> {
    address: NetworkAddress,
    config: CommanderConfig,
    radio: R,
    clock: C,
    rng: G,
    observer: Option<Box<dyn StatusObserver + Send>>,
    scratch: [u8; MAX_PACKET_LEN],
    inbound: Option<InboundMessage>,
    last_send_ms: u64,
}

impl<R: Transceiver, C: Clock> Commander<R, C, SmallRng> {
    /// Construct with an entropy-seeded nonce generator.
    ///
    /// Does **not** touch the radio; call [`init`](Self::init) next.
    pub fn new(
        address: NetworkAddress,
        config: CommanderConfig,
        radio: R,
        clock: C,
    ) -> Result<Self> {
        Self::with_rng(address, config, radio, clock, SmallRng::from_entropy())
    }
}

impl<R: Transceiver, C: Clock, G: Rng> Commander<R, C, G> {
    /// Construct with a caller-supplied nonce generator.
    pub fn with_rng(
        address: NetworkAddress,
        config: CommanderConfig,
        radio: R,
        clock: C,
        rng: G,
    ) -> Result<Self> {
        config.validate()?;
        let last_send_ms = clock.now_ms();
        Ok(Self {
            address,
            config,
            radio,
            clock,
            rng,
            observer: None,
            scratch: [0; MAX_PACKET_LEN],
            inbound: None,
            last_send_ms,
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Bring the radio up and announce this board with a boot frame.
    ///
    /// A transceiver failure is fatal: it is reported as [`Status::Error`]
    /// and returned, and the caller is expected to halt.
    pub fn init(&mut self) -> Result<()> {
        let CommanderConfig {
            frequency_mhz,
            tx_power_dbm,
            ..
        } = self.config;

        if let Err(e) = self.radio.init(frequency_mhz, tx_power_dbm) {
            error!("radio init failed on {} MHz: {}", frequency_mhz, e);
            self.notify(Status::Error);
            return Err(e.into());
        }
        info!(
            "radio up: {} on {} MHz at {} dBm",
            self.address, frequency_mhz, tx_power_dbm
        );

        let own = self.address;
        self.send_data(&own, BOOT_PAYLOAD, false)?;
        Ok(())
    }

    /// Register the status observer, replacing any previous one.
    pub fn set_status_observer(&mut self, observer: impl StatusObserver + Send + 'static) {
        self.observer = Some(Box::new(observer));
    }

    /// Remove the status observer.
    pub fn clear_status_observer(&mut self) {
        self.observer = None;
    }

    // ── Outbound ──────────────────────────────────────────────

    /// Send `payload` to `destination` (this board's own id when `None`).
    ///
    /// The last payload byte is replaced by the frame marker on the wire;
    /// end the payload with a terminator slot (e.g. `b"ON\0"`) to keep
    /// every meaningful byte.
    ///
    /// With `request_reply` the call blocks until a matching ack arrives
    /// or `max_retries` ack windows expire.  A missing ack is not an
    /// error: it comes back as [`Delivery::NoResponse`].
    pub fn send(
        &mut self,
        payload: &[u8],
        destination: Option<u8>,
        request_reply: bool,
    ) -> Result<Delivery> {
        self.notify(Status::Sending);
        let to = match destination {
            None => self.address,
            Some(board) => match self.address.with_board(board) {
                Ok(to) => to,
                Err(e) => {
                    warn!("send: invalid destination board {:#04x}", board);
                    self.notify(Status::Error);
                    return Err(e);
                }
            },
        };
        self.send_data(&to, payload, request_reply)
    }

    // ── Inbound ───────────────────────────────────────────────

    /// Check the radio for a frame addressed to this board.
    ///
    /// Non-blocking unless a frame is accepted, in which case an ack is
    /// transmitted before returning `true`.  The message is then available
    /// through [`message`](Self::message) until the next accepted frame.
    pub fn poll(&mut self) -> bool {
        if !self.radio.is_available() {
            return false;
        }

        let len = match self.receive_scratch() {
            Ok(len) => len,
            Err(e) => {
                warn!("poll: {}", e);
                self.notify(Status::Error);
                return false;
            }
        };
        self.notify(Status::Reading);
        debug!("rx {}", self.scratch[..len].escape_ascii());

        let accepted = accept_data(&self.scratch[..len], &self.address)
            .map(|(payload, nonce)| InboundMessage::new(payload, nonce));
        let message = match accepted {
            Ok(Some(message)) => message,
            Ok(None) => {
                warn!("poll: payload exceeds {} bytes", MAX_PAYLOAD_LEN);
                self.discard(Status::Error);
                return false;
            }
            Err(rejection) if rejection.is_framing_fault() => {
                debug!("poll: dropped malformed frame ({:?})", rejection);
                self.discard(Status::Error);
                return false;
            }
            Err(rejection) => {
                trace!("poll: ignored frame ({:?})", rejection);
                self.clear_scratch();
                return false;
            }
        };

        self.notify(Status::Receiving);
        self.send_ack(message.nonce());

        info!(
            "received {} bytes on {} (nonce {})",
            message.len(),
            self.address,
            message.nonce()
        );
        self.inbound = Some(message);
        self.clear_scratch();
        self.notify(Status::Ok);
        true
    }

    /// The last message accepted by [`poll`](Self::poll), if any.
    pub fn message(&self) -> Option<&InboundMessage> {
        self.inbound.as_ref()
    }

    // ── Keep-alive ────────────────────────────────────────────

    /// Send a keep-alive ping if nothing has been sent for
    /// `ping_interval_ms`.  Safe to call as often as possible; returns
    /// `true` when a ping went out.
    pub fn tick(&mut self) -> Result<bool> {
        let idle = self.clock.now_ms().saturating_sub(self.last_send_ms);
        if idle < u64::from(self.config.ping_interval_ms) {
            return Ok(false);
        }

        debug!("idle for {} ms, pinging", idle);
        self.notify(Status::PingStart);
        let own = self.address;
        self.send_data(&own, PING_PAYLOAD, false)?;
        Ok(true)
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn address(&self) -> &NetworkAddress {
        &self.address
    }

    pub fn config(&self) -> &CommanderConfig {
        &self.config
    }

    /// Clock reading at the end of the last data-frame send.
    pub fn last_send_ms(&self) -> u64 {
        self.last_send_ms
    }

    pub fn radio(&self) -> &R {
        &self.radio
    }

    pub fn radio_mut(&mut self) -> &mut R {
        &mut self.radio
    }

    // ── Internal ──────────────────────────────────────────────

    fn send_data(
        &mut self,
        to: &NetworkAddress,
        payload: &[u8],
        request_reply: bool,
    ) -> Result<Delivery> {
        let mut pending = PendingSend {
            destination: *to,
            nonce: Nonce::generate(&mut self.rng),
            attempt: 0,
            deadline_ms: 0,
        };

        self.transmit_data(&pending, payload)?;

        let delivery = if !request_reply {
            Delivery::Sent
        } else if self.await_ack(&mut pending, payload) {
            Delivery::Acked
        } else {
            Delivery::NoResponse
        };

        match delivery {
            Delivery::NoResponse => {
                warn!(
                    "no ack from {} after {} attempts (nonce {})",
                    pending.destination, self.config.max_retries, pending.nonce
                );
                self.notify(Status::NoResponse);
            }
            Delivery::Acked => {
                debug!(
                    "ack from {} on attempt {}",
                    pending.destination,
                    pending.attempt + 1
                );
                self.notify(Status::Ok);
            }
            Delivery::Sent => self.notify(Status::Ok),
        }

        self.last_send_ms = self.clock.now_ms();
        Ok(delivery)
    }

    /// Listen through up to `max_retries` ack windows.
    fn await_ack(&mut self, pending: &mut PendingSend, payload: &[u8]) -> bool {
        while pending.attempt < self.config.max_retries {
            if pending.attempt == 1 {
                self.notify(Status::AwaitingResponse);
            }
            if pending.attempt > 0 && self.config.retry_policy == RetryPolicy::Retransmit {
                debug!("retransmitting to {} (attempt {})", pending.destination, pending.attempt + 1);
                if self.transmit_data(pending, payload).is_err() {
                    warn!("retransmit failed, listening anyway");
                }
            }

            pending.deadline_ms = self.clock.now_ms() + u64::from(self.config.resend_delay_ms);
            if self.listen_for_ack(pending) {
                return true;
            }
            pending.attempt += 1;
        }
        false
    }

    /// Listen until `pending.deadline_ms`.  Frames that are not the
    /// matching ack do not shorten the window.
    fn listen_for_ack(&mut self, pending: &PendingSend) -> bool {
        loop {
            let remaining = pending.deadline_ms.saturating_sub(self.clock.now_ms());
            if remaining == 0 {
                return false;
            }
            let timeout_ms = u32::try_from(remaining).unwrap_or(u32::MAX);
            if !self.radio.wait_available_timeout(timeout_ms) {
                return false;
            }

            // A driver that signals a packet it cannot hand over would
            // otherwise keep this loop spinning until the deadline.
            let len = match self.receive_scratch() {
                Ok(len) => len,
                Err(e) => {
                    warn!("ack wait: {}, closing window early", e);
                    self.clear_scratch();
                    return false;
                }
            };

            let matched = match accept_ack(&self.scratch[..len], &self.address) {
                Ok(nonce) if nonce == pending.nonce => true,
                Ok(nonce) => {
                    debug!("ack wait: stale ack {} (want {})", nonce, pending.nonce);
                    false
                }
                Err(rejection) => {
                    trace!("ack wait: ignored frame ({:?})", rejection);
                    false
                }
            };
            self.clear_scratch();
            if matched {
                return true;
            }
        }
    }

    /// Read one whole packet into the scratch buffer.  A length the buffer
    /// cannot hold means the driver truncated or misreported the packet.
    fn receive_scratch(&mut self) -> core::result::Result<usize, RadioError> {
        let len = self.radio.receive(&mut self.scratch)?;
        if len > self.scratch.len() {
            self.clear_scratch();
            return Err(RadioError::ReceiveFailed);
        }
        Ok(len)
    }

    /// Encode `payload` for `pending` into the scratch buffer and send it.
    fn transmit_data(&mut self, pending: &PendingSend, payload: &[u8]) -> Result<()> {
        let len = match encode_data(&pending.destination, payload, &pending.nonce, &mut self.scratch) {
            Ok(len) => len,
            Err(e) => {
                warn!("send: {}", e);
                self.notify(Status::Error);
                return Err(e.into());
            }
        };
        self.transmit_scratch(len)
    }

    /// Ack `nonce` under this board's own address.  Acks never touch the
    /// keep-alive timer and are never retried.
    fn send_ack(&mut self, nonce: Nonce) {
        let own = self.address;
        let sent = encode_ack(&own, &nonce, &mut self.scratch)
            .map_err(Error::from)
            .and_then(|len| self.transmit_scratch(len));
        if let Err(e) = sent {
            warn!("ack for {} not sent: {}", nonce, e);
        }
    }

    fn transmit_scratch(&mut self, len: usize) -> Result<()> {
        debug!("tx {}", self.scratch[..len].escape_ascii());
        let result = self
            .radio
            .transmit(&self.scratch[..len])
            .and_then(|()| self.radio.wait_transmit_complete());
        self.clear_scratch();
        if let Err(e) = result {
            warn!("transmit failed: {}", e);
            self.notify(Status::Error);
            return Err(e.into());
        }
        Ok(())
    }

    fn discard(&mut self, status: Status) {
        self.clear_scratch();
        self.notify(status);
    }

    fn clear_scratch(&mut self) {
        self.scratch.fill(0);
    }

    fn notify(&mut self, status: Status) {
        trace!("status -> {}", status);
        if let Some(observer) = self.observer.as_mut() {
            observer.on_status_change(status);
        }
    }
}
