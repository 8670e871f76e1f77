//! Scripted transceiver + shared virtual clock for host-side tests.
//!
//! Time only moves when the radio is asked to wait, so every ack window
//! resolves instantly and deterministically.  Frames are queued with an
//! arrival time; a `wait_available_timeout` that would see one jumps the
//! clock straight to its arrival.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use commander::{Clock, RadioError, Status, StatusObserver, Transceiver};

// ── MockClock ─────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockClock(Rc<Cell<u64>>);

impl MockClock {
    pub fn set(&self, ms: u64) {
        self.0.set(ms);
    }

    pub fn advance(&self, ms: u64) {
        self.0.set(self.0.get() + ms);
    }
}

impl Clock for MockClock {
    fn now_ms(&self) -> u64 {
        self.0.get()
    }
}

// ── MockRadio ─────────────────────────────────────────────────

/// Reply script: given a transmitted frame and its zero-based index,
/// return frames to deliver as `(delay_ms, bytes)`.
pub type Responder = Box<dyn FnMut(usize, &[u8]) -> Vec<(u64, Vec<u8>)>>;

pub struct MockRadio {
    clock: MockClock,
    inbox: VecDeque<(u64, Vec<u8>)>,
    responder: Option<Responder>,
    pub sent: Rc<RefCell<Vec<Vec<u8>>>>,
    pub tuned: Option<(f32, i8)>,
    pub fail_init: bool,
    pub fail_transmit: bool,
    /// Reads fail while the packet stays queued, as with a wedged FIFO.
    pub fail_receive: bool,
}

impl MockRadio {
    pub fn new(clock: &MockClock) -> Self {
        Self {
            clock: clock.clone(),
            inbox: VecDeque::new(),
            responder: None,
            sent: Rc::new(RefCell::new(Vec::new())),
            tuned: None,
            fail_init: false,
            fail_transmit: false,
            fail_receive: false,
        }
    }

    /// Queue `frame` to arrive `delay_ms` from now.
    pub fn deliver_after(&mut self, delay_ms: u64, frame: &[u8]) {
        let at = self.clock.now_ms() + delay_ms;
        let idx = self.inbox.iter().take_while(|(t, _)| *t <= at).count();
        self.inbox.insert(idx, (at, frame.to_vec()));
    }

    /// Queue `frame` as already received.
    pub fn deliver(&mut self, frame: &[u8]) {
        self.deliver_after(0, frame);
    }

    pub fn respond_with(&mut self, responder: impl FnMut(usize, &[u8]) -> Vec<(u64, Vec<u8>)> + 'static) {
        self.responder = Some(Box::new(responder));
    }

    pub fn sent(&self) -> Vec<Vec<u8>> {
        self.sent.borrow().clone()
    }

    fn next_arrival(&self) -> Option<u64> {
        self.inbox.front().map(|(t, _)| *t)
    }
}

impl Transceiver for MockRadio {
    fn init(&mut self, frequency_mhz: f32, tx_power_dbm: i8) -> Result<(), RadioError> {
        if self.fail_init {
            return Err(RadioError::InitFailed);
        }
        self.tuned = Some((frequency_mhz, tx_power_dbm));
        Ok(())
    }

    fn is_available(&mut self) -> bool {
        self.next_arrival().is_some_and(|t| t <= self.clock.now_ms())
    }

    fn receive(&mut self, buf: &mut [u8]) -> Result<usize, RadioError> {
        if self.fail_receive || !self.is_available() {
            return Err(RadioError::ReceiveFailed);
        }
        let (_, frame) = self.inbox.pop_front().ok_or(RadioError::ReceiveFailed)?;
        if frame.len() > buf.len() {
            return Err(RadioError::ReceiveFailed);
        }
        buf[..frame.len()].copy_from_slice(&frame);
        Ok(frame.len())
    }

    fn transmit(&mut self, data: &[u8]) -> Result<(), RadioError> {
        if self.fail_transmit {
            return Err(RadioError::TransmitFailed);
        }
        let index = {
            let mut sent = self.sent.borrow_mut();
            sent.push(data.to_vec());
            sent.len() - 1
        };
        if let Some(mut responder) = self.responder.take() {
            for (delay, frame) in responder(index, data) {
                self.deliver_after(delay, &frame);
            }
            self.responder = Some(responder);
        }
        Ok(())
    }

    fn wait_transmit_complete(&mut self) -> Result<(), RadioError> {
        Ok(())
    }

    fn wait_available_timeout(&mut self, timeout_ms: u32) -> bool {
        let now = self.clock.now_ms();
        let deadline = now + u64::from(timeout_ms);
        match self.next_arrival() {
            Some(t) if t <= deadline => {
                self.clock.set(t.max(now));
                true
            }
            _ => {
                self.clock.set(deadline);
                false
            }
        }
    }
}

/// Ack frame echoing the nonce of `data`, as the board with id `board`
/// on network `AB` would send it.
pub fn ack_for(board: u8, data: &[u8]) -> Vec<u8> {
    let mut ack = vec![b'A', b'B', board, b'>'];
    ack.extend_from_slice(&data[data.len() - 3..]);
    ack
}

// ── StatusLog ─────────────────────────────────────────────────

/// Observer recording every status it is handed.
#[derive(Clone, Default)]
pub struct StatusLog(Arc<Mutex<Vec<Status>>>);

impl StatusLog {
    pub fn take(&self) -> Vec<Status> {
        std::mem::take(&mut *self.0.lock().unwrap())
    }
}

impl StatusObserver for StatusLog {
    fn on_status_change(&mut self, status: Status) {
        self.0.lock().unwrap().push(status);
    }
}
