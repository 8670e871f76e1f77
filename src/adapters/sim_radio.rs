//! In-memory radio channel for host simulation and tests.
//!
//! A [`SimChannel`] is one shared RF channel.  Every [`SimRadio`] attached
//! to it hears every frame transmitted by the others on the same
//! frequency, the way boards sharing a LoRa channel do.  A transmitter
//! never hears itself.  Optional random loss models a noisy link.
//!
//! Radios are `Send`, so each simulated board can run on its own thread.

use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use log::{debug, trace};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::app::ports::Transceiver;
use crate::error::RadioError;
use crate::protocol::MAX_PACKET_LEN;

/// Packets a radio buffers before the oldest is overwritten.
const INBOX_DEPTH: usize = 8;

struct Inbox {
    frames: Mutex<VecDeque<Vec<u8>>>,
    ready: Condvar,
}

struct Station {
    inbox: Arc<Inbox>,
    frequency_mhz: Option<f32>,
}

struct ChannelState {
    stations: Vec<Station>,
    loss: f64,
    rng: SmallRng,
    delivered: u64,
    dropped: u64,
}

/// Shared medium.  Cheap to clone; clones refer to the same channel.
#[derive(Clone)]
pub struct SimChannel {
    state: Arc<Mutex<ChannelState>>,
}

/// Traffic counters for a [`SimChannel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChannelStats {
    pub delivered: u64,
    pub dropped: u64,
}

impl Default for SimChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl SimChannel {
    /// Lossless channel.
    pub fn new() -> Self {
        Self::with_loss(0.0, 0)
    }

    /// Channel dropping each delivery with probability `loss` (0.0-1.0).
    pub fn with_loss(loss: f64, seed: u64) -> Self {
        Self {
            state: Arc::new(Mutex::new(ChannelState {
                stations: Vec::new(),
                loss: loss.clamp(0.0, 1.0),
                rng: SmallRng::seed_from_u64(seed),
                delivered: 0,
                dropped: 0,
            })),
        }
    }

    /// Attach a new radio to the channel.
    pub fn attach(&self) -> SimRadio {
        let inbox = Arc::new(Inbox {
            frames: Mutex::new(VecDeque::with_capacity(INBOX_DEPTH)),
            ready: Condvar::new(),
        });
        let mut state = lock(&self.state);
        state.stations.push(Station {
            inbox: Arc::clone(&inbox),
            frequency_mhz: None,
        });
        SimRadio {
            station: state.stations.len() - 1,
            inbox,
            channel: self.clone(),
        }
    }

    pub fn stats(&self) -> ChannelStats {
        let state = lock(&self.state);
        ChannelStats {
            delivered: state.delivered,
            dropped: state.dropped,
        }
    }

    fn broadcast(&self, from: usize, data: &[u8]) -> Result<(), RadioError> {
        let mut guard = lock(&self.state);
        let state = &mut *guard;
        let Some(frequency) = state.stations[from].frequency_mhz else {
            return Err(RadioError::TransmitFailed);
        };

        for idx in 0..state.stations.len() {
            if idx == from || state.stations[idx].frequency_mhz != Some(frequency) {
                continue;
            }
            if state.loss > 0.0 && state.rng.gen_bool(state.loss) {
                state.dropped += 1;
                trace!("sim: frame to station {} lost", idx);
                continue;
            }
            state.delivered += 1;

            let inbox = &state.stations[idx].inbox;
            let mut frames = lock(&inbox.frames);
            if frames.len() == INBOX_DEPTH {
                frames.pop_front();
            }
            frames.push_back(data.to_vec());
            inbox.ready.notify_all();
        }
        Ok(())
    }

    fn tune(&self, station: usize, frequency_mhz: f32) {
        lock(&self.state).stations[station].frequency_mhz = Some(frequency_mhz);
    }
}

/// One simulated transceiver on a [`SimChannel`].
pub struct SimRadio {
    station: usize,
    inbox: Arc<Inbox>,
    channel: SimChannel,
}

impl SimRadio {
    /// Frames waiting to be read.
    pub fn pending(&self) -> usize {
        lock(&self.inbox.frames).len()
    }
}

impl Transceiver for SimRadio {
    fn init(&mut self, frequency_mhz: f32, tx_power_dbm: i8) -> Result<(), RadioError> {
        if !frequency_mhz.is_finite() || frequency_mhz <= 0.0 {
            return Err(RadioError::FrequencyRejected);
        }
        debug!(
            "sim: station {} tuned to {} MHz at {} dBm",
            self.station, frequency_mhz, tx_power_dbm
        );
        self.channel.tune(self.station, frequency_mhz);
        Ok(())
    }

    fn is_available(&mut self) -> bool {
        self.pending() > 0
    }

    fn receive(&mut self, buf: &mut [u8]) -> Result<usize, RadioError> {
        let frame = lock(&self.inbox.frames)
            .pop_front()
            .ok_or(RadioError::ReceiveFailed)?;
        if frame.len() > buf.len() {
            debug!("sim: {}-byte frame does not fit, dropped", frame.len());
            return Err(RadioError::ReceiveFailed);
        }
        buf[..frame.len()].copy_from_slice(&frame);
        Ok(frame.len())
    }

    fn transmit(&mut self, data: &[u8]) -> Result<(), RadioError> {
        if data.len() > MAX_PACKET_LEN {
            return Err(RadioError::TransmitFailed);
        }
        self.channel.broadcast(self.station, data)
    }

    fn wait_transmit_complete(&mut self) -> Result<(), RadioError> {
        Ok(())
    }

    fn wait_available_timeout(&mut self, timeout_ms: u32) -> bool {
        let frames = lock(&self.inbox.frames);
        let (frames, _) = self
            .inbox
            .ready
            .wait_timeout_while(frames, Duration::from_millis(u64::from(timeout_ms)), |f| {
                f.is_empty()
            })
            .unwrap_or_else(PoisonError::into_inner);
        !frames.is_empty()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
