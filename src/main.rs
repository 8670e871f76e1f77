//! Commander link simulator: host entry point.
//!
//! Runs two boards on one simulated channel, each on its own thread, the
//! way two RFM95 nodes share a LoRa frequency:
//!
//! ```text
//! ┌──────────────┐      SimChannel (lossy)      ┌──────────────┐
//! │  board 1     │ ──── AB2.MSG0.xyz ─────────▶ │  board 2     │
//! │  send+retry  │ ◀─── AB2>xyz ─────────────── │  poll + ack  │
//! └──────────────┘                              └──────────────┘
//! ```
#![deny(unused_must_use)]

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Parser;
use log::{info, warn};

use commander::adapters::log_sink::LogStatusObserver;
use commander::adapters::sim_radio::SimChannel;
use commander::adapters::time::SystemClock;
use commander::{Commander, CommanderConfig, Delivery, NetworkAddress, RetryPolicy};

#[derive(Parser, Debug)]
#[command(name = "commander-sim", about = "Simulate two Commander boards on one radio channel")]
struct Args {
    /// Two-character network id shared by both boards
    #[arg(long, default_value = "AB")]
    network: String,

    /// Number of messages board 1 sends to board 2
    #[arg(long, default_value_t = 5)]
    messages: u32,

    /// Probability (0.0-1.0) that any single frame is lost
    #[arg(long, default_value_t = 0.0)]
    loss: f64,

    /// Seed for the channel loss model
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Retransmit the frame on each ack timeout instead of only re-listening
    #[arg(long)]
    retransmit: bool,

    /// JSON file with link configuration overrides
    #[arg(long)]
    config: Option<PathBuf>,
}

fn load_config(args: &Args) -> Result<CommanderConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?
        }
        None => CommanderConfig::default(),
    };
    if args.retransmit {
        config.retry_policy = RetryPolicy::Retransmit;
    }
    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    // ── 1. Logging + arguments ────────────────────────────────
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    if !(0.0..=1.0).contains(&args.loss) {
        bail!("--loss must be between 0.0 and 1.0");
    }
    let config = load_config(&args)?;

    info!("commander-sim v{}", env!("CARGO_PKG_VERSION"));
    info!("config: {:?}", config);

    // ── 2. Channel + boards ───────────────────────────────────
    let channel = SimChannel::with_loss(args.loss, args.seed);
    let sender_addr = NetworkAddress::parse(&args.network, "1")?;
    let receiver_addr = NetworkAddress::parse(&args.network, "2")?;

    let mut sender = Commander::new(sender_addr, config.clone(), channel.attach(), SystemClock::new())?;
    sender.set_status_observer(LogStatusObserver::new(sender_addr));

    let mut receiver = Commander::new(receiver_addr, config, channel.attach(), SystemClock::new())?;
    receiver.set_status_observer(LogStatusObserver::new(receiver_addr));

    // Radio bring-up failure is fatal for a node.
    receiver.init().context("board 2 radio init")?;
    sender.init().context("board 1 radio init")?;

    // ── 3. Receiver control loop ──────────────────────────────
    let running = Arc::new(AtomicBool::new(true));
    let receiver_running = Arc::clone(&running);
    let receiver_thread = thread::spawn(move || {
        let mut received = 0u32;
        while receiver_running.load(Ordering::Relaxed) {
            if receiver.poll() {
                received += 1;
                if let Some(msg) = receiver.message() {
                    info!(
                        "board 2 got \"{}\" (nonce {})",
                        msg.content().escape_ascii(),
                        msg.nonce()
                    );
                }
            }
            if let Err(e) = receiver.tick() {
                warn!("board 2 keep-alive failed: {}", e);
            }
            thread::sleep(Duration::from_millis(2));
        }
        received
    });

    // ── 4. Sender: numbered messages, reply requested ────────
    let mut acked = 0u32;
    for i in 0..args.messages {
        // Trailing NUL is the terminator slot the frame marker overwrites.
        let payload = format!("MSG{i}\0");
        match sender.send(payload.as_bytes(), Some(b'2'), true)? {
            Delivery::Acked => acked += 1,
            Delivery::NoResponse => warn!("message {} was not acknowledged", i),
            Delivery::Sent => {}
        }
        sender.tick()?;
        thread::sleep(Duration::from_millis(50));
    }

    // ── 5. Shutdown + summary ─────────────────────────────────
    running.store(false, Ordering::Relaxed);
    let received = receiver_thread
        .join()
        .map_err(|_| anyhow::anyhow!("receiver thread panicked"))?;

    let stats = channel.stats();
    info!(
        "sent {} | acked {} | received {} | frames delivered {} dropped {}",
        args.messages, acked, received, stats.delivered, stats.dropped
    );
    Ok(())
}
