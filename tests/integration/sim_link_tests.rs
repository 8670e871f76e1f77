//! Two Commanders talking over the in-memory channel in real time.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use commander::adapters::sim_radio::SimChannel;
use commander::adapters::time::SystemClock;
use commander::{Commander, CommanderConfig, Delivery, NetworkAddress};

fn fast_config() -> CommanderConfig {
    CommanderConfig {
        resend_delay_ms: 100,
        ..CommanderConfig::default()
    }
}

#[test]
fn message_is_delivered_and_acked() {
    let channel = SimChannel::new();
    let mut sender = Commander::new(
        NetworkAddress::parse("AB", "1").unwrap(),
        fast_config(),
        channel.attach(),
        SystemClock::new(),
    )
    .unwrap();
    let mut receiver = Commander::new(
        NetworkAddress::parse("AB", "2").unwrap(),
        fast_config(),
        channel.attach(),
        SystemClock::new(),
    )
    .unwrap();
    receiver.init().unwrap();
    sender.init().unwrap();
    // Boot frames are addressed to their own senders; nobody else keeps them.
    assert!(!receiver.poll());

    let running = Arc::new(AtomicBool::new(true));
    let flag = Arc::clone(&running);
    let listener = thread::spawn(move || {
        while flag.load(Ordering::Relaxed) {
            if receiver.poll() {
                return receiver.message().cloned();
            }
            thread::sleep(Duration::from_millis(1));
        }
        None
    });

    let delivery = sender.send(b"HELLO", Some(b'2'), true).unwrap();
    running.store(false, Ordering::Relaxed);
    let got = listener.join().unwrap().expect("receiver saw the message");

    assert_eq!(delivery, Delivery::Acked);
    assert_eq!(got.payload(), b"HELL.");
}

#[test]
fn other_network_never_answers() {
    let channel = SimChannel::new();
    let mut sender = Commander::new(
        NetworkAddress::parse("AB", "1").unwrap(),
        fast_config(),
        channel.attach(),
        SystemClock::new(),
    )
    .unwrap();
    let mut stranger = Commander::new(
        NetworkAddress::parse("XY", "2").unwrap(),
        fast_config(),
        channel.attach(),
        SystemClock::new(),
    )
    .unwrap();
    sender.init().unwrap();
    stranger.init().unwrap();

    let start = Instant::now();
    assert_eq!(
        sender.send(b"HELLO", Some(b'2'), true).unwrap(),
        Delivery::NoResponse
    );
    let waited = start.elapsed();
    assert!(waited >= Duration::from_millis(300), "waited {:?}", waited);

    assert!(!stranger.poll());
    assert!(stranger.message().is_none());
}

#[test]
fn lost_link_gives_no_response() {
    let channel = SimChannel::with_loss(1.0, 9);
    let mut sender = Commander::new(
        NetworkAddress::parse("AB", "1").unwrap(),
        fast_config(),
        channel.attach(),
        SystemClock::new(),
    )
    .unwrap();
    let _receiver = channel.attach();
    sender.init().unwrap();

    assert_eq!(
        sender.send(b"HELLO", Some(b'2'), true).unwrap(),
        Delivery::NoResponse
    );
    assert_eq!(channel.stats().delivered, 0);
}
