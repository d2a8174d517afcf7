//! Scan and continuous-data producer threads (spec §4.5, component C7).
//!
//! Both producers share the same shape: read a config snapshot, build a
//! frame if the stream isn't paused, send it under the shared socket mutex,
//! then sleep for the current cadence. Each owns its frame counter
//! exclusively — no synchronization needed there, matching spec.md §5.

use std::net::{SocketAddr, UdpSocket};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::config::Store;
use crate::frame;
use crate::limits::MTU_LIMIT;

/// How long a paused producer sleeps before re-checking its cadence.
const PAUSED_SLEEP: Duration = Duration::from_secs(1);

fn send(send_socket: &Mutex<UdpSocket>, buf: &[u8], dst: SocketAddr) {
    let sock = send_socket.lock().expect("send socket lock poisoned");
    if let Err(e) = sock.send_to(buf, dst) {
        log::warn!("send to {dst} failed: {e}");
    }
}

/// Emit scan frames at `raw_tx_rate` Hz until `stop` is set.
pub fn scan_producer(
    send_socket: Arc<Mutex<UdpSocket>>,
    dst: SocketAddr,
    store: Arc<Store>,
    stop: Arc<AtomicBool>,
) {
    let mut counter: u32 = 0;
    let mut buf = [0u8; MTU_LIMIT];

    while !stop.load(Ordering::Relaxed) {
        let snap = store.snapshot();
        let rate = snap.derived.raw_tx_rate;
        if rate == 0 {
            std::thread::sleep(PAUSED_SLEEP);
            continue;
        }

        let n = frame::build_scan(&mut buf, counter);
        if n > 0 {
            send(&send_socket, &buf[..n], dst);
            counter = counter.wrapping_add(1);
        }
        std::thread::sleep(Duration::from_micros(1_000_000 / rate as u64));
    }
}

/// Emit continuous frames every `cont_tx_period_us` until `stop` is set.
pub fn cont_producer(
    send_socket: Arc<Mutex<UdpSocket>>,
    dst: SocketAddr,
    store: Arc<Store>,
    stop: Arc<AtomicBool>,
) {
    let mut counter: u32 = 0;
    let mut buf = [0u8; MTU_LIMIT];

    while !stop.load(Ordering::Relaxed) {
        let snap = store.snapshot();
        let period_us = snap.derived.cont_tx_period_us;
        if period_us == 0 {
            std::thread::sleep(PAUSED_SLEEP);
            continue;
        }

        let n = frame::build_cont(&mut buf, counter, snap.config.channels, snap.config.gratings);
        if n > 0 {
            send(&send_socket, &buf[..n], dst);
            counter = counter.wrapping_add(1);
        }
        std::thread::sleep(Duration::from_micros(period_us as u64));
    }
}
