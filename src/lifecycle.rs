//! Startup, shutdown, and thread orchestration (spec §4.6, component C8).
//!
//! Binds the three sockets, spawns the two producer threads, and runs the
//! reactor on the calling thread — the same "spawn workers, drive one on
//! the caller, join on the way out" shape the teacher's example binaries
//! use around `Graph::run` (see `examples/ax25-1200-rx.rs`). The
//! interrupt handler only sets the stop flag, unlike the original firmware
//! (spec.md §9): `run` always falls through to the join/close sequence
//! below, interrupted or not.

use std::net::{IpAddr, SocketAddr, UdpSocket};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use crate::config::Store;
use crate::error::Error;
use crate::{producers, reactor::Reactor};

/// The `EMU_LOCAL` build option's loopback-friendly diag/maintenance ports
/// (spec.md §6).
const LOCAL_DIAG_PORT: u16 = 30011;
const LOCAL_MAINT_PORT: u16 = 30012;

/// Runtime configuration for one emulator instance: bind/destination
/// addresses, ports, and startup flags. Populated from CLI flags in
/// `bin/ssi-emud.rs`.
#[derive(Debug, Clone)]
pub struct RuntimeOptions {
    /// Local address to bind all three sockets on.
    pub bind_ip: IpAddr,
    /// Host-side client address outbound traffic is addressed to.
    pub host_ip: IpAddr,
    /// Diagnostic receive port (also the host's diagnostic-reply port).
    pub diag_port: u16,
    /// Maintenance receive port (also the host's maintenance-reply port).
    pub maint_port: u16,
    /// Port the shared send socket binds to.
    pub client_port: u16,
    /// Host-side scan-frame receive port.
    pub scan_port: u16,
    /// Host-side continuous-frame receive port.
    pub cont_port: u16,
    /// Rebind diag/maintenance receives to the `EMU_LOCAL` loopback ports.
    pub local: bool,
    /// Start with demo mode on.
    pub demo: bool,
}

/// Bind sockets, spawn producers, run the reactor until interrupted, then
/// join and release resources in order.
pub fn run(opts: &RuntimeOptions) -> Result<(), Error> {
    let (diag_port, maint_port) = if opts.local {
        (LOCAL_DIAG_PORT, LOCAL_MAINT_PORT)
    } else {
        (opts.diag_port, opts.maint_port)
    };

    let diag_bind = SocketAddr::new(opts.bind_ip, diag_port);
    let maint_bind = SocketAddr::new(opts.bind_ip, maint_port);
    let client_bind = SocketAddr::new(opts.bind_ip, opts.client_port);

    let diag_dst = SocketAddr::new(opts.host_ip, opts.diag_port);
    let maint_dst = SocketAddr::new(opts.host_ip, opts.maint_port);
    let scan_dst = SocketAddr::new(opts.host_ip, opts.scan_port);
    let cont_dst = SocketAddr::new(opts.host_ip, opts.cont_port);

    let send_socket = Arc::new(Mutex::new(UdpSocket::bind(client_bind)?));
    let store = Arc::new(Store::new());
    store.set_demo(opts.demo);
    let stop = Arc::new(AtomicBool::new(false));

    {
        let stop = stop.clone();
        ctrlc::set_handler(move || {
            log::info!("interrupt received, shutting down");
            stop.store(true, Ordering::Relaxed);
        })?;
    }

    log::info!("diagnostic: bind {diag_bind}, replies to {diag_dst}");
    log::info!("maintenance: bind {maint_bind}, replies to {maint_dst}");
    log::info!("scan frames -> {scan_dst}, continuous frames -> {cont_dst}");

    let scan_handle = spawn_producer("scan-producer", {
        let send_socket = send_socket.clone();
        let store = store.clone();
        let stop = stop.clone();
        move || producers::scan_producer(send_socket, scan_dst, store, stop)
    })?;
    let cont_handle = spawn_producer("cont-producer", {
        let send_socket = send_socket.clone();
        let store = store.clone();
        let stop = stop.clone();
        move || producers::cont_producer(send_socket, cont_dst, store, stop)
    })?;

    let reactor = Reactor::new(
        diag_bind,
        maint_bind,
        send_socket,
        diag_dst,
        maint_dst,
        store,
        stop.clone(),
    )?;
    reactor.run();

    // Belt and suspenders: the reactor only returns once `stop` is already
    // set, but producers may still be mid-sleep and need the same signal.
    stop.store(true, Ordering::Relaxed);
    join_producer("scan-producer", scan_handle);
    join_producer("cont-producer", cont_handle);

    Ok(())
}

fn spawn_producer<F>(name: &str, f: F) -> Result<thread::JoinHandle<()>, Error>
where
    F: FnOnce() + Send + 'static,
{
    Ok(thread::Builder::new().name(name.to_string()).spawn(f)?)
}

fn join_producer(name: &str, handle: thread::JoinHandle<()>) {
    if handle.join().is_err() {
        log::warn!("{name} thread panicked");
    }
}
