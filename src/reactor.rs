//! Reactor: diagnostic and maintenance receive loop (spec §4.4, component C6).
//!
//! `std` has no portable multi-socket `select`, so the two-socket wait the
//! original firmware does with one `select()` call is expressed here as a
//! short-timeout `recv_from` attempt on each socket in turn, every
//! iteration. The externally observable behavior is the same either way:
//! a quiet socket costs nothing but a timed-out syscall, and the stop flag
//! is re-checked every iteration regardless of which socket (if either)
//! had data.

use std::net::{SocketAddr, UdpSocket};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::config::Store;
use crate::error::Error;
use crate::limits::MTU_LIMIT;
use crate::{diag, maintenance};

/// Poll timeout applied to both receive sockets. Short enough that the stop
/// flag is re-checked promptly; spec.md's 20-second `select` timeout is a
/// "safe to wait this long" ceiling, not a requirement on how often we poll.
const POLL_TIMEOUT: Duration = Duration::from_millis(250);

/// Owns the two receive sockets and drives the reactor loop on the calling
/// thread (the process main thread in `lifecycle::run`).
pub struct Reactor {
    diag_socket: UdpSocket,
    maint_socket: UdpSocket,
    send_socket: Arc<Mutex<UdpSocket>>,
    diag_dst: SocketAddr,
    maint_dst: SocketAddr,
    store: Arc<Store>,
    stop: Arc<AtomicBool>,
}

impl Reactor {
    /// Bind the diagnostic and maintenance receive sockets and build a
    /// reactor ready to `run`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        diag_bind: SocketAddr,
        maint_bind: SocketAddr,
        send_socket: Arc<Mutex<UdpSocket>>,
        diag_dst: SocketAddr,
        maint_dst: SocketAddr,
        store: Arc<Store>,
        stop: Arc<AtomicBool>,
    ) -> Result<Self, Error> {
        let diag_socket = UdpSocket::bind(diag_bind)?;
        diag_socket.set_read_timeout(Some(POLL_TIMEOUT))?;
        let maint_socket = UdpSocket::bind(maint_bind)?;
        maint_socket.set_read_timeout(Some(POLL_TIMEOUT))?;
        Ok(Self {
            diag_socket,
            maint_socket,
            send_socket,
            diag_dst,
            maint_dst,
            store,
            stop,
        })
    }

    /// Run the receive loop until the stop flag is set.
    pub fn run(&self) {
        let mut diag_buf = [0u8; MTU_LIMIT];
        let mut maint_buf = [0u8; MTU_LIMIT];
        let mut reply_buf = [0u8; MTU_LIMIT];

        while !self.stop.load(Ordering::Relaxed) {
            self.poll_diag(&mut diag_buf, &mut reply_buf);
            self.poll_maint(&mut maint_buf, &mut reply_buf);
        }
    }

    fn poll_diag(&self, recv_buf: &mut [u8], reply_buf: &mut [u8]) {
        match self.diag_socket.recv_from(recv_buf) {
            Ok((_n, _peer)) => {
                self.store.mark_operational_once();
                let state = self.store.state_byte();
                let n = diag::build_diag(reply_buf, state);
                if n > 0 {
                    self.send(&reply_buf[..n], self.diag_dst);
                }
            }
            Err(e) if would_block(&e) => {}
            Err(e) => log::warn!("diagnostic recv failed: {e}"),
        }
    }

    fn poll_maint(&self, recv_buf: &mut [u8], reply_buf: &mut [u8]) {
        let n = match self.maint_socket.recv_from(recv_buf) {
            Ok((n, _peer)) => n,
            Err(e) if would_block(&e) => return,
            Err(e) => {
                log::warn!("maintenance recv failed: {e}");
                return;
            }
        };

        let header = match maintenance::parse(&recv_buf[..n]) {
            Ok(parsed) => {
                self.store.apply_updates(&parsed.updates);
                parsed.header
            }
            Err(e) => {
                log::warn!("maintenance datagram rejected: {e}");
                maintenance::Header {
                    code_stamp: 0,
                    spare: 0,
                    state: self.store.state_byte(),
                }
            }
        };

        let snap = self.store.snapshot();
        let n = maintenance::build_reply(reply_buf, &header, &snap.config, snap.state_byte);
        if n > 0 {
            self.send(&reply_buf[..n], self.maint_dst);
        }
    }

    fn send(&self, buf: &[u8], dst: SocketAddr) {
        let sock = self.send_socket.lock().expect("send socket lock poisoned");
        if let Err(e) = sock.send_to(buf, dst) {
            log::warn!("send to {dst} failed: {e}");
        }
    }
}

fn would_block(e: &std::io::Error) -> bool {
    matches!(
        e.kind(),
        std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut
    )
}
