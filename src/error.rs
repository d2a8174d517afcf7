//! Crate-wide error type.
//!
//! Mirrors the split the original firmware makes between fatal startup
//! failures (socket open/bind, signal handler install) and per-datagram
//! protocol failures (malformed maintenance message): both are represented
//! here, but only the former should ever terminate the process (see
//! [`crate::lifecycle`]). Address-literal parsing is handled by `clap`'s
//! `IpAddr` derive in `bin/ssi-emud.rs`, not by this crate's own error path.

use thiserror::Error;

/// Errors produced by this crate's library surface.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O failure opening, binding, or using a socket.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A maintenance datagram failed the length/alignment checks in §3/§4.3.
    #[error("malformed maintenance datagram: {0}")]
    MalformedMaintenance(&'static str),

    /// Installing the interrupt handler failed (e.g. one was already set).
    #[error("failed to install signal handler: {0}")]
    Signal(#[from] ctrlc::Error),
}
