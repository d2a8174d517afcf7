//! Shared size constants (spec §6).
//!
//! The vendor header defining these numerically was not part of the
//! retrieved original source, so the values below are this crate's
//! resolution of spec.md's Open Questions around them; see DESIGN.md.

/// Maximum outbound datagram size. Chosen as the largest UDP payload that
/// fits unfragmented on a standard 1500-byte-MTU Ethernet link
/// (1500 - 20 IPv4 - 8 UDP).
pub const MTU_LIMIT: usize = 1472;

/// Size of the maintenance message header (`ulCodeStamp` + `ucSpare` +
/// `ucState`).
pub const MAINT_HEADER_SIZE: usize = 6;

/// Size of a fixed diagnostic reply.
pub const MSG_DIAGNOSTIC_SIZE: usize = 8;

/// Size of the shared scan/continuous frame header.
pub const FRAME_HEADER_SIZE: usize = 36;

/// Multiplier applied to synthetic continuous-frame sample magnitudes.
/// Undocumented upstream; 1 keeps samples in a sane 16-bit range.
pub const LASER_CHANNEL_MULT: u16 = 1;
