//! Diagnostic reply builder (spec §4.4).
//!
//! The diagnostic socket's only job is a fixed-size "are you there" reply
//! that echoes current state. Receiving the first diagnostic datagram is
//! also what flips the board from `STAND_BY` to `OPERATIONAL`
//! (spec §3) — that transition is driven by [`crate::config::Store::mark_operational_once`],
//! called by [`crate::reactor`] before this builder runs.

use crate::codec::Writer;
use crate::limits::MSG_DIAGNOSTIC_SIZE;

/// Build a diagnostic reply into `buf`, echoing `state_byte`.
///
/// Returns [`MSG_DIAGNOSTIC_SIZE`] on success, or 0 if `buf` is too small —
/// a build error, logged and treated as nothing to send (spec.md §7).
pub fn build_diag(buf: &mut [u8], state_byte: u8) -> usize {
    if buf.len() < MSG_DIAGNOSTIC_SIZE {
        log::warn!(
            "diagnostic reply builder: buffer too small ({} < {MSG_DIAGNOSTIC_SIZE})",
            buf.len()
        );
        return 0;
    }
    buf.fill(0);

    let mut w = Writer::new(buf);
    w.u32(0) // ulCodeStamp: not correlated to the request, unlike maintenance
        .u8(0) // ucSpare
        .u8(state_byte);
    w.pad_to(4);
    w.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::Reader;
    use crate::config::STATE_OPERATIONAL;

    #[test]
    fn builds_fixed_size_reply_carrying_state() {
        let mut buf = [0xffu8; 16];
        let n = build_diag(&mut buf, STATE_OPERATIONAL);
        assert_eq!(n, MSG_DIAGNOSTIC_SIZE);

        let mut r = Reader::new(&buf[..n]);
        assert_eq!(r.u32(), 0);
        assert_eq!(r.u8(), 0);
        assert_eq!(r.u8(), STATE_OPERATIONAL);
    }

    #[test]
    fn rejects_undersized_buffer() {
        let mut buf = [0u8; 4];
        assert_eq!(build_diag(&mut buf, 0), 0);
    }
}
