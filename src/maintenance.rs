//! Maintenance TLV codec: inbound request parse, outbound reply build
//! (spec §4.3, component C4).

use crate::bitfield::{decode_channels, decode_gratings, decode_scan_time_us, encode_scan_time_us};
use crate::codec::{Reader, Writer};
use crate::commands;
use crate::config::BoardConfig;
use crate::error::Error;
use crate::limits::{MAINT_HEADER_SIZE, MTU_LIMIT};

/// The 6-byte header shared by maintenance requests and replies.
#[derive(Debug, Clone, Copy)]
pub struct Header {
    /// Opaque correlation stamp, not interpreted by this crate.
    pub code_stamp: u32,
    /// Reserved byte, not interpreted.
    pub spare: u8,
    /// State byte as sent by the peer (not directly applied — state is
    /// driven by `SET_STATE`, spec §4.3).
    pub state: u8,
}

/// One validated, recognized configuration update extracted from a
/// maintenance request's TLV stream. Produced by [`parse`], applied by
/// [`crate::config::Store::apply_updates`].
#[derive(Debug, Clone, Copy)]
pub enum Update {
    /// Overwrite the SSI state byte.
    SetState(u8),
    /// Overwrite demo mode.
    SetDemoMode(bool),
    /// Update the raw scan rate in Hz.
    SetScanRate(u16),
    /// Update the continuous-data rate code.
    SetContRate(u16),
    /// Update channels/gratings, already decoded from the wire chanformat.
    SetChFormat(u8, u8),
    /// Update the reserved first-frame field.
    SetScanBeg(u16),
    /// Update scan time, already decoded from the wire scancode.
    SetScanSp(u16),
}

/// A fully parsed, not-yet-applied maintenance request.
#[derive(Debug, Clone)]
pub struct ParsedMaintenance {
    /// The request header.
    pub header: Header,
    /// Validated updates, in wire order. Applying them in this order
    /// matters: later records for the same field win, matching the
    /// original firmware's parse-and-apply-as-you-go behavior for
    /// everything except the derived-value recompute, which happens once
    /// at the end (spec §4.3).
    pub updates: Vec<Update>,
}

/// Parse an inbound maintenance datagram.
///
/// Validates the whole TLV stream before returning anything: a malformed
/// record anywhere in the datagram rejects the datagram wholesale with no
/// partial application, the two-pass fix spec.md §9 recommends for the
/// original's partial-mutation hazard. Unrecognized command codes are
/// logged and skipped, not rejected.
pub fn parse(buf: &[u8]) -> Result<ParsedMaintenance, Error> {
    if buf.len() < MAINT_HEADER_SIZE || buf.len() > MTU_LIMIT {
        return Err(Error::MalformedMaintenance(
            "datagram length outside [header_size, max_size]",
        ));
    }
    if (buf.len() - MAINT_HEADER_SIZE) % 4 != 0 {
        return Err(Error::MalformedMaintenance(
            "payload length is not 4-byte aligned",
        ));
    }

    let mut r = Reader::new(buf);
    let header = Header {
        code_stamp: r.u32(),
        spare: r.u8(),
        state: r.u8(),
    };

    let mut updates = Vec::new();
    while r.remaining() > 0 {
        if r.remaining() < 2 {
            return Err(Error::MalformedMaintenance("truncated TLV record header"));
        }
        let cmd = r.u8();
        let len = r.u8() as usize;
        if r.remaining() < len {
            return Err(Error::MalformedMaintenance("truncated TLV record payload"));
        }
        let data = r.bytes(len);

        match cmd {
            commands::SET_STATE if len >= 1 => updates.push(Update::SetState(data[0])),
            commands::SET_DEMO_MODE if len >= 1 => updates.push(Update::SetDemoMode(data[0] != 0)),
            commands::SET_SCAN_RATE if len >= 2 => {
                updates.push(Update::SetScanRate(u16::from_be_bytes([data[0], data[1]])))
            }
            commands::SET_CONT_RATE if len >= 2 => {
                updates.push(Update::SetContRate(u16::from_be_bytes([data[0], data[1]])))
            }
            commands::SET_CH_FORMAT if len >= 2 => {
                let chanformat = u16::from_be_bytes([data[0], data[1]]);
                updates.push(Update::SetChFormat(
                    decode_channels(chanformat),
                    decode_gratings(chanformat),
                ));
            }
            commands::SET_SCAN_BEG if len >= 2 => {
                updates.push(Update::SetScanBeg(u16::from_be_bytes([data[0], data[1]])))
            }
            commands::SET_SCAN_SP if len >= 2 => {
                let scancode = u16::from_be_bytes([data[0], data[1]]);
                updates.push(Update::SetScanSp(decode_scan_time_us(scancode)));
            }
            commands::SET_STATE
            | commands::SET_DEMO_MODE
            | commands::SET_SCAN_RATE
            | commands::SET_CONT_RATE
            | commands::SET_CH_FORMAT
            | commands::SET_SCAN_BEG
            | commands::SET_SCAN_SP => {
                return Err(Error::MalformedMaintenance(
                    "recognized command with undersized payload",
                ));
            }
            other => {
                log::warn!("maintenance: command not recognized: {other}");
            }
        }
    }

    Ok(ParsedMaintenance { header, updates })
}

/// Build an outbound maintenance reply describing the board's current
/// configuration (spec §4.3 "Outbound build").
///
/// Zero-initializes `buf` before writing, echoes `header`'s code-stamp back
/// to the peer, and pads the total length to a 4-byte boundary. Returns the
/// total byte length written, or 0 if `buf` is too small to hold a reply —
/// a build error, logged and treated as "nothing to send" like the frame
/// builders in [`crate::frame`].
pub fn build_reply(buf: &mut [u8], header: &Header, cfg: &BoardConfig, state_byte: u8) -> usize {
    const MIN_SIZE: usize = 36;
    if buf.len() < MIN_SIZE {
        log::warn!(
            "maintenance reply builder: buffer too small ({} < {MIN_SIZE})",
            buf.len()
        );
        return 0;
    }
    buf.fill(0);

    let mut w = Writer::new(buf);
    w.u32(header.code_stamp).u8(0).u8(state_byte);

    w.u8(commands::RET_STATE).u8(1).u8(state_byte);
    w.u8(commands::RET_DEMO_MODE).u8(1).u8(cfg.demo as u8);
    w.u8(commands::RET_SCAN_TX).u8(2).u16(cfg.raw_speed_hz);
    w.u8(commands::RET_DATA_CODE).u8(2).u16(cfg.cont_speed_code);
    w.u8(commands::RET_SCAN_CODE)
        .u8(2)
        .u16(encode_scan_time_us(cfg.scan_time_us));
    w.u8(commands::RET_SERIAL).u8(4).u32(cfg.serial);

    w.pad_to(4);
    w.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tlv(cmd: u8, payload: &[u8]) -> Vec<u8> {
        let mut v = vec![cmd, payload.len() as u8];
        v.extend_from_slice(payload);
        v
    }

    fn request(records: &[Vec<u8>]) -> Vec<u8> {
        let mut buf = vec![0u8; MAINT_HEADER_SIZE];
        buf[5] = 0; // ucState
        for r in records {
            buf.extend_from_slice(r);
        }
        buf
    }

    #[test]
    fn rejects_too_short() {
        assert!(parse(&[0u8; 3]).is_err());
    }

    #[test]
    fn rejects_unaligned_payload() {
        let mut buf = request(&[tlv(commands::SET_DEMO_MODE, &[1])]);
        buf.push(0xff); // break 4-byte alignment of the payload
        assert!(parse(&buf).is_err());
    }

    #[test]
    fn parses_known_commands_and_skips_unknown() {
        let buf = request(&[
            tlv(commands::SET_CONT_RATE, &[0x00, 25]),
            tlv(0xEE, &[1, 2, 3, 4]), // unknown, but 4-byte aligned with the rest
            tlv(commands::SET_SCAN_SP, &[0x00, 0x00]),
        ]);
        let parsed = parse(&buf).unwrap();
        assert_eq!(parsed.updates.len(), 2);
    }

    #[test]
    fn apply_order_matches_spec_example() {
        let buf = request(&[
            tlv(commands::SET_CONT_RATE, &[0x00, 25]),
            tlv(commands::SET_SCAN_SP, &[0x00, 0x00]),
        ]);
        let parsed = parse(&buf).unwrap();
        let store = crate::config::Store::new();
        store.apply_updates(&parsed.updates);
        let snap = store.snapshot();
        assert_eq!(snap.config.cont_speed_code, 25);
        assert_eq!(snap.config.scan_time_us, 400);
        assert_eq!(snap.derived.cont_tx_period_us, 10_000);
    }

    #[test]
    fn build_reply_is_4_byte_aligned_and_carries_config() {
        let cfg = BoardConfig::default();
        let header = Header {
            code_stamp: 0x1122_3344,
            spare: 0,
            state: 0,
        };
        let mut buf = [0u8; 64];
        let n = build_reply(&mut buf, &header, &cfg, 1);
        assert_eq!(n % 4, 0);

        let mut r = Reader::new(&buf[..n]);
        assert_eq!(r.u32(), 0x1122_3344);
        assert_eq!(r.u8(), 0); // spare
        assert_eq!(r.u8(), 1); // state
        assert_eq!(r.u8(), commands::RET_STATE);
        assert_eq!(r.u8(), 1);
        assert_eq!(r.u8(), 1); // echoed state
    }

    #[test]
    fn build_reply_rejects_undersized_buffer() {
        let cfg = BoardConfig::default();
        let header = Header {
            code_stamp: 0,
            spare: 0,
            state: 0,
        };
        let mut buf = [0u8; 4];
        assert_eq!(build_reply(&mut buf, &header, &cfg, 0), 0);
    }
}
