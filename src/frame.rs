//! Scan and continuous-data frame builders (spec §4.2, component C3).
//!
//! Both frame kinds share a 36-byte header and differ only in payload shape:
//! a scan frame always carries 400 fixed-width samples, a continuous frame
//! packs as many `gratings * channels` sample groups as fit under
//! [`crate::limits::MTU_LIMIT`]. Neither builder ever emits a datagram larger
//! than that limit. Passing an empty or undersized `buf` is a build error:
//! logged, not propagated, with 0 returned to tell the caller there is
//! nothing to send this tick (spec.md §7).

use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;

use crate::codec::Writer;
use crate::limits::{FRAME_HEADER_SIZE, LASER_CHANNEL_MULT, MTU_LIMIT};

const SCAN_SAMPLES: usize = 400;
const SAMPLE_BYTES: usize = 2;

struct Now {
    secs: u32,
    micros: u32,
}

/// Seconds and microseconds since the Unix epoch, truncated to 32 bits the
/// way the original firmware's `struct timeval`-derived header fields are.
fn now_unix() -> Now {
    let d = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    Now {
        secs: d.as_secs() as u32,
        micros: d.subsec_micros(),
    }
}

/// Build one scan frame into `buf`.
///
/// Always 36 (header) + 400*2 (fixed sample count) = 836 bytes. `frame_count`
/// is the caller-owned wrapping per-producer counter (spec §4.5); samples are
/// synthetic, drawn uniformly like the original firmware's `rand()`-filled
/// demo payload. Returns the number of bytes written, or 0 if `buf` can't
/// hold a full frame.
pub fn build_scan(buf: &mut [u8], frame_count: u32) -> usize {
    const TOTAL: usize = FRAME_HEADER_SIZE + SCAN_SAMPLES * SAMPLE_BYTES;
    if buf.is_empty() {
        log::warn!("scan frame builder: empty buffer");
        return 0;
    }
    if buf.len() < TOTAL {
        log::warn!(
            "scan frame builder: buffer too small ({} < {TOTAL})",
            buf.len()
        );
        return 0;
    }
    buf.fill(0);

    let mut w = Writer::new(buf);
    let now = now_unix();
    w.u16((TOTAL - 2) as u16) // usFrameSize: total size excluding this field
        .u8(9) // ucHdrSizex4: header is 36 bytes = 9 * 4
        .u8(0xFF) // ucFrameFormat: fixed marker for a scan frame
        .u32(frame_count)
        .u32(now.secs) // ulTimeStampH
        .u32(now.micros) // ulTimeStampL
        .u32(now.secs) // ulTimeCodeH
        .u16(400) // usTimeInterval, us
        .u16(SCAN_SAMPLES as u16) // usNrSteps
        .u16(0) // usMinChannel
        .u16(SCAN_SAMPLES as u16 - 1) // usMaxChannel
        .u32(0) // ulMinWaveFreq
        .u32(0); // ulMaxWaveFreq

    let mut rng = rand::rng();
    for _ in 0..SCAN_SAMPLES {
        w.u16(rng.random_range(0..51_200));
    }
    w.len()
}

/// Build one continuous-data frame into `buf`.
///
/// Packs `frames = floor((MTU_LIMIT - header) / (gratings * channels * 2))`
/// sample groups, the most that fit under the MTU without fragmenting
/// (spec §4.2). Samples are synthetic: `(183 + sign * (0..50)) *
/// LASER_CHANNEL_MULT`, matching the original firmware's noisy-constant demo
/// payload. Returns the number of bytes written, or 0 if `buf` is too small
/// or `gratings`/`channels` are both zero (no sample group would fit).
pub fn build_cont(buf: &mut [u8], frame_count: u32, channels: u8, gratings: u8) -> usize {
    if buf.is_empty() {
        log::warn!("continuous frame builder: empty buffer");
        return 0;
    }
    let group_bytes = gratings as usize * channels as usize * SAMPLE_BYTES;
    if group_bytes == 0 {
        log::warn!("continuous frame builder: zero-sized sample group (gratings or channels is 0)");
        return 0;
    }
    let frames = (MTU_LIMIT - FRAME_HEADER_SIZE) / group_bytes;
    let payload_samples = frames * gratings as usize * channels as usize;
    let total = FRAME_HEADER_SIZE + payload_samples * SAMPLE_BYTES;
    if buf.len() < total {
        log::warn!(
            "continuous frame builder: buffer too small ({} < {total})",
            buf.len()
        );
        return 0;
    }
    buf.fill(0);

    let mut rng = rand::rng();
    let mut w = Writer::new(buf);
    let now = now_unix();
    // ucFrameFormat packs channels/gratings the same way the chanformat
    // field does; 16 gratings collapses to the wire value 0.
    let fmt_gratings = if gratings == 16 { 0 } else { gratings };
    w.u16((total - 2) as u16)
        .u8(9)
        .u8(((fmt_gratings & 0x0F) << 4) | (channels & 0x0F))
        .u32(frame_count)
        .u32(now.secs)
        .u32(rng.random()) // ulTimeStampL: synthetic, not a real microsecond reading
        .u32(now.secs)
        .u16(400)
        .u16(0) // usSpare
        .u16(0) // usMinChannel
        .u16(SCAN_SAMPLES as u16 - 1) // usMaxChannel
        .u32(0) // ulMinWaveFreq
        .u32(0); // ulSpare

    for _ in 0..payload_samples {
        let sign: i32 = if rng.random_range(0..2i32) == 1 { 1 } else { -1 };
        let magnitude: i32 = rng.random_range(0..50i32);
        let sample = (183 + sign * magnitude) * LASER_CHANNEL_MULT as i32;
        w.u16(sample as u16);
    }
    w.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::Reader;

    #[test]
    fn scan_frame_has_fixed_size_and_header() {
        let mut buf = [0u8; 1024];
        let n = build_scan(&mut buf, 7);
        assert_eq!(n, FRAME_HEADER_SIZE + SCAN_SAMPLES * SAMPLE_BYTES);

        let mut r = Reader::new(&buf[..n]);
        assert_eq!(r.u16(), (n - 2) as u16);
        assert_eq!(r.u8(), 9);
        assert_eq!(r.u8(), 0xFF);
        assert_eq!(r.u32(), 7);
    }

    #[test]
    fn scan_frame_rejects_undersized_buffer() {
        let mut buf = [0u8; 10];
        assert_eq!(build_scan(&mut buf, 0), 0);
    }

    #[test]
    fn scan_frame_rejects_empty_buffer() {
        let mut buf: [u8; 0] = [];
        assert_eq!(build_scan(&mut buf, 0), 0);
    }

    #[test]
    fn cont_frame_fits_under_mtu_and_is_densely_packed() {
        let mut buf = [0u8; MTU_LIMIT];
        let n = build_cont(&mut buf, 1, 4, 16);
        assert!(n <= MTU_LIMIT);

        let group_bytes = 16 * 4 * SAMPLE_BYTES;
        let expected_frames = (MTU_LIMIT - FRAME_HEADER_SIZE) / group_bytes;
        assert_eq!(n, FRAME_HEADER_SIZE + expected_frames * group_bytes);
    }

    #[test]
    fn cont_frame_format_byte_collapses_16_gratings() {
        let mut buf = [0u8; MTU_LIMIT];
        let n = build_cont(&mut buf, 0, 4, 16);
        let mut r = Reader::new(&buf[..n]);
        r.u16(); // usFrameSize
        r.u8(); // ucHdrSizex4
        let fmt = r.u8();
        assert_eq!(fmt >> 4, 0); // gratings=16 wraps to 0
        assert_eq!(fmt & 0x0F, 4); // channels unchanged
    }

    #[test]
    fn cont_frame_zero_group_size_is_a_build_error() {
        let mut buf = [0u8; MTU_LIMIT];
        assert_eq!(build_cont(&mut buf, 0, 0, 0), 0);
    }
}
