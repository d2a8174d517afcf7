//! Bit-field codecs: scan-time code and channel-format code (spec §4.1).

/// Steps-per-cycle table shared by both scan-time code branches.
fn steps_for(code: u16) -> u16 {
    match code {
        0 => 400,
        1 => 200,
        2 => 100,
        3 => 50,
        _ => 400,
    }
}

/// Microseconds-per-step table shared by both scan-time code branches.
fn cycle_us_for(code: u16) -> u16 {
    match code {
        0 => 1,
        1 => 2,
        2 => 5,
        3 => 10,
        4 => 20,
        5 => 50,
        _ => 1,
    }
}

/// Decode a 16-bit scan-time code into a duration in microseconds.
///
/// Bit 15 clear selects "enumerated mode": `steps` comes from the low 3
/// bits, `cycle_us` from bits 3-5. Bit 15 set selects "explicit mode":
/// `steps` is the low 9 bits, `cycle_us` comes from bits 10-12. Both modes
/// share the same step/cycle lookup tables and out-of-range fallbacks.
pub fn decode_scan_time_us(scancode: u16) -> u16 {
    let (steps, cycle_us) = if scancode & 0x8000 == 0 {
        let step_code = scancode & 0x0007;
        let cycle_code = (scancode & 0x0038) >> 3;
        (steps_for(step_code), cycle_us_for(cycle_code))
    } else {
        let steps = scancode & 0x01ff;
        let cycle_code = (scancode & 0x1c00) >> 10;
        (steps, cycle_us_for(cycle_code))
    };
    steps.wrapping_mul(cycle_us)
}

/// Encode a scan time back into a 16-bit scancode.
///
/// The original firmware never implemented this — it always returns the
/// literal placeholder below regardless of input. Preserved as-is for wire
/// compatibility with existing observers of the maintenance reply; see
/// spec.md §9.
pub fn encode_scan_time_us(_scan_time_us: u16) -> u16 {
    0x001A
}

/// Extract the `gratings` field (5 bits) from a channel-format code.
pub fn decode_gratings(chanformat: u16) -> u8 {
    ((chanformat >> 4) & 0x1F) as u8
}

/// Extract the `channels` field (4 bits) from a channel-format code.
pub fn decode_channels(chanformat: u16) -> u8 {
    (chanformat & 0x0F) as u8
}

/// Encode `(channels, gratings)` into a 16-bit channel-format code.
///
/// This does not place fields at the positions [`decode_channels`] and
/// [`decode_gratings`] read them from: the original firmware's encoder puts
/// `channels` at bits 4-7 (the position [`decode_gratings`] reads) and
/// `gratings` unmasked-but-effectively-4-bit at bits 0-3 (the position
/// [`decode_channels`] reads). That asymmetry is a real property of the
/// hardware's maintenance-reply builder, not a translation bug here —
/// preserved for bit-level compatibility with existing host-side clients
/// that already work around it. See spec.md §4.1 and §8 property 2.
pub fn encode_chanformat(channels: u8, gratings: u8) -> u16 {
    0x4000 | (((channels & 0x0F) as u16) << 4) | ((gratings & 0x0F) as u16)
}
