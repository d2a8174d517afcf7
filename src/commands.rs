//! Maintenance TLV command and response codes (spec §4.3, §9).
//!
//! The vendor header assigning the real numeric command codes was not part
//! of the retrieved original source (only `smartscanemu.c` was), except for
//! one value it reveals directly: `create_maintenance`'s first response
//! record uses the literal `cmd = 129` for `RET_STATE`. Everything else
//! here is a contiguous numbering scheme assigned to preserve the command
//! *set* and *order* the firmware implements; wiring this emulator up to a
//! real board's host client would mean substituting that header's values.

/// Set the SSI state byte directly (payload: 1 byte).
pub const SET_STATE: u8 = 0x01;
/// Set demo mode (payload: 1 byte).
pub const SET_DEMO_MODE: u8 = 0x02;
/// Set raw scan rate in Hz (payload: 2 bytes, BE).
pub const SET_SCAN_RATE: u8 = 0x03;
/// Set continuous-data rate code (payload: 2 bytes, BE).
pub const SET_CONT_RATE: u8 = 0x04;
/// Set channel/grating format code (payload: 2 bytes, BE).
pub const SET_CH_FORMAT: u8 = 0x05;
/// Set first-frame reserved field (payload: 2 bytes, BE).
pub const SET_SCAN_BEG: u8 = 0x06;
/// Set scan speed via scancode (payload: 2 bytes, BE).
pub const SET_SCAN_SP: u8 = 0x07;

/// Commented out in the original firmware (`CMD_SET_CH_THRESH_CMD`);
/// recognized on the wire as an unknown command and skipped.
pub const SET_CH_THRESH: u8 = 0x08;
/// Commented out in the original firmware (`CMD_RET_SCAN_DIR_CMD`).
pub const SET_SCAN_DIR: u8 = 0x09;
/// Commented out in the original firmware (`CMD_RET_SCAN_CNT_CMD`).
pub const SET_SCAN_CNT: u8 = 0x0A;
/// Commented out in the original firmware (`CMD_RET_SW_VER_CMD`).
pub const SET_SW_VER: u8 = 0x0B;
/// Commented out in the original firmware (`CMD_SET_IP_ADDR_CMD`).
pub const SET_IP_ADDR: u8 = 0x0C;
/// Commented out in the original firmware (`CMD_SET_SUBNET_CMD`).
pub const SET_SUBNET: u8 = 0x0D;
/// Commented out in the original firmware (`CMD_RET_MAC_ADD_CMD`).
pub const SET_MAC_ADDR: u8 = 0x0E;
/// Commented out in the original firmware (`CMD_SET_GATEWAY_CMD`).
pub const SET_GATEWAY: u8 = 0x0F;
/// Commented out in the original firmware (`CMD_SET_CPU_UTC_CMD`).
pub const SET_CPU_UTC: u8 = 0x10;
/// Commented out in the original firmware (`CMD_RET_SERIAL_CMD` as a setter).
pub const SET_SERIAL: u8 = 0x11;

/// Current SSI state byte (response, 1 byte). Numeric value grounded in
/// `create_maintenance`'s literal `cmd = 129`.
pub const RET_STATE: u8 = 0x81;
/// Current demo mode byte (response, 1 byte).
pub const RET_DEMO_MODE: u8 = 0x82;
/// Current raw scan rate (response, 2 bytes BE).
pub const RET_SCAN_TX: u8 = 0x83;
/// Current continuous-data rate code (response, 2 bytes BE).
pub const RET_DATA_CODE: u8 = 0x84;
/// Current scan speed, scancode-encoded (response, 2 bytes BE).
pub const RET_SCAN_CODE: u8 = 0x85;
/// Current serial number (response, 4 bytes BE).
pub const RET_SERIAL: u8 = 0x86;
