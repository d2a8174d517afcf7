//! Configuration and SSI state store (spec §3, §4.5 component C5).
//!
//! Holds the board's authoritative configuration record plus the derived
//! timing values producers read every iteration. Writes come only from the
//! reactor thread (via [`crate::maintenance::apply`]) and from startup;
//! producers only ever read a [`Snapshot`]. An `RwLock` is used rather than
//! the bare shared-scalar model spec.md §5 describes as a minimum, which is
//! the "tighten with a read-mostly lock" option that section explicitly
//! allows.

use std::sync::RwLock;

/// Raw wire value for the "standing by" SSI state.
pub const STATE_STAND_BY: u8 = 0;
/// Raw wire value for the "operational" SSI state.
pub const STATE_OPERATIONAL: u8 = 1;

/// The emulator's two-state state machine (spec §3).
///
/// The wire-level `SET_STATE` maintenance command can write any byte, not
/// just these two values (the original firmware does a blind `read_8` into
/// the state variable). [`Store`] keeps the raw byte for wire fidelity;
/// this enum is the typed view most callers want.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SsiState {
    /// Initial state, before the first diagnostic datagram.
    StandBy,
    /// Entered exactly once, on the first diagnostic receipt, or by an
    /// explicit `SET_STATE` maintenance command.
    Operational,
}

impl From<u8> for SsiState {
    fn from(b: u8) -> Self {
        if b == STATE_OPERATIONAL {
            SsiState::Operational
        } else {
            SsiState::StandBy
        }
    }
}

impl From<SsiState> for u8 {
    fn from(s: SsiState) -> u8 {
        match s {
            SsiState::StandBy => STATE_STAND_BY,
            SsiState::Operational => STATE_OPERATIONAL,
        }
    }
}

/// The board configuration record (spec §3).
#[derive(Debug, Clone)]
pub struct BoardConfig {
    /// Demo-mode byte.
    pub demo: bool,
    /// Grating count, 1..=31. The wire value 0 in the 5-bit chanformat
    /// field means 16; see [`crate::frame`].
    pub gratings: u8,
    /// Channel count, 1..=15.
    pub channels: u8,
    /// Raw scan emission rate in Hz. 0 means paused.
    pub raw_speed_hz: u16,
    /// Continuous-frame cadence, in multiples of the scan period. 0 means
    /// paused.
    pub cont_speed_code: u16,
    /// Duration of one scan cycle, in microseconds.
    pub scan_time_us: u16,
    /// Reserved first-frame field.
    pub first_fr: u16,
    /// Board serial number.
    pub serial: u32,
    /// Network interface name. Stored, not interpreted.
    pub netif: String,
    /// Device IP address. Stored, not interpreted.
    pub device_ip: String,
    /// Host IP address. Stored, not interpreted.
    pub host_ip: String,
    /// Subnet mask. Stored, not interpreted.
    pub subnet: String,
    /// Gateway address. Stored, not interpreted.
    pub gateway: String,
    /// Log verbosity level. Stored, not interpreted by the core.
    pub log_level: u8,
}

impl Default for BoardConfig {
    /// Defaults grounded in `board_init()` in
    /// `original_source/src/smartscanemu.c`.
    fn default() -> Self {
        Self {
            demo: false,
            gratings: 16,
            channels: 4,
            raw_speed_hz: 0,
            cont_speed_code: 25,
            scan_time_us: 400,
            first_fr: 0,
            serial: 123_456,
            netif: "eth0".to_string(),
            device_ip: "10.0.0.150".to_string(),
            host_ip: "10.0.0.2".to_string(),
            subnet: "255.255.255.0".to_string(),
            gateway: "10.0.0.2".to_string(),
            log_level: 7,
        }
    }
}

/// Derived runtime timing values, recomputed on relevant config change
/// (spec §3).
#[derive(Debug, Clone, Copy, Default)]
pub struct Derived {
    /// Rate, in Hz, at which the scan producer should emit frames. 0 pauses it.
    pub raw_tx_rate: u16,
    /// Period, in microseconds, between continuous frames. 0 pauses it.
    pub cont_tx_period_us: u32,
}

/// A consistent-enough-for-one-frame read of the store, handed to a
/// producer at the top of its loop iteration.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Current configuration record.
    pub config: BoardConfig,
    /// Current derived timing values.
    pub derived: Derived,
    /// Current raw state byte.
    pub state_byte: u8,
}

struct Inner {
    config: BoardConfig,
    derived: Derived,
    state_byte: u8,
    diag_transitioned: bool,
}

/// The authoritative, process-wide configuration and state store.
pub struct Store {
    inner: RwLock<Inner>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    /// Build a store at its power-on defaults: `STAND_BY` state, default
    /// configuration, and both producers paused (derived rates start at
    /// zero independent of `cont_speed_code`'s nonzero default — see
    /// DESIGN.md).
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                config: BoardConfig::default(),
                derived: Derived::default(),
                state_byte: STATE_STAND_BY,
                diag_transitioned: false,
            }),
        }
    }

    /// Take a snapshot for a producer to build one frame from.
    pub fn snapshot(&self) -> Snapshot {
        let inner = self.inner.read().expect("config store lock poisoned");
        Snapshot {
            config: inner.config.clone(),
            derived: inner.derived,
            state_byte: inner.state_byte,
        }
    }

    /// Current raw state byte.
    pub fn state_byte(&self) -> u8 {
        self.inner.read().expect("config store lock poisoned").state_byte
    }

    /// Transition to `OPERATIONAL` on the first diagnostic receipt only.
    ///
    /// Gated on an independent one-shot latch, not on the current state
    /// byte's value: the original firmware fires this transition off a
    /// message-receipt counter (`rec_diag_msg_cnt == 1`) that never re-fires
    /// regardless of what `ssi_state` holds later, so a `SET_STATE`
    /// maintenance command that later sets the state byte back to
    /// `STAND_BY` must not cause a second diagnostic receipt to stomp it.
    /// Returns `true` if this call performed the transition, `false`
    /// otherwise (a later diagnostic receipt, whether or not the state byte
    /// has since been changed by `SET_STATE`).
    pub fn mark_operational_once(&self) -> bool {
        let mut inner = self.inner.write().expect("config store lock poisoned");
        if inner.diag_transitioned {
            false
        } else {
            inner.diag_transitioned = true;
            inner.state_byte = STATE_OPERATIONAL;
            true
        }
    }

    /// Overwrite the raw state byte directly (`SET_STATE` maintenance
    /// command).
    pub fn set_state_byte(&self, b: u8) {
        self.inner.write().expect("config store lock poisoned").state_byte = b;
    }

    /// Overwrite demo mode at startup, from `--demo` (not a maintenance
    /// command; see `bin/ssi-emud.rs`).
    pub fn set_demo(&self, demo: bool) {
        self.inner.write().expect("config store lock poisoned").config.demo = demo;
    }

    /// Apply a batch of already-validated maintenance updates atomically,
    /// then recompute derived values in the order spec.md §4.3 requires:
    /// scan-time before continuous period, since the latter depends on the
    /// former.
    pub fn apply_updates(&self, updates: &[crate::maintenance::Update]) {
        use crate::maintenance::Update;

        let mut inner = self.inner.write().expect("config store lock poisoned");
        let mut upd_scan_speed = false;
        let mut upd_cont_speed = false;
        let mut upd_scan_time = false;

        for u in updates {
            match *u {
                Update::SetState(b) => inner.state_byte = b,
                Update::SetDemoMode(demo) => inner.config.demo = demo,
                Update::SetScanRate(hz) => {
                    inner.config.raw_speed_hz = hz;
                    upd_scan_speed = true;
                }
                Update::SetContRate(code) => {
                    inner.config.cont_speed_code = code;
                    upd_cont_speed = true;
                }
                Update::SetChFormat(channels, gratings) => {
                    inner.config.channels = channels;
                    inner.config.gratings = gratings;
                }
                Update::SetScanBeg(first_fr) => inner.config.first_fr = first_fr,
                Update::SetScanSp(scan_time_us) => {
                    inner.config.scan_time_us = scan_time_us;
                    upd_scan_time = true;
                }
            }
        }

        if upd_scan_time {
            log::debug!("scan time set to {} us", inner.config.scan_time_us);
        }
        if upd_cont_speed || upd_scan_time {
            inner.derived.cont_tx_period_us =
                inner.config.cont_speed_code as u32 * inner.config.scan_time_us as u32;
            log::debug!(
                "continuous tx period set to {} us",
                inner.derived.cont_tx_period_us
            );
        }
        if upd_scan_speed {
            inner.derived.raw_tx_rate = inner.config.raw_speed_hz;
            log::debug!("raw tx rate set to {} Hz", inner.derived.raw_tx_rate);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maintenance::Update;

    #[test]
    fn starts_in_stand_by_with_paused_producers() {
        let store = Store::new();
        assert_eq!(SsiState::from(store.state_byte()), SsiState::StandBy);
        let snap = store.snapshot();
        assert_eq!(snap.derived.raw_tx_rate, 0);
        assert_eq!(snap.derived.cont_tx_period_us, 0);
        // Config field defaults to nonzero even though the derived rate
        // starts paused.
        assert_eq!(snap.config.cont_speed_code, 25);
    }

    #[test]
    fn first_diagnostic_transitions_once() {
        let store = Store::new();
        assert!(store.mark_operational_once());
        assert_eq!(SsiState::from(store.state_byte()), SsiState::Operational);
        assert!(!store.mark_operational_once());
    }

    #[test]
    fn later_set_state_survives_a_second_diagnostic_receipt() {
        let store = Store::new();
        assert!(store.mark_operational_once());
        store.set_state_byte(STATE_STAND_BY);
        // A second diagnostic receipt must not re-fire the transition and
        // stomp the operator's explicit SET_STATE.
        assert!(!store.mark_operational_once());
        assert_eq!(SsiState::from(store.state_byte()), SsiState::StandBy);
    }

    #[test]
    fn maintenance_apply_recomputes_in_order() {
        let store = Store::new();
        store.apply_updates(&[Update::SetContRate(25), Update::SetScanSp(400)]);
        let snap = store.snapshot();
        assert_eq!(snap.config.cont_speed_code, 25);
        assert_eq!(snap.config.scan_time_us, 400);
        assert_eq!(snap.derived.cont_tx_period_us, 10_000);
    }

    #[test]
    fn scan_rate_update_publishes_raw_tx_rate() {
        let store = Store::new();
        store.apply_updates(&[Update::SetScanRate(50)]);
        assert_eq!(store.snapshot().derived.raw_tx_rate, 50);
    }
}
