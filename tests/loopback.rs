//! End-to-end loopback test: a fake host client talks diagnostic and
//! maintenance protocol to a real `lifecycle::run` instance.

use std::net::UdpSocket;
use std::time::Duration;

use ssi_emu::limits::MSG_DIAGNOSTIC_SIZE;
use ssi_emu::lifecycle::{self, RuntimeOptions};

fn free_port() -> u16 {
    UdpSocket::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

#[test]
fn diagnostic_handshake_transitions_state_and_replies() {
    let host_diag = UdpSocket::bind("127.0.0.1:0").unwrap();
    host_diag
        .set_read_timeout(Some(Duration::from_secs(2)))
        .unwrap();
    let host_diag_port = host_diag.local_addr().unwrap().port();

    let opts = RuntimeOptions {
        bind_ip: "127.0.0.1".parse().unwrap(),
        host_ip: "127.0.0.1".parse().unwrap(),
        diag_port: host_diag_port,
        maint_port: free_port(),
        client_port: free_port(),
        scan_port: free_port(),
        cont_port: free_port(),
        local: false,
        demo: false,
    };
    let emu_diag_addr = format!("127.0.0.1:{}", opts.diag_port);

    std::thread::spawn(move || {
        lifecycle::run(&opts).unwrap();
    });
    // Give the emulator a moment to bind its sockets before we poke it.
    std::thread::sleep(Duration::from_millis(100));

    let probe = UdpSocket::bind("127.0.0.1:0").unwrap();
    probe.send_to(&[0u8; 1], &emu_diag_addr).unwrap();

    let mut buf = [0u8; 64];
    let (n, _) = host_diag.recv_from(&mut buf).unwrap();
    assert_eq!(n, MSG_DIAGNOSTIC_SIZE);
    assert_eq!(buf[5], ssi_emu::config::STATE_OPERATIONAL);
}

#[test]
fn maintenance_round_trip_updates_and_echoes_config() {
    let host_maint = UdpSocket::bind("127.0.0.1:0").unwrap();
    host_maint
        .set_read_timeout(Some(Duration::from_secs(2)))
        .unwrap();
    let host_maint_port = host_maint.local_addr().unwrap().port();

    let opts = RuntimeOptions {
        bind_ip: "127.0.0.1".parse().unwrap(),
        host_ip: "127.0.0.1".parse().unwrap(),
        diag_port: free_port(),
        maint_port: host_maint_port,
        client_port: free_port(),
        scan_port: free_port(),
        cont_port: free_port(),
        local: false,
        demo: false,
    };
    let emu_maint_addr = format!("127.0.0.1:{}", opts.maint_port);

    std::thread::spawn(move || {
        lifecycle::run(&opts).unwrap();
    });
    std::thread::sleep(Duration::from_millis(100));

    // Header (6 bytes) + SET_CONT_RATE TLV (cmd=0x04, len=2, value=25).
    let request: [u8; 10] = [
        0x00, 0x00, 0x00, 0x2a, // ulCodeStamp
        0x00, // ucSpare
        0x00, // ucState
        0x04, 0x02, 0x00, 25, // SET_CONT_RATE = 25
    ];

    let probe = UdpSocket::bind("127.0.0.1:0").unwrap();
    probe.send_to(&request, &emu_maint_addr).unwrap();

    let mut buf = [0u8; 128];
    let (n, _) = host_maint.recv_from(&mut buf).unwrap();
    assert!(n >= 36);
    assert_eq!(n % 4, 0);
    assert_eq!(u32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]]), 0x2a);
}
