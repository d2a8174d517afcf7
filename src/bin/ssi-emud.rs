/*! SSI board emulator daemon.

Emulates a fiber-optic sensor interrogation board's UDP control and
telemetry protocol, so a host-side client can be developed and tested
against it without the physical hardware.

```no_run
$ ssi-emud --host-ip 127.0.0.1 --local -v 2
```

The `--local` flag mirrors the original firmware's `EMU_LOCAL` build
option: it rebinds the diagnostic and maintenance receive sockets to
fixed loopback-friendly ports, for testing on one machine.
*/
use std::net::IpAddr;

use anyhow::Result;
use clap::Parser;

use ssi_emu::lifecycle::{self, RuntimeOptions};

#[derive(clap::Parser, Debug)]
#[command(version, about)]
struct Opt {
    /// Local address to bind all sockets on.
    #[arg(long, default_value = "0.0.0.0")]
    bind_ip: IpAddr,

    /// Host-side client address to send diagnostic replies, maintenance
    /// replies, and telemetry frames to.
    #[arg(long, default_value = "127.0.0.1")]
    host_ip: IpAddr,

    /// Diagnostic receive port, and the host's diagnostic-reply port.
    #[arg(long, default_value = "30001")]
    diag_port: u16,

    /// Maintenance receive port, and the host's maintenance-reply port.
    #[arg(long, default_value = "30002")]
    maint_port: u16,

    /// Port the shared outbound send socket binds to.
    #[arg(long, default_value = "30003")]
    client_port: u16,

    /// Host-side scan-frame receive port.
    #[arg(long, default_value = "30004")]
    scan_port: u16,

    /// Host-side continuous-frame receive port.
    #[arg(long, default_value = "30005")]
    cont_port: u16,

    /// Rebind diagnostic/maintenance receives to the fixed loopback ports
    /// (the original firmware's `EMU_LOCAL` build option).
    #[arg(long)]
    local: bool,

    /// Start with demo mode on.
    #[arg(long)]
    demo: bool,

    /// Verbosity. Repeat for more (-v, -vv, -vvv).
    #[arg(short = 'v', action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let opt = Opt::parse();
    stderrlog::new()
        .module(module_path!())
        .module("ssi_emu")
        .quiet(false)
        .verbosity(opt.verbose as usize)
        .timestamp(stderrlog::Timestamp::Second)
        .init()?;

    let runtime_opts = RuntimeOptions {
        bind_ip: opt.bind_ip,
        host_ip: opt.host_ip,
        diag_port: opt.diag_port,
        maint_port: opt.maint_port,
        client_port: opt.client_port,
        scan_port: opt.scan_port,
        cont_port: opt.cont_port,
        local: opt.local,
        demo: opt.demo,
    };

    lifecycle::run(&runtime_opts)?;
    Ok(())
}
