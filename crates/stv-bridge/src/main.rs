//! Host runner for the ST-V loader/bridge.
//!
//! Runs the full launch sequence against a directory tree on the host,
//! with a simulated bus that records register writes and the final
//! hand-off instead of executing it, then simulates a run of vblank ticks
//! with optional scripted coin presses.

use std::path::PathBuf;
use std::process;

use clap::Parser;
use log::info;
use saturn_pad::button;
use stv_bridge::{Bridge, HostVolume};
use stv_core::{Bus, SimBus, map};
use stv_loader::Launcher;

#[derive(Parser)]
#[command(
    version,
    about = "Run the ST-V launch sequence and input bridge against a host directory",
    long_about = None
)]
struct BridgeArgs {
    /// Volume root directory
    #[arg(long)]
    root: PathBuf,

    /// Game directory, relative to the volume root
    #[arg(long)]
    games: String,

    /// BIOS image name, relative to the game directory
    #[arg(long, default_value = "bios.bin")]
    bios: String,

    /// Number of vblank ticks to simulate after hand-off
    #[arg(long, default_value_t = 600)]
    ticks: u32,

    /// Ticks at which a coin press edge is injected (repeatable)
    #[arg(long = "coin-at")]
    coin_at: Vec<u32>,
}

fn main() {
    colog::init();
    let args = BridgeArgs::parse();

    let mut volume = HostVolume::new(&args.root);
    let mut bus = SimBus::new();
    let mut launcher = Launcher::new();

    if launcher
        .launch(&mut volume, &mut bus, &args.bios, &args.games)
        .is_err()
    {
        // The launcher already logged the diagnostic
        process::exit(1);
    }

    info!(
        "hand-off recorded: entry {:08X}, interrupts disabled: {}",
        bus.jump_target().unwrap_or(0),
        bus.interrupts_disabled()
    );

    let mut bridge = Bridge::new();
    for tick in 0..args.ticks {
        let port1 = if args.coin_at.contains(&tick) {
            button::X
        } else {
            0
        };
        bus.set_pads(port1, 0);
        bridge.vblank_tick(&mut bus);
    }

    info!(
        "{} ticks run, credits = {}, PDR1 = {:02X}, PDR2 = {:02X}",
        bridge.ticks(),
        bus.read_word(map::CREDIT_ADDR),
        bus.register(sega_smpc::reg::PDR1),
        bus.register(sega_smpc::reg::PDR2)
    );
}
