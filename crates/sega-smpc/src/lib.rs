//! Saturn SMPC (System Management & Peripheral Control) register access.
//!
//! Only the registers the bridge needs are mapped. Offsets are relative to
//! the SMPC base at `$20100000`.
//!
//! | Offset | Name   | Role                                   |
//! |--------|--------|----------------------------------------|
//! | $1E    | IOSEL2 | Port 2 direct/SMPC-managed select      |
//! | $1F    | IOSEL1 | Port 1 direct/SMPC-managed select      |
//! | $74    | PDR2   | Port 2 data register                   |
//! | $75    | PDR1   | Port 1 data register                   |
//! | $78    | DDR2   | Port 2 data direction register         |
//! | $79    | DDR1   | Port 1 data direction register         |
//!
//! In direct mode (IOSEL = 1) the PDR lines are driven by software rather
//! than the SMPC's own peripheral protocol, which is what lets the bridge
//! present JAMMA-style levels on the port connectors.

use stv_core::Bus;

/// SMPC register offsets from the SMPC base.
pub mod reg {
    pub const IOSEL2: u8 = 0x1E;
    pub const IOSEL1: u8 = 0x1F;
    pub const PDR2: u8 = 0x74;
    pub const PDR1: u8 = 0x75;
    pub const DDR2: u8 = 0x78;
    pub const DDR1: u8 = 0x79;
}

/// Direction mask for direct I/O: bits 0-6 driven as outputs.
pub const DIRECT_DDR: u8 = 0x7F;

/// Switch both controller ports to direct (non-multiplexed) access.
///
/// After this, reads and writes of PDR1/PDR2 hit the port lines directly.
/// The loaded ST-V image expects the ports in this mode.
pub fn configure_direct_io(bus: &mut impl Bus) {
    bus.write_register(reg::IOSEL1, 1);
    bus.write_register(reg::IOSEL2, 1);
    bus.write_register(reg::DDR1, DIRECT_DDR);
    bus.write_register(reg::DDR2, DIRECT_DDR);
}

/// Mask interrupts and transfer execution to `entry`.
///
/// On real hardware this never returns: the loaded image owns the machine
/// from here. Simulated buses record the target and return, which is how
/// the launch sequence is observed completing in tests.
pub fn handoff(bus: &mut impl Bus, entry: u32) {
    bus.disable_interrupts();
    bus.transfer_control(entry);
}
