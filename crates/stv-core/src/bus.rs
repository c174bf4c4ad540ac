//! Hardware access capability.
//!
//! The loader and the vblank bridge never touch registers or physical
//! memory directly; they go through [`Bus`]. On the Saturn the
//! implementation is raw memory-mapped I/O plus the SMPC pad-read
//! primitive. [`SimBus`] simulates the same surface and records the final
//! control transfer instead of executing it, so the launch state machine
//! is fully exercisable on a host.

use std::collections::BTreeMap;

/// Hardware access capability for the loader/bridge.
///
/// Register offsets are relative to the SMPC base. `transfer_control` does
/// not return on real hardware; simulated implementations record the entry
/// address and return, which is the only way `launch` is ever observed
/// completing.
pub trait Bus {
    /// Read a byte-wide register at the given offset from the SMPC base.
    fn read_register(&mut self, offset: u8) -> u8;

    /// Write a byte-wide register at the given offset from the SMPC base.
    fn write_register(&mut self, offset: u8, value: u8);

    /// Combined two-port pad read: port 0 in the low 16 bits, port 1 in
    /// the high 16 bits. Both ports are captured in one hardware snapshot.
    fn read_pads(&mut self) -> u32;

    /// Copy a block of bytes into physical memory at `address`.
    fn write_block(&mut self, address: u32, data: &[u8]);

    /// Read a 16-bit value from physical memory.
    fn read_word(&mut self, address: u32) -> u16;

    /// Write a 16-bit value to physical memory.
    fn write_word(&mut self, address: u32, value: u16);

    /// Mask interrupts ahead of the control transfer.
    fn disable_interrupts(&mut self);

    /// Transfer execution to the code at `entry`. Terminal on hardware.
    fn transfer_control(&mut self, entry: u32);
}

/// Simulated bus: byte registers, sparse physical memory, recorded jump.
pub struct SimBus {
    registers: [u8; 0x80],
    memory: BTreeMap<u32, u8>,
    pads: u32,
    /// Number of combined pad reads performed (for snapshot-coherence tests).
    pad_reads: u32,
    interrupts_disabled: bool,
    jump_target: Option<u32>,
}

impl SimBus {
    #[must_use]
    pub fn new() -> Self {
        Self {
            registers: [0; 0x80],
            memory: BTreeMap::new(),
            pads: 0,
            pad_reads: 0,
            interrupts_disabled: false,
            jump_target: None,
        }
    }

    /// Set the state both pad ports will report on the next combined read.
    pub fn set_pads(&mut self, port0: u16, port1: u16) {
        self.pads = u32::from(port0) | (u32::from(port1) << 16);
    }

    /// Current value of a register (without going through the trait).
    #[must_use]
    pub fn register(&self, offset: u8) -> u8 {
        self.registers[offset as usize]
    }

    /// Number of combined pad reads issued so far.
    #[must_use]
    pub fn pad_reads(&self) -> u32 {
        self.pad_reads
    }

    /// Bytes written to physical memory in `[address, address + len)`.
    /// Locations never written read back as zero.
    #[must_use]
    pub fn memory(&self, address: u32, len: usize) -> Vec<u8> {
        (0..len as u32)
            .map(|i| self.memory.get(&(address + i)).copied().unwrap_or(0))
            .collect()
    }

    /// Whether any byte in `[address, address + len)` has been written.
    #[must_use]
    pub fn memory_touched(&self, address: u32, len: usize) -> bool {
        self.memory.range(address..address + len as u32).next().is_some()
    }

    /// Recorded control-transfer target, if the launch got that far.
    #[must_use]
    pub fn jump_target(&self) -> Option<u32> {
        self.jump_target
    }

    #[must_use]
    pub fn interrupts_disabled(&self) -> bool {
        self.interrupts_disabled
    }
}

impl Default for SimBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Bus for SimBus {
    fn read_register(&mut self, offset: u8) -> u8 {
        self.registers[offset as usize]
    }

    fn write_register(&mut self, offset: u8, value: u8) {
        self.registers[offset as usize] = value;
    }

    fn read_pads(&mut self) -> u32 {
        self.pad_reads += 1;
        self.pads
    }

    fn write_block(&mut self, address: u32, data: &[u8]) {
        for (i, &byte) in data.iter().enumerate() {
            self.memory.insert(address + i as u32, byte);
        }
    }

    fn read_word(&mut self, address: u32) -> u16 {
        let hi = self.memory.get(&address).copied().unwrap_or(0);
        let lo = self.memory.get(&(address + 1)).copied().unwrap_or(0);
        (u16::from(hi) << 8) | u16::from(lo)
    }

    fn write_word(&mut self, address: u32, value: u16) {
        // SH-2 is big-endian
        self.memory.insert(address, (value >> 8) as u8);
        self.memory.insert(address + 1, (value & 0xFF) as u8);
    }

    fn disable_interrupts(&mut self) {
        self.interrupts_disabled = true;
    }

    fn transfer_control(&mut self, entry: u32) {
        self.jump_target = Some(entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registers_round_trip() {
        let mut bus = SimBus::new();
        bus.write_register(0x75, 0x7F);
        assert_eq!(bus.read_register(0x75), 0x7F);
        assert_eq!(bus.register(0x75), 0x7F);
    }

    #[test]
    fn block_writes_land_at_address() {
        let mut bus = SimBus::new();
        bus.write_block(0x0200_0000, &[1, 2, 3]);
        assert_eq!(bus.memory(0x0200_0000, 4), vec![1, 2, 3, 0]);
        assert!(bus.memory_touched(0x0200_0002, 1));
        assert!(!bus.memory_touched(0x0200_0003, 1));
    }

    #[test]
    fn words_are_big_endian() {
        let mut bus = SimBus::new();
        bus.write_word(0x0600_0350, 0x1234);
        assert_eq!(bus.memory(0x0600_0350, 2), vec![0x12, 0x34]);
        assert_eq!(bus.read_word(0x0600_0350), 0x1234);
    }

    #[test]
    fn jump_is_recorded_not_taken() {
        let mut bus = SimBus::new();
        bus.disable_interrupts();
        bus.transfer_control(0x0602_0000);
        assert!(bus.interrupts_disabled());
        assert_eq!(bus.jump_target(), Some(0x0602_0000));
    }

    #[test]
    fn pad_reads_are_counted() {
        let mut bus = SimBus::new();
        bus.set_pads(0x0001, 0x0080);
        assert_eq!(bus.read_pads(), 0x0080_0001);
        assert_eq!(bus.read_pads(), 0x0080_0001);
        assert_eq!(bus.pad_reads(), 2);
    }
}
