//! Fixed physical memory layout shared with the loaded ST-V image.

/// Base of the cartridge address space. Game ROM files are copied here
/// back to back in directory-enumeration order.
pub const CART_BASE: u32 = 0x0200_0000;

/// Load address and entry point of the ST-V BIOS image.
pub const BIOS_ADDR: u32 = 0x0602_0000;

/// Address of the 16-bit coin-credit counter. Written by the bridge,
/// read by the running ST-V image.
pub const CREDIT_ADDR: u32 = 0x0600_0350;

/// Base address of the SMPC register block.
pub const SMPC_BASE: u32 = 0x2010_0000;

/// File-to-memory copy chunk size in bytes.
pub const LOAD_CHUNK: usize = 4096;
