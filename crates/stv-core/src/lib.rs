//! Core traits and types for the ST-V loader/bridge.
//!
//! Everything that touches hardware goes through the [`Bus`] trait and
//! everything that touches storage goes through the [`Volume`] trait. The
//! production implementations do real memory-mapped I/O and FatFs calls;
//! tests and the host runner use [`SimBus`] and a filesystem-backed volume.

mod bus;
pub mod map;
mod volume;

pub use bus::{Bus, SimBus};
pub use volume::{DirEntry, FileId, ReadFault, SimVolume, Volume};
