//! ST-V input bridge.
//!
//! After the loader hands execution to the ST-V image, the vblank interrupt
//! runs one bridge tick per display refresh:
//!
//! 1. Sample both pad ports from one hardware snapshot
//! 2. Translate held buttons to active-low JAMMA levels on PDR1/PDR2
//! 3. Latch coin press edges and apply at most one credit increment
//!
//! The tick must complete before the next refresh; all mutable state
//! (previous-held masks, the pending-credit flag) is private to the
//! [`Bridge`] instance owned by the handler.

mod bridge;
mod credit;
mod host;
pub mod jamma;

pub use bridge::Bridge;
pub use credit::{COIN_BUTTON, CreditLatch};
pub use host::HostVolume;
