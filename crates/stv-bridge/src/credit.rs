//! Coin-credit latch.
//!
//! The credit counter is a 16-bit word at a fixed address shared with the
//! running ST-V image: this side only ever increments it. A press edge of
//! the coin button sets a pending flag; once per tick the flag is applied
//! as a single increment and cleared. The two steps guarantee exactly one
//! increment per edge within the same tick's processing — this is not a
//! debounce across ticks.

use saturn_pad::{PadFrame, button};
use stv_core::{Bus, map};

/// The pad button wired as the coin switch (player 1's X).
pub const COIN_BUTTON: u16 = button::X;

/// Pending-credit flag plus its apply step.
pub struct CreditLatch {
    pending: bool,
}

impl CreditLatch {
    #[must_use]
    pub fn new() -> Self {
        Self { pending: false }
    }

    /// Note a coin press edge from this tick's player-1 frame.
    pub fn observe(&mut self, frame: PadFrame) {
        if frame.pressed & COIN_BUTTON != 0 {
            self.pending = true;
        }
    }

    /// Apply at most one pending credit to the shared counter.
    pub fn apply(&mut self, bus: &mut impl Bus) {
        if self.pending {
            let credits = bus.read_word(map::CREDIT_ADDR);
            bus.write_word(map::CREDIT_ADDR, credits.wrapping_add(1));
            self.pending = false;
        }
    }
}

impl Default for CreditLatch {
    fn default() -> Self {
        Self::new()
    }
}
