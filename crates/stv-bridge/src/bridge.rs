//! The per-tick bridge body.

use saturn_pad::PadSampler;
use sega_smpc::reg;
use stv_core::Bus;

use crate::credit::CreditLatch;
use crate::jamma;

/// Vblank bridge: owns the sampler state and the credit latch.
///
/// One instance belongs to the refresh interrupt handler. Each tick runs
/// sample → translate → latch; the handler must finish before the next
/// refresh fires.
pub struct Bridge {
    sampler: PadSampler,
    credits: CreditLatch,
    ticks: u64,
}

impl Bridge {
    #[must_use]
    pub fn new() -> Self {
        Self {
            sampler: PadSampler::new(),
            credits: CreditLatch::new(),
            ticks: 0,
        }
    }

    /// Run one refresh tick.
    pub fn vblank_tick(&mut self, bus: &mut impl Bus) {
        let (p1, p2) = self.sampler.sample_both(bus);

        bus.write_register(reg::PDR1, jamma::translate(p1.held));
        bus.write_register(reg::PDR2, jamma::translate(p2.held));

        self.credits.observe(p1);
        self.credits.apply(bus);

        self.ticks += 1;
    }

    /// Completed tick count.
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

impl Default for Bridge {
    fn default() -> Self {
        Self::new()
    }
}
