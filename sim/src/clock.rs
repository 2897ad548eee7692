// Copyright (c) 2022-2023 The MobileCoin Foundation

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use embedded_hal::delay::DelayNs;

/// Virtual microsecond clock, shared between a [crate::SimDevice] and its [SimDelay]s
#[derive(Clone, Debug, Default)]
pub struct Clock(Arc<AtomicU64>);

impl Clock {
    /// Current time in microseconds
    pub fn now_us(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }

    /// Advance the clock, returning the new time
    pub fn advance_us(&self, us: u64) -> u64 {
        self.0.fetch_add(us, Ordering::SeqCst) + us
    }
}

/// [DelayNs] implementation advancing the virtual clock, delays return immediately
#[derive(Clone, Debug)]
pub struct SimDelay {
    clock: Clock,
}

impl SimDelay {
    pub fn new(clock: Clock) -> Self {
        Self { clock }
    }
}

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.clock.advance_us(ns.div_ceil(1000) as u64);
    }

    fn delay_us(&mut self, us: u32) {
        self.clock.advance_us(us as u64);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.clock.advance_us(ms as u64 * 1000);
    }
}
