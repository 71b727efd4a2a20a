//! Wall clocks and the fixed-period timer used for idle income.
//!
//! The host calls [`crate::Engine::advance`] with variable frame deltas.
//! `RepeatingTimer` turns those into a whole number of fires using an
//! accumulator, so income stays deterministic and fully testable.

use std::cell::Cell;

/// Source of Unix-epoch milliseconds.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Real time: `Date.now()` in the browser, `SystemTime` natively.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[cfg(target_arch = "wasm32")]
    fn now_ms(&self) -> u64 {
        js_sys::Date::now() as u64
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn now_ms(&self) -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// Clock moved by hand. Used by tests and by hosts replaying sessions.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<u64>,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: Cell::new(start_ms),
        }
    }

    pub fn set(&self, ms: u64) {
        self.now.set(ms);
    }

    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get().saturating_add(ms));
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }
}

/// Fires once every `period_ms` of fed time.
#[derive(Clone, Debug, PartialEq)]
pub struct RepeatingTimer {
    period_ms: f64,
    /// Milliseconds fed but not yet consumed as fires
    accumulator: f64,
    /// Total fires since creation
    pub total_fires: u64,
}

impl RepeatingTimer {
    /// Non-finite or non-positive periods fall back to one second.
    pub fn new(period_ms: f64) -> Self {
        let period_ms = if period_ms.is_finite() && period_ms > 0.0 {
            period_ms
        } else {
            1000.0
        };
        Self {
            period_ms,
            accumulator: 0.0,
            total_fires: 0,
        }
    }

    pub fn period_ms(&self) -> f64 {
        self.period_ms
    }

    /// Feed `delta_ms` of elapsed time and return how many times the timer fired.
    pub fn update(&mut self, delta_ms: f64) -> u32 {
        if !delta_ms.is_finite() || delta_ms <= 0.0 {
            return 0;
        }
        self.accumulator += delta_ms;
        let fires = (self.accumulator / self.period_ms) as u32;
        self.accumulator -= fires as f64 * self.period_ms;
        self.total_fires += fires as u64;
        fires
    }
}
